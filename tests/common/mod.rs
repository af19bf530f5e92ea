// Shared test helpers

#![allow(dead_code)]

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use uptimeboard::models::Sample;

/// Fixed reference time so results never depend on the wall clock.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

pub fn minutes_ago(now: DateTime<Utc>, minutes: i64) -> DateTime<Utc> {
    now - TimeDelta::minutes(minutes)
}

pub fn seconds_ago(now: DateTime<Utc>, seconds: i64) -> DateTime<Utc> {
    now - TimeDelta::seconds(seconds)
}

/// `count` samples evenly spread over `(now - span, now)`, newest last.
pub fn spread_samples(
    now: DateTime<Utc>,
    span: TimeDelta,
    count: i32,
    make: fn(DateTime<Utc>) -> Sample,
) -> Vec<Sample> {
    let step = span / count;
    (0..count)
        .map(|i| make(now - span + step * i + step / 2))
        .collect()
}

pub const TEST_CONFIG: &str = r#"
[server]
port = 8080
host = "127.0.0.1"

[database]
path = "data/test.db"
max_pool_size = 2

[publishing]
refresh_interval_ms = 50
"#;
