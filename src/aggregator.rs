// Tick aggregation: raw samples + reference time -> windowed status, availability, last seen.
// Pure and synchronous. DB access and clock reads stay with the caller (see dashboard).

use chrono::{DateTime, TimeDelta, Utc};
use tracing::debug;

use crate::models::{EndpointSummary, Outcome, RawTick, Sample, WindowStatus};

pub const DEFAULT_WINDOW_COUNT: usize = 10;
pub const DEFAULT_WINDOW_DURATION_SECS: i64 = 180;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SummaryError {
    #[error("invalid aggregator config: {0}")]
    InvalidConfig(String),
}

/// Window layout. `lookback` must equal `window_count * window_duration`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregatorConfig {
    pub window_count: usize,
    pub window_duration: TimeDelta,
    pub lookback: TimeDelta,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        let window_duration = TimeDelta::seconds(DEFAULT_WINDOW_DURATION_SECS);
        Self {
            window_count: DEFAULT_WINDOW_COUNT,
            window_duration,
            lookback: window_duration * DEFAULT_WINDOW_COUNT as i32,
        }
    }
}

impl AggregatorConfig {
    /// Config with lookback derived from count and duration. Validated.
    pub fn new(window_count: usize, window_duration: TimeDelta) -> Result<Self, SummaryError> {
        let lookback = i32::try_from(window_count)
            .ok()
            .and_then(|n| window_duration.checked_mul(n))
            .ok_or_else(|| {
                SummaryError::InvalidConfig(format!(
                    "lookback overflows: {} windows of {}",
                    window_count, window_duration
                ))
            })?;
        Self::with_lookback(window_count, window_duration, lookback)
    }

    /// Config with an explicit lookback. Fails unless it matches count * duration.
    pub fn with_lookback(
        window_count: usize,
        window_duration: TimeDelta,
        lookback: TimeDelta,
    ) -> Result<Self, SummaryError> {
        let config = Self {
            window_count,
            window_duration,
            lookback,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SummaryError> {
        if self.window_count == 0 {
            return Err(SummaryError::InvalidConfig(
                "window_count must be > 0".into(),
            ));
        }
        if self.window_duration <= TimeDelta::zero() {
            return Err(SummaryError::InvalidConfig(format!(
                "window_duration must be > 0, got {}",
                self.window_duration
            )));
        }
        if self.lookback <= TimeDelta::zero() {
            return Err(SummaryError::InvalidConfig(format!(
                "lookback must be > 0, got {}",
                self.lookback
            )));
        }
        let expected = i32::try_from(self.window_count)
            .ok()
            .and_then(|n| self.window_duration.checked_mul(n));
        if expected != Some(self.lookback) {
            return Err(SummaryError::InvalidConfig(format!(
                "lookback ({}) must equal window_count ({}) x window_duration ({})",
                self.lookback, self.window_count, self.window_duration
            )));
        }
        // Slice indexing works in nanoseconds.
        if self.lookback.num_nanoseconds().is_none() {
            return Err(SummaryError::InvalidConfig(format!(
                "lookback too large: {}",
                self.lookback
            )));
        }
        Ok(())
    }
}

/// Raw ticks after lenient parsing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedTicks {
    pub samples: Vec<Sample>,
    /// Records dropped for an unparseable timestamp.
    pub skipped: usize,
}

/// Convert stored ticks into samples. Unknown statuses become `Down`; records whose
/// timestamp does not parse are skipped and counted, never failing the call.
pub fn parse_ticks(raw: &[RawTick]) -> ParsedTicks {
    let mut out = ParsedTicks {
        samples: Vec::with_capacity(raw.len()),
        skipped: 0,
    };
    for tick in raw {
        match DateTime::parse_from_rfc3339(tick.created_at.trim()) {
            Ok(ts) => out.samples.push(Sample::new(
                ts.with_timezone(&Utc),
                Outcome::from_status(&tick.status),
            )),
            Err(e) => {
                debug!(created_at = %tick.created_at, error = %e, "skipping tick with unparseable timestamp");
                out.skipped += 1;
            }
        }
    }
    out
}

#[derive(Debug, Clone, Copy, Default)]
struct Bucket {
    up: u64,
    total: u64,
}

impl Bucket {
    fn classify(self) -> WindowStatus {
        if self.total == 0 {
            WindowStatus::NoData
        } else if self.up * 2 >= self.total {
            // Ties are healthy.
            WindowStatus::Healthy
        } else {
            WindowStatus::Unhealthy
        }
    }
}

/// Summarize one endpoint's samples relative to `now`.
///
/// Windows cover `[now - lookback, now)` in `window_count` slices, oldest first; slice `i`
/// from the newest side spans `[now - (i+1)*d, now - i*d)`. Availability and last-observed
/// time use every provided sample, including ones outside the lookback.
pub fn summarize(
    samples: &[Sample],
    now: DateTime<Utc>,
    config: &AggregatorConfig,
) -> Result<EndpointSummary, SummaryError> {
    config.validate()?;

    // validate() guarantees both fit in i64 nanoseconds.
    let window_ns = config.window_duration.num_nanoseconds().unwrap_or(i64::MAX);
    let lookback_ns = config.lookback.num_nanoseconds().unwrap_or(i64::MAX);

    let mut buckets = vec![Bucket::default(); config.window_count];
    let mut up_total: u64 = 0;
    let mut last_observed_at: Option<DateTime<Utc>> = None;

    for sample in samples {
        let up = sample.outcome.is_up();
        if up {
            up_total += 1;
        }
        if last_observed_at.is_none_or(|last| sample.occurred_at > last) {
            last_observed_at = Some(sample.occurred_at);
        }

        // Age in (0, lookback]; samples at or after `now`, or too old to represent, are skipped.
        let Some(age_ns) = now
            .signed_duration_since(sample.occurred_at)
            .num_nanoseconds()
        else {
            continue;
        };
        if age_ns <= 0 || age_ns > lookback_ns {
            continue;
        }
        let from_newest = ((age_ns - 1) / window_ns) as usize;
        let Some(idx) = (config.window_count - 1).checked_sub(from_newest) else {
            continue;
        };
        let bucket = &mut buckets[idx];
        bucket.total += 1;
        if up {
            bucket.up += 1;
        }
    }

    let windows: Vec<WindowStatus> = buckets.into_iter().map(Bucket::classify).collect();
    let current_status = windows.last().copied().unwrap_or(WindowStatus::NoData);
    let availability_ratio = if samples.is_empty() {
        1.0
    } else {
        up_total as f64 / samples.len() as f64
    };

    Ok(EndpointSummary {
        current_status,
        availability_ratio,
        last_observed_at,
        windows,
    })
}

/// Parse raw ticks leniently, then summarize.
pub fn summarize_raw(
    raw: &[RawTick],
    now: DateTime<Utc>,
    config: &AggregatorConfig,
) -> Result<EndpointSummary, SummaryError> {
    let parsed = parse_ticks(raw);
    if parsed.skipped > 0 {
        debug!(skipped = parsed.skipped, kept = parsed.samples.len(), "malformed ticks dropped");
    }
    summarize(&parsed.samples, now, config)
}
