// Health-check samples ("ticks"): raw records as stored, and validated samples.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status marker the probing service writes for a successful check.
pub const UP_MARKER: &str = "Good";

/// Binary result of a single health probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Up,
    Down,
}

impl Outcome {
    /// Parse a stored status string. Anything other than the up marker counts as down.
    pub fn from_status(s: &str) -> Self {
        if s == UP_MARKER {
            Outcome::Up
        } else {
            Outcome::Down
        }
    }

    pub fn is_up(self) -> bool {
        matches!(self, Outcome::Up)
    }
}

/// One validated health-check result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    pub occurred_at: DateTime<Utc>,
    pub outcome: Outcome,
}

impl Sample {
    pub fn new(occurred_at: DateTime<Utc>, outcome: Outcome) -> Self {
        Self {
            occurred_at,
            outcome,
        }
    }

    pub fn up(occurred_at: DateTime<Utc>) -> Self {
        Self::new(occurred_at, Outcome::Up)
    }

    pub fn down(occurred_at: DateTime<Utc>) -> Self {
        Self::new(occurred_at, Outcome::Down)
    }
}

/// Tick record as the data store hands it out: ISO-8601 timestamp and free-form status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTick {
    pub created_at: String,
    pub status: String,
}

impl RawTick {
    pub fn new(created_at: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            created_at: created_at.into(),
            status: status.into(),
        }
    }

    /// Build a raw record from a typed sample (RFC 3339, millisecond precision).
    pub fn from_sample(sample: &Sample) -> Self {
        let status = match sample.outcome {
            Outcome::Up => UP_MARKER,
            Outcome::Down => "Bad",
        };
        Self {
            created_at: sample
                .occurred_at
                .to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            status: status.to_string(),
        }
    }
}
