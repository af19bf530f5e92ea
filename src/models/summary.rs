// Derived per-endpoint summary and its JSON view.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Classification of one time window; serializes to "healthy", "unhealthy" or "no-data".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WindowStatus {
    Healthy,
    Unhealthy,
    NoData,
}

/// Result of one aggregation pass. Recomputed from raw samples every refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointSummary {
    pub current_status: WindowStatus,
    /// Fraction of up samples over the whole provided set, in [0, 1]. 1.0 when there are none.
    pub availability_ratio: f64,
    /// `None` when the endpoint was never observed.
    pub last_observed_at: Option<DateTime<Utc>>,
    /// Oldest first; always `window_count` entries.
    pub windows: Vec<WindowStatus>,
}

impl EndpointSummary {
    pub fn availability_percentage(&self) -> f64 {
        self.availability_ratio * 100.0
    }

    pub fn view(&self) -> SummaryView {
        SummaryView::from(self)
    }
}

/// Serialized shape of an [`EndpointSummary`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryView {
    pub status: WindowStatus,
    pub availability_percentage: f64,
    pub last_checked_at: Option<DateTime<Utc>>,
    pub recent_windows: Vec<WindowStatus>,
}

impl From<&EndpointSummary> for SummaryView {
    fn from(s: &EndpointSummary) -> Self {
        Self {
            status: s.current_status,
            availability_percentage: s.availability_percentage(),
            last_checked_at: s.last_observed_at,
            recent_windows: s.windows.clone(),
        }
    }
}
