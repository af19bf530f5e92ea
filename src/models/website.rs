// Monitored endpoints as registered through the API.

use serde::{Deserialize, Serialize};

use super::SummaryView;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Website {
    pub id: String,
    pub url: String,
    /// Registration time, ms since epoch.
    pub created_at: i64,
}

/// One dashboard row: endpoint identity plus its current summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteStatus {
    pub id: String,
    pub url: String,
    #[serde(flatten)]
    pub summary: SummaryView,
}
