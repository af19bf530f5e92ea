// Dashboard refresh: fetch ticks per website, read the clock once, summarize each endpoint.
// Summaries are recomputed on every call; nothing derived is cached.

use chrono::{DateTime, Utc};

use crate::aggregator::{self, AggregatorConfig};
use crate::models::{Website, WebsiteStatus};
use crate::tick_repo::{TickRepo, TickSource};

/// Summary row for one website at `now`.
pub async fn website_status<S: TickSource>(
    source: &S,
    website: &Website,
    now: DateTime<Utc>,
    config: &AggregatorConfig,
) -> anyhow::Result<WebsiteStatus> {
    let raw = source.ticks_for(&website.id).await?;
    let summary = aggregator::summarize_raw(&raw, now, config)?;
    Ok(WebsiteStatus {
        id: website.id.clone(),
        url: website.url.clone(),
        summary: summary.view(),
    })
}

/// Summary rows for every registered website, in registration order. One `now` for the batch.
pub async fn all_website_statuses(
    repo: &TickRepo,
    now: DateTime<Utc>,
    config: &AggregatorConfig,
) -> anyhow::Result<Vec<WebsiteStatus>> {
    let websites = repo.list_websites().await?;
    let mut out = Vec::with_capacity(websites.len());
    for website in &websites {
        out.push(website_status(repo, website, now, config).await?);
    }
    Ok(out)
}
