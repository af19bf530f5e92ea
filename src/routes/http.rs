// GET/POST handlers: version, website list, single website, register website

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use super::{ApiError, AppState};
use crate::dashboard;
use crate::models::{Website, WebsiteStatus};
use crate::{NAME, VERSION};

/// GET /version — returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

/// GET /api/v1/websites — every registered website with its freshly computed summary.
pub(super) async fn list_websites_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<WebsiteStatus>>, ApiError> {
    let now = chrono::Utc::now();
    let statuses =
        dashboard::all_website_statuses(&state.tick_repo, now, &state.aggregator).await?;
    Ok(Json(statuses))
}

/// GET /api/v1/website/{id}
pub(super) async fn get_website_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<WebsiteStatus>, ApiError> {
    let website = state
        .tick_repo
        .get_website(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("website {}", id)))?;
    let now = chrono::Utc::now();
    let status =
        dashboard::website_status(state.tick_repo.as_ref(), &website, now, &state.aggregator)
            .await?;
    Ok(Json(status))
}

#[derive(Debug, Deserialize)]
pub(super) struct CreateWebsiteRequest {
    url: String,
}

/// POST /api/v1/website — registers a URL for monitoring.
pub(super) async fn create_website_handler(
    State(state): State<AppState>,
    Json(req): Json<CreateWebsiteRequest>,
) -> Result<(StatusCode, Json<Website>), ApiError> {
    let url = req.url.trim();
    validate_url(url)?;
    let website = state.tick_repo.add_website(url).await?;
    tracing::info!(id = %website.id, url = %website.url, "website registered");
    Ok((StatusCode::CREATED, Json(website)))
}

fn validate_url(url: &str) -> Result<(), ApiError> {
    if url.is_empty() {
        return Err(ApiError::BadRequest("url must be non-empty".into()));
    }
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .ok_or_else(|| {
            ApiError::BadRequest(format!(
                "url must start with http:// or https://, got {}",
                url
            ))
        })?;
    if rest.is_empty() || rest.starts_with('/') {
        return Err(ApiError::BadRequest(format!("url has no host: {}", url)));
    }
    Ok(())
}
