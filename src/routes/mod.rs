// HTTP + WebSocket routes

mod error;
mod http;
mod ws;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::aggregator::AggregatorConfig;
use crate::config::AppConfig;
use crate::tick_repo::TickRepo;

pub use error::ApiError;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) tick_repo: Arc<TickRepo>,
    pub(crate) aggregator: AggregatorConfig,
    pub(crate) config: AppConfig,
}

/// Builds the router. Fails only when the `[aggregation]` config is invalid.
pub fn app(tick_repo: Arc<TickRepo>, config: AppConfig) -> anyhow::Result<Router> {
    let state = AppState {
        tick_repo,
        aggregator: config.aggregator_config()?,
        config,
    };
    Ok(Router::new()
        .route("/", get(|| async { "uptimeboard: tick aggregation service" })) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/v1/websites", get(http::list_websites_handler)) // GET /api/v1/websites
        .route("/api/v1/website", post(http::create_website_handler)) // POST /api/v1/website
        .route("/api/v1/website/{id}", get(http::get_website_handler)) // GET /api/v1/website/{id}
        .route("/ws/websites", get(ws::ws_websites)) // WS /ws/websites
        .layer(CorsLayer::new().allow_origin(Any).allow_headers(Any))
        .with_state(state))
}
