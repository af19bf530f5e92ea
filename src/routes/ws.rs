// WebSocket handler: periodic push of recomputed website summaries

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use bytes::Bytes;
use std::sync::Arc;
use tokio::time::{Duration, timeout};

use super::AppState;
use crate::aggregator::AggregatorConfig;
use crate::dashboard;
use crate::tick_repo::TickRepo;

pub(super) const WS_PING_INTERVAL: Duration = Duration::from_secs(30);
pub(super) const WS_SEND_TIMEOUT: Duration = Duration::from_secs(10);

pub(super) async fn ws_websites(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let repo = state.tick_repo.clone();
    let aggregator = state.aggregator;
    let interval_ms = state.config.publishing.refresh_interval_ms;
    ws.on_upgrade(move |socket| async move {
        if let Err(e) = stream_websites(socket, repo, aggregator, interval_ms).await {
            tracing::info!("Websites stream error: {}", e);
        }
    })
}

/// Sends the full status list on connect and then every `interval_ms`.
async fn stream_websites(
    mut socket: WebSocket,
    repo: Arc<TickRepo>,
    aggregator: AggregatorConfig,
    interval_ms: u64,
) -> anyhow::Result<()> {
    tracing::info!("Client connected to websites stream");
    let mut tick = tokio::time::interval(Duration::from_millis(interval_ms));
    tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut ping_interval = tokio::time::interval(WS_PING_INTERVAL);
    ping_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    // interval() fires immediately; skip the first ping so the first frame is data.
    ping_interval.tick().await;
    loop {
        tokio::select! {
            _ = tick.tick() => {
                let now = chrono::Utc::now();
                let statuses = dashboard::all_website_statuses(&repo, now, &aggregator).await?;
                let json = serde_json::to_string(&statuses)?;
                let r = timeout(WS_SEND_TIMEOUT, socket.send(Message::Text(json.into()))).await;
                if r.is_err() || r.unwrap_or(Ok(())).is_err() {
                    break;
                }
            }
            _ = ping_interval.tick() => {
                let r = timeout(WS_SEND_TIMEOUT, socket.send(Message::Ping(Bytes::new()))).await;
                if r.is_err() || r.unwrap_or(Ok(())).is_err() {
                    break;
                }
            }
        }
    }
    Ok(())
}
