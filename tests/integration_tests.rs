// Integration tests: HTTP and WebSocket endpoints

mod common;

use axum_test::TestServer;
use chrono::{TimeDelta, Utc};
use std::sync::Arc;
use tempfile::TempDir;
use uptimeboard::config::AppConfig;
use uptimeboard::models::{RawTick, Sample, Website, WebsiteStatus, WindowStatus};
use uptimeboard::routes;
use uptimeboard::tick_repo::TickRepo;

async fn test_app(dir: &TempDir) -> (axum::Router, Arc<TickRepo>) {
    let config = AppConfig::load_from_str(common::TEST_CONFIG).unwrap();
    let path = dir.path().join("uptime.db");
    let repo = Arc::new(TickRepo::connect(path.to_str().unwrap(), 7).await.unwrap());
    repo.init().await.unwrap();
    let app = routes::app(repo.clone(), config).unwrap();
    (app, repo)
}

#[tokio::test]
async fn test_root_endpoint() {
    let dir = TempDir::new().unwrap();
    let (app, _) = test_app(&dir).await;
    let server = TestServer::new(app).unwrap();
    let response = server.get("/").await;
    response.assert_status_ok();
    response.assert_text("uptimeboard: tick aggregation service");
}

#[tokio::test]
async fn test_version_endpoint() {
    let dir = TempDir::new().unwrap();
    let (app, _) = test_app(&dir).await;
    let server = TestServer::new(app).unwrap();
    let response = server.get("/version").await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    assert_eq!(
        json.get("name").and_then(|v| v.as_str()),
        Some("uptimeboard")
    );
    assert!(json.get("version").and_then(|v| v.as_str()).is_some());
}

#[tokio::test]
async fn test_create_website_then_list_without_ticks() {
    let dir = TempDir::new().unwrap();
    let (app, _) = test_app(&dir).await;
    let server = TestServer::new(app).unwrap();

    let response = server
        .post("/api/v1/website")
        .json(&serde_json::json!({ "url": "https://example.com" }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    let created: Website = response.json();
    assert_eq!(created.url, "https://example.com");

    let list: Vec<WebsiteStatus> = server.get("/api/v1/websites").await.json();
    assert_eq!(list.len(), 1);
    let row = &list[0];
    assert_eq!(row.id, created.id);
    assert_eq!(row.summary.status, WindowStatus::NoData);
    assert_eq!(row.summary.availability_percentage, 100.0);
    assert_eq!(row.summary.last_checked_at, None);
    assert_eq!(row.summary.recent_windows, vec![WindowStatus::NoData; 10]);
}

#[tokio::test]
async fn test_create_website_rejects_bad_url() {
    let dir = TempDir::new().unwrap();
    let (app, _) = test_app(&dir).await;
    let server = TestServer::new(app).unwrap();

    let response = server
        .post("/api/v1/website")
        .json(&serde_json::json!({ "url": "example.com" }))
        .expect_failure()
        .await;
    response.assert_status_bad_request();
    let json: serde_json::Value = response.json();
    assert!(json["error"].as_str().unwrap().contains("http"));
}

#[tokio::test]
async fn test_get_website_summarizes_stored_ticks() {
    let dir = TempDir::new().unwrap();
    let (app, repo) = test_app(&dir).await;
    let site = repo.add_website("https://example.com").await.unwrap();
    let now = Utc::now();
    repo.save_ticks(
        &site.id,
        &[
            RawTick::from_sample(&Sample::up(now - TimeDelta::minutes(1))),
            RawTick::from_sample(&Sample::down(now - TimeDelta::minutes(10))),
            RawTick::from_sample(&Sample::down(now - TimeDelta::minutes(10))),
            RawTick::from_sample(&Sample::up(now - TimeDelta::minutes(45))),
        ],
    )
    .await
    .unwrap();

    let server = TestServer::new(app).unwrap();
    let response = server.get(&format!("/api/v1/website/{}", site.id)).await;
    response.assert_status_ok();
    let status: WebsiteStatus = response.json();
    assert_eq!(status.url, "https://example.com");
    assert_eq!(status.summary.status, WindowStatus::Healthy);
    assert_eq!(status.summary.availability_percentage, 50.0);
    assert_eq!(status.summary.recent_windows.len(), 10);
    assert_eq!(status.summary.recent_windows[9], WindowStatus::Healthy);
    assert_eq!(
        status
            .summary
            .recent_windows
            .iter()
            .filter(|w| **w == WindowStatus::Unhealthy)
            .count(),
        1
    );
    assert!(status.summary.last_checked_at.is_some());
}

#[tokio::test]
async fn test_get_unknown_website_is_404() {
    let dir = TempDir::new().unwrap();
    let (app, _) = test_app(&dir).await;
    let server = TestServer::new(app).unwrap();
    let response = server
        .get("/api/v1/website/does-not-exist")
        .expect_failure()
        .await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn test_ws_websites_pushes_summaries() {
    let dir = TempDir::new().unwrap();
    let (app, repo) = test_app(&dir).await;
    let site = repo.add_website("https://example.com").await.unwrap();
    repo.save_ticks(
        &site.id,
        &[RawTick::from_sample(&Sample::down(
            Utc::now() - TimeDelta::minutes(1),
        ))],
    )
    .await
    .unwrap();

    let server = TestServer::builder().http_transport().build(app).unwrap();
    let mut ws = server
        .get_websocket("/ws/websites")
        .await
        .into_websocket()
        .await;
    let statuses: Vec<WebsiteStatus> = ws.receive_json().await;
    assert_eq!(statuses.len(), 1);
    assert_eq!(statuses[0].id, site.id);
    assert_eq!(statuses[0].summary.status, WindowStatus::Unhealthy);
    assert_eq!(statuses[0].summary.availability_percentage, 0.0);
}
