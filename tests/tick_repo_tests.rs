// TickRepo tests: connect, init, websites, ticks, prune

use chrono::{TimeDelta, Utc};
use tempfile::TempDir;
use uptimeboard::models::{RawTick, Sample};
use uptimeboard::retention_worker::run_one_prune;
use uptimeboard::tick_repo::{TickRepo, TickSource};

async fn test_repo(dir: &TempDir) -> TickRepo {
    let path = dir.path().join("uptime.db");
    let repo = TickRepo::connect(path.to_str().unwrap(), 7).await.unwrap();
    repo.init().await.unwrap();
    repo
}

#[tokio::test]
async fn tick_repo_connect_and_init() {
    let dir = TempDir::new().unwrap();
    let repo = test_repo(&dir).await;
    // Second init is no-op (IF NOT EXISTS)
    repo.init().await.unwrap();
}

#[tokio::test]
async fn tick_repo_add_and_list_websites() {
    let dir = TempDir::new().unwrap();
    let repo = test_repo(&dir).await;

    let a = repo.add_website("https://a.example").await.unwrap();
    let b = repo.add_website("https://b.example").await.unwrap();
    assert_ne!(a.id, b.id);

    let all = repo.list_websites().await.unwrap();
    assert_eq!(all.len(), 2);
    assert!(all.contains(&a));
    assert!(all.contains(&b));

    assert_eq!(repo.get_website(&a.id).await.unwrap(), Some(a));
    assert_eq!(repo.get_website("missing").await.unwrap(), None);
}

#[tokio::test]
async fn tick_repo_ticks_are_scoped_per_website() {
    let dir = TempDir::new().unwrap();
    let repo = test_repo(&dir).await;
    let a = repo.add_website("https://a.example").await.unwrap();
    let b = repo.add_website("https://b.example").await.unwrap();

    let now = Utc::now();
    repo.save_ticks(
        &a.id,
        &[
            RawTick::from_sample(&Sample::up(now - TimeDelta::minutes(1))),
            RawTick::from_sample(&Sample::down(now - TimeDelta::minutes(2))),
        ],
    )
    .await
    .unwrap();
    repo.save_ticks(&b.id, &[RawTick::new("garbage", "Good")])
        .await
        .unwrap();

    let a_ticks = repo.ticks_for(&a.id).await.unwrap();
    assert_eq!(a_ticks.len(), 2);
    // Malformed records are stored verbatim; the aggregator decides what to do with them.
    let b_ticks = repo.ticks_for(&b.id).await.unwrap();
    assert_eq!(b_ticks, vec![RawTick::new("garbage", "Good")]);
    assert!(repo.ticks_for("missing").await.unwrap().is_empty());
}

#[tokio::test]
async fn tick_repo_save_empty_no_op() {
    let dir = TempDir::new().unwrap();
    let repo = test_repo(&dir).await;
    let a = repo.add_website("https://a.example").await.unwrap();
    repo.save_ticks(&a.id, &[]).await.unwrap();
    assert!(repo.ticks_for(&a.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn tick_repo_prune_old_ticks() {
    let dir = TempDir::new().unwrap();
    let repo = test_repo(&dir).await;
    let a = repo.add_website("https://a.example").await.unwrap();

    let now = Utc::now();
    let old = RawTick::from_sample(&Sample::up(now - TimeDelta::days(8)));
    let fresh = RawTick::from_sample(&Sample::up(now - TimeDelta::minutes(1)));
    let unparsed = RawTick::new("not a time", "Bad");
    repo.save_ticks(&a.id, &[old, fresh.clone(), unparsed.clone()])
        .await
        .unwrap();

    let pruned = run_one_prune(&repo).await.unwrap();
    assert_eq!(pruned, 1);
    let left = repo.ticks_for(&a.id).await.unwrap();
    assert_eq!(left.len(), 2);
    assert!(left.contains(&fresh));
    assert!(left.contains(&unparsed));

    repo.vacuum().await.unwrap();
}
