// Background worker: prune ticks older than retention_days so per-endpoint tick sets stay bounded.
// VACUUM runs on a configurable schedule (cron expression or fixed interval).

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::config::RetentionConfig;
use crate::tick_repo::TickRepo;
use tracing::{info, instrument, warn};

/// Spawns the retention worker. Returns a join handle; the task ends when `shutdown_rx` fires.
pub fn spawn(
    repo: Arc<TickRepo>,
    config: RetentionConfig,
    shutdown_rx: tokio::sync::oneshot::Receiver<()>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        run(repo, config, shutdown_rx).await;
    })
}

#[instrument(skip(repo, shutdown_rx), fields(interval_secs = config.prune_interval_secs))]
async fn run(
    repo: Arc<TickRepo>,
    config: RetentionConfig,
    mut shutdown_rx: tokio::sync::oneshot::Receiver<()>,
) {
    let mut prune_interval = tokio::time::interval(Duration::from_secs(config.prune_interval_secs));
    prune_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let (vacuum_tx, mut vacuum_rx) = tokio::sync::mpsc::channel::<()>(1);
    let scheduler = tokio::spawn(vacuum_scheduler(config.clone(), vacuum_tx));

    loop {
        tokio::select! {
            _ = prune_interval.tick() => {
                if let Err(e) = run_one_prune(&repo).await {
                    warn!(error = %e, "tick prune failed");
                }
            }
            Some(()) = vacuum_rx.recv() => {
                if let Err(e) = repo.vacuum().await {
                    warn!(error = %e, "vacuum failed");
                } else {
                    info!("vacuum complete");
                }
            }
            _ = &mut shutdown_rx => {
                info!("retention worker shutting down");
                break;
            }
        }
    }
    scheduler.abort();
}

/// Sends a message on `tx` at each VACUUM time (cron or fixed interval). Uses local time for cron.
async fn vacuum_scheduler(config: RetentionConfig, tx: tokio::sync::mpsc::Sender<()>) {
    if let Some(ref cron_str) = config.vacuum_schedule {
        let Ok(schedule) = cron::Schedule::from_str(cron_str) else {
            warn!(cron = %cron_str, "invalid vacuum_schedule; VACUUM will not run");
            return;
        };
        loop {
            let now = chrono::Local::now();
            let next = schedule.after(&now).next();
            if let Some(next) = next {
                let delay = (next - now).to_std().unwrap_or(Duration::from_secs(1));
                tokio::time::sleep(delay).await;
                if tx.send(()).await.is_err() {
                    break;
                }
            } else {
                tokio::time::sleep(Duration::from_secs(3600)).await;
            }
        }
    } else {
        let interval = Duration::from_secs(config.vacuum_interval_secs);
        loop {
            tokio::time::sleep(interval).await;
            if tx.send(()).await.is_err() {
                break;
            }
        }
    }
}

/// Runs one prune pass. Used by the worker loop.
pub async fn run_one_prune(repo: &TickRepo) -> anyhow::Result<u64> {
    let pruned = repo.prune_old_ticks().await?;
    if pruned > 0 {
        info!(pruned_ticks = pruned, "old ticks pruned");
    }
    Ok(pruned)
}
