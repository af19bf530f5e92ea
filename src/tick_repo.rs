// SQLite store for monitored websites and their health-check ticks.
// The aggregator only sees ticks through TickSource; ordering is not part of the contract.

use crate::models::{RawTick, Website};
use chrono::DateTime;
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use tracing::instrument;

/// Data-access boundary for the aggregator: all ticks recorded for one endpoint.
pub trait TickSource {
    fn ticks_for(
        &self,
        website_id: &str,
    ) -> impl std::future::Future<Output = anyhow::Result<Vec<RawTick>>> + Send;
}

pub struct TickRepo {
    pool: SqlitePool,
    retention_ms: i64,
}

impl TickRepo {
    pub async fn connect(path: &str, retention_days: u32) -> anyhow::Result<Self> {
        Self::connect_with_pool_size(path, retention_days, 5).await
    }

    pub async fn connect_with_pool_size(
        path: &str,
        retention_days: u32,
        max_pool_size: u32,
    ) -> anyhow::Result<Self> {
        if let Some(parent) = Path::new(path).parent() {
            std::fs::create_dir_all(parent)?;
        }
        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .busy_timeout(std::time::Duration::from_secs(5))
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_pool_size)
            .connect_with(opts)
            .await?;
        let retention_ms = (retention_days as i64) * 24 * 60 * 60 * 1000;
        Ok(Self { pool, retention_ms })
    }

    pub async fn init(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS websites (
                id TEXT PRIMARY KEY,
                url TEXT NOT NULL,
                created_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        // created_at is kept verbatim (ISO-8601 text); created_at_ms is the parsed copy used for
        // pruning and is NULL when the text did not parse.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS website_ticks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                website_id TEXT NOT NULL,
                status TEXT NOT NULL,
                created_at TEXT NOT NULL,
                created_at_ms INTEGER
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_ticks_website_id ON website_ticks(website_id, created_at_ms)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[instrument(skip(self), fields(repo = "ticks", operation = "add_website"))]
    pub async fn add_website(&self, url: &str) -> anyhow::Result<Website> {
        let website = Website {
            id: uuid::Uuid::new_v4().to_string(),
            url: url.to_string(),
            created_at: now_ms()?,
        };
        sqlx::query("INSERT INTO websites (id, url, created_at) VALUES ($1, $2, $3)")
            .bind(&website.id)
            .bind(&website.url)
            .bind(website.created_at)
            .execute(&self.pool)
            .await?;
        Ok(website)
    }

    pub async fn list_websites(&self) -> anyhow::Result<Vec<Website>> {
        let rows =
            sqlx::query("SELECT id, url, created_at FROM websites ORDER BY created_at ASC, id ASC")
                .fetch_all(&self.pool)
                .await?;
        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(Self::parse_website_row(&row)?);
        }
        Ok(out)
    }

    pub async fn get_website(&self, id: &str) -> anyhow::Result<Option<Website>> {
        let row = sqlx::query("SELECT id, url, created_at FROM websites WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::parse_website_row).transpose()
    }

    /// Store ticks for one website in a single transaction. Rows are written as given.
    #[instrument(skip(self, ticks), fields(repo = "ticks", operation = "save_ticks", ticks_count = ticks.len()))]
    pub async fn save_ticks(&self, website_id: &str, ticks: &[RawTick]) -> anyhow::Result<()> {
        if ticks.is_empty() {
            return Ok(());
        }
        let mut tx = self.pool.begin().await?;
        for t in ticks {
            let created_at_ms = DateTime::parse_from_rfc3339(t.created_at.trim())
                .ok()
                .map(|ts| ts.timestamp_millis());
            sqlx::query(
                "INSERT INTO website_ticks (website_id, status, created_at, created_at_ms) VALUES ($1, $2, $3, $4)",
            )
            .bind(website_id)
            .bind(&t.status)
            .bind(&t.created_at)
            .bind(created_at_ms)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Delete ticks older than the retention period. Rows without a parsed time are kept.
    #[instrument(skip(self), fields(repo = "ticks", operation = "prune_old_ticks"))]
    pub async fn prune_old_ticks(&self) -> anyhow::Result<u64> {
        let cutoff = now_ms()? - self.retention_ms;
        let r = sqlx::query("DELETE FROM website_ticks WHERE created_at_ms < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;
        Ok(r.rows_affected())
    }

    /// Reclaim space after deletes (run periodically after pruning).
    #[instrument(skip(self), fields(repo = "ticks", operation = "vacuum"))]
    pub async fn vacuum(&self) -> anyhow::Result<()> {
        sqlx::query("VACUUM").execute(&self.pool).await?;
        Ok(())
    }

    fn parse_website_row(row: &sqlx::sqlite::SqliteRow) -> anyhow::Result<Website> {
        Ok(Website {
            id: row.try_get("id")?,
            url: row.try_get("url")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

impl TickSource for TickRepo {
    #[instrument(skip(self), fields(repo = "ticks", operation = "ticks_for"))]
    async fn ticks_for(&self, website_id: &str) -> anyhow::Result<Vec<RawTick>> {
        let rows =
            sqlx::query("SELECT created_at, status FROM website_ticks WHERE website_id = $1")
                .bind(website_id)
                .fetch_all(&self.pool)
                .await?;
        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(RawTick {
                created_at: row.try_get("created_at")?,
                status: row.try_get("status")?,
            });
        }
        Ok(out)
    }
}

fn now_ms() -> anyhow::Result<i64> {
    Ok(std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)?
        .as_millis() as i64)
}
