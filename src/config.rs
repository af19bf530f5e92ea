use chrono::TimeDelta;
use serde::Deserialize;

use crate::aggregator::{AggregatorConfig, DEFAULT_WINDOW_COUNT, DEFAULT_WINDOW_DURATION_SECS};

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub aggregation: AggregationConfig,
    pub publishing: PublishingConfig,
    #[serde(default)]
    pub retention: RetentionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    pub max_pool_size: u32,
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
}

fn default_retention_days() -> u32 {
    7
}

/// Window layout for tick aggregation. `lookback_secs` defaults to count x duration.
#[derive(Debug, Clone, Deserialize)]
pub struct AggregationConfig {
    #[serde(default = "default_window_count")]
    pub window_count: usize,
    #[serde(default = "default_window_duration_secs")]
    pub window_duration_secs: i64,
    #[serde(default)]
    pub lookback_secs: Option<i64>,
}

fn default_window_count() -> usize {
    DEFAULT_WINDOW_COUNT
}

fn default_window_duration_secs() -> i64 {
    DEFAULT_WINDOW_DURATION_SECS
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            window_count: default_window_count(),
            window_duration_secs: default_window_duration_secs(),
            lookback_secs: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PublishingConfig {
    /// How often /ws/websites pushes freshly recomputed summaries.
    pub refresh_interval_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetentionConfig {
    #[serde(default = "default_prune_interval_secs")]
    pub prune_interval_secs: u64,
    /// Optional cron expression for VACUUM (e.g. "0 0 3 * * *" = 03:00 daily). Uses local time.
    #[serde(default)]
    pub vacuum_schedule: Option<String>,
    /// Run VACUUM every N seconds when vacuum_schedule is not set.
    #[serde(default = "default_vacuum_interval_secs")]
    pub vacuum_interval_secs: u64,
}

fn default_prune_interval_secs() -> u64 {
    3600
}

fn default_vacuum_interval_secs() -> u64 {
    86_400
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            prune_interval_secs: default_prune_interval_secs(),
            vacuum_schedule: None,
            vacuum_interval_secs: default_vacuum_interval_secs(),
        }
    }
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Aggregator window layout built from the `[aggregation]` table.
    pub fn aggregator_config(&self) -> anyhow::Result<AggregatorConfig> {
        let agg = &self.aggregation;
        let window_duration = TimeDelta::try_seconds(agg.window_duration_secs).ok_or_else(|| {
            anyhow::anyhow!(
                "aggregation.window_duration_secs out of range: {}",
                agg.window_duration_secs
            )
        })?;
        let config = match agg.lookback_secs {
            Some(secs) => {
                let lookback = TimeDelta::try_seconds(secs).ok_or_else(|| {
                    anyhow::anyhow!("aggregation.lookback_secs out of range: {}", secs)
                })?;
                AggregatorConfig::with_lookback(agg.window_count, window_duration, lookback)?
            }
            None => AggregatorConfig::new(agg.window_count, window_duration)?,
        };
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            !self.database.path.is_empty(),
            "database.path must be non-empty"
        );
        anyhow::ensure!(
            self.database.max_pool_size > 0,
            "database.max_pool_size must be > 0, got {}",
            self.database.max_pool_size
        );
        anyhow::ensure!(
            self.database.retention_days > 0,
            "database.retention_days must be > 0, got {}",
            self.database.retention_days
        );
        anyhow::ensure!(
            self.aggregation.window_count > 0,
            "aggregation.window_count must be > 0, got {}",
            self.aggregation.window_count
        );
        anyhow::ensure!(
            self.aggregation.window_duration_secs > 0,
            "aggregation.window_duration_secs must be > 0, got {}",
            self.aggregation.window_duration_secs
        );
        self.aggregator_config()?;
        anyhow::ensure!(
            self.publishing.refresh_interval_ms > 0,
            "publishing.refresh_interval_ms must be > 0, got {}",
            self.publishing.refresh_interval_ms
        );
        anyhow::ensure!(
            self.retention.prune_interval_secs > 0,
            "retention.prune_interval_secs must be > 0, got {}",
            self.retention.prune_interval_secs
        );
        anyhow::ensure!(
            self.retention.vacuum_interval_secs > 0,
            "retention.vacuum_interval_secs must be > 0, got {}",
            self.retention.vacuum_interval_secs
        );
        Ok(())
    }
}
