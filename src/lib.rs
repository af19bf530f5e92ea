// Library for tests to access modules

pub mod aggregator;
pub mod config;
pub mod dashboard;
pub mod models;
pub mod retention_worker;
pub mod routes;
pub mod tick_repo;

/// Package name and version, baked in from Cargo.toml at build time.
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
