//! MomScan Runner — configuration, universe screening, correlation, export.
//!
//! This crate builds on `momscan-core` to provide:
//! - TOML run configuration with validation and a content-addressed run id
//! - Deadline-bounded retrieval over any `PriceSource`
//! - Universe screening on a bounded rayon pool, rows in input order
//! - Screening reports with metric ranking and schema-versioned persistence
//! - Correlation screen across several identifiers
//! - Deterministic synthetic price source
//! - Tracing subscriber setup

pub mod config;
pub mod correlation;
pub mod export;
pub mod fetch;
pub mod logging;
pub mod report;
pub mod screener;
pub mod synthetic;

pub use config::{AppConfig, ConfigError, RunId, ScreenSettings};
pub use correlation::{CorrelatedPeer, CorrelationMatrix, DEFAULT_CORRELATION_THRESHOLD};
pub use fetch::{fetch_with_timeout, FetchLimiter};
pub use logging::{init_logging, LogFormat};
pub use report::{RankingMetric, RowStatus, ScreeningReport, ScreeningRow, SCHEMA_VERSION};
pub use screener::{passes, screen_universe, ScreenError};
pub use synthetic::SyntheticSource;
