//! Price source trait and structured error types.
//!
//! The PriceSource trait abstracts over where closing prices come from
//! (Yahoo Finance, a CSV directory, memory) so sources can be swapped and
//! mocked in tests. Every `DataError` means "data unavailable" to the
//! analysis layer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::period::LookbackPeriod;
use crate::domain::{PriceSeries, SeriesError};

/// Structured error types for data operations.
///
/// Displayable in CLI output and in screening report rows.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("hard stop: data provider has blocked requests (circuit breaker tripped)")]
    CircuitBreakerTripped,

    #[error("timed out after {timeout_secs}s fetching '{symbol}'")]
    Timeout { symbol: String, timeout_secs: u64 },

    #[error("I/O error: {0}")]
    Io(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("validation error: {0}")]
    Validation(#[from] SeriesError),

    #[error("data error: {0}")]
    Other(String),
}

/// Where a series came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    YahooFinance,
    CsvImport,
    Memory,
    Synthetic,
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::YahooFinance => "Yahoo Finance",
            Self::CsvImport => "CSV import",
            Self::Memory => "in-memory",
            Self::Synthetic => "synthetic",
        };
        f.write_str(label)
    }
}

/// Trait for price sources.
///
/// Implementations return the closing prices of one identifier over the
/// requested lookback, or a `DataError`. They carry no caching; callers that
/// want caching wrap a source.
pub trait PriceSource: Send + Sync {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Provenance tag for series returned by this source.
    fn kind(&self) -> DataSource;

    /// Fetch the daily closing-price series for an identifier.
    fn fetch(&self, identifier: &str, lookback: &LookbackPeriod) -> Result<PriceSeries, DataError>;
}

/// Trait for identifier universes (index constituents, watch lists, ...).
pub trait UniverseSource {
    fn name(&self) -> &str;

    fn identifiers(&self) -> Result<Vec<String>, DataError>;
}
