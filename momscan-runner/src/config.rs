//! Serializable run configuration.
//!
//! One `AppConfig` carries every tunable of a run: indicator spans, the
//! analyzer's holding period and risk-free rate, and the screener's
//! thresholds and concurrency. It is loaded from TOML (every table and field
//! optional), validated once, and passed down by reference.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use momscan_core::analysis::AnalyzerConfig;
use momscan_core::data::LookbackPeriod;
use momscan_core::indicators::IndicatorParams;

/// Content-addressable identifier for a configuration (BLAKE3 hex).
pub type RunId = String;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(String),

    #[error("invalid config: {field} {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Screener thresholds, retrieval window and concurrency bound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenSettings {
    /// How much history to request per identifier.
    pub lookback: LookbackPeriod,
    /// Minimum mean forward return for a row to pass.
    pub return_threshold: f64,
    /// Maximum return standard deviation for a row to pass.
    pub volatility_threshold: f64,
    /// Worker threads in the screening pool.
    pub max_concurrency: usize,
    /// Per-identifier retrieval deadline.
    pub fetch_timeout_secs: u64,
}

impl Default for ScreenSettings {
    fn default() -> Self {
        Self {
            lookback: LookbackPeriod::Months(6),
            return_threshold: 0.05,
            volatility_threshold: 0.03,
            max_concurrency: 4,
            fetch_timeout_secs: 30,
        }
    }
}

/// Full configuration for a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub indicators: IndicatorParams,
    pub analysis: AnalyzerConfig,
    pub screen: ScreenSettings,
}

impl AppConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let spans = [
            ("indicators.short_span", self.indicators.short_span),
            ("indicators.long_span", self.indicators.long_span),
            ("indicators.signal_span", self.indicators.signal_span),
            ("indicators.trend_span", self.indicators.trend_span),
        ];
        for (field, span) in spans {
            if span == 0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be at least 1".into(),
                });
            }
        }
        if self.analysis.holding_period_weeks == 0 {
            return Err(ConfigError::Invalid {
                field: "analysis.holding_period_weeks",
                reason: "must be at least 1".into(),
            });
        }
        if !self.analysis.risk_free_rate.is_finite() {
            return Err(ConfigError::Invalid {
                field: "analysis.risk_free_rate",
                reason: format!("must be finite, got {}", self.analysis.risk_free_rate),
            });
        }
        if !self.screen.return_threshold.is_finite() {
            return Err(ConfigError::Invalid {
                field: "screen.return_threshold",
                reason: format!("must be finite, got {}", self.screen.return_threshold),
            });
        }
        if !self.screen.volatility_threshold.is_finite() || self.screen.volatility_threshold < 0.0 {
            return Err(ConfigError::Invalid {
                field: "screen.volatility_threshold",
                reason: format!(
                    "must be a finite non-negative number, got {}",
                    self.screen.volatility_threshold
                ),
            });
        }
        if self.screen.max_concurrency == 0 {
            return Err(ConfigError::Invalid {
                field: "screen.max_concurrency",
                reason: "must be at least 1".into(),
            });
        }
        if self.screen.fetch_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "screen.fetch_timeout_secs",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Deterministic hash of this configuration.
    ///
    /// Two runs with identical settings share a run id, so their reports can
    /// be compared directly.
    pub fn run_id(&self) -> Result<RunId, ConfigError> {
        let json =
            serde_json::to_string(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;
        Ok(blake3::hash(json.as_bytes()).to_hex().to_string())
    }
}
