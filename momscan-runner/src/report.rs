//! Screening report: one row per identifier, in input order.
//!
//! Rows keep the order the identifiers were given in. Ordering by a metric is
//! a view (`ranked`), not a property of the report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use momscan_core::analysis::ReturnStatistics;
use momscan_core::data::{DataSource, LookbackPeriod};

use crate::config::RunId;

/// Bumped on any breaking change to the report layout.
pub const SCHEMA_VERSION: u32 = 1;

/// Why a row has (or lacks) statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowStatus {
    Ok,
    /// Data was retrieved but no buy date had a matching exit session.
    NoObservations,
    /// Retrieval failed; `reason` is the data error's message.
    DataUnavailable { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningRow {
    pub identifier: String,
    pub statistics: ReturnStatistics,
    pub observation_count: usize,
    pub passed: bool,
    pub status: RowStatus,
}

/// Which statistic to order rows by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RankingMetric {
    /// Highest mean return first.
    #[default]
    MeanReturn,
    /// Lowest return stddev first.
    Volatility,
    /// Highest Sharpe ratio first.
    Sharpe,
}

impl RankingMetric {
    pub fn label(&self) -> &'static str {
        match self {
            Self::MeanReturn => "mean-return",
            Self::Volatility => "volatility",
            Self::Sharpe => "sharpe",
        }
    }

    /// Sort key where larger is better. Unusable rows map to -inf.
    fn score(&self, row: &ScreeningRow) -> f64 {
        if row.statistics.is_unusable() {
            return f64::NEG_INFINITY;
        }
        let stats = &row.statistics;
        let raw = match self {
            Self::MeanReturn => stats.mean_return,
            Self::Volatility => -stats.return_stddev,
            Self::Sharpe => stats.sharpe_ratio,
        };
        if raw.is_nan() {
            f64::NEG_INFINITY
        } else {
            raw
        }
    }
}

impl std::str::FromStr for RankingMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "mean-return" | "mean" | "return" => Ok(Self::MeanReturn),
            "volatility" | "std" | "stddev" => Ok(Self::Volatility),
            "sharpe" | "sharpe-ratio" => Ok(Self::Sharpe),
            other => Err(format!(
                "unknown ranking metric '{other}' (expected mean-return, volatility or sharpe)"
            )),
        }
    }
}

/// Result of screening a universe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningReport {
    pub schema_version: u32,
    pub run_id: RunId,
    /// Provenance of every series in the report.
    pub source: DataSource,
    pub generated_at: DateTime<Utc>,
    pub holding_period_weeks: u32,
    pub lookback: LookbackPeriod,
    pub return_threshold: f64,
    pub volatility_threshold: f64,
    pub rows: Vec<ScreeningRow>,
}

impl ScreeningReport {
    pub fn row(&self, identifier: &str) -> Option<&ScreeningRow> {
        self.rows.iter().find(|r| r.identifier == identifier)
    }

    pub fn passing(&self) -> impl Iterator<Item = &ScreeningRow> {
        self.rows.iter().filter(|r| r.passed)
    }

    pub fn pass_count(&self) -> usize {
        self.passing().count()
    }

    pub fn unavailable_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| matches!(r.status, RowStatus::DataUnavailable { .. }))
            .count()
    }

    /// Rows ordered best-first by `metric`. Ties keep input order; rows with
    /// sentinel statistics always come last.
    pub fn ranked(&self, metric: RankingMetric) -> Vec<&ScreeningRow> {
        let mut rows: Vec<&ScreeningRow> = self.rows.iter().collect();
        rows.sort_by(|a, b| metric.score(b).total_cmp(&metric.score(a)));
        rows
    }
}
