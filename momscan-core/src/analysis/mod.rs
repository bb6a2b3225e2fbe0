//! Return/risk analysis for a fixed holding period.
//!
//! `analyze_returns` is pure over a `PriceSeries`. `analyze_fetch` additionally
//! folds a retrieval failure into the same unusable statistics an empty
//! observation set produces, so callers never see a fault from this layer.

pub mod returns;
pub mod stats;

pub use returns::{exit_date, forward_returns, ReturnObservation};
pub use stats::{
    mean, population_stddev, sample_stddev, sharpe_ratio, try_sharpe_ratio, ReturnStatistics,
    StatsError,
};

use serde::{Deserialize, Serialize};

use crate::data::DataError;
use crate::domain::PriceSeries;

/// Holding period and risk-free rate for the analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Calendar weeks between buy and sell.
    pub holding_period_weeks: u32,
    /// Flat per-holding-period rate subtracted before the Sharpe ratio.
    pub risk_free_rate: f64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            holding_period_weeks: 4,
            risk_free_rate: 0.035,
        }
    }
}

/// Observations plus their aggregate statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnAnalysis {
    pub observations: Vec<ReturnObservation>,
    pub statistics: ReturnStatistics,
}

impl ReturnAnalysis {
    pub fn observation_count(&self) -> usize {
        self.observations.len()
    }
}

/// Forward returns and statistics for one series.
pub fn analyze_returns(series: &PriceSeries, config: &AnalyzerConfig) -> ReturnAnalysis {
    let observations = forward_returns(series, config.holding_period_weeks);
    let statistics = ReturnStatistics::from_observations(&observations, config.risk_free_rate);
    ReturnAnalysis {
        observations,
        statistics,
    }
}

/// Result of analyzing whatever the data source returned.
#[derive(Debug)]
pub enum AnalysisOutcome {
    Analyzed(ReturnAnalysis),
    DataUnavailable(DataError),
}

impl AnalysisOutcome {
    /// Statistics for the outcome; retrieval failure yields the unusable sentinel.
    pub fn statistics(&self) -> ReturnStatistics {
        match self {
            Self::Analyzed(analysis) => analysis.statistics,
            Self::DataUnavailable(_) => ReturnStatistics::UNUSABLE,
        }
    }

    pub fn observation_count(&self) -> usize {
        match self {
            Self::Analyzed(analysis) => analysis.observation_count(),
            Self::DataUnavailable(_) => 0,
        }
    }
}

/// Analyze a fetch result, never propagating the retrieval error.
pub fn analyze_fetch(
    fetched: Result<PriceSeries, DataError>,
    config: &AnalyzerConfig,
) -> AnalysisOutcome {
    match fetched {
        Ok(series) => AnalysisOutcome::Analyzed(analyze_returns(&series, config)),
        Err(e) => AnalysisOutcome::DataUnavailable(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn retrieval_failure_matches_empty_result() {
        let failed = analyze_fetch(
            Err(DataError::SymbolNotFound {
                symbol: "NOPE".into(),
            }),
            &AnalyzerConfig::default(),
        );
        let empty = analyze_fetch(
            Ok(PriceSeries::new("EMPTY", vec![]).unwrap()),
            &AnalyzerConfig::default(),
        );
        assert!(failed.statistics().is_unusable());
        assert!(empty.statistics().is_unusable());
        assert_eq!(failed.statistics(), empty.statistics());
        assert_eq!(failed.observation_count(), 0);
    }

    #[test]
    fn analyze_returns_uses_holding_period() {
        let d = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
        let series = PriceSeries::from_parts(
            "B",
            &[d("2024-01-01"), d("2024-01-08"), d("2024-01-15")],
            &[100.0, 106.0, 116.6],
        )
        .unwrap();
        let analysis = analyze_returns(
            &series,
            &AnalyzerConfig {
                holding_period_weeks: 1,
                risk_free_rate: 0.0,
            },
        );
        assert_eq!(analysis.observation_count(), 2);
        assert!((analysis.statistics.mean_return - 0.08).abs() < 1e-9);
        assert!((analysis.statistics.return_stddev - 0.02).abs() < 1e-9);
    }
}
