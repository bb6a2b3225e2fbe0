//! Aggregate statistics over a set of return observations.
//!
//! Every function is pure: observations in, scalar out.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::returns::ReturnObservation;
use crate::domain::float_serde;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatsError {
    #[error("division by zero: excess returns have no dispersion ({observations} observations)")]
    DivisionByZero { observations: usize },
}

/// Mean, dispersion and risk-adjusted return for one identifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReturnStatistics {
    #[serde(with = "float_serde")]
    pub mean_return: f64,
    #[serde(with = "float_serde")]
    pub return_stddev: f64,
    #[serde(with = "float_serde")]
    pub sharpe_ratio: f64,
}

impl ReturnStatistics {
    /// Sentinel for "nothing to analyze": worst possible mean, worst possible
    /// dispersion, neutral Sharpe. Sorts last under any natural ranking.
    pub const UNUSABLE: Self = Self {
        mean_return: f64::NEG_INFINITY,
        return_stddev: f64::INFINITY,
        sharpe_ratio: 0.0,
    };

    pub fn from_observations(observations: &[ReturnObservation], risk_free_rate: f64) -> Self {
        if observations.is_empty() {
            return Self::UNUSABLE;
        }
        let returns = percent_returns(observations);
        Self {
            mean_return: mean(&returns),
            return_stddev: population_stddev(&returns),
            sharpe_ratio: sharpe_ratio(observations, risk_free_rate),
        }
    }

    pub fn is_unusable(&self) -> bool {
        self.mean_return == f64::NEG_INFINITY && self.return_stddev == f64::INFINITY
    }
}

fn percent_returns(observations: &[ReturnObservation]) -> Vec<f64> {
    observations.iter().map(|o| o.percent_return).collect()
}

/// Arithmetic mean. Returns 0.0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divides by n). Returns 0.0 for an empty slice.
pub fn population_stddev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Sample standard deviation (divides by n - 1). Returns 0.0 below two values.
pub fn sample_stddev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance =
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

/// Sharpe ratio of the observations' excess returns.
///
/// mean(r - rf) / sample_stddev(r - rf). `risk_free_rate` is applied per
/// holding period as given, without annualization.
pub fn try_sharpe_ratio(
    observations: &[ReturnObservation],
    risk_free_rate: f64,
) -> Result<f64, StatsError> {
    let excess: Vec<f64> = observations
        .iter()
        .map(|o| o.percent_return - risk_free_rate)
        .collect();
    let std = sample_stddev(&excess);
    if std < 1e-15 {
        return Err(StatsError::DivisionByZero {
            observations: observations.len(),
        });
    }
    Ok(mean(&excess) / std)
}

/// `try_sharpe_ratio` with division by zero collapsed to 0.0.
pub fn sharpe_ratio(observations: &[ReturnObservation], risk_free_rate: f64) -> f64 {
    try_sharpe_ratio(observations, risk_free_rate).unwrap_or(0.0)
}
