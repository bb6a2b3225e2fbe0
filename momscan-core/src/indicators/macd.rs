//! MACD and trend average over a price series.
//!
//! macd_line   = EMA(close, short) - EMA(close, long)
//! macd_signal = EMA(macd_line, signal)
//! histogram   = macd_line - macd_signal
//! trend       = EMA(close, trend)

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ema::{ema, EmaSmoothing};
use crate::domain::PriceSeries;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IndicatorError {
    #[error("insufficient data: price series for '{identifier}' is empty")]
    InsufficientData { identifier: String },
}

/// Spans and smoothing for the indicator engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorParams {
    pub short_span: usize,
    pub long_span: usize,
    pub signal_span: usize,
    pub trend_span: usize,
    pub smoothing: EmaSmoothing,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            short_span: 12,
            long_span: 26,
            signal_span: 9,
            trend_span: 200,
            smoothing: EmaSmoothing::Recursive,
        }
    }
}

/// Indicator series aligned index-for-index with the source `PriceSeries`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub short_ema: Vec<f64>,
    pub long_ema: Vec<f64>,
    pub macd_line: Vec<f64>,
    pub macd_signal: Vec<f64>,
    pub histogram: Vec<f64>,
    pub trend_average: Vec<f64>,
}

impl IndicatorSet {
    pub fn len(&self) -> usize {
        self.macd_line.len()
    }

    pub fn is_empty(&self) -> bool {
        self.macd_line.is_empty()
    }
}

/// Compute the full indicator set. Always recomputes from scratch.
pub fn compute_indicators(
    series: &PriceSeries,
    params: &IndicatorParams,
) -> Result<IndicatorSet, IndicatorError> {
    if series.is_empty() {
        return Err(IndicatorError::InsufficientData {
            identifier: series.identifier().to_string(),
        });
    }

    let closes = series.closes();
    let smoothing = params.smoothing;

    let short_ema = ema(&closes, params.short_span, smoothing);
    let long_ema = ema(&closes, params.long_span, smoothing);
    let macd_line: Vec<f64> = short_ema
        .iter()
        .zip(&long_ema)
        .map(|(s, l)| s - l)
        .collect();
    let macd_signal = ema(&macd_line, params.signal_span, smoothing);
    let histogram: Vec<f64> = macd_line
        .iter()
        .zip(&macd_signal)
        .map(|(m, s)| m - s)
        .collect();
    let trend_average = ema(&closes, params.trend_span, smoothing);

    Ok(IndicatorSet {
        short_ema,
        long_ema,
        macd_line,
        macd_signal,
        histogram,
        trend_average,
    })
}
