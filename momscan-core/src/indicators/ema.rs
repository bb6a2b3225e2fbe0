//! Exponential Moving Average (EMA).
//!
//! Recursive (default): EMA[0] = x[0]; EMA[t] = alpha * x[t] + (1 - alpha) * EMA[t-1]
//! Adjusted: EMA[t] = sum_k (1 - alpha)^k * x[t-k] / sum_k (1 - alpha)^k, k = 0..=t
//! alpha = 2 / (span + 1).
//!
//! The two forms agree at t = 0 and converge as t grows, but differ in the
//! first few spans. Signals are defined against the recursive form.

use serde::{Deserialize, Serialize};

/// Which EMA formula to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmaSmoothing {
    /// Seeded with the first value, no renormalization.
    #[default]
    Recursive,
    /// Normalized by the cumulative weight of the available history.
    Adjusted,
}

/// Smoothing factor for a span.
pub fn alpha(span: usize) -> f64 {
    2.0 / (span as f64 + 1.0)
}

/// EMA of `values` with the given span and smoothing. Output length equals input length.
///
/// Spans longer than the input are fine: the average simply uses all history
/// available at each index.
pub fn ema(values: &[f64], span: usize, smoothing: EmaSmoothing) -> Vec<f64> {
    match smoothing {
        EmaSmoothing::Recursive => ema_recursive(values, span),
        EmaSmoothing::Adjusted => ema_adjusted(values, span),
    }
}

fn ema_recursive(values: &[f64], span: usize) -> Vec<f64> {
    let mut result = Vec::with_capacity(values.len());
    let Some(&first) = values.first() else {
        return result;
    };

    let a = alpha(span);
    let mut prev = first;
    result.push(prev);
    for &v in &values[1..] {
        prev = a * v + (1.0 - a) * prev;
        result.push(prev);
    }
    result
}

fn ema_adjusted(values: &[f64], span: usize) -> Vec<f64> {
    let decay = 1.0 - alpha(span);
    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;
    values
        .iter()
        .map(|&v| {
            weighted_sum = v + decay * weighted_sum;
            weight_total = 1.0 + decay * weight_total;
            weighted_sum / weight_total
        })
        .collect()
}
