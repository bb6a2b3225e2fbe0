//! Indicator engine: EMA, MACD line/signal/histogram and trend average.
//!
//! Indicators are computed in one pass over a whole `PriceSeries` and returned
//! as an `IndicatorSet` aligned index-for-index with it. There is no
//! incremental update: a changed series means a full recompute.

pub mod ema;
pub mod macd;

pub use ema::{alpha, ema, EmaSmoothing};
pub use macd::{compute_indicators, IndicatorError, IndicatorParams, IndicatorSet};

/// Create a daily series from close prices for testing.
#[cfg(test)]
pub fn make_series(closes: &[f64]) -> crate::domain::PriceSeries {
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let dates: Vec<_> = (0..closes.len())
        .map(|i| base_date + chrono::Duration::days(i as i64))
        .collect();
    crate::domain::PriceSeries::from_parts("TEST", &dates, closes).unwrap()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
