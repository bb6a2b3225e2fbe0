//! Signal derivation: indicators → per-session Buy/Sell markers.

pub mod state_machine;

pub use state_machine::{derive_signals, BarReading, SignalError, SignalStateMachine};

use crate::domain::{PriceSeries, SignalMarker};
use crate::indicators::{compute_indicators, IndicatorParams, IndicatorSet};

/// Everything a chart needs for one identifier: prices, indicators and markers.
#[derive(Debug, Clone)]
pub struct SignalAnalysis {
    pub series: PriceSeries,
    pub indicators: IndicatorSet,
    pub markers: Vec<SignalMarker>,
}

impl SignalAnalysis {
    pub fn buys(&self) -> impl Iterator<Item = &SignalMarker> {
        self.markers.iter().filter(|m| m.is_buy())
    }

    pub fn sells(&self) -> impl Iterator<Item = &SignalMarker> {
        self.markers.iter().filter(|m| m.is_sell())
    }

    /// Markers that actually fired, in date order.
    pub fn fired(&self) -> impl Iterator<Item = &SignalMarker> {
        self.markers.iter().filter(|m| m.kind.is_some())
    }
}

/// Compute indicators for `series` and derive its markers.
pub fn analyze_signals(
    series: PriceSeries,
    params: &IndicatorParams,
) -> Result<SignalAnalysis, SignalError> {
    let indicators = compute_indicators(&series, params)?;
    let markers = derive_signals(&series, &indicators)?;
    Ok(SignalAnalysis {
        series,
        indicators,
        markers,
    })
}
