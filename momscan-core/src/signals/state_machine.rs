//! MACD crossover state machine with a trend-average filter.
//!
//! Buy-eligible:  macd > signal && price > trend && macd <= 0
//! Sell-eligible: macd < signal && price < trend && macd >= 0
//!
//! A Buy fires when eligible and the state is not `Long`; a Sell fires when
//! eligible and the state is `Long`. The state starts `Unset`, and a
//! sell-eligible bar while `Unset` fires nothing and leaves it `Unset`, so no
//! Sell can precede the first Buy.

use thiserror::Error;

use crate::domain::{PositionState, PriceSeries, SignalKind, SignalMarker};
use crate::indicators::{IndicatorError, IndicatorSet};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignalError {
    #[error(transparent)]
    Indicator(#[from] IndicatorError),

    #[error("indicator set has {indicators} entries but price series has {prices}")]
    LengthMismatch { prices: usize, indicators: usize },
}

/// Indicator readings for a single session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarReading {
    pub price: f64,
    pub macd_line: f64,
    pub macd_signal: f64,
    pub trend_average: f64,
}

impl BarReading {
    pub fn buy_eligible(&self) -> bool {
        self.macd_line > self.macd_signal
            && self.price > self.trend_average
            && self.macd_line <= 0.0
    }

    pub fn sell_eligible(&self) -> bool {
        self.macd_line < self.macd_signal
            && self.price < self.trend_average
            && self.macd_line >= 0.0
    }
}

/// Tracks at most one open position across a series.
#[derive(Debug, Clone, Default)]
pub struct SignalStateMachine {
    state: PositionState,
}

impl SignalStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PositionState {
        self.state
    }

    /// Evaluate one session and return the marker kind that fires, if any.
    pub fn step(&mut self, reading: &BarReading) -> Option<SignalKind> {
        if reading.buy_eligible() {
            if self.state != PositionState::Long {
                self.state = PositionState::Long;
                return Some(SignalKind::Buy);
            }
            return None;
        }

        if reading.sell_eligible() {
            match self.state {
                PositionState::Long => {
                    self.state = PositionState::Flat;
                    return Some(SignalKind::Sell);
                }
                PositionState::Unset | PositionState::Flat => return None,
            }
        }

        None
    }
}

/// Run the state machine over a series, one marker per session.
pub fn derive_signals(
    series: &PriceSeries,
    indicators: &IndicatorSet,
) -> Result<Vec<SignalMarker>, SignalError> {
    if series.len() != indicators.len() {
        return Err(SignalError::LengthMismatch {
            prices: series.len(),
            indicators: indicators.len(),
        });
    }

    let mut machine = SignalStateMachine::new();
    let markers = series
        .points()
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let reading = BarReading {
                price: point.close,
                macd_line: indicators.macd_line[i],
                macd_signal: indicators.macd_signal[i],
                trend_average: indicators.trend_average[i],
            };
            SignalMarker {
                date: point.date,
                price: point.close,
                kind: machine.step(&reading),
            }
        })
        .collect();

    Ok(markers)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buy_bar() -> BarReading {
        BarReading {
            price: 105.0,
            macd_line: -0.5,
            macd_signal: -1.0,
            trend_average: 100.0,
        }
    }

    fn sell_bar() -> BarReading {
        BarReading {
            price: 95.0,
            macd_line: 0.5,
            macd_signal: 1.0,
            trend_average: 100.0,
        }
    }

    fn neutral_bar() -> BarReading {
        BarReading {
            price: 100.0,
            macd_line: 1.0,
            macd_signal: 0.0,
            trend_average: 90.0,
        }
    }

    #[test]
    fn conditions_are_mutually_exclusive() {
        assert!(buy_bar().buy_eligible() && !buy_bar().sell_eligible());
        assert!(sell_bar().sell_eligible() && !sell_bar().buy_eligible());
        assert!(!neutral_bar().buy_eligible() && !neutral_bar().sell_eligible());
    }

    #[test]
    fn buy_allows_macd_exactly_zero() {
        let bar = BarReading {
            macd_line: 0.0,
            ..buy_bar()
        };
        assert!(bar.buy_eligible());
    }

    #[test]
    fn first_sell_is_suppressed_while_unset() {
        let mut m = SignalStateMachine::new();
        assert_eq!(m.step(&sell_bar()), None);
        assert_eq!(m.state(), PositionState::Unset);
        assert_eq!(m.step(&sell_bar()), None);
        assert_eq!(m.state(), PositionState::Unset);
    }

    #[test]
    fn repeated_buys_are_suppressed() {
        let mut m = SignalStateMachine::new();
        assert_eq!(m.step(&buy_bar()), Some(SignalKind::Buy));
        assert_eq!(m.step(&buy_bar()), None);
        assert_eq!(m.state(), PositionState::Long);
    }

    #[test]
    fn buy_then_sell_then_buy_alternates() {
        let mut m = SignalStateMachine::new();
        assert_eq!(m.step(&buy_bar()), Some(SignalKind::Buy));
        assert_eq!(m.step(&neutral_bar()), None);
        assert_eq!(m.step(&sell_bar()), Some(SignalKind::Sell));
        assert_eq!(m.state(), PositionState::Flat);
        assert_eq!(m.step(&sell_bar()), None);
        assert_eq!(m.step(&buy_bar()), Some(SignalKind::Buy));
    }

    #[test]
    fn neutral_bar_leaves_state_unchanged() {
        let mut m = SignalStateMachine::new();
        m.step(&buy_bar());
        assert_eq!(m.step(&neutral_bar()), None);
        assert_eq!(m.state(), PositionState::Long);
    }
}
