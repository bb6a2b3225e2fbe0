//! Integration tests for the indicator → signal pipeline.
//!
//! Tests:
//! 1. Rise-then-fall path: one Buy on the way up, one Sell on the way down.
//! 2. Oscillating path: markers strictly alternate starting with a Buy.
//! 3. First-sell suppression: a sell-eligible session before any Buy fires nothing.
//! 4. Look-ahead: a truncated series produces the same markers on the overlap.
//! 5. Empty series is rejected as insufficient data.

use chrono::NaiveDate;
use momscan_core::domain::{PositionState, PriceSeries, SignalKind};
use momscan_core::indicators::{IndicatorError, IndicatorParams};
use momscan_core::signals::{analyze_signals, BarReading, SignalError, SignalStateMachine};

// ──────────────────────────────────────────────
// Helpers
// ──────────────────────────────────────────────

fn daily_series(id: &str, closes: &[f64]) -> PriceSeries {
    let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
    let dates: Vec<_> = (0..closes.len())
        .map(|i| start + chrono::Duration::days(i as i64))
        .collect();
    PriceSeries::from_parts(id, &dates, closes).unwrap()
}

/// Linear rise for 200 sessions then linear fall, with a 40-session wave on top.
fn rise_then_fall(n: usize) -> Vec<f64> {
    (0..n)
        .map(|t| {
            let t = t as f64;
            let base = if t < 200.0 {
                100.0 + 0.2 * t
            } else {
                100.0 + 0.2 * 200.0 - 0.2 * (t - 200.0)
            };
            base + 8.0 * (2.0 * std::f64::consts::PI * t / 40.0).sin()
        })
        .collect()
}

fn oscillating(n: usize) -> Vec<f64> {
    (0..n)
        .map(|t| 100.0 + 8.0 * (2.0 * std::f64::consts::PI * t as f64 / 40.0).sin())
        .collect()
}

fn fired_kinds(closes: &[f64]) -> Vec<(usize, SignalKind)> {
    let analysis = analyze_signals(daily_series("SCN", closes), &IndicatorParams::default()).unwrap();
    analysis
        .markers
        .iter()
        .enumerate()
        .filter_map(|(i, m)| m.kind.map(|k| (i, k)))
        .collect()
}

// ──────────────────────────────────────────────
// Scenarios
// ──────────────────────────────────────────────

#[test]
fn rise_then_fall_buys_before_peak_and_sells_after() {
    let closes = rise_then_fall(400);
    let fired = fired_kinds(&closes);

    let buys: Vec<_> = fired.iter().filter(|(_, k)| *k == SignalKind::Buy).collect();
    let sells: Vec<_> = fired.iter().filter(|(_, k)| *k == SignalKind::Sell).collect();

    assert_eq!(buys.len(), 1, "fired: {fired:?}");
    assert_eq!(sells.len(), 1, "fired: {fired:?}");
    assert!(buys[0].0 < 200, "buy should fire during the rise: {fired:?}");
    assert!(sells[0].0 > 200, "sell should fire during the fall: {fired:?}");
}

#[test]
fn markers_carry_session_date_and_price() {
    let closes = rise_then_fall(400);
    let series = daily_series("SCN", &closes);
    let analysis = analyze_signals(series.clone(), &IndicatorParams::default()).unwrap();

    assert_eq!(analysis.markers.len(), series.len());
    for (marker, point) in analysis.markers.iter().zip(series.points()) {
        assert_eq!(marker.date, point.date);
        assert_eq!(marker.price, point.close);
    }
    let buy = analysis.buys().next().unwrap();
    assert!(buy.is_buy());
}

#[test]
fn oscillation_alternates_starting_with_buy() {
    let fired = fired_kinds(&oscillating(300));
    assert!(fired.len() >= 4, "expected several cycles, got {fired:?}");
    assert_eq!(fired[0].1, SignalKind::Buy);
    for pair in fired.windows(2) {
        assert_ne!(pair[0].1, pair[1].1, "consecutive markers repeat: {fired:?}");
    }
}

/// A sell-eligible session while no position has ever been opened fires
/// nothing, and the state stays `Unset` rather than moving to `Flat`.
#[test]
fn first_sell_is_suppressed_until_a_buy() {
    let sell = BarReading {
        price: 95.0,
        macd_line: 0.5,
        macd_signal: 1.0,
        trend_average: 100.0,
    };
    let buy = BarReading {
        price: 105.0,
        macd_line: -0.5,
        macd_signal: -1.0,
        trend_average: 100.0,
    };

    let mut machine = SignalStateMachine::new();
    assert_eq!(machine.step(&sell), None);
    assert_eq!(machine.state(), PositionState::Unset);
    assert_eq!(machine.step(&sell), None);

    assert_eq!(machine.step(&buy), Some(SignalKind::Buy));
    assert_eq!(machine.step(&buy), None);
    assert_eq!(machine.state(), PositionState::Long);

    assert_eq!(machine.step(&sell), Some(SignalKind::Sell));
    assert_eq!(machine.state(), PositionState::Flat);
    assert_eq!(machine.step(&sell), None);
}

#[test]
fn truncated_series_matches_full_series_on_overlap() {
    let closes = rise_then_fall(400);
    let params = IndicatorParams::default();
    let full = analyze_signals(daily_series("SCN", &closes), &params).unwrap();

    for cut in [50, 150, 250, 320] {
        let partial = analyze_signals(daily_series("SCN", &closes[..cut]), &params).unwrap();
        assert_eq!(
            partial.markers[..],
            full.markers[..cut],
            "markers diverge when truncated at {cut}"
        );
    }
}

#[test]
fn empty_series_is_insufficient_data() {
    let err = analyze_signals(daily_series("NONE", &[]), &IndicatorParams::default()).unwrap_err();
    assert_eq!(
        err,
        SignalError::Indicator(IndicatorError::InsufficientData {
            identifier: "NONE".into()
        })
    );
}
