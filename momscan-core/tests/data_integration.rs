//! Integration tests: CSV source → forward-return analysis.
//!
//! Tests:
//! 1. A CSV directory series flows through `analyze_fetch` to known statistics.
//! 2. Too-short history yields zero observations and the unusable sentinel.
//! 3. A missing identifier collapses to the same sentinel, never an error.
//! 4. Weekend exits are skipped rather than snapped to the nearest session.
//! 5. Statistics serialize with non-finite sentinels intact.

use chrono::NaiveDate;
use momscan_core::analysis::{analyze_fetch, analyze_returns, AnalyzerConfig, ReturnStatistics};
use momscan_core::data::{CsvSource, DataError, LookbackPeriod, PriceSource};
use momscan_core::domain::PriceSeries;

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn weekly_config() -> AnalyzerConfig {
    AnalyzerConfig {
        holding_period_weeks: 1,
        risk_free_rate: 0.0,
    }
}

#[test]
fn csv_series_to_statistics() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("B.csv"),
        "Date,Close\n2024-01-01,100\n2024-01-08,106\n2024-01-15,116.6\n",
    )
    .unwrap();

    let source = CsvSource::new(dir.path());
    let outcome = analyze_fetch(source.fetch("B", &LookbackPeriod::Max), &weekly_config());

    assert_eq!(outcome.observation_count(), 2);
    let stats = outcome.statistics();
    assert!((stats.mean_return - 0.08).abs() < 1e-9);
    assert!((stats.return_stddev - 0.02).abs() < 1e-9);
    // Sample stddev of [0.06, 0.10] is 0.02·√2
    let expected_sharpe = 0.08 / (0.02 * 2f64.sqrt());
    assert!((stats.sharpe_ratio - expected_sharpe).abs() < 1e-9);
}

#[test]
fn short_history_yields_unusable_sentinel() {
    // Three daily sessions, four-week holding period: no exit ever exists.
    let series = PriceSeries::from_parts(
        "SHORT",
        &[d("2024-01-02"), d("2024-01-03"), d("2024-01-04")],
        &[10.0, 10.5, 11.0],
    )
    .unwrap();

    let analysis = analyze_returns(&series, &AnalyzerConfig::default());

    assert_eq!(analysis.observation_count(), 0);
    assert_eq!(analysis.statistics.mean_return, f64::NEG_INFINITY);
    assert_eq!(analysis.statistics.return_stddev, f64::INFINITY);
    assert_eq!(analysis.statistics.sharpe_ratio, 0.0);
}

#[test]
fn missing_identifier_collapses_to_sentinel() {
    let dir = tempfile::tempdir().unwrap();
    let source = CsvSource::new(dir.path());

    let fetched = source.fetch("A", &LookbackPeriod::Max);
    assert!(matches!(fetched, Err(DataError::SymbolNotFound { .. })));

    let outcome = analyze_fetch(fetched, &weekly_config());
    assert_eq!(outcome.statistics(), ReturnStatistics::UNUSABLE);
    assert_eq!(outcome.observation_count(), 0);
}

#[test]
fn weekend_exits_are_skipped() {
    // Fri 2024-01-05 + 1 week = Fri 2024-01-12 (present).
    // Mon 2024-01-08 + 1 week = Mon 2024-01-15 (absent; Tue 01-16 present but not used).
    let series = PriceSeries::from_parts(
        "W",
        &[d("2024-01-05"), d("2024-01-08"), d("2024-01-12"), d("2024-01-16")],
        &[100.0, 101.0, 110.0, 120.0],
    )
    .unwrap();

    let analysis = analyze_returns(&series, &weekly_config());

    assert_eq!(analysis.observation_count(), 1);
    let obs = analysis.observations[0];
    assert_eq!(obs.buy_date, d("2024-01-05"));
    assert_eq!(obs.sell_date, d("2024-01-12"));
    assert!((obs.percent_return - 0.10).abs() < 1e-12);
}

#[test]
fn single_observation_has_zero_sharpe() {
    let series = PriceSeries::from_parts("ONE", &[d("2024-01-01"), d("2024-01-08")], &[100.0, 105.0])
        .unwrap();
    let stats = analyze_returns(&series, &weekly_config()).statistics;
    assert!((stats.mean_return - 0.05).abs() < 1e-12);
    assert_eq!(stats.return_stddev, 0.0);
    assert_eq!(stats.sharpe_ratio, 0.0);
}

#[test]
fn unusable_statistics_serialize_as_strings() {
    let json = serde_json::to_string(&ReturnStatistics::UNUSABLE).unwrap();
    assert!(json.contains("\"-inf\""), "{json}");
    assert!(json.contains("\"inf\""), "{json}");

    let back: ReturnStatistics = serde_json::from_str(&json).unwrap();
    assert!(back.is_unusable());
}
