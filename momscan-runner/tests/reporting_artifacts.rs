//! Export tests: report JSON/CSV, chart data and return tables.

use chrono::{NaiveDate, Utc};
use momscan_core::analysis::{analyze_returns, AnalyzerConfig, ReturnStatistics};
use momscan_core::data::{DataSource, LookbackPeriod};
use momscan_core::domain::PriceSeries;
use momscan_core::indicators::IndicatorParams;
use momscan_core::signals::analyze_signals;
use momscan_runner::export::{
    export_chart_csv, export_observations_csv, export_report_csv, export_report_json,
    import_report_json, load_report, save_report,
};
use momscan_runner::{RowStatus, ScreeningReport, ScreeningRow, SCHEMA_VERSION};

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn make_report() -> ScreeningReport {
    ScreeningReport {
        schema_version: SCHEMA_VERSION,
        run_id: "abc123".into(),
        source: DataSource::YahooFinance,
        generated_at: Utc::now(),
        holding_period_weeks: 4,
        lookback: LookbackPeriod::Months(6),
        return_threshold: 0.05,
        volatility_threshold: 0.03,
        rows: vec![
            ScreeningRow {
                identifier: "0005.HK".into(),
                statistics: ReturnStatistics::UNUSABLE,
                observation_count: 0,
                passed: false,
                status: RowStatus::DataUnavailable {
                    reason: "symbol not found: 0005.HK".into(),
                },
            },
            ScreeningRow {
                identifier: "AAPL".into(),
                statistics: ReturnStatistics {
                    mean_return: 0.061,
                    return_stddev: 0.021,
                    sharpe_ratio: 1.2,
                },
                observation_count: 98,
                passed: true,
                status: RowStatus::Ok,
            },
        ],
    }
}

#[test]
fn report_json_roundtrip_keeps_sentinels() {
    let report = make_report();
    let json = export_report_json(&report).unwrap();
    assert!(json.contains("\"-inf\""));
    assert!(json.contains("\"6mo\""));
    assert!(json.contains("\"yahoo_finance\""));

    let back = import_report_json(&json).unwrap();
    assert_eq!(back, report);
    assert!(back.rows[0].statistics.is_unusable());
}

#[test]
fn newer_schema_is_rejected() {
    let mut report = make_report();
    report.schema_version = SCHEMA_VERSION + 1;
    let json = export_report_json(&report).unwrap();
    let err = import_report_json(&json).unwrap_err();
    assert!(err.to_string().contains("unsupported schema version"));
}

#[test]
fn report_csv_has_one_row_per_identifier() {
    let csv = export_report_csv(&make_report()).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("identifier,mean_return,return_stddev,sharpe_ratio"));
    assert!(lines[1].starts_with("0005.HK,-inf,inf,0.000000,0,false,data_unavailable"));
    assert!(lines[2].starts_with("AAPL,0.061000,0.021000,1.200000,98,true,ok"));
}

#[test]
fn save_and_load_by_extension() {
    let dir = tempfile::tempdir().unwrap();
    let report = make_report();

    let json_path = dir.path().join("out").join("report.json");
    save_report(&report, &json_path).unwrap();
    assert_eq!(load_report(&json_path).unwrap(), report);

    let csv_path = dir.path().join("report.csv");
    save_report(&report, &csv_path).unwrap();
    let content = std::fs::read_to_string(&csv_path).unwrap();
    assert!(content.starts_with("identifier,"));
    assert!(load_report(&csv_path).is_err());
}

#[test]
fn chart_csv_marks_fired_sessions() {
    let closes: Vec<f64> = (0..300)
        .map(|t| 100.0 + 8.0 * (2.0 * std::f64::consts::PI * t as f64 / 40.0).sin())
        .collect();
    let start = d("2023-01-02");
    let dates: Vec<_> = (0..closes.len())
        .map(|i| start + chrono::Duration::days(i as i64))
        .collect();
    let series = PriceSeries::from_parts("OSC", &dates, &closes).unwrap();
    let analysis = analyze_signals(series, &IndicatorParams::default()).unwrap();

    let csv = export_chart_csv(&analysis).unwrap();
    let mut reader = csv::Reader::from_reader(csv.as_bytes());
    let headers = reader.headers().unwrap().clone();
    assert_eq!(headers.len(), 10);
    assert_eq!(&headers[8], "buy");
    assert_eq!(&headers[9], "sell");

    let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 300);
    let buys = records.iter().filter(|r| !r[8].is_empty()).count();
    let sells = records.iter().filter(|r| !r[9].is_empty()).count();
    assert_eq!(buys, analysis.buys().count());
    assert_eq!(sells, analysis.sells().count());
    assert!(buys > 0);
}

#[test]
fn observations_csv_lists_each_buy_date() {
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

    let csv = export_observations_csv(&analysis).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "buy_date,buy_price,sell_date,sell_price,percent_return");
    assert_eq!(lines[1], "2024-01-01,100.000000,2024-01-08,106.000000,0.060000");
    assert_eq!(lines.len(), 3);
}
