//! Export: screening reports, chart data and return tables.
//!
//! Provides:
//! - **JSON**: full round-trip of a `ScreeningReport` with schema versioning
//! - **CSV**: report rows, per-session chart data (prices, indicators, markers)
//!   and the per-buy-date return table
//!
//! Non-finite values are written as `inf`, `-inf` and `nan` in both formats.
//! Reports with a newer `schema_version` are rejected on load.

use std::path::Path;

use anyhow::{bail, Context, Result};

use momscan_core::analysis::ReturnAnalysis;
use momscan_core::domain::SignalKind;
use momscan_core::signals::SignalAnalysis;

use crate::report::{RowStatus, ScreeningReport, SCHEMA_VERSION};

// ─── JSON ───────────────────────────────────────────────────────────

pub fn export_report_json(report: &ScreeningReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize ScreeningReport to JSON")
}

/// Deserialize a report, rejecting unknown schema versions.
pub fn import_report_json(json: &str) -> Result<ScreeningReport> {
    let report: ScreeningReport =
        serde_json::from_str(json).context("failed to deserialize ScreeningReport from JSON")?;
    if report.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            report.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(report)
}

// ─── CSV ────────────────────────────────────────────────────────────

fn format_float(value: f64) -> String {
    if value.is_nan() {
        "nan".into()
    } else if value == f64::INFINITY {
        "inf".into()
    } else if value == f64::NEG_INFINITY {
        "-inf".into()
    } else {
        format!("{value:.6}")
    }
}

fn status_label(status: &RowStatus) -> (&'static str, &str) {
    match status {
        RowStatus::Ok => ("ok", ""),
        RowStatus::NoObservations => ("no_observations", ""),
        RowStatus::DataUnavailable { reason } => ("data_unavailable", reason.as_str()),
    }
}

fn into_string(wtr: csv::Writer<Vec<u8>>) -> Result<String> {
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Report rows in report order.
///
/// Columns: identifier, mean_return, return_stddev, sharpe_ratio,
/// observation_count, passed, status, reason
pub fn export_report_csv(report: &ScreeningReport) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "identifier",
        "mean_return",
        "return_stddev",
        "sharpe_ratio",
        "observation_count",
        "passed",
        "status",
        "reason",
    ])?;

    for row in &report.rows {
        let (status, reason) = status_label(&row.status);
        wtr.write_record([
            row.identifier.clone(),
            format_float(row.statistics.mean_return),
            format_float(row.statistics.return_stddev),
            format_float(row.statistics.sharpe_ratio),
            row.observation_count.to_string(),
            row.passed.to_string(),
            status.to_string(),
            reason.to_string(),
        ])?;
    }

    into_string(wtr)
}

/// Per-session chart data: the rendering sink's input.
///
/// Columns: date, close, short_ema, long_ema, macd_line, macd_signal,
/// histogram, trend_average, buy, sell. `buy`/`sell` hold the session price
/// when that marker fired and are empty otherwise.
pub fn export_chart_csv(analysis: &SignalAnalysis) -> Result<String> {
    let ind = &analysis.indicators;
    let points = analysis.series.points();
    if ind.len() != points.len() || analysis.markers.len() != points.len() {
        bail!(
            "chart inputs disagree in length: {} prices, {} indicator rows, {} markers",
            points.len(),
            ind.len(),
            analysis.markers.len()
        );
    }

    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "date",
        "close",
        "short_ema",
        "long_ema",
        "macd_line",
        "macd_signal",
        "histogram",
        "trend_average",
        "buy",
        "sell",
    ])?;

    for (i, (point, marker)) in points.iter().zip(&analysis.markers).enumerate() {
        let (buy, sell) = match marker.kind {
            Some(SignalKind::Buy) => (format_float(marker.price), String::new()),
            Some(SignalKind::Sell) => (String::new(), format_float(marker.price)),
            None => (String::new(), String::new()),
        };
        wtr.write_record([
            point.date.to_string(),
            format_float(point.close),
            format_float(ind.short_ema[i]),
            format_float(ind.long_ema[i]),
            format_float(ind.macd_line[i]),
            format_float(ind.macd_signal[i]),
            format_float(ind.histogram[i]),
            format_float(ind.trend_average[i]),
            buy,
            sell,
        ])?;
    }

    into_string(wtr)
}

/// The return table behind a return-rate plot, one row per buy date.
///
/// Columns: buy_date, buy_price, sell_date, sell_price, percent_return
pub fn export_observations_csv(analysis: &ReturnAnalysis) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "buy_date",
        "buy_price",
        "sell_date",
        "sell_price",
        "percent_return",
    ])?;
    for obs in &analysis.observations {
        wtr.write_record([
            obs.buy_date.to_string(),
            format_float(obs.buy_price),
            obs.sell_date.to_string(),
            format_float(obs.sell_price),
            format_float(obs.percent_return),
        ])?;
    }
    into_string(wtr)
}

// ─── Files ──────────────────────────────────────────────────────────

/// Write a report as JSON (`.json`) or CSV (anything else).
pub fn save_report(report: &ScreeningReport, path: &Path) -> Result<()> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let content = if is_json {
        export_report_json(report)?
    } else {
        export_report_csv(report)?
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}

/// Load a JSON report written by `save_report`.
pub fn load_report(path: &Path) -> Result<ScreeningReport> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    import_report_json(&json)
}

pub fn write_text(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}
