//! CSV directory price source for offline runs.
//!
//! Layout: `{dir}/{IDENTIFIER}.csv` with a header row. The date column is
//! `date`; the price column is `adj close` (or `adj_close`/`adjclose`) when
//! present, else `close`. Header matching is case-insensitive, so Yahoo's
//! own CSV downloads load unchanged. Rows with an empty or `null` price are
//! skipped.
//!
//! The lookback period is applied relative to the last date in the file, not
//! to today, so a fixed file always yields the same series.
//!
//! Identifiers must name a file directly inside the directory: empty
//! identifiers and ones containing a path separator or drive prefix are
//! rejected before touching the filesystem.

use std::path::PathBuf;

use chrono::NaiveDate;

use super::period::LookbackPeriod;
use super::provider::{DataError, DataSource, PriceSource};
use crate::domain::{PricePoint, PriceSeries};

pub struct CsvSource {
    dir: PathBuf,
}

impl CsvSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, identifier: &str) -> Result<PathBuf, DataError> {
        if identifier.is_empty() || identifier.contains(['/', '\\', ':']) {
            return Err(DataError::Other(format!(
                "invalid identifier '{identifier}' for a CSV directory"
            )));
        }
        Ok(self.dir.join(format!("{identifier}.csv")))
    }

    /// Parse CSV text into a full (un-trimmed) series.
    pub fn parse(identifier: &str, content: &str) -> Result<PriceSeries, DataError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| DataError::Parse(format!("{identifier}: {e}")))?
            .clone();
        let date_col = column(&headers, &["date", "datetime", "timestamp"])
            .ok_or_else(|| DataError::Parse(format!("{identifier}: no date column")))?;
        let close_col = column(&headers, &["adj close", "adj_close", "adjclose"])
            .or_else(|| column(&headers, &["close"]))
            .ok_or_else(|| DataError::Parse(format!("{identifier}: no close column")))?;

        let mut points = Vec::new();
        for (row, record) in reader.records().enumerate() {
            let record = record.map_err(|e| DataError::Parse(format!("{identifier}: {e}")))?;
            let raw_close = record.get(close_col).unwrap_or("");
            if raw_close.is_empty() || raw_close.eq_ignore_ascii_case("null") {
                continue;
            }

            let raw_date = record.get(date_col).unwrap_or("");
            let date = parse_date(raw_date).ok_or_else(|| {
                DataError::Parse(format!("{identifier}: row {}: bad date '{raw_date}'", row + 2))
            })?;
            let close: f64 = raw_close.parse().map_err(|_| {
                DataError::Parse(format!("{identifier}: row {}: bad close '{raw_close}'", row + 2))
            })?;
            points.push(PricePoint { date, close });
        }

        points.sort_by_key(|p| p.date);
        Ok(PriceSeries::new(identifier, points)?)
    }
}

fn column(headers: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| names.iter().any(|n| h.eq_ignore_ascii_case(n)))
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time part.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let day = raw.get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

impl PriceSource for CsvSource {
    fn name(&self) -> &str {
        "csv"
    }

    fn kind(&self) -> DataSource {
        DataSource::CsvImport
    }

    fn fetch(&self, identifier: &str, lookback: &LookbackPeriod) -> Result<PriceSeries, DataError> {
        let path = self.path_for(identifier)?;
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(DataError::SymbolNotFound {
                    symbol: identifier.to_string(),
                })
            }
            Err(e) => return Err(DataError::Io(format!("{}: {e}", path.display()))),
        };

        let series = Self::parse(identifier, &content)?;
        let trimmed = match series.last_date().and_then(|end| lookback.start_from(end)) {
            Some(start) => series.since(start),
            None => series,
        };
        tracing::debug!(identifier, sessions = trimmed.len(), path = %path.display(), "loaded CSV");
        Ok(trimmed)
    }
}
