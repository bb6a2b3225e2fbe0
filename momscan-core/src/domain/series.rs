//! PriceSeries: the time-ordered closing prices of one identifier.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One trading session's closing price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SeriesError {
    #[error("dates must be strictly increasing: {previous} is followed by {next}")]
    NotIncreasing {
        previous: NaiveDate,
        next: NaiveDate,
    },

    #[error("close on {date} must be finite and positive, got {close}")]
    InvalidPrice { date: NaiveDate, close: f64 },
}

/// Daily closing prices, strictly increasing in date.
///
/// Validated once at construction and immutable afterwards. Every downstream
/// computation (indicators, signals, forward returns) reads from this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    identifier: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(identifier: impl Into<String>, points: Vec<PricePoint>) -> Result<Self, SeriesError> {
        for point in &points {
            if !point.close.is_finite() || point.close <= 0.0 {
                return Err(SeriesError::InvalidPrice {
                    date: point.date,
                    close: point.close,
                });
            }
        }
        for w in points.windows(2) {
            if w[1].date <= w[0].date {
                return Err(SeriesError::NotIncreasing {
                    previous: w[0].date,
                    next: w[1].date,
                });
            }
        }
        Ok(Self {
            identifier: identifier.into(),
            points,
        })
    }

    /// Build a series from parallel date/close slices.
    pub fn from_parts(
        identifier: impl Into<String>,
        dates: &[NaiveDate],
        closes: &[f64],
    ) -> Result<Self, SeriesError> {
        let points = dates
            .iter()
            .zip(closes)
            .map(|(&date, &close)| PricePoint { date, close })
            .collect();
        Self::new(identifier, points)
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    /// Close on exactly `date`, if that session exists.
    pub fn close_on(&self, date: NaiveDate) -> Option<f64> {
        self.points
            .binary_search_by_key(&date, |p| p.date)
            .ok()
            .map(|i| self.points[i].close)
    }

    /// Keep only sessions on or after `start`.
    pub fn since(&self, start: NaiveDate) -> Self {
        let from = self.points.partition_point(|p| p.date < start);
        Self {
            identifier: self.identifier.clone(),
            points: self.points[from..].to_vec(),
        }
    }
}
