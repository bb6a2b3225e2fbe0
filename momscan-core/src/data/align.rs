//! Multi-series time alignment.
//!
//! Aligns several close series to the union of their dates. A series with no
//! session on a date gets NaN there (no forward-fill).

use crate::domain::PriceSeries;
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Closes for several identifiers on a common date axis.
#[derive(Debug, Clone)]
pub struct AlignedCloses {
    /// The common date axis (sorted ascending).
    pub dates: Vec<NaiveDate>,
    /// Identifiers in input order.
    pub identifiers: Vec<String>,
    /// One column per identifier, each the length of `dates`.
    pub closes: Vec<Vec<f64>>,
}

impl AlignedCloses {
    pub fn column(&self, identifier: &str) -> Option<&[f64]> {
        self.identifiers
            .iter()
            .position(|id| id == identifier)
            .map(|i| self.closes[i].as_slice())
    }
}

pub fn align_closes(series: &[PriceSeries]) -> AlignedCloses {
    let dates: Vec<NaiveDate> = series
        .iter()
        .flat_map(|s| s.points().iter().map(|p| p.date))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    // Both axes are sorted, so each column is a single merge pass.
    let closes = series
        .iter()
        .map(|s| {
            let mut points = s.points().iter().peekable();
            dates
                .iter()
                .map(|date| match points.peek() {
                    Some(p) if p.date == *date => {
                        let close = p.close;
                        points.next();
                        close
                    }
                    _ => f64::NAN,
                })
                .collect()
        })
        .collect();

    AlignedCloses {
        dates,
        identifiers: series.iter().map(|s| s.identifier().to_string()).collect(),
        closes,
    }
}
