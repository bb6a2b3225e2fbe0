//! In-memory price source for pre-loaded data and tests.

use std::collections::HashMap;

use super::period::LookbackPeriod;
use super::provider::{DataError, DataSource, PriceSource};
use crate::domain::PriceSeries;

/// Serves fixed series by identifier. The lookback is applied relative to
/// each series' last date, like `CsvSource`.
#[derive(Debug, Default, Clone)]
pub struct InMemorySource {
    series: HashMap<String, PriceSeries>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, series: PriceSeries) {
        self.series.insert(series.identifier().to_string(), series);
    }

    pub fn with(mut self, series: PriceSeries) -> Self {
        self.insert(series);
        self
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

impl PriceSource for InMemorySource {
    fn name(&self) -> &str {
        "memory"
    }

    fn kind(&self) -> DataSource {
        DataSource::Memory
    }

    fn fetch(&self, identifier: &str, lookback: &LookbackPeriod) -> Result<PriceSeries, DataError> {
        let series = self
            .series
            .get(identifier)
            .ok_or_else(|| DataError::SymbolNotFound {
                symbol: identifier.to_string(),
            })?;
        Ok(match series.last_date().and_then(|end| lookback.start_from(end)) {
            Some(start) => series.since(start),
            None => series.clone(),
        })
    }
}
