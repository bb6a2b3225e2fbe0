//! Synthetic price source for offline development and demos.
//!
//! Produces a random walk from a starting price of 100.0 on weekdays only.
//! The walk is seeded from BLAKE3 of `(seed, identifier)`, so a given
//! identifier always gets the same path and different identifiers differ.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use momscan_core::data::{DataError, DataSource, LookbackPeriod, PriceSource};
use momscan_core::domain::{PricePoint, PriceSeries};

/// History generated when the lookback is `max`.
const MAX_HISTORY_YEARS: i64 = 10;

pub struct SyntheticSource {
    seed: u64,
    end: NaiveDate,
    daily_drift: f64,
    daily_range: f64,
}

impl SyntheticSource {
    /// Walk ending at `end` (inclusive, if a weekday).
    pub fn new(seed: u64, end: NaiveDate) -> Self {
        Self {
            seed,
            end,
            daily_drift: 0.0003,
            daily_range: 0.03,
        }
    }

    /// Walk ending today (UTC).
    pub fn ending_today(seed: u64) -> Self {
        Self::new(seed, chrono::Utc::now().date_naive())
    }

    fn rng_for(&self, identifier: &str) -> StdRng {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.seed.to_le_bytes());
        hasher.update(identifier.as_bytes());
        StdRng::from_seed(*hasher.finalize().as_bytes())
    }

    fn generate(&self, identifier: &str, start: NaiveDate) -> Result<PriceSeries, DataError> {
        let mut rng = self.rng_for(identifier);
        let mut points = Vec::new();
        let mut price = 100.0_f64;
        let mut current = start;

        while current <= self.end {
            if matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
                current += Duration::days(1);
                continue;
            }
            let daily_return = self.daily_drift + rng.gen_range(-self.daily_range..self.daily_range);
            price *= 1.0 + daily_return;
            points.push(PricePoint::new(current, price));
            current += Duration::days(1);
        }

        Ok(PriceSeries::new(identifier, points)?)
    }
}

impl PriceSource for SyntheticSource {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn kind(&self) -> DataSource {
        DataSource::Synthetic
    }

    fn fetch(&self, identifier: &str, lookback: &LookbackPeriod) -> Result<PriceSeries, DataError> {
        let start = lookback
            .start_from(self.end)
            .unwrap_or(self.end - Duration::days(365 * MAX_HISTORY_YEARS));
        tracing::debug!(identifier, %start, end = %self.end, "generating synthetic series");
        self.generate(identifier, start)
    }
}
