//! Fixed-holding-period forward returns.
//!
//! For every session d, the simulated trade buys at close(d) and sells at
//! close(d + h weeks). The exit must be an exact session date in the series:
//! if that calendar day was not traded (weekend, holiday) or lies past the
//! end of the series, the buy date contributes nothing. No nearest-session
//! fallback is applied.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::PriceSeries;

/// One simulated buy/sell pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReturnObservation {
    pub buy_date: NaiveDate,
    pub buy_price: f64,
    pub sell_date: NaiveDate,
    pub sell_price: f64,
    pub percent_return: f64,
}

/// Exit date for a buy on `buy_date`, `None` on calendar overflow.
pub fn exit_date(buy_date: NaiveDate, holding_period_weeks: u32) -> Option<NaiveDate> {
    buy_date.checked_add_days(Days::new(7 * u64::from(holding_period_weeks)))
}

/// All observations for `series`, in buy-date order.
pub fn forward_returns(series: &PriceSeries, holding_period_weeks: u32) -> Vec<ReturnObservation> {
    series
        .points()
        .iter()
        .filter_map(|buy| {
            let sell_date = exit_date(buy.date, holding_period_weeks)?;
            let sell_price = series.close_on(sell_date)?;
            Some(ReturnObservation {
                buy_date: buy.date,
                buy_price: buy.close,
                sell_date,
                sell_price,
                percent_return: (sell_price - buy.close) / buy.close,
            })
        })
        .collect()
}
