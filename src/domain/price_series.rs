//! Daily closing price series for a single simulated stock.

use chrono::{Datelike, NaiveDate, Weekday};

/// Ordered daily prices for one stock, one entry per trading day.
///
/// Immutable once built: prices and the trading calendar are only exposed
/// through read-only accessors.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    symbol: String,
    dates: Vec<NaiveDate>,
    prices: Vec<f64>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, start_date: NaiveDate, prices: Vec<f64>) -> Self {
        let dates = trading_calendar(start_date, prices.len());
        PriceSeries {
            symbol: symbol.into(),
            dates,
            prices,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Price on `day`; panics if `day` is out of range, like slice indexing.
    pub fn price(&self, day: usize) -> f64 {
        self.prices[day]
    }

    pub fn date(&self, day: usize) -> NaiveDate {
        self.dates[day]
    }

    pub fn last_price(&self) -> Option<f64> {
        self.prices.last().copied()
    }
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

fn roll_to_weekday(mut date: NaiveDate) -> NaiveDate {
    while is_weekend(date) {
        match date.succ_opt() {
            Some(next) => date = next,
            None => break,
        }
    }
    date
}

/// Consecutive weekdays starting at `start` (rolled forward off a weekend).
pub fn trading_calendar(start: NaiveDate, days: usize) -> Vec<NaiveDate> {
    let mut dates = Vec::with_capacity(days);
    let mut date = roll_to_weekday(start);
    for _ in 0..days {
        dates.push(date);
        date = roll_to_weekday(date.succ_opt().unwrap_or(date));
    }
    dates
}
