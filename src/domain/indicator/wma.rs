//! Linearly Weighted Moving Average indicator.
//!
//! WMA(n)[i] = (1*P[i-n+1] + 2*P[i-n+2] + ... + n*P[i]) / (n*(n+1)/2)
//! Warmup: first (n-1) days are invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::price_series::PriceSeries;

pub fn calculate_wma(series: &PriceSeries, period: usize) -> IndicatorSeries {
    if period == 0 {
        return IndicatorSeries {
            indicator_type: IndicatorType::Wma(period),
            values: Vec::new(),
        };
    }

    let prices = series.prices();
    let divisor = (period * (period + 1)) as f64 / 2.0;
    let mut values = Vec::with_capacity(prices.len());

    for (i, &date) in series.dates().iter().enumerate() {
        let valid = i + 1 >= period;
        let value = if valid {
            let window = &prices[i + 1 - period..=i];
            let weighted: f64 = (1..=period).zip(window).map(|(w, &p)| w as f64 * p).sum();
            weighted / divisor
        } else {
            0.0
        };
        values.push(IndicatorPoint { date, valid, value });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Wma(period),
        values,
    }
}
