//! Simple Moving Average indicator.
//!
//! SMA(n)[i] = (P[i-n+1] + ... + P[i]) / n
//! Warmup: first (n-1) days are invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::price_series::PriceSeries;

pub fn calculate_sma(series: &PriceSeries, period: usize) -> IndicatorSeries {
    if period == 0 {
        return IndicatorSeries {
            indicator_type: IndicatorType::Sma(period),
            values: Vec::new(),
        };
    }

    let prices = series.prices();
    let mut values = Vec::with_capacity(prices.len());

    for (i, &date) in series.dates().iter().enumerate() {
        let valid = i + 1 >= period;
        // Each window is summed afresh so hand-checkable inputs give exact means.
        let value = if valid {
            prices[i + 1 - period..=i].iter().sum::<f64>() / period as f64
        } else {
            0.0
        };
        values.push(IndicatorPoint { date, valid, value });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Sma(period),
        values,
    }
}
