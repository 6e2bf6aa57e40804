//! Stochastic Oscillator (%K) over closing prices.
//!
//! %K = 100 * (close - lowest) / (highest - lowest) over the last n prices.
//! A flat window (highest == lowest) yields 50.
//! Warmup: first (n-1) days are invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::price_series::PriceSeries;

const FLAT_RANGE_K: f64 = 50.0;

pub fn calculate_stochastic(series: &PriceSeries, period: usize) -> IndicatorSeries {
    if period == 0 {
        return IndicatorSeries {
            indicator_type: IndicatorType::Stochastic(period),
            values: Vec::new(),
        };
    }

    let prices = series.prices();
    let mut values = Vec::with_capacity(prices.len());

    for (i, &date) in series.dates().iter().enumerate() {
        let valid = i + 1 >= period;
        let value = if valid {
            let window = &prices[i + 1 - period..=i];
            let highest = window.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let lowest = window.iter().copied().fold(f64::INFINITY, f64::min);
            let range = highest - lowest;
            if range == 0.0 {
                FLAT_RANGE_K
            } else {
                (100.0 * (prices[i] - lowest) / range).clamp(0.0, 100.0)
            }
        } else {
            0.0
        };

        values.push(IndicatorPoint { date, valid, value });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Stochastic(period),
        values,
    }
}
