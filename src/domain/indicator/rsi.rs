//! RSI (Relative Strength Index) indicator.
//!
//! Computed independently for every window of the last n price changes:
//! - U: mean of the upward changes in the window
//! - D: mean magnitude of the downward changes in the window
//!
//! Unchanged days count toward neither side. A side with no moves averages to 0.
//!
//! Formula: RSI = 100 - (100 / (1 + U / D))
//! If D == 0: RSI = 100
//!
//! Warmup: first n days are invalid (need n price changes, i.e. n + 1 prices).

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::price_series::PriceSeries;

pub fn calculate_rsi(series: &PriceSeries, period: usize) -> IndicatorSeries {
    if period == 0 {
        return IndicatorSeries {
            indicator_type: IndicatorType::Rsi(period),
            values: Vec::new(),
        };
    }

    let prices = series.prices();
    let mut values = Vec::with_capacity(prices.len());

    for (i, &date) in series.dates().iter().enumerate() {
        if i < period {
            values.push(IndicatorPoint {
                date,
                valid: false,
                value: 0.0,
            });
            continue;
        }

        let (avg_gain, avg_loss) = average_moves(&prices[i - period..=i]);
        values.push(IndicatorPoint {
            date,
            valid: true,
            value: rsi_from_averages(avg_gain, avg_loss),
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Rsi(period),
        values,
    }
}

fn average_moves(window: &[f64]) -> (f64, f64) {
    let mut gain_sum = 0.0;
    let mut gain_count = 0usize;
    let mut loss_sum = 0.0;
    let mut loss_count = 0usize;

    for pair in window.windows(2) {
        let change = pair[1] - pair[0];
        if change > 0.0 {
            gain_sum += change;
            gain_count += 1;
        } else if change < 0.0 {
            loss_sum += -change;
            loss_count += 1;
        }
    }

    let avg = |sum: f64, count: usize| if count == 0 { 0.0 } else { sum / count as f64 };
    (avg(gain_sum, gain_count), avg(loss_sum, loss_count))
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
    }
}
