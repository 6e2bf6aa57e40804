//! Dispatch from `IndicatorType` to the matching calculation.

use std::collections::HashMap;

use crate::domain::indicator::rsi::calculate_rsi;
use crate::domain::indicator::sma::calculate_sma;
use crate::domain::indicator::stochastic::calculate_stochastic;
use crate::domain::indicator::wma::calculate_wma;
use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::price_series::PriceSeries;

pub fn compute_indicator(series: &PriceSeries, indicator_type: IndicatorType) -> IndicatorSeries {
    match indicator_type {
        IndicatorType::Sma(period) => calculate_sma(series, period),
        IndicatorType::Wma(period) => calculate_wma(series, period),
        IndicatorType::Rsi(period) => calculate_rsi(series, period),
        IndicatorType::Stochastic(period) => calculate_stochastic(series, period),
    }
}

/// Compute every requested indicator once; duplicates in `types` are ignored.
pub fn compute_indicators(
    series: &PriceSeries,
    types: &[IndicatorType],
) -> HashMap<IndicatorType, IndicatorSeries> {
    let mut indicators = HashMap::with_capacity(types.len());
    for &indicator_type in types {
        indicators
            .entry(indicator_type)
            .or_insert_with(|| compute_indicator(series, indicator_type));
    }
    indicators
}
