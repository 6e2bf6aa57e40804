//! A simulated stock's price series together with its computed indicators.

use std::collections::HashMap;

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::indicator_helpers::compute_indicators;
use crate::domain::price_series::PriceSeries;

#[derive(Debug, Clone)]
pub struct StockData {
    pub series: PriceSeries,
    pub indicators: HashMap<IndicatorType, IndicatorSeries>,
}

impl StockData {
    pub fn new(series: PriceSeries) -> Self {
        Self {
            series,
            indicators: HashMap::new(),
        }
    }

    pub fn with_indicators(series: PriceSeries, types: &[IndicatorType]) -> Self {
        let indicators = compute_indicators(&series, types);
        Self { series, indicators }
    }

    pub fn symbol(&self) -> &str {
        self.series.symbol()
    }

    pub fn day_count(&self) -> usize {
        self.series.len()
    }

    pub fn indicator(&self, indicator_type: &IndicatorType) -> Option<&IndicatorSeries> {
        self.indicators.get(indicator_type)
    }

    /// Indicator value on `day`; `None` if the indicator was not computed,
    /// is still warming up, or is shorter than the price series.
    pub fn indicator_value(&self, indicator_type: &IndicatorType, day: usize) -> Option<f64> {
        self.indicator(indicator_type)
            .and_then(|series| series.value_at(day))
    }
}
