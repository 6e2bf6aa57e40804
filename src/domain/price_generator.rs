//! Synthetic price path generation.
//!
//! Each day the previous close moves by a normally distributed step with
//! standard deviation `volatility`. On top of that, news events start at
//! random (probability `news_chance` per day) and push the price by a fixed
//! drift `m * volatility`, `m ~ N(0, 2)`, for a random number of days in
//! `[news_min_days, news_max_days)`. Overlapping events add up.
//!
//! Prices that would fall to zero or below are clamped to [`MIN_PRICE`].

use chrono::NaiveDate;
use rand::Rng;

use crate::domain::error::StocksimError;
use crate::domain::price_series::PriceSeries;

/// Floor applied to any generated price that would otherwise be non-positive.
pub const MIN_PRICE: f64 = 0.01;

const NEWS_MAGNITUDE_STD_DEV: f64 = 2.0;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceModel {
    pub days: usize,
    pub initial_price: f64,
    pub volatility: f64,
    pub news_chance: f64,
    pub news_min_days: usize,
    pub news_max_days: usize,
}

impl Default for PriceModel {
    fn default() -> Self {
        PriceModel {
            days: 250,
            initial_price: 100.0,
            volatility: 1.0,
            news_chance: 0.5,
            news_min_days: 3,
            news_max_days: 15,
        }
    }
}

impl PriceModel {
    pub fn validate(&self) -> Result<(), StocksimError> {
        if self.days == 0 {
            return Err(StocksimError::invalid("simulation", "days", "days must be positive"));
        }
        if !(self.initial_price.is_finite() && self.initial_price > 0.0) {
            return Err(StocksimError::invalid(
                "simulation",
                "initial_price",
                "initial_price must be positive",
            ));
        }
        if !(self.volatility.is_finite() && self.volatility >= 0.0) {
            return Err(StocksimError::invalid(
                "simulation",
                "volatility",
                "volatility must be non-negative",
            ));
        }
        if !(0.0..=1.0).contains(&self.news_chance) {
            return Err(StocksimError::invalid(
                "simulation",
                "news_chance",
                "news_chance must be between 0 and 1",
            ));
        }
        if self.news_min_days == 0 {
            return Err(StocksimError::invalid(
                "simulation",
                "news_min_days",
                "news_min_days must be at least 1",
            ));
        }
        if self.news_min_days >= self.news_max_days {
            return Err(StocksimError::invalid(
                "simulation",
                "news_max_days",
                "news_max_days must be greater than news_min_days",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct NewsEvent {
    drift: f64,
    duration: usize,
}

/// Draw from N(mean, std_dev) using the Box-Muller transform.
pub fn sample_normal<R: Rng>(rng: &mut R, mean: f64, std_dev: f64) -> f64 {
    // u1 in (0, 1] keeps ln() finite
    let u1: f64 = 1.0 - rng.gen_range(0.0..1.0);
    let u2: f64 = rng.gen_range(0.0..1.0);
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    mean + std_dev * z
}

fn draw_news_event<R: Rng>(model: &PriceModel, rng: &mut R) -> Option<NewsEvent> {
    if !rng.gen_bool(model.news_chance) {
        return None;
    }
    let magnitude = sample_normal(rng, 0.0, NEWS_MAGNITUDE_STD_DEV);
    let duration = rng.gen_range(model.news_min_days..model.news_max_days);
    Some(NewsEvent {
        drift: magnitude * model.volatility,
        duration,
    })
}

/// Generate `model.days` prices starting at `model.initial_price`.
///
/// The output depends only on `model` and the state of `rng`, so a seeded
/// generator reproduces the same path.
pub fn generate_price_series<R: Rng>(
    model: &PriceModel,
    symbol: &str,
    start_date: NaiveDate,
    rng: &mut R,
) -> Result<PriceSeries, StocksimError> {
    model.validate()?;

    let mut prices = Vec::with_capacity(model.days);
    prices.push(model.initial_price);
    let mut drift = vec![0.0; model.days];

    for day in 1..model.days {
        let mut price = prices[day - 1] + sample_normal(rng, 0.0, model.volatility);

        if let Some(event) = draw_news_event(model, rng) {
            let end = (day + event.duration).min(model.days);
            for d in &mut drift[day..end] {
                *d += event.drift;
            }
        }
        price += drift[day];

        if !(price.is_finite() && price > 0.0) {
            log::debug!("{symbol}: clamping price {price} on day {day} to {MIN_PRICE}");
            price = MIN_PRICE;
        }
        prices.push(price);
    }

    Ok(PriceSeries::new(symbol, start_date, prices))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn first_price_is_initial_price() {
        let model = PriceModel::default();
        let mut rng = StdRng::seed_from_u64(7);
        let series = generate_price_series(&model, "STK001", start(), &mut rng).unwrap();
        assert_eq!(series.len(), 250);
        assert!((series.price(0) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn single_day_series() {
        let model = PriceModel {
            days: 1,
            ..PriceModel::default()
        };
        let mut rng = StdRng::seed_from_u64(7);
        let series = generate_price_series(&model, "STK001", start(), &mut rng).unwrap();
        assert_eq!(series.prices(), &[100.0]);
    }

    #[test]
    fn zero_volatility_is_flat() {
        let model = PriceModel {
            volatility: 0.0,
            ..PriceModel::default()
        };
        let mut rng = StdRng::seed_from_u64(3);
        let series = generate_price_series(&model, "STK001", start(), &mut rng).unwrap();
        assert!(series.prices().iter().all(|p| (p - 100.0).abs() < 1e-12));
    }

    #[test]
    fn same_seed_same_series() {
        let model = PriceModel::default();
        let a = generate_price_series(&model, "STK001", start(), &mut StdRng::seed_from_u64(42))
            .unwrap();
        let b = generate_price_series(&model, "STK001", start(), &mut StdRng::seed_from_u64(42))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_differ() {
        let model = PriceModel::default();
        let a = generate_price_series(&model, "STK001", start(), &mut StdRng::seed_from_u64(1))
            .unwrap();
        let b = generate_price_series(&model, "STK001", start(), &mut StdRng::seed_from_u64(2))
            .unwrap();
        assert_ne!(a.prices(), b.prices());
    }

    #[test]
    fn crash_is_clamped_to_floor() {
        let model = PriceModel {
            days: 500,
            initial_price: 0.5,
            volatility: 50.0,
            ..PriceModel::default()
        };
        let mut rng = StdRng::seed_from_u64(11);
        let series = generate_price_series(&model, "STK001", start(), &mut rng).unwrap();
        assert!(series.prices().iter().all(|&p| p >= MIN_PRICE));
        assert!(series.prices().iter().any(|&p| p == MIN_PRICE));
    }

    #[test]
    fn zero_days_rejected() {
        let model = PriceModel {
            days: 0,
            ..PriceModel::default()
        };
        let err = generate_price_series(&model, "X", start(), &mut StdRng::seed_from_u64(1))
            .unwrap_err();
        assert!(matches!(err, StocksimError::ConfigInvalid { key, .. } if key == "days"));
    }

    #[test]
    fn non_positive_price_rejected() {
        let model = PriceModel {
            initial_price: 0.0,
            ..PriceModel::default()
        };
        let err = model.validate().unwrap_err();
        assert!(matches!(err, StocksimError::ConfigInvalid { key, .. } if key == "initial_price"));
    }

    #[test]
    fn negative_volatility_rejected() {
        let model = PriceModel {
            volatility: -0.1,
            ..PriceModel::default()
        };
        let err = model.validate().unwrap_err();
        assert!(matches!(err, StocksimError::ConfigInvalid { key, .. } if key == "volatility"));
    }

    #[test]
    fn news_duration_range_must_be_non_empty() {
        let model = PriceModel {
            news_min_days: 5,
            news_max_days: 5,
            ..PriceModel::default()
        };
        let err = model.validate().unwrap_err();
        assert!(matches!(err, StocksimError::ConfigInvalid { key, .. } if key == "news_max_days"));
    }

    #[test]
    fn news_chance_out_of_range_rejected() {
        let model = PriceModel {
            news_chance: 1.5,
            ..PriceModel::default()
        };
        let err = model.validate().unwrap_err();
        assert!(matches!(err, StocksimError::ConfigInvalid { key, .. } if key == "news_chance"));
    }

    #[test]
    fn normal_samples_are_centred() {
        let mut rng = StdRng::seed_from_u64(5);
        let n = 20_000;
        let mean: f64 = (0..n).map(|_| sample_normal(&mut rng, 3.0, 1.0)).sum::<f64>() / n as f64;
        assert!((mean - 3.0).abs() < 0.05, "sample mean {mean}");
    }

    proptest! {
        #[test]
        fn prices_always_positive(
            seed in any::<u64>(),
            initial_price in 0.01f64..1_000.0,
            volatility in 0.0f64..100.0,
            days in 1usize..300,
        ) {
            let model = PriceModel { days, initial_price, volatility, ..PriceModel::default() };
            let mut rng = StdRng::seed_from_u64(seed);
            let series = generate_price_series(&model, "P", start(), &mut rng).unwrap();
            prop_assert_eq!(series.len(), days);
            prop_assert!(series.prices().iter().all(|&p| p > 0.0 && p.is_finite()));
        }
    }
}
