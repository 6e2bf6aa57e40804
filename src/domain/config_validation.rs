//! Configuration loading and validation.
//!
//! Every check runs before any simulation starts. Absent INI keys fall back
//! to `SimulationConfig::default()`; present but malformed values are errors.

use crate::domain::backtest::{MovingAverageType, SimulationConfig};
use crate::domain::error::StocksimError;
use crate::domain::strategy::parse_strategy_list;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;
use std::collections::HashSet;

const SIMULATION: &str = "simulation";
const STRATEGY: &str = "strategy";
const EXECUTION: &str = "execution";

pub fn validate_simulation_config(config: &SimulationConfig) -> Result<(), StocksimError> {
    validate_counts(config)?;
    config.price_model().validate()?;
    validate_windows(config)?;
    validate_lookback(config)?;
    validate_thresholds(config)?;
    validate_trading(config)?;
    validate_execution(config)?;
    validate_strategies(config)?;
    Ok(())
}

fn validate_counts(config: &SimulationConfig) -> Result<(), StocksimError> {
    if config.num_stocks == 0 {
        return Err(StocksimError::invalid(
            SIMULATION,
            "num_stocks",
            "num_stocks must be positive",
        ));
    }
    if config.num_simulations == 0 {
        return Err(StocksimError::invalid(
            SIMULATION,
            "num_simulations",
            "num_simulations must be positive",
        ));
    }
    Ok(())
}

fn validate_windows(config: &SimulationConfig) -> Result<(), StocksimError> {
    for (key, window) in [
        ("fma_window", config.fma_window),
        ("sma_window", config.sma_window),
        ("rsi_window", config.rsi_window),
        ("stochastic_window", config.stochastic_window),
    ] {
        if window == 0 {
            return Err(StocksimError::invalid(
                STRATEGY,
                key,
                format!("{key} must be positive"),
            ));
        }
    }
    if config.fma_window >= config.sma_window {
        return Err(StocksimError::invalid(
            STRATEGY,
            "fma_window",
            "fma_window must be shorter than sma_window",
        ));
    }
    Ok(())
}

fn validate_lookback(config: &SimulationConfig) -> Result<(), StocksimError> {
    let lookback = config.longest_lookback();
    if config.days < lookback {
        return Err(StocksimError::invalid(
            SIMULATION,
            "days",
            format!("days must be at least {lookback} to cover the longest indicator window"),
        ));
    }
    Ok(())
}

fn validate_thresholds(config: &SimulationConfig) -> Result<(), StocksimError> {
    validate_band("rsi_low", config.rsi_low, "rsi_high", config.rsi_high)?;
    validate_band(
        "stochastic_low",
        config.stochastic_low,
        "stochastic_high",
        config.stochastic_high,
    )
}

fn validate_band(
    low_key: &str,
    low: f64,
    high_key: &str,
    high: f64,
) -> Result<(), StocksimError> {
    for (key, value) in [(low_key, low), (high_key, high)] {
        if !(0.0..=100.0).contains(&value) {
            return Err(StocksimError::invalid(
                STRATEGY,
                key,
                format!("{key} must be between 0 and 100"),
            ));
        }
    }
    if low >= high {
        return Err(StocksimError::invalid(
            STRATEGY,
            low_key,
            format!("{low_key} must be below {high_key}"),
        ));
    }
    Ok(())
}

fn validate_trading(config: &SimulationConfig) -> Result<(), StocksimError> {
    if config.trade_quantity <= 0 {
        return Err(StocksimError::invalid(
            STRATEGY,
            "trade_quantity",
            "trade_quantity must be positive",
        ));
    }
    // A run can trade once per day in one direction.
    let max_position = i64::try_from(config.days)
        .ok()
        .and_then(|days| days.checked_mul(config.trade_quantity));
    if max_position.is_none() {
        return Err(StocksimError::invalid(
            STRATEGY,
            "trade_quantity",
            "trade_quantity times days must fit in a signed 64-bit share count",
        ));
    }
    if config.random_period == 0 {
        return Err(StocksimError::invalid(
            STRATEGY,
            "random_period",
            "random_period must be positive",
        ));
    }
    for (key, p) in [
        ("random_buy_prob", config.random_buy_prob),
        ("random_sell_prob", config.random_sell_prob),
    ] {
        if !(0.0..=1.0).contains(&p) {
            return Err(StocksimError::invalid(
                STRATEGY,
                key,
                format!("{key} must be between 0 and 1"),
            ));
        }
    }
    if config.random_buy_prob + config.random_sell_prob > 1.0 + 1e-9 {
        return Err(StocksimError::invalid(
            STRATEGY,
            "random_sell_prob",
            "random_buy_prob + random_sell_prob must not exceed 1",
        ));
    }
    Ok(())
}

fn validate_execution(config: &SimulationConfig) -> Result<(), StocksimError> {
    if !config.initial_capital.is_finite() {
        return Err(StocksimError::invalid(
            EXECUTION,
            "initial_capital",
            "initial_capital must be finite",
        ));
    }
    for (key, value) in [
        ("commission_per_trade", config.commission_per_trade),
        ("commission_pct", config.commission_pct),
    ] {
        if !(value.is_finite() && value >= 0.0) {
            return Err(StocksimError::invalid(
                EXECUTION,
                key,
                format!("{key} must be non-negative"),
            ));
        }
    }
    Ok(())
}

fn validate_strategies(config: &SimulationConfig) -> Result<(), StocksimError> {
    if config.strategies.is_empty() {
        return Err(StocksimError::invalid(
            STRATEGY,
            "strategies",
            "at least one strategy is required",
        ));
    }
    let mut seen = HashSet::new();
    for kind in &config.strategies {
        if !seen.insert(kind) {
            return Err(StocksimError::invalid(
                STRATEGY,
                "strategies",
                format!("duplicate strategy: {kind}"),
            ));
        }
    }
    Ok(())
}

/// Build a validated `SimulationConfig` from the `[simulation]`, `[strategy]`
/// and `[execution]` sections.
pub fn load_simulation_config(config: &dyn ConfigPort) -> Result<SimulationConfig, StocksimError> {
    let defaults = SimulationConfig::default();

    let start_date = match config.get_string(SIMULATION, "start_date") {
        Some(value) => parse_date(&value, "start_date")?,
        None => defaults.start_date,
    };
    let strategies = match config.get_string(STRATEGY, "strategies") {
        Some(value) => parse_strategy_list(&value)?,
        None => defaults.strategies.clone(),
    };
    let ma_type = match config.get_string(STRATEGY, "ma_type") {
        Some(value) => MovingAverageType::parse(&value).ok_or_else(|| {
            StocksimError::invalid(STRATEGY, "ma_type", format!("unknown ma_type: {value}"))
        })?,
        None => defaults.ma_type,
    };

    let loaded = SimulationConfig {
        days: read_count(config, SIMULATION, "days", defaults.days)?,
        num_stocks: read_count(config, SIMULATION, "num_stocks", defaults.num_stocks)?,
        num_simulations: read_count(
            config,
            SIMULATION,
            "num_simulations",
            defaults.num_simulations,
        )?,
        initial_price: read_double(config, SIMULATION, "initial_price", defaults.initial_price)?,
        volatility: read_double(config, SIMULATION, "volatility", defaults.volatility)?,
        seed: read_seed(config, defaults.seed)?,
        start_date,
        news_chance: read_double(config, SIMULATION, "news_chance", defaults.news_chance)?,
        news_min_days: read_count(config, SIMULATION, "news_min_days", defaults.news_min_days)?,
        news_max_days: read_count(config, SIMULATION, "news_max_days", defaults.news_max_days)?,
        strategies,
        ma_type,
        fma_window: read_count(config, STRATEGY, "fma_window", defaults.fma_window)?,
        sma_window: read_count(config, STRATEGY, "sma_window", defaults.sma_window)?,
        rsi_window: read_count(config, STRATEGY, "rsi_window", defaults.rsi_window)?,
        stochastic_window: read_count(
            config,
            STRATEGY,
            "stochastic_window",
            defaults.stochastic_window,
        )?,
        rsi_low: read_double(config, STRATEGY, "rsi_low", defaults.rsi_low)?,
        rsi_high: read_double(config, STRATEGY, "rsi_high", defaults.rsi_high)?,
        stochastic_low: read_double(config, STRATEGY, "stochastic_low", defaults.stochastic_low)?,
        stochastic_high: read_double(
            config,
            STRATEGY,
            "stochastic_high",
            defaults.stochastic_high,
        )?,
        trade_quantity: read_int(config, STRATEGY, "trade_quantity", defaults.trade_quantity)?,
        random_period: read_count(config, STRATEGY, "random_period", defaults.random_period)?,
        random_buy_prob: read_double(
            config,
            STRATEGY,
            "random_buy_prob",
            defaults.random_buy_prob,
        )?,
        random_sell_prob: read_double(
            config,
            STRATEGY,
            "random_sell_prob",
            defaults.random_sell_prob,
        )?,
        initial_capital: read_double(
            config,
            EXECUTION,
            "initial_capital",
            defaults.initial_capital,
        )?,
        commission_per_trade: read_double(
            config,
            EXECUTION,
            "commission_per_trade",
            defaults.commission_per_trade,
        )?,
        commission_pct: read_double(config, EXECUTION, "commission_pct", defaults.commission_pct)?,
    };

    validate_simulation_config(&loaded)?;
    Ok(loaded)
}

fn parse_date(value: &str, key: &str) -> Result<NaiveDate, StocksimError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        StocksimError::invalid(
            SIMULATION,
            key,
            format!("invalid {key} format, expected YYYY-MM-DD"),
        )
    })
}

fn read_int(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: i64,
) -> Result<i64, StocksimError> {
    config
        .get_int(section, key)
        .map(|value| value.unwrap_or(default))
        .map_err(|reason| StocksimError::invalid(section, key, reason))
}

fn read_count(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: usize,
) -> Result<usize, StocksimError> {
    match config
        .get_int(section, key)
        .map_err(|reason| StocksimError::invalid(section, key, reason))?
    {
        None => Ok(default),
        Some(value) => usize::try_from(value).map_err(|_| {
            StocksimError::invalid(section, key, format!("{key} must not be negative"))
        }),
    }
}

fn read_seed(config: &dyn ConfigPort, default: u64) -> Result<u64, StocksimError> {
    match config
        .get_int(SIMULATION, "seed")
        .map_err(|reason| StocksimError::invalid(SIMULATION, "seed", reason))?
    {
        None => Ok(default),
        Some(value) => u64::try_from(value)
            .map_err(|_| StocksimError::invalid(SIMULATION, "seed", "seed must not be negative")),
    }
}

fn read_double(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<f64, StocksimError> {
    config
        .get_double(section, key)
        .map(|value| value.unwrap_or(default))
        .map_err(|reason| StocksimError::invalid(section, key, reason))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;
    use crate::domain::strategy::{StrategyKind, StrategyListError};

    fn make_config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    fn invalid_key(err: StocksimError) -> String {
        match err {
            StocksimError::ConfigInvalid { key, .. } => key,
            other => panic!("expected ConfigInvalid, got {other:?}"),
        }
    }

    #[test]
    fn empty_config_uses_defaults() {
        let loaded = load_simulation_config(&make_config("")).unwrap();
        assert_eq!(loaded, SimulationConfig::default());
    }

    #[test]
    fn full_config_loads() {
        let config = make_config(
            r#"
[simulation]
days = 120
num_stocks = 4
num_simulations = 20
initial_price = 50.0
volatility = 0.5
seed = 7
start_date = 2023-06-01
news_chance = 0.25
news_min_days = 2
news_max_days = 6

[strategy]
strategies = rsi_momentum, crossing_averages
ma_type = wma
fma_window = 5
sma_window = 30
rsi_window = 10
stochastic_window = 9
rsi_low = 30
rsi_high = 70
stochastic_low = 20
stochastic_high = 80
trade_quantity = 3
random_period = 5
random_buy_prob = 0.4
random_sell_prob = 0.4

[execution]
initial_capital = 1000
commission_per_trade = 1.5
commission_pct = 0.1
"#,
        );
        let loaded = load_simulation_config(&config).unwrap();

        assert_eq!(loaded.days, 120);
        assert_eq!(loaded.num_stocks, 4);
        assert_eq!(loaded.num_simulations, 20);
        assert_eq!(loaded.seed, 7);
        assert_eq!(loaded.start_date, NaiveDate::from_ymd_opt(2023, 6, 1).unwrap());
        assert_eq!(
            loaded.strategies,
            vec![StrategyKind::RsiMomentum, StrategyKind::CrossingAverages]
        );
        assert_eq!(loaded.ma_type, MovingAverageType::Weighted);
        assert_eq!((loaded.fma_window, loaded.sma_window), (5, 30));
        assert_eq!(loaded.trade_quantity, 3);
        assert_eq!(loaded.random_period, 5);
        assert!((loaded.rsi_low - 30.0).abs() < 1e-12);
        assert!((loaded.commission_per_trade - 1.5).abs() < 1e-12);
        assert!((loaded.initial_capital - 1000.0).abs() < 1e-12);
    }

    #[test]
    fn non_numeric_value_fails() {
        let err = load_simulation_config(&make_config("[simulation]\ndays = many\n")).unwrap_err();
        assert_eq!(invalid_key(err), "days");
    }

    #[test]
    fn negative_count_fails() {
        let err =
            load_simulation_config(&make_config("[simulation]\nnum_stocks = -3\n")).unwrap_err();
        assert_eq!(invalid_key(err), "num_stocks");
    }

    #[test]
    fn zero_simulations_fails() {
        let err = load_simulation_config(&make_config("[simulation]\nnum_simulations = 0\n"))
            .unwrap_err();
        assert_eq!(invalid_key(err), "num_simulations");
    }

    #[test]
    fn bad_start_date_fails() {
        let err = load_simulation_config(&make_config("[simulation]\nstart_date = 2024/01/01\n"))
            .unwrap_err();
        assert_eq!(invalid_key(err), "start_date");
    }

    #[test]
    fn unknown_strategy_fails() {
        let err = load_simulation_config(&make_config("[strategy]\nstrategies = random, macd\n"))
            .unwrap_err();
        assert!(matches!(
            err,
            StocksimError::StrategyList(StrategyListError::Unknown(name)) if name == "macd"
        ));
    }

    #[test]
    fn unknown_ma_type_fails() {
        let err =
            load_simulation_config(&make_config("[strategy]\nma_type = ema\n")).unwrap_err();
        assert_eq!(invalid_key(err), "ma_type");
    }

    #[test]
    fn fast_window_must_be_shorter() {
        let err = load_simulation_config(&make_config(
            "[strategy]\nfma_window = 30\nsma_window = 30\n",
        ))
        .unwrap_err();
        assert_eq!(invalid_key(err), "fma_window");
    }

    #[test]
    fn zero_window_fails() {
        let config = SimulationConfig {
            rsi_window: 0,
            ..SimulationConfig::default()
        };
        assert_eq!(invalid_key(config.validate().unwrap_err()), "rsi_window");
    }

    #[test]
    fn days_must_cover_lookback() {
        let config = SimulationConfig {
            days: 14,
            rsi_window: 14,
            fma_window: 2,
            sma_window: 5,
            stochastic_window: 5,
            ..SimulationConfig::default()
        };
        assert_eq!(invalid_key(config.validate().unwrap_err()), "days");

        let config = SimulationConfig { days: 15, ..config };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn thresholds_out_of_range_fail() {
        let config = SimulationConfig {
            rsi_high: 120.0,
            ..SimulationConfig::default()
        };
        assert_eq!(invalid_key(config.validate().unwrap_err()), "rsi_high");

        let config = SimulationConfig {
            stochastic_low: 80.0,
            stochastic_high: 20.0,
            ..SimulationConfig::default()
        };
        assert_eq!(invalid_key(config.validate().unwrap_err()), "stochastic_low");
    }

    #[test]
    fn trade_quantity_must_be_positive() {
        let err = load_simulation_config(&make_config("[strategy]\ntrade_quantity = 0\n"))
            .unwrap_err();
        assert_eq!(invalid_key(err), "trade_quantity");
    }

    #[test]
    fn trade_quantity_bounded_by_position_range() {
        let config = SimulationConfig {
            trade_quantity: i64::MAX,
            ..SimulationConfig::default()
        };
        assert_eq!(invalid_key(config.validate().unwrap_err()), "trade_quantity");

        let config = SimulationConfig {
            trade_quantity: i64::MAX / 250,
            days: 250,
            ..SimulationConfig::default()
        };
        assert!(config.validate().is_ok());

        let config = SimulationConfig { days: 251, ..config };
        assert_eq!(invalid_key(config.validate().unwrap_err()), "trade_quantity");
    }

    #[test]
    fn random_probabilities_checked() {
        let config = SimulationConfig {
            random_buy_prob: 0.7,
            random_sell_prob: 0.7,
            ..SimulationConfig::default()
        };
        assert_eq!(invalid_key(config.validate().unwrap_err()), "random_sell_prob");

        let config = SimulationConfig {
            random_buy_prob: 0.5,
            random_sell_prob: 0.5,
            ..SimulationConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn negative_commission_fails() {
        let err = load_simulation_config(&make_config("[execution]\ncommission_pct = -0.5\n"))
            .unwrap_err();
        assert_eq!(invalid_key(err), "commission_pct");
    }

    #[test]
    fn negative_volatility_fails() {
        let err = load_simulation_config(&make_config("[simulation]\nvolatility = -1\n"))
            .unwrap_err();
        assert_eq!(invalid_key(err), "volatility");
    }

    #[test]
    fn duplicate_strategies_fail_validation() {
        let config = SimulationConfig {
            strategies: vec![StrategyKind::Random, StrategyKind::Random],
            ..SimulationConfig::default()
        };
        assert_eq!(invalid_key(config.validate().unwrap_err()), "strategies");
    }

    #[test]
    fn empty_strategies_fail_validation() {
        let config = SimulationConfig {
            strategies: Vec::new(),
            ..SimulationConfig::default()
        };
        assert_eq!(invalid_key(config.validate().unwrap_err()), "strategies");
    }
}
