//! Simulation engine: runs every configured strategy over freshly generated
//! stocks and aggregates the outcome across repeated simulations.
//!
//! `SimulationConfig` holds every run parameter. A study is fully determined
//! by its config, including `seed`: the single `StdRng` seeded from it is
//! threaded through price generation and the random strategy in a fixed
//! order (stock by stock, strategies in configured order).

use chrono::NaiveDate;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::BTreeMap;

use crate::domain::config_validation::validate_simulation_config;
use crate::domain::error::StocksimError;
use crate::domain::execution::{ExecutionConfig, execute_decision};
use crate::domain::indicator::IndicatorType;
use crate::domain::metrics::StudyOutcome;
use crate::domain::portfolio::Portfolio;
use crate::domain::price_generator::{PriceModel, generate_price_series};
use crate::domain::stock_data::StockData;
use crate::domain::strategy::{Action, Strategy, StrategyKind};
use crate::ports::ledger_port::LedgerPort;

/// Which moving average the crossing strategy compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovingAverageType {
    Simple,
    Weighted,
}

impl MovingAverageType {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "sma" | "simple" => Some(MovingAverageType::Simple),
            "wma" | "weighted" => Some(MovingAverageType::Weighted),
            _ => None,
        }
    }

    pub fn indicator(self, window: usize) -> IndicatorType {
        match self {
            MovingAverageType::Simple => IndicatorType::Sma(window),
            MovingAverageType::Weighted => IndicatorType::Wma(window),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub days: usize,
    pub num_stocks: usize,
    pub num_simulations: usize,
    pub initial_price: f64,
    pub volatility: f64,
    pub seed: u64,
    pub start_date: NaiveDate,
    pub news_chance: f64,
    pub news_min_days: usize,
    pub news_max_days: usize,
    pub strategies: Vec<StrategyKind>,
    pub ma_type: MovingAverageType,
    pub fma_window: usize,
    pub sma_window: usize,
    pub rsi_window: usize,
    pub stochastic_window: usize,
    pub rsi_low: f64,
    pub rsi_high: f64,
    pub stochastic_low: f64,
    pub stochastic_high: f64,
    pub trade_quantity: i64,
    pub random_period: usize,
    pub random_buy_prob: f64,
    pub random_sell_prob: f64,
    pub initial_capital: f64,
    pub commission_per_trade: f64,
    pub commission_pct: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let model = PriceModel::default();
        SimulationConfig {
            days: model.days,
            num_stocks: 10,
            num_simulations: 100,
            initial_price: model.initial_price,
            volatility: model.volatility,
            seed: 42,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            news_chance: model.news_chance,
            news_min_days: model.news_min_days,
            news_max_days: model.news_max_days,
            strategies: StrategyKind::ALL.to_vec(),
            ma_type: MovingAverageType::Simple,
            fma_window: 7,
            sma_window: 21,
            rsi_window: 14,
            stochastic_window: 14,
            rsi_low: 25.0,
            rsi_high: 75.0,
            stochastic_low: 25.0,
            stochastic_high: 75.0,
            trade_quantity: 10,
            random_period: 1,
            random_buy_prob: 1.0 / 3.0,
            random_sell_prob: 1.0 / 3.0,
            initial_capital: 0.0,
            commission_per_trade: 0.0,
            commission_pct: 0.0,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), StocksimError> {
        validate_simulation_config(self)
    }

    pub fn price_model(&self) -> PriceModel {
        PriceModel {
            days: self.days,
            initial_price: self.initial_price,
            volatility: self.volatility,
            news_chance: self.news_chance,
            news_min_days: self.news_min_days,
            news_max_days: self.news_max_days,
        }
    }

    pub fn execution_config(&self) -> ExecutionConfig {
        ExecutionConfig {
            commission_per_trade: self.commission_per_trade,
            commission_pct: self.commission_pct,
        }
    }

    /// Longest number of days any configured indicator needs before it is defined.
    pub fn longest_lookback(&self) -> usize {
        self.sma_window
            .max(self.fma_window)
            .max(self.rsi_window + 1)
            .max(self.stochastic_window)
    }

    pub fn build_strategy(&self, kind: StrategyKind) -> Strategy {
        match kind {
            StrategyKind::Random => Strategy::Random {
                period: self.random_period,
                buy_prob: self.random_buy_prob,
                sell_prob: self.random_sell_prob,
                quantity: self.trade_quantity,
            },
            StrategyKind::CrossingAverages => Strategy::CrossingAverages {
                fast: self.ma_type.indicator(self.fma_window),
                slow: self.ma_type.indicator(self.sma_window),
                quantity: self.trade_quantity,
            },
            StrategyKind::RsiMomentum => Strategy::RsiMomentum {
                period: self.rsi_window,
                low: self.rsi_low,
                high: self.rsi_high,
                quantity: self.trade_quantity,
            },
            StrategyKind::StochasticMomentum => Strategy::StochasticMomentum {
                period: self.stochastic_window,
                low: self.stochastic_low,
                high: self.stochastic_high,
                quantity: self.trade_quantity,
            },
        }
    }

    pub fn build_strategies(&self) -> Vec<Strategy> {
        self.strategies
            .iter()
            .map(|&kind| self.build_strategy(kind))
            .collect()
    }
}

/// Union of the indicators needed by `strategies`, in first-use order.
pub fn required_indicators(strategies: &[Strategy]) -> Vec<IndicatorType> {
    let mut types: Vec<IndicatorType> = Vec::new();
    for indicator_type in strategies.iter().flat_map(|s| s.required_indicators()) {
        if !types.contains(&indicator_type) {
            types.push(indicator_type);
        }
    }
    types
}

/// One strategy's full run over one stock.
#[derive(Debug, Clone)]
pub struct StrategyRun {
    pub kind: StrategyKind,
    pub actions: Vec<Action>,
    pub portfolio: Portfolio,
    pub last_price: Option<f64>,
}

impl StrategyRun {
    pub fn symbol(&self) -> &str {
        &self.portfolio.symbol
    }

    pub fn final_capital(&self) -> f64 {
        self.portfolio.final_capital()
    }

    /// Final capital plus any open position valued at the last price.
    pub fn marked_equity(&self) -> f64 {
        match self.last_price {
            Some(price) => self.portfolio.equity(price),
            None => self.portfolio.capital,
        }
    }

    /// Day indices on which the strategy took `action`.
    pub fn days_with(&self, action: Action) -> Vec<usize> {
        self.actions
            .iter()
            .enumerate()
            .filter(|(_, a)| **a == action)
            .map(|(day, _)| day)
            .collect()
    }
}

/// Walk every day of `stock`: decide, execute, record the day's capital.
pub fn run_strategy<R: Rng>(
    strategy: &Strategy,
    stock: &StockData,
    execution: &ExecutionConfig,
    initial_capital: f64,
    rng: &mut R,
) -> Result<StrategyRun, StocksimError> {
    let mut portfolio = Portfolio::new(stock.symbol(), initial_capital);
    let mut actions = Vec::with_capacity(stock.day_count());

    for day in 0..stock.day_count() {
        let decision = strategy.decide(day, stock, rng);
        let date = stock.series.date(day);
        let price = stock.series.price(day);
        execute_decision(&mut portfolio, decision, day, date, price, execution)?;
        portfolio.record_capital(date);
        actions.push(decision.action);
    }

    Ok(StrategyRun {
        kind: strategy.kind(),
        actions,
        portfolio,
        last_price: stock.series.last_price(),
    })
}

/// Per-strategy totals of one simulation across all of its stocks.
#[derive(Debug, Clone)]
pub struct SimulationResult {
    pub index: usize,
    pub final_capital: BTreeMap<StrategyKind, f64>,
    pub initial_capital: BTreeMap<StrategyKind, f64>,
    pub runs: Vec<StrategyRun>,
}

impl SimulationResult {
    pub fn new(index: usize, kinds: &[StrategyKind]) -> Self {
        SimulationResult {
            index,
            final_capital: kinds.iter().map(|&k| (k, 0.0)).collect(),
            initial_capital: kinds.iter().map(|&k| (k, 0.0)).collect(),
            runs: Vec::new(),
        }
    }

    pub fn add_run(&mut self, run: StrategyRun) {
        *self.final_capital.entry(run.kind).or_insert(0.0) += run.final_capital();
        *self.initial_capital.entry(run.kind).or_insert(0.0) += run.portfolio.initial_capital;
        self.runs.push(run);
    }

    /// Combined gain or loss of every strategy over every stock.
    pub fn net_total(&self) -> f64 {
        let final_total: f64 = self.final_capital.values().sum();
        let initial_total: f64 = self.initial_capital.values().sum();
        final_total - initial_total
    }
}

pub fn stock_symbol(index: usize) -> String {
    format!("STK{:03}", index + 1)
}

/// Run one simulation: fresh stocks, every configured strategy on each.
pub fn run_simulation<R: Rng>(
    config: &SimulationConfig,
    index: usize,
    rng: &mut R,
) -> Result<SimulationResult, StocksimError> {
    let model = config.price_model();
    let strategies = config.build_strategies();
    let indicator_types = required_indicators(&strategies);
    let execution = config.execution_config();
    let mut result = SimulationResult::new(index, &config.strategies);

    for stock_index in 0..config.num_stocks {
        let symbol = stock_symbol(stock_index);
        let series = generate_price_series(&model, &symbol, config.start_date, rng)?;
        let stock = StockData::with_indicators(series, &indicator_types);

        for strategy in &strategies {
            let run = run_strategy(strategy, &stock, &execution, config.initial_capital, rng)?;
            result.add_run(run);
        }
    }

    Ok(result)
}

/// Validate `config`, then run `num_simulations` simulations and tally them.
pub fn run_study(config: &SimulationConfig) -> Result<StudyOutcome, StocksimError> {
    study(config, None)
}

/// Same as [`run_study`], also streaming every transaction to `ledger`.
pub fn run_study_with_ledger(
    config: &SimulationConfig,
    ledger: &mut dyn LedgerPort,
) -> Result<StudyOutcome, StocksimError> {
    study(config, Some(ledger))
}

fn study(
    config: &SimulationConfig,
    mut ledger: Option<&mut dyn LedgerPort>,
) -> Result<StudyOutcome, StocksimError> {
    config.validate()?;
    log::info!(
        "starting study: {} simulations x {} stocks x {} days, seed {}",
        config.num_simulations,
        config.num_stocks,
        config.days,
        config.seed
    );

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut outcome = StudyOutcome::new(&config.strategies);

    for index in 0..config.num_simulations {
        let result = run_simulation(config, index, &mut rng)?;

        if let Some(ledger) = ledger.as_deref_mut() {
            for run in &result.runs {
                ledger.record(index, run.kind, &run.portfolio.transactions)?;
            }
        }

        let winner = outcome.record(&result);
        log::debug!(
            "simulation {index}: winner {}, net {:.2}",
            winner.map(|k| k.name()).unwrap_or("none"),
            result.net_total()
        );
    }

    if let Some(ledger) = ledger {
        ledger.flush()?;
    }

    log::info!(
        "study finished: {} net-profit, {} net-loss, {} breakeven",
        outcome.net_profit,
        outcome.net_loss,
        outcome.breakeven
    );
    Ok(outcome)
}
