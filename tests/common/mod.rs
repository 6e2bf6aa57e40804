#![allow(dead_code)]

use chrono::NaiveDate;
use stocksim::domain::backtest::SimulationConfig;
use stocksim::domain::error::StocksimError;
use stocksim::domain::indicator::IndicatorType;
use stocksim::domain::position::Transaction;
use stocksim::domain::price_series::PriceSeries;
use stocksim::domain::stock_data::StockData;
use stocksim::domain::strategy::StrategyKind;
use stocksim::ports::ledger_port::LedgerPort;

pub struct LedgerEntry {
    pub simulation: usize,
    pub strategy: StrategyKind,
    pub transactions: Vec<Transaction>,
}

/// In-memory ledger that keeps every recorded batch.
#[derive(Default)]
pub struct MemoryLedger {
    pub entries: Vec<LedgerEntry>,
    pub flushed: bool,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transaction_count(&self) -> usize {
        self.entries.iter().map(|e| e.transactions.len()).sum()
    }

    pub fn for_simulation(&self, simulation: usize) -> Vec<&LedgerEntry> {
        self.entries
            .iter()
            .filter(|e| e.simulation == simulation)
            .collect()
    }
}

impl LedgerPort for MemoryLedger {
    fn record(
        &mut self,
        simulation: usize,
        strategy: StrategyKind,
        transactions: &[Transaction],
    ) -> Result<(), StocksimError> {
        self.entries.push(LedgerEntry {
            simulation,
            strategy,
            transactions: transactions.to_vec(),
        });
        Ok(())
    }

    fn flush(&mut self) -> Result<(), StocksimError> {
        self.flushed = true;
        Ok(())
    }
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn make_series(prices: &[f64]) -> PriceSeries {
    PriceSeries::new("STK001", date(2024, 1, 1), prices.to_vec())
}

pub fn make_stock(prices: &[f64], types: &[IndicatorType]) -> StockData {
    StockData::with_indicators(make_series(prices), types)
}

/// Small, fast study used across tests.
pub fn small_config() -> SimulationConfig {
    SimulationConfig {
        days: 80,
        num_stocks: 3,
        num_simulations: 5,
        fma_window: 4,
        sma_window: 12,
        rsi_window: 6,
        stochastic_window: 6,
        seed: 2024,
        ..SimulationConfig::default()
    }
}
