//! CSV transaction ledger adapter.

use crate::domain::error::StocksimError;
use crate::domain::position::Transaction;
use crate::domain::strategy::StrategyKind;
use crate::ports::ledger_port::LedgerPort;
use std::fs::File;
use std::io::Write;
use std::path::Path;

const HEADER: [&str; 10] = [
    "simulation",
    "strategy",
    "transaction",
    "day",
    "date",
    "stock",
    "num_shares",
    "price",
    "fees",
    "net_capital",
];

/// Writes one CSV row per transaction; amounts are rounded to cents.
pub struct CsvLedgerAdapter<W: Write> {
    writer: csv::Writer<W>,
    rows: usize,
}

impl<W: Write> CsvLedgerAdapter<W> {
    pub fn new(writer: W) -> Result<Self, StocksimError> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(HEADER)?;
        Ok(Self { writer, rows: 0 })
    }

    /// Number of transaction rows written so far.
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn into_inner(self) -> Result<W, StocksimError> {
        self.writer.into_inner().map_err(|e| StocksimError::Ledger {
            reason: e.to_string(),
        })
    }
}

impl CsvLedgerAdapter<File> {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, StocksimError> {
        let file = File::create(path.as_ref())?;
        log::debug!("writing ledger to {}", path.as_ref().display());
        Self::new(file)
    }
}

impl<W: Write> LedgerPort for CsvLedgerAdapter<W> {
    fn record(
        &mut self,
        simulation: usize,
        strategy: StrategyKind,
        transactions: &[Transaction],
    ) -> Result<(), StocksimError> {
        for tx in transactions {
            self.writer.write_record([
                simulation.to_string(),
                strategy.name().to_string(),
                tx.side.to_string(),
                tx.day.to_string(),
                tx.date.format("%Y-%m-%d").to_string(),
                tx.symbol.clone(),
                tx.quantity.to_string(),
                format!("{:.2}", tx.price),
                format!("{:.2}", tx.fees),
                format!("{:.2}", tx.net_capital),
            ])?;
            self.rows += 1;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), StocksimError> {
        self.writer.flush()?;
        Ok(())
    }
}
