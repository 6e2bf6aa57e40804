//! Transaction ledger port.

use crate::domain::error::StocksimError;
use crate::domain::position::Transaction;
use crate::domain::strategy::StrategyKind;

/// Sink for the transactions of every strategy run in a study.
pub trait LedgerPort {
    fn record(
        &mut self,
        simulation: usize,
        strategy: StrategyKind,
        transactions: &[Transaction],
    ) -> Result<(), StocksimError>;

    fn flush(&mut self) -> Result<(), StocksimError> {
        Ok(())
    }
}
