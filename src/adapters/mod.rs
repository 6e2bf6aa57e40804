//! Concrete adapter implementations for ports.

pub mod csv_ledger_adapter;
pub mod file_config_adapter;
