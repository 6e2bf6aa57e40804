//! Capital and position state for one strategy trading one stock.

use chrono::NaiveDate;

use super::position::{Position, Transaction};

#[derive(Debug, Clone, PartialEq)]
pub struct CapitalPoint {
    pub date: NaiveDate,
    pub capital: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Portfolio {
    pub symbol: String,
    pub initial_capital: f64,
    pub capital: f64,
    pub position: Position,
    pub transactions: Vec<Transaction>,
    pub capital_curve: Vec<CapitalPoint>,
}

impl Portfolio {
    pub fn new(symbol: impl Into<String>, initial_capital: f64) -> Self {
        Portfolio {
            symbol: symbol.into(),
            initial_capital,
            capital: initial_capital,
            position: Position::default(),
            transactions: Vec::new(),
            capital_curve: Vec::new(),
        }
    }

    pub fn record_transaction(&mut self, transaction: Transaction) {
        self.transactions.push(transaction);
    }

    pub fn record_capital(&mut self, date: NaiveDate) {
        self.capital_curve.push(CapitalPoint {
            date,
            capital: self.capital,
        });
    }

    /// Capital on the last recorded day, or the starting capital before any.
    pub fn final_capital(&self) -> f64 {
        self.capital_curve
            .last()
            .map(|p| p.capital)
            .unwrap_or(self.initial_capital)
    }

    /// Capital plus the open position valued at `price`.
    pub fn equity(&self, price: f64) -> f64 {
        self.capital + self.position.market_value(price)
    }

    pub fn net_capital(&self) -> f64 {
        self.final_capital() - self.initial_capital
    }

    pub fn capital_trajectory(&self) -> Vec<f64> {
        self.capital_curve.iter().map(|p| p.capital).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::position::TradeSide;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn new_portfolio() {
        let p = Portfolio::new("STK001", 1000.0);
        assert_eq!(p.symbol, "STK001");
        assert!((p.capital - 1000.0).abs() < f64::EPSILON);
        assert!(p.position.is_flat());
        assert!(p.transactions.is_empty());
        assert!(p.capital_curve.is_empty());
        assert!((p.final_capital() - 1000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn record_capital_snapshots_current_capital() {
        let mut p = Portfolio::new("STK001", 0.0);
        p.record_capital(date(1));
        p.capital = -50.0;
        p.record_capital(date(2));

        assert_eq!(p.capital_trajectory(), vec![0.0, -50.0]);
        assert_eq!(p.capital_curve[1].date, date(2));
        assert!((p.final_capital() - (-50.0)).abs() < f64::EPSILON);
    }

    #[test]
    fn equity_marks_open_position() {
        let mut p = Portfolio::new("STK001", 0.0);
        p.capital = -1000.0;
        p.position.quantity = 10;
        assert!((p.equity(120.0) - 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn net_capital_relative_to_start() {
        let mut p = Portfolio::new("STK001", 500.0);
        p.capital = 650.0;
        p.record_capital(date(1));
        assert!((p.net_capital() - 150.0).abs() < f64::EPSILON);
    }

    #[test]
    fn record_transaction_appends() {
        let mut p = Portfolio::new("STK001", 0.0);
        p.record_transaction(Transaction {
            side: TradeSide::Buy,
            day: 0,
            date: date(1),
            symbol: "STK001".into(),
            quantity: 1,
            price: 10.0,
            fees: 0.0,
            net_capital: -10.0,
        });
        assert_eq!(p.transactions.len(), 1);
    }
}
