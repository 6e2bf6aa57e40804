//! Position tracking and executed transactions.

use chrono::NaiveDate;
use std::fmt;

/// Signed share count held by one strategy in one stock.
///
/// Capital is unconstrained, so the count may go negative (short).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Position {
    pub quantity: i64,
}

impl Position {
    pub fn is_long(&self) -> bool {
        self.quantity > 0
    }

    pub fn is_short(&self) -> bool {
        self.quantity < 0
    }

    pub fn is_flat(&self) -> bool {
        self.quantity == 0
    }

    /// Signed value of the holding at `price` (negative when short).
    pub fn market_value(&self, price: f64) -> f64 {
        self.quantity as f64 * price
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeSide {
    Buy,
    Sell,
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeSide::Buy => f.write_str("buy"),
            TradeSide::Sell => f.write_str("sell"),
        }
    }
}

/// One executed trade. `net_capital` is the signed change in capital:
/// negative for buys (cost plus fees), positive for sells (proceeds less fees).
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub side: TradeSide,
    pub day: usize,
    pub date: NaiveDate,
    pub symbol: String,
    pub quantity: i64,
    pub price: f64,
    pub fees: f64,
    pub net_capital: f64,
}
