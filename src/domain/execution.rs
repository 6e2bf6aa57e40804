//! Trade execution against a strategy's portfolio.
//!
//! Fills happen at the day's price with an optional commission. Capital is
//! unconstrained: buys never fail for lack of cash and sells may open shorts.

use chrono::NaiveDate;

use super::error::StocksimError;
use super::portfolio::Portfolio;
use super::position::{TradeSide, Transaction};
use super::strategy::{Action, Decision};

/// Commission parameters applied to every trade.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExecutionConfig {
    pub commission_per_trade: f64,
    pub commission_pct: f64,
}

/// Calculate commission: flat_fee + (trade_value * pct / 100).
pub fn calculate_commission(trade_value: f64, config: &ExecutionConfig) -> f64 {
    config.commission_per_trade + (trade_value * config.commission_pct / 100.0)
}

/// Apply `decision` on `day` at `price`.
///
/// Buy: capital -= qty * price + fees, position += qty.
/// Sell: capital += qty * price - fees, position -= qty.
/// Holds and zero-quantity decisions leave the portfolio untouched and return `None`.
/// A fill that would overflow the share count is rejected without touching
/// the portfolio.
pub fn execute_decision<'a>(
    portfolio: &'a mut Portfolio,
    decision: Decision,
    day: usize,
    date: NaiveDate,
    price: f64,
    config: &ExecutionConfig,
) -> Result<Option<&'a Transaction>, StocksimError> {
    let side = match decision.action {
        Action::Buy => TradeSide::Buy,
        Action::Sell => TradeSide::Sell,
        Action::Hold => return Ok(None),
    };
    if decision.quantity <= 0 {
        return Ok(None);
    }

    let held = portfolio.position.quantity;
    let quantity = match side {
        TradeSide::Buy => held.checked_add(decision.quantity),
        TradeSide::Sell => held.checked_sub(decision.quantity),
    }
    .ok_or_else(|| StocksimError::PositionOverflow {
        symbol: portfolio.symbol.clone(),
        day,
    })?;

    let trade_value = decision.quantity as f64 * price;
    let fees = calculate_commission(trade_value, config);
    let net_capital = match side {
        TradeSide::Buy => -(trade_value + fees),
        TradeSide::Sell => trade_value - fees,
    };

    portfolio.capital += net_capital;
    portfolio.position.quantity = quantity;

    let transaction = Transaction {
        side,
        day,
        date,
        symbol: portfolio.symbol.clone(),
        quantity: decision.quantity,
        price,
        fees,
        net_capital,
    };
    portfolio.record_transaction(transaction);
    Ok(portfolio.transactions.last())
}
