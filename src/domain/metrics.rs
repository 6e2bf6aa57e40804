//! Study-level tallies and transaction summaries.

use std::collections::BTreeMap;

use super::backtest::SimulationResult;
use super::position::{TradeSide, Transaction};
use super::strategy::StrategyKind;

/// Strategy with the highest final capital.
///
/// Ranks on cash only: open positions are not marked to market (see
/// `StrategyRun::marked_equity` for the marked value).
///
/// Ties go to the earliest strategy in `StrategyKind` declaration order,
/// which is also the map's iteration order.
pub fn winning_strategy(final_capital: &BTreeMap<StrategyKind, f64>) -> Option<StrategyKind> {
    let mut best: Option<(StrategyKind, f64)> = None;
    for (&kind, &capital) in final_capital {
        match best {
            Some((_, top)) if capital <= top => {}
            _ => best = Some((kind, capital)),
        }
    }
    best.map(|(kind, _)| kind)
}

#[derive(Debug, Clone, PartialEq)]
pub struct StudyOutcome {
    pub simulations: usize,
    pub wins: BTreeMap<StrategyKind, usize>,
    pub net_profit: usize,
    pub net_loss: usize,
    pub breakeven: usize,
    pub cumulative_capital: BTreeMap<StrategyKind, f64>,
}

impl StudyOutcome {
    pub fn new(kinds: &[StrategyKind]) -> Self {
        StudyOutcome {
            simulations: 0,
            wins: kinds.iter().map(|&k| (k, 0)).collect(),
            net_profit: 0,
            net_loss: 0,
            breakeven: 0,
            cumulative_capital: kinds.iter().map(|&k| (k, 0.0)).collect(),
        }
    }

    /// Fold one simulation in; returns the simulation's winner.
    pub fn record(&mut self, result: &SimulationResult) -> Option<StrategyKind> {
        self.simulations += 1;

        let winner = winning_strategy(&result.final_capital);
        if let Some(kind) = winner {
            *self.wins.entry(kind).or_insert(0) += 1;
        }

        let net = result.net_total();
        if net > 0.0 {
            self.net_profit += 1;
        } else if net < 0.0 {
            self.net_loss += 1;
        } else {
            self.breakeven += 1;
        }

        for (&kind, &capital) in &result.final_capital {
            *self.cumulative_capital.entry(kind).or_insert(0.0) += capital;
        }

        winner
    }

    pub fn wins_for(&self, kind: StrategyKind) -> usize {
        self.wins.get(&kind).copied().unwrap_or(0)
    }

    pub fn win_rate(&self, kind: StrategyKind) -> f64 {
        if self.simulations == 0 {
            0.0
        } else {
            self.wins_for(kind) as f64 / self.simulations as f64
        }
    }

    /// Strategy with the most wins, same tie-break as [`winning_strategy`].
    pub fn most_wins(&self) -> Option<StrategyKind> {
        let mut best: Option<(StrategyKind, usize)> = None;
        for (&kind, &count) in &self.wins {
            match best {
                Some((_, top)) if count <= top => {}
                _ => best = Some((kind, count)),
            }
        }
        best.map(|(kind, _)| kind)
    }
}

/// Totals over a list of transactions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionSummary {
    pub buys: usize,
    pub sells: usize,
    pub money_spent: f64,
    pub money_earned: f64,
    pub net_capital: f64,
}

impl TransactionSummary {
    pub fn compute(transactions: &[Transaction]) -> Self {
        let mut summary = TransactionSummary::default();
        for tx in transactions {
            match tx.side {
                TradeSide::Buy => {
                    summary.buys += 1;
                    summary.money_spent += tx.net_capital.abs();
                }
                TradeSide::Sell => {
                    summary.sells += 1;
                    summary.money_earned += tx.net_capital.abs();
                }
            }
        }
        summary.net_capital = summary.money_earned - summary.money_spent;
        summary
    }

    pub fn total_transactions(&self) -> usize {
        self.buys + self.sells
    }
}
