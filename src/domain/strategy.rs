//! Trading strategies and their per-day decision rules.
//!
//! All strategies share one contract: given a day index and the stock's
//! prices and indicators, return a [`Decision`]. Indicator lookups that are
//! undefined (warm-up, or an indicator series shorter than the prices) always
//! produce [`Action::Hold`].

use rand::Rng;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::domain::indicator::IndicatorType;
use crate::domain::stock_data::StockData;

/// Strategy identity. Declaration order doubles as the tie-break priority
/// when ranking strategies: earlier variants win ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StrategyKind {
    Random,
    CrossingAverages,
    RsiMomentum,
    StochasticMomentum,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 4] = [
        StrategyKind::Random,
        StrategyKind::CrossingAverages,
        StrategyKind::RsiMomentum,
        StrategyKind::StochasticMomentum,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StrategyKind::Random => "random",
            StrategyKind::CrossingAverages => "crossing_averages",
            StrategyKind::RsiMomentum => "rsi_momentum",
            StrategyKind::StochasticMomentum => "stochastic_momentum",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StrategyKind {
    type Err = StrategyListError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        StrategyKind::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or(StrategyListError::Unknown(wanted))
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StrategyListError {
    #[error("empty token in strategy list")]
    EmptyToken,

    #[error("duplicate strategy: {0}")]
    Duplicate(String),

    #[error("unknown strategy: {0}")]
    Unknown(String),
}

/// Parse a comma-separated strategy list such as `random, rsi_momentum`.
pub fn parse_strategy_list(input: &str) -> Result<Vec<StrategyKind>, StrategyListError> {
    let mut kinds = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(StrategyListError::EmptyToken);
        }
        let kind: StrategyKind = trimmed.parse()?;
        if !seen.insert(kind) {
            return Err(StrategyListError::Duplicate(kind.name().to_string()));
        }
        kinds.push(kind);
    }

    Ok(kinds)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Buy,
    Sell,
    Hold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub action: Action,
    pub quantity: i64,
}

impl Decision {
    pub fn hold() -> Self {
        Decision {
            action: Action::Hold,
            quantity: 0,
        }
    }

    fn from_action(action: Action, quantity: i64) -> Self {
        match action {
            Action::Hold => Decision::hold(),
            _ => Decision { action, quantity },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Strategy {
    /// Every `period` days, buy with `buy_prob`, sell with `sell_prob`,
    /// otherwise hold.
    Random {
        period: usize,
        buy_prob: f64,
        sell_prob: f64,
        quantity: i64,
    },
    /// Sell when the fast average crosses above the slow one, buy on the
    /// downward cross.
    CrossingAverages {
        fast: IndicatorType,
        slow: IndicatorType,
        quantity: i64,
    },
    /// Buy below `low` (oversold), sell above `high` (overbought).
    RsiMomentum {
        period: usize,
        low: f64,
        high: f64,
        quantity: i64,
    },
    /// Same thresholds as `RsiMomentum`, applied to stochastic %K.
    StochasticMomentum {
        period: usize,
        low: f64,
        high: f64,
        quantity: i64,
    },
}

impl Strategy {
    pub fn kind(&self) -> StrategyKind {
        match self {
            Strategy::Random { .. } => StrategyKind::Random,
            Strategy::CrossingAverages { .. } => StrategyKind::CrossingAverages,
            Strategy::RsiMomentum { .. } => StrategyKind::RsiMomentum,
            Strategy::StochasticMomentum { .. } => StrategyKind::StochasticMomentum,
        }
    }

    pub fn required_indicators(&self) -> Vec<IndicatorType> {
        match self {
            Strategy::Random { .. } => Vec::new(),
            Strategy::CrossingAverages { fast, slow, .. } => vec![*fast, *slow],
            Strategy::RsiMomentum { period, .. } => vec![IndicatorType::Rsi(*period)],
            Strategy::StochasticMomentum { period, .. } => {
                vec![IndicatorType::Stochastic(*period)]
            }
        }
    }

    /// Decide what to do on `day`. Only `Random` consumes randomness.
    pub fn decide<R: Rng>(&self, day: usize, stock: &StockData, rng: &mut R) -> Decision {
        match self {
            Strategy::Random {
                period,
                buy_prob,
                sell_prob,
                quantity,
            } => {
                if *period == 0 || day % period != 0 {
                    return Decision::hold();
                }
                let draw: f64 = rng.gen_range(0.0..1.0);
                let action = if draw < *buy_prob {
                    Action::Buy
                } else if draw < buy_prob + sell_prob {
                    Action::Sell
                } else {
                    Action::Hold
                };
                Decision::from_action(action, *quantity)
            }
            Strategy::CrossingAverages {
                fast,
                slow,
                quantity,
            } => Decision::from_action(crossing_action(stock, fast, slow, day), *quantity),
            Strategy::RsiMomentum {
                period,
                low,
                high,
                quantity,
            } => {
                let rsi = stock.indicator_value(&IndicatorType::Rsi(*period), day);
                Decision::from_action(threshold_action(rsi, *low, *high), *quantity)
            }
            Strategy::StochasticMomentum {
                period,
                low,
                high,
                quantity,
            } => {
                let k = stock.indicator_value(&IndicatorType::Stochastic(*period), day);
                Decision::from_action(threshold_action(k, *low, *high), *quantity)
            }
        }
    }
}

/// Signal only on the day the fast average changes side of the slow one.
fn crossing_action(
    stock: &StockData,
    fast: &IndicatorType,
    slow: &IndicatorType,
    day: usize,
) -> Action {
    if day == 0 {
        return Action::Hold;
    }
    let values = (
        stock.indicator_value(fast, day - 1),
        stock.indicator_value(slow, day - 1),
        stock.indicator_value(fast, day),
        stock.indicator_value(slow, day),
    );
    let (Some(fast_prev), Some(slow_prev), Some(fast_curr), Some(slow_curr)) = values else {
        return Action::Hold;
    };

    if fast_prev <= slow_prev && fast_curr > slow_curr {
        Action::Sell
    } else if fast_prev >= slow_prev && fast_curr < slow_curr {
        Action::Buy
    } else {
        Action::Hold
    }
}

/// Oscillator thresholding: below `low` buys, above `high` sells, the band
/// `[low, high]` and undefined values hold.
pub fn threshold_action(value: Option<f64>, low: f64, high: f64) -> Action {
    match value {
        Some(v) if v < low => Action::Buy,
        Some(v) if v > high => Action::Sell,
        _ => Action::Hold,
    }
}
