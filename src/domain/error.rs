//! Domain error types.

use crate::domain::strategy::StrategyListError;

/// Top-level error type for stocksim.
#[derive(Debug, thiserror::Error)]
pub enum StocksimError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    StrategyList(#[from] StrategyListError),

    #[error("position overflow in {symbol} on day {day}")]
    PositionOverflow { symbol: String, day: usize },

    #[error("ledger error: {reason}")]
    Ledger { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StocksimError {
    pub(crate) fn invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        StocksimError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<csv::Error> for StocksimError {
    fn from(err: csv::Error) -> Self {
        StocksimError::Ledger {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_invalid_display() {
        let err = StocksimError::invalid("strategy", "fma_window", "must be positive");
        assert_eq!(
            err.to_string(),
            "invalid config value [strategy] fma_window: must be positive"
        );
    }

    #[test]
    fn position_overflow_display() {
        let err = StocksimError::PositionOverflow {
            symbol: "STK003".into(),
            day: 17,
        };
        assert_eq!(err.to_string(), "position overflow in STK003 on day 17");
    }

    #[test]
    fn strategy_list_error_is_transparent() {
        let err: StocksimError = StrategyListError::EmptyToken.into();
        assert_eq!(err.to_string(), "empty token in strategy list");
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::other("disk full");
        let err: StocksimError = io.into();
        assert!(matches!(err, StocksimError::Io(_)));
    }
}
