//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for stockfolio.
#[derive(Debug, thiserror::Error)]
pub enum StockfolioError {
    #[error("invalid symbol {symbol}: {reason}")]
    InvalidSymbol { symbol: String, reason: String },

    #[error("invalid date {input:?} (expected YYYY-MM-DD)")]
    InvalidDate { input: String },

    #[error("invalid date range: end {end} precedes start {start}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("no trading day for {symbol} within {probes} days of {date}")]
    NoTradingDay {
        symbol: String,
        date: NaiveDate,
        probes: u32,
    },

    #[error("no closing price for {symbol} on {date}")]
    PriceUnavailable { symbol: String, date: NaiveDate },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("market data error: {reason}")]
    Provider { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&StockfolioError> for std::process::ExitCode {
    fn from(err: &StockfolioError) -> Self {
        let code: u8 = match err {
            StockfolioError::Io(_) => 1,
            StockfolioError::ConfigParse { .. }
            | StockfolioError::ConfigMissing { .. }
            | StockfolioError::ConfigInvalid { .. } => 2,
            StockfolioError::Provider { .. } => 3,
            StockfolioError::InvalidDate { .. } | StockfolioError::InvalidRange { .. } => 4,
            StockfolioError::InvalidSymbol { .. }
            | StockfolioError::NoTradingDay { .. }
            | StockfolioError::PriceUnavailable { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
