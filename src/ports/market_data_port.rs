//! Market data access port trait.

use crate::domain::error::StockfolioError;
use chrono::NaiveDate;

/// External source of daily closing prices.
///
/// "No data" and "provider failure" are distinct: methods return
/// `Ok(None)` / `Ok(false)` when the provider simply has nothing for the
/// symbol or date, and `Err` only for transport-level failures.
pub trait MarketDataPort {
    /// Closing price for `symbol` on exactly `date`, if one is recorded.
    fn closing_price(
        &self,
        symbol: &str,
        date: NaiveDate,
    ) -> Result<Option<f64>, StockfolioError>;

    /// Whether any price is recorded for `symbol` on `date`.
    fn has_trading_data(&self, symbol: &str, date: NaiveDate) -> Result<bool, StockfolioError>;

    /// Whether the symbol has usable history. Live implementations should
    /// check a trailing window of about five days; snapshot-backed ones may
    /// treat their latest bar as current.
    fn has_recent_history(&self, symbol: &str) -> Result<bool, StockfolioError>;

    /// The most recent recorded closing price for `symbol`.
    fn latest_price(&self, symbol: &str) -> Result<Option<f64>, StockfolioError>;

    /// All symbols the provider has data for, sorted.
    fn list_symbols(&self) -> Result<Vec<String>, StockfolioError>;
}
