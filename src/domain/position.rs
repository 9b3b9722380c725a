//! Single-purchase positions: trading-day resolution and profit calculation.

use chrono::{Duration, NaiveDate};

use super::error::StockfolioError;
use super::returns::{annualized_return, parse_date, years_between};
use crate::ports::market_data_port::MarketDataPort;

/// How many consecutive calendar days (starting at the requested date) are
/// probed when resolving a purchase to an actual trading day.
pub const MAX_TRADING_DAY_PROBES: u32 = 10;

/// One purchased lot of a single symbol. The purchase date is always a
/// trading day and the purchase price is always positive once constructed;
/// both are fixed for the life of the position.
#[derive(Debug, Clone)]
pub struct Position {
    pub symbol: String,
    pub purchase_date: NaiveDate,
    pub purchase_price: f64,
}

/// Note that a purchase rolled forward from a non-trading day. Informational,
/// never an error.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseAdjustment {
    pub symbol: String,
    pub requested: NaiveDate,
    pub executed: NaiveDate,
}

/// A successfully opened position plus the date adjustment, if any.
#[derive(Debug, Clone)]
pub struct OpenedPosition {
    pub position: Position,
    pub adjustment: Option<PurchaseAdjustment>,
}

/// Profit of one position against an end date.
#[derive(Debug, Clone)]
pub struct PositionResult {
    pub symbol: String,
    pub purchase_date: NaiveDate,
    pub purchase_price: f64,
    pub end_price: f64,
    pub profit: f64,
    pub annualized_return: f64,
}

impl Position {
    /// Open a position: validate the symbol against the provider, resolve the
    /// requested purchase date to the next trading day, and fetch the closing
    /// price on the resolved day. Fails without side effects.
    pub fn open(
        provider: &dyn MarketDataPort,
        symbol: &str,
        purchase_date: &str,
    ) -> Result<OpenedPosition, StockfolioError> {
        let symbol = symbol.to_uppercase();
        validate_symbol(provider, &symbol)?;

        let requested = parse_date(purchase_date)?;
        let executed = next_trading_day(provider, &symbol, requested)?;

        // Stricter than the probe above: the resolved day must itself carry
        // a usable price, no further searching.
        let purchase_price = provider
            .closing_price(&symbol, executed)?
            .filter(|&price| price > 0.0)
            .ok_or_else(|| StockfolioError::PriceUnavailable {
                symbol: symbol.clone(),
                date: executed,
            })?;

        let adjustment = (executed != requested).then(|| PurchaseAdjustment {
            symbol: symbol.clone(),
            requested,
            executed,
        });

        Ok(OpenedPosition {
            position: Position {
                symbol,
                purchase_date: executed,
                purchase_price,
            },
            adjustment,
        })
    }

    /// Profit of this position held until `end_date`. Does not mutate the
    /// position.
    pub fn calculate_profit(
        &self,
        provider: &dyn MarketDataPort,
        end_date: &str,
    ) -> Result<PositionResult, StockfolioError> {
        let end = parse_date(end_date)?;
        let end_price = provider.closing_price(&self.symbol, end)?.ok_or_else(|| {
            StockfolioError::PriceUnavailable {
                symbol: self.symbol.clone(),
                date: end,
            }
        })?;

        let profit = end_price - self.purchase_price;
        let years = years_between(self.purchase_date, end);
        let total_return = profit / self.purchase_price;

        Ok(PositionResult {
            symbol: self.symbol.clone(),
            purchase_date: self.purchase_date,
            purchase_price: self.purchase_price,
            end_price,
            profit,
            annualized_return: annualized_return(total_return, years),
        })
    }
}

/// Symbol is usable when the provider has recent history for it and its
/// latest known price is positive.
pub fn validate_symbol(
    provider: &dyn MarketDataPort,
    symbol: &str,
) -> Result<(), StockfolioError> {
    if symbol.is_empty() {
        return Err(StockfolioError::InvalidSymbol {
            symbol: symbol.to_string(),
            reason: "empty symbol".to_string(),
        });
    }

    if !provider.has_recent_history(symbol)? {
        return Err(StockfolioError::InvalidSymbol {
            symbol: symbol.to_string(),
            reason: "no recent market data".to_string(),
        });
    }

    match provider.latest_price(symbol)? {
        Some(price) if price > 0.0 => Ok(()),
        _ => Err(StockfolioError::InvalidSymbol {
            symbol: symbol.to_string(),
            reason: "latest price unavailable or non-positive".to_string(),
        }),
    }
}

/// First trading day at or after `date`, probing at most
/// [`MAX_TRADING_DAY_PROBES`] consecutive days.
pub fn next_trading_day(
    provider: &dyn MarketDataPort,
    symbol: &str,
    date: NaiveDate,
) -> Result<NaiveDate, StockfolioError> {
    for offset in 0..MAX_TRADING_DAY_PROBES {
        let candidate = date + Duration::days(i64::from(offset));
        if provider.has_trading_data(symbol, candidate)? {
            return Ok(candidate);
        }
    }

    Err(StockfolioError::NoTradingDay {
        symbol: symbol.to_string(),
        date,
        probes: MAX_TRADING_DAY_PROBES,
    })
}
