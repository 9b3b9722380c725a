//! Portfolio aggregation: window filtering and weighted annualized return.

use chrono::NaiveDate;

use super::error::StockfolioError;
use super::position::{Position, PositionResult, PurchaseAdjustment};
use super::returns::{annualized_return, parse_date, years_between};
use crate::ports::market_data_port::MarketDataPort;

/// Ordered collection of positions. Append-only: positions enter through
/// [`Portfolio::add_position`] fully resolved and are never removed.
#[derive(Debug, Clone, Default)]
pub struct Portfolio {
    positions: Vec<Position>,
}

/// Aggregate profit of a portfolio over an analysis window.
#[derive(Debug, Clone)]
pub struct PortfolioResult {
    pub positions: Vec<PositionResult>,
    pub total_investment: f64,
    pub total_profit: f64,
    pub annualized_return: f64,
}

impl Portfolio {
    pub fn new() -> Self {
        Portfolio {
            positions: Vec::new(),
        }
    }

    /// Open a position and append it. On failure the portfolio is unchanged.
    /// Returns the purchase-date adjustment when the requested date rolled
    /// forward to a later trading day.
    pub fn add_position(
        &mut self,
        provider: &dyn MarketDataPort,
        symbol: &str,
        purchase_date: &str,
    ) -> Result<Option<PurchaseAdjustment>, StockfolioError> {
        let opened = Position::open(provider, symbol, purchase_date)?;
        self.positions.push(opened.position);
        Ok(opened.adjustment)
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn position_count(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Parse and order-check an analysis range. The engine accepts
    /// `end == start`; only `end < start` is rejected.
    pub fn validate_date_range(
        start_date: &str,
        end_date: &str,
    ) -> Result<(NaiveDate, NaiveDate), StockfolioError> {
        let start = parse_date(start_date)?;
        let end = parse_date(end_date)?;

        if end < start {
            return Err(StockfolioError::InvalidRange { start, end });
        }

        Ok((start, end))
    }

    /// Profit and annualized return of the portfolio over `[start, end]`.
    ///
    /// Positions purchased before `start` are excluded entirely. An empty
    /// result set (including an empty portfolio) yields the zero-valued
    /// result, not an error.
    pub fn compute_profit(
        &self,
        provider: &dyn MarketDataPort,
        start_date: &str,
        end_date: &str,
    ) -> Result<PortfolioResult, StockfolioError> {
        let (start, end) = Self::validate_date_range(start_date, end_date)?;

        let in_window: Vec<&Position> = self
            .positions
            .iter()
            .filter(|p| p.purchase_date >= start)
            .collect();

        if in_window.is_empty() {
            return Ok(PortfolioResult {
                positions: Vec::new(),
                total_investment: 0.0,
                total_profit: 0.0,
                annualized_return: 0.0,
            });
        }

        let mut results = Vec::with_capacity(in_window.len());
        let mut total_investment = 0.0_f64;
        let mut total_profit = 0.0_f64;
        let mut weighted_years = 0.0_f64;

        for position in in_window {
            let result = position.calculate_profit(provider, end_date)?;
            total_investment += result.purchase_price;
            total_profit += result.profit;

            // Each position is weighted against the investment accumulated
            // up to and including itself, not the final total. The order of
            // accumulation changes the numbers; keep it as-is.
            let years = years_between(position.purchase_date, end);
            weighted_years += years * (result.purchase_price / total_investment);

            results.push(result);
        }

        let portfolio_return = if total_investment > 0.0 {
            annualized_return(total_profit / total_investment, weighted_years)
        } else {
            0.0
        };

        Ok(PortfolioResult {
            positions: results,
            total_investment,
            total_profit,
            annualized_return: portfolio_return,
        })
    }
}
