#![allow(dead_code)]

use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap, HashSet};
use stockfolio::domain::error::StockfolioError;
use stockfolio::ports::market_data_port::MarketDataPort;

/// In-memory market data provider for tests. Closes are keyed by symbol and
/// date; phantom trading days answer the trading-day probe without carrying
/// a price; per-symbol errors simulate transport failures.
pub struct MockMarketData {
    pub prices: HashMap<String, BTreeMap<NaiveDate, f64>>,
    pub phantom_days: HashSet<(String, NaiveDate)>,
    pub errors: HashMap<String, String>,
}

impl MockMarketData {
    pub fn new() -> Self {
        Self {
            prices: HashMap::new(),
            phantom_days: HashSet::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_close(mut self, symbol: &str, date: &str, close: f64) -> Self {
        self.prices
            .entry(symbol.to_string())
            .or_default()
            .insert(parse(date), close);
        self
    }

    pub fn with_phantom_trading_day(mut self, symbol: &str, date: &str) -> Self {
        self.phantom_days.insert((symbol.to_string(), parse(date)));
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }

    fn check_error(&self, symbol: &str) -> Result<(), StockfolioError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(StockfolioError::Provider {
                reason: reason.clone(),
            });
        }
        Ok(())
    }
}

impl MarketDataPort for MockMarketData {
    fn closing_price(
        &self,
        symbol: &str,
        date: NaiveDate,
    ) -> Result<Option<f64>, StockfolioError> {
        self.check_error(symbol)?;
        Ok(self
            .prices
            .get(symbol)
            .and_then(|closes| closes.get(&date))
            .copied())
    }

    fn has_trading_data(&self, symbol: &str, date: NaiveDate) -> Result<bool, StockfolioError> {
        self.check_error(symbol)?;
        if self.phantom_days.contains(&(symbol.to_string(), date)) {
            return Ok(true);
        }
        Ok(self
            .prices
            .get(symbol)
            .is_some_and(|closes| closes.contains_key(&date)))
    }

    fn has_recent_history(&self, symbol: &str) -> Result<bool, StockfolioError> {
        self.check_error(symbol)?;
        Ok(self.prices.get(symbol).is_some_and(|c| !c.is_empty()))
    }

    fn latest_price(&self, symbol: &str) -> Result<Option<f64>, StockfolioError> {
        self.check_error(symbol)?;
        Ok(self
            .prices
            .get(symbol)
            .and_then(|closes| closes.last_key_value())
            .map(|(_, &close)| close))
    }

    fn list_symbols(&self) -> Result<Vec<String>, StockfolioError> {
        let mut symbols: Vec<String> = self.prices.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn parse(input: &str) -> NaiveDate {
    NaiveDate::parse_from_str(input, "%Y-%m-%d").unwrap()
}
