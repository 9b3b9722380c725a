//! CSV file market data adapter.
//!
//! Reads one `<SYMBOL>.csv` per symbol from a base directory, with `date` and
//! `close` columns. A missing file means the symbol is unknown to this
//! provider; only unreadable or malformed files are reported as errors.

use crate::domain::error::StockfolioError;
use crate::ports::market_data_port::MarketDataPort;
use chrono::NaiveDate;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

pub struct CsvMarketData {
    base_path: PathBuf,
}

impl CsvMarketData {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }

    /// Closing-price history for a symbol, sorted by date. `None` when the
    /// provider has no file for the symbol.
    fn load_history(
        &self,
        symbol: &str,
    ) -> Result<Option<Vec<(NaiveDate, f64)>>, StockfolioError> {
        let path = self.csv_path(symbol);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StockfolioError::Provider {
                    reason: format!("failed to read {}: {}", path.display(), e),
                });
            }
        };

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| StockfolioError::Provider {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;

            let date_str = record.get(0).ok_or_else(|| StockfolioError::Provider {
                reason: format!("missing date column in {}", path.display()),
            })?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                StockfolioError::Provider {
                    reason: format!("invalid date in {}: {}", path.display(), e),
                }
            })?;

            let close: f64 = record
                .get(1)
                .ok_or_else(|| StockfolioError::Provider {
                    reason: format!("missing close column in {}", path.display()),
                })?
                .parse()
                .map_err(|e| StockfolioError::Provider {
                    reason: format!("invalid close value in {}: {}", path.display(), e),
                })?;

            bars.push((date, close));
        }

        bars.sort_by_key(|&(date, _)| date);
        Ok(Some(bars))
    }
}

impl MarketDataPort for CsvMarketData {
    fn closing_price(
        &self,
        symbol: &str,
        date: NaiveDate,
    ) -> Result<Option<f64>, StockfolioError> {
        let Some(bars) = self.load_history(symbol)? else {
            return Ok(None);
        };
        Ok(bars
            .iter()
            .find(|&&(bar_date, _)| bar_date == date)
            .map(|&(_, close)| close))
    }

    fn has_trading_data(&self, symbol: &str, date: NaiveDate) -> Result<bool, StockfolioError> {
        Ok(self.closing_price(symbol, date)?.is_some())
    }

    fn has_recent_history(&self, symbol: &str) -> Result<bool, StockfolioError> {
        // A snapshot has no "now"; any recorded bar counts as history.
        Ok(self
            .load_history(symbol)?
            .is_some_and(|bars| !bars.is_empty()))
    }

    fn latest_price(&self, symbol: &str) -> Result<Option<f64>, StockfolioError> {
        Ok(self
            .load_history(symbol)?
            .and_then(|bars| bars.last().map(|&(_, close)| close)))
    }

    fn list_symbols(&self) -> Result<Vec<String>, StockfolioError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| StockfolioError::Provider {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| StockfolioError::Provider {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if let Some(symbol) = name_str.strip_suffix(".csv") {
                symbols.push(symbol.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}
