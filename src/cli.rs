//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_market_data::CsvMarketData;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::error::StockfolioError;
use crate::domain::portfolio::{Portfolio, PortfolioResult};
use crate::domain::position::{validate_symbol, PositionResult};
use crate::ports::config_port::ConfigPort;
use crate::ports::market_data_port::MarketDataPort;

#[derive(Parser, Debug)]
#[command(name = "stockfolio", about = "Stock portfolio profit analyzer")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute portfolio profit over an analysis window
    Analyze {
        #[arg(short, long)]
        config: PathBuf,
        /// Override [analysis] start_date
        #[arg(long)]
        start: Option<String>,
        /// Override [analysis] end_date
        #[arg(long)]
        end: Option<String>,
        /// SYMBOL:YYYY-MM-DD purchase, replaces [portfolio] positions (repeatable)
        #[arg(long = "position")]
        positions: Vec<String>,
    },
    /// Check that a symbol has usable market data
    CheckSymbol {
        #[arg(long)]
        symbol: String,
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List symbols available in the data directory
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Analyze {
            config,
            start,
            end,
            positions,
        } => run_analyze(&config, start.as_deref(), end.as_deref(), &positions),
        Command::CheckSymbol { symbol, config } => run_check_symbol(&symbol, &config),
        Command::ListSymbols { config } => run_list_symbols(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = StockfolioError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

pub fn build_provider(config: &dyn ConfigPort) -> Result<CsvMarketData, StockfolioError> {
    let path = config
        .get_string("data", "path")
        .ok_or_else(|| StockfolioError::ConfigMissing {
            section: "data".into(),
            key: "path".into(),
        })?;
    Ok(CsvMarketData::new(PathBuf::from(path)))
}

/// Analysis window as strings; the engine parses and validates them.
pub fn build_analysis_range(
    config: &dyn ConfigPort,
    start_override: Option<&str>,
    end_override: Option<&str>,
) -> Result<(String, String), StockfolioError> {
    let start = match start_override {
        Some(s) => s.to_string(),
        None => config.get_string("analysis", "start_date").ok_or_else(|| {
            StockfolioError::ConfigMissing {
                section: "analysis".into(),
                key: "start_date".into(),
            }
        })?,
    };
    let end = match end_override {
        Some(e) => e.to_string(),
        None => config.get_string("analysis", "end_date").ok_or_else(|| {
            StockfolioError::ConfigMissing {
                section: "analysis".into(),
                key: "end_date".into(),
            }
        })?,
    };
    Ok((start, end))
}

/// Parse a `SYMBOL:YYYY-MM-DD, ...` list into (symbol, date string) pairs.
/// Duplicates are allowed: the same symbol can be bought more than once.
pub fn parse_position_entries(
    input: &str,
) -> Result<Vec<(String, String)>, StockfolioError> {
    let mut entries = Vec::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(StockfolioError::ConfigInvalid {
                section: "portfolio".into(),
                key: "positions".into(),
                reason: "empty entry in position list".into(),
            });
        }
        let Some((symbol, date)) = trimmed.split_once(':') else {
            return Err(StockfolioError::ConfigInvalid {
                section: "portfolio".into(),
                key: "positions".into(),
                reason: format!("expected SYMBOL:YYYY-MM-DD, got {:?}", trimmed),
            });
        };
        entries.push((symbol.trim().to_string(), date.trim().to_string()));
    }

    Ok(entries)
}

pub fn resolve_position_entries(
    overrides: &[String],
    config: &dyn ConfigPort,
) -> Result<Vec<(String, String)>, StockfolioError> {
    if !overrides.is_empty() {
        let joined = overrides.join(",");
        return parse_position_entries(&joined);
    }

    let configured = config.get_string("portfolio", "positions").ok_or_else(|| {
        StockfolioError::ConfigMissing {
            section: "portfolio".into(),
            key: "positions".into(),
        }
    })?;
    parse_position_entries(&configured)
}

/// `$#,##0.00` with the sign between the `$` and the digits.
pub fn format_currency(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::new();
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("${}{}.{}", sign, grouped, frac_part)
}

/// `#0.00%`; the caller scales to percentage points.
pub fn format_percentage(value: f64) -> String {
    format!("{:.2}%", value)
}

fn run_analyze(
    config_path: &PathBuf,
    start_override: Option<&str>,
    end_override: Option<&str>,
    position_overrides: &[String],
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let provider = match build_provider(&config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let entries = match resolve_position_entries(position_overrides, &config) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // A position that fails to open is skipped with a warning; the rest of
    // the portfolio still gets analyzed.
    let mut portfolio = Portfolio::new();
    let requested = entries.len();
    for (symbol, date) in &entries {
        match portfolio.add_position(&provider, symbol, date) {
            Ok(Some(adjustment)) => {
                eprintln!(
                    "note: {} purchase rolls forward to {} (requested {})",
                    adjustment.symbol, adjustment.executed, adjustment.requested
                );
            }
            Ok(None) => {}
            Err(e) => {
                eprintln!("warning: skipping {} ({})", symbol, e);
            }
        }
    }
    eprintln!(
        "Loaded {} of {} positions",
        portfolio.position_count(),
        requested
    );

    let (start, end) = match build_analysis_range(&config, start_override, end_override) {
        Ok(range) => range,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let result = match portfolio.compute_profit(&provider, &start, &end) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    print_report(&result, &start, &end);
    ExitCode::SUCCESS
}

fn print_report(result: &PortfolioResult, start: &str, end: &str) {
    for position in &result.positions {
        print_position(position);
    }

    let current_value = result.total_investment + result.total_profit;
    println!("\nPortfolio summary ({} to {}):", start, end);
    println!(
        "  total investment:  {}",
        format_currency(result.total_investment)
    );
    println!("  current value:     {}", format_currency(current_value));
    println!("  total profit:      {}", format_currency(result.total_profit));
    println!(
        "  annualized return: {}",
        format_percentage(result.annualized_return * 100.0)
    );
}

fn print_position(result: &PositionResult) {
    println!("\n{}:", result.symbol);
    println!("  purchase date:  {}", result.purchase_date);
    println!(
        "  purchase price: {}",
        format_currency(result.purchase_price)
    );
    println!("  end price:      {}", format_currency(result.end_price));
    println!("  profit:         {}", format_currency(result.profit));
    println!(
        "  return:         {}",
        format_percentage(result.profit / result.purchase_price * 100.0)
    );
    println!(
        "  annualized:     {}",
        format_percentage(result.annualized_return * 100.0)
    );
}

fn run_check_symbol(symbol: &str, config_path: &PathBuf) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let provider = match build_provider(&config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let symbol = symbol.to_uppercase();
    match validate_symbol(&provider, &symbol) {
        Ok(()) => {
            // validate_symbol guarantees a positive latest price exists.
            let latest = provider.latest_price(&symbol).ok().flatten();
            match latest {
                Some(price) => {
                    println!("{}: latest close {} [OK]", symbol, format_currency(price))
                }
                None => println!("{}: [OK]", symbol),
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_list_symbols(config_path: &PathBuf) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let provider = match build_provider(&config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let symbols = match provider.list_symbols() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if symbols.is_empty() {
        eprintln!("No symbols found");
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
        eprintln!("{} symbols found", symbols.len());
    }
    ExitCode::SUCCESS
}
