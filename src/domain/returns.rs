//! Date parsing and return-annualization helpers.

use chrono::NaiveDate;

use super::error::StockfolioError;

/// Floor on a holding period, in years (about one day). Keeps same-day
/// windows from blowing up the annualization exponent.
pub const MIN_YEARS: f64 = 0.003;

const DAYS_PER_YEAR: f64 = 365.25;

/// Parse an ISO `YYYY-MM-DD` date string.
pub fn parse_date(input: &str) -> Result<NaiveDate, StockfolioError> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| StockfolioError::InvalidDate {
        input: input.to_string(),
    })
}

/// Holding period between two dates in years, floored at [`MIN_YEARS`].
pub fn years_between(start: NaiveDate, end: NaiveDate) -> f64 {
    ((end - start).num_days() as f64 / DAYS_PER_YEAR).max(MIN_YEARS)
}

/// Compound growth rate that reproduces `total_return` over `years`.
///
/// Callers in this crate always pass `years > 0` (guaranteed by the
/// [`years_between`] floor); non-positive `years` falls back to the
/// unadjusted total return.
pub fn annualized_return(total_return: f64, years: f64) -> f64 {
    if years > 0.0 {
        (1.0 + total_return).powf(1.0 / years) - 1.0
    } else {
        total_return
    }
}
