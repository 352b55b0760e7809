//! Projection engine
//!
//! Pure functions turning plan parameters into month-by-month series.
//! No I/O and no shared state: identical plans and calendars always
//! produce identical output.

mod loan;
mod retirement;
mod savings;

pub use loan::project_loan_payoff;
pub use retirement::project_retirement;
pub use savings::project_savings;

use crate::error::ForecastError;
use crate::Result;

/// Longest series any projection will produce (100 years)
pub const MAX_HORIZON_MONTHS: u32 = 1200;

/// Round to currency precision (2 decimal places)
pub fn round_currency(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Equivalent monthly rate for an annually compounded rate
pub fn monthly_rate(annual_rate: f64) -> f64 {
    (1.0 + annual_rate).powf(1.0 / 12.0) - 1.0
}

fn ensure_finite(name: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ForecastError::validation(format!("{} must be a finite number", name)))
    }
}

fn ensure_non_negative(name: &str, value: f64) -> Result<()> {
    ensure_finite(name, value)?;
    if value < 0.0 {
        return Err(ForecastError::validation(format!("{} must be >= 0", name)));
    }
    Ok(())
}

fn ensure_positive(name: &str, value: f64) -> Result<()> {
    ensure_finite(name, value)?;
    if value <= 0.0 {
        return Err(ForecastError::validation(format!("{} must be > 0", name)));
    }
    Ok(())
}

fn ensure_horizon(months: u32) -> Result<()> {
    if months > MAX_HORIZON_MONTHS {
        return Err(ForecastError::validation(format!(
            "months must be <= {}",
            MAX_HORIZON_MONTHS
        )));
    }
    Ok(())
}

/// Annual return rates at or below -100% have no monthly equivalent
fn ensure_return_rate(name: &str, value: f64) -> Result<()> {
    ensure_finite(name, value)?;
    if value <= -1.0 {
        return Err(ForecastError::validation(format!("{} must be > -1", name)));
    }
    Ok(())
}
