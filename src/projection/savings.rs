//! Savings growth projection

use tracing::debug;

use super::{ensure_horizon, ensure_non_negative, ensure_return_rate, monthly_rate, round_currency};
use crate::calendar::MonthCalendar;
use crate::models::{ForecastPoint, SavingsPlan};
use crate::Result;

/// Accumulated savings at the end of each month.
///
/// Each month the contribution is deposited and the balance then grows by
/// the monthly equivalent of `annual_return_rate`. A zero rate reduces to
/// linear accumulation; a zero horizon yields an empty series.
pub fn project_savings(plan: &SavingsPlan, calendar: &MonthCalendar) -> Result<Vec<ForecastPoint>> {
    ensure_horizon(plan.horizon_months)?;
    ensure_non_negative("monthlySaving", plan.monthly_contribution)?;
    ensure_non_negative("initialSavings", plan.initial_savings)?;
    ensure_return_rate("annualReturnRate", plan.annual_return_rate)?;

    let rate = monthly_rate(plan.annual_return_rate);
    let mut balance = plan.initial_savings;

    let series: Vec<ForecastPoint> = (0..plan.horizon_months)
        .map(|month| {
            balance = (balance + plan.monthly_contribution) * (1.0 + rate);
            ForecastPoint {
                period: calendar.label(month),
                value: round_currency(balance),
            }
        })
        .collect();

    debug!(
        months = plan.horizon_months,
        final_value = series.last().map(|p| p.value).unwrap_or(plan.initial_savings),
        "Savings projection computed"
    );

    Ok(series)
}
