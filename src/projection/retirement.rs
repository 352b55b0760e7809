//! Retirement corpus accumulation

use tracing::debug;

use super::{ensure_horizon, ensure_non_negative, ensure_return_rate, monthly_rate, round_currency};
use crate::calendar::MonthCalendar;
use crate::error::ForecastError;
use crate::models::{CorpusPoint, RetirementHorizon, RetirementPlan, RetirementProjection};
use crate::Result;

impl RetirementPlan {
    /// Number of months to accumulate, validated against the plan's ages
    pub fn horizon_months(&self) -> Result<u32> {
        match self.horizon {
            RetirementHorizon::UntilAge(retirement_age) => {
                if retirement_age <= self.current_age {
                    return Err(ForecastError::validation(format!(
                        "retirementAge ({}) must be greater than currentAge ({})",
                        retirement_age, self.current_age
                    )));
                }
                (retirement_age - self.current_age)
                    .checked_mul(12)
                    .ok_or_else(|| {
                        ForecastError::validation(format!(
                            "retirementAge ({}) is too far past currentAge ({})",
                            retirement_age, self.current_age
                        ))
                    })
            }
            RetirementHorizon::Months(0) => Err(ForecastError::validation("months must be > 0")),
            RetirementHorizon::Months(months) => Ok(months),
        }
    }
}

/// Grow current savings plus a monthly contribution until retirement.
///
/// The contribution is added at the start of each month and the balance
/// then compounds at the monthly equivalent of `annual_return_rate`.
pub fn project_retirement(
    plan: &RetirementPlan,
    calendar: &MonthCalendar,
) -> Result<RetirementProjection> {
    let months = plan.horizon_months()?;
    ensure_horizon(months)?;
    ensure_non_negative("currentSavings", plan.current_savings)?;
    ensure_non_negative("monthlyContribution", plan.monthly_contribution)?;
    ensure_return_rate("annualReturnRate", plan.annual_return_rate)?;

    let rate = monthly_rate(plan.annual_return_rate);
    let mut balance = plan.current_savings;
    let mut series = Vec::with_capacity(months as usize);

    for month in 0..months {
        balance = (balance + plan.monthly_contribution) * (1.0 + rate);
        series.push(CorpusPoint {
            month: calendar.label(month),
            corpus: round_currency(balance),
        });
    }

    let total_contributions = plan.current_savings + plan.monthly_contribution * months as f64;
    debug!(months, corpus = balance, "Retirement corpus computed");

    Ok(RetirementProjection {
        corpus: round_currency(balance),
        months,
        total_contributions: round_currency(total_contributions),
        series,
    })
}
