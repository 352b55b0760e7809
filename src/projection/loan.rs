//! Loan amortization projection

use tracing::{debug, warn};

use super::{ensure_non_negative, ensure_positive, round_currency, MAX_HORIZON_MONTHS};
use crate::calendar::MonthCalendar;
use crate::error::ForecastError;
use crate::models::{LoanPayoff, LoanPlan, LoanPoint};
use crate::Result;

/// Simulate a fixed-payment loan month by month until it is paid off.
///
/// Interest coverage is checked before every step, so a payment that can
/// never amortize the balance fails instead of looping.
pub fn project_loan_payoff(plan: &LoanPlan, calendar: &MonthCalendar) -> Result<LoanPayoff> {
    ensure_positive("principal", plan.principal)?;
    ensure_non_negative("annualInterestRate", plan.annual_interest_rate)?;
    ensure_positive("monthlyEmi", plan.monthly_payment)?;

    let rate = plan.annual_interest_rate / 12.0;
    let mut balance = plan.principal;
    let mut total_interest = 0.0;
    let mut timeline = Vec::new();

    // Residue below half a cent counts as paid off
    while round_currency(balance) > 0.0 {
        let month = timeline.len() as u32;
        if month >= MAX_HORIZON_MONTHS {
            warn!(
                principal = plan.principal,
                monthly_payment = plan.monthly_payment,
                "Loan not paid off within simulation cap"
            );
            return Err(ForecastError::validation(format!(
                "loan is not paid off within {} months; increase monthlyEmi",
                MAX_HORIZON_MONTHS
            )));
        }

        let interest = balance * rate;
        let principal_paid = plan.monthly_payment - interest;
        if principal_paid <= 0.0 {
            return Err(ForecastError::InsufficientPayment {
                month: month + 1,
                interest,
                payment: plan.monthly_payment,
            });
        }

        total_interest += interest;
        balance -= principal_paid;

        timeline.push(LoanPoint {
            month: calendar.label(month),
            remaining: round_currency(balance.max(0.0)),
        });
    }

    let months_to_payoff = timeline.len() as u32;
    debug!(months_to_payoff, total_interest, "Loan payoff computed");

    Ok(LoanPayoff {
        timeline,
        months_to_payoff,
        total_interest: round_currency(total_interest),
    })
}
