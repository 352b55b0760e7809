//! Financial health scoring
//!
//! Rules-based score over a monthly income/expense snapshot.
//! Deterministic, no LLM involved.

use crate::error::ForecastError;
use crate::models::{FinancialSnapshot, HealthReport};
use crate::projection::round_currency;
use crate::Result;

/// Incomes below this are flagged as low
const LOW_INCOME_THRESHOLD: f64 = 20_000.0;

/// A single scoring rule: penalty applied and advice given when it trips
struct HealthRule {
    penalty: i32,
    advice: &'static str,
    trips: fn(&Ratios) -> bool,
}

struct Ratios {
    income: f64,
    net_worth: f64,
    savings_rate: f64,
    debt_ratio: f64,
    emi_burden: f64,
}

const RULES: &[HealthRule] = &[
    HealthRule {
        penalty: 20,
        advice: "Increase savings to at least 10% of your income.",
        trips: |r| r.savings_rate < 0.1,
    },
    HealthRule {
        penalty: 20,
        advice: "Reduce liabilities to improve debt-to-asset ratio.",
        trips: |r| r.debt_ratio > 0.5,
    },
    HealthRule {
        penalty: 20,
        advice: "EMI burden is high. Consider refinancing or repaying loans early.",
        trips: |r| r.emi_burden > 0.4,
    },
    HealthRule {
        penalty: 20,
        advice: "Net worth is negative. Focus on reducing debt and increasing assets.",
        trips: |r| r.net_worth < 0.0,
    },
    HealthRule {
        penalty: 10,
        advice: "Consider upskilling or seeking higher-paying opportunities.",
        trips: |r| r.income < LOW_INCOME_THRESHOLD,
    },
];

/// Score a snapshot and collect suggested changes
pub fn assess(snapshot: &FinancialSnapshot) -> Result<HealthReport> {
    for (name, value) in [
        ("monthlyIncome", snapshot.monthly_income),
        ("monthlyExpenses", snapshot.monthly_expenses),
        ("assets", snapshot.assets),
        ("liabilities", snapshot.liabilities),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(ForecastError::validation(format!(
                "{} must be a non-negative number",
                name
            )));
        }
    }

    let income = snapshot.monthly_income;
    let savings = income - snapshot.monthly_expenses;

    let ratios = Ratios {
        income,
        net_worth: snapshot.assets - snapshot.liabilities,
        savings_rate: if income > 0.0 { savings / income } else { 0.0 },
        debt_ratio: if snapshot.assets > 0.0 {
            snapshot.liabilities / snapshot.assets
        } else {
            1.0
        },
        emi_burden: if income > 0.0 {
            snapshot.liabilities / income
        } else {
            1.0
        },
    };

    let mut score: i32 = 100;
    let mut suggested_changes = Vec::new();

    for rule in RULES {
        if (rule.trips)(&ratios) {
            score -= rule.penalty;
            suggested_changes.push(rule.advice.to_string());
        }
    }

    let summary = if savings > 0.0 {
        "You're saving money. Keep going!"
    } else {
        "You're overspending. Reduce your expenses."
    };

    Ok(HealthReport {
        health_score: score.clamp(0, 100) as u8,
        debt_to_asset_ratio: round_currency(ratios.debt_ratio * 100.0),
        monthly_burn: snapshot.monthly_expenses,
        net_worth: ratios.net_worth,
        savings_rate: round_currency(ratios.savings_rate * 100.0),
        suggested_changes,
        summary: summary.to_string(),
    })
}
