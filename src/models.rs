//! Core data models for the projection engine

use serde::{Deserialize, Serialize};

//
// ================= Plans =================
//

/// Constant monthly saving with an optional compounding return
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsPlan {
    pub monthly_contribution: f64,
    pub horizon_months: u32,
    pub annual_return_rate: f64,
    pub initial_savings: f64,
}

impl SavingsPlan {
    /// Linear accumulation with no starting balance
    pub fn linear(monthly_contribution: f64, horizon_months: u32) -> Self {
        Self {
            monthly_contribution,
            horizon_months,
            annual_return_rate: 0.0,
            initial_savings: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanPlan {
    pub principal: f64,
    pub annual_interest_rate: f64,
    pub monthly_payment: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RetirementHorizon {
    /// Accumulate until the given age
    UntilAge(u32),
    /// Accumulate for an explicit number of months
    Months(u32),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetirementPlan {
    pub current_age: u32,
    pub horizon: RetirementHorizon,
    pub current_savings: f64,
    pub monthly_contribution: f64,
    pub annual_return_rate: f64,
}

//
// ================= Series Points =================
//

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub period: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanPoint {
    pub month: String,
    pub remaining: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusPoint {
    pub month: String,
    pub corpus: f64,
}

//
// ================= Projection Results =================
//

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanPayoff {
    pub timeline: Vec<LoanPoint>,
    pub months_to_payoff: u32,
    pub total_interest: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetirementProjection {
    pub corpus: f64,
    pub months: u32,
    pub total_contributions: f64,
    pub series: Vec<CorpusPoint>,
}

//
// ================= Health Metrics =================
//

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSnapshot {
    pub monthly_income: f64,
    pub monthly_expenses: f64,
    pub assets: f64,
    pub liabilities: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub health_score: u8,
    /// Liabilities as a percentage of assets
    pub debt_to_asset_ratio: f64,
    pub monthly_burn: f64,
    pub net_worth: f64,
    /// Savings as a percentage of income
    pub savings_rate: f64,
    pub suggested_changes: Vec<String>,
    pub summary: String,
}
