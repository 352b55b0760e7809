use finance_forecast_server::{
    config::Config,
    projection::{project_loan_payoff, project_retirement, project_savings},
    LoanPlan, RetirementHorizon, RetirementPlan, SavingsPlan,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Runs the three projections on sample inputs and prints a summary
fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .init();

    dotenv::dotenv().ok();
    let calendar = Config::from_env()?.calendar();

    info!(anchor = %calendar.anchor(), "Running sample projections");

    let savings = project_savings(
        &SavingsPlan {
            monthly_contribution: 500.0,
            horizon_months: 120,
            annual_return_rate: 0.06,
            initial_savings: 0.0,
        },
        &calendar,
    )?;

    let loan = project_loan_payoff(
        &LoanPlan {
            principal: 250_000.0,
            annual_interest_rate: 0.09,
            monthly_payment: 3_200.0,
        },
        &calendar,
    )?;

    let retirement = project_retirement(
        &RetirementPlan {
            current_age: 30,
            horizon: RetirementHorizon::UntilAge(60),
            current_savings: 10_000.0,
            monthly_contribution: 500.0,
            annual_return_rate: 0.08,
        },
        &calendar,
    )?;

    println!("\n=== SAVINGS (10 years, 6%) ===");
    if let Some(last) = savings.last() {
        println!("{}: {:.2}", last.period, last.value);
    }

    println!("\n=== LOAN PAYOFF ===");
    println!("Months to payoff: {}", loan.months_to_payoff);
    println!("Total interest:   {:.2}", loan.total_interest);
    if let Some(last) = loan.timeline.last() {
        println!("Paid off in:      {}", last.month);
    }

    println!("\n=== RETIREMENT (30 → 60, 8%) ===");
    println!("Contributions: {:.2}", retirement.total_contributions);
    println!("Corpus:        {:.2}", retirement.corpus);

    Ok(())
}
