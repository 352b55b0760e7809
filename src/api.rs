//! REST API server for the forecast service
//!
//! Exposes the projection engine and the analyze collaborator over HTTP.
//! Every handler is stateless apart from the shared read-only config.

use axum::{
    body::Bytes,
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::analysis::{self, AnalysisRequest, TextGenerator};
use crate::calendar::MonthCalendar;
use crate::config::Config;
use crate::error::ForecastError;
use crate::metrics;
use crate::models::{FinancialSnapshot, LoanPlan, RetirementHorizon, RetirementPlan, SavingsPlan};
use crate::projection;
use crate::request::{to_u32, Payload};
use crate::Result;

/// =============================
/// Request Defaults
/// =============================

const DEFAULT_FORECAST_MONTHS: i64 = 120;
const DEFAULT_CURRENT_AGE: i64 = 30;
const DEFAULT_RETIREMENT_AGE: i64 = 60;
const DEFAULT_ANNUAL_RETURN: f64 = 0.08;

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct ApiState {
    pub config: Arc<Config>,
    pub generator: Arc<dyn TextGenerator>,
}

impl ApiState {
    pub fn new(config: Config, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            config: Arc::new(config),
            generator,
        }
    }

    /// Request override first, then configured anchor, then today
    fn calendar_for(&self, payload: &Payload) -> Result<MonthCalendar> {
        Ok(payload
            .start_month()?
            .unwrap_or_else(|| self.config.calendar()))
    }
}

/// =============================
/// Health Endpoints
/// =============================

async fn health(State(state): State<ApiState>) -> Json<Value> {
    Json(json!({
        "ok": true,
        "model": state.config.model_id,
    }))
}

async fn list_models(State(state): State<ApiState>) -> Result<Json<Value>> {
    let models = state.generator.list_models().await?;
    Ok(Json(json!({ "available_models": models })))
}

/// =============================
/// Projection Endpoints
/// =============================

async fn forecast(State(state): State<ApiState>, body: Bytes) -> Result<Json<Value>> {
    let payload = Payload::from_bytes(&body)?;

    let monthly_saving = payload.number_or("monthlySaving", 0.0)?;
    let months = payload.integer_or("months", DEFAULT_FORECAST_MONTHS)?;

    if monthly_saving < 0.0 {
        return Err(ForecastError::validation("monthlySaving must be >= 0"));
    }
    if months <= 0 {
        return Err(ForecastError::validation("months must be > 0"));
    }

    let plan = SavingsPlan {
        monthly_contribution: monthly_saving,
        horizon_months: to_u32("months", months)?,
        annual_return_rate: payload.number_or("annualReturnRate", 0.0)?,
        initial_savings: payload.number_or("initialSavings", 0.0)?,
    };
    let calendar = state.calendar_for(&payload)?;

    info!(
        months = plan.horizon_months,
        annual_return_rate = plan.annual_return_rate,
        "Savings forecast requested"
    );

    let series = projection::project_savings(&plan, &calendar)?;
    Ok(Json(json!({ "series": series })))
}

async fn loan_payoff(State(state): State<ApiState>, body: Bytes) -> Result<Json<Value>> {
    let payload = Payload::from_bytes(&body)?;

    let plan = LoanPlan {
        principal: payload.require_number("principal")?,
        annual_interest_rate: payload.require_number("annualInterestRate")?,
        monthly_payment: payload.require_number("monthlyEmi")?,
    };
    let calendar = state.calendar_for(&payload)?;

    info!(
        annual_interest_rate = plan.annual_interest_rate,
        "Loan payoff requested"
    );

    let payoff = projection::project_loan_payoff(&plan, &calendar).map_err(|e| {
        warn!(error = %e, "Loan payoff rejected");
        e
    })?;

    Ok(Json(serde_json::to_value(payoff)?))
}

async fn retirement(State(state): State<ApiState>, body: Bytes) -> Result<Json<Value>> {
    let payload = Payload::from_bytes(&body)?;

    let current_age = to_u32(
        "currentAge",
        payload.integer_or("currentAge", DEFAULT_CURRENT_AGE)?,
    )?;

    let horizon = if payload.contains("months") {
        let months = payload.integer_or("months", 0)?;
        if months <= 0 {
            return Err(ForecastError::validation("months must be > 0"));
        }
        RetirementHorizon::Months(to_u32("months", months)?)
    } else {
        RetirementHorizon::UntilAge(to_u32(
            "retirementAge",
            payload.integer_or("retirementAge", DEFAULT_RETIREMENT_AGE)?,
        )?)
    };

    let plan = RetirementPlan {
        current_age,
        horizon,
        current_savings: payload.number_or("currentSavings", 0.0)?,
        monthly_contribution: payload.number_or("monthlyContribution", 0.0)?,
        annual_return_rate: payload
            .number_from_any(&["annualReturnRate", "annualReturn"], DEFAULT_ANNUAL_RETURN)?,
    };
    let calendar = state.calendar_for(&payload)?;

    info!(current_age, horizon = ?plan.horizon, "Retirement projection requested");

    let corpus = projection::project_retirement(&plan, &calendar)?;
    Ok(Json(serde_json::to_value(corpus)?))
}

async fn health_metrics(body: Bytes) -> Result<Json<Value>> {
    let payload = Payload::from_bytes(&body)?;

    let snapshot = FinancialSnapshot {
        monthly_income: payload.number_or("monthlyIncome", 0.0)?,
        monthly_expenses: payload.number_or("monthlyExpenses", 0.0)?,
        assets: payload.number_or("assets", 0.0)?,
        liabilities: payload.number_or("liabilities", 0.0)?,
    };

    let report = metrics::assess(&snapshot)?;
    Ok(Json(serde_json::to_value(report)?))
}

/// =============================
/// Analyze Endpoint
/// =============================

async fn analyze(State(state): State<ApiState>, body: Bytes) -> Result<Json<Value>> {
    let payload = Payload::from_bytes(&body)?;
    let request = AnalysisRequest::new(payload.optional_str("prompt")?, payload.optional_value("context"))?;

    let result = analysis::analyze(state.generator.as_ref(), &request)
        .await
        .map_err(|e| {
            warn!(error = %e, "Analysis failed");
            e
        })?;

    Ok(Json(json!({ "result": result })))
}

/// =============================
/// Router
/// =============================

pub fn create_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/list-models", get(list_models))
        .route("/forecast", post(forecast))
        .route("/loan-payoff", post(loan_payoff))
        .route("/retirement", post(retirement))
        .route("/metrics", post(health_metrics))
        .route("/analyze", post(analyze))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(
    state: ApiState,
    port: u16,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("API Server listening on http://0.0.0.0:{}", port);
    info!("Local: http://127.0.0.1:{}", port);

    axum::serve(listener, router).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use tower::ServiceExt;

    /// Generator stub: fails when the prompt mentions "fail"
    struct StubGenerator;

    #[async_trait::async_trait]
    impl TextGenerator for StubGenerator {
        fn model_id(&self) -> &str {
            "stub-model"
        }

        async fn generate(&self, prompt: &str) -> Result<String> {
            if prompt.contains("fail") {
                return Err(ForecastError::Upstream("quota exceeded".to_string()));
            }
            Ok(format!("  summary of {} chars \n", prompt.len()))
        }

        async fn list_models(&self) -> Result<Vec<String>> {
            Err(ForecastError::Upstream("API key not valid".to_string()))
        }
    }

    fn router() -> Router {
        let config = Config {
            model_id: "test-model".to_string(),
            start_month: Some(MonthCalendar::new(2024, 1).unwrap()),
            ..Config::default()
        };
        create_router(ApiState::new(config, Arc::new(StubGenerator)))
    }

    async fn send(method: Method, uri: &str, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    async fn post_json(uri: &str, body: &str) -> (StatusCode, Value) {
        send(Method::POST, uri, body).await
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(Method::GET, "/health", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "ok": true, "model": "test-model" }));
    }

    #[tokio::test]
    async fn test_forecast_defaults() {
        let (status, body) = post_json("/forecast", "").await;
        assert_eq!(status, StatusCode::OK);

        let series = body["series"].as_array().unwrap();
        assert_eq!(series.len(), 120);
        assert_eq!(series[0], json!({ "period": "2024-01", "value": 0.0 }));
    }

    #[tokio::test]
    async fn test_forecast_with_rate_and_start_month() {
        let (status, body) = post_json(
            "/forecast",
            r#"{"monthlySaving": "1000", "months": 12, "annualReturnRate": 0.05, "startMonth": "2030-06"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let series = body["series"].as_array().unwrap();
        assert_eq!(series.len(), 12);
        assert_eq!(series[0]["period"], "2030-06");
        assert_eq!(series[11]["period"], "2031-05");
        assert!(series[11]["value"].as_f64().unwrap() > 12_000.0);
    }

    #[tokio::test]
    async fn test_forecast_validation() {
        let (status, body) = post_json("/forecast", r#"{"monthlySaving": -5}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "monthlySaving must be >= 0");

        let (status, _) = post_json("/forecast", r#"{"months": 0}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = post_json("/forecast", r#"{"months": "ten"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = post_json("/forecast", "{broken").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_loan_payoff() {
        let (status, body) = post_json(
            "/loan-payoff",
            r#"{"principal": 1200, "annualInterestRate": 0.12, "monthlyEmi": 110}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let timeline = body["timeline"].as_array().unwrap();
        assert_eq!(timeline.len(), 12);
        assert_eq!(timeline[0], json!({ "month": "2024-01", "remaining": 1102.0 }));
        assert_eq!(timeline[11]["remaining"], 0.0);
        assert_eq!(body["monthsToPayoff"], 12);
    }

    #[tokio::test]
    async fn test_loan_payoff_insufficient_emi() {
        let (status, body) = post_json(
            "/loan-payoff",
            r#"{"principal": 1200, "annualInterestRate": 0.12, "monthlyEmi": 12}"#,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("payment insufficient to cover interest"));
        assert!(body.get("timeline").is_none());
    }

    #[tokio::test]
    async fn test_loan_payoff_missing_field() {
        let (status, body) =
            post_json("/loan-payoff", r#"{"principal": 1200, "monthlyEmi": 110}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "'annualInterestRate' is required");
    }

    #[tokio::test]
    async fn test_retirement_defaults() {
        let (status, body) = post_json("/retirement", r#"{"monthlyContribution": 500}"#).await;
        assert_eq!(status, StatusCode::OK);

        assert_eq!(body["months"], 360);
        assert_eq!(body["series"].as_array().unwrap().len(), 360);
        assert!(body["corpus"].as_f64().unwrap() > 180_000.0);
        assert_eq!(body["totalContributions"], 180_000.0);
    }

    #[tokio::test]
    async fn test_retirement_alias_and_months() {
        let (status, body) = post_json(
            "/retirement",
            r#"{"currentSavings": 1000, "annualReturn": 0.0, "months": 6}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["corpus"], 1000.0);
        assert_eq!(body["series"].as_array().unwrap().len(), 6);
    }

    #[tokio::test]
    async fn test_retirement_invalid_ages() {
        let (status, body) =
            post_json("/retirement", r#"{"currentAge": 60, "retirementAge": 55}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("retirementAge"));

        let (status, _) = post_json("/retirement", r#"{"currentAge": -3}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_retirement_age_gap_overflow() {
        let (status, body) =
            post_json("/retirement", r#"{"currentAge": 0, "retirementAge": 357913942}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("retirementAge"));
        assert!(body.get("series").is_none());
    }

    #[tokio::test]
    async fn test_start_month_too_late_rejected() {
        let (status, body) = post_json(
            "/forecast",
            r#"{"monthlySaving": 100, "months": 12, "startMonth": "262142-06"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("262142-06"));
    }

    #[tokio::test]
    async fn test_metrics() {
        let (status, body) = post_json(
            "/metrics",
            r#"{"monthlyIncome": 50000, "monthlyExpenses": 30000, "assets": 200000, "liabilities": 10000}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["healthScore"], 100);
        assert_eq!(body["savingsRate"], 40.0);
    }

    #[tokio::test]
    async fn test_analyze() {
        let (status, body) = post_json(
            "/analyze",
            r#"{"prompt": "How am I doing?", "context": {"assets": 10}}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let result = body["result"].as_str().unwrap();
        assert!(result.starts_with("summary of"));
        assert!(!result.ends_with('\n'));
    }

    #[tokio::test]
    async fn test_analyze_requires_input() {
        let (status, body) = post_json("/analyze", r#"{"prompt": "  ", "context": {}}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Provide 'prompt' or 'context'");
    }

    #[tokio::test]
    async fn test_analyze_upstream_failure() {
        let (status, body) = post_json("/analyze", r#"{"prompt": "please fail"}"#).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "quota exceeded" }));
    }

    #[tokio::test]
    async fn test_health_ignores_collaborator_failure() {
        let (status, _) = send(Method::GET, "/list-models", "").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let (status, body) = send(Method::GET, "/health", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
    }
}
