//! Error types for the forecast service

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Result type alias for projection and request handling
pub type Result<T> = std::result::Result<T, ForecastError>;

#[derive(Error, Debug)]
pub enum ForecastError {

    // =============================
    // Client Errors
    // =============================

    #[error("{0}")]
    Validation(String),

    #[error(
        "payment insufficient to cover interest: month {month} accrues {interest:.2} against a payment of {payment:.2}"
    )]
    InsufficientPayment {
        month: u32,
        interest: f64,
        payment: f64,
    },

    // =============================
    // Server Errors
    // =============================

    #[error("{0}")]
    Upstream(String),

    #[error("Configuration error: {0}")]
    Config(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

impl ForecastError {
    pub fn validation(message: impl Into<String>) -> Self {
        ForecastError::Validation(message.into())
    }

    /// HTTP status this error maps to
    pub fn status_code(&self) -> StatusCode {
        match self {
            ForecastError::Validation(_) | ForecastError::InsufficientPayment { .. } => {
                StatusCode::BAD_REQUEST
            }
            ForecastError::Upstream(_)
            | ForecastError::Config(_)
            | ForecastError::Serialization(_)
            | ForecastError::Http(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ForecastError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ForecastError::validation("months must be > 0").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ForecastError::InsufficientPayment {
                month: 1,
                interest: 12.0,
                payment: 10.0,
            }
            .status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ForecastError::Upstream("quota exceeded".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_insufficient_payment_message() {
        let err = ForecastError::InsufficientPayment {
            month: 1,
            interest: 12.0,
            payment: 10.0,
        };
        let message = err.to_string();
        assert!(message.starts_with("payment insufficient to cover interest"));
        assert!(message.contains("12.00"));
    }
}
