//! Personal Finance Forecast Service
//!
//! A small HTTP backend that:
//! - Projects savings growth month by month
//! - Simulates loan payoff under a fixed EMI
//! - Accumulates a retirement corpus until a target age
//! - Scores a monthly financial snapshot
//! - Forwards financial context to Gemini for a narrative summary
//!
//! DATA FLOW:
//! REQUEST → COERCE → PROJECT → SERIALIZE → RESPONSE

pub mod analysis;
pub mod api;
pub mod calendar;
pub mod config;
pub mod error;
pub mod gemini;
pub mod metrics;
pub mod models;
pub mod projection;
pub mod request;

pub use error::{ForecastError, Result};

// Re-export common types
pub use calendar::MonthCalendar;
pub use models::*;
