//! Request payload coercion
//!
//! Bodies are read as loose JSON objects. Numeric fields accept numbers or
//! numeric strings; anything else is a validation error naming the field.

use serde_json::{Map, Value};

use crate::calendar::MonthCalendar;
use crate::error::ForecastError;
use crate::Result;

#[derive(Debug, Clone, Default)]
pub struct Payload {
    fields: Map<String, Value>,
}

impl Payload {
    /// Parse a raw body. An empty body is an empty object.
    pub fn from_bytes(body: &[u8]) -> Result<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        let value: Value = serde_json::from_slice(body)
            .map_err(|e| ForecastError::validation(format!("Invalid JSON body: {}", e)))?;

        match value {
            Value::Object(fields) => Ok(Self { fields }),
            Value::Null => Ok(Self::default()),
            _ => Err(ForecastError::validation("Request body must be a JSON object")),
        }
    }

    /// Field value, treating explicit `null` as absent
    fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key).filter(|v| !v.is_null())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn optional_number(&self, key: &str) -> Result<Option<f64>> {
        self.get(key).map(|value| coerce_number(key, value)).transpose()
    }

    pub fn number_or(&self, key: &str, default: f64) -> Result<f64> {
        Ok(self.optional_number(key)?.unwrap_or(default))
    }

    pub fn require_number(&self, key: &str) -> Result<f64> {
        self.optional_number(key)?
            .ok_or_else(|| ForecastError::validation(format!("'{}' is required", key)))
    }

    /// First present key among aliases
    pub fn number_from_any(&self, keys: &[&str], default: f64) -> Result<f64> {
        for key in keys {
            if let Some(value) = self.optional_number(key)? {
                return Ok(value);
            }
        }
        Ok(default)
    }

    /// Signed integer field; fractional values are rejected
    pub fn integer_or(&self, key: &str, default: i64) -> Result<i64> {
        match self.optional_number(key)? {
            None => Ok(default),
            Some(value) if value.fract() != 0.0 => Err(ForecastError::validation(format!(
                "'{}' must be a whole number",
                key
            ))),
            Some(value) if value.abs() >= i64::MAX as f64 => Err(ForecastError::validation(format!(
                "'{}' is out of range",
                key
            ))),
            Some(value) => Ok(value as i64),
        }
    }

    pub fn optional_str(&self, key: &str) -> Result<Option<&str>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(_) => Err(ForecastError::validation(format!("'{}' must be a string", key))),
        }
    }

    pub fn optional_value(&self, key: &str) -> Option<Value> {
        self.get(key).cloned()
    }

    /// Per-request calendar override via `startMonth`
    pub fn start_month(&self) -> Result<Option<MonthCalendar>> {
        self.optional_str("startMonth")?
            .map(MonthCalendar::parse)
            .transpose()
    }
}

fn coerce_number(key: &str, value: &Value) -> Result<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match number {
        Some(n) if n.is_finite() => Ok(n),
        _ => Err(ForecastError::validation(format!(
            "'{}' must be a number",
            key
        ))),
    }
}

/// Narrow a signed integer to a non-negative `u32`
pub fn to_u32(key: &str, value: i64) -> Result<u32> {
    u32::try_from(value).map_err(|_| {
        ForecastError::validation(format!("'{}' must be between 0 and {}", key, u32::MAX))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(json: &str) -> Payload {
        Payload::from_bytes(json.as_bytes()).unwrap()
    }

    #[test]
    fn test_empty_body_is_empty_object() {
        let p = Payload::from_bytes(b"").unwrap();
        assert_eq!(p.number_or("months", 120.0).unwrap(), 120.0);

        let p = Payload::from_bytes(b"null").unwrap();
        assert!(!p.contains("months"));
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(Payload::from_bytes(b"[1, 2]").is_err());
        assert!(Payload::from_bytes(b"{not json").is_err());
    }

    #[test]
    fn test_numeric_strings_coerced() {
        let p = payload(r#"{"principal": "1200.5", "months": 24, "rate": null}"#);
        assert_eq!(p.require_number("principal").unwrap(), 1200.5);
        assert_eq!(p.integer_or("months", 0).unwrap(), 24);
        assert_eq!(p.number_or("rate", 0.1).unwrap(), 0.1);
    }

    #[test]
    fn test_bad_values_rejected() {
        let p = payload(r#"{"principal": "lots", "months": 1.5, "flag": true}"#);
        assert!(p.require_number("principal").is_err());
        assert!(p.integer_or("months", 0).is_err());
        assert!(p.require_number("flag").is_err());
        assert!(p.require_number("missing").is_err());
    }

    #[test]
    fn test_huge_integer_out_of_range() {
        let p = payload(r#"{"months": 1e300, "age": 30.5}"#);
        let err = p.integer_or("months", 0).unwrap_err();
        assert_eq!(err.to_string(), "'months' is out of range");

        let err = p.integer_or("age", 0).unwrap_err();
        assert_eq!(err.to_string(), "'age' must be a whole number");
    }

    #[test]
    fn test_aliases() {
        let p = payload(r#"{"annualReturn": 0.06}"#);
        assert_eq!(
            p.number_from_any(&["annualReturnRate", "annualReturn"], 0.08).unwrap(),
            0.06
        );
        let p = payload("{}");
        assert_eq!(
            p.number_from_any(&["annualReturnRate", "annualReturn"], 0.08).unwrap(),
            0.08
        );
    }

    #[test]
    fn test_to_u32() {
        assert_eq!(to_u32("months", 12).unwrap(), 12);
        assert!(to_u32("months", -1).is_err());
    }
}
