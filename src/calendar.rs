//! Month labeling for projected series
//!
//! Every series is anchored at a calendar month; point `i` is labeled
//! `i` months after the anchor in `YYYY-MM` form.

use chrono::{Datelike, Months, NaiveDate, Utc};

use crate::error::ForecastError;
use crate::projection::MAX_HORIZON_MONTHS;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthCalendar {
    anchor: NaiveDate,
}

impl MonthCalendar {
    /// Anchor at the first day of the given month.
    ///
    /// The anchor must leave room for a full `MAX_HORIZON_MONTHS` series.
    pub fn new(year: i32, month: u32) -> Result<Self> {
        let anchor = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            ForecastError::validation(format!("invalid calendar month {}-{:02}", year, month))
        })?;

        if anchor
            .checked_add_months(Months::new(MAX_HORIZON_MONTHS))
            .is_none()
        {
            return Err(ForecastError::validation(format!(
                "calendar month {}-{:02} is too late to label a {}-month series",
                year, month, MAX_HORIZON_MONTHS
            )));
        }

        Ok(Self { anchor })
    }

    /// Anchor at the current UTC month
    pub fn current() -> Self {
        let today = Utc::now().date_naive();
        Self {
            anchor: today.with_day(1).unwrap_or(today),
        }
    }

    /// Parse a `YYYY-MM` label
    pub fn parse(label: &str) -> Result<Self> {
        let invalid = || {
            ForecastError::validation(format!(
                "'{}' is not a valid month, expected YYYY-MM",
                label
            ))
        };

        let (year, month) = label.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;

        Self::new(year, month).map_err(|_| invalid())
    }

    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    /// Label for the month `offset` months after the anchor.
    /// Exact for every offset up to `MAX_HORIZON_MONTHS`.
    pub fn label(&self, offset: u32) -> String {
        self.anchor
            .checked_add_months(Months::new(offset))
            .unwrap_or(NaiveDate::MAX)
            .format("%Y-%m")
            .to_string()
    }
}
