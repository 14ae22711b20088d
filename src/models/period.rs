//! Calendar period types shared by fee and payroll records.
//!
//! Months travel over the wire as their English names (`"January"`), which is
//! what the stored fee and salary documents carry.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Month, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// A calendar month, serialized as its full English name.
///
/// # Example
///
/// ```
/// use tuition_engine::models::MonthName;
///
/// let march: MonthName = "March".parse().unwrap();
/// assert_eq!(march.number(), 3);
/// assert_eq!(march.to_string(), "March");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthName(Month);

impl MonthName {
    /// Wraps a chrono month.
    pub fn new(month: Month) -> Self {
        Self(month)
    }

    /// Builds a month from its 1-based number.
    pub fn from_number(number: u32) -> Option<Self> {
        u8::try_from(number)
            .ok()
            .and_then(|n| Month::try_from(n).ok())
            .map(Self)
    }

    /// The month of the given date.
    pub fn of(date: NaiveDate) -> Self {
        // month() is always 1..=12
        Self::from_number(date.month()).unwrap_or(Self(Month::January))
    }

    /// The underlying chrono month.
    pub fn month(&self) -> Month {
        self.0
    }

    /// The 1-based month number.
    pub fn number(&self) -> u32 {
        self.0.number_from_month()
    }

    /// The full English name, e.g. `"January"`.
    pub fn name(&self) -> &'static str {
        self.0.name()
    }
}

impl fmt::Display for MonthName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MonthName {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<Month>()
            .map(Self)
            .map_err(|_| EngineError::validation("month", format!("unknown month '{}'", s)))
    }
}

impl TryFrom<String> for MonthName {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthName> for String {
    fn from(value: MonthName) -> Self {
        value.name().to_string()
    }
}

/// The period a fee payment covers: a calendar month or the one-off admission fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FeeMonth {
    /// A monthly tuition fee.
    Month(MonthName),
    /// The admission fee, collected once.
    Admission,
}

impl FeeMonth {
    /// The literal used on the wire for admission fees.
    pub const ADMISSION: &'static str = "Admission";

    /// The three-letter label used in monthly collection charts.
    pub fn short_label(&self) -> String {
        self.to_string().chars().take(3).collect()
    }
}

impl fmt::Display for FeeMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeeMonth::Month(month) => month.fmt(f),
            FeeMonth::Admission => f.write_str(Self::ADMISSION),
        }
    }
}

impl TryFrom<String> for FeeMonth {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.trim().eq_ignore_ascii_case(Self::ADMISSION) {
            return Ok(FeeMonth::Admission);
        }
        value
            .parse::<MonthName>()
            .map(FeeMonth::Month)
            .map_err(|_| {
                EngineError::validation(
                    "feeMonth",
                    format!("expected a month name or 'Admission', got '{}'", value),
                )
            })
    }
}

impl From<FeeMonth> for String {
    fn from(value: FeeMonth) -> Self {
        value.to_string()
    }
}
