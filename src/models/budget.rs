//! This file defines the monthly budget model and the `MonthKey` type that
//! identifies the calendar month a budget applies to.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::{Date, Month};

use crate::{Error, models::DatabaseID};

/// A calendar month in the form `YYYY-MM`, the granularity at which budgets
/// are defined.
///
/// Dates are stored as `YYYY-MM-DD` text (guaranteed by the SQLite date
/// serialization), so a month key is also a valid prefix for date columns.
/// [MonthKey::date_prefix_pattern] produces the `LIKE` pattern the stores
/// use for month filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthKey {
    year: i32,
    month: Month,
}

impl MonthKey {
    /// Create a month key from a year and month.
    pub fn new(year: i32, month: Month) -> Self {
        Self { year, month }
    }

    /// The month key of the month containing `date`.
    pub fn containing(date: Date) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The year of the month key.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The month of the month key.
    pub fn month(&self) -> Month {
        self.month
    }

    /// The `LIKE` pattern matching all `YYYY-MM-DD` dates in this month.
    pub fn date_prefix_pattern(&self) -> String {
        format!("{self}%")
    }
}

impl Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, u8::from(self.month))
    }
}

impl FromStr for MonthKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_error = || Error::InvalidMonthKey(s.to_string());

        let (year_part, month_part) = s.split_once('-').ok_or_else(parse_error)?;

        if year_part.len() != 4 || month_part.len() != 2 {
            return Err(parse_error());
        }

        let year: i32 = year_part.parse().map_err(|_| parse_error())?;
        let month_number: u8 = month_part.parse().map_err(|_| parse_error())?;
        let month = Month::try_from(month_number).map_err(|_| parse_error())?;

        Ok(Self { year, month })
    }
}

impl ToSql for MonthKey {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_string()))
    }
}

impl FromSql for MonthKey {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;

        MonthKey::from_str(text)
            .map_err(|_| FromSqlError::Other(format!("invalid month key {text:?}").into()))
    }
}

/// The spending limit for one calendar month.
///
/// There is at most one budget per [MonthKey]; saving a budget for a month
/// that already has one updates the limit in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    id: DatabaseID,
    month: MonthKey,
    limit: i64,
}

impl Budget {
    /// Create a budget from parts that are already known to be valid, e.g.
    /// a row from the database.
    pub fn new_unchecked(id: DatabaseID, month: MonthKey, limit: i64) -> Self {
        Self { id, month, limit }
    }

    /// The ID of the budget row.
    pub fn id(&self) -> DatabaseID {
        self.id
    }

    /// The month the budget applies to.
    pub fn month(&self) -> MonthKey {
        self.month
    }

    /// The spending limit for the month. Zero is a valid limit.
    pub fn limit(&self) -> i64 {
        self.limit
    }
}

#[cfg(test)]
mod month_key_tests {
    use std::str::FromStr;

    use time::{Month, macros::date};

    use crate::Error;

    use super::MonthKey;

    #[test]
    fn parses_valid_key() {
        let month = MonthKey::from_str("2024-03").unwrap();

        assert_eq!(month, MonthKey::new(2024, Month::March));
    }

    #[test]
    fn rejects_malformed_keys() {
        for input in ["2024", "2024-3", "24-03", "2024-13", "2024-00", "garbage"] {
            let result = MonthKey::from_str(input);

            assert_eq!(
                result,
                Err(Error::InvalidMonthKey(input.to_string())),
                "{input:?} should not parse"
            );
        }
    }

    #[test]
    fn displays_with_zero_padding() {
        let month = MonthKey::new(2024, Month::March);

        assert_eq!(month.to_string(), "2024-03");
    }

    #[test]
    fn prefix_pattern_matches_dates_in_month() {
        let month = MonthKey::new(2024, Month::March);

        assert_eq!(month.date_prefix_pattern(), "2024-03%");
    }

    #[test]
    fn containing_uses_year_and_month_of_date() {
        let month = MonthKey::containing(date!(2024 - 03 - 05));

        assert_eq!(month, MonthKey::new(2024, Month::March));
    }
}
