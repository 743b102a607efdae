//! Calendar month arithmetic used for ledger navigation.

use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A calendar month. Construction always normalises by calendar rollover, so
/// month 0 is December of the previous year and month 13 is January of the
/// next one. Serialised as `YYYY-MM` and parsed back through [`FromStr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth {
    year: i32,
    month: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid month `{0}` (use YYYY-MM)")]
pub struct ParseYearMonthError(String);

impl YearMonth {
    pub fn new(year: i32, month: i32) -> Self {
        Self::from_index(i64::from(year) * 12 + i64::from(month) - 1)
    }

    /// The month containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// 1-based month number.
    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn offset(self, months: i32) -> Self {
        Self::from_index(self.index() + i64::from(months))
    }

    pub fn pred(self) -> Self {
        self.offset(-1)
    }

    pub fn succ(self) -> Self {
        self.offset(1)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Heading caption in the wallet page's format, e.g. `2024년 5월`.
    pub fn label(&self) -> String {
        format!("{}년 {}월", self.year, self.month)
    }

    fn index(&self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month) - 1
    }

    fn from_index(index: i64) -> Self {
        Self {
            year: index.div_euclid(12) as i32,
            month: index.rem_euclid(12) as u32 + 1,
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = ParseYearMonthError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseYearMonthError(value.to_string());
        let (year, month) = value.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&month) {
            return Err(invalid());
        }
        Ok(Self { year, month })
    }
}

impl TryFrom<String> for YearMonth {
    type Error = ParseYearMonthError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<YearMonth> for String {
    fn from(month: YearMonth) -> Self {
        month.to_string()
    }
}
