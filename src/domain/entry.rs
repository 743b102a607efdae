//! Ledger entries as delivered by the wallet backend.

use std::{fmt, num::ParseIntError, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::common::Displayable;

/// Identifier assigned to an entry by the remote source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub i64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntryId {
    type Err = ParseIntError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        value.trim().trim_start_matches('#').parse().map(EntryId)
    }
}

impl From<i64> for EntryId {
    fn from(value: i64) -> Self {
        EntryId(value)
    }
}

/// One income/expense record.
///
/// Amounts are whole currency units and can never be negative; a negative
/// amount on the wire fails deserialization and surfaces as malformed data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub id: EntryId,
    pub date: NaiveDate,
    pub category: String,
    /// Where the money was spent or received.
    pub title: String,
    #[serde(default)]
    pub income: u64,
    #[serde(default)]
    pub expense: u64,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

impl LedgerEntry {
    pub fn new(
        id: impl Into<EntryId>,
        date: NaiveDate,
        category: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            date,
            category: category.into(),
            title: title.into(),
            income: 0,
            expense: 0,
            payment_method: String::new(),
            memo: None,
        }
    }

    pub fn with_income(mut self, amount: u64) -> Self {
        self.income = amount;
        self
    }

    pub fn with_expense(mut self, amount: u64) -> Self {
        self.expense = amount;
        self
    }

    pub fn with_payment_method(mut self, method: impl Into<String>) -> Self {
        self.payment_method = method.into();
        self
    }

    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }
}

impl Displayable for LedgerEntry {
    fn display_label(&self) -> String {
        format!(
            "#{} {} [{}] {}",
            self.id,
            self.date.format("%Y-%m-%d"),
            self.category,
            self.title
        )
    }
}
