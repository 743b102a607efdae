//! Display helpers for amounts and dates.

use chrono::{Datelike, NaiveDate};

/// Groups digits in threes: `1234567` -> `1,234,567`.
pub fn with_commas(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Signed variant of [`with_commas`].
pub fn signed_with_commas(value: i128) -> String {
    let grouped = with_commas(u64::try_from(value.unsigned_abs()).unwrap_or(u64::MAX));
    if value < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

pub fn amount(value: u64, suffix: &str) -> String {
    if suffix.is_empty() {
        with_commas(value)
    } else {
        format!("{} {}", with_commas(value), suffix)
    }
}

/// `2024년 5월 3일`
pub fn long_date(date: NaiveDate) -> String {
    format!("{}년 {}월 {}일", date.year(), date.month(), date.day())
}
