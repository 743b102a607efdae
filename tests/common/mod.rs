#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use tempfile::TempDir;
use wallet_core::{
    core::{FixedClock, LedgerViewModel},
    domain::LedgerEntry,
    source::JsonBackend,
};

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// A fresh directory that outlives the calling test.
pub fn temp_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

pub fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// The three-entry ledger used across the behaviour tests.
pub fn sample_entries() -> Vec<LedgerEntry> {
    vec![
        LedgerEntry::new(1, day(2024, 5, 3), "food", "Bakery").with_expense(1000),
        LedgerEntry::new(2, day(2024, 5, 3), "transport", "Bus")
            .with_expense(500)
            .with_payment_method("card"),
        LedgerEntry::new(3, day(2024, 6, 1), "food", "Market refund")
            .with_income(2000)
            .with_memo("returned melon"),
    ]
}

/// A view model whose clock is fixed to 2024-05-20.
pub fn view_model() -> LedgerViewModel {
    LedgerViewModel::new(Box::new(FixedClock::new(day(2024, 5, 20))))
}

/// A JSON data file seeded with `entries` inside a kept temp dir.
pub fn seeded_json_backend(entries: &[LedgerEntry]) -> JsonBackend {
    let path = temp_dir().join("wallet.json");
    let backend = JsonBackend::new(path);
    backend.save_all(entries).expect("seed data file");
    backend
}
