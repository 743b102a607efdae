#![doc(test(attr(deny(warnings))))]

//! Wallet Core keeps a personal finance ledger in sync with its backend and
//! derives the month, date, year and category views a wallet screen shows,
//! together with their running totals and a multi-select bulk delete.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod source;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("Wallet Core tracing initialized.");
    });
}
