//! Ledger view model and the pure derivations it is built from.
//! No terminal I/O and no transport code; remote access goes through
//! [`crate::source::LedgerSource`].

pub mod filter;
pub mod selection;
pub mod time;
pub mod totals;
pub mod view_model;

pub use filter::{categories, project, FilterMode, Projection, ALL_CATEGORIES};
pub use selection::SelectionSet;
pub use time::{Clock, FixedClock, SystemClock};
pub use totals::{CategoryTotal, Totals, TotalsScope};
pub use view_model::{DeleteOutcome, LedgerViewModel, LoadStatus, LoadTicket};
