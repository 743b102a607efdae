//! Domain types shared by the view model, the remote sources and the shell.
//! No I/O, no terminal output. Only data types and their calendar helpers.

pub mod common;
pub mod entry;
pub mod notice;
pub mod period;

pub use common::Displayable;
pub use entry::{EntryId, LedgerEntry};
pub use notice::{Notice, Severity};
pub use period::YearMonth;
