//! Shared traits for ledger records.

/// Converts a record into a one-line, user-facing label.
pub trait Displayable {
    fn display_label(&self) -> String;
}
