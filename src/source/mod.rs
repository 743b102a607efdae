pub mod http_backend;
pub mod json_backend;
pub mod memory_backend;

use std::collections::BTreeSet;

use crate::{
    domain::{EntryId, LedgerEntry, Notice},
    errors::{DeleteError, FetchError},
};

pub use http_backend::HttpBackend;
pub use json_backend::JsonBackend;
pub use memory_backend::MemoryBackend;

/// What the remote side reports after a batch delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteReceipt {
    /// Ids actually removed remotely.
    pub removed: BTreeSet<EntryId>,
    pub notice: Notice,
}

/// Abstraction over anything that can list ledger entries and delete them in
/// batches: an HTTP backend, a local file, an in-memory fixture.
pub trait LedgerSource: Send + Sync {
    fn fetch_all(&self) -> Result<Vec<LedgerEntry>, FetchError>;
    fn delete_batch(&self, ids: &BTreeSet<EntryId>) -> Result<DeleteReceipt, DeleteError>;

    /// Short description used in logs and the shell prompt.
    fn describe(&self) -> String {
        "remote source".to_string()
    }
}
