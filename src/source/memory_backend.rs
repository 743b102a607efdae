use std::{
    collections::BTreeSet,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex, MutexGuard,
    },
};

use crate::{
    domain::{EntryId, LedgerEntry, Notice},
    errors::{DeleteError, FetchError},
};

use super::{DeleteReceipt, LedgerSource};

/// In-process source with scriptable failures.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<Vec<LedgerEntry>>,
    fetch_failure: Mutex<Option<String>>,
    delete_rejection: Mutex<Option<Notice>>,
    undeletable: Mutex<BTreeSet<EntryId>>,
    delete_calls: AtomicUsize,
}

impl MemoryBackend {
    pub fn new(entries: Vec<LedgerEntry>) -> Self {
        Self {
            entries: Mutex::new(entries),
            ..Self::default()
        }
    }

    /// Makes the next fetch fail with a transport error.
    pub fn fail_next_fetch(&self, reason: impl Into<String>) {
        *lock(&self.fetch_failure) = Some(reason.into());
    }

    /// Makes the next delete fail with `notice`.
    pub fn reject_next_delete(&self, notice: Notice) {
        *lock(&self.delete_rejection) = Some(notice);
    }

    /// Ids that deletes silently skip, simulating a partial remote failure.
    pub fn keep_on_delete(&self, ids: impl IntoIterator<Item = EntryId>) {
        lock(&self.undeletable).extend(ids);
    }

    pub fn replace(&self, entries: Vec<LedgerEntry>) {
        *lock(&self.entries) = entries;
    }

    pub fn snapshot(&self) -> Vec<LedgerEntry> {
        lock(&self.entries).clone()
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }
}

impl LedgerSource for MemoryBackend {
    fn fetch_all(&self) -> Result<Vec<LedgerEntry>, FetchError> {
        if let Some(reason) = lock(&self.fetch_failure).take() {
            return Err(FetchError::Transport(reason));
        }
        Ok(self.snapshot())
    }

    fn delete_batch(&self, ids: &BTreeSet<EntryId>) -> Result<DeleteReceipt, DeleteError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(notice) = lock(&self.delete_rejection).take() {
            return Err(DeleteError::Rejected(notice));
        }
        let undeletable = lock(&self.undeletable).clone();
        let mut entries = lock(&self.entries);
        let mut removed = BTreeSet::new();
        entries.retain(|entry| {
            let drop = ids.contains(&entry.id) && !undeletable.contains(&entry.id);
            if drop {
                removed.insert(entry.id);
            }
            !drop
        });
        let notice = Notice::success(format!("{} entries deleted.", removed.len()));
        Ok(DeleteReceipt { removed, notice })
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
