use std::{
    collections::BTreeSet,
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
    sync::Mutex,
};

use tracing::debug;

use crate::{
    domain::{EntryId, LedgerEntry, Notice},
    errors::{DeleteError, FetchError},
};

use super::{DeleteReceipt, LedgerSource};

const TMP_SUFFIX: &str = "tmp";

/// Entries stored as a JSON array in a local file. A missing file reads as an
/// empty ledger; deletes rewrite the file through a temporary sibling.
#[derive(Debug)]
pub struct JsonBackend {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrites the file with `entries`.
    pub fn save_all(&self, entries: &[LedgerEntry]) -> io::Result<()> {
        let json = serde_json::to_string_pretty(entries)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)
    }

    fn read_all(&self) -> Result<Vec<LedgerEntry>, FetchError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "data file missing; treating as empty");
            return Ok(Vec::new());
        }
        let data = fs::read_to_string(&self.path)
            .map_err(|err| FetchError::Transport(format!("{}: {err}", self.path.display())))?;
        if data.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&data)?)
    }
}

impl LedgerSource for JsonBackend {
    fn fetch_all(&self) -> Result<Vec<LedgerEntry>, FetchError> {
        self.read_all()
    }

    fn delete_batch(&self, ids: &BTreeSet<EntryId>) -> Result<DeleteReceipt, DeleteError> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut entries = self
            .read_all()
            .map_err(|err| DeleteError::Transport(err.to_string()))?;
        let before = entries.len();
        let removed: BTreeSet<EntryId> = entries
            .iter()
            .map(|entry| entry.id)
            .filter(|id| ids.contains(id))
            .collect();
        entries.retain(|entry| !removed.contains(&entry.id));
        self.save_all(&entries)
            .map_err(|err| DeleteError::Transport(format!("{}: {err}", self.path.display())))?;
        debug!(before, after = entries.len(), "data file rewritten");
        Ok(DeleteReceipt {
            notice: Notice::success(format!("{} entries deleted.", removed.len())),
            removed,
        })
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{existing}.{TMP_SUFFIX}"),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tmp_path_appends_suffix_to_extension() {
        assert_eq!(
            tmp_path(Path::new("/data/wallet.json")),
            PathBuf::from("/data/wallet.json.tmp")
        );
        assert_eq!(tmp_path(Path::new("wallet")), PathBuf::from("wallet.tmp"));
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let backend = JsonBackend::new("/definitely/not/here/wallet.json");
        assert!(backend.fetch_all().unwrap().is_empty());
    }
}
