use thiserror::Error;

use crate::domain::{EntryId, Notice};

/// Failure to load the entry collection from the remote source.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Malformed response: {0}")]
    Malformed(String),
    #[error("{0}")]
    Rejected(Notice),
}

impl FetchError {
    /// Notice to show the user; remote text is passed through unchanged.
    pub fn notice(&self) -> Notice {
        match self {
            FetchError::Rejected(notice) => notice.clone(),
            _ => Notice::fallback(),
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Malformed(err.to_string())
    }
}

/// Failure to delete a batch of entries. State is never partially applied.
#[derive(Debug, Error)]
pub enum DeleteError {
    #[error("No entries selected.")]
    NothingSelected,
    #[error("Not permitted to delete entries: {}", join_ids(.0))]
    NotPermitted(Vec<EntryId>),
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("{0}")]
    Rejected(Notice),
}

impl DeleteError {
    /// Notice to show the user; remote text is passed through unchanged.
    pub fn notice(&self) -> Notice {
        match self {
            DeleteError::Rejected(notice) => notice.clone(),
            DeleteError::NothingSelected => Notice::new(
                crate::domain::Severity::Warning,
                DeleteError::NothingSelected.to_string(),
            ),
            _ => Notice::fallback(),
        }
    }
}

/// Configuration load/save failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

fn join_ids(ids: &[EntryId]) -> String {
    ids.iter()
        .map(|id| format!("#{id}"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Severity;

    #[test]
    fn rejected_errors_forward_remote_notice() {
        let notice = Notice::new(Severity::Error, "삭제 권한이 없습니다.");
        let err = DeleteError::Rejected(notice.clone());
        assert_eq!(err.notice(), notice);
        assert_eq!(err.to_string(), "삭제 권한이 없습니다.");
    }

    #[test]
    fn transport_errors_use_generic_fallback() {
        let err = FetchError::Transport("connection refused".into());
        assert_eq!(err.notice(), Notice::fallback());
    }

    #[test]
    fn not_permitted_lists_ids() {
        let err = DeleteError::NotPermitted(vec![EntryId(1), EntryId(4)]);
        assert_eq!(err.to_string(), "Not permitted to delete entries: #1, #4");
    }
}
