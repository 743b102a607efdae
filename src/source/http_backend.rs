//! Wallet REST backend over blocking HTTP.
//!
//! * `GET    {base}/api/wallet/list`   returns a JSON array of entries.
//! * `DELETE {base}/api/wallet/delete` takes a JSON array of ids and answers
//!   `{"message": {"type": ..., "text": ...}}`, on failure as well.
//!
//! The backend deletes all-or-nothing, so a 2xx answer removes every
//! requested id.

use std::{collections::BTreeSet, time::Duration};

use reqwest::{
    blocking::{Client, RequestBuilder, Response},
    StatusCode,
};
use serde::Deserialize;
use tracing::debug;

use crate::{
    domain::{EntryId, LedgerEntry, Notice},
    errors::{ConfigError, DeleteError, FetchError},
};

use super::{DeleteReceipt, LedgerSource};

const LIST_PATH: &str = "/api/wallet/list";
const DELETE_PATH: &str = "/api/wallet/delete";

#[derive(Debug, Deserialize)]
struct MessageEnvelope {
    message: Notice,
}

#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ConfigError> {
        let base_url = base_url.into();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "api_base_url `{base_url}` must start with http:// or https://"
            )));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ConfigError::Invalid(err.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Sends `token` as a bearer credential on every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

impl LedgerSource for HttpBackend {
    fn fetch_all(&self) -> Result<Vec<LedgerEntry>, FetchError> {
        let url = self.url(LIST_PATH);
        debug!(%url, "fetching wallet entries");
        let response = self
            .authorize(self.client.get(&url))
            .send()
            .map_err(|err| FetchError::Transport(err.to_string()))?;
        let (status, body) = read_body(response).map_err(FetchError::Transport)?;
        if !status.is_success() {
            return Err(match decode_message(&body) {
                Some(notice) => FetchError::Rejected(notice),
                None => FetchError::Transport(format!("HTTP {status}")),
            });
        }
        decode_entries(&body)
    }

    fn delete_batch(&self, ids: &BTreeSet<EntryId>) -> Result<DeleteReceipt, DeleteError> {
        let url = self.url(DELETE_PATH);
        let payload: Vec<EntryId> = ids.iter().copied().collect();
        debug!(%url, count = payload.len(), "deleting wallet entries");
        let response = self
            .authorize(self.client.delete(&url).json(&payload))
            .send()
            .map_err(|err| DeleteError::Transport(err.to_string()))?;
        let (status, body) = read_body(response).map_err(DeleteError::Transport)?;
        delete_result(status, &body, ids)
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

fn read_body(response: Response) -> Result<(StatusCode, String), String> {
    let status = response.status();
    let body = response.text().map_err(|err| err.to_string())?;
    Ok((status, body))
}

/// Extracts the `{type, text}` message from a backend response body.
pub fn decode_message(body: &str) -> Option<Notice> {
    serde_json::from_str::<MessageEnvelope>(body)
        .ok()
        .map(|envelope| envelope.message)
}

pub fn decode_entries(body: &str) -> Result<Vec<LedgerEntry>, FetchError> {
    Ok(serde_json::from_str(body)?)
}

fn delete_result(
    status: StatusCode,
    body: &str,
    ids: &BTreeSet<EntryId>,
) -> Result<DeleteReceipt, DeleteError> {
    let message = decode_message(body);
    if !status.is_success() {
        return Err(match message {
            Some(notice) => DeleteError::Rejected(notice),
            None => DeleteError::Transport(format!("HTTP {status}")),
        });
    }
    let notice =
        message.unwrap_or_else(|| Notice::success(format!("{} entries deleted.", ids.len())));
    Ok(DeleteReceipt {
        removed: ids.clone(),
        notice,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Severity;

    #[test]
    fn rejects_base_url_without_scheme() {
        let err = HttpBackend::new("localhost:8080", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn builds_urls_without_double_slash() {
        let backend = HttpBackend::new("http://localhost:8080/", Duration::from_secs(1)).unwrap();
        assert_eq!(backend.url(LIST_PATH), "http://localhost:8080/api/wallet/list");
    }

    #[test]
    fn success_response_removes_every_requested_id() {
        let ids = BTreeSet::from([EntryId(1), EntryId(2)]);
        let body = r#"{"message":{"type":"success","text":"삭제되었습니다."}}"#;
        let receipt = delete_result(StatusCode::OK, body, &ids).unwrap();
        assert_eq!(receipt.removed, ids);
        assert_eq!(receipt.notice.text, "삭제되었습니다.");
    }

    #[test]
    fn failure_response_forwards_message_verbatim() {
        let ids = BTreeSet::from([EntryId(1)]);
        let body = r#"{"message":{"type":"error","text":"삭제 중 문제가 발생하였습니다."}}"#;
        let err = delete_result(StatusCode::INTERNAL_SERVER_ERROR, body, &ids).unwrap_err();
        match err {
            DeleteError::Rejected(notice) => {
                assert_eq!(notice.severity, Severity::Error);
                assert_eq!(notice.text, "삭제 중 문제가 발생하였습니다.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn failure_without_message_is_transport_error() {
        let ids = BTreeSet::from([EntryId(1)]);
        let err = delete_result(StatusCode::BAD_GATEWAY, "<html>", &ids).unwrap_err();
        assert!(matches!(err, DeleteError::Transport(_)));
        assert_eq!(err.notice(), Notice::fallback());
    }

    #[test]
    fn malformed_list_body_is_fetch_error() {
        assert!(matches!(
            decode_entries(r#"{"entries": []}"#),
            Err(FetchError::Malformed(_))
        ));
        assert!(decode_entries("[]").unwrap().is_empty());
    }
}
