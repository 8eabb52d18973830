use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error body returned by the backend on non-2xx responses.
#[derive(Debug, Clone, Serialize, Deserialize, Error)]
#[error("{detail}")]
pub struct ErrorDetail {
    pub detail: String,
}

impl ErrorDetail {
    /// Extracts `detail` from a raw response body, if it has that shape.
    pub fn from_body(body: &str) -> Option<String> {
        serde_json::from_str::<ErrorDetail>(body)
            .ok()
            .map(|parsed| parsed.detail)
    }
}
