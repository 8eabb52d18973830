use std::fmt;

use shared::error::ErrorDetail;
use thiserror::Error;

use crate::validation::{MIN_REASON_CHARS, WORD_LIMIT};

/// Local input problems. These block the operation before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please provide at least {min} characters (got {actual})", min = MIN_REASON_CHARS)]
    ReasonTooShort { actual: usize },
    #[error("Please reduce your request to {limit} words or less (got {actual})", limit = WORD_LIMIT)]
    TooManyWords { actual: usize },
    #[error("Enter {0}")]
    MissingField(&'static str),
    #[error("Enter comment or recommendation")]
    EmptyComment,
    #[error("Only a rejected request can be resent (latest is {0})")]
    NotResendable(String),
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("No {0} logged in")]
    NotLoggedIn(&'static str),
    #[error("No pending request selected")]
    NoPendingSelected,
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("unexpected response body: {0}")]
    Parse(String),
    #[error("invalid api base url '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        source: url::ParseError,
    },
}

impl ClientError {
    /// The backend reports duplicates and rule violations as 400; 409 is
    /// accepted too.
    pub fn is_conflict(&self) -> bool {
        matches!(self, ClientError::Server { status: 400 | 409, .. })
    }

    /// Server-provided `detail`, falling back to the raw body.
    pub fn detail(&self) -> Option<String> {
        match self {
            ClientError::Server { body, .. } => {
                Some(ErrorDetail::from_body(body).unwrap_or_else(|| body.clone()))
            }
            _ => None,
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ClientError::Validation(_) | ClientError::NotLoggedIn(_) | ClientError::NoPendingSelected
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

impl NoticeLevel {
    pub fn label(self) -> &'static str {
        match self {
            NoticeLevel::Success => "ok",
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        }
    }
}

/// A non-blocking, user-visible notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }

    /// Turns a failed operation into a notice. `action` names what failed,
    /// e.g. "Failed to send request".
    pub fn from_error(action: &str, err: &ClientError) -> Self {
        if err.is_local() {
            return Self::warning(err.to_string());
        }
        match err.detail() {
            Some(detail) => Self::error(format!("{action}: {detail}")),
            None => Self::error(format!("{action}: {err}")),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level.label(), self.message)
    }
}
