use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type RequestId = u64;

/// Body of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub message: &'a str,
}

/// Response of `POST /chat`. The backend may omit `reply`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub reply: Option<String>,
}

/// Response of a successful upload: the backend JSON plus the one field we read.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadReceipt {
    pub filename: Option<String>,
    pub body: serde_json::Value,
}

/// Response of the backend root endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RootInfo {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    ChatCompleted {
        request_id: RequestId,
        result: Result<ChatReply, ClientError>,
    },
    UploadCompleted {
        request_id: RequestId,
        result: Result<UploadReceipt, ClientError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ClientError {
    pub kind: FailureKind,
    pub message: String,
}

impl ClientError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Decode,
    Io,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Decode => write!(f, "malformed response"),
            FailureKind::Io => write!(f, "file error"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
