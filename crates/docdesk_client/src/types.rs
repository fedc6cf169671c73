use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use bytes::Bytes;
use docdesk_core::MAX_QUERY_RESULTS;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest question the service accepts.
pub const MAX_QUESTION_CHARS: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
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
    Network,
    Decode,
    UnsupportedFileType { filename: String },
    TooLarge { max_bytes: u64, actual: u64 },
    InvalidQuestion,
    Io,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "malformed response"),
            FailureKind::UnsupportedFileType { filename } => {
                write!(f, "unsupported file type {filename}")
            }
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "file too large (max {max_bytes}, actual {actual})")
            }
            FailureKind::InvalidQuestion => write!(f, "invalid question"),
            FailureKind::Io => write!(f, "io error"),
        }
    }
}

/// A local file queued for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub filename: String,
    pub content: Bytes,
}

impl UploadFile {
    pub fn new(filename: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ApiError> {
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| ApiError::new(FailureKind::Io, format!("no file name in {path:?}")))?
            .to_string();
        let content = std::fs::read(path)
            .map_err(|err| ApiError::new(FailureKind::Io, format!("{path:?}: {err}")))?;
        Ok(Self::new(filename, content))
    }

    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryRequest {
    pub document_id: String,
    pub question: String,
    pub max_results: u32,
}

impl QueryRequest {
    /// Builds a request with the fixed result cap, rejecting empty or overlong questions.
    ///
    /// Length is counted on the text as typed, whitespace included.
    pub fn new(
        document_id: impl Into<String>,
        question: impl Into<String>,
    ) -> Result<Self, ApiError> {
        let question = question.into();
        let length = question.chars().count();
        if length == 0 {
            return Err(ApiError::new(FailureKind::InvalidQuestion, "question is empty"));
        }
        if length > MAX_QUESTION_CHARS {
            return Err(ApiError::new(
                FailureKind::InvalidQuestion,
                format!("question has {length} characters, limit is {MAX_QUESTION_CHARS}"),
            ));
        }
        Ok(Self {
            document_id: document_id.into(),
            question,
            max_results: MAX_QUERY_RESULTS,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SummaryResponse {
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub services: BTreeMap<String, serde_json::Value>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}

/// Integer percentage of `done` over `total`; an empty total counts as complete.
pub fn percent_of(done: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    let percent = done.min(total).saturating_mul(100) / total;
    percent as u8
}
