use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Server-side processing status of an uploaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl DocumentStatus {
    /// True once the server will no longer move the document to another status.
    pub fn is_settled(self) -> bool {
        matches!(self, DocumentStatus::Completed | DocumentStatus::Failed)
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentStatus::Pending => write!(f, "pending"),
            DocumentStatus::Processing => write!(f, "processing"),
            DocumentStatus::Completed => write!(f, "completed"),
            DocumentStatus::Failed => write!(f, "failed"),
        }
    }
}

/// An uploaded file as tracked by the document service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub document_id: String,
    pub filename: String,
    pub file_size: u64,
    #[serde(default)]
    pub pages: u32,
    pub upload_time: String,
    pub status: DocumentStatus,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub chunk_count: u32,
}

impl Document {
    /// Builds the optimistic entry shown right after an upload is accepted.
    ///
    /// Processing has not started yet, so `pages` and `chunk_count` are zero and
    /// the size comes from the local file rather than the server.
    pub fn pending(receipt: &UploadReceipt, file_size: u64) -> Self {
        Self {
            document_id: receipt.document_id.clone(),
            filename: receipt.filename.clone(),
            file_size,
            pages: 0,
            upload_time: receipt.upload_time.clone(),
            status: DocumentStatus::Pending,
            chunk_count: 0,
        }
    }
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<u32>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Response body of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub document_id: String,
    pub filename: String,
    pub upload_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Answer returned by the service for a question. Kept exactly as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryResponse(serde_json::Value);

impl QueryResponse {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// The `answer` field, when the service included one.
    pub fn answer(&self) -> Option<&str> {
        self.0.get("answer").and_then(serde_json::Value::as_str)
    }

    pub fn as_json(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn into_json(self) -> serde_json::Value {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryHistoryEntry {
    pub question: String,
    pub response: QueryResponse,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_chunk_count_reads_as_zero() {
        let json = r#"{
            "document_id": "d1",
            "filename": "a.pdf",
            "file_size": 10,
            "pages": 2,
            "upload_time": "2024-01-01T00:00:00",
            "status": "processing",
            "chunk_count": null
        }"#;
        let doc: Document = serde_json::from_str(json).unwrap();
        assert_eq!(doc.chunk_count, 0);
        assert_eq!(doc.status, DocumentStatus::Processing);
    }

    #[test]
    fn query_response_keeps_unknown_fields() {
        let value = serde_json::json!({"answer": "yes", "confidence": 0.8, "extra": [1, 2]});
        let response: QueryResponse = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(response.answer(), Some("yes"));
        assert_eq!(serde_json::to_value(&response).unwrap(), value);
    }

    #[test]
    fn only_completed_and_failed_are_settled() {
        assert!(!DocumentStatus::Pending.is_settled());
        assert!(!DocumentStatus::Processing.is_settled());
        assert!(DocumentStatus::Completed.is_settled());
        assert!(DocumentStatus::Failed.is_settled());
    }
}
