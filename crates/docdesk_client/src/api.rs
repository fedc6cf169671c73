use std::sync::Arc;

use docdesk_core::{Document, QueryResponse, UploadReceipt};

use crate::{ApiError, HealthStatus, QueryRequest, SummaryResponse, UploadFile};

/// Receives upload progress as an integer percentage.
pub trait ProgressSink: Send + Sync {
    fn emit(&self, percent: u8);
}

impl<F> ProgressSink for F
where
    F: Fn(u8) + Send + Sync,
{
    fn emit(&self, percent: u8) {
        self(percent)
    }
}

/// Remote surface of the document-analysis service.
#[async_trait::async_trait]
pub trait DocumentApi: Send + Sync {
    async fn list_documents(&self) -> Result<Vec<Document>, ApiError>;

    async fn upload_document(
        &self,
        file: UploadFile,
        progress: Arc<dyn ProgressSink>,
    ) -> Result<UploadReceipt, ApiError>;

    async fn get_document(&self, document_id: &str) -> Result<Document, ApiError>;

    async fn query_document(&self, request: &QueryRequest) -> Result<QueryResponse, ApiError>;

    async fn generate_summary(&self, document_id: &str) -> Result<SummaryResponse, ApiError>;

    async fn delete_document(&self, document_id: &str) -> Result<(), ApiError>;

    async fn health(&self) -> Result<HealthStatus, ApiError>;
}
