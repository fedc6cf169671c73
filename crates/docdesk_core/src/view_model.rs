use crate::{Document, QueryHistoryEntry};

/// Read-only snapshot of the store, including the derived status views.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DocumentsView {
    pub documents: Vec<Document>,
    pub current_document: Option<Document>,
    pub loading: bool,
    pub upload_progress: u8,
    pub query_history: Vec<QueryHistoryEntry>,
    pub completed_documents: Vec<Document>,
    pub processing_documents: Vec<Document>,
    pub dirty: bool,
}
