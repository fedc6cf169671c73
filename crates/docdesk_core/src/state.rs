use crate::view_model::DocumentsView;
use crate::{Document, DocumentStatus, QueryHistoryEntry};

/// Result cap sent with every question.
pub const MAX_QUERY_RESULTS: u32 = 5;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DocumentsState {
    documents: Vec<Document>,
    current_document: Option<Document>,
    loading: bool,
    upload_progress: u8,
    query_history: Vec<QueryHistoryEntry>,
    dirty: bool,
}

impl DocumentsState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn current_document(&self) -> Option<&Document> {
        self.current_document.as_ref()
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn upload_progress(&self) -> u8 {
        self.upload_progress
    }

    pub fn query_history(&self) -> &[QueryHistoryEntry] {
        &self.query_history
    }

    pub fn completed_documents(&self) -> Vec<Document> {
        self.with_status(DocumentStatus::Completed)
    }

    pub fn processing_documents(&self) -> Vec<Document> {
        self.with_status(DocumentStatus::Processing)
    }

    fn with_status(&self, status: DocumentStatus) -> Vec<Document> {
        self.documents
            .iter()
            .filter(|doc| doc.status == status)
            .cloned()
            .collect()
    }

    pub fn view(&self) -> DocumentsView {
        DocumentsView {
            documents: self.documents.clone(),
            current_document: self.current_document.clone(),
            loading: self.loading,
            upload_progress: self.upload_progress,
            query_history: self.query_history.clone(),
            completed_documents: self.completed_documents(),
            processing_documents: self.processing_documents(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn set_loading(&mut self, loading: bool) {
        if self.loading != loading {
            self.loading = loading;
            self.dirty = true;
        }
    }

    pub(crate) fn set_upload_progress(&mut self, percent: u8) {
        let percent = percent.min(100);
        if self.upload_progress != percent {
            self.upload_progress = percent;
            self.dirty = true;
        }
    }

    pub(crate) fn replace_documents(&mut self, documents: Vec<Document>) {
        self.documents = documents;
        self.dirty = true;
    }

    pub(crate) fn prepend_document(&mut self, document: Document) {
        self.documents.insert(0, document);
        self.dirty = true;
    }

    /// Makes `document` current and starts a fresh transcript, even when the
    /// same id was already selected.
    pub(crate) fn select(&mut self, document: Document) {
        self.current_document = Some(document);
        self.query_history.clear();
        self.dirty = true;
    }

    pub(crate) fn push_history(&mut self, entry: QueryHistoryEntry) {
        self.query_history.push(entry);
        self.dirty = true;
    }

    pub(crate) fn remove_document(&mut self, document_id: &str) {
        let before = self.documents.len();
        self.documents.retain(|doc| doc.document_id != document_id);
        if self.documents.len() != before {
            self.dirty = true;
        }
        if self.is_current(document_id) {
            self.current_document = None;
            self.query_history.clear();
            self.dirty = true;
        }
    }

    /// Swaps in fresh detail without moving the entry within the list.
    pub(crate) fn replace_document(&mut self, document: Document) {
        if let Some(slot) = self
            .documents
            .iter_mut()
            .find(|doc| doc.document_id == document.document_id)
        {
            *slot = document.clone();
            self.dirty = true;
        }
        if self.is_current(&document.document_id) {
            self.current_document = Some(document);
            self.dirty = true;
        }
    }

    fn is_current(&self, document_id: &str) -> bool {
        self.current_document
            .as_ref()
            .is_some_and(|doc| doc.document_id == document_id)
    }
}
