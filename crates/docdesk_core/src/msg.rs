use chrono::{DateTime, Utc};

use crate::{Document, QueryResponse, UploadReceipt};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// A full list refresh was requested.
    FetchStarted,
    /// The service returned the document list, in its own order.
    DocumentsFetched(Vec<Document>),
    FetchFailed(String),
    /// An upload is about to be sent.
    UploadStarted,
    /// Transport progress for the active upload, in percent.
    UploadProgress(u8),
    /// The service accepted the upload.
    UploadSucceeded {
        receipt: UploadReceipt,
        file_size: u64,
    },
    UploadFailed(String),
    /// Detail for the document the user picked.
    DocumentSelected(Document),
    SelectFailed(String),
    /// Answer to a question about the selected document.
    QueryAnswered {
        question: String,
        response: QueryResponse,
        at: DateTime<Utc>,
    },
    QueryFailed(String),
    SummaryFailed(String),
    /// The service confirmed deletion of the given id.
    DocumentDeleted(String),
    DeleteFailed(String),
    /// Fresh detail for one document, used for status polling.
    DocumentRefreshed(Document),
    RefreshFailed(String),
    NoOp,
}
