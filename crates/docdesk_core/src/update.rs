use crate::{
    Document, DocumentsState, Effect, Msg, Notice, Operation, OperationFailure, QueryHistoryEntry,
};

const UPLOAD_ACCEPTED: &str = "Document uploaded, processing has started";
const UPLOAD_REJECTED: &str = "Document upload failed";
const DELETE_CONFIRMED: &str = "Document deleted";
const DELETE_REJECTED: &str = "Document deletion failed";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: DocumentsState, msg: Msg) -> (DocumentsState, Vec<Effect>) {
    let effects = match msg {
        Msg::FetchStarted => {
            state.set_loading(true);
            Vec::new()
        }
        Msg::DocumentsFetched(documents) => {
            state.replace_documents(documents);
            state.set_loading(false);
            Vec::new()
        }
        Msg::FetchFailed(message) => {
            state.set_loading(false);
            vec![failure(Operation::FetchDocuments, message)]
        }
        Msg::UploadStarted => {
            state.set_loading(true);
            state.set_upload_progress(0);
            Vec::new()
        }
        Msg::UploadProgress(percent) => {
            state.set_upload_progress(percent);
            Vec::new()
        }
        Msg::UploadSucceeded { receipt, file_size } => {
            state.prepend_document(Document::pending(&receipt, file_size));
            state.set_loading(false);
            state.set_upload_progress(0);
            vec![Effect::Notify(Notice::success(UPLOAD_ACCEPTED))]
        }
        Msg::UploadFailed(message) => {
            state.set_loading(false);
            state.set_upload_progress(0);
            vec![
                failure(Operation::UploadDocument, message),
                Effect::Notify(Notice::error(UPLOAD_REJECTED)),
            ]
        }
        Msg::DocumentSelected(document) => {
            state.select(document);
            Vec::new()
        }
        Msg::SelectFailed(message) => vec![failure(Operation::SelectDocument, message)],
        Msg::QueryAnswered {
            question,
            response,
            at,
        } => {
            state.push_history(QueryHistoryEntry {
                question,
                response,
                timestamp: at,
            });
            Vec::new()
        }
        Msg::QueryFailed(message) => vec![failure(Operation::QueryDocument, message)],
        Msg::SummaryFailed(message) => vec![failure(Operation::GenerateSummary, message)],
        Msg::DocumentDeleted(document_id) => {
            state.remove_document(&document_id);
            vec![Effect::Notify(Notice::success(DELETE_CONFIRMED))]
        }
        Msg::DeleteFailed(message) => vec![
            failure(Operation::DeleteDocument, message),
            Effect::Notify(Notice::error(DELETE_REJECTED)),
        ],
        Msg::DocumentRefreshed(document) => {
            state.replace_document(document);
            Vec::new()
        }
        Msg::RefreshFailed(message) => {
            vec![failure(Operation::RefreshDocumentStatus, message)]
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn failure(operation: Operation, message: String) -> Effect {
    Effect::ReportFailure(OperationFailure::new(operation, message))
}
