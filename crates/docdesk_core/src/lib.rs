//! Docdesk core: pure document-store state machine and derived views.
mod document;
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use document::{Document, DocumentStatus, QueryHistoryEntry, QueryResponse, UploadReceipt};
pub use effect::{Effect, Notice, NoticeLevel, Operation, OperationFailure};
pub use msg::Msg;
pub use state::{DocumentsState, MAX_QUERY_RESULTS};
pub use update::update;
pub use view_model::DocumentsView;
