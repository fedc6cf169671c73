//! Docdesk client: the remote document-service contract, its HTTP
//! implementation, and the session-scoped `DocumentsStore`.
mod api;
mod http;
mod settings;
mod store;
mod types;

pub use api::{DocumentApi, ProgressSink};
pub use http::HttpDocumentApi;
pub use settings::{ClientSettings, SettingsError};
pub use store::{Clock, DocumentsStore, StoreConfig, StoreEvent};
pub use types::{
    percent_of, ApiError, FailureKind, HealthStatus, QueryRequest, SummaryResponse, UploadFile,
    MAX_QUESTION_CHARS,
};
