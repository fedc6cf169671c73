use std::sync::{mpsc, Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use docdesk_core::{
    update, Document, DocumentsState, DocumentsView, Effect, Msg, Notice, NoticeLevel,
    OperationFailure, QueryHistoryEntry, QueryResponse,
};
use docdesk_logging::{docs_debug, docs_error, docs_info, docs_warn};

use crate::{DocumentApi, ProgressSink, QueryRequest, UploadFile};

/// Source of the timestamps recorded in the query history.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

#[derive(Clone)]
pub struct StoreConfig {
    pub now: Clock,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            now: Arc::new(Utc::now),
        }
    }
}

/// Published to every subscriber after the store changes or reports something.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    Changed(DocumentsView),
    Notice(Notice),
    Failed(OperationFailure),
}

struct Shared {
    state: Mutex<DocumentsState>,
    subscribers: Mutex<Vec<mpsc::Sender<StoreEvent>>>,
}

impl Shared {
    fn read<T>(&self, f: impl FnOnce(&DocumentsState) -> T) -> T {
        let guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&*guard)
    }

    /// Runs one message through `update` under the lock, then publishes outside it.
    fn dispatch(&self, msg: Msg) {
        let (changed, effects) = {
            let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            let state = std::mem::take(&mut *guard);
            let (mut state, effects) = update(state, msg);
            let changed = state.consume_dirty().then(|| state.view());
            *guard = state;
            (changed, effects)
        };

        if let Some(view) = changed {
            self.publish(StoreEvent::Changed(view));
        }
        for effect in effects {
            match effect {
                Effect::Notify(notice) => {
                    match notice.level {
                        NoticeLevel::Success => docs_info!("{}", notice.text),
                        NoticeLevel::Error => docs_warn!("{}", notice.text),
                    }
                    self.publish(StoreEvent::Notice(notice));
                }
                Effect::ReportFailure(failure) => {
                    docs_error!("{}", failure);
                    self.publish(StoreEvent::Failed(failure));
                }
            }
        }
    }

    fn publish(&self, event: StoreEvent) {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

/// Session-scoped document store.
///
/// Every method wraps one remote call and never returns an error: failures
/// are logged, published as [`StoreEvent::Failed`], and leave local state as
/// described per method. Callers observe failure only through `None` returns
/// or unchanged state.
pub struct DocumentsStore {
    api: Arc<dyn DocumentApi>,
    config: StoreConfig,
    shared: Arc<Shared>,
}

impl DocumentsStore {
    pub fn new(api: Arc<dyn DocumentApi>) -> Self {
        Self::with_config(api, StoreConfig::default())
    }

    pub fn with_config(api: Arc<dyn DocumentApi>, config: StoreConfig) -> Self {
        Self {
            api,
            config,
            shared: Arc::new(Shared {
                state: Mutex::new(DocumentsState::new()),
                subscribers: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Registers a new listener. Dropped receivers are pruned on the next event.
    pub fn subscribe(&self) -> mpsc::Receiver<StoreEvent> {
        let (tx, rx) = mpsc::channel();
        self.shared
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        rx
    }

    pub fn snapshot(&self) -> DocumentsView {
        self.shared.read(DocumentsState::view)
    }

    pub fn documents(&self) -> Vec<Document> {
        self.shared.read(|state| state.documents().to_vec())
    }

    pub fn current_document(&self) -> Option<Document> {
        self.shared.read(|state| state.current_document().cloned())
    }

    pub fn loading(&self) -> bool {
        self.shared.read(DocumentsState::loading)
    }

    pub fn upload_progress(&self) -> u8 {
        self.shared.read(DocumentsState::upload_progress)
    }

    pub fn query_history(&self) -> Vec<QueryHistoryEntry> {
        self.shared.read(|state| state.query_history().to_vec())
    }

    pub fn completed_documents(&self) -> Vec<Document> {
        self.shared.read(DocumentsState::completed_documents)
    }

    pub fn processing_documents(&self) -> Vec<Document> {
        self.shared.read(DocumentsState::processing_documents)
    }

    /// Replaces the local list with the server's full list, keeping its order.
    pub async fn fetch_documents(&self) {
        self.shared.dispatch(Msg::FetchStarted);
        match self.api.list_documents().await {
            Ok(documents) => {
                docs_debug!("fetched {} documents", documents.len());
                self.shared.dispatch(Msg::DocumentsFetched(documents));
            }
            Err(err) => self.shared.dispatch(Msg::FetchFailed(err.to_string())),
        }
    }

    /// Uploads `file` and prepends a `pending` entry for it. Returns the new id.
    pub async fn upload_document(&self, file: UploadFile) -> Option<String> {
        self.shared.dispatch(Msg::UploadStarted);
        let file_size = file.size();
        let shared = Arc::clone(&self.shared);
        let progress: Arc<dyn ProgressSink> =
            Arc::new(move |percent: u8| shared.dispatch(Msg::UploadProgress(percent)));

        match self.api.upload_document(file, progress).await {
            Ok(receipt) => {
                let document_id = receipt.document_id.clone();
                docs_info!("uploaded {} as {}", receipt.filename, document_id);
                self.shared
                    .dispatch(Msg::UploadSucceeded { receipt, file_size });
                Some(document_id)
            }
            Err(err) => {
                self.shared.dispatch(Msg::UploadFailed(err.to_string()));
                None
            }
        }
    }

    /// Loads detail for `document_id`, makes it current and clears the history.
    pub async fn select_document(&self, document_id: &str) {
        match self.api.get_document(document_id).await {
            Ok(document) => self.shared.dispatch(Msg::DocumentSelected(document)),
            Err(err) => self
                .shared
                .dispatch(Msg::SelectFailed(format!("{document_id}: {err}"))),
        }
    }

    /// Asks `question` about the current document and records the answer.
    ///
    /// Returns `None` without contacting the service when nothing is selected.
    pub async fn query_document(&self, question: &str) -> Option<QueryResponse> {
        let Some(document_id) = self
            .shared
            .read(|state| state.current_document().map(|doc| doc.document_id.clone()))
        else {
            docs_debug!("query ignored: no document selected");
            return None;
        };

        let request = match QueryRequest::new(document_id, question) {
            Ok(request) => request,
            Err(err) => {
                self.shared.dispatch(Msg::QueryFailed(err.to_string()));
                return None;
            }
        };

        match self.api.query_document(&request).await {
            Ok(response) => {
                self.shared.dispatch(Msg::QueryAnswered {
                    question: request.question,
                    response: response.clone(),
                    at: (self.config.now)(),
                });
                Some(response)
            }
            Err(err) => {
                self.shared.dispatch(Msg::QueryFailed(err.to_string()));
                None
            }
        }
    }

    pub async fn generate_summary(&self, document_id: &str) -> Option<String> {
        match self.api.generate_summary(document_id).await {
            Ok(response) => Some(response.summary),
            Err(err) => {
                self.shared
                    .dispatch(Msg::SummaryFailed(format!("{document_id}: {err}")));
                None
            }
        }
    }

    /// Deletes on the server first; local state only changes once that succeeds.
    pub async fn delete_document(&self, document_id: &str) {
        match self.api.delete_document(document_id).await {
            Ok(()) => self
                .shared
                .dispatch(Msg::DocumentDeleted(document_id.to_string())),
            Err(err) => self
                .shared
                .dispatch(Msg::DeleteFailed(format!("{document_id}: {err}"))),
        }
    }

    /// Re-fetches one document and swaps it in wherever it is held locally.
    ///
    /// Returns the fresh detail so pollers can inspect documents that are in
    /// neither the list nor the selection.
    pub async fn refresh_document_status(&self, document_id: &str) -> Option<Document> {
        match self.api.get_document(document_id).await {
            Ok(document) => {
                self.shared.dispatch(Msg::DocumentRefreshed(document.clone()));
                Some(document)
            }
            Err(err) => {
                self.shared
                    .dispatch(Msg::RefreshFailed(format!("{document_id}: {err}")));
                None
            }
        }
    }

    /// Polls until the document is completed or failed, at most `max_polls` times.
    pub async fn wait_until_settled(
        &self,
        document_id: &str,
        interval: Duration,
        max_polls: u32,
    ) -> Option<Document> {
        for poll in 1..=max_polls {
            if let Some(document) = self.refresh_document_status(document_id).await {
                docs_debug!("poll {poll}: {document_id} is {}", document.status);
                if document.status.is_settled() {
                    return Some(document);
                }
            }
            if poll < max_polls {
                tokio::time::sleep(interval).await;
            }
        }
        docs_warn!("{document_id} did not settle after {max_polls} polls");
        None
    }
}
