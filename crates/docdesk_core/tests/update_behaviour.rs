use std::sync::Once;

use chrono::{TimeZone, Utc};
use docdesk_core::{
    update, Document, DocumentStatus, DocumentsState, Effect, Msg, Notice, Operation,
    OperationFailure, QueryResponse, UploadReceipt,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(docdesk_logging::initialize_for_tests);
}

fn doc(id: &str, status: DocumentStatus) -> Document {
    Document {
        document_id: id.to_string(),
        filename: format!("{id}.pdf"),
        file_size: 100,
        pages: 3,
        upload_time: "2024-01-01T00:00:00Z".to_string(),
        status,
        chunk_count: 7,
    }
}

fn apply(state: DocumentsState, msgs: Vec<Msg>) -> DocumentsState {
    msgs.into_iter().fold(state, |state, msg| update(state, msg).0)
}

fn answered(question: &str, answer: &str) -> Msg {
    Msg::QueryAnswered {
        question: question.to_string(),
        response: QueryResponse::new(json!({ "answer": answer })),
        at: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
    }
}

#[test]
fn fetch_replaces_list_in_server_order_and_clears_loading() {
    init_logging();
    let state = apply(
        DocumentsState::new(),
        vec![Msg::DocumentsFetched(vec![doc("old", DocumentStatus::Pending)])],
    );

    let (state, effects) = update(state, Msg::FetchStarted);
    assert!(state.loading());
    assert!(effects.is_empty());

    let server = vec![
        doc("b", DocumentStatus::Completed),
        doc("a", DocumentStatus::Processing),
    ];
    let (state, _) = update(state, Msg::DocumentsFetched(server.clone()));
    assert_eq!(state.documents(), server.as_slice());
    assert!(!state.loading());
}

#[test]
fn fetch_failure_keeps_documents_and_reports() {
    init_logging();
    let state = apply(
        DocumentsState::new(),
        vec![
            Msg::DocumentsFetched(vec![doc("a", DocumentStatus::Completed)]),
            Msg::FetchStarted,
        ],
    );

    let (state, effects) = update(state, Msg::FetchFailed("connection refused".into()));
    assert_eq!(state.documents().len(), 1);
    assert!(!state.loading());
    assert_eq!(
        effects,
        vec![Effect::ReportFailure(OperationFailure::new(
            Operation::FetchDocuments,
            "connection refused"
        ))]
    );
}

#[test]
fn successful_upload_prepends_pending_document() {
    init_logging();
    let state = apply(
        DocumentsState::new(),
        vec![
            Msg::DocumentsFetched(vec![doc("existing", DocumentStatus::Completed)]),
            Msg::UploadStarted,
            Msg::UploadProgress(40),
        ],
    );
    assert!(state.loading());
    assert_eq!(state.upload_progress(), 40);

    let receipt = UploadReceipt {
        document_id: "d1".to_string(),
        filename: "report.pdf".to_string(),
        upload_time: "2024-01-01T00:00:00Z".to_string(),
        message: None,
    };
    let (state, effects) = update(
        state,
        Msg::UploadSucceeded {
            receipt,
            file_size: 2048,
        },
    );

    assert_eq!(
        state.documents()[0],
        Document {
            document_id: "d1".to_string(),
            filename: "report.pdf".to_string(),
            file_size: 2048,
            pages: 0,
            upload_time: "2024-01-01T00:00:00Z".to_string(),
            status: DocumentStatus::Pending,
            chunk_count: 0,
        }
    );
    assert_eq!(state.documents().len(), 2);
    assert_eq!(state.documents()[1].document_id, "existing");
    assert!(!state.loading());
    assert_eq!(state.upload_progress(), 0);
    assert!(matches!(&effects[..], [Effect::Notify(Notice { .. })]));
}

#[test]
fn failed_upload_resets_flags_without_inserting() {
    init_logging();
    let state = apply(
        DocumentsState::new(),
        vec![Msg::UploadStarted, Msg::UploadProgress(90)],
    );

    let (state, effects) = update(state, Msg::UploadFailed("http status 500".into()));
    assert!(state.documents().is_empty());
    assert!(!state.loading());
    assert_eq!(state.upload_progress(), 0);
    assert_eq!(effects.len(), 2);
    assert!(effects.contains(&Effect::ReportFailure(OperationFailure::new(
        Operation::UploadDocument,
        "http status 500"
    ))));
}

#[test]
fn upload_progress_is_clamped() {
    let (state, _) = update(DocumentsState::new(), Msg::UploadProgress(250));
    assert_eq!(state.upload_progress(), 100);
}

#[test]
fn reselecting_same_document_clears_history() {
    init_logging();
    let state = apply(
        DocumentsState::new(),
        vec![
            Msg::DocumentSelected(doc("d1", DocumentStatus::Completed)),
            answered("first?", "one"),
        ],
    );
    assert_eq!(state.query_history().len(), 1);

    let (state, _) = update(
        state,
        Msg::DocumentSelected(doc("d1", DocumentStatus::Completed)),
    );
    assert!(state.query_history().is_empty());
    assert_eq!(state.current_document().unwrap().document_id, "d1");
}

#[test]
fn failed_select_keeps_previous_selection() {
    init_logging();
    let state = apply(
        DocumentsState::new(),
        vec![
            Msg::DocumentSelected(doc("d1", DocumentStatus::Completed)),
            answered("q", "a"),
        ],
    );

    let (state, effects) = update(state, Msg::SelectFailed("not found".into()));
    assert_eq!(state.current_document().unwrap().document_id, "d1");
    assert_eq!(state.query_history().len(), 1);
    assert_eq!(effects.len(), 1);
}

#[test]
fn answers_append_in_order() {
    init_logging();
    let state = apply(
        DocumentsState::new(),
        vec![
            Msg::DocumentSelected(doc("d1", DocumentStatus::Completed)),
            answered("What is this about?", "..."),
            answered("Who wrote it?", "someone"),
            answered("What is this about?", "again"),
        ],
    );

    let questions: Vec<&str> = state
        .query_history()
        .iter()
        .map(|entry| entry.question.as_str())
        .collect();
    assert_eq!(
        questions,
        vec!["What is this about?", "Who wrote it?", "What is this about?"]
    );
    assert_eq!(state.query_history()[0].response.answer(), Some("..."));
}

#[test]
fn deleting_current_document_clears_selection_and_history() {
    init_logging();
    let state = apply(
        DocumentsState::new(),
        vec![
            Msg::DocumentsFetched(vec![
                doc("a", DocumentStatus::Completed),
                doc("b", DocumentStatus::Completed),
            ]),
            Msg::DocumentSelected(doc("b", DocumentStatus::Completed)),
            answered("q", "a"),
        ],
    );

    let (state, effects) = update(state, Msg::DocumentDeleted("b".into()));
    let ids: Vec<&str> = state
        .documents()
        .iter()
        .map(|doc| doc.document_id.as_str())
        .collect();
    assert_eq!(ids, vec!["a"]);
    assert!(state.current_document().is_none());
    assert!(state.query_history().is_empty());
    assert_eq!(
        effects,
        vec![Effect::Notify(Notice::success("Document deleted"))]
    );
}

#[test]
fn deleting_other_document_keeps_selection() {
    init_logging();
    let state = apply(
        DocumentsState::new(),
        vec![
            Msg::DocumentsFetched(vec![
                doc("a", DocumentStatus::Completed),
                doc("b", DocumentStatus::Completed),
            ]),
            Msg::DocumentSelected(doc("b", DocumentStatus::Completed)),
            answered("q", "a"),
        ],
    );

    let (state, _) = update(state, Msg::DocumentDeleted("a".into()));
    assert_eq!(state.documents().len(), 1);
    assert_eq!(state.current_document().unwrap().document_id, "b");
    assert_eq!(state.query_history().len(), 1);
}

#[test]
fn failed_delete_leaves_state_untouched() {
    init_logging();
    let state = apply(
        DocumentsState::new(),
        vec![
            Msg::DocumentsFetched(vec![doc("a", DocumentStatus::Completed)]),
            Msg::DocumentSelected(doc("a", DocumentStatus::Completed)),
        ],
    );
    let before = state.clone();

    let (state, effects) = update(state, Msg::DeleteFailed("http status 404".into()));
    assert_eq!(state.documents(), before.documents());
    assert_eq!(state.current_document(), before.current_document());
    assert!(effects.contains(&Effect::Notify(Notice::error("Document deletion failed"))));
}

#[test]
fn refresh_replaces_entry_in_place_and_current() {
    init_logging();
    let state = apply(
        DocumentsState::new(),
        vec![
            Msg::DocumentsFetched(vec![
                doc("a", DocumentStatus::Completed),
                doc("b", DocumentStatus::Processing),
                doc("c", DocumentStatus::Pending),
            ]),
            Msg::DocumentSelected(doc("b", DocumentStatus::Processing)),
        ],
    );

    let mut updated = doc("b", DocumentStatus::Completed);
    updated.pages = 12;
    let (state, effects) = update(state, Msg::DocumentRefreshed(updated.clone()));

    assert!(effects.is_empty());
    assert_eq!(state.documents()[1], updated);
    assert_eq!(state.documents()[0].document_id, "a");
    assert_eq!(state.documents()[2].document_id, "c");
    assert_eq!(state.current_document(), Some(&updated));
}

#[test]
fn refresh_of_unknown_document_does_not_insert() {
    init_logging();
    let mut state = apply(
        DocumentsState::new(),
        vec![Msg::DocumentsFetched(vec![doc("a", DocumentStatus::Pending)])],
    );
    assert!(state.consume_dirty());

    let (mut state, _) = update(state, Msg::DocumentRefreshed(doc("zzz", DocumentStatus::Completed)));
    assert_eq!(state.documents().len(), 1);
    assert!(!state.consume_dirty());
}
