use docdesk_core::{update, DocumentsState, Msg};

#[test]
fn update_is_noop() {
    let state = DocumentsState::new();
    let (next, effects) = update(state.clone(), Msg::NoOp);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}
