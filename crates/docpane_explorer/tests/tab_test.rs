mod test_utils;

use docpane_core::Dialect;
use docpane_error::BackendError;
use docpane_explorer::{DISCARD_CONFIRMATION, EditorCommand, EditorState, TabSettings};
use docpane_interface::Action;
use serde_json::json;
use test_utils::{SpanEvent, TestHarness};

fn catalogue() -> Vec<serde_json::Value> {
    vec![
        json!({"id": "a", "category": "books"}),
        json!({"id": "b", "category": "music"}),
        json!({"id": "c", "category": "books"}),
    ]
}

#[tokio::test]
async fn only_the_first_load_is_instrumented() {
    let mut harness = TestHarness::new(Dialect::Relational, None, 1, catalogue());

    harness.tab.load_more().await.unwrap();
    harness.tab.load_more().await.unwrap();
    harness.tab.apply_filter("WHERE c.category = \"books\"").await.unwrap();

    assert_eq!(
        harness.instrumentation.events(),
        vec![
            SpanEvent::Start(Action::LoadDocuments),
            SpanEvent::Success(Action::LoadDocuments)
        ]
    );
}

#[tokio::test]
async fn failed_first_load_reports_and_keeps_session() {
    let mut harness = TestHarness::new(Dialect::Relational, None, 10, catalogue());
    harness
        .backend
        .inject_failure(BackendError::new("Request rate is large").with_stack("at queryDocuments"));

    assert!(harness.tab.load_more().await.is_err());

    assert!(harness.tab.identities().is_empty());
    assert_eq!(*harness.tab.session().pages_fetched(), 0);
    assert!(*harness.tab.status().execution_error());
    assert!(!*harness.tab.status().executing());
    assert_eq!(harness.notify.messages(), vec!["Request rate is large".to_string()]);
    assert_eq!(
        harness.instrumentation.events(),
        vec![
            SpanEvent::Start(Action::LoadDocuments),
            SpanEvent::Failure(Action::LoadDocuments, "Request rate is large".to_string())
        ]
    );

    // A retry starts from the first page again and clears the error.
    harness.tab.load_more().await.unwrap();
    assert_eq!(harness.tab.identities().len(), 3);
    assert!(!*harness.tab.status().execution_error());
}

#[tokio::test]
async fn unfiltered_load_leaves_editor_empty() {
    let mut harness = TestHarness::new(Dialect::DocumentProxy, None, 10, vec![json!({"_id": "x"})]);

    harness.tab.load_more().await.unwrap();

    assert_eq!(harness.tab.identities().len(), 1);
    assert_eq!(harness.tab.editor().state(), EditorState::NoDocumentSelected);
    assert_eq!(harness.backend.calls().read(), &0);
}

#[tokio::test]
async fn filtered_load_shows_first_match() {
    let mut harness = TestHarness::new(Dialect::Relational, Some("/category"), 10, catalogue());
    harness.tab.load_more().await.unwrap();

    harness.tab.apply_filter("WHERE c.category = \"books\"").await.unwrap();

    let ids: Vec<&str> = harness.tab.identities().iter().map(|i| i.id().as_str()).collect();
    assert_eq!(ids, vec!["a", "c"]);
    let selected = harness.tab.editor().selected().unwrap();
    assert_eq!(selected.id(), "a");
    assert_eq!(selected.partition_key_display(), "books");
    assert_eq!(harness.tab.editor().state(), EditorState::ExistingDocumentNoEdits);
    assert!(harness.tab.editor().content().contains("\"category\": \"books\""));
}

#[tokio::test]
async fn empty_result_clears_editor() {
    let mut harness = TestHarness::new(Dialect::Relational, None, 10, catalogue());
    harness.tab.load_more().await.unwrap();
    let first = harness.tab.identities()[0].clone();
    harness.tab.select(&first).await.unwrap();

    harness.tab.apply_filter("WHERE c.category = \"games\"").await.unwrap();

    assert!(harness.tab.identities().is_empty());
    assert_eq!(harness.tab.editor().state(), EditorState::NoDocumentSelected);
}

#[tokio::test]
async fn empty_result_asks_before_dropping_edits() {
    let mut harness = TestHarness::new(Dialect::Relational, None, 10, catalogue());
    harness.tab.load_more().await.unwrap();
    let first = harness.tab.identities()[0].clone();
    harness.tab.select(&first).await.unwrap();
    harness.tab.edit(r#"{"id": "a", "draft": "unsaved work"}"#);

    harness.confirm.set_answer(false);
    harness.tab.apply_filter("WHERE c.category = \"games\"").await.unwrap();

    assert!(harness.tab.identities().is_empty());
    assert_eq!(harness.tab.editor().state(), EditorState::ExistingDocumentDirtyValid);
    assert!(harness.tab.editor().content().contains("unsaved work"));
    assert_eq!(harness.confirm.prompts(), vec![DISCARD_CONFIRMATION.to_string()]);

    harness.confirm.set_answer(true);
    harness.tab.apply_filter("WHERE c.category = \"film\"").await.unwrap();
    assert_eq!(harness.tab.editor().state(), EditorState::NoDocumentSelected);
}

#[tokio::test]
async fn empty_container_keeps_half_typed_document() {
    let mut harness = TestHarness::new(Dialect::DocumentProxy, None, 10, vec![]);
    harness.tab.new_document();
    harness.tab.edit(r#"{"_id": "mine", "title": "draft"}"#);

    harness.confirm.set_answer(false);
    harness.tab.apply_filter("{}").await.unwrap();

    assert_eq!(harness.tab.editor().state(), EditorState::NewDocumentValid);
    assert!(harness.tab.editor().content().contains("mine"));
    assert_eq!(harness.confirm.count(), 1);
}

#[tokio::test]
async fn untouched_template_is_cleared_without_asking() {
    let mut harness = TestHarness::new(Dialect::DocumentProxy, None, 10, vec![]);
    harness.tab.new_document();

    harness.tab.apply_filter("{}").await.unwrap();

    assert_eq!(harness.tab.editor().state(), EditorState::NoDocumentSelected);
    assert_eq!(harness.confirm.count(), 0);
}

#[tokio::test]
async fn first_match_does_not_replace_unsaved_edits() {
    let mut harness = TestHarness::new(Dialect::Relational, None, 10, catalogue());
    harness.tab.load_more().await.unwrap();
    let music = harness.tab.identities()[1].clone();
    harness.tab.select(&music).await.unwrap();
    harness.tab.edit(r#"{"id": "b", "category": "jazz"}"#);

    harness.confirm.set_answer(false);
    harness.tab.apply_filter("WHERE c.category = \"books\"").await.unwrap();

    assert_eq!(harness.tab.identities().len(), 2);
    assert_eq!(harness.tab.editor().selected(), Some(&music));
    assert!(harness.tab.editor().content().contains("jazz"));
    assert_eq!(harness.confirm.prompts(), vec![DISCARD_CONFIRMATION.to_string()]);
}

#[tokio::test]
async fn later_pages_leave_the_chosen_row_alone() {
    let mut harness = TestHarness::new(Dialect::Relational, None, 1, catalogue());

    harness.tab.apply_filter("WHERE c.category = \"books\"").await.unwrap();
    assert_eq!(harness.tab.editor().selected().unwrap().id(), "a");

    harness.tab.load_more().await.unwrap();
    let second = harness.tab.identities()[1].clone();
    assert_eq!(second.id(), "c");
    harness.tab.select(&second).await.unwrap();

    harness.tab.load_more().await.unwrap();
    assert_eq!(harness.tab.editor().selected(), Some(&second));
    assert_eq!(harness.backend.calls().read(), &2);
}

#[tokio::test]
async fn new_document_uses_dialect_template() {
    let mut harness = TestHarness::new(Dialect::DocumentProxy, None, 10, vec![]);
    harness.tab.load_more().await.unwrap();

    harness.tab.new_document();
    assert_eq!(harness.tab.editor().state(), EditorState::NewDocumentValid);
    assert!(harness.tab.editor().content().contains("\"_id\": \"replace_with_new_document_id\""));
    assert!(harness.tab.enabled_commands().contains(&EditorCommand::Save));
    assert!(!harness.tab.enabled_commands().contains(&EditorCommand::Delete));

    harness.tab.edit("not json");
    assert_eq!(harness.tab.editor().state(), EditorState::NewDocumentInvalid);
    assert!(!harness.tab.enabled_commands().contains(&EditorCommand::Save));

    harness.tab.discard();
    assert_eq!(harness.tab.editor().state(), EditorState::NoDocumentSelected);
}

#[tokio::test]
async fn discard_restores_stored_rendering() {
    let mut harness = TestHarness::new(Dialect::Relational, None, 10, catalogue());
    harness.tab.load_more().await.unwrap();
    let rid = harness.tab.identities()[1].rid().clone();
    harness.tab.select_rid(&rid).await.unwrap();
    let stored = harness.tab.editor().content().to_string();

    harness.tab.edit("{\"id\": \"b\", \"category\": \"film\"}");
    assert_eq!(harness.tab.save_label(), "Update");
    harness.tab.discard();

    assert_eq!(harness.tab.editor().content(), stored);
    assert_eq!(harness.tab.editor().state(), EditorState::ExistingDocumentNoEdits);
}

#[tokio::test]
async fn unknown_rid_is_rejected() {
    let mut harness = TestHarness::new(Dialect::Relational, None, 10, catalogue());
    harness.tab.load_more().await.unwrap();

    let err = harness.tab.select_rid("missing").await.unwrap_err();
    assert!(err.is_validation());
    assert_eq!(harness.backend.calls().read(), &0);
}

#[test]
fn headers_and_summaries_follow_the_container() {
    let relational = TestHarness::new(Dialect::Relational, Some("/address/zip"), 10, vec![]);
    assert_eq!(relational.tab.partition_key_header().as_deref(), Some("/address/zip"));
    assert_eq!(relational.tab.filter_summary(), "SELECT * FROM c");

    let proxy = TestHarness::new(Dialect::DocumentProxy, None, 10, vec![]);
    assert_eq!(proxy.tab.partition_key_header(), None);
    assert_eq!(proxy.tab.filter_summary(), "Filter : {}");
}

#[test]
fn settings_default_to_cross_partition_queries() {
    let settings = TabSettings::default();
    assert_eq!(settings.tab_title(), "Documents");
    assert!(*settings.cross_partition_enabled());
    let built = TabSettings::builder()
        .cross_partition_enabled(false)
        .build()
        .unwrap();
    assert!(!*built.cross_partition_enabled());
    assert_eq!(built.tab_title(), "Documents");
}
