mod test_utils;

use docpane_core::Dialect;
use docpane_error::{BackendError, DocpaneErrorKind, ValidationErrorKind};
use docpane_explorer::{
    DISCARD_CONFIRMATION, DeleteOutcome, EditorCommand, EditorState, SelectOutcome,
};
use docpane_interface::Action;
use serde_json::json;
use test_utils::{SpanEvent, TestHarness};

async fn loaded(dialect: Dialect, partition_key: Option<&str>, documents: Vec<serde_json::Value>) -> TestHarness {
    let mut harness = TestHarness::new(dialect, partition_key, 100, documents);
    harness.tab.load_more().await.unwrap();
    harness
}

fn non_load_events(harness: &TestHarness) -> Vec<SpanEvent> {
    harness
        .instrumentation
        .events()
        .into_iter()
        .filter(|event| {
            !matches!(
                event,
                SpanEvent::Start(Action::LoadDocuments) | SpanEvent::Success(Action::LoadDocuments)
            )
        })
        .collect()
}

#[tokio::test]
async fn missing_shard_key_is_rejected_locally() {
    let mut harness = loaded(Dialect::DocumentProxy, Some("/category"), vec![]).await;
    let calls_before = harness.backend.calls();

    harness.tab.new_document();
    harness.tab.edit(r#"{"_id":"a1"}"#);
    let err = harness.tab.save().await.unwrap_err();

    match err.kind() {
        DocpaneErrorKind::Validation(validation) => assert_eq!(
            validation.kind,
            ValidationErrorKind::MissingShardKey("category".to_string())
        ),
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(
        harness.tab.status().inline_error().as_deref(),
        Some("The document is lacking the shard property: category")
    );
    assert_eq!(harness.backend.calls(), calls_before);
    assert!(non_load_events(&harness).is_empty());
    assert!(harness.notify.messages().is_empty());
    assert_eq!(harness.tab.editor().state(), EditorState::NewDocumentValid);
}

#[tokio::test]
async fn id_shard_key_needs_no_extra_field() {
    let mut harness = loaded(Dialect::DocumentProxy, Some("/_id"), vec![]).await;

    harness.tab.new_document();
    harness.tab.edit(r#"{"_id":"a1"}"#);
    let identity = harness.tab.save().await.unwrap();
    assert_eq!(identity.id(), "a1");
}

#[tokio::test]
async fn relational_create_does_not_require_partition_value() {
    let mut harness = loaded(Dialect::Relational, Some("/category"), vec![]).await;

    harness.tab.new_document();
    harness.tab.edit(r#"{"id":"loose"}"#);
    assert!(harness.tab.save().await.is_ok());
}

#[tokio::test]
async fn create_appends_identity_and_shows_document() {
    let mut harness = loaded(
        Dialect::DocumentProxy,
        Some("/category"),
        vec![json!({"_id": "existing", "category": "books"})],
    )
    .await;

    harness.tab.new_document();
    assert_eq!(harness.tab.save_label(), "Save");
    harness.tab.edit(r#"{"_id":"a2","category":"music"}"#);
    let identity = harness.tab.save().await.unwrap();

    assert_eq!(harness.tab.identities().len(), 2);
    assert_eq!(harness.tab.identities()[1].rid(), identity.rid());
    assert_eq!(identity.partition_key_display(), "music");
    assert_eq!(harness.tab.editor().state(), EditorState::ExistingDocumentNoEdits);
    assert!(!harness.tab.editor().content().contains("_self"));
    assert_eq!(harness.tab.save_label(), "Update");
    assert_eq!(
        non_load_events(&harness),
        vec![
            SpanEvent::Start(Action::CreateDocument),
            SpanEvent::Success(Action::CreateDocument)
        ]
    );
    assert!(!harness.tab.status().executing());
}

#[tokio::test]
async fn create_failure_keeps_the_users_content() {
    let mut harness = loaded(Dialect::Relational, None, vec![json!({"id": "taken"})]).await;

    harness.tab.new_document();
    harness.tab.edit(r#"{"id":"taken","note":"mine"}"#);
    let err = harness.tab.save().await.unwrap_err();

    assert!(!err.is_validation());
    assert_eq!(harness.tab.editor().state(), EditorState::NewDocumentValid);
    assert!(harness.tab.editor().content().contains("mine"));
    assert_eq!(harness.tab.identities().len(), 1);
    assert!(*harness.tab.status().execution_error());
    assert!(!*harness.tab.status().executing());
    assert_eq!(
        harness.notify.messages(),
        vec!["Entity with the specified id already exists in the system.".to_string()]
    );
    assert_eq!(
        non_load_events(&harness),
        vec![
            SpanEvent::Start(Action::CreateDocument),
            SpanEvent::Failure(
                Action::CreateDocument,
                "Entity with the specified id already exists in the system.".to_string()
            )
        ]
    );
}

#[tokio::test]
async fn invalid_edit_disables_save() {
    let mut harness = loaded(Dialect::Relational, None, vec![json!({"id": "a"})]).await;
    let rid = harness.tab.identities()[0].rid().clone();
    harness.tab.select_rid(&rid).await.unwrap();
    assert_eq!(harness.tab.editor().state(), EditorState::ExistingDocumentNoEdits);

    harness.tab.edit("{ \"id\": \"a\", ");
    assert_eq!(harness.tab.editor().state(), EditorState::ExistingDocumentDirtyInvalid);
    assert!(!harness.tab.enabled_commands().contains(&EditorCommand::Save));
}

#[tokio::test]
async fn update_replaces_only_the_matching_public_id() {
    let mut harness = loaded(
        Dialect::Relational,
        None,
        vec![json!({"id": "a"}), json!({"id": "b"}), json!({"id": "c"})],
    )
    .await;
    let before: Vec<_> = harness.tab.identities().to_vec();
    let target = before[1].clone();

    harness.tab.select(&target).await.unwrap();
    harness.tab.edit(r#"{"id": "b-renamed", "extra": true}"#);
    assert_eq!(harness.tab.editor().state(), EditorState::ExistingDocumentDirtyValid);
    let updated = harness.tab.save().await.unwrap();

    assert_eq!(updated.rid(), target.rid());
    assert_eq!(updated.id(), "b-renamed");
    let after = harness.tab.identities();
    assert_eq!(after.len(), 3);
    assert_eq!(after[0], before[0]);
    assert_eq!(after[1].id(), "b-renamed");
    assert_eq!(after[1].rid(), before[1].rid());
    assert_eq!(after[2], before[2]);
    assert_eq!(harness.tab.editor().state(), EditorState::ExistingDocumentNoEdits);
}

#[tokio::test]
async fn update_failure_leaves_editor_dirty() {
    let mut harness = loaded(Dialect::Relational, None, vec![json!({"id": "a"})]).await;
    let identity = harness.tab.identities()[0].clone();
    harness.tab.select(&identity).await.unwrap();
    harness.tab.edit(r#"{"id": "a", "v": 2}"#);

    harness
        .backend
        .inject_failure(BackendError::new("Precondition failed").with_stack("at replace"));
    assert!(harness.tab.save().await.is_err());

    assert_eq!(harness.tab.editor().state(), EditorState::ExistingDocumentDirtyValid);
    assert_eq!(harness.tab.identities()[0], identity);
    assert!(*harness.tab.status().execution_error());
}

#[tokio::test]
async fn declined_delete_changes_nothing() {
    let mut harness = loaded(Dialect::DocumentProxy, None, vec![json!({"_id": "a"})]).await;
    let identity = harness.tab.identities()[0].clone();
    harness.tab.select(&identity).await.unwrap();
    let identities_before = harness.tab.identities().to_vec();
    let editor_before = harness.tab.editor().clone();
    let calls_before = harness.backend.calls();

    harness.confirm.set_answer(false);
    let outcome = harness.tab.delete_selected().await.unwrap();

    assert_eq!(outcome, DeleteOutcome::Declined);
    assert_eq!(harness.tab.identities(), identities_before.as_slice());
    assert_eq!(harness.tab.editor(), &editor_before);
    assert_eq!(harness.backend.calls(), calls_before);
    assert!(non_load_events(&harness).is_empty());
    assert_eq!(
        harness.confirm.prompts(),
        vec!["Are you sure you want to delete the selected document?".to_string()]
    );
}

#[tokio::test]
async fn confirmed_delete_removes_row_and_clears_editor() {
    let mut harness = loaded(
        Dialect::Relational,
        None,
        vec![json!({"id": "a"}), json!({"id": "b"})],
    )
    .await;
    let identity = harness.tab.identities()[0].clone();
    harness.tab.select(&identity).await.unwrap();

    let outcome = harness.tab.delete_selected().await.unwrap();

    assert_eq!(outcome, DeleteOutcome::Deleted(identity.clone()));
    assert_eq!(harness.tab.identities().len(), 1);
    assert_ne!(harness.tab.identities()[0].rid(), identity.rid());
    assert_eq!(harness.tab.editor().state(), EditorState::NoDocumentSelected);
    assert_eq!(harness.backend.documents().len(), 1);
}

#[tokio::test]
async fn failed_delete_keeps_row() {
    let mut harness = loaded(Dialect::Relational, None, vec![json!({"id": "a"})]).await;
    let identity = harness.tab.identities()[0].clone();
    harness.tab.select(&identity).await.unwrap();

    harness.backend.inject_failure(BackendError::new("Service unavailable"));
    assert!(harness.tab.delete_selected().await.is_err());

    assert_eq!(harness.tab.identities().len(), 1);
    assert_eq!(harness.tab.editor().state(), EditorState::ExistingDocumentNoEdits);
    assert!(non_load_events(&harness).contains(&SpanEvent::Failure(
        Action::DeleteDocument,
        "Service unavailable".to_string()
    )));
}

#[tokio::test]
async fn switching_away_from_edits_asks_first() {
    let mut harness = loaded(
        Dialect::Relational,
        None,
        vec![json!({"id": "a"}), json!({"id": "b"})],
    )
    .await;
    let first = harness.tab.identities()[0].clone();
    let second = harness.tab.identities()[1].clone();
    harness.tab.select(&first).await.unwrap();
    assert_eq!(harness.confirm.count(), 0);

    harness.tab.edit(r#"{"id": "a", "draft": 1}"#);
    harness.confirm.set_answer(false);
    assert_eq!(harness.tab.select(&second).await.unwrap(), SelectOutcome::Declined);
    assert_eq!(harness.tab.editor().selected(), Some(&first));
    assert!(harness.tab.editor().content().contains("draft"));
    assert_eq!(harness.confirm.prompts(), vec![DISCARD_CONFIRMATION.to_string()]);

    harness.confirm.set_answer(true);
    assert_eq!(
        harness.tab.select(&second).await.unwrap(),
        SelectOutcome::Selected(second.clone())
    );
    assert_eq!(harness.tab.editor().state(), EditorState::ExistingDocumentNoEdits);
}

#[tokio::test]
async fn save_without_document_is_a_validation_error() {
    let mut harness = loaded(Dialect::Relational, None, vec![]).await;
    let err = harness.tab.save().await.unwrap_err();
    assert!(err.is_validation());
    assert_eq!(harness.backend.calls().total(), 1);
}
