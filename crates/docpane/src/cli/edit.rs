//! Create and delete command handlers.

use super::{AssumeYes, Session, StdinConfirm, read_content};
use docpane::{
    Confirm, DeleteOutcome, DocpaneConfig, DocpaneResult, ValidationError, ValidationErrorKind,
};
use std::path::Path;
use std::sync::Arc;

/// Creates a document and prints its stored rendering.
#[tracing::instrument(skip(content, config), fields(fixture = %fixture.display()))]
pub async fn create(
    fixture: &Path,
    content: &str,
    save: bool,
    config: &DocpaneConfig,
) -> DocpaneResult<()> {
    let content = read_content(content)?;
    let mut session = Session::open(fixture, config, Arc::new(StdinConfirm))?;

    session.tab.new_document();
    session.tab.edit(content);
    let identity = session.tab.save().await?;

    println!("Created {} ({})", identity.id(), identity.rid());
    if let Some(values) = identity.partition_key_values() {
        if !values.is_empty() {
            println!("Partition key: {}", identity.partition_key_display());
        }
    }
    println!("{}", session.tab.editor().content());

    if save {
        session.persist()?;
    }
    Ok(())
}

/// Deletes the document whose public id is `id`.
#[tracing::instrument(skip(config), fields(fixture = %fixture.display()))]
pub async fn delete(
    fixture: &Path,
    id: &str,
    yes: bool,
    save: bool,
    config: &DocpaneConfig,
) -> DocpaneResult<()> {
    let confirm: Arc<dyn Confirm> = if yes {
        Arc::new(AssumeYes)
    } else {
        Arc::new(StdinConfirm)
    };
    let mut session = Session::open(fixture, config, confirm)?;

    while !*session.tab.session().exhausted() {
        session.tab.load_more().await?;
    }
    let identity = session
        .tab
        .identities()
        .iter()
        .find(|identity| identity.id() == id)
        .cloned()
        .ok_or_else(|| {
            tracing::warn!(id, "No document with this id");
            ValidationError::new(ValidationErrorKind::NoDocumentSelected)
        })?;

    session.tab.select(&identity).await?;
    match session.tab.delete_selected().await? {
        DeleteOutcome::Deleted(deleted) => {
            println!("Deleted {} ({})", deleted.id(), deleted.rid());
            if save {
                session.persist()?;
            }
        }
        DeleteOutcome::Declined => println!("Delete cancelled"),
    }
    Ok(())
}
