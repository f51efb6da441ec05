//! Browse command handler.

use super::{OutputFormat, Session, StdinConfirm};
use docpane::{DocpaneConfig, DocpaneResult, JsonError};
use serde_json::json;
use std::path::Path;
use std::sync::Arc;

/// Loads up to `pages` pages of `filter` and prints the document list.
#[tracing::instrument(skip(config, filter), fields(fixture = %fixture.display()))]
pub async fn browse(
    fixture: &Path,
    filter: Option<&str>,
    pages: usize,
    format: OutputFormat,
    config: &DocpaneConfig,
) -> DocpaneResult<()> {
    let mut session = Session::open(fixture, config, Arc::new(StdinConfirm))?;
    let tab = &mut session.tab;

    match filter {
        Some(filter) => tab.apply_filter(filter).await?,
        None => tab.load_more().await?,
    };
    for _ in 1..pages.max(1) {
        if *tab.session().exhausted() {
            break;
        }
        tab.load_more().await?;
    }

    match format {
        OutputFormat::Json => {
            let output = json!({
                "filter": tab.filter_summary(),
                "partitionKey": tab.partition_key_header(),
                "documents": tab.identities(),
                "exhausted": tab.session().exhausted(),
                "selected": tab.editor().selected(),
            });
            let text = serde_json::to_string_pretty(&output).map_err(JsonError::from)?;
            println!("{}", text);
        }
        OutputFormat::Human => {
            println!("{}", tab.filter_summary());
            let header = tab.partition_key_header();
            match &header {
                Some(header) => println!("{:<24} {:<32} {}", "_rid", "id", header),
                None => println!("{:<24} {}", "_rid", "id"),
            }
            println!("{:-<80}", "");
            for identity in tab.identities() {
                match &header {
                    Some(_) => println!(
                        "{:<24} {:<32} {}",
                        identity.rid(),
                        identity.id(),
                        identity.partition_key_display()
                    ),
                    None => println!("{:<24} {}", identity.rid(), identity.id()),
                }
            }
            println!("{:-<80}", "");
            let more = if *tab.session().exhausted() {
                "all loaded"
            } else {
                "more available"
            };
            println!("Total: {} documents ({})", tab.identities().len(), more);

            if tab.editor().selected().is_some() {
                println!();
                println!("{}", tab.editor().content());
            }
        }
    }
    Ok(())
}
