//! Partition key diagnostics for a candidate document.

use super::read_content;
use docpane::{DocpaneResult, Fixture, ValidationError, ValidationErrorKind, parse_object};
use std::path::Path;

/// Prints how the fixture container's partition key applies to `content`.
#[tracing::instrument(skip(content), fields(fixture = %fixture.display()))]
pub fn check(fixture: &Path, content: &str) -> DocpaneResult<()> {
    let content = read_content(content)?;
    let fixture = Fixture::from_file(fixture)?;
    let container = fixture.container();
    let resolver = container.resolver();
    let document = parse_object(&content)
        .ok_or_else(|| ValidationError::new(ValidationErrorKind::NotAnObject))?;

    println!(
        "Container: {}/{} ({})",
        container.database_id(),
        container.container_id(),
        container.dialect()
    );
    if resolver.paths().is_empty() {
        println!("Partition key: none");
        return Ok(());
    }

    println!("Partition key paths: {}", resolver.paths().join(", "));
    match resolver.extract_values(&document) {
        Some(values) => {
            let rendered: Vec<String> = values.iter().map(ToString::to_string).collect();
            println!("Extracted values: {}", rendered.join(", "));
        }
        None => println!("Extracted values: none"),
    }
    println!("Shard key present: {}", resolver.has_shard_key(&document));
    println!("Shard key required: {}", resolver.requires_shard_key());
    if let Some(advisory) = resolver.extended_key_advisory() {
        println!("{}", advisory);
    }
    Ok(())
}
