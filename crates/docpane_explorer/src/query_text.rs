//! Effective query text per dialect.

use docpane_core::{Dialect, PartitionKeyResolver};

/// Builds the query sent to the backend for `filter`.
///
/// Document-proxy queries are the filter itself, or `{}` when it is empty.
/// Relational queries project the identity fields plus the partition key
/// values and append the filter clause.
///
/// # Examples
///
/// ```
/// use docpane_core::{Dialect, PartitionKeyDefinition, PartitionKeyResolver};
/// use docpane_explorer::build_query_text;
///
/// let resolver = PartitionKeyResolver::new(Some(&PartitionKeyDefinition::single("/category")));
/// assert_eq!(
///     build_query_text(Dialect::Relational, "WHERE c.id = \"1\"", &resolver),
///     "select c.id, c._self, c._rid, c._ts, c.category as _partitionKeyValue from c WHERE c.id = \"1\""
/// );
/// assert_eq!(build_query_text(Dialect::DocumentProxy, "  ", &resolver), "{}");
/// ```
pub fn build_query_text(dialect: Dialect, filter: &str, resolver: &PartitionKeyResolver) -> String {
    let filter = filter.trim();
    match dialect {
        Dialect::DocumentProxy if filter.is_empty() => dialect.default_filter().to_string(),
        Dialect::DocumentProxy => filter.to_string(),
        Dialect::Relational => {
            let select = match partition_key_projection(resolver.paths()) {
                Some(projection) => format!(
                    "select c.id, c._self, c._rid, c._ts, {} as _partitionKeyValue from c",
                    projection
                ),
                None => "select c.id, c._self, c._rid, c._ts from c".to_string(),
            };
            if filter.is_empty() {
                select
            } else {
                format!("{} {}", select, filter)
            }
        }
    }
}

fn partition_key_projection(paths: &[String]) -> Option<String> {
    match paths {
        [] => None,
        [single] => Some(path_accessor(single)),
        many => Some(format!(
            "[{}]",
            many.iter()
                .map(|path| path_accessor(path))
                .collect::<Vec<_>>()
                .join(", ")
        )),
    }
}

fn path_accessor(path: &str) -> String {
    path.split('/')
        .map(|segment| segment.trim_matches('"'))
        .filter(|segment| !segment.is_empty())
        .fold("c".to_string(), |mut accessor, segment| {
            if is_identifier(segment) {
                accessor.push('.');
                accessor.push_str(segment);
            } else {
                accessor.push_str(&format!("[\"{}\"]", segment.replace('"', "\\\"")));
            }
            accessor
        })
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
