//! Organization-scoped alternate names for boundaries.

use chrono::{DateTime, Utc};

/// An alternate name an organization attaches to a boundary.
///
/// Aliases are never edited in place: synchronization deletes every alias of
/// the (organization, boundary) pair and recreates them.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryAlias {
    pub id: i64,
    pub org_id: i64,
    pub boundary_id: i64,
    pub name: String,
    pub created_by: String,
    pub modified_by: String,
    pub created_on: DateTime<Utc>,
    pub modified_on: DateTime<Utc>,
}

/// Splits a newline-delimited alias blob into alias texts.
///
/// Empty segments are dropped; duplicates and order are preserved.
pub fn parse_alias_blob(blob: &str) -> Vec<String> {
    blob.split('\n')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

/// Joins alias texts back into the blob form used by the alias editor.
pub fn join_aliases<S: AsRef<str>>(aliases: &[S]) -> String {
    aliases
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("\n")
}
