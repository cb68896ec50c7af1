//! Organization entity owning boundary aliases.

use chrono::{DateTime, Utc};

/// An organization that maintains its own aliases.
///
/// `country_id` designates the country boundary whose subtree the
/// organization edits aliases for; it is unset until setup is completed.
#[derive(Debug, Clone, PartialEq)]
pub struct Organization {
    pub id: i64,
    pub name: String,
    pub country_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Authenticated caller resolved by the auth middleware.
///
/// Passed explicitly to services instead of being read from request state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrgContext {
    pub org_id: i64,
    /// Name recorded as alias provenance (the API token's name).
    pub actor: String,
}

impl OrgContext {
    pub fn new(org_id: i64, actor: impl Into<String>) -> Self {
        Self {
            org_id,
            actor: actor.into(),
        }
    }
}
