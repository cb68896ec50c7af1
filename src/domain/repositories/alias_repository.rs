//! Repository trait for organization-scoped boundary aliases.

use crate::domain::entities::BoundaryAlias;
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for boundary aliases.
///
/// Aliases are partitioned by organization. Replacement of one
/// (organization, boundary) pair must be atomic: concurrent replacements of the
/// same pair serialize, so readers see either the old or a complete new set.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgAliasRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::memory::InMemoryStore`] - In-memory implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_alias.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AliasRepository: Send + Sync {
    /// Lists the alias texts an organization holds for a boundary, in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list_aliases(&self, org_id: i64, boundary_id: i64) -> Result<Vec<String>, AppError>;

    /// Lists the organization's aliases for several boundaries at once,
    /// ordered by boundary id then creation order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list_aliases_for(
        &self,
        org_id: i64,
        boundary_ids: &[i64],
    ) -> Result<Vec<BoundaryAlias>, AppError>;

    /// Replaces every alias the organization holds for a boundary.
    ///
    /// Deletes the existing aliases, then inserts one alias per non-empty name,
    /// keeping duplicates and order. `actor` is recorded as provenance.
    ///
    /// # Returns
    ///
    /// The number of aliases inserted.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors; nothing is changed then.
    async fn replace_aliases(
        &self,
        org_id: i64,
        boundary_id: i64,
        names: Vec<String>,
        actor: &str,
    ) -> Result<usize, AppError>;

    /// Counts all aliases held by an organization.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count_for_org(&self, org_id: i64) -> Result<i64, AppError>;
}
