//! Repository trait for read access to the boundary hierarchy.

use std::collections::HashMap;

use crate::domain::entities::{Boundary, BoundarySummary};
use crate::error::AppError;
use async_trait::async_trait;

/// Filter criteria for boundary listing.
///
/// `search` matches the name or the osm id, case-insensitively, as a substring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryFilter {
    pub search: Option<String>,
    pub offset: i64,
    pub limit: i64,
}

impl BoundaryFilter {
    /// Creates a new filter with pagination parameters.
    pub fn new(offset: i64, limit: i64) -> Self {
        Self {
            search: None,
            offset,
            limit,
        }
    }

    /// Adds a search term. Blank terms are ignored.
    pub fn with_search(mut self, search: Option<String>) -> Self {
        self.search = search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        self
    }
}

/// Repository interface for the boundary hierarchy.
///
/// Boundaries are read-only here; provisioning happens through the admin
/// import (see [`crate::infrastructure::persistence::PgBoundaryRepository::import`]).
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgBoundaryRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::memory::InMemoryStore`] - In-memory implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_boundary.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BoundaryRepository: Send + Sync {
    /// Finds a boundary by its external (osm) id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_osm_id(&self, osm_id: &str) -> Result<Option<Boundary>, AppError>;

    /// Finds a boundary by its database ID.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_id(&self, id: i64) -> Result<Option<Boundary>, AppError>;

    /// Lists the direct children of a boundary, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn children_of(&self, boundary_id: i64) -> Result<Vec<Boundary>, AppError>;

    /// Lists the direct children of all given boundaries in one call,
    /// ordered by (parent osm id, name).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn children_of_any(&self, boundary_ids: &[i64]) -> Result<Vec<Boundary>, AppError>;

    /// Counts direct children for each given boundary.
    ///
    /// Boundaries without children are absent from the map.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count_children_of_any(
        &self,
        boundary_ids: &[i64],
    ) -> Result<HashMap<i64, i64>, AppError>;

    /// Lists boundaries matching the filter, ordered by name then osm id.
    ///
    /// Only coordinate counts are returned; the geometry itself is not loaded.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn search(&self, filter: &BoundaryFilter) -> Result<Vec<BoundarySummary>, AppError>;

    /// Counts boundaries matching the filter, ignoring pagination.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count_matching(&self, filter: &BoundaryFilter) -> Result<i64, AppError>;

    /// Counts all boundaries.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count(&self) -> Result<i64, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_blank_search_is_ignored() {
        let filter = BoundaryFilter::new(0, 25).with_search(Some("   ".to_string()));
        assert!(filter.search.is_none());
    }

    #[test]
    fn test_filter_search_is_trimmed() {
        let filter = BoundaryFilter::new(25, 25).with_search(Some(" kig ".to_string()));
        assert_eq!(filter.search.as_deref(), Some("kig"));
        assert_eq!(filter.offset, 25);
    }
}
