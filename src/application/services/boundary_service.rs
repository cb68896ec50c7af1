//! Boundary lookup and listing service.

use std::sync::Arc;

use crate::domain::entities::{Boundary, BoundarySummary};
use crate::domain::repositories::{BoundaryFilter, BoundaryRepository, OrganizationRepository};
use crate::error::AppError;
use serde_json::json;

/// Service for reading boundaries outside the tree operations.
pub struct BoundaryService {
    boundaries: Arc<dyn BoundaryRepository>,
    organizations: Arc<dyn OrganizationRepository>,
}

impl BoundaryService {
    pub fn new(
        boundaries: Arc<dyn BoundaryRepository>,
        organizations: Arc<dyn OrganizationRepository>,
    ) -> Self {
        Self {
            boundaries,
            organizations,
        }
    }

    /// Lists boundaries matching the filter, ordered by name.
    ///
    /// Returns the page of summaries together with the total number of matches.
    pub async fn list(
        &self,
        filter: BoundaryFilter,
    ) -> Result<(Vec<BoundarySummary>, i64), AppError> {
        let summaries = self.boundaries.search(&filter).await?;
        let total = self.boundaries.count_matching(&filter).await?;

        Ok((summaries, total))
    }

    /// Fetches a boundary by osm id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no boundary has this osm id.
    pub async fn get(&self, osm_id: &str) -> Result<Boundary, AppError> {
        self.boundaries
            .find_by_osm_id(osm_id)
            .await?
            .ok_or_else(|| AppError::not_found("Boundary not found", json!({"osm_id": osm_id})))
    }

    /// Resolves the country boundary an organization edits aliases under.
    ///
    /// Returns `Ok(None)` when the organization has not chosen a country yet.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the organization does not exist.
    pub async fn country_for_org(&self, org_id: i64) -> Result<Option<Boundary>, AppError> {
        let org = self
            .organizations
            .find_by_id(org_id)
            .await?
            .ok_or_else(|| AppError::not_found("Organization not found", json!({"id": org_id})))?;

        match org.country_id {
            Some(country_id) => self.boundaries.find_by_id(country_id).await,
            None => Ok(None),
        }
    }

    /// Total number of stored boundaries.
    pub async fn count(&self) -> Result<i64, AppError> {
        self.boundaries.count().await
    }
}
