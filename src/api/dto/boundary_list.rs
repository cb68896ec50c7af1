//! DTOs for the boundary list endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::dto::pagination::{PaginationMeta, PaginationParams};
use crate::domain::entities::{BoundaryLevel, BoundarySummary};

/// Query parameters for `GET /api/boundaries`.
#[derive(Debug, Deserialize, Validate)]
pub struct BoundaryQueryParams {
    #[serde(flatten)]
    pub pagination: PaginationParams,

    /// Case-insensitive substring of the name or osm id.
    #[validate(length(max = 100))]
    pub search: Option<String>,
}

/// Paginated list of boundaries.
#[derive(Debug, Serialize)]
pub struct BoundaryListResponse {
    pub pagination: PaginationMeta,
    pub items: Vec<BoundaryItem>,
}

#[derive(Debug, Serialize)]
pub struct BoundaryItem {
    pub osm_id: String,
    pub name: String,
    pub level: BoundaryLevel,
    pub geometry_coords: usize,
    pub simplified_geometry_coords: usize,
}

impl From<BoundarySummary> for BoundaryItem {
    fn from(summary: BoundarySummary) -> Self {
        Self {
            osm_id: summary.osm_id,
            name: summary.name,
            level: summary.level,
            geometry_coords: summary.geometry_coords,
            simplified_geometry_coords: summary.simplified_geometry_coords,
        }
    }
}
