//! Path parameters and single-boundary responses.

use regex::Regex;
use serde::Serialize;
use serde_json::json;
use std::sync::LazyLock;

use crate::domain::entities::{Boundary, BoundaryLevel};
use crate::error::AppError;

/// Osm ids are a type letter followed by digits, e.g. `R192787`.
static OSM_ID_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\w\d+$").unwrap());

/// Rejects path osm ids that cannot name a boundary.
pub fn validate_osm_id(osm_id: &str) -> Result<(), AppError> {
    if OSM_ID_REGEX.is_match(osm_id) {
        Ok(())
    } else {
        Err(AppError::bad_request(
            "Invalid osm id",
            json!({"osm_id": osm_id, "expected": "letter followed by digits, e.g. R192787"}),
        ))
    }
}

/// A boundary without its geometry.
#[derive(Debug, Serialize)]
pub struct BoundaryResponse {
    pub osm_id: String,
    pub name: String,
    pub level: BoundaryLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_osm_id: Option<String>,
}

impl From<Boundary> for BoundaryResponse {
    fn from(boundary: Boundary) -> Self {
        Self {
            osm_id: boundary.osm_id,
            name: boundary.name,
            level: boundary.level,
            parent_osm_id: boundary.parent_osm_id,
        }
    }
}
