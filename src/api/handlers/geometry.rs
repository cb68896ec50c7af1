//! Handler for GeoJSON export.

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::Value;

use crate::api::dto::boundary::validate_osm_id;
use crate::error::AppError;
use crate::state::AppState;

/// Exports the map layer below a boundary as a `FeatureCollection`.
///
/// # Endpoint
///
/// `GET /api/boundaries/geometry/{osm_id}`
///
/// A boundary with children returns one feature per child; a leaf returns its
/// own feature. Each feature carries `zoomable` when it has children itself.
///
/// # Errors
///
/// - 400 Bad Request if the osm id is malformed
/// - 404 Not Found if no boundary has this osm id
pub async fn geometry_handler(
    State(state): State<AppState>,
    Path(osm_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    validate_osm_id(&osm_id)?;

    Ok(Json(state.geometry_service.export(&osm_id).await?))
}
