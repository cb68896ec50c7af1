//! Handlers for boundary listing and the organization's alias root.

use axum::{
    Extension, Json,
    extract::{Query, State},
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::boundary::BoundaryResponse;
use crate::api::dto::boundary_list::{BoundaryItem, BoundaryListResponse, BoundaryQueryParams};
use crate::api::dto::pagination::PaginationMeta;
use crate::domain::entities::OrgContext;
use crate::domain::repositories::BoundaryFilter;
use crate::error::AppError;
use crate::state::AppState;

/// Lists boundaries with geometry sizes.
///
/// # Endpoint
///
/// `GET /api/boundaries`
///
/// # Query Parameters
///
/// - `search` (optional): case-insensitive substring of name or osm id
/// - `page` (optional): page number (default: 1)
/// - `page_size` (optional): items per page (default: 25, 10..=1000)
///
/// # Errors
///
/// Returns 400 Bad Request if pagination or search parameters are invalid.
pub async fn boundary_list_handler(
    State(state): State<AppState>,
    Query(params): Query<BoundaryQueryParams>,
) -> Result<Json<BoundaryListResponse>, AppError> {
    params.validate()?;

    let (offset, limit) = params
        .pagination
        .validate_and_get_offset_limit()
        .map_err(|e| AppError::bad_request(e, json!({})))?;

    let filter = BoundaryFilter::new(offset, limit).with_search(params.search);
    let (items, total) = state.boundary_service.list(filter).await?;

    Ok(Json(BoundaryListResponse {
        pagination: PaginationMeta::new(
            params.pagination.page(),
            params.pagination.page_size(),
            total,
        ),
        items: items.into_iter().map(BoundaryItem::from).collect(),
    }))
}

/// Returns the country boundary the caller's organization edits aliases for.
///
/// # Endpoint
///
/// `GET /api/boundaries/alias`
///
/// # Errors
///
/// Returns 404 Not Found when the organization has no country configured.
pub async fn alias_root_handler(
    State(state): State<AppState>,
    Extension(ctx): Extension<OrgContext>,
) -> Result<Json<BoundaryResponse>, AppError> {
    let country = state
        .boundary_service
        .country_for_org(ctx.org_id)
        .await?
        .ok_or_else(|| {
            AppError::not_found(
                "Organization has no country configured",
                json!({"org_id": ctx.org_id}),
            )
        })?;

    Ok(Json(country.into()))
}
