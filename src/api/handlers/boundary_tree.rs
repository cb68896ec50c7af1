//! Handlers for reading and synchronizing an alias tree.

use axum::{
    Extension, Json,
    body::Bytes,
    extract::{Path, State},
};
use serde_json::Value;

use crate::api::dto::boundary::validate_osm_id;
use crate::domain::entities::{OrgContext, SyncPayload};
use crate::domain::match_tree::MatchNode;
use crate::error::AppError;
use crate::state::AppState;

/// Returns the two-level match tree below a boundary.
///
/// # Endpoint
///
/// `GET /api/boundaries/tree/{osm_id}`
///
/// Each node carries the organization's aliases (newline separated) and a
/// `match` string for client-side fuzzy search.
///
/// # Errors
///
/// - 400 Bad Request if the osm id is malformed
/// - 404 Not Found if no boundary has this osm id
pub async fn tree_handler(
    State(state): State<AppState>,
    Extension(ctx): Extension<OrgContext>,
    Path(osm_id): Path<String>,
) -> Result<Json<Vec<MatchNode>>, AppError> {
    validate_osm_id(&osm_id)?;

    let tree = state
        .hierarchy_service
        .assemble(&osm_id, ctx.org_id)
        .await?;

    Ok(Json(tree))
}

/// Replaces the organization's aliases from a submitted tree.
///
/// # Endpoint
///
/// `POST /api/boundaries/tree/{osm_id}`
///
/// The body is read as JSON whatever its `Content-Type`. It is an array of
/// `{osm_id, aliases?, children?: [{osm_id, aliases?}]}`; other fields are
/// ignored. Unknown osm ids are skipped. The payload is echoed back.
///
/// # Errors
///
/// - 400 Bad Request with `{"status":"error","description":...}` if the body
///   is not a valid payload
/// - 404 Not Found if the path boundary does not exist
pub async fn sync_tree_handler(
    State(state): State<AppState>,
    Extension(ctx): Extension<OrgContext>,
    Path(osm_id): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    validate_osm_id(&osm_id)?;

    let payload = SyncPayload::parse(&body)?;

    state.boundary_service.get(&osm_id).await?;

    state
        .alias_sync_service
        .synchronize(&ctx, &payload)
        .await?;

    Ok(Json(payload.into_raw()))
}
