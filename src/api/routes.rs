//! API route configuration.
//!
//! All API endpoints require Bearer token authentication via
//! [`crate::api::middleware::auth`].

use crate::api::handlers::{
    alias_root_handler, boundary_list_handler, geometry_handler, sync_tree_handler, tree_handler,
};
use crate::state::AppState;
use axum::{Router, routing::get};

/// All API routes, protected by Bearer token authentication.
///
/// # Endpoints
///
/// - `GET  /boundaries`                    - Paginated boundary list with search
/// - `GET  /boundaries/alias`              - The organization's country boundary
/// - `GET  /boundaries/geometry/{osm_id}`  - GeoJSON layer below a boundary
/// - `GET  /boundaries/tree/{osm_id}`      - Match tree with aliases
/// - `POST /boundaries/tree/{osm_id}`      - Replace aliases from a tree
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/boundaries", get(boundary_list_handler))
        .route("/boundaries/alias", get(alias_root_handler))
        .merge(shared_routes())
}

/// Tree and geometry routes shared by the API and the dashboard.
///
/// - `GET  /boundaries/geometry/{osm_id}`
/// - `GET  /boundaries/tree/{osm_id}`
/// - `POST /boundaries/tree/{osm_id}`
///
/// Both surfaces resolve an [`crate::domain::entities::OrgContext`] in their
/// own auth middleware before these handlers run.
pub fn shared_routes() -> Router<AppState> {
    Router::new()
        .route("/boundaries/geometry/{osm_id}", get(geometry_handler))
        .route(
            "/boundaries/tree/{osm_id}",
            get(tree_handler).post(sync_tree_handler),
        )
}
