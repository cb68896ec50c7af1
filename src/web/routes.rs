//! Web dashboard route configuration.

use crate::api::routes::shared_routes;
use crate::state::AppState;
use crate::web::handlers::{aliases_handler, login_handler, org_handler};
use axum::{Router, routing::get};

/// Protected dashboard routes requiring a valid `auth_token` cookie.
///
/// # Endpoints
///
/// - `GET /aliases` - Alias editor for the organization's country
/// - `GET /org` - Organization page
/// - the tree and geometry routes of [`shared_routes`]
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/aliases", get(aliases_handler))
        .route("/org", get(org_handler))
        .merge(shared_routes())
}

/// Public dashboard routes without authentication.
///
/// - `GET /login` - Login page
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/login", get(login_handler))
}
