//! Alias editor page handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};

use crate::domain::entities::OrgContext;
use crate::error::AppError;
use crate::state::AppState;

/// Where to send organizations that have not picked a country.
pub const MISSING_COUNTRY_REDIRECT: &str =
    "/dashboard/org?message=Select+a+country+before+editing+aliases";

/// Template for the alias editor.
///
/// The page loads `/dashboard/boundaries/tree/{country_osm_id}` and the
/// geometry layers with JavaScript and posts the edited tree back.
#[derive(Template, WebTemplate)]
#[template(path = "aliases.html")]
pub struct AliasesTemplate {
    pub country_osm_id: String,
    pub country_name: String,
}

/// Renders the alias editor rooted at the organization's country.
///
/// # Endpoint
///
/// `GET /dashboard/aliases`
///
/// Redirects to the organization page with a message when no country is set.
pub async fn aliases_handler(
    State(state): State<AppState>,
    Extension(ctx): Extension<OrgContext>,
) -> Result<Response, AppError> {
    match state.boundary_service.country_for_org(ctx.org_id).await? {
        Some(country) => Ok(AliasesTemplate {
            country_osm_id: country.osm_id,
            country_name: country.name,
        }
        .into_response()),
        None => Ok(Redirect::to(MISSING_COUNTRY_REDIRECT).into_response()),
    }
}
