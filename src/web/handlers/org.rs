//! Organization home page handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Extension,
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;

use crate::domain::entities::OrgContext;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct OrgQuery {
    pub message: Option<String>,
}

#[derive(Template, WebTemplate)]
#[template(path = "org.html")]
pub struct OrgTemplate {
    pub actor: String,
    pub message: Option<String>,
    pub country_name: Option<String>,
}

/// Renders the organization page with an optional flash message.
///
/// # Endpoint
///
/// `GET /dashboard/org?message=...`
pub async fn org_handler(
    State(state): State<AppState>,
    Extension(ctx): Extension<OrgContext>,
    Query(query): Query<OrgQuery>,
) -> Result<impl IntoResponse, AppError> {
    let country = state.boundary_service.country_for_org(ctx.org_id).await?;

    Ok(OrgTemplate {
        actor: ctx.actor,
        message: query.message,
        country_name: country.map(|c| c.name),
    })
}
