//! Cookie-based authentication middleware for web dashboard.

use axum::{
    extract::{Request, State},
    http::header::COOKIE,
    middleware::Next,
    response::{Redirect, Response},
};

use crate::state::AppState;

const LOGIN_PATH: &str = "/dashboard/login";

/// Authenticates dashboard requests using the `auth_token` cookie.
///
/// ```text
/// Cookie: auth_token=<token>
/// ```
///
/// The cookie holds an API token and is verified exactly like a Bearer
/// token; the resolved [`crate::domain::entities::OrgContext`] is inserted
/// into the request extensions. Unlike the API middleware, failures redirect
/// to `/dashboard/login` instead of returning `401`.
pub async fn layer(
    State(st): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Redirect> {
    let Some(token) = req
        .headers()
        .get(COOKIE)
        .and_then(|header| header.to_str().ok())
        .and_then(auth_cookie)
    else {
        return Err(Redirect::to(LOGIN_PATH));
    };

    match st.auth_service.authenticate(&token).await {
        Ok(ctx) => {
            req.extensions_mut().insert(ctx);
            Ok(next.run(req).await)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Dashboard authentication failed");
            Err(Redirect::to(LOGIN_PATH))
        }
    }
}

/// Extracts `auth_token` from a `Cookie` header value.
fn auth_cookie(header: &str) -> Option<String> {
    header.split(';').find_map(|cookie| {
        let (name, value) = cookie.trim().split_once('=')?;
        (name == "auth_token" && !value.is_empty()).then(|| value.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_cookie_among_others() {
        assert_eq!(
            auth_cookie("theme=dark; auth_token=abc123; lang=rw"),
            Some("abc123".to_string())
        );
    }

    #[test]
    fn test_auth_cookie_missing_or_empty() {
        assert_eq!(auth_cookie("theme=dark"), None);
        assert_eq!(auth_cookie("auth_token="), None);
    }
}
