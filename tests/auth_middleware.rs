mod common;

use admin_boundaries::api;
use admin_boundaries::api::middleware::auth;
use admin_boundaries::web;
use admin_boundaries::web::middleware::web_auth;
use axum::{Router, http::StatusCode, middleware};
use axum_test::TestServer;
use serde_json::Value;

fn api_server(ctx: &common::TestContext) -> TestServer {
    let api_router = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(ctx.state.clone(), auth::layer));

    let app = Router::new()
        .nest("/api", api_router)
        .with_state(ctx.state.clone());

    TestServer::new(app).unwrap()
}

fn web_server(ctx: &common::TestContext) -> TestServer {
    let protected = web::routes::protected_routes().route_layer(
        middleware::from_fn_with_state(ctx.state.clone(), web_auth::layer),
    );

    let app = Router::new()
        .nest(
            "/dashboard",
            Router::new()
                .merge(protected)
                .merge(web::routes::public_routes()),
        )
        .with_state(ctx.state.clone());

    TestServer::new(app).unwrap()
}

fn bearer() -> String {
    format!("Bearer {}", common::RAW_TOKEN)
}

#[tokio::test]
async fn test_api_requires_token() {
    let ctx = common::seeded().await;
    let server = api_server(&ctx);

    let response = server.get("/api/boundaries/alias").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["error"]["code"], "unauthorized");
}

#[tokio::test]
async fn test_api_rejects_unknown_token() {
    let ctx = common::seeded().await;
    let server = api_server(&ctx);

    server
        .get("/api/boundaries/alias")
        .add_header("Authorization", "Bearer not-a-real-token")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_api_token_resolves_organization() {
    let ctx = common::seeded().await;
    let server = api_server(&ctx);

    let response = server
        .get("/api/boundaries/alias")
        .add_header("Authorization", bearer())
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["osm_id"], common::COUNTRY);
}

#[tokio::test]
async fn test_api_sync_records_token_name_as_actor() {
    use admin_boundaries::domain::repositories::{AliasRepository, BoundaryRepository};

    let ctx = common::seeded().await;
    let server = api_server(&ctx);

    server
        .post("/api/boundaries/tree/R171496")
        .add_header("Authorization", bearer())
        .text(r#"[{"osm_id": "R1708283", "aliases": "KGL"}]"#)
        .await
        .assert_status_ok();

    let kigali = ctx.store.find_by_osm_id("R1708283").await.unwrap().unwrap();
    let aliases = ctx
        .store
        .list_aliases_for(ctx.org_id, &[kigali.id])
        .await
        .unwrap();
    assert_eq!(aliases.len(), 1);
    assert_eq!(aliases[0].name, "KGL");
    assert_eq!(aliases[0].created_by, "editor");
}

#[tokio::test]
async fn test_dashboard_redirects_without_cookie() {
    let ctx = common::seeded().await;
    let server = web_server(&ctx);

    let response = server.get("/dashboard/aliases").await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/dashboard/login");
}

#[tokio::test]
async fn test_dashboard_login_is_public() {
    let ctx = common::seeded().await;
    let server = web_server(&ctx);

    server.get("/dashboard/login").await.assert_status_ok();
}

#[tokio::test]
async fn test_dashboard_cookie_reaches_shared_tree_route() {
    let ctx = common::seeded().await;
    let server = web_server(&ctx);

    let response = server
        .get("/dashboard/boundaries/tree/R171496")
        .add_header("Cookie", format!("auth_token={}", common::RAW_TOKEN))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>().as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_dashboard_aliases_page_renders_country() {
    let ctx = common::seeded().await;
    let server = web_server(&ctx);

    let response = server
        .get("/dashboard/aliases")
        .add_header("Cookie", format!("auth_token={}", common::RAW_TOKEN))
        .await;

    response.assert_status_ok();
    assert!(response.text().contains("Rwanda"));
    assert!(response.text().contains(common::COUNTRY));
}
