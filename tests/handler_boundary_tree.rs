mod common;

use admin_boundaries::api::handlers::{sync_tree_handler, tree_handler};
use admin_boundaries::domain::entities::OrgContext;
use admin_boundaries::domain::repositories::{AliasRepository, BoundaryRepository};
use axum::{Extension, Router, http::StatusCode, routing::get};
use axum_test::TestServer;
use serde_json::{Value, json};

fn server(ctx: &common::TestContext, org: OrgContext) -> TestServer {
    let app = Router::new()
        .route(
            "/api/boundaries/tree/{osm_id}",
            get(tree_handler).post(sync_tree_handler),
        )
        .layer(Extension(org))
        .with_state(ctx.state.clone());

    TestServer::new(app).unwrap()
}

async fn boundary_id(ctx: &common::TestContext, osm_id: &str) -> i64 {
    ctx.store.find_by_osm_id(osm_id).await.unwrap().unwrap().id
}

#[tokio::test]
async fn test_tree_lists_provinces_with_districts() {
    let ctx = common::seeded().await;
    let server = server(&ctx, ctx.ctx());

    let response = server.get("/api/boundaries/tree/R171496").await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    let tops = json.as_array().unwrap();

    assert_eq!(tops.len(), 2);
    assert_eq!(tops[0]["name"], "Eastern");
    assert_eq!(tops[1]["name"], "Kigali");
    assert_eq!(tops[1]["children"][0]["name"], "Gasabo");
    assert_eq!(tops[1]["children"][1]["name"], "Nyarugenge");
    assert_eq!(tops[1]["children"][0]["parent_osm_id"], "R1708283");
    assert_eq!(tops[1]["match"], "Kigali  Gasabo  Nyarugenge ");
}

#[tokio::test]
async fn test_tree_unknown_root_is_not_found() {
    let ctx = common::seeded().await;
    let server = server(&ctx, ctx.ctx());

    let response = server.get("/api/boundaries/tree/R999").await;

    response.assert_status_not_found();
    assert_eq!(response.json::<Value>()["error"]["code"], "not_found");
}

#[tokio::test]
async fn test_tree_rejects_malformed_osm_id() {
    let ctx = common::seeded().await;
    let server = server(&ctx, ctx.ctx());

    server
        .get("/api/boundaries/tree/not-an-id")
        .await
        .assert_status_bad_request();
}

#[tokio::test]
async fn test_sync_echoes_payload_and_updates_tree() {
    let ctx = common::seeded().await;
    let server = server(&ctx, ctx.ctx());

    let payload = json!([{
        "osm_id": "R1708283",
        "name": "Kigali",
        "aliases": "Kigali City\nUmujyi wa Kigali",
        "match": "stale",
        "children": [{"osm_id": "R1708281", "aliases": "Gasabo District"}]
    }]);

    let response = server
        .post("/api/boundaries/tree/R171496")
        .json(&payload)
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), payload);

    let tree = server.get("/api/boundaries/tree/R171496").await.json::<Value>();
    let kigali = &tree[1];
    assert_eq!(kigali["aliases"], "Kigali City\nUmujyi wa Kigali");
    assert_eq!(kigali["children"][0]["aliases"], "Gasabo District");
    assert!(kigali["match"].as_str().unwrap().contains("Gasabo District"));
    assert!(
        kigali["children"][0]["match"]
            .as_str()
            .unwrap()
            .contains("Umujyi wa Kigali")
    );
}

#[tokio::test]
async fn test_sync_accepts_any_content_type() {
    let ctx = common::seeded().await;
    let server = server(&ctx, ctx.ctx());

    let response = server
        .post("/api/boundaries/tree/R171496")
        .text(r#"[{"osm_id": "R1803880", "aliases": "Iburasirazuba"}]"#)
        .await;

    response.assert_status_ok();
    let id = boundary_id(&ctx, "R1803880").await;
    assert_eq!(
        ctx.store.list_aliases(ctx.org_id, id).await.unwrap(),
        vec!["Iburasirazuba"]
    );
}

#[tokio::test]
async fn test_sync_malformed_json() {
    let ctx = common::seeded().await;
    let server = server(&ctx, ctx.ctx());

    let response = server
        .post("/api/boundaries/tree/R171496")
        .text("[{\"osm_id\": ")
        .await;

    response.assert_status_bad_request();
    let json = response.json::<Value>();
    assert_eq!(json["status"], "error");
    assert!(
        json["description"]
            .as_str()
            .unwrap()
            .starts_with("Error parsing JSON:")
    );
}

#[tokio::test]
async fn test_sync_wrong_shape_changes_nothing() {
    let ctx = common::seeded().await;
    let server = server(&ctx, ctx.ctx());
    let id = boundary_id(&ctx, "R1708283").await;
    ctx.store
        .replace_aliases(ctx.org_id, id, vec!["Existing".to_string()], "editor")
        .await
        .unwrap();

    let response = server
        .post("/api/boundaries/tree/R171496")
        .json(&json!({"osm_id": "R1708283", "aliases": ""}))
        .await;

    response.assert_status_bad_request();
    assert_eq!(response.json::<Value>()["status"], "error");
    assert_eq!(
        ctx.store.list_aliases(ctx.org_id, id).await.unwrap(),
        vec!["Existing"]
    );
}

#[tokio::test]
async fn test_sync_unknown_ids_are_skipped() {
    let ctx = common::seeded().await;
    let server = server(&ctx, ctx.ctx());

    let response = server
        .post("/api/boundaries/tree/R171496")
        .json(&json!([
            {"osm_id": "R404", "aliases": "Ghost"},
            {"osm_id": "R1803880", "aliases": "East", "children": [{"osm_id": "R405", "aliases": "x"}]}
        ]))
        .await;

    response.assert_status_ok();
    let id = boundary_id(&ctx, "R1803880").await;
    assert_eq!(ctx.store.list_aliases(ctx.org_id, id).await.unwrap(), vec!["East"]);
}

#[tokio::test]
async fn test_sync_unknown_root_is_not_found() {
    let ctx = common::seeded().await;
    let server = server(&ctx, ctx.ctx());

    let response = server
        .post("/api/boundaries/tree/R999")
        .json(&json!([{"osm_id": "R1803880", "aliases": "East"}]))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    let id = boundary_id(&ctx, "R1803880").await;
    assert!(ctx.store.list_aliases(ctx.org_id, id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_aliases_are_scoped_to_the_caller() {
    let ctx = common::seeded().await;
    let ours = server(&ctx, ctx.ctx());
    let theirs = server(&ctx, OrgContext::new(ctx.bare_org_id, "partner"));

    ours.post("/api/boundaries/tree/R171496")
        .json(&json!([{"osm_id": "R1708283", "aliases": "Ours"}]))
        .await
        .assert_status_ok();

    let tree = theirs.get("/api/boundaries/tree/R171496").await.json::<Value>();
    assert_eq!(tree[1]["aliases"], "");

    let id = boundary_id(&ctx, "R1708283").await;
    let stored = ctx
        .store
        .list_aliases_for(ctx.org_id, &[id])
        .await
        .unwrap();
    assert_eq!(stored[0].created_by, "editor");
}
