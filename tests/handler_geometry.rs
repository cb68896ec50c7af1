mod common;

use admin_boundaries::api::handlers::geometry_handler;
use axum::{Router, routing::get};
use axum_test::TestServer;
use serde_json::Value;

fn server(ctx: &common::TestContext) -> TestServer {
    let app = Router::new()
        .route("/api/boundaries/geometry/{osm_id}", get(geometry_handler))
        .with_state(ctx.state.clone());

    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_country_exports_zoomable_provinces() {
    let ctx = common::seeded().await;
    let server = server(&ctx);

    let response = server.get("/api/boundaries/geometry/R171496").await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(json["type"], "FeatureCollection");

    let features = json["features"].as_array().unwrap();
    assert_eq!(features.len(), 2);
    assert_eq!(features[0]["properties"]["name"], "Eastern");
    assert_eq!(features[1]["properties"]["name"], "Kigali");
    assert_eq!(features[1]["properties"]["osm_id"], "R1708283");
    assert_eq!(features[1]["geometry"]["type"], "Polygon");
    assert!(features.iter().all(|f| f["zoomable"] == true));
}

#[tokio::test]
async fn test_province_exports_leaf_districts() {
    let ctx = common::seeded().await;
    let server = server(&ctx);

    let json = server
        .get("/api/boundaries/geometry/R1708283")
        .await
        .json::<Value>();

    let names: Vec<&str> = json["features"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["properties"]["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Gasabo", "Nyarugenge"]);
    assert_eq!(json["features"][0]["zoomable"], false);
}

#[tokio::test]
async fn test_leaf_exports_itself() {
    let ctx = common::seeded().await;
    let server = server(&ctx);

    let json = server
        .get("/api/boundaries/geometry/R1803881")
        .await
        .json::<Value>();

    let features = json["features"].as_array().unwrap();
    assert_eq!(features.len(), 1);
    assert_eq!(features[0]["properties"]["name"], "Bugesera");
    assert_eq!(features[0]["zoomable"], false);
}

#[tokio::test]
async fn test_unknown_boundary() {
    let ctx = common::seeded().await;
    let server = server(&ctx);

    server
        .get("/api/boundaries/geometry/R42")
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_malformed_osm_id() {
    let ctx = common::seeded().await;
    let server = server(&ctx);

    server
        .get("/api/boundaries/geometry/42x")
        .await
        .assert_status_bad_request();
}
