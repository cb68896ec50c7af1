#![allow(dead_code)]

use admin_boundaries::application::services::hash_token;
use admin_boundaries::domain::entities::{BoundaryLevel, NewBoundary, OrgContext};
use admin_boundaries::domain::repositories::{OrganizationRepository, TokenRepository};
use admin_boundaries::infrastructure::cache::NullCache;
use admin_boundaries::infrastructure::memory::InMemoryStore;
use admin_boundaries::state::{AppState, Repositories};
use serde_json::json;
use std::sync::Arc;

pub const SECRET: &str = "test-signing-secret";
pub const RAW_TOKEN: &str = "test-token-for-health-ministry";
pub const COUNTRY: &str = "R171496";

pub struct TestContext {
    pub store: Arc<InMemoryStore>,
    pub state: AppState,
    pub org_id: i64,
    /// Organization with no country configured.
    pub bare_org_id: i64,
}

impl TestContext {
    pub fn ctx(&self) -> OrgContext {
        OrgContext::new(self.org_id, "editor")
    }
}

pub fn create_test_state(store: Arc<InMemoryStore>) -> AppState {
    let repos = Repositories {
        boundaries: store.clone(),
        aliases: store.clone(),
        organizations: store.clone(),
        tokens: store,
    };
    AppState::new(repos, Arc::new(NullCache::new()), SECRET.to_string())
}

pub async fn insert_boundary(
    store: &InMemoryStore,
    osm_id: &str,
    name: &str,
    level: BoundaryLevel,
    parent: Option<&str>,
) -> i64 {
    store
        .insert_boundary(NewBoundary {
            osm_id: osm_id.to_string(),
            name: name.to_string(),
            level,
            parent_osm_id: parent.map(str::to_string),
            geometry: Some(json!({
                "type": "Polygon",
                "coordinates": [[[30.0, -2.0], [30.1, -2.0], [30.1, -1.9], [30.0, -2.0]]]
            })),
            simplified_geometry: Some(json!({
                "type": "Polygon",
                "coordinates": [[[30.0, -2.0], [30.1, -1.9], [30.0, -2.0]]]
            })),
        })
        .await
        .unwrap()
        .id
}

/// Rwanda with two provinces and three districts, one organization with the
/// country set and an active token, and one organization without a country.
pub async fn seeded() -> TestContext {
    let store = Arc::new(InMemoryStore::new());

    let country_id = insert_boundary(&store, COUNTRY, "Rwanda", BoundaryLevel::Country, None).await;
    insert_boundary(&store, "R1708283", "Kigali", BoundaryLevel::State, Some(COUNTRY)).await;
    insert_boundary(&store, "R1803880", "Eastern", BoundaryLevel::State, Some(COUNTRY)).await;
    insert_boundary(&store, "R1708290", "Nyarugenge", BoundaryLevel::District, Some("R1708283")).await;
    insert_boundary(&store, "R1708281", "Gasabo", BoundaryLevel::District, Some("R1708283")).await;
    insert_boundary(&store, "R1803881", "Bugesera", BoundaryLevel::District, Some("R1803880")).await;

    let org = store.create("Health Ministry").await.unwrap();
    store.set_country(org.id, country_id).await.unwrap();
    store
        .create_token(org.id, "editor", &hash_token(SECRET, RAW_TOKEN))
        .await
        .unwrap();

    let bare = store.create("New Partner").await.unwrap();

    TestContext {
        state: create_test_state(store.clone()),
        store,
        org_id: org.id,
        bare_org_id: bare.id,
    }
}
