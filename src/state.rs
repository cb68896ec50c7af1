//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{
    AliasSyncService, AuthService, BoundaryService, GeometryService, HierarchyService,
};
use crate::domain::repositories::{
    AliasRepository, BoundaryRepository, OrganizationRepository, TokenRepository,
};
use crate::infrastructure::cache::CacheService;

/// Services and cache shared across requests.
///
/// Cloning is cheap: every field is an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub boundary_service: Arc<BoundaryService>,
    pub hierarchy_service: Arc<HierarchyService>,
    pub alias_sync_service: Arc<AliasSyncService>,
    pub geometry_service: Arc<GeometryService>,
    pub auth_service: Arc<AuthService>,
    pub cache: Arc<dyn CacheService>,
}

/// Repository handles the state is built from.
pub struct Repositories {
    pub boundaries: Arc<dyn BoundaryRepository>,
    pub aliases: Arc<dyn AliasRepository>,
    pub organizations: Arc<dyn OrganizationRepository>,
    pub tokens: Arc<dyn TokenRepository>,
}

impl AppState {
    /// Wires the services over the given repositories.
    pub fn new(repos: Repositories, cache: Arc<dyn CacheService>, signing_secret: String) -> Self {
        Self {
            boundary_service: Arc::new(BoundaryService::new(
                repos.boundaries.clone(),
                repos.organizations,
            )),
            hierarchy_service: Arc::new(HierarchyService::new(
                repos.boundaries.clone(),
                repos.aliases.clone(),
            )),
            alias_sync_service: Arc::new(AliasSyncService::new(
                repos.boundaries.clone(),
                repos.aliases,
            )),
            geometry_service: Arc::new(GeometryService::new(repos.boundaries, cache.clone())),
            auth_service: Arc::new(AuthService::new(repos.tokens, signing_secret)),
            cache,
        }
    }
}
