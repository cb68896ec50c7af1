//! Business logic services for the application layer.

pub mod alias_sync_service;
pub mod auth_service;
pub mod boundary_service;
pub mod geometry_service;
pub mod hierarchy_service;

pub use alias_sync_service::{AliasSyncService, SyncReport};
pub use auth_service::{AuthService, hash_token};
pub use boundary_service::BoundaryService;
pub use geometry_service::GeometryService;
pub use hierarchy_service::HierarchyService;
