//! Application layer services implementing business logic.
//!
//! Services orchestrate repository calls and domain algorithms and provide a
//! small API for HTTP handlers. They hold repositories as trait objects so the
//! same services run over PostgreSQL in production and the in-memory store in
//! tests.
//!
//! # Available Services
//!
//! - [`services::AliasSyncService`] - Applies submitted alias trees
//! - [`services::HierarchyService`] - Builds match trees for fuzzy search
//! - [`services::GeometryService`] - Exports GeoJSON map layers
//! - [`services::BoundaryService`] - Boundary listing and lookups
//! - [`services::AuthService`] - API token authentication

pub mod services;
