//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx with
//! runtime-bound parameters.
//!
//! # Repositories
//!
//! - [`PgBoundaryRepository`] - Boundary hierarchy reads and the transactional admin import
//! - [`PgAliasRepository`] - Alias listing and atomic replacement
//! - [`PgOrganizationRepository`] - Organization management
//! - [`PgTokenRepository`] - API token storage and validation

pub mod pg_alias_repository;
pub mod pg_boundary_repository;
pub mod pg_organization_repository;
pub mod pg_token_repository;

pub use pg_alias_repository::PgAliasRepository;
pub use pg_boundary_repository::PgBoundaryRepository;
pub use pg_organization_repository::PgOrganizationRepository;
pub use pg_token_repository::PgTokenRepository;
