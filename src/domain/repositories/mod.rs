//! Repository trait definitions for the domain layer.
//!
//! These traits abstract data access following the Repository pattern and are
//! implemented by the infrastructure layer.
//!
//! # Architecture
//!
//! - Traits define the contract for data operations
//! - Implementations live in `crate::infrastructure::persistence` (PostgreSQL)
//!   and `crate::infrastructure::memory` (in-memory)
//! - Mock implementations are auto-generated via `mockall` for testing
//!
//! # Available Repositories
//!
//! - [`BoundaryRepository`] - Read access to the boundary hierarchy
//! - [`AliasRepository`] - Per-organization aliases with atomic replacement
//! - [`OrganizationRepository`] - Organizations and their country
//! - [`TokenRepository`] - API token authentication
//!
//! # Testing
//!
//! See integration tests in `tests/repository_*.rs` for usage examples.

pub mod alias_repository;
pub mod boundary_repository;
pub mod organization_repository;
pub mod token_repository;

pub use alias_repository::AliasRepository;
pub use boundary_repository::{BoundaryFilter, BoundaryRepository};
pub use organization_repository::OrganizationRepository;
pub use token_repository::{ApiToken, TokenRepository};

#[cfg(test)]
pub use alias_repository::MockAliasRepository;
#[cfg(test)]
pub use boundary_repository::MockBoundaryRepository;
#[cfg(test)]
pub use organization_repository::MockOrganizationRepository;
#[cfg(test)]
pub use token_repository::MockTokenRepository;
