//! Repository trait for organizations.

use crate::domain::entities::Organization;
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for organizations and their configured country.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgOrganizationRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::memory::InMemoryStore`] - In-memory implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrganizationRepository: Send + Sync {
    /// Creates a new organization without a country.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the name is taken.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, name: &str) -> Result<Organization, AppError>;

    /// Finds an organization by its database ID.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_id(&self, id: i64) -> Result<Option<Organization>, AppError>;

    /// Finds an organization by its name.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_name(&self, name: &str) -> Result<Option<Organization>, AppError>;

    /// Lists all organizations ordered by name.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list(&self) -> Result<Vec<Organization>, AppError>;

    /// Sets the organization's country boundary.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the organization does not exist.
    /// Returns [`AppError::Internal`] on database errors.
    async fn set_country(&self, org_id: i64, country_id: i64) -> Result<Organization, AppError>;
}
