//! PostgreSQL implementation of organization repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::Organization;
use crate::domain::repositories::OrganizationRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct OrganizationRow {
    id: i64,
    name: String,
    country_id: Option<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<OrganizationRow> for Organization {
    fn from(r: OrganizationRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            country_id: r.country_id,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// PostgreSQL repository for organizations.
pub struct PgOrganizationRepository {
    pool: Arc<PgPool>,
}

impl PgOrganizationRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrganizationRepository for PgOrganizationRepository {
    async fn create(&self, name: &str) -> Result<Organization, AppError> {
        let row = sqlx::query_as::<_, OrganizationRow>(
            r#"
            INSERT INTO orgs (name)
            VALUES ($1)
            RETURNING id, name, country_id, created_at, updated_at
            "#,
        )
        .bind(name)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Organization>, AppError> {
        let row = sqlx::query_as::<_, OrganizationRow>(
            "SELECT id, name, country_id, created_at, updated_at FROM orgs WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Organization::from))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Organization>, AppError> {
        let row = sqlx::query_as::<_, OrganizationRow>(
            "SELECT id, name, country_id, created_at, updated_at FROM orgs WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Organization::from))
    }

    async fn list(&self) -> Result<Vec<Organization>, AppError> {
        let rows = sqlx::query_as::<_, OrganizationRow>(
            "SELECT id, name, country_id, created_at, updated_at FROM orgs ORDER BY name",
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Organization::from).collect())
    }

    async fn set_country(&self, org_id: i64, country_id: i64) -> Result<Organization, AppError> {
        let row = sqlx::query_as::<_, OrganizationRow>(
            r#"
            UPDATE orgs SET country_id = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, country_id, created_at, updated_at
            "#,
        )
        .bind(org_id)
        .bind(country_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Organization::from)
            .ok_or_else(|| AppError::not_found("Organization not found", json!({"id": org_id})))
    }
}
