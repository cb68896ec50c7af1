//! PostgreSQL implementation of alias repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::BoundaryAlias;
use crate::domain::repositories::AliasRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct AliasRow {
    id: i64,
    org_id: i64,
    boundary_id: i64,
    name: String,
    created_by: String,
    modified_by: String,
    created_on: DateTime<Utc>,
    modified_on: DateTime<Utc>,
}

impl From<AliasRow> for BoundaryAlias {
    fn from(r: AliasRow) -> Self {
        Self {
            id: r.id,
            org_id: r.org_id,
            boundary_id: r.boundary_id,
            name: r.name,
            created_by: r.created_by,
            modified_by: r.modified_by,
            created_on: r.created_on,
            modified_on: r.modified_on,
        }
    }
}

/// Advisory lock key for one (organization, boundary) pair.
///
/// Collisions only serialize unrelated pairs; they never merge writers.
fn alias_lock_key(org_id: i64, boundary_id: i64) -> i64 {
    org_id.wrapping_shl(32) ^ boundary_id
}

/// PostgreSQL repository for boundary aliases.
///
/// Replacement runs in one transaction holding a transaction-scoped advisory
/// lock on the (organization, boundary) pair, so two concurrent replacements
/// of the same pair apply one after the other and never interleave.
pub struct PgAliasRepository {
    pool: Arc<PgPool>,
}

impl PgAliasRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AliasRepository for PgAliasRepository {
    async fn list_aliases(&self, org_id: i64, boundary_id: i64) -> Result<Vec<String>, AppError> {
        let names: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT name
            FROM boundary_aliases
            WHERE org_id = $1 AND boundary_id = $2
            ORDER BY id
            "#,
        )
        .bind(org_id)
        .bind(boundary_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(names)
    }

    async fn list_aliases_for(
        &self,
        org_id: i64,
        boundary_ids: &[i64],
    ) -> Result<Vec<BoundaryAlias>, AppError> {
        if boundary_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, AliasRow>(
            r#"
            SELECT id, org_id, boundary_id, name, created_by, modified_by, created_on, modified_on
            FROM boundary_aliases
            WHERE org_id = $1 AND boundary_id = ANY($2)
            ORDER BY boundary_id, id
            "#,
        )
        .bind(org_id)
        .bind(boundary_ids)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(BoundaryAlias::from).collect())
    }

    async fn replace_aliases(
        &self,
        org_id: i64,
        boundary_id: i64,
        names: Vec<String>,
        actor: &str,
    ) -> Result<usize, AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(alias_lock_key(org_id, boundary_id))
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM boundary_aliases WHERE org_id = $1 AND boundary_id = $2")
            .bind(org_id)
            .bind(boundary_id)
            .execute(&mut *tx)
            .await?;

        let mut inserted = 0;
        for name in names.iter().filter(|name| !name.is_empty()) {
            sqlx::query(
                r#"
                INSERT INTO boundary_aliases (org_id, boundary_id, name, created_by, modified_by)
                VALUES ($1, $2, $3, $4, $4)
                "#,
            )
            .bind(org_id)
            .bind(boundary_id)
            .bind(name)
            .bind(actor)
            .execute(&mut *tx)
            .await?;
            inserted += 1;
        }

        tx.commit().await?;
        Ok(inserted)
    }

    async fn count_for_org(&self, org_id: i64) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM boundary_aliases WHERE org_id = $1")
            .bind(org_id)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_key_distinguishes_pairs() {
        assert_ne!(alias_lock_key(1, 2), alias_lock_key(2, 1));
        assert_ne!(alias_lock_key(1, 2), alias_lock_key(1, 3));
        assert_eq!(alias_lock_key(7, 9), alias_lock_key(7, 9));
    }
}
