//! PostgreSQL implementation of boundary repository.

use async_trait::async_trait;
use serde_json::{Value, json};
use sqlx::{PgPool, Postgres, Transaction};
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::entities::{Boundary, BoundaryLevel, BoundarySummary, NewBoundary};
use crate::domain::geometry::count_coordinates;
use crate::domain::repositories::{BoundaryFilter, BoundaryRepository};
use crate::error::AppError;

/// Columns selected for every boundary query, with the parent's osm id joined in.
macro_rules! boundary_select {
    () => {
        r#"
        SELECT b.id, b.osm_id, b.name, b.level, b.parent_id,
               p.osm_id AS parent_osm_id, b.geometry, b.simplified_geometry
        FROM admin_boundaries b
        LEFT JOIN admin_boundaries p ON p.id = b.parent_id
        "#
    };
}

#[derive(sqlx::FromRow)]
struct BoundaryRow {
    id: i64,
    osm_id: String,
    name: String,
    level: i16,
    parent_id: Option<i64>,
    parent_osm_id: Option<String>,
    geometry: Option<Value>,
    simplified_geometry: Option<Value>,
}

impl TryFrom<BoundaryRow> for Boundary {
    type Error = AppError;

    fn try_from(r: BoundaryRow) -> Result<Self, Self::Error> {
        let level = parse_level(&r.osm_id, r.level)?;

        Ok(Boundary::new(
            r.id,
            r.osm_id,
            r.name,
            level,
            r.parent_id,
            r.parent_osm_id,
            r.geometry,
            r.simplified_geometry,
        ))
    }
}

fn into_boundaries(rows: Vec<BoundaryRow>) -> Result<Vec<Boundary>, AppError> {
    rows.into_iter().map(Boundary::try_from).collect()
}

fn parse_level(osm_id: &str, level: i16) -> Result<BoundaryLevel, AppError> {
    BoundaryLevel::try_from(level).map_err(|level| {
        AppError::internal(
            "Invalid boundary level",
            json!({"osm_id": osm_id, "level": level}),
        )
    })
}

#[derive(sqlx::FromRow)]
struct SummaryRow {
    osm_id: String,
    name: String,
    level: i16,
    geometry_coords: i64,
    simplified_geometry_coords: i64,
}

impl TryFrom<SummaryRow> for BoundarySummary {
    type Error = AppError;

    fn try_from(r: SummaryRow) -> Result<Self, Self::Error> {
        Ok(BoundarySummary {
            level: parse_level(&r.osm_id, r.level)?,
            osm_id: r.osm_id,
            name: r.name,
            geometry_coords: usize::try_from(r.geometry_coords).unwrap_or_default(),
            simplified_geometry_coords: usize::try_from(r.simplified_geometry_coords)
                .unwrap_or_default(),
        })
    }
}

/// Escapes `ILIKE` wildcards so search text matches literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// PostgreSQL repository for the boundary hierarchy.
///
/// Geometry columns are JSONB holding GeoJSON geometries.
pub struct PgBoundaryRepository {
    pool: Arc<PgPool>,
}

impl PgBoundaryRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Imports boundaries in one transaction, updating existing osm ids.
    ///
    /// Boundaries must be ordered parents first. A parent is resolved from
    /// earlier rows of the same import or from the stored hierarchy, and its
    /// level must be exactly one above the boundary's. Any error rolls back
    /// the whole import.
    ///
    /// # Returns
    ///
    /// The number of boundaries written.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if a `parent_osm_id` does not resolve.
    /// Returns [`AppError::Validation`] if a level does not follow its parent's.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn import(&self, boundaries: &[NewBoundary]) -> Result<usize, AppError> {
        let mut tx = self.pool.begin().await?;

        for boundary in boundaries {
            upsert(&mut tx, boundary).await?;
        }

        tx.commit().await?;
        Ok(boundaries.len())
    }
}

async fn upsert(
    tx: &mut Transaction<'_, Postgres>,
    boundary: &NewBoundary,
) -> Result<i64, AppError> {
    let parent_id = match &boundary.parent_osm_id {
        Some(parent_osm_id) => {
            let (parent_id, parent_level): (i64, i16) =
                sqlx::query_as("SELECT id, level FROM admin_boundaries WHERE osm_id = $1")
                    .bind(parent_osm_id)
                    .fetch_optional(&mut **tx)
                    .await?
                    .ok_or_else(|| {
                        AppError::not_found(
                            "Parent boundary not found",
                            json!({"osm_id": boundary.osm_id, "parent_osm_id": parent_osm_id}),
                        )
                    })?;

            let parent_level = parse_level(parent_osm_id, parent_level)?;
            if parent_level.child_level() != Some(boundary.level) {
                return Err(AppError::bad_request(
                    "Boundary level does not follow its parent",
                    json!({
                        "osm_id": boundary.osm_id,
                        "level": boundary.level,
                        "parent_osm_id": parent_osm_id,
                        "parent_level": parent_level,
                    }),
                ));
            }

            Some(parent_id)
        }
        None => None,
    };

    let coords = |geometry: &Option<Value>| geometry.as_ref().map_or(0, count_coordinates) as i64;

    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO admin_boundaries
            (osm_id, name, level, parent_id, geometry, simplified_geometry,
             geometry_coords, simplified_geometry_coords)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (osm_id) DO UPDATE SET
            name                       = EXCLUDED.name,
            level                      = EXCLUDED.level,
            parent_id                  = EXCLUDED.parent_id,
            geometry                   = EXCLUDED.geometry,
            simplified_geometry        = EXCLUDED.simplified_geometry,
            geometry_coords            = EXCLUDED.geometry_coords,
            simplified_geometry_coords = EXCLUDED.simplified_geometry_coords,
            updated_at                 = NOW()
        RETURNING id
        "#,
    )
    .bind(&boundary.osm_id)
    .bind(&boundary.name)
    .bind(i16::from(boundary.level))
    .bind(parent_id)
    .bind(&boundary.geometry)
    .bind(&boundary.simplified_geometry)
    .bind(coords(&boundary.geometry))
    .bind(coords(&boundary.simplified_geometry))
    .fetch_one(&mut **tx)
    .await?;

    Ok(id)
}

#[async_trait]
impl BoundaryRepository for PgBoundaryRepository {
    async fn find_by_osm_id(&self, osm_id: &str) -> Result<Option<Boundary>, AppError> {
        let row = sqlx::query_as::<_, BoundaryRow>(concat!(
            boundary_select!(),
            "WHERE b.osm_id = $1"
        ))
        .bind(osm_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Boundary::try_from).transpose()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Boundary>, AppError> {
        let row = sqlx::query_as::<_, BoundaryRow>(concat!(boundary_select!(), "WHERE b.id = $1"))
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        row.map(Boundary::try_from).transpose()
    }

    async fn children_of(&self, boundary_id: i64) -> Result<Vec<Boundary>, AppError> {
        let rows = sqlx::query_as::<_, BoundaryRow>(concat!(
            boundary_select!(),
            "WHERE b.parent_id = $1 ORDER BY b.name"
        ))
        .bind(boundary_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        into_boundaries(rows)
    }

    async fn children_of_any(&self, boundary_ids: &[i64]) -> Result<Vec<Boundary>, AppError> {
        if boundary_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, BoundaryRow>(concat!(
            boundary_select!(),
            "WHERE b.parent_id = ANY($1) ORDER BY p.osm_id, b.name"
        ))
        .bind(boundary_ids)
        .fetch_all(self.pool.as_ref())
        .await?;

        into_boundaries(rows)
    }

    async fn count_children_of_any(
        &self,
        boundary_ids: &[i64],
    ) -> Result<HashMap<i64, i64>, AppError> {
        if boundary_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(i64, i64)> = sqlx::query_as(
            r#"
            SELECT parent_id, COUNT(*)
            FROM admin_boundaries
            WHERE parent_id = ANY($1)
            GROUP BY parent_id
            "#,
        )
        .bind(boundary_ids)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().collect())
    }

    async fn search(&self, filter: &BoundaryFilter) -> Result<Vec<BoundarySummary>, AppError> {
        let pattern = filter.search.as_deref().map(escape_like);

        let rows = sqlx::query_as::<_, SummaryRow>(
            r#"
            SELECT b.osm_id, b.name, b.level, b.geometry_coords, b.simplified_geometry_coords
            FROM admin_boundaries b
            WHERE ($1::text IS NULL
                   OR b.name ILIKE '%' || $1 || '%'
                   OR b.osm_id ILIKE '%' || $1 || '%')
            ORDER BY b.name, b.osm_id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(pattern)
        .bind(filter.limit)
        .bind(filter.offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        rows.into_iter().map(BoundarySummary::try_from).collect()
    }

    async fn count_matching(&self, filter: &BoundaryFilter) -> Result<i64, AppError> {
        let pattern = filter.search.as_deref().map(escape_like);

        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM admin_boundaries b
            WHERE ($1::text IS NULL
                   OR b.name ILIKE '%' || $1 || '%'
                   OR b.osm_id ILIKE '%' || $1 || '%')
            "#,
        )
        .bind(pattern)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count)
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM admin_boundaries")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("kig"), "kig");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b\\c"), "a\\_b\\\\c");
    }
}
