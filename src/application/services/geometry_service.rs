//! GeoJSON export of boundary geometry.

use std::collections::HashSet;
use std::sync::Arc;

use metrics::counter;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::domain::geometry::{boundary_feature, feature_collection};
use crate::domain::repositories::BoundaryRepository;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;

/// Service exporting the map layer below a boundary.
///
/// Results are cached by osm id; the cache only ever degrades to a rebuild
/// from the store.
pub struct GeometryService {
    boundaries: Arc<dyn BoundaryRepository>,
    cache: Arc<dyn CacheService>,
}

impl GeometryService {
    pub fn new(boundaries: Arc<dyn BoundaryRepository>, cache: Arc<dyn CacheService>) -> Self {
        Self { boundaries, cache }
    }

    /// Exports a `FeatureCollection` for `osm_id`.
    ///
    /// A boundary with children yields one feature per child in name order;
    /// a leaf yields its own feature.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no boundary has this osm id.
    pub async fn export(&self, osm_id: &str) -> Result<Value, AppError> {
        if let Some(cached) = self.cached(osm_id).await {
            counter!("geometry_cache_total", "result" => "hit").increment(1);
            return Ok(cached);
        }
        counter!("geometry_cache_total", "result" => "miss").increment(1);

        let boundary = self
            .boundaries
            .find_by_osm_id(osm_id)
            .await?
            .ok_or_else(|| AppError::not_found("Boundary not found", json!({"osm_id": osm_id})))?;

        let children = self.boundaries.children_of(boundary.id).await?;

        let features = if children.is_empty() {
            vec![boundary_feature(&boundary, false)]
        } else {
            let ids: Vec<i64> = children.iter().map(|c| c.id).collect();
            let grandchildren = self.boundaries.count_children_of_any(&ids).await?;

            children
                .iter()
                .map(|child| {
                    let zoomable = grandchildren.get(&child.id).is_some_and(|n| *n > 0);
                    boundary_feature(child, zoomable)
                })
                .collect()
        };

        debug!(osm_id, features = features.len(), "Geometry exported");
        let collection = feature_collection(features);

        if let Err(e) = self.cache.set(osm_id, &collection.to_string(), None).await {
            warn!(osm_id, error = %e, "Failed to cache geometry");
        }

        Ok(collection)
    }

    /// Drops cached exports made stale by changes to the given boundaries.
    ///
    /// An export embeds its children's geometry and `zoomable` flags, so each
    /// changed boundary's ancestors are dropped along with it. Run after the
    /// change is committed so new parents resolve.
    ///
    /// # Returns
    ///
    /// The number of cache keys dropped.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the hierarchy cannot be read. Cache
    /// failures are logged and skipped.
    pub async fn invalidate(&self, osm_ids: &[String]) -> Result<usize, AppError> {
        let mut dropped = HashSet::new();

        for osm_id in osm_ids {
            let mut next = Some(osm_id.clone());

            while let Some(current) = next.take() {
                if !dropped.insert(current.clone()) {
                    break;
                }
                if let Err(e) = self.cache.invalidate(&current).await {
                    warn!(osm_id = %current, error = %e, "Failed to invalidate geometry");
                }
                next = self
                    .boundaries
                    .find_by_osm_id(&current)
                    .await?
                    .and_then(|b| b.parent_osm_id);
            }
        }

        debug!(keys = dropped.len(), "Geometry cache invalidated");
        Ok(dropped.len())
    }

    async fn cached(&self, osm_id: &str) -> Option<Value> {
        let payload = match self.cache.get(osm_id).await {
            Ok(payload) => payload?,
            Err(e) => {
                warn!(osm_id, error = %e, "Geometry cache read failed");
                return None;
            }
        };

        match serde_json::from_str(&payload) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(osm_id, error = %e, "Discarding unreadable cached geometry");
                None
            }
        }
    }
}
