//! Hierarchy assembly for the alias editor.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::match_tree::{MatchNode, assemble_match_tree};
use crate::domain::repositories::{AliasRepository, BoundaryRepository};
use crate::error::AppError;
use serde_json::json;

/// Service building the two-level match tree below a root boundary.
///
/// Three store calls per request regardless of tree size: the root's
/// children, all grandchildren, and the organization's aliases for both.
pub struct HierarchyService {
    boundaries: Arc<dyn BoundaryRepository>,
    aliases: Arc<dyn AliasRepository>,
}

impl HierarchyService {
    pub fn new(boundaries: Arc<dyn BoundaryRepository>, aliases: Arc<dyn AliasRepository>) -> Self {
        Self {
            boundaries,
            aliases,
        }
    }

    /// Assembles the match tree under `root_osm_id` with `org_id`'s aliases.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the root does not exist.
    pub async fn assemble(&self, root_osm_id: &str, org_id: i64) -> Result<Vec<MatchNode>, AppError> {
        let root = self
            .boundaries
            .find_by_osm_id(root_osm_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Boundary not found", json!({"osm_id": root_osm_id}))
            })?;

        let tops = self.boundaries.children_of(root.id).await?;
        let top_ids: Vec<i64> = tops.iter().map(|b| b.id).collect();

        let children = if top_ids.is_empty() {
            Vec::new()
        } else {
            self.boundaries.children_of_any(&top_ids).await?
        };

        let ids: Vec<i64> = top_ids
            .iter()
            .copied()
            .chain(children.iter().map(|b| b.id))
            .collect();

        let mut aliases: HashMap<i64, Vec<String>> = HashMap::new();
        if !ids.is_empty() {
            for alias in self.aliases.list_aliases_for(org_id, &ids).await? {
                aliases.entry(alias.boundary_id).or_default().push(alias.name);
            }
        }

        tracing::debug!(
            root = root_osm_id,
            org_id,
            tops = tops.len(),
            children = children.len(),
            "Assembling match tree"
        );

        Ok(assemble_match_tree(tops, children, &aliases))
    }
}
