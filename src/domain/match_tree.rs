//! Assembly of the two-level boundary tree annotated with match strings.
//!
//! The tree feeds client-side fuzzy search. Every node carries a `match`
//! string: a top-level node's string holds its own name and aliases followed by
//! those of every child, and a child's string holds its own name and aliases
//! followed by its parent's. A substring search at either level therefore
//! surfaces the right top-level node.

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::entities::{Boundary, BoundaryLevel};
use crate::domain::entities::alias::join_aliases;

/// A boundary projected for fuzzy matching.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchNode {
    pub osm_id: String,
    pub name: String,
    pub level: BoundaryLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_osm_id: Option<String>,
    /// Alias texts joined with `'\n'`.
    pub aliases: String,
    #[serde(rename = "match")]
    pub match_text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MatchNode>,
}

impl MatchNode {
    fn from_boundary(boundary: Boundary, aliases: &HashMap<i64, Vec<String>>) -> Self {
        let aliases = aliases
            .get(&boundary.id)
            .map(|names| join_aliases(names))
            .unwrap_or_default();

        Self {
            match_text: format!("{} {}", boundary.name, aliases),
            osm_id: boundary.osm_id,
            name: boundary.name,
            level: boundary.level,
            parent_osm_id: boundary.parent_osm_id,
            aliases,
            children: Vec::new(),
        }
    }
}

/// Builds the nested match tree.
///
/// # Arguments
///
/// - `tops` - direct children of the root, already ordered by name
/// - `children` - children of every top, ordered by (parent osm_id, name)
/// - `aliases` - alias texts keyed by boundary id, in creation order
///
/// Children whose parent is not among `tops` are dropped.
pub fn assemble_match_tree(
    tops: Vec<Boundary>,
    children: Vec<Boundary>,
    aliases: &HashMap<i64, Vec<String>>,
) -> Vec<MatchNode> {
    let mut nodes: Vec<MatchNode> = tops
        .into_iter()
        .map(|top| MatchNode::from_boundary(top, aliases))
        .collect();

    let index: HashMap<String, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, node)| (node.osm_id.clone(), i))
        .collect();

    let mut current: Option<(&str, usize)> = None;

    for child in children {
        let Some(parent_osm_id) = child.parent_osm_id.as_deref() else {
            tracing::debug!(osm_id = %child.osm_id, "Skipping child without parent");
            continue;
        };

        let top_idx = match current {
            Some((osm_id, idx)) if osm_id == parent_osm_id => idx,
            _ => match index.get_key_value(parent_osm_id) {
                Some((osm_id, &idx)) => {
                    current = Some((osm_id.as_str(), idx));
                    idx
                }
                None => {
                    tracing::debug!(
                        osm_id = %child.osm_id,
                        parent = parent_osm_id,
                        "Skipping child of unknown top"
                    );
                    continue;
                }
            },
        };

        let mut node = MatchNode::from_boundary(child, aliases);
        let top = &mut nodes[top_idx];

        node.match_text = format!(
            "{} {} {} {}",
            node.name, node.aliases, top.name, top.aliases
        );
        top.match_text = format!("{} {} {}", top.match_text, node.name, node.aliases);
        top.children.push(node);
    }

    nodes
}
