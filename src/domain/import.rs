//! Parsing of boundary import files.
//!
//! The admin CLI imports a GeoJSON `FeatureCollection` in which every feature
//! describes one boundary:
//!
//! ```json
//! {
//!   "type": "Feature",
//!   "geometry": { "type": "MultiPolygon", "coordinates": [...] },
//!   "properties": {
//!     "osm_id": "R1708283",
//!     "name": "Kigali",
//!     "level": 1,
//!     "parent_osm_id": "R171496",
//!     "simplified_geometry": { "type": "Polygon", "coordinates": [...] }
//!   }
//! }
//! ```

use std::collections::{HashMap, HashSet};

use serde_json::Value;

use crate::domain::entities::{BoundaryLevel, NewBoundary};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ImportError {
    #[error("expected a GeoJSON FeatureCollection")]
    NotFeatureCollection,

    #[error("feature #{index}: {reason}")]
    InvalidFeature { index: usize, reason: String },

    #[error("osm_id {0} appears more than once")]
    DuplicateOsmId(String),
}

fn invalid(index: usize, reason: impl Into<String>) -> ImportError {
    ImportError::InvalidFeature {
        index,
        reason: reason.into(),
    }
}

fn optional_geometry(value: Option<&Value>) -> Option<Value> {
    value.filter(|v| !v.is_null()).cloned()
}

fn parse_feature(index: usize, feature: &Value) -> Result<NewBoundary, ImportError> {
    let properties = feature
        .get("properties")
        .and_then(Value::as_object)
        .ok_or_else(|| invalid(index, "missing properties"))?;

    let text = |key: &str| -> Result<Option<String>, ImportError> {
        match properties.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) if !s.trim().is_empty() => Ok(Some(s.trim().to_string())),
            Some(_) => Err(invalid(index, format!("{key} must be a non-empty string"))),
        }
    };

    let osm_id = text("osm_id")?.ok_or_else(|| invalid(index, "missing osm_id"))?;
    let name = text("name")?.ok_or_else(|| invalid(index, format!("{osm_id}: missing name")))?;
    let parent_osm_id = text("parent_osm_id")?;

    let level = properties
        .get("level")
        .and_then(Value::as_i64)
        .and_then(|l| i16::try_from(l).ok())
        .and_then(|l| BoundaryLevel::try_from(l).ok())
        .ok_or_else(|| invalid(index, format!("{osm_id}: level must be 0, 1 or 2")))?;

    match (level, &parent_osm_id) {
        (BoundaryLevel::Country, Some(_)) => {
            return Err(invalid(index, format!("{osm_id}: a country has no parent")));
        }
        (BoundaryLevel::State | BoundaryLevel::District, None) => {
            return Err(invalid(index, format!("{osm_id}: parent_osm_id is required")));
        }
        _ => {}
    }

    Ok(NewBoundary {
        osm_id,
        name,
        level,
        parent_osm_id,
        geometry: optional_geometry(feature.get("geometry")),
        simplified_geometry: optional_geometry(properties.get("simplified_geometry")),
    })
}

/// Parses an import document into boundaries ordered parents first.
///
/// Parents referenced from the file must sit exactly one level above their
/// children; parents absent from the file are expected to exist already.
///
/// # Errors
///
/// Returns [`ImportError`] for the first invalid feature; nothing is returned
/// for partial imports.
pub fn parse_import_features(document: &Value) -> Result<Vec<NewBoundary>, ImportError> {
    if document.get("type").and_then(Value::as_str) != Some("FeatureCollection") {
        return Err(ImportError::NotFeatureCollection);
    }
    let features = document
        .get("features")
        .and_then(Value::as_array)
        .ok_or(ImportError::NotFeatureCollection)?;

    let mut boundaries = features
        .iter()
        .enumerate()
        .map(|(index, feature)| parse_feature(index, feature))
        .collect::<Result<Vec<_>, _>>()?;

    let mut seen = HashSet::new();
    for boundary in &boundaries {
        if !seen.insert(boundary.osm_id.as_str()) {
            return Err(ImportError::DuplicateOsmId(boundary.osm_id.clone()));
        }
    }

    let levels: HashMap<&str, BoundaryLevel> = boundaries
        .iter()
        .map(|b| (b.osm_id.as_str(), b.level))
        .collect();
    for (index, boundary) in boundaries.iter().enumerate() {
        if let Some(parent) = boundary.parent_osm_id.as_deref()
            && let Some(parent_level) = levels.get(parent)
            && parent_level.child_level() != Some(boundary.level)
        {
            return Err(invalid(
                index,
                format!(
                    "{}: parent {} is a {}, not one level above a {}",
                    boundary.osm_id,
                    parent,
                    parent_level.as_str(),
                    boundary.level.as_str()
                ),
            ));
        }
    }

    boundaries.sort_by_key(|b| b.level);
    Ok(boundaries)
}
