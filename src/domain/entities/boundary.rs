//! Boundary entity representing a node of the administrative geography tree.

use serde::Serialize;
use serde_json::Value;

use crate::domain::geometry::count_coordinates;

/// Depth of a boundary in the administrative tree.
///
/// Serialized as its numeric depth (`0` for countries).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "i16")]
pub enum BoundaryLevel {
    Country,
    State,
    District,
}

impl BoundaryLevel {
    /// Level a direct child of this boundary must have, if any.
    pub fn child_level(self) -> Option<Self> {
        match self {
            Self::Country => Some(Self::State),
            Self::State => Some(Self::District),
            Self::District => None,
        }
    }

    /// Human-readable level label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Country => "country",
            Self::State => "state",
            Self::District => "district",
        }
    }
}

impl From<BoundaryLevel> for i16 {
    fn from(level: BoundaryLevel) -> Self {
        match level {
            BoundaryLevel::Country => 0,
            BoundaryLevel::State => 1,
            BoundaryLevel::District => 2,
        }
    }
}

impl TryFrom<i16> for BoundaryLevel {
    type Error = i16;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Country),
            1 => Ok(Self::State),
            2 => Ok(Self::District),
            other => Err(other),
        }
    }
}

/// An administrative boundary (country, state or district).
///
/// Boundaries are provisioned out-of-band and never modified by the alias
/// operations. `parent_osm_id` is denormalized from the parent row so callers can
/// group children by their parent's external id without another lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    pub id: i64,
    pub osm_id: String,
    pub name: String,
    pub level: BoundaryLevel,
    pub parent_id: Option<i64>,
    pub parent_osm_id: Option<String>,
    pub geometry: Option<Value>,
    pub simplified_geometry: Option<Value>,
}

impl Boundary {
    /// Creates a new Boundary instance.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: i64,
        osm_id: String,
        name: String,
        level: BoundaryLevel,
        parent_id: Option<i64>,
        parent_osm_id: Option<String>,
        geometry: Option<Value>,
        simplified_geometry: Option<Value>,
    ) -> Self {
        Self {
            id,
            osm_id,
            name,
            level,
            parent_id,
            parent_osm_id,
            geometry,
            simplified_geometry,
        }
    }

    /// Returns true for top-level (country) boundaries.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Input data for importing a boundary.
///
/// Used by the admin import only; the alias operations never write boundaries.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBoundary {
    pub osm_id: String,
    pub name: String,
    pub level: BoundaryLevel,
    pub parent_osm_id: Option<String>,
    pub geometry: Option<Value>,
    pub simplified_geometry: Option<Value>,
}

/// A boundary as listed, with geometry sizes instead of the geometry itself.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundarySummary {
    pub osm_id: String,
    pub name: String,
    pub level: BoundaryLevel,
    pub geometry_coords: usize,
    pub simplified_geometry_coords: usize,
}

impl From<&Boundary> for BoundarySummary {
    fn from(boundary: &Boundary) -> Self {
        Self {
            osm_id: boundary.osm_id.clone(),
            name: boundary.name.clone(),
            level: boundary.level,
            geometry_coords: boundary.geometry.as_ref().map_or(0, count_coordinates),
            simplified_geometry_coords: boundary
                .simplified_geometry
                .as_ref()
                .map_or(0, count_coordinates),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_level_round_trips_through_i16() {
        for level in [
            BoundaryLevel::Country,
            BoundaryLevel::State,
            BoundaryLevel::District,
        ] {
            let raw: i16 = level.into();
            assert_eq!(BoundaryLevel::try_from(raw), Ok(level));
        }
        assert_eq!(BoundaryLevel::try_from(3), Err(3));
    }

    #[test]
    fn test_level_serializes_as_number() {
        assert_eq!(serde_json::to_value(BoundaryLevel::State).unwrap(), json!(1));
    }

    #[test]
    fn test_summary_counts_coordinates() {
        let boundary = Boundary::new(
            1,
            "R171496".to_string(),
            "Rwanda".to_string(),
            BoundaryLevel::Country,
            None,
            None,
            Some(json!({"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]]})),
            None,
        );

        let summary = BoundarySummary::from(&boundary);

        assert_eq!(summary.osm_id, "R171496");
        assert_eq!(summary.geometry_coords, 4);
        assert_eq!(summary.simplified_geometry_coords, 0);
    }

    #[test]
    fn test_child_level() {
        assert_eq!(
            BoundaryLevel::Country.child_level(),
            Some(BoundaryLevel::State)
        );
        assert_eq!(BoundaryLevel::District.child_level(), None);
    }

    #[test]
    fn test_boundary_is_root() {
        let country = Boundary::new(
            1,
            "R1".to_string(),
            "Rwanda".to_string(),
            BoundaryLevel::Country,
            None,
            None,
            None,
            None,
        );
        assert!(country.is_root());

        let state = Boundary::new(
            2,
            "R2".to_string(),
            "Kigali".to_string(),
            BoundaryLevel::State,
            Some(1),
            Some("R1".to_string()),
            None,
            None,
        );
        assert!(!state.is_root());
    }
}
