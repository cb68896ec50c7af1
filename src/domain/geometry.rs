//! GeoJSON helpers for boundary geometry.
//!
//! Geometry is treated as an opaque GeoJSON payload. The only inspection done
//! here is counting positions for the boundary list.

use serde_json::{Value, json};

use crate::domain::entities::Boundary;

/// Counts the coordinate positions in a GeoJSON value.
///
/// Accepts bare geometries, `GeometryCollection`s, `Feature`s and
/// `FeatureCollection`s. A position is an array whose first element is a number.
pub fn count_coordinates(value: &Value) -> usize {
    match value {
        Value::Object(map) => {
            if let Some(coordinates) = map.get("coordinates") {
                count_positions(coordinates)
            } else if let Some(Value::Array(geometries)) = map.get("geometries") {
                geometries.iter().map(count_coordinates).sum()
            } else if let Some(Value::Array(features)) = map.get("features") {
                features.iter().map(count_coordinates).sum()
            } else if let Some(geometry) = map.get("geometry") {
                count_coordinates(geometry)
            } else {
                0
            }
        }
        _ => 0,
    }
}

fn count_positions(value: &Value) -> usize {
    match value {
        Value::Array(items) => match items.first() {
            Some(Value::Number(_)) => 1,
            _ => items.iter().map(count_positions).sum(),
        },
        _ => 0,
    }
}

/// Builds the GeoJSON feature for a boundary.
///
/// `zoomable` tells the map client whether the boundary has children to
/// drill into.
pub fn boundary_feature(boundary: &Boundary, zoomable: bool) -> Value {
    json!({
        "type": "Feature",
        "geometry": boundary.simplified_geometry.clone().unwrap_or(Value::Null),
        "properties": {
            "name": boundary.name,
            "osm_id": boundary.osm_id,
            "id": boundary.id,
            "level": boundary.level,
        },
        "zoomable": zoomable,
    })
}

/// Wraps features into a `FeatureCollection`.
pub fn feature_collection(features: Vec<Value>) -> Value {
    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::BoundaryLevel;

    #[test]
    fn test_count_polygon() {
        let polygon = json!({
            "type": "Polygon",
            "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]
        });
        assert_eq!(count_coordinates(&polygon), 4);
    }

    #[test]
    fn test_count_multipolygon() {
        let multi = json!({
            "type": "MultiPolygon",
            "coordinates": [
                [[[0, 0], [1, 0], [0, 1], [0, 0]]],
                [[[5, 5], [6, 5], [5, 6], [5, 5]], [[5.1, 5.1], [5.2, 5.1], [5.1, 5.1]]]
            ]
        });
        assert_eq!(count_coordinates(&multi), 11);
    }

    #[test]
    fn test_count_point_and_collections() {
        let point = json!({"type": "Point", "coordinates": [30.06, -1.95]});
        assert_eq!(count_coordinates(&point), 1);

        let collection = json!({
            "type": "GeometryCollection",
            "geometries": [point, {"type": "LineString", "coordinates": [[0, 0], [1, 1]]}]
        });
        assert_eq!(count_coordinates(&collection), 3);

        let features = feature_collection(vec![json!({"type": "Feature", "geometry": collection})]);
        assert_eq!(count_coordinates(&features), 3);
    }

    #[test]
    fn test_count_non_geometry_is_zero() {
        assert_eq!(count_coordinates(&Value::Null), 0);
        assert_eq!(count_coordinates(&json!({"type": "Polygon"})), 0);
    }

    #[test]
    fn test_boundary_feature_shape() {
        let shape = json!({"type": "Point", "coordinates": [1, 2]});
        let boundary = Boundary::new(
            7,
            "R7".to_string(),
            "Kigali".to_string(),
            BoundaryLevel::State,
            Some(1),
            Some("R1".to_string()),
            None,
            Some(shape.clone()),
        );

        let feature = boundary_feature(&boundary, true);

        assert_eq!(feature["type"], "Feature");
        assert_eq!(feature["geometry"], shape);
        assert_eq!(feature["properties"]["osm_id"], "R7");
        assert_eq!(feature["properties"]["id"], 7);
        assert_eq!(feature["properties"]["level"], 1);
        assert_eq!(feature["zoomable"], true);
    }

    #[test]
    fn test_feature_without_simplified_geometry_has_null_geometry() {
        let boundary = Boundary::new(
            1,
            "R1".to_string(),
            "Nowhere".to_string(),
            BoundaryLevel::District,
            Some(2),
            Some("R2".to_string()),
            Some(json!({"type": "Point", "coordinates": [0, 0]})),
            None,
        );

        assert!(boundary_feature(&boundary, false)["geometry"].is_null());
    }
}
