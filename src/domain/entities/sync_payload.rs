//! Nested alias payload submitted by the alias editor.

use serde::Deserialize;
use serde_json::Value;

use crate::error::AppError;

/// Top-level payload entry: a boundary, its alias blob and optional children.
///
/// Unknown fields (such as `name` or `match` echoed back from the assembled
/// tree) are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SyncEntry {
    pub osm_id: String,
    #[serde(default)]
    pub aliases: Option<String>,
    #[serde(default)]
    pub children: Option<Vec<SyncChild>>,
}

/// Child entry nested under a [`SyncEntry`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SyncChild {
    pub osm_id: String,
    #[serde(default)]
    pub aliases: Option<String>,
}

impl SyncEntry {
    pub fn alias_blob(&self) -> &str {
        self.aliases.as_deref().unwrap_or_default()
    }

    pub fn children(&self) -> &[SyncChild] {
        self.children.as_deref().unwrap_or_default()
    }
}

impl SyncChild {
    pub fn alias_blob(&self) -> &str {
        self.aliases.as_deref().unwrap_or_default()
    }
}

/// A parsed synchronization payload.
///
/// Keeps the raw JSON document so it can be echoed back unchanged.
#[derive(Debug, Clone)]
pub struct SyncPayload {
    raw: Value,
    entries: Vec<SyncEntry>,
}

impl SyncPayload {
    /// Parses a request body into entries.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::MalformedPayload`] if the body is not JSON or is not
    /// an array of entries.
    pub fn parse(body: &[u8]) -> Result<Self, AppError> {
        let raw: Value =
            serde_json::from_slice(body).map_err(|e| AppError::malformed_payload(e.to_string()))?;

        let entries = Vec::<SyncEntry>::deserialize(&raw)
            .map_err(|e| AppError::malformed_payload(e.to_string()))?;

        Ok(Self { raw, entries })
    }

    pub fn entries(&self) -> &[SyncEntry] {
        &self.entries
    }

    pub fn into_raw(self) -> Value {
        self.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_nested_payload() {
        let body = br#"[
            {"osm_id": "R1", "aliases": "Kigali\nKGL", "children": [
                {"osm_id": "R11", "aliases": "Nyarugenge"}
            ]},
            {"osm_id": "R2"}
        ]"#;

        let payload = SyncPayload::parse(body).unwrap();

        assert_eq!(payload.entries().len(), 2);
        assert_eq!(payload.entries()[0].alias_blob(), "Kigali\nKGL");
        assert_eq!(payload.entries()[0].children().len(), 1);
        assert_eq!(payload.entries()[0].children()[0].osm_id, "R11");
        assert_eq!(payload.entries()[1].alias_blob(), "");
        assert!(payload.entries()[1].children().is_empty());
    }

    #[test]
    fn test_parse_ignores_echoed_tree_fields() {
        let body = br#"[{"osm_id": "R1", "name": "Kigali", "level": 1, "match": "Kigali ", "aliases": null, "children": null}]"#;

        let payload = SyncPayload::parse(body).unwrap();

        assert_eq!(payload.entries()[0].alias_blob(), "");
        assert!(payload.entries()[0].children().is_empty());
    }

    #[test]
    fn test_raw_is_preserved() {
        let body = br#"[{"osm_id": "R1", "extra": true}]"#;
        let payload = SyncPayload::parse(body).unwrap();
        assert_eq!(payload.into_raw(), json!([{"osm_id": "R1", "extra": true}]));
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let result = SyncPayload::parse(b"not json");
        assert!(matches!(result, Err(AppError::MalformedPayload { .. })));
    }

    #[test]
    fn test_wrong_shape_is_malformed() {
        let result = SyncPayload::parse(br#"{"osm_id": "R1"}"#);
        assert!(matches!(result, Err(AppError::MalformedPayload { .. })));

        let result = SyncPayload::parse(br#"[{"aliases": "no id"}]"#);
        assert!(matches!(result, Err(AppError::MalformedPayload { .. })));
    }

    #[test]
    fn test_empty_array_is_valid() {
        let payload = SyncPayload::parse(b"[]").unwrap();
        assert!(payload.entries().is_empty());
    }
}
