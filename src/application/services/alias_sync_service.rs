//! Alias synchronization: applies a nested alias payload to the store.

use std::sync::Arc;

use metrics::counter;
use tracing::{debug, info};

use crate::domain::entities::{OrgContext, SyncPayload, parse_alias_blob};
use crate::domain::repositories::{AliasRepository, BoundaryRepository};
use crate::error::AppError;

/// Outcome of one synchronization run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Boundaries (tops and children) whose alias set was replaced.
    pub boundaries_updated: usize,
    /// Entries or children whose osm id matched no boundary.
    pub entries_skipped: usize,
    /// Alias rows inserted across all replacements.
    pub aliases_written: usize,
}

/// Service replacing an organization's aliases from a submitted tree.
pub struct AliasSyncService {
    boundaries: Arc<dyn BoundaryRepository>,
    aliases: Arc<dyn AliasRepository>,
}

impl AliasSyncService {
    pub fn new(boundaries: Arc<dyn BoundaryRepository>, aliases: Arc<dyn AliasRepository>) -> Self {
        Self {
            boundaries,
            aliases,
        }
    }

    /// Applies every entry of the payload, in order.
    ///
    /// Each top-level entry is followed by its children. An entry whose osm
    /// id is unknown is skipped together with its children; an unknown child
    /// is skipped on its own. Each replacement commits independently, so a
    /// store failure leaves earlier entries applied.
    ///
    /// # Errors
    ///
    /// Returns the first store error encountered.
    pub async fn synchronize(
        &self,
        ctx: &OrgContext,
        payload: &SyncPayload,
    ) -> Result<SyncReport, AppError> {
        let mut report = SyncReport::default();

        for entry in payload.entries() {
            if !self
                .apply(ctx, &entry.osm_id, entry.alias_blob(), &mut report)
                .await?
            {
                continue;
            }

            for child in entry.children() {
                self.apply(ctx, &child.osm_id, child.alias_blob(), &mut report)
                    .await?;
            }
        }

        info!(
            org_id = ctx.org_id,
            actor = %ctx.actor,
            boundaries_updated = report.boundaries_updated,
            entries_skipped = report.entries_skipped,
            aliases_written = report.aliases_written,
            "Aliases synchronized"
        );

        Ok(report)
    }

    /// Replaces the aliases of one boundary. Returns `false` if it is unknown.
    async fn apply(
        &self,
        ctx: &OrgContext,
        osm_id: &str,
        blob: &str,
        report: &mut SyncReport,
    ) -> Result<bool, AppError> {
        let Some(boundary) = self.boundaries.find_by_osm_id(osm_id).await? else {
            debug!(org_id = ctx.org_id, osm_id, "Skipping unknown boundary");
            counter!("boundary_sync_entries_total", "outcome" => "skipped").increment(1);
            report.entries_skipped += 1;
            return Ok(false);
        };

        let written = self
            .aliases
            .replace_aliases(ctx.org_id, boundary.id, parse_alias_blob(blob), &ctx.actor)
            .await?;

        counter!("boundary_sync_entries_total", "outcome" => "updated").increment(1);
        counter!("boundary_aliases_written_total").increment(written as u64);
        report.boundaries_updated += 1;
        report.aliases_written += written;

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Boundary, BoundaryLevel, NewBoundary};
    use crate::domain::repositories::{MockAliasRepository, MockBoundaryRepository};
    use crate::infrastructure::memory::InMemoryStore;
    use serde_json::json;

    fn ctx() -> OrgContext {
        OrgContext::new(1, "editor")
    }

    fn payload(value: serde_json::Value) -> SyncPayload {
        SyncPayload::parse(value.to_string().as_bytes()).unwrap()
    }

    fn boundary(id: i64, osm_id: &str) -> Boundary {
        Boundary::new(
            id,
            osm_id.to_string(),
            osm_id.to_string(),
            BoundaryLevel::State,
            Some(1),
            Some("R1".to_string()),
            None,
            None,
        )
    }

    async fn seeded_store() -> Arc<InMemoryStore> {
        let store = Arc::new(InMemoryStore::new());
        for (osm_id, level, parent) in [
            ("R1", BoundaryLevel::Country, None),
            ("R2", BoundaryLevel::State, Some("R1")),
            ("R3", BoundaryLevel::District, Some("R2")),
        ] {
            store
                .insert_boundary(NewBoundary {
                    osm_id: osm_id.to_string(),
                    name: format!("Name {osm_id}"),
                    level,
                    parent_osm_id: parent.map(str::to_string),
                    geometry: None,
                    simplified_geometry: None,
                })
                .await
                .unwrap();
        }
        store
    }

    fn service(store: &Arc<InMemoryStore>) -> AliasSyncService {
        AliasSyncService::new(store.clone(), store.clone())
    }

    #[tokio::test]
    async fn test_blob_is_split_before_replacing() {
        let mut boundaries = MockBoundaryRepository::new();
        boundaries
            .expect_find_by_osm_id()
            .returning(|osm_id| Ok(Some(boundary(2, osm_id))));

        let mut aliases = MockAliasRepository::new();
        aliases
            .expect_replace_aliases()
            .withf(|org_id, boundary_id, names, actor| {
                *org_id == 1 && *boundary_id == 2 && names == &["Foo", "Bar", "Baz"] && actor == "editor"
            })
            .times(1)
            .returning(|_, _, names, _| Ok(names.len()));

        let service = AliasSyncService::new(Arc::new(boundaries), Arc::new(aliases));
        let report = service
            .synchronize(&ctx(), &payload(json!([{"osm_id": "R2", "aliases": "Foo\nBar\n\nBaz"}])))
            .await
            .unwrap();

        assert_eq!(report.aliases_written, 3);
        assert_eq!(report.boundaries_updated, 1);
    }

    #[tokio::test]
    async fn test_unknown_top_skips_its_children() {
        let mut boundaries = MockBoundaryRepository::new();
        boundaries
            .expect_find_by_osm_id()
            .withf(|osm_id| osm_id == "R404")
            .times(1)
            .returning(|_| Ok(None));

        let mut aliases = MockAliasRepository::new();
        aliases.expect_replace_aliases().never();

        let service = AliasSyncService::new(Arc::new(boundaries), Arc::new(aliases));
        let report = service
            .synchronize(
                &ctx(),
                &payload(json!([{
                    "osm_id": "R404",
                    "aliases": "Ghost",
                    "children": [{"osm_id": "R3", "aliases": "Child"}]
                }])),
            )
            .await
            .unwrap();

        assert_eq!(report.entries_skipped, 1);
        assert_eq!(report.boundaries_updated, 0);
    }

    #[tokio::test]
    async fn test_store_failure_keeps_earlier_entries() {
        let store = seeded_store().await;
        let mut boundaries = MockBoundaryRepository::new();
        boundaries.expect_find_by_osm_id().returning(|osm_id| {
            if osm_id == "R3" {
                Err(AppError::internal("Database error", json!({})))
            } else {
                let id = if osm_id == "R1" { 1 } else { 2 };
                Ok(Some(boundary(id, osm_id)))
            }
        });

        let service = AliasSyncService::new(Arc::new(boundaries), store.clone());
        let result = service
            .synchronize(
                &ctx(),
                &payload(json!([
                    {"osm_id": "R2", "aliases": "Kept"},
                    {"osm_id": "R3", "aliases": "Lost"}
                ])),
            )
            .await;

        assert!(matches!(result, Err(AppError::Internal { .. })));
        assert_eq!(store.list_aliases(1, 2).await.unwrap(), vec!["Kept"]);
    }

    #[tokio::test]
    async fn test_resubmitting_same_payload_is_idempotent() {
        let store = seeded_store().await;
        let service = service(&store);
        let body = payload(json!([{
            "osm_id": "R2",
            "aliases": "Kigali City\nUmujyi wa Kigali",
            "children": [{"osm_id": "R3", "aliases": "Gasabo\nGasabo"}]
        }]));

        service.synchronize(&ctx(), &body).await.unwrap();
        let first_top = store.list_aliases(1, 2).await.unwrap();
        let first_child = store.list_aliases(1, 3).await.unwrap();

        service.synchronize(&ctx(), &body).await.unwrap();

        assert_eq!(store.list_aliases(1, 2).await.unwrap(), first_top);
        assert_eq!(store.list_aliases(1, 3).await.unwrap(), first_child);
        assert_eq!(first_child, vec!["Gasabo", "Gasabo"]);
    }

    #[tokio::test]
    async fn test_unknown_child_is_noop() {
        let store = seeded_store().await;
        let service = service(&store);

        let report = service
            .synchronize(
                &ctx(),
                &payload(json!([{
                    "osm_id": "R2",
                    "aliases": "Top",
                    "children": [
                        {"osm_id": "R999", "aliases": "Nowhere"},
                        {"osm_id": "R3", "aliases": "Child"}
                    ]
                }])),
            )
            .await
            .unwrap();

        assert_eq!(
            report,
            SyncReport {
                boundaries_updated: 2,
                entries_skipped: 1,
                aliases_written: 2,
            }
        );
        assert_eq!(store.list_aliases(1, 3).await.unwrap(), vec!["Child"]);
    }

    #[tokio::test]
    async fn test_missing_aliases_clears_existing() {
        let store = seeded_store().await;
        store
            .replace_aliases(1, 2, vec!["Old".to_string()], "editor")
            .await
            .unwrap();

        service(&store)
            .synchronize(&ctx(), &payload(json!([{"osm_id": "R2", "name": "ignored"}])))
            .await
            .unwrap();

        assert!(store.list_aliases(1, 2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_organizations_do_not_share_aliases() {
        let store = seeded_store().await;
        store
            .replace_aliases(2, 2, vec!["Theirs".to_string()], "other")
            .await
            .unwrap();

        service(&store)
            .synchronize(&ctx(), &payload(json!([{"osm_id": "R2", "aliases": "Ours"}])))
            .await
            .unwrap();

        assert_eq!(store.list_aliases(1, 2).await.unwrap(), vec!["Ours"]);
        assert_eq!(store.list_aliases(2, 2).await.unwrap(), vec!["Theirs"]);
    }
}
