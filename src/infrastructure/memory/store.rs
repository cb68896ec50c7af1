use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::entities::{
    Boundary, BoundaryAlias, BoundarySummary, NewBoundary, Organization,
};
use crate::domain::repositories::{
    AliasRepository, ApiToken, BoundaryFilter, BoundaryRepository, OrganizationRepository,
    TokenRepository,
};
use crate::error::AppError;

#[derive(Default)]
struct State {
    next_id: i64,
    boundaries: Vec<Boundary>,
    aliases: Vec<BoundaryAlias>,
    orgs: Vec<Organization>,
    tokens: Vec<ApiToken>,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn matches(boundary: &Boundary, search: Option<&str>) -> bool {
        match search {
            None => true,
            Some(term) => {
                let term = term.to_lowercase();
                boundary.name.to_lowercase().contains(&term)
                    || boundary.osm_id.to_lowercase().contains(&term)
            }
        }
    }
}

/// Repository implementation holding all data in memory.
#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a boundary, resolving its parent by osm id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the osm id exists.
    /// Returns [`AppError::NotFound`] if the parent does not exist.
    /// Returns [`AppError::Validation`] if the level is not one below the parent's.
    pub async fn insert_boundary(&self, new: NewBoundary) -> Result<Boundary, AppError> {
        let mut state = self.state.write().await;

        if state.boundaries.iter().any(|b| b.osm_id == new.osm_id) {
            return Err(AppError::conflict(
                "Boundary already exists",
                json!({"osm_id": new.osm_id}),
            ));
        }

        let parent_id = match &new.parent_osm_id {
            Some(parent_osm_id) => {
                let parent = state
                    .boundaries
                    .iter()
                    .find(|b| &b.osm_id == parent_osm_id)
                    .ok_or_else(|| {
                        AppError::not_found(
                            "Parent boundary not found",
                            json!({"parent_osm_id": parent_osm_id}),
                        )
                    })?;

                if parent.level.child_level() != Some(new.level) {
                    return Err(AppError::bad_request(
                        "Boundary level does not follow its parent",
                        json!({
                            "osm_id": new.osm_id,
                            "level": new.level,
                            "parent_osm_id": parent_osm_id,
                            "parent_level": parent.level,
                        }),
                    ));
                }

                Some(parent.id)
            }
            None => None,
        };

        let boundary = Boundary::new(
            state.next_id(),
            new.osm_id,
            new.name,
            new.level,
            parent_id,
            new.parent_osm_id,
            new.geometry,
            new.simplified_geometry,
        );
        state.boundaries.push(boundary.clone());

        Ok(boundary)
    }
}

#[async_trait]
impl BoundaryRepository for InMemoryStore {
    async fn find_by_osm_id(&self, osm_id: &str) -> Result<Option<Boundary>, AppError> {
        let state = self.state.read().await;
        Ok(state.boundaries.iter().find(|b| b.osm_id == osm_id).cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Boundary>, AppError> {
        let state = self.state.read().await;
        Ok(state.boundaries.iter().find(|b| b.id == id).cloned())
    }

    async fn children_of(&self, boundary_id: i64) -> Result<Vec<Boundary>, AppError> {
        let state = self.state.read().await;
        let mut children: Vec<Boundary> = state
            .boundaries
            .iter()
            .filter(|b| b.parent_id == Some(boundary_id))
            .cloned()
            .collect();
        children.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(children)
    }

    async fn children_of_any(&self, boundary_ids: &[i64]) -> Result<Vec<Boundary>, AppError> {
        let state = self.state.read().await;
        let mut children: Vec<Boundary> = state
            .boundaries
            .iter()
            .filter(|b| b.parent_id.is_some_and(|p| boundary_ids.contains(&p)))
            .cloned()
            .collect();
        children.sort_by(|a, b| {
            a.parent_osm_id
                .cmp(&b.parent_osm_id)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(children)
    }

    async fn count_children_of_any(
        &self,
        boundary_ids: &[i64],
    ) -> Result<HashMap<i64, i64>, AppError> {
        let state = self.state.read().await;
        let mut counts = HashMap::new();
        for parent_id in state.boundaries.iter().filter_map(|b| b.parent_id) {
            if boundary_ids.contains(&parent_id) {
                *counts.entry(parent_id).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }

    async fn search(&self, filter: &BoundaryFilter) -> Result<Vec<BoundarySummary>, AppError> {
        let state = self.state.read().await;
        let mut found: Vec<&Boundary> = state
            .boundaries
            .iter()
            .filter(|b| State::matches(b, filter.search.as_deref()))
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.osm_id.cmp(&b.osm_id)));

        Ok(found
            .into_iter()
            .skip(filter.offset.max(0) as usize)
            .take(filter.limit.max(0) as usize)
            .map(BoundarySummary::from)
            .collect())
    }

    async fn count_matching(&self, filter: &BoundaryFilter) -> Result<i64, AppError> {
        let state = self.state.read().await;
        Ok(state
            .boundaries
            .iter()
            .filter(|b| State::matches(b, filter.search.as_deref()))
            .count() as i64)
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.state.read().await.boundaries.len() as i64)
    }
}

#[async_trait]
impl AliasRepository for InMemoryStore {
    async fn list_aliases(&self, org_id: i64, boundary_id: i64) -> Result<Vec<String>, AppError> {
        let state = self.state.read().await;
        Ok(state
            .aliases
            .iter()
            .filter(|a| a.org_id == org_id && a.boundary_id == boundary_id)
            .map(|a| a.name.clone())
            .collect())
    }

    async fn list_aliases_for(
        &self,
        org_id: i64,
        boundary_ids: &[i64],
    ) -> Result<Vec<BoundaryAlias>, AppError> {
        let state = self.state.read().await;
        let mut aliases: Vec<BoundaryAlias> = state
            .aliases
            .iter()
            .filter(|a| a.org_id == org_id && boundary_ids.contains(&a.boundary_id))
            .cloned()
            .collect();
        aliases.sort_by_key(|a| (a.boundary_id, a.id));
        Ok(aliases)
    }

    async fn replace_aliases(
        &self,
        org_id: i64,
        boundary_id: i64,
        names: Vec<String>,
        actor: &str,
    ) -> Result<usize, AppError> {
        let mut state = self.state.write().await;

        state
            .aliases
            .retain(|a| !(a.org_id == org_id && a.boundary_id == boundary_id));

        let now = Utc::now();
        let mut inserted = 0;
        for name in names.into_iter().filter(|name| !name.is_empty()) {
            let id = state.next_id();
            state.aliases.push(BoundaryAlias {
                id,
                org_id,
                boundary_id,
                name,
                created_by: actor.to_string(),
                modified_by: actor.to_string(),
                created_on: now,
                modified_on: now,
            });
            inserted += 1;
        }

        Ok(inserted)
    }

    async fn count_for_org(&self, org_id: i64) -> Result<i64, AppError> {
        let state = self.state.read().await;
        Ok(state.aliases.iter().filter(|a| a.org_id == org_id).count() as i64)
    }
}

#[async_trait]
impl OrganizationRepository for InMemoryStore {
    async fn create(&self, name: &str) -> Result<Organization, AppError> {
        let mut state = self.state.write().await;

        if state.orgs.iter().any(|o| o.name == name) {
            return Err(AppError::conflict(
                "Organization already exists",
                json!({"name": name}),
            ));
        }

        let now = Utc::now();
        let org = Organization {
            id: state.next_id(),
            name: name.to_string(),
            country_id: None,
            created_at: now,
            updated_at: now,
        };
        state.orgs.push(org.clone());

        Ok(org)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Organization>, AppError> {
        let state = self.state.read().await;
        Ok(state.orgs.iter().find(|o| o.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Organization>, AppError> {
        let state = self.state.read().await;
        Ok(state.orgs.iter().find(|o| o.name == name).cloned())
    }

    async fn list(&self) -> Result<Vec<Organization>, AppError> {
        let state = self.state.read().await;
        let mut orgs = state.orgs.clone();
        orgs.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(orgs)
    }

    async fn set_country(&self, org_id: i64, country_id: i64) -> Result<Organization, AppError> {
        let mut state = self.state.write().await;

        let org = state
            .orgs
            .iter_mut()
            .find(|o| o.id == org_id)
            .ok_or_else(|| AppError::not_found("Organization not found", json!({"id": org_id})))?;
        org.country_id = Some(country_id);
        org.updated_at = Utc::now();

        Ok(org.clone())
    }
}

#[async_trait]
impl TokenRepository for InMemoryStore {
    async fn find_active(&self, token_hash: &str) -> Result<Option<ApiToken>, AppError> {
        let state = self.state.read().await;
        Ok(state
            .tokens
            .iter()
            .find(|t| t.token_hash == token_hash && t.revoked_at.is_none())
            .cloned())
    }

    async fn update_last_used(&self, token_hash: &str) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        if let Some(token) = state
            .tokens
            .iter_mut()
            .find(|t| t.token_hash == token_hash && t.revoked_at.is_none())
        {
            token.last_used_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn create_token(
        &self,
        org_id: i64,
        name: &str,
        token_hash: &str,
    ) -> Result<ApiToken, AppError> {
        let mut state = self.state.write().await;

        if state.tokens.iter().any(|t| t.token_hash == token_hash) {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({"constraint": "api_tokens_token_hash_key"}),
            ));
        }

        let token = ApiToken {
            id: state.next_id(),
            org_id,
            name: name.to_string(),
            token_hash: token_hash.to_string(),
            created_at: Utc::now(),
            last_used_at: None,
            revoked_at: None,
        };
        state.tokens.push(token.clone());

        Ok(token)
    }

    async fn list_tokens(&self) -> Result<Vec<ApiToken>, AppError> {
        Ok(self.state.read().await.tokens.clone())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ApiToken>, AppError> {
        let state = self.state.read().await;
        Ok(state.tokens.iter().find(|t| t.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<ApiToken>, AppError> {
        let state = self.state.read().await;
        Ok(state.tokens.iter().rev().find(|t| t.name == name).cloned())
    }

    async fn revoke_token(&self, id: i64) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        match state
            .tokens
            .iter_mut()
            .find(|t| t.id == id && t.revoked_at.is_none())
        {
            Some(token) => {
                token.revoked_at = Some(Utc::now());
                Ok(())
            }
            None => Err(AppError::not_found(
                "Token not found or already revoked",
                json!({"id": id}),
            )),
        }
    }
}
