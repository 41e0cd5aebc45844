//! Catalog endpoints.
//!
//! Each kind lives under its own route family (`/places`, `/activities`,
//! `/circuits`, `/events`, `/artisans`) with the same sub-routes: the
//! base path lists public content, `/all` and `/pending` are the admin
//! views, and `PUT /{id}/validate` approves a submission. The backend
//! sends per-kind payloads without a discriminator, so (de)serialization
//! goes through the concrete record types and is wrapped into
//! [`Entity`] here.

use async_trait::async_trait;
use serde_json::Value;

use taroudant_domain::api::{CatalogApi, ListScope};
use taroudant_domain::entity::{Entity, EntityDraft, EntityKey, EntityKind};
use taroudant_domain::error::{LifecycleError, Result};

use crate::ApiClient;

fn entity_from_value(kind: EntityKind, value: Value) -> Result<Entity> {
    let malformed = |e: serde_json::Error| LifecycleError::Network(e.to_string());
    Ok(match kind {
        EntityKind::Place => Entity::Place(serde_json::from_value(value).map_err(malformed)?),
        EntityKind::Activity => {
            Entity::Activity(serde_json::from_value(value).map_err(malformed)?)
        },
        EntityKind::Circuit => Entity::Circuit(serde_json::from_value(value).map_err(malformed)?),
        EntityKind::Event => Entity::Event(serde_json::from_value(value).map_err(malformed)?),
        EntityKind::Artisan => Entity::Artisan(serde_json::from_value(value).map_err(malformed)?),
    })
}

fn draft_to_value(draft: &EntityDraft) -> Result<Value> {
    let malformed = |e: serde_json::Error| LifecycleError::Network(e.to_string());
    match draft {
        EntityDraft::Place(d) => serde_json::to_value(d).map_err(malformed),
        EntityDraft::Activity(d) => serde_json::to_value(d).map_err(malformed),
        EntityDraft::Circuit(d) => serde_json::to_value(d).map_err(malformed),
        EntityDraft::Event(d) => serde_json::to_value(d).map_err(malformed),
        EntityDraft::Artisan(d) => serde_json::to_value(d).map_err(malformed),
    }
}

fn scope_path(kind: EntityKind, scope: ListScope) -> String {
    let base = kind.base_path();
    match scope {
        ListScope::Public => base.to_owned(),
        ListScope::All => format!("{base}/all"),
        ListScope::Pending => format!("{base}/pending"),
    }
}

#[async_trait]
impl CatalogApi for ApiClient {
    async fn create(&self, draft: EntityDraft) -> Result<Entity> {
        let kind = draft.kind();
        let body = draft_to_value(&draft)?;
        let value: Value = self.post_json(kind.base_path(), &body).await?;
        entity_from_value(kind, value)
    }

    async fn update(&self, key: EntityKey, draft: EntityDraft) -> Result<Entity> {
        let body = draft_to_value(&draft)?;
        let path = format!("{}/{}", key.kind.base_path(), key.id);
        let value: Value = self.put_json(&path, &body).await?;
        entity_from_value(key.kind, value)
    }

    async fn delete(&self, key: EntityKey) -> Result<()> {
        self.delete_path(&format!("{}/{}", key.kind.base_path(), key.id))
            .await
    }

    async fn validate(&self, key: EntityKey) -> Result<Entity> {
        let path = format!("{}/{}/validate", key.kind.base_path(), key.id);
        let value: Value = self.put_empty(&path).await?;
        entity_from_value(key.kind, value)
    }

    async fn fetch(&self, key: EntityKey) -> Result<Entity> {
        let path = format!("{}/{}", key.kind.base_path(), key.id);
        let value: Value = self.get_json(&path).await?;
        entity_from_value(key.kind, value)
    }

    async fn list(&self, kind: EntityKind, scope: ListScope) -> Result<Vec<Entity>> {
        let values: Vec<Value> = self.get_json(&scope_path(kind, scope)).await?;
        values
            .into_iter()
            .map(|value| entity_from_value(kind, value))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use taroudant_domain::types::EntityStatus;

    #[test]
    fn wire_payload_without_discriminator_becomes_an_entity() {
        let value = json!({
            "id": 4,
            "name": "Palais Salam",
            "description": "Historic palace hotel",
            "city": "Taroudant",
            "latitude": 30.47,
            "longitude": -8.87,
            "status": "ACTIVE"
        });
        let entity = entity_from_value(EntityKind::Place, value).unwrap();
        assert_eq!(entity.kind(), EntityKind::Place);
        assert_eq!(entity.status(), EntityStatus::Active);
        assert_eq!(entity.owner(), None);
    }

    #[test]
    fn wrong_shape_is_a_transport_error() {
        let err = entity_from_value(EntityKind::Place, json!({"id": 4})).unwrap_err();
        assert!(matches!(err, LifecycleError::Network(_)));
    }

    #[test]
    fn scope_paths_match_backend_routes() {
        assert_eq!(scope_path(EntityKind::Place, ListScope::Public), "/places");
        assert_eq!(
            scope_path(EntityKind::Activity, ListScope::All),
            "/activities/all"
        );
        assert_eq!(
            scope_path(EntityKind::Circuit, ListScope::Pending),
            "/circuits/pending"
        );
    }
}
