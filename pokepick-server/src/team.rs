use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::info;

use crate::error::{ApiError, Result, DUPLICATE_MEMBER, MISSING_POKEMON, TEAM_FULL};

pub const MAX_TEAM_SIZE: usize = 6;

/// The single shared team. Members are stored exactly as submitted.
#[async_trait]
pub trait TeamRepository: Send + Sync {
    async fn team(&self) -> Vec<Value>;
    async fn add(&self, pokemon: Value) -> Result<Vec<Value>>;
    async fn remove(&self, id: &Value) -> Vec<Value>;
    async fn clear(&self) -> Vec<Value>;
}

/// The `id` of a submitted member, when it is set to something truthy.
pub fn member_id(pokemon: &Value) -> Option<&Value> {
    pokemon.get("id").filter(|id| is_present(id))
}

/// Loose JSON truthiness: `null`, `false`, `0`, `NaN` and `""` count as absent.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[derive(Default)]
pub struct MemoryTeamRepository {
    members: RwLock<Vec<Value>>,
}

#[async_trait]
impl TeamRepository for MemoryTeamRepository {
    async fn team(&self) -> Vec<Value> {
        self.members.read().await.clone()
    }

    async fn add(&self, pokemon: Value) -> Result<Vec<Value>> {
        let id = member_id(&pokemon)
            .cloned()
            .ok_or_else(|| ApiError::bad_request(MISSING_POKEMON))?;
        let mut members = self.members.write().await;
        if members.iter().any(|member| member.get("id") == Some(&id)) {
            return Err(ApiError::bad_request(DUPLICATE_MEMBER));
        }
        if members.len() >= MAX_TEAM_SIZE {
            return Err(ApiError::bad_request(TEAM_FULL));
        }
        members.push(pokemon);
        info!(%id, size = members.len(), "team member added");
        Ok(members.clone())
    }

    async fn remove(&self, id: &Value) -> Vec<Value> {
        let mut members = self.members.write().await;
        members.retain(|member| member.get("id") != Some(id));
        members.clone()
    }

    async fn clear(&self) -> Vec<Value> {
        self.members.write().await.clear();
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn ids_compare_by_exact_json_value() {
        let repo = MemoryTeamRepository::default();
        repo.add(json!({ "id": "25" })).await.unwrap();
        repo.add(json!({ "id": 25 })).await.unwrap();
        assert_eq!(
            repo.add(json!({ "id": "25" })).await,
            Err(ApiError::bad_request(DUPLICATE_MEMBER))
        );
        assert_eq!(repo.remove(&json!("25")).await, vec![json!({ "id": 25 })]);
    }

    #[tokio::test]
    async fn enforces_unique_ids_and_size() {
        let repo = MemoryTeamRepository::default();
        for id in 1..=6 {
            repo.add(json!({ "id": id })).await.unwrap();
        }
        assert_eq!(
            repo.add(json!({ "id": 3 })).await,
            Err(ApiError::bad_request(DUPLICATE_MEMBER))
        );
        assert_eq!(
            repo.add(json!({ "id": 7 })).await,
            Err(ApiError::bad_request(TEAM_FULL))
        );
        assert_eq!(repo.team().await.len(), 6);
    }

    #[tokio::test]
    async fn missing_id_is_rejected() {
        let repo = MemoryTeamRepository::default();
        for pokemon in [
            json!({}),
            json!({ "id": 0 }),
            json!({ "id": "" }),
            json!({ "id": null }),
            json!({ "id": false }),
        ] {
            assert_eq!(
                repo.add(pokemon).await,
                Err(ApiError::bad_request(MISSING_POKEMON))
            );
        }
    }

    #[tokio::test]
    async fn remove_ignores_unknown_ids() {
        let repo = MemoryTeamRepository::default();
        repo.add(json!({ "id": 1, "name": "bulbasaur" })).await.unwrap();
        repo.add(json!({ "id": 4, "name": "charmander" })).await.unwrap();
        assert_eq!(repo.remove(&json!(99)).await.len(), 2);
        assert_eq!(repo.remove(&json!("1")).await.len(), 2);
        let team = repo.remove(&json!(1)).await;
        assert_eq!(team, vec![json!({ "id": 4, "name": "charmander" })]);
        assert!(repo.clear().await.is_empty());
        assert!(repo.team().await.is_empty());
    }
}
