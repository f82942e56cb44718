use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::warn;

use crate::config::RuntimeConfig;
use crate::error::{Error, Result};
use crate::model::TeamMember;

pub const MAX_TEAM_SIZE: usize = 6;

pub const DUPLICATE_MEMBER: &str = "Pokemon already in team";
pub const TEAM_FULL: &str = "Team cannot have more than 6 Pokémon";

/// The team resource. Every call returns the team as it stands afterwards.
#[async_trait]
pub trait TeamStore: Send + Sync {
    async fn team(&self) -> Result<Vec<TeamMember>>;
    async fn add(&self, member: TeamMember) -> Result<Vec<TeamMember>>;
    async fn remove(&self, id: u32) -> Result<Vec<TeamMember>>;
    async fn clear(&self) -> Result<Vec<TeamMember>>;
}

pub fn store_for(config: &RuntimeConfig) -> Arc<dyn TeamStore> {
    if config.offline {
        Arc::new(MemoryTeamStore::default())
    } else {
        Arc::new(HttpTeamStore::new(config.backend_url.clone()))
    }
}

#[derive(Default)]
pub struct MemoryTeamStore {
    members: Mutex<Vec<TeamMember>>,
}

#[async_trait]
impl TeamStore for MemoryTeamStore {
    async fn team(&self) -> Result<Vec<TeamMember>> {
        Ok(self.members.lock().await.clone())
    }

    async fn add(&self, member: TeamMember) -> Result<Vec<TeamMember>> {
        let mut members = self.members.lock().await;
        if members.iter().any(|existing| existing.id() == member.id()) {
            return Err(Error::RemoteConflict(DUPLICATE_MEMBER.to_string()));
        }
        if members.len() >= MAX_TEAM_SIZE {
            return Err(Error::RemoteConflict(TEAM_FULL.to_string()));
        }
        members.push(member);
        Ok(members.clone())
    }

    async fn remove(&self, id: u32) -> Result<Vec<TeamMember>> {
        let mut members = self.members.lock().await;
        members.retain(|member| member.id() != id);
        Ok(members.clone())
    }

    async fn clear(&self) -> Result<Vec<TeamMember>> {
        let mut members = self.members.lock().await;
        members.clear();
        Ok(Vec::new())
    }
}

pub struct HttpTeamStore {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct TeamResponse {
    #[serde(default)]
    team: Vec<TeamMember>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

impl HttpTeamStore {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/team{path}", self.base_url)
    }

    async fn read_team(response: reqwest::Response) -> Result<Vec<TeamMember>> {
        let status = response.status();
        let body = response.text().await?;
        team_from_body(status, &body)
    }
}

/// A 4xx carrying `{error}` is the backend refusing the change; its message
/// is passed through untouched.
fn team_from_body(status: StatusCode, body: &str) -> Result<Vec<TeamMember>> {
    if status.is_success() {
        let body: TeamResponse = serde_json::from_str(body)?;
        return Ok(body.team);
    }
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|body| body.error)
        .ok();
    warn!(%status, ?message, "team request rejected");
    match message {
        Some(message) if status.is_client_error() => Err(Error::RemoteConflict(message)),
        Some(message) => Err(Error::Network(message)),
        None => Err(Error::Network(format!("team backend returned {status}"))),
    }
}

#[async_trait]
impl TeamStore for HttpTeamStore {
    async fn team(&self) -> Result<Vec<TeamMember>> {
        let response = self.client.get(self.url("")).send().await?;
        Self::read_team(response).await
    }

    async fn add(&self, member: TeamMember) -> Result<Vec<TeamMember>> {
        let body = serde_json::json!({ "pokemon": member });
        let response = self.client.post(self.url("/add")).json(&body).send().await?;
        Self::read_team(response).await
    }

    async fn remove(&self, id: u32) -> Result<Vec<TeamMember>> {
        let body = serde_json::json!({ "id": id });
        let response = self
            .client
            .post(self.url("/remove"))
            .json(&body)
            .send()
            .await?;
        Self::read_team(response).await
    }

    async fn clear(&self) -> Result<Vec<TeamMember>> {
        let response = self.client.post(self.url("/clear")).send().await?;
        Self::read_team(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CreatureDetail, StatSet};

    fn member(id: u32) -> TeamMember {
        TeamMember {
            detail: CreatureDetail {
                id,
                name: format!("mon-{id}"),
                image_url: String::new(),
                types: Vec::new(),
                stats: StatSet::default(),
            },
            moves: vec!["a".into(), "b".into(), "c".into(), "d".into()],
        }
    }

    #[tokio::test]
    async fn duplicate_is_a_conflict_and_leaves_team_alone() {
        let store = MemoryTeamStore::default();
        store.add(member(1)).await.unwrap();
        let err = store.add(member(1)).await.unwrap_err();
        assert_eq!(err, Error::RemoteConflict(DUPLICATE_MEMBER.into()));
        assert_eq!(store.team().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn seventh_member_is_rejected() {
        let store = MemoryTeamStore::default();
        for id in 1..=6 {
            store.add(member(id)).await.unwrap();
        }
        let err = store.add(member(7)).await.unwrap_err();
        assert_eq!(err, Error::RemoteConflict(TEAM_FULL.into()));
        assert_eq!(store.team().await.unwrap().len(), MAX_TEAM_SIZE);
    }

    #[tokio::test]
    async fn remove_and_clear() {
        let store = MemoryTeamStore::default();
        store.add(member(1)).await.unwrap();
        store.add(member(2)).await.unwrap();
        let team = store.remove(1).await.unwrap();
        assert_eq!(team.iter().map(TeamMember::id).collect::<Vec<_>>(), vec![2]);
        assert!(store.clear().await.unwrap().is_empty());
    }

    #[test]
    fn rejected_change_keeps_the_backend_message() {
        let err = team_from_body(
            StatusCode::BAD_REQUEST,
            r#"{"error":"Pokemon already in team"}"#,
        )
        .unwrap_err();
        assert_eq!(err, Error::RemoteConflict(DUPLICATE_MEMBER.into()));
        assert_eq!(err.to_string(), DUPLICATE_MEMBER);
    }

    #[test]
    fn server_errors_and_bare_statuses_are_network_failures() {
        assert_eq!(
            team_from_body(StatusCode::INTERNAL_SERVER_ERROR, r#"{"error":"boom"}"#),
            Err(Error::Network("boom".into()))
        );
        assert_eq!(
            team_from_body(StatusCode::BAD_REQUEST, ""),
            Err(Error::Network("team backend returned 400 Bad Request".into()))
        );
        assert_eq!(
            team_from_body(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>"),
            Err(Error::Network("team backend returned 502 Bad Gateway".into()))
        );
    }

    #[test]
    fn success_body_is_the_team() {
        let body = serde_json::json!({ "team": [member(4)] }).to_string();
        assert_eq!(team_from_body(StatusCode::OK, &body), Ok(vec![member(4)]));
        assert_eq!(team_from_body(StatusCode::OK, "{}"), Ok(Vec::new()));
        assert!(matches!(
            team_from_body(StatusCode::OK, "not json"),
            Err(Error::MalformedRecord(_))
        ));
    }

    #[test]
    fn http_urls() {
        let store = HttpTeamStore::new("http://localhost:4000/api/".into());
        assert_eq!(store.url(""), "http://localhost:4000/api/team");
        assert_eq!(store.url("/add"), "http://localhost:4000/api/team/add");
    }
}
