use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::warn;

use crate::config::RuntimeConfig;
use crate::error::{Error, Result};

pub const MESSAGE_NOT_FOUND: &str = "Message not found";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Unread,
    Read,
}

/// One contact form submission as the backend keeps it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub timestamp: String,
    pub status: MessageStatus,
}

impl ContactMessage {
    pub fn is_unread(&self) -> bool {
        self.status == MessageStatus::Unread
    }
}

/// Admin side of the contact inbox.
#[async_trait]
pub trait ContactStore: Send + Sync {
    async fn messages(&self) -> Result<Vec<ContactMessage>>;
    async fn mark_read(&self, id: i64) -> Result<ContactMessage>;
    async fn delete(&self, id: i64) -> Result<()>;
}

pub fn inbox_for(config: &RuntimeConfig) -> Arc<dyn ContactStore> {
    if config.offline {
        Arc::new(MemoryContactStore::default())
    } else {
        Arc::new(HttpContactStore::new(config.backend_url.clone()))
    }
}

#[derive(Default)]
pub struct MemoryContactStore {
    messages: Mutex<Vec<ContactMessage>>,
}

impl MemoryContactStore {
    pub fn with_messages(messages: Vec<ContactMessage>) -> Self {
        Self {
            messages: Mutex::new(messages),
        }
    }
}

#[async_trait]
impl ContactStore for MemoryContactStore {
    async fn messages(&self) -> Result<Vec<ContactMessage>> {
        Ok(self.messages.lock().await.clone())
    }

    async fn mark_read(&self, id: i64) -> Result<ContactMessage> {
        let mut messages = self.messages.lock().await;
        let message = messages
            .iter_mut()
            .find(|message| message.id == id)
            .ok_or_else(|| Error::RemoteConflict(MESSAGE_NOT_FOUND.to_string()))?;
        message.status = MessageStatus::Read;
        Ok(message.clone())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let mut messages = self.messages.lock().await;
        let before = messages.len();
        messages.retain(|message| message.id != id);
        if messages.len() == before {
            return Err(Error::RemoteConflict(MESSAGE_NOT_FOUND.to_string()));
        }
        Ok(())
    }
}

pub struct HttpContactStore {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    messages: Vec<ContactMessage>,
}

#[derive(Deserialize)]
struct ReadResponse {
    message: ContactMessage,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

impl HttpContactStore {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/contact{path}", self.base_url)
    }

    async fn read<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;
        decode_body(status, &body)
    }
}

/// Success bodies decode into `T`; a 4xx `{error}` is surfaced as is.
fn decode_body<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T> {
    if status.is_success() {
        return Ok(serde_json::from_str(body)?);
    }
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|body| body.error)
        .ok();
    warn!(%status, ?message, "contact request rejected");
    match message {
        Some(message) if status.is_client_error() => Err(Error::RemoteConflict(message)),
        Some(message) => Err(Error::Network(message)),
        None => Err(Error::Network(format!("contact backend returned {status}"))),
    }
}

#[async_trait]
impl ContactStore for HttpContactStore {
    async fn messages(&self) -> Result<Vec<ContactMessage>> {
        let response = self.client.get(self.url("/messages")).send().await?;
        let body: MessagesResponse = Self::read(response).await?;
        Ok(body.messages)
    }

    async fn mark_read(&self, id: i64) -> Result<ContactMessage> {
        let response = self
            .client
            .put(self.url(&format!("/messages/{id}/read")))
            .send()
            .await?;
        let body: ReadResponse = Self::read(response).await?;
        Ok(body.message)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let response = self
            .client
            .delete(self.url(&format!("/messages/{id}")))
            .send()
            .await?;
        let _: serde_json::Value = Self::read(response).await?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    pub(crate) fn message(id: i64, status: MessageStatus) -> ContactMessage {
        ContactMessage {
            id,
            name: format!("trainer-{id}"),
            email: format!("trainer{id}@kanto.org"),
            subject: "Hello".into(),
            message: "Is Mew real?".into(),
            timestamp: "2024-05-01T10:00:00.000Z".into(),
            status,
        }
    }

    #[tokio::test]
    async fn memory_store_marks_and_deletes() {
        let store = MemoryContactStore::with_messages(vec![
            message(1, MessageStatus::Unread),
            message(2, MessageStatus::Unread),
        ]);
        let read = store.mark_read(2).await.unwrap();
        assert_eq!(read.status, MessageStatus::Read);

        store.delete(1).await.unwrap();
        assert_eq!(
            store.messages().await.unwrap(),
            vec![message(2, MessageStatus::Read)]
        );
        assert_eq!(
            store.delete(1).await,
            Err(Error::RemoteConflict(MESSAGE_NOT_FOUND.into()))
        );
    }

    #[test]
    fn message_list_decodes_backend_shape() {
        let body = r#"{"messages":[{"id":1714557600000,"name":"Misty","email":"misty@cerulean.gym",
            "subject":"Bike","message":"Pay up","timestamp":"2024-05-01T10:00:00.000Z","status":"unread"}]}"#;
        let decoded: MessagesResponse = decode_body(StatusCode::OK, body).unwrap();
        assert_eq!(decoded.messages.len(), 1);
        assert_eq!(decoded.messages[0].id, 1_714_557_600_000);
        assert!(decoded.messages[0].is_unread());
    }

    #[test]
    fn missing_message_is_surfaced_verbatim() {
        let err = decode_body::<ReadResponse>(
            StatusCode::NOT_FOUND,
            r#"{"error":"Message not found"}"#,
        )
        .err();
        assert_eq!(err, Some(Error::RemoteConflict(MESSAGE_NOT_FOUND.into())));
        let err = decode_body::<ReadResponse>(StatusCode::SERVICE_UNAVAILABLE, "").err();
        assert_eq!(
            err,
            Some(Error::Network(
                "contact backend returned 503 Service Unavailable".into()
            ))
        );
    }

    #[test]
    fn http_urls() {
        let store = HttpContactStore::new("http://localhost:4000/api/".into());
        assert_eq!(store.url("/messages"), "http://localhost:4000/api/contact/messages");
        assert_eq!(
            store.url("/messages/7/read"),
            "http://localhost:4000/api/contact/messages/7/read"
        );
    }
}
