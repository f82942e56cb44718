use std::sync::LazyLock;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;

use crate::error::{ApiError, Result, INVALID_EMAIL, MESSAGE_NOT_FOUND, MISSING_FIELDS};

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static regex: email pattern")
});

const PREVIEW_CHARS: usize = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Unread,
    Read,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    /// RFC 3339, UTC, millisecond precision.
    pub timestamp: String,
    pub status: MessageStatus,
}

/// Form body as posted. Every field is required and non-empty.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// The four fields, validated but not yet trimmed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidForm<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub subject: &'a str,
    pub message: &'a str,
}

impl ContactForm {
    pub fn validate(&self) -> Result<ValidForm<'_>> {
        let (Some(name), Some(email), Some(subject), Some(message)) = (
            field(&self.name),
            field(&self.email),
            field(&self.subject),
            field(&self.message),
        ) else {
            return Err(ApiError::bad_request(MISSING_FIELDS));
        };
        if !EMAIL.is_match(email) {
            return Err(ApiError::bad_request(INVALID_EMAIL));
        }
        Ok(ValidForm {
            name,
            email,
            subject,
            message,
        })
    }
}

fn field(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|text| !text.is_empty())
}

#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn submit(&self, form: ContactForm) -> Result<ContactMessage>;
    async fn messages(&self) -> Vec<ContactMessage>;
    async fn mark_read(&self, id: i64) -> Result<ContactMessage>;
    async fn delete(&self, id: i64) -> Result<()>;
}

#[derive(Default)]
struct Inbox {
    messages: Vec<ContactMessage>,
    last_id: i64,
}

#[derive(Default)]
pub struct MemoryContactRepository {
    inbox: RwLock<Inbox>,
}

#[async_trait]
impl ContactRepository for MemoryContactRepository {
    async fn submit(&self, form: ContactForm) -> Result<ContactMessage> {
        let valid = form.validate()?;
        let now = Utc::now();
        let mut inbox = self.inbox.write().await;
        // Ids are creation times in ms, bumped when two land in the same ms.
        let id = now.timestamp_millis().max(inbox.last_id + 1);
        inbox.last_id = id;

        let message = ContactMessage {
            id,
            name: valid.name.trim().to_string(),
            email: valid.email.trim().to_string(),
            subject: valid.subject.trim().to_string(),
            message: valid.message.trim().to_string(),
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            status: MessageStatus::Unread,
        };
        info!(
            id,
            from = %message.name,
            email = %message.email,
            subject = %message.subject,
            preview = %preview(&message.message),
            "contact message received"
        );
        inbox.messages.push(message.clone());
        Ok(message)
    }

    async fn messages(&self) -> Vec<ContactMessage> {
        self.inbox.read().await.messages.clone()
    }

    async fn mark_read(&self, id: i64) -> Result<ContactMessage> {
        let mut inbox = self.inbox.write().await;
        let message = inbox
            .messages
            .iter_mut()
            .find(|message| message.id == id)
            .ok_or_else(|| ApiError::not_found(MESSAGE_NOT_FOUND))?;
        message.status = MessageStatus::Read;
        Ok(message.clone())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let mut inbox = self.inbox.write().await;
        let index = inbox
            .messages
            .iter()
            .position(|message| message.id == id)
            .ok_or_else(|| ApiError::not_found(MESSAGE_NOT_FOUND))?;
        inbox.messages.remove(index);
        Ok(())
    }
}

fn preview(text: &str) -> String {
    let mut preview: String = text.chars().take(PREVIEW_CHARS).collect();
    preview.push_str("...");
    preview
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn form(name: &str, email: &str, subject: &str, message: &str) -> ContactForm {
        ContactForm {
            name: Some(name.into()),
            email: Some(email.into()),
            subject: Some(subject.into()),
            message: Some(message.into()),
        }
    }

    #[test]
    fn every_field_is_required() {
        let mut incomplete = form("Ash", "ash@kanto.org", "Hi", "");
        assert_eq!(
            incomplete.validate(),
            Err(ApiError::bad_request(MISSING_FIELDS))
        );
        incomplete.message = None;
        assert_eq!(
            incomplete.validate(),
            Err(ApiError::bad_request(MISSING_FIELDS))
        );
    }

    #[test]
    fn validated_fields_borrow_the_form_text() {
        let complete = form("Ash", "ash@kanto.org", "Hi", "Hello");
        assert_eq!(
            complete.validate(),
            Ok(ValidForm {
                name: "Ash",
                email: "ash@kanto.org",
                subject: "Hi",
                message: "Hello",
            })
        );
        assert_eq!(field(&Some(String::new())), None);
        assert_eq!(field(&None), None);
    }

    #[test]
    fn email_needs_user_domain_and_dot() {
        for email in ["ash", "ash@kanto", "ash @kanto.org", "@kanto.org"] {
            assert_eq!(
                form("Ash", email, "Hi", "Hello").validate(),
                Err(ApiError::bad_request(INVALID_EMAIL)),
                "{email}"
            );
        }
        assert!(form("Ash", "ash@kanto.org", "Hi", "Hello").validate().is_ok());
    }

    #[tokio::test]
    async fn submitted_messages_are_trimmed_and_unread() {
        let repo = MemoryContactRepository::default();
        let message = repo
            .submit(form("  Ash ", "ash@kanto.org", " Badge ", " Where is Brock? "))
            .await
            .unwrap();
        assert_eq!(message.name, "Ash");
        assert_eq!(message.subject, "Badge");
        assert_eq!(message.message, "Where is Brock?");
        assert_eq!(message.status, MessageStatus::Unread);
        assert!(message.timestamp.ends_with('Z'));
    }

    #[tokio::test]
    async fn ids_stay_unique_within_a_millisecond() {
        let repo = MemoryContactRepository::default();
        let first = repo.submit(form("A", "a@b.co", "s", "m")).await.unwrap();
        let second = repo.submit(form("B", "b@b.co", "s", "m")).await.unwrap();
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn read_and_delete_report_missing_ids() {
        let repo = MemoryContactRepository::default();
        let message = repo.submit(form("A", "a@b.co", "s", "m")).await.unwrap();

        let read = repo.mark_read(message.id).await.unwrap();
        assert_eq!(read.status, MessageStatus::Read);
        assert_eq!(
            repo.mark_read(message.id + 1).await,
            Err(ApiError::not_found(MESSAGE_NOT_FOUND))
        );

        repo.delete(message.id).await.unwrap();
        assert!(repo.messages().await.is_empty());
        assert_eq!(
            repo.delete(message.id).await,
            Err(ApiError::not_found(MESSAGE_NOT_FOUND))
        );
    }

    #[test]
    fn preview_is_capped() {
        let long = "x".repeat(150);
        assert_eq!(preview(&long).len(), PREVIEW_CHARS + 3);
    }
}
