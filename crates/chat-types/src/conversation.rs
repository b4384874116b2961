use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::message::MessageId;

/// Sidebar titles are cut to this many characters
pub const TITLE_MAX_CHARS: usize = 30;

/// Opaque conversation identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(pub String);

impl ConversationId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConversationId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Entry of the conversation list shown in the sidebar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub id: ConversationId,
    #[serde(default)]
    pub title: String,
    #[serde(
        rename = "lastMessage",
        alias = "last_message",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub last_message: Option<String>,
    #[serde(
        rename = "updatedAt",
        alias = "updated_at",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<String>,
    #[serde(
        rename = "createdAt",
        alias = "created_at",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<String>,
}

impl ConversationSummary {
    pub fn new(id: ConversationId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            last_message: None,
            updated_at: None,
            created_at: None,
        }
    }

    /// Summary inserted locally when a new conversation's first exchange
    /// completes, before the backend list has caught up.
    pub fn from_first_message(id: ConversationId, first_message: &str) -> Self {
        let title: String = first_message.chars().take(TITLE_MAX_CHARS).collect();
        let now = Utc::now().to_rfc3339();
        Self {
            id,
            title,
            last_message: None,
            updated_at: Some(now.clone()),
            created_at: Some(now),
        }
    }

    /// Title as shown in the sidebar
    pub fn display_title(&self) -> String {
        if self.title.is_empty() {
            return "Untitled Conversation".to_string();
        }
        if self.title.chars().count() > TITLE_MAX_CHARS {
            let head: String = self.title.chars().take(TITLE_MAX_CHARS).collect();
            format!("{}...", head)
        } else {
            self.title.clone()
        }
    }

    /// `updated_at`, falling back to `created_at`
    pub fn activity_time(&self) -> Option<DateTime<Utc>> {
        self.updated_at
            .as_deref()
            .and_then(parse_timestamp)
            .or_else(|| self.created_at.as_deref().and_then(parse_timestamp))
    }
}

/// Accepts RFC 3339 as well as naive ISO timestamps (read as UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// How an id came to be known to this client.
/// Stored per registry entry; `Local` only ever moves to `Persisted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Provenance {
    /// Minted in this client, not yet acknowledged by the backend
    Local,
    /// Known to exist on the backend
    Persisted,
}

/// Lifecycle of a conversation id as observed by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unknown,
    LocalUnconfirmed,
    Persisted,
}

impl From<Option<Provenance>> for SessionState {
    fn from(p: Option<Provenance>) -> Self {
        match p {
            None => SessionState::Unknown,
            Some(Provenance::Local) => SessionState::LocalUnconfirmed,
            Some(Provenance::Persisted) => SessionState::Persisted,
        }
    }
}

/// Process-wide streaming flag read by the input surface
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamingState {
    pub is_streaming: bool,
    pub streaming_message_id: Option<MessageId>,
}

impl StreamingState {
    pub fn start(&mut self, message_id: MessageId) {
        self.is_streaming = true;
        self.streaming_message_id = Some(message_id);
    }

    pub fn clear(&mut self) {
        self.is_streaming = false;
        self.streaming_message_id = None;
    }

    pub fn is_streaming_message(&self, message_id: &MessageId) -> bool {
        self.is_streaming && self.streaming_message_id.as_ref() == Some(message_id)
    }
}
