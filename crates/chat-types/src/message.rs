use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::conversation::ConversationId;

/// Identifier of a single message
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub String);

impl MessageId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MessageId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Role of a message author
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single message in a conversation.
///
/// `content` only grows while `streaming` is set; once the flag is cleared
/// the message is final.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub streaming: bool,
    #[serde(default)]
    pub error: bool,
    /// The reply was cut off because its view was torn down mid-stream
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub interrupted: bool,
    /// RFC 3339, absent on messages loaded from the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: MessageId::generate(),
            role: Role::User,
            content: text.into(),
            streaming: false,
            error: false,
            interrupted: false,
            timestamp: Some(now_rfc3339()),
        }
    }

    /// Empty assistant message that will receive streamed deltas
    pub fn assistant_placeholder() -> Self {
        Self {
            id: MessageId::generate(),
            role: Role::Assistant,
            content: String::new(),
            streaming: true,
            error: false,
            interrupted: false,
            timestamp: Some(now_rfc3339()),
        }
    }

    pub fn is_final(&self) -> bool {
        !self.streaming
    }
}

/// Body of `POST /chat/send`: the whole message, so the backend keeps the
/// client id and timestamp.
#[derive(Debug, Serialize)]
pub struct PersistRequest<'a> {
    pub conversation_id: &'a ConversationId,
    pub message: &'a Message,
}

fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}
