//! Routes of the chat surface:
//!   /chat        → redirects to /chat/new
//!   /chat/new    → unconfirmed draft, no conversation yet
//!   /chat/:id    → concrete conversation

use std::fmt;
use std::str::FromStr;

use crate::conversation::ConversationId;
use crate::ChatError;

const CHAT_PREFIX: &str = "/chat";
const NEW_SEGMENT: &str = "new";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Index,
    New,
    Conversation(ConversationId),
}

impl Route {
    /// Follow the index redirect. Returns the route to land on and whether
    /// the history entry has to be replaced.
    pub fn resolve(self) -> (Route, HistoryMode) {
        match self {
            Route::Index => (Route::New, HistoryMode::Replace),
            other => (other, HistoryMode::Push),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Index => CHAT_PREFIX.to_string(),
            Route::New => format!("{}/{}", CHAT_PREFIX, NEW_SEGMENT),
            Route::Conversation(id) => format!("{}/{}", CHAT_PREFIX, id),
        }
    }

    pub fn conversation_id(&self) -> Option<&ConversationId> {
        match self {
            Route::Conversation(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, Route::New)
    }
}

impl FromStr for Route {
    type Err = ChatError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let trimmed = path.trim_end_matches('/');
        let rest = trimmed
            .strip_prefix(CHAT_PREFIX)
            .ok_or_else(|| ChatError::InvalidRoute(path.to_string()))?;

        if rest.is_empty() {
            return Ok(Route::Index);
        }

        let segment = rest
            .strip_prefix('/')
            .ok_or_else(|| ChatError::InvalidRoute(path.to_string()))?;

        match segment {
            "" => Ok(Route::Index),
            NEW_SEGMENT => Ok(Route::New),
            id if !id.contains('/') => Ok(Route::Conversation(ConversationId::from(id))),
            _ => Err(ChatError::InvalidRoute(path.to_string())),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Whether a navigation adds a history entry or overwrites the current one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryMode {
    Push,
    Replace,
}
