use serde::{Deserialize, Serialize};

use crate::conversation::ConversationId;
use crate::message::MessageId;

/// Events emitted by the chat core.
/// The UI drains these to know when to repaint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChatEvent {
    /// A conversation id was minted for a first send from the draft route
    ConversationCreated { conversation_id: ConversationId },

    /// The completion channel for an assistant reply was opened
    StreamStarted { conversation_id: ConversationId, message_id: MessageId },

    /// A chunk was appended to the streaming assistant reply
    StreamDelta { message_id: MessageId, delta: String },

    /// The terminal sentinel arrived
    StreamCompleted { conversation_id: ConversationId, message_id: MessageId },

    /// The channel failed before the sentinel
    StreamFailed {
        conversation_id: ConversationId,
        message_id: MessageId,
        reason: String,
    },

    /// The channel was closed because its consumer went away
    StreamInterrupted { conversation_id: ConversationId, message_id: MessageId },

    /// History for a conversation was fetched and installed
    HistoryLoaded { conversation_id: ConversationId, count: usize },

    /// The conversation list was refreshed from the backend
    ConversationsRefreshed { count: usize },

    /// A background request failed; logged and otherwise ignored
    BackendError { context: String, message: String },
}
