//! Per-conversation message threads.

use std::collections::{HashMap, HashSet};

use thiserror::Error;
use chat_types::{
    conversation::ConversationId,
    message::{Message, MessageId},
};

/// A mutation that does not fit the current thread. Reported to the
/// caller, never applied.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreInconsistency {
    #[error("no message {message_id} in conversation {conversation_id}")]
    MessageMissing {
        conversation_id: ConversationId,
        message_id: MessageId,
    },

    #[error("message {0} is already final")]
    AlreadyFinal(MessageId),

    #[error("message {0} is not the one currently streaming")]
    NotStreaming(MessageId),
}

/// How a streaming message ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finalize {
    Success,
    Error,
    Interrupted,
}

#[derive(Debug, Default)]
pub struct MessageStore {
    threads: HashMap<ConversationId, Vec<Message>>,
    loaded: HashSet<ConversationId>,
    loading: HashSet<ConversationId>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append in arrival order
    pub fn append(&mut self, conversation_id: &ConversationId, messages: Vec<Message>) {
        self.threads
            .entry(conversation_id.clone())
            .or_default()
            .extend(messages);
    }

    /// Append `delta` to the content of a message that is still streaming.
    pub fn update_streaming_message(
        &mut self,
        conversation_id: &ConversationId,
        message_id: &MessageId,
        delta: &str,
    ) -> Result<(), StoreInconsistency> {
        let message = self.find_mut(conversation_id, message_id)?;
        if !message.streaming {
            return Err(StoreInconsistency::AlreadyFinal(message_id.clone()));
        }
        message.content.push_str(delta);
        Ok(())
    }

    /// Clear the streaming flag. Returns false if the message is missing or
    /// was already final, in which case nothing changes.
    pub fn finalize(
        &mut self,
        conversation_id: &ConversationId,
        message_id: &MessageId,
        how: Finalize,
    ) -> bool {
        let Ok(message) = self.find_mut(conversation_id, message_id) else {
            return false;
        };
        if !message.streaming {
            return false;
        }
        message.streaming = false;
        match how {
            Finalize::Success => {}
            Finalize::Error => message.error = true,
            Finalize::Interrupted => message.interrupted = true,
        }
        true
    }

    /// Overwrite a whole thread with its backend history
    pub fn replace(&mut self, conversation_id: &ConversationId, messages: Vec<Message>) {
        self.threads.insert(conversation_id.clone(), messages);
    }

    /// Install backend history under whatever the thread already holds.
    ///
    /// Messages appended locally while the fetch was in flight stay, after
    /// the history, unless the history already carries the same id.
    pub fn merge_history(&mut self, conversation_id: &ConversationId, history: Vec<Message>) {
        let local = self.threads.remove(conversation_id).unwrap_or_default();
        if local.is_empty() {
            self.replace(conversation_id, history);
            return;
        }
        let known: HashSet<MessageId> = history.iter().map(|m| m.id.clone()).collect();
        let mut merged = history;
        merged.extend(local.into_iter().filter(|m| !known.contains(&m.id)));
        self.replace(conversation_id, merged);
    }

    pub fn messages(&self, conversation_id: &ConversationId) -> &[Message] {
        self.threads
            .get(conversation_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn message(&self, conversation_id: &ConversationId, message_id: &MessageId) -> Option<&Message> {
        self.messages(conversation_id)
            .iter()
            .find(|m| &m.id == message_id)
    }

    /// Messages with `streaming` set, across every conversation
    pub fn streaming_count(&self) -> usize {
        self.threads
            .values()
            .flat_map(|thread| thread.iter())
            .filter(|m| m.streaming)
            .count()
    }

    // ─── load guard ──────────────────────────────────────────

    pub fn is_loaded(&self, conversation_id: &ConversationId) -> bool {
        self.loaded.contains(conversation_id)
    }

    pub fn mark_loaded(&mut self, conversation_id: &ConversationId) {
        self.loading.remove(conversation_id);
        self.loaded.insert(conversation_id.clone());
    }

    /// Claim the history fetch for a conversation. False if it is already
    /// loaded or a fetch is in flight.
    pub fn begin_load(&mut self, conversation_id: &ConversationId) -> bool {
        if self.is_loaded(conversation_id) || self.loading.contains(conversation_id) {
            return false;
        }
        self.loading.insert(conversation_id.clone());
        true
    }

    /// Release a claim after a failed fetch so a later visit can retry
    pub fn abandon_load(&mut self, conversation_id: &ConversationId) {
        self.loading.remove(conversation_id);
    }

    pub fn is_loading(&self, conversation_id: &ConversationId) -> bool {
        self.loading.contains(conversation_id)
    }

    fn find_mut(
        &mut self,
        conversation_id: &ConversationId,
        message_id: &MessageId,
    ) -> Result<&mut Message, StoreInconsistency> {
        self.threads
            .get_mut(conversation_id)
            .and_then(|thread| thread.iter_mut().find(|m| &m.id == message_id))
            .ok_or_else(|| StoreInconsistency::MessageMissing {
                conversation_id: conversation_id.clone(),
                message_id: message_id.clone(),
            })
    }
}
