//! Reconciliation with the backend: the conversation list refresh and the
//! one-time history load. Failures end here as log lines and events.

use chat_types::{conversation::ConversationId, event::ChatEvent};
use crate::event_bus::EventBus;
use crate::ports::ChatBackendPort;
use crate::state::SharedState;

/// Result of a `load_history` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(usize),
    /// Minted locally; the backend has nothing yet
    SkippedLocal,
    SkippedAlreadyLoaded,
    /// Not in the known conversation list (yet)
    SkippedUnlisted,
    /// Another fetch for the same id has not returned
    SkippedInFlight,
    Failed,
}

/// Fetch the conversation list and merge it into the registry.
pub async fn refresh_conversations(
    state: &SharedState,
    backend: &dyn ChatBackendPort,
    events: &EventBus,
) -> bool {
    match backend.list_conversations().await {
        Ok(summaries) => {
            let count = summaries.len();
            state.borrow_mut().registry.merge_list(summaries);
            events.emit(ChatEvent::ConversationsRefreshed { count });
            true
        }
        Err(e) => {
            log::warn!("Conversation list refresh failed: {}", e);
            events.emit(ChatEvent::BackendError {
                context: "list conversations".to_string(),
                message: e.to_string(),
            });
            false
        }
    }
}

/// Fetch and install the history of `id` unless the guards say otherwise.
/// A single attempt; on failure the load guard stays open for a later visit.
pub async fn load_history(
    state: &SharedState,
    backend: &dyn ChatBackendPort,
    events: &EventBus,
    id: &ConversationId,
) -> LoadOutcome {
    {
        let mut st = state.borrow_mut();
        if st.registry.is_local_unconfirmed(id) {
            return LoadOutcome::SkippedLocal;
        }
        if st.store.is_loaded(id) {
            return LoadOutcome::SkippedAlreadyLoaded;
        }
        if !st.registry.contains_conversation(id) {
            return LoadOutcome::SkippedUnlisted;
        }
        if !st.store.begin_load(id) {
            return LoadOutcome::SkippedInFlight;
        }
    }

    match backend.get_messages(id).await {
        Ok(messages) => {
            let count = messages.len();
            {
                let mut st = state.borrow_mut();
                // a send may have landed while the fetch was out
                st.store.merge_history(id, messages);
                st.store.mark_loaded(id);
            }
            log::info!("Loaded {} messages for {}", count, id);
            events.emit(ChatEvent::HistoryLoaded {
                conversation_id: id.clone(),
                count,
            });
            LoadOutcome::Loaded(count)
        }
        Err(e) => {
            state.borrow_mut().store.abandon_load(id);
            log::error!("Failed to load messages for {}: {}", id, e);
            events.emit(ChatEvent::BackendError {
                context: format!("load messages {}", id),
                message: e.to_string(),
            });
            LoadOutcome::Failed
        }
    }
}
