//! Session registry: which conversation ids exist, and where they came from.
//!
//! Each id carries its [`Provenance`] directly in its entry, so "minted here
//! and unconfirmed" can never drift from the id set. The registry also owns
//! the conversation list shown in the sidebar.

use std::collections::HashMap;

use chat_types::conversation::{ConversationId, ConversationSummary, Provenance, SessionState};

#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<ConversationId, Provenance>,
    conversations: Vec<ConversationSummary>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a fresh id for a conversation that only exists locally.
    pub fn create_local(&mut self) -> ConversationId {
        let mut id = ConversationId::generate();
        while self.sessions.contains_key(&id) {
            id = ConversationId::generate();
        }
        self.sessions.insert(id.clone(), Provenance::Local);
        id
    }

    pub fn is_local_unconfirmed(&self, id: &ConversationId) -> bool {
        self.sessions.get(id) == Some(&Provenance::Local)
    }

    pub fn state(&self, id: &ConversationId) -> SessionState {
        SessionState::from(self.sessions.get(id).copied())
    }

    /// Record that the backend has the conversation.
    /// Returns true only for the single `Local → Persisted` transition.
    pub fn mark_persisted(&mut self, id: &ConversationId) -> bool {
        matches!(
            self.sessions.insert(id.clone(), Provenance::Persisted),
            Some(Provenance::Local)
        )
    }

    /// Merge a list fetched from the backend.
    ///
    /// The backend order wins and an id listed twice keeps its last entry.
    /// Entries the backend did not return (optimistic inserts it has not
    /// caught up with) are kept after the listed ones. Ids first seen here
    /// are recorded as persisted; a locally minted id stays local, only
    /// stream completion confirms it.
    pub fn merge_list(&mut self, summaries: Vec<ConversationSummary>) {
        let mut merged: Vec<ConversationSummary> = Vec::with_capacity(summaries.len());
        let mut index: HashMap<ConversationId, usize> = HashMap::new();

        for summary in summaries {
            match index.get(&summary.id) {
                Some(&pos) => merged[pos] = summary,
                None => {
                    index.insert(summary.id.clone(), merged.len());
                    merged.push(summary);
                }
            }
        }

        for existing in self.conversations.drain(..) {
            if !index.contains_key(&existing.id) {
                index.insert(existing.id.clone(), merged.len());
                merged.push(existing);
            }
        }

        for summary in &merged {
            self.sessions
                .entry(summary.id.clone())
                .or_insert(Provenance::Persisted);
        }

        self.conversations = merged;
    }

    /// Optimistically add a conversation to the list. No-op if present.
    pub fn insert_if_absent(&mut self, summary: ConversationSummary) -> bool {
        if self.contains_conversation(&summary.id) {
            return false;
        }
        self.conversations.push(summary);
        true
    }

    pub fn contains_conversation(&self, id: &ConversationId) -> bool {
        self.conversations.iter().any(|c| &c.id == id)
    }

    pub fn conversations(&self) -> &[ConversationSummary] {
        &self.conversations
    }

    /// Most recent activity first; entries without a timestamp last.
    pub fn sorted_conversations(&self) -> Vec<&ConversationSummary> {
        let mut sorted: Vec<&ConversationSummary> = self.conversations.iter().collect();
        // stable, so undated entries keep list order
        sorted.sort_by(|a, b| b.activity_time().cmp(&a.activity_time()));
        sorted
    }
}
