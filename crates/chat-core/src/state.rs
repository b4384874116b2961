//! The composed application state.
//!
//! One object owns the registry, the store and the streaming flag; the
//! controller and the supervisor receive it by injection instead of
//! reaching for module-level singletons.

use std::cell::RefCell;
use std::rc::Rc;

use chat_types::{
    conversation::{ConversationId, StreamingState},
    library::{Candidate, SendMetadata, Template},
    message::Message,
    route::Route,
};
use crate::registry::SessionRegistry;
use crate::store::MessageStore;

/// Shared handle. Never hold a borrow across an `.await`.
pub type SharedState = Rc<RefCell<ChatState>>;

#[derive(Debug)]
pub struct ChatState {
    pub registry: SessionRegistry,
    pub store: MessageStore,
    pub streaming: StreamingState,
    /// Route currently shown, always resolved (never `Route::Index`)
    pub route: Route,
    /// Conversation the view is bound to; `None` on the draft route
    pub active: Option<ConversationId>,
    /// Upload references for the next send
    pub attachments: SendMetadata,
    pub templates: Vec<Template>,
    pub candidates: Vec<Candidate>,
}

impl ChatState {
    pub fn new() -> Self {
        Self {
            registry: SessionRegistry::new(),
            store: MessageStore::new(),
            streaming: StreamingState::default(),
            route: Route::New,
            active: None,
            attachments: SendMetadata::default(),
            templates: Vec::new(),
            candidates: Vec::new(),
        }
    }

    pub fn shared() -> SharedState {
        Rc::new(RefCell::new(Self::new()))
    }

    pub fn active_messages(&self) -> &[Message] {
        match self.active {
            Some(ref id) => self.store.messages(id),
            None => &[],
        }
    }

    /// The input surface is enabled only while nothing streams
    pub fn can_send(&self) -> bool {
        !self.streaming.is_streaming
    }
}

impl Default for ChatState {
    fn default() -> Self {
        Self::new()
    }
}
