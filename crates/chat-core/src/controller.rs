//! Conversation controller: turns user intent into state transitions.
//!
//! Every entry point is synchronous and infallible from the UI's point of
//! view: local state (route, messages, streaming flag) changes before any
//! network work is issued, and network work runs in spawned tasks whose
//! failures are folded back into state.

use std::rc::Rc;

use futures::task::{LocalSpawn, LocalSpawnExt};
use chat_types::{
    Result,
    conversation::ConversationId,
    event::ChatEvent,
    library::{CandidateFilter, FileUpload, SendMetadata, TemplateFilter, UploadDescriptor, UploadKind},
    message::{Message, MessageId},
    route::{HistoryMode, Route},
};
use crate::event_bus::EventBus;
use crate::ports::{ChatBackendPort, LibraryPort, NavigatorPort};
use crate::state::SharedState;
use crate::supervisor::StreamSupervisor;
use crate::sync::{self, LoadOutcome};

/// Result of a send attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    Sent {
        conversation_id: ConversationId,
        user_message_id: MessageId,
        assistant_message_id: MessageId,
    },
    /// Empty or whitespace-only input
    RejectedEmpty,
    /// A reply is still streaming
    RejectedBusy,
}

impl SendOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, SendOutcome::Sent { .. })
    }
}

pub struct ConversationController {
    state: SharedState,
    backend: Rc<dyn ChatBackendPort>,
    library: Rc<dyn LibraryPort>,
    navigator: Rc<dyn NavigatorPort>,
    spawner: Rc<dyn LocalSpawn>,
    events: EventBus,
    supervisor: StreamSupervisor,
}

impl ConversationController {
    pub fn new(
        state: SharedState,
        backend: Rc<dyn ChatBackendPort>,
        library: Rc<dyn LibraryPort>,
        navigator: Rc<dyn NavigatorPort>,
        spawner: Rc<dyn LocalSpawn>,
        events: EventBus,
    ) -> Self {
        let supervisor = StreamSupervisor::new(
            state.clone(),
            backend.clone(),
            spawner.clone(),
            events.clone(),
        );
        Self {
            state,
            backend,
            library,
            navigator,
            spawner,
            events,
            supervisor,
        }
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn supervisor(&self) -> &StreamSupervisor {
        &self.supervisor
    }

    // ─── Routing ─────────────────────────────────────────────

    /// Application start: show `initial`, then fetch the conversation list.
    /// If the initial route names a conversation, its history is fetched
    /// once the list is known.
    pub fn start(&self, initial: Route) {
        self.open_route(initial);

        let state = self.state.clone();
        let backend = self.backend.clone();
        let events = self.events.clone();
        self.spawn("initial conversation list", async move {
            if !sync::refresh_conversations(&state, backend.as_ref(), &events).await {
                return;
            }
            let active = state.borrow().active.clone();
            if let Some(id) = active {
                sync::load_history(&state, backend.as_ref(), &events, &id).await;
            }
        });
    }

    /// Bind the view to `route`: `new` clears the active conversation,
    /// anything else makes it active. No navigation, no fetch.
    ///
    /// Moving off the conversation whose reply is streaming tears that
    /// stream down first.
    pub fn select_or_create(&self, route: &Route) {
        let streaming_elsewhere = self
            .supervisor
            .active_conversation()
            .is_some_and(|id| route.conversation_id() != Some(&id));
        if streaming_elsewhere {
            self.supervisor.cancel();
        }

        let mut st = self.state.borrow_mut();
        match route {
            Route::Index | Route::New => {
                st.route = Route::New;
                st.active = None;
            }
            Route::Conversation(id) => {
                st.route = route.clone();
                st.active = Some(id.clone());
            }
        }
    }

    /// React to the address bar changing (start-up, back/forward).
    pub fn open_route(&self, route: Route) {
        let (route, mode) = route.resolve();
        if mode == HistoryMode::Replace {
            self.navigator.navigate(&route, HistoryMode::Replace);
        }
        self.select_or_create(&route);
        if let Route::Conversation(id) = route {
            self.spawn_history_load(id);
        }
    }

    /// "New Chat": clear the active conversation and go to the draft route.
    pub fn new_chat(&self) {
        self.select_or_create(&Route::New);
        self.navigator.navigate(&Route::New, HistoryMode::Push);
    }

    /// A sidebar entry was picked.
    pub fn select_conversation(&self, id: &ConversationId) {
        let route = Route::Conversation(id.clone());
        self.select_or_create(&route);
        self.navigator.navigate(&route, HistoryMode::Push);
        self.spawn_history_load(id.clone());
    }

    // ─── Reconciliation ──────────────────────────────────────

    pub async fn load_history_if_needed(&self, id: &ConversationId) -> LoadOutcome {
        sync::load_history(&self.state, self.backend.as_ref(), &self.events, id).await
    }

    pub async fn refresh_conversations(&self) -> bool {
        sync::refresh_conversations(&self.state, self.backend.as_ref(), &self.events).await
    }

    // ─── Sending ─────────────────────────────────────────────

    /// Send `text` with whatever attachments are pending.
    pub fn send(&self, text: &str) -> SendOutcome {
        self.dispatch(text, None)
    }

    /// Send `text` referencing explicit uploads; pending attachments are
    /// left untouched.
    pub fn send_with(&self, text: &str, metadata: SendMetadata) -> SendOutcome {
        self.dispatch(text, Some(metadata))
    }

    fn dispatch(&self, text: &str, metadata: Option<SendMetadata>) -> SendOutcome {
        let text = text.trim();
        if text.is_empty() {
            return SendOutcome::RejectedEmpty;
        }
        if !self.state.borrow().can_send() || self.supervisor.is_active() {
            log::debug!("Send rejected: a reply is still streaming");
            return SendOutcome::RejectedBusy;
        }

        // 1. a first send from the draft route mints the conversation
        let (conversation_id, minted) = {
            let mut st = self.state.borrow_mut();
            match st.active.clone() {
                Some(id) if !st.route.is_new() => (id, false),
                _ => {
                    let id = st.registry.create_local();
                    st.active = Some(id.clone());
                    st.route = Route::Conversation(id.clone());
                    (id, true)
                }
            }
        };
        if minted {
            log::info!("Created local conversation {}", conversation_id);
            self.events.emit(ChatEvent::ConversationCreated {
                conversation_id: conversation_id.clone(),
            });
            self.navigator.navigate(
                &Route::Conversation(conversation_id.clone()),
                HistoryMode::Replace,
            );
        }

        // 2. optimistic user message and assistant placeholder
        let user = Message::user(text);
        let assistant = Message::assistant_placeholder();
        let user_message_id = user.id.clone();
        let assistant_message_id = assistant.id.clone();
        let metadata = {
            let mut st = self.state.borrow_mut();
            st.store
                .append(&conversation_id, vec![user.clone(), assistant]);
            metadata.unwrap_or_else(|| std::mem::take(&mut st.attachments))
        };

        // 3. open the completion stream
        if let Err(e) = self.supervisor.start_stream(
            text,
            &conversation_id,
            &assistant_message_id,
            metadata,
        ) {
            log::error!("Could not start stream: {}", e);
        }

        // 4. persist the user message, never rolled back
        let backend = self.backend.clone();
        let events = self.events.clone();
        let persist_id = conversation_id.clone();
        self.spawn("persist user message", async move {
            if let Err(e) = backend.persist_message(&persist_id, &user).await {
                log::warn!("Persisting message for {} failed: {}", persist_id, e);
                events.emit(ChatEvent::BackendError {
                    context: format!("persist message {}", persist_id),
                    message: e.to_string(),
                });
            }
        });

        SendOutcome::Sent {
            conversation_id,
            user_message_id,
            assistant_message_id,
        }
    }

    /// The conversation view is going away.
    pub fn teardown(&self) {
        self.supervisor.cancel();
    }

    // ─── Attachments ─────────────────────────────────────────

    /// Upload a file and reference it in the next send.
    pub async fn attach_upload(&self, upload: FileUpload) -> Result<UploadDescriptor> {
        let kind = upload.kind;
        let descriptor = self.library.upload_file(upload).await.map_err(|e| {
            log::error!("Upload failed: {}", e);
            e
        })?;
        self.attach(kind, descriptor.id.clone());
        Ok(descriptor)
    }

    /// Reference an existing resume or template in the next send.
    pub fn attach(&self, kind: UploadKind, id: String) {
        let mut st = self.state.borrow_mut();
        match kind {
            UploadKind::Resume => st.attachments.resume_id = Some(id),
            UploadKind::Template => st.attachments.template_id = Some(id),
        }
    }

    pub fn clear_attachments(&self) {
        self.state.borrow_mut().attachments = SendMetadata::default();
    }

    pub async fn load_templates(&self, filter: &TemplateFilter) -> bool {
        match self.library.list_templates(filter).await {
            Ok(templates) => {
                self.state.borrow_mut().templates = templates;
                true
            }
            Err(e) => {
                log::warn!("Failed to load templates: {}", e);
                false
            }
        }
    }

    pub async fn load_candidates(&self, filter: &CandidateFilter) -> bool {
        match self.library.list_candidates(filter).await {
            Ok(candidates) => {
                self.state.borrow_mut().candidates = candidates;
                true
            }
            Err(e) => {
                log::warn!("Failed to load candidates: {}", e);
                false
            }
        }
    }

    // ─── internals ───────────────────────────────────────────

    fn spawn_history_load(&self, id: ConversationId) {
        let state = self.state.clone();
        let backend = self.backend.clone();
        let events = self.events.clone();
        self.spawn("history load", async move {
            let outcome = sync::load_history(&state, backend.as_ref(), &events, &id).await;
            log::debug!("History load for {}: {:?}", id, outcome);
        });
    }

    fn spawn(&self, what: &str, task: impl std::future::Future<Output = ()> + 'static) {
        if let Err(e) = self.spawner.spawn_local(task) {
            log::error!("Could not spawn {}: {:?}", what, e);
        }
    }
}
