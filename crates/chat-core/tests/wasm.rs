//! WASM-target tests for chat-core.
//!
//! Runs the event bus, registry, store and stream state machine tests under
//! wasm32-unknown-unknown via `wasm-pack test --node`, plus one send driven
//! end to end on a `LocalPool` (only `run_until_stalled`, which never parks).

use wasm_bindgen_test::*;

use chat_core::controller::{ConversationController, SendOutcome};
use chat_core::event_bus::EventBus;
use chat_core::ports::*;
use chat_core::registry::SessionRegistry;
use chat_core::state::ChatState;
use chat_core::store::{Finalize, MessageStore};
use chat_core::supervisor::{StreamPhase, StreamRun, Step};
use chat_types::conversation::*;
use chat_types::event::ChatEvent;
use chat_types::library::*;
use chat_types::message::*;
use chat_types::route::*;
use chat_types::{ChatError, Result};

use std::cell::RefCell;
use std::rc::Rc;
use async_trait::async_trait;
use futures::channel::mpsc;
use futures::executor::LocalPool;

// ─── EventBus Tests ──────────────────────────────────────

#[wasm_bindgen_test]
fn event_bus_emit_and_drain() {
    let bus = EventBus::new();
    bus.emit(ChatEvent::ConversationsRefreshed { count: 3 });
    assert!(bus.has_pending());
    assert_eq!(bus.drain().len(), 1);
    assert!(!bus.has_pending());
}

// ─── SessionRegistry Tests ───────────────────────────────

#[wasm_bindgen_test]
fn registry_local_then_persisted() {
    let mut registry = SessionRegistry::new();
    let id = registry.create_local();
    assert_eq!(registry.state(&id), SessionState::LocalUnconfirmed);
    assert!(registry.mark_persisted(&id));
    assert!(!registry.mark_persisted(&id));
}

#[wasm_bindgen_test]
fn registry_merge_keeps_optimistic_entry() {
    let mut registry = SessionRegistry::new();
    registry.insert_if_absent(ConversationSummary::new(ConversationId::from("mine"), "Mine"));
    registry.merge_list(vec![ConversationSummary::new(ConversationId::from("a"), "A")]);
    assert_eq!(registry.conversations().len(), 2);
    assert_eq!(registry.conversations()[0].id.as_str(), "a");
}

// ─── MessageStore Tests ──────────────────────────────────

#[wasm_bindgen_test]
fn store_stream_then_finalize() {
    let mut store = MessageStore::new();
    let c = ConversationId::from("c");
    let reply = Message::assistant_placeholder();
    let id = reply.id.clone();
    store.append(&c, vec![reply]);

    store.update_streaming_message(&c, &id, "ok").unwrap();
    assert!(store.finalize(&c, &id, Finalize::Success));
    assert!(store.update_streaming_message(&c, &id, "late").is_err());
    assert_eq!(store.message(&c, &id).unwrap().content, "ok");
}

// ─── StreamRun Tests ─────────────────────────────────────

#[wasm_bindgen_test]
fn stream_run_transitions() {
    let mut run = StreamRun::new();
    run.open();
    assert_eq!(
        run.on_event(Some(StreamEvent::Data("a".to_string()))),
        Step::Append("a".to_string())
    );
    assert_eq!(
        run.on_event(Some(StreamEvent::Data(DONE_SENTINEL.to_string()))),
        Step::Complete
    );
    assert_eq!(run.phase(), StreamPhase::Completed);
    assert!(!run.interrupt());
}

// ─── Controller Tests ────────────────────────────────────

struct Backend {
    senders: RefCell<Vec<mpsc::UnboundedSender<StreamEvent>>>,
}

#[async_trait(?Send)]
impl ChatBackendPort for Backend {
    async fn list_conversations(&self) -> Result<Vec<ConversationSummary>> {
        Ok(Vec::new())
    }

    async fn get_messages(&self, _id: &ConversationId) -> Result<Vec<Message>> {
        Err(ChatError::Other("not expected".to_string()))
    }

    async fn persist_message(&self, _id: &ConversationId, _message: &Message) -> Result<()> {
        Ok(())
    }

    fn open_completion(&self, _req: CompletionRequest) -> Result<CompletionStream> {
        let (tx, rx) = mpsc::unbounded();
        self.senders.borrow_mut().push(tx);
        Ok(CompletionStream::new(rx, || {}))
    }
}

struct Library;

#[async_trait(?Send)]
impl LibraryPort for Library {
    async fn upload_file(&self, _upload: FileUpload) -> Result<UploadDescriptor> {
        Err(ChatError::Other("no uploads".to_string()))
    }

    async fn list_templates(&self, _filter: &TemplateFilter) -> Result<Vec<Template>> {
        Ok(Vec::new())
    }

    async fn list_candidates(&self, _filter: &CandidateFilter) -> Result<Vec<Candidate>> {
        Ok(Vec::new())
    }
}

struct Navigator;

impl NavigatorPort for Navigator {
    fn navigate(&self, _route: &Route, _mode: HistoryMode) {}
}

#[wasm_bindgen_test]
fn controller_send_streams_to_completion() {
    let mut pool = LocalPool::new();
    let backend = Rc::new(Backend {
        senders: RefCell::new(Vec::new()),
    });
    let controller = ConversationController::new(
        ChatState::shared(),
        backend.clone(),
        Rc::new(Library),
        Rc::new(Navigator),
        Rc::new(pool.spawner()),
        EventBus::new(),
    );

    let SendOutcome::Sent {
        conversation_id,
        assistant_message_id,
        ..
    } = controller.send("ping")
    else {
        panic!("send was rejected");
    };
    assert_eq!(controller.send("again"), SendOutcome::RejectedBusy);

    let tx = backend.senders.borrow()[0].clone();
    tx.unbounded_send(StreamEvent::Data("pong".to_string())).unwrap();
    tx.unbounded_send(StreamEvent::Data(DONE_SENTINEL.to_string())).unwrap();
    pool.run_until_stalled();

    let st = controller.state().borrow();
    let reply = st.store.message(&conversation_id, &assistant_message_id).unwrap();
    assert_eq!(reply.content, "pong");
    assert!(!reply.streaming);
    assert_eq!(st.registry.state(&conversation_id), SessionState::Persisted);
}
