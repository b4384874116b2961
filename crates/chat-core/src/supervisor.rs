//! Stream supervisor: owns the one live completion stream.
//!
//! Each send runs through a small state machine:
//!
//! ```text
//! Idle → Opening → Streaming → Completed
//!          │           │
//!          └───────────┴──────→ Failed | Interrupted
//! ```
//!
//! [`StreamRun`] holds the phase and decides what every inbound item means;
//! the supervisor applies the resulting [`Step`] to the shared state. Only
//! one stream is open at a time, system-wide.

use std::cell::RefCell;
use std::rc::Rc;

use futures::future::{abortable, AbortHandle, FutureExt};
use futures::stream::StreamExt;
use futures::task::{LocalSpawn, LocalSpawnExt};
use chat_types::{
    ChatError, Result,
    conversation::{ConversationId, ConversationSummary},
    event::ChatEvent,
    library::SendMetadata,
    message::MessageId,
};
use crate::event_bus::EventBus;
use crate::ports::{
    ChatBackendPort, CompletionRequest, CompletionStream, StreamCloser, StreamEvent, DONE_SENTINEL,
};
use crate::state::SharedState;
use crate::store::{Finalize, StoreInconsistency};
use crate::sync;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamPhase {
    Idle,
    Opening,
    Streaming,
    Completed,
    Failed,
    Interrupted,
}

impl StreamPhase {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            StreamPhase::Completed | StreamPhase::Failed | StreamPhase::Interrupted
        )
    }
}

/// What the supervisor has to do after one inbound item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Append(String),
    Complete,
    Fail(String),
    /// The run is already over; drop the item
    Ignore,
}

/// Phase of a single send's stream, with pure transitions.
#[derive(Debug)]
pub struct StreamRun {
    phase: StreamPhase,
}

impl StreamRun {
    pub fn new() -> Self {
        Self {
            phase: StreamPhase::Idle,
        }
    }

    pub fn phase(&self) -> StreamPhase {
        self.phase
    }

    pub fn open(&mut self) -> bool {
        if self.phase != StreamPhase::Idle {
            return false;
        }
        self.phase = StreamPhase::Opening;
        true
    }

    /// Feed the next item of the channel; `None` means the channel ended.
    pub fn on_event(&mut self, event: Option<StreamEvent>) -> Step {
        if !matches!(self.phase, StreamPhase::Opening | StreamPhase::Streaming) {
            return Step::Ignore;
        }
        match event {
            Some(StreamEvent::Data(payload)) if payload == DONE_SENTINEL => {
                self.phase = StreamPhase::Completed;
                Step::Complete
            }
            Some(StreamEvent::Data(payload)) => {
                self.phase = StreamPhase::Streaming;
                Step::Append(payload)
            }
            Some(StreamEvent::Error(reason)) => {
                self.phase = StreamPhase::Failed;
                Step::Fail(reason)
            }
            None => {
                self.phase = StreamPhase::Failed;
                Step::Fail(format!("stream ended before {}", DONE_SENTINEL))
            }
        }
    }

    /// Consumer went away. False if the run had already ended.
    pub fn interrupt(&mut self) -> bool {
        if self.phase.is_terminal() {
            return false;
        }
        self.phase = StreamPhase::Interrupted;
        true
    }
}

impl Default for StreamRun {
    fn default() -> Self {
        Self::new()
    }
}

/// The user turn a stream answers
#[derive(Debug, Clone)]
struct Turn {
    conversation_id: ConversationId,
    message_id: MessageId,
    prompt: String,
}

struct ActiveStream {
    turn: Turn,
    run: Rc<RefCell<StreamRun>>,
    closer: StreamCloser,
    abort: AbortHandle,
}

#[derive(Clone)]
pub struct StreamSupervisor {
    state: SharedState,
    backend: Rc<dyn ChatBackendPort>,
    spawner: Rc<dyn LocalSpawn>,
    events: EventBus,
    active: Rc<RefCell<Option<ActiveStream>>>,
}

impl StreamSupervisor {
    pub fn new(
        state: SharedState,
        backend: Rc<dyn ChatBackendPort>,
        spawner: Rc<dyn LocalSpawn>,
        events: EventBus,
    ) -> Self {
        Self {
            state,
            backend,
            spawner,
            events,
            active: Rc::new(RefCell::new(None)),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.borrow().is_some()
    }

    pub fn active_phase(&self) -> Option<StreamPhase> {
        self.active.borrow().as_ref().map(|a| a.run.borrow().phase())
    }

    /// Conversation the live stream writes into
    pub fn active_conversation(&self) -> Option<ConversationId> {
        self.active
            .borrow()
            .as_ref()
            .map(|a| a.turn.conversation_id.clone())
    }

    /// Open the completion channel for `message_id` and consume it in a
    /// spawned task. Fails only if another stream is live; transport
    /// failures end up on the message instead.
    pub fn start_stream(
        &self,
        text: &str,
        conversation_id: &ConversationId,
        message_id: &MessageId,
        metadata: SendMetadata,
    ) -> Result<()> {
        if self.is_active() || self.state.borrow().streaming.is_streaming {
            return Err(ChatError::StreamInProgress);
        }

        let turn = Turn {
            conversation_id: conversation_id.clone(),
            message_id: message_id.clone(),
            prompt: text.to_string(),
        };
        let run = Rc::new(RefCell::new(StreamRun::new()));
        run.borrow_mut().open();
        self.state.borrow_mut().streaming.start(message_id.clone());

        let request = CompletionRequest {
            message: text.to_string(),
            conversation_id: conversation_id.clone(),
            metadata,
        };
        let stream = match self.backend.open_completion(request) {
            Ok(stream) => stream,
            Err(e) => {
                let step = run.borrow_mut().on_event(Some(StreamEvent::Error(e.to_string())));
                if let Step::Fail(reason) = step {
                    self.fail(&turn, &reason);
                }
                return Ok(());
            }
        };

        log::info!("Stream opened for message {} in {}", message_id, conversation_id);
        self.events.emit(ChatEvent::StreamStarted {
            conversation_id: conversation_id.clone(),
            message_id: message_id.clone(),
        });

        let closer = stream.closer();
        let (task, abort) = abortable(self.clone().drive(turn.clone(), run.clone(), stream));
        *self.active.borrow_mut() = Some(ActiveStream {
            turn,
            run,
            closer,
            abort,
        });

        if let Err(e) = self.spawner.spawn_local(task.map(|_| ())) {
            // the task was dropped with its stream; fail the turn by hand
            let active = self.active.borrow_mut().take();
            if let Some(active) = active {
                let step = active
                    .run
                    .borrow_mut()
                    .on_event(Some(StreamEvent::Error(format!("spawn failed: {:?}", e))));
                if let Step::Fail(reason) = step {
                    self.fail(&active.turn, &reason);
                }
            }
        }
        Ok(())
    }

    /// Tear down the live stream because its consumer went away.
    ///
    /// The connection is closed at once and the reply is finalized as
    /// interrupted. The session keeps its persistence state.
    pub fn cancel(&self) -> bool {
        let active = self.active.borrow_mut().take();
        let Some(active) = active else {
            return false;
        };
        if !active.run.borrow_mut().interrupt() {
            return false;
        }
        active.closer.close();
        active.abort.abort();

        let turn = &active.turn;
        {
            let mut st = self.state.borrow_mut();
            st.store
                .finalize(&turn.conversation_id, &turn.message_id, Finalize::Interrupted);
            if st.streaming.is_streaming_message(&turn.message_id) {
                st.streaming.clear();
            }
        }
        log::info!("Stream for message {} interrupted", turn.message_id);
        self.events.emit(ChatEvent::StreamInterrupted {
            conversation_id: turn.conversation_id.clone(),
            message_id: turn.message_id.clone(),
        });
        true
    }

    async fn drive(self, turn: Turn, run: Rc<RefCell<StreamRun>>, mut stream: CompletionStream) {
        loop {
            let event = stream.next().await;
            let step = run.borrow_mut().on_event(event);
            match step {
                Step::Append(delta) => self.apply_delta(&turn, delta),
                Step::Complete => {
                    stream.close();
                    self.complete(&turn);
                    return;
                }
                Step::Fail(reason) => {
                    stream.close();
                    self.fail(&turn, &reason);
                    return;
                }
                Step::Ignore => return,
            }
        }
    }

    fn apply_delta(&self, turn: &Turn, delta: String) {
        let applied = {
            let mut st = self.state.borrow_mut();
            if st.streaming.is_streaming_message(&turn.message_id) {
                st.store
                    .update_streaming_message(&turn.conversation_id, &turn.message_id, &delta)
            } else {
                Err(StoreInconsistency::NotStreaming(turn.message_id.clone()))
            }
        };
        match applied {
            Ok(()) => self.events.emit(ChatEvent::StreamDelta {
                message_id: turn.message_id.clone(),
                delta,
            }),
            Err(e) => log::warn!("Ignoring stream chunk: {}", e),
        }
    }

    fn complete(&self, turn: &Turn) {
        self.release(turn);
        {
            let mut st = self.state.borrow_mut();
            st.store
                .finalize(&turn.conversation_id, &turn.message_id, Finalize::Success);
            if st.streaming.is_streaming_message(&turn.message_id) {
                st.streaming.clear();
            }
            if st.registry.mark_persisted(&turn.conversation_id) {
                // the local thread is the whole history of a new conversation
                st.store.mark_loaded(&turn.conversation_id);
            }
            st.registry.insert_if_absent(ConversationSummary::from_first_message(
                turn.conversation_id.clone(),
                &turn.prompt,
            ));
        }
        log::info!("Stream completed for message {}", turn.message_id);
        self.events.emit(ChatEvent::StreamCompleted {
            conversation_id: turn.conversation_id.clone(),
            message_id: turn.message_id.clone(),
        });

        let state = self.state.clone();
        let backend = self.backend.clone();
        let events = self.events.clone();
        let refresh = async move {
            sync::refresh_conversations(&state, backend.as_ref(), &events).await;
        };
        if let Err(e) = self.spawner.spawn_local(refresh) {
            log::warn!("Could not schedule conversation list refresh: {:?}", e);
        }
    }

    fn fail(&self, turn: &Turn, reason: &str) {
        self.release(turn);
        {
            let mut st = self.state.borrow_mut();
            st.store
                .finalize(&turn.conversation_id, &turn.message_id, Finalize::Error);
            if st.streaming.is_streaming_message(&turn.message_id) {
                st.streaming.clear();
            }
        }
        log::error!("Stream failed for message {}: {}", turn.message_id, reason);
        self.events.emit(ChatEvent::StreamFailed {
            conversation_id: turn.conversation_id.clone(),
            message_id: turn.message_id.clone(),
            reason: reason.to_string(),
        });
    }

    fn release(&self, turn: &Turn) {
        let mut active = self.active.borrow_mut();
        if active
            .as_ref()
            .is_some_and(|a| a.turn.message_id == turn.message_id)
        {
            *active = None;
        }
    }
}
