//! Port traits: the boundary between the conversation core and the browser.
//!
//! Implementations live in `chat-platform`. The core only depends on these
//! traits, which keeps it testable with in-memory mocks.

use std::cell::RefCell;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use async_trait::async_trait;
use futures::stream::{LocalBoxStream, Stream, StreamExt};
use chat_types::{
    Result,
    conversation::{ConversationId, ConversationSummary},
    library::{
        Candidate, CandidateFilter, FileUpload, SendMetadata, Template, TemplateFilter,
        UploadDescriptor,
    },
    message::Message,
    route::{HistoryMode, Route},
};

/// Payload that terminates a completion stream
pub const DONE_SENTINEL: &str = "[DONE]";

// ─── Completion stream ───────────────────────────────────────

/// One item delivered by a completion channel
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// A `data:` payload, either a text delta or the sentinel
    Data(String),
    /// The transport reported a failure
    Error(String),
}

/// Parameters of the server-push completion channel
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub message: String,
    pub conversation_id: ConversationId,
    pub metadata: SendMetadata,
}

impl CompletionRequest {
    /// Query parameters, unencoded, in a stable order
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("message", self.message.clone()),
            ("conversation_id", self.conversation_id.to_string()),
        ];
        if let Some(ref id) = self.metadata.resume_id {
            pairs.push(("resume_id", id.clone()));
        }
        if let Some(ref id) = self.metadata.template_id {
            pairs.push(("template_id", id.clone()));
        }
        pairs
    }
}

type CloseFn = Box<dyn FnOnce()>;

/// Shared switch that releases the underlying connection exactly once.
#[derive(Clone)]
pub struct StreamCloser {
    close: Rc<RefCell<Option<CloseFn>>>,
}

impl StreamCloser {
    fn new(close: impl FnOnce() + 'static) -> Self {
        Self {
            close: Rc::new(RefCell::new(Some(Box::new(close)))),
        }
    }

    pub fn close(&self) {
        let close = self.close.borrow_mut().take();
        if let Some(close) = close {
            close();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.close.borrow().is_none()
    }
}

/// Cancellable, single-consumer handle over one completion channel.
///
/// Yields events in arrival order. Once closed (explicitly, through a
/// [`StreamCloser`], or by drop) it yields nothing more.
pub struct CompletionStream {
    events: LocalBoxStream<'static, StreamEvent>,
    closer: StreamCloser,
}

impl CompletionStream {
    pub fn new(
        events: impl Stream<Item = StreamEvent> + 'static,
        on_close: impl FnOnce() + 'static,
    ) -> Self {
        Self {
            events: events.boxed_local(),
            closer: StreamCloser::new(on_close),
        }
    }

    pub fn closer(&self) -> StreamCloser {
        self.closer.clone()
    }

    pub fn close(&self) {
        self.closer.close();
    }

    pub fn is_closed(&self) -> bool {
        self.closer.is_closed()
    }
}

impl Stream for CompletionStream {
    type Item = StreamEvent;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<StreamEvent>> {
        let this = self.get_mut();
        if this.closer.is_closed() {
            return Poll::Ready(None);
        }
        this.events.as_mut().poll_next(cx)
    }
}

impl Drop for CompletionStream {
    fn drop(&mut self) {
        self.closer.close();
    }
}

// ─── Backend Port ────────────────────────────────────────────

#[async_trait(?Send)]
pub trait ChatBackendPort {
    /// `GET /conversations`
    async fn list_conversations(&self) -> Result<Vec<ConversationSummary>>;

    /// `GET /messages/{id}`
    async fn get_messages(&self, conversation_id: &ConversationId) -> Result<Vec<Message>>;

    /// `POST /chat/send`: the response body is unused
    async fn persist_message(&self, conversation_id: &ConversationId, message: &Message) -> Result<()>;

    /// Open the server-push completion channel. Opening is synchronous;
    /// chunks arrive through the returned stream.
    fn open_completion(&self, req: CompletionRequest) -> Result<CompletionStream>;
}

// ─── Library Port ────────────────────────────────────────────

#[async_trait(?Send)]
pub trait LibraryPort {
    /// `POST /upload` as multipart (`file`, `type`)
    async fn upload_file(&self, upload: FileUpload) -> Result<UploadDescriptor>;

    /// `GET /templates`
    async fn list_templates(&self, filter: &TemplateFilter) -> Result<Vec<Template>>;

    /// `GET /candidates`
    async fn list_candidates(&self, filter: &CandidateFilter) -> Result<Vec<Candidate>>;
}

// ─── Navigator Port ──────────────────────────────────────────

pub trait NavigatorPort {
    /// Reflect `route` in the address bar
    fn navigate(&self, route: &Route, mode: HistoryMode);
}
