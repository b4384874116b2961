//! UI-only state: the input box, the status line, panel toggles.
//! Conversation data lives in the core; this side only reacts to the
//! events drained from the EventBus each frame.

use chat_types::event::ChatEvent;
use chat_types::library::UploadKind;

pub struct UiState {
    /// Input field content
    pub input_text: String,
    /// Status line text
    pub status_text: String,
    /// Set while a reply streams
    pub busy: bool,
    /// Whether the template/candidate pickers are open
    pub show_library: bool,
    /// Job-title filter typed into the template picker
    pub template_query: String,
    /// Search text typed into the candidate picker
    pub candidate_query: String,
    /// How a dropped file is uploaded
    pub upload_kind: UploadKind,
}

impl UiState {
    pub fn new() -> Self {
        Self {
            input_text: String::new(),
            status_text: "Ready".to_string(),
            busy: false,
            show_library: false,
            template_query: String::new(),
            candidate_query: String::new(),
            upload_kind: UploadKind::Resume,
        }
    }

    pub fn process_events(&mut self, events: Vec<ChatEvent>) {
        for event in events {
            match event {
                ChatEvent::ConversationCreated { .. } => {
                    self.status_text = "New conversation".to_string();
                }
                ChatEvent::StreamStarted { .. } => {
                    self.busy = true;
                    self.status_text = "AI is responding...".to_string();
                }
                ChatEvent::StreamDelta { .. } => {}
                ChatEvent::StreamCompleted { .. } => {
                    self.busy = false;
                    self.status_text = "Ready".to_string();
                }
                ChatEvent::StreamFailed { .. } => {
                    self.busy = false;
                    self.status_text = "Failed to send message".to_string();
                }
                ChatEvent::StreamInterrupted { .. } => {
                    self.busy = false;
                    self.status_text = "Response stopped".to_string();
                }
                ChatEvent::HistoryLoaded { count, .. } => {
                    self.status_text = format!("Loaded {} messages", count);
                }
                // background failures are logged by the core, not surfaced
                ChatEvent::ConversationsRefreshed { .. } | ChatEvent::BackendError { .. } => {}
            }
        }
    }

    /// Take the trimmed input for sending; `None` if there is nothing to send.
    /// The box keeps its text when the send is refused.
    pub fn take_input(&mut self, can_send: bool) -> Option<String> {
        let text = self.input_text.trim();
        if text.is_empty() || !can_send {
            return None;
        }
        let text = text.to_string();
        self.input_text.clear();
        Some(text)
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}
