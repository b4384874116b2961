//! Read-only projections of the chat state for the panels.
//!
//! Panels never borrow `ChatState` while drawing; the app builds these
//! plain values once per frame and hands them over.

use chrono::{DateTime, TimeZone};
use chat_core::state::ChatState;
use chat_types::{
    conversation::{parse_timestamp, ConversationId},
    library::{Candidate, SendMetadata, Template},
    message::{Message, MessageId, Role},
};

pub const STREAMING_CURSOR: &str = "▌";
pub const FAILED_NOTICE: &str = "Failed to send message";
pub const INTERRUPTED_NOTICE: &str = "Response stopped";
pub const BUSY_HINT: &str = "AI is responding...";
pub const IDLE_HINT: &str = "Type your message...";

/// One sidebar row
#[derive(Debug, Clone, PartialEq)]
pub struct SidebarEntry {
    pub id: ConversationId,
    pub title: String,
    pub active: bool,
}

/// One message bubble
#[derive(Debug, Clone, PartialEq)]
pub struct MessageView {
    pub id: MessageId,
    pub from_user: bool,
    pub text: String,
    pub streaming: bool,
    pub failed: bool,
    pub interrupted: bool,
    /// `HH:MM`, local time
    pub time: Option<String>,
}

impl MessageView {
    pub fn from_message(message: &Message) -> Self {
        Self::with_zone(message, &chrono::Local)
    }

    pub fn with_zone<Tz: TimeZone>(message: &Message, zone: &Tz) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        Self {
            id: message.id.clone(),
            from_user: message.role == Role::User,
            text: message.content.clone(),
            streaming: message.streaming,
            failed: message.error,
            interrupted: message.interrupted,
            time: message
                .timestamp
                .as_deref()
                .and_then(|raw| clock_time(raw, zone)),
        }
    }

    /// Body text with the cursor appended while the reply streams
    pub fn display_text(&self) -> String {
        if self.streaming {
            format!("{}{}", self.text, STREAMING_CURSOR)
        } else {
            self.text.clone()
        }
    }

    pub fn notice(&self) -> Option<&'static str> {
        if self.failed {
            Some(FAILED_NOTICE)
        } else if self.interrupted {
            Some(INTERRUPTED_NOTICE)
        } else {
            None
        }
    }
}

/// `HH:MM` of an RFC 3339 (or naive ISO) timestamp in `zone`
pub fn clock_time<Tz: TimeZone>(raw: &str, zone: &Tz) -> Option<String>
where
    Tz::Offset: std::fmt::Display,
{
    let utc: DateTime<chrono::Utc> = parse_timestamp(raw)?;
    Some(utc.with_timezone(zone).format("%H:%M").to_string())
}

/// Everything the panels draw in one frame
#[derive(Debug, Clone, Default)]
pub struct FrameView {
    pub sidebar: Vec<SidebarEntry>,
    pub messages: Vec<MessageView>,
    pub can_send: bool,
    pub attachments: SendMetadata,
    pub templates: Vec<Template>,
    pub candidates: Vec<Candidate>,
}

impl FrameView {
    pub fn project(state: &ChatState) -> Self {
        let active = state.active.as_ref();
        let sidebar = state
            .registry
            .sorted_conversations()
            .into_iter()
            .map(|c| SidebarEntry {
                id: c.id.clone(),
                title: c.display_title(),
                active: Some(&c.id) == active,
            })
            .collect();

        Self {
            sidebar,
            messages: state
                .active_messages()
                .iter()
                .map(MessageView::from_message)
                .collect(),
            can_send: state.can_send(),
            attachments: state.attachments.clone(),
            templates: state.templates.clone(),
            candidates: state.candidates.clone(),
        }
    }

    pub fn input_hint(&self) -> &'static str {
        if self.can_send {
            IDLE_HINT
        } else {
            BUSY_HINT
        }
    }
}

pub fn template_label(template: &Template) -> String {
    template
        .name
        .clone()
        .or_else(|| template.job_title.clone())
        .unwrap_or_else(|| template.id.clone())
}

pub fn candidate_label(candidate: &Candidate) -> String {
    let name = candidate
        .name
        .clone()
        .unwrap_or_else(|| candidate.id.clone());
    if candidate.skills.is_empty() {
        name
    } else {
        format!("{} · {}", name, candidate.skills.join(", "))
    }
}
