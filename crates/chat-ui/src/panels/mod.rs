pub mod conversation;
pub mod library;
pub mod sidebar;

use chat_types::conversation::ConversationId;
use chat_types::library::{FileUpload, UploadKind};

/// What the user asked for while a panel was drawn
#[derive(Debug, Clone)]
pub enum UiAction {
    NewChat,
    Select(ConversationId),
    Send(String),
    Attach(UploadKind, String),
    ClearAttachments,
    Upload(FileUpload),
    LoadTemplates { job_title: Option<String> },
    LoadCandidates { search: Option<String> },
}
