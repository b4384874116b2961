//! WASM-target tests for chat-platform (Node.js runtime).
//!
//! Covers URL construction for the completion channel, request headers,
//! route parsing from the address bar, and the spawner. `EventSource` and
//! the History API need a browser and are exercised by the app itself.

use wasm_bindgen_test::*;

use chat_core::ports::CompletionRequest;
use chat_platform::api::event_source::completion_url;
use chat_platform::navigation::route_or_index;
use chat_platform::{BrowserSpawner, HttpBackend};
use chat_types::config::ClientConfig;
use chat_types::conversation::ConversationId;
use chat_types::library::SendMetadata;
use chat_types::message::{Message, PersistRequest};
use chat_types::route::Route;

use futures::channel::oneshot;
use futures::task::LocalSpawnExt;

fn request(message: &str, metadata: SendMetadata) -> CompletionRequest {
    CompletionRequest {
        message: message.to_string(),
        conversation_id: ConversationId::from("c-42"),
        metadata,
    }
}

// ─── Completion URL Tests ────────────────────────────────

#[wasm_bindgen_test]
fn completion_url_carries_message_and_conversation() {
    let config = ClientConfig::default();
    let url = completion_url(&config, &request("hello there & more", SendMetadata::default())).unwrap();

    assert!(url.starts_with("http://localhost:8000/api/chat/completions?"));
    assert!(url.contains("message=hello+there+%26+more"));
    assert!(url.contains("conversation_id=c-42"));
    assert!(!url.contains("access_token"));
    assert!(!url.contains("resume_id"));
}

#[wasm_bindgen_test]
fn completion_url_includes_attachments_and_token() {
    let config = ClientConfig::from_values(Some("https://chat.example.com/api/"), Some("tok"));
    let metadata = SendMetadata {
        resume_id: Some("r1".to_string()),
        template_id: Some("t1".to_string()),
    };
    let url = completion_url(&config, &request("hi", metadata)).unwrap();

    assert!(url.starts_with("https://chat.example.com/api/chat/completions?"));
    assert!(url.contains("resume_id=r1"));
    assert!(url.contains("template_id=t1"));
    assert!(url.contains("access_token=tok"));
}

#[wasm_bindgen_test]
fn completion_url_rejects_bad_base() {
    let config = ClientConfig::from_values(Some("not a url"), None);
    assert!(completion_url(&config, &request("hi", SendMetadata::default())).is_err());
}

#[wasm_bindgen_test]
fn http_backend_keeps_config() {
    let config = ClientConfig::from_values(Some("https://api.example.com"), None);
    let backend = HttpBackend::new(config.clone());
    assert_eq!(backend.config(), &config);
}

// ─── Navigation Tests ────────────────────────────────────

#[wasm_bindgen_test]
fn route_from_known_paths() {
    assert_eq!(route_or_index("/chat/new"), Route::New);
    assert_eq!(
        route_or_index("/chat/abc"),
        Route::Conversation(ConversationId::from("abc"))
    );
    assert_eq!(route_or_index("/chat"), Route::Index);
}

#[wasm_bindgen_test]
fn unknown_path_falls_back_to_index() {
    assert_eq!(route_or_index("/"), Route::Index);
    assert_eq!(route_or_index("/settings"), Route::Index);
}

// ─── Spawner Tests ───────────────────────────────────────

#[wasm_bindgen_test]
async fn browser_spawner_runs_tasks() {
    let (tx, rx) = oneshot::channel();
    BrowserSpawner
        .spawn_local(async move {
            let _ = tx.send(7);
        })
        .unwrap();
    assert_eq!(rx.await.unwrap(), 7);
}

// ─── Request Header Tests ────────────────────────────────

#[wasm_bindgen_test]
fn get_requests_carry_auth_but_no_content_type() {
    let config = ClientConfig::from_values(None, Some("tok"));
    let backend = HttpBackend::new(config);
    let request = backend.get("conversations").build().unwrap();

    let headers = request.headers();
    assert_eq!(headers.get("authorization"), Some("Bearer tok".to_string()));
    assert_eq!(headers.get("content-type"), None);
}

#[wasm_bindgen_test]
fn persist_body_is_json() {
    let backend = HttpBackend::new(ClientConfig::default());
    let conversation_id = ConversationId::from("c-42");
    let message = Message::user("hi");
    let request = backend
        .post("chat/send")
        .json(&PersistRequest {
            conversation_id: &conversation_id,
            message: &message,
        })
        .unwrap();

    assert_eq!(
        request.headers().get("content-type"),
        Some("application/json".to_string())
    );
}
