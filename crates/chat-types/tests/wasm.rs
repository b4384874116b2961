//! WASM-target tests for chat-types.
//!
//! Mirrors a subset of the native unit tests under wasm32-unknown-unknown
//! via `wasm-pack test --node`. Id generation goes through the `js` feature
//! of uuid here, so it is worth exercising on the real target.

use wasm_bindgen_test::*;

use chat_types::config::*;
use chat_types::conversation::*;
use chat_types::error::*;
use chat_types::message::*;
use chat_types::route::*;

// ─── Message Tests ───────────────────────────────────────

#[wasm_bindgen_test]
fn message_user_has_timestamp() {
    let msg = Message::user("Hi there");
    assert_eq!(msg.role, Role::User);
    assert!(msg.timestamp.is_some());
}

#[wasm_bindgen_test]
fn message_placeholder_is_streaming() {
    let msg = Message::assistant_placeholder();
    assert!(msg.streaming);
    assert!(msg.content.is_empty());
}

#[wasm_bindgen_test]
fn generated_ids_are_unique() {
    assert_ne!(MessageId::generate(), MessageId::generate());
    assert_ne!(ConversationId::generate(), ConversationId::generate());
}

// ─── Conversation Tests ──────────────────────────────────

#[wasm_bindgen_test]
fn summary_display_title() {
    let s = ConversationSummary::new(ConversationId::from("c"), "x".repeat(40));
    assert!(s.display_title().ends_with("..."));
}

#[wasm_bindgen_test]
fn streaming_state_roundtrip() {
    let mut state = StreamingState::default();
    state.start(MessageId::from("m"));
    assert!(state.is_streaming);
    state.clear();
    assert!(!state.is_streaming);
}

// ─── Route Tests ─────────────────────────────────────────

#[wasm_bindgen_test]
fn route_parse_and_render() {
    assert_eq!("/chat/new".parse::<Route>().unwrap(), Route::New);
    let route: Route = "/chat/c1".parse().unwrap();
    assert_eq!(route.path(), "/chat/c1");
    assert!("/other".parse::<Route>().is_err());
}

// ─── Config / Error Tests ────────────────────────────────

#[wasm_bindgen_test]
fn config_endpoint() {
    let config = ClientConfig::default();
    assert_eq!(config.endpoint("/conversations"), "http://localhost:8000/api/conversations");
}

#[wasm_bindgen_test]
fn error_display() {
    assert_eq!(ChatError::Stream("closed".to_string()).to_string(), "Stream error: closed");
}
