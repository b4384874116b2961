#[cfg(test)]
mod tests {
    use crate::panels::library::{dropped_uploads, non_blank};
    use crate::panels::UiAction;
    use crate::state::*;
    use crate::view::*;
    use chat_core::state::ChatState;
    use chat_types::conversation::*;
    use chat_types::event::ChatEvent;
    use chat_types::library::*;
    use chat_types::message::*;
    use std::sync::Arc;

    fn conv(id: &str) -> ConversationId {
        ConversationId::from(id)
    }

    // ─── UiState Tests ───────────────────────────────────────

    #[test]
    fn test_ui_state_initial() {
        let state = UiState::new();
        assert!(state.input_text.is_empty());
        assert_eq!(state.status_text, "Ready");
        assert!(!state.busy);
        assert!(!state.show_library);
        assert_eq!(state.upload_kind, UploadKind::Resume);
    }

    #[test]
    fn test_ui_state_stream_lifecycle() {
        let mut state = UiState::new();
        let started = ChatEvent::StreamStarted {
            conversation_id: conv("c"),
            message_id: MessageId::from("m"),
        };
        state.process_events(vec![started]);
        assert!(state.busy);
        assert_eq!(state.status_text, "AI is responding...");

        state.process_events(vec![ChatEvent::StreamCompleted {
            conversation_id: conv("c"),
            message_id: MessageId::from("m"),
        }]);
        assert!(!state.busy);
        assert_eq!(state.status_text, "Ready");
    }

    #[test]
    fn test_ui_state_stream_failed() {
        let mut state = UiState::new();
        state.busy = true;
        state.process_events(vec![ChatEvent::StreamFailed {
            conversation_id: conv("c"),
            message_id: MessageId::from("m"),
            reason: "reset".to_string(),
        }]);
        assert!(!state.busy);
        assert_eq!(state.status_text, "Failed to send message");
    }

    #[test]
    fn test_ui_state_backend_error_not_surfaced() {
        let mut state = UiState::new();
        state.process_events(vec![ChatEvent::BackendError {
            context: "persist message c".to_string(),
            message: "offline".to_string(),
        }]);
        assert_eq!(state.status_text, "Ready");
    }

    #[test]
    fn test_ui_state_history_loaded() {
        let mut state = UiState::new();
        state.process_events(vec![ChatEvent::HistoryLoaded {
            conversation_id: conv("c"),
            count: 4,
        }]);
        assert_eq!(state.status_text, "Loaded 4 messages");
    }

    #[test]
    fn test_take_input_trims_and_clears() {
        let mut state = UiState::new();
        state.input_text = "  hello  ".to_string();
        assert_eq!(state.take_input(true), Some("hello".to_string()));
        assert!(state.input_text.is_empty());
    }

    #[test]
    fn test_take_input_blank_is_none() {
        let mut state = UiState::new();
        state.input_text = " \n ".to_string();
        assert_eq!(state.take_input(true), None);
    }

    #[test]
    fn test_take_input_keeps_text_while_busy() {
        let mut state = UiState::new();
        state.input_text = "wait".to_string();
        assert_eq!(state.take_input(false), None);
        assert_eq!(state.input_text, "wait");
    }

    // ─── MessageView Tests ───────────────────────────────────

    #[test]
    fn test_message_view_streaming_cursor() {
        let mut reply = Message::assistant_placeholder();
        reply.content = "Hel".to_string();
        let view = MessageView::with_zone(&reply, &chrono::Utc);
        assert!(!view.from_user);
        assert_eq!(view.display_text(), "Hel▌");
        assert_eq!(view.notice(), None);
    }

    #[test]
    fn test_message_view_final_has_no_cursor() {
        let mut reply = Message::assistant_placeholder();
        reply.content = "Hello".to_string();
        reply.streaming = false;
        assert_eq!(MessageView::with_zone(&reply, &chrono::Utc).display_text(), "Hello");
    }

    #[test]
    fn test_message_view_failed_notice() {
        let mut reply = Message::assistant_placeholder();
        reply.streaming = false;
        reply.error = true;
        let view = MessageView::with_zone(&reply, &chrono::Utc);
        assert!(view.failed);
        assert_eq!(view.notice(), Some(FAILED_NOTICE));
    }

    #[test]
    fn test_message_view_interrupted_notice() {
        let mut reply = Message::assistant_placeholder();
        reply.streaming = false;
        reply.interrupted = true;
        assert_eq!(
            MessageView::with_zone(&reply, &chrono::Utc).notice(),
            Some(INTERRUPTED_NOTICE)
        );
    }

    #[test]
    fn test_message_view_time() {
        let mut msg = Message::user("hi");
        msg.timestamp = Some("2024-06-01T09:05:33Z".to_string());
        let view = MessageView::with_zone(&msg, &chrono::Utc);
        assert!(view.from_user);
        assert_eq!(view.time.as_deref(), Some("09:05"));

        msg.timestamp = None;
        assert_eq!(MessageView::with_zone(&msg, &chrono::Utc).time, None);
    }

    #[test]
    fn test_clock_time_offset_zone() {
        let zone = chrono::FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(clock_time("2024-06-01T23:30:00Z", &zone).as_deref(), Some("01:30"));
        assert_eq!(clock_time("garbage", &zone), None);
    }

    // ─── FrameView Tests ─────────────────────────────────────

    fn dated(id: &str, title: &str, updated: &str) -> ConversationSummary {
        let mut s = ConversationSummary::new(conv(id), title);
        s.updated_at = Some(updated.to_string());
        s
    }

    #[test]
    fn test_frame_view_sidebar_sorted_and_active() {
        let mut state = ChatState::new();
        state.registry.merge_list(vec![
            dated("old", "Old one", "2024-01-01T00:00:00Z"),
            dated("new", "", "2024-02-01T00:00:00Z"),
            dated("long", "A title that runs well past thirty chars", "2024-01-15T00:00:00Z"),
        ]);
        state.active = Some(conv("old"));

        let frame = FrameView::project(&state);
        let ids: Vec<&str> = frame.sidebar.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "long", "old"]);
        assert_eq!(frame.sidebar[0].title, "Untitled Conversation");
        assert_eq!(frame.sidebar[1].title, "A title that runs well past th...");
        assert!(frame.sidebar[2].active);
        assert!(!frame.sidebar[0].active);
    }

    #[test]
    fn test_frame_view_messages_of_active_only() {
        let mut state = ChatState::new();
        state.store.append(&conv("a"), vec![Message::user("in a")]);
        state.store.append(&conv("b"), vec![Message::user("in b")]);
        state.active = Some(conv("b"));

        let frame = FrameView::project(&state);
        assert_eq!(frame.messages.len(), 1);
        assert_eq!(frame.messages[0].text, "in b");
    }

    #[test]
    fn test_frame_view_input_hint_follows_streaming() {
        let mut state = ChatState::new();
        assert_eq!(FrameView::project(&state).input_hint(), IDLE_HINT);

        state.streaming.start(MessageId::from("m"));
        let frame = FrameView::project(&state);
        assert!(!frame.can_send);
        assert_eq!(frame.input_hint(), BUSY_HINT);
    }

    // ─── Theme Tests ─────────────────────────────────────────

    #[test]
    fn test_apply_theme_is_light() {
        let ctx = egui::Context::default();
        crate::theme::apply_theme(&ctx);

        let style = ctx.style();
        assert!(!style.visuals.dark_mode);
        assert_eq!(style.visuals.panel_fill, crate::theme::CANVAS);
        assert_eq!(style.visuals.selection.bg_fill, crate::theme::ACCENT_SOFT);
    }

    // ─── Library Tests ───────────────────────────────────────

    fn template(json: serde_json::Value) -> Template {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_template_label_fallbacks() {
        let named = template(serde_json::json!({"id": "t1", "name": "Backend", "job_title": "SWE"}));
        let titled = template(serde_json::json!({"id": "t2", "job_title": "SRE"}));
        let bare = template(serde_json::json!({"id": "t3"}));
        assert_eq!(template_label(&named), "Backend");
        assert_eq!(template_label(&titled), "SRE");
        assert_eq!(template_label(&bare), "t3");
    }

    #[test]
    fn test_candidate_label_with_skills() {
        let candidate: Candidate = serde_json::from_value(serde_json::json!({
            "id": "c1",
            "name": "Ada",
            "skills": ["rust", "wasm"],
        }))
        .unwrap();
        assert_eq!(candidate_label(&candidate), "Ada · rust, wasm");
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank("  dev "), Some("dev".to_string()));
        assert_eq!(non_blank("   "), None);
    }

    #[test]
    fn test_dropped_uploads_skip_empty_files() {
        let with_bytes = egui::DroppedFile {
            name: "cv.pdf".to_string(),
            bytes: Some(Arc::from(vec![1u8, 2, 3])),
            ..Default::default()
        };
        let without = egui::DroppedFile {
            name: "ghost.pdf".to_string(),
            ..Default::default()
        };

        let actions = dropped_uploads(&[with_bytes, without], UploadKind::Resume);
        assert_eq!(actions.len(), 1);
        match &actions[0] {
            UiAction::Upload(upload) => {
                assert_eq!(upload.file_name, "cv.pdf");
                assert_eq!(upload.bytes, vec![1, 2, 3]);
                assert_eq!(upload.kind, UploadKind::Resume);
            }
            other => panic!("unexpected action {:?}", other),
        }
    }
}
