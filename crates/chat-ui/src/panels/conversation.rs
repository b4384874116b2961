//! Conversation view: message bubbles and the input box.

use egui::{self, Align, Layout, RichText, ScrollArea, Vec2};
use crate::panels::UiAction;
use crate::state::UiState;
use crate::theme::*;
use crate::view::{FrameView, MessageView};

/// Render the conversation. Returns `UiAction::Send` when the user submits.
pub fn conversation_panel(ui: &mut egui::Ui, state: &mut UiState, frame: &FrameView) -> Option<UiAction> {
    let mut action = None;

    egui::Frame::default()
        .fill(CANVAS)
        .inner_margin(FRAME_MARGIN)
        .show(ui, |ui| {
            ui.vertical(|ui| {
                // Header
                ui.horizontal(|ui| {
                    ui.heading(RichText::new("Chat").color(INK).strong());
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        let status_color = if state.busy { BUSY } else { READY };
                        ui.label(RichText::new(&state.status_text).color(status_color).small());
                        if ui.small_button("Library").clicked() {
                            state.show_library = !state.show_library;
                        }
                    });
                });

                ui.separator();

                let available_height = ui.available_height() - 60.0;
                ScrollArea::vertical()
                    .max_height(available_height)
                    .auto_shrink([false, false])
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        if frame.messages.is_empty() {
                            ui.add_space(24.0);
                            ui.vertical_centered(|ui| {
                                ui.label(
                                    RichText::new("Start a conversation")
                                        .color(MUTED)
                                        .italics(),
                                );
                            });
                        }
                        for message in &frame.messages {
                            render_message(ui, message);
                            ui.add_space(4.0);
                        }
                    });

                ui.add_space(8.0);
                attachment_chips(ui, frame, &mut action);

                ui.horizontal(|ui| {
                    let input = egui::TextEdit::singleline(&mut state.input_text)
                        .hint_text(frame.input_hint())
                        .desired_width(ui.available_width() - 70.0)
                        .font(egui::FontId::proportional(14.0));
                    let response = ui.add_enabled(frame.can_send, input);

                    let send_enabled = frame.can_send && !state.input_text.trim().is_empty();
                    let send_btn = ui.add_enabled(
                        send_enabled,
                        egui::Button::new(RichText::new("Send").color(if send_enabled { ON_ACCENT } else { MUTED }))
                            .fill(if send_enabled { ACCENT } else { CONTROL_FILL })
                            .corner_radius(CONTROL_ROUNDING)
                            .min_size(Vec2::new(60.0, 0.0)),
                    );

                    let enter = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                    if enter || send_btn.clicked() {
                        if let Some(text) = state.take_input(frame.can_send) {
                            action = Some(UiAction::Send(text));
                        }
                        response.request_focus();
                    }
                });
            });
        });

    action
}

fn attachment_chips(ui: &mut egui::Ui, frame: &FrameView, action: &mut Option<UiAction>) {
    if frame.attachments.is_empty() {
        return;
    }
    ui.horizontal(|ui| {
        if let Some(ref id) = frame.attachments.resume_id {
            ui.label(RichText::new(format!("Resume: {}", id)).color(ACCENT).small());
        }
        if let Some(ref id) = frame.attachments.template_id {
            ui.label(RichText::new(format!("Template: {}", id)).color(ACCENT).small());
        }
        if ui.small_button("✕").clicked() {
            *action = Some(UiAction::ClearAttachments);
        }
    });
}

fn render_message(ui: &mut egui::Ui, message: &MessageView) {
    let (label, label_color, bg, ink) = if message.from_user {
        ("You", ACCENT_SOFT, USER_BUBBLE, ON_ACCENT)
    } else if message.failed {
        ("Assistant", DANGER, FAILED_BUBBLE, INK)
    } else {
        ("Assistant", MUTED, ASSISTANT_BUBBLE, INK)
    };
    let layout = if message.from_user {
        Layout::top_down(Align::Max)
    } else {
        Layout::top_down(Align::Min)
    };

    ui.with_layout(layout, |ui| {
        egui::Frame::default()
            .fill(bg)
            .corner_radius(BUBBLE_ROUNDING)
            .inner_margin(BUBBLE_MARGIN)
            .show(ui, |ui| {
                ui.set_max_width(ui.available_width() * 0.8);
                ui.horizontal(|ui| {
                    ui.label(RichText::new(label).color(label_color).strong().small());
                    if let Some(ref time) = message.time {
                        ui.label(RichText::new(time).color(label_color).small());
                    }
                });
                ui.label(RichText::new(message.display_text()).color(ink));
                if let Some(notice) = message.notice() {
                    let color = if message.failed { DANGER } else { BUSY };
                    ui.label(RichText::new(notice).color(color).small());
                }
            });
    });
}
