//! Sidebar: "New Chat" and the conversation list, newest first.

use egui::{self, RichText, ScrollArea, Sense, Vec2};
use crate::panels::UiAction;
use crate::theme::*;
use crate::view::SidebarEntry;

pub fn sidebar_panel(ui: &mut egui::Ui, entries: &[SidebarEntry]) -> Option<UiAction> {
    let mut action = None;

    egui::Frame::default()
        .fill(SIDEBAR_FILL)
        .inner_margin(FRAME_MARGIN)
        .show(ui, |ui| {
            ui.vertical(|ui| {
                let new_chat = ui.add(
                    egui::Button::new(RichText::new("+ New Chat").color(ON_ACCENT).strong())
                        .fill(ACCENT)
                        .corner_radius(CONTROL_ROUNDING)
                        .min_size(Vec2::new(ui.available_width(), 32.0)),
                );
                if new_chat.clicked() {
                    action = Some(UiAction::NewChat);
                }

                ui.add_space(8.0);
                ui.label(RichText::new("Conversations").color(MUTED).small());
                ui.separator();

                if entries.is_empty() {
                    ui.label(
                        RichText::new("No conversations yet")
                            .color(MUTED)
                            .italics(),
                    );
                    return;
                }

                ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        for entry in entries {
                            if sidebar_item(ui, entry) {
                                action = Some(UiAction::Select(entry.id.clone()));
                            }
                        }
                    });
            });
        });

    action
}

/// One row; true when clicked
fn sidebar_item(ui: &mut egui::Ui, entry: &SidebarEntry) -> bool {
    let (fill, text) = if entry.active {
        (ACCENT_SOFT, INK)
    } else {
        (SIDEBAR_FILL, MUTED)
    };

    let response = egui::Frame::default()
        .fill(fill)
        .corner_radius(CONTROL_ROUNDING)
        .inner_margin(BUBBLE_MARGIN)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(RichText::new(&entry.title).color(text));
        })
        .response
        .interact(Sense::click())
        .on_hover_cursor(egui::CursorIcon::PointingHand);

    response.clicked()
}
