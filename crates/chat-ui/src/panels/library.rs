//! Library window: pick a template or a candidate resume to reference in
//! the next send, or drop a file to upload one.

use egui::{self, RichText, ScrollArea};
use chat_types::library::{FileUpload, UploadKind};
use crate::panels::UiAction;
use crate::state::UiState;
use crate::theme::*;
use crate::view::{candidate_label, template_label, FrameView};

pub fn library_panel(ui: &mut egui::Ui, state: &mut UiState, frame: &FrameView) -> Option<UiAction> {
    let mut action = None;

    egui::Frame::default()
        .fill(CARD_FILL)
        .inner_margin(FRAME_MARGIN)
        .corner_radius(CONTROL_ROUNDING)
        .show(ui, |ui| {
            // ── Templates ────────────────────────────────────
            ui.label(RichText::new("Templates").color(ACCENT).strong());
            ui.horizontal(|ui| {
                ui.add(
                    egui::TextEdit::singleline(&mut state.template_query)
                        .hint_text("Job title")
                        .desired_width(160.0),
                );
                if ui.button("Load").clicked() {
                    action = Some(UiAction::LoadTemplates {
                        job_title: non_blank(&state.template_query),
                    });
                }
            });
            ScrollArea::vertical()
                .id_salt("templates")
                .max_height(140.0)
                .show(ui, |ui| {
                    for template in &frame.templates {
                        let selected =
                            frame.attachments.template_id.as_deref() == Some(template.id.as_str());
                        if ui.selectable_label(selected, template_label(template)).clicked() {
                            action = Some(UiAction::Attach(UploadKind::Template, template.id.clone()));
                        }
                    }
                });

            ui.separator();

            // ── Candidates ───────────────────────────────────
            ui.label(RichText::new("Candidates").color(ACCENT).strong());
            ui.horizontal(|ui| {
                ui.add(
                    egui::TextEdit::singleline(&mut state.candidate_query)
                        .hint_text("Search")
                        .desired_width(160.0),
                );
                if ui.button("Load").clicked() {
                    action = Some(UiAction::LoadCandidates {
                        search: non_blank(&state.candidate_query),
                    });
                }
            });
            ScrollArea::vertical()
                .id_salt("candidates")
                .max_height(140.0)
                .show(ui, |ui| {
                    for candidate in &frame.candidates {
                        let selected =
                            frame.attachments.resume_id.as_deref() == Some(candidate.id.as_str());
                        if ui.selectable_label(selected, candidate_label(candidate)).clicked() {
                            action = Some(UiAction::Attach(UploadKind::Resume, candidate.id.clone()));
                        }
                    }
                });

            ui.separator();

            // ── Upload ───────────────────────────────────────
            ui.label(RichText::new("Drop a file on the page to upload it as").color(MUTED).small());
            ui.horizontal(|ui| {
                ui.radio_value(&mut state.upload_kind, UploadKind::Resume, "Resume");
                ui.radio_value(&mut state.upload_kind, UploadKind::Template, "Template");
            });
        });

    action
}

pub(crate) fn non_blank(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Uploads for files dropped on the page. Files the browser handed over
/// without contents are skipped.
pub fn dropped_uploads(files: &[egui::DroppedFile], kind: UploadKind) -> Vec<UiAction> {
    files
        .iter()
        .filter_map(|file| {
            let Some(bytes) = file.bytes.as_ref() else {
                log::warn!("Dropped file {} has no contents", file.name);
                return None;
            };
            Some(UiAction::Upload(FileUpload {
                file_name: file.name.clone(),
                bytes: bytes.to_vec(),
                kind,
            }))
        })
        .collect()
}
