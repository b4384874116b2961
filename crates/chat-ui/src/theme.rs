//! Light chat palette: gray surfaces, blue for the user and for actions.

use egui::{Color32, CornerRadius, Margin, Stroke, Vec2, Visuals};

// Surfaces
pub const CANVAS: Color32 = Color32::WHITE;
pub const SIDEBAR_FILL: Color32 = Color32::from_rgb(243, 244, 246);
pub const CARD_FILL: Color32 = Color32::from_rgb(249, 250, 251);
pub const CONTROL_FILL: Color32 = Color32::from_rgb(229, 231, 235);
pub const BORDER: Color32 = Color32::from_rgb(209, 213, 219);

// Bubbles
pub const USER_BUBBLE: Color32 = Color32::from_rgb(59, 130, 246);
pub const ASSISTANT_BUBBLE: Color32 = SIDEBAR_FILL;
pub const FAILED_BUBBLE: Color32 = Color32::from_rgb(254, 242, 242);

// Text
pub const INK: Color32 = Color32::from_rgb(17, 24, 39);
pub const MUTED: Color32 = Color32::from_rgb(107, 114, 128);
pub const ON_ACCENT: Color32 = Color32::WHITE;

// Accents and status
pub const ACCENT: Color32 = USER_BUBBLE;
pub const ACCENT_PRESSED: Color32 = Color32::from_rgb(37, 99, 235);
pub const ACCENT_SOFT: Color32 = Color32::from_rgb(219, 234, 254);
pub const READY: Color32 = Color32::from_rgb(22, 163, 74);
pub const BUSY: Color32 = Color32::from_rgb(217, 119, 6);
pub const DANGER: Color32 = Color32::from_rgb(239, 68, 68);

pub const CONTROL_ROUNDING: CornerRadius = CornerRadius::same(8);
pub const BUBBLE_ROUNDING: CornerRadius = CornerRadius::same(12);
pub const FRAME_MARGIN: Margin = Margin::symmetric(14, 10);
pub const BUBBLE_MARGIN: Margin = Margin::symmetric(12, 8);
pub const SIDEBAR_WIDTH: f32 = 256.0;

pub fn apply_theme(ctx: &egui::Context) {
    let mut visuals = Visuals::light();
    visuals.panel_fill = CANVAS;
    visuals.window_fill = CARD_FILL;
    visuals.extreme_bg_color = CANVAS;
    visuals.window_stroke = Stroke::new(1.0, BORDER);

    let widgets = &mut visuals.widgets;
    widgets.noninteractive.bg_stroke = Stroke::new(1.0, BORDER);
    widgets.inactive.bg_fill = CONTROL_FILL;
    widgets.inactive.weak_bg_fill = CONTROL_FILL;
    widgets.inactive.fg_stroke = Stroke::new(1.0, INK);
    widgets.hovered.bg_fill = ACCENT_SOFT;
    widgets.hovered.weak_bg_fill = ACCENT_SOFT;
    widgets.hovered.bg_stroke = Stroke::new(1.0, ACCENT);
    widgets.active.bg_fill = ACCENT_PRESSED;
    widgets.active.weak_bg_fill = ACCENT_PRESSED;
    widgets.active.fg_stroke = Stroke::new(1.0, ON_ACCENT);

    visuals.selection.bg_fill = ACCENT_SOFT;
    visuals.selection.stroke = Stroke::new(1.0, ACCENT_PRESSED);
    visuals.text_cursor.stroke = Stroke::new(2.0, ACCENT);

    ctx.set_theme(egui::Theme::Light);
    ctx.set_visuals(visuals);
    ctx.style_mut(|style| {
        style.spacing.item_spacing = Vec2::new(6.0, 8.0);
        style.spacing.button_padding = Vec2::new(10.0, 4.0);
    });
}
