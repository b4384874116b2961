//! egui panels for the chat client.
//!
//! Panels draw a [`view::FrameView`] snapshot and report user intent as
//! [`panels::UiAction`]s; they never touch the core directly.

pub mod panels;
pub mod state;
pub mod theme;
pub mod view;

#[cfg(test)]
mod tests;
