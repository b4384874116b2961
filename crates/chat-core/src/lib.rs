//! Client-side conversation core.
//!
//! Owns the session registry, the message store and the streaming flag
//! (composed into [`state::ChatState`]), supervises the single live
//! completion stream, and reconciles routes with session state. Everything
//! talks to the outside world through the traits in [`ports`].

pub mod ports;
pub mod event_bus;
pub mod registry;
pub mod store;
pub mod state;
pub mod sync;
pub mod supervisor;
pub mod controller;
