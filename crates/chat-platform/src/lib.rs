//! Browser adapters for the chat core.
//!
//! `HttpBackend` talks to the REST API and opens the server-push completion
//! channel, `BrowserNavigator` mirrors routes into the History API, and
//! `BrowserSpawner` runs core tasks on the browser event loop.

pub mod api;
pub mod navigation;
pub mod spawner;

pub use api::HttpBackend;
pub use navigation::{BrowserNavigator, RouteWatcher};
pub use spawner::BrowserSpawner;
