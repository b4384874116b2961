//! Route sync with the address bar through the History API.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::{Event, Window};

use chat_core::ports::NavigatorPort;
use chat_types::{
    ChatError, Result,
    route::{HistoryMode, Route},
};

fn window() -> Result<Window> {
    web_sys::window().ok_or_else(|| ChatError::JsInterop("no window".to_string()))
}

/// Route for the path currently in the address bar.
///
/// Paths outside the chat surface land on the index (and so on `/chat/new`).
pub fn current_route() -> Route {
    let path = window().and_then(|w| {
        w.location()
            .pathname()
            .map_err(|e| ChatError::JsInterop(format!("{:?}", e)))
    });
    match path {
        Ok(path) => route_or_index(&path),
        Err(e) => {
            log::warn!("Could not read location: {}", e);
            Route::Index
        }
    }
}

pub fn route_or_index(path: &str) -> Route {
    path.parse().unwrap_or_else(|e: ChatError| {
        log::warn!("{}; falling back to /chat", e);
        Route::Index
    })
}

#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserNavigator;

impl BrowserNavigator {
    pub fn new() -> Self {
        Self
    }

    fn apply(&self, route: &Route, mode: HistoryMode) -> Result<()> {
        let history = window()?
            .history()
            .map_err(|e| ChatError::JsInterop(format!("history: {:?}", e)))?;
        let path = route.path();
        let result = match mode {
            HistoryMode::Push => history.push_state_with_url(&JsValue::NULL, "", Some(&path)),
            HistoryMode::Replace => history.replace_state_with_url(&JsValue::NULL, "", Some(&path)),
        };
        result.map_err(|e| ChatError::JsInterop(format!("{:?} {}: {:?}", mode, path, e)))
    }
}

impl NavigatorPort for BrowserNavigator {
    fn navigate(&self, route: &Route, mode: HistoryMode) {
        if let Err(e) = self.apply(route, mode) {
            log::warn!("Navigation failed: {}", e);
        }
    }
}

/// Collects back/forward navigations (`popstate`) until the UI picks them up.
pub struct RouteWatcher {
    pending: Rc<RefCell<Option<Route>>>,
    listener: Closure<dyn FnMut(Event)>,
}

impl RouteWatcher {
    pub fn install() -> Result<Self> {
        let pending = Rc::new(RefCell::new(None));

        let slot = pending.clone();
        let listener = Closure::wrap(Box::new(move |_event: Event| {
            *slot.borrow_mut() = Some(current_route());
        }) as Box<dyn FnMut(Event)>);

        window()?
            .add_event_listener_with_callback("popstate", listener.as_ref().unchecked_ref())
            .map_err(|e| ChatError::JsInterop(format!("popstate listener: {:?}", e)))?;

        Ok(Self { pending, listener })
    }

    /// The latest route the user moved to, if any since the last call
    pub fn take(&self) -> Option<Route> {
        self.pending.borrow_mut().take()
    }
}

impl Drop for RouteWatcher {
    fn drop(&mut self) {
        if let Ok(window) = window() {
            let _ = window.remove_event_listener_with_callback(
                "popstate",
                self.listener.as_ref().unchecked_ref(),
            );
        }
    }
}
