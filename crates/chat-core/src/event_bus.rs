//! Event queue from the chat core to the UI.
//!
//! Stream chunks and background fetches land from spawned tasks, outside
//! any UI frame, so the bus can carry a notifier that the UI installs to
//! schedule a repaint. The UI drains the queue on the next frame.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use chat_types::event::ChatEvent;

type Notifier = Rc<dyn Fn()>;

/// Clone-cheap handle; all clones share one queue.
#[derive(Clone, Default)]
pub struct EventBus {
    queue: Rc<RefCell<VecDeque<ChatEvent>>>,
    notifier: Rc<RefCell<Option<Notifier>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the callback run after every emit.
    pub fn set_notifier(&self, notify: impl Fn() + 'static) {
        *self.notifier.borrow_mut() = Some(Rc::new(notify));
    }

    pub fn emit(&self, event: ChatEvent) {
        log::debug!("chat event: {:?}", event);
        self.queue.borrow_mut().push_back(event);
        // clone out so the callback may emit again
        let notify = self.notifier.borrow().clone();
        if let Some(notify) = notify {
            notify();
        }
    }

    pub fn drain(&self) -> Vec<ChatEvent> {
        self.queue.borrow_mut().drain(..).collect()
    }

    pub fn has_pending(&self) -> bool {
        !self.queue.borrow().is_empty()
    }
}
