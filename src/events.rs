//! Observable navigation events.
//!
//! Every navigation request that reaches route resolution emits
//! [`NavigationEvent::Started`] followed by exactly one of
//! [`NavigationEvent::Succeeded`] or [`NavigationEvent::Failed`].
//! `go_back`/`go_forward` with no adjacent entry emit nothing. A deferred
//! request dropped at the replay limit emits a lone `Failed` with
//! [`FailureReason::RedirectLimit`].
//!
//! Listeners run synchronously, in subscription order, with no router state
//! borrowed; they may call back into the service.
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use shell_navigator::{EventBus, NavigationEvent, RouteParams};
//!
//! let bus = EventBus::new();
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let sink = Rc::clone(&seen);
//! let id = bus.subscribe(move |event| sink.borrow_mut().push(event.path().to_string()));
//!
//! bus.emit(&NavigationEvent::Started {
//!     context: "main".into(),
//!     path: "/dashboard".into(),
//!     params: RouteParams::new(),
//! });
//! assert_eq!(*seen.borrow(), vec!["/dashboard"]);
//! assert!(bus.unsubscribe(id));
//! ```

use crate::error::FailureReason;
use crate::params::RouteParams;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// A navigation lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationEvent {
    /// `navigation_started(path, params)`
    Started {
        context: String,
        path: String,
        params: RouteParams,
    },
    /// `navigation_succeeded(path, params)`
    Succeeded {
        context: String,
        path: String,
        params: RouteParams,
    },
    /// `navigation_failed(path, reason)`
    Failed {
        context: String,
        path: String,
        reason: FailureReason,
    },
}

impl NavigationEvent {
    /// Context the navigation ran in.
    pub fn context(&self) -> &str {
        match self {
            NavigationEvent::Started { context, .. }
            | NavigationEvent::Succeeded { context, .. }
            | NavigationEvent::Failed { context, .. } => context,
        }
    }

    /// Target path of the navigation.
    pub fn path(&self) -> &str {
        match self {
            NavigationEvent::Started { path, .. }
            | NavigationEvent::Succeeded { path, .. }
            | NavigationEvent::Failed { path, .. } => path,
        }
    }

    /// Short event name: `navigation_started`, `navigation_succeeded` or
    /// `navigation_failed`.
    pub fn name(&self) -> &'static str {
        match self {
            NavigationEvent::Started { .. } => "navigation_started",
            NavigationEvent::Succeeded { .. } => "navigation_succeeded",
            NavigationEvent::Failed { .. } => "navigation_failed",
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, NavigationEvent::Failed { .. })
    }
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Rc<dyn Fn(&NavigationEvent)>;

/// Synchronous event dispatcher.
#[derive(Default)]
pub struct EventBus {
    listeners: RefCell<Vec<(SubscriptionId, Listener)>>,
    next_id: Cell<u64>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&NavigationEvent) + 'static,
    {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        self.listeners.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    /// Deliver `event` to every listener registered at the time of the call.
    pub fn emit(&self, event: &NavigationEvent) {
        let snapshot: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        for listener in snapshot {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failed(path: &str) -> NavigationEvent {
        NavigationEvent::Failed {
            context: "main".into(),
            path: path.into(),
            reason: FailureReason::RouteNotFound,
        }
    }

    #[test]
    fn test_event_accessors() {
        let event = failed("/missing");
        assert_eq!(event.context(), "main");
        assert_eq!(event.path(), "/missing");
        assert_eq!(event.name(), "navigation_failed");
        assert!(event.is_failure());
    }

    #[test]
    fn test_listeners_in_subscription_order() {
        let bus = EventBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        for tag in ["first", "second"] {
            let log = Rc::clone(&log);
            bus.subscribe(move |_| log.borrow_mut().push(tag));
        }

        bus.emit(&failed("/x"));
        assert_eq!(*log.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn test_listener_may_subscribe_during_emit() {
        let bus = Rc::new(EventBus::new());
        let inner = Rc::clone(&bus);
        bus.subscribe(move |_| {
            inner.subscribe(|_| {});
        });

        bus.emit(&failed("/x"));
        assert_eq!(bus.listener_count(), 2);
    }

    #[test]
    fn test_unsubscribe() {
        let bus = EventBus::new();
        let id = bus.subscribe(|_| {});
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        assert_eq!(bus.listener_count(), 0);
    }
}
