//! Navigation contexts.
//!
//! A [`NavigationContext`] is one independently navigable region of the
//! shell: it pairs a [`ViewHost`] with its own [`NavigationStack`] and the
//! view currently shown there. The service always has a `"main"` context;
//! others (a side panel, a modal layer) are added by name.
//!
//! Each context also carries the reentrancy guard: while a transition is
//! running, further requests for the same context are queued and replayed
//! in order once it completes.

use crate::history::{NavigationEntry, NavigationStack};
use crate::params::RouteParams;
use crate::view::{ViewHost, ViewRef};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

/// Name of the context every service starts with.
pub const MAIN_CONTEXT: &str = "main";

/// A queued request for a context that was mid-transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PendingNavigation {
    Navigate { path: String, params: RouteParams },
    Back,
    Forward,
}

impl PendingNavigation {
    /// Path for log and event output.
    pub(crate) fn describe(&self) -> &str {
        match self {
            PendingNavigation::Navigate { path, .. } => path,
            PendingNavigation::Back => "<back>",
            PendingNavigation::Forward => "<forward>",
        }
    }
}

/// One navigable region: host, history and displayed view.
pub struct NavigationContext {
    name: String,
    host: Rc<dyn ViewHost>,
    stack: NavigationStack,
    current_view: Option<ViewRef>,
    in_transition: bool,
    pending: VecDeque<PendingNavigation>,
}

impl NavigationContext {
    pub(crate) fn new(name: impl Into<String>, host: Rc<dyn ViewHost>) -> Self {
        Self {
            name: name.into(),
            host,
            stack: NavigationStack::new(),
            current_view: None,
            in_transition: false,
            pending: VecDeque::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The host this context displays into.
    pub fn host(&self) -> &Rc<dyn ViewHost> {
        &self.host
    }

    /// History of this context.
    pub fn stack(&self) -> &NavigationStack {
        &self.stack
    }

    /// View shown by the last successful navigation.
    pub fn current_view(&self) -> Option<&ViewRef> {
        self.current_view.as_ref()
    }

    /// Whether a transition is running in this context right now.
    pub fn in_transition(&self) -> bool {
        self.in_transition
    }

    /// Number of requests waiting for the running transition.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Record a completed forward navigation.
    pub(crate) fn commit_push(&mut self, entry: NavigationEntry, view: ViewRef) {
        self.stack.push(entry);
        self.current_view = Some(view);
    }

    /// Record a completed back/forward move. Returns `false` if the stack
    /// could not move (history changed under the transition).
    pub(crate) fn commit_move(&mut self, back: bool, view: ViewRef) -> bool {
        let moved = if back {
            self.stack.back().is_some()
        } else {
            self.stack.forward().is_some()
        };
        if moved {
            self.current_view = Some(view);
        }
        moved
    }

    /// Claim the context for a transition. Returns `false` if one is
    /// already running.
    pub(crate) fn begin_transition(&mut self) -> bool {
        if self.in_transition {
            return false;
        }
        self.in_transition = true;
        true
    }

    pub(crate) fn defer(&mut self, request: PendingNavigation) {
        self.pending.push_back(request);
    }

    /// Next queued request; releases the context when the queue is empty.
    pub(crate) fn next_pending(&mut self) -> Option<PendingNavigation> {
        let next = self.pending.pop_front();
        if next.is_none() {
            self.in_transition = false;
        }
        next
    }

    /// Release the context after a transition unwound, dropping whatever
    /// was queued behind it. Returns the number of dropped requests.
    pub(crate) fn abort_transition(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        self.in_transition = false;
        dropped
    }
}

impl fmt::Debug for NavigationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationContext")
            .field("name", &self.name)
            .field("stack", &self.stack)
            .field(
                "current_view",
                &self.current_view.as_ref().map(|view| view.view_name()),
            )
            .field("in_transition", &self.in_transition)
            .field("pending", &self.pending)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{same_view, SlotHost, View};

    struct Page;
    impl View for Page {}

    fn context() -> NavigationContext {
        NavigationContext::new(MAIN_CONTEXT, Rc::new(SlotHost::new()))
    }

    #[test]
    fn test_new_context_is_empty() {
        let cx = context();
        assert_eq!(cx.name(), "main");
        assert!(cx.stack().is_empty());
        assert!(cx.current_view().is_none());
        assert!(!cx.in_transition());
    }

    #[test]
    fn test_commit_push_and_move() {
        let mut cx = context();
        let a: ViewRef = Rc::new(Page);
        let b: ViewRef = Rc::new(Page);
        cx.commit_push(NavigationEntry::new("/a", RouteParams::new(), "main"), a.clone());
        cx.commit_push(NavigationEntry::new("/b", RouteParams::new(), "main"), b.clone());
        assert!(same_view(cx.current_view().unwrap(), &b));

        assert!(cx.commit_move(true, a.clone()));
        assert!(same_view(cx.current_view().unwrap(), &a));
        assert_eq!(cx.stack().current().unwrap().path(), "/a");

        // Nothing before "/a": the view reference stays put
        assert!(!cx.commit_move(true, b));
        assert!(same_view(cx.current_view().unwrap(), &a));
    }

    #[test]
    fn test_transition_guard_and_queue() {
        let mut cx = context();
        assert!(cx.begin_transition());
        assert!(!cx.begin_transition());

        cx.defer(PendingNavigation::Back);
        cx.defer(PendingNavigation::Navigate {
            path: "/x".into(),
            params: RouteParams::new(),
        });
        assert_eq!(cx.pending_count(), 2);

        assert_eq!(cx.next_pending(), Some(PendingNavigation::Back));
        assert_eq!(cx.next_pending().unwrap().describe(), "/x");
        assert!(cx.in_transition());

        assert_eq!(cx.next_pending(), None);
        assert!(!cx.in_transition());
    }

    #[test]
    fn test_abort_transition_releases_and_clears() {
        let mut cx = context();
        assert!(cx.begin_transition());
        cx.defer(PendingNavigation::Forward);
        cx.defer(PendingNavigation::Back);

        assert_eq!(cx.abort_transition(), 2);
        assert!(!cx.in_transition());
        assert_eq!(cx.pending_count(), 0);
        assert!(cx.begin_transition());
    }
}
