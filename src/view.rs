//! View and view-host contracts.
//!
//! The router never renders anything itself. It talks to two collaborators:
//!
//! - [`View`]: what a view factory produces. Every method has a default, so
//!   a view opts into exactly the lifecycle hooks it cares about:
//!   - [`set_route_info`](View::set_route_info): told its resolved path and
//!     params right after construction
//!   - [`before_navigate_from`](View::before_navigate_from): may veto leaving
//!     the view (e.g. an editor with unsaved changes)
//!   - [`after_navigate_to`](View::after_navigate_to): runs once the view is
//!     displayed and history is updated
//! - [`ViewHost`]: one per navigation context, swaps the visible view.
//!
//! All hooks are **synchronous** and take `&self`; views that keep state use
//! interior mutability. Hooks may call back into the
//! [`NavigationService`](crate::NavigationService).
//!
//! # Example
//!
//! ```
//! use std::cell::Cell;
//! use shell_navigator::{RouteParams, View};
//!
//! struct RecipeEditor {
//!     dirty: Cell<bool>,
//! }
//!
//! impl View for RecipeEditor {
//!     fn before_navigate_from(&self, _next_path: &str, _next_params: &RouteParams) -> bool {
//!         !self.dirty.get()
//!     }
//! }
//!
//! let editor = RecipeEditor { dirty: Cell::new(true) };
//! assert!(!editor.before_navigate_from("/dashboard", &RouteParams::new()));
//! ```

use crate::params::RouteParams;
use crate::route::RouteMatch;
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Shared handle to a constructed view.
pub type ViewRef = Rc<dyn View>;

/// Return `true` if both handles point at the same view instance.
pub fn same_view(a: &ViewRef, b: &ViewRef) -> bool {
    Rc::ptr_eq(a, b)
}

// ============================================================================
// View
// ============================================================================

/// A routable view with optional lifecycle capabilities.
pub trait View: 'static {
    /// Informs a freshly constructed view of the path and params it was
    /// built for. Default: no-op.
    fn set_route_info(&self, _path: &str, _params: &RouteParams) {}

    /// Asked before navigating away from this view.
    ///
    /// Return `false` to veto the navigation; the router then leaves every
    /// piece of state untouched. Default: `true`.
    fn before_navigate_from(&self, _next_path: &str, _next_params: &RouteParams) -> bool {
        true
    }

    /// Called after this view has been displayed and history updated.
    /// Default: no-op.
    fn after_navigate_to(&self, _path: &str, _params: &RouteParams) {}

    /// Name used in log output.
    fn view_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

// ============================================================================
// ViewHost
// ============================================================================

/// Display surface of one navigation context (a window body, a side panel,
/// a modal layer...).
pub trait ViewHost {
    /// Make `view` the visible view, replacing the previous one.
    fn display(&self, view: ViewRef);

    /// The view currently visible, if any.
    fn current(&self) -> Option<ViewRef>;
}

/// In-memory [`ViewHost`] holding a single view slot.
///
/// Useful for headless shells and tests. Counts how many times a view was
/// displayed.
#[derive(Default)]
pub struct SlotHost {
    slot: RefCell<Option<ViewRef>>,
    displays: Cell<usize>,
}

impl SlotHost {
    /// Create an empty host.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `display` calls so far.
    pub fn display_count(&self) -> usize {
        self.displays.get()
    }
}

impl ViewHost for SlotHost {
    fn display(&self, view: ViewRef) {
        *self.slot.borrow_mut() = Some(view);
        self.displays.set(self.displays.get() + 1);
    }

    fn current(&self) -> Option<ViewRef> {
        self.slot.borrow().clone()
    }
}

impl fmt::Debug for SlotHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotHost")
            .field(
                "current",
                &self.slot.borrow().as_ref().map(|view| view.view_name()),
            )
            .field("displays", &self.displays.get())
            .finish()
    }
}

// ============================================================================
// Factory arguments
// ============================================================================

/// Extra, typed arguments forwarded to every view factory.
///
/// This is how collaborators such as domain services reach the views the
/// router builds without the router knowing their types.
///
/// ```
/// use shell_navigator::ViewArgs;
///
/// struct RecipeService { name: &'static str }
///
/// let mut args = ViewArgs::new();
/// args.insert("recipes", RecipeService { name: "sqlite" });
///
/// assert_eq!(args.get::<RecipeService>("recipes").map(|s| s.name), Some("sqlite"));
/// assert!(args.get::<String>("recipes").is_none());
/// ```
#[derive(Clone, Default)]
pub struct ViewArgs {
    values: HashMap<String, Rc<dyn Any>>,
}

impl ViewArgs {
    /// Create an empty argument set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value under `key`, replacing any previous value.
    pub fn insert<T: Any>(&mut self, key: impl Into<String>, value: T) {
        self.values.insert(key.into(), Rc::new(value));
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with<T: Any>(mut self, key: impl Into<String>, value: T) -> Self {
        self.insert(key, value);
        self
    }

    /// Borrow the value under `key` if it exists and has type `T`.
    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        self.values.get(key)?.downcast_ref::<T>()
    }

    /// Return `true` if a value is stored under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Return `true` if no arguments are stored.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for ViewArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.values.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("ViewArgs").field("keys", &keys).finish()
    }
}

/// What a view factory sees when asked to build a view.
#[derive(Debug, Clone, Copy)]
pub struct ViewContext<'a> {
    route_match: &'a RouteMatch,
    args: &'a ViewArgs,
}

impl<'a> ViewContext<'a> {
    pub(crate) fn new(route_match: &'a RouteMatch, args: &'a ViewArgs) -> Self {
        Self { route_match, args }
    }

    /// The match the view is built for.
    pub fn route_match(&self) -> &'a RouteMatch {
        self.route_match
    }

    /// Resolved concrete path.
    pub fn path(&self) -> &'a str {
        self.route_match.path()
    }

    /// Captured and caller-supplied params.
    pub fn params(&self) -> &'a RouteParams {
        self.route_match.params()
    }

    /// Extra arguments.
    pub fn args(&self) -> &'a ViewArgs {
        self.args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plain;
    impl View for Plain {}

    #[test]
    fn test_default_hooks() {
        let view = Plain;
        assert!(view.before_navigate_from("/next", &RouteParams::new()));
        view.set_route_info("/here", &RouteParams::new());
        view.after_navigate_to("/here", &RouteParams::new());
        assert!(view.view_name().ends_with("Plain"));
    }

    #[test]
    fn test_slot_host_display() {
        let host = SlotHost::new();
        assert!(host.current().is_none());

        let view: ViewRef = Rc::new(Plain);
        host.display(view.clone());

        assert!(same_view(&host.current().unwrap(), &view));
        assert_eq!(host.display_count(), 1);
    }

    #[test]
    fn test_same_view_distinguishes_instances() {
        let a: ViewRef = Rc::new(Plain);
        let b: ViewRef = Rc::new(Plain);
        assert!(same_view(&a, &a.clone()));
        assert!(!same_view(&a, &b));
    }

    #[test]
    fn test_view_args_typed_access() {
        let args = ViewArgs::new().with("user", 7_u32).with("locale", "en");
        assert_eq!(args.get::<u32>("user"), Some(&7));
        assert_eq!(args.get::<&str>("locale"), Some(&"en"));
        assert!(args.get::<i64>("user").is_none());
        assert!(args.contains("locale"));
        assert!(!ViewArgs::new().contains("user"));
    }
}
