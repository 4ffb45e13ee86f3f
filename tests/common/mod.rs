//! Test utilities for navigation tests
//!
//! Provides recording views, route fixtures and an event recorder shared by
//! the integration suites.

#![allow(dead_code)]

use shell_navigator::*;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Route logs to the test harness output. Safe to call from every test.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// ============================================================================
// Views
// ============================================================================

/// View that records every hook call and can veto leaving it.
#[derive(Default)]
pub struct RecordingView {
    pub label: String,
    pub veto: Cell<bool>,
    pub route_info: RefCell<Option<(String, RouteParams)>>,
    pub leave_requests: RefCell<Vec<String>>,
    pub arrivals: RefCell<Vec<(String, RouteParams)>>,
}

impl RecordingView {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            ..Self::default()
        }
    }

    pub fn arrival_count(&self) -> usize {
        self.arrivals.borrow().len()
    }

    pub fn last_arrival(&self) -> Option<(String, RouteParams)> {
        self.arrivals.borrow().last().cloned()
    }
}

impl View for RecordingView {
    fn set_route_info(&self, path: &str, params: &RouteParams) {
        *self.route_info.borrow_mut() = Some((path.to_string(), params.clone()));
    }

    fn before_navigate_from(&self, next_path: &str, _next_params: &RouteParams) -> bool {
        self.leave_requests.borrow_mut().push(next_path.to_string());
        !self.veto.get()
    }

    fn after_navigate_to(&self, path: &str, params: &RouteParams) {
        self.arrivals
            .borrow_mut()
            .push((path.to_string(), params.clone()));
    }

    fn view_name(&self) -> &'static str {
        "RecordingView"
    }
}

/// View that navigates elsewhere from its `after_navigate_to` hook.
pub struct RedirectView {
    pub target: String,
    pub service: RefCell<Option<Weak<NavigationService>>>,
    pub outcomes: RefCell<Vec<Result<NavigationResult, NavigationError>>>,
}

impl RedirectView {
    pub fn new(target: &str) -> Self {
        Self {
            target: target.to_string(),
            service: RefCell::new(None),
            outcomes: RefCell::new(Vec::new()),
        }
    }

    pub fn attach(&self, service: &Rc<NavigationService>) {
        *self.service.borrow_mut() = Some(Rc::downgrade(service));
    }
}

impl View for RedirectView {
    fn after_navigate_to(&self, _path: &str, _params: &RouteParams) {
        let service = self.service.borrow().as_ref().and_then(Weak::upgrade);
        if let Some(service) = service {
            let outcome = service.navigate_to(&self.target, RouteParams::new(), MAIN_CONTEXT);
            self.outcomes.borrow_mut().push(outcome);
        }
    }
}

// ============================================================================
// Routes
// ============================================================================

/// Route whose factory builds a fresh [`RecordingView`] and counts builds.
pub fn recording_route(path: &str, builds: &Rc<Cell<usize>>) -> RouteConfig {
    let builds = Rc::clone(builds);
    let label = path.to_string();
    RouteConfig::new(path, move |_cx| {
        builds.set(builds.get() + 1);
        Ok(Rc::new(RecordingView::new(&label)) as ViewRef)
    })
}

/// Route that always hands out the same shared view.
pub fn shared_route(path: &str, view: &Rc<RecordingView>) -> RouteConfig {
    let view = Rc::clone(view);
    RouteConfig::new(path, move |_cx| Ok(Rc::clone(&view) as ViewRef))
}

/// Route whose factory always fails with `message`.
pub fn failing_route(path: &str, message: &'static str) -> RouteConfig {
    RouteConfig::new(path, move |_cx| Err(message.into()))
}

/// Route table of a small recipe-planner shell.
pub fn planner_routes() -> Vec<RouteConfig> {
    vec![
        RouteConfig::view("/dashboard", || RecordingView::new("dashboard"))
            .title("Dashboard")
            .cached(true),
        RouteConfig::view("/recipes/browse", || RecordingView::new("browse"))
            .title("Browse Recipes"),
        RouteConfig::view("/recipes/{id}", || RecordingView::new("recipe")).title("Recipe"),
        RouteConfig::view("/meal-plan/{week}/{day}", || RecordingView::new("meal-plan")),
        RouteConfig::view("/shopping-list", || RecordingView::new("shopping"))
            .view_type(ViewType::Embedded),
        RouteConfig::view("/settings", || RecordingView::new("settings"))
            .view_type(ViewType::Modal),
    ]
}

/// Service over [`planner_routes`] displaying into a fresh [`SlotHost`].
pub fn planner_service() -> (NavigationService, Rc<SlotHost>) {
    init_logging();
    let host = Rc::new(SlotHost::new());
    let service = NavigationService::create(host.clone());
    service.register_all(planner_routes());
    (service, host)
}

// ============================================================================
// Events
// ============================================================================

/// Collects every event emitted by a service.
#[derive(Clone, Default)]
pub struct EventRecorder {
    events: Rc<RefCell<Vec<NavigationEvent>>>,
}

impl EventRecorder {
    pub fn attach(service: &NavigationService) -> Self {
        let recorder = Self::default();
        let sink = Rc::clone(&recorder.events);
        service.subscribe(move |event| sink.borrow_mut().push(event.clone()));
        recorder
    }

    pub fn events(&self) -> Vec<NavigationEvent> {
        self.events.borrow().clone()
    }

    /// `name path` pairs, e.g. `navigation_started /dashboard`.
    pub fn summary(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .map(|event| format!("{} {}", event.name(), event.path()))
            .collect()
    }

    pub fn failures(&self) -> Vec<FailureReason> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                NavigationEvent::Failed { reason, .. } => Some(reason.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

// ============================================================================
// Assertions
// ============================================================================

/// Path of the current entry of `context`.
pub fn current_path(service: &NavigationService, context: &str) -> Option<String> {
    service
        .get_current_route(context)
        .map(|entry| entry.path().to_string())
}

/// Paths of every history entry of `context`, oldest first.
pub fn history_paths(service: &NavigationService, context: &str) -> Vec<String> {
    service
        .history(context)
        .map(|stack| {
            stack
                .entries()
                .iter()
                .map(|entry| entry.path().to_string())
                .collect()
        })
        .unwrap_or_default()
}

/// Assert that route parameters contain expected key-value pair
pub fn assert_param_equals(params: &RouteParams, key: &str, expected: &str) {
    assert_eq!(
        params.get(key),
        Some(expected),
        "Parameter '{}' has wrong value",
        key
    );
}
