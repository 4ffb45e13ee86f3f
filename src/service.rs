//! The navigation service.
//!
//! [`NavigationService`] owns a [`RouteTable`] and a set of named
//! [`NavigationContext`]s, and runs the navigation pipeline:
//!
//! 1. emit `navigation_started`
//! 2. resolve the path through the route table (miss → `navigation_failed`)
//! 3. get or build the view (factory error → `navigation_failed` + `Err`)
//! 4. ask the outgoing view's `before_navigate_from` (false → `navigation_failed`)
//! 5. host `display`, then update history and the context's current view
//! 6. call the incoming view's `after_navigate_to`
//! 7. emit `navigation_succeeded`
//!
//! Back/forward run the same pipeline against the adjacent history entry and
//! only move the history position instead of pushing.
//!
//! All methods take `&self`. No internal borrow is held while factories,
//! hooks, hosts or event listeners run, so those may call back into the
//! service. A request for a context that is already mid-transition is
//! queued and returns [`NavigationResult::Deferred`]; the queue is replayed
//! once the running transition finishes.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use shell_navigator::{NavigationService, RouteConfig, RouteParams, SlotHost, View, MAIN_CONTEXT};
//!
//! struct Page;
//! impl View for Page {}
//!
//! let service = NavigationService::create(Rc::new(SlotHost::new()));
//! service.register_route(RouteConfig::view("/dashboard", || Page));
//! service.register_route(RouteConfig::view("/recipes/{id}", || Page));
//!
//! assert!(service.navigate("/dashboard").unwrap().is_success());
//! assert!(service
//!     .navigate_to("/recipes/7", RouteParams::new(), MAIN_CONTEXT)
//!     .unwrap()
//!     .is_success());
//!
//! assert!(service.go_back(MAIN_CONTEXT).unwrap().is_success());
//! assert_eq!(service.get_current_route(MAIN_CONTEXT).unwrap().path(), "/dashboard");
//! ```

use crate::cache::CacheStats;
use crate::context::{NavigationContext, PendingNavigation, MAIN_CONTEXT};
use crate::error::{FailureReason, NavigationError, NavigationResult};
use crate::events::{EventBus, NavigationEvent, SubscriptionId};
use crate::history::{NavigationEntry, NavigationStack};
use crate::matching::normalize_path;
use crate::params::RouteParams;
use crate::registry::RouteTable;
use crate::route::{RouteConfig, RouteMatch, ViewType};
use crate::view::{ViewArgs, ViewHost, ViewRef};
use crate::{debug_log, error_log, info_log, trace_log, warn_log};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Default cap on deferred navigations replayed for one outer call.
const DEFAULT_MAX_DEFERRED: usize = 16;

// ============================================================================
// Options
// ============================================================================

/// Service configuration.
///
/// ```
/// use shell_navigator::NavigatorOptions;
///
/// let options = NavigatorOptions::new()
///     .with_max_deferred(4)
///     .with_warm_cache(true);
/// assert_eq!(options.max_deferred_navigations, 4);
/// assert!(options.warm_cache_on_start);
/// ```
#[derive(Debug, Clone)]
pub struct NavigatorOptions {
    /// How many queued navigations one outer call replays before dropping
    /// the rest. Breaks redirect loops between lifecycle hooks.
    pub max_deferred_navigations: usize,
    /// Build eager (`lazy_load(false)`) cached routes during construction.
    pub warm_cache_on_start: bool,
    /// Extra arguments forwarded to every view factory.
    pub view_args: ViewArgs,
}

impl NavigatorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_deferred(mut self, max: usize) -> Self {
        self.max_deferred_navigations = max;
        self
    }

    pub fn with_warm_cache(mut self, warm: bool) -> Self {
        self.warm_cache_on_start = warm;
        self
    }

    pub fn with_view_args(mut self, args: ViewArgs) -> Self {
        self.view_args = args;
        self
    }
}

impl Default for NavigatorOptions {
    fn default() -> Self {
        Self {
            max_deferred_navigations: DEFAULT_MAX_DEFERRED,
            warm_cache_on_start: false,
            view_args: ViewArgs::new(),
        }
    }
}

// ============================================================================
// NavigationService
// ============================================================================

/// Direction of a committed transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Push,
    Back,
    Forward,
}

/// Route resolution, multi-context history and lifecycle dispatch.
pub struct NavigationService {
    routes: RefCell<RouteTable>,
    contexts: RefCell<Vec<NavigationContext>>,
    events: EventBus,
    options: NavigatorOptions,
}

impl NavigationService {
    /// Service with an empty route table and a `"main"` context bound to
    /// `root_host`.
    pub fn create(root_host: Rc<dyn ViewHost>) -> Self {
        Self::new(RouteTable::new(), root_host)
    }

    /// Service over an existing route table.
    pub fn new(routes: RouteTable, root_host: Rc<dyn ViewHost>) -> Self {
        Self::build(routes, root_host, NavigatorOptions::default())
    }

    /// Service with explicit options.
    ///
    /// Fails only when `warm_cache_on_start` is set and an eager view cannot be built.
    pub fn with_options(
        routes: RouteTable,
        root_host: Rc<dyn ViewHost>,
        options: NavigatorOptions,
    ) -> Result<Self, NavigationError> {
        let service = Self::build(routes, root_host, options);
        if service.options.warm_cache_on_start {
            let built = service
                .routes
                .borrow_mut()
                .warm_cache(&service.options.view_args)?;
            info_log!("Pre-built {} eager views", built);
        }
        Ok(service)
    }

    fn build(routes: RouteTable, root_host: Rc<dyn ViewHost>, options: NavigatorOptions) -> Self {
        info_log!(
            "Navigation service created with {} routes",
            routes.len()
        );
        Self {
            routes: RefCell::new(routes),
            contexts: RefCell::new(vec![NavigationContext::new(MAIN_CONTEXT, root_host)]),
            events: EventBus::new(),
            options,
        }
    }

    /// Register an additional independent context.
    pub fn add_context(
        &self,
        name: impl Into<String>,
        host: Rc<dyn ViewHost>,
    ) -> Result<(), NavigationError> {
        let name = name.into();
        let mut contexts = self.contexts.borrow_mut();
        if contexts.iter().any(|cx| cx.name() == name) {
            return Err(NavigationError::DuplicateContext { context: name });
        }
        info_log!("Added navigation context '{}'", name);
        contexts.push(NavigationContext::new(name, host));
        Ok(())
    }

    /// Names of all contexts, in creation order.
    pub fn context_names(&self) -> Vec<String> {
        self.contexts
            .borrow()
            .iter()
            .map(|cx| cx.name().to_string())
            .collect()
    }

    pub fn has_context(&self, name: &str) -> bool {
        self.contexts.borrow().iter().any(|cx| cx.name() == name)
    }

    pub fn options(&self) -> &NavigatorOptions {
        &self.options
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Navigate to `path` in the main context with no extra params.
    pub fn navigate(&self, path: &str) -> Result<NavigationResult, NavigationError> {
        self.navigate_to(path, RouteParams::new(), MAIN_CONTEXT)
    }

    /// Navigate to `path` in `context`.
    ///
    /// `params` are merged over the params captured from the path and are
    /// what the view, hooks and history entry see. Returns `Err` only for an
    /// unknown context or a failing view factory.
    ///
    /// The view of a cached route is built and stored before the outgoing
    /// view is asked to leave, so a vetoed navigation still leaves it in the
    /// cache for the next attempt.
    pub fn navigate_to(
        &self,
        path: &str,
        params: RouteParams,
        context: &str,
    ) -> Result<NavigationResult, NavigationError> {
        self.request(
            context,
            PendingNavigation::Navigate {
                path: normalize_path(path).into_owned(),
                params,
            },
        )
    }

    /// Go one entry back in `context`'s history.
    pub fn go_back(&self, context: &str) -> Result<NavigationResult, NavigationError> {
        self.request(context, PendingNavigation::Back)
    }

    /// Go one entry forward in `context`'s history.
    pub fn go_forward(&self, context: &str) -> Result<NavigationResult, NavigationError> {
        self.request(context, PendingNavigation::Forward)
    }

    /// Run `request` now, or queue it if `context` is mid-transition.
    fn request(
        &self,
        context: &str,
        request: PendingNavigation,
    ) -> Result<NavigationResult, NavigationError> {
        {
            let mut contexts = self.contexts.borrow_mut();
            let cx = find_mut(&mut contexts, context)?;
            if !cx.begin_transition() {
                debug_log!(
                    "Context '{}' is mid-transition; deferring '{}'",
                    context,
                    request.describe()
                );
                cx.defer(request);
                return Ok(NavigationResult::Deferred);
            }
        }

        let claim = TransitionClaim {
            service: self,
            context,
        };
        let result = self.run(context, request);
        self.drain_deferred(context);
        claim.release();
        result
    }

    /// Replay requests queued while `context` was busy, then release it.
    fn drain_deferred(&self, context: &str) {
        let mut replayed = 0;
        loop {
            let next = {
                let mut contexts = self.contexts.borrow_mut();
                match find_mut(&mut contexts, context) {
                    Ok(cx) => cx.next_pending(),
                    Err(_) => None,
                }
            };
            let Some(request) = next else {
                return;
            };

            if replayed >= self.options.max_deferred_navigations {
                error_log!(
                    "Dropping deferred navigation '{}' in '{}': limit of {} reached",
                    request.describe(),
                    context,
                    self.options.max_deferred_navigations
                );
                self.emit(NavigationEvent::Failed {
                    context: context.to_string(),
                    path: request.describe().to_string(),
                    reason: FailureReason::RedirectLimit,
                });
                continue;
            }
            replayed += 1;

            match self.run(context, request) {
                Ok(result) => trace_log!("Deferred navigation finished: {:?}", result),
                Err(err) => error_log!("Deferred navigation failed: {}", err),
            }
        }
    }

    fn run(
        &self,
        context: &str,
        request: PendingNavigation,
    ) -> Result<NavigationResult, NavigationError> {
        match request {
            PendingNavigation::Navigate { path, params } => {
                self.transition(context, Step::Push, &path, &params)
            }
            PendingNavigation::Back => self.step(context, Step::Back),
            PendingNavigation::Forward => self.step(context, Step::Forward),
        }
    }

    /// Back/forward: re-resolve the adjacent entry and run the pipeline.
    fn step(&self, context: &str, step: Step) -> Result<NavigationResult, NavigationError> {
        let target = {
            let contexts = self.contexts.borrow();
            let cx = find(&contexts, context)?;
            let entry = if step == Step::Back {
                cx.stack().peek_back()
            } else {
                cx.stack().peek_forward()
            };
            entry.cloned()
        };

        let Some(entry) = target else {
            trace_log!("No history for {:?} in '{}'", step, context);
            return Ok(NavigationResult::NoHistory);
        };
        self.transition(context, step, entry.path(), entry.params())
    }

    /// The navigation pipeline shared by push, back and forward.
    fn transition(
        &self,
        context: &str,
        step: Step,
        path: &str,
        params: &RouteParams,
    ) -> Result<NavigationResult, NavigationError> {
        self.emit(NavigationEvent::Started {
            context: context.to_string(),
            path: path.to_string(),
            params: params.clone(),
        });

        let matched = self.routes.borrow().match_route(path);
        let Some(route_match) = matched else {
            warn_log!("No route for '{}' in context '{}'", path, context);
            self.fail(context, path, FailureReason::RouteNotFound);
            return Ok(NavigationResult::NotFound {
                path: path.to_string(),
            });
        };
        let route_match = route_match.with_params(params);

        let view = match self.obtain_view(&route_match) {
            Ok(view) => view,
            Err(err) => {
                let message = match &err {
                    NavigationError::ViewConstruction { message, .. } => message.clone(),
                    other => other.to_string(),
                };
                self.fail(context, path, FailureReason::ViewConstruction(message));
                return Err(err);
            }
        };

        let (host, tracked) = {
            let contexts = self.contexts.borrow();
            let cx = find(&contexts, context)?;
            (Rc::clone(cx.host()), cx.current_view().cloned())
        };

        // What the host shows wins over what we last put there
        if let Some(outgoing) = host.current().or(tracked) {
            if !outgoing.before_navigate_from(route_match.path(), route_match.params()) {
                warn_log!(
                    "Navigation to '{}' vetoed by {}",
                    route_match.path(),
                    outgoing.view_name()
                );
                self.fail(context, path, FailureReason::Vetoed);
                return Ok(NavigationResult::Vetoed {
                    path: path.to_string(),
                });
            }
        }

        host.display(Rc::clone(&view));

        {
            let mut contexts = self.contexts.borrow_mut();
            let cx = find_mut(&mut contexts, context)?;
            match step {
                Step::Push => cx.commit_push(
                    NavigationEntry::new(route_match.path(), route_match.params().clone(), context),
                    Rc::clone(&view),
                ),
                Step::Back | Step::Forward => {
                    if !cx.commit_move(step == Step::Back, Rc::clone(&view)) {
                        warn_log!("History of '{}' changed during {:?}", context, step);
                    }
                }
            }
        }

        view.after_navigate_to(route_match.path(), route_match.params());

        info_log!(
            "Navigated {:?} to '{}' in '{}' ({})",
            step,
            route_match.path(),
            context,
            view.view_name()
        );
        self.emit(NavigationEvent::Succeeded {
            context: context.to_string(),
            path: route_match.path().to_string(),
            params: route_match.params().clone(),
        });
        Ok(NavigationResult::Success {
            path: route_match.path().to_string(),
        })
    }

    /// Cached instance or a freshly built one. The factory runs with no
    /// borrow of the route table held.
    fn obtain_view(&self, route_match: &RouteMatch) -> Result<ViewRef, NavigationError> {
        let cached = self.routes.borrow_mut().cached_instance(route_match);
        if let Some(view) = cached {
            return Ok(view);
        }

        let view = route_match
            .config()
            .instantiate(route_match, &self.options.view_args)?;
        self.routes.borrow_mut().store_instance(route_match, &view);
        Ok(view)
    }

    fn fail(&self, context: &str, path: &str, reason: FailureReason) {
        self.emit(NavigationEvent::Failed {
            context: context.to_string(),
            path: path.to_string(),
            reason,
        });
    }

    fn emit(&self, event: NavigationEvent) {
        trace_log!("{} '{}' in '{}'", event.name(), event.path(), event.context());
        self.events.emit(&event);
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Whether `context` has an entry before the current one. `false` for
    /// unknown contexts.
    pub fn can_go_back(&self, context: &str) -> bool {
        self.with_context(context, |cx| cx.stack().can_go_back())
            .unwrap_or(false)
    }

    /// Whether `context` has an entry after the current one. `false` for
    /// unknown contexts.
    pub fn can_go_forward(&self, context: &str) -> bool {
        self.with_context(context, |cx| cx.stack().can_go_forward())
            .unwrap_or(false)
    }

    /// Current history entry of `context`.
    pub fn get_current_route(&self, context: &str) -> Option<NavigationEntry> {
        self.with_context(context, |cx| cx.stack().current().cloned())
            .flatten()
    }

    /// View displayed by the last successful navigation in `context`.
    pub fn get_current_view(&self, context: &str) -> Option<ViewRef> {
        self.with_context(context, |cx| cx.current_view().cloned())
            .flatten()
    }

    /// Snapshot of `context`'s history.
    pub fn history(&self, context: &str) -> Option<NavigationStack> {
        self.with_context(context, |cx| cx.stack().clone())
    }

    /// Title of the route behind `context`'s current entry.
    pub fn current_title(&self, context: &str) -> Option<String> {
        let entry = self.get_current_route(context)?;
        let route_match = self.routes.borrow().match_route(entry.path())?;
        route_match.config().get_title().map(str::to_string)
    }

    fn with_context<R>(&self, context: &str, f: impl FnOnce(&NavigationContext) -> R) -> Option<R> {
        let contexts = self.contexts.borrow();
        find(&contexts, context).ok().map(f)
    }

    // ========================================================================
    // Routes
    // ========================================================================

    /// Register a route on the owned table.
    pub fn register_route(&self, config: RouteConfig) {
        self.routes.borrow_mut().register_route(config);
    }

    /// Register several routes on the owned table.
    pub fn register_all<I>(&self, configs: I)
    where
        I: IntoIterator<Item = RouteConfig>,
    {
        self.routes.borrow_mut().register_all(configs);
    }

    /// Resolve a path without navigating.
    pub fn match_route(&self, path: &str) -> Option<RouteMatch> {
        self.routes.borrow().match_route(path)
    }

    pub fn get_routes(&self) -> Vec<Rc<RouteConfig>> {
        self.routes.borrow().get_routes()
    }

    pub fn get_routes_by_type(&self, view_type: ViewType) -> Vec<Rc<RouteConfig>> {
        self.routes.borrow().get_routes_by_type(view_type)
    }

    /// See [`RouteTable::url_for`].
    pub fn url_for(&self, pattern: &str, params: &RouteParams) -> Option<String> {
        self.routes.borrow().url_for(pattern, params)
    }

    /// Drop cached views: all, or those of one route pattern.
    ///
    /// Views currently displayed stay displayed; the next navigation to
    /// their route builds a new instance.
    pub fn clear_cache(&self, pattern: Option<&str>) -> usize {
        self.routes.borrow_mut().clear_cache(pattern)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.routes.borrow().cache_stats()
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Listen to navigation events of every context.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&NavigationEvent) + 'static,
    {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }
}

impl fmt::Debug for NavigationService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationService")
            .field("routes", &self.routes)
            .field("contexts", &self.contexts)
            .field("events", &self.events)
            .field("options", &self.options)
            .finish()
    }
}

/// Claim on a context's transition slot, held while a request and its
/// deferred queue run. If a factory, hook, host or listener panics, dropping
/// the claim during unwind releases the context and discards its queue.
struct TransitionClaim<'a> {
    service: &'a NavigationService,
    context: &'a str,
}

impl TransitionClaim<'_> {
    /// The drain already released the context.
    fn release(self) {
        std::mem::forget(self);
    }
}

impl Drop for TransitionClaim<'_> {
    fn drop(&mut self) {
        let Ok(mut contexts) = self.service.contexts.try_borrow_mut() else {
            return;
        };
        if let Ok(cx) = find_mut(&mut contexts, self.context) {
            let dropped = cx.abort_transition();
            error_log!(
                "Transition in '{}' unwound; released context and dropped {} queued navigation(s)",
                self.context,
                dropped
            );
        }
    }
}

fn find<'a>(
    contexts: &'a [NavigationContext],
    name: &str,
) -> Result<&'a NavigationContext, NavigationError> {
    contexts
        .iter()
        .find(|cx| cx.name() == name)
        .ok_or_else(|| NavigationError::unknown_context(name))
}

fn find_mut<'a>(
    contexts: &'a mut [NavigationContext],
    name: &str,
) -> Result<&'a mut NavigationContext, NavigationError> {
    contexts
        .iter_mut()
        .find(|cx| cx.name() == name)
        .ok_or_else(|| NavigationError::unknown_context(name))
}
