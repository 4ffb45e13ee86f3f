//! The route table.
//!
//! [`RouteTable`] stores routes, matches paths against them and owns the
//! view-instance cache.
//!
//! - Literal routes (`/recipes/browse`) live in a hash map: constant-time
//!   lookup, last registration wins.
//! - Parametrized routes (`/recipes/{id}`) live in an ordered list and are
//!   tried in registration order: the first registered match wins, even when
//!   a later pattern would also match.
//!
//! A literal route always takes precedence over any parametrized one.
//!
//! # Example
//!
//! ```
//! use shell_navigator::{RouteConfig, RouteTable, View};
//!
//! struct Page;
//! impl View for Page {}
//!
//! let table = RouteTable::with_routes(|routes| {
//!     routes.register_route(RouteConfig::view("/recipes/new", || Page));
//!     routes.register_route(RouteConfig::view("/recipes/{id}", || Page));
//! });
//!
//! let m = table.match_route("/recipes/new").unwrap();
//! assert!(m.params().is_empty());
//!
//! let m = table.match_route("/recipes/42").unwrap();
//! assert_eq!(m.params().get("id"), Some("42"));
//!
//! assert!(table.match_route("/meals").is_none());
//! ```

use crate::cache::{CacheStats, ViewCache};
use crate::error::NavigationError;
use crate::matching::normalize_path;
use crate::params::RouteParams;
use crate::route::{RouteConfig, RouteMatch, ViewType};
use crate::view::{ViewArgs, ViewRef};
use crate::{debug_log, info_log, trace_log, warn_log};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Something that knows how to register a set of routes.
///
/// Implemented by application modules so start-up code can call one
/// "register all application routes" entry point.
///
/// ```
/// use shell_navigator::{RouteConfig, RouteProvider, RouteTable, View};
///
/// struct Page;
/// impl View for Page {}
///
/// struct PlannerRoutes;
///
/// impl RouteProvider for PlannerRoutes {
///     fn register_routes(&self, table: &mut RouteTable) {
///         table.register_route(RouteConfig::view("/planner", || Page));
///     }
/// }
///
/// let table = RouteTable::from_provider(&PlannerRoutes);
/// assert_eq!(table.len(), 1);
/// ```
pub trait RouteProvider {
    /// Register every route this provider owns.
    fn register_routes(&self, table: &mut RouteTable);
}

impl<F> RouteProvider for F
where
    F: Fn(&mut RouteTable),
{
    fn register_routes(&self, table: &mut RouteTable) {
        self(table);
    }
}

/// Route registry plus view-instance cache.
#[derive(Default)]
pub struct RouteTable {
    /// Literal routes by normalized path.
    literal: HashMap<String, Rc<RouteConfig>>,
    /// Parametrized routes in registration order.
    parametrized: Vec<Rc<RouteConfig>>,
    /// Every route in registration order.
    routes: Vec<Rc<RouteConfig>>,
    cache: ViewCache,
}

impl RouteTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table and let `configure` register routes on it.
    pub fn with_routes<F>(configure: F) -> Self
    where
        F: FnOnce(&mut RouteTable),
    {
        let mut table = Self::new();
        configure(&mut table);
        table
    }

    /// Create a table populated by `provider`.
    pub fn from_provider<P>(provider: &P) -> Self
    where
        P: RouteProvider + ?Sized,
    {
        let mut table = Self::new();
        provider.register_routes(&mut table);
        table
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Register a route.
    ///
    /// Re-registering a literal path replaces the earlier route (keeping its
    /// position in [`get_routes`](Self::get_routes)). Parametrized paths are
    /// never deduplicated.
    pub fn register_route(&mut self, config: RouteConfig) {
        let config = Rc::new(config);

        if config.is_parametrized() {
            info_log!(
                "Registered parametrized route '{}' ({}, cached: {})",
                config.path(),
                config.get_view_type(),
                config.is_cached()
            );
            self.parametrized.push(Rc::clone(&config));
            self.routes.push(config);
            return;
        }

        let path = config.path().to_string();
        match self.literal.insert(path, Rc::clone(&config)) {
            Some(previous) => {
                warn_log!("Route '{}' registered twice; replacing", config.path());
                if let Some(slot) = self
                    .routes
                    .iter_mut()
                    .find(|route| Rc::ptr_eq(route, &previous))
                {
                    *slot = config;
                }
            }
            None => {
                info_log!(
                    "Registered route '{}' ({}, cached: {})",
                    config.path(),
                    config.get_view_type(),
                    config.is_cached()
                );
                self.routes.push(config);
            }
        }
    }

    /// Register several routes in order.
    pub fn register_all<I>(&mut self, configs: I)
    where
        I: IntoIterator<Item = RouteConfig>,
    {
        for config in configs {
            self.register_route(config);
        }
    }

    // ========================================================================
    // Matching
    // ========================================================================

    /// Resolve a path to a route.
    ///
    /// Returns `None` when nothing matches; that is an expected outcome, not
    /// an error.
    pub fn match_route(&self, path: &str) -> Option<RouteMatch> {
        let path = normalize_path(path);

        if let Some(config) = self.literal.get(&*path) {
            trace_log!("Literal match for '{}'", path);
            return Some(RouteMatch::new(
                Rc::clone(config),
                RouteParams::new(),
                path.into_owned(),
            ));
        }

        for config in &self.parametrized {
            if let Some(params) = config.pattern().match_path(&path) {
                trace_log!(
                    "'{}' matched pattern '{}' with {} params",
                    path,
                    config.path(),
                    params.len()
                );
                return Some(RouteMatch::new(Rc::clone(config), params, path.into_owned()));
            }
        }

        trace_log!("No route matches '{}'", path);
        None
    }

    /// Find a registered route by its (normalized) pattern text.
    pub fn find_route(&self, pattern: &str) -> Option<Rc<RouteConfig>> {
        let pattern = normalize_path(pattern);
        self.routes
            .iter()
            .find(|route| route.path() == &*pattern)
            .cloned()
    }

    /// Build a concrete path for the route registered under `pattern`.
    ///
    /// ```
    /// use shell_navigator::{RouteConfig, RouteParams, RouteTable, View};
    ///
    /// struct Page;
    /// impl View for Page {}
    ///
    /// let mut table = RouteTable::new();
    /// table.register_route(RouteConfig::view("/recipes/{id}", || Page));
    ///
    /// let url = table.url_for("/recipes/{id}", &RouteParams::new().with("id", "3"));
    /// assert_eq!(url.as_deref(), Some("/recipes/3"));
    /// ```
    pub fn url_for(&self, pattern: &str, params: &RouteParams) -> Option<String> {
        self.find_route(pattern)?.pattern().render(params)
    }

    // ========================================================================
    // Instances
    // ========================================================================

    /// Return the view for `route_match`, building it if needed.
    ///
    /// Cached routes return the stored instance for the match's key when one
    /// exists; otherwise the factory runs with `args`, the view receives its
    /// route info and, for cached routes, is stored. A factory error is
    /// returned as-is and nothing is stored.
    pub fn get_instance(
        &mut self,
        route_match: &RouteMatch,
        args: &ViewArgs,
    ) -> Result<ViewRef, NavigationError> {
        if let Some(view) = self.cached_instance(route_match) {
            return Ok(view);
        }

        let view = route_match.config().instantiate(route_match, args)?;
        self.store_instance(route_match, &view);
        Ok(view)
    }

    /// Cached instance for `route_match`, if its route is cached and one
    /// exists. Non-cached routes never touch the cache stats.
    pub fn cached_instance(&mut self, route_match: &RouteMatch) -> Option<ViewRef> {
        if !route_match.config().is_cached() {
            return None;
        }
        self.cache.get(&route_match.cache_key())
    }

    /// Store `view` for `route_match` if its route is cached.
    pub fn store_instance(&mut self, route_match: &RouteMatch, view: &ViewRef) {
        if route_match.config().is_cached() {
            self.cache.insert(route_match.cache_key(), Rc::clone(view));
        }
    }

    /// Drop cached instances: all of them, or only those of `pattern`.
    ///
    /// Returns the number of instances removed.
    pub fn clear_cache(&mut self, pattern: Option<&str>) -> usize {
        match pattern {
            None => self.cache.clear(),
            Some(pattern) => self.cache.clear_pattern(&normalize_path(pattern)),
        }
    }

    /// Build every cached, literal route registered with `lazy_load(false)`
    /// that is not cached yet. Returns how many views were built.
    pub fn warm_cache(&mut self, args: &ViewArgs) -> Result<usize, NavigationError> {
        let eager: Vec<Rc<RouteConfig>> = self
            .routes
            .iter()
            .filter(|route| route.is_cached() && !route.is_lazy_load() && !route.is_parametrized())
            .cloned()
            .collect();

        let mut built = 0;
        for config in eager {
            let path = config.path().to_string();
            let route_match = RouteMatch::new(config, RouteParams::new(), path);
            if self.cache.contains(&route_match.cache_key()) {
                continue;
            }
            let view = route_match.config().instantiate(&route_match, args)?;
            self.store_instance(&route_match, &view);
            built += 1;
        }

        debug_log!("Warmed view cache with {} eager routes", built);
        Ok(built)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// All routes in registration order.
    pub fn get_routes(&self) -> Vec<Rc<RouteConfig>> {
        self.routes.clone()
    }

    /// Routes of one view type, in registration order.
    pub fn get_routes_by_type(&self, view_type: ViewType) -> Vec<Rc<RouteConfig>> {
        self.routes
            .iter()
            .filter(|route| route.get_view_type() == view_type)
            .cloned()
            .collect()
    }

    /// Number of registered routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Return `true` if no routes are registered.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Number of cached view instances.
    pub fn cached_instance_count(&self) -> usize {
        self.cache.len()
    }

    /// View cache statistics.
    pub fn cache_stats(&self) -> CacheStats {
        *self.cache.stats()
    }
}

impl fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteTable")
            .field(
                "routes",
                &self.routes.iter().map(|r| r.path()).collect::<Vec<_>>(),
            )
            .field("cache", &self.cache)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{same_view, View};
    use std::cell::Cell;

    struct Page;
    impl View for Page {}

    fn page_route(path: &str) -> RouteConfig {
        RouteConfig::view(path, || Page)
    }

    #[test]
    fn test_literal_route_matches_with_empty_params() {
        let mut table = RouteTable::new();
        table.register_all(vec![
            page_route("/dashboard"),
            page_route("/recipes/browse"),
            page_route("/"),
        ]);

        for path in ["/dashboard", "/recipes/browse", "/"] {
            let m = table.match_route(path).unwrap();
            assert_eq!(m.config().path(), path);
            assert!(m.params().is_empty());
        }
    }

    #[test]
    fn test_literal_beats_earlier_pattern() {
        let mut table = RouteTable::new();
        table.register_route(page_route("/recipes/{id}"));
        table.register_route(page_route("/recipes/browse"));

        let m = table.match_route("/recipes/browse").unwrap();
        assert_eq!(m.config().path(), "/recipes/browse");
    }

    #[test]
    fn test_first_registered_pattern_wins() {
        let mut table = RouteTable::new();
        table.register_route(page_route("/recipes/{id}").title("first"));
        table.register_route(page_route("/recipes/{slug}").title("second"));

        let m = table.match_route("/recipes/soup").unwrap();
        assert_eq!(m.config().get_title(), Some("first"));
        assert_eq!(m.params().get("id"), Some("soup"));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_duplicate_literal_replaces_in_place() {
        let mut table = RouteTable::new();
        table.register_route(page_route("/a").title("old"));
        table.register_route(page_route("/b"));
        table.register_route(page_route("/a/").title("new"));

        let routes = table.get_routes();
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].get_title(), Some("new"));
        assert_eq!(table.match_route("/a").unwrap().config().get_title(), Some("new"));
    }

    #[test]
    fn test_get_instance_cached_vs_uncached() {
        let mut table = RouteTable::new();
        table.register_route(page_route("/cached").cached(true));
        table.register_route(page_route("/fresh"));
        let args = ViewArgs::new();

        let m = table.match_route("/cached").unwrap();
        let a = table.get_instance(&m, &args).unwrap();
        let b = table.get_instance(&m, &args).unwrap();
        assert!(same_view(&a, &b));

        let m = table.match_route("/fresh").unwrap();
        let a = table.get_instance(&m, &args).unwrap();
        let b = table.get_instance(&m, &args).unwrap();
        assert!(!same_view(&a, &b));

        assert_eq!(table.cached_instance_count(), 1);
        assert_eq!(table.cache_stats().hits, 1);
    }

    #[test]
    fn test_failed_construction_is_not_cached() {
        let attempts = Rc::new(Cell::new(0));
        let counter = Rc::clone(&attempts);
        let mut table = RouteTable::new();
        table.register_route(
            RouteConfig::new("/flaky", move |_cx| {
                counter.set(counter.get() + 1);
                if counter.get() == 1 {
                    Err("first attempt fails".into())
                } else {
                    Ok(Rc::new(Page) as ViewRef)
                }
            })
            .cached(true),
        );

        let m = table.match_route("/flaky").unwrap();
        assert!(table.get_instance(&m, &ViewArgs::new()).is_err());
        assert_eq!(table.cached_instance_count(), 0);

        assert!(table.get_instance(&m, &ViewArgs::new()).is_ok());
        assert_eq!(table.cached_instance_count(), 1);
        assert_eq!(attempts.get(), 2);
    }

    #[test]
    fn test_factory_receives_args() {
        let mut table = RouteTable::new();
        table.register_route(RouteConfig::new("/planner", |cx| {
            assert_eq!(cx.args().get::<u32>("week"), Some(&12));
            assert_eq!(cx.path(), "/planner");
            Ok(Rc::new(Page) as ViewRef)
        }));

        let m = table.match_route("/planner").unwrap();
        let args = ViewArgs::new().with("week", 12_u32);
        assert!(table.get_instance(&m, &args).is_ok());
    }

    #[test]
    fn test_clear_cache_by_pattern() {
        let mut table = RouteTable::new();
        table.register_route(page_route("/recipes/{id}").cached(true));
        table.register_route(page_route("/dashboard").cached(true));
        let args = ViewArgs::new();

        let dashboard = table.match_route("/dashboard").unwrap();
        let kept = table.get_instance(&dashboard, &args).unwrap();
        for id in ["1", "2"] {
            let m = table.match_route(&format!("/recipes/{id}")).unwrap();
            table.get_instance(&m, &args).unwrap();
        }

        assert_eq!(table.clear_cache(Some("/recipes/{id}")), 2);
        assert_eq!(table.cached_instance_count(), 1);
        assert!(same_view(&kept, &table.get_instance(&dashboard, &args).unwrap()));

        assert_eq!(table.clear_cache(None), 1);
        assert_eq!(table.cached_instance_count(), 0);
    }

    #[test]
    fn test_warm_cache_builds_eager_literal_routes_only() {
        let mut table = RouteTable::new();
        table.register_route(page_route("/dashboard").cached(true).lazy_load(false));
        table.register_route(page_route("/settings").cached(true));
        table.register_route(page_route("/recipes/{id}").cached(true).lazy_load(false));
        table.register_route(page_route("/about").lazy_load(false));

        assert_eq!(table.warm_cache(&ViewArgs::new()).unwrap(), 1);
        assert_eq!(table.cached_instance_count(), 1);
        // Second warm-up finds the instance already there
        assert_eq!(table.warm_cache(&ViewArgs::new()).unwrap(), 0);
    }

    #[test]
    fn test_routes_by_type() {
        let table = RouteTable::with_routes(|t| {
            t.register_route(page_route("/dashboard"));
            t.register_route(page_route("/recipes/new").view_type(ViewType::Modal));
            t.register_route(page_route("/timer").view_type(ViewType::Overlay));
            t.register_route(page_route("/confirm").view_type(ViewType::Modal));
        });

        let modals: Vec<_> = table
            .get_routes_by_type(ViewType::Modal)
            .iter()
            .map(|r| r.path().to_string())
            .collect();
        assert_eq!(modals, vec!["/recipes/new", "/confirm"]);
        assert!(table.get_routes_by_type(ViewType::Embedded).is_empty());
    }

    #[test]
    fn test_provider_closure() {
        let provider = |table: &mut RouteTable| {
            table.register_route(page_route("/a"));
            table.register_route(page_route("/b/{x}"));
        };
        let table = RouteTable::from_provider(&provider);
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.url_for("/b/{x}", &RouteParams::new().with("x", "1")).as_deref(),
            Some("/b/1")
        );
        assert!(table.url_for("/missing", &RouteParams::new()).is_none());
    }
}
