//! Route descriptors and match results.
//!
//! A [`RouteConfig`] maps a path pattern to a view factory plus metadata
//! (view type, lazy/cached flags, title, description). It is built with a
//! small builder and is immutable once registered:
//!
//! ```
//! use shell_navigator::{RouteConfig, View, ViewType};
//!
//! struct RecipeDetail;
//! impl View for RecipeDetail {}
//!
//! let route = RouteConfig::view("/recipes/{id}", || RecipeDetail)
//!     .view_type(ViewType::Main)
//!     .cached(true)
//!     .title("Recipe");
//!
//! assert_eq!(route.path(), "/recipes/{id}");
//! assert!(route.is_parametrized());
//! assert!(route.is_cached());
//! ```

use crate::cache::CacheKey;
use crate::error::{NavigationError, ViewError};
use crate::matching::PathPattern;
use crate::params::RouteParams;
use crate::view::{View, ViewArgs, ViewContext, ViewRef};
use crate::{debug_log, error_log};
use std::fmt;
use std::rc::Rc;

/// Builds a view for a matched route.
pub type ViewFactory = Rc<dyn Fn(&ViewContext<'_>) -> Result<ViewRef, ViewError>>;

/// Where a route's view is meant to appear.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ViewType {
    /// Primary content area.
    #[default]
    Main,
    /// Blocking dialog.
    Modal,
    /// Non-blocking layer above the main content.
    Overlay,
    /// Region embedded inside another view.
    Embedded,
}

impl fmt::Display for ViewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ViewType::Main => "main",
            ViewType::Modal => "modal",
            ViewType::Overlay => "overlay",
            ViewType::Embedded => "embedded",
        };
        f.write_str(name)
    }
}

// ============================================================================
// RouteConfig
// ============================================================================

/// A registered route.
///
/// Defaults: [`ViewType::Main`], lazy-loaded, not cached, no title or
/// description.
#[derive(Clone)]
pub struct RouteConfig {
    pattern: PathPattern,
    view_type: ViewType,
    lazy_load: bool,
    cached: bool,
    title: Option<String>,
    description: Option<String>,
    factory: ViewFactory,
}

impl RouteConfig {
    /// Create a route with a fallible view factory.
    ///
    /// The path is normalized (`"recipes/"` becomes `"/recipes"`).
    pub fn new<F>(path: impl AsRef<str>, factory: F) -> Self
    where
        F: Fn(&ViewContext<'_>) -> Result<ViewRef, ViewError> + 'static,
    {
        Self {
            pattern: PathPattern::parse(path.as_ref()),
            view_type: ViewType::default(),
            lazy_load: true,
            cached: false,
            title: None,
            description: None,
            factory: Rc::new(factory),
        }
    }

    /// Create a route from an infallible constructor that ignores the match.
    pub fn view<V, F>(path: impl AsRef<str>, build: F) -> Self
    where
        V: View,
        F: Fn() -> V + 'static,
    {
        Self::new(path, move |_cx| Ok(Rc::new(build()) as ViewRef))
    }

    /// Set the view type.
    pub fn view_type(mut self, view_type: ViewType) -> Self {
        self.view_type = view_type;
        self
    }

    /// Set the lazy-load flag. Cached literal routes with `lazy_load(false)`
    /// are built up front by [`RouteTable::warm_cache`](crate::RouteTable::warm_cache).
    pub fn lazy_load(mut self, lazy_load: bool) -> Self {
        self.lazy_load = lazy_load;
        self
    }

    /// Set the cache flag. Cached routes reuse one view instance per
    /// distinct set of params.
    pub fn cached(mut self, cached: bool) -> Self {
        self.cached = cached;
        self
    }

    /// Set a human-readable title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set a description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Normalized path pattern.
    pub fn path(&self) -> &str {
        self.pattern.as_str()
    }

    /// Compiled pattern.
    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    /// Whether the path has `{name}` placeholders.
    pub fn is_parametrized(&self) -> bool {
        self.pattern.is_parametrized()
    }

    pub fn get_view_type(&self) -> ViewType {
        self.view_type
    }

    pub fn is_lazy_load(&self) -> bool {
        self.lazy_load
    }

    pub fn is_cached(&self) -> bool {
        self.cached
    }

    pub fn get_title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn get_description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Run the factory for `route_match`, then hand the new view its route
    /// info.
    ///
    /// Never consults or fills the cache; see
    /// [`RouteTable::get_instance`](crate::RouteTable::get_instance) for that.
    pub fn instantiate(
        &self,
        route_match: &RouteMatch,
        args: &ViewArgs,
    ) -> Result<ViewRef, NavigationError> {
        let cx = ViewContext::new(route_match, args);
        let view = (self.factory)(&cx).map_err(|err| {
            error_log!(
                "View factory for '{}' failed on '{}': {}",
                self.path(),
                route_match.path(),
                err
            );
            NavigationError::construction(route_match.path(), &err)
        })?;

        view.set_route_info(route_match.path(), route_match.params());
        debug_log!(
            "Constructed {} for '{}'",
            view.view_name(),
            route_match.path()
        );
        Ok(view)
    }
}

impl fmt::Debug for RouteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteConfig")
            .field("path", &self.pattern.as_str())
            .field("view_type", &self.view_type)
            .field("lazy_load", &self.lazy_load)
            .field("cached", &self.cached)
            .field("title", &self.title)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// RouteMatch
// ============================================================================

/// The result of matching a path against the route table.
///
/// Recomputed on every lookup.
#[derive(Clone)]
pub struct RouteMatch {
    config: Rc<RouteConfig>,
    params: RouteParams,
    path: String,
}

impl RouteMatch {
    pub(crate) fn new(config: Rc<RouteConfig>, params: RouteParams, path: String) -> Self {
        Self {
            config,
            params,
            path,
        }
    }

    /// The matched route.
    pub fn config(&self) -> &Rc<RouteConfig> {
        &self.config
    }

    /// Params captured from the path, plus any merged in with
    /// [`with_params`](Self::with_params).
    pub fn params(&self) -> &RouteParams {
        &self.params
    }

    /// Normalized concrete path that was matched.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Copy of this match with `extra` merged over the captured params.
    pub fn with_params(&self, extra: &RouteParams) -> RouteMatch {
        RouteMatch {
            config: Rc::clone(&self.config),
            params: RouteParams::merge(&self.params, extra),
            path: self.path.clone(),
        }
    }

    /// View-cache key: route pattern + canonical params.
    pub fn cache_key(&self) -> CacheKey {
        CacheKey::new(self.config.path(), &self.params)
    }
}

impl fmt::Debug for RouteMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteMatch")
            .field("pattern", &self.config.path())
            .field("path", &self.path)
            .field("params", &self.params)
            .finish()
    }
}
