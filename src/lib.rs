//! # shell-navigator
//!
//! Route registry and multi-context navigation service for desktop
//! application shells.
//!
//! The crate knows nothing about a particular UI toolkit. Views are anything
//! implementing [`View`], and the place they are shown is anything
//! implementing [`ViewHost`]. On top of those two traits it provides:
//!
//! - a [`RouteTable`] of literal (`/dashboard`) and parametrized
//!   (`/recipes/{id}`) routes, with an instance cache for routes marked
//!   [`cached`](RouteConfig::cached),
//! - browser-style history per [`NavigationContext`], so a side panel can
//!   navigate independently of the main area,
//! - lifecycle hooks: the outgoing view may veto a navigation, the incoming
//!   view is told when it has been displayed,
//! - [`NavigationEvent`]s for every started, succeeded and failed navigation.
//!
//! # Quick start
//!
//! ```
//! use std::rc::Rc;
//! use shell_navigator::{
//!     NavigationService, RouteConfig, RouteParams, SlotHost, View, ViewRef, ViewType, MAIN_CONTEXT,
//! };
//!
//! struct Dashboard;
//! impl View for Dashboard {}
//!
//! struct RecipeDetail {
//!     id: u32,
//! }
//! impl View for RecipeDetail {}
//!
//! let host = Rc::new(SlotHost::new());
//! let nav = NavigationService::create(host.clone());
//!
//! nav.register_route(RouteConfig::view("/dashboard", || Dashboard).title("Dashboard").cached(true));
//! nav.register_route(
//!     RouteConfig::new("/recipes/{id}", |cx| {
//!         let id = cx.params().get_as::<u32>("id").ok_or("recipe id must be a number")?;
//!         Ok(Rc::new(RecipeDetail { id }) as ViewRef)
//!     })
//!     .view_type(ViewType::Main),
//! );
//!
//! nav.navigate("/dashboard").unwrap();
//! nav.navigate_to("/recipes/42", RouteParams::new().with("tab", "steps"), MAIN_CONTEXT)
//!     .unwrap();
//!
//! let entry = nav.get_current_route(MAIN_CONTEXT).unwrap();
//! assert_eq!(entry.params().get("id"), Some("42"));
//! assert_eq!(entry.params().get("tab"), Some("steps"));
//!
//! nav.go_back(MAIN_CONTEXT).unwrap();
//! assert_eq!(nav.current_title(MAIN_CONTEXT).as_deref(), Some("Dashboard"));
//! assert_eq!(host.display_count(), 3);
//! ```
//!
//! # Logging
//!
//! The router logs through the `log` crate by default. Enable the `tracing`
//! feature (and disable default features) to log through `tracing` instead.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod cache;
pub mod context;
pub mod error;
pub mod events;
pub mod history;
pub mod logging;
pub mod matching;
pub mod params;
pub mod registry;
pub mod route;
pub mod service;
pub mod view;

pub use cache::{CacheKey, CacheStats};
pub use context::{NavigationContext, MAIN_CONTEXT};
pub use error::{FailureReason, NavigationError, NavigationResult, ViewError};
pub use events::{EventBus, NavigationEvent, SubscriptionId};
pub use history::{NavigationEntry, NavigationStack};
pub use matching::{normalize_path, PathPattern};
pub use params::RouteParams;
pub use registry::{RouteProvider, RouteTable};
pub use route::{RouteConfig, RouteMatch, ViewFactory, ViewType};
pub use service::{NavigationService, NavigatorOptions};
pub use view::{same_view, SlotHost, View, ViewArgs, ViewContext, ViewHost, ViewRef};
