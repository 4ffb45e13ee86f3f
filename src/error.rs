//! Error and outcome types for navigation.
//!
//! - [`NavigationResult`]: the outcome of a navigation request that did not
//!   fail hard (`Success`, `NotFound`, `Vetoed`, `NoHistory`, `Deferred`).
//! - [`NavigationError`]: hard failures returned as `Err`, chiefly a view
//!   factory failing to build its view.
//! - [`FailureReason`]: the reason carried by a `navigation_failed` event.
//!
//! Route lookups and vetoes are ordinary, recoverable outcomes and never
//! surface as `Err`. Only view construction and misuse of the API (unknown or
//! duplicate context names) do.
//!
//! # Examples
//!
//! ```
//! use shell_navigator::error::{NavigationError, NavigationResult};
//!
//! let result = NavigationResult::Success { path: "/dashboard".into() };
//! assert!(result.is_success());
//!
//! let err = NavigationError::RouteNotFound { path: "/nowhere".into() };
//! assert_eq!(err.to_string(), "Route not found: /nowhere");
//! ```

use std::fmt;

/// Error type returned by view factories.
pub type ViewError = Box<dyn std::error::Error>;

// ============================================================================
// Navigation Result Types
// ============================================================================

/// Outcome of a navigation request.
///
/// Returned by [`NavigationService::navigate_to`](crate::NavigationService::navigate_to),
/// [`go_back`](crate::NavigationService::go_back) and
/// [`go_forward`](crate::NavigationService::go_forward).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationResult {
    /// The new view is displayed and history was updated.
    Success { path: String },
    /// No registered route matches the path.
    NotFound { path: String },
    /// The outgoing view refused to be navigated away from.
    Vetoed { path: String },
    /// `go_back`/`go_forward` with no adjacent entry.
    NoHistory,
    /// The context was mid-transition; the request was queued and runs once
    /// the running transition completes. Its outcome is reported through
    /// navigation events only.
    Deferred,
}

impl NavigationResult {
    /// Check if navigation was successful
    pub fn is_success(&self) -> bool {
        matches!(self, NavigationResult::Success { .. })
    }

    /// Check if route was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, NavigationResult::NotFound { .. })
    }

    /// Check if the outgoing view vetoed the navigation
    pub fn is_vetoed(&self) -> bool {
        matches!(self, NavigationResult::Vetoed { .. })
    }

    /// Check if the request was queued behind a running transition
    pub fn is_deferred(&self) -> bool {
        matches!(self, NavigationResult::Deferred)
    }

    /// Target path of the request, if it had one.
    pub fn path(&self) -> Option<&str> {
        match self {
            NavigationResult::Success { path }
            | NavigationResult::NotFound { path }
            | NavigationResult::Vetoed { path } => Some(path),
            NavigationResult::NoHistory | NavigationResult::Deferred => None,
        }
    }

    /// Turn a failed outcome into the matching [`NavigationError`], for
    /// callers that prefer `?` over inspecting the result.
    ///
    /// `Success` and `Deferred` pass through unchanged.
    ///
    /// ```
    /// use shell_navigator::error::{NavigationError, NavigationResult};
    ///
    /// let err = NavigationResult::NoHistory.into_result("main").unwrap_err();
    /// assert_eq!(err, NavigationError::EmptyHistory { context: "main".into() });
    /// ```
    pub fn into_result(self, context: &str) -> Result<NavigationResult, NavigationError> {
        match self {
            NavigationResult::NotFound { path } => Err(NavigationError::RouteNotFound { path }),
            NavigationResult::Vetoed { path } => Err(NavigationError::NavigationVetoed { path }),
            NavigationResult::NoHistory => Err(NavigationError::EmptyHistory {
                context: context.to_string(),
            }),
            outcome @ (NavigationResult::Success { .. } | NavigationResult::Deferred) => {
                Ok(outcome)
            }
        }
    }
}

// ============================================================================
// Navigation Errors
// ============================================================================

/// Detailed navigation error.
///
/// Implements [`std::error::Error`] and [`Display`](std::fmt::Display).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    /// No route matches the path
    RouteNotFound { path: String },

    /// The outgoing view declined the navigation
    NavigationVetoed { path: String },

    /// The view factory failed; nothing was displayed, pushed or cached
    ViewConstruction { path: String, message: String },

    /// No adjacent history entry in the requested direction
    EmptyHistory { context: String },

    /// The named context was never registered
    UnknownContext { context: String },

    /// A context with this name already exists
    DuplicateContext { context: String },
}

impl fmt::Display for NavigationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationError::RouteNotFound { path } => {
                write!(f, "Route not found: {}", path)
            }
            NavigationError::NavigationVetoed { path } => {
                write!(f, "Navigation to {} vetoed by the current view", path)
            }
            NavigationError::ViewConstruction { path, message } => {
                write!(f, "Failed to construct view for {}: {}", path, message)
            }
            NavigationError::EmptyHistory { context } => {
                write!(f, "No history entry available in context '{}'", context)
            }
            NavigationError::UnknownContext { context } => {
                write!(f, "Unknown navigation context '{}'", context)
            }
            NavigationError::DuplicateContext { context } => {
                write!(f, "Navigation context '{}' already exists", context)
            }
        }
    }
}

impl std::error::Error for NavigationError {}

impl NavigationError {
    pub(crate) fn construction(path: &str, err: &ViewError) -> Self {
        NavigationError::ViewConstruction {
            path: path.to_string(),
            message: err.to_string(),
        }
    }

    pub(crate) fn unknown_context(context: &str) -> Self {
        NavigationError::UnknownContext {
            context: context.to_string(),
        }
    }
}

// ============================================================================
// Failure reasons
// ============================================================================

/// Why a navigation failed, as reported by the `navigation_failed` event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// No registered route matches the path.
    RouteNotFound,
    /// The outgoing view's `before_navigate_from` returned `false`.
    Vetoed,
    /// The view factory failed with the given message.
    ViewConstruction(String),
    /// A deferred navigation was dropped because too many were queued by
    /// lifecycle hooks during one call.
    RedirectLimit,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::RouteNotFound => f.write_str("route not found"),
            FailureReason::Vetoed => f.write_str("vetoed by current view"),
            FailureReason::ViewConstruction(message) => {
                write!(f, "view construction failed: {}", message)
            }
            FailureReason::RedirectLimit => f.write_str("deferred navigation limit reached"),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_result_success() {
        let result = NavigationResult::Success {
            path: "/home".to_string(),
        };
        assert!(result.is_success());
        assert!(!result.is_not_found());
        assert!(!result.is_vetoed());
        assert!(!result.is_deferred());
        assert_eq!(result.path(), Some("/home"));
    }

    #[test]
    fn test_navigation_result_no_history_has_no_path() {
        let result = NavigationResult::NoHistory;
        assert!(!result.is_success());
        assert_eq!(result.path(), None);
    }

    #[test]
    fn test_into_result() {
        let ok = NavigationResult::Success { path: "/a".into() };
        assert_eq!(ok.clone().into_result("main"), Ok(ok));
        assert_eq!(
            NavigationResult::Vetoed { path: "/b".into() }.into_result("main"),
            Err(NavigationError::NavigationVetoed { path: "/b".into() })
        );
        assert_eq!(
            NavigationResult::NotFound { path: "/c".into() }.into_result("main"),
            Err(NavigationError::RouteNotFound { path: "/c".into() })
        );
        assert!(NavigationResult::Deferred.into_result("main").is_ok());
    }

    #[test]
    fn test_navigation_error_display() {
        let error = NavigationError::RouteNotFound {
            path: "/test".to_string(),
        };
        assert_eq!(error.to_string(), "Route not found: /test");

        let error = NavigationError::UnknownContext {
            context: "sidebar".to_string(),
        };
        assert_eq!(error.to_string(), "Unknown navigation context 'sidebar'");
    }

    #[test]
    fn test_construction_error_keeps_message() {
        let source: ViewError = "database unavailable".into();
        let error = NavigationError::construction("/recipes/7", &source);
        assert_eq!(
            error.to_string(),
            "Failed to construct view for /recipes/7: database unavailable"
        );
    }

    #[test]
    fn test_failure_reason_display() {
        assert_eq!(FailureReason::RouteNotFound.to_string(), "route not found");
        assert_eq!(
            FailureReason::ViewConstruction("boom".into()).to_string(),
            "view construction failed: boom"
        );
    }
}
