//! Logging facade used throughout the router.
//!
//! Every macro forwards to either the [`log`](https://docs.rs/log) crate or
//! the [`tracing`](https://docs.rs/tracing) crate depending on the enabled
//! feature. Enable at most one of them; with neither enabled the macros
//! compile to nothing.
//!
//! | Feature    | Backend         | Default |
//! |------------|-----------------|---------|
//! | `log`      | `log` crate     | yes     |
//! | `tracing`  | `tracing` crate | no      |
//!
//! Levels used by the router:
//!
//! - `trace_log!`: per-lookup matching and cache probes.
//! - `debug_log!`: hook results, cache inserts and invalidations.
//! - `info_log!`: route registration and completed navigations.
//! - `warn_log!`: vetoed navigations, replaced literal routes.
//! - `error_log!`: view construction failures, dropped deferred navigations.
//!
//! ```ignore
//! use shell_navigator::{debug_log, warn_log};
//!
//! debug_log!("Resolving '{}' in context '{}'", path, context);
//! warn_log!("Navigation to '{}' vetoed by the current view", path);
//! ```

#[doc(hidden)]
#[macro_export]
macro_rules! __nav_log {
    ($level:ident, $($arg:tt)*) => {{
        #[cfg(feature = "tracing")]
        ::tracing::$level!($($arg)*);
        #[cfg(feature = "log")]
        ::log::$level!($($arg)*);
    }};
}

/// Emit a **trace**-level message through the active backend.
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        $crate::__nav_log!(trace, $($arg)*)
    };
}

/// Emit a **debug**-level message through the active backend.
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        $crate::__nav_log!(debug, $($arg)*)
    };
}

/// Emit an **info**-level message through the active backend.
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {
        $crate::__nav_log!(info, $($arg)*)
    };
}

/// Emit a **warn**-level message through the active backend.
#[macro_export]
macro_rules! warn_log {
    ($($arg:tt)*) => {
        $crate::__nav_log!(warn, $($arg)*)
    };
}

/// Emit an **error**-level message through the active backend.
#[macro_export]
macro_rules! error_log {
    ($($arg:tt)*) => {
        $crate::__nav_log!(error, $($arg)*)
    };
}
