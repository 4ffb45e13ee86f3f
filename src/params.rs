//! Route parameters.
//!
//! [`RouteParams`] holds the values captured from `{name}` placeholders plus
//! any parameters the caller passes to `navigate_to`. It is backed by a
//! `BTreeMap`, so iteration is sorted by name and [`cache_key`](RouteParams::cache_key)
//! is a canonical serialization: two parameter sets with the same content
//! always produce the same key regardless of insertion order.
//!
//! # Example
//!
//! ```
//! use shell_navigator::RouteParams;
//!
//! let params = RouteParams::new().with("id", "42").with("tab", "notes");
//! assert_eq!(params.get_as::<u32>("id"), Some(42));
//! assert_eq!(params.cache_key(), "id=42&tab=notes");
//! ```

use std::collections::BTreeMap;

/// Name → value parameters of a route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RouteParams {
    params: BTreeMap<String, String>,
}

impl RouteParams {
    /// Create empty route parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Get a parameter value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Get a parameter and parse it as a specific type
    ///
    /// Returns `None` if the parameter doesn't exist or cannot be parsed.
    pub fn get_as<T>(&self, key: &str) -> Option<T>
    where
        T: std::str::FromStr,
    {
        self.params.get(key)?.parse().ok()
    }

    /// Insert or overwrite a parameter.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.insert(key.into(), value.into());
    }

    /// Return `true` if the given key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    /// Iterate over all `(key, value)` pairs, sorted by key.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Return `true` if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Return the number of parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Merge two parameter sets; `overrides` wins on collisions.
    ///
    /// ```
    /// use shell_navigator::RouteParams;
    ///
    /// let extracted = RouteParams::new().with("id", "7").with("mode", "view");
    /// let caller = RouteParams::new().with("mode", "edit");
    ///
    /// let merged = RouteParams::merge(&extracted, &caller);
    /// assert_eq!(merged.get("id"), Some("7"));
    /// assert_eq!(merged.get("mode"), Some("edit"));
    /// ```
    pub fn merge(base: &RouteParams, overrides: &RouteParams) -> RouteParams {
        let mut merged = base.clone();
        for (key, value) in overrides.iter() {
            merged.insert(key, value);
        }
        merged
    }

    /// Canonical `key=value&key=value` serialization, sorted by key.
    ///
    /// `&`, `=` and `%` inside keys or values are percent-escaped so distinct
    /// parameter sets never collide.
    pub fn cache_key(&self) -> String {
        let mut key = String::new();
        for (i, (name, value)) in self.params.iter().enumerate() {
            if i > 0 {
                key.push('&');
            }
            escape_into(&mut key, name);
            key.push('=');
            escape_into(&mut key, value);
        }
        key
    }
}

fn escape_into(out: &mut String, raw: &str) {
    for c in raw.chars() {
        match c {
            '%' => out.push_str("%25"),
            '&' => out.push_str("%26"),
            '=' => out.push_str("%3D"),
            _ => out.push(c),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for RouteParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = RouteParams::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_params_basic() {
        let mut params = RouteParams::new();
        params.insert("id", "123");

        assert_eq!(params.get("id"), Some("123"));
        assert!(params.contains("id"));
        assert!(!params.contains("missing"));
    }

    #[test]
    fn test_route_params_get_as() {
        let params = RouteParams::new().with("id", "123").with("active", "true");

        assert_eq!(params.get_as::<i32>("id"), Some(123));
        assert_eq!(params.get_as::<bool>("active"), Some(true));
        assert_eq!(params.get_as::<i32>("missing"), None);
        assert_eq!(params.get_as::<i32>("active"), None);
    }

    #[test]
    fn test_cache_key_is_order_independent() {
        let a = RouteParams::new().with("b", "2").with("a", "1");
        let b: RouteParams = vec![("a", "1"), ("b", "2")].into_iter().collect();

        assert_eq!(a.cache_key(), "a=1&b=2");
        assert_eq!(a.cache_key(), b.cache_key());
        assert_eq!(a, b);
    }

    #[test]
    fn test_cache_key_escapes_separators() {
        let tricky = RouteParams::new().with("q", "a&b=c");
        let split = RouteParams::new().with("q", "a").with("b", "c");

        assert_eq!(tricky.cache_key(), "q=a%26b%3Dc");
        assert_ne!(tricky.cache_key(), split.cache_key());
    }

    #[test]
    fn test_empty_params() {
        let params = RouteParams::new();
        assert!(params.is_empty());
        assert_eq!(params.len(), 0);
        assert_eq!(params.cache_key(), "");
    }
}
