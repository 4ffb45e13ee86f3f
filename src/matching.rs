//! Segment-based path pattern matching.
//!
//! Route patterns are made of literal segments and `{name}` placeholders:
//!
//! ```text
//! /recipes/browse            literal
//! /recipes/{id}              one placeholder, captures one segment
//! /plans/{week}/day-{day}    placeholders may share a segment with literals
//! ```
//!
//! # Design
//!
//! - Paths are normalized first (see [`normalize_path`])
//! - Split paths by '/' into segments
//! - Literal segments must match exactly
//! - A placeholder captures a non-empty run of characters that never crosses
//!   a `/`, so a pattern matches only paths with the same segment count
//! - No regex; a segment with several placeholders is matched with a small
//!   backtracking scan

use crate::params::RouteParams;
use std::borrow::Cow;

/// Normalize a path for consistent comparison
///
/// 1. Empty paths become `"/"`
/// 2. A leading slash is ensured (`"dashboard"` → `"/dashboard"`)
/// 3. Trailing slashes are removed (except for root)
/// 4. Repeated slashes collapse (`"//recipes//browse"` → `"/recipes/browse"`)
///
/// Returns `Cow<str>` to avoid allocation when the path is already normal.
///
/// ```
/// use shell_navigator::normalize_path;
///
/// assert_eq!(normalize_path("/dashboard"), "/dashboard");
/// assert_eq!(normalize_path("dashboard/"), "/dashboard");
/// assert_eq!(normalize_path("//recipes//browse"), "/recipes/browse");
/// assert_eq!(normalize_path(""), "/");
/// ```
#[must_use]
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    if path == "/" {
        return Cow::Borrowed(path);
    }

    if path.starts_with('/') && !path.ends_with('/') && !path.contains("//") {
        return Cow::Borrowed(path);
    }

    let segments = split_path(path);
    if segments.is_empty() {
        Cow::Borrowed("/")
    } else {
        Cow::Owned(format!("/{}", segments.join("/")))
    }
}

/// Split a path into segments, filtering empty segments
///
/// ```
/// use shell_navigator::matching::split_path;
///
/// assert_eq!(split_path("/recipes/123"), vec!["recipes", "123"]);
/// assert!(split_path("/").is_empty());
/// ```
pub fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Return `true` if the path contains at least one `{name}` placeholder.
pub fn is_parametrized(path: &str) -> bool {
    path.split('/').any(|segment| {
        parse_segment(segment)
            .iter()
            .any(|part| matches!(part, Part::Param(_)))
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Literal(String),
    Param(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    /// A segment containing at least one placeholder.
    Pattern(Vec<Part>),
}

/// Parse one segment into literal and placeholder parts.
///
/// An unterminated `{` or an empty `{}` is kept as literal text.
fn parse_segment(segment: &str) -> Vec<Part> {
    let mut parts = Vec::new();
    let mut literal = String::new();
    let mut rest = segment;

    while let Some(open) = rest.find('{') {
        let after_open = &rest[open + 1..];
        match after_open.find('}') {
            Some(close) if close > 0 => {
                literal.push_str(&rest[..open]);
                if !literal.is_empty() {
                    parts.push(Part::Literal(std::mem::take(&mut literal)));
                }
                parts.push(Part::Param(after_open[..close].to_string()));
                rest = &after_open[close + 1..];
            }
            _ => {
                literal.push_str(&rest[..=open]);
                rest = after_open;
            }
        }
    }

    literal.push_str(rest);
    if !literal.is_empty() {
        parts.push(Part::Literal(literal));
    }
    parts
}

/// A compiled route pattern.
///
/// ```
/// use shell_navigator::PathPattern;
///
/// let pattern = PathPattern::parse("/recipes/{id}");
/// assert!(pattern.is_parametrized());
///
/// let params = pattern.match_path("/recipes/lasagna").unwrap();
/// assert_eq!(params.get("id"), Some("lasagna"));
/// assert!(pattern.match_path("/recipes/lasagna/edit").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Normalize and compile a pattern.
    pub fn parse(pattern: &str) -> Self {
        let raw = normalize_path(pattern).into_owned();
        let segments = split_path(&raw)
            .into_iter()
            .map(|segment| {
                let parts = parse_segment(segment);
                if parts.iter().any(|part| matches!(part, Part::Param(_))) {
                    Segment::Pattern(parts)
                } else {
                    Segment::Literal(segment.to_string())
                }
            })
            .collect();
        Self { raw, segments }
    }

    /// The normalized pattern text.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether the pattern has any placeholder.
    pub fn is_parametrized(&self) -> bool {
        self.segments
            .iter()
            .any(|segment| matches!(segment, Segment::Pattern(_)))
    }

    /// Names of all placeholders, in order of appearance.
    pub fn param_names(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Pattern(parts) => Some(parts),
                Segment::Literal(_) => None,
            })
            .flatten()
            .filter_map(|part| match part {
                Part::Param(name) => Some(name.as_str()),
                Part::Literal(_) => None,
            })
            .collect()
    }

    /// Match a path against this pattern, returning the captured params.
    ///
    /// The path is normalized before matching. Returns `None` on mismatch.
    pub fn match_path(&self, path: &str) -> Option<RouteParams> {
        let normalized = normalize_path(path);
        let path_segments = split_path(&normalized);

        // Placeholders never span a '/', so segment counts must agree
        if path_segments.len() != self.segments.len() {
            return None;
        }

        let mut captures: Vec<(&str, &str)> = Vec::new();
        for (segment, text) in self.segments.iter().zip(path_segments) {
            match segment {
                Segment::Literal(literal) => {
                    if literal != text {
                        return None;
                    }
                }
                Segment::Pattern(parts) => {
                    if !match_parts(parts, text, &mut captures) {
                        return None;
                    }
                }
            }
        }

        Some(captures.into_iter().collect())
    }

    /// Build a concrete path by substituting `params` into the placeholders.
    ///
    /// Returns `None` if a placeholder has no value, or a value is empty or
    /// contains `/`.
    ///
    /// ```
    /// use shell_navigator::{PathPattern, RouteParams};
    ///
    /// let pattern = PathPattern::parse("/recipes/{id}/edit");
    /// let params = RouteParams::new().with("id", "42");
    /// assert_eq!(pattern.render(&params).as_deref(), Some("/recipes/42/edit"));
    /// ```
    pub fn render(&self, params: &RouteParams) -> Option<String> {
        if self.segments.is_empty() {
            return Some("/".to_string());
        }

        let mut path = String::with_capacity(self.raw.len());
        for segment in &self.segments {
            path.push('/');
            match segment {
                Segment::Literal(literal) => path.push_str(literal),
                Segment::Pattern(parts) => {
                    for part in parts {
                        match part {
                            Part::Literal(literal) => path.push_str(literal),
                            Part::Param(name) => {
                                let value = params.get(name)?;
                                if value.is_empty() || value.contains('/') {
                                    return None;
                                }
                                path.push_str(value);
                            }
                        }
                    }
                }
            }
        }
        Some(path)
    }
}

/// Backtracking match of one segment's parts against `text`.
///
/// Captures are pushed on success and rolled back on failure. Each
/// placeholder takes the longest non-empty prefix that still lets the rest
/// of the segment match.
fn match_parts<'p, 't>(
    parts: &'p [Part],
    text: &'t str,
    captures: &mut Vec<(&'p str, &'t str)>,
) -> bool {
    let Some((first, rest)) = parts.split_first() else {
        return text.is_empty();
    };

    match first {
        Part::Literal(literal) => text
            .strip_prefix(literal.as_str())
            .is_some_and(|remaining| match_parts(rest, remaining, captures)),
        Part::Param(name) => {
            if text.is_empty() {
                return false;
            }
            let boundaries: Vec<usize> = text
                .char_indices()
                .map(|(i, _)| i)
                .skip(1)
                .chain(std::iter::once(text.len()))
                .collect();

            for &end in boundaries.iter().rev() {
                captures.push((name.as_str(), &text[..end]));
                if match_parts(rest, &text[end..], captures) {
                    return true;
                }
                captures.pop();
            }
            false
        }
    }
}
