//! Navigation history.
//!
//! A [`NavigationStack`] is an ordered list of [`NavigationEntry`] values with
//! a movable current position, using browser semantics: pushing a new entry
//! while positioned in the middle of the stack discards everything after the
//! current position.
//!
//! ```text
//! push A, push B, push C      [A  B  C*]
//! back                        [A  B* C ]
//! push D                      [A  B  D*]     C is gone
//! ```

use crate::params::RouteParams;

/// One visited location. Immutable once pushed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationEntry {
    path: String,
    params: RouteParams,
    context: String,
}

impl NavigationEntry {
    /// Create an entry.
    pub fn new(
        path: impl Into<String>,
        params: RouteParams,
        context: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            params,
            context: context.into(),
        }
    }

    /// Visited path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Params snapshotted when the entry was pushed.
    pub fn params(&self) -> &RouteParams {
        &self.params
    }

    /// Name of the context the entry belongs to.
    pub fn context(&self) -> &str {
        &self.context
    }
}

/// Browser-style history stack.
#[derive(Debug, Clone, Default)]
pub struct NavigationStack {
    entries: Vec<NavigationEntry>,
    /// `None` exactly when `entries` is empty.
    current: Option<usize>,
}

impl NavigationStack {
    /// Create an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an entry, dropping forward history, and make it current.
    pub fn push(&mut self, entry: NavigationEntry) {
        if let Some(current) = self.current {
            self.entries.truncate(current + 1);
        }
        self.entries.push(entry);
        self.current = Some(self.entries.len() - 1);
    }

    /// Move one entry back. Returns the new current entry, or `None` (no
    /// change) at the start of history.
    pub fn back(&mut self) -> Option<&NavigationEntry> {
        let current = self.current.filter(|&i| i > 0)?;
        self.current = Some(current - 1);
        self.entries.get(current - 1)
    }

    /// Move one entry forward. Returns the new current entry, or `None` (no
    /// change) at the end of history.
    pub fn forward(&mut self) -> Option<&NavigationEntry> {
        let next = self.current? + 1;
        if next >= self.entries.len() {
            return None;
        }
        self.current = Some(next);
        self.entries.get(next)
    }

    /// The entry `back` would move to, without moving.
    pub fn peek_back(&self) -> Option<&NavigationEntry> {
        let current = self.current.filter(|&i| i > 0)?;
        self.entries.get(current - 1)
    }

    /// The entry `forward` would move to, without moving.
    pub fn peek_forward(&self) -> Option<&NavigationEntry> {
        self.entries.get(self.current? + 1)
    }

    /// Check if can go back
    pub fn can_go_back(&self) -> bool {
        matches!(self.current, Some(i) if i > 0)
    }

    /// Check if can go forward
    pub fn can_go_forward(&self) -> bool {
        matches!(self.current, Some(i) if i + 1 < self.entries.len())
    }

    /// Current entry, `None` when empty.
    pub fn current(&self) -> Option<&NavigationEntry> {
        self.entries.get(self.current?)
    }

    /// Current position, `None` when empty.
    pub fn position(&self) -> Option<usize> {
        self.current
    }

    /// All entries, oldest first, including forward history.
    pub fn entries(&self) -> &[NavigationEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forget all history.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.current = None;
    }
}
