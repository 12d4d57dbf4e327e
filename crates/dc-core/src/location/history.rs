//! Browser history and session storage seams

use ahash::AHashMap;
use tracing::trace;

use super::Location;

/// Session storage key under which the not-found page stashes the requested path
pub const REDIRECT_STASH_KEY: &str = "redirect";

/// The browser's session history
pub trait History: Send {
    /// Location of the current entry
    fn current(&self) -> Location;

    /// Add an entry after the current one, dropping any forward entries
    fn push(&mut self, href: &str);

    /// Overwrite the current entry
    fn replace(&mut self, href: &str);

    /// Move one entry back; `None` when already at the first entry
    fn back(&mut self) -> Option<Location>;

    /// Move one entry forward; `None` when already at the last entry
    fn forward(&mut self) -> Option<Location>;
}

/// Session-scoped key/value storage that survives a redirect
pub trait RedirectStash: Send {
    fn put(&mut self, key: &str, value: String);

    /// Remove and return a value
    fn take(&mut self, key: &str) -> Option<String>;
}

/// History kept in memory, used by the CLI and in tests
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    entries: Vec<Location>,
    cursor: usize,
}

impl MemoryHistory {
    pub fn new(initial: &str) -> Self {
        Self {
            entries: vec![Location::parse(initial)],
            cursor: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Location] {
        &self.entries
    }
}

impl History for MemoryHistory {
    fn current(&self) -> Location {
        self.entries[self.cursor].clone()
    }

    fn push(&mut self, href: &str) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(Location::parse(href));
        self.cursor = self.entries.len() - 1;
        trace!(href, depth = self.entries.len(), "history push");
    }

    fn replace(&mut self, href: &str) {
        self.entries[self.cursor] = Location::parse(href);
        trace!(href, "history replace");
    }

    fn back(&mut self) -> Option<Location> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(self.current())
    }

    fn forward(&mut self) -> Option<Location> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        Some(self.current())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStash {
    values: AHashMap<String, String>,
}

impl MemoryStash {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RedirectStash for MemoryStash {
    fn put(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
    }

    fn take(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }
}
