//! Locations, the URL state codec and the history abstraction

mod codec;
mod history;

pub use codec::{UrlCodec, DEFAULT_STATIC_ASSETS};
pub use history::{History, MemoryHistory, MemoryStash, RedirectStash, REDIRECT_STASH_KEY};

use std::fmt;

/// Path plus query string of the current page, without origin or fragment
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    pub path: String,
    /// Query string without the leading `?`
    pub query: String,
}

impl Location {
    pub fn new(path: impl Into<String>, query: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            path: if path.is_empty() { "/".to_string() } else { path },
            query: query.into(),
        }
    }

    /// Parse an href. Absolute URLs lose their scheme and host, fragments are dropped.
    pub fn parse(href: &str) -> Self {
        let mut rest = href.trim();
        if let Some(idx) = rest.find("://") {
            let after_scheme = &rest[idx + 3..];
            rest = after_scheme
                .find(|c: char| c == '/' || c == '?')
                .map(|slash| &after_scheme[slash..])
                .unwrap_or("/");
        }
        if let Some(hash) = rest.find('#') {
            rest = &rest[..hash];
        }

        match rest.split_once('?') {
            Some((path, query)) => Self::new(path, query),
            None => Self::new(rest, ""),
        }
    }

    pub fn href(&self) -> String {
        if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query)
        }
    }

    /// Last non-empty path segment, percent-decoded
    pub fn last_segment(&self) -> Option<String> {
        let segment = self.path.split('/').rev().find(|s| !s.is_empty())?;
        Some(
            urlencoding::decode(segment)
                .map(|decoded| decoded.into_owned())
                .unwrap_or_else(|_| segment.to_string()),
        )
    }

    /// Query parameters in order, percent-decoded; `+` reads as a space
    pub fn params(&self) -> Vec<(String, String)> {
        self.query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (decode_component(key), decode_component(value))
            })
            .collect()
    }

    /// First value of a parameter
    pub fn param(&self, name: &str) -> Option<String> {
        self.params()
            .into_iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.href())
    }
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| raw.replace('+', " "))
}
