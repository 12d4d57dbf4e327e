//! Routing between the listing and a record's detail view

mod router;
mod subscriber;

pub use router::Router;
pub use subscriber::RouteSubscriber;

use serde::{Deserialize, Serialize};

/// Resolved target of the current URL
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Route {
    #[default]
    Listing,
    Detail(String),
}

impl Route {
    pub fn detail_code(&self) -> Option<&str> {
        match self {
            Route::Detail(code) => Some(code),
            Route::Listing => None,
        }
    }

    pub fn is_detail(&self) -> bool {
        matches!(self, Route::Detail(_))
    }
}

/// Where a navigation command wants to go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationTarget {
    /// Back to the listing
    Listing,
    /// A record picked from the listing
    Record(String),
    /// A same-type reference followed from a detail view, e.g. an `Extends` link
    Reference(String),
}

/// What the driver must do to the browser history after a transition
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum HistoryUpdate {
    #[default]
    None,
    Push(String),
    Replace(String),
}

impl HistoryUpdate {
    pub fn href(&self) -> Option<&str> {
        match self {
            HistoryUpdate::None => None,
            HistoryUpdate::Push(href) | HistoryUpdate::Replace(href) => Some(href),
        }
    }
}
