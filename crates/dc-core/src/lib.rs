//! Core state and query engine for the dataset catalog browser
//!
//! This crate holds the in-memory catalog, the search/filter/sort pipeline,
//! the URL state codec and the router. It does no IO: records arrive already
//! parsed, and history and session storage are reached through traits.

pub mod catalog;
pub mod error;
pub mod events;
pub mod location;
pub mod navigation;
pub mod query;
pub mod record;
pub mod sort;
pub mod state;

// Re-export commonly used types
pub use catalog::{CatalogStore, RecordDetail, Reference};
pub use error::CatalogError;
pub use events::EventBus;
pub use location::{History, Location, MemoryHistory, MemoryStash, RedirectStash, UrlCodec};
pub use navigation::{HistoryUpdate, NavigationTarget, Route, Router};
pub use query::{FilterAttribute, FilterSelections, Query};
pub use record::{Field, Publication, RawRecord, Record};
pub use sort::{SortDirection, SortKey, SortSpec};
pub use state::{Browser, Command, ListingState, SearchDebouncer, Session, Transition, ViewState};
