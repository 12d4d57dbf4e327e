use serde::{Deserialize, Serialize};

use crate::navigation::Route;
use crate::query::{FilterAttribute, FilterSelections, Query};
use crate::sort::SortSpec;

/// Search, filters and sort order of the listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingState {
    pub query: Query,
    pub sort: SortSpec,
}

impl ListingState {
    pub fn search(&self) -> &str {
        &self.query.search
    }

    pub fn filters(&self) -> &FilterSelections {
        &self.query.filters
    }

    pub fn filter(&self, attr: FilterAttribute) -> Option<&str> {
        self.query.filters.get(attr)
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// Everything the URL encodes: listing state plus route
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub route: Route,
    pub listing: ListingState,
}
