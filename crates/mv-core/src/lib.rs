//! Core functionality for the meteorite explorer
//!
//! This crate provides the record model, the filter/sort/paginate/aggregate
//! pipeline over the in-memory dataset, and the state that drives the list,
//! map and chart views.

pub mod aggregate;
pub mod browse;
pub mod criteria;
pub mod events;
pub mod filter;
pub mod markers;
pub mod page;
pub mod record;
pub mod sort;
pub mod state;

use thiserror::Error;

// Re-export commonly used types
pub use aggregate::{aggregate, ChartTab, ChartView, Summary};
pub use browse::{BrowseContext, BrowseEngine, BrowseSubscriber};
pub use criteria::{SearchCriteria, SearchField};
pub use events::EventBus;
pub use filter::filter_records;
pub use markers::{build_markers, MapMarker};
pub use page::{paginate, Page, PageState, DEFAULT_PAGE_SIZE};
pub use record::{GeoLocation, Record};
pub use sort::{sort_records, SortColumn, SortDirective, SortOrder};
pub use state::{Dataset, DatasetStore, LoadState};

/// Errors from parsing user-supplied names
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown search field: {0}")]
    UnknownSearchField(String),

    #[error("unknown sort column: {0}")]
    UnknownSortColumn(String),

    #[error("unknown chart tab: {0}")]
    UnknownChartTab(String),
}

/// Errors from page navigation requests
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BrowseError {
    #[error("page {requested} out of range (1..={total_pages})")]
    PageOutOfRange { requested: usize, total_pages: usize },

    #[error("already at the last page")]
    AtLastPage,

    #[error("already at the first page")]
    AtFirstPage,
}
