mod engine;
mod subscriber;

pub use engine::BrowseEngine;
pub use subscriber::BrowseSubscriber;

use crate::criteria::SearchCriteria;
use crate::sort::SortDirective;

/// Snapshot passed to subscribers after each browse change
#[derive(Debug, Clone, PartialEq)]
pub struct BrowseContext {
    pub criteria: SearchCriteria,
    pub sort: SortDirective,
    pub page_index: usize,
    pub page_size: usize,
    /// Size of the filtered subset
    pub total_count: usize,
    pub total_pages: usize,
}
