//! Pagination over ordered collections

use serde::{Deserialize, Serialize};

/// Rows shown per page in the list view
pub const DEFAULT_PAGE_SIZE: usize = 9;

/// One page of a collection plus page-count metadata
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: usize,
    pub total_pages: usize,
    /// 1-based
    pub page_index: usize,
    pub page_size: usize,
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_next(&self) -> bool {
        self.page_index < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page_index > 1
    }
}

/// `max(1, ceil(total_count / page_size))`
pub fn total_pages(total_count: usize, page_size: usize) -> usize {
    total_count.div_ceil(page_size.max(1)).max(1)
}

/// Slice out page `page_index` (1-based). Indexes past the end give an empty
/// page; zero sizes and indexes are read as 1.
pub fn paginate<T: Clone>(collection: &[T], page_size: usize, page_index: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let page_index = page_index.max(1);
    let total_count = collection.len();

    let start = (page_index - 1).saturating_mul(page_size).min(total_count);
    let end = start.saturating_add(page_size).min(total_count);

    Page {
        items: collection[start..end].to_vec(),
        total_count,
        total_pages: total_pages(total_count, page_size),
        page_index,
        page_size,
    }
}

/// Current page position in the list view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageState {
    page_index: usize,
    page_size: usize,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            page_index: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageState {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_index: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_page_index(&mut self, page_index: usize) {
        self.page_index = page_index.max(1);
    }

    /// Back to the first page
    pub fn reset(&mut self) {
        self.page_index = 1;
    }

    pub fn total_pages(&self, total_count: usize) -> usize {
        total_pages(total_count, self.page_size)
    }

    pub fn slice<T: Clone>(&self, collection: &[T]) -> Page<T> {
        paginate(collection, self.page_size, self.page_index)
    }
}
