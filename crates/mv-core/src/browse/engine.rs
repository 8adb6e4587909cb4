//! Browse engine: search, sort and page state for the list view

use super::{BrowseContext, BrowseSubscriber};
use std::sync::{Arc, Weak};
use parking_lot::RwLock;

use crate::criteria::{SearchCriteria, SearchField};
use crate::events::events;
use crate::page::{Page, PageState};
use crate::record::Record;
use crate::sort::{sort_records, SortColumn, SortDirective};
use crate::state::DatasetStore;
use crate::BrowseError;

/// Browse state stored internally
#[derive(Debug, Clone, Default)]
struct BrowseState {
    criteria: SearchCriteria,
    sort: SortDirective,
    page: PageState,
}

/// Owns the user-facing list state and applies the list policies: new
/// filter results go back to page 1, and toggling the active sort column
/// flips its direction while a new column starts ascending.
pub struct BrowseEngine {
    store: Arc<DatasetStore>,
    state: Arc<RwLock<BrowseState>>,
    subscribers: Arc<RwLock<Vec<Weak<dyn BrowseSubscriber>>>>,
}

impl BrowseEngine {
    /// Create a browse engine over `store`
    pub fn new(store: Arc<DatasetStore>, page_size: usize) -> Self {
        let state = BrowseState {
            page: PageState::new(page_size),
            ..BrowseState::default()
        };

        Self {
            store,
            state: Arc::new(RwLock::new(state)),
            subscribers: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn store(&self) -> &Arc<DatasetStore> {
        &self.store
    }

    /// Update one search field and re-filter
    pub fn set_criterion(&self, field: SearchField, query: impl Into<String>) {
        let criteria = {
            let mut state = self.state.write();
            state.criteria.set(field, query);
            state.criteria.clone()
        };
        self.apply_criteria(&criteria);
    }

    /// Drop every search constraint
    pub fn clear_criteria(&self) {
        let criteria = {
            let mut state = self.state.write();
            state.criteria.clear();
            state.criteria.clone()
        };
        self.apply_criteria(&criteria);
    }

    /// Re-run the current criteria, e.g. after the dataset was installed
    pub fn refresh(&self) {
        let criteria = self.state.read().criteria.clone();
        self.apply_criteria(&criteria);
    }

    fn apply_criteria(&self, criteria: &SearchCriteria) {
        let matched = self.store.apply(criteria);
        self.state.write().page.reset();
        tracing::debug!(matched, "criteria applied, back to first page");

        self.publish_page();
        self.notify_subscribers();
    }

    /// Sort by `column`, flipping the direction if it is already the sort column
    pub fn toggle_sort(&self, column: SortColumn) -> SortDirective {
        let directive = {
            let mut state = self.state.write();
            let next = match state.sort.column {
                Some(current) if current == column => SortDirective {
                    column: Some(column),
                    order: state.sort.order.reversed(),
                },
                _ => SortDirective::ascending(column),
            };
            state.sort = next;
            next
        };

        self.store.event_bus().publish(events::SortChanged {
            column: directive.column,
            order: directive.order,
        });
        self.notify_subscribers();
        directive
    }

    /// Go to a specific 1-based page
    pub fn seek_page(&self, page_index: usize) -> Result<(), BrowseError> {
        let total_pages = self.total_pages();
        if page_index == 0 || page_index > total_pages {
            return Err(BrowseError::PageOutOfRange {
                requested: page_index,
                total_pages,
            });
        }

        self.state.write().page.set_page_index(page_index);
        self.publish_page();
        self.notify_subscribers();
        Ok(())
    }

    /// Advance one page
    pub fn next_page(&self) -> Result<(), BrowseError> {
        let current = self.state.read().page.page_index();
        if current >= self.total_pages() {
            return Err(BrowseError::AtLastPage);
        }
        self.seek_page(current + 1)
    }

    /// Go back one page
    pub fn previous_page(&self) -> Result<(), BrowseError> {
        let current = self.state.read().page.page_index();
        if current <= 1 {
            return Err(BrowseError::AtFirstPage);
        }
        self.seek_page(current - 1)
    }

    /// The visible rows: filtered, sorted, then paged
    pub fn current_page(&self) -> Page<Record> {
        let (sort, page) = {
            let state = self.state.read();
            (state.sort, state.page)
        };

        let sorted = sort_records(&self.store.filtered(), &sort);
        page.slice(&sorted)
    }

    pub fn criteria(&self) -> SearchCriteria {
        self.state.read().criteria.clone()
    }

    pub fn sort_directive(&self) -> SortDirective {
        self.state.read().sort
    }

    fn total_pages(&self) -> usize {
        let total_count = self.store.filtered().len();
        self.state.read().page.total_pages(total_count)
    }

    /// Get current browse context
    pub fn get_context(&self) -> BrowseContext {
        let total_count = self.store.filtered().len();
        let state = self.state.read();
        BrowseContext {
            criteria: state.criteria.clone(),
            sort: state.sort,
            page_index: state.page.page_index(),
            page_size: state.page.page_size(),
            total_count,
            total_pages: state.page.total_pages(total_count),
        }
    }

    /// Add a subscriber
    pub fn add_subscriber(&self, subscriber: Arc<dyn BrowseSubscriber>) {
        let mut subscribers = self.subscribers.write();
        subscribers.push(Arc::downgrade(&subscriber));
    }

    fn publish_page(&self) {
        let context = self.get_context();
        self.store.event_bus().publish(events::PageChanged {
            page_index: context.page_index,
            total_pages: context.total_pages,
        });
    }

    /// Notify all subscribers of a browse change
    fn notify_subscribers(&self) {
        let context = self.get_context();
        let mut subscribers = self.subscribers.write();

        // Remove any dead weak references
        subscribers.retain(|weak| weak.strong_count() > 0);

        for weak in subscribers.iter() {
            if let Some(subscriber) = weak.upgrade() {
                subscriber.on_browse_change(&context);
            }
        }
    }
}
