//! Browse subscriber trait

use super::BrowseContext;

/// Trait for components that need to respond to browse state changes
pub trait BrowseSubscriber: Send + Sync {
    /// Called after criteria, sort or page change
    fn on_browse_change(&self, context: &BrowseContext);
}
