use std::sync::Arc;
use parking_lot::Mutex;
use ahash::AHashMap;

/// Explorer-wide event bus
pub struct EventBus {
    handlers: Arc<Mutex<AHashMap<std::any::TypeId, Vec<Box<dyn EventHandler>>>>>,
}

/// Event trait that all events must implement
pub trait Event: Send + Sync + 'static {
    fn as_any(&self) -> &dyn std::any::Any;
}

/// Handler trait for event handlers
pub trait EventHandler: Send + Sync {
    fn handle(&mut self, event: &dyn Event);
}

/// Dataset and browsing events
pub mod events {
    use super::Event;
    use crate::sort::{SortColumn, SortOrder};

    /// The dataset finished loading
    #[derive(Debug, Clone)]
    pub struct DatasetLoaded {
        pub source_name: String,
        pub record_count: usize,
    }

    /// The dataset could not be loaded; an empty dataset is used instead
    #[derive(Debug, Clone)]
    pub struct DatasetLoadFailed {
        pub source_name: String,
        pub error: String,
    }

    /// The filtered subset was replaced
    #[derive(Debug, Clone)]
    pub struct FilterApplied {
        pub matched: usize,
        pub total: usize,
    }

    /// The list sort directive changed
    #[derive(Debug, Clone)]
    pub struct SortChanged {
        pub column: Option<SortColumn>,
        pub order: SortOrder,
    }

    /// The visible page changed
    #[derive(Debug, Clone)]
    pub struct PageChanged {
        pub page_index: usize,
        pub total_pages: usize,
    }

    macro_rules! impl_event {
        ($($t:ty),*) => {
            $(
                impl Event for $t {
                    fn as_any(&self) -> &dyn std::any::Any {
                        self
                    }
                }
            )*
        }
    }

    impl_event!(
        DatasetLoaded,
        DatasetLoadFailed,
        FilterApplied,
        SortChanged,
        PageChanged
    );
}

impl EventBus {
    /// Create a new event bus
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Mutex::new(AHashMap::new())),
        }
    }

    /// Subscribe to events of a specific type
    pub fn subscribe<E: Event>(&self, handler: Box<dyn EventHandler>) {
        let type_id = std::any::TypeId::of::<E>();
        let mut handlers = self.handlers.lock();
        handlers.entry(type_id).or_insert_with(Vec::new).push(handler);
    }

    /// Subscribe a closure that receives the concrete event type
    pub fn on<E, F>(&self, mut f: F)
    where
        E: Event,
        F: FnMut(&E) + Send + Sync + 'static,
    {
        self.subscribe::<E>(handler_from_fn(move |event| {
            if let Some(event) = event.as_any().downcast_ref::<E>() {
                f(event);
            }
        }));
    }

    /// Publish an event to every handler registered for its type.
    ///
    /// Handlers run synchronously under the bus lock and must not publish.
    pub fn publish<E: Event>(&self, event: E) {
        let type_id = std::any::TypeId::of::<E>();
        let mut handlers = self.handlers.lock();

        if let Some(event_handlers) = handlers.get_mut(&type_id) {
            for handler in event_handlers.iter_mut() {
                handler.handle(&event);
            }
        }
    }

    /// Number of handlers registered for `E`
    pub fn handler_count<E: Event>(&self) -> usize {
        self.handlers
            .lock()
            .get(&std::any::TypeId::of::<E>())
            .map_or(0, Vec::len)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Adapter turning a closure into an [`EventHandler`]
pub struct ClosureEventHandler<F> {
    handler: F,
}

impl<F> EventHandler for ClosureEventHandler<F>
where
    F: FnMut(&dyn Event) + Send + Sync,
{
    fn handle(&mut self, event: &dyn Event) {
        (self.handler)(event);
    }
}

/// Create an event handler from a closure
pub fn handler_from_fn<F>(f: F) -> Box<dyn EventHandler>
where
    F: FnMut(&dyn Event) + Send + Sync + 'static,
{
    Box::new(ClosureEventHandler { handler: f })
}
