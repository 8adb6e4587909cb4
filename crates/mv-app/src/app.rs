//! Explorer application state

use std::sync::Arc;
use anyhow::Result;
use tracing::{debug, info, warn};

use mv_core::events::events;
use mv_core::{BrowseEngine, ChartTab, DatasetStore, EventBus, LoadState, Record};
use mv_data::{
    load_dataset, DataSource, EnrichmentGuard, EnrichmentService, ExplorerConfig, GeoapifyGeocoder, HttpSource,
    JsonFileSource, ReverseGeocoder,
};

use crate::commands::Command;
use crate::render;

/// Markers listed by the `map` command
const MAP_LISTING_LIMIT: usize = 20;

/// Whether the prompt loop should keep going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Main application state
pub struct ExplorerApp {
    config: ExplorerConfig,

    /// Tokio runtime
    runtime: tokio::runtime::Runtime,

    store: Arc<DatasetStore>,
    browse: BrowseEngine,

    /// Absent when no geocoder API key is configured
    enrichment: Option<EnrichmentService>,

    /// Lookups for the rows currently on screen
    guards: Vec<EnrichmentGuard>,
}

impl ExplorerApp {
    /// Build the app, geocoding rows through Geoapify when an API key is set
    pub fn new(config: ExplorerConfig) -> Result<Self> {
        let geocoder: Option<Arc<dyn ReverseGeocoder>> = match &config.geocoder_api_key {
            Some(key) => Some(Arc::new(GeoapifyGeocoder::new(
                config.geocoder_url.clone(),
                key.clone(),
                config.request_timeout(),
            )?)),
            None => {
                info!("no geocoder API key configured, row locations disabled");
                None
            }
        };

        Self::with_geocoder(config, geocoder)
    }

    pub fn with_geocoder(config: ExplorerConfig, geocoder: Option<Arc<dyn ReverseGeocoder>>) -> Result<Self> {
        let runtime = tokio::runtime::Runtime::new()?;

        let event_bus = Arc::new(EventBus::new());
        subscribe_logging(&event_bus);

        let store = Arc::new(DatasetStore::new(event_bus));
        let browse = BrowseEngine::new(store.clone(), config.page_size);
        let enrichment = geocoder.map(|geocoder| EnrichmentService::new(geocoder, config.lookup_cache_capacity));

        Ok(Self {
            config,
            runtime,
            store,
            browse,
            enrichment,
            guards: Vec::new(),
        })
    }

    /// Run the one-shot dataset load. Failures leave an empty dataset.
    pub fn load(&mut self) -> Result<LoadState> {
        let source: Box<dyn DataSource> = match &self.config.dataset_path {
            Some(path) => Box::new(JsonFileSource::new(path.clone())),
            None => Box::new(HttpSource::new(self.config.dataset_url.clone(), self.config.request_timeout())?),
        };

        info!(source = source.source_name(), max_records = self.config.max_records, "loading dataset");
        let dataset = self
            .runtime
            .block_on(load_dataset(source.as_ref(), self.config.max_records));

        self.store.install(dataset);
        self.browse.refresh();
        Ok(self.store.load_state())
    }

    /// Apply one command and return the text to show
    pub fn execute(&mut self, command: Command) -> (Flow, String) {
        let output = match command {
            Command::Search { field, query } => {
                self.browse.set_criterion(field, query.join(" "));
                self.show_page()
            }
            Command::Clear => {
                self.browse.clear_criteria();
                self.show_page()
            }
            Command::Sort { column } => {
                let directive = self.browse.toggle_sort(column);
                format!("Sorted by {} ({})\n{}", column, directive.order.as_str(), self.show_page())
            }
            Command::Page { number } => self.navigate(|browse| browse.seek_page(number)),
            Command::Next => self.navigate(BrowseEngine::next_page),
            Command::Prev => self.navigate(BrowseEngine::previous_page),
            Command::Chart { tab } => self.chart(tab.unwrap_or_default()),
            Command::Map => render::map_view(&self.store.markers(), MAP_LISTING_LIMIT),
            Command::Show => self.show_page(),
            Command::Quit => {
                self.release_rows();
                return (Flow::Quit, String::new());
            }
        };

        (Flow::Continue, output)
    }

    fn navigate<F>(&mut self, step: F) -> String
    where
        F: FnOnce(&BrowseEngine) -> Result<(), mv_core::BrowseError>,
    {
        match step(&self.browse) {
            Ok(()) => self.show_page(),
            Err(e) => e.to_string(),
        }
    }

    fn chart(&self, tab: ChartTab) -> String {
        let summary = self.store.summary();
        let full_count = self.store.full().len();
        render::chart_view(tab, &summary.chart(tab, full_count))
    }

    /// Render the visible page, keeping lookups only for the rows on it
    pub fn show_page(&mut self) -> String {
        let page = self.browse.current_page();

        self.track_rows(&page.items);
        self.settle_rows();

        let enrichment = self.enrichment.as_ref();
        render::page_view(&page, &self.store.load_state(), |_, record: &Record| match enrichment {
            Some(service) => service.lookup(record).label().to_string(),
            None if record.coordinates().is_none() => "No location".to_string(),
            None => "-".to_string(),
        })
    }

    fn track_rows(&mut self, records: &[Record]) {
        let Some(service) = &self.enrichment else {
            return;
        };

        let keys: Vec<String> = records.iter().map(Record::lookup_key).collect();
        let unchanged = self.guards.len() == keys.len()
            && self.guards.iter().zip(&keys).all(|(guard, key)| guard.key() == key);
        if unchanged {
            return;
        }

        // Rows that left the view cancel their lookups on drop
        let _enter = self.runtime.enter();
        self.guards = records.iter().map(|record| service.schedule(record)).collect();
    }

    /// Give the visible rows a moment to resolve before drawing them
    fn settle_rows(&mut self) {
        if self.guards.is_empty() {
            return;
        }

        let limit = self.config.lookup_wait();
        let guards = &mut self.guards;
        let settled = self.runtime.block_on(tokio::time::timeout(limit, async move {
            for guard in guards.iter_mut() {
                guard.wait().await;
            }
        }));

        if settled.is_err() {
            debug!(wait_ms = limit.as_millis() as u64, "rendering with lookups still pending");
        }
    }

    fn release_rows(&mut self) {
        let cancelled = self.guards.len();
        for guard in self.guards.drain(..) {
            if let Some(handle) = guard.cancel() {
                handle.abort();
            }
        }
        if cancelled > 0 {
            info!(cancelled, "released row lookups");
        }
    }
}

impl Drop for ExplorerApp {
    fn drop(&mut self) {
        self.release_rows();
    }
}

fn subscribe_logging(event_bus: &EventBus) {
    event_bus.on(|loaded: &events::DatasetLoaded| {
        info!(source = %loaded.source_name, records = loaded.record_count, "dataset ready");
    });

    event_bus.on(|failed: &events::DatasetLoadFailed| {
        warn!(source = %failed.source_name, "continuing with an empty dataset: {}", failed.error);
    });

    event_bus.on(|applied: &events::FilterApplied| {
        debug!(matched = applied.matched, total = applied.total, "filter applied");
    });
}
