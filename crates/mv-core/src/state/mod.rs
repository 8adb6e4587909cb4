use std::sync::Arc;
use parking_lot::RwLock;

use crate::aggregate::{aggregate, Summary};
use crate::criteria::SearchCriteria;
use crate::events::{events, EventBus};
use crate::filter::filter_records;
use crate::markers::{build_markers, MapMarker};
use crate::record::Record;

/// Where the one-shot dataset load stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// No dataset installed yet
    Loading,
    /// Loaded with at least one record
    Ready,
    /// Loaded, but the source returned no records
    Empty,
    /// The load failed; the store holds an empty dataset
    Failed(String),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }
}

/// Immutable snapshot produced by the dataset loader
#[derive(Debug, Clone)]
pub struct Dataset {
    source_name: String,
    records: Arc<[Record]>,
    state: LoadState,
}

impl Dataset {
    /// A successful load. An empty record list yields [`LoadState::Empty`].
    pub fn loaded(source_name: impl Into<String>, records: Vec<Record>) -> Self {
        let state = if records.is_empty() {
            LoadState::Empty
        } else {
            LoadState::Ready
        };

        Self {
            source_name: source_name.into(),
            records: records.into(),
            state,
        }
    }

    /// A failed load, degraded to an empty dataset
    pub fn failed(source_name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            records: Arc::from(Vec::new()),
            state: LoadState::Failed(error.into()),
        }
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }
}

/// Holds the full dataset and the active filtered subset.
///
/// The dataset is installed once and never changes afterwards; the filtered
/// subset is only ever replaced wholesale through [`DatasetStore::replace_filtered`].
pub struct DatasetStore {
    dataset: RwLock<Dataset>,
    filtered: RwLock<Arc<[Record]>>,
    event_bus: Arc<EventBus>,
}

impl DatasetStore {
    /// Create an empty store in the [`LoadState::Loading`] state
    pub fn new(event_bus: Arc<EventBus>) -> Self {
        Self {
            dataset: RwLock::new(Dataset {
                source_name: String::new(),
                records: Arc::from(Vec::new()),
                state: LoadState::Loading,
            }),
            filtered: RwLock::new(Arc::from(Vec::new())),
            event_bus,
        }
    }

    /// Create a store with the dataset already installed
    pub fn with_dataset(event_bus: Arc<EventBus>, dataset: Dataset) -> Self {
        let store = Self::new(event_bus);
        store.install(dataset);
        store
    }

    /// Install the loaded dataset. Only the first call has an effect.
    pub fn install(&self, dataset: Dataset) -> bool {
        let mut slot = self.dataset.write();
        if !slot.state.is_loading() {
            tracing::warn!(source = %dataset.source_name, "dataset already installed, ignoring reload");
            return false;
        }

        *self.filtered.write() = dataset.records.clone();
        *slot = dataset;

        let source_name = slot.source_name.clone();
        let record_count = slot.records.len();
        let state = slot.state.clone();
        drop(slot);

        match state {
            LoadState::Failed(error) => {
                self.event_bus.publish(events::DatasetLoadFailed { source_name, error });
            }
            _ => {
                tracing::info!(source = %source_name, records = record_count, "dataset installed");
                self.event_bus.publish(events::DatasetLoaded { source_name, record_count });
            }
        }

        true
    }

    pub fn load_state(&self) -> LoadState {
        self.dataset.read().state.clone()
    }

    pub fn source_name(&self) -> String {
        self.dataset.read().source_name.clone()
    }

    /// The full dataset
    pub fn full(&self) -> Arc<[Record]> {
        self.dataset.read().records.clone()
    }

    /// The active filtered subset
    pub fn filtered(&self) -> Arc<[Record]> {
        self.filtered.read().clone()
    }

    /// Replace the filtered subset
    pub fn replace_filtered(&self, records: Vec<Record>) {
        let matched = records.len();
        *self.filtered.write() = records.into();

        let total = self.dataset.read().records.len();
        tracing::debug!(matched, total, "filtered subset replaced");
        self.event_bus.publish(events::FilterApplied { matched, total });
    }

    /// Filter the full dataset with `criteria` and make the result the active subset
    pub fn apply(&self, criteria: &SearchCriteria) -> usize {
        let records = filter_records(&self.full(), criteria);
        let matched = records.len();
        self.replace_filtered(records);
        matched
    }

    /// Chart summary of the filtered subset
    pub fn summary(&self) -> Summary {
        aggregate(&self.filtered())
    }

    /// Map markers for the filtered subset
    pub fn markers(&self) -> Vec<MapMarker> {
        build_markers(&self.filtered())
    }

    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.event_bus
    }
}
