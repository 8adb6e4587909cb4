//! One-shot dataset loading

use mv_core::{Dataset, Record};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::sources::DataSource;

/// Fetch, truncate and decode the dataset.
///
/// Never fails: a source error is logged and yields an empty dataset in the
/// failed state, so the views render their empty state.
pub async fn load_dataset(source: &dyn DataSource, max_records: usize) -> Dataset {
    let name = source.source_name().to_string();

    match source.fetch_all().await {
        Ok(items) => {
            let available = items.len();
            let records = decode_records(items, max_records);
            info!(source = %name, available, kept = records.len(), "dataset loaded");
            Dataset::loaded(name, records)
        }
        Err(e) => {
            error!(source = %name, "failed to load dataset: {:#}", e);
            Dataset::failed(name, format!("{:#}", e))
        }
    }
}

/// Decode the first `max_records` elements, skipping any that are not records
pub fn decode_records(items: Vec<Value>, max_records: usize) -> Vec<Record> {
    let mut skipped = 0usize;

    let records: Vec<Record> = items
        .into_iter()
        .take(max_records)
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value::<Record>(item) {
            Ok(record) => Some(record),
            Err(e) => {
                skipped += 1;
                warn!(index, "skipping malformed record: {}", e);
                None
            }
        })
        .collect();

    if skipped > 0 {
        warn!(skipped, "some records could not be decoded");
    }
    records
}
