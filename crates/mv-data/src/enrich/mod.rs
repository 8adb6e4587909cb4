//! Per-row country lookups
//!
//! Each visible row with coordinates gets one background lookup. The row
//! keeps the returned [`EnrichmentGuard`]; dropping it cancels the lookup,
//! and a cancelled lookup never writes its result.

pub mod geoapify;

pub use geoapify::GeoapifyGeocoder;

use std::fmt;
use std::sync::Arc;
use async_trait::async_trait;
use mv_core::Record;
use tokio::sync::oneshot::{self, error::TryRecvError};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::cache::LookupCache;
use crate::DataError;

/// Country label shown next to a row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountryLookup {
    /// Lookup not finished (or cancelled)
    Pending,
    Country(String),
    /// The geocoder failed or knew no country
    Unknown,
    /// The record has no usable coordinates
    NoLocation,
}

impl CountryLookup {
    pub fn label(&self) -> &str {
        match self {
            CountryLookup::Pending => "Loading...",
            CountryLookup::Country(name) => name.as_str(),
            CountryLookup::Unknown => "Unknown",
            CountryLookup::NoLocation => "No location",
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, CountryLookup::Pending)
    }
}

impl fmt::Display for CountryLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Trait for reverse geocoders
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    /// Country at the given point, `None` when the service has no answer
    async fn country_at(&self, latitude: f64, longitude: f64) -> Result<Option<String>, DataError>;
}

/// Schedules lookups and holds their results
pub struct EnrichmentService {
    geocoder: Arc<dyn ReverseGeocoder>,
    cache: Arc<LookupCache<String, CountryLookup>>,
}

impl EnrichmentService {
    pub fn new(geocoder: Arc<dyn ReverseGeocoder>, cache_capacity: usize) -> Self {
        Self {
            geocoder,
            cache: Arc::new(LookupCache::new(cache_capacity)),
        }
    }

    /// Current result for a record, [`CountryLookup::Pending`] if none yet
    pub fn lookup(&self, record: &Record) -> CountryLookup {
        self.cache
            .get(&record.lookup_key())
            .unwrap_or(CountryLookup::Pending)
    }

    /// Start the lookup for a record. Must be called within a Tokio runtime.
    ///
    /// Results are keyed by [`Record::lookup_key`], never by list position.
    /// Records without coordinates resolve immediately to `NoLocation`, and
    /// records with a cached result are not looked up again.
    pub fn schedule(&self, record: &Record) -> EnrichmentGuard {
        let key = record.lookup_key();

        let Some((latitude, longitude)) = record.coordinates() else {
            self.cache.put(key.clone(), CountryLookup::NoLocation);
            return EnrichmentGuard::settled(key);
        };

        if self.cache.contains(&key) {
            return EnrichmentGuard::settled(key);
        }

        let (cancel, mut cancelled) = oneshot::channel::<()>();
        let geocoder = self.geocoder.clone();
        let cache = self.cache.clone();
        let task_key = key.clone();

        let handle = tokio::spawn(async move {
            let outcome = tokio::select! {
                biased;
                _ = &mut cancelled => {
                    debug!(key = %task_key, "lookup cancelled");
                    return;
                }
                outcome = geocoder.country_at(latitude, longitude) => outcome,
            };

            // The guard may have gone away while the response was decoded
            if !matches!(cancelled.try_recv(), Err(TryRecvError::Empty)) {
                debug!(key = %task_key, "lookup cancelled, result discarded");
                return;
            }

            let result = match outcome {
                Ok(Some(country)) => CountryLookup::Country(country),
                Ok(None) => CountryLookup::Unknown,
                Err(e) => {
                    warn!(key = %task_key, latitude, longitude, "reverse geocoding failed: {}", e);
                    CountryLookup::Unknown
                }
            };
            cache.put(task_key, result);
        });

        EnrichmentGuard {
            key,
            cancel: Some(cancel),
            handle: Some(handle),
        }
    }

    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }
}

/// Row-owned handle for a scheduled lookup. Dropping it cancels the lookup.
#[derive(Debug)]
pub struct EnrichmentGuard {
    key: String,
    cancel: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl EnrichmentGuard {
    fn settled(key: String) -> Self {
        Self {
            key,
            cancel: None,
            handle: None,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether a lookup task is still attached to this guard
    pub fn is_active(&self) -> bool {
        self.handle.as_ref().map_or(false, |handle| !handle.is_finished())
    }

    /// Wait for the lookup to finish without cancelling it.
    ///
    /// Safe to abandon midway (e.g. under a timeout); the guard keeps the task.
    pub async fn wait(&mut self) {
        if let Some(handle) = self.handle.as_mut() {
            let result = handle.await;
            self.handle = None;
            if let Err(e) = result {
                warn!(key = %self.key, "lookup task failed: {}", e);
            }
        }
    }

    /// Cancel the lookup, returning its task handle so callers can await shutdown
    pub fn cancel(mut self) -> Option<JoinHandle<()>> {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
        self.handle.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    struct FixedGeocoder {
        answer: Option<String>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ReverseGeocoder for FixedGeocoder {
        async fn country_at(&self, _latitude: f64, _longitude: f64) -> Result<Option<String>, DataError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.answer.clone())
        }
    }

    struct FailingGeocoder;

    #[async_trait]
    impl ReverseGeocoder for FailingGeocoder {
        async fn country_at(&self, _latitude: f64, _longitude: f64) -> Result<Option<String>, DataError> {
            Err(DataError::Status {
                url: "http://geocoder".to_string(),
                status: 401,
            })
        }
    }

    /// Blocks until released
    struct GatedGeocoder {
        release: Arc<Notify>,
    }

    #[async_trait]
    impl ReverseGeocoder for GatedGeocoder {
        async fn country_at(&self, _latitude: f64, _longitude: f64) -> Result<Option<String>, DataError> {
            self.release.notified().await;
            Ok(Some("Denmark".to_string()))
        }
    }

    fn located() -> Record {
        serde_json::from_value(json!({"id": "2", "name": "Aarhus", "reclat": "56.18333", "reclong": "10.23333"})).unwrap()
    }

    fn fixed(answer: Option<&str>) -> Arc<FixedGeocoder> {
        Arc::new(FixedGeocoder {
            answer: answer.map(str::to_string),
            calls: AtomicUsize::new(0),
        })
    }

    #[tokio::test]
    async fn test_successful_lookup() {
        let geocoder = fixed(Some("Denmark"));
        let service = EnrichmentService::new(geocoder.clone(), 16);
        let record = located();

        let mut guard = service.schedule(&record);
        assert_eq!(guard.key(), "id:2");
        guard.wait().await;

        assert_eq!(service.lookup(&record), CountryLookup::Country("Denmark".to_string()));

        // Cached rows are not looked up again
        let mut again = service.schedule(&record);
        again.wait().await;
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_country_is_unknown() {
        let service = EnrichmentService::new(fixed(None), 16);
        let mut guard = service.schedule(&located());
        guard.wait().await;
        assert_eq!(service.lookup(&located()).label(), "Unknown");
    }

    #[tokio::test]
    async fn test_failure_is_unknown() {
        let service = EnrichmentService::new(Arc::new(FailingGeocoder), 16);
        let mut guard = service.schedule(&located());
        guard.wait().await;
        assert_eq!(service.lookup(&located()), CountryLookup::Unknown);
    }

    #[tokio::test]
    async fn test_no_coordinates_skips_geocoder() {
        let geocoder = fixed(Some("Denmark"));
        let service = EnrichmentService::new(geocoder.clone(), 16);
        let record: Record = serde_json::from_value(json!({"name": "Agen", "reclat": "44.2"})).unwrap();

        let guard = service.schedule(&record);
        assert!(!guard.is_active());
        assert_eq!(service.lookup(&record).label(), "No location");
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);
    }

    /// Answers by hemisphere
    struct HemisphereGeocoder;

    #[async_trait]
    impl ReverseGeocoder for HemisphereGeocoder {
        async fn country_at(&self, latitude: f64, _longitude: f64) -> Result<Option<String>, DataError> {
            let country = if latitude >= 0.0 { "Denmark" } else { "Chile" };
            Ok(Some(country.to_string()))
        }
    }

    #[tokio::test]
    async fn test_records_without_id_do_not_share_results() {
        let service = EnrichmentService::new(Arc::new(HemisphereGeocoder), 16);
        let north: Record = serde_json::from_value(json!({"name": "Twin", "reclat": "56.0", "reclong": "10.0"})).unwrap();
        let south: Record = serde_json::from_value(json!({"name": "Twin", "reclat": "-24.0", "reclong": "-69.0"})).unwrap();

        service.schedule(&north).wait().await;
        assert_eq!(service.lookup(&south), CountryLookup::Pending);

        service.schedule(&south).wait().await;
        assert_eq!(service.lookup(&north).label(), "Denmark");
        assert_eq!(service.lookup(&south).label(), "Chile");
    }

    #[tokio::test]
    async fn test_wait_can_be_abandoned() {
        let release = Arc::new(Notify::new());
        let service = EnrichmentService::new(
            Arc::new(GatedGeocoder {
                release: release.clone(),
            }),
            16,
        );
        let record = located();

        let mut guard = service.schedule(&record);
        let timed_out = tokio::time::timeout(std::time::Duration::from_millis(20), guard.wait()).await;
        assert!(timed_out.is_err());
        assert!(guard.is_active());

        release.notify_one();
        guard.wait().await;
        assert_eq!(service.lookup(&record).label(), "Denmark");
    }

    #[tokio::test]
    async fn test_cancelled_lookup_leaves_no_result() {
        let release = Arc::new(Notify::new());
        let service = EnrichmentService::new(
            Arc::new(GatedGeocoder {
                release: release.clone(),
            }),
            16,
        );

        let guard = service.schedule(&located());
        assert!(service.lookup(&located()).is_pending());

        let handle = guard.cancel().expect("lookup task");
        release.notify_one();
        handle.await.unwrap();

        assert_eq!(service.lookup(&located()), CountryLookup::Pending);
        assert_eq!(service.cached_count(), 0);
    }

    #[tokio::test]
    async fn test_dropped_guard_cancels() {
        let release = Arc::new(Notify::new());
        let service = EnrichmentService::new(
            Arc::new(GatedGeocoder {
                release: release.clone(),
            }),
            16,
        );

        drop(service.schedule(&located()));
        release.notify_one();
        tokio::task::yield_now().await;
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        assert_eq!(service.lookup(&located()), CountryLookup::Pending);
    }
}
