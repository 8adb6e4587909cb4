//! Explorer configuration

use std::path::{Path, PathBuf};
use std::time::Duration;
use serde::{Serialize, Deserialize};

use crate::DataError;

/// Default dataset endpoint (NASA meteorite landings)
pub const DEFAULT_DATASET_URL: &str = "https://data.nasa.gov/resource/gh4g-9sfh.json";

/// Default reverse-geocoding service
pub const DEFAULT_GEOCODER_URL: &str = "https://api.geoapify.com";

/// Number of records kept from the dataset source
pub const DEFAULT_MAX_RECORDS: usize = 5000;

/// Configuration for loading and browsing the dataset
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExplorerConfig {
    /// HTTP endpoint returning a JSON array of records
    pub dataset_url: String,

    /// Local JSON file; used instead of `dataset_url` when set
    pub dataset_path: Option<PathBuf>,

    /// Records kept from the front of the source
    pub max_records: usize,

    /// Rows per list page
    pub page_size: usize,

    /// Timeout for every HTTP request
    pub request_timeout_secs: u64,

    /// Base URL of the reverse geocoder
    pub geocoder_url: String,

    /// Geocoder API key; enrichment is disabled without one
    pub geocoder_api_key: Option<String>,

    /// Row lookups kept in memory
    pub lookup_cache_capacity: usize,

    /// How long a page render waits for its row lookups
    pub lookup_wait_ms: u64,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            dataset_url: DEFAULT_DATASET_URL.to_string(),
            dataset_path: None,
            max_records: DEFAULT_MAX_RECORDS,
            page_size: mv_core::DEFAULT_PAGE_SIZE,
            request_timeout_secs: 30,
            geocoder_url: DEFAULT_GEOCODER_URL.to_string(),
            geocoder_api_key: None,
            lookup_cache_capacity: 1024,
            lookup_wait_ms: 500,
        }
    }
}

impl ExplorerConfig {
    /// Read a JSON configuration file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, DataError> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults, then the optional file, then environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, DataError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply overrides looked up by variable name.
    ///
    /// Recognized: `METEORITE_DATASET_URL`, `METEORITE_DATASET_PATH`,
    /// `METEORITE_MAX_RECORDS`, `METEORITE_PAGE_SIZE`, `GEOAPIFY_API_KEY`,
    /// `GEOAPIFY_URL`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), DataError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(url) = lookup("METEORITE_DATASET_URL") {
            self.dataset_url = url;
        }
        if let Some(path) = lookup("METEORITE_DATASET_PATH") {
            self.dataset_path = Some(PathBuf::from(path));
        }
        if let Some(max) = lookup("METEORITE_MAX_RECORDS") {
            self.max_records = parse_count("METEORITE_MAX_RECORDS", &max)?;
        }
        if let Some(size) = lookup("METEORITE_PAGE_SIZE") {
            self.page_size = parse_count("METEORITE_PAGE_SIZE", &size)?;
        }
        if let Some(key) = lookup("GEOAPIFY_API_KEY") {
            self.geocoder_api_key = Some(key);
        }
        if let Some(url) = lookup("GEOAPIFY_URL") {
            self.geocoder_url = url;
        }

        self.validate()
    }

    pub fn validate(&self) -> Result<(), DataError> {
        if self.page_size == 0 {
            return Err(DataError::Config("page_size must be at least 1".to_string()));
        }
        if self.dataset_path.is_none() && self.dataset_url.trim().is_empty() {
            return Err(DataError::Config("either dataset_url or dataset_path is required".to_string()));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn lookup_wait(&self) -> Duration {
        Duration::from_millis(self.lookup_wait_ms)
    }
}

fn parse_count(key: &str, value: &str) -> Result<usize, DataError> {
    value
        .trim()
        .parse::<usize>()
        .map_err(|_| DataError::Config(format!("{} must be a non-negative integer, got {:?}", key, value)))
}
