use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use async_trait::async_trait;
use serde_json::Value;

use super::{into_array, DataSource};
use crate::DataError;

/// Dataset stored as a JSON array in a local file
pub struct JsonFileSource {
    path: PathBuf,
    name: String,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path.display().to_string();
        Self { path, name }
    }

    async fn read_array(&self) -> Result<Vec<Value>, DataError> {
        tokio::task::spawn_blocking({
            let path = self.path.clone();
            move || {
                let file = File::open(&path)?;
                let value: Value = serde_json::from_reader(BufReader::new(file))?;
                into_array(value)
            }
        })
        .await?
    }
}

#[async_trait]
impl DataSource for JsonFileSource {
    async fn fetch_all(&self) -> anyhow::Result<Vec<Value>> {
        Ok(self.read_array().await?)
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}
