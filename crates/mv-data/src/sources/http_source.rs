use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info};

use super::{into_array, DataSource};
use crate::DataError;

/// Dataset served as a JSON array over HTTP
pub struct HttpSource {
    client: Client,
    url: String,
}

impl HttpSource {
    /// Create a source for `url` with a per-request timeout
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, DataError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn get_array(&self) -> Result<Vec<Value>, DataError> {
        debug!(url = %self.url, "requesting dataset");
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DataError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body: Value = response.json().await?;
        let items = into_array(body)?;
        info!(url = %self.url, count = items.len(), "dataset received");
        Ok(items)
    }
}

#[async_trait]
impl DataSource for HttpSource {
    async fn fetch_all(&self) -> anyhow::Result<Vec<Value>> {
        Ok(self.get_array().await?)
    }

    fn source_name(&self) -> &str {
        &self.url
    }
}
