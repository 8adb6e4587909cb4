use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::ReverseGeocoder;
use crate::DataError;

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    #[serde(default)]
    results: Vec<ReverseResult>,
}

#[derive(Debug, Deserialize)]
struct ReverseResult {
    country: Option<String>,
}

/// Reverse geocoding through the Geoapify HTTP API
pub struct GeoapifyGeocoder {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GeoapifyGeocoder {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Result<Self, DataError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/geocode/reverse", self.base_url)
    }
}

/// Country of the first result, if any
fn first_country(body: &str) -> Result<Option<String>, DataError> {
    let response: ReverseResponse = serde_json::from_str(body)?;
    Ok(response
        .results
        .into_iter()
        .next()
        .and_then(|result| result.country)
        .filter(|country| !country.trim().is_empty()))
}

#[async_trait]
impl ReverseGeocoder for GeoapifyGeocoder {
    async fn country_at(&self, latitude: f64, longitude: f64) -> Result<Option<String>, DataError> {
        let url = self.endpoint();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
                ("format", "json".to_string()),
                ("apiKey", self.api_key.clone()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DataError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        first_country(&body)
    }
}
