//! Dataset sources
//!
//! A source produces the raw JSON array the dataset is decoded from. The
//! default source is the public HTTP endpoint; a local file can stand in for
//! it when working offline.

pub mod http_source;
pub mod json_file_source;

pub use http_source::HttpSource;
pub use json_file_source::JsonFileSource;

use serde_json::Value;

use crate::DataError;

/// Trait for dataset sources
#[async_trait::async_trait]
pub trait DataSource: Send + Sync {
    /// Fetch every element of the source's JSON array
    async fn fetch_all(&self) -> anyhow::Result<Vec<Value>>;

    /// Get the source name/path
    fn source_name(&self) -> &str;
}

/// Unwrap a top-level JSON array
pub(crate) fn into_array(value: Value) -> Result<Vec<Value>, DataError> {
    match value {
        Value::Array(items) => Ok(items),
        other => Err(DataError::UnexpectedShape(format!(
            "expected a JSON array, got {}",
            kind_of(&other)
        ))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
