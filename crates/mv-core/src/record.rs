//! Meteorite record model and field coercions

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A single meteorite observation.
///
/// Every field is optional. Scalars arrive from the dataset as JSON strings or
/// numbers and are kept in their textual form; the typed accessors below apply
/// the per-field coercion rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub nametype: Option<String>,

    /// Composition class (e.g. `H6`, `L5`, `Iron, IIIAB`)
    #[serde(default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub recclass: Option<String>,

    /// Mass in grams
    #[serde(default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub mass: Option<String>,

    /// `Fell` or `Found`
    #[serde(default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub fall: Option<String>,

    /// Date-like strike value; only the calendar year is meaningful
    #[serde(default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,

    #[serde(default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub reclat: Option<String>,

    #[serde(default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub reclong: Option<String>,

    #[serde(default, deserialize_with = "loose_geolocation", skip_serializing_if = "Option::is_none")]
    pub geolocation: Option<GeoLocation>,
}

/// Nested location object carried by some dataset exports
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    #[serde(default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub latitude: Option<String>,

    #[serde(default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub longitude: Option<String>,
}

impl Record {
    /// Stable key for list rendering: the id, or `name-index` when the id is absent.
    pub fn identity_key(&self, index: usize) -> String {
        match &self.id {
            Some(id) => id.clone(),
            None => format!("{}-{}", self.name.as_deref().unwrap_or("undefined"), index),
        }
    }

    /// Key tied to the record rather than its list position: the id, or the
    /// name with the raw coordinates when the id is absent.
    pub fn lookup_key(&self) -> String {
        match &self.id {
            Some(id) => format!("id:{}", id),
            None => format!(
                "{}@{},{}",
                self.name.as_deref().unwrap_or("undefined"),
                self.reclat.as_deref().unwrap_or(""),
                self.reclong.as_deref().unwrap_or("")
            ),
        }
    }

    /// Mass in grams, if it is a finite number
    pub fn mass_grams(&self) -> Option<f64> {
        self.mass.as_deref().and_then(parse_number)
    }

    /// Parsed strike date, if present and readable
    pub fn strike_date(&self) -> Option<NaiveDateTime> {
        self.year.as_deref().and_then(parse_strike_date)
    }

    /// Calendar year of the strike
    pub fn strike_year(&self) -> Option<i32> {
        self.strike_date().map(|date| date.year())
    }

    /// `(latitude, longitude)` when both coordinates are present and numeric
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let lat = self.reclat.as_deref().and_then(parse_number)?;
        let lon = self.reclong.as_deref().and_then(parse_number)?;
        Some((lat, lon))
    }
}

/// Parse a finite decimal number, ignoring surrounding whitespace.
pub fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Parse the date-like `year` field.
///
/// Accepts ISO date-times with or without fractional seconds, RFC 3339
/// timestamps, plain `YYYY-MM-DD` dates and bare calendar years.
pub fn parse_strike_date(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(datetime) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(datetime);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(text) {
        return Some(datetime.naive_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }

    let digits = text.strip_prefix('-').unwrap_or(text);
    if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
        let year = text.parse::<i32>().ok()?;
        return NaiveDate::from_ymd_opt(year, 1, 1).and_then(|date| date.and_hms_opt(0, 0, 0));
    }

    None
}

/// Accept a string, number or bool as text. Null, blanks and structured
/// values are treated as absent.
fn loose_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(text)) if !text.trim().is_empty() => Some(text),
        Some(Value::Number(number)) => Some(number.to_string()),
        Some(Value::Bool(flag)) => Some(flag.to_string()),
        _ => None,
    })
}

/// A geolocation that does not have the expected shape is dropped instead of
/// failing the whole record.
fn loose_geolocation<'de, D>(deserializer: D) -> Result<Option<GeoLocation>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| serde_json::from_value(value).ok()))
}
