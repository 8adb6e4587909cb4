//! Column sorting with per-column coercion rules

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::record::Record;
use crate::ParseError;

/// A sortable record column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortColumn {
    Name,
    RecClass,
    Mass,
    Year,
    Fall,
    NameType,
    Id,
}

impl SortColumn {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortColumn::Name => "name",
            SortColumn::RecClass => "recclass",
            SortColumn::Mass => "mass",
            SortColumn::Year => "year",
            SortColumn::Fall => "fall",
            SortColumn::NameType => "nametype",
            SortColumn::Id => "id",
        }
    }

    fn text_of<'r>(&self, record: &'r Record) -> Option<&'r str> {
        match self {
            SortColumn::Name => record.name.as_deref(),
            SortColumn::RecClass => record.recclass.as_deref(),
            SortColumn::Fall => record.fall.as_deref(),
            SortColumn::NameType => record.nametype.as_deref(),
            SortColumn::Id => record.id.as_deref(),
            SortColumn::Mass => record.mass.as_deref(),
            SortColumn::Year => record.year.as_deref(),
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortColumn {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(SortColumn::Name),
            "recclass" | "composition" => Ok(SortColumn::RecClass),
            "mass" => Ok(SortColumn::Mass),
            "year" => Ok(SortColumn::Year),
            "fall" => Ok(SortColumn::Fall),
            "nametype" => Ok(SortColumn::NameType),
            "id" => Ok(SortColumn::Id),
            other => Err(ParseError::UnknownSortColumn(other.to_string())),
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn reversed(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }
}

/// Column and direction for one sort pass. No column means input order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortDirective {
    pub column: Option<SortColumn>,
    pub order: SortOrder,
}

impl SortDirective {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn ascending(column: SortColumn) -> Self {
        Self {
            column: Some(column),
            order: SortOrder::Ascending,
        }
    }

    pub fn descending(column: SortColumn) -> Self {
        Self {
            column: Some(column),
            order: SortOrder::Descending,
        }
    }
}

/// Comparison key after coercion
#[derive(Debug, Clone, PartialEq)]
enum SortKey {
    Number(f64),
    Date(NaiveDateTime),
    Text(String),
}

impl SortKey {
    fn of(record: &Record, column: SortColumn) -> Self {
        match column {
            SortColumn::Mass => SortKey::Number(record.mass_grams().unwrap_or(0.0)),
            // NaiveDateTime defaults to the Unix epoch
            SortColumn::Year => SortKey::Date(record.strike_date().unwrap_or_default()),
            _ => SortKey::Text(
                column
                    .text_of(record)
                    .map(str::to_lowercase)
                    .unwrap_or_default(),
            ),
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
            (SortKey::Date(a), SortKey::Date(b)) => a.cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            // Keys of one pass always share a variant
            _ => Ordering::Equal,
        }
    }
}

/// Return a sorted copy of `collection`. The input is never reordered and
/// equal keys keep their input order in both directions.
pub fn sort_records(collection: &[Record], directive: &SortDirective) -> Vec<Record> {
    let Some(column) = directive.column else {
        return collection.to_vec();
    };

    let mut keyed: Vec<(SortKey, &Record)> = collection
        .iter()
        .map(|record| (SortKey::of(record, column), record))
        .collect();

    match directive.order {
        SortOrder::Ascending => keyed.sort_by(|(a, _), (b, _)| a.compare(b)),
        SortOrder::Descending => keyed.sort_by(|(a, _), (b, _)| b.compare(a)),
    }

    tracing::debug!(column = %column, order = directive.order.as_str(), rows = keyed.len(), "sorted records");

    keyed.into_iter().map(|(_, record)| record.clone()).collect()
}

/// Compare two records on one column using the sort coercions
pub fn compare_records(a: &Record, b: &Record, column: SortColumn) -> Ordering {
    SortKey::of(a, column).compare(&SortKey::of(b, column))
}
