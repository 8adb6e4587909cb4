//! Search criteria over the four searchable fields

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ParseError;

/// A field the search box can constrain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    Name,
    Year,
    Composition,
    Mass,
}

impl SearchField {
    pub const ALL: [SearchField; 4] = [
        SearchField::Name,
        SearchField::Year,
        SearchField::Composition,
        SearchField::Mass,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchField::Name => "name",
            SearchField::Year => "year",
            SearchField::Composition => "composition",
            SearchField::Mass => "mass",
        }
    }

    /// Input hint shown next to the search box
    pub fn placeholder(&self) -> &'static str {
        match self {
            SearchField::Name => "Search by meteor name (Ex: Aarhus)",
            SearchField::Year => "Search by meteor year of strike (Ex: 1880)",
            SearchField::Composition => "Search by meteorite composition (Ex: 'Iron' or 'H4')",
            SearchField::Mass => "Search by meteorite mass range (kg) (Ex: 1.44)",
        }
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchField {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(SearchField::Name),
            "year" => Ok(SearchField::Year),
            "composition" | "recclass" => Ok(SearchField::Composition),
            "mass" => Ok(SearchField::Mass),
            other => Err(ParseError::UnknownSearchField(other.to_string())),
        }
    }
}

/// Per-field query fragments. An empty fragment places no constraint on its
/// field; all non-empty fragments must match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub composition: String,
    #[serde(default)]
    pub mass: String,
}

impl SearchCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter
    pub fn with(mut self, field: SearchField, query: impl Into<String>) -> Self {
        self.set(field, query);
        self
    }

    pub fn get(&self, field: SearchField) -> &str {
        match field {
            SearchField::Name => &self.name,
            SearchField::Year => &self.year,
            SearchField::Composition => &self.composition,
            SearchField::Mass => &self.mass,
        }
    }

    pub fn set(&mut self, field: SearchField, query: impl Into<String>) {
        let query = query.into();
        match field {
            SearchField::Name => self.name = query,
            SearchField::Year => self.year = query,
            SearchField::Composition => self.composition = query,
            SearchField::Mass => self.mass = query,
        }
    }

    /// Reset every field to "no constraint"
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.active().next().is_none()
    }

    /// Non-empty criteria in field order
    pub fn active(&self) -> impl Iterator<Item = (SearchField, &str)> + '_ {
        SearchField::ALL
            .into_iter()
            .map(move |field| (field, self.get(field)))
            .filter(|(_, query)| !query.is_empty())
    }
}
