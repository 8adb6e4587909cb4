//! Summary statistics for the chart tabs

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::record::Record;
use crate::ParseError;

/// Aggregates over one record collection
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub total_count: usize,
    /// Strikes per calendar year, ascending by year
    pub counts_by_year: BTreeMap<i32, usize>,
    /// Strikes per composition class, in first-seen order
    pub counts_by_class: IndexMap<String, usize>,
    /// Mean over records with a numeric mass; 0 when there are none
    pub mean_mass: f64,
    pub unknown_mass_count: usize,
}

impl Summary {
    /// Records that contributed to `mean_mass`
    pub fn known_mass_count(&self) -> usize {
        self.total_count - self.unknown_mass_count
    }

    /// Build the view for one chart tab.
    ///
    /// `full_count` is the size of the unfiltered dataset; the strike-count
    /// tab falls back to it when this summary covers no records.
    pub fn chart(&self, tab: ChartTab, full_count: usize) -> ChartView {
        match tab {
            ChartTab::Number => ChartView::Total(if self.total_count > 0 {
                self.total_count
            } else {
                full_count
            }),
            ChartTab::Mass => ChartView::AverageMass(self.mean_mass),
            ChartTab::Year => ChartView::Bars {
                title: "Number of strikes by year".to_string(),
                labels: self.counts_by_year.keys().map(|year| year.to_string()).collect(),
                values: self.counts_by_year.values().copied().collect(),
            },
            ChartTab::RecClass => ChartView::Bars {
                title: tab.title().to_string(),
                labels: self.counts_by_class.keys().cloned().collect(),
                values: self.counts_by_class.values().copied().collect(),
            },
        }
    }
}

/// Compute the summary for `collection`.
pub fn aggregate(collection: &[Record]) -> Summary {
    let mut summary = Summary {
        total_count: collection.len(),
        ..Summary::default()
    };

    let mut mass_total = 0.0;
    let mut mass_count = 0usize;

    for record in collection {
        if let Some(year) = record.strike_year() {
            *summary.counts_by_year.entry(year).or_insert(0) += 1;
        }
        if let Some(class) = &record.recclass {
            *summary.counts_by_class.entry(class.clone()).or_insert(0) += 1;
        }
        match record.mass_grams() {
            Some(grams) => {
                mass_total += grams;
                mass_count += 1;
            }
            None => summary.unknown_mass_count += 1,
        }
    }

    summary.mean_mass = if mass_count > 0 {
        mass_total / mass_count as f64
    } else {
        0.0
    };

    summary
}

/// Chart tab selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartTab {
    Number,
    Mass,
    #[default]
    Year,
    RecClass,
}

impl ChartTab {
    pub const ALL: [ChartTab; 4] = [ChartTab::Number, ChartTab::Mass, ChartTab::Year, ChartTab::RecClass];

    pub fn code(&self) -> &'static str {
        match self {
            ChartTab::Number => "number",
            ChartTab::Mass => "mass",
            ChartTab::Year => "year",
            ChartTab::RecClass => "recclass",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ChartTab::Number => "Number of strikes",
            ChartTab::Mass => "Average mass",
            ChartTab::Year => "Strikes by year",
            ChartTab::RecClass => "Strikes by composition",
        }
    }
}

impl fmt::Display for ChartTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ChartTab {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "number" => Ok(ChartTab::Number),
            "mass" => Ok(ChartTab::Mass),
            "year" => Ok(ChartTab::Year),
            "recclass" | "composition" => Ok(ChartTab::RecClass),
            other => Err(ParseError::UnknownChartTab(other.to_string())),
        }
    }
}

/// Chart-ready data for one tab
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ChartView {
    /// Total number of strikes
    Total(usize),
    /// Mean mass in grams
    AverageMass(f64),
    Bars {
        title: String,
        labels: Vec<String>,
        values: Vec<usize>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_collection() {
        let summary = aggregate(&[]);
        assert_eq!(summary.total_count, 0);
        assert_eq!(summary.mean_mass, 0.0);
        assert_eq!(summary.unknown_mass_count, 0);
        assert!(summary.counts_by_year.is_empty());
    }

    #[test]
    fn test_no_valid_mass_gives_zero_mean() {
        let records: Vec<Record> = serde_json::from_value(json!([
            {"mass": null},
            {"mass": "?"},
        ]))
        .unwrap();

        let summary = aggregate(&records);
        assert_eq!(summary.mean_mass, 0.0);
        assert_eq!(summary.unknown_mass_count, 2);
        assert_eq!(summary.known_mass_count(), 0);
    }

    #[test]
    fn test_class_order_is_first_seen() {
        let records: Vec<Record> = serde_json::from_value(json!([
            {"recclass": "L6"},
            {"recclass": "H5"},
            {"recclass": "L6"},
            {},
        ]))
        .unwrap();

        let summary = aggregate(&records);
        let classes: Vec<_> = summary.counts_by_class.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        assert_eq!(classes, vec![("L6", 2), ("H5", 1)]);
    }

    #[test]
    fn test_chart_views() {
        let records: Vec<Record> = serde_json::from_value(json!([
            {"recclass": "L6", "year": "1990-01-01", "mass": "10"},
            {"recclass": "H5", "year": "1861-01-01", "mass": "30"},
        ]))
        .unwrap();
        let summary = aggregate(&records);

        assert_eq!(summary.chart(ChartTab::Number, 100), ChartView::Total(2));
        assert_eq!(summary.chart(ChartTab::Mass, 100), ChartView::AverageMass(20.0));
        assert_eq!(
            summary.chart(ChartTab::Year, 100),
            ChartView::Bars {
                title: "Number of strikes by year".to_string(),
                labels: vec!["1861".to_string(), "1990".to_string()],
                values: vec![1, 1],
            }
        );

        let empty = aggregate(&[]);
        assert_eq!(empty.chart(ChartTab::Number, 100), ChartView::Total(100));
    }

    #[test]
    fn test_parse_tab() {
        assert_eq!("recclass".parse::<ChartTab>().unwrap(), ChartTab::RecClass);
        assert_eq!(ChartTab::default(), ChartTab::Year);
        assert!("pie".parse::<ChartTab>().is_err());
    }
}
