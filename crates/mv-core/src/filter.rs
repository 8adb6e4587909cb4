//! Multi-criteria record filtering

use crate::criteria::{SearchCriteria, SearchField};
use crate::record::Record;

/// Keep the records that satisfy every non-empty criterion, in input order.
pub fn filter_records(dataset: &[Record], criteria: &SearchCriteria) -> Vec<Record> {
    if criteria.is_empty() {
        return dataset.to_vec();
    }

    let criteria = PreparedCriteria::new(criteria);
    dataset
        .iter()
        .filter(|record| criteria.matches(record))
        .cloned()
        .collect()
}

/// Whether a single record passes all active criteria
pub fn matches(record: &Record, criteria: &SearchCriteria) -> bool {
    PreparedCriteria::new(criteria).matches(record)
}

/// Criteria with case-folded text queries, computed once per filter pass
struct PreparedCriteria {
    queries: Vec<(SearchField, String)>,
}

impl PreparedCriteria {
    fn new(criteria: &SearchCriteria) -> Self {
        let queries = criteria
            .active()
            .map(|(field, query)| match field {
                SearchField::Name | SearchField::Composition => (field, query.to_lowercase()),
                SearchField::Year | SearchField::Mass => (field, query.to_string()),
            })
            .collect();

        Self { queries }
    }

    fn matches(&self, record: &Record) -> bool {
        self.queries
            .iter()
            .all(|(field, query)| field_matches(record, *field, query))
    }
}

fn field_matches(record: &Record, field: SearchField, query: &str) -> bool {
    match field {
        SearchField::Name => record
            .name
            .as_deref()
            .is_some_and(|name| name.to_lowercase().contains(query)),
        SearchField::Year => record
            .strike_year()
            .is_some_and(|year| year.to_string().contains(query)),
        SearchField::Composition => record
            .recclass
            .as_deref()
            .is_some_and(|class| class.to_lowercase().contains(query)),
        SearchField::Mass => record
            .mass_grams()
            .is_some_and(|grams| format_decimal(grams / 1000.0).contains(query)),
    }
}

/// Shortest round-trip decimal text for a number, using exponent notation
/// only outside `[1e-6, 1e21)` the way browsers print numbers.
pub fn format_decimal(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return value.to_string();
    }

    let text = format!("{:e}", value);
    match text.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_name_is_case_insensitive() {
        let records = vec![
            record(json!({"name": "Aarhus"})),
            record(json!({"name": "Abee"})),
            record(json!({})),
        ];
        let criteria = SearchCriteria::new().with(SearchField::Name, "AAR");

        let result = filter_records(&records, &criteria);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name.as_deref(), Some("Aarhus"));
    }

    #[test]
    fn test_year_matches_substring_of_calendar_year() {
        let records = vec![
            record(json!({"name": "a", "year": "1951-01-01T00:00:00.000"})),
            record(json!({"name": "b", "year": "1895-01-01T00:00:00.000"})),
            record(json!({"name": "c", "year": null})),
            record(json!({"name": "d", "year": "unknown"})),
        ];
        let criteria = SearchCriteria::new().with(SearchField::Year, "95");

        let names: Vec<_> = filter_records(&records, &criteria)
            .into_iter()
            .filter_map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_mass_is_matched_in_kilograms() {
        let records = vec![
            record(json!({"name": "Aarhus", "mass": "370"})),
            record(json!({"name": "Abee", "mass": 107000})),
            record(json!({"name": "Agen"})),
            record(json!({"name": "Odd", "mass": "n/a"})),
        ];

        let criteria = SearchCriteria::new().with(SearchField::Mass, "0.37");
        let result = filter_records(&records, &criteria);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name.as_deref(), Some("Aarhus"));

        let criteria = SearchCriteria::new().with(SearchField::Mass, "107");
        let result = filter_records(&records, &criteria);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name.as_deref(), Some("Abee"));
    }

    #[test]
    fn test_empty_criteria_returns_everything() {
        let records = vec![record(json!({"name": "x"})), record(json!({}))];
        assert_eq!(filter_records(&records, &SearchCriteria::new()), records);
    }

    #[test]
    fn test_format_decimal() {
        assert_eq!(format_decimal(0.37), "0.37");
        assert_eq!(format_decimal(107.0), "107");
        assert_eq!(format_decimal(-0.0), "0");
        assert_eq!(format_decimal(1.5e-7), "1.5e-7");
        assert_eq!(format_decimal(2e21), "2e+21");
    }
}
