use mv_core::{
    aggregate, filter::matches, filter_records, paginate, sort_records, Record, SearchCriteria, SearchField,
    SortColumn, SortDirective,
};
use serde_json::json;

fn scenario() -> Vec<Record> {
    serde_json::from_value(json!([
        {"name": "Aarhus", "mass": "370", "year": "1951-01-01", "recclass": "H6"},
        {"name": "Abee", "mass": "107000", "year": "1952-06-09", "recclass": "EH4"},
        {"name": "Agen", "mass": null, "year": null, "recclass": "H5"},
    ]))
    .unwrap()
}

/// Small deterministic generator so the property checks cover varied data
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    fn pick<'a>(&mut self, options: &[&'a str]) -> &'a str {
        options[(self.next() as usize) % options.len()]
    }
}

fn generated(count: usize, seed: u64) -> Vec<Record> {
    let mut rng = Lcg(seed);
    (0..count)
        .map(|i| {
            let name = rng.pick(&["Aarhus", "abee", "Agen", "Orgueil", "Zag", ""]);
            let class = rng.pick(&["H6", "L5", "EH4", "Iron, IIIAB", ""]);
            let mass = rng.pick(&["370", "1000", "21", "107000", "bad", ""]);
            let year = rng.pick(&["1880-01-01T00:00:00.000", "1951-01-01", "1990", "", "later"]);
            serde_json::from_value(json!({
                "id": i.to_string(),
                "name": name,
                "recclass": class,
                "mass": mass,
                "year": year,
            }))
            .unwrap()
        })
        .collect()
}

fn criteria_grid() -> Vec<SearchCriteria> {
    vec![
        SearchCriteria::new(),
        SearchCriteria::new().with(SearchField::Name, "a"),
        SearchCriteria::new().with(SearchField::Composition, "h"),
        SearchCriteria::new().with(SearchField::Year, "19"),
        SearchCriteria::new().with(SearchField::Mass, "1"),
        SearchCriteria::new()
            .with(SearchField::Name, "AG")
            .with(SearchField::Composition, "6")
            .with(SearchField::Mass, "0.37"),
    ]
}

fn names(records: &[Record]) -> Vec<&str> {
    records.iter().map(|r| r.name.as_deref().unwrap_or("")).collect()
}

#[test]
fn filter_is_and_composition_of_single_criteria() {
    let dataset = generated(200, 7);

    for criteria in criteria_grid() {
        let result = filter_records(&dataset, &criteria);

        let expected: Vec<Record> = dataset
            .iter()
            .filter(|record| {
                criteria.active().all(|(field, query)| {
                    matches(record, &SearchCriteria::new().with(field, query))
                })
            })
            .cloned()
            .collect();

        assert_eq!(result, expected, "criteria {:?}", criteria);
    }
}

#[test]
fn filter_is_idempotent() {
    let dataset = generated(150, 11);

    for criteria in criteria_grid() {
        let once = filter_records(&dataset, &criteria);
        let twice = filter_records(&once, &criteria);
        assert_eq!(once, twice);
    }
}

#[test]
fn sort_is_stable_in_both_directions() {
    let dataset = generated(120, 3);

    for column in [SortColumn::Name, SortColumn::RecClass, SortColumn::Mass, SortColumn::Year] {
        for directive in [SortDirective::ascending(column), SortDirective::descending(column)] {
            let sorted = sort_records(&dataset, &directive);
            assert_eq!(sorted.len(), dataset.len());

            // ids are the input positions; equal keys must keep increasing ids
            for pair in sorted.windows(2) {
                let ordering = mv_core::sort::compare_records(&pair[0], &pair[1], column);
                if ordering == std::cmp::Ordering::Equal {
                    let a: usize = pair[0].id.as_deref().unwrap().parse().unwrap();
                    let b: usize = pair[1].id.as_deref().unwrap().parse().unwrap();
                    assert!(a < b, "tie reordered for {:?}", directive);
                }
            }
        }
    }
}

#[test]
fn descending_reverses_ascending_without_ties() {
    let dataset: Vec<Record> = serde_json::from_value(json!([
        {"name": "Orgueil", "mass": "14000", "year": "1864-01-01"},
        {"name": "aarhus", "mass": "370", "year": "1951-01-01"},
        {"name": "Zag", "mass": "175000", "year": "1998-01-01"},
        {"name": "Abee", "mass": "107000", "year": "1952-06-09"},
    ]))
    .unwrap();

    for column in [SortColumn::Name, SortColumn::Mass, SortColumn::Year] {
        let ascending = sort_records(&dataset, &SortDirective::ascending(column));
        let mut descending = sort_records(&ascending, &SortDirective::descending(column));
        descending.reverse();
        assert_eq!(descending, ascending);
    }
}

#[test]
fn pages_concatenate_to_the_collection() {
    let dataset = generated(23, 5);

    for page_size in 1..=25 {
        let total_pages = paginate(&dataset, page_size, 1).total_pages;
        let rebuilt: Vec<Record> = (1..=total_pages)
            .flat_map(|index| paginate(&dataset, page_size, index).items)
            .collect();
        assert_eq!(rebuilt, dataset, "page size {}", page_size);

        let beyond = paginate(&dataset, page_size, total_pages + 5);
        assert!(beyond.items.is_empty());
    }
}

#[test]
fn aggregate_of_nothing_is_zero() {
    let summary = aggregate(&[]);
    assert_eq!(summary.mean_mass, 0.0);
    assert_eq!(summary.total_count, 0);
}

#[test]
fn composition_scenario() {
    let dataset = scenario();

    // case-insensitive substring: "EH4" contains "h" as well
    let criteria = SearchCriteria::new().with(SearchField::Composition, "H");
    let filtered = filter_records(&dataset, &criteria);
    assert_eq!(names(&filtered), vec!["Aarhus", "Abee", "Agen"]);

    let criteria = SearchCriteria::new().with(SearchField::Composition, "H").with(SearchField::Name, "ag");
    let filtered = filter_records(&dataset, &criteria);
    assert_eq!(names(&filtered), vec!["Agen"]);
}

#[test]
fn mass_sort_and_page_scenario() {
    let dataset = scenario();
    let filtered: Vec<Record> = vec![dataset[0].clone(), dataset[2].clone()];

    let sorted = sort_records(&filtered, &SortDirective::ascending(SortColumn::Mass));
    assert_eq!(names(&sorted), vec!["Agen", "Aarhus"]);

    let page = paginate(&filtered, 1, 2);
    assert_eq!(names(&page.items), vec!["Agen"]);
    assert_eq!(page.total_count, 2);
    assert_eq!(page.total_pages, 2);

    let page = paginate(&sorted, 1, 2);
    assert_eq!(names(&page.items), vec!["Aarhus"]);
}

#[test]
fn aggregate_scenario() {
    let summary = aggregate(&scenario());

    assert_eq!(summary.total_count, 3);
    assert_eq!(summary.counts_by_year.into_iter().collect::<Vec<_>>(), vec![(1951, 1), (1952, 1)]);
    assert_eq!(
        summary
            .counts_by_class
            .iter()
            .map(|(class, count)| (class.as_str(), *count))
            .collect::<Vec<_>>(),
        vec![("H6", 1), ("EH4", 1), ("H5", 1)]
    );
    assert_eq!(summary.mean_mass, 53685.0);
    assert_eq!(summary.unknown_mass_count, 1);
}
