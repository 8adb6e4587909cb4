//! Plain-text rendering of the list, chart and map views

use mv_core::{ChartTab, ChartView, LoadState, MapMarker, Page, Record};

const BAR_WIDTH: usize = 40;

/// The list view: header, one block per row, then the pager line.
///
/// `location` gives the country label for the row at an absolute position.
pub fn page_view<F>(page: &Page<Record>, load_state: &LoadState, location: F) -> String
where
    F: Fn(usize, &Record) -> String,
{
    if load_state.is_loading() {
        return "Loading meteorite data...".to_string();
    }

    let mut lines = vec![format!("#{} Meteorite strikes", page.total_count)];

    if let LoadState::Failed(reason) = load_state {
        lines.push(format!("(dataset unavailable: {})", reason));
    }

    if page.is_empty() {
        lines.push("No meteorite data found.".to_string());
        return lines.join("\n");
    }

    let offset = (page.page_index - 1) * page.page_size;
    for (i, record) in page.items.iter().enumerate() {
        lines.push(String::new());
        lines.extend(row_lines(record, &location(offset + i, record)));
    }

    lines.push(String::new());
    lines.push(format!("Page {} of {}", page.page_index, page.total_pages));
    lines.join("\n")
}

fn row_lines(record: &Record, location: &str) -> [String; 2] {
    let mass = record
        .mass
        .as_deref()
        .map(|mass| format!("{}g", mass))
        .unwrap_or_else(|| "-".to_string());
    let year = record
        .strike_year()
        .map(|year| year.to_string())
        .unwrap_or_else(|| "-".to_string());

    [
        format!(
            "{} [{}]",
            record.name.as_deref().unwrap_or("Unknown"),
            record.id.as_deref().unwrap_or("-")
        ),
        format!(
            "  Mass: {}  Recclass: {}  Year: {}  Location: {}",
            mass,
            record.recclass.as_deref().unwrap_or("-"),
            year,
            location
        ),
    ]
}

/// One chart tab
pub fn chart_view(tab: ChartTab, view: &ChartView) -> String {
    match view {
        ChartView::Total(count) => format!("{}\n{}", tab.title(), count),
        ChartView::AverageMass(mean) => format!("{}\n{:.2} g", tab.title(), mean),
        ChartView::Bars { title, labels, values } => {
            let mut lines = vec![title.clone()];
            if labels.is_empty() {
                lines.push("(no data)".to_string());
                return lines.join("\n");
            }

            let label_width = labels.iter().map(|label| label.chars().count()).max().unwrap_or(0);
            let max = values.iter().copied().max().unwrap_or(0).max(1);

            for (label, value) in labels.iter().zip(values) {
                let filled = (value * BAR_WIDTH).div_ceil(max);
                lines.push(format!(
                    "{:<width$} | {} {}",
                    label,
                    "#".repeat(filled),
                    value,
                    width = label_width
                ));
            }
            lines.join("\n")
        }
    }
}

/// Strike locations, at most `limit` of them listed
pub fn map_view(markers: &[MapMarker], limit: usize) -> String {
    let mut lines = vec![format!("{} strike locations", markers.len())];

    for marker in markers.iter().take(limit) {
        let mass = match marker.mass.parse::<f64>() {
            Ok(_) => format!("{}g", marker.mass),
            Err(_) => marker.mass.clone(),
        };
        lines.push(format!(
            "{:>9.4} {:>10.4}  {} ({}, {}, {})",
            marker.latitude(),
            marker.longitude(),
            marker.name,
            marker.recclass,
            mass,
            marker.year
        ));
    }
    if markers.len() > limit {
        lines.push(format!("... {} more", markers.len() - limit));
    }
    lines.join("\n")
}
