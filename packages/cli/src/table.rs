//! Plain-text table rendering for records.

use quake_map_feed_models::{Column, EarthquakeRecord};

const MISSING: &str = "-";

/// Renders `records` as an aligned text table with one header row.
#[must_use]
pub fn render(records: &[&EarthquakeRecord], columns: &[Column]) -> String {
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|r| {
            columns
                .iter()
                .map(|c| r.cell(*c).unwrap_or_else(|| MISSING.to_string()))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            rows.iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(c.as_ref().len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    push_row(&mut out, columns.iter().map(|c| c.as_ref()), &widths);
    for row in &rows {
        push_row(&mut out, row.iter().map(String::as_str), &widths);
    }
    out
}

fn push_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line = cells
        .zip(widths.iter().copied())
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> EarthquakeRecord {
        EarthquakeRecord {
            longitude: 142.25,
            latitude: 38.1,
            depth_km: None,
            magnitude: 5.3,
            occurred_at: None,
            alert_level: None,
            magnitude_type: Some("mww".to_string()),
            review_status: None,
            felt_reports: 12,
            tsunami_flag: 1,
            azimuthal_gap: None,
            region: Some("Japan region".to_string()),
            country: Some("Japan".to_string()),
            place: None,
            marker_size: 53.0,
        }
    }

    #[test]
    fn renders_header_and_rows() {
        let r = record();
        let table = render(&[&r], &[Column::Magnitude, Column::Country, Column::Depth]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "magnitude  country  depth");
        assert_eq!(lines[1], "5.3        Japan    -");
    }

    #[test]
    fn empty_set_renders_header_only() {
        let table = render(&[], Column::PARSED);
        assert_eq!(table.lines().count(), 1);
        assert!(table.starts_with("time"));
    }
}
