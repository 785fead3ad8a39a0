//! Dashboard key figures and record filtering.

use quake_map_feed_models::EarthquakeRecord;
use serde::Serialize;

/// Key figures over a record set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedSummary {
    /// Number of records.
    pub total: usize,
    /// Records with the tsunami flag set.
    pub tsunami_events: usize,
    /// Highest felt-report count.
    pub max_felt_reports: u32,
    /// Largest magnitude, `None` for an empty set.
    pub max_magnitude: Option<f64>,
    /// Mean azimuthal gap over records that report one.
    pub mean_azimuthal_gap: Option<f64>,
}

impl FeedSummary {
    /// Computes the summary of `records`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_records(records: &[EarthquakeRecord]) -> Self {
        let gaps: Vec<f64> = records.iter().filter_map(|r| r.azimuthal_gap).collect();
        let mean_azimuthal_gap =
            (!gaps.is_empty()).then(|| gaps.iter().sum::<f64>() / gaps.len() as f64);

        Self {
            total: records.len(),
            tsunami_events: records.iter().filter(|r| r.tsunami_flag == 1).count(),
            max_felt_reports: records.iter().map(|r| r.felt_reports).max().unwrap_or(0),
            max_magnitude: records.iter().map(|r| r.magnitude).reduce(f64::max),
            mean_azimuthal_gap,
        }
    }
}

/// Selection applied to a record set before display.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilter {
    /// Keep records with at least this magnitude.
    pub min_magnitude: Option<f64>,
    /// Keep records whose country matches, ignoring case.
    pub country: Option<String>,
}

impl RecordFilter {
    /// Whether `record` passes the filter.
    #[must_use]
    pub fn matches(&self, record: &EarthquakeRecord) -> bool {
        if self.min_magnitude.is_some_and(|min| record.magnitude < min) {
            return false;
        }
        match &self.country {
            Some(wanted) => record
                .country
                .as_deref()
                .is_some_and(|c| c.to_lowercase() == wanted.to_lowercase()),
            None => true,
        }
    }

    /// Returns the records passing the filter, in order.
    #[must_use]
    pub fn apply<'a>(&self, records: &'a [EarthquakeRecord]) -> Vec<&'a EarthquakeRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}
