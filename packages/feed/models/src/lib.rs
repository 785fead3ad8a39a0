#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Feed definition types and the canonical normalized earthquake record.
//!
//! Every earthquake feed (USGS summary feeds and anything shaped like
//! them) is described by a [`FeedDefinition`]. Raw `GeoJSON` features are
//! read into [`RawFeature`] and mapped into [`EarthquakeRecord`] values by
//! the ingestion pipeline.

pub mod lenient;

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Request timeout applied when a feed definition does not set one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Cache time-to-live applied when a feed definition does not set one.
pub const DEFAULT_TTL_SECS: u64 = 60;

/// Multiplier from magnitude to map marker size.
pub const MARKER_SCALE: f64 = 10.0;

/// How many coordinates a feature must carry to be kept.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CoordinatePolicy {
    /// Longitude and latitude only. Depth is kept when present.
    LonLat,
    /// Longitude, latitude, and depth are all required.
    #[default]
    LonLatDepth,
}

impl CoordinatePolicy {
    /// Minimum length of the `coordinates` array.
    #[must_use]
    pub const fn required_len(self) -> usize {
        match self {
            Self::LonLat => 2,
            Self::LonLatDepth => 3,
        }
    }

    /// Whether a record without a depth value must be dropped.
    #[must_use]
    pub const fn requires_depth(self) -> bool {
        matches!(self, Self::LonLatDepth)
    }
}

/// What happens to the feed's free-text `place` string.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PlaceMode {
    /// Split into region and country; the raw string is dropped.
    #[default]
    Parsed,
    /// Keep the raw string untouched; region and country stay empty.
    Raw,
}

/// A feed definition, loaded from an embedded TOML file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedDefinition {
    /// Unique identifier (e.g., `"all_day"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// `GeoJSON` endpoint.
    pub url: String,
    /// Whether this feed is offered for selection.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Upper bound on the single HTTP request, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// How long a fetched record set stays fresh, in seconds.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    /// Coordinate completeness required per feature.
    #[serde(default)]
    pub coordinates: CoordinatePolicy,
    /// Place string handling.
    #[serde(default)]
    pub place: PlaceMode,
}

const fn default_true() -> bool {
    true
}

const fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

const fn default_ttl_secs() -> u64 {
    DEFAULT_TTL_SECS
}

impl FeedDefinition {
    /// Request timeout as a [`Duration`].
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Cache time-to-live as a [`Duration`].
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// One feature as delivered by the feed.
///
/// Every field is optional. Validation happens when the feature is mapped
/// to an [`EarthquakeRecord`], never here.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawFeature {
    /// Point geometry.
    #[serde(default)]
    pub geometry: Option<RawGeometry>,
    /// Event attributes.
    #[serde(default)]
    pub properties: Option<RawProperties>,
}

impl RawFeature {
    /// Coordinates as `[longitude, latitude, depth?]`, empty when absent.
    #[must_use]
    pub fn coordinates(&self) -> &[Option<f64>] {
        self.geometry
            .as_ref()
            .and_then(|g| g.coordinates.as_deref())
            .unwrap_or_default()
    }
}

/// `GeoJSON` point geometry.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawGeometry {
    /// `[longitude, latitude, depth_km]`, any entry may be null.
    #[serde(default)]
    pub coordinates: Option<Vec<Option<f64>>>,
}

/// The `properties` object of a feed feature.
///
/// Only `mag` is read strictly. The other properties are optional and an
/// unreadable value in one of them becomes `None` (see [`lenient`]).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProperties {
    /// Magnitude.
    pub mag: Option<f64>,
    /// Free-text location, e.g. `"18km SE of Alaska, USA"`.
    #[serde(default, deserialize_with = "lenient::text")]
    pub place: Option<String>,
    /// Origin time in epoch milliseconds.
    #[serde(default, deserialize_with = "lenient::millis")]
    pub time: Option<i64>,
    /// PAGER alert level (`green`, `yellow`, `orange`, `red`).
    #[serde(default, deserialize_with = "lenient::text")]
    pub alert: Option<String>,
    /// Number of "did you feel it" reports.
    #[serde(default, deserialize_with = "lenient::count")]
    pub felt: Option<u32>,
    /// Tsunami flag, set for oceanic events in tsunami regions.
    #[serde(default, deserialize_with = "lenient::flag")]
    pub tsunami: Option<bool>,
    /// Magnitude calculation method.
    #[serde(default, deserialize_with = "lenient::text")]
    pub mag_type: Option<String>,
    /// Review status (`automatic`, `reviewed`).
    #[serde(default, deserialize_with = "lenient::text")]
    pub status: Option<String>,
    /// Largest azimuthal gap between stations, in degrees.
    #[serde(default, deserialize_with = "lenient::number")]
    pub gap: Option<f64>,
}

/// An earthquake event normalized to the canonical schema.
///
/// Longitude, latitude, and magnitude are always present. Region and
/// country are filled only when the feed's [`PlaceMode`] is
/// [`PlaceMode::Parsed`]; the raw `place` only when it is
/// [`PlaceMode::Raw`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarthquakeRecord {
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Depth below the surface in kilometres.
    pub depth_km: Option<f64>,
    /// Magnitude.
    pub magnitude: f64,
    /// When the event occurred.
    pub occurred_at: Option<DateTime<Utc>>,
    /// PAGER alert level.
    pub alert_level: Option<String>,
    /// Magnitude calculation method.
    pub magnitude_type: Option<String>,
    /// Review status.
    pub review_status: Option<String>,
    /// Felt reports, 0 when the feed has none.
    pub felt_reports: u32,
    /// Tsunami flag, always 0 or 1.
    pub tsunami_flag: u8,
    /// Largest azimuthal gap in degrees.
    pub azimuthal_gap: Option<f64>,
    /// Region derived from the place string.
    pub region: Option<String>,
    /// Country derived from the place string.
    pub country: Option<String>,
    /// Raw place string (raw place mode only).
    pub place: Option<String>,
    /// Map marker size derived from the magnitude.
    pub marker_size: f64,
}

/// Computes the map marker size for a magnitude.
///
/// Missing magnitudes count as zero and negative results clamp to zero.
#[must_use]
pub fn marker_size(magnitude: Option<f64>) -> f64 {
    (magnitude.unwrap_or(0.0) * MARKER_SCALE).max(0.0)
}

impl EarthquakeRecord {
    /// Formats one column of this record for tabular display.
    ///
    /// Returns `None` when the record has no value for the column.
    #[must_use]
    pub fn cell(&self, column: Column) -> Option<String> {
        match column {
            Column::Time => self
                .occurred_at
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string()),
            Column::Magnitude => Some(format!("{:.1}", self.magnitude)),
            Column::Depth => self.depth_km.map(|d| format!("{d:.1}")),
            Column::MagType => self.magnitude_type.clone(),
            Column::Region => self.region.clone(),
            Column::Country => self.country.clone(),
            Column::Place => self.place.clone(),
            Column::Felt => Some(self.felt_reports.to_string()),
            Column::Tsunami => Some(self.tsunami_flag.to_string()),
            Column::Alert => self.alert_level.clone(),
            Column::Status => self.review_status.clone(),
            Column::Gap => self.azimuthal_gap.map(|g| format!("{g:.0}")),
            Column::Lat => Some(format!("{:.4}", self.latitude)),
            Column::Lon => Some(format!("{:.4}", self.longitude)),
        }
    }
}

/// A display column of the record table, addressable by name.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
pub enum Column {
    #[strum(serialize = "time")]
    #[serde(rename = "time")]
    Time,
    #[strum(serialize = "magnitude")]
    #[serde(rename = "magnitude")]
    Magnitude,
    #[strum(serialize = "depth")]
    #[serde(rename = "depth")]
    Depth,
    #[strum(serialize = "magType")]
    #[serde(rename = "magType")]
    MagType,
    #[strum(serialize = "region")]
    #[serde(rename = "region")]
    Region,
    #[strum(serialize = "country")]
    #[serde(rename = "country")]
    Country,
    #[strum(serialize = "place")]
    #[serde(rename = "place")]
    Place,
    #[strum(serialize = "felt")]
    #[serde(rename = "felt")]
    Felt,
    #[strum(serialize = "tsunami")]
    #[serde(rename = "tsunami")]
    Tsunami,
    #[strum(serialize = "alert")]
    #[serde(rename = "alert")]
    Alert,
    #[strum(serialize = "status")]
    #[serde(rename = "status")]
    Status,
    #[strum(serialize = "gap")]
    #[serde(rename = "gap")]
    Gap,
    #[strum(serialize = "lat")]
    #[serde(rename = "lat")]
    Lat,
    #[strum(serialize = "lon")]
    #[serde(rename = "lon")]
    Lon,
}

impl Column {
    /// Default table columns when the place string is parsed.
    pub const PARSED: &[Self] = &[
        Self::Time,
        Self::Magnitude,
        Self::Depth,
        Self::MagType,
        Self::Region,
        Self::Country,
        Self::Felt,
        Self::Tsunami,
        Self::Alert,
        Self::Status,
        Self::Gap,
        Self::Lat,
        Self::Lon,
    ];

    /// Default table columns when the raw place string is kept.
    pub const RAW: &[Self] = &[
        Self::Time,
        Self::Place,
        Self::Magnitude,
        Self::MagType,
        Self::Felt,
        Self::Tsunami,
        Self::Alert,
        Self::Status,
        Self::Gap,
        Self::Lat,
        Self::Lon,
    ];

    /// Columns to show for records produced under `mode`.
    #[must_use]
    pub const fn for_mode(mode: PlaceMode) -> &'static [Self] {
        match mode {
            PlaceMode::Parsed => Self::PARSED,
            PlaceMode::Raw => Self::RAW,
        }
    }

    /// Legend text explaining the column.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Time => "Date and time of the event.",
            Self::Magnitude => "Strength of the earthquake (Richter scale).",
            Self::Depth => {
                "Depth of the event below the surface (in km). Shallow quakes are more destructive."
            }
            Self::MagType => "Method used for magnitude calculation.",
            Self::Region => "Specific location description (distance from a local feature).",
            Self::Country => "Country or major geographical region (e.g., USA, Japan, Oceanic).",
            Self::Place => "Location description as reported by the feed.",
            Self::Felt => "Number of user-reported perceptions.",
            Self::Tsunami => "Tsunami warning status (1=Yes).",
            Self::Alert => "USGS alert level (e.g., green, yellow).",
            Self::Status => "Review status (reviewed/automatic).",
            Self::Gap => "Largest azimuthal gap of reporting stations (data quality).",
            Self::Lat => "Latitude (North/South position).",
            Self::Lon => "Longitude (East/West position).",
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use super::*;

    fn record() -> EarthquakeRecord {
        EarthquakeRecord {
            longitude: -150.5,
            latitude: 61.25,
            depth_km: Some(35.2),
            magnitude: 4.2,
            occurred_at: DateTime::from_timestamp_millis(1_700_000_000_000),
            alert_level: None,
            magnitude_type: Some("ml".to_string()),
            review_status: Some("reviewed".to_string()),
            felt_reports: 3,
            tsunami_flag: 0,
            azimuthal_gap: None,
            region: Some("18km SE of Anchorage".to_string()),
            country: Some("USA".to_string()),
            place: None,
            marker_size: 42.0,
        }
    }

    #[test]
    fn marker_size_scales_magnitude() {
        assert!((marker_size(Some(4.5)) - 45.0).abs() < f64::EPSILON);
    }

    #[test]
    fn marker_size_treats_missing_as_zero() {
        assert!(marker_size(None).abs() < f64::EPSILON);
    }

    #[test]
    fn marker_size_never_negative() {
        assert!(marker_size(Some(-0.8)).abs() < f64::EPSILON);
    }

    #[test]
    fn coordinate_policy_lengths() {
        assert_eq!(CoordinatePolicy::LonLat.required_len(), 2);
        assert_eq!(CoordinatePolicy::LonLatDepth.required_len(), 3);
        assert!(!CoordinatePolicy::LonLat.requires_depth());
        assert!(CoordinatePolicy::LonLatDepth.requires_depth());
    }

    #[test]
    fn policies_parse_from_snake_case() {
        assert_eq!(
            CoordinatePolicy::from_str("lon_lat").unwrap(),
            CoordinatePolicy::LonLat
        );
        assert_eq!(PlaceMode::from_str("raw").unwrap(), PlaceMode::Raw);
    }

    #[test]
    fn columns_round_trip_through_names() {
        assert_eq!(Column::from_str("magType").unwrap(), Column::MagType);
        assert_eq!(Column::Lat.to_string(), "lat");
        assert!(Column::from_str("bogus").is_err());
    }

    #[test]
    fn parsed_columns_exclude_raw_place() {
        assert!(!Column::for_mode(PlaceMode::Parsed).contains(&Column::Place));
        assert!(Column::for_mode(PlaceMode::Raw).contains(&Column::Place));
        assert!(!Column::for_mode(PlaceMode::Raw).contains(&Column::Country));
    }

    #[test]
    fn cell_formats_values() {
        let r = record();
        assert_eq!(r.cell(Column::Magnitude).as_deref(), Some("4.2"));
        assert_eq!(r.cell(Column::Depth).as_deref(), Some("35.2"));
        assert_eq!(r.cell(Column::Country).as_deref(), Some("USA"));
        assert_eq!(r.cell(Column::Felt).as_deref(), Some("3"));
        assert_eq!(r.cell(Column::Alert), None);
        assert_eq!(
            r.cell(Column::Time).as_deref(),
            Some("2023-11-14 22:13:20")
        );
    }

    #[test]
    fn raw_feature_tolerates_nulls() {
        let feature: RawFeature = serde_json::from_str(
            r#"{"geometry": {"coordinates": [10.0, null, 5.0]}, "properties": {"mag": null, "magType": "mb"}}"#,
        )
        .unwrap();
        assert_eq!(feature.coordinates(), &[Some(10.0), None, Some(5.0)]);
        let props = feature.properties.unwrap();
        assert_eq!(props.mag, None);
        assert_eq!(props.mag_type.as_deref(), Some("mb"));
    }

    #[test]
    fn raw_feature_without_geometry_has_no_coordinates() {
        let feature: RawFeature = serde_json::from_str(r#"{"geometry": null}"#).unwrap();
        assert!(feature.coordinates().is_empty());
    }

    #[test]
    fn feed_definition_applies_defaults() {
        let def: FeedDefinition = serde_json::from_str(
            r#"{"id": "x", "name": "X", "url": "https://example.com/x.geojson"}"#,
        )
        .unwrap();
        assert!(def.enabled);
        assert_eq!(def.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(def.ttl(), Duration::from_secs(DEFAULT_TTL_SECS));
        assert_eq!(def.coordinates, CoordinatePolicy::LonLatDepth);
        assert_eq!(def.place, PlaceMode::Parsed);
    }
}
