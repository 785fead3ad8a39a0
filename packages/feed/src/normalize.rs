//! Normalizes raw feed features into [`EarthquakeRecord`] values.
//!
//! Defaults are applied here and nowhere else: felt reports and the
//! tsunami flag become 0 when missing, unknown optional fields stay `None`.

use chrono::DateTime;
use quake_map_feed_models::{
    CoordinatePolicy, EarthquakeRecord, FeedDefinition, PlaceMode, RawFeature, marker_size,
};
use quake_map_place::parse_place;
use serde::Deserialize as _;

/// Normalizes a list of raw features, preserving feed order.
///
/// Features that cannot be read, are short of coordinates for the feed's
/// [`CoordinatePolicy`], or lack longitude, latitude, or magnitude are
/// skipped.
#[must_use]
pub fn normalize_features(
    features: &[serde_json::Value],
    feed: &FeedDefinition,
) -> Vec<EarthquakeRecord> {
    let records: Vec<EarthquakeRecord> = features
        .iter()
        .filter_map(|feature| normalize_feature(feature, feed.coordinates, feed.place))
        .collect();

    let dropped = features.len() - records.len();
    if dropped > 0 {
        log::debug!(
            "{}: dropped {dropped} of {} features with missing fields",
            feed.id,
            features.len()
        );
    }

    records
}

/// Normalizes a single `GeoJSON` feature.
#[must_use]
pub fn normalize_feature(
    feature: &serde_json::Value,
    coordinates: CoordinatePolicy,
    place: PlaceMode,
) -> Option<EarthquakeRecord> {
    let raw = RawFeature::deserialize(feature).ok()?;
    map_feature(raw, coordinates, place)
}

/// Maps an already-deserialized feature.
#[must_use]
pub fn map_feature(
    raw: RawFeature,
    coordinates: CoordinatePolicy,
    place: PlaceMode,
) -> Option<EarthquakeRecord> {
    let coords = raw.coordinates();
    if coords.len() < coordinates.required_len() {
        return None;
    }

    let longitude = coords.first().copied().flatten();
    let latitude = coords.get(1).copied().flatten();
    let depth_km = coords.get(2).copied().flatten();

    let props = raw.properties.unwrap_or_default();

    // Coordinates can be null even when the array is long enough, and the
    // magnitude comes from properties, so validate after mapping.
    let (Some(longitude), Some(latitude), Some(magnitude)) = (longitude, latitude, props.mag)
    else {
        return None;
    };
    if coordinates.requires_depth() && depth_km.is_none() {
        return None;
    }

    let (region, country, place) = match place {
        PlaceMode::Parsed => {
            let parsed = parse_place(props.place.as_deref());
            (Some(parsed.region), Some(parsed.country), None)
        }
        PlaceMode::Raw => (None, None, props.place),
    };

    Some(EarthquakeRecord {
        longitude,
        latitude,
        depth_km,
        magnitude,
        occurred_at: props.time.and_then(DateTime::from_timestamp_millis),
        alert_level: props.alert,
        magnitude_type: props.mag_type,
        review_status: props.status,
        felt_reports: props.felt.unwrap_or(0),
        tsunami_flag: u8::from(props.tsunami.unwrap_or(false)),
        azimuthal_gap: props.gap,
        region,
        country,
        place,
        marker_size: marker_size(Some(magnitude)),
    })
}
