#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Place string parsing for earthquake feeds.
//!
//! Feed `place` strings look like `"18km SE of Anchorage, Alaska"` or
//! `"Mid-Atlantic Ridge"`. [`parse_place`] splits them into a region and a
//! country using ordered rules and the static alias table in [`aliases`].

pub mod aliases;

use serde::{Deserialize, Serialize};

pub use aliases::country_alias;

/// Region used when the feed has no place string.
pub const UNKNOWN_REGION: &str = "Unknown Region";

/// Country used when the feed has no place string.
pub const UNKNOWN_COUNTRY: &str = "Unknown Country";

/// Country for comma-separated places whose region collapses into the
/// country (e.g. `", USA"`).
pub const LOCAL_UNKNOWN: &str = "Local/Unknown";

/// Country for single-segment places matching an ocean feature keyword.
pub const OCEANIC: &str = "Oceanic";

/// Country for single-segment places no rule recognizes.
pub const UNKNOWN_LOCAL: &str = "Unknown/Local";

const OCEANIC_KEYWORDS: &[&str] = &["ridge", "trench", "ocean", "sea", "of the earth"];

const AREA_KEYWORDS: &[&str] = &["region", "area"];

const REGION_SUFFIX: &str = " region";

/// A place string split into region and country.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParsedPlace {
    /// Local description, e.g. `"18km SE of Anchorage"`.
    pub region: String,
    /// Country or major area, e.g. `"USA"`, `"Oceanic"`.
    pub country: String,
}

impl ParsedPlace {
    fn new(region: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            country: country.into(),
        }
    }

    fn unknown() -> Self {
        Self::new(UNKNOWN_REGION, UNKNOWN_COUNTRY)
    }
}

/// Splits a feed place string into region and country.
///
/// Never fails: missing or blank input yields
/// `("Unknown Region", "Unknown Country")`. Comma-separated input is
/// handled before single-segment input, and alias lookups always win over
/// keyword heuristics.
#[must_use]
pub fn parse_place(raw: Option<&str>) -> ParsedPlace {
    let Some(raw) = raw.filter(|s| !s.trim().is_empty()) else {
        return ParsedPlace::unknown();
    };

    let segments: Vec<&str> = raw.split(',').collect();

    match segments.split_last() {
        Some((last, rest)) if !rest.is_empty() => parse_segments(raw, last, rest),
        _ => parse_single(raw),
    }
}

fn parse_segments(raw: &str, last: &str, rest: &[&str]) -> ParsedPlace {
    let mut country = last.trim().to_string();
    let mut region = rest
        .iter()
        .map(|s| s.trim())
        .collect::<Vec<_>>()
        .join(", ")
        .trim()
        .to_string();

    let lowered = country.to_lowercase();
    let normalized = lowered.strip_suffix(REGION_SUFFIX).unwrap_or(&lowered).trim();
    if let Some(mapped) = country_alias(normalized) {
        country = mapped.to_string();
    }

    if region.is_empty() || region.to_lowercase() == country.to_lowercase() {
        region = raw
            .rsplit_once(" of ")
            .map_or_else(|| country.clone(), |(_, after)| after.trim().to_string());
        country = LOCAL_UNKNOWN.to_string();
    }

    ParsedPlace { region, country }
}

fn parse_single(raw: &str) -> ParsedPlace {
    let region = raw.trim();
    let lowered = region.to_lowercase();

    let country = if let Some(mapped) = country_alias(&lowered) {
        mapped.to_string()
    } else if contains_any(&lowered, OCEANIC_KEYWORDS) {
        OCEANIC.to_string()
    } else if contains_any(&lowered, AREA_KEYWORDS) {
        region
            .strip_suffix(REGION_SUFFIX)
            .unwrap_or(region)
            .trim()
            .to_string()
    } else {
        UNKNOWN_LOCAL.to_string()
    };

    ParsedPlace::new(region, country)
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}
