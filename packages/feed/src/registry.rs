//! Feed registry: loads feed definitions from embedded TOML configs.
//!
//! Each `.toml` file in `packages/feed/feeds/` is baked into the binary at
//! compile time via [`include_str!`]. Adding a feed means adding a TOML
//! file and listing it below.

use quake_map_feed_models::FeedDefinition;

use crate::FeedError;

/// Feed used when none is requested.
pub const DEFAULT_FEED_ID: &str = "all_day";

/// Environment variable selecting the feed by id.
pub const FEED_ENV_VAR: &str = "QUAKE_MAP_FEED";

/// TOML configs embedded at compile time.
const FEED_TOMLS: &[(&str, &str)] = &[
    ("all_hour", include_str!("../feeds/all_hour.toml")),
    ("all_day", include_str!("../feeds/all_day.toml")),
    ("m4_5_day", include_str!("../feeds/m4_5_day.toml")),
    (
        "significant_week",
        include_str!("../feeds/significant_week.toml"),
    ),
];

#[cfg(test)]
const EXPECTED_FEED_COUNT: usize = 4;

/// Parses one feed definition.
///
/// # Errors
///
/// Returns [`FeedError::Definition`] if the TOML is malformed.
pub fn parse_feed_toml(toml_str: &str) -> Result<FeedDefinition, FeedError> {
    Ok(toml::de::from_str(toml_str)?)
}

/// Returns all feed definitions (enabled and disabled).
///
/// # Panics
///
/// Panics if any TOML config is malformed (this is a compile-time guarantee
/// since the configs are embedded).
#[must_use]
pub fn all_feeds() -> Vec<FeedDefinition> {
    FEED_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            parse_feed_toml(toml_str).unwrap_or_else(|e| panic!("Failed to parse {name}.toml: {e}"))
        })
        .collect()
}

/// Returns only enabled feeds.
#[must_use]
pub fn enabled_feeds() -> Vec<FeedDefinition> {
    all_feeds().into_iter().filter(|f| f.enabled).collect()
}

/// Looks up an enabled feed by id.
///
/// # Errors
///
/// Returns [`FeedError::UnknownFeed`] if no enabled feed has that id.
pub fn find_feed(id: &str) -> Result<FeedDefinition, FeedError> {
    enabled_feeds()
        .into_iter()
        .find(|f| f.id == id)
        .ok_or_else(|| FeedError::UnknownFeed { id: id.to_string() })
}

/// Returns the default feed: past-day events with depth required and the
/// place string parsed.
///
/// # Errors
///
/// Returns [`FeedError::UnknownFeed`] if the default feed was disabled.
pub fn default_feed() -> Result<FeedDefinition, FeedError> {
    find_feed(DEFAULT_FEED_ID)
}

/// Resolves the feed to use: an explicit id, then [`FEED_ENV_VAR`], then
/// [`DEFAULT_FEED_ID`].
///
/// # Errors
///
/// Returns [`FeedError::UnknownFeed`] if the selected id is not an enabled
/// feed.
pub fn resolve_feed(id: Option<&str>) -> Result<FeedDefinition, FeedError> {
    select_feed(id, std::env::var(FEED_ENV_VAR).ok().as_deref())
}

/// Picks a feed from an explicit id and an environment value, in that
/// order, falling back to [`DEFAULT_FEED_ID`]. A blank environment value
/// counts as unset.
///
/// # Errors
///
/// Returns [`FeedError::UnknownFeed`] if the selected id is not an enabled
/// feed.
pub fn select_feed(id: Option<&str>, env: Option<&str>) -> Result<FeedDefinition, FeedError> {
    if let Some(id) = id {
        return find_feed(id);
    }
    match env.map(str::trim) {
        Some(id) if !id.is_empty() => find_feed(id),
        _ => default_feed(),
    }
}
