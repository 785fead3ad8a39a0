#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Earthquake feed ingestion.
//!
//! Downloads a `GeoJSON` earthquake feed, maps each feature to an
//! [`EarthquakeRecord`] (dropping incomplete ones), and keeps the result in
//! a time-bounded cache owned by a [`FeedPipeline`]. Feeds are defined as
//! TOML files embedded at compile time (see [`registry`]).
//!
//! [`FeedPipeline::load_records`] never fails: transport and parse errors
//! are logged, recorded as a diagnostic message, and surface to the caller
//! as an empty record set.

pub mod cache;
pub mod fetch;
pub mod normalize;
pub mod pipeline;
pub mod registry;
pub mod summary;

use std::sync::Arc;

use quake_map_feed_models::EarthquakeRecord;
use thiserror::Error;

pub use pipeline::FeedPipeline;

/// An immutable, shareable snapshot of normalized records.
pub type RecordSet = Arc<[EarthquakeRecord]>;

/// Returns an empty [`RecordSet`].
#[must_use]
pub fn empty_record_set() -> RecordSet {
    Arc::from(Vec::new())
}

/// Errors that can occur while fetching or configuring a feed.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Connection failure, timeout, or unreadable body.
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The feed answered with a non-success status.
    #[error("Feed request to {url} failed with status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Requested URL.
        url: String,
    },

    /// The response body is not valid JSON.
    #[error("Malformed feed response: {0}")]
    Malformed(#[from] serde_json::Error),

    /// A feed definition could not be parsed.
    #[error("Invalid feed definition: {0}")]
    Definition(#[from] toml::de::Error),

    /// The requested feed is not configured.
    #[error("Unknown feed '{id}'")]
    UnknownFeed {
        /// The requested feed id.
        id: String,
    },
}

impl FeedError {
    /// Whether the error happened before a response body was obtained.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Status { .. })
    }
}
