#![allow(clippy::too_many_lines)]
//! Static place-name alias table.
//!
//! Maps lowercase place fragments (US states, territories, and a few
//! region names the feed uses) to the canonical country name used for
//! grouping.

use std::collections::BTreeMap;
use std::sync::LazyLock;

static COUNTRY_ALIASES: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    BTreeMap::from([
        // ── US states ───────────────────────────────────────────────
        ("alabama", "USA"),
        ("alaska", "USA"),
        ("arizona", "USA"),
        ("arkansas", "USA"),
        ("california", "USA"),
        ("colorado", "USA"),
        ("connecticut", "USA"),
        ("delaware", "USA"),
        ("florida", "USA"),
        ("georgia", "USA"),
        ("hawaii", "USA"),
        ("idaho", "USA"),
        ("illinois", "USA"),
        ("indiana", "USA"),
        ("iowa", "USA"),
        ("kansas", "USA"),
        ("kentucky", "USA"),
        ("louisiana", "USA"),
        ("maine", "USA"),
        ("maryland", "USA"),
        ("massachusetts", "USA"),
        ("michigan", "USA"),
        ("minnesota", "USA"),
        ("mississippi", "USA"),
        ("missouri", "USA"),
        ("montana", "USA"),
        ("nebraska", "USA"),
        ("nevada", "USA"),
        ("new hampshire", "USA"),
        ("new jersey", "USA"),
        ("new mexico", "USA"),
        ("new york", "USA"),
        ("north carolina", "USA"),
        ("north dakota", "USA"),
        ("ohio", "USA"),
        ("oklahoma", "USA"),
        ("oregon", "USA"),
        ("pennsylvania", "USA"),
        ("rhode island", "USA"),
        ("south carolina", "USA"),
        ("south dakota", "USA"),
        ("tennessee", "USA"),
        ("texas", "USA"),
        ("utah", "USA"),
        ("vermont", "USA"),
        ("virginia", "USA"),
        ("washington", "USA"),
        ("west virginia", "USA"),
        ("wisconsin", "USA"),
        ("wyoming", "USA"),
        // ── US territories ──────────────────────────────────────────
        ("american samoa", "USA"),
        ("guam", "USA"),
        ("northern mariana islands", "USA"),
        ("puerto rico", "USA"),
        ("u.s. virgin islands", "USA"),
        ("virgin islands", "USA"),
        ("united states", "USA"),
        ("usa", "USA"),
        // ── Other countries and feed region names ───────────────────
        ("canada", "Canada"),
        ("chile", "Chile"),
        ("indonesia region", "Indonesia"),
        ("japan region", "Japan"),
        ("mexico", "Mexico"),
        ("new zealand region", "New Zealand"),
        ("philippines region", "Philippines"),
    ])
});

/// Looks up the canonical country for a lowercase place fragment.
#[must_use]
pub fn country_alias(key: &str) -> Option<&'static str> {
    COUNTRY_ALIASES.get(key).copied()
}
