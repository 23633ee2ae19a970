//! Core data model: POIs, filters, viewport bounds, and display markers.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single point of interest as surfaced to the rendering layer.
///
/// Identity is the `(lat, lon, poi_type)` tuple; upstream records carry no
/// stable primary key, so duplicate suppression relies on that tuple alone.
/// `lat`/`lon` are always finite WGS84 degrees — records missing or carrying
/// non-finite coordinates are dropped during normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poi {
    pub lat: f64,
    pub lon: f64,
    /// Display name; normalization falls back through `name:ja` → `name` →
    /// a per-type default string.
    pub name: String,
    /// The semantic filter id this POI was fetched under (e.g. `"toilets"`),
    /// not the raw upstream category.
    #[serde(rename = "type")]
    pub poi_type: String,
    /// Open-ended upstream metadata (opening hours, phone, website, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<HashMap<String, String>>,
    /// Which upstream produced the record: `"overpass"`, `"nominatim"` or
    /// `"popular"`.
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Poi {
    /// Looks up a tag value, treating a missing tag map as an empty one.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.as_ref()?.get(key).map(String::as_str)
    }
}

/// A map filter as owned by the UI layer and passed into the core by value.
///
/// Filters are configuration, not fetched data; the core only consumes `id`
/// and `api_source` but carries the full shape so callers can round-trip it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub id: String,
    pub label: String,
    pub icon: String,
    pub enabled: bool,
    pub color: String,
    pub api_source: String,
}

/// A geographic viewport rectangle: `(south, west, north, east)` degrees.
///
/// Construction is consistent but the four values are not validated against
/// any particular ordering; cache keys only need a stable serialization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        Bounds {
            south,
            west,
            north,
            east,
        }
    }

    /// Derives a viewport from a map center, expanding by `margin` degrees
    /// on each side.
    pub fn from_center(center: (f64, f64), margin: f64) -> Self {
        let (lat, lon) = center;
        Bounds {
            south: lat - margin,
            west: lon - margin,
            north: lat + margin,
            east: lon + margin,
        }
    }

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.south && lat <= self.north && lon >= self.west && lon <= self.east
    }
}

/// Serializes as `south,west,north,east` — the order the Overpass bbox
/// syntax expects, and the form used inside cache keys.
impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.south, self.west, self.north, self.east)
    }
}

/// A synthetic aggregate marker standing in for several nearby POIs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub count: usize,
    /// Centroid latitude of the member POIs.
    pub lat: f64,
    /// Centroid longitude of the member POIs.
    pub lon: f64,
    pub members: Vec<Poi>,
}

/// What the density reducer hands to the rendering layer: either an
/// individual POI or a cluster of them.
///
/// An explicit sum type rather than an optional `is_cluster` flag, so
/// exhaustive handling is checked at compile time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Marker {
    Poi(Poi),
    Cluster(Cluster),
}

impl Marker {
    /// Number of underlying POIs this marker represents.
    pub fn poi_count(&self) -> usize {
        match self {
            Marker::Poi(_) => 1,
            Marker::Cluster(cluster) => cluster.count,
        }
    }
}

/// Durable-tier entry counts, for diagnostics only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub total_entries: u64,
    pub expired_entries: u64,
    pub valid_entries: u64,
}
