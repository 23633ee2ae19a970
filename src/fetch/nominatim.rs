//! Nominatim geocoding: free-text search over Japan and reverse lookup.
//!
//! Shares the service-wide rate limiter under its own API name and interval.
//! Like the POI fetch path, failures degrade to empty results rather than
//! surfacing errors to the UI layer.

use std::collections::HashMap;
use std::sync::Arc;

use log::warn;
use serde::Deserialize;

use crate::config::{NOMINATIM_API, SEARCH_RESULT_LIMIT};
use crate::error_handling::{
    categorize_fetch_error, FetchError, InfoType, ServiceStats,
};
use crate::models::Poi;
use crate::rate_limiter::RateLimiter;

#[derive(Debug, Deserialize)]
pub(crate) struct NominatimPlace {
    pub(crate) lat: String,
    pub(crate) lon: String,
    pub(crate) display_name: String,
    #[serde(rename = "type")]
    pub(crate) place_type: Option<String>,
    pub(crate) place_id: Option<i64>,
    pub(crate) osm_type: Option<String>,
    pub(crate) osm_id: Option<i64>,
    pub(crate) importance: Option<f64>,
    #[serde(default)]
    pub(crate) namedetails: HashMap<String, String>,
    #[serde(default)]
    pub(crate) extratags: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    display_name: String,
}

/// Raw HTTP access to a Nominatim instance.
pub struct NominatimApi {
    client: Arc<reqwest::Client>,
    endpoint: String,
}

impl NominatimApi {
    pub fn new(client: Arc<reqwest::Client>, endpoint: String) -> Self {
        NominatimApi { client, endpoint }
    }

    async fn search_raw(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<NominatimPlace>, FetchError> {
        let response = self
            .client
            .get(format!("{}/search", self.endpoint))
            .query(&[
                ("format", "json"),
                ("q", query),
                ("countrycodes", "jp"),
                ("limit", &limit.to_string()),
                ("addressdetails", "1"),
                ("extratags", "1"),
                ("namedetails", "1"),
                ("accept-language", "ja,en"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::StatusError(status));
        }

        Ok(response.json().await?)
    }

    async fn reverse_raw(&self, lat: f64, lon: f64) -> Result<ReverseResponse, FetchError> {
        let response = self
            .client
            .get(format!("{}/reverse", self.endpoint))
            .query(&[
                ("format", "json"),
                ("lat", lat.to_string().as_str()),
                ("lon", lon.to_string().as_str()),
                ("addressdetails", "1"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::StatusError(status));
        }

        Ok(response.json().await?)
    }
}

/// Geocoding front: rate-limited search and reverse lookup with the same
/// degradation discipline as the POI fetcher.
pub struct GeocodingClient {
    api: NominatimApi,
    limiter: Arc<RateLimiter>,
    stats: Arc<ServiceStats>,
}

impl GeocodingClient {
    pub fn new(api: NominatimApi, limiter: Arc<RateLimiter>, stats: Arc<ServiceStats>) -> Self {
        GeocodingClient {
            api,
            limiter,
            stats,
        }
    }

    /// Free-text search across Japan. Empty queries and upstream failures
    /// both resolve to an empty list.
    pub async fn search(&self, query: &str) -> Vec<Poi> {
        if query.trim().is_empty() {
            return Vec::new();
        }

        self.limiter.throttle(NOMINATIM_API).await;
        self.stats.increment_info(InfoType::SearchRequest);

        match self.api.search_raw(query, SEARCH_RESULT_LIMIT).await {
            Ok(places) => places.into_iter().filter_map(normalize_place).collect(),
            Err(e) => {
                self.stats.increment_error(categorize_fetch_error(&e));
                warn!("search for {query:?} failed: {e}");
                Vec::new()
            }
        }
    }

    /// Reverse geocoding: coordinates to a human-readable address. `None`
    /// on failure; callers fall back to formatted coordinates.
    pub async fn reverse(&self, lat: f64, lon: f64) -> Option<String> {
        self.limiter.throttle(NOMINATIM_API).await;
        self.stats.increment_info(InfoType::ReverseGeocode);

        match self.api.reverse_raw(lat, lon).await {
            Ok(response) => Some(response.display_name),
            Err(e) => {
                self.stats.increment_error(categorize_fetch_error(&e));
                warn!("reverse geocode for ({lat}, {lon}) failed: {e}");
                None
            }
        }
    }
}

/// Converts a raw Nominatim place into the domain model. Places whose
/// coordinate strings do not parse to finite floats are dropped, matching
/// the Overpass normalization path.
fn normalize_place(place: NominatimPlace) -> Option<Poi> {
    let lat: f64 = place.lat.parse().ok().filter(|v: &f64| v.is_finite())?;
    let lon: f64 = place.lon.parse().ok().filter(|v: &f64| v.is_finite())?;

    let name = place
        .namedetails
        .get("name:ja")
        .or_else(|| place.namedetails.get("name"))
        .cloned()
        .unwrap_or_else(|| {
            place
                .display_name
                .split(',')
                .next()
                .unwrap_or_default()
                .trim()
                .to_string()
        });

    let mut tags: HashMap<String, String> = place.extratags;
    if let Some(place_id) = place.place_id {
        tags.insert("place_id".to_string(), place_id.to_string());
    }
    if let Some(osm_type) = place.osm_type {
        tags.insert("osm_type".to_string(), osm_type);
    }
    if let Some(osm_id) = place.osm_id {
        tags.insert("osm_id".to_string(), osm_id.to_string());
    }
    if let Some(importance) = place.importance {
        tags.insert("importance".to_string(), importance.to_string());
    }

    Some(Poi {
        lat,
        lon,
        name,
        poi_type: place.place_type.unwrap_or_else(|| "place".to_string()),
        tags: Some(tags),
        source: "nominatim".to_string(),
        address: Some(place.display_name),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(namedetails: &[(&str, &str)], display_name: &str) -> NominatimPlace {
        NominatimPlace {
            lat: "35.6586".to_string(),
            lon: "139.7454".to_string(),
            display_name: display_name.to_string(),
            place_type: Some("attraction".to_string()),
            place_id: Some(123),
            osm_type: Some("node".to_string()),
            osm_id: Some(456),
            importance: Some(0.7),
            namedetails: namedetails
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            extratags: HashMap::new(),
        }
    }

    #[test]
    fn name_prefers_japanese_then_generic_then_display_name() {
        let ja = normalize_place(place(
            &[("name:ja", "東京スカイツリー"), ("name", "Tokyo Skytree")],
            "Tokyo Skytree, Sumida, Tokyo, Japan",
        ))
        .expect("valid place");
        assert_eq!(ja.name, "東京スカイツリー");

        let generic = normalize_place(place(
            &[("name", "Tokyo Skytree")],
            "Tokyo Skytree, Sumida, Tokyo, Japan",
        ))
        .expect("valid place");
        assert_eq!(generic.name, "Tokyo Skytree");

        let fallback = normalize_place(place(&[], "Tokyo Skytree, Sumida, Tokyo, Japan"))
            .expect("valid place");
        assert_eq!(fallback.name, "Tokyo Skytree");
    }

    #[test]
    fn normalized_place_carries_provenance_tags() {
        let poi = normalize_place(place(&[], "Somewhere, Japan")).expect("valid place");
        assert_eq!(poi.source, "nominatim");
        assert_eq!(poi.poi_type, "attraction");
        assert_eq!(poi.address.as_deref(), Some("Somewhere, Japan"));
        assert_eq!(poi.tag("place_id"), Some("123"));
        assert_eq!(poi.tag("osm_type"), Some("node"));
        assert!((poi.lat - 35.6586).abs() < 1e-9);
    }

    #[test]
    fn places_with_unparseable_coordinates_are_dropped() {
        let mut bad_lat = place(&[], "Nowhere, Japan");
        bad_lat.lat = "not-a-number".to_string();
        assert!(normalize_place(bad_lat).is_none());

        let mut bad_lon = place(&[], "Nowhere, Japan");
        bad_lon.lon = "inf".to_string();
        assert!(normalize_place(bad_lon).is_none());
    }
}
