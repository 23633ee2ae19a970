//! Normalization of raw Overpass payloads into the domain model.
//!
//! Every tag access handles absence explicitly: upstream records routinely
//! lack names, addresses, or the whole tag map. Records without finite
//! coordinates are dropped rather than surfaced.

use std::collections::HashMap;

use serde::Deserialize;

use super::queries::default_name;
use crate::error_handling::FetchError;
use crate::models::Poi;

#[derive(Debug, Deserialize)]
pub(crate) struct OverpassResponse {
    #[serde(default)]
    pub(crate) elements: Vec<OverpassElement>,
}

/// A raw Overpass element. Coordinates are optional at the wire level
/// (non-node elements omit them) even though the queries only ask for
/// nodes.
#[derive(Debug, Deserialize)]
pub(crate) struct OverpassElement {
    pub(crate) lat: Option<f64>,
    pub(crate) lon: Option<f64>,
    #[serde(default)]
    pub(crate) tags: Option<HashMap<String, String>>,
}

/// Parses an Overpass JSON body and normalizes its elements.
pub(crate) fn parse_overpass_body(body: &str, filter_id: &str) -> Result<Vec<Poi>, FetchError> {
    let response: OverpassResponse = serde_json::from_str(body)?;
    Ok(normalize_elements(response.elements, filter_id))
}

pub(crate) fn normalize_elements(elements: Vec<OverpassElement>, filter_id: &str) -> Vec<Poi> {
    elements
        .into_iter()
        .filter_map(|element| normalize_element(element, filter_id))
        .collect()
}

fn normalize_element(element: OverpassElement, filter_id: &str) -> Option<Poi> {
    let (lat, lon) = match (element.lat, element.lon) {
        (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => (lat, lon),
        _ => return None,
    };

    let tags = element.tags;
    let name = lookup_tag(&tags, "name:ja")
        .or_else(|| lookup_tag(&tags, "name"))
        .unwrap_or_else(|| default_name(filter_id))
        .to_string();
    let address = assemble_address(&tags);

    Some(Poi {
        lat,
        lon,
        name,
        poi_type: filter_id.to_string(),
        tags,
        source: "overpass".to_string(),
        address,
    })
}

fn lookup_tag<'a>(tags: &'a Option<HashMap<String, String>>, key: &str) -> Option<&'a str> {
    tags.as_ref()?.get(key).map(String::as_str)
}

/// Prefers a full-address tag; otherwise assembles city + street from
/// fragments, yielding `None` when both are missing.
fn assemble_address(tags: &Option<HashMap<String, String>>) -> Option<String> {
    let tags = tags.as_ref()?;
    if let Some(full) = tags.get("addr:full") {
        return Some(full.clone());
    }

    let city = tags.get("addr:city").map(String::as_str).unwrap_or("");
    let street = tags.get("addr:street").map(String::as_str).unwrap_or("");
    let assembled = format!("{city} {street}").trim().to_string();
    if assembled.is_empty() {
        None
    } else {
        Some(assembled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(tags: Option<HashMap<String, String>>) -> OverpassElement {
        OverpassElement {
            lat: Some(35.68),
            lon: Some(139.76),
            tags,
        }
    }

    fn tag_map(pairs: &[(&str, &str)]) -> Option<HashMap<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn name_prefers_japanese_tag() {
        let pois = normalize_elements(
            vec![element(tag_map(&[("name:ja", "千代田トイレ"), ("name", "Chiyoda Toilet")]))],
            "toilets",
        );
        assert_eq!(pois[0].name, "千代田トイレ");
    }

    #[test]
    fn name_falls_back_to_generic_then_default() {
        let generic = normalize_elements(
            vec![element(tag_map(&[("name", "Chiyoda Toilet")]))],
            "toilets",
        );
        assert_eq!(generic[0].name, "Chiyoda Toilet");

        let unnamed = normalize_elements(vec![element(tag_map(&[]))], "toilets");
        assert_eq!(unnamed[0].name, "トイレ");

        let tagless = normalize_elements(vec![element(None)], "stations");
        assert_eq!(tagless[0].name, "駅");
    }

    #[test]
    fn address_prefers_full_tag_then_fragments() {
        let full = normalize_elements(
            vec![element(tag_map(&[
                ("addr:full", "東京都千代田区1-1"),
                ("addr:city", "千代田区"),
            ]))],
            "toilets",
        );
        assert_eq!(full[0].address.as_deref(), Some("東京都千代田区1-1"));

        let fragments = normalize_elements(
            vec![element(tag_map(&[
                ("addr:city", "千代田区"),
                ("addr:street", "内幸町"),
            ]))],
            "toilets",
        );
        assert_eq!(fragments[0].address.as_deref(), Some("千代田区 内幸町"));

        let city_only = normalize_elements(
            vec![element(tag_map(&[("addr:city", "千代田区")]))],
            "toilets",
        );
        assert_eq!(city_only[0].address.as_deref(), Some("千代田区"));

        let none = normalize_elements(vec![element(tag_map(&[]))], "toilets");
        assert_eq!(none[0].address, None);
    }

    #[test]
    fn records_without_coordinates_are_dropped() {
        let elements = vec![
            OverpassElement {
                lat: None,
                lon: Some(139.0),
                tags: None,
            },
            OverpassElement {
                lat: Some(f64::NAN),
                lon: Some(139.0),
                tags: None,
            },
            element(None),
        ];
        let pois = normalize_elements(elements, "toilets");
        assert_eq!(pois.len(), 1);
    }

    #[test]
    fn parse_sets_type_and_source() {
        let body = r#"{"elements":[{"lat":35.0,"lon":139.0,"tags":{"name":"A"}}]}"#;
        let pois = parse_overpass_body(body, "cafes").expect("parse failed");
        assert_eq!(pois.len(), 1);
        assert_eq!(pois[0].poi_type, "cafes");
        assert_eq!(pois[0].source, "overpass");
    }

    #[test]
    fn malformed_body_is_a_parse_error() {
        assert!(parse_overpass_body("<html>gateway timeout</html>", "cafes").is_err());
    }
}
