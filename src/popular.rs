//! Built-in curated places.
//!
//! A small offline list of well-known destinations served under the
//! `"popular"` source, available without any network round trip.

use crate::models::{Bounds, Poi};

/// Returns the curated list of popular destinations across Japan.
pub fn popular_places() -> Vec<Poi> {
    [
        (
            35.6762,
            139.6503,
            "Tokyo Imperial Palace",
            "tourist_attraction",
            "1-1 Chiyoda, Chiyoda City, Tokyo",
        ),
        (
            35.6586,
            139.7454,
            "Tokyo Skytree",
            "tourist_attraction",
            "1 Chome-1-2 Oshiage, Sumida City, Tokyo",
        ),
        (
            35.6594,
            139.7005,
            "Shibuya Crossing",
            "tourist_attraction",
            "Shibuya City, Tokyo",
        ),
        (
            35.7148,
            139.7967,
            "Senso-ji Temple",
            "place_of_worship",
            "2 Chome-3-1 Asakusa, Taito City, Tokyo",
        ),
        (
            34.9949,
            135.7849,
            "Fushimi Inari Shrine",
            "place_of_worship",
            "68 Fukakusa Yabunouchicho, Fushimi Ward, Kyoto",
        ),
        (
            34.9804,
            135.7751,
            "Kiyomizu-dera",
            "place_of_worship",
            "1-294 Kiyomizu, Higashiyama Ward, Kyoto",
        ),
        (
            34.6937,
            135.5023,
            "Osaka Castle",
            "tourist_attraction",
            "1-1 Osakajo, Chuo Ward, Osaka",
        ),
        (
            34.3955,
            132.4596,
            "Hiroshima Peace Memorial",
            "memorial",
            "1-2 Nakajimacho, Naka Ward, Hiroshima",
        ),
    ]
    .into_iter()
    .map(|(lat, lon, name, poi_type, address)| Poi {
        lat,
        lon,
        name: name.to_string(),
        poi_type: poi_type.to_string(),
        tags: None,
        source: "popular".to_string(),
        address: Some(address.to_string()),
    })
    .collect()
}

/// Popular places inside the given viewport.
pub fn popular_places_within(bounds: &Bounds) -> Vec<Poi> {
    popular_places()
        .into_iter()
        .filter(|poi| bounds.contains(poi.lat, poi.lon))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JAPAN_BOUNDS;

    #[test]
    fn all_popular_places_are_inside_japan() {
        let places = popular_places();
        assert_eq!(places.len(), 8);
        for place in &places {
            assert!(JAPAN_BOUNDS.contains(place.lat, place.lon), "{}", place.name);
            assert_eq!(place.source, "popular");
            assert!(place.address.is_some());
        }
    }

    #[test]
    fn bounds_filter_keeps_only_tokyo_for_a_tokyo_viewport() {
        let tokyo = Bounds::new(35.5, 139.5, 35.8, 139.9);
        let places = popular_places_within(&tokyo);
        assert_eq!(places.len(), 4);
        assert!(places.iter().all(|p| tokyo.contains(p.lat, p.lon)));
    }
}
