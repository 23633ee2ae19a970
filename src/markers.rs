//! Marker density reduction.
//!
//! Pure, synchronous transforms that bound how many markers the rendering
//! layer receives, as a function of zoom level and proximity to the map
//! center. Independent of the fetcher's own per-request cap.
//!
//! The zoom-driven limiter deliberately keeps the *first* N POIs per type
//! in input order while the proximity limiter keeps the *nearest* N; the
//! two paths have different cost profiles and are not unified.

use std::collections::HashMap;

use crate::config::{CLUSTER_MAX_ZOOM, CLUSTER_PIXEL_RADIUS, MAX_MARKERS_PER_TYPE, MIN_ZOOM_FOR_ALL};
use crate::geo;
use crate::models::{Cluster, Marker, Poi};

/// Keeps only the `max_per_type` POIs nearest to `center` within each type.
///
/// Groups preserve first-seen type order; within a group POIs are sorted by
/// great-circle distance ascending, ties broken by stable input order.
/// Applying this twice with the same arguments is the same as applying it
/// once.
pub fn limit_by_proximity(pois: Vec<Poi>, center: (f64, f64), max_per_type: usize) -> Vec<Poi> {
    let mut type_order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<Poi>> = HashMap::new();

    for poi in pois {
        if !groups.contains_key(&poi.poi_type) {
            type_order.push(poi.poi_type.clone());
        }
        groups.entry(poi.poi_type.clone()).or_default().push(poi);
    }

    let mut limited = Vec::new();
    for poi_type in type_order {
        let Some(group) = groups.remove(&poi_type) else {
            continue;
        };
        let mut with_distance: Vec<(f64, Poi)> = group
            .into_iter()
            .map(|poi| (geo::haversine_km(center, (poi.lat, poi.lon)), poi))
            .collect();
        // sort_by is stable, so equal distances keep input order
        with_distance.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        limited.extend(
            with_distance
                .into_iter()
                .take(max_per_type)
                .map(|(_, poi)| poi),
        );
    }

    limited
}

/// Per-type cap applied at each zoom level below [`MIN_ZOOM_FOR_ALL`].
fn max_per_type_for_zoom(zoom: u8) -> usize {
    match zoom {
        14 => 50,
        13 => 30,
        12 => 20,
        11 => 10,
        _ => 5,
    }
}

/// Caps markers per type as a step function of zoom level.
///
/// Single pass keeping the first `max_per_type` POIs encountered per type —
/// cheaper than [`limit_by_proximity`] and intentionally not
/// distance-aware. At zoom ≥ 15 everything passes through.
pub fn filter_by_zoom(pois: Vec<Poi>, zoom: u8) -> Vec<Poi> {
    if zoom >= MIN_ZOOM_FOR_ALL {
        return pois;
    }

    let max_per_type = max_per_type_for_zoom(zoom);
    let mut counts: HashMap<String, usize> = HashMap::new();

    pois.into_iter()
        .filter(|poi| {
            let count = counts.entry(poi.poi_type.clone()).or_insert(0);
            if *count < max_per_type {
                *count += 1;
                true
            } else {
                false
            }
        })
        .collect()
}

/// Greedily collapses POIs whose projected pixel distance is under
/// `pixel_radius` into synthetic cluster markers.
///
/// Disabled (pure pass-through) at zoom ≥ 16. Single greedy pass: once a
/// POI joins a cluster it is never reconsidered. Groups of one pass
/// through as individual markers; larger groups become a [`Cluster`] at the
/// members' centroid. No POI is created or lost.
pub fn cluster(pois: Vec<Poi>, zoom: u8, pixel_radius: f64) -> Vec<Marker> {
    if zoom >= CLUSTER_MAX_ZOOM {
        return pois.into_iter().map(Marker::Poi).collect();
    }

    let mut assigned = vec![false; pois.len()];
    let mut markers = Vec::new();

    for i in 0..pois.len() {
        if assigned[i] {
            continue;
        }
        assigned[i] = true;

        let anchor = (pois[i].lat, pois[i].lon);
        let scale = geo::meters_per_pixel(pois[i].lat, zoom);
        let mut members = vec![pois[i].clone()];

        for j in (i + 1)..pois.len() {
            if assigned[j] {
                continue;
            }
            let meters = geo::haversine_m(anchor, (pois[j].lat, pois[j].lon));
            if meters / scale < pixel_radius {
                assigned[j] = true;
                members.push(pois[j].clone());
            }
        }

        if members.len() > 1 {
            let count = members.len();
            let lat = members.iter().map(|p| p.lat).sum::<f64>() / count as f64;
            let lon = members.iter().map(|p| p.lon).sum::<f64>() / count as f64;
            markers.push(Marker::Cluster(Cluster {
                count,
                lat,
                lon,
                members,
            }));
        } else if let Some(single) = members.pop() {
            markers.push(Marker::Poi(single));
        }
    }

    markers
}

/// The full display pipeline: proximity cap, zoom cap, then clustering
/// with the default pixel radius.
pub fn reduce_for_display(pois: Vec<Poi>, center: (f64, f64), zoom: u8) -> Vec<Marker> {
    let capped = limit_by_proximity(pois, center, MAX_MARKERS_PER_TYPE);
    let zoomed = filter_by_zoom(capped, zoom);
    cluster(zoomed, zoom, CLUSTER_PIXEL_RADIUS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poi(lat: f64, lon: f64, poi_type: &str, name: &str) -> Poi {
        Poi {
            lat,
            lon,
            name: name.to_string(),
            poi_type: poi_type.to_string(),
            tags: None,
            source: "overpass".to_string(),
            address: None,
        }
    }

    fn many_toilets(n: usize) -> Vec<Poi> {
        (0..n)
            .map(|i| {
                poi(
                    35.0 + i as f64 * 0.001,
                    139.0,
                    "toilets",
                    &format!("t{i}"),
                )
            })
            .collect()
    }

    #[test]
    fn proximity_limit_keeps_nearest_per_type() {
        let center = (35.0, 139.0);
        let pois = vec![
            poi(35.5, 139.0, "toilets", "far"),
            poi(35.001, 139.0, "toilets", "near"),
            poi(35.1, 139.0, "toilets", "mid"),
            poi(35.9, 139.0, "cafes", "cafe-far"),
            poi(35.002, 139.0, "cafes", "cafe-near"),
        ];

        let limited = limit_by_proximity(pois, center, 2);
        let names: Vec<&str> = limited.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["near", "mid", "cafe-near", "cafe-far"]);
    }

    #[test]
    fn proximity_limit_is_idempotent() {
        let center = (35.0, 139.0);
        let pois: Vec<Poi> = (0..20)
            .map(|i| poi(35.0 + i as f64 * 0.01, 139.0, "toilets", &format!("t{i}")))
            .chain((0..20).map(|i| poi(35.0, 139.0 + i as f64 * 0.01, "cafes", &format!("c{i}"))))
            .collect();

        let once = limit_by_proximity(pois.clone(), center, 7);
        let twice = limit_by_proximity(once.clone(), center, 7);
        assert_eq!(once, twice);
    }

    #[test]
    fn zoom_filter_step_function() {
        let toilets = many_toilets(200);
        assert_eq!(filter_by_zoom(toilets.clone(), 16).len(), 200);
        assert_eq!(filter_by_zoom(toilets.clone(), 15).len(), 200);
        assert_eq!(filter_by_zoom(toilets.clone(), 14).len(), 50);
        assert_eq!(filter_by_zoom(toilets.clone(), 13).len(), 30);
        assert_eq!(filter_by_zoom(toilets.clone(), 12).len(), 20);
        assert_eq!(filter_by_zoom(toilets.clone(), 11).len(), 10);
        assert_eq!(filter_by_zoom(toilets.clone(), 10).len(), 5);
        assert_eq!(filter_by_zoom(toilets, 3).len(), 5);
    }

    #[test]
    fn zoom_filter_keeps_first_encountered_in_input_order() {
        let toilets = many_toilets(200);
        let kept = filter_by_zoom(toilets, 10);
        assert_eq!(kept.len(), 5);
        let names: Vec<&str> = kept.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["t0", "t1", "t2", "t3", "t4"]);
    }

    #[test]
    fn zoom_filter_counts_per_type_independently() {
        let mut pois = many_toilets(40);
        pois.extend((0..40).map(|i| poi(35.0, 139.0 + i as f64 * 0.001, "cafes", &format!("c{i}"))));
        let kept = filter_by_zoom(pois, 12);
        assert_eq!(kept.iter().filter(|p| p.poi_type == "toilets").count(), 20);
        assert_eq!(kept.iter().filter(|p| p.poi_type == "cafes").count(), 20);
    }

    #[test]
    fn clustering_conserves_poi_count() {
        let pois: Vec<Poi> = (0..50)
            .map(|i| {
                poi(
                    35.0 + (i % 7) as f64 * 0.0001,
                    139.0 + (i % 11) as f64 * 0.0001,
                    "toilets",
                    &format!("t{i}"),
                )
            })
            .collect();

        let markers = cluster(pois.clone(), 12, 60.0);
        let total: usize = markers.iter().map(Marker::poi_count).sum();
        assert_eq!(total, pois.len());
    }

    #[test]
    fn nearby_points_cluster_at_zoom_14_but_not_18() {
        let pois = vec![
            poi(35.0000, 139.0000, "toilets", "a"),
            poi(35.0001, 139.0001, "toilets", "b"),
        ];

        let low_zoom = cluster(pois.clone(), 14, 60.0);
        assert_eq!(low_zoom.len(), 1);
        match &low_zoom[0] {
            Marker::Cluster(c) => {
                assert_eq!(c.count, 2);
                assert!((c.lat - 35.00005).abs() < 1e-9);
                assert!((c.lon - 139.00005).abs() < 1e-9);
            }
            Marker::Poi(_) => panic!("expected a cluster at zoom 14"),
        }

        // Clustering is disabled entirely at zoom >= 16.
        let high_zoom = cluster(pois, 18, 60.0);
        assert_eq!(high_zoom.len(), 2);
        assert!(high_zoom.iter().all(|m| matches!(m, Marker::Poi(_))));
    }

    #[test]
    fn distant_points_do_not_cluster() {
        let pois = vec![
            poi(35.0, 139.0, "toilets", "a"),
            poi(35.5, 139.5, "toilets", "b"),
        ];
        let markers = cluster(pois, 12, 60.0);
        assert_eq!(markers.len(), 2);
    }

    #[test]
    fn reduce_for_display_pipeline() {
        let pois: Vec<Poi> = (0..120)
            .map(|i| poi(35.0 + i as f64 * 0.002, 139.0, "toilets", &format!("t{i}")))
            .collect();

        let markers = reduce_for_display(pois, (35.0, 139.0), 13);
        let total: usize = markers.iter().map(Marker::poi_count).sum();
        // Proximity cap (50) then zoom-13 cap (30); clustering may merge
        // but never drops POIs.
        assert_eq!(total, 30);
    }
}
