//! Static filter → Overpass query mapping and per-type display defaults.

use crate::models::Bounds;

/// Resolves a semantic filter id to its Overpass node predicate.
///
/// Returns `None` for unrecognized filters; the fetcher treats that as a
/// non-fatal condition (logged warning, empty result).
pub(crate) fn overpass_fragment(filter_id: &str) -> Option<&'static str> {
    let fragment = match filter_id {
        "toilets" => r#"node["amenity"="toilets"]"#,
        "restaurants" => r#"node["amenity"="restaurant"]"#,
        "convenience" => r#"node["shop"="convenience"]"#,
        "stations" => r#"node["railway"="station"]"#,
        "temples" => r#"node["amenity"="place_of_worship"]["religion"="buddhist"]"#,
        "shrines" => r#"node["amenity"="place_of_worship"]["religion"="shinto"]"#,
        "parks" => r#"node["leisure"="park"]"#,
        "banks" => r#"node["amenity"="bank"]"#,
        "hospitals" => r#"node["amenity"="hospital"]"#,
        "schools" => r#"node["amenity"="school"]"#,
        "hotels" => r#"node["tourism"="hotel"]"#,
        "cafes" => r#"node["amenity"="cafe"]"#,
        "atms" => r#"node["amenity"="atm"]"#,
        "pharmacies" => r#"node["amenity"="pharmacy"]"#,
        "museums" => r#"node["tourism"="museum"]"#,
        "viewpoints" => r#"node["tourism"="viewpoint"]"#,
        _ => return None,
    };
    Some(fragment)
}

/// Display name used when an upstream record carries no usable name tag.
pub(crate) fn default_name(filter_id: &str) -> &'static str {
    match filter_id {
        "toilets" => "トイレ",
        "restaurants" => "レストラン",
        "convenience" => "コンビニ",
        "stations" => "駅",
        "temples" => "寺院",
        "shrines" => "神社",
        "parks" => "公園",
        "banks" => "銀行",
        "hospitals" => "病院",
        "schools" => "学校",
        "hotels" => "ホテル",
        "cafes" => "カフェ",
        "atms" => "ATM",
        "pharmacies" => "薬局",
        "museums" => "博物館",
        "viewpoints" => "展望台",
        "tourist" => "観光地",
        _ => "Unknown",
    }
}

/// Assembles a complete Overpass QL query: JSON output, a server-side
/// timeout hint, the bbox-constrained predicate, and a record cap.
pub(crate) fn build_overpass_query(
    fragment: &str,
    bounds: &Bounds,
    cap: usize,
    timeout_secs: u64,
) -> String {
    format!("[out:json][timeout:{timeout_secs}];\n{fragment}({bounds});\nout body {cap};")
}
