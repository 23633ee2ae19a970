//! Geographic helpers: great-circle distance and Web-Mercator scale.
//!
//! Pure functions with no dependencies; every other module that needs a
//! distance or a pixel projection goes through here.

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Web-Mercator equatorial resolution at zoom 0, metres per pixel.
const MERCATOR_RESOLUTION_Z0: f64 = 156_543.033_92;

pub fn deg_to_rad(degrees: f64) -> f64 {
    degrees * (std::f64::consts::PI / 180.0)
}

pub fn rad_to_deg(radians: f64) -> f64 {
    radians * (180.0 / std::f64::consts::PI)
}

/// Great-circle distance between two `(lat, lon)` points in kilometres,
/// using the haversine formula.
pub fn haversine_km(a: (f64, f64), b: (f64, f64)) -> f64 {
    let (lat1, lon1) = a;
    let (lat2, lon2) = b;

    let d_lat = deg_to_rad(lat2 - lat1);
    let d_lon = deg_to_rad(lon2 - lon1);

    let h = (d_lat / 2.0).sin().powi(2)
        + deg_to_rad(lat1).cos() * deg_to_rad(lat2).cos() * (d_lon / 2.0).sin().powi(2);

    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Same distance in metres, the unit the pixel projection works in.
pub fn haversine_m(a: (f64, f64), b: (f64, f64)) -> f64 {
    haversine_km(a, b) * 1000.0
}

/// Ground resolution of one screen pixel at the given latitude and zoom
/// level on a standard Web-Mercator tile pyramid.
pub fn meters_per_pixel(lat: f64, zoom: u8) -> f64 {
    MERCATOR_RESOLUTION_Z0 * deg_to_rad(lat).cos() / 2f64.powi(i32::from(zoom))
}
