use std::f64::consts::PI;

/// Latitude where Web Mercator maps to a square world
pub const MAX_MERCATOR_LAT: f64 = 85.051_128_779_806_59;

/// Wrap longitude into [-180, 180)
#[inline(always)]
pub fn wrap_lon(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}

/// Clamp latitude to the range Web Mercator can represent
#[inline(always)]
pub fn clamp_lat(lat: f64) -> f64 {
    lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT)
}

/// Forward Web Mercator into normalized [0, 1] world coordinates
#[inline(always)]
pub fn mercator(lon: f64, lat: f64) -> (f64, f64) {
    let x = (lon + 180.0) / 360.0;
    let lat_rad = clamp_lat(lat).to_radians();
    let y = (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0;
    (x, y)
}

/// Inverse Web Mercator from normalized world coordinates back to (lon, lat)
#[inline(always)]
pub fn inverse_mercator(x: f64, y: f64) -> (f64, f64) {
    let lon = x * 360.0 - 180.0;
    let lat = (PI * (1.0 - 2.0 * y)).sinh().atan().to_degrees();
    (lon, lat)
}
