/// Earth's radius in kilometers
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Earth's radius in miles
const EARTH_RADIUS_MILES: f64 = 3959.0;

/// Calculate the Haversine distance between two points in kilometers
///
/// # Arguments
/// * `lat1` - Latitude of first point in degrees
/// * `lon1` - Longitude of first point in degrees
/// * `lat2` - Latitude of second point in degrees
/// * `lon2` - Longitude of second point in degrees
///
/// # Returns
/// Distance in kilometers
#[inline]
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    EARTH_RADIUS_KM * haversine_central_angle(lat1, lon1, lat2, lon2)
}

/// Calculate the Haversine distance between two points in miles
///
/// Same formula as [`haversine_km`] with an imperial Earth radius. A call
/// site must pick one unit and stick to it; mixing the two across a single
/// ranking produces nonsense orderings.
#[inline]
pub fn haversine_miles(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    EARTH_RADIUS_MILES * haversine_central_angle(lat1, lon1, lat2, lon2)
}

/// Central angle between two points on the unit sphere, in radians
#[inline]
fn haversine_central_angle(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);

    2.0 * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Round a distance to one decimal place for presentation
#[inline]
pub fn round_tenth(distance: f64) -> f64 {
    (distance * 10.0).round() / 10.0
}
