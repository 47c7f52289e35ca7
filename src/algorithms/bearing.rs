//! Compass bearing estimation from consecutive position samples

use crate::core::GeoPoint;

/// Normalize an angle in degrees into [0, 360)
pub fn normalize_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can return 360.0 when the input is a tiny negative value
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Bearing of travel from `prev` to `next`, in degrees clockwise from
/// geographic north, normalized into [0, 360).
///
/// Returns `None` when both coordinates are identical: a (0, 0)
/// displacement has no direction and must not be read as "facing east".
/// The caller preserves the previous heading in that case.
pub fn bearing_degrees(prev: GeoPoint, next: GeoPoint) -> Option<f64> {
    let d_lat = next.lat - prev.lat;
    let d_lng = next.lng - prev.lng;

    if d_lat == 0.0 && d_lng == 0.0 {
        return None;
    }

    Some(normalize_degrees(d_lng.atan2(d_lat).to_degrees()))
}
