//! Helpers for working with angles expressed in degrees.

/// Normalize an angle to the `[0, 360)` range
pub fn normalize_degrees(angle: f64) -> f64 {
    let result = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if result >= 360.0 { 0.0 } else { result }
}

/// Normalize an azimuth to the `(-180, 180]` range
pub fn normalize_azimuth(angle: f64) -> f64 {
    let result = normalize_degrees(angle);
    if result > 180.0 { result - 360.0 } else { result }
}

/// Bearing of the vector (dx, dy) in degrees clockwise from the positive y axis (north), in `[0, 360)`.
/// Returns `None` for a zero length or non finite vector.
pub fn bearing(dx: f64, dy: f64) -> Option<f64> {
    if !dx.is_finite() || !dy.is_finite() || (dx == 0.0 && dy == 0.0) {
        return None;
    }

    Some(normalize_degrees(dx.atan2(dy).to_degrees()))
}
