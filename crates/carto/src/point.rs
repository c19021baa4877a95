pub type Point<T = f64> = geo_types::Point<T>;

/// The point used to signal a failed transformation
pub const fn undefined() -> Point {
    geo_types::Point(geo_types::Coord { x: f64::NAN, y: f64::NAN })
}

/// A point is defined when both coordinates are finite
pub fn is_defined(p: Point) -> bool {
    p.x().is_finite() && p.y().is_finite()
}

pub fn euclidean_distance(p1: Point, p2: Point) -> f64 {
    let delta = p1 - p2;
    delta.x().hypot(delta.y())
}

/// Planar bearing from `from` to `to` in degrees clockwise from the y axis
pub fn bearing(from: Point, to: Point) -> Option<f64> {
    inf::angle::bearing(to.x() - from.x(), to.y() - from.y())
}

/// The point at `distance` from `p` in the direction of the planar `bearing` (degrees clockwise from the y axis)
pub fn offset(p: Point, bearing: f64, distance: f64) -> Point {
    let rad = bearing.to_radians();
    Point::new(p.x() + distance * rad.sin(), p.y() + distance * rad.cos())
}
