use inf::angle::normalize_degrees;

use crate::{Point, ProjectionInfo, point, reproject::reproject_point};

/// Length of the segment used to measure the direction change, in source units
const REFERENCE_DISTANCE: f64 = 10.0;

/// Transforms a direction angle (degrees clockwise from north) located at `from_point`.
///
/// `to_point` is `from_point` after the transformation. The direction change is measured on a short
/// segment starting at the point, the result is normalized to [0, 360).
/// When the segment can not be transformed the angle is returned unchanged.
pub(crate) fn transform_angle(
    angle: f64,
    from_point: Point,
    to_point: Point,
    geographic_source: bool,
    transform: impl Fn(Point) -> Option<Point>,
) -> f64 {
    let mut reference = point::offset(from_point, angle, REFERENCE_DISTANCE);
    if geographic_source && from_point.y() == 90.0 {
        // Every direction points south at the north pole
        reference = Point::new(from_point.x(), from_point.y() - REFERENCE_DISTANCE);
    } else if geographic_source && reference.y().abs() >= 90.0 {
        // The segment would cross the pole, measure in the opposite direction
        reference = point::offset(from_point, angle + 180.0, REFERENCE_DISTANCE);
    }

    let Some(original_bearing) = point::bearing(from_point, reference) else {
        return angle;
    };

    let Some(projected_bearing) = transform(reference).and_then(|projected| point::bearing(to_point, projected)) else {
        return angle;
    };

    normalize_degrees(angle + projected_bearing - original_bearing)
}

/// Reprojects a direction angle (degrees clockwise from north) located at `from_point`.
///
/// `to_point` is `from_point` in the destination projection, see [`reproject_point`].
pub fn project_angle(angle: f64, from_point: Point, to_point: Point, from_proj: &ProjectionInfo, to_proj: &ProjectionInfo) -> f64 {
    transform_angle(angle, from_point, to_point, from_proj.is_geographic(), |p| {
        let projected = reproject_point(p, from_proj, to_proj);
        point::is_defined(projected).then_some(projected)
    })
}
