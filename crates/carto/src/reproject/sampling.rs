use ndarray::ArrayView2;

use crate::{Point, reproject::ResampleMethod};

/// Index of the coordinate closest to `value`, ties go to the lower index.
/// `None` when the value is NaN or outside of the coordinate range.
pub(super) fn nearest_index(coords: &[f64], value: f64) -> Option<usize> {
    let (&first, &last) = (coords.first()?, coords.last()?);
    if !(first..=last).contains(&value) {
        return None;
    }

    let upper = coords.partition_point(|&c| c < value);
    if upper == 0 {
        return Some(0);
    }

    let lower = upper - 1;
    if coords[upper] - value < value - coords[lower] {
        Some(upper)
    } else {
        Some(lower)
    }
}

/// The indices of the coordinates surrounding `value` and the fractional position between them
pub(super) fn bracket(coords: &[f64], value: f64) -> Option<(usize, usize, f64)> {
    let (&first, &last) = (coords.first()?, coords.last()?);
    if !(first..=last).contains(&value) {
        return None;
    }

    let upper = coords.partition_point(|&c| c < value);
    if upper == 0 {
        return Some((0, 0, 0.0));
    }

    let lower = upper - 1;
    let t = inf::interpolate::fraction(value, coords[lower], coords[upper]);
    Some((lower, upper, t))
}

/// Samples the plane (rows = y, columns = x) at the location, `fill_value` when no value can be obtained
pub(super) fn sample(
    plane: &ArrayView2<f64>,
    x: &[f64],
    y: &[f64],
    location: Point,
    method: ResampleMethod,
    fill_value: f64,
) -> f64 {
    match method {
        ResampleMethod::NearestNeighbor => match (nearest_index(x, location.x()), nearest_index(y, location.y())) {
            (Some(col), Some(row)) => plane[[row, col]],
            _ => fill_value,
        },
        ResampleMethod::Bilinear => match (bracket(x, location.x()), bracket(y, location.y())) {
            (Some((c0, c1, tx)), Some((r0, r1, ty))) => {
                let value = inf::interpolate::bilinear(plane[[r0, c0]], plane[[r0, c1]], plane[[r1, c0]], plane[[r1, c1]], tx, ty);
                if value.is_nan() { fill_value } else { value }
            }
            _ => fill_value,
        },
    }
}
