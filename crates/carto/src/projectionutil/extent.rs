use itertools::Itertools;

use crate::{
    CoordinateTransformer, Extent, Point, ProjectionFamily, ProjectionInfo, coordinatetransformer,
    reproject::try_transform_normalized,
};

const DEFAULT_EDGE_SAMPLE_COUNT: usize = 20;
const MIN_EDGE_POINTS: usize = 2;

/// Sample spacing in degrees used for the global extent
const GLOBAL_SAMPLE_STEP: f64 = 1.0;
/// Offset that keeps the outer longitude samples away from the edge of the projection
const EDGE_NUDGE: f64 = 1e-6;

/// Values from `start` to `end` (inclusive) with the given step, `end` is always the last value
fn sample_range(start: f64, end: f64, step: f64) -> Vec<f64> {
    let mut values: Vec<f64> = (0..)
        .map(|i| start + step * i as f64)
        .take_while(|&val| val < end)
        .collect();
    values.push(end);
    values
}

/// Latitude range that is sampled for the global extent of the projection
fn latitude_range(proj: &ProjectionInfo) -> (f64, f64) {
    let cutoff = proj.cutoff();

    if proj.is_north_polar() {
        return (cutoff.unwrap_or(0.0), 90.0);
    } else if proj.is_south_polar() {
        return (-90.0, cutoff.unwrap_or(0.0));
    }

    match proj.family() {
        ProjectionFamily::LambertConformalConic => match cutoff {
            None => (-80.0, 80.0),
            Some(cutoff) => {
                let parallel = proj.standard_parallels().0.unwrap_or_else(|| proj.origin_latitude());
                if parallel >= 0.0 { (cutoff, 80.0) } else { (-80.0, cutoff) }
            }
        },
        ProjectionFamily::Mercator => (-85.0, 85.0),
        _ => (-90.0, 90.0),
    }
}

/// Extent of the area of the globe that can be displayed in the projection.
///
/// Samples the globe every degree in longitude around the central meridian and every degree in latitude
/// inside the valid latitude range of the projection family.
/// Returns `None` when none of the samples can be projected.
pub fn get_projection_global_extent(to_proj: &ProjectionInfo) -> Option<Extent> {
    let wgs84 = ProjectionInfo::wgs84();
    let transformer = coordinatetransformer::cached(&wgs84, to_proj).ok()?;

    let lon_0 = to_proj.central_meridian();
    let mut longitudes = sample_range(lon_0 - 180.0, lon_0 + 180.0, GLOBAL_SAMPLE_STEP);
    if let Some(first) = longitudes.first_mut() {
        *first += EDGE_NUDGE;
    }
    if let Some(last) = longitudes.last_mut() {
        *last -= EDGE_NUDGE;
    }

    let (min_lat, max_lat) = latitude_range(to_proj);
    let latitudes = sample_range(min_lat, max_lat, GLOBAL_SAMPLE_STEP);

    let mut extent = Extent::undefined();
    for &lat in &latitudes {
        for &lon in &longitudes {
            if let Some(p) = try_transform_normalized(&transformer, Point::new(lon, lat)) {
                extent.expand_to_include(p);
            }
        }
    }

    if extent.is_undefined() {
        log::debug!("No global extent for projection {to_proj}");
        return None;
    }

    Some(extent)
}

#[derive(Clone, Copy)]
enum Bound {
    MinX,
    MinY,
    MaxX,
    MaxY,
}

impl Bound {
    fn value(self, p: Point) -> f64 {
        match self {
            Bound::MinX | Bound::MaxX => p.x(),
            Bound::MinY | Bound::MaxY => p.y(),
        }
    }

    fn improves(self, candidate: f64, current: f64) -> bool {
        match self {
            Bound::MinX | Bound::MinY => candidate < current,
            Bound::MaxX | Bound::MaxY => candidate > current,
        }
    }
}

/// Traces a single bound of the projected grid.
///
/// Scans complete lines (rows or columns) in the given order. Scanning continues while no line has produced
/// a valid point and stops at the first line after that which does not improve the bound.
fn trace_bound(
    lines: impl Iterator<Item = usize>,
    line_points: impl Fn(usize) -> Vec<Point>,
    transformer: &CoordinateTransformer,
    bound: Bound,
) -> Option<f64> {
    let mut result: Option<f64> = None;

    for line in lines {
        let mut improved = false;
        for p in line_points(line) {
            if let Some(projected) = try_transform_normalized(transformer, p) {
                let value = bound.value(projected);
                if result.is_none_or(|current| bound.improves(value, current)) {
                    result = Some(value);
                    improved = true;
                }
            }
        }

        if result.is_some() && !improved {
            break;
        }
    }

    result
}

/// Extent of the grid spanned by the `x` and `y` coordinate vectors after projecting it from `from` to `to`.
///
/// The boundary is traced with four scans (rows bottom-up for the minimum y, rows top-down for the maximum y,
/// columns left to right for the minimum x, columns right to left for the maximum x). Each scan stops as soon as a
/// row or column no longer improves its bound, so the result is an approximation for projections where the
/// boundary of the grid is not monotonic.
///
/// Returns `None` when no grid point can be projected.
pub fn get_projection_extent(from: &ProjectionInfo, to: &ProjectionInfo, x: &[f64], y: &[f64]) -> Option<Extent> {
    if from == to {
        let (min_x, max_x) = x.iter().copied().minmax().into_option()?;
        let (min_y, max_y) = y.iter().copied().minmax().into_option()?;
        return Some(Extent::new(min_x, min_y, max_x, max_y));
    }

    if x.is_empty() || y.is_empty() {
        return None;
    }

    let transformer = coordinatetransformer::cached(from, to).ok()?;
    let row = |j: usize| x.iter().map(|&xv| Point::new(xv, y[j])).collect::<Vec<_>>();
    let column = |i: usize| y.iter().map(|&yv| Point::new(x[i], yv)).collect::<Vec<_>>();

    let Some(min_y) = trace_bound(0..y.len(), row, &transformer, Bound::MinY) else {
        log::debug!("None of the grid points can be projected from {from} to {to}");
        return None;
    };

    let max_y = trace_bound((0..y.len()).rev(), row, &transformer, Bound::MaxY)?;
    let min_x = trace_bound(0..x.len(), column, &transformer, Bound::MinX)?;
    let mut max_x = trace_bound((0..x.len()).rev(), column, &transformer, Bound::MaxX)?;

    if to.is_geographic() && max_x < min_x && max_x < 0.0 {
        // The grid crosses the antimeridian
        max_x += 360.0;
    }

    Some(Extent::new(min_x, min_y, max_x, max_y))
}

/// Projects an extent by sampling points along its edges.
///
/// This is more accurate than projecting the corners when the projection involves significant curvature.
/// Returns `None` when none of the edge points can be projected.
pub fn project_extent(extent: &Extent, from: &ProjectionInfo, to: &ProjectionInfo) -> Option<Extent> {
    if extent.is_undefined() {
        return None;
    }

    if from == to {
        return Some(*extent);
    }

    let transformer = coordinatetransformer::cached(from, to).ok()?;
    let points_per_edge = DEFAULT_EDGE_SAMPLE_COUNT.max(MIN_EDGE_POINTS);

    let add_edge_points = |points: &mut Vec<Point>, start: Point, end: Point| {
        // The end point of an edge is the start of the next one
        for i in 0..points_per_edge - 1 {
            let t = i as f64 / (points_per_edge - 1) as f64;
            points.push(Point::new(
                inf::interpolate::linear(start.x(), end.x(), t),
                inf::interpolate::linear(start.y(), end.y(), t),
            ));
        }
    };

    let mut edge_points = Vec::with_capacity(points_per_edge * 4);
    add_edge_points(&mut edge_points, extent.upper_left(), extent.upper_right());
    add_edge_points(&mut edge_points, extent.upper_right(), extent.lower_right());
    add_edge_points(&mut edge_points, extent.lower_right(), extent.lower_left());
    add_edge_points(&mut edge_points, extent.lower_left(), extent.upper_left());

    let mut result = Extent::undefined();
    for p in edge_points {
        if let Some(projected) = try_transform_normalized(&transformer, p) {
            result.expand_to_include(projected);
        }
    }

    result.is_defined().then_some(result)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn sample_ranges() {
        assert_eq!(sample_range(0.0, 3.0, 1.0), vec![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(sample_range(0.0, 2.5, 1.0), vec![0.0, 1.0, 2.0, 2.5]);
        assert_eq!(sample_range(-90.0, -90.0, 1.0), vec![-90.0]);
        assert_eq!(sample_range(-180.0, 180.0, 1.0).len(), 361);
    }

    #[test]
    fn latitude_ranges() {
        let north = ProjectionInfo::north_polar_stereographic(0.0).unwrap();
        assert_eq!(latitude_range(&north), (0.0, 90.0));
        assert_eq!(latitude_range(&north.with_cutoff(30.0).unwrap()), (30.0, 90.0));

        let south = ProjectionInfo::south_polar_stereographic(0.0).unwrap();
        assert_eq!(latitude_range(&south.with_cutoff(-20.0).unwrap()), (-90.0, -20.0));

        let lcc = ProjectionInfo::lambert_conformal_conic(105.0, 0.0, 25.0, 47.0).unwrap();
        assert_eq!(latitude_range(&lcc), (-80.0, 80.0));
        assert_eq!(latitude_range(&lcc.with_cutoff(0.0).unwrap()), (0.0, 80.0));

        assert_eq!(latitude_range(&ProjectionInfo::mercator(0.0).unwrap()), (-85.0, 85.0));
        assert_eq!(latitude_range(&ProjectionInfo::wgs84()), (-90.0, 90.0));
    }

    #[test_log::test]
    fn geographic_global_extent() {
        let extent = get_projection_global_extent(&ProjectionInfo::wgs84()).unwrap();
        assert_relative_eq!(extent, Extent::new(-180.0, -90.0, 180.0, 90.0), epsilon = 1e-5);
    }

    #[test_log::test]
    fn identical_projection_extent_is_exact() {
        let wgs84 = ProjectionInfo::wgs84();
        let extent = get_projection_extent(&wgs84, &wgs84, &[0.0, 1.5, 3.0], &[-2.0, 7.0]).unwrap();
        assert_eq!(extent, Extent::new(0.0, -2.0, 3.0, 7.0));

        assert!(get_projection_extent(&wgs84, &wgs84, &[], &[1.0]).is_none());
    }

    #[test_log::test]
    fn extent_without_valid_points() {
        let wgs84 = ProjectionInfo::wgs84();
        let merc = ProjectionInfo::mercator(0.0).unwrap();
        assert!(get_projection_extent(&wgs84, &merc, &[0.0, 10.0], &[90.0]).is_none());
    }

    #[test_log::test]
    fn projected_extent_of_undefined() {
        let wgs84 = ProjectionInfo::wgs84();
        let merc = ProjectionInfo::mercator(0.0).unwrap();
        assert!(project_extent(&Extent::undefined(), &wgs84, &merc).is_none());
    }
}
