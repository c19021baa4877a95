//! Reprojection of points, gridded data and images between coordinate reference systems.

use crate::{CoordinateTransformer, Error, Point, ProjectionInfo, Result, coordinatetransformer, point};

mod grid;
mod image;
mod sampling;

pub use grid::{meshgrid, reproject_grid, reproject_grid_to, reproject_grid_to_mesh};
pub use image::reproject_image;

/// How a destination cell obtains its value from the source grid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResampleMethod {
    /// Value of the source sample closest to the back-projected location
    #[default]
    NearestNeighbor,
    /// Bilinear interpolation of the four source samples surrounding the back-projected location
    Bilinear,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumThreads {
    AllCpus,
    Count(usize),
}

impl Default for NumThreads {
    fn default() -> Self {
        NumThreads::Count(1)
    }
}

#[derive(Debug, Clone)]
pub struct ReprojectOptions {
    /// The resampling method (default = `ResampleMethod::NearestNeighbor`)
    pub method: ResampleMethod,
    /// Value of destination cells without a valid source value (default = NaN)
    pub fill_value: f64,
    /// Configure how many threads to use for the back-projection of the destination cells
    pub num_threads: NumThreads,
}

impl Default for ReprojectOptions {
    fn default() -> Self {
        Self {
            method: ResampleMethod::NearestNeighbor,
            fill_value: f64::NAN,
            num_threads: NumThreads::Count(1),
        }
    }
}

impl ReprojectOptions {
    pub fn with_method(method: ResampleMethod) -> Self {
        Self {
            method,
            ..Default::default()
        }
    }
}

#[cfg(feature = "rayon")]
pub(crate) fn create_scoped_thread_pool(num_threads: NumThreads) -> Result<rayon::ThreadPool> {
    let mut pool_builder = rayon::ThreadPoolBuilder::new();
    if let NumThreads::Count(count) = num_threads {
        pool_builder = pool_builder.num_threads(count);
    }

    pool_builder
        .build()
        .map_err(|e| Error::Runtime(format!("Failed to create threadpool: {e}")))
}

/// Brings a longitude that is at most one turn outside of the [-180, 180] range back inside it.
/// 190 becomes -170, -190 becomes 170.
pub fn normalize_longitude(x: f64) -> f64 {
    if x > 180.0 {
        x - 360.0
    } else if x < -180.0 {
        x + 360.0
    } else {
        x
    }
}

/// Transforms a point, normalizing its longitude first when the transformer source is geographic
pub(crate) fn try_transform_normalized(transformer: &CoordinateTransformer, p: Point) -> Option<Point> {
    if transformer.source().is_geographic() {
        transformer.try_transform(Point::new(normalize_longitude(p.x()), p.y()))
    } else {
        transformer.try_transform(p)
    }
}

pub(crate) fn transform_normalized(transformer: &CoordinateTransformer, p: Point) -> Point {
    try_transform_normalized(transformer, p).unwrap_or_else(point::undefined)
}

/// Reprojects a single point, a point that can not be reprojected becomes (NaN, NaN)
pub fn reproject_point(p: Point, source: &ProjectionInfo, dest: &ProjectionInfo) -> Point {
    match coordinatetransformer::cached(source, dest) {
        Ok(transformer) => transform_normalized(&transformer, p),
        Err(_) => point::undefined(),
    }
}

/// Reprojects `count` points starting at `start` in place.
///
/// Points that can not be reprojected are set to (NaN, NaN), the remaining points are still processed.
pub fn reproject_points_in_place(
    points: &mut [Point],
    source: &ProjectionInfo,
    dest: &ProjectionInfo,
    start: usize,
    count: usize,
) -> Result<()> {
    let end = start
        .checked_add(count)
        .filter(|&end| end <= points.len())
        .ok_or_else(|| {
            Error::InvalidArgument(format!(
                "Point range {start}..{start}+{count} is out of bounds for {} points",
                points.len()
            ))
        })?;

    let transformer = coordinatetransformer::cached(source, dest)?;
    for p in &mut points[start..end] {
        *p = transform_normalized(&transformer, *p);
    }

    Ok(())
}

/// Reprojects the points into a new vector, see [`reproject_points_in_place`]
pub fn reproject_points(points: &[Point], source: &ProjectionInfo, dest: &ProjectionInfo) -> Result<Vec<Point>> {
    let mut result = points.to_vec();
    reproject_points_in_place(&mut result, source, dest, 0, points.len())?;
    Ok(result)
}

/// Reprojects points given as separate coordinate vectors
pub fn reproject_xy(x: &[f64], y: &[f64], source: &ProjectionInfo, dest: &ProjectionInfo) -> Result<(Vec<f64>, Vec<f64>)> {
    if x.len() != y.len() {
        return Err(Error::SizeMismatch {
            size1: (x.len(), 1),
            size2: (y.len(), 1),
        });
    }

    let mut points: Vec<Point> = x.iter().zip(y).map(|(&x, &y)| Point::new(x, y)).collect();
    reproject_points_in_place(&mut points, source, dest, 0, x.len())?;

    Ok(points.iter().map(|p| (p.x(), p.y())).unzip())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::testutils::lambert72;

    #[test]
    fn longitude_normalization() {
        assert_eq!(normalize_longitude(190.0), -170.0);
        assert_eq!(normalize_longitude(-190.0), 170.0);
        assert_eq!(normalize_longitude(180.0), 180.0);
        assert_eq!(normalize_longitude(-180.0), -180.0);
        assert_eq!(normalize_longitude(45.0), 45.0);
    }

    #[test]
    fn geographic_identity() {
        let wgs84 = ProjectionInfo::wgs84();
        assert_eq!(reproject_point(Point::new(0.0, 0.0), &wgs84, &wgs84), Point::new(0.0, 0.0));
        assert_eq!(reproject_point(Point::new(181.0, 0.0), &wgs84, &wgs84), Point::new(-179.0, 0.0));
    }

    #[test]
    fn projected_identity_is_not_normalized() {
        let merc = ProjectionInfo::mercator(0.0).unwrap();
        let p = Point::new(20_000_000.0, -5.0);
        assert_eq!(reproject_point(p, &merc, &merc), p);
    }

    #[test]
    fn antimeridian_equivalence() {
        let wgs84 = ProjectionInfo::wgs84();
        let merc = ProjectionInfo::mercator(0.0).unwrap();

        let p1 = reproject_point(Point::new(190.0, 10.0), &wgs84, &merc);
        let p2 = reproject_point(Point::new(-170.0, 10.0), &wgs84, &merc);
        assert_eq!(p1, p2);
    }

    #[test]
    fn failed_points_are_nan_and_batch_continues() {
        let wgs84 = ProjectionInfo::wgs84();
        let merc = ProjectionInfo::mercator(0.0).unwrap();

        let mut points = vec![Point::new(1.0, 1.0), Point::new(0.0, 90.0), Point::new(2.0, 2.0), Point::new(3.0, 3.0)];
        reproject_points_in_place(&mut points, &wgs84, &merc, 0, 3).unwrap();

        assert!(point::is_defined(points[0]));
        assert!(!point::is_defined(points[1]));
        assert!(point::is_defined(points[2]));
        // outside of the requested range
        assert_eq!(points[3], Point::new(3.0, 3.0));
    }

    #[test]
    fn invalid_range() {
        let wgs84 = ProjectionInfo::wgs84();
        let mut points = vec![Point::new(1.0, 1.0); 3];
        assert!(reproject_points_in_place(&mut points, &wgs84, &wgs84, 2, 2).is_err());
        assert!(reproject_points_in_place(&mut points, &wgs84, &wgs84, usize::MAX, 2).is_err());
        assert!(reproject_points_in_place(&mut points, &wgs84, &wgs84, 3, 0).is_ok());
    }

    #[test]
    fn round_trip() {
        let wgs84 = ProjectionInfo::wgs84();
        let lambert = lambert72();

        let points = [Point::new(4.35, 50.85), Point::new(3.57, 51.04), Point::new(5.9, 49.6)];
        let projected = reproject_points(&points, &wgs84, &lambert).unwrap();
        let back = reproject_points(&projected, &lambert, &wgs84).unwrap();

        for (orig, rt) in points.iter().zip(back) {
            assert_relative_eq!(*orig, rt, epsilon = 1e-6);
        }
    }

    #[test]
    fn separate_coordinate_vectors() {
        let wgs84 = ProjectionInfo::wgs84();
        let merc = ProjectionInfo::mercator(0.0).unwrap();

        let (x, y) = reproject_xy(&[0.0, 10.0], &[0.0, 0.0], &wgs84, &merc).unwrap();
        assert_relative_eq!(x[0], 0.0, epsilon = 1e-6);
        assert_relative_eq!(x[1], 1113194.9079327357, epsilon = 1e-3);
        assert_relative_eq!(y[1], 0.0, epsilon = 1e-6);

        assert!(matches!(
            reproject_xy(&[0.0], &[0.0, 1.0], &wgs84, &merc),
            Err(Error::SizeMismatch { .. })
        ));
    }
}
