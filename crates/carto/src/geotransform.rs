use std::fmt::Debug;

use approx::{AbsDiffEq, RelativeEq};

use crate::{Error, Graphic, GridCoordinates, Point, ProjectionInfo, Result, Shape, point, projectionutil, reproject};

/// A reversible point transformation that can be applied to shapes and graphics.
///
/// Shapes and graphics follow the drop policy of [`projectionutil::project_shape`]: vertices that can not
/// be transformed are dropped and `None` is returned when nothing of the shape remains.
pub trait GeoTransform {
    fn transform(&self, p: Point) -> Option<Point>;

    fn inverse_transform(&self, p: Point) -> Option<Point>;

    /// Whether the input of [`GeoTransform::transform`] is in geographic coordinates
    fn is_geographic_source(&self) -> bool {
        false
    }

    /// Whether the output of [`GeoTransform::transform`] is in geographic coordinates
    fn is_geographic_target(&self) -> bool {
        false
    }

    fn transform_shape(&self, shape: &Shape) -> Option<Shape> {
        projectionutil::transform_shape_with(shape, self.is_geographic_source(), |p| self.transform(p))
    }

    fn inverse_transform_shape(&self, shape: &Shape) -> Option<Shape> {
        projectionutil::transform_shape_with(shape, self.is_geographic_target(), |p| self.inverse_transform(p))
    }

    fn transform_graphic<L: Clone>(&self, graphic: &Graphic<L>) -> Option<Graphic<L>> {
        self.transform_shape(&graphic.shape).map(|shape| graphic.with_shape(shape))
    }

    fn inverse_transform_graphic<L: Clone>(&self, graphic: &Graphic<L>) -> Option<Graphic<L>> {
        self.inverse_transform_shape(&graphic.shape).map(|shape| graphic.with_shape(shape))
    }
}

/// Transformation between two coordinate reference systems
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionTransform {
    pub source: ProjectionInfo,
    pub target: ProjectionInfo,
}

impl ProjectionTransform {
    pub fn new(source: ProjectionInfo, target: ProjectionInfo) -> Self {
        ProjectionTransform { source, target }
    }
}

fn defined(p: Point) -> Option<Point> {
    point::is_defined(p).then_some(p)
}

impl GeoTransform for ProjectionTransform {
    fn transform(&self, p: Point) -> Option<Point> {
        defined(reproject::reproject_point(p, &self.source, &self.target))
    }

    fn inverse_transform(&self, p: Point) -> Option<Point> {
        defined(reproject::reproject_point(p, &self.target, &self.source))
    }

    fn is_geographic_source(&self) -> bool {
        self.source.is_geographic()
    }

    fn is_geographic_target(&self) -> bool {
        self.target.is_geographic()
    }
}

/// Affine mapping from grid indices (column, row) to coordinates.
///
/// The coefficients are in the order: [origin x, cell width, row rotation, origin y, column rotation, cell height].
#[derive(Clone, Copy, PartialEq, Default)]
pub struct AffineTransform([f64; 6]);

impl AffineTransform {
    pub const fn new(coefficients: [f64; 6]) -> Self {
        AffineTransform(coefficients)
    }

    pub fn from_origin_and_cell_size(origin: Point, cell_width: f64, cell_height: f64) -> Self {
        Self::new([origin.x(), cell_width, 0.0, origin.y(), 0.0, cell_height])
    }

    /// Maps the indices of the grid samples to their coordinates, sample (0, 0) is the first x and y coordinate.
    /// The sample spacing of an axis with a single sample is 1.
    pub fn from_grid(grid: &GridCoordinates) -> Self {
        let spacing = |coords: &[f64]| {
            if coords.len() > 1 {
                (coords[coords.len() - 1] - coords[0]) / (coords.len() - 1) as f64
            } else {
                1.0
            }
        };

        Self::from_origin_and_cell_size(Point::new(grid.x()[0], grid.y()[0]), spacing(grid.x()), spacing(grid.y()))
    }

    /// Translates grid indices to a coordinate
    pub fn apply(&self, col: f64, row: f64) -> Point {
        let x = self.0[0] + self.0[1] * col + self.0[2] * row;
        let y = self.0[3] + self.0[4] * col + self.0[5] * row;
        Point::new(x, y)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.0[0], self.0[3])
    }

    /// The horizontal cell size
    pub fn cell_width(&self) -> f64 {
        self.0[1]
    }

    /// The vertical cell size
    pub fn cell_height(&self) -> f64 {
        self.0[5]
    }

    /// Returns the coefficients of the transformation.
    pub fn coefficients(&self) -> [f64; 6] {
        self.0
    }

    pub fn invert(&self) -> Result<Self> {
        let gt_in = &self.0;

        if gt_in[2] == 0.0 && gt_in[4] == 0.0 && gt_in[1] != 0.0 && gt_in[5] != 0.0 {
            // No rotation, avoid the determinant to keep full precision
            return Ok(AffineTransform([
                -gt_in[0] / gt_in[1],
                1.0 / gt_in[1],
                0.0,
                -gt_in[3] / gt_in[5],
                0.0,
                1.0 / gt_in[5],
            ]));
        }

        // Assume a 3rd row that is [1 0 0]
        let det = gt_in[1] * gt_in[5] - gt_in[2] * gt_in[4];
        let magnitude = f64::max(f64::max(gt_in[1].abs(), gt_in[2].abs()), f64::max(gt_in[4].abs(), gt_in[5].abs()));

        if det.abs() <= 1e-10 * magnitude * magnitude {
            return Err(Error::Runtime(
                "AffineTransform::invert: Determinant is too small, cannot compute inverse.".to_string(),
            ));
        }

        let inv_det = 1.0 / det;

        // Adjoint divided by the determinant
        Ok(AffineTransform([
            (gt_in[2] * gt_in[3] - gt_in[0] * gt_in[5]) * inv_det,
            gt_in[5] * inv_det,
            -gt_in[2] * inv_det,
            (-gt_in[1] * gt_in[3] + gt_in[0] * gt_in[4]) * inv_det,
            -gt_in[4] * inv_det,
            gt_in[1] * inv_det,
        ]))
    }
}

impl GeoTransform for AffineTransform {
    /// The point is interpreted as (column, row)
    fn transform(&self, p: Point) -> Option<Point> {
        defined(self.apply(p.x(), p.y()))
    }

    fn inverse_transform(&self, p: Point) -> Option<Point> {
        let inverse = self.invert().ok()?;
        defined(inverse.apply(p.x(), p.y()))
    }
}

impl From<[f64; 6]> for AffineTransform {
    fn from(coefficients: [f64; 6]) -> Self {
        AffineTransform(coefficients)
    }
}

impl From<AffineTransform> for [f64; 6] {
    fn from(trans: AffineTransform) -> [f64; 6] {
        trans.0
    }
}

impl Debug for AffineTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "AffineTransform(origin: ({}, {}), cell_width: {}, cell_height: {})",
            self.0[0],
            self.0[3],
            self.cell_width(),
            self.cell_height()
        )
    }
}

impl AbsDiffEq for AffineTransform {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.0.abs_diff_eq(&other.0, epsilon)
    }
}

impl RelativeEq for AffineTransform {
    fn default_max_relative() -> Self::Epsilon {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: Self::Epsilon, max_relative: Self::Epsilon) -> bool {
        self.0.relative_eq(&other.0, epsilon, max_relative)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::{shape::WindArrow, testutils::angle_difference};

    #[test]
    fn affine_inverse() {
        let trans = AffineTransform::from_origin_and_cell_size(Point::new(100.0, 200.0), 10.0, -5.0);
        let inverse = trans.invert().unwrap();

        assert_eq!(trans.apply(2.0, 3.0), Point::new(120.0, 185.0));
        assert_relative_eq!(inverse.apply(120.0, 185.0), Point::new(2.0, 3.0), epsilon = 1e-12);
        assert_relative_eq!(trans.inverse_transform(Point::new(120.0, 185.0)).unwrap(), Point::new(2.0, 3.0), epsilon = 1e-12);
    }

    #[test]
    fn rotated_affine_inverse() {
        let trans = AffineTransform::new([10.0, 2.0, 1.0, 20.0, 0.5, 3.0]);
        let inverse = trans.invert().unwrap();

        let p = trans.apply(4.0, 7.0);
        assert_relative_eq!(inverse.apply(p.x(), p.y()), Point::new(4.0, 7.0), epsilon = 1e-12);
    }

    #[test]
    fn singular_affine() {
        assert!(AffineTransform::new([0.0, 1.0, 2.0, 0.0, 2.0, 4.0]).invert().is_err());
        assert!(AffineTransform::default().inverse_transform(Point::new(1.0, 1.0)).is_none());
    }

    #[test]
    fn affine_from_grid() {
        let grid = GridCoordinates::new(vec![0.0, 0.5, 1.0], vec![10.0]).unwrap();
        let trans = AffineTransform::from_grid(&grid);
        assert_eq!(trans.coefficients(), [0.0, 0.5, 0.0, 10.0, 0.0, 1.0]);
    }

    #[test]
    fn affine_shape_transform() {
        let trans = AffineTransform::from_origin_and_cell_size(Point::new(0.0, 0.0), 2.0, 2.0);
        let shape = Shape::Polyline(vec![vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)]]);

        let transformed = trans.transform_shape(&shape).unwrap();
        assert_eq!(transformed, Shape::Polyline(vec![vec![Point::new(0.0, 0.0), Point::new(2.0, 2.0)]]));
        assert_eq!(trans.inverse_transform_shape(&transformed), Some(shape));
    }

    #[test]
    fn projection_transform_graphic() {
        let trans = ProjectionTransform::new(ProjectionInfo::wgs84(), ProjectionInfo::mercator(0.0).unwrap());
        let graphic = Graphic::new(
            Shape::WindArrow(WindArrow {
                anchor: Point::new(10.0, 45.0),
                angle: 0.0,
                length: 1.0,
            }),
            42,
        );

        let projected = trans.transform_graphic(&graphic).unwrap();
        assert_eq!(projected.legend, 42);

        let back = trans.inverse_transform_graphic(&projected).unwrap();
        let (Shape::WindArrow(original), Shape::WindArrow(round_trip)) = (&graphic.shape, &back.shape) else {
            panic!("Expected wind arrows");
        };

        assert_relative_eq!(original.anchor, round_trip.anchor, epsilon = 1e-9);
        assert!(angle_difference(round_trip.angle, original.angle) < 1e-9);
    }

    #[test]
    fn projection_transform_failure() {
        let trans = ProjectionTransform::new(ProjectionInfo::wgs84(), ProjectionInfo::mercator(0.0).unwrap());
        assert!(trans.transform(Point::new(0.0, 90.0)).is_none());
        assert!(trans.transform_shape(&Shape::Point(Point::new(0.0, 90.0))).is_none());
    }
}
