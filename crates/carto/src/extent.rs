//! Axis aligned bounding boxes in the coordinate space of a projection.

use approx::{AbsDiffEq, RelativeEq};

use crate::Point;

/// Axis aligned bounding box.
///
/// `min_x <= max_x` and `min_y <= max_y` hold for every extent except the undefined one,
/// which has all of its components set to NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Extent {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Default for Extent {
    fn default() -> Self {
        Self::undefined()
    }
}

impl Extent {
    pub const fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Extent { min_x, min_y, max_x, max_y }
    }

    pub const fn undefined() -> Self {
        Extent::new(f64::NAN, f64::NAN, f64::NAN, f64::NAN)
    }

    /// Extent spanned by two opposite corners, in any order
    pub fn from_corners(p1: Point, p2: Point) -> Self {
        Extent {
            min_x: p1.x().min(p2.x()),
            min_y: p1.y().min(p2.y()),
            max_x: p1.x().max(p2.x()),
            max_y: p1.y().max(p2.y()),
        }
    }

    /// Bounding box of the finite points, `None` if there are none
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point>) -> Option<Self> {
        let mut extent = Extent::undefined();
        for p in points {
            extent.expand_to_include(*p);
        }

        extent.is_defined().then_some(extent)
    }

    /// Extent with the given center and half sizes
    pub fn from_center(center: Point, half_width: f64, half_height: f64) -> Self {
        Extent::new(
            center.x() - half_width,
            center.y() - half_height,
            center.x() + half_width,
            center.y() + half_height,
        )
    }

    pub fn is_undefined(&self) -> bool {
        self.min_x.is_nan() || self.min_y.is_nan() || self.max_x.is_nan() || self.max_y.is_nan()
    }

    pub fn is_defined(&self) -> bool {
        !self.is_undefined()
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn is_empty(&self) -> bool {
        self.is_undefined() || self.width() <= 0.0 || self.height() <= 0.0
    }

    pub fn center(&self) -> Point {
        Point::new((self.min_x + self.max_x) / 2.0, (self.min_y + self.max_y) / 2.0)
    }

    pub fn lower_left(&self) -> Point {
        Point::new(self.min_x, self.min_y)
    }

    pub fn upper_left(&self) -> Point {
        Point::new(self.min_x, self.max_y)
    }

    pub fn upper_right(&self) -> Point {
        Point::new(self.max_x, self.max_y)
    }

    pub fn lower_right(&self) -> Point {
        Point::new(self.max_x, self.min_y)
    }

    /// Grows the extent so it contains the point, non finite points are ignored.
    /// Expanding an undefined extent makes it the degenerate extent of the point.
    pub fn expand_to_include(&mut self, p: Point) {
        if !p.x().is_finite() || !p.y().is_finite() {
            return;
        }

        if self.is_undefined() {
            *self = Extent::new(p.x(), p.y(), p.x(), p.y());
            return;
        }

        self.min_x = self.min_x.min(p.x());
        self.min_y = self.min_y.min(p.y());
        self.max_x = self.max_x.max(p.x());
        self.max_y = self.max_y.max(p.y());
    }

    /// The smallest extent containing both extents, undefined extents are ignored
    pub fn union(&self, other: &Extent) -> Extent {
        match (self.is_defined(), other.is_defined()) {
            (true, true) => Extent::new(
                self.min_x.min(other.min_x),
                self.min_y.min(other.min_y),
                self.max_x.max(other.max_x),
                self.max_y.max(other.max_y),
            ),
            (true, false) => *self,
            (false, _) => *other,
        }
    }

    pub fn contains_point(&self, p: Point) -> bool {
        p.x() >= self.min_x && p.x() <= self.max_x && p.y() >= self.min_y && p.y() <= self.max_y
    }

    pub fn contains(&self, other: &Extent) -> bool {
        self.is_defined()
            && other.is_defined()
            && other.min_x >= self.min_x
            && other.max_x <= self.max_x
            && other.min_y >= self.min_y
            && other.max_y <= self.max_y
    }

    pub fn intersects(&self, other: &Extent) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.min_x < other.max_x
            && self.max_x > other.min_x
            && self.min_y < other.max_y
            && self.max_y > other.min_y
    }

    pub fn intersection(&self, other: &Extent) -> Extent {
        if !self.intersects(other) {
            // Extents do not overlap, return an empty extent
            return Extent::new(0.0, 0.0, 0.0, 0.0);
        }

        Extent::new(
            self.min_x.max(other.min_x),
            self.min_y.max(other.min_y),
            self.max_x.min(other.max_x),
            self.max_y.min(other.max_y),
        )
    }
}

impl From<Extent> for geo_types::Polygon<f64> {
    fn from(extent: Extent) -> geo_types::Polygon<f64> {
        geo_types::Polygon::new(
            geo_types::LineString::from(vec![
                extent.upper_left(),
                extent.upper_right(),
                extent.lower_right(),
                extent.lower_left(),
                extent.upper_left(),
            ]),
            Vec::default(),
        )
    }
}

impl AbsDiffEq for Extent {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.min_x.abs_diff_eq(&other.min_x, epsilon)
            && self.min_y.abs_diff_eq(&other.min_y, epsilon)
            && self.max_x.abs_diff_eq(&other.max_x, epsilon)
            && self.max_y.abs_diff_eq(&other.max_y, epsilon)
    }
}

impl RelativeEq for Extent {
    fn default_max_relative() -> Self::Epsilon {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: Self::Epsilon, max_relative: Self::Epsilon) -> bool {
        self.min_x.relative_eq(&other.min_x, epsilon, max_relative)
            && self.min_y.relative_eq(&other.min_y, epsilon, max_relative)
            && self.max_x.relative_eq(&other.max_x, epsilon, max_relative)
            && self.max_y.relative_eq(&other.max_y, epsilon, max_relative)
    }
}
