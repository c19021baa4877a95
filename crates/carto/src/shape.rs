//! Vector shapes drawn on a map.

use crate::{Extent, Point, point};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ShapeType {
    Point,
    Polyline,
    CurveLine,
    Polygon,
    CurvePolygon,
    Circle,
    Ellipse,
    WindArrow,
}

/// A polygon with its holes
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PolygonPart {
    pub outer: Vec<Point>,
    pub holes: Vec<Vec<Point>>,
}

impl PolygonPart {
    pub fn new(outer: Vec<Point>) -> Self {
        PolygonPart { outer, holes: Vec::new() }
    }

    pub fn with_holes(outer: Vec<Point>, holes: Vec<Vec<Point>>) -> Self {
        PolygonPart { outer, holes }
    }
}

/// Wind direction symbol anchored at a location
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindArrow {
    pub anchor: Point,
    /// Direction in degrees clockwise from north
    pub angle: f64,
    pub length: f64,
}

/// Geometry of a graphic.
///
/// Circles are stored as the left, top, right and bottom points of the circle.
/// Ellipses are stored as the lower-left, upper-left, upper-right and lower-right corners of their bounding box.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Shape {
    Point(Point),
    Polyline(Vec<Vec<Point>>),
    CurveLine(Vec<Vec<Point>>),
    Polygon(Vec<PolygonPart>),
    CurvePolygon(Vec<PolygonPart>),
    Circle([Point; 4]),
    Ellipse([Point; 4]),
    WindArrow(WindArrow),
}

impl Shape {
    pub fn circle(center: Point, radius: f64) -> Self {
        Shape::Circle([
            Point::new(center.x() - radius, center.y()),
            Point::new(center.x(), center.y() + radius),
            Point::new(center.x() + radius, center.y()),
            Point::new(center.x(), center.y() - radius),
        ])
    }

    pub fn ellipse(center: Point, semi_axis_x: f64, semi_axis_y: f64) -> Self {
        let extent = Extent::from_center(center, semi_axis_x, semi_axis_y);
        Shape::Ellipse([extent.lower_left(), extent.upper_left(), extent.upper_right(), extent.lower_right()])
    }

    pub fn shape_type(&self) -> ShapeType {
        match self {
            Shape::Point(_) => ShapeType::Point,
            Shape::Polyline(_) => ShapeType::Polyline,
            Shape::CurveLine(_) => ShapeType::CurveLine,
            Shape::Polygon(_) => ShapeType::Polygon,
            Shape::CurvePolygon(_) => ShapeType::CurvePolygon,
            Shape::Circle(_) => ShapeType::Circle,
            Shape::Ellipse(_) => ShapeType::Ellipse,
            Shape::WindArrow(_) => ShapeType::WindArrow,
        }
    }

    /// All the vertices of the shape
    pub fn points(&self) -> Vec<Point> {
        match self {
            Shape::Point(p) => vec![*p],
            Shape::Polyline(parts) | Shape::CurveLine(parts) => parts.iter().flatten().copied().collect(),
            Shape::Polygon(parts) | Shape::CurvePolygon(parts) => parts
                .iter()
                .flat_map(|part| part.outer.iter().chain(part.holes.iter().flatten()))
                .copied()
                .collect(),
            Shape::Circle(points) | Shape::Ellipse(points) => points.to_vec(),
            Shape::WindArrow(arrow) => vec![arrow.anchor],
        }
    }

    /// Bounding box of the defined vertices, `None` for a shape without any
    pub fn extent(&self) -> Option<Extent> {
        Extent::from_points(&self.points())
    }

    /// Center point of a circle or ellipse
    pub fn center(&self) -> Option<Point> {
        match self {
            Shape::Circle(points) | Shape::Ellipse(points) => {
                if !points.iter().all(|p| point::is_defined(*p)) {
                    return None;
                }

                Extent::from_points(points).map(|extent| extent.center())
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circle_points() {
        let circle = Shape::circle(Point::new(1.0, 2.0), 3.0);
        assert_eq!(circle.shape_type(), ShapeType::Circle);
        assert_eq!(circle.extent(), Some(Extent::new(-2.0, -1.0, 4.0, 5.0)));
        assert_eq!(circle.center(), Some(Point::new(1.0, 2.0)));
    }

    #[test]
    fn polygon_points_include_holes() {
        let part = PolygonPart::with_holes(
            vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 10.0)],
            vec![vec![Point::new(1.0, 1.0), Point::new(2.0, 1.0), Point::new(2.0, 2.0)]],
        );

        let shape = Shape::Polygon(vec![part]);
        assert_eq!(shape.points().len(), 6);
        assert_eq!(shape.extent(), Some(Extent::new(0.0, 0.0, 10.0, 10.0)));
        assert_eq!(shape.center(), None);
    }

    #[test]
    fn ellipse_corners() {
        let ellipse = Shape::ellipse(Point::new(0.0, 0.0), 2.0, 1.0);
        let Shape::Ellipse(corners) = ellipse else {
            panic!("Expected an ellipse");
        };

        assert_eq!(corners[0], Point::new(-2.0, -1.0));
        assert_eq!(corners[2], Point::new(2.0, 1.0));
    }
}
