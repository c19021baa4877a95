use crate::{
    Graphic, Point, ProjectionInfo, Shape, coordinatetransformer, point,
    projectionutil::angle::transform_angle,
    reproject::try_transform_normalized,
    shape::{PolygonPart, WindArrow},
};

const MIN_LINE_POINTS: usize = 2;
const MIN_RING_POINTS: usize = 3;

fn transform_points(points: &[Point], transform: &impl Fn(Point) -> Option<Point>) -> Vec<Point> {
    points.iter().filter_map(|&p| transform(p)).collect()
}

fn transform_lines(parts: &[Vec<Point>], transform: &impl Fn(Point) -> Option<Point>) -> Vec<Vec<Point>> {
    parts
        .iter()
        .map(|part| transform_points(part, transform))
        .filter(|part| part.len() >= MIN_LINE_POINTS)
        .collect()
}

fn transform_polygons(parts: &[PolygonPart], transform: &impl Fn(Point) -> Option<Point>) -> Vec<PolygonPart> {
    parts
        .iter()
        .filter_map(|part| {
            let outer = transform_points(&part.outer, transform);
            if outer.len() < MIN_RING_POINTS {
                return None;
            }

            let holes = part
                .holes
                .iter()
                .map(|hole| transform_points(hole, transform))
                .filter(|hole| hole.len() >= MIN_RING_POINTS)
                .collect();

            Some(PolygonPart::with_holes(outer, holes))
        })
        .collect()
}

fn non_empty<T>(parts: Vec<T>) -> Option<Vec<T>> {
    (!parts.is_empty()).then_some(parts)
}

/// Transforms a shape with the provided point transformation.
///
/// Vertices that can not be transformed are dropped, line parts with less than 2 and polygon rings
/// with less than 3 remaining vertices are dropped. A polygon part is dropped when its outer ring is dropped.
/// Returns `None` when nothing of the shape remains.
pub(crate) fn transform_shape_with(
    shape: &Shape,
    geographic_source: bool,
    transform: impl Fn(Point) -> Option<Point>,
) -> Option<Shape> {
    match shape {
        Shape::Point(p) => transform(*p).map(Shape::Point),
        Shape::Polyline(parts) => non_empty(transform_lines(parts, &transform)).map(Shape::Polyline),
        Shape::CurveLine(parts) => non_empty(transform_lines(parts, &transform)).map(Shape::CurveLine),
        Shape::Polygon(parts) => non_empty(transform_polygons(parts, &transform)).map(Shape::Polygon),
        Shape::CurvePolygon(parts) => non_empty(transform_polygons(parts, &transform)).map(Shape::CurvePolygon),
        Shape::Circle([_, _, right, _]) => {
            let center = shape.center()?;
            let projected_center = transform(center)?;
            let radius = point::euclidean_distance(projected_center, transform(*right)?);
            Some(Shape::circle(projected_center, radius))
        }
        Shape::Ellipse(_) => {
            let extent = shape.extent()?;
            let center = shape.center()?;
            let projected_center = transform(center)?;
            let right = transform(Point::new(extent.max_x, center.y()))?;
            let top = transform(Point::new(center.x(), extent.max_y))?;

            Some(Shape::ellipse(
                projected_center,
                point::euclidean_distance(projected_center, right),
                point::euclidean_distance(projected_center, top),
            ))
        }
        Shape::WindArrow(arrow) => {
            let anchor = transform(arrow.anchor)?;
            Some(Shape::WindArrow(WindArrow {
                anchor,
                angle: transform_angle(arrow.angle, arrow.anchor, anchor, geographic_source, &transform),
                length: arrow.length,
            }))
        }
    }
}

/// Reprojects a shape, see the drop policy of the individual vertices above.
/// Returns `None` when no part of the shape can be reprojected.
pub fn project_shape(shape: &Shape, from: &ProjectionInfo, to: &ProjectionInfo) -> Option<Shape> {
    let transformer = coordinatetransformer::cached(from, to).ok()?;
    transform_shape_with(shape, from.is_geographic(), |p| try_transform_normalized(&transformer, p))
}

/// Reprojects the shape of the graphic, the legend is kept
pub fn project_graphic<L: Clone>(graphic: &Graphic<L>, from: &ProjectionInfo, to: &ProjectionInfo) -> Option<Graphic<L>> {
    project_shape(&graphic.shape, from, to).map(|shape| graphic.with_shape(shape))
}

/// Reprojects the graphics, graphics without a remaining shape are skipped
pub fn project_graphics<L: Clone>(graphics: &[Graphic<L>], from: &ProjectionInfo, to: &ProjectionInfo) -> Vec<Graphic<L>> {
    graphics
        .iter()
        .filter_map(|graphic| project_graphic(graphic, from, to))
        .collect()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::{
        Extent, ShapeType,
        testutils::{angle_difference, mercator, wgs84},
    };

    #[test]
    fn polyline_drops_failed_vertices_and_short_parts() {
        let shape = Shape::Polyline(vec![
            vec![Point::new(0.0, 0.0), Point::new(1.0, 90.0), Point::new(2.0, 10.0)],
            vec![Point::new(5.0, 90.0), Point::new(6.0, 10.0)],
        ]);

        let Some(Shape::Polyline(parts)) = project_shape(&shape, &wgs84(), &mercator()) else {
            panic!("Expected a polyline");
        };

        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].len(), 2);
    }

    #[test]
    fn polyline_without_valid_parts() {
        let shape = Shape::Polyline(vec![vec![Point::new(0.0, 90.0), Point::new(1.0, 10.0)]]);
        assert!(project_shape(&shape, &wgs84(), &mercator()).is_none());
    }

    #[test]
    fn polygon_drops_degenerate_holes() {
        let outer = vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        let hole = vec![Point::new(2.0, 2.0), Point::new(3.0, 90.0), Point::new(3.0, 3.0)];
        let shape = Shape::Polygon(vec![PolygonPart::with_holes(outer, vec![hole])]);

        let Some(Shape::Polygon(parts)) = project_shape(&shape, &wgs84(), &mercator()) else {
            panic!("Expected a polygon");
        };

        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].outer.len(), 4);
        assert!(parts[0].holes.is_empty());
    }

    #[test]
    fn polygon_with_degenerate_outer_ring() {
        let shape = Shape::CurvePolygon(vec![PolygonPart::new(vec![
            Point::new(0.0, 90.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
        ])]);
        assert!(project_shape(&shape, &wgs84(), &mercator()).is_none());
    }

    #[test]
    fn circle_is_rebuilt_around_projected_center() {
        let shape = Shape::circle(Point::new(0.0, 0.0), 1.0);
        let projected = project_shape(&shape, &wgs84(), &mercator()).unwrap();
        assert_eq!(projected.shape_type(), ShapeType::Circle);

        let center = projected.center().unwrap();
        assert_relative_eq!(center, Point::new(0.0, 0.0), epsilon = 1e-6);

        // one degree of longitude on the equator
        let extent = projected.extent().unwrap();
        assert_relative_eq!(extent.width() / 2.0, 111319.49079327357, epsilon = 1e-3);
        assert_relative_eq!(extent.width(), extent.height(), epsilon = 1e-6);
    }

    #[test]
    fn ellipse_semi_axes_follow_the_projection() {
        let shape = Shape::ellipse(Point::new(0.0, 0.0), 2.0, 1.0);
        let projected = project_shape(&shape, &wgs84(), &mercator()).unwrap();

        let extent = projected.extent().unwrap();
        assert_relative_eq!(extent.width() / 2.0, 2.0 * 111319.49079327357, epsilon = 1e-3);
        assert!(extent.height() > 2.0 * 110000.0);
    }

    #[test]
    fn point_and_identity() {
        let shape = Shape::Point(Point::new(181.0, 10.0));
        assert_eq!(project_shape(&shape, &wgs84(), &wgs84()), Some(Shape::Point(Point::new(-179.0, 10.0))));
        assert!(project_shape(&Shape::Point(Point::new(0.0, 90.0)), &wgs84(), &mercator()).is_none());
    }

    #[test]
    fn graphics_keep_their_legend() {
        let graphics = vec![
            Graphic::new(Shape::Point(Point::new(1.0, 1.0)), "first"),
            Graphic::new(Shape::Point(Point::new(1.0, 90.0)), "failed"),
            Graphic::new(
                Shape::WindArrow(WindArrow {
                    anchor: Point::new(2.0, 2.0),
                    angle: 0.0,
                    length: 5.0,
                }),
                "wind",
            ),
        ];

        let projected = project_graphics(&graphics, &wgs84(), &mercator());
        assert_eq!(projected.len(), 2);
        assert_eq!(projected[0].legend, "first");
        assert_eq!(projected[1].legend, "wind");

        let Shape::WindArrow(arrow) = &projected[1].shape else {
            panic!("Expected a wind arrow");
        };
        assert_eq!(arrow.length, 5.0);
        assert!(angle_difference(arrow.angle, 0.0) < 1e-9);

        let extent = projected[0].extent().unwrap();
        assert!(Extent::new(111000.0, 110000.0, 112000.0, 112000.0).contains(&extent));
    }
}
