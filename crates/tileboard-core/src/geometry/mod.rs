//! Geometry helpers shared by hit testing, tiling, and the camera.

mod arc_length;

pub use arc_length::{
    ARC_SAMPLES, ArcLengthMap, GlyphPlacement, SplineArcLengthMap, place_along,
};

use kurbo::{Affine, Point, Rect};

/// Smallest zoom percentage exposed to the UI.
pub const MIN_ZOOM_PERCENT: f64 = 10.0;
/// Largest zoom percentage exposed to the UI.
pub const MAX_ZOOM_PERCENT: f64 = 200.0;

/// Check whether a point lies inside a rectangle grown by `padding` on all sides.
pub fn point_in_rect(point: Point, rect: Rect, padding: f64) -> bool {
    point.x >= rect.x0 - padding
        && point.x <= rect.x1 + padding
        && point.y >= rect.y0 - padding
        && point.y <= rect.y1 + padding
}

/// Check whether two rectangles overlap.
///
/// Touching edges do not count as an overlap. Tile membership for layers that
/// sit exactly on a tile boundary depends on this, so the comparison stays strict.
pub fn bounds_intersect(a: Rect, b: Rect) -> bool {
    a.x0 < b.x1 && b.x0 < a.x1 && a.y0 < b.y1 && b.y0 < a.y1
}

/// Signed perpendicular distance from `point` to the infinite line through `a` and `b`.
///
/// The sign encodes which side of the line the point falls on; callers interested
/// in proximity only should take the absolute value. Degenerates to the distance
/// to `a` when the two line points coincide.
pub fn point_to_line_distance(point: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len = (dx * dx + dy * dy).sqrt();
    if len < f64::EPSILON {
        return point.distance(a);
    }
    (dx * (point.y - a.y) - dy * (point.x - a.x)) / len
}

/// Convert an internal scale multiplier to the user-facing zoom percentage.
///
/// Rounds up, with a small tolerance so float noise in the scale (1.1 stored
/// as 1.1000000000000001) does not bump the percentage by one.
pub fn scale_to_percentage(scale: f64) -> f64 {
    (scale * 100.0 - 1e-9)
        .ceil()
        .clamp(MIN_ZOOM_PERCENT, MAX_ZOOM_PERCENT)
}

/// Convert a user-facing zoom percentage back to a scale multiplier.
pub fn zoom_percentage_to_scale(percentage: f64) -> f64 {
    percentage.clamp(MIN_ZOOM_PERCENT, MAX_ZOOM_PERCENT) / 100.0
}

/// Four corners of a rectangle, clockwise from top-left.
pub fn corners_of(rect: Rect) -> [Point; 4] {
    [
        Point::new(rect.x0, rect.y0),
        Point::new(rect.x1, rect.y0),
        Point::new(rect.x1, rect.y1),
        Point::new(rect.x0, rect.y1),
    ]
}

/// Invert an affine transform, or `None` when the determinant is zero.
pub fn try_invert(transform: Affine) -> Option<Affine> {
    let [a, b, c, d, _, _] = transform.as_coeffs();
    let det = a * d - b * c;
    if det.abs() < f64::EPSILON {
        return None;
    }
    Some(transform.inverse())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_in_rect_with_padding() {
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(point_in_rect(Point::new(50.0, 50.0), rect, 0.0));
        assert!(!point_in_rect(Point::new(105.0, 50.0), rect, 0.0));
        assert!(point_in_rect(Point::new(105.0, 50.0), rect, 10.0));
        assert!(point_in_rect(Point::new(-3.0, -3.0), rect, 4.0));
    }

    #[test]
    fn test_bounds_intersect_excludes_touching_edges() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let touching = Rect::new(100.0, 0.0, 200.0, 100.0);
        let overlapping = Rect::new(99.0, 0.0, 200.0, 100.0);
        let disjoint = Rect::new(150.0, 150.0, 200.0, 200.0);

        assert!(!bounds_intersect(a, touching));
        assert!(bounds_intersect(a, overlapping));
        assert!(!bounds_intersect(a, disjoint));
    }

    #[test]
    fn test_point_to_line_distance_is_signed() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        let above = point_to_line_distance(Point::new(5.0, 3.0), a, b);
        let below = point_to_line_distance(Point::new(5.0, -3.0), a, b);

        assert!((above.abs() - 3.0).abs() < 1e-12);
        assert!((below.abs() - 3.0).abs() < 1e-12);
        assert!(above * below < 0.0);
    }

    #[test]
    fn test_point_to_line_distance_beyond_segment() {
        // Infinite line, not the segment: a point past the endpoint still
        // measures perpendicular distance.
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        let d = point_to_line_distance(Point::new(50.0, 4.0), a, b);
        assert!((d.abs() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_zoom_percentage_round_trip() {
        let scale = zoom_percentage_to_scale(45.0);
        assert!((scale_to_percentage(scale) - 45.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zoom_percentage_clamps() {
        assert!((zoom_percentage_to_scale(5.0) - 0.1).abs() < f64::EPSILON);
        assert!((zoom_percentage_to_scale(500.0) - 2.0).abs() < f64::EPSILON);
        assert!((scale_to_percentage(0.01) - MIN_ZOOM_PERCENT).abs() < f64::EPSILON);
        assert!((scale_to_percentage(5.0) - MAX_ZOOM_PERCENT).abs() < f64::EPSILON);
    }

    #[test]
    fn test_try_invert_degenerate() {
        assert!(try_invert(Affine::scale(0.0)).is_none());

        let transform = Affine::translate(kurbo::Vec2::new(3.0, -7.0)) * Affine::scale(2.0);
        let inverse = try_invert(transform).unwrap();
        let p = Point::new(12.0, 34.0);
        let back = inverse * (transform * p);
        assert!((back.x - p.x).abs() < 1e-12);
        assert!((back.y - p.y).abs() < 1e-12);
    }

    #[test]
    fn test_corners_of() {
        let [tl, tr, br, bl] = corners_of(Rect::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(tl, Point::new(1.0, 2.0));
        assert_eq!(tr, Point::new(3.0, 2.0));
        assert_eq!(br, Point::new(3.0, 4.0));
        assert_eq!(bl, Point::new(1.0, 4.0));
    }
}
