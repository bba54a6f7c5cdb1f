//! Selection frame entity: hit regions for resize handles.

use super::DrawOptions;
use crate::geometry;
use kurbo::Point;

/// Canvas-unit distance within which a corner or edge counts as hit.
pub const REGION_THRESHOLD: f64 = 10.0;

/// Resize handle corners, clockwise from top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

/// Resize handle edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

/// Which part of the selection frame a pointer landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitRegion {
    Corner(Corner),
    Edge(Edge),
}

/// The rubber-band frame drawn around a selected layer.
///
/// Has no floor of its own; it always tracks the bounds of whatever owns it.
#[derive(Debug, Clone)]
pub struct SelectionEntity {
    pub options: DrawOptions,
    pub min_dimension: f64,
}

impl SelectionEntity {
    pub fn new(options: DrawOptions) -> Self {
        Self {
            options,
            min_dimension: 0.0,
        }
    }

    /// Classify a pointer position against the frame. Corners win over edges;
    /// both use [`REGION_THRESHOLD`] in canvas units.
    pub fn region_at(&self, point: Point) -> Option<HitRegion> {
        let [tl, tr, br, bl] = self.options.corners();

        let corners = [
            (tl, Corner::TopLeft),
            (tr, Corner::TopRight),
            (br, Corner::BottomRight),
            (bl, Corner::BottomLeft),
        ];
        for (corner, which) in corners {
            if corner.distance(point) <= REGION_THRESHOLD {
                return Some(HitRegion::Corner(which));
            }
        }

        // Edges only count near the frame itself, not along infinite lines.
        if !self.options.contains(point, REGION_THRESHOLD) {
            return None;
        }
        let edges = [
            (tl, tr, Edge::Top),
            (tr, br, Edge::Right),
            (br, bl, Edge::Bottom),
            (bl, tl, Edge::Left),
        ];
        for (a, b, which) in edges {
            if geometry::point_to_line_distance(point, a, b).abs() <= REGION_THRESHOLD {
                return Some(HitRegion::Edge(which));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> SelectionEntity {
        SelectionEntity::new(DrawOptions::new(0.0, 0.0, 100.0, 100.0, 1.0))
    }

    #[test]
    fn test_corner_hit() {
        let selection = frame();
        assert_eq!(
            selection.region_at(Point::new(2.0, -3.0)),
            Some(HitRegion::Corner(Corner::TopLeft))
        );
        assert_eq!(
            selection.region_at(Point::new(98.0, 102.0)),
            Some(HitRegion::Corner(Corner::BottomRight))
        );
    }

    #[test]
    fn test_corner_wins_over_edge() {
        let selection = frame();
        // Within threshold of both the top edge and the top-right corner.
        assert_eq!(
            selection.region_at(Point::new(95.0, 2.0)),
            Some(HitRegion::Corner(Corner::TopRight))
        );
    }

    #[test]
    fn test_edge_hit() {
        let selection = frame();
        assert_eq!(
            selection.region_at(Point::new(50.0, 4.0)),
            Some(HitRegion::Edge(Edge::Top))
        );
        assert_eq!(
            selection.region_at(Point::new(96.0, 50.0)),
            Some(HitRegion::Edge(Edge::Right))
        );
        assert_eq!(
            selection.region_at(Point::new(50.0, 97.0)),
            Some(HitRegion::Edge(Edge::Bottom))
        );
        assert_eq!(
            selection.region_at(Point::new(-4.0, 50.0)),
            Some(HitRegion::Edge(Edge::Left))
        );
    }

    #[test]
    fn test_interior_and_far_misses() {
        let selection = frame();
        assert_eq!(selection.region_at(Point::new(50.0, 50.0)), None);
        assert_eq!(selection.region_at(Point::new(300.0, 300.0)), None);
    }
}
