//! Multi-segment Bézier spline with interactive control-point editing.
//!
//! Control points come as knot/handle triples: indices divisible by three are
//! on-curve knots, the rest are off-curve handles. Dragging a knot carries its
//! two adjacent handles along; dragging a handle mirrors the opposite handle
//! about the shared knot to keep the curve C¹-smooth.

use super::{DrawOptions, Rgba};
use crate::geometry::SplineArcLengthMap;
use kurbo::{BezPath, CubicBez, Point, Rect, Vec2};

/// Canvas-unit radius within which a control point can be picked up.
pub const CONTROL_POINT_PICK_RADIUS: f64 = 10.0;

/// Default minimum dimension for spline bounding boxes, in canvas units.
pub const SPLINE_MIN_DIMENSION: f64 = 10.0;

/// Padding around the control polygon so handles and stroke stay inside bounds.
const BOUNDS_PADDING: f64 = 12.0;

/// Control-point editing state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        index: usize,
    },
}

/// An editable multi-segment cubic Bézier curve, optionally carrying text
/// rendered along its length.
#[derive(Debug, Clone)]
pub struct SplineEntity {
    pub options: DrawOptions,
    pub min_dimension: f64,
    pub stroke: Rgba,
    pub stroke_width: f64,
    pub font: String,
    pub font_size: f64,
    control_points: Vec<Point>,
    segments: Vec<CubicBez>,
    text: Option<String>,
    drag: DragState,
}

impl SplineEntity {
    /// Build a spline from knot/handle triples (`3n + 1` points).
    pub fn new(control_points: Vec<Point>) -> Self {
        let mut spline = Self {
            options: DrawOptions::new(0.0, 0.0, 0.0, 0.0, 1.0),
            min_dimension: SPLINE_MIN_DIMENSION,
            stroke: Rgba::black(),
            stroke_width: 2.0,
            font: "sans-serif".to_string(),
            font_size: 16.0,
            control_points,
            segments: Vec::new(),
            text: None,
            drag: DragState::Idle,
        };
        spline.refresh_derived();
        spline.options.initial_width = spline.options.width;
        spline.options.initial_height = spline.options.height;
        spline
    }

    /// A spline that renders `text` along its curve.
    pub fn with_text(control_points: Vec<Point>, text: String) -> Self {
        let mut spline = Self::new(control_points);
        spline.text = Some(text);
        spline
    }

    pub fn control_points(&self) -> &[Point] {
        &self.control_points
    }

    pub fn segments(&self) -> &[CubicBez] {
        &self.segments
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn set_text(&mut self, text: Option<String>) {
        self.text = text;
    }

    /// Knot-to-handle guide segments, for rendering edit affordances.
    pub fn handle_pairs(&self) -> Vec<(Point, Point)> {
        let mut pairs = Vec::new();
        for (i, &knot) in self.control_points.iter().enumerate() {
            if i % 3 != 0 {
                continue;
            }
            if i > 0 {
                pairs.push((knot, self.control_points[i - 1]));
            }
            if i + 1 < self.control_points.len() {
                pairs.push((knot, self.control_points[i + 1]));
            }
        }
        pairs
    }

    /// Path through all derived segments.
    pub fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let Some(first) = self.segments.first() else {
            return path;
        };
        path.move_to(first.p0);
        for segment in &self.segments {
            path.curve_to(segment.p1, segment.p2, segment.p3);
        }
        path
    }

    /// Arc-length map over the current segments.
    pub fn arc_length_map(&self) -> SplineArcLengthMap {
        SplineArcLengthMap::new(&self.segments)
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    /// Pick the nearest control point within the pick radius and start
    /// dragging it. Returns false when nothing is close enough.
    pub fn begin_drag(&mut self, point: Point) -> bool {
        let mut best: Option<(usize, f64)> = None;
        for (i, &cp) in self.control_points.iter().enumerate() {
            let d = cp.distance(point);
            if d <= CONTROL_POINT_PICK_RADIUS && best.is_none_or(|(_, bd)| d < bd) {
                best = Some((i, d));
            }
        }
        match best {
            Some((index, _)) => {
                self.drag = DragState::Dragging { index };
                true
            }
            None => false,
        }
    }

    /// Apply one drag movement to the picked control point.
    ///
    /// Knots carry both adjacent handles along; handles mirror the opposite
    /// handle about the shared knot, except at curve endpoints. Derived
    /// segments and bounds are rebuilt every tick.
    pub fn drag_by(&mut self, delta: Vec2) {
        let DragState::Dragging { index } = self.drag else {
            return;
        };
        let len = self.control_points.len();
        if index >= len {
            return;
        }
        if index % 3 == 0 {
            self.control_points[index] += delta;
            if index > 0 {
                self.control_points[index - 1] += delta;
            }
            if index + 1 < len {
                self.control_points[index + 1] += delta;
            }
        } else {
            self.control_points[index] += delta;
            let (knot, mirror) = if index % 3 == 1 {
                (index - 1, index.checked_sub(2))
            } else {
                (index + 1, (index + 2 < len).then_some(index + 2))
            };
            if let Some(mirror) = mirror {
                let knot_p = self.control_points[knot];
                let handle_p = self.control_points[index];
                self.control_points[mirror] =
                    Point::new(2.0 * knot_p.x - handle_p.x, 2.0 * knot_p.y - handle_p.y);
            }
        }
        self.refresh_derived();
    }

    pub fn end_drag(&mut self) {
        self.drag = DragState::Idle;
    }

    pub fn move_by(&mut self, dx: f64, dy: f64) {
        for p in &mut self.control_points {
            p.x += dx;
            p.y += dy;
        }
        self.refresh_derived();
    }

    /// Uniform resize of the padded bounding box; control points scale with it.
    pub fn resize(&mut self, dx: f64, dy: f64) -> bool {
        let movement = (dx + dy) / 2.0;
        let width = self.options.width + movement;
        let height = self.options.height + movement;
        if width < self.min_dimension || height < self.min_dimension {
            return false;
        }
        let old = self.options.bounds();
        let new = Rect::new(old.x0, old.y0, old.x0 + width, old.y0 + height);
        self.scale_within(old, new);
        self.options.rescale();
        true
    }

    pub(crate) fn scale_within(&mut self, old: Rect, new: Rect) {
        if old.width() <= f64::EPSILON || old.height() <= f64::EPSILON {
            return;
        }
        let sx = new.width() / old.width();
        let sy = new.height() / old.height();
        for p in &mut self.control_points {
            p.x = new.x0 + (p.x - old.x0) * sx;
            p.y = new.y0 + (p.y - old.y0) * sy;
        }
        self.refresh_derived();
    }

    /// Rebuild derived segments and the padded bounding box.
    fn refresh_derived(&mut self) {
        self.segments.clear();
        let pts = &self.control_points;
        let mut i = 0;
        while i + 3 < pts.len() {
            self.segments
                .push(CubicBez::new(pts[i], pts[i + 1], pts[i + 2], pts[i + 3]));
            i += 3;
        }
        if pts.is_empty() {
            return;
        }
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for p in pts {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        self.options.x = min_x - BOUNDS_PADDING;
        self.options.y = min_y - BOUNDS_PADDING;
        self.options.width = (max_x - min_x) + BOUNDS_PADDING * 2.0;
        self.options.height = (max_y - min_y) + BOUNDS_PADDING * 2.0;
    }
}
