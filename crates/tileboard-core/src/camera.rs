//! Viewport camera: device/canvas coordinate conversion and pan/zoom gestures.

use crate::geometry::{scale_to_percentage, zoom_percentage_to_scale};
use kurbo::{Affine, Point, Rect};
use std::time::{Duration, Instant};

/// Zoom change per wheel notch or toolbar step, in percentage points.
pub const ZOOM_STEP_PERCENT: f64 = 10.0;
/// Smallest percentage a gesture zoom may land on.
pub const GESTURE_ZOOM_MIN_PERCENT: f64 = 15.0;
/// Largest percentage a gesture zoom may land on.
pub const GESTURE_ZOOM_MAX_PERCENT: f64 = 195.0;
/// Quiet period after the last wheel event before a zoom counts as settled.
pub const ZOOM_SETTLE: Duration = Duration::from_millis(250);

/// Pan/zoom state and the canvas-to-device transform.
///
/// The render manager pushes `transform()` to the drawing surfaces every
/// frame, so camera and renderer transform state cannot diverge.
#[derive(Debug, Clone)]
pub struct Camera {
    transform: Affine,
    initial_scale: f64,
    pan_anchor: Option<Point>,
    last_wheel_zoom: Option<Instant>,
}

impl Camera {
    /// `initial_scale` is the device pixel ratio the surface was created with.
    pub fn new(initial_scale: f64) -> Self {
        Self {
            transform: Affine::scale(initial_scale),
            initial_scale,
            pan_anchor: None,
            last_wheel_zoom: None,
        }
    }

    pub fn transform(&self) -> Affine {
        self.transform
    }

    pub fn set_transform(&mut self, transform: Affine) {
        self.transform = transform;
    }

    pub fn initial_scale(&self) -> f64 {
        self.initial_scale
    }

    fn scale_x(&self) -> f64 {
        self.transform.as_coeffs()[0]
    }

    /// Current zoom multiplier relative to the initial scale.
    pub fn zoom(&self) -> f64 {
        self.scale_x() / self.initial_scale
    }

    pub fn zoom_percentage(&self) -> f64 {
        scale_to_percentage(self.zoom())
    }

    /// Convert a device-space point to canvas space, inverting the cumulative
    /// pan/zoom the renderer applies.
    pub fn device_to_canvas(&self, device: Point) -> Point {
        let [a, _, _, _, e, f] = self.transform.as_coeffs();
        let inv_zoom = self.initial_scale / a;
        Point::new(
            inv_zoom * device.x - inv_zoom * e / self.initial_scale,
            inv_zoom * device.y - inv_zoom * f / self.initial_scale,
        )
    }

    /// Canvas-space rect currently visible in a device viewport of the given size.
    pub fn visible_rect(&self, device_width: f64, device_height: f64) -> Rect {
        let top_left = self.device_to_canvas(Point::ZERO);
        let bottom_right = self.device_to_canvas(Point::new(device_width, device_height));
        Rect::from_points(top_left, bottom_right)
    }

    pub fn is_panning(&self) -> bool {
        self.pan_anchor.is_some()
    }

    /// Start a pan gesture; the canvas point under the cursor becomes the anchor.
    pub fn begin_pan(&mut self, device: Point) {
        self.pan_anchor = Some(self.device_to_canvas(device));
    }

    /// Translate the transform so the anchored canvas point follows the cursor.
    pub fn pan_to(&mut self, device: Point) {
        let Some(anchor) = self.pan_anchor else {
            return;
        };
        let current = self.device_to_canvas(device);
        self.transform = self.transform * Affine::translate(current - anchor);
    }

    pub fn end_pan(&mut self) {
        self.pan_anchor = None;
    }

    /// Wheel zoom by one step, anchored on the canvas point under the cursor.
    ///
    /// A candidate percentage outside the gesture bounds leaves the transform
    /// unchanged and returns false. The wheel timestamp feeds
    /// [`Camera::poll_zoom_stopped`].
    pub fn wheel_zoom(&mut self, device_anchor: Point, zoom_in: bool, now: Instant) -> bool {
        let anchor = self.device_to_canvas(device_anchor);
        if !self.zoom_step(anchor, zoom_in) {
            return false;
        }
        self.last_wheel_zoom = Some(now);
        true
    }

    /// Toolbar zoom by one step, anchored on a caller-chosen canvas point
    /// (the active layer's center if any, else the viewport center).
    pub fn step_zoom(&mut self, canvas_anchor: Point, zoom_in: bool) -> bool {
        self.zoom_step(canvas_anchor, zoom_in)
    }

    fn zoom_step(&mut self, anchor: Point, zoom_in: bool) -> bool {
        let step = if zoom_in {
            ZOOM_STEP_PERCENT
        } else {
            -ZOOM_STEP_PERCENT
        };
        let candidate = self.zoom_percentage() + step;
        if !(GESTURE_ZOOM_MIN_PERCENT..=GESTURE_ZOOM_MAX_PERCENT).contains(&candidate) {
            return false;
        }
        let factor = zoom_percentage_to_scale(candidate) / self.zoom();
        let offset = anchor.to_vec2();
        // Zoom about a point: translate to the anchor, scale, translate back.
        self.transform = self.transform
            * Affine::translate(offset)
            * Affine::scale(factor)
            * Affine::translate(-offset);
        true
    }

    /// True once the settle period has elapsed since the last wheel zoom.
    /// Clears the pending state, so each zoom gesture reports exactly once.
    pub fn poll_zoom_stopped(&mut self, now: Instant) -> bool {
        match self.last_wheel_zoom {
            Some(last) if now.duration_since(last) >= ZOOM_SETTLE => {
                self.last_wheel_zoom = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(1.0)
    }
}
