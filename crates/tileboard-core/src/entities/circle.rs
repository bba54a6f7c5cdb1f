//! Circle (ellipse) sticker entity.

use super::{DrawOptions, Rgba};
use kurbo::Point;

/// Default minimum dimension for circle stickers, in canvas units.
pub const CIRCLE_MIN_DIMENSION: f64 = 20.0;

/// An ellipse sized by its bounding box.
#[derive(Debug, Clone)]
pub struct CircleEntity {
    pub options: DrawOptions,
    pub min_dimension: f64,
    pub fill: Rgba,
}

impl CircleEntity {
    pub fn new(options: DrawOptions, fill: Rgba) -> Self {
        Self {
            options,
            min_dimension: CIRCLE_MIN_DIMENSION,
            fill,
        }
    }

    /// Elliptical containment: normalized-radius form grown by `padding`.
    pub fn contains(&self, point: Point, padding: f64) -> bool {
        let bounds = self.options.bounds();
        let rx = bounds.width() / 2.0 + padding;
        let ry = bounds.height() / 2.0 + padding;
        if rx <= 0.0 || ry <= 0.0 {
            return false;
        }
        let center = bounds.center();
        let dx = (point.x - center.x) / rx;
        let dy = (point.y - center.y) / ry;
        dx * dx + dy * dy <= 1.0
    }
}
