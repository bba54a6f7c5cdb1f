//! Rectangle sticker entity.

use super::{DrawOptions, Entity, Rgba, SplineEntity};
use crate::layer::Layer;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Default minimum dimension for rect stickers, in canvas units.
pub const RECT_MIN_DIMENSION: f64 = 20.0;

/// Distinguishes a plain sticker from a text-input shaped rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RectSubtype {
    #[default]
    Rect,
    TextArea,
}

/// Drop-shadow parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shadow {
    pub offset: Vec2,
    pub blur: f64,
    pub color: Rgba,
}

/// A filled rectangle sticker, optionally shaped as a text-input area.
#[derive(Debug, Clone)]
pub struct RectEntity {
    pub options: DrawOptions,
    pub min_dimension: f64,
    pub fill: Rgba,
    pub shadow: Option<Shadow>,
    pub subtype: RectSubtype,
}

impl RectEntity {
    pub fn new(options: DrawOptions, fill: Rgba) -> Self {
        Self {
            options,
            min_dimension: RECT_MIN_DIMENSION,
            fill,
            shadow: None,
            subtype: RectSubtype::Rect,
        }
    }

    /// A rect shaped as a text-input area.
    pub fn text_area(options: DrawOptions, fill: Rgba) -> Self {
        Self {
            subtype: RectSubtype::TextArea,
            ..Self::new(options, fill)
        }
    }

    pub fn with_shadow(mut self, shadow: Shadow) -> Self {
        self.shadow = Some(shadow);
        self
    }

    /// One-way conversion into a layer whose text flows along a decorative wave.
    ///
    /// The rect is consumed; the resulting layer occupies the same bounds and
    /// carries a spline child that renders `text` along a fixed curve arching
    /// a third of the box height above and below the midline.
    pub fn enable_text_transformation(self, text: &str) -> Layer {
        let b = self.options.bounds();
        let mid = b.y0 + b.height() / 2.0;
        let lift = b.height() / 3.0;
        let control_points = vec![
            Point::new(b.x0, mid),
            Point::new(b.x0 + b.width() / 3.0, mid - lift),
            Point::new(b.x0 + b.width() * 2.0 / 3.0, mid + lift),
            Point::new(b.x1, mid),
        ];
        let spline = SplineEntity::with_text(control_points, text.to_string());
        let mut layer = Layer::new(
            DrawOptions::new(b.x0, b.y0, b.width(), b.height(), 1.0),
            true,
        );
        layer.add_child(Entity::Spline(spline));
        layer
    }
}
