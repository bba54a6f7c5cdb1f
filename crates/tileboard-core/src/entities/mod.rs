//! Entity definitions for the whiteboard scene graph.

mod circle;
mod image;
mod rect;
mod selection;
mod spline;
mod text;

pub use circle::{CIRCLE_MIN_DIMENSION, CircleEntity};
pub use image::{Bitmap, IMAGE_MIN_DIMENSION, ImageEntity, ImageFilters};
pub use rect::{RECT_MIN_DIMENSION, RectEntity, RectSubtype, Shadow};
pub use selection::{Corner, Edge, HitRegion, REGION_THRESHOLD, SelectionEntity};
pub use spline::{
    CONTROL_POINT_PICK_RADIUS, DragState, SPLINE_MIN_DIMENSION, SplineEntity,
};
pub use text::{
    FontStyle, HeuristicMeasure, TEXT_MIN_DIMENSION, TextAlign, TextDecoration, TextEntity,
    TextMeasure,
};

use crate::geometry;
use kurbo::{Point, Rect};
use peniko::Color;
use serde::{Deserialize, Serialize};

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }
}

impl From<Color> for Rgba {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<Rgba> for Color {
    fn from(color: Rgba) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Geometry shared by every drawable entity.
///
/// `width`/`height` are stored pre-multiplied by `scale`; `initial_width`/
/// `initial_height` keep the unscaled reference size so a later resize can
/// recompute the scale factor from the new dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawOptions {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub scale: f64,
    pub initial_width: f64,
    pub initial_height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

impl DrawOptions {
    pub fn new(x: f64, y: f64, width: f64, height: f64, scale: f64) -> Self {
        Self {
            x,
            y,
            width: width * scale,
            height: height * scale,
            scale,
            initial_width: width,
            initial_height: height,
            opacity: None,
        }
    }

    /// Rebuild options verbatim from persisted fields, without the scale
    /// pre-multiplication `new` applies.
    #[allow(clippy::too_many_arguments)]
    pub fn from_raw(
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        scale: f64,
        initial_width: f64,
        initial_height: f64,
        opacity: Option<f64>,
    ) -> Self {
        Self {
            x,
            y,
            width,
            height,
            scale,
            initial_width,
            initial_height,
            opacity,
        }
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Four corners, clockwise from top-left.
    pub fn corners(&self) -> [Point; 4] {
        geometry::corners_of(self.bounds())
    }

    pub fn contains(&self, point: Point, padding: f64) -> bool {
        geometry::point_in_rect(point, self.bounds(), padding)
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    /// Recompute the scale factor after width/height changed.
    pub fn rescale(&mut self) {
        let reference = self.initial_width.min(self.initial_height);
        if reference > f64::EPSILON {
            self.scale = self.width.min(self.height) / reference;
        }
    }

    /// Shallow-merge a patch into these options.
    pub fn apply(&mut self, patch: OptionsPatch) {
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(width) = patch.width {
            self.width = width;
        }
        if let Some(height) = patch.height {
            self.height = height;
        }
        if let Some(scale) = patch.scale {
            self.scale = scale;
        }
        if let Some(opacity) = patch.opacity {
            self.opacity = Some(opacity);
        }
    }

    pub fn opacity_or_default(&self) -> f64 {
        self.opacity.unwrap_or(1.0)
    }
}

/// Partial update for [`DrawOptions`]; `None` fields keep their current value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OptionsPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub scale: Option<f64>,
    pub opacity: Option<f64>,
}

impl OptionsPatch {
    /// True when the patch touches anything that affects layout or rasterization.
    pub fn changes_geometry(&self) -> bool {
        self.width.is_some() || self.height.is_some() || self.scale.is_some()
    }
}

/// Uniform resize shared by every entity: the two deltas are averaged and the
/// result applied to both axes. Returns false, leaving the options untouched,
/// when either candidate dimension would fall below `min_dimension`.
pub(crate) fn resize_uniform(
    options: &mut DrawOptions,
    dx: f64,
    dy: f64,
    min_dimension: f64,
) -> bool {
    let movement = (dx + dy) / 2.0;
    let width = options.width + movement;
    let height = options.height + movement;
    if width < min_dimension || height < min_dimension {
        return false;
    }
    options.width = width;
    options.height = height;
    options.rescale();
    true
}

/// Proportionally remap options from one bounding box into another.
pub(crate) fn remap_options(options: &mut DrawOptions, old: Rect, new: Rect) {
    if old.width() <= f64::EPSILON || old.height() <= f64::EPSILON {
        return;
    }
    let sx = new.width() / old.width();
    let sy = new.height() / old.height();
    options.x = new.x0 + (options.x - old.x0) * sx;
    options.y = new.y0 + (options.y - old.y0) * sy;
    options.width *= sx;
    options.height *= sy;
    options.rescale();
}

/// Discriminant for the closed set of drawable kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Rect,
    Circle,
    Text,
    Image,
    Spline,
    Selection,
    Layer,
}

impl EntityKind {
    pub fn name(self) -> &'static str {
        match self {
            EntityKind::Rect => "Rect",
            EntityKind::Circle => "Circle",
            EntityKind::Text => "Text",
            EntityKind::Image => "Image",
            EntityKind::Spline => "Spline",
            EntityKind::Selection => "Selection",
            EntityKind::Layer => "Layer",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Rect" => Some(EntityKind::Rect),
            "Circle" => Some(EntityKind::Circle),
            "Text" => Some(EntityKind::Text),
            "Image" => Some(EntityKind::Image),
            "Spline" => Some(EntityKind::Spline),
            "Selection" => Some(EntityKind::Selection),
            "Layer" => Some(EntityKind::Layer),
            _ => None,
        }
    }
}

/// Enum wrapper over the closed set of drawable entities.
#[derive(Debug, Clone)]
pub enum Entity {
    Rect(RectEntity),
    Circle(CircleEntity),
    Text(TextEntity),
    Image(ImageEntity),
    Spline(SplineEntity),
    Selection(SelectionEntity),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Rect(_) => EntityKind::Rect,
            Entity::Circle(_) => EntityKind::Circle,
            Entity::Text(_) => EntityKind::Text,
            Entity::Image(_) => EntityKind::Image,
            Entity::Spline(_) => EntityKind::Spline,
            Entity::Selection(_) => EntityKind::Selection,
        }
    }

    pub fn options(&self) -> &DrawOptions {
        match self {
            Entity::Rect(e) => &e.options,
            Entity::Circle(e) => &e.options,
            Entity::Text(e) => &e.options,
            Entity::Image(e) => &e.options,
            Entity::Spline(e) => &e.options,
            Entity::Selection(e) => &e.options,
        }
    }

    pub fn options_mut(&mut self) -> &mut DrawOptions {
        match self {
            Entity::Rect(e) => &mut e.options,
            Entity::Circle(e) => &mut e.options,
            Entity::Text(e) => &mut e.options,
            Entity::Image(e) => &mut e.options,
            Entity::Spline(e) => &mut e.options,
            Entity::Selection(e) => &mut e.options,
        }
    }

    pub fn min_dimension(&self) -> f64 {
        match self {
            Entity::Rect(e) => e.min_dimension,
            Entity::Circle(e) => e.min_dimension,
            Entity::Text(e) => e.min_dimension,
            Entity::Image(e) => e.min_dimension,
            Entity::Spline(e) => e.min_dimension,
            Entity::Selection(e) => e.min_dimension,
        }
    }

    pub fn bounds(&self) -> Rect {
        self.options().bounds()
    }

    pub fn corners(&self) -> [Point; 4] {
        self.options().corners()
    }

    /// Shallow-merge an options patch. Geometry changes on a text entity
    /// invalidate its wrap and snapshot caches.
    pub fn set_options(&mut self, patch: OptionsPatch) {
        match self {
            Entity::Text(t) => t.set_options(patch),
            other => other.options_mut().apply(patch),
        }
    }

    pub fn move_by(&mut self, dx: f64, dy: f64) {
        match self {
            Entity::Spline(s) => s.move_by(dx, dy),
            other => other.options_mut().translate(dx, dy),
        }
    }

    /// Uniform resize; returns false and leaves the entity untouched when the
    /// candidate size violates the minimum-dimension floor.
    pub fn resize(&mut self, dx: f64, dy: f64) -> bool {
        match self {
            Entity::Text(t) => t.resize(dx, dy),
            Entity::Spline(s) => s.resize(dx, dy),
            other => {
                let min = other.min_dimension();
                resize_uniform(other.options_mut(), dx, dy, min)
            }
        }
    }

    pub fn contains(&self, point: Point, padding: f64) -> bool {
        match self {
            Entity::Circle(c) => c.contains(point, padding),
            other => other.options().contains(point, padding),
        }
    }

    /// Proportionally remap this entity from a layer's old bounds into its new
    /// bounds, preserving relative layout within the group.
    pub fn scale_within(&mut self, old: Rect, new: Rect) {
        match self {
            Entity::Spline(s) => s.scale_within(old, new),
            Entity::Text(t) => t.scale_within(old, new),
            other => remap_options(other.options_mut(), old, new),
        }
    }
}
