//! The drawing surface boundary.
//!
//! A [`DrawSurface`] owns an actual drawing target (a GPU scene, a canvas, a
//! command recorder) but no scene state; the render manager owns the scene and
//! drives the surface through these primitives.

use kurbo::{Affine, BezPath, Point, Rect, Size};
use peniko::Color;
use thiserror::Error;
use tileboard_core::entities::{
    Bitmap, FontStyle, ImageFilters, Shadow, TextAlign, TextDecoration, TextMeasure,
};

/// Errors surfacing from the drawing backend.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("text rasterization failed: {reason}")]
    RasterFailed { reason: String },
    #[error("bitmap of {width}x{height} exceeds the surface limit")]
    BitmapTooLarge { width: u32, height: u32 },
}

/// Style parameters for text rasterization.
#[derive(Debug, Clone)]
pub struct TextStyle {
    pub font: String,
    pub font_size: f64,
    pub font_style: FontStyle,
    pub align: TextAlign,
    pub decoration: TextDecoration,
    pub color: Color,
}

/// Primitive drawing operations over a 2D surface.
///
/// All geometry is in canvas space; the active transform maps it to device
/// space. Implementations also measure text so word-wrap can match the
/// backend's real metrics.
pub trait DrawSurface: TextMeasure {
    fn fill_rect(&mut self, rect: Rect, color: Color, opacity: f64, shadow: Option<Shadow>);
    fn stroke_rect(&mut self, rect: Rect, color: Color, stroke_width: f64);
    fn fill_circle(&mut self, bounds: Rect, color: Color, opacity: f64);
    fn draw_bitmap(&mut self, bitmap: &Bitmap, dest: Rect, filters: Option<ImageFilters>);
    fn draw_path(&mut self, path: &BezPath, color: Color, stroke_width: f64);
    /// A single glyph rotated to follow a curve's tangent.
    fn draw_glyph(&mut self, glyph: char, position: Point, angle: f64, style: &TextStyle);
    /// Rasterize wrapped lines into a reusable snapshot bitmap.
    fn rasterize_text(
        &mut self,
        lines: &[String],
        style: &TextStyle,
        bounds: Rect,
    ) -> Result<Bitmap, SurfaceError>;
    /// Background grid over the given canvas-space rect.
    fn draw_background(&mut self, rect: Rect);
    fn clear_rect(&mut self, rect: Rect);

    fn transform(&self) -> Affine;
    fn set_transform(&mut self, transform: Affine);
    /// Device-space viewport size.
    fn viewport(&self) -> Size;
}
