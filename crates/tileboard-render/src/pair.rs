//! Dual-surface facade keeping a main surface and a background-grid surface
//! on the same transform.

use crate::surface::{DrawSurface, SurfaceError, TextStyle};
use kurbo::{Affine, BezPath, Point, Rect, Size};
use peniko::Color;
use tileboard_core::entities::{Bitmap, ImageFilters, Shadow, TextMeasure};

/// Forwards transform mutations to both surfaces, background drawing to the
/// grid surface, and everything else to the main surface. The grid lives on
/// its own surface so entity redraws never have to repaint it, but the two
/// must pan and zoom in lockstep.
#[derive(Debug)]
pub struct SurfacePair<M, G> {
    main: M,
    grid: G,
}

impl<M: DrawSurface, G: DrawSurface> SurfacePair<M, G> {
    pub fn new(main: M, grid: G) -> Self {
        Self { main, grid }
    }

    pub fn main(&self) -> &M {
        &self.main
    }

    pub fn grid(&self) -> &G {
        &self.grid
    }

    pub fn into_parts(self) -> (M, G) {
        (self.main, self.grid)
    }
}

impl<M: DrawSurface, G: DrawSurface> TextMeasure for SurfacePair<M, G> {
    fn text_width(&self, text: &str, font: &str, size: f64) -> f64 {
        self.main.text_width(text, font, size)
    }
}

impl<M: DrawSurface, G: DrawSurface> DrawSurface for SurfacePair<M, G> {
    fn fill_rect(&mut self, rect: Rect, color: Color, opacity: f64, shadow: Option<Shadow>) {
        self.main.fill_rect(rect, color, opacity, shadow);
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, stroke_width: f64) {
        self.main.stroke_rect(rect, color, stroke_width);
    }

    fn fill_circle(&mut self, bounds: Rect, color: Color, opacity: f64) {
        self.main.fill_circle(bounds, color, opacity);
    }

    fn draw_bitmap(&mut self, bitmap: &Bitmap, dest: Rect, filters: Option<ImageFilters>) {
        self.main.draw_bitmap(bitmap, dest, filters);
    }

    fn draw_path(&mut self, path: &BezPath, color: Color, stroke_width: f64) {
        self.main.draw_path(path, color, stroke_width);
    }

    fn draw_glyph(&mut self, glyph: char, position: Point, angle: f64, style: &TextStyle) {
        self.main.draw_glyph(glyph, position, angle, style);
    }

    fn rasterize_text(
        &mut self,
        lines: &[String],
        style: &TextStyle,
        bounds: Rect,
    ) -> Result<Bitmap, SurfaceError> {
        self.main.rasterize_text(lines, style, bounds)
    }

    fn draw_background(&mut self, rect: Rect) {
        self.grid.draw_background(rect);
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.main.clear_rect(rect);
    }

    fn transform(&self) -> Affine {
        self.main.transform()
    }

    fn set_transform(&mut self, transform: Affine) {
        self.main.set_transform(transform);
        self.grid.set_transform(transform);
    }

    fn viewport(&self) -> Size {
        self.main.viewport()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{DrawCommand, RecordingSurface};
    use kurbo::Vec2;

    #[test]
    fn test_transform_reaches_both_surfaces() {
        let mut pair = SurfacePair::new(
            RecordingSurface::new(800.0, 600.0),
            RecordingSurface::new(800.0, 600.0),
        );
        let transform = Affine::translate(Vec2::new(5.0, 7.0)) * Affine::scale(1.5);
        pair.set_transform(transform);
        assert_eq!(pair.main().transform(), transform);
        assert_eq!(pair.grid().transform(), transform);
    }

    #[test]
    fn test_background_routes_to_grid_surface() {
        let mut pair = SurfacePair::new(
            RecordingSurface::new(800.0, 600.0),
            RecordingSurface::new(800.0, 600.0),
        );
        pair.draw_background(Rect::new(0.0, 0.0, 100.0, 100.0));
        pair.fill_rect(
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Color::BLACK,
            1.0,
            None,
        );

        assert!(pair.grid().commands().iter().any(|c| matches!(c, DrawCommand::Background { .. })));
        assert!(pair.main().commands().iter().all(|c| !matches!(c, DrawCommand::Background { .. })));
        assert!(pair.main().commands().iter().any(|c| matches!(c, DrawCommand::FillRect { .. })));
    }
}
