//! Command-recording surface, the reference backend used by tests.

use crate::surface::{DrawSurface, SurfaceError, TextStyle};
use kurbo::{Affine, BezPath, Point, Rect, Size};
use peniko::Color;
use tileboard_core::entities::{
    Bitmap, HeuristicMeasure, ImageFilters, Shadow, TextMeasure,
};

/// Upper bound on snapshot dimensions, matching what a GPU texture allows.
const MAX_SNAPSHOT_DIM: u32 = 8192;

/// One recorded drawing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect {
        rect: Rect,
        color: Color,
        opacity: f64,
        shadow: Option<Shadow>,
    },
    StrokeRect {
        rect: Rect,
        color: Color,
        stroke_width: f64,
    },
    FillCircle {
        bounds: Rect,
        color: Color,
        opacity: f64,
    },
    Bitmap {
        dest: Rect,
        filters: Option<ImageFilters>,
    },
    Path {
        elements: usize,
        color: Color,
        stroke_width: f64,
    },
    Glyph {
        glyph: char,
        position: Point,
        angle: f64,
    },
    RasterizeText {
        lines: Vec<String>,
        bounds: Rect,
    },
    Background {
        rect: Rect,
    },
    Clear {
        rect: Rect,
    },
}

/// Records every primitive call instead of drawing. Text metrics are the
/// heuristic ones, so wrap results are deterministic.
#[derive(Debug)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
    transform: Affine,
    viewport: Size,
    measure: HeuristicMeasure,
}

impl RecordingSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            commands: Vec::new(),
            transform: Affine::IDENTITY,
            viewport: Size::new(width, height),
            measure: HeuristicMeasure,
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }
}

impl TextMeasure for RecordingSurface {
    fn text_width(&self, text: &str, font: &str, size: f64) -> f64 {
        self.measure.text_width(text, font, size)
    }
}

impl DrawSurface for RecordingSurface {
    fn fill_rect(&mut self, rect: Rect, color: Color, opacity: f64, shadow: Option<Shadow>) {
        self.commands.push(DrawCommand::FillRect {
            rect,
            color,
            opacity,
            shadow,
        });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, stroke_width: f64) {
        self.commands.push(DrawCommand::StrokeRect {
            rect,
            color,
            stroke_width,
        });
    }

    fn fill_circle(&mut self, bounds: Rect, color: Color, opacity: f64) {
        self.commands.push(DrawCommand::FillCircle {
            bounds,
            color,
            opacity,
        });
    }

    fn draw_bitmap(&mut self, _bitmap: &Bitmap, dest: Rect, filters: Option<ImageFilters>) {
        self.commands.push(DrawCommand::Bitmap { dest, filters });
    }

    fn draw_path(&mut self, path: &BezPath, color: Color, stroke_width: f64) {
        self.commands.push(DrawCommand::Path {
            elements: path.elements().len(),
            color,
            stroke_width,
        });
    }

    fn draw_glyph(&mut self, glyph: char, position: Point, angle: f64, _style: &TextStyle) {
        self.commands.push(DrawCommand::Glyph {
            glyph,
            position,
            angle,
        });
    }

    fn rasterize_text(
        &mut self,
        lines: &[String],
        style: &TextStyle,
        bounds: Rect,
    ) -> Result<Bitmap, SurfaceError> {
        let width = bounds.width().max(1.0) as u32;
        let height = ((lines.len().max(1) as f64) * style.font_size * 1.2).ceil() as u32;
        if width > MAX_SNAPSHOT_DIM || height > MAX_SNAPSHOT_DIM {
            return Err(SurfaceError::BitmapTooLarge { width, height });
        }
        self.commands.push(DrawCommand::RasterizeText {
            lines: lines.to_vec(),
            bounds,
        });
        Ok(Bitmap::solid(width, height, [0, 0, 0, 0]))
    }

    fn draw_background(&mut self, rect: Rect) {
        self.commands.push(DrawCommand::Background { rect });
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.commands.push(DrawCommand::Clear { rect });
    }

    fn transform(&self) -> Affine {
        self.transform
    }

    fn set_transform(&mut self, transform: Affine) {
        self.transform = transform;
    }

    fn viewport(&self) -> Size {
        self.viewport
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_call_order() {
        let mut surface = RecordingSurface::new(100.0, 100.0);
        surface.clear_rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        surface.fill_rect(Rect::new(0.0, 0.0, 5.0, 5.0), Color::BLACK, 1.0, None);

        assert_eq!(surface.commands().len(), 2);
        assert!(matches!(surface.commands()[0], DrawCommand::Clear { .. }));
        assert!(matches!(surface.commands()[1], DrawCommand::FillRect { .. }));
    }

    #[test]
    fn test_rasterize_rejects_oversized_snapshots() {
        let mut surface = RecordingSurface::new(100.0, 100.0);
        let style = TextStyle {
            font: "sans-serif".to_string(),
            font_size: 20.0,
            font_style: Default::default(),
            align: Default::default(),
            decoration: Default::default(),
            color: Color::BLACK,
        };
        let result = surface.rasterize_text(
            &["hi".to_string()],
            &style,
            Rect::new(0.0, 0.0, 100_000.0, 20.0),
        );
        assert!(matches!(result, Err(SurfaceError::BitmapTooLarge { .. })));
    }
}
