//! Text entity with cached word-wrap and raster snapshot.

use super::{Bitmap, DrawOptions, OptionsPatch, Rgba, remap_options, resize_uniform};
use kurbo::Rect;
use serde::{Deserialize, Serialize};

/// Default minimum dimension for text entities, in canvas units.
pub const TEXT_MIN_DIMENSION: f64 = 16.0;

/// Horizontal alignment of wrapped lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Decoration applied to every glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextDecoration {
    #[default]
    None,
    Underline,
    LineThrough,
}

/// Font style variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
    Bold,
}

/// Measures rendered text width; implemented by the drawing backend.
pub trait TextMeasure {
    fn text_width(&self, text: &str, font: &str, size: f64) -> f64;
}

/// Approximate metrics for headless use: average glyph width of half the font
/// size. Good enough for tests and for backends without a shaping engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicMeasure;

impl TextMeasure for HeuristicMeasure {
    fn text_width(&self, text: &str, _font: &str, size: f64) -> f64 {
        text.chars().count() as f64 * size * 0.5
    }
}

/// A block of word-wrapped text.
///
/// Caching contract: `prepared_text` (wrapped lines) and `snapshot` (the
/// rasterized image) are dropped whenever the text content, font, size, style,
/// alignment, decoration, or geometry change. Pure moves keep both caches.
#[derive(Debug, Clone)]
pub struct TextEntity {
    pub options: DrawOptions,
    pub min_dimension: f64,
    pub color: Rgba,
    text: String,
    align: TextAlign,
    decoration: TextDecoration,
    font: String,
    font_size: f64,
    font_style: FontStyle,
    prepared_text: Option<Vec<String>>,
    snapshot: Option<Bitmap>,
}

impl TextEntity {
    pub const DEFAULT_FONT: &'static str = "sans-serif";
    pub const DEFAULT_FONT_SIZE: f64 = 20.0;

    pub fn new(options: DrawOptions, text: String) -> Self {
        Self {
            options,
            min_dimension: TEXT_MIN_DIMENSION,
            color: Rgba::black(),
            text,
            align: TextAlign::default(),
            decoration: TextDecoration::default(),
            font: Self::DEFAULT_FONT.to_string(),
            font_size: Self::DEFAULT_FONT_SIZE,
            font_style: FontStyle::default(),
            prepared_text: None,
            snapshot: None,
        }
    }

    /// Rebuild a text entity from persisted fields.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        options: DrawOptions,
        min_dimension: f64,
        color: Rgba,
        text: String,
        align: TextAlign,
        decoration: TextDecoration,
        font: String,
        font_size: f64,
        font_style: FontStyle,
    ) -> Self {
        Self {
            options,
            min_dimension,
            color,
            text,
            align,
            decoration,
            font,
            font_size,
            font_style,
            prepared_text: None,
            snapshot: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn align(&self) -> TextAlign {
        self.align
    }

    pub fn decoration(&self) -> TextDecoration {
        self.decoration
    }

    pub fn font(&self) -> &str {
        &self.font
    }

    pub fn font_size(&self) -> f64 {
        self.font_size
    }

    pub fn font_style(&self) -> FontStyle {
        self.font_style
    }

    pub fn set_text(&mut self, text: String) {
        self.text = text;
        self.invalidate_caches();
    }

    pub fn set_align(&mut self, align: TextAlign) {
        self.align = align;
        self.invalidate_caches();
    }

    pub fn set_decoration(&mut self, decoration: TextDecoration) {
        self.decoration = decoration;
        self.invalidate_caches();
    }

    pub fn set_font(&mut self, font: String) {
        self.font = font;
        self.invalidate_caches();
    }

    pub fn set_font_size(&mut self, font_size: f64) {
        self.font_size = font_size;
        self.invalidate_caches();
    }

    pub fn set_font_style(&mut self, font_style: FontStyle) {
        self.font_style = font_style;
        self.invalidate_caches();
    }

    /// Shallow-merge an options patch; width/height/scale changes invalidate
    /// the caches, position-only changes do not.
    pub fn set_options(&mut self, patch: OptionsPatch) {
        let geometry_change = patch.changes_geometry();
        self.options.apply(patch);
        if geometry_change {
            self.invalidate_caches();
        }
    }

    /// Uniform resize; a successful resize invalidates the caches.
    pub fn resize(&mut self, dx: f64, dy: f64) -> bool {
        if resize_uniform(&mut self.options, dx, dy, self.min_dimension) {
            self.invalidate_caches();
            true
        } else {
            false
        }
    }

    pub(crate) fn scale_within(&mut self, old: Rect, new: Rect) {
        remap_options(&mut self.options, old, new);
        self.invalidate_caches();
    }

    /// Word-wrapped lines fitting the current width, computed lazily.
    pub fn prepared_lines(&mut self, measure: &dyn TextMeasure) -> &[String] {
        if self.prepared_text.is_none() {
            self.prepared_text = Some(self.wrap(measure));
        }
        self.prepared_text.as_deref().unwrap_or_default()
    }

    fn wrap(&self, measure: &dyn TextMeasure) -> Vec<String> {
        let max_width = self.options.width;
        let mut lines = Vec::new();
        let mut current = String::new();
        for word in self.text.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            // A single word wider than the box still gets its own line.
            if current.is_empty()
                || measure.text_width(&candidate, &self.font, self.font_size) <= max_width
            {
                current = candidate;
            } else {
                lines.push(std::mem::take(&mut current));
                current = word.to_string();
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }

    pub fn snapshot(&self) -> Option<&Bitmap> {
        self.snapshot.as_ref()
    }

    pub fn set_snapshot(&mut self, snapshot: Bitmap) {
        self.snapshot = Some(snapshot);
    }

    pub fn invalidate_caches(&mut self) {
        self.prepared_text = None;
        self.snapshot = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TextEntity {
        TextEntity::new(
            DrawOptions::new(0.0, 0.0, 100.0, 60.0, 1.0),
            "the quick brown fox jumps".to_string(),
        )
    }

    #[test]
    fn test_wrap_fits_width() {
        let mut text = sample();
        // 100 wide at size 20 fits 10 heuristic characters per line.
        let lines = text.prepared_lines(&HeuristicMeasure);
        assert!(!lines.is_empty());
        for line in lines {
            assert!(line.chars().count() <= 10, "line too long: {line:?}");
        }
    }

    #[test]
    fn test_wrap_keeps_oversized_word() {
        let mut text = TextEntity::new(
            DrawOptions::new(0.0, 0.0, 40.0, 40.0, 1.0),
            "incomprehensibilities no".to_string(),
        );
        let lines = text.prepared_lines(&HeuristicMeasure).to_vec();
        assert_eq!(lines[0], "incomprehensibilities");
        assert_eq!(lines[1], "no");
    }

    #[test]
    fn test_style_setters_invalidate_snapshot() {
        let cases: Vec<Box<dyn Fn(&mut TextEntity)>> = vec![
            Box::new(|t| t.set_text("changed".into())),
            Box::new(|t| t.set_font_size(32.0)),
            Box::new(|t| t.set_font_style(FontStyle::Italic)),
            Box::new(|t| t.set_align(TextAlign::Center)),
            Box::new(|t| t.set_decoration(TextDecoration::Underline)),
            Box::new(|t| t.set_font("serif".into())),
        ];
        for mutate in cases {
            let mut text = sample();
            text.set_snapshot(Bitmap::solid(4, 4, [0, 0, 0, 255]));
            mutate(&mut text);
            assert!(text.snapshot().is_none());
        }
    }

    #[test]
    fn test_move_keeps_snapshot() {
        let mut text = sample();
        text.set_snapshot(Bitmap::solid(4, 4, [0, 0, 0, 255]));
        text.set_options(OptionsPatch {
            x: Some(50.0),
            y: Some(-20.0),
            ..OptionsPatch::default()
        });
        assert!(text.snapshot().is_some());
    }

    #[test]
    fn test_geometry_patch_invalidates_snapshot() {
        let mut text = sample();
        text.set_snapshot(Bitmap::solid(4, 4, [0, 0, 0, 255]));
        text.set_options(OptionsPatch {
            width: Some(220.0),
            ..OptionsPatch::default()
        });
        assert!(text.snapshot().is_none());
    }

    #[test]
    fn test_resize_floor_preserves_snapshot() {
        let mut text = sample();
        text.set_snapshot(Bitmap::solid(4, 4, [0, 0, 0, 255]));
        // Candidate below the floor: dropped whole, caches untouched.
        assert!(!text.resize(-95.0, -95.0));
        assert!(text.snapshot().is_some());
        assert!(text.resize(10.0, 10.0));
        assert!(text.snapshot().is_none());
    }
}
