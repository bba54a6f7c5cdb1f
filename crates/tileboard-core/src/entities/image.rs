//! Image entity wrapping a decoded bitmap.

use super::DrawOptions;
use std::sync::Arc;

/// Default minimum dimension for image entities, in canvas units.
pub const IMAGE_MIN_DIMENSION: f64 = 20.0;

/// Decoded RGBA8 bitmap, cheaply cloneable via shared pixel storage.
///
/// Decoding happens outside the engine; entity construction receives pixels
/// that are already resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    pub pixels: Arc<Vec<u8>>,
}

impl Bitmap {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            pixels: Arc::new(pixels),
        }
    }

    /// Single-color bitmap, handy for tests and placeholder snapshots.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let mut pixels = Vec::with_capacity((width as usize) * (height as usize) * 4);
        for _ in 0..(width as usize) * (height as usize) {
            pixels.extend_from_slice(&rgba);
        }
        Self::new(width, height, pixels)
    }
}

/// Filter parameters consumed by the renderer when blitting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageFilters {
    pub brightness: f64,
    pub contrast: f64,
    pub saturation: f64,
    pub grayscale: f64,
    pub blur: f64,
}

impl Default for ImageFilters {
    fn default() -> Self {
        Self {
            brightness: 1.0,
            contrast: 1.0,
            saturation: 1.0,
            grayscale: 0.0,
            blur: 0.0,
        }
    }
}

/// A placed raster image.
#[derive(Debug, Clone)]
pub struct ImageEntity {
    pub options: DrawOptions,
    pub min_dimension: f64,
    bitmap: Bitmap,
    filters: Option<ImageFilters>,
    /// Cached filtered raster; dropped when the filter set changes.
    snapshot: Option<Bitmap>,
}

impl ImageEntity {
    pub fn new(options: DrawOptions, bitmap: Bitmap) -> Self {
        Self {
            options,
            min_dimension: IMAGE_MIN_DIMENSION,
            bitmap,
            filters: None,
            snapshot: None,
        }
    }

    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }

    pub fn filters(&self) -> Option<&ImageFilters> {
        self.filters.as_ref()
    }

    pub fn set_filters(&mut self, filters: Option<ImageFilters>) {
        self.filters = filters;
        self.snapshot = None;
    }

    pub fn snapshot(&self) -> Option<&Bitmap> {
        self.snapshot.as_ref()
    }

    pub fn set_snapshot(&mut self, snapshot: Bitmap) {
        self.snapshot = Some(snapshot);
    }
}
