//! Drawing surface abstraction and tile-scoped render manager.
//!
//! [`surface::DrawSurface`] is the boundary to an actual drawing backend;
//! [`manager::RenderManager`] owns the scene and decides what to repaint.

pub mod manager;
pub mod pair;
pub mod recording;
pub mod surface;

pub use manager::{HIT_PADDING, RenderEvent, RenderManager};
pub use pair::SurfacePair;
pub use recording::{DrawCommand, RecordingSurface};
pub use surface::{DrawSurface, SurfaceError, TextStyle};
