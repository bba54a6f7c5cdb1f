//! Tileboard Core Library
//!
//! Platform-agnostic scene graph, spatial indexing, and camera math for the
//! Tileboard infinite-canvas whiteboard engine.

pub mod camera;
pub mod document;
pub mod entities;
pub mod geometry;
pub mod layer;
pub mod tile_index;

pub use camera::Camera;
pub use document::{ChildDocument, LayerDocument, deserialize_layer, serialize_layer};
pub use entities::{DrawOptions, Entity, EntityKind, OptionsPatch, Rgba};
pub use layer::{Layer, LayerId, ResizeDirection};
pub use tile_index::{TILE_SIZE, TileIndex, TileKey, tile_keys};
