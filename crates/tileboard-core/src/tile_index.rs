//! Spatial tile index over the infinite canvas.
//!
//! The plane is partitioned into fixed-size square tiles; each tile buckets
//! the ids of the layers whose bounds span it. Insert, remove, relocate, and
//! spatial queries all cost on the order of the tiles touched, not the total
//! scene size.

use crate::layer::LayerId;
use kurbo::Rect;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Tile edge length in canvas units.
pub const TILE_SIZE: f64 = 2048.0;

/// Grid coordinate of one tile, `floor(coord / TILE_SIZE)` per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileKey {
    pub x: i64,
    pub y: i64,
}

impl TileKey {
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            x: (x / TILE_SIZE).floor() as i64,
            y: (y / TILE_SIZE).floor() as i64,
        }
    }

    /// Canvas-space rect covered by this tile.
    pub fn bounds(self) -> Rect {
        let x0 = self.x as f64 * TILE_SIZE;
        let y0 = self.y as f64 * TILE_SIZE;
        Rect::new(x0, y0, x0 + TILE_SIZE, y0 + TILE_SIZE)
    }
}

impl fmt::Display for TileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// Every tile the rect spans, over the inclusive floor range of both axes.
pub fn tile_keys(bounds: Rect) -> Vec<TileKey> {
    let min = TileKey::at(bounds.x0, bounds.y0);
    let max = TileKey::at(bounds.x1, bounds.y1);
    let mut keys = Vec::with_capacity(((max.x - min.x + 1) * (max.y - min.y + 1)) as usize);
    for x in min.x..=max.x {
        for y in min.y..=max.y {
            keys.push(TileKey { x, y });
        }
    }
    keys
}

/// Bidirectional layer-to-tile mapping.
///
/// Invariant: `tiles` and `layer_positions` stay mutually consistent after
/// every operation. Empty tile sets are dropped.
#[derive(Debug, Default)]
pub struct TileIndex {
    tiles: HashMap<TileKey, HashSet<LayerId>>,
    layer_positions: HashMap<LayerId, Vec<TileKey>>,
}

impl TileIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: LayerId, bounds: Rect) {
        let keys = tile_keys(bounds);
        for &key in &keys {
            self.tiles.entry(key).or_default().insert(id);
        }
        self.layer_positions.insert(id, keys);
    }

    /// Silent no-op when the id is untracked.
    pub fn remove(&mut self, id: LayerId) {
        let Some(keys) = self.layer_positions.remove(&id) else {
            return;
        };
        for key in keys {
            if let Some(ids) = self.tiles.get_mut(&key) {
                ids.remove(&id);
                if ids.is_empty() {
                    self.tiles.remove(&key);
                }
            }
        }
    }

    /// Full remove-then-reinsert against the recomputed bounds, so multi-tile
    /// spans and boundary crossings come out right.
    pub fn relocate(&mut self, id: LayerId, new_bounds: Rect) {
        if !self.layer_positions.contains_key(&id) {
            return;
        }
        self.remove(id);
        self.insert(id, new_bounds);
    }

    pub fn contains(&self, id: LayerId) -> bool {
        self.layer_positions.contains_key(&id)
    }

    /// Tile keys currently recorded for a layer.
    pub fn positions_of(&self, id: LayerId) -> &[TileKey] {
        self.layer_positions
            .get(&id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn layers_in_tile(&self, key: TileKey) -> impl Iterator<Item = LayerId> + '_ {
        self.tiles.get(&key).into_iter().flatten().copied()
    }

    /// Union of layer ids over every tile the rect overlaps, ascending.
    pub fn layers_in_bounds(&self, bounds: Rect) -> Vec<LayerId> {
        let mut ids: Vec<LayerId> = tile_keys(bounds)
            .into_iter()
            .filter_map(|key| self.tiles.get(&key))
            .flatten()
            .copied()
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    #[cfg(test)]
    fn is_consistent(&self) -> bool {
        for (id, keys) in &self.layer_positions {
            for key in keys {
                if !self.tiles.get(key).is_some_and(|ids| ids.contains(id)) {
                    return false;
                }
            }
        }
        for (key, ids) in &self.tiles {
            if ids.is_empty() {
                return false;
            }
            for id in ids {
                if !self
                    .layer_positions
                    .get(id)
                    .is_some_and(|keys| keys.contains(key))
                {
                    return false;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_key_display() {
        assert_eq!(TileKey { x: -1, y: 2 }.to_string(), "-1,2");
    }

    #[test]
    fn test_tile_key_floors_negative_coordinates() {
        assert_eq!(TileKey::at(-1.0, -2049.0), TileKey { x: -1, y: -2 });
        assert_eq!(TileKey::at(0.0, 0.0), TileKey { x: 0, y: 0 });
    }

    #[test]
    fn test_tile_keys_multi_tile_span() {
        let keys = tile_keys(Rect::new(2000.0, 0.0, 2100.0, 100.0));
        assert_eq!(keys, vec![TileKey { x: 0, y: 0 }, TileKey { x: 1, y: 0 }]);

        let keys = tile_keys(Rect::new(-100.0, -100.0, 100.0, 100.0));
        assert_eq!(keys.len(), 4);
    }

    #[test]
    fn test_move_across_tile_boundary() {
        let mut index = TileIndex::new();
        index.insert(1, Rect::new(0.0, 0.0, 200.0, 200.0));
        assert_eq!(index.positions_of(1), &[TileKey { x: 0, y: 0 }]);

        index.relocate(1, Rect::new(2100.0, 0.0, 2300.0, 200.0));
        assert_eq!(index.positions_of(1), &[TileKey { x: 1, y: 0 }]);
        assert_eq!(index.layers_in_tile(TileKey { x: 0, y: 0 }).count(), 0);
        assert!(index.is_consistent());
    }

    #[test]
    fn test_mutual_consistency_after_operation_sequence() {
        let mut index = TileIndex::new();
        index.insert(1, Rect::new(0.0, 0.0, 3000.0, 100.0));
        index.insert(2, Rect::new(1000.0, 1000.0, 1200.0, 1200.0));
        index.insert(3, Rect::new(-500.0, -500.0, 500.0, 500.0));
        assert!(index.is_consistent());

        index.relocate(2, Rect::new(5000.0, 5000.0, 5100.0, 5100.0));
        assert!(index.is_consistent());

        index.remove(1);
        assert!(index.is_consistent());
        assert!(!index.contains(1));

        index.remove(1); // untracked: no-op
        assert!(index.is_consistent());
    }

    #[test]
    fn test_relocate_untracked_is_noop() {
        let mut index = TileIndex::new();
        index.relocate(9, Rect::new(0.0, 0.0, 10.0, 10.0));
        assert!(!index.contains(9));
    }

    #[test]
    fn test_layers_in_bounds_unions_tiles() {
        let mut index = TileIndex::new();
        index.insert(1, Rect::new(0.0, 0.0, 100.0, 100.0));
        index.insert(2, Rect::new(2100.0, 0.0, 2200.0, 100.0));
        index.insert(3, Rect::new(0.0, 9000.0, 100.0, 9100.0));

        let ids = index.layers_in_bounds(Rect::new(0.0, 0.0, 2500.0, 500.0));
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_empty_tiles_are_dropped() {
        let mut index = TileIndex::new();
        index.insert(1, Rect::new(0.0, 0.0, 100.0, 100.0));
        index.remove(1);
        assert!(index.tiles.is_empty());
        assert!(index.layer_positions.is_empty());
    }
}
