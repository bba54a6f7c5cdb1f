//! Tile-scoped render manager.
//!
//! Owns the layer registry, the spatial index, and the camera, and decides
//! between full and tile-scoped redraws. Every mutating operation dirties the
//! tiles the layer touched before AND after the mutation; `render_frame`,
//! called once per animation tick, then clears and repaints exactly the dirty
//! region. Redraws always read live registry state at paint time.

use crate::surface::{DrawSurface, TextStyle};
use kurbo::{BezPath, Point, Rect, Size};
use peniko::Color;
use std::collections::{BTreeMap, HashSet};
use std::time::Instant;
use tileboard_core::entities::{
    Entity, RectSubtype, SelectionEntity, SplineEntity, TextEntity,
};
use tileboard_core::geometry::{bounds_intersect, corners_of, place_along};
use tileboard_core::layer::{Layer, LayerId, ResizeDirection};
use tileboard_core::tile_index::{TileIndex, TileKey, tile_keys};
use tileboard_core::Camera;

/// Forgiving border for hit tests, in canvas units.
pub const HIT_PADDING: f64 = 2.0;

const SELECTION_STROKE_WIDTH: f64 = 1.0;
const SELECTION_HANDLE_SIZE: f64 = 8.0;

fn selection_color() -> Color {
    Color::from_rgb8(70, 130, 240)
}

/// Scene mutations a persistence subscriber may care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderEvent {
    LayerAdded(LayerId),
    LayerRemoved(LayerId),
    LayerChanged(LayerId),
}

/// What the next frame must repaint. A full redraw swallows any pending
/// tile set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum DirtyState {
    #[default]
    Clean,
    Tiles(HashSet<TileKey>),
    Full {
        except: Option<LayerId>,
    },
}

impl DirtyState {
    fn add_tiles(&mut self, keys: impl IntoIterator<Item = TileKey>) {
        match self {
            DirtyState::Full { .. } => {}
            DirtyState::Tiles(tiles) => tiles.extend(keys),
            DirtyState::Clean => *self = DirtyState::Tiles(keys.into_iter().collect()),
        }
    }

    fn request_full(&mut self, except: Option<LayerId>) {
        *self = DirtyState::Full { except };
    }
}

/// Layer registry plus redraw scheduling over a drawing surface.
pub struct RenderManager<S: DrawSurface> {
    surface: S,
    camera: Camera,
    layers: BTreeMap<LayerId, Layer>,
    index: TileIndex,
    next_id: LayerId,
    dirty: DirtyState,
    events: Vec<RenderEvent>,
}

impl<S: DrawSurface> RenderManager<S> {
    pub fn new(surface: S, camera: Camera) -> Self {
        Self {
            surface,
            camera,
            layers: BTreeMap::new(),
            index: TileIndex::new(),
            next_id: 1,
            dirty: DirtyState::Full { except: None },
            events: Vec::new(),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.get(&id)
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Insert a layer, assigning its identity. Later ids draw on top.
    pub fn add_layer(&mut self, mut layer: Layer) -> LayerId {
        let id = self.next_id;
        self.next_id += 1;
        layer.id = Some(id);

        let bounds = layer.bounds();
        self.index.insert(id, bounds);
        self.dirty.add_tiles(tile_keys(bounds));
        self.layers.insert(id, layer);
        self.events.push(RenderEvent::LayerAdded(id));
        log::debug!("added layer {id}");
        id
    }

    /// Remove a layer from the registry and index, or `None` when unknown.
    pub fn remove_layer(&mut self, id: LayerId) -> Option<Layer> {
        let layer = self.layers.remove(&id);
        match &layer {
            Some(layer) => {
                self.index.remove(id);
                self.dirty.add_tiles(tile_keys(layer.bounds()));
                self.events.push(RenderEvent::LayerRemoved(id));
                log::debug!("removed layer {id}");
            }
            None => log::warn!("remove_layer: unknown layer {id}"),
        }
        layer
    }

    pub fn move_layer(&mut self, id: LayerId, dx: f64, dy: f64) -> bool {
        let Some(layer) = self.layers.get_mut(&id) else {
            log::warn!("move_layer: unknown layer {id}");
            return false;
        };
        let before = tile_keys(layer.bounds());
        layer.move_by(dx, dy);
        let bounds = layer.bounds();

        self.index.relocate(id, bounds);
        self.dirty.add_tiles(before.into_iter().chain(tile_keys(bounds)));
        self.events.push(RenderEvent::LayerChanged(id));
        true
    }

    /// Directional resize; floor violations drop the delta and return false.
    pub fn resize_layer(
        &mut self,
        id: LayerId,
        dx: f64,
        dy: f64,
        direction: ResizeDirection,
    ) -> bool {
        let Some(layer) = self.layers.get_mut(&id) else {
            log::warn!("resize_layer: unknown layer {id}");
            return false;
        };
        let before = tile_keys(layer.bounds());
        if !layer.resize(dx, dy, direction) {
            return false;
        }
        let bounds = layer.bounds();

        self.index.relocate(id, bounds);
        self.dirty.add_tiles(before.into_iter().chain(tile_keys(bounds)));
        self.events.push(RenderEvent::LayerChanged(id));
        true
    }

    /// Set exact layer dimensions, used after interactive spline edits.
    pub fn set_layer_size(&mut self, id: LayerId, width: f64, height: f64) -> bool {
        let Some(layer) = self.layers.get_mut(&id) else {
            log::warn!("set_layer_size: unknown layer {id}");
            return false;
        };
        let before = tile_keys(layer.bounds());
        if !layer.set_size(width, height) {
            return false;
        }
        let bounds = layer.bounds();

        self.index.relocate(id, bounds);
        self.dirty.add_tiles(before.into_iter().chain(tile_keys(bounds)));
        self.events.push(RenderEvent::LayerChanged(id));
        true
    }

    pub fn set_layer_active(&mut self, id: LayerId, active: bool) -> bool {
        let Some(layer) = self.layers.get_mut(&id) else {
            log::warn!("set_layer_active: unknown layer {id}");
            return false;
        };
        layer.active = active;
        let keys = tile_keys(layer.bounds());
        self.dirty.add_tiles(keys);
        true
    }

    pub fn active_layer(&self) -> Option<&Layer> {
        self.layers.values().find(|layer| layer.active)
    }

    /// Topmost rendered layer under the point, or `None` — absence is a
    /// normal outcome, not an error.
    pub fn find_layer_by_coordinates(&self, point: Point) -> Option<&Layer> {
        let mut ids: Vec<LayerId> = self
            .index
            .layers_in_tile(TileKey::at(point.x, point.y))
            .collect();
        ids.sort_unstable_by(|a, b| b.cmp(a));
        for id in ids {
            if let Some(layer) = self.layers.get(&id) {
                if layer.should_render && layer.contains(point, HIT_PADDING) {
                    return Some(layer);
                }
            }
        }
        None
    }

    /// Every rendered layer under the point, topmost first.
    pub fn find_multiple_layers_by_coordinates(&self, point: Point) -> Vec<&Layer> {
        let mut ids: Vec<LayerId> = self
            .index
            .layers_in_tile(TileKey::at(point.x, point.y))
            .collect();
        ids.sort_unstable_by(|a, b| b.cmp(a));
        ids.into_iter()
            .filter_map(|id| self.layers.get(&id))
            .filter(|layer| layer.should_render && layer.contains(point, HIT_PADDING))
            .collect()
    }

    /// Wheel zoom about the device point; a successful step dirties the whole
    /// viewport.
    pub fn wheel_zoom(&mut self, device_anchor: Point, zoom_in: bool, now: Instant) -> bool {
        if !self.camera.wheel_zoom(device_anchor, zoom_in, now) {
            return false;
        }
        self.dirty.request_full(None);
        true
    }

    /// Toolbar zoom step, anchored on the active layer's center if one is
    /// selected, else the viewport center.
    pub fn step_zoom(&mut self, zoom_in: bool) -> bool {
        let anchor = match self.active_layer() {
            Some(layer) => layer.bounds().center(),
            None => {
                let viewport = self.surface.viewport();
                self.camera
                    .visible_rect(viewport.width, viewport.height)
                    .center()
            }
        };
        if !self.camera.step_zoom(anchor, zoom_in) {
            return false;
        }
        self.dirty.request_full(None);
        true
    }

    pub fn request_full_redraw(&mut self, except: Option<LayerId>) {
        self.dirty.request_full(except);
    }

    /// Hand pending scene events to a persistence subscriber.
    pub fn drain_events(&mut self) -> Vec<RenderEvent> {
        std::mem::take(&mut self.events)
    }

    /// Once-per-animation-tick entry point: repaint whatever is dirty.
    ///
    /// A settled zoom gesture forces one full high-quality redraw, regenerating
    /// cached snapshots.
    pub fn render_frame(&mut self, now: Instant) {
        if self.camera.poll_zoom_stopped(now) {
            self.draw_full(None, true);
            self.dirty = DirtyState::Clean;
            return;
        }
        match std::mem::take(&mut self.dirty) {
            DirtyState::Clean => {}
            DirtyState::Full { except } => self.draw_full(except, false),
            DirtyState::Tiles(tiles) => self.draw_tiles(&tiles),
        }
    }

    /// Synchronous full redraw, for callers that must see the result now.
    /// `except` suppresses one layer mid-interaction.
    pub fn render_full_now(&mut self, except: Option<LayerId>) {
        self.draw_full(except, false);
        self.dirty = DirtyState::Clean;
    }

    fn draw_full(&mut self, except: Option<LayerId>, force: bool) {
        self.surface.set_transform(self.camera.transform());
        let viewport = self.surface.viewport();
        let visible = self.camera.visible_rect(viewport.width, viewport.height);

        self.surface.clear_rect(visible);
        self.surface.draw_background(visible);

        for id in self.index.layers_in_bounds(visible) {
            if except == Some(id) {
                continue;
            }
            let Some(layer) = self.layers.get_mut(&id) else {
                continue;
            };
            if !bounds_intersect(layer.bounds(), visible) {
                continue;
            }
            draw_layer(&mut self.surface, layer, force);
        }
    }

    fn draw_tiles(&mut self, tiles: &HashSet<TileKey>) {
        self.surface.set_transform(self.camera.transform());
        for &tile in tiles {
            let rect = tile.bounds();
            self.surface.clear_rect(rect);
            self.surface.draw_background(rect);

            let mut ids: Vec<LayerId> = self.index.layers_in_tile(tile).collect();
            ids.sort_unstable();
            for id in ids {
                let Some(layer) = self.layers.get_mut(&id) else {
                    continue;
                };
                draw_layer(&mut self.surface, layer, false);
            }
        }
    }
}

/// Paint one layer's children in order, selection last and only when active.
fn draw_layer<S: DrawSurface>(surface: &mut S, layer: &mut Layer, force: bool) {
    if !layer.should_render {
        return;
    }
    for child in layer.children_mut() {
        match child {
            Entity::Rect(rect) => {
                surface.fill_rect(
                    rect.options.bounds(),
                    rect.fill.into(),
                    rect.options.opacity_or_default(),
                    rect.shadow,
                );
                if rect.subtype == RectSubtype::TextArea {
                    surface.stroke_rect(rect.options.bounds(), Color::BLACK, 1.0);
                }
            }
            Entity::Circle(circle) => surface.fill_circle(
                circle.options.bounds(),
                circle.fill.into(),
                circle.options.opacity_or_default(),
            ),
            Entity::Text(text) => draw_text(surface, text, force),
            Entity::Image(image) => {
                let bitmap = image.snapshot().unwrap_or_else(|| image.bitmap()).clone();
                surface.draw_bitmap(&bitmap, image.options.bounds(), image.filters().copied());
            }
            Entity::Spline(spline) => draw_spline(surface, spline),
            Entity::Selection(_) => {}
        }
    }
    if layer.active {
        for child in layer.children() {
            if let Entity::Selection(selection) = child {
                draw_selection(surface, selection);
            }
        }
    }
}

/// Draw a text entity from its snapshot, rasterizing first when the cache is
/// empty or a high-quality pass is forced.
fn draw_text<S: DrawSurface>(surface: &mut S, text: &mut TextEntity, force: bool) {
    if force || text.snapshot().is_none() {
        let lines = text.prepared_lines(&*surface).to_vec();
        let style = TextStyle {
            font: text.font().to_string(),
            font_size: text.font_size(),
            font_style: text.font_style(),
            align: text.align(),
            decoration: text.decoration(),
            color: text.color.into(),
        };
        match surface.rasterize_text(&lines, &style, text.options.bounds()) {
            Ok(snapshot) => text.set_snapshot(snapshot),
            Err(err) => {
                log::warn!("text rasterization failed: {err}");
                return;
            }
        }
    }
    if let Some(snapshot) = text.snapshot() {
        let snapshot = snapshot.clone();
        surface.draw_bitmap(&snapshot, text.options.bounds(), None);
    }
}

fn draw_spline<S: DrawSurface>(surface: &mut S, spline: &SplineEntity) {
    surface.draw_path(&spline.to_path(), spline.stroke.into(), spline.stroke_width);

    if let Some(text) = spline.text() {
        let glyphs: Vec<char> = text.chars().collect();
        let map = spline.arc_length_map();
        let style = TextStyle {
            font: spline.font.clone(),
            font_size: spline.font_size,
            font_style: Default::default(),
            align: Default::default(),
            decoration: Default::default(),
            color: spline.stroke.into(),
        };
        for (glyph, placement) in glyphs.iter().zip(place_along(&map, glyphs.len())) {
            surface.draw_glyph(*glyph, placement.position, placement.angle, &style);
        }
    }

    // Edit affordances while a control point is held.
    if spline.is_dragging() {
        let mut guides = BezPath::new();
        for (knot, handle) in spline.handle_pairs() {
            guides.move_to(knot);
            guides.line_to(handle);
        }
        surface.draw_path(&guides, selection_color(), 1.0);
        for &point in spline.control_points() {
            surface.fill_rect(
                Rect::from_center_size(point, handle_size()),
                selection_color(),
                1.0,
                None,
            );
        }
    }
}

fn draw_selection<S: DrawSurface>(surface: &mut S, selection: &SelectionEntity) {
    let bounds = selection.options.bounds();
    surface.stroke_rect(bounds, selection_color(), SELECTION_STROKE_WIDTH);
    for corner in corners_of(bounds) {
        surface.fill_rect(
            Rect::from_center_size(corner, handle_size()),
            selection_color(),
            1.0,
            None,
        );
    }
}

fn handle_size() -> Size {
    Size::new(SELECTION_HANDLE_SIZE, SELECTION_HANDLE_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{DrawCommand, RecordingSurface};
    use std::time::Duration;
    use tileboard_core::entities::{DrawOptions, RectEntity, Rgba, TextEntity};
    use tileboard_core::tile_index::TILE_SIZE;

    fn manager() -> RenderManager<RecordingSurface> {
        RenderManager::new(RecordingSurface::new(800.0, 600.0), Camera::new(1.0))
    }

    fn rect_layer(x: f64, y: f64, w: f64, h: f64) -> Layer {
        let mut layer = Layer::new(DrawOptions::new(x, y, w, h, 1.0), true);
        layer.add_child(Entity::Rect(RectEntity::new(
            DrawOptions::new(x, y, w, h, 1.0),
            Rgba::white(),
        )));
        layer
    }

    fn flush(manager: &mut RenderManager<RecordingSurface>) {
        manager.render_frame(Instant::now());
        manager.surface_mut().clear_commands();
        manager.drain_events();
    }

    #[test]
    fn test_ids_are_monotonic() {
        let mut manager = manager();
        let a = manager.add_layer(rect_layer(0.0, 0.0, 100.0, 100.0));
        let b = manager.add_layer(rect_layer(50.0, 50.0, 100.0, 100.0));
        assert!(b > a);
        assert_eq!(manager.layer(a).and_then(|l| l.id), Some(a));
    }

    #[test]
    fn test_hit_test_z_order() {
        let mut manager = manager();
        let a = manager.add_layer(rect_layer(0.0, 0.0, 100.0, 100.0));
        let b = manager.add_layer(rect_layer(50.0, 50.0, 100.0, 100.0));

        // Inside both: the later layer wins.
        let hit = manager
            .find_layer_by_coordinates(Point::new(75.0, 75.0))
            .expect("hit");
        assert_eq!(hit.id, Some(b));

        // Inside only the first.
        let hit = manager
            .find_layer_by_coordinates(Point::new(10.0, 10.0))
            .expect("hit");
        assert_eq!(hit.id, Some(a));

        assert!(manager
            .find_layer_by_coordinates(Point::new(500.0, 500.0))
            .is_none());
    }

    #[test]
    fn test_find_multiple_topmost_first() {
        let mut manager = manager();
        let a = manager.add_layer(rect_layer(0.0, 0.0, 100.0, 100.0));
        let b = manager.add_layer(rect_layer(50.0, 50.0, 100.0, 100.0));

        let hits = manager.find_multiple_layers_by_coordinates(Point::new(75.0, 75.0));
        let ids: Vec<_> = hits.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![Some(b), Some(a)]);
    }

    #[test]
    fn test_hidden_layers_are_not_hit() {
        let mut manager = manager();
        let mut layer = rect_layer(0.0, 0.0, 100.0, 100.0);
        layer.should_render = false;
        manager.add_layer(layer);
        assert!(manager
            .find_layer_by_coordinates(Point::new(50.0, 50.0))
            .is_none());
    }

    #[test]
    fn test_move_across_tile_boundary() {
        let mut manager = manager();
        let id = manager.add_layer(rect_layer(0.0, 0.0, 200.0, 200.0));
        flush(&mut manager);

        assert!(manager.move_layer(id, 2100.0, 0.0));
        assert!(manager
            .find_layer_by_coordinates(Point::new(2200.0, 100.0))
            .is_some());
        assert!(manager
            .find_layer_by_coordinates(Point::new(100.0, 100.0))
            .is_none());
    }

    #[test]
    fn test_move_dirties_tiles_before_and_after() {
        let mut manager = manager();
        let id = manager.add_layer(rect_layer(0.0, 0.0, 200.0, 200.0));
        flush(&mut manager);

        assert!(manager.move_layer(id, 2100.0, 0.0));
        manager.render_frame(Instant::now());

        let clears: Vec<Rect> = manager
            .surface()
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Clear { rect } => Some(*rect),
                _ => None,
            })
            .collect();
        assert_eq!(clears.len(), 2);
        assert!(clears.iter().any(|r| r.x0 == 0.0));
        assert!(clears.iter().any(|r| r.x0 == TILE_SIZE));
    }

    #[test]
    fn test_full_redraw_swallows_dirty_tiles() {
        let mut manager = manager();
        let id = manager.add_layer(rect_layer(0.0, 0.0, 200.0, 200.0));
        flush(&mut manager);

        assert!(manager.move_layer(id, 10.0, 10.0));
        manager.request_full_redraw(None);
        manager.render_frame(Instant::now());

        let clears: Vec<Rect> = manager
            .surface()
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Clear { rect } => Some(*rect),
                _ => None,
            })
            .collect();
        // One viewport-sized clear, not one per tile.
        assert_eq!(clears.len(), 1);
        assert!((clears[0].width() - 800.0).abs() < 1e-9);
    }

    #[test]
    fn test_clean_frame_paints_nothing() {
        let mut manager = manager();
        manager.add_layer(rect_layer(0.0, 0.0, 100.0, 100.0));
        flush(&mut manager);
        manager.render_frame(Instant::now());
        assert!(manager.surface().commands().is_empty());
    }

    #[test]
    fn test_layers_draw_in_ascending_id_order() {
        let mut manager = manager();
        manager.add_layer(rect_layer(0.0, 0.0, 100.0, 100.0));
        manager.add_layer(rect_layer(50.0, 50.0, 100.0, 100.0));
        manager.render_frame(Instant::now());

        let fills: Vec<Rect> = manager
            .surface()
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillRect { rect, .. } => Some(*rect),
                _ => None,
            })
            .collect();
        assert_eq!(fills.len(), 2);
        assert_eq!(fills[0].x0, 0.0);
        assert_eq!(fills[1].x0, 50.0);
    }

    #[test]
    fn test_except_suppresses_one_layer() {
        let mut manager = manager();
        let a = manager.add_layer(rect_layer(0.0, 0.0, 100.0, 100.0));
        manager.add_layer(rect_layer(200.0, 0.0, 100.0, 100.0));

        manager.render_full_now(Some(a));
        let fills = manager
            .surface()
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::FillRect { .. }))
            .count();
        assert_eq!(fills, 1);
    }

    #[test]
    fn test_remove_emits_event() {
        let mut manager = manager();
        let id = manager.add_layer(rect_layer(0.0, 0.0, 100.0, 100.0));
        manager.drain_events();

        assert!(manager.remove_layer(id).is_some());
        assert_eq!(manager.drain_events(), vec![RenderEvent::LayerRemoved(id)]);
        assert!(manager.drain_events().is_empty());

        assert!(manager.remove_layer(id).is_none());
    }

    #[test]
    fn test_failed_resize_emits_nothing() {
        let mut manager = manager();
        let id = manager.add_layer(rect_layer(0.0, 0.0, 100.0, 100.0));
        flush(&mut manager);

        assert!(!manager.resize_layer(id, -500.0, -500.0, ResizeDirection::BottomRight));
        assert!(manager.drain_events().is_empty());
        manager.render_frame(Instant::now());
        assert!(manager.surface().commands().is_empty());
    }

    #[test]
    fn test_text_snapshot_reused_until_forced() {
        let mut manager = manager();
        let mut layer = rect_layer(0.0, 0.0, 200.0, 100.0);
        layer.add_child(Entity::Text(TextEntity::new(
            DrawOptions::new(10.0, 10.0, 180.0, 80.0, 1.0),
            "hello world".to_string(),
        )));
        manager.add_layer(layer);
        manager.render_frame(Instant::now());

        let raster_count = |m: &RenderManager<RecordingSurface>| {
            m.surface()
                .commands()
                .iter()
                .filter(|c| matches!(c, DrawCommand::RasterizeText { .. }))
                .count()
        };
        assert_eq!(raster_count(&manager), 1);

        // A second full redraw reuses the snapshot.
        manager.surface_mut().clear_commands();
        manager.request_full_redraw(None);
        manager.render_frame(Instant::now());
        assert_eq!(raster_count(&manager), 0);
        assert!(manager
            .surface()
            .commands()
            .iter()
            .any(|c| matches!(c, DrawCommand::Bitmap { .. })));
    }

    #[test]
    fn test_zoom_settle_forces_high_quality_redraw() {
        let mut manager = manager();
        let mut layer = rect_layer(0.0, 0.0, 200.0, 100.0);
        layer.add_child(Entity::Text(TextEntity::new(
            DrawOptions::new(10.0, 10.0, 180.0, 80.0, 1.0),
            "hello".to_string(),
        )));
        manager.add_layer(layer);

        let start = Instant::now();
        manager.render_frame(start);
        assert!(manager.wheel_zoom(Point::new(100.0, 100.0), true, start));
        manager.render_frame(start);
        manager.surface_mut().clear_commands();

        // Settle: one forced full redraw re-rasterizes the text.
        manager.render_frame(start + Duration::from_millis(300));
        assert!(manager
            .surface()
            .commands()
            .iter()
            .any(|c| matches!(c, DrawCommand::RasterizeText { .. })));
    }

    #[test]
    fn test_wheel_zoom_clamp_leaves_scene_clean() {
        let mut manager = manager();
        manager.add_layer(rect_layer(0.0, 0.0, 100.0, 100.0));
        flush(&mut manager);

        let now = Instant::now();
        for _ in 0..9 {
            assert!(manager.wheel_zoom(Point::ZERO, true, now));
        }
        manager.render_frame(now);
        manager.surface_mut().clear_commands();

        assert!(!manager.wheel_zoom(Point::ZERO, true, now + Duration::from_millis(300)));
        manager.render_frame(now + Duration::from_millis(400));
        // The rejected step scheduled nothing beyond the settle redraw.
        assert!((manager.camera().zoom_percentage() - 190.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_selection_draws_last_and_only_when_active() {
        let mut manager = manager();
        let id = manager.add_layer(rect_layer(0.0, 0.0, 100.0, 100.0));
        manager.render_frame(Instant::now());
        let strokes = manager
            .surface()
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::StrokeRect { .. }))
            .count();
        assert_eq!(strokes, 0);

        manager.surface_mut().clear_commands();
        manager.set_layer_active(id, true);
        manager.render_frame(Instant::now());

        let commands = manager.surface().commands();
        let fill_pos = commands
            .iter()
            .position(|c| matches!(c, DrawCommand::FillRect { rect, .. } if rect.width() == 100.0))
            .expect("shape fill");
        let stroke_pos = commands
            .iter()
            .position(|c| matches!(c, DrawCommand::StrokeRect { .. }))
            .expect("selection stroke");
        assert!(stroke_pos > fill_pos);
    }

    #[test]
    fn test_step_zoom_anchors_on_active_layer() {
        let mut manager = manager();
        let id = manager.add_layer(rect_layer(100.0, 100.0, 200.0, 200.0));
        manager.set_layer_active(id, true);
        flush(&mut manager);

        let center = Point::new(200.0, 200.0);
        let device = manager.camera().transform() * center;
        assert!(manager.step_zoom(true));
        // The active layer's center stays put on screen.
        let after = manager.camera().transform() * center;
        assert!((after.x - device.x).abs() < 1e-9);
        assert!((after.y - device.y).abs() < 1e-9);
    }
}
