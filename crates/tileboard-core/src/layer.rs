//! Layers: the addressable unit of user interaction.
//!
//! A layer is a positioned container owning an ordered list of child entities,
//! typically one shape plus optional text and a selection overlay. Moves and
//! resizes cascade proportionally to every child so the group's internal
//! layout is preserved.

use crate::entities::{
    Corner, DrawOptions, Edge, Entity, HitRegion, OptionsPatch, SelectionEntity, SplineEntity,
    TextEntity,
};
use kurbo::{Point, Rect};

/// Registry identity, assigned by the render manager on insertion.
/// Higher id means added later and drawn on top.
pub type LayerId = u64;

/// Default minimum dimension for layers, in canvas units.
pub const LAYER_MIN_DIMENSION: f64 = 20.0;

/// Which corner a directional resize is anchored on. Edge drags map onto a
/// corner: top and left resize from the top-left, bottom and right from the
/// bottom-right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeDirection {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ResizeDirection {
    pub fn from_corner(corner: Corner) -> Self {
        match corner {
            Corner::TopLeft => ResizeDirection::TopLeft,
            Corner::TopRight => ResizeDirection::TopRight,
            Corner::BottomLeft => ResizeDirection::BottomLeft,
            Corner::BottomRight => ResizeDirection::BottomRight,
        }
    }

    pub fn from_edge(edge: Edge) -> Self {
        match edge {
            Edge::Top | Edge::Left => ResizeDirection::TopLeft,
            Edge::Bottom | Edge::Right => ResizeDirection::BottomRight,
        }
    }

    pub fn from_region(region: HitRegion) -> Self {
        match region {
            HitRegion::Corner(corner) => Self::from_corner(corner),
            HitRegion::Edge(edge) => Self::from_edge(edge),
        }
    }
}

/// A positioned, sized container of child entities.
#[derive(Debug, Clone)]
pub struct Layer {
    /// `None` until the render manager inserts the layer.
    pub id: Option<LayerId>,
    pub active: bool,
    pub should_render: bool,
    pub options: DrawOptions,
    pub min_dimension: f64,
    children: Vec<Entity>,
}

impl Layer {
    pub fn new(options: DrawOptions, with_selection: bool) -> Self {
        let mut layer = Self {
            id: None,
            active: false,
            should_render: true,
            options,
            min_dimension: LAYER_MIN_DIMENSION,
            children: Vec::new(),
        };
        if with_selection {
            layer.children.push(Entity::Selection(SelectionEntity::new(options)));
        }
        layer
    }

    pub fn children(&self) -> &[Entity] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut [Entity] {
        &mut self.children
    }

    pub fn add_child(&mut self, child: Entity) {
        self.children.push(child);
    }

    /// First shape child (rect or circle).
    pub fn shape_child(&self) -> Option<&Entity> {
        self.children
            .iter()
            .find(|c| matches!(c, Entity::Rect(_) | Entity::Circle(_)))
    }

    pub fn text_child(&self) -> Option<&TextEntity> {
        self.children.iter().find_map(|c| match c {
            Entity::Text(t) => Some(t),
            _ => None,
        })
    }

    pub fn text_child_mut(&mut self) -> Option<&mut TextEntity> {
        self.children.iter_mut().find_map(|c| match c {
            Entity::Text(t) => Some(t),
            _ => None,
        })
    }

    pub fn selection_child(&self) -> Option<&SelectionEntity> {
        self.children.iter().find_map(|c| match c {
            Entity::Selection(s) => Some(s),
            _ => None,
        })
    }

    pub fn spline_child(&self) -> Option<&SplineEntity> {
        self.children.iter().find_map(|c| match c {
            Entity::Spline(s) => Some(s),
            _ => None,
        })
    }

    pub fn spline_child_mut(&mut self) -> Option<&mut SplineEntity> {
        self.children.iter_mut().find_map(|c| match c {
            Entity::Spline(s) => Some(s),
            _ => None,
        })
    }

    pub fn bounds(&self) -> Rect {
        self.options.bounds()
    }

    pub fn contains(&self, point: Point, padding: f64) -> bool {
        self.options.contains(point, padding)
    }

    pub fn set_options(&mut self, patch: OptionsPatch) {
        self.options.apply(patch);
    }

    /// Translate the layer and every child by the same delta.
    pub fn move_by(&mut self, dx: f64, dy: f64) {
        self.options.translate(dx, dy);
        for child in &mut self.children {
            child.move_by(dx, dy);
        }
    }

    /// Directional resize anchored on the opposite corner.
    ///
    /// The movement is uniform, `(|dx| + |dy|) / 2`, signed by the drag
    /// direction relative to the anchored corner. Candidate dimensions are
    /// validated against the floor before any mutation; a violating resize
    /// drops the whole delta and returns false. Children are remapped
    /// proportionally into the new bounds.
    pub fn resize(&mut self, dx: f64, dy: f64, direction: ResizeDirection) -> bool {
        let movement = (dx.abs() + dy.abs()) / 2.0;
        let grows = match direction {
            ResizeDirection::TopLeft => dx + dy < 0.0,
            ResizeDirection::TopRight => dx - dy > 0.0,
            ResizeDirection::BottomLeft => dy - dx > 0.0,
            ResizeDirection::BottomRight => dx + dy > 0.0,
        };
        let signed = if grows { movement } else { -movement };

        let width = self.options.width + signed;
        let height = self.options.height + signed;
        if width < self.min_dimension || height < self.min_dimension {
            return false;
        }

        let old = self.options.bounds();
        match direction {
            ResizeDirection::TopLeft => {
                self.options.x -= signed;
                self.options.y -= signed;
            }
            ResizeDirection::TopRight => self.options.y -= signed,
            ResizeDirection::BottomLeft => self.options.x -= signed,
            ResizeDirection::BottomRight => {}
        }
        self.options.width = width;
        self.options.height = height;
        self.options.rescale();

        let new = self.options.bounds();
        for child in &mut self.children {
            child.scale_within(old, new);
        }
        true
    }

    /// Set exact dimensions, used after interactive curve edits change a
    /// spline child's bounding box. Same floor policy as `resize`.
    pub fn set_size(&mut self, width: f64, height: f64) -> bool {
        if width < self.min_dimension || height < self.min_dimension {
            return false;
        }
        let old = self.options.bounds();
        self.options.width = width;
        self.options.height = height;
        self.options.rescale();
        let new = self.options.bounds();
        for child in &mut self.children {
            // Spline edits already moved the control points themselves.
            if !matches!(child, Entity::Spline(_)) {
                child.scale_within(old, new);
            }
        }
        true
    }

}
