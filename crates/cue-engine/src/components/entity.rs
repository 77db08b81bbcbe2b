use glam::Vec2;

use crate::api::types::EntityId;
use crate::components::style::RenderStyle;
use crate::core::filter::CollisionFilter;
use crate::core::physics::PhysicsBody;

/// Fat Entity: a single struct with optional components.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Unique identifier.
    pub id: EntityId,
    /// String label for finding entities by role ("cueBall", "pocket", ...).
    pub tag: String,
    /// Whether this entity is active (inactive entities are skipped).
    pub active: bool,
    /// Position in world space, synced from physics after every step.
    pub pos: Vec2,
    /// Rotation in radians.
    pub rotation: f32,
    /// Collision category/mask, mirrored onto the physics collider.
    pub filter: CollisionFilter,
    /// Render style (`None` is invisible).
    pub style: Option<RenderStyle>,
    /// Physics body.
    pub body: Option<PhysicsBody>,
}

impl Entity {
    /// Create a new entity with the given ID at the origin.
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            tag: String::new(),
            active: true,
            pos: Vec2::ZERO,
            rotation: 0.0,
            filter: CollisionFilter::DEFAULT,
            style: None,
            body: None,
        }
    }

    // -- Builder pattern --

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_pos(mut self, pos: Vec2) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_filter(mut self, filter: CollisionFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_style(mut self, style: RenderStyle) -> Self {
        self.style = Some(style);
        self
    }

    pub fn with_body(mut self, body: PhysicsBody) -> Self {
        self.body = Some(body);
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tag == tag
    }
}
