//! Anchor-to-body spring constraints.
//!
//! A constraint links a world-space anchor point to one body. Each tick,
//! before the physics step, the body is given the velocity that closes a
//! `stiffness` fraction of the remaining rest-length error over that tick.
//! The velocity a constraint contributed on the previous tick is taken back
//! first, so the pull never accumulates. Stiffness 1.0 closes the whole gap
//! in one tick and holds the body there; 0.05 closes five percent of it.

use glam::Vec2;

use crate::api::types::EntityId;
use crate::components::style::RenderStyle;

/// Handle to a constraint attached to the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConstraintId(pub u32);

#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    /// World-space anchor point.
    pub anchor: Vec2,
    /// The body pulled toward the anchor.
    pub body: EntityId,
    pub stiffness: f32,
    /// Rest length; 0 pins the body's center onto the anchor.
    pub length: f32,
    pub style: RenderStyle,
}

impl Constraint {
    pub fn new(anchor: Vec2, body: EntityId) -> Self {
        Self {
            anchor,
            body,
            stiffness: 1.0,
            length: 0.0,
            style: RenderStyle::default(),
        }
    }

    pub fn with_stiffness(mut self, stiffness: f32) -> Self {
        self.stiffness = stiffness;
        self
    }

    pub fn with_length(mut self, length: f32) -> Self {
        self.length = length;
        self
    }

    pub fn with_style(mut self, style: RenderStyle) -> Self {
        self.style = style;
        self
    }

    /// Positional correction to apply to a body centered at `body_pos`.
    pub fn correction(&self, body_pos: Vec2) -> Vec2 {
        let delta = self.anchor - body_pos;
        let current = delta.length();
        if current <= f32::EPSILON {
            return Vec2::ZERO;
        }
        let difference = (current - self.length) / current;
        delta * difference * self.stiffness
    }
}

#[derive(Debug)]
struct Slot {
    id: ConstraintId,
    constraint: Constraint,
    /// Velocity this constraint added on its last solve.
    applied: Vec2,
}

/// The constraints currently attached to the world, in attach order.
#[derive(Debug, Default)]
pub struct ConstraintSet {
    next_id: u32,
    entries: Vec<Slot>,
}

impl ConstraintSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, constraint: Constraint) -> ConstraintId {
        let id = ConstraintId(self.next_id);
        self.next_id += 1;
        self.entries.push(Slot {
            id,
            constraint,
            applied: Vec2::ZERO,
        });
        id
    }

    /// Detach a constraint. Returns `None` if it was not attached.
    pub fn remove(&mut self, id: ConstraintId) -> Option<Constraint> {
        let idx = self.entries.iter().position(|slot| slot.id == id)?;
        Some(self.entries.remove(idx).constraint)
    }

    /// Detach every constraint targeting `body`. Returns how many were removed.
    pub fn remove_for_body(&mut self, body: EntityId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|slot| slot.constraint.body != body);
        before - self.entries.len()
    }

    pub fn get(&self, id: ConstraintId) -> Option<&Constraint> {
        self.entries
            .iter()
            .find(|slot| slot.id == id)
            .map(|slot| &slot.constraint)
    }

    pub fn get_mut(&mut self, id: ConstraintId) -> Option<&mut Constraint> {
        self.entries
            .iter_mut()
            .find(|slot| slot.id == id)
            .map(|slot| &mut slot.constraint)
    }

    pub fn contains(&self, id: ConstraintId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Constraint> {
        self.entries.iter().map(|slot| &slot.constraint)
    }

    /// Each constraint paired with the velocity it added on its last solve.
    pub(crate) fn solver_iter_mut(&mut self) -> impl Iterator<Item = (&Constraint, &mut Vec2)> {
        self.entries
            .iter_mut()
            .map(|Slot { constraint, applied, .. }| (&*constraint, applied))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
