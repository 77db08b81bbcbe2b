//! Pointer-driven dragging.
//!
//! While the pointer is held over a body that passes the drag filter, an
//! invisible constraint pulls that body toward the pointer. Grabbing and
//! letting go are reported as [`WorldEvent::DragStart`] / [`WorldEvent::DragEnd`]
//! for the dispatcher to fan out.

use glam::Vec2;

use crate::api::game::EngineContext;
use crate::api::types::EntityId;
use crate::components::style::RenderStyle;
use crate::core::constraint::{Constraint, ConstraintId};
use crate::core::dispatch::WorldEvent;
use crate::core::filter::CollisionFilter;
use crate::input::queue::InputEvent;

pub const DEFAULT_DRAG_STIFFNESS: f32 = 0.2;

#[derive(Debug, Clone, Copy)]
struct Grab {
    body: EntityId,
    constraint: ConstraintId,
}

#[derive(Debug, Clone)]
pub struct DragControl {
    filter: CollisionFilter,
    stiffness: f32,
    pressed: bool,
    pointer: Vec2,
    grab: Option<Grab>,
}

impl DragControl {
    /// Only bodies whose filter can interact with `filter` are grabbable.
    pub fn new(filter: CollisionFilter) -> Self {
        Self {
            filter,
            stiffness: DEFAULT_DRAG_STIFFNESS,
            pressed: false,
            pointer: Vec2::ZERO,
            grab: None,
        }
    }

    pub fn with_stiffness(mut self, stiffness: f32) -> Self {
        self.stiffness = stiffness;
        self
    }

    /// Feed one input event. Returns the gesture it produced, if any.
    pub fn handle(&mut self, ctx: &mut EngineContext, event: &InputEvent) -> Option<WorldEvent> {
        let pointer = event.pointer()?;
        self.pointer = pointer;

        match event {
            InputEvent::PointerDown { .. } => {
                self.pressed = true;
                self.try_grab(ctx)
            }
            InputEvent::PointerMove { .. } => {
                if let Some(grab) = self.grab {
                    if let Some(c) = ctx.constraint_mut(grab.constraint) {
                        c.anchor = pointer;
                    }
                    None
                } else if self.pressed {
                    // Sliding onto a body with the button held grabs it.
                    self.try_grab(ctx)
                } else {
                    None
                }
            }
            InputEvent::PointerUp { .. } => {
                self.pressed = false;
                let grab = self.grab.take()?;
                ctx.remove_constraint(grab.constraint);
                log::debug!("drag end {:?} at {:?}", grab.body, pointer);
                Some(WorldEvent::DragEnd {
                    body: grab.body,
                    pointer,
                })
            }
            InputEvent::Custom { .. } => None,
        }
    }

    fn try_grab(&mut self, ctx: &mut EngineContext) -> Option<WorldEvent> {
        if self.grab.is_some() {
            return None;
        }
        let body = ctx.entities_at(self.pointer).into_iter().find(|id| {
            ctx.scene
                .get(*id)
                .is_some_and(|e| self.filter.can_interact(&e.filter))
        })?;

        let constraint = ctx.add_constraint(
            Constraint::new(self.pointer, body)
                .with_stiffness(self.stiffness)
                .with_style(RenderStyle::hidden()),
        )?;
        self.grab = Some(Grab { body, constraint });
        log::debug!("drag start {:?} at {:?}", body, self.pointer);
        Some(WorldEvent::DragStart {
            body,
            pointer: self.pointer,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::entity::Entity;
    use crate::core::physics::{BodyDesc, ColliderDesc, ColliderMaterial};

    const CUE: u32 = 0x0002;

    fn setup() -> (EngineContext, EntityId, EntityId) {
        let mut ctx = EngineContext::new();
        let cue = ctx.next_id();
        ctx.spawn_with_body(
            Entity::new(cue).with_tag("cueBall"),
            BodyDesc::dynamic(ColliderDesc::Ball { radius: 20.0 })
                .with_position(Vec2::new(100.0, 100.0))
                .with_filter(CollisionFilter::DEFAULT.with_category(CUE)),
            ColliderMaterial::default(),
        );
        let other = ctx.next_id();
        ctx.spawn_with_body(
            Entity::new(other).with_tag("colorBall"),
            BodyDesc::dynamic(ColliderDesc::Ball { radius: 20.0 })
                .with_position(Vec2::new(300.0, 100.0)),
            ColliderMaterial::default(),
        );
        (ctx, cue, other)
    }

    fn drag() -> DragControl {
        DragControl::new(CollisionFilter::new(0x0001, CUE))
    }

    #[test]
    fn grab_move_release() {
        let (mut ctx, cue, _) = setup();
        let mut drag = drag();

        let start = drag.handle(&mut ctx, &InputEvent::PointerDown { x: 105.0, y: 100.0 });
        assert_eq!(
            start,
            Some(WorldEvent::DragStart {
                body: cue,
                pointer: Vec2::new(105.0, 100.0)
            })
        );
        assert_eq!(ctx.constraints.len(), 1);
        assert_eq!(ctx.constraints.iter().next().unwrap().body, cue);
        assert!(!ctx.constraints.iter().next().unwrap().style.visible);

        assert_eq!(drag.handle(&mut ctx, &InputEvent::PointerMove { x: 50.0, y: 90.0 }), None);
        assert_eq!(ctx.constraints.iter().next().unwrap().anchor, Vec2::new(50.0, 90.0));

        let end = drag.handle(&mut ctx, &InputEvent::PointerUp { x: 50.0, y: 90.0 });
        assert_eq!(
            end,
            Some(WorldEvent::DragEnd {
                body: cue,
                pointer: Vec2::new(50.0, 90.0)
            })
        );
        assert!(ctx.constraints.is_empty());
        assert_eq!(drag.handle(&mut ctx, &InputEvent::PointerUp { x: 50.0, y: 90.0 }), None);
    }

    #[test]
    fn filtered_bodies_cannot_be_grabbed() {
        let (mut ctx, _, _) = setup();
        let mut drag = drag();

        assert_eq!(drag.handle(&mut ctx, &InputEvent::PointerDown { x: 300.0, y: 100.0 }), None);
        assert!(ctx.constraints.is_empty());
        assert_eq!(drag.handle(&mut ctx, &InputEvent::PointerUp { x: 300.0, y: 100.0 }), None);
    }

    #[test]
    fn empty_space_grabs_nothing() {
        let (mut ctx, _, _) = setup();
        let mut drag = drag();
        assert_eq!(drag.handle(&mut ctx, &InputEvent::PointerDown { x: 700.0, y: 700.0 }), None);
        assert_eq!(drag.handle(&mut ctx, &InputEvent::PointerUp { x: 700.0, y: 700.0 }), None);
    }

    #[test]
    fn sliding_onto_body_while_pressed_grabs_it() {
        let (mut ctx, cue, _) = setup();
        let mut drag = drag();

        assert_eq!(drag.handle(&mut ctx, &InputEvent::PointerDown { x: 0.0, y: 100.0 }), None);
        let start = drag.handle(&mut ctx, &InputEvent::PointerMove { x: 95.0, y: 100.0 });
        assert!(matches!(start, Some(WorldEvent::DragStart { body, .. }) if body == cue));
    }

    #[test]
    fn hover_without_press_does_nothing() {
        let (mut ctx, _, _) = setup();
        let mut drag = drag();
        assert_eq!(drag.handle(&mut ctx, &InputEvent::PointerMove { x: 100.0, y: 100.0 }), None);
        assert!(ctx.constraints.is_empty());
    }
}
