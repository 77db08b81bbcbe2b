//! Aim-and-shoot control for the cue ball.
//!
//! A single spring links the cue ball to an anchor. It holds the ball at its
//! spawn point for a short grace period, follows the pointer while the
//! player drags, and is released when the player lets go. Releasing turns
//! the distance between the pointer and the ball into a one-shot force
//! pointed away from the pointer.

use glam::Vec2;

use cue_engine::{Constraint, ConstraintId, EngineContext, EntityId, GameEvent, Handler, WorldEvent};

use crate::config::ShotOrigin;
use crate::events;
use crate::math::{shot_impulse, shot_stretch};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AimState {
    /// Spring pinned at the spawn point until `release_tick`.
    Leashed { release_tick: u64 },
    /// Ball free, spring detached.
    Resting,
    /// Player is dragging; spring anchored at the grab point.
    Aiming,
}

/// Everything about one release, kept for inspection after the fact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotAttempt {
    /// Pointer position when the drag began.
    pub grab_anchor: Vec2,
    /// Point the stretch was measured from.
    pub release_anchor: Vec2,
    /// Pointer position when the drag ended.
    pub pointer: Vec2,
    pub stretch: Vec2,
    pub magnitude: f32,
    pub impulse: Vec2,
}

#[derive(Debug, Clone)]
pub struct AimController {
    cue: EntityId,
    spring: Constraint,
    attached: Option<ConstraintId>,
    state: AimState,
    grab_anchor: Vec2,
    power: f32,
    origin: ShotOrigin,
    last_shot: Option<ShotAttempt>,
}

impl AimController {
    /// `spring` is the control constraint template; it must target `cue`.
    pub fn new(cue: EntityId, spring: Constraint, power: f32, origin: ShotOrigin) -> Self {
        Self {
            cue,
            spring: Constraint { body: cue, ..spring },
            attached: None,
            state: AimState::Resting,
            grab_anchor: Vec2::ZERO,
            power,
            origin,
            last_shot: None,
        }
    }

    pub fn state(&self) -> AimState {
        self.state
    }

    pub fn cue(&self) -> EntityId {
        self.cue
    }

    /// Current spring anchor.
    pub fn anchor(&self) -> Vec2 {
        self.spring.anchor
    }

    pub fn last_shot(&self) -> Option<&ShotAttempt> {
        self.last_shot.as_ref()
    }

    /// Pin the cue ball at its current position for `grace_ticks` ticks.
    /// A zero grace leaves the ball free.
    pub fn leash(&mut self, ctx: &mut EngineContext, grace_ticks: u64) {
        let Some(pos) = ctx.position(self.cue) else {
            return;
        };
        if grace_ticks == 0 {
            return;
        }
        self.spring.anchor = pos;
        self.attach(ctx);
        self.state = AimState::Leashed {
            release_tick: ctx.tick() + grace_ticks,
        };
        log::debug!("cue leashed at {:?} until tick {}", pos, ctx.tick() + grace_ticks);
    }

    fn attach(&mut self, ctx: &mut EngineContext) {
        if let Some(live) = self.attached.and_then(|id| ctx.constraint_mut(id)) {
            live.anchor = self.spring.anchor;
            return;
        }
        self.attached = ctx.add_constraint(self.spring.clone());
    }

    fn detach(&mut self, ctx: &mut EngineContext) {
        if let Some(id) = self.attached.take() {
            ctx.remove_constraint(id);
        }
    }

    fn on_before_tick(&mut self, ctx: &mut EngineContext, tick: u64) {
        if let AimState::Leashed { release_tick } = self.state {
            if tick >= release_tick {
                self.detach(ctx);
                self.state = AimState::Resting;
                log::debug!("cue leash released at tick {}", tick);
            }
        }
    }

    fn on_drag_start(&mut self, ctx: &mut EngineContext, body: EntityId, pointer: Vec2) {
        if body != self.cue {
            return;
        }
        self.grab_anchor = pointer;
        self.spring.anchor = pointer;
        // Re-anchors the live spring when leashed, which also cancels the
        // leash deadline below.
        self.attach(ctx);
        self.state = AimState::Aiming;
        log::debug!("aiming from {:?}", pointer);
    }

    fn on_drag_end(&mut self, ctx: &mut EngineContext, body: EntityId, pointer: Vec2) {
        if self.state != AimState::Aiming || body != self.cue {
            return;
        }

        let Some(center) = ctx.position(self.cue) else {
            self.detach(ctx);
            self.state = AimState::Resting;
            return;
        };

        self.spring.anchor = center;
        let release_anchor = match self.origin {
            ShotOrigin::BallCenter => center,
            ShotOrigin::DragPoint => self.grab_anchor,
        };
        let stretch = shot_stretch(release_anchor, pointer);
        let (magnitude, impulse) = shot_impulse(stretch, self.power);

        ctx.apply_force_at(self.cue, center, impulse);
        self.detach(ctx);
        self.state = AimState::Resting;

        let shot = ShotAttempt {
            grab_anchor: self.grab_anchor,
            release_anchor,
            pointer,
            stretch,
            magnitude,
            impulse,
        };
        ctx.emit_event(GameEvent::new(
            events::game::SHOT_TAKEN,
            impulse.x,
            impulse.y,
            magnitude,
        ));
        log::info!("shot: magnitude {:.3} impulse {:?}", magnitude, impulse);
        self.last_shot = Some(shot);
    }
}

impl Handler for AimController {
    fn handle(&mut self, ctx: &mut EngineContext, event: &WorldEvent) {
        match *event {
            WorldEvent::BeforeTick { tick } => self.on_before_tick(ctx, tick),
            WorldEvent::DragStart { body, pointer } => self.on_drag_start(ctx, body, pointer),
            WorldEvent::DragEnd { body, pointer } => self.on_drag_end(ctx, body, pointer),
            WorldEvent::CollisionStart { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::SHOT_POWER;
    use cue_engine::{BodyDesc, ColliderDesc, ColliderMaterial, Entity};

    fn setup(at: Vec2) -> (EngineContext, AimController) {
        let mut ctx = EngineContext::new();
        let cue = ctx.next_id();
        ctx.spawn_with_body(
            Entity::new(cue).with_tag("cueBall"),
            BodyDesc::dynamic(ColliderDesc::Ball { radius: 20.0 }).with_position(at),
            ColliderMaterial::default(),
        );
        let spring = Constraint::new(at, cue).with_stiffness(0.05);
        let aim = AimController::new(cue, spring, SHOT_POWER, ShotOrigin::BallCenter);
        (ctx, aim)
    }

    fn drag(aim: &mut AimController, ctx: &mut EngineContext, from: Vec2, to: Vec2) {
        let body = aim.cue();
        aim.handle(ctx, &WorldEvent::DragStart { body, pointer: from });
        aim.handle(ctx, &WorldEvent::DragEnd { body, pointer: to });
    }

    #[test]
    fn leash_releases_at_deadline() {
        let (mut ctx, mut aim) = setup(Vec2::new(800.0, 300.0));
        aim.leash(&mut ctx, 2);
        assert_eq!(aim.state(), AimState::Leashed { release_tick: 2 });
        assert_eq!(ctx.constraints.len(), 1);

        aim.handle(&mut ctx, &WorldEvent::BeforeTick { tick: 1 });
        assert_eq!(ctx.constraints.len(), 1);

        aim.handle(&mut ctx, &WorldEvent::BeforeTick { tick: 2 });
        assert_eq!(aim.state(), AimState::Resting);
        assert!(ctx.constraints.is_empty());
    }

    #[test]
    fn zero_stretch_release_is_a_no_force_shot() {
        let (mut ctx, mut aim) = setup(Vec2::new(100.0, 100.0));
        drag(&mut aim, &mut ctx, Vec2::new(100.0, 100.0), Vec2::new(100.0, 100.0));

        let shot = aim.last_shot().unwrap();
        assert_eq!(shot.magnitude, 0.0);
        assert_eq!(shot.impulse.length(), 0.0);
        assert!(ctx.constraints.is_empty());
        assert_eq!(ctx.velocity(aim.cue()), Vec2::ZERO);
    }

    #[test]
    fn pulling_back_shoots_forward() {
        let (mut ctx, mut aim) = setup(Vec2::new(800.0, 300.0));
        drag(&mut aim, &mut ctx, Vec2::new(800.0, 300.0), Vec2::new(700.0, 300.0));

        let shot = *aim.last_shot().unwrap();
        assert!((shot.magnitude - 1.0).abs() < 1e-5);
        assert!((shot.impulse - Vec2::new(1.0, 0.0)).length() < 1e-5);
        assert_eq!(shot.release_anchor, Vec2::new(800.0, 300.0));
        assert!(ctx.velocity(aim.cue()).x > 0.0);
        assert!(ctx.constraints.is_empty());
        assert_eq!(aim.anchor(), Vec2::new(800.0, 300.0));

        assert_eq!(ctx.events.len(), 1);
        assert_eq!(ctx.events[0].kind, events::game::SHOT_TAKEN);
        assert!((ctx.events[0].c - 1.0).abs() < 1e-5);
    }

    #[test]
    fn drag_end_without_start_does_nothing() {
        let (mut ctx, mut aim) = setup(Vec2::new(800.0, 300.0));
        let body = aim.cue();
        aim.handle(
            &mut ctx,
            &WorldEvent::DragEnd {
                body,
                pointer: Vec2::new(0.0, 0.0),
            },
        );
        assert_eq!(aim.state(), AimState::Resting);
        assert!(aim.last_shot().is_none());
        assert_eq!(ctx.velocity(body), Vec2::ZERO);
        assert!(ctx.events.is_empty());
    }

    #[test]
    fn drag_during_leash_reanchors_and_cancels_deadline() {
        let (mut ctx, mut aim) = setup(Vec2::new(800.0, 300.0));
        aim.leash(&mut ctx, 2);
        let body = aim.cue();
        aim.handle(
            &mut ctx,
            &WorldEvent::DragStart {
                body,
                pointer: Vec2::new(780.0, 290.0),
            },
        );
        assert_eq!(aim.state(), AimState::Aiming);
        assert_eq!(ctx.constraints.len(), 1);
        assert_eq!(ctx.constraints.iter().next().unwrap().anchor, Vec2::new(780.0, 290.0));

        aim.handle(&mut ctx, &WorldEvent::BeforeTick { tick: 5 });
        assert_eq!(aim.state(), AimState::Aiming);
        assert_eq!(ctx.constraints.len(), 1);
    }

    #[test]
    fn drag_point_origin_measures_from_grab() {
        let (mut ctx, aim) = setup(Vec2::new(800.0, 300.0));
        let spring = Constraint::new(Vec2::ZERO, aim.cue());
        let mut aim = AimController::new(aim.cue(), spring, SHOT_POWER, ShotOrigin::DragPoint);
        drag(&mut aim, &mut ctx, Vec2::new(810.0, 300.0), Vec2::new(710.0, 300.0));

        let shot = aim.last_shot().unwrap();
        assert_eq!(shot.release_anchor, Vec2::new(810.0, 300.0));
        assert!((shot.magnitude - 1.0).abs() < 1e-5);
    }

    #[test]
    fn pocketed_cue_releases_quietly() {
        let (mut ctx, mut aim) = setup(Vec2::new(800.0, 300.0));
        let body = aim.cue();
        aim.handle(
            &mut ctx,
            &WorldEvent::DragStart {
                body,
                pointer: Vec2::new(800.0, 300.0),
            },
        );
        ctx.despawn(body);
        aim.handle(
            &mut ctx,
            &WorldEvent::DragEnd {
                body,
                pointer: Vec2::new(700.0, 300.0),
            },
        );
        assert_eq!(aim.state(), AimState::Resting);
        assert!(aim.last_shot().is_none());
        assert!(ctx.events.is_empty());
    }
}
