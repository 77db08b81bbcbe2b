use cue_engine::{EngineContext, EntityId, Handler, WorldEvent};

use crate::math::damp;

/// Bleeds off a fraction of the cue ball's speed every tick, standing in for
/// felt drag.
#[derive(Debug, Clone)]
pub struct CueDamping {
    cue: EntityId,
    factor: f32,
}

impl CueDamping {
    pub fn new(cue: EntityId, factor: f32) -> Self {
        Self { cue, factor }
    }

    pub fn factor(&self) -> f32 {
        self.factor
    }

    fn apply(&self, ctx: &mut EngineContext) {
        if !ctx.contains(self.cue) {
            return;
        }
        let v = ctx.velocity(self.cue);
        ctx.set_velocity(self.cue, damp(v, self.factor));
    }
}

impl Handler for CueDamping {
    fn handle(&mut self, ctx: &mut EngineContext, event: &WorldEvent) {
        if let WorldEvent::BeforeTick { .. } = event {
            self.apply(ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cue_engine::{BodyDesc, ColliderDesc, ColliderMaterial, Entity};
    use glam::Vec2;

    fn cue(ctx: &mut EngineContext, vel: Vec2) -> EntityId {
        let id = ctx.next_id();
        ctx.spawn_with_body(
            Entity::new(id).with_tag("cueBall"),
            BodyDesc::dynamic(ColliderDesc::Ball { radius: 20.0 }).with_velocity(vel),
            ColliderMaterial::default(),
        )
    }

    #[test]
    fn speed_shrinks_by_factor_each_tick() {
        let mut ctx = EngineContext::new();
        let id = cue(&mut ctx, Vec2::new(30.0, 40.0));
        let mut damping = CueDamping::new(id, 0.99);

        damping.handle(&mut ctx, &WorldEvent::BeforeTick { tick: 0 });
        assert!((ctx.velocity(id).length() - 49.5).abs() < 1e-3);

        damping.handle(&mut ctx, &WorldEvent::BeforeTick { tick: 1 });
        assert!((ctx.velocity(id).length() - 49.005).abs() < 1e-3);
    }

    #[test]
    fn resting_ball_stays_at_rest() {
        let mut ctx = EngineContext::new();
        let id = cue(&mut ctx, Vec2::ZERO);
        CueDamping::new(id, 0.99).handle(&mut ctx, &WorldEvent::BeforeTick { tick: 0 });
        assert_eq!(ctx.velocity(id), Vec2::ZERO);
    }

    #[test]
    fn missing_cue_ball_is_ignored() {
        let mut ctx = EngineContext::new();
        let id = cue(&mut ctx, Vec2::new(10.0, 0.0));
        ctx.despawn(id);
        CueDamping::new(id, 0.99).handle(&mut ctx, &WorldEvent::BeforeTick { tick: 0 });
        assert_eq!(ctx.scene.len(), 0);
    }

    #[test]
    fn other_events_do_not_damp() {
        let mut ctx = EngineContext::new();
        let id = cue(&mut ctx, Vec2::new(10.0, 0.0));
        CueDamping::new(id, 0.5).handle(
            &mut ctx,
            &WorldEvent::DragEnd {
                body: id,
                pointer: Vec2::ZERO,
            },
        );
        assert_eq!(ctx.velocity(id), Vec2::new(10.0, 0.0));
    }
}
