use cue_engine::{CollisionPair, EngineContext, EntityId, Handler, WorldEvent};

use crate::config::BounceLaw;
use crate::labels::label_of;
use crate::math::{bounce_literal, bounce_standard};

/// Rewrites a ball's velocity when it starts touching a static cushion.
///
/// Runs after the physics step, so it adjusts the engine's own contact
/// response rather than replacing it.
#[derive(Debug, Clone)]
pub struct BounceOverride {
    restitution: f32,
    law: BounceLaw,
}

impl BounceOverride {
    pub fn new(restitution: f32, law: BounceLaw) -> Self {
        Self { restitution, law }
    }

    /// The ball in a ball-vs-cushion pair and the contact normal pointing
    /// from the ball into the cushion.
    fn ball_against_cushion(ctx: &EngineContext, pair: &CollisionPair) -> Option<(EntityId, glam::Vec2)> {
        let normal = pair.normal?;
        let a_ball = label_of(ctx, pair.entity_a).is_some_and(|l| l.is_ball());
        let b_ball = label_of(ctx, pair.entity_b).is_some_and(|l| l.is_ball());
        let (ball, other, into_other) = match (a_ball, b_ball) {
            (true, false) => (pair.entity_a, pair.entity_b, normal),
            (false, true) => (pair.entity_b, pair.entity_a, -normal),
            _ => return None,
        };
        if !ctx.is_static(other) || ctx.is_sensor(other) {
            return None;
        }
        Some((ball, into_other))
    }

    fn apply(&self, ctx: &mut EngineContext, pairs: &[CollisionPair]) {
        for pair in pairs.iter().filter(|p| p.started) {
            let Some((ball, into_wall)) = Self::ball_against_cushion(ctx, pair) else {
                continue;
            };
            let v = ctx.velocity(ball);
            let bounced = match self.law {
                BounceLaw::Literal => {
                    bounce_literal(v, into_wall, ctx.inverse_mass(ball), self.restitution)
                }
                BounceLaw::Standard => bounce_standard(v, into_wall, self.restitution),
            };
            ctx.set_velocity(ball, bounced);
        }
    }
}

impl Handler for BounceOverride {
    fn handle(&mut self, ctx: &mut EngineContext, event: &WorldEvent) {
        if let WorldEvent::CollisionStart { pairs } = event {
            self.apply(ctx, pairs);
        }
    }
}
