use cue_engine::{CollisionPair, EngineContext, EntityId, GameEvent, Handler, WorldEvent};

use crate::events;
use crate::labels::{label_of, BodyLabel};

/// Removes any ball that touches a pocket.
#[derive(Debug, Clone, Default)]
pub struct PocketRule {
    pocketed: Vec<EntityId>,
}

impl PocketRule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Balls removed so far, in the order they dropped.
    pub fn pocketed(&self) -> &[EntityId] {
        &self.pocketed
    }

    fn apply(&mut self, ctx: &mut EngineContext, pairs: &[CollisionPair]) {
        for pair in pairs.iter().filter(|p| p.started) {
            let ball = if label_of(ctx, pair.entity_a) == Some(BodyLabel::Pocket) {
                pair.entity_b
            } else if label_of(ctx, pair.entity_b) == Some(BodyLabel::Pocket) {
                pair.entity_a
            } else {
                continue;
            };

            let Some(label) = label_of(ctx, ball).filter(|l| l.is_ball()) else {
                continue;
            };
            // A second report for the same ball finds it already gone.
            if !ctx.despawn(ball) {
                continue;
            }
            self.pocketed.push(ball);
            ctx.emit_event(GameEvent::new(
                events::game::BALL_POCKETED,
                ball.0 as f32,
                label.code(),
                0.0,
            ));
            log::info!("{} {:?} pocketed", label.tag(), ball);
        }
    }
}

impl Handler for PocketRule {
    fn handle(&mut self, ctx: &mut EngineContext, event: &WorldEvent) {
        if let WorldEvent::CollisionStart { pairs } = event {
            self.apply(ctx, pairs);
        }
    }
}
