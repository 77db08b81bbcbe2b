//! Scene composition: spawns the table from a [`TableConfig`] and wires the
//! rules into a dispatcher.

use glam::Vec2;

use cue_engine::{
    ticks_for, BodyDesc, ColliderDesc, ColliderMaterial, CollisionFilter, Color, Constraint,
    Dispatcher, EngineContext, Entity, EntityId, EventKind, Handler, HandlerId, RenderStyle, Rng,
    WorldEvent,
};

use crate::aim::AimController;
use crate::bounce::BounceOverride;
use crate::config::TableConfig;
use crate::damping::CueDamping;
use crate::labels::{BodyLabel, CUE_CATEGORY};
use crate::pocket::PocketRule;

/// Bodies spawned for one rack.
#[derive(Debug, Clone)]
pub struct Table {
    pub cue: EntityId,
    pub color_balls: Vec<EntityId>,
    pub walls: Vec<EntityId>,
    pub pocket: EntityId,
}

/// Every rule the table runs, as one handler type for the dispatcher.
#[derive(Debug, Clone)]
pub enum Rule {
    Aim(AimController),
    Damping(CueDamping),
    Bounce(BounceOverride),
    Pocket(PocketRule),
}

impl Handler for Rule {
    fn handle(&mut self, ctx: &mut EngineContext, event: &WorldEvent) {
        match self {
            Rule::Aim(rule) => rule.handle(ctx, event),
            Rule::Damping(rule) => rule.handle(ctx, event),
            Rule::Bounce(rule) => rule.handle(ctx, event),
            Rule::Pocket(rule) => rule.handle(ctx, event),
        }
    }
}

/// The dispatcher plus handles to each registered rule.
pub struct Rules {
    pub dispatcher: Dispatcher<Rule>,
    aim: HandlerId,
    pocket: HandlerId,
}

impl Rules {
    pub fn aim(&self) -> Option<&AimController> {
        match self.dispatcher.get(self.aim)? {
            Rule::Aim(aim) => Some(aim),
            _ => None,
        }
    }

    pub fn pocket(&self) -> Option<&PocketRule> {
        match self.dispatcher.get(self.pocket)? {
            Rule::Pocket(pocket) => Some(pocket),
            _ => None,
        }
    }

    /// Run one tick with the given drag gestures.
    pub fn step(&mut self, ctx: &mut EngineContext, gestures: Vec<WorldEvent>) {
        self.dispatcher.step(ctx, gestures);
    }
}

fn ball_material(config: &TableConfig) -> ColliderMaterial {
    ColliderMaterial {
        restitution: config.ball_material.restitution,
        friction: config.ball_material.friction,
        density: config.ball_material.density,
    }
}

fn spawn(ctx: &mut EngineContext, label: BodyLabel, style: RenderStyle, desc: BodyDesc, material: ColliderMaterial) -> EntityId {
    let id = ctx.next_id();
    ctx.spawn_with_body(
        Entity::new(id).with_tag(label.tag()).with_style(style),
        desc,
        material,
    )
}

/// Random fully saturated tint with lightness in `[min, max)` percent.
fn random_tint(rng: &mut Rng, lightness_min: u32, lightness_max: u32) -> Color {
    let hue = rng.next_int(360) as f32;
    let lightness = (lightness_min + rng.next_int(lightness_max.saturating_sub(lightness_min))) as f32 / 100.0;
    Color::from_hsla(hue, 1.0, lightness, 1.0)
}

/// Spawn the cue ball, colored balls, walls and pocket, in that order.
pub fn build_table(ctx: &mut EngineContext, config: &TableConfig) -> Table {
    let material = ball_material(config);

    let cue = spawn(
        ctx,
        BodyLabel::CueBall,
        RenderStyle::visible(Color::WHITE),
        BodyDesc::dynamic(ColliderDesc::Ball {
            radius: config.cue_ball.radius,
        })
        .with_position(config.cue_ball.position)
        .with_filter(CollisionFilter::DEFAULT.with_category(CUE_CATEGORY)),
        material,
    );

    let balls = &config.color_balls;
    let mut rng = Rng::new(balls.seed);
    let color_balls = (0..balls.count)
        .map(|_| {
            let x = rng.range(balls.x_min, balls.x_max);
            let tint = random_tint(&mut rng, balls.lightness_min, balls.lightness_max);
            spawn(
                ctx,
                BodyLabel::ColorBall,
                RenderStyle::visible(tint),
                BodyDesc::dynamic(ColliderDesc::Ball {
                    radius: balls.radius,
                })
                .with_position(Vec2::new(x, balls.y)),
                material,
            )
        })
        .collect();

    let walls = config
        .walls
        .iter()
        .map(|wall| {
            spawn(
                ctx,
                BodyLabel::Wall,
                RenderStyle::default(),
                BodyDesc::fixed(ColliderDesc::Cuboid {
                    half_width: wall.width / 2.0,
                    half_height: wall.height / 2.0,
                })
                .with_position(wall.center),
                ColliderMaterial::default(),
            )
        })
        .collect();

    let pocket = spawn(
        ctx,
        BodyLabel::Pocket,
        RenderStyle::visible(Color::BLACK),
        BodyDesc::fixed(ColliderDesc::Ball {
            radius: config.pocket.radius,
        })
        .with_position(config.pocket.position)
        .with_sensor(true),
        ColliderMaterial::default(),
    );

    log::info!(
        "table racked: cue {:?}, {} colored balls, {} walls",
        cue,
        ctx.scene.count_tag(BodyLabel::ColorBall.tag()),
        config.walls.len()
    );

    Table {
        cue,
        color_balls,
        walls,
        pocket,
    }
}

/// Create the control spring, leash the cue ball and register every rule.
pub fn build_rules(ctx: &mut EngineContext, config: &TableConfig, table: &Table) -> Rules {
    let spring = Constraint::new(config.cue_ball.position, table.cue)
        .with_stiffness(config.aim.spring_stiffness)
        .with_length(0.0)
        .with_style(RenderStyle::visible(Color::WHITE));
    let mut aim = AimController::new(table.cue, spring, config.aim.power, config.aim.shot_origin);
    aim.leash(ctx, ticks_for(config.aim.grace_seconds, ctx.dt()));

    let mut dispatcher = Dispatcher::new();
    let aim = dispatcher.register(
        &[EventKind::BeforeTick, EventKind::DragStart, EventKind::DragEnd],
        Rule::Aim(aim),
    );
    dispatcher.register(
        &[EventKind::BeforeTick],
        Rule::Damping(CueDamping::new(table.cue, config.damping)),
    );
    dispatcher.register(
        &[EventKind::CollisionStart],
        Rule::Bounce(BounceOverride::new(config.bounce.restitution, config.bounce.law)),
    );
    let pocket = dispatcher.register(&[EventKind::CollisionStart], Rule::Pocket(PocketRule::new()));

    Rules {
        dispatcher,
        aim,
        pocket,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aim::AimState;
    use crate::labels::label_of;

    #[test]
    fn reference_table_layout() {
        let mut ctx = EngineContext::new();
        let config = TableConfig::default();
        let table = build_table(&mut ctx, &config);

        assert_eq!(ctx.scene.len(), 1 + 5 + 4 + 1);
        assert_eq!(ctx.scene.count_tag("cueBall"), 1);
        assert_eq!(table.color_balls.len(), 5);
        assert_eq!(ctx.position(table.cue), Some(Vec2::new(800.0, 300.0)));
        assert!(ctx.is_sensor(table.pocket));
        assert!(ctx.is_static(table.pocket));
        for wall in &table.walls {
            assert!(ctx.is_static(*wall));
            assert!(!ctx.is_sensor(*wall));
            assert_eq!(label_of(&ctx, *wall), Some(BodyLabel::Wall));
        }
        for ball in &table.color_balls {
            let pos = ctx.position(*ball).unwrap();
            assert!((490.0..=970.0).contains(&pos.x));
            assert_eq!(pos.y, 460.0);
        }
        let cue_filter = ctx.scene.get(table.cue).unwrap().filter;
        assert_eq!(cue_filter.category, CUE_CATEGORY);
    }

    #[test]
    fn same_seed_same_rack() {
        let config = TableConfig::default();
        let mut a = EngineContext::new();
        let mut b = EngineContext::new();
        let ta = build_table(&mut a, &config);
        let tb = build_table(&mut b, &config);
        for (x, y) in ta.color_balls.iter().zip(&tb.color_balls) {
            assert_eq!(a.position(*x), b.position(*y));
            assert_eq!(a.scene.get(*x).unwrap().style, b.scene.get(*y).unwrap().style);
        }
    }

    #[test]
    fn rules_are_wired_in_order() {
        let mut ctx = EngineContext::new();
        let config = TableConfig::default();
        let table = build_table(&mut ctx, &config);
        let rules = build_rules(&mut ctx, &config, &table);

        let before_tick = rules.dispatcher.subscribers(EventKind::BeforeTick);
        assert_eq!(before_tick.len(), 2);
        assert!(matches!(rules.dispatcher.get(before_tick[0]), Some(Rule::Aim(_))));
        assert!(matches!(rules.dispatcher.get(before_tick[1]), Some(Rule::Damping(_))));

        let collisions = rules.dispatcher.subscribers(EventKind::CollisionStart);
        assert!(matches!(rules.dispatcher.get(collisions[0]), Some(Rule::Bounce(_))));
        assert!(matches!(rules.dispatcher.get(collisions[1]), Some(Rule::Pocket(_))));

        assert_eq!(rules.dispatcher.subscribers(EventKind::DragStart).len(), 1);
        assert_eq!(rules.dispatcher.subscribers(EventKind::DragEnd).len(), 1);
    }

    #[test]
    fn cue_starts_leashed_with_visible_spring() {
        let mut ctx = EngineContext::new();
        let config = TableConfig::default();
        let table = build_table(&mut ctx, &config);
        let rules = build_rules(&mut ctx, &config, &table);

        assert_eq!(rules.aim().unwrap().state(), AimState::Leashed { release_tick: 2 });
        let spring = ctx.constraints.iter().next().unwrap();
        assert_eq!(spring.anchor, Vec2::new(800.0, 300.0));
        assert_eq!(spring.stiffness, 0.05);
        assert!(spring.style.visible);
        assert_eq!(spring.style.color, Color::WHITE);
    }
}
