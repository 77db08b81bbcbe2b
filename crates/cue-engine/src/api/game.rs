use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::types::{EntityId, GameEvent};
use crate::components::entity::Entity;
use crate::core::constraint::{Constraint, ConstraintId, ConstraintSet};
use crate::core::physics::{BodyDesc, ColliderMaterial, CollisionPair, PhysicsWorld};
use crate::core::scene::Scene;
use crate::input::queue::InputQueue;

/// Configuration for the engine, provided by the game.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// World width in game units.
    pub world_width: f32,
    /// World height in game units.
    pub world_height: f32,
    /// Maximum number of body instances written per frame (default: 64).
    pub max_bodies: usize,
    /// Maximum number of constraint lines written per frame (default: 16).
    pub max_lines: usize,
    /// Maximum number of game events per frame (default: 32).
    pub max_events: usize,
    /// Gravity vector. Top-down tables use zero.
    pub gravity: Vec2,
    /// Multiplier turning a force into an instantaneous impulse
    /// (`impulse = force * impulse_scale`).
    pub impulse_scale: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            world_width: 1600.0,
            world_height: 800.0,
            max_bodies: 64,
            max_lines: 16,
            max_events: 32,
            gravity: Vec2::ZERO,
            impulse_scale: 1000.0,
        }
    }
}

impl GameConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// The core contract every game must fulfill.
pub trait Game {
    /// Return engine configuration. Called before every init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Build the scene and attach rules.
    fn init(&mut self, ctx: &mut EngineContext);

    /// Advance the game by exactly one tick, consuming this tick's input.
    /// The game owns the physics step (through its dispatcher).
    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue);

    /// Replace game-specific settings from JSON. Takes effect on the next init.
    fn load_config(&mut self, _json: &str) -> Result<(), serde_json::Error> {
        Ok(())
    }
}

/// Mutable access to the simulation, passed to every rule and to
/// `Game::init` / `Game::update`.
pub struct EngineContext {
    pub scene: Scene,
    pub physics: PhysicsWorld,
    pub constraints: ConstraintSet,
    pub events: Vec<GameEvent>,
    next_id: u32,
    collision_events: Vec<CollisionPair>,
    tick: u64,
    impulse_scale: f32,
}

impl EngineContext {
    pub fn new() -> Self {
        Self::from_config(&GameConfig::default())
    }

    pub fn from_config(config: &GameConfig) -> Self {
        let mut physics = PhysicsWorld::new(config.gravity);
        physics.set_dt(config.fixed_dt);
        Self {
            scene: Scene::new(),
            physics,
            constraints: ConstraintSet::new(),
            events: Vec::new(),
            next_id: 1,
            collision_events: Vec::new(),
            tick: 0,
            impulse_scale: config.impulse_scale,
        }
    }

    /// Generate the next unique entity ID.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Emit a game event to be forwarded to the host.
    pub fn emit_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Clear per-frame transient data.
    pub fn clear_frame_data(&mut self) {
        self.events.clear();
    }

    /// Number of physics steps completed.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Fixed timestep in seconds.
    pub fn dt(&self) -> f32 {
        self.physics.dt()
    }

    // -- Bodies --

    /// Spawn an entity with a physics body. The entity's position, rotation
    /// and filter are taken from the `BodyDesc`.
    pub fn spawn_with_body(
        &mut self,
        entity: Entity,
        desc: BodyDesc,
        material: ColliderMaterial,
    ) -> EntityId {
        let id = entity.id;
        let body = self.physics.create_body(id, &desc, material);
        let entity = entity
            .with_pos(desc.position)
            .with_rotation(desc.rotation)
            .with_filter(desc.filter)
            .with_body(body);
        self.scene.spawn(entity);
        log::debug!("spawned {:?} '{}' at {:?}", id, self.scene.tag_of(id).unwrap_or(""), desc.position);
        id
    }

    /// Remove an entity, its physics body and any constraint pulling it.
    /// Returns `false` when the entity was already gone.
    pub fn despawn(&mut self, id: EntityId) -> bool {
        let Some(entity) = self.scene.despawn(id) else {
            return false;
        };
        if let Some(body) = &entity.body {
            self.physics.remove_body(body);
        }
        let dropped = self.constraints.remove_for_body(id);
        if dropped > 0 {
            log::debug!("despawn {:?} dropped {} constraint(s)", id, dropped);
        }
        true
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.scene.contains(id)
    }

    /// Current center of an entity.
    pub fn position(&self, id: EntityId) -> Option<Vec2> {
        self.scene.get(id).map(|e| e.pos)
    }

    /// Linear velocity of an entity's body (zero if it has none).
    pub fn velocity(&self, id: EntityId) -> Vec2 {
        self.scene
            .get(id)
            .and_then(|e| e.body.as_ref())
            .map(|body| self.physics.velocity(body))
            .unwrap_or(Vec2::ZERO)
    }

    /// Set the linear velocity of an entity's body.
    pub fn set_velocity(&mut self, id: EntityId, vel: Vec2) {
        if let Some(body) = self.scene.get(id).and_then(|e| e.body.as_ref()) {
            self.physics.set_velocity(body, vel);
        }
    }

    /// Inverse mass of an entity's body; 0 for static or missing bodies.
    pub fn inverse_mass(&self, id: EntityId) -> f32 {
        self.scene
            .get(id)
            .and_then(|e| e.body.as_ref())
            .map(|body| self.physics.inverse_mass(body))
            .unwrap_or(0.0)
    }

    pub fn is_static(&self, id: EntityId) -> bool {
        self.scene
            .get(id)
            .and_then(|e| e.body.as_ref())
            .map(|body| self.physics.is_fixed(body))
            .unwrap_or(false)
    }

    pub fn is_sensor(&self, id: EntityId) -> bool {
        self.scene
            .get(id)
            .and_then(|e| e.body.as_ref())
            .map(|body| self.physics.is_sensor(body))
            .unwrap_or(false)
    }

    /// Apply `force` at a world-space point as a one-shot impulse of
    /// `force * impulse_scale`.
    pub fn apply_force_at(&mut self, id: EntityId, point: Vec2, force: Vec2) {
        if let Some(body) = self.scene.get(id).and_then(|e| e.body.as_ref()) {
            self.physics
                .apply_impulse_at_point(body, force * self.impulse_scale, point);
        }
    }

    /// Entities whose shape contains `point`, in spawn order.
    pub fn entities_at(&self, point: Vec2) -> Vec<EntityId> {
        let hits = self.physics.entities_at_point(point);
        self.scene
            .iter()
            .filter(|e| e.active && hits.contains(&e.id))
            .map(|e| e.id)
            .collect()
    }

    // -- Constraints --

    /// Attach a constraint. Returns `None` if its body does not exist.
    pub fn add_constraint(&mut self, constraint: Constraint) -> Option<ConstraintId> {
        if !self.scene.contains(constraint.body) {
            return None;
        }
        Some(self.constraints.insert(constraint))
    }

    /// Detach a constraint. Returns `false` when it was not attached.
    pub fn remove_constraint(&mut self, id: ConstraintId) -> bool {
        self.constraints.remove(id).is_some()
    }

    pub fn constraint_mut(&mut self, id: ConstraintId) -> Option<&mut Constraint> {
        self.constraints.get_mut(id)
    }

    // -- Stepping --

    /// Collision events from the most recent physics step.
    pub fn collisions(&self) -> &[CollisionPair] {
        &self.collision_events
    }

    /// Solve constraints, step the physics simulation and sync positions
    /// back to entities.
    pub fn step_physics(&mut self) {
        self.solve_constraints();

        self.collision_events.clear();
        self.physics.step_into(&mut self.collision_events);
        self.tick += 1;

        for entity in self.scene.iter_mut() {
            if let Some(body) = &entity.body {
                let (pos, rot) = self.physics.body_position(body);
                entity.pos = pos;
                entity.rotation = rot;
            }
        }
    }

    /// Replace each constraint's previous velocity contribution with the one
    /// that lands its positional correction over the coming tick.
    fn solve_constraints(&mut self) {
        let dt = self.physics.dt();
        if dt <= 0.0 {
            return;
        }
        for (constraint, applied) in self.constraints.solver_iter_mut() {
            let Some(entity) = self.scene.get(constraint.body) else {
                continue;
            };
            let Some(body) = &entity.body else {
                continue;
            };
            if self.physics.inverse_mass(body) == 0.0 {
                continue;
            }
            let target = constraint.correction(entity.pos) / dt;
            if target == *applied {
                continue;
            }
            let vel = self.physics.velocity(body);
            self.physics.set_velocity(body, vel - *applied + target);
            *applied = target;
        }
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}
