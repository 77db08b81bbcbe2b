pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod input;

// Re-export key types at crate root for convenience
pub use api::game::{Game, GameConfig, EngineContext};
pub use api::types::{EntityId, GameEvent};
pub use components::entity::Entity;
pub use components::style::{Color, RenderStyle};
pub use core::constraint::{Constraint, ConstraintId, ConstraintSet};
pub use core::dispatch::{Dispatcher, EventKind, Handler, HandlerId, WorldEvent};
pub use core::filter::CollisionFilter;
pub use core::physics::{
    PhysicsWorld, PhysicsBody, BodyDesc, BodyType,
    ColliderDesc, ColliderMaterial, CollisionPair,
};
pub use core::scene::Scene;
pub use core::time::{FixedTimestep, ticks_for};
pub use input::drag::DragControl;
pub use input::queue::{InputEvent, InputQueue};
pub use renderer::instance::{BodyInstance, LineInstance, RenderBuffer};
pub use systems::render::build_render_buffer;
pub use systems::rng::Rng;
