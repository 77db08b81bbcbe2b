//! Explicit event dispatch table.
//!
//! Handlers register against one or more [`EventKind`]s and are invoked
//! synchronously, in registration order, with the simulation context. The
//! [`Dispatcher::step`] driver fixes the per-tick order: drag gestures, then
//! before-tick, then the physics step, then collision-start.

use std::collections::HashMap;

use glam::Vec2;

use crate::api::game::EngineContext;
use crate::api::types::EntityId;
use crate::core::physics::CollisionPair;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    BeforeTick,
    CollisionStart,
    DragStart,
    DragEnd,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WorldEvent {
    /// Fired once per tick before the physics step. `tick` is the number of
    /// steps completed so far.
    BeforeTick { tick: u64 },
    /// Contacts that began during the last physics step, in engine order.
    CollisionStart { pairs: Vec<CollisionPair> },
    /// The pointer grabbed `body` at `pointer`.
    DragStart { body: EntityId, pointer: Vec2 },
    /// The pointer let go of `body` at `pointer`.
    DragEnd { body: EntityId, pointer: Vec2 },
}

impl WorldEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            WorldEvent::BeforeTick { .. } => EventKind::BeforeTick,
            WorldEvent::CollisionStart { .. } => EventKind::CollisionStart,
            WorldEvent::DragStart { .. } => EventKind::DragStart,
            WorldEvent::DragEnd { .. } => EventKind::DragEnd,
        }
    }
}

/// Something that reacts to world events by mutating the context.
pub trait Handler {
    fn handle(&mut self, ctx: &mut EngineContext, event: &WorldEvent);
}

/// Index of a registered handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(pub usize);

/// Maps each event kind to the ordered handlers subscribed to it.
pub struct Dispatcher<H> {
    handlers: Vec<H>,
    table: HashMap<EventKind, Vec<HandlerId>>,
}

impl<H: Handler> Dispatcher<H> {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
            table: HashMap::new(),
        }
    }

    /// Subscribe `handler` to every kind in `kinds`. Within one kind,
    /// handlers run in the order they were registered.
    pub fn register(&mut self, kinds: &[EventKind], handler: H) -> HandlerId {
        let id = HandlerId(self.handlers.len());
        self.handlers.push(handler);
        for kind in kinds {
            let subscribers = self.table.entry(*kind).or_default();
            if !subscribers.contains(&id) {
                subscribers.push(id);
            }
        }
        id
    }

    pub fn get(&self, id: HandlerId) -> Option<&H> {
        self.handlers.get(id.0)
    }

    /// Handlers subscribed to `kind`, in invocation order.
    pub fn subscribers(&self, kind: EventKind) -> &[HandlerId] {
        self.table.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Invoke every handler subscribed to the event's kind.
    pub fn dispatch(&mut self, ctx: &mut EngineContext, event: &WorldEvent) {
        let Some(ids) = self.table.get(&event.kind()) else {
            return;
        };
        for id in ids {
            if let Some(handler) = self.handlers.get_mut(id.0) {
                handler.handle(ctx, event);
            }
        }
    }

    /// Run one simulation tick.
    pub fn step(&mut self, ctx: &mut EngineContext, gestures: impl IntoIterator<Item = WorldEvent>) {
        for gesture in gestures {
            self.dispatch(ctx, &gesture);
        }

        let tick = ctx.tick();
        self.dispatch(ctx, &WorldEvent::BeforeTick { tick });

        ctx.step_physics();

        let pairs: Vec<CollisionPair> = ctx
            .collisions()
            .iter()
            .filter(|pair| pair.started)
            .copied()
            .collect();
        if !pairs.is_empty() {
            self.dispatch(ctx, &WorldEvent::CollisionStart { pairs });
        }
    }
}

impl<H: Handler> Default for Dispatcher<H> {
    fn default() -> Self {
        Self::new()
    }
}
