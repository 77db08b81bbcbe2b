use cue_engine::{
    build_render_buffer, EngineContext, FixedTimestep, Game, GameConfig, InputEvent, InputQueue,
    RenderBuffer,
};

/// Generic game runner that wires up the engine loop.
///
/// Each concrete game creates a `thread_local!` GameRunner and exports free
/// functions via `#[wasm_bindgen]`, because wasm-bindgen cannot export
/// generic structs directly.
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    input: InputQueue,
    render_buffer: RenderBuffer,
    timestep: FixedTimestep,
    config: GameConfig,
    initialized: bool,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        Self {
            ctx: EngineContext::from_config(&config),
            input: InputQueue::new(),
            render_buffer: RenderBuffer::with_capacity(config.max_bodies, config.max_lines),
            timestep: FixedTimestep::new(config.fixed_dt),
            config,
            game,
            initialized: false,
        }
    }

    /// Build a fresh world and initialize the game into it.
    pub fn init(&mut self) {
        self.config = self.game.config();
        self.ctx = EngineContext::from_config(&self.config);
        self.render_buffer = RenderBuffer::with_capacity(self.config.max_bodies, self.config.max_lines);
        self.timestep = FixedTimestep::new(self.config.fixed_dt);
        self.input.drain();
        self.game.init(&mut self.ctx);
        self.initialized = true;
        build_render_buffer(&self.ctx, &mut self.render_buffer);
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Replace game settings from JSON and rebuild the world.
    /// Invalid JSON is logged and leaves the running game untouched.
    pub fn load_config(&mut self, json: &str) {
        match self.game.load_config(json) {
            Ok(()) => {
                log::info!("config loaded, restarting");
                self.init();
            }
            Err(e) => log::warn!("ignoring invalid config: {}", e),
        }
    }

    /// Run one frame: advance whole ticks, then build the render buffer.
    /// Queued input is delivered to the first tick of the frame.
    pub fn tick(&mut self, dt: f32) {
        if !self.initialized {
            return;
        }

        // Clear per-frame transient data
        self.ctx.clear_frame_data();

        let steps = self.timestep.accumulate(dt);
        if steps > 0 {
            let mut pending = InputQueue::new();
            for event in self.input.drain() {
                pending.push(event);
            }
            self.game.update(&mut self.ctx, &pending);
            let idle = InputQueue::new();
            for _ in 1..steps {
                self.game.update(&mut self.ctx, &idle);
            }
        }

        if self.ctx.events.len() > self.config.max_events {
            log::warn!(
                "dropping {} game events over capacity",
                self.ctx.events.len() - self.config.max_events
            );
            self.ctx.events.truncate(self.config.max_events);
        }

        build_render_buffer(&self.ctx, &mut self.render_buffer);
    }

    pub fn ctx(&self) -> &EngineContext {
        &self.ctx
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    // ---- Pointer accessors for host reads ----

    pub fn bodies_ptr(&self) -> *const f32 {
        self.render_buffer.bodies_ptr()
    }

    pub fn body_count(&self) -> u32 {
        self.render_buffer.body_count()
    }

    pub fn lines_ptr(&self) -> *const f32 {
        self.render_buffer.lines_ptr()
    }

    pub fn line_count(&self) -> u32 {
        self.render_buffer.line_count()
    }

    pub fn game_events_ptr(&self) -> *const f32 {
        self.ctx.events.as_ptr() as *const f32
    }

    pub fn game_events_len(&self) -> u32 {
        self.ctx.events.len() as u32
    }

    pub fn world_width(&self) -> f32 {
        self.config.world_width
    }

    pub fn world_height(&self) -> f32 {
        self.config.world_height
    }

    pub fn max_bodies(&self) -> u32 {
        self.config.max_bodies as u32
    }

    pub fn max_lines(&self) -> u32 {
        self.config.max_lines as u32
    }

    pub fn max_events(&self) -> u32 {
        self.config.max_events as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cue_engine::{BodyDesc, ColliderDesc, ColliderMaterial, Color, Entity, GameEvent, RenderStyle};

    /// Spawns one ball and counts ticks and pointer events.
    #[derive(Default)]
    struct CountingGame {
        updates: u32,
        pointer_events: usize,
    }

    impl Game for CountingGame {
        fn init(&mut self, ctx: &mut EngineContext) {
            let id = ctx.next_id();
            ctx.spawn_with_body(
                Entity::new(id).with_style(RenderStyle::visible(Color::WHITE)),
                BodyDesc::dynamic(ColliderDesc::Ball { radius: 10.0 }),
                ColliderMaterial::default(),
            );
        }

        fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
            self.updates += 1;
            self.pointer_events += input.len();
            ctx.emit_event(GameEvent::new(1.0, 0.0, 0.0, 0.0));
            ctx.step_physics();
        }
    }

    #[test]
    fn tick_before_init_is_ignored() {
        let mut runner = GameRunner::new(CountingGame::default());
        runner.tick(1.0 / 60.0);
        assert_eq!(runner.game().updates, 0);
    }

    #[test]
    fn input_reaches_only_the_first_tick_of_a_frame() {
        let mut runner = GameRunner::new(CountingGame::default());
        runner.init();
        assert_eq!(runner.body_count(), 1);

        runner.push_input(InputEvent::PointerDown { x: 0.0, y: 0.0 });
        runner.push_input(InputEvent::PointerUp { x: 0.0, y: 0.0 });
        runner.tick(3.0 / 60.0 + 0.001);

        assert_eq!(runner.game().updates, 3);
        assert_eq!(runner.game().pointer_events, 2);
        assert_eq!(runner.ctx().tick(), 3);
        assert_eq!(runner.game_events_len(), 3);
    }

    #[test]
    fn events_are_per_frame() {
        let mut runner = GameRunner::new(CountingGame::default());
        runner.init();
        runner.tick(1.0 / 60.0 + 0.001);
        assert_eq!(runner.game_events_len(), 1);
        runner.tick(0.001);
        assert_eq!(runner.game_events_len(), 0);
    }

    #[test]
    fn load_config_restarts_world() {
        let mut runner = GameRunner::new(CountingGame::default());
        runner.init();
        runner.tick(1.0 / 60.0 + 0.001);
        runner.load_config("{}");
        assert_eq!(runner.ctx().tick(), 0);
        assert_eq!(runner.ctx().scene.len(), 1);
    }
}
