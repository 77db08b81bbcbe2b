//! Billiards game: one cue ball, a handful of colored balls, four cushions
//! and a pocket. Drag the cue ball and let go to shoot it away from the
//! pointer.

use cue_engine::{
    CollisionFilter, DragControl, EngineContext, Game, GameConfig, InputEvent, InputQueue,
    WorldEvent,
};

use crate::aim::AimController;
use crate::config::TableConfig;
use crate::events;
use crate::labels::{CUE_CATEGORY, TABLE_CATEGORY};
use crate::table::{build_rules, build_table, Rules, Table};

/// World size; the table sits inside it with room to pull the cue ball back.
const WORLD_W: f32 = 1600.0;
const WORLD_H: f32 = 800.0;

pub struct BilliardsGame {
    table_config: TableConfig,
    drag: DragControl,
    table: Option<Table>,
    rules: Option<Rules>,
}

impl BilliardsGame {
    pub fn new() -> Self {
        Self::with_config(TableConfig::default())
    }

    pub fn with_config(table_config: TableConfig) -> Self {
        let drag = Self::drag_control(&table_config);
        Self {
            table_config,
            drag,
            table: None,
            rules: None,
        }
    }

    /// Pointer dragging reaches only the cue ball.
    fn drag_control(config: &TableConfig) -> DragControl {
        DragControl::new(CollisionFilter::new(TABLE_CATEGORY, CUE_CATEGORY))
            .with_stiffness(config.aim.drag_stiffness)
    }

    pub fn table_config(&self) -> &TableConfig {
        &self.table_config
    }

    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    pub fn aim(&self) -> Option<&AimController> {
        self.rules.as_ref().and_then(|r| r.aim())
    }

    pub fn rules(&self) -> Option<&Rules> {
        self.rules.as_ref()
    }

    /// Throw away the current world and rack a fresh table.
    fn reset(&mut self, ctx: &mut EngineContext) {
        log::info!("reset");
        *ctx = EngineContext::from_config(&self.config());
        self.init(ctx);
    }
}

impl Default for BilliardsGame {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for BilliardsGame {
    fn config(&self) -> GameConfig {
        GameConfig {
            world_width: WORLD_W,
            world_height: WORLD_H,
            ..GameConfig::default()
        }
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        self.drag = Self::drag_control(&self.table_config);
        let table = build_table(ctx, &self.table_config);
        self.rules = Some(build_rules(ctx, &self.table_config, &table));
        self.table = Some(table);
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        let mut gestures: Vec<WorldEvent> = Vec::new();
        for event in input.iter() {
            match event {
                InputEvent::Custom { kind, .. } if *kind == events::input::RESET => {
                    self.reset(ctx);
                    gestures.clear();
                }
                InputEvent::Custom { kind, .. } => {
                    log::debug!("ignoring custom event {}", kind);
                }
                _ => {
                    if let Some(gesture) = self.drag.handle(ctx, event) {
                        gestures.push(gesture);
                    }
                }
            }
        }

        if let Some(rules) = self.rules.as_mut() {
            rules.step(ctx, gestures);
        }
    }

    fn load_config(&mut self, json: &str) -> Result<(), serde_json::Error> {
        self.table_config = TableConfig::from_json(json)?;
        Ok(())
    }
}
