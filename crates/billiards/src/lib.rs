use wasm_bindgen::prelude::*;
use cue_engine::InputEvent;

pub mod aim;
pub mod bounce;
pub mod config;
pub mod damping;
pub mod events;
pub mod game;
pub mod labels;
pub mod math;
pub mod pocket;
pub mod table;

use game::BilliardsGame;

cue_web::export_game!(BilliardsGame, "billiards");
