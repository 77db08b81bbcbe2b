//! Event codes shared with the host page.

/// Custom input kinds sent by the UI.
pub mod input {
    /// Re-rack the table.
    pub const RESET: u32 = 1;
}

/// `GameEvent::kind` values sent to the UI.
pub mod game {
    /// a = entity id, b = label code.
    pub const BALL_POCKETED: f32 = 1.0;
    /// a, b = impulse, c = magnitude.
    pub const SHOT_TAKEN: f32 = 2.0;
}
