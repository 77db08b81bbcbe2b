/// Fixed timestep accumulator.
/// Turns variable frame times into a whole number of simulation ticks, and
/// converts wall-clock delays into tick deadlines so the rules never depend
/// on host timers.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    dt: f32,
    accumulator: f32,
    /// Upper bound on ticks per frame (spiral-of-death guard).
    max_steps: u32,
}

impl FixedTimestep {
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
            max_steps: 10,
        }
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.max(0.0);
        self.accumulator = self.accumulator.min(self.dt * self.max_steps as f32);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        steps
    }

    /// The fixed delta time.
    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Number of whole ticks covering `seconds` (rounded up, at least 1 for
    /// any positive delay).
    pub fn ticks_for(&self, seconds: f32) -> u64 {
        ticks_for(seconds, self.dt)
    }
}

/// Number of ticks of length `dt` needed to cover `seconds`.
pub fn ticks_for(seconds: f32, dt: f32) -> u64 {
    if seconds <= 0.0 || dt <= 0.0 {
        return 0;
    }
    // Trim float noise so exact multiples do not round up an extra tick.
    let ticks = seconds / dt;
    (ticks - 1e-4).ceil().max(1.0) as u64
}
