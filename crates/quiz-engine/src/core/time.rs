/// Splits variable frame time into whole fixed steps.
pub struct FixedTimestep {
    dt: f32,
    /// Frame time not yet consumed by a step.
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
        }
    }

    /// Add a frame's worth of time and return how many steps to run now.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt;
        // At most 10 steps per frame.
        self.accumulator = self.accumulator.min(self.dt * 10.0);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        steps
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }
}

/// Whole-second ticker for countdown clocks.
///
/// Accumulates fixed update deltas and reports how many full seconds have
/// elapsed. The owner decides when the ticker runs; calling `reset` drops any
/// partial second so a stale fraction never carries into a new countdown.
#[derive(Debug, Clone, Default)]
pub struct SecondTicker {
    elapsed: f64,
}

impl SecondTicker {
    pub fn new() -> Self {
        Self { elapsed: 0.0 }
    }

    /// Advance by `dt` seconds. Returns the number of whole seconds crossed.
    pub fn advance(&mut self, dt: f32) -> u32 {
        if dt <= 0.0 {
            return 0;
        }
        // f64 keeps 60 Hz accumulation from drifting below a full second.
        self.elapsed += dt as f64;
        let whole = (self.elapsed + 1e-6).floor();
        self.elapsed = (self.elapsed - whole).max(0.0);
        whole as u32
    }

    /// Drop the partial second.
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    /// Fraction of the current second already elapsed (0.0 to 1.0).
    pub fn fraction(&self) -> f32 {
        self.elapsed as f32
    }
}
