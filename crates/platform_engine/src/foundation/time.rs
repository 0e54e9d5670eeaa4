//! Time management utilities

/// Simulation clock with an explicit time scale
///
/// Every tick's raw frame delta is multiplied by the current scale before any
/// system sees it. Each simulation owns its clock, so slow-motion in one world
/// never leaks into another.
#[derive(Debug, Clone)]
pub struct SimulationClock {
    time_scale: f32,
    delta_time: f32,
    total_time: f32,
    tick_count: u64,
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationClock {
    /// Create a new clock running at normal speed
    pub fn new() -> Self {
        Self {
            time_scale: 1.0,
            delta_time: 0.0,
            total_time: 0.0,
            tick_count: 0,
        }
    }

    /// Advance by a raw frame delta, returning the scaled delta for this tick
    pub fn advance(&mut self, raw_delta: f32) -> f32 {
        self.delta_time = raw_delta.max(0.0) * self.time_scale;
        self.total_time += self.delta_time;
        self.tick_count += 1;
        self.delta_time
    }

    /// Current time scale (1.0 is normal speed)
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Set the time scale applied from the next tick on
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    /// Restore normal speed
    pub fn reset_time_scale(&mut self) {
        self.time_scale = 1.0;
    }

    /// Scaled delta of the last tick in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Total scaled time since the clock was created
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Number of ticks advanced
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}
