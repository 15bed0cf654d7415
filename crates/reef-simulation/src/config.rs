use std::ops::Range;

use crate::error::{SimError, SimResult};

/// Numbers that shape the per-kind behaviors.
#[derive(Debug, Clone, PartialEq)]
pub struct BehaviorTuning {
    /// Action period (ms) drawn for each newly spawned fish.
    pub fish_lifespan: Range<u64>,
    /// A crab acts this many times faster than the fish it grew from.
    pub crab_period_scale: u64,
    /// Animation period (ms) drawn for each new crab.
    pub crab_animation: Range<u64>,
    /// Delay (ms) before a quake subsides.
    pub quake_action_period: u64,
    /// Delay (ms) between quake frames.
    pub quake_animation_period: u64,
    /// Frames a quake plays before its animation stops.
    pub quake_repeat_count: u32,
    /// Frames a goal site plays before it sinks.
    pub atlantis_repeat_count: u32,
}

impl Default for BehaviorTuning {
    fn default() -> Self {
        Self {
            fish_lifespan: 20_000..30_000,
            crab_period_scale: 4,
            crab_animation: 50..150,
            quake_action_period: 1_100,
            quake_animation_period: 100,
            quake_repeat_count: 10,
            atlantis_repeat_count: 7,
        }
    }
}

/// Configuration for a simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// RNG seed for deterministic simulation.
    pub seed: u64,
    /// Multiplier applied to every delay before it is added to the current time.
    pub time_scale: f64,
    /// Milliseconds the clock advances per step.
    pub step_ms: u64,
    /// Maximum event log size (oldest events dropped when exceeded). 0 = unlimited.
    pub max_events: usize,
    /// Behavior constants.
    pub tuning: BehaviorTuning,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            time_scale: 1.0,
            step_ms: 100,
            max_events: 0,
            tuning: BehaviorTuning::default(),
        }
    }
}

impl SimConfig {
    /// Set the RNG seed for deterministic simulation.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the delay multiplier.
    pub fn with_time_scale(mut self, time_scale: f64) -> Self {
        self.time_scale = time_scale;
        self
    }

    /// Set the clock step.
    pub fn with_step_ms(mut self, step_ms: u64) -> Self {
        self.step_ms = step_ms;
        self
    }

    /// Set the maximum event log size (0 = unlimited).
    pub fn with_max_events(mut self, max: usize) -> Self {
        self.max_events = max;
        self
    }

    /// Replace the behavior constants.
    pub fn with_tuning(mut self, tuning: BehaviorTuning) -> Self {
        self.tuning = tuning;
        self
    }

    /// Check that every value is usable.
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidConfig`] naming the first bad value.
    pub fn validate(&self) -> SimResult<()> {
        if !self.time_scale.is_finite() || self.time_scale < 0.0 {
            return Err(SimError::InvalidConfig(format!(
                "time scale must be a non-negative number, got {}",
                self.time_scale
            )));
        }
        if self.step_ms == 0 {
            return Err(invalid("step must be at least 1 ms"));
        }
        let tuning = &self.tuning;
        if tuning.fish_lifespan.is_empty() {
            return Err(invalid("fish lifespan range is empty"));
        }
        if tuning.crab_animation.is_empty() {
            return Err(invalid("crab animation range is empty"));
        }
        if tuning.crab_period_scale == 0 {
            return Err(invalid("crab period scale must be at least 1"));
        }
        Ok(())
    }
}

fn invalid(message: &str) -> SimError {
    SimError::InvalidConfig(message.to_string())
}
