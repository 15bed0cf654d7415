use rand::rngs::StdRng;
use reef_core::{ImageStore, WorldModel};

use crate::config::BehaviorTuning;
use crate::event::{EventLog, SimEvent, SimEventKind};

/// Mutable context lent to behaviors while the scheduler drains its queue.
pub struct SimContext<'a> {
    /// The world being simulated.
    pub world: &'a mut WorldModel,
    /// Frames for entities created mid-run.
    pub images: &'a ImageStore,
    /// Narrative log.
    pub events: &'a mut EventLog,
    /// The run's seeded random source.
    pub rng: &'a mut StdRng,
    /// Behavior constants.
    pub tuning: &'a BehaviorTuning,
    /// Simulated time (ms) of the drain in progress.
    pub time: u64,
}

impl SimContext<'_> {
    /// Emit a simulation event at the current time.
    pub fn emit(&mut self, kind: SimEventKind, description: impl Into<String>) {
        self.events.push(SimEvent::new(self.time, kind, description));
    }
}
