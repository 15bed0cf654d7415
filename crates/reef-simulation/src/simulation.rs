use rand::SeedableRng;
use rand::rngs::StdRng;
use reef_core::{EntityKey, EntityKind, ImageStore, WorldModel};

use crate::clock::SimClock;
use crate::config::{BehaviorTuning, SimConfig};
use crate::context::SimContext;
use crate::error::SimResult;
use crate::event::EventLog;
use crate::scheduler::EventScheduler;

/// The top-level simulation orchestrator.
///
/// Owns the world, scheduler, clock, RNG and event log, and lends them to
/// behaviors one drain at a time.
pub struct Simulation {
    world: WorldModel,
    images: ImageStore,
    scheduler: EventScheduler,
    clock: SimClock,
    rng: StdRng,
    events: EventLog,
    tuning: BehaviorTuning,
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("now_ms", &self.clock.now_ms())
            .field("entities", &self.world.len())
            .field("queued", &self.scheduler.len())
            .field("events", &self.events.len())
            .finish()
    }
}

impl Simulation {
    /// Create a simulation over `world`. Nothing is scheduled until
    /// [`Self::arm_all`] runs.
    ///
    /// # Errors
    ///
    /// Rejects configurations that fail [`SimConfig::validate`].
    pub fn new(world: WorldModel, images: ImageStore, config: SimConfig) -> SimResult<Self> {
        config.validate()?;
        Ok(Self {
            world,
            images,
            scheduler: EventScheduler::new(config.time_scale),
            clock: SimClock::new(config.step_ms),
            rng: StdRng::seed_from_u64(config.seed),
            events: EventLog::new(config.max_events),
            tuning: config.tuning,
        })
    }

    /// Arm every live entity. Goal sites are left dormant until a full
    /// collector arrives. Returns the number of entities armed.
    pub fn arm_all(&mut self) -> SimResult<usize> {
        let keys: Vec<EntityKey> = self
            .world
            .entities()
            .filter(|(_, e)| e.kind() != EntityKind::Atlantis)
            .map(|(key, _)| key)
            .collect();

        let ctx = SimContext {
            world: &mut self.world,
            images: &self.images,
            events: &mut self.events,
            rng: &mut self.rng,
            tuning: &self.tuning,
            time: self.scheduler.now(),
        };
        for &key in &keys {
            self.scheduler.schedule_actions(&ctx, key)?;
        }
        tracing::info!(armed = keys.len(), queued = self.scheduler.len(), "entities armed");
        Ok(keys.len())
    }

    /// Run every event due before `time`. Returns how many ran.
    pub fn update_on_time(&mut self, time: u64) -> SimResult<usize> {
        let mut ctx = SimContext {
            world: &mut self.world,
            images: &self.images,
            events: &mut self.events,
            rng: &mut self.rng,
            tuning: &self.tuning,
            time,
        };
        self.scheduler.update_on_time(time, &mut ctx)
    }

    /// Advance the clock by one step and drain up to the new time.
    pub fn step(&mut self) -> SimResult<usize> {
        let now = self.clock.advance();
        self.update_on_time(now)
    }

    /// Take `steps` clock steps. Returns the total number of events run.
    pub fn run(&mut self, steps: u64) -> SimResult<usize> {
        let mut dispatched = 0;
        for _ in 0..steps {
            dispatched += self.step()?;
        }
        tracing::debug!(steps, dispatched, now_ms = self.clock.now_ms(), "run finished");
        Ok(dispatched)
    }

    /// The world being simulated.
    pub fn world(&self) -> &WorldModel {
        &self.world
    }

    /// Mutable access to the world, e.g. to place entities before arming.
    pub fn world_mut(&mut self) -> &mut WorldModel {
        &mut self.world
    }

    /// The event queue.
    pub fn scheduler(&self) -> &EventScheduler {
        &self.scheduler
    }

    /// The narrative log.
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// The stepping clock.
    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// Extract the world, consuming the simulation.
    pub fn into_world(self) -> WorldModel {
        self.world
    }
}
