use reef_core::Point;
use reef_core::entity::QUAKE_ID;
use serde::Serialize;

/// What kind of simulation event occurred. Entities are named by their
/// textual id, which survives kind changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimEventKind {
    // Sea grass and fish
    /// Sea grass spawned a fish next to itself.
    FishSpawned {
        /// The new fish.
        fish: String,
        /// The sea grass it came from.
        sea_grass: String,
        /// Where the fish appeared.
        at: Point,
    },
    /// A fish reached the end of its life and became a crab.
    FishMatured {
        /// The fish that matured.
        fish: String,
        /// The crab that replaced it.
        crab: String,
        /// Where it happened.
        at: Point,
    },

    // Crabs and quakes
    /// A crab reached sea grass and consumed it.
    SeaGrassDevoured {
        /// The crab.
        crab: String,
        /// The sea grass that was consumed.
        sea_grass: String,
        /// Where the sea grass stood.
        at: Point,
    },
    /// A quake appeared.
    QuakeStarted {
        /// Where the quake is.
        at: Point,
    },
    /// A quake ran its course and vanished.
    QuakeSubsided {
        /// Where the quake was.
        at: Point,
    },

    // Collectors
    /// A collector caught a fish.
    FishCaught {
        /// The collector.
        octo: String,
        /// The fish it caught.
        fish: String,
        /// The collector's resource count after the catch.
        count: u32,
    },
    /// A collector reached its resource limit.
    OctoFilled {
        /// The collector.
        octo: String,
    },
    /// A full collector reached a goal site and emptied its load.
    OctoUnloaded {
        /// The collector.
        octo: String,
        /// The goal site.
        atlantis: String,
    },
    /// A goal site finished its animation and left the world.
    AtlantisSank {
        /// The goal site.
        atlantis: String,
        /// Where it stood.
        at: Point,
    },

    // Movement
    /// A moving entity stepped onto an occupied cell and removed the occupant.
    EntityDisplaced {
        /// The entity that was removed.
        entity: String,
        /// The entity that moved in.
        by: String,
        /// The contested cell.
        at: Point,
    },
}

impl SimEventKind {
    /// Check whether the entity with the given id is involved in this event.
    pub fn involves(&self, id: &str) -> bool {
        match self {
            Self::FishSpawned { fish, sea_grass, .. } => fish == id || sea_grass == id,
            Self::FishMatured { fish, crab, .. } => fish == id || crab == id,
            Self::SeaGrassDevoured { crab, sea_grass, .. } => crab == id || sea_grass == id,
            Self::QuakeStarted { .. } | Self::QuakeSubsided { .. } => id == QUAKE_ID,
            Self::FishCaught { octo, fish, .. } => octo == id || fish == id,
            Self::OctoFilled { octo } => octo == id,
            Self::OctoUnloaded { octo, atlantis } => octo == id || atlantis == id,
            Self::AtlantisSank { atlantis, .. } => atlantis == id,
            Self::EntityDisplaced { entity, by, .. } => entity == id || by == id,
        }
    }
}

/// A record of something that happened during simulation.
#[derive(Debug, Clone, Serialize)]
pub struct SimEvent {
    /// Simulated time (ms) at which the event occurred.
    pub time: u64,
    /// The specific kind of event that occurred.
    pub kind: SimEventKind,
    /// A human-readable description of the event.
    pub description: String,
}

impl SimEvent {
    /// Create a new simulation event with the given time, kind, and description.
    pub fn new(time: u64, kind: SimEventKind, description: impl Into<String>) -> Self {
        Self {
            time,
            kind,
            description: description.into(),
        }
    }
}

/// Accumulates events during a simulation run.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<SimEvent>,
    max_events: usize,
}

impl EventLog {
    /// Create a new event log with the given maximum capacity (0 = unlimited).
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Vec::new(),
            max_events,
        }
    }

    /// Append an event, dropping the oldest events if the log exceeds its capacity.
    pub fn push(&mut self, event: SimEvent) {
        self.events.push(event);
        if self.max_events > 0 && self.events.len() > self.max_events {
            let excess = self.events.len() - self.max_events;
            self.events.drain(..excess);
        }
    }

    /// All recorded events, oldest first.
    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    /// Events recorded at exactly `time`.
    pub fn events_at(&self, time: u64) -> Vec<&SimEvent> {
        self.events.iter().filter(|e| e.time == time).collect()
    }

    /// Events involving the entity with the given id.
    pub fn events_for_entity(&self, id: &str) -> Vec<&SimEvent> {
        self.events.iter().filter(|e| e.kind.involves(id)).collect()
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Return `true` if no events have been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Remove all recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}
