//! Discrete-event simulation for Reef.
//!
//! Entities living in a [`reef_core::WorldModel`] are driven by an
//! [`EventScheduler`]: a time-ordered queue of activity and animation events.
//! Draining the queue dispatches each event on its action and then on the
//! entity's kind; behaviors move, consume, spawn and transform entities and
//! re-arm themselves through the same scheduler.

/// Scheduled actions and queue entries.
pub mod action;
/// Per-kind activities, animation ticks, and movement rules.
pub mod behavior;
/// Millisecond clock that drives the scheduler.
pub mod clock;
/// Configuration types for simulation runs.
pub mod config;
/// Mutable context lent to behaviors during a drain.
pub mod context;
/// Error types for the simulation crate.
pub mod error;
/// Narrative event types and the event log.
pub mod event;
/// The time-ordered event queue with per-entity cancellation.
pub mod scheduler;
/// Top-level simulation orchestrator.
pub mod simulation;
/// Kind changes between the two collector states.
pub mod transform;

/// Re-exports of [`action::Action`] and [`action::ScheduledEvent`].
pub use action::{Action, ScheduledEvent};
/// Re-export of [`clock::SimClock`].
pub use clock::SimClock;
/// Re-exports of [`config::SimConfig`] and [`config::BehaviorTuning`].
pub use config::{BehaviorTuning, SimConfig};
/// Re-export of [`context::SimContext`].
pub use context::SimContext;
/// Re-exports of [`error::SimError`] and [`error::SimResult`].
pub use error::{SimError, SimResult};
/// Re-exports of [`event::EventLog`], [`event::SimEvent`], and [`event::SimEventKind`].
pub use event::{EventLog, SimEvent, SimEventKind};
/// Re-export of [`scheduler::EventScheduler`].
pub use scheduler::EventScheduler;
/// Re-export of [`simulation::Simulation`].
pub use simulation::Simulation;
