use reef_core::EntityKey;

/// What a scheduled event does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Run the entity's per-kind behavior.
    Activity,
    /// Advance the entity's frame.
    Animation {
        /// Frames left including this one; `0` repeats forever.
        repeat_count: u32,
    },
}

/// One entry in the scheduler's queue.
///
/// Events fire in `(time, sequence)` order. The sequence number is handed
/// out when the event is scheduled, so events due at the same millisecond
/// run in the order they were queued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledEvent {
    /// Simulated time (ms) at which the event fires.
    pub time: u64,
    /// Tie-breaker among events with the same fire time.
    pub sequence: u64,
    /// The entity the event belongs to.
    pub entity: EntityKey,
    /// What to do.
    pub action: Action,
}

impl ScheduledEvent {
    /// The queue slot this event sorts by.
    pub fn slot(&self) -> (u64, u64) {
        (self.time, self.sequence)
    }
}
