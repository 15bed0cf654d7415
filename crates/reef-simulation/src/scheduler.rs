use std::collections::{BTreeMap, HashMap};

use reef_core::{EntityKey, EntityKind};

use crate::action::{Action, ScheduledEvent};
use crate::behavior;
use crate::context::SimContext;
use crate::error::SimResult;

type Slot = (u64, u64);

/// Time-ordered queue of pending actions with per-entity cancellation.
///
/// Every queued event is also listed under its entity in the pending index,
/// so all of an entity's events can be withdrawn when it leaves the world.
#[derive(Debug, Clone)]
pub struct EventScheduler {
    queue: BTreeMap<Slot, ScheduledEvent>,
    pending: HashMap<EntityKey, Vec<Slot>>,
    time_scale: f64,
    now: u64,
    next_sequence: u64,
}

impl Default for EventScheduler {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl EventScheduler {
    /// An empty scheduler at time 0. Delays are multiplied by `time_scale`.
    pub fn new(time_scale: f64) -> Self {
        Self {
            queue: BTreeMap::new(),
            pending: HashMap::new(),
            time_scale,
            now: 0,
            next_sequence: 0,
        }
    }

    /// Latest time passed to [`Self::update_on_time`].
    pub fn now(&self) -> u64 {
        self.now
    }

    /// The delay multiplier.
    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Number of queued events.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// True when nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of queued events belonging to `key`.
    pub fn pending_count(&self, key: EntityKey) -> usize {
        self.pending.get(&key).map_or(0, Vec::len)
    }

    /// Fire time of the earliest queued event.
    pub fn next_fire_time(&self) -> Option<u64> {
        self.queue.first_key_value().map(|(&(time, _), _)| time)
    }

    /// Queued events in firing order.
    pub fn queued(&self) -> impl Iterator<Item = &ScheduledEvent> {
        self.queue.values()
    }

    /// Queue `action` for `key`, firing `after` milliseconds (scaled) from now.
    /// Returns the fire time.
    pub fn schedule_event(&mut self, key: EntityKey, action: Action, after: u64) -> u64 {
        let delay = (after as f64 * self.time_scale).round() as u64;
        let time = self.now.saturating_add(delay);
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        let event = ScheduledEvent {
            time,
            sequence,
            entity: key,
            action,
        };
        self.queue.insert(event.slot(), event);
        self.pending.entry(key).or_default().push((time, sequence));
        time
    }

    /// Arm a freshly placed entity: its recurring activity, if its kind has
    /// one, and its animation, if its kind animates.
    ///
    /// Crabs and collectors animate forever; quakes and goal sites play a
    /// fixed number of frames. Removed entities are ignored.
    pub fn schedule_actions(&mut self, ctx: &SimContext<'_>, key: EntityKey) -> SimResult<()> {
        let Some(entity) = ctx.world.entity(key) else {
            return Ok(());
        };
        let kind = entity.kind();
        if kind.has_activity() {
            self.schedule_event(key, Action::Activity, entity.action_period());
        }
        if kind.animates() {
            let repeat_count = match kind {
                EntityKind::Quake => ctx.tuning.quake_repeat_count,
                EntityKind::Atlantis => ctx.tuning.atlantis_repeat_count,
                _ => 0,
            };
            let period = entity.animation_period()?;
            self.schedule_event(key, Action::Animation { repeat_count }, period);
        }
        Ok(())
    }

    /// Withdraw every queued event of `key`. Returns how many were removed.
    pub fn unschedule_all_events(&mut self, key: EntityKey) -> usize {
        let Some(slots) = self.pending.remove(&key) else {
            return 0;
        };
        for slot in &slots {
            self.queue.remove(slot);
        }
        slots.len()
    }

    /// Take the earliest event due strictly before `time`, dropping it from
    /// its entity's pending list.
    pub fn pop_due(&mut self, time: u64) -> Option<ScheduledEvent> {
        let (_, event) = self.queue.first_key_value()?;
        if event.time >= time {
            return None;
        }
        let (slot, event) = self.queue.pop_first()?;
        if let Some(slots) = self.pending.get_mut(&event.entity) {
            slots.retain(|s| *s != slot);
            if slots.is_empty() {
                self.pending.remove(&event.entity);
            }
        }
        Some(event)
    }

    /// Advance to `time` and run every event due before it, in order.
    ///
    /// Events queued while draining are scheduled from the new time and so
    /// wait for a later call. Returns the number of events dispatched.
    ///
    /// # Errors
    ///
    /// Stops at the first behavior that fails; events already run stay run.
    pub fn update_on_time(&mut self, time: u64, ctx: &mut SimContext<'_>) -> SimResult<usize> {
        self.now = self.now.max(time);
        ctx.time = self.now;

        let mut dispatched = 0;
        while let Some(event) = self.pop_due(time) {
            tracing::debug!(time = event.time, action = ?event.action, "dispatch");
            behavior::dispatch(self, ctx, &event)?;
            dispatched += 1;
        }
        Ok(dispatched)
    }
}
