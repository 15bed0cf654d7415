/// Simulated wall time in milliseconds, advanced in fixed steps.
///
/// The scheduler never reads the clock; the driver passes each new
/// timestamp to [`crate::EventScheduler::update_on_time`].
#[derive(Debug, Clone)]
pub struct SimClock {
    now_ms: u64,
    step_ms: u64,
    steps: u64,
}

impl SimClock {
    /// A clock at time 0 advancing `step_ms` per step.
    pub fn new(step_ms: u64) -> Self {
        Self {
            now_ms: 0,
            step_ms,
            steps: 0,
        }
    }

    /// Advance by one step. Returns the new time.
    pub fn advance(&mut self) -> u64 {
        self.now_ms = self.now_ms.saturating_add(self.step_ms);
        self.steps += 1;
        self.now_ms
    }

    /// Current time in milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Milliseconds added per step.
    pub fn step_ms(&self) -> u64 {
        self.step_ms
    }

    /// Steps taken so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }
}
