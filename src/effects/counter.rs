use std::time::{Duration, Instant};

const STEPS: u32 = 100;
const DURATION: Duration = Duration::from_millis(2000);

/// A number that counts up from zero to a target in fixed steps.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct CounterAnimation {
    target: u32,
    started_at: Instant,
}

impl CounterAnimation {
    pub(crate) fn new(target: u32, started_at: Instant) -> Self {
        Self { target, started_at }
    }

    /// The value displayed at `now`.
    pub(crate) fn value_at(&self, now: Instant) -> u32 {
        let step = self.step_at(now);
        let value = (step as f64 * self.target as f64 / STEPS as f64).min(self.target as f64);
        value.floor() as u32
    }

    pub(crate) fn is_finished(&self, now: Instant) -> bool {
        self.step_at(now) == STEPS
    }

    fn step_at(&self, now: Instant) -> u32 {
        let step_duration = DURATION / STEPS;
        let elapsed = now.saturating_duration_since(self.started_at);
        let steps = elapsed.as_millis() / step_duration.as_millis();
        steps.min(STEPS as u128) as u32
    }
}
