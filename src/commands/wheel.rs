use super::listener::Command;
use std::time::{Duration, Instant};

pub(crate) const DEFAULT_WHEEL_COOLDOWN: Duration = Duration::from_millis(800);

/// Coalesces bursts of wheel events into a single navigation.
///
/// The first event locks the wheel for a fixed cooldown that starts at that event. Events that
/// arrive while locked are dropped and do not extend the cooldown.
#[derive(Debug)]
pub(crate) struct WheelDebouncer {
    cooldown: Duration,
    locked_at: Option<Instant>,
}

impl WheelDebouncer {
    pub(crate) fn new(cooldown: Duration) -> Self {
        Self { cooldown, locked_at: None }
    }

    pub(crate) fn on_wheel(&mut self, delta_y: f64, now: Instant) -> Option<Command> {
        if self.is_locked(now) {
            return None;
        }
        self.locked_at = Some(now);
        if delta_y > 0.0 { Some(Command::Next) } else { Some(Command::Previous) }
    }

    pub(crate) fn is_locked(&self, now: Instant) -> bool {
        match self.locked_at {
            Some(locked_at) => now.saturating_duration_since(locked_at) < self.cooldown,
            None => false,
        }
    }
}

impl Default for WheelDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_WHEEL_COOLDOWN)
    }
}
