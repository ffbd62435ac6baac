use std::{
    mem,
    time::{Duration, Instant},
};

#[derive(Debug)]
struct ScheduledTask<T> {
    due: Instant,
    sequence: u64,
    action: T,
}

/// One shot tasks that become due after a delay.
///
/// Tasks can't be cancelled: once scheduled they always come out of [Scheduler::drain_due]
/// eventually, even if whatever scheduled them is no longer relevant.
#[derive(Debug)]
pub(crate) struct Scheduler<T> {
    tasks: Vec<ScheduledTask<T>>,
    next_sequence: u64,
}

impl<T> Scheduler<T> {
    pub(crate) fn schedule(&mut self, now: Instant, delay: Duration, action: T) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.tasks.push(ScheduledTask { due: now + delay, sequence, action });
    }

    /// Take every task that's due at `now`, earliest first.
    ///
    /// Tasks due at the same instant come out in the order they were scheduled.
    pub(crate) fn drain_due(&mut self, now: Instant) -> Vec<T> {
        let (mut due, pending): (Vec<_>, Vec<_>) = mem::take(&mut self.tasks).into_iter().partition(|t| t.due <= now);
        self.tasks = pending;
        due.sort_by_key(|task| (task.due, task.sequence));
        due.into_iter().map(|task| task.action).collect()
    }

    pub(crate) fn pending(&self) -> usize {
        self.tasks.len()
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self { tasks: Vec::new(), next_sequence: 0 }
    }
}
