//! Cancellable delayed actions on a deterministic clock.
//!
//! The scheduler never runs callbacks itself. The owner advances it once per
//! tick and then drains due timers one at a time with [`Scheduler::pop_due`],
//! reacting to each handle. While a timer is being handled the clock reads
//! its due time, so re-arming from inside a firing keeps a steady cadence
//! even when a single tick spans several intervals.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone, Copy)]
struct Pending {
    handle: TimerHandle,
    due: Duration,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    /// Time of the timer being handled, or `horizon` once drained.
    now: Duration,
    /// How far the owner has advanced the clock.
    horizon: Duration,
    next_id: u64,
    pending: Vec<Pending>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn schedule(&mut self, delay: Duration) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending {
            handle,
            due: self.now + delay,
        });
        handle
    }

    /// Cancel a pending timer. Returns `false` when the handle already fired,
    /// was already cancelled, or never existed; that is not an error.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.handle != handle);
        self.pending.len() != before
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|p| p.handle == handle)
    }

    pub fn advance(&mut self, dt: Duration) {
        self.horizon += dt;
    }

    /// Remove and return the earliest timer due by the horizon. Timers due at
    /// the same instant fire in scheduling order.
    pub fn pop_due(&mut self) -> Option<TimerHandle> {
        let next = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due <= self.horizon)
            .min_by_key(|(_, p)| (p.due, p.handle))
            .map(|(i, _)| i);

        match next {
            Some(i) => {
                let fired = self.pending.remove(i);
                self.now = fired.due;
                Some(fired.handle)
            }
            None => {
                self.now = self.horizon;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn fires_only_once_due() {
        let mut scheduler = Scheduler::new();
        let handle = scheduler.schedule(75 * MS);

        scheduler.advance(50 * MS);
        assert_eq!(scheduler.pop_due(), None);
        assert_eq!(scheduler.now(), 50 * MS);

        scheduler.advance(25 * MS);
        assert_eq!(scheduler.pop_due(), Some(handle));
        assert_eq!(scheduler.pop_due(), None);
        assert!(!scheduler.is_pending(handle));
    }

    #[test]
    fn rearm_inside_firing_keeps_cadence() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(75 * MS);
        scheduler.advance(200 * MS);

        let mut fired_at = Vec::new();
        while scheduler.pop_due().is_some() {
            fired_at.push(scheduler.now());
            scheduler.schedule(75 * MS);
        }
        assert_eq!(fired_at, vec![75 * MS, 150 * MS]);
        assert_eq!(scheduler.now(), 200 * MS);
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut scheduler = Scheduler::new();
        let handle = scheduler.schedule(10 * MS);
        assert!(scheduler.cancel(handle));
        assert!(!scheduler.cancel(handle));

        scheduler.advance(20 * MS);
        assert_eq!(scheduler.pop_due(), None);
    }

    #[test]
    fn cancel_after_fire_is_a_no_op() {
        let mut scheduler = Scheduler::new();
        let fired = scheduler.schedule(10 * MS);
        let other = scheduler.schedule(30 * MS);
        scheduler.advance(10 * MS);
        assert_eq!(scheduler.pop_due(), Some(fired));
        assert!(!scheduler.cancel(fired));
        assert!(scheduler.is_pending(other));
    }

    #[test]
    fn simultaneous_timers_fire_in_schedule_order() {
        let mut scheduler = Scheduler::new();
        let a = scheduler.schedule(5 * MS);
        let b = scheduler.schedule(5 * MS);
        scheduler.advance(5 * MS);
        assert_eq!(scheduler.pop_due(), Some(a));
        assert_eq!(scheduler.pop_due(), Some(b));
    }
}
