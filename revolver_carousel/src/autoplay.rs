// Copyright 2025 the Revolver Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Repeating autoplay timer.

/// A repeating timer driven by caller-supplied timestamps.
///
/// The timer never fires on its own: the owner calls [`poll`](Self::poll)
/// from its frame tick. Periods missed between two polls are coalesced into
/// a single fire.
///
/// ```rust
/// use revolver_carousel::AutoplayTimer;
///
/// let mut timer = AutoplayTimer::new(3_000);
/// timer.schedule(0);
/// assert!(!timer.poll(2_999));
/// assert!(timer.poll(3_000));
/// // Three more periods elapsed; they fire once.
/// assert!(timer.poll(12_500));
/// assert!(!timer.poll(14_000));
/// assert!(timer.poll(15_000));
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct AutoplayTimer {
    interval_ms: u64,
    next_fire_ms: Option<u64>,
}

impl AutoplayTimer {
    /// Creates an unscheduled timer. An interval of `0` disables it.
    #[must_use]
    pub const fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            next_fire_ms: None,
        }
    }

    /// The configured interval in milliseconds.
    #[must_use]
    pub const fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// Whether a non-zero interval is configured.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.interval_ms > 0
    }

    /// Whether the timer is armed.
    #[must_use]
    pub const fn is_scheduled(&self) -> bool {
        self.next_fire_ms.is_some()
    }

    /// When the timer fires next, if armed.
    #[must_use]
    pub const fn next_fire_ms(&self) -> Option<u64> {
        self.next_fire_ms
    }

    /// Changes the interval and disarms the timer.
    pub fn set_interval(&mut self, interval_ms: u64) {
        self.interval_ms = interval_ms;
        self.next_fire_ms = None;
    }

    /// Arms the timer to fire one interval after `now_ms`, replacing any pending fire.
    ///
    /// Does nothing while disabled.
    pub fn schedule(&mut self, now_ms: u64) {
        self.next_fire_ms = self
            .is_enabled()
            .then(|| now_ms.saturating_add(self.interval_ms));
    }

    /// Disarms the timer.
    pub fn cancel(&mut self) {
        self.next_fire_ms = None;
    }

    /// Returns `true` if the timer fired at `now_ms`, and re-arms it for the next period.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        let Some(due) = self.next_fire_ms else {
            return false;
        };
        if now_ms < due || self.interval_ms == 0 {
            return false;
        }
        let missed = (now_ms - due) / self.interval_ms;
        self.next_fire_ms = Some(
            due.saturating_add((missed + 1).saturating_mul(self.interval_ms)),
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_timer_never_arms() {
        let mut timer = AutoplayTimer::new(0);
        timer.schedule(10);
        assert!(!timer.is_scheduled());
        assert!(!timer.poll(u64::MAX));
    }

    #[test]
    fn schedule_replaces_the_pending_fire() {
        let mut timer = AutoplayTimer::new(1_000);
        timer.schedule(0);
        timer.schedule(500);
        assert!(!timer.poll(1_000));
        assert!(timer.poll(1_500));
        assert_eq!(timer.next_fire_ms(), Some(2_500));
    }

    #[test]
    fn cancel_and_interval_changes_disarm() {
        let mut timer = AutoplayTimer::new(1_000);
        timer.schedule(0);
        timer.cancel();
        assert!(!timer.poll(5_000));
        timer.schedule(0);
        timer.set_interval(2_000);
        assert!(!timer.is_scheduled());
    }
}
