//! Quiet-period debouncer
//!
//! The debouncer holds at most one pending value and a deadline. Every
//! `schedule` replaces the pending value and pushes the deadline out; `poll`
//! hands the value back once the deadline has passed. The clock is always
//! passed in, so the GUI feeds it `Instant::now()` each frame and tests feed it
//! synthetic instants.

use std::time::{Duration, Instant};

/// Delays a value until `delay` has elapsed without another `schedule`
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: None }
    }

    /// Replace any pending value and restart the quiet period at `now`
    pub fn schedule(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.delay));
    }

    /// Take the pending value if its quiet period has elapsed
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, deadline)) if now >= *deadline => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(300);

    #[test]
    fn fires_once_after_quiet_period() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(DELAY);
        d.schedule("cats", t0);

        assert_eq!(d.poll(t0 + Duration::from_millis(299)), None);
        assert_eq!(d.poll(t0 + DELAY), Some("cats"));
        assert_eq!(d.poll(t0 + DELAY * 2), None);
        assert!(!d.is_pending());
    }

    #[test]
    fn rescheduling_restarts_the_window_and_keeps_latest() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(DELAY);
        d.schedule("c", t0);
        d.schedule("ca", t0 + Duration::from_millis(200));
        d.schedule("cat", t0 + Duration::from_millis(400));

        assert_eq!(d.poll(t0 + Duration::from_millis(650)), None);
        assert_eq!(d.deadline(), Some(t0 + Duration::from_millis(700)));
        assert_eq!(d.poll(t0 + Duration::from_millis(700)), Some("cat"));
    }

    #[test]
    fn deadline_clears_once_fired() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(DELAY);
        d.schedule(1, t0);
        assert_eq!(d.poll(t0 + DELAY), Some(1));
        assert_eq!(d.deadline(), None);
    }
}
