//! Trailing-edge debouncing for text and slider input
//!
//! Polled from the UI loop: `push` records the latest input and restarts the
//! quiet interval, `take_ready` hands it out once the interval has elapsed.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    quiet: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
        }
    }

    pub fn push(&mut self, value: T) {
        self.push_at(value, Instant::now());
    }

    /// Replaces any pending value and restarts the quiet interval at `now`.
    pub fn push_at(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now));
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref().map(|(value, _)| value)
    }

    /// Returns the latest value once it has been quiet for the full interval.
    pub fn take_ready(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, since)) if now.saturating_duration_since(*since) >= self.quiet => {
                self.pending.take().map(|(value, _)| value)
            }
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_after_quiet_interval() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(500));
        debouncer.push_at("h", start);
        assert_eq!(debouncer.take_ready(start + Duration::from_millis(499)), None);
        assert_eq!(debouncer.take_ready(start + Duration::from_millis(500)), Some("h"));
        assert!(!debouncer.is_pending());
    }

    #[test]
    /// Every push restarts the timer and only the last value is delivered.
    fn test_push_resets_timer() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(500));
        debouncer.push_at("h", start);
        debouncer.push_at("ho", start + Duration::from_millis(300));
        debouncer.push_at("hop", start + Duration::from_millis(600));
        assert_eq!(debouncer.take_ready(start + Duration::from_millis(900)), None);
        assert_eq!(debouncer.pending(), Some(&"hop"));
        assert_eq!(
            debouncer.take_ready(start + Duration::from_millis(1100)),
            Some("hop")
        );
        assert_eq!(debouncer.take_ready(start + Duration::from_secs(5)), None);
    }

    #[test]
    fn test_cancel_drops_pending() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(10));
        debouncer.push_at(1, start);
        debouncer.cancel();
        assert_eq!(debouncer.take_ready(start + Duration::from_secs(1)), None);
    }
}
