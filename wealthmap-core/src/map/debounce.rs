use std::time::{Duration, Instant};

/// Single-flight trailing-edge timer.
///
/// Every trigger replaces the pending deadline, so a burst of events
/// fires once, one quiet window after the last event.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub const fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    pub const fn window(&self) -> Duration {
        self.window
    }

    pub fn trigger(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub const fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns `true` exactly once per burst, when the deadline has passed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(300);

    #[test]
    fn burst_fires_once_after_the_last_event() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(WINDOW);
        for i in 0..10 {
            let now = start + Duration::from_millis(i * 100);
            debouncer.trigger(now);
            assert!(!debouncer.poll(now));
        }
        let last = start + Duration::from_millis(900);
        assert_eq!(Some(last + WINDOW), debouncer.deadline());
        assert!(!debouncer.poll(last + WINDOW - Duration::from_millis(1)));
        assert!(debouncer.poll(last + WINDOW));
        assert!(!debouncer.poll(last + WINDOW * 2));
    }

    #[test]
    fn cancel_drops_the_pending_deadline() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(WINDOW);
        debouncer.trigger(start);
        assert!(debouncer.is_pending());
        debouncer.cancel();
        assert!(!debouncer.is_pending());
        assert!(!debouncer.poll(start + WINDOW));
    }
}
