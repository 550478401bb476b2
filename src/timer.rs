use std::time::{Duration, Instant};

/// Elapsed-time gate for the telemetry path.
pub struct RenderGate {
    interval: Duration,
    last: Instant,
}

impl RenderGate {
    pub fn new(interval: Duration, now: Instant) -> Self {
        RenderGate { interval, last: now }
    }

    /// True once the interval has elapsed since the last firing, then rearms.
    pub fn ready(&mut self, now: Instant) -> bool {
        if now.duration_since(self.last) >= self.interval {
            self.last = now;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_at_most_once_per_interval() {
        let base = Instant::now();
        let mut gate = RenderGate::new(Duration::from_millis(2000), base);

        assert!(!gate.ready(base));
        assert!(!gate.ready(base + Duration::from_millis(1999)));
        assert!(gate.ready(base + Duration::from_millis(2000)));

        // Rearmed: nothing until another full interval has passed.
        assert!(!gate.ready(base + Duration::from_millis(2100)));
        assert!(!gate.ready(base + Duration::from_millis(3999)));
        assert!(gate.ready(base + Duration::from_millis(4000)));
    }

    #[test]
    fn slow_iterations_still_fire() {
        let base = Instant::now();
        let mut gate = RenderGate::new(Duration::from_millis(2000), base);

        assert!(gate.ready(base + Duration::from_millis(7500)));
        assert!(!gate.ready(base + Duration::from_millis(7600)));
    }
}
