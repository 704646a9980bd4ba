use std::time::Duration;

/// Countdown for one round, driven by a session clock.
///
/// Time is passed in as the offset since the session started so the engine
/// can be stepped with a synthetic clock.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoundTimer {
    started_at: Duration,
    limit_secs: f64,
}

impl RoundTimer {
    pub fn new(limit_secs: f64) -> Self {
        Self {
            started_at: Duration::ZERO,
            limit_secs,
        }
    }

    pub fn restart(&mut self, now: Duration) {
        self.started_at = now;
    }

    /// Seconds left; negative once the limit has passed.
    pub fn remaining(&self, now: Duration) -> f64 {
        let elapsed = now.saturating_sub(self.started_at).as_secs_f64();
        self.limit_secs - elapsed
    }

    /// The round is over once no time is left.
    pub fn expired(&self, now: Duration) -> bool {
        self.remaining(now) <= 0.0
    }

    pub fn limit_secs(&self) -> f64 {
        self.limit_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn counts_down_from_restart() {
        let mut t = RoundTimer::new(30.0);
        t.restart(Duration::from_secs(5));
        assert_abs_diff_eq!(t.remaining(Duration::from_secs(5)), 30.0);
        assert_abs_diff_eq!(t.remaining(Duration::from_millis(15_500)), 19.5);
        assert!(!t.expired(Duration::from_millis(34_999)));
        assert!(t.expired(Duration::from_secs(35)));
        assert!(t.remaining(Duration::from_secs(40)) < 0.0);
    }

    #[test]
    fn clock_before_restart_reads_full_limit() {
        let mut t = RoundTimer::new(30.0);
        t.restart(Duration::from_secs(10));
        assert_abs_diff_eq!(t.remaining(Duration::from_secs(2)), 30.0);
    }
}
