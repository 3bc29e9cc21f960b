use std::time::Duration;

use chrono::{DateTime, Utc};

/// One completed request cycle. Never mutated after creation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LatencySample {
    pub duration_secs: f64,
    pub emitted_at: DateTime<Utc>,
}

impl LatencySample {
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            duration_secs: duration.as_secs_f64(),
            emitted_at: Utc::now(),
        }
    }
}

/// Cumulative count and duration sum since process start. Both only grow, and
/// since addition commutes the totals do not depend on arrival order.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RunningStats {
    total_requests: u64,
    total_duration_secs: f64,
}

impl RunningStats {
    /// Adds one sample. NaN, infinite and negative durations are dropped
    /// without being counted.
    pub fn record(&mut self, duration_secs: f64) {
        if !duration_secs.is_finite() || duration_secs < 0.0 {
            return;
        }
        self.total_requests = self.total_requests.saturating_add(1);
        self.total_duration_secs += duration_secs;
    }

    #[must_use]
    pub const fn total_requests(&self) -> u64 {
        self.total_requests
    }

    #[must_use]
    pub const fn total_duration_secs(&self) -> f64 {
        self.total_duration_secs
    }

    /// Cumulative mean in seconds, `None` before the first sample.
    #[must_use]
    pub fn average_secs(&self) -> Option<f64> {
        if self.total_requests == 0 {
            return None;
        }
        Some(self.total_duration_secs / self.total_requests as f64)
    }
}
