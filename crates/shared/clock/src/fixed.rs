use chrono::Duration;
use fairlab_core::Timestamp;
use fairlab_ports::Clock;
use std::sync::RwLock;

/// Clock frozen at a given instant
///
/// Time only moves through [`FixedClock::set`] and [`FixedClock::advance`],
/// which keeps model timestamps deterministic in tests.
pub struct FixedClock {
    current: RwLock<Timestamp>,
}

impl FixedClock {
    pub fn at(time: Timestamp) -> Self {
        Self {
            current: RwLock::new(time),
        }
    }

    /// Jump to an absolute time
    pub fn set(&self, time: Timestamp) {
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        *guard = time;
    }

    /// Move time forward (or backward, for negative durations)
    pub fn advance(&self, by: Duration) {
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        *guard += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        *self.current.read().unwrap_or_else(|e| e.into_inner())
    }

    fn name(&self) -> &str {
        "FixedClock"
    }
}
