use chrono::Utc;
use fairlab_core::Timestamp;
use fairlab_ports::Clock;

/// Wall-clock time, used to stamp models trained outside of tests
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }

    fn name(&self) -> &str {
        "SystemClock"
    }
}
