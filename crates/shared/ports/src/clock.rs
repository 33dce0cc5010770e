use fairlab_core::Timestamp;

/// Port for time abstraction
///
/// Model handles are stamped with the time they were trained. Production
/// code uses the wall clock; tests pin it to a fixed instant.
pub trait Clock: Send + Sync {
    /// Instant to record as a model's training time
    fn now(&self) -> Timestamp;

    /// Short label used in log lines
    fn name(&self) -> &str {
        "Clock"
    }
}
