//! fairlab Clock Infrastructure
//!
//! Time sources for stamping trained models:
//!
//! - [`SystemClock`]: wall-clock time, for production runs
//! - [`FixedClock`]: frozen time that only moves when told to, for tests
//!
//! ## Usage
//!
//! ```ignore
//! use fairlab_clock::{FixedClock, SystemClock};
//! use chrono::Duration;
//!
//! let clock = FixedClock::at(chrono::Utc::now());
//! clock.advance(Duration::minutes(5));
//! ```

mod fixed;
mod system;

pub use fixed::FixedClock;
pub use system::SystemClock;

// Re-export the Clock trait for convenience
pub use fairlab_ports::Clock;
