use chrono::{DateTime, Utc};

/// Timestamp in UTC
pub type Timestamp = DateTime<Utc>;

/// Class number produced by a classifier (binary 0/1 for the Kamishima tools)
pub type Label = i64;

/// Per-class probabilities: `[p(class 0), p(class 1)]`
pub type ClassScores = [f64; 2];
