//! Clipsight Core Type Definitions
//!
//! Defines fundamental types used throughout the project.

use serde::{Deserialize, Serialize};
use tracing::warn;

// =============================================================================
// ID Types
// =============================================================================

/// Video unique identifier (UUID v4)
pub type VideoId = String;

/// Clip unique identifier (UUID v4)
pub type ClipId = String;

// =============================================================================
// Time Types
// =============================================================================

/// Time in seconds (floating point)
pub type TimeSec = f64;

/// Clamps a time value into `[0, duration]`.
///
/// `duration == 0` is a valid state (metadata not yet reported) and clamps
/// everything to zero.
pub fn clamp_time(time: TimeSec, duration: TimeSec) -> TimeSec {
    time.clamp(0.0, duration.max(0.0))
}

// =============================================================================
// Time Range
// =============================================================================

/// Time range
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRange {
    pub start_sec: TimeSec,
    pub end_sec: TimeSec,
}

impl TimeRange {
    pub fn new(start_sec: TimeSec, end_sec: TimeSec) -> Self {
        if start_sec > end_sec {
            warn!(
                "TimeRange created with start > end ({} > {}), swapping",
                start_sec, end_sec
            );
            return Self {
                start_sec: end_sec,
                end_sec: start_sec,
            };
        }
        Self { start_sec, end_sec }
    }

    /// Returns duration in seconds
    pub fn duration(&self) -> TimeSec {
        self.end_sec - self.start_sec
    }

    /// Checks if a given time is within range
    pub fn contains(&self, time: TimeSec) -> bool {
        time >= self.start_sec && time <= self.end_sec
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_time_in_range() {
        assert_eq!(clamp_time(30.0, 120.0), 30.0);
    }

    #[test]
    fn test_clamp_time_out_of_range() {
        assert_eq!(clamp_time(-5.0, 120.0), 0.0);
        assert_eq!(clamp_time(500.0, 120.0), 120.0);
    }

    #[test]
    fn test_clamp_time_zero_duration() {
        assert_eq!(clamp_time(42.0, 0.0), 0.0);
        assert_eq!(clamp_time(-1.0, 0.0), 0.0);
    }

    #[test]
    fn test_time_range_swaps_inverted() {
        let range = TimeRange::new(10.0, 5.0);
        assert_eq!(range.start_sec, 5.0);
        assert_eq!(range.end_sec, 10.0);
    }

    #[test]
    fn test_time_range_contains() {
        let range = TimeRange::new(5.0, 15.0);
        assert!(range.contains(5.0));
        assert!(range.contains(15.0));
        assert!(!range.contains(15.1));
        assert_eq!(range.duration(), 10.0);
    }
}
