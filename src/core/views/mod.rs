//! View Projections
//!
//! Pure, synchronous projections of controller state into render-ready view
//! models. No playback or persistence state is touched here.

mod ranking;
mod timeline;

pub use ranking::{RankedClipRow, RankingViewModel, ScoreTier};
pub use timeline::{TimelineMarker, TimelineSegment, TimelineViewModel};

use crate::core::TimeSec;

/// Formats seconds as `m:ss`, flooring sub-second precision.
///
/// Negative and non-finite inputs render as `0:00`.
pub fn format_time(seconds: TimeSec) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "0:00".to_string();
    }
    let total = seconds.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(5.0), "0:05");
        assert_eq!(format_time(67.9), "1:07");
        assert_eq!(format_time(600.0), "10:00");
    }

    #[test]
    fn test_format_time_degenerate_inputs() {
        assert_eq!(format_time(-3.0), "0:00");
        assert_eq!(format_time(f64::NAN), "0:00");
        assert_eq!(format_time(f64::INFINITY), "0:00");
    }
}
