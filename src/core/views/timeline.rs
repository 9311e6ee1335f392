//! Timeline View Projection
//!
//! Projects (duration, current time, clips, selection) into horizontally
//! positioned segments expressed as percentages of the track width. With
//! `duration == 0` the track renders empty: no segments, no playhead, no
//! markers.

use serde::{Deserialize, Serialize};

use crate::core::clips::Clip;
use crate::core::views::format_time;
use crate::core::{ClipId, TimeSec};

// =============================================================================
// View Model
// =============================================================================

/// One clip rendered on the track
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineSegment {
    pub clip_id: ClipId,
    /// Left edge as a percentage of track width
    pub left_pct: f64,
    /// Width as a percentage of track width
    pub width_pct: f64,
    pub selected: bool,
    /// Whether the playhead is currently inside this clip
    pub active: bool,
    /// Tooltip text: time range plus score
    pub tooltip: String,
}

/// A labeled tick under the track
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineMarker {
    pub position_pct: f64,
    pub label: String,
}

/// Render-ready timeline
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineViewModel {
    pub segments: Vec<TimelineSegment>,
    /// Playhead position as a percentage; absent when duration is unknown
    pub playhead_pct: Option<f64>,
    /// Quarter-interval time markers (0%, 25%, 50%, 75%, 100%)
    pub markers: Vec<TimelineMarker>,
}

impl TimelineViewModel {
    /// Builds the timeline projection.
    pub fn project(
        duration_sec: TimeSec,
        current_time: TimeSec,
        clips: &[Clip],
        selected: Option<&ClipId>,
    ) -> Self {
        if duration_sec <= 0.0 {
            return Self {
                segments: Vec::new(),
                playhead_pct: None,
                markers: Vec::new(),
            };
        }

        let pct = |t: TimeSec| (t / duration_sec * 100.0).clamp(0.0, 100.0);

        let segments = clips
            .iter()
            .map(|clip| {
                let left_pct = pct(clip.start_sec);
                TimelineSegment {
                    clip_id: clip.id.clone(),
                    left_pct,
                    width_pct: pct(clip.end_sec) - left_pct,
                    selected: selected == Some(&clip.id),
                    active: clip.range().contains(current_time),
                    tooltip: format!(
                        "{} - {} ({:.0}%)",
                        format_time(clip.start_sec),
                        format_time(clip.end_sec),
                        clip.score * 100.0
                    ),
                }
            })
            .collect();

        let markers = (0..=4)
            .map(|quarter| {
                let position_pct = quarter as f64 * 25.0;
                TimelineMarker {
                    position_pct,
                    label: format_time(duration_sec * position_pct / 100.0),
                }
            })
            .collect();

        Self {
            segments,
            playhead_pct: Some(pct(current_time)),
            markers,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(start: f64, end: f64, score: f64) -> Clip {
        Clip::new(start, end, score, "reason").unwrap()
    }

    #[test]
    fn test_zero_duration_renders_empty_track() {
        let clips = vec![clip(5.0, 15.0, 0.95)];
        let view = TimelineViewModel::project(0.0, 42.0, &clips, None);

        assert!(view.segments.is_empty());
        assert!(view.playhead_pct.is_none());
        assert!(view.markers.is_empty());
    }

    #[test]
    fn test_segment_positioning() {
        let clips = vec![clip(30.0, 60.0, 0.9)];
        let view = TimelineViewModel::project(120.0, 0.0, &clips, None);

        assert_eq!(view.segments.len(), 1);
        assert_eq!(view.segments[0].left_pct, 25.0);
        assert_eq!(view.segments[0].width_pct, 25.0);
    }

    #[test]
    fn test_segment_clamped_to_track() {
        // Clip extends past the known duration
        let clips = vec![clip(100.0, 150.0, 0.9)];
        let view = TimelineViewModel::project(120.0, 0.0, &clips, None);

        let segment = &view.segments[0];
        assert!(segment.left_pct + segment.width_pct <= 100.0);
    }

    #[test]
    fn test_playhead_position() {
        let view = TimelineViewModel::project(120.0, 30.0, &[], None);
        assert_eq!(view.playhead_pct, Some(25.0));
    }

    #[test]
    fn test_quarter_markers() {
        let view = TimelineViewModel::project(120.0, 0.0, &[], None);

        let labels: Vec<&str> = view.markers.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, vec!["0:00", "0:30", "1:00", "1:30", "2:00"]);
        assert_eq!(view.markers[1].position_pct, 25.0);
    }

    #[test]
    fn test_selection_flag() {
        let clips = vec![clip(5.0, 15.0, 0.95), clip(32.0, 45.0, 0.88)];
        let selected = clips[1].id.clone();
        let view = TimelineViewModel::project(120.0, 0.0, &clips, Some(&selected));

        assert!(!view.segments[0].selected);
        assert!(view.segments[1].selected);
    }

    #[test]
    fn test_active_segment_tracks_playhead() {
        let clips = vec![clip(5.0, 15.0, 0.95), clip(32.0, 45.0, 0.88)];
        let view = TimelineViewModel::project(120.0, 10.0, &clips, None);

        assert!(view.segments[0].active);
        assert!(!view.segments[1].active);
    }

    #[test]
    fn test_tooltip_format() {
        let clips = vec![clip(67.0, 78.0, 0.92)];
        let view = TimelineViewModel::project(120.0, 0.0, &clips, None);
        assert_eq!(view.segments[0].tooltip, "1:07 - 1:18 (92%)");
    }
}
