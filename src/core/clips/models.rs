//! Clip and Video Record Models
//!
//! `Clip` is an immutable value type once received from analysis. Ranking is a
//! stable descending sort by score, so equal scores keep their arrival order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::{ClipId, CoreError, CoreResult, TimeRange, TimeSec, VideoId};

// =============================================================================
// Clip
// =============================================================================

/// A scored sub-interval of a video, with a human-readable justification
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clip {
    /// Opaque identifier, unique within a video's clip set
    pub id: ClipId,
    /// Interval start in seconds
    pub start_sec: TimeSec,
    /// Interval end in seconds
    pub end_sec: TimeSec,
    /// Relevance estimate in `[0, 1]`
    pub score: f64,
    /// Justification string, may be empty
    pub reason: String,
}

impl Clip {
    /// Creates a clip with a fresh id, validating the interval and score.
    pub fn new(start_sec: TimeSec, end_sec: TimeSec, score: f64, reason: &str) -> CoreResult<Self> {
        Self::with_id(Uuid::new_v4().to_string(), start_sec, end_sec, score, reason)
    }

    /// Creates a clip with an explicit id (used when loading from the store).
    pub fn with_id(
        id: ClipId,
        start_sec: TimeSec,
        end_sec: TimeSec,
        score: f64,
        reason: &str,
    ) -> CoreResult<Self> {
        if start_sec < 0.0 || start_sec >= end_sec {
            return Err(CoreError::ValidationError(format!(
                "Invalid clip interval: {start_sec}~{end_sec} seconds"
            )));
        }
        if !(0.0..=1.0).contains(&score) {
            return Err(CoreError::ValidationError(format!(
                "Clip score out of range: {score}"
            )));
        }
        Ok(Self {
            id,
            start_sec,
            end_sec,
            score,
            reason: reason.to_string(),
        })
    }

    /// Clip length in seconds
    pub fn duration(&self) -> TimeSec {
        self.end_sec - self.start_sec
    }

    /// The clip's interval as a range
    pub fn range(&self) -> TimeRange {
        TimeRange::new(self.start_sec, self.end_sec)
    }
}

/// Sorts clips by score descending. The sort is stable: equal scores preserve
/// insertion (arrival) order.
pub fn rank_clips(clips: &mut [Clip]) {
    clips.sort_by(|a, b| b.score.total_cmp(&a.score));
}

// =============================================================================
// Video Records
// =============================================================================

/// Lifecycle status of a video's analysis pass
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoStatus {
    Analyzing,
    Completed,
    Failed,
}

impl VideoStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoStatus::Analyzing => "analyzing",
            VideoStatus::Completed => "completed",
            VideoStatus::Failed => "failed",
        }
    }

    pub fn parse(value: &str) -> CoreResult<Self> {
        match value {
            "analyzing" => Ok(VideoStatus::Analyzing),
            "completed" => Ok(VideoStatus::Completed),
            "failed" => Ok(VideoStatus::Failed),
            other => Err(CoreError::ValidationError(format!(
                "Unknown video status: {other}"
            ))),
        }
    }
}

/// Row describing a loaded video and its analysis status
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRecord {
    pub id: VideoId,
    /// Display title (file name or URL)
    pub title: String,
    /// Source label: local path or URL
    pub source: String,
    /// Duration in seconds; `0` until metadata is known
    pub duration_sec: TimeSec,
    pub status: VideoStatus,
    pub created_at: DateTime<Utc>,
}

impl VideoRecord {
    /// Creates a new record in the `Analyzing` state
    pub fn new(title: &str, source: &str, duration_sec: TimeSec) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            source: source.to_string(),
            duration_sec,
            status: VideoStatus::Analyzing,
            created_at: Utc::now(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
