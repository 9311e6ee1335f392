//! Clip Analysis Provider Trait
//!
//! Defines the interface for highlight-detection providers. Implementations
//! include the deterministic fixture provider (default) and an HTTP-backed
//! provider behind the `remote-analysis` feature.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::clips::Clip;
use crate::core::source::SourceDescriptor;
use crate::core::{CoreResult, TimeSec, VideoId};

// =============================================================================
// Analysis Request
// =============================================================================

/// Request for highlight detection on a single video
#[derive(Clone, Debug)]
pub struct AnalysisRequest {
    /// Video being analyzed
    pub video_id: VideoId,
    /// Resolved source (path or URL)
    pub descriptor: SourceDescriptor,
    /// Known duration in seconds; `0` when metadata has not been reported yet
    pub duration_sec: TimeSec,
}

impl AnalysisRequest {
    pub fn new(video_id: &str, descriptor: SourceDescriptor, duration_sec: TimeSec) -> Self {
        Self {
            video_id: video_id.to_string(),
            descriptor,
            duration_sec,
        }
    }
}

// =============================================================================
// Wire Type
// =============================================================================

/// Raw detection as produced by a provider, before validation.
///
/// Providers hand back plain intervals; the controller converts them into
/// `Clip` values with fresh ids, dropping any that fail validation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedClip {
    pub start_sec: TimeSec,
    pub end_sec: TimeSec,
    pub score: f64,
    pub reason: String,
}

impl DetectedClip {
    pub fn new(start_sec: TimeSec, end_sec: TimeSec, score: f64, reason: &str) -> Self {
        Self {
            start_sec,
            end_sec,
            score,
            reason: reason.to_string(),
        }
    }

    /// Validates the detection into a `Clip` with a fresh id.
    pub fn into_clip(self) -> CoreResult<Clip> {
        Clip::new(self.start_sec, self.end_sec, self.score, &self.reason)
    }
}

// =============================================================================
// Analysis Provider Trait
// =============================================================================

/// Trait for highlight-detection providers
///
/// Implementations:
/// - `FixtureAnalysisProvider`: deterministic canned detections after a fixed
///   delay (the default)
/// - `HttpAnalysisProvider`: remote detection service (`remote-analysis`)
#[async_trait]
pub trait ClipAnalysisProvider: Send + Sync {
    /// Returns the provider identifier used in logs and notices
    fn provider_name(&self) -> &str;

    /// Checks if the provider is ready to accept requests
    fn is_available(&self) -> bool;

    /// Detects highlight clips in the requested video.
    ///
    /// Detections are returned in provider order; ranking happens downstream.
    async fn analyze(&self, request: AnalysisRequest) -> CoreResult<Vec<DetectedClip>>;

    /// Performs a health check to verify the provider is working
    async fn health_check(&self) -> CoreResult<()> {
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detected_clip_into_clip() {
        let detection = DetectedClip::new(5.0, 15.0, 0.95, "audio peak");
        let clip = detection.into_clip().unwrap();
        assert_eq!(clip.start_sec, 5.0);
        assert_eq!(clip.score, 0.95);
        assert!(!clip.id.is_empty());
    }

    #[test]
    fn test_detected_clip_validation_applies() {
        let detection = DetectedClip::new(15.0, 5.0, 0.95, "inverted");
        assert!(detection.into_clip().is_err());

        let detection = DetectedClip::new(0.0, 1.0, 2.0, "bad score");
        assert!(detection.into_clip().is_err());
    }

    #[test]
    fn test_detected_clip_serialization() {
        let detection = DetectedClip::new(32.0, 45.0, 0.88, "scene change");
        let json = serde_json::to_string(&detection).unwrap();
        assert!(json.contains("\"startSec\":32.0"));

        let parsed: DetectedClip = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, detection);
    }
}
