//! Fixture Analysis Provider
//!
//! Deterministic provider that returns a canned set of highlight detections
//! after a fixed latency. It stands in for a real detection model so the rest
//! of the pipeline (ranking, persistence, navigation) can be exercised without
//! network access or media decoding.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::core::analysis::{AnalysisRequest, ClipAnalysisProvider, DetectedClip};
use crate::core::CoreResult;

// =============================================================================
// Fixture Provider
// =============================================================================

/// Canned highlight detections with simulated processing latency
pub struct FixtureAnalysisProvider {
    latency: Duration,
}

impl FixtureAnalysisProvider {
    /// Default simulated processing time
    pub const DEFAULT_LATENCY: Duration = Duration::from_secs(3);

    pub fn new() -> Self {
        Self {
            latency: Self::DEFAULT_LATENCY,
        }
    }

    /// Overrides the simulated latency (zero is allowed)
    pub fn with_latency(latency: Duration) -> Self {
        Self { latency }
    }

    /// The canned detections, in provider order (not ranked)
    fn detections() -> Vec<DetectedClip> {
        vec![
            DetectedClip::new(5.0, 15.0, 0.95, "Audio and motion intensity peak"),
            DetectedClip::new(32.0, 45.0, 0.88, "Dramatic scene change"),
            DetectedClip::new(67.0, 78.0, 0.92, "High-energy moment"),
            DetectedClip::new(95.0, 110.0, 0.85, "Emotional peak detected"),
        ]
    }
}

impl Default for FixtureAnalysisProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ClipAnalysisProvider for FixtureAnalysisProvider {
    fn provider_name(&self) -> &str {
        "fixture"
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn analyze(&self, request: AnalysisRequest) -> CoreResult<Vec<DetectedClip>> {
        debug!(
            video_id = %request.video_id,
            latency_ms = self.latency.as_millis() as u64,
            "Fixture analysis started"
        );
        tokio::time::sleep(self.latency).await;
        Ok(Self::detections())
    }
}

// =============================================================================
// Tests
// =============================================================================
