//! Clip Export
//!
//! Export is fire-and-forget at this layer: the exporter acknowledges the
//! request and hands it off. Actual media cutting is a downstream concern.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::clips::Clip;
use crate::core::{CoreResult, TimeSec, VideoId};

// =============================================================================
// Export Acknowledgement
// =============================================================================

/// Receipt for an accepted export request
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportAck {
    pub video_id: VideoId,
    pub clip_id: String,
    pub start_sec: TimeSec,
    pub end_sec: TimeSec,
}

// =============================================================================
// Clip Exporter Trait
// =============================================================================

/// Destination for clip export requests
#[async_trait]
pub trait ClipExporter: Send + Sync {
    /// Accepts an export request, returning a receipt
    async fn export(&self, video_id: &VideoId, clip: &Clip) -> CoreResult<ExportAck>;
}

// =============================================================================
// Acknowledging Exporter
// =============================================================================

/// Default exporter: logs the request and acknowledges it immediately
pub struct AckExporter;

#[async_trait]
impl ClipExporter for AckExporter {
    async fn export(&self, video_id: &VideoId, clip: &Clip) -> CoreResult<ExportAck> {
        info!(
            video_id = %video_id,
            clip_id = %clip.id,
            start_sec = clip.start_sec,
            end_sec = clip.end_sec,
            "Export requested"
        );
        Ok(ExportAck {
            video_id: video_id.clone(),
            clip_id: clip.id.clone(),
            start_sec: clip.start_sec,
            end_sec: clip.end_sec,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ack_exporter_echoes_clip_interval() {
        let clip = Clip::new(5.0, 15.0, 0.95, "peak").unwrap();
        let ack = AckExporter
            .export(&"video_001".to_string(), &clip)
            .await
            .unwrap();

        assert_eq!(ack.video_id, "video_001");
        assert_eq!(ack.clip_id, clip.id);
        assert_eq!(ack.start_sec, 5.0);
        assert_eq!(ack.end_sec, 15.0);
    }
}
