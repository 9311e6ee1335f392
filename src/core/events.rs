//! Controller Notices
//!
//! Typed notifications emitted by the playback controller for a listening UI
//! layer: analysis lifecycle, export acknowledgements, persistence warnings,
//! and navigation hints. Delivery is a tokio unbounded channel; a dropped
//! receiver is tolerated since the controller works fine unobserved.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::debug;

use crate::core::clips::Clip;
use crate::core::{TimeSec, VideoId};

// =============================================================================
// Notice Names
// =============================================================================

/// Notice names used when bridging to an event-based frontend
pub mod notice_names {
    /// Analysis started for the current video
    pub const ANALYSIS_STARTED: &str = "analysis:started";
    /// Analysis finished and clips are available
    pub const ANALYSIS_COMPLETED: &str = "analysis:completed";
    /// Analysis failed; a retry is allowed
    pub const ANALYSIS_FAILED: &str = "analysis:failed";
    /// A clip export was acknowledged
    pub const EXPORT_ACKNOWLEDGED: &str = "export:acknowledged";
    /// A persistence write failed; playback continues
    pub const PERSISTENCE_WARNING: &str = "persistence:warning";
    /// No source supplied; route back to the upload entry point
    pub const NAVIGATE_TO_UPLOAD: &str = "navigate:upload";
}

// =============================================================================
// Notices
// =============================================================================

/// Notification emitted by the playback controller
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ControllerNotice {
    #[serde(rename_all = "camelCase")]
    AnalysisStarted { video_id: VideoId },

    #[serde(rename_all = "camelCase")]
    AnalysisCompleted {
        video_id: VideoId,
        /// Ranked clips, best first
        clips: Vec<Clip>,
    },

    #[serde(rename_all = "camelCase")]
    AnalysisFailed { video_id: VideoId, error: String },

    #[serde(rename_all = "camelCase")]
    ExportAcknowledged {
        clip_id: String,
        start_sec: TimeSec,
        end_sec: TimeSec,
    },

    #[serde(rename_all = "camelCase")]
    PersistenceWarning { detail: String },

    NavigateToUpload,
}

impl ControllerNotice {
    /// The event name used when forwarding to a frontend event bus
    pub fn name(&self) -> &'static str {
        match self {
            ControllerNotice::AnalysisStarted { .. } => notice_names::ANALYSIS_STARTED,
            ControllerNotice::AnalysisCompleted { .. } => notice_names::ANALYSIS_COMPLETED,
            ControllerNotice::AnalysisFailed { .. } => notice_names::ANALYSIS_FAILED,
            ControllerNotice::ExportAcknowledged { .. } => notice_names::EXPORT_ACKNOWLEDGED,
            ControllerNotice::PersistenceWarning { .. } => notice_names::PERSISTENCE_WARNING,
            ControllerNotice::NavigateToUpload => notice_names::NAVIGATE_TO_UPLOAD,
        }
    }
}

// =============================================================================
// Notice Channel
// =============================================================================

pub type NoticeReceiver = mpsc::UnboundedReceiver<ControllerNotice>;

/// Sending half of the notice channel
#[derive(Clone)]
pub struct NoticeSender {
    tx: mpsc::UnboundedSender<ControllerNotice>,
}

impl NoticeSender {
    pub fn channel() -> (Self, NoticeReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Emits a notice. A closed channel means nobody is listening, which is
    /// not an error.
    pub fn emit(&self, notice: ControllerNotice) {
        if self.tx.send(notice).is_err() {
            debug!("Notice dropped: no listener attached");
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_names() {
        let notice = ControllerNotice::AnalysisStarted {
            video_id: "video_001".to_string(),
        };
        assert_eq!(notice.name(), "analysis:started");
        assert_eq!(ControllerNotice::NavigateToUpload.name(), "navigate:upload");
    }

    #[test]
    fn test_notice_serialization() {
        let notice = ControllerNotice::AnalysisFailed {
            video_id: "video_001".to_string(),
            error: "timed out".to_string(),
        };

        let json = serde_json::to_string(&notice).unwrap();
        assert!(json.contains("\"type\":\"analysisFailed\""));
        assert!(json.contains("\"videoId\":\"video_001\""));
    }

    #[tokio::test]
    async fn test_channel_delivers_in_order() {
        let (tx, mut rx) = NoticeSender::channel();

        tx.emit(ControllerNotice::AnalysisStarted {
            video_id: "v".to_string(),
        });
        tx.emit(ControllerNotice::NavigateToUpload);

        assert!(matches!(
            rx.recv().await,
            Some(ControllerNotice::AnalysisStarted { .. })
        ));
        assert!(matches!(
            rx.recv().await,
            Some(ControllerNotice::NavigateToUpload)
        ));
    }

    #[test]
    fn test_emit_without_listener_does_not_panic() {
        let (tx, rx) = NoticeSender::channel();
        drop(rx);
        tx.emit(ControllerNotice::NavigateToUpload);
    }
}
