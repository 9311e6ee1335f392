//! Playback Controller
//!
//! Owns `PlaybackState` and `AnalysisState`, translates view intents into
//! adapter calls and analysis requests, and keeps both view projections
//! consistent with a single source of truth.
//!
//! All mutation happens through `&mut self`, so no two operations ever run
//! concurrently. The two asynchronous producers (the analysis round-trip and
//! the adapter's event stream) deliver through channels and are applied by
//! `pump_events`, keeping the whole state machine on one logical thread.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::core::analysis::{
    AnalysisRequest, ClipAnalysisProvider, DetectedClip, FixtureAnalysisProvider,
};
use crate::core::clips::{rank_clips, Clip, VideoRecord, VideoStatus};
use crate::core::events::{ControllerNotice, NoticeReceiver, NoticeSender};
use crate::core::export::{AckExporter, ClipExporter, ExportAck};
use crate::core::playback::adapter::{AdapterEvent, AdapterEventReceiver, PlaybackAdapter};
use crate::core::playback::backends::open_adapter;
use crate::core::source::{SourceDescriptor, SourceKind, SourceRequest};
use crate::core::store::ClipStore;
use crate::core::views::{RankingViewModel, TimelineViewModel};
use crate::core::{clamp_time, ClipId, CoreError, CoreResult, TimeSec, VideoId};

// =============================================================================
// Controller State
// =============================================================================

/// Playback axis of the controller state
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackState {
    pub source_kind: SourceKind,
    pub is_playing: bool,
    pub current_time: TimeSec,
    /// `0` until the adapter reports it
    pub duration: TimeSec,
    pub volume: f64,
    /// Weak reference into the clip set; cleared when the set is replaced
    pub selected_clip_id: Option<ClipId>,
}

impl PlaybackState {
    fn new(source_kind: SourceKind) -> Self {
        Self {
            source_kind,
            is_playing: false,
            current_time: 0.0,
            duration: 0.0,
            volume: 1.0,
            selected_clip_id: None,
        }
    }
}

/// Analysis axis of the controller state
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisState {
    pub is_analyzing: bool,
    /// Ranked clips, best first; replaced wholesale on completion
    pub clips: Vec<Clip>,
}

// =============================================================================
// Configuration
// =============================================================================

/// Collaborators handed to the controller at construction
pub struct PlaybackControllerConfig {
    pub provider: Arc<dyn ClipAnalysisProvider>,
    /// Optional persistence; `None` keeps everything in memory
    pub store: Option<Arc<dyn ClipStore>>,
    pub exporter: Arc<dyn ClipExporter>,
}

impl Default for PlaybackControllerConfig {
    fn default() -> Self {
        Self {
            provider: Arc::new(FixtureAnalysisProvider::new()),
            store: None,
            exporter: Arc::new(AckExporter),
        }
    }
}

impl PlaybackControllerConfig {
    pub fn with_provider(mut self, provider: Arc<dyn ClipAnalysisProvider>) -> Self {
        self.provider = provider;
        self
    }

    pub fn with_store(mut self, store: Arc<dyn ClipStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_exporter(mut self, exporter: Arc<dyn ClipExporter>) -> Self {
        self.exporter = exporter;
        self
    }
}

// =============================================================================
// Playback Controller
// =============================================================================

struct LoadedSource {
    video_id: VideoId,
    descriptor: SourceDescriptor,
    adapter: Box<dyn PlaybackAdapter>,
    events: AdapterEventReceiver,
}

struct PendingAnalysis {
    rx: oneshot::Receiver<CoreResult<Vec<DetectedClip>>>,
    task: JoinHandle<()>,
}

/// The core state machine behind the player screen
pub struct PlaybackController {
    provider: Arc<dyn ClipAnalysisProvider>,
    store: Option<Arc<dyn ClipStore>>,
    exporter: Arc<dyn ClipExporter>,
    notices: NoticeSender,

    source: Option<LoadedSource>,
    playback: PlaybackState,
    analysis: AnalysisState,
    pending_analysis: Option<PendingAnalysis>,
}

impl PlaybackController {
    pub fn new(config: PlaybackControllerConfig) -> (Self, NoticeReceiver) {
        let (notices, rx) = NoticeSender::channel();
        (
            Self {
                provider: config.provider,
                store: config.store,
                exporter: config.exporter,
                notices,
                source: None,
                playback: PlaybackState::new(SourceKind::LocalFile),
                analysis: AnalysisState::default(),
                pending_analysis: None,
            },
            rx,
        )
    }

    // =========================================================================
    // State Access
    // =========================================================================

    pub fn playback(&self) -> &PlaybackState {
        &self.playback
    }

    pub fn analysis(&self) -> &AnalysisState {
        &self.analysis
    }

    pub fn video_id(&self) -> Option<&VideoId> {
        self.source.as_ref().map(|s| &s.video_id)
    }

    /// Timeline projection of the current state
    pub fn timeline_view(&self) -> TimelineViewModel {
        TimelineViewModel::project(
            self.playback.duration,
            self.playback.current_time,
            &self.analysis.clips,
            self.playback.selected_clip_id.as_ref(),
        )
    }

    /// Ranking-panel projection of the current state
    pub fn ranking_view(&self) -> RankingViewModel {
        RankingViewModel::project(
            &self.analysis.clips,
            self.analysis.is_analyzing,
            self.playback.selected_clip_id.as_ref(),
        )
    }

    fn adapter(&self) -> CoreResult<&dyn PlaybackAdapter> {
        self.source
            .as_ref()
            .map(|s| s.adapter.as_ref())
            .ok_or(CoreError::NoSource)
    }

    // =========================================================================
    // Source Loading
    // =========================================================================

    /// Resolves the request, opens the matching adapter, registers the video
    /// and kicks off analysis.
    ///
    /// An empty request emits a navigate-to-upload notice and fails with
    /// `NoSource`; no adapter is created.
    pub async fn load_source(&mut self, request: SourceRequest) -> CoreResult<VideoId> {
        let descriptor = match request.resolve() {
            Ok(descriptor) => descriptor,
            Err(err) => {
                self.notices.emit(ControllerNotice::NavigateToUpload);
                return Err(err);
            }
        };

        // Replace any previous source before wiring the new one
        self.teardown_source().await;

        let (adapter, events) = open_adapter(&descriptor)?;
        let kind = descriptor.kind();
        let duration = descriptor.duration_hint().unwrap_or(0.0).max(0.0);

        let record = VideoRecord::new(&title_of(&descriptor), &descriptor.label(), duration);
        let video_id = record.id.clone();
        self.persist(|store| store.insert_video(&record).map(|_| ()));

        info!(video_id = %video_id, kind = ?kind, "Source loaded");

        self.source = Some(LoadedSource {
            video_id: video_id.clone(),
            descriptor,
            adapter,
            events,
        });
        self.playback = PlaybackState::new(kind);
        self.playback.duration = duration;
        self.analysis = AnalysisState::default();

        self.request_analysis()?;
        Ok(video_id)
    }

    /// Tears down the controller: cancels polling, releases the adapter and
    /// leaves no callback able to mutate state afterwards.
    pub async fn shutdown(&mut self) {
        self.teardown_source().await;
    }

    async fn teardown_source(&mut self) {
        if let Some(pending) = self.pending_analysis.take() {
            pending.task.abort();
            self.analysis.is_analyzing = false;
        }
        if let Some(source) = self.source.take() {
            source.adapter.shutdown().await;
        }
    }

    // =========================================================================
    // Analysis
    // =========================================================================

    /// Starts an analysis round-trip, returning `false` when one is already
    /// in flight (the duplicate request is ignored, not queued).
    ///
    /// A prior failure does not block retries.
    pub fn request_analysis(&mut self) -> CoreResult<bool> {
        let source = self.source.as_ref().ok_or(CoreError::NoSource)?;
        if self.analysis.is_analyzing {
            return Ok(false);
        }

        let request = AnalysisRequest::new(
            &source.video_id,
            source.descriptor.clone(),
            self.playback.duration,
        );
        let provider = Arc::clone(&self.provider);
        let (tx, rx) = oneshot::channel();
        let task = tokio::spawn(async move {
            let _ = tx.send(provider.analyze(request).await);
        });

        self.pending_analysis = Some(PendingAnalysis { rx, task });
        self.analysis.is_analyzing = true;
        self.notices.emit(ControllerNotice::AnalysisStarted {
            video_id: source.video_id.clone(),
        });
        Ok(true)
    }

    /// Waits for the in-flight analysis (if any) and applies its outcome.
    pub async fn await_analysis(&mut self) {
        let Some(pending) = self.pending_analysis.take() else {
            return;
        };
        let outcome = pending
            .rx
            .await
            .unwrap_or_else(|_| Err(CoreError::Internal("Analysis task dropped".to_string())));
        self.apply_analysis_outcome(outcome);
    }

    fn apply_analysis_outcome(&mut self, outcome: CoreResult<Vec<DetectedClip>>) {
        self.analysis.is_analyzing = false;
        let video_id = match self.source.as_ref() {
            Some(source) => source.video_id.clone(),
            None => return,
        };

        match outcome {
            Ok(detections) => {
                let mut clips: Vec<Clip> = detections
                    .into_iter()
                    .filter_map(|detection| match detection.into_clip() {
                        Ok(clip) => Some(clip),
                        Err(err) => {
                            warn!(video_id = %video_id, error = %err, "Dropping invalid detection");
                            None
                        }
                    })
                    .collect();
                rank_clips(&mut clips);

                self.persist(|store| {
                    store.insert_many(&video_id, &clips)?;
                    store.update_video_status(&video_id, VideoStatus::Completed)
                });

                // Whole-set replace invalidates any selection into the old set
                self.playback.selected_clip_id = None;
                self.analysis.clips = clips.clone();

                info!(video_id = %video_id, count = clips.len(), "Analysis completed");
                self.notices
                    .emit(ControllerNotice::AnalysisCompleted { video_id, clips });
            }
            Err(err) => {
                // Video stays watchable; the failure is a notice, not a crash
                self.persist(|store| store.update_video_status(&video_id, VideoStatus::Failed));

                warn!(video_id = %video_id, error = %err, "Analysis failed");
                self.notices.emit(ControllerNotice::AnalysisFailed {
                    video_id,
                    error: err.to_string(),
                });
            }
        }
    }

    /// Best-effort persistence: failures degrade to a warning notice.
    fn persist<F>(&self, op: F)
    where
        F: FnOnce(&dyn ClipStore) -> CoreResult<()>,
    {
        let Some(store) = &self.store else {
            return;
        };
        if let Err(err) = op(store.as_ref()) {
            warn!(error = %err, "Persistence failed");
            self.notices.emit(ControllerNotice::PersistenceWarning {
                detail: err.to_string(),
            });
        }
    }

    // =========================================================================
    // Playback Intents
    // =========================================================================

    /// Flips play/pause through the adapter, then reads back the adapter's
    /// observed state. For the embedded backend the command completes
    /// asynchronously, so the later notification stream is the source of
    /// truth, not this read-back.
    pub fn toggle_play_pause(&mut self) -> CoreResult<()> {
        let observed = {
            let adapter = self.adapter()?;
            if self.playback.is_playing {
                adapter.pause();
            } else {
                adapter.play();
            }
            adapter.is_playing()
        };
        self.playback.is_playing = observed;
        Ok(())
    }

    /// Seeks with silent clamping; local state updates optimistically and
    /// reconciles on the next notification.
    pub fn seek_to(&mut self, time: TimeSec) -> CoreResult<()> {
        self.adapter()?.seek(time);
        self.playback.current_time = clamp_time(time, self.playback.duration);
        Ok(())
    }

    pub fn set_volume(&mut self, level: f64) -> CoreResult<()> {
        let level = level.clamp(0.0, 1.0);
        self.adapter()?.set_volume(level);
        self.playback.volume = level;
        Ok(())
    }

    /// Seeks relative to the current position. Defined for `duration == 0`:
    /// everything clamps to zero.
    pub fn skip_by(&mut self, delta: TimeSec) -> CoreResult<()> {
        let target = clamp_time(self.playback.current_time + delta, self.playback.duration);
        self.seek_to(target)
    }

    /// Selects a clip, seeks to its start and always resumes playback: this
    /// is a "watch this moment" action, it never pauses.
    pub fn jump_to_clip(&mut self, clip_id: &ClipId) -> CoreResult<()> {
        let clip = self
            .analysis
            .clips
            .iter()
            .find(|c| &c.id == clip_id)
            .cloned()
            .ok_or_else(|| CoreError::ClipNotFound(clip_id.clone()))?;

        {
            let adapter = self.adapter()?;
            adapter.seek(clip.start_sec);
            adapter.play();
        }

        self.playback.selected_clip_id = Some(clip.id);
        self.playback.current_time = clamp_time(clip.start_sec, self.playback.duration);
        self.playback.is_playing = true;
        Ok(())
    }

    /// Fire-and-forget export with a user-visible acknowledgement.
    pub async fn export_clip(&mut self, clip_id: &ClipId) -> CoreResult<ExportAck> {
        let clip = self
            .analysis
            .clips
            .iter()
            .find(|c| &c.id == clip_id)
            .cloned()
            .ok_or_else(|| CoreError::ClipNotFound(clip_id.clone()))?;
        let video_id = self.video_id().ok_or(CoreError::NoSource)?.clone();

        let ack = self.exporter.export(&video_id, &clip).await?;
        self.notices.emit(ControllerNotice::ExportAcknowledged {
            clip_id: ack.clip_id.clone(),
            start_sec: ack.start_sec,
            end_sec: ack.end_sec,
        });
        Ok(ack)
    }

    // =========================================================================
    // Event Pump
    // =========================================================================

    /// Applies everything the producers have delivered so far: adapter events
    /// in arrival order, then a settled analysis outcome if one is ready.
    /// Non-blocking.
    pub fn pump_events(&mut self) {
        if let Some(source) = self.source.as_mut() {
            while let Ok(event) = source.events.try_recv() {
                match event {
                    AdapterEvent::Ready => {}
                    AdapterEvent::Play => self.playback.is_playing = true,
                    AdapterEvent::Pause => self.playback.is_playing = false,
                    AdapterEvent::TimeUpdate(time) => self.playback.current_time = time,
                    AdapterEvent::DurationChanged(duration) => self.playback.duration = duration,
                }
            }
        }

        let settled = match self.pending_analysis.as_mut() {
            Some(pending) => match pending.rx.try_recv() {
                Ok(outcome) => Some(outcome),
                Err(oneshot::error::TryRecvError::Empty) => None,
                Err(oneshot::error::TryRecvError::Closed) => Some(Err(CoreError::Internal(
                    "Analysis task dropped".to_string(),
                ))),
            },
            None => None,
        };
        if let Some(outcome) = settled {
            self.pending_analysis = None;
            self.apply_analysis_outcome(outcome);
        }
    }
}

fn title_of(descriptor: &SourceDescriptor) -> String {
    match descriptor {
        SourceDescriptor::LocalFile { path, .. } => path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned()),
        SourceDescriptor::Url { url, .. } => url.clone(),
    }
}

// =============================================================================
// Tests
// =============================================================================
