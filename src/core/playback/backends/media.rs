//! Media Element Backend
//!
//! Drives a media element for local files and direct remote URLs. Commands
//! apply synchronously; a ticker reports the position every 250ms while
//! playing, mirroring a media element's timeupdate cadence. Position advances
//! against a monotonic clock between commands.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

use crate::core::playback::adapter::{
    AdapterEvent, AdapterEventReceiver, AdapterEventSender, PlaybackAdapter,
};
use crate::core::source::SourceKind;
use crate::core::{clamp_time, TimeSec};

/// Position report cadence while playing
const TICK_INTERVAL: Duration = Duration::from_millis(250);

// =============================================================================
// Element State
// =============================================================================

struct ElementState {
    playing: bool,
    /// Position at the last command boundary
    base_time: TimeSec,
    /// Set while playing; position advances from `base_time` against it
    resumed_at: Option<Instant>,
    duration: TimeSec,
    volume: f64,
}

impl ElementState {
    fn position(&self) -> TimeSec {
        let mut position = self.base_time;
        if let (true, Some(resumed_at)) = (self.playing, self.resumed_at) {
            position += resumed_at.elapsed().as_secs_f64();
        }
        // Unknown duration leaves the upper bound open
        if self.duration > 0.0 {
            position = clamp_time(position, self.duration);
        }
        position.max(0.0)
    }
}

struct Inner {
    state: Mutex<ElementState>,
    events: AdapterEventSender,
    closed: AtomicBool,
    stop: Notify,
}

impl Inner {
    fn send(&self, event: AdapterEvent) {
        if !self.closed.load(Ordering::SeqCst) {
            let _ = self.events.send(event);
        }
    }

    fn locked(&self) -> std::sync::MutexGuard<'_, ElementState> {
        // Lock poisoning would mean a panic mid-command; propagating the
        // panic is the right outcome for a corrupted element.
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

// =============================================================================
// Media Element Adapter
// =============================================================================

/// Media-element backend shared by the local-file and direct-URL source kinds
pub struct MediaElementAdapter {
    kind: SourceKind,
    inner: Arc<Inner>,
    ticker: Mutex<Option<JoinHandle<()>>>,
}

impl MediaElementAdapter {
    pub fn new(kind: SourceKind, duration_hint: Option<TimeSec>) -> (Self, AdapterEventReceiver) {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();

        let duration = duration_hint.unwrap_or(0.0).max(0.0);
        let inner = Arc::new(Inner {
            state: Mutex::new(ElementState {
                playing: false,
                base_time: 0.0,
                resumed_at: None,
                duration,
                volume: 1.0,
            }),
            events: tx,
            closed: AtomicBool::new(false),
            stop: Notify::new(),
        });

        inner.send(AdapterEvent::Ready);
        if duration > 0.0 {
            inner.send(AdapterEvent::DurationChanged(duration));
        }

        let ticker = tokio::spawn(Self::run_ticker(Arc::clone(&inner)));

        (
            Self {
                kind,
                inner,
                ticker: Mutex::new(Some(ticker)),
            },
            rx,
        )
    }

    async fn run_ticker(inner: Arc<Inner>) {
        loop {
            tokio::select! {
                _ = inner.stop.notified() => break,
                _ = tokio::time::sleep(TICK_INTERVAL) => {
                    let report = {
                        let state = inner.locked();
                        state.playing.then(|| state.position())
                    };
                    if let Some(position) = report {
                        inner.send(AdapterEvent::TimeUpdate(position));
                    }
                }
            }
        }
        debug!("Media element ticker stopped");
    }
}

#[async_trait]
impl PlaybackAdapter for MediaElementAdapter {
    fn source_kind(&self) -> SourceKind {
        self.kind
    }

    fn play(&self) {
        let mut state = self.inner.locked();
        if state.playing {
            return;
        }
        state.playing = true;
        state.resumed_at = Some(Instant::now());
        drop(state);
        self.inner.send(AdapterEvent::Play);
    }

    fn pause(&self) {
        let mut state = self.inner.locked();
        if !state.playing {
            return;
        }
        state.base_time = state.position();
        state.resumed_at = None;
        state.playing = false;
        drop(state);
        self.inner.send(AdapterEvent::Pause);
    }

    fn seek(&self, time: TimeSec) {
        let mut state = self.inner.locked();
        let target = clamp_time(time, state.duration);
        state.base_time = target;
        if state.playing {
            state.resumed_at = Some(Instant::now());
        }
        drop(state);
        self.inner.send(AdapterEvent::TimeUpdate(target));
    }

    fn set_volume(&self, level: f64) {
        self.inner.locked().volume = level.clamp(0.0, 1.0);
    }

    fn current_time(&self) -> TimeSec {
        self.inner.locked().position()
    }

    fn duration(&self) -> TimeSec {
        self.inner.locked().duration
    }

    fn is_playing(&self) -> bool {
        self.inner.locked().playing
    }

    fn volume(&self) -> f64 {
        self.inner.locked().volume
    }

    async fn shutdown(&self) {
        self.inner.closed.store(true, Ordering::SeqCst);
        self.inner.stop.notify_one();

        let handle = {
            let mut guard = match self.ticker.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            guard.take()
        };
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{advance, Duration};

    fn adapter(duration: Option<TimeSec>) -> (MediaElementAdapter, AdapterEventReceiver) {
        MediaElementAdapter::new(SourceKind::LocalFile, duration)
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_events() {
        let (_adapter, mut events) = adapter(Some(120.0));
        assert_eq!(events.recv().await, Some(AdapterEvent::Ready));
        assert_eq!(events.recv().await, Some(AdapterEvent::DurationChanged(120.0)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_position_advances_while_playing() {
        let (adapter, _events) = adapter(Some(120.0));

        adapter.play();
        advance(Duration::from_secs(5)).await;
        assert_eq!(adapter.current_time(), 5.0);

        adapter.pause();
        advance(Duration::from_secs(5)).await;
        assert_eq!(adapter.current_time(), 5.0);
        adapter.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_play_pause_idempotent() {
        let (adapter, mut events) = adapter(Some(120.0));
        // Drain Ready + DurationChanged
        events.recv().await;
        events.recv().await;

        adapter.play();
        adapter.play();
        adapter.pause();
        adapter.pause();

        assert_eq!(events.recv().await, Some(AdapterEvent::Play));
        assert_eq!(events.recv().await, Some(AdapterEvent::Pause));
        assert!(events.try_recv().is_err());
        adapter.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_seek_clamps_silently() {
        let (adapter, _events) = adapter(Some(120.0));

        adapter.seek(500.0);
        assert_eq!(adapter.current_time(), 120.0);

        adapter.seek(-10.0);
        assert_eq!(adapter.current_time(), 0.0);
        adapter.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_seek_with_unknown_duration_clamps_to_zero() {
        let (adapter, _events) = adapter(None);
        adapter.seek(42.0);
        assert_eq!(adapter.current_time(), 0.0);
        adapter.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_reports_while_playing() {
        let (adapter, mut events) = adapter(Some(120.0));
        events.recv().await;
        events.recv().await;

        adapter.play();
        assert_eq!(events.recv().await, Some(AdapterEvent::Play));

        advance(TICK_INTERVAL).await;
        let Some(AdapterEvent::TimeUpdate(t)) = events.recv().await else {
            panic!("expected a time update");
        };
        assert!(t > 0.0);
        adapter.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_volume_clamped() {
        let (adapter, _events) = adapter(Some(120.0));
        adapter.set_volume(1.5);
        assert_eq!(adapter.volume(), 1.0);
        adapter.set_volume(-0.5);
        assert_eq!(adapter.volume(), 0.0);
        adapter.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_events_after_shutdown() {
        let (adapter, mut events) = adapter(Some(120.0));
        events.recv().await;
        events.recv().await;

        adapter.play();
        assert_eq!(events.recv().await, Some(AdapterEvent::Play));

        adapter.shutdown().await;
        advance(Duration::from_secs(10)).await;
        assert!(events.try_recv().is_err());
    }
}
