//! Embedded Player Backend
//!
//! Bridges an embedded third-party player that only exposes a command/query
//! API and no per-frame time events. A 100ms poll loop compensates: each tick
//! flushes queued commands to the player, queries its state, and synthesizes
//! the Play/Pause/TimeUpdate events the contract requires.
//!
//! Commands therefore apply on the next poll tick, not at call time; the
//! accessor methods report the last polled state. Teardown stops the poll
//! loop and guarantees no event lands afterwards.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
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

/// Poll cadence against the embedded player's query API
const POLL_INTERVAL: Duration = Duration::from_millis(100);

// =============================================================================
// Player Simulation
// =============================================================================

/// Command accepted by the embedded player's API
#[derive(Clone, Copy, Debug)]
enum PlayerCommand {
    Play,
    Pause,
    Seek(TimeSec),
    SetVolume(f64),
}

/// The "far side": player state only reachable through commands and queries
struct PlayerState {
    playing: bool,
    base_time: TimeSec,
    resumed_at: Option<Instant>,
    duration: TimeSec,
    volume: f64,
}

impl PlayerState {
    fn position(&self) -> TimeSec {
        let mut position = self.base_time;
        if let (true, Some(resumed_at)) = (self.playing, self.resumed_at) {
            position += resumed_at.elapsed().as_secs_f64();
        }
        if self.duration > 0.0 {
            position = clamp_time(position, self.duration);
        }
        position.max(0.0)
    }

    fn apply(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::Play => {
                if !self.playing {
                    self.playing = true;
                    self.resumed_at = Some(Instant::now());
                }
            }
            PlayerCommand::Pause => {
                if self.playing {
                    self.base_time = self.position();
                    self.resumed_at = None;
                    self.playing = false;
                }
            }
            PlayerCommand::Seek(time) => {
                self.base_time = clamp_time(time, self.duration);
                if self.playing {
                    self.resumed_at = Some(Instant::now());
                }
            }
            PlayerCommand::SetVolume(level) => {
                self.volume = level.clamp(0.0, 1.0);
            }
        }
    }
}

/// Player state as last seen by the poll loop
#[derive(Clone, Copy)]
struct Observed {
    ready: bool,
    playing: bool,
    time: TimeSec,
    duration: TimeSec,
    volume: f64,
}

struct Inner {
    player: Mutex<PlayerState>,
    pending: Mutex<VecDeque<PlayerCommand>>,
    observed: Mutex<Observed>,
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

    fn lock<'a, T>(&self, mutex: &'a Mutex<T>) -> MutexGuard<'a, T> {
        match mutex.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// One poll tick: flush commands, query the player, diff and emit.
    fn poll_tick(&self) {
        let snapshot = {
            let mut player = self.lock(&self.player);
            let commands: Vec<PlayerCommand> = self.lock(&self.pending).drain(..).collect();
            for command in commands {
                player.apply(command);
            }
            (
                player.playing,
                player.position(),
                player.duration,
                player.volume,
            )
        };
        let (playing, time, duration, volume) = snapshot;

        let previous = *self.lock(&self.observed);
        if !previous.ready {
            self.send(AdapterEvent::Ready);
            if duration > 0.0 {
                self.send(AdapterEvent::DurationChanged(duration));
            }
        } else if duration != previous.duration {
            self.send(AdapterEvent::DurationChanged(duration));
        }

        if playing != previous.playing {
            self.send(if playing {
                AdapterEvent::Play
            } else {
                AdapterEvent::Pause
            });
        }
        if playing {
            self.send(AdapterEvent::TimeUpdate(time));
        }

        *self.lock(&self.observed) = Observed {
            ready: true,
            playing,
            time,
            duration,
            volume,
        };
    }
}

// =============================================================================
// Embedded Player Adapter
// =============================================================================

/// Polling adapter over an embedded third-party player
pub struct EmbeddedPlayerAdapter {
    inner: Arc<Inner>,
    poller: Mutex<Option<JoinHandle<()>>>,
}

impl EmbeddedPlayerAdapter {
    pub fn new(duration_hint: Option<TimeSec>) -> (Self, AdapterEventReceiver) {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();

        let inner = Arc::new(Inner {
            player: Mutex::new(PlayerState {
                playing: false,
                base_time: 0.0,
                resumed_at: None,
                duration: duration_hint.unwrap_or(0.0).max(0.0),
                volume: 1.0,
            }),
            pending: Mutex::new(VecDeque::new()),
            observed: Mutex::new(Observed {
                ready: false,
                playing: false,
                time: 0.0,
                duration: 0.0,
                volume: 1.0,
            }),
            events: tx,
            closed: AtomicBool::new(false),
            stop: Notify::new(),
        });

        let poller = tokio::spawn(Self::run_poller(Arc::clone(&inner)));

        (
            Self {
                inner,
                poller: Mutex::new(Some(poller)),
            },
            rx,
        )
    }

    async fn run_poller(inner: Arc<Inner>) {
        loop {
            tokio::select! {
                _ = inner.stop.notified() => break,
                _ = tokio::time::sleep(POLL_INTERVAL) => inner.poll_tick(),
            }
        }
        debug!("Embedded player poll loop stopped");
    }

    fn enqueue(&self, command: PlayerCommand) {
        self.inner.lock(&self.inner.pending).push_back(command);
    }
}

#[async_trait]
impl PlaybackAdapter for EmbeddedPlayerAdapter {
    fn source_kind(&self) -> SourceKind {
        SourceKind::EmbeddedThirdParty
    }

    fn play(&self) {
        self.enqueue(PlayerCommand::Play);
    }

    fn pause(&self) {
        self.enqueue(PlayerCommand::Pause);
    }

    fn seek(&self, time: TimeSec) {
        self.enqueue(PlayerCommand::Seek(time));
    }

    fn set_volume(&self, level: f64) {
        self.enqueue(PlayerCommand::SetVolume(level));
    }

    fn current_time(&self) -> TimeSec {
        self.inner.lock(&self.inner.observed).time
    }

    fn duration(&self) -> TimeSec {
        self.inner.lock(&self.inner.observed).duration
    }

    fn is_playing(&self) -> bool {
        self.inner.lock(&self.inner.observed).playing
    }

    fn volume(&self) -> f64 {
        self.inner.lock(&self.inner.observed).volume
    }

    async fn shutdown(&self) {
        self.inner.closed.store(true, Ordering::SeqCst);
        self.inner.stop.notify_one();

        let handle = self.inner.lock(&self.poller).take();
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
    use tokio::time::advance;

    #[tokio::test(start_paused = true)]
    async fn test_ready_on_first_tick() {
        let (adapter, mut events) = EmbeddedPlayerAdapter::new(Some(212.0));

        assert!(events.try_recv().is_err());
        advance(POLL_INTERVAL).await;

        assert_eq!(events.recv().await, Some(AdapterEvent::Ready));
        assert_eq!(events.recv().await, Some(AdapterEvent::DurationChanged(212.0)));
        assert_eq!(adapter.duration(), 212.0);
        adapter.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_commands_apply_on_next_tick() {
        let (adapter, mut events) = EmbeddedPlayerAdapter::new(Some(212.0));
        advance(POLL_INTERVAL).await;
        events.recv().await; // Ready
        events.recv().await; // DurationChanged

        adapter.play();
        // Not yet applied
        assert!(!adapter.is_playing());

        advance(POLL_INTERVAL).await;
        assert!(adapter.is_playing());
        assert_eq!(events.recv().await, Some(AdapterEvent::Play));
    }

    #[tokio::test(start_paused = true)]
    async fn test_time_updates_are_monotonic_until_pause() {
        let (adapter, mut events) = EmbeddedPlayerAdapter::new(Some(212.0));
        advance(POLL_INTERVAL).await;
        events.recv().await;
        events.recv().await;

        adapter.play();
        advance(POLL_INTERVAL).await;
        assert_eq!(events.recv().await, Some(AdapterEvent::Play));

        let mut samples = Vec::new();
        for _ in 0..5 {
            advance(POLL_INTERVAL).await;
            loop {
                match events.try_recv() {
                    Ok(AdapterEvent::TimeUpdate(t)) => samples.push(t),
                    Ok(_) => {}
                    Err(_) => break,
                }
            }
        }
        assert!(samples.len() >= 5);
        assert!(samples.windows(2).all(|w| w[1] >= w[0]));

        adapter.pause();
        advance(POLL_INTERVAL).await;
        assert!(!adapter.is_playing());
        adapter.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_seek_clamped_by_player() {
        let (adapter, _events) = EmbeddedPlayerAdapter::new(Some(212.0));
        advance(POLL_INTERVAL).await;

        adapter.seek(9000.0);
        advance(POLL_INTERVAL).await;
        assert_eq!(adapter.current_time(), 212.0);
        adapter.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_events_after_shutdown() {
        let (adapter, mut events) = EmbeddedPlayerAdapter::new(Some(212.0));
        advance(POLL_INTERVAL).await;
        events.recv().await;
        events.recv().await;

        adapter.play();
        adapter.shutdown().await;

        advance(Duration::from_secs(5)).await;
        assert!(events.try_recv().is_err());
    }
}
