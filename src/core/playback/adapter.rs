//! Playback Adapter Contract
//!
//! One operation set regardless of which backend is active. The controller
//! never sees a backend-specific object: commands go through the trait, state
//! changes come back as `AdapterEvent`s on a channel, delivered in the order
//! the backend raised them.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::core::source::SourceKind;
use crate::core::TimeSec;

// =============================================================================
// Adapter Events
// =============================================================================

/// State-change notification from a playback backend
#[derive(Clone, Debug, PartialEq)]
pub enum AdapterEvent {
    /// Backend finished initializing and accepts commands
    Ready,
    /// Playback started
    Play,
    /// Playback paused
    Pause,
    /// Periodic position report
    TimeUpdate(TimeSec),
    /// Media duration became known (or changed)
    DurationChanged(TimeSec),
}

pub type AdapterEventReceiver = mpsc::UnboundedReceiver<AdapterEvent>;
pub(crate) type AdapterEventSender = mpsc::UnboundedSender<AdapterEvent>;

// =============================================================================
// Playback Adapter Trait
// =============================================================================

/// Uniform playback surface over the three backends.
///
/// Commands are accepted immediately; whether they apply synchronously is
/// backend-specific. Media-element backends apply in place, the embedded
/// backend applies on its next poll tick, so the event stream is the source of
/// truth for observed state.
#[async_trait]
pub trait PlaybackAdapter: Send + Sync {
    /// Which backend family this adapter drives
    fn source_kind(&self) -> SourceKind;

    /// Starts playback. Idempotent: a no-op while already playing.
    fn play(&self);

    /// Pauses playback. Idempotent: a no-op while already paused.
    fn pause(&self);

    /// Seeks to a position, silently clamped to `[0, duration]`.
    fn seek(&self, time: TimeSec);

    /// Sets volume, clamped to `[0, 1]`.
    fn set_volume(&self, level: f64);

    /// Last observed playback position
    fn current_time(&self) -> TimeSec;

    /// Known duration; `0` until metadata is available (a valid state)
    fn duration(&self) -> TimeSec;

    /// Last observed playing flag
    fn is_playing(&self) -> bool;

    /// Current volume level
    fn volume(&self) -> f64;

    /// Tears the backend down: stops internal timers and guarantees no event
    /// is delivered after this returns.
    async fn shutdown(&self);
}
