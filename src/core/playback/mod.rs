//! Playback
//!
//! Unifies three playback backends (local media element, remote media element,
//! embedded third-party player) behind one adapter contract, and owns the
//! controller that drives them.

mod adapter;
pub mod backends;
mod controller;

pub use adapter::{AdapterEvent, AdapterEventReceiver, PlaybackAdapter};
pub use backends::open_adapter;
pub use controller::{
    AnalysisState, PlaybackController, PlaybackControllerConfig, PlaybackState,
};
