//! Clipsight Core Library
//!
//! Engine for an AI video clipper: a video source (local file, direct URL, or an
//! embeddable third-party player URL) is loaded behind one playback control
//! surface, an asynchronous analysis provider produces a ranked set of highlight
//! clips, and pure view projections render a scrubbable timeline and a ranked
//! clip list for whatever UI embeds the crate.

pub mod core;

pub use crate::core::{CoreError, CoreResult};
pub use crate::core::analysis::{ClipAnalysisProvider, FixtureAnalysisProvider};
pub use crate::core::clips::{Clip, VideoRecord, VideoStatus};
pub use crate::core::playback::{PlaybackController, PlaybackControllerConfig};
pub use crate::core::source::{SourceDescriptor, SourceKind, SourceRequest};
pub use crate::core::store::{ClipStore, SqliteClipStore};
