//! Clip Analysis
//!
//! Asynchronous providers that detect highlight clips in a video. The trait is
//! the only thing the playback controller knows about; concrete providers live
//! in `providers/`.

mod provider;
pub mod providers;

pub use provider::{AnalysisRequest, ClipAnalysisProvider, DetectedClip};
pub use providers::FixtureAnalysisProvider;
#[cfg(feature = "remote-analysis")]
pub use providers::HttpAnalysisProvider;
