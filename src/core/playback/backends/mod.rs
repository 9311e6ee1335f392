//! Playback Backends
//!
//! Concrete adapters behind the playback contract. Local files and direct
//! URLs share the media-element backend; recognized video-host URLs go through
//! the embedded backend with its polling bridge.

mod embedded;
mod media;

pub use embedded::EmbeddedPlayerAdapter;
pub use media::MediaElementAdapter;

use tracing::info;

use crate::core::playback::adapter::{AdapterEventReceiver, PlaybackAdapter};
use crate::core::source::{embed_video_id, SourceDescriptor, SourceKind};
use crate::core::CoreResult;

/// Opens the adapter matching the descriptor's classification.
///
/// Classification is permissive: anything that is not a recognized embed URL
/// plays through the direct-media backend, so this cannot fail on URL shape.
pub fn open_adapter(
    descriptor: &SourceDescriptor,
) -> CoreResult<(Box<dyn PlaybackAdapter>, AdapterEventReceiver)> {
    let kind = descriptor.kind();
    let duration_hint = descriptor.duration_hint();

    match kind {
        SourceKind::LocalFile | SourceKind::RemoteDirectUrl => {
            info!(source = %descriptor.label(), kind = ?kind, "Opening media element backend");
            let (adapter, events) = MediaElementAdapter::new(kind, duration_hint);
            Ok((Box::new(adapter), events))
        }
        SourceKind::EmbeddedThirdParty => {
            let embed_id = embed_video_id(&descriptor.label()).unwrap_or_default();
            info!(source = %descriptor.label(), embed_id = %embed_id, "Opening embedded backend");
            let (adapter, events) = EmbeddedPlayerAdapter::new(duration_hint);
            Ok((Box::new(adapter), events))
        }
    }
}
