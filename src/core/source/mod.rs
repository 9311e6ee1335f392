//! Video Source Classification
//!
//! Descriptors for the three playback source kinds and the pure, synchronous
//! detection logic that classifies them. A remote URL is classified as an
//! embeddable third-party source only when it matches a known video-host
//! pattern; anything else degrades to the direct-media backend, which is a safe
//! fallback, so unrecognized URLs are not an error.

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::{CoreError, CoreResult, TimeSec};

// =============================================================================
// Source Kind
// =============================================================================

/// Classification of how a video is played back
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SourceKind {
    /// Uploaded file played through a local media element
    LocalFile,
    /// Direct media URL played through a remote media element
    RemoteDirectUrl,
    /// Recognized video-host URL played through an embedded player
    EmbeddedThirdParty,
}

// =============================================================================
// Source Request (navigation boundary)
// =============================================================================

/// Raw entry-point input: what the upload page hands over.
///
/// Exactly one of `file`/`url` is expected; when both are present the file
/// wins, and when neither is present the caller must route back to the upload
/// entry point.
#[derive(Clone, Debug, Default)]
pub struct SourceRequest {
    pub file: Option<PathBuf>,
    pub url: Option<String>,
    /// Probed media duration, when the caller already knows it
    pub duration_hint: Option<TimeSec>,
}

impl SourceRequest {
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            file: Some(path.into()),
            url: None,
            duration_hint: None,
        }
    }

    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            file: None,
            url: Some(url.into()),
            duration_hint: None,
        }
    }

    pub fn with_duration_hint(mut self, duration_sec: TimeSec) -> Self {
        self.duration_hint = Some(duration_sec);
        self
    }

    /// Resolves the request into a descriptor, or `NoSource` when empty.
    pub fn resolve(self) -> CoreResult<SourceDescriptor> {
        if let Some(path) = self.file {
            return Ok(SourceDescriptor::LocalFile {
                path,
                duration_hint: self.duration_hint,
            });
        }
        match self.url {
            Some(url) if !url.trim().is_empty() => Ok(SourceDescriptor::Url {
                url,
                duration_hint: self.duration_hint,
            }),
            _ => Err(CoreError::NoSource),
        }
    }
}

// =============================================================================
// Source Descriptor
// =============================================================================

/// Resolved video source
#[derive(Clone, Debug, PartialEq)]
pub enum SourceDescriptor {
    LocalFile {
        path: PathBuf,
        duration_hint: Option<TimeSec>,
    },
    Url {
        url: String,
        duration_hint: Option<TimeSec>,
    },
}

impl SourceDescriptor {
    /// Classifies the descriptor. Pure and synchronous.
    pub fn kind(&self) -> SourceKind {
        match self {
            SourceDescriptor::LocalFile { .. } => SourceKind::LocalFile,
            SourceDescriptor::Url { url, .. } => {
                if embed_video_id(url).is_some() {
                    SourceKind::EmbeddedThirdParty
                } else {
                    SourceKind::RemoteDirectUrl
                }
            }
        }
    }

    /// Probed duration, when known
    pub fn duration_hint(&self) -> Option<TimeSec> {
        match self {
            SourceDescriptor::LocalFile { duration_hint, .. } => *duration_hint,
            SourceDescriptor::Url { duration_hint, .. } => *duration_hint,
        }
    }

    /// Display label for logs and video records
    pub fn label(&self) -> String {
        match self {
            SourceDescriptor::LocalFile { path, .. } => path.to_string_lossy().into_owned(),
            SourceDescriptor::Url { url, .. } => url.clone(),
        }
    }
}

// =============================================================================
// Embed Detection
// =============================================================================

/// Matches the accepted video-host URL shapes and captures the 11-character
/// video identifier:
/// - `youtube.com/watch?v=ID` (with optional `www.`/`m.` subdomain)
/// - `youtube.com/embed/ID`, `youtube.com/shorts/ID`
/// - `youtube-nocookie.com/embed/ID`
/// - short-link form `youtu.be/ID`
static EMBED_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ix)
        ^https?://
        (?:
            (?:www\.|m\.)?youtube(?:-nocookie)?\.com/
            (?:
                watch\?(?:[^\#]*&)?v= |
                embed/ |
                shorts/
            ) |
            youtu\.be/
        )
        ([A-Za-z0-9_-]{11})
        (?:[?&\#/]|$)
        ",
    )
    .expect("embed URL pattern is valid")
});

/// Extracts the embeddable video identifier from a recognized video-host URL.
///
/// Returns `None` for anything that is not a recognized embed URL, including
/// direct media URLs, which callers treat as the direct-media fallback.
pub fn embed_video_id(url: &str) -> Option<String> {
    EMBED_URL
        .captures(url.trim())
        .map(|caps| caps[1].to_string())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // SourceRequest Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_resolve_empty_request_is_no_source() {
        let result = SourceRequest::default().resolve();
        assert!(matches!(result, Err(CoreError::NoSource)));
    }

    #[test]
    fn test_resolve_blank_url_is_no_source() {
        let result = SourceRequest::from_url("   ").resolve();
        assert!(matches!(result, Err(CoreError::NoSource)));
    }

    #[test]
    fn test_resolve_prefers_file_over_url() {
        let request = SourceRequest {
            file: Some(PathBuf::from("/tmp/clip.mp4")),
            url: Some("https://example.com/v.mp4".to_string()),
            duration_hint: None,
        };
        let descriptor = request.resolve().unwrap();
        assert_eq!(descriptor.kind(), SourceKind::LocalFile);
    }

    #[test]
    fn test_duration_hint_carried_through() {
        let descriptor = SourceRequest::from_file("/tmp/clip.mp4")
            .with_duration_hint(120.0)
            .resolve()
            .unwrap();
        assert_eq!(descriptor.duration_hint(), Some(120.0));
    }

    // -------------------------------------------------------------------------
    // Classification Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_watch_url_is_embedded() {
        for url in [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtube.com/watch?v=dQw4w9WgXcQ&t=42",
            "https://m.youtube.com/watch?list=PL1&v=dQw4w9WgXcQ",
            "http://youtu.be/dQw4w9WgXcQ",
            "https://www.youtube-nocookie.com/embed/dQw4w9WgXcQ",
            "https://www.youtube.com/shorts/dQw4w9WgXcQ",
        ] {
            let descriptor = SourceRequest::from_url(url).resolve().unwrap();
            assert_eq!(
                descriptor.kind(),
                SourceKind::EmbeddedThirdParty,
                "expected embed classification for {url}"
            );
        }
    }

    #[test]
    fn test_embed_id_extraction() {
        assert_eq!(
            embed_video_id("https://youtu.be/dQw4w9WgXcQ?t=10").as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(
            embed_video_id("https://www.youtube.com/embed/dQw4w9WgXcQ").as_deref(),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn test_unrecognized_url_falls_back_to_direct() {
        for url in [
            "https://example.com/video.mp4",
            "https://vimeo.com/123456789",
            "https://cdn.host.io/stream/clip.webm?sig=abc",
            // Recognized host but malformed identifier
            "https://www.youtube.com/watch?v=short",
        ] {
            let descriptor = SourceRequest::from_url(url).resolve().unwrap();
            assert_eq!(
                descriptor.kind(),
                SourceKind::RemoteDirectUrl,
                "expected direct fallback for {url}"
            );
        }
    }

    #[test]
    fn test_lookalike_domain_is_not_embedded() {
        assert!(embed_video_id("https://notyoutube.com/watch?v=dQw4w9WgXcQ").is_none());
        assert!(embed_video_id("https://youtu.be.evil.com/dQw4w9WgXcQ").is_none());
    }
}
