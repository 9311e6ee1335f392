//! Clipsight Error Definitions
//!
//! Defines error types used throughout the project.
//!
//! The failure policy is degrade-over-crash: analysis and persistence errors are
//! caught at the controller boundary and converted to notices, since the video
//! remains watchable without clips.

use thiserror::Error;

use super::ClipId;

/// Core engine error types
#[derive(Error, Debug)]
pub enum CoreError {
    // =========================================================================
    // Source Errors
    // =========================================================================
    #[error("No video source supplied")]
    NoSource,

    #[error("Unsupported source: {0}")]
    UnsupportedSource(String),

    // =========================================================================
    // Analysis Errors
    // =========================================================================
    #[error("Analysis failed: {0}")]
    AnalysisFailed(String),

    #[error("Analysis provider unavailable: {0}")]
    ProviderUnavailable(String),

    // =========================================================================
    // Persistence Errors
    // =========================================================================
    #[error("Persistence failed: {0}")]
    Persistence(String),

    #[error("Video not found: {0}")]
    VideoNotFound(String),

    #[error("Clip not found: {0}")]
    ClipNotFound(ClipId),

    // =========================================================================
    // General Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Core engine result type
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Whether the error is recoverable by retrying the same operation.
    ///
    /// Analysis and persistence failures never take playback down with them.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CoreError::AnalysisFailed(_)
                | CoreError::ProviderUnavailable(_)
                | CoreError::Persistence(_)
        )
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::AnalysisFailed("timed out".to_string());
        assert_eq!(err.to_string(), "Analysis failed: timed out");

        let err = CoreError::NoSource;
        assert_eq!(err.to_string(), "No video source supplied");
    }

    #[test]
    fn test_recoverable_classification() {
        assert!(CoreError::AnalysisFailed("x".into()).is_recoverable());
        assert!(CoreError::Persistence("x".into()).is_recoverable());
        assert!(!CoreError::NoSource.is_recoverable());
        assert!(!CoreError::ValidationError("x".into()).is_recoverable());
    }
}
