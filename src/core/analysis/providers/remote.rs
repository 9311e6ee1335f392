//! HTTP Analysis Provider
//!
//! Sends the video descriptor to a remote detection service and parses the
//! returned detections. Only compiled with the `remote-analysis` feature.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::analysis::{AnalysisRequest, ClipAnalysisProvider, DetectedClip};
use crate::core::{CoreError, CoreResult};

// =============================================================================
// HTTP Provider
// =============================================================================

/// Remote detection service client
pub struct HttpAnalysisProvider {
    endpoint: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl HttpAnalysisProvider {
    /// Default request timeout
    pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

    pub fn new(endpoint: &str, api_key: Option<String>) -> CoreResult<Self> {
        if endpoint.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "Analysis endpoint cannot be empty".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| CoreError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
            client,
        })
    }
}

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeRequestBody {
    video_id: String,
    source: String,
    duration_sec: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeResponseBody {
    clips: Vec<DetectedClip>,
}

#[async_trait]
impl ClipAnalysisProvider for HttpAnalysisProvider {
    fn provider_name(&self) -> &str {
        "http"
    }

    fn is_available(&self) -> bool {
        self.api_key.as_deref().is_none_or(|k| !k.is_empty())
    }

    async fn analyze(&self, request: AnalysisRequest) -> CoreResult<Vec<DetectedClip>> {
        let url = format!("{}/v1/analyze", self.endpoint);
        debug!(video_id = %request.video_id, url = %url, "Remote analysis started");

        let body = AnalyzeRequestBody {
            video_id: request.video_id.clone(),
            source: request.descriptor.label(),
            duration_sec: request.duration_sec,
        };

        let mut http_request = self.client.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            http_request = http_request.bearer_auth(key);
        }

        let response = http_request
            .send()
            .await
            .map_err(|e| CoreError::ProviderUnavailable(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(CoreError::AnalysisFailed(format!(
                "Service returned {}: {}",
                status, detail
            )));
        }

        let parsed: AnalyzeResponseBody = response
            .json()
            .await
            .map_err(|e| CoreError::AnalysisFailed(format!("Malformed response: {}", e)))?;

        Ok(parsed.clips)
    }

    async fn health_check(&self) -> CoreResult<()> {
        let url = format!("{}/v1/health", self.endpoint);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CoreError::ProviderUnavailable(format!("Health check failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(CoreError::ProviderUnavailable(format!(
                "Health check returned {}",
                response.status()
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_endpoint() {
        assert!(HttpAnalysisProvider::new("  ", None).is_err());
    }

    #[test]
    fn test_trailing_slash_normalized() {
        let provider = HttpAnalysisProvider::new("https://analysis.local/", None).unwrap();
        assert_eq!(provider.endpoint, "https://analysis.local");
    }

    #[test]
    fn test_availability_requires_nonempty_key() {
        let provider = HttpAnalysisProvider::new("https://analysis.local", None).unwrap();
        assert!(provider.is_available());

        let provider =
            HttpAnalysisProvider::new("https://analysis.local", Some(String::new())).unwrap();
        assert!(!provider.is_available());

        let provider =
            HttpAnalysisProvider::new("https://analysis.local", Some("key".to_string())).unwrap();
        assert!(provider.is_available());
    }
}
