//! HTTP client for the pose-feedback endpoint.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::config::InferenceSettings;
use crate::models::{Frame, InferenceResult};

use super::protocol::{map_response, ProcessFrameRequest};
use super::FrameEvaluator;

/// Stateless wrapper around the remote pose-feedback endpoint.
///
/// One network call per submitted frame, no retries: a failed sample is
/// simply shown and superseded by the next tick. `evaluate` never
/// errors - transport failures come back as results with
/// `status == Error` and a single `Error: <cause>` feedback line.
pub struct InferenceClient {
    http: reqwest::Client,
    endpoint_url: String,
}

impl InferenceClient {
    /// Build a client from settings.
    ///
    /// The request timeout covers the whole call; a timed-out
    /// submission surfaces through the same path as any other
    /// transport failure.
    pub fn new(settings: &InferenceSettings) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(settings.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            endpoint_url: settings.endpoint_url.clone(),
        })
    }

    /// The configured endpoint URL.
    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }

    /// Issue the network call, returning the parsed response body or a
    /// transport-failure cause.
    async fn post_frame(&self, frame: &Frame) -> Result<serde_json::Value, String> {
        let body = ProcessFrameRequest {
            image: BASE64.encode(frame.jpeg()),
            mode: frame.mode(),
        };

        let response = self
            .http
            .post(&self.endpoint_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let response = response.error_for_status().map_err(|e| e.to_string())?;
        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| e.to_string())
    }
}

#[async_trait]
impl FrameEvaluator for InferenceClient {
    async fn evaluate(&self, frame: &Frame) -> InferenceResult {
        tracing::debug!(
            "[Inference] Submitting {} frame ({} bytes) as {}",
            frame.source(),
            frame.jpeg().len(),
            frame.mode().wire_name()
        );

        match self.post_frame(frame).await {
            Ok(value) => map_response(value),
            Err(cause) => {
                tracing::warn!("[Inference] Submission failed: {}", cause);
                InferenceResult::failure(cause)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PostureMode, ResultStatus, SourceContext};

    fn unreachable_client() -> InferenceClient {
        let settings = InferenceSettings {
            // Nothing listens here; the connection is refused immediately.
            endpoint_url: "http://127.0.0.1:1/api/process_frame".to_string(),
            request_timeout_secs: 2,
            jpeg_quality: 80,
        };
        InferenceClient::new(&settings).unwrap()
    }

    #[tokio::test]
    async fn transport_failure_resolves_to_error_result() {
        let client = unreachable_client();
        let frame = Frame::new(vec![0xFF, 0xD8], PostureMode::Squat, SourceContext::Live);

        let result = client.evaluate(&frame).await;

        assert_eq!(result.status, ResultStatus::Error);
        assert_eq!(result.feedback_messages.len(), 1);
        assert!(result.feedback_messages[0].starts_with("Error: "));
    }

    #[test]
    fn client_reports_configured_endpoint() {
        let client = unreachable_client();
        assert!(client.endpoint_url().starts_with("http://127.0.0.1:1/"));
    }
}
