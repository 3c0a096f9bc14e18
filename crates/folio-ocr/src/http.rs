//! HTTP OCR provider.

use async_trait::async_trait;
use folio_core::{OcrEngine, OcrError, OcrResult};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// OCR provider speaking a simple JSON-over-HTTP contract: POST the page
/// image bytes, receive `{"text": ...}` or `{"error": ...}`.
pub struct HttpOcrEngine {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct OcrResponse {
    text: Option<String>,
    error: Option<String>,
}

impl HttpOcrEngine {
    /// Create a provider for `endpoint` with the given request timeout.
    pub fn new(endpoint: String, api_key: Option<String>, timeout_secs: u64) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            api_key,
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

#[async_trait]
impl OcrEngine for HttpOcrEngine {
    async fn transcribe(&self, image: &[u8]) -> OcrResult<String> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(image.to_vec())
            .timeout(self.timeout);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| OcrError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(OcrError::Provider(format!("{status}: {body}")));
        }

        let parsed: OcrResponse = response
            .json()
            .await
            .map_err(|e| OcrError::InvalidResponse(e.to_string()))?;

        // An explicit failure marker from the provider is a page failure.
        if let Some(error) = parsed.error {
            return Err(OcrError::Provider(error));
        }
        let text = parsed
            .text
            .ok_or_else(|| OcrError::InvalidResponse("response carried no text field".into()))?;

        debug!(bytes = image.len(), chars = text.len(), "page transcribed");
        Ok(text)
    }
}
