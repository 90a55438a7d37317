//! Cloud TTS backend
//!
//! Direct HTTP implementation against the Google Translate TTS endpoint,
//! which returns MP3 audio for short text inputs.

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use std::time::Duration;

use crate::backend::{AudioFormat, AudioFragment, SpeechBackend, SpeechRequest};
use crate::error::{Result, TtsError};

const TRANSLATE_TTS_URL: &str = "https://translate.google.com/translate_tts";

/// The endpoint rejects long inputs; this matches the limit the service
/// tokenizes requests at.
pub const CLOUD_MAX_SEGMENT_LEN: usize = 200;

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Backend for cloud speech synthesis
pub struct CloudBackend {
    client: Client,
    base_url: String,
}

impl CloudBackend {
    /// Create a new cloud backend
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| TtsError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: TRANSLATE_TTS_URL.to_string(),
        })
    }

    /// Override the endpoint URL (useful for tests)
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[async_trait]
impl SpeechBackend for CloudBackend {
    async fn synthesize(&self, request: SpeechRequest) -> Result<AudioFragment> {
        if request.text.trim().is_empty() {
            return Err(TtsError::EmptyText);
        }

        debug!(
            "cloud tts request: {} chars, lang={}",
            request.text.chars().count(),
            request.language
        );

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", request.language.as_str()),
                ("q", request.text.as_str()),
            ])
            .send()
            .await
            .map_err(|e| TtsError::Network(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = retry_after_secs(&response);
            return Err(map_status_error(status.as_u16(), retry_after));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| TtsError::Network(format!("Failed to read response body: {}", e)))?;

        if bytes.is_empty() {
            return Err(TtsError::Api {
                message: "Empty audio response".to_string(),
                status_code: Some(status.as_u16()),
            });
        }

        Ok(AudioFragment {
            data: bytes.to_vec(),
            format: AudioFormat::Mp3,
        })
    }

    fn name(&self) -> &'static str {
        "cloud"
    }

    fn max_segment_len(&self) -> usize {
        CLOUD_MAX_SEGMENT_LEN
    }

    fn fragment_format(&self) -> AudioFormat {
        AudioFormat::Mp3
    }

    fn is_available(&self) -> Result<()> {
        // HTTP client was built in the constructor
        Ok(())
    }
}

/// Parse a Retry-After header value, if present
fn retry_after_secs(response: &reqwest::Response) -> Option<u64> {
    response
        .headers()
        .get("retry-after")?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

/// Map a non-success HTTP status to the corresponding error kind
fn map_status_error(status: u16, retry_after: Option<u64>) -> TtsError {
    match status {
        429 => TtsError::RateLimited { retry_after },
        _ => TtsError::Api {
            message: "TTS request rejected".to_string(),
            status_code: Some(status),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_maps_to_quota_error() {
        let err = map_status_error(429, Some(30));
        assert!(matches!(
            err,
            TtsError::RateLimited {
                retry_after: Some(30)
            }
        ));
    }

    #[test]
    fn test_other_statuses_map_to_api_error() {
        let err = map_status_error(503, None);
        match err {
            TtsError::Api { status_code, .. } => assert_eq!(status_code, Some(503)),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_backend_reports_limits() {
        let backend = CloudBackend::new().unwrap();
        assert_eq!(backend.name(), "cloud");
        assert_eq!(backend.max_segment_len(), CLOUD_MAX_SEGMENT_LEN);
        assert_eq!(backend.fragment_format(), AudioFormat::Mp3);
        assert!(backend.is_available().is_ok());
    }

    #[tokio::test]
    async fn test_empty_text_is_rejected() {
        let backend = CloudBackend::new().unwrap();
        let err = backend
            .synthesize(SpeechRequest::new("   "))
            .await
            .unwrap_err();
        assert!(matches!(err, TtsError::EmptyText));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_a_network_error() {
        // The .invalid TLD never resolves, so this fails in DNS without
        // touching the real service.
        let backend = CloudBackend::new()
            .unwrap()
            .with_base_url("http://tts.invalid/translate_tts");
        let err = backend
            .synthesize(SpeechRequest::new("hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, TtsError::Network(_)));
    }
}
