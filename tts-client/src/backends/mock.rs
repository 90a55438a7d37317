//! Mock speech backend for testing
//!
//! Provides a configurable backend that can simulate failures, rate limits,
//! and successful synthesis without touching the network or a local engine.

use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::backend::{AudioFormat, AudioFragment, SpeechBackend, SpeechRequest};
use crate::error::{Result, TtsError};

/// A mock backend for testing pipeline and error handling behavior
pub struct MockBackend {
    /// Number of times to fail before succeeding (0 = always succeed)
    fail_count: AtomicUsize,
    /// Current call count
    call_count: AtomicUsize,
    /// Error to return on failure (None = always succeed)
    fail_with: Mutex<Option<TtsError>>,
    /// Texts of all requests received, in order
    requests: Mutex<Vec<String>>,
    /// Echo mode: fragment data mirrors the request text
    echo: bool,
    /// Fragment bytes to return on success when not echoing
    success_data: Vec<u8>,
    /// Request limit reported to callers
    max_segment_len: usize,
}

impl MockBackend {
    /// Create a backend that always succeeds with the given fragment bytes
    pub fn always_succeeds(data: &[u8]) -> Self {
        Self {
            fail_count: AtomicUsize::new(0),
            call_count: AtomicUsize::new(0),
            fail_with: Mutex::new(None),
            requests: Mutex::new(Vec::new()),
            echo: false,
            success_data: data.to_vec(),
            max_segment_len: 200,
        }
    }

    /// Create a backend whose fragments carry the request text as bytes,
    /// so tests can match fragments back to segments
    pub fn echoes() -> Self {
        let mut backend = Self::always_succeeds(&[]);
        backend.echo = true;
        backend
    }

    /// Create a backend that always fails with the given error
    pub fn always_fails(error: TtsError) -> Self {
        Self {
            fail_count: AtomicUsize::new(usize::MAX),
            call_count: AtomicUsize::new(0),
            fail_with: Mutex::new(Some(error)),
            requests: Mutex::new(Vec::new()),
            echo: false,
            success_data: Vec::new(),
            max_segment_len: 200,
        }
    }

    /// Create a backend that fails `n` times with the given error, then
    /// succeeds with the given fragment bytes
    pub fn fails_then_succeeds(n: usize, error: TtsError, data: &[u8]) -> Self {
        Self {
            fail_count: AtomicUsize::new(n),
            call_count: AtomicUsize::new(0),
            fail_with: Mutex::new(Some(error)),
            requests: Mutex::new(Vec::new()),
            echo: false,
            success_data: data.to_vec(),
            max_segment_len: 200,
        }
    }

    /// Override the request limit reported to callers
    pub fn with_max_segment_len(mut self, max: usize) -> Self {
        self.max_segment_len = max;
        self
    }

    /// Get the number of times synthesize() was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Get the texts of all requests received, in order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechBackend for MockBackend {
    async fn synthesize(&self, request: SpeechRequest) -> Result<AudioFragment> {
        if request.text.trim().is_empty() {
            return Err(TtsError::EmptyText);
        }

        self.requests.lock().unwrap().push(request.text.clone());

        let call_num = self.call_count.fetch_add(1, Ordering::SeqCst);
        let fail_count = self.fail_count.load(Ordering::SeqCst);

        if call_num < fail_count {
            let error = self.fail_with.lock().unwrap();
            if let Some(err) = error.as_ref() {
                return Err(clone_error(err));
            }
        }

        let data = if self.echo {
            request.text.into_bytes()
        } else {
            self.success_data.clone()
        };

        Ok(AudioFragment {
            data,
            format: AudioFormat::Mp3,
        })
    }

    fn name(&self) -> &'static str {
        "mock"
    }

    fn max_segment_len(&self) -> usize {
        self.max_segment_len
    }

    fn fragment_format(&self) -> AudioFormat {
        AudioFormat::Mp3
    }

    fn is_available(&self) -> Result<()> {
        Ok(())
    }
}

/// Clone a TtsError (needed because TtsError doesn't implement Clone)
fn clone_error(err: &TtsError) -> TtsError {
    match err {
        TtsError::Network(s) => TtsError::Network(s.clone()),
        TtsError::RateLimited { retry_after } => TtsError::RateLimited {
            retry_after: *retry_after,
        },
        TtsError::Api {
            message,
            status_code,
        } => TtsError::Api {
            message: message.clone(),
            status_code: *status_code,
        },
        TtsError::EngineUnavailable(s) => TtsError::EngineUnavailable(s.clone()),
        TtsError::EngineFailed(s) => TtsError::EngineFailed(s.clone()),
        TtsError::EmptyText => TtsError::EmptyText,
        TtsError::Config(s) => TtsError::Config(s.clone()),
        // IO errors can't be cloned; a generic stand-in is enough for tests
        TtsError::Io(_) => TtsError::Config("IO error (mock)".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_always_succeeds() {
        let backend = MockBackend::always_succeeds(b"audio");
        let result = backend.synthesize(SpeechRequest::new("hello")).await;
        assert!(result.is_ok());
        assert_eq!(result.unwrap().data, b"audio");
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_always_fails() {
        let backend = MockBackend::always_fails(TtsError::Network("down".to_string()));

        for _ in 0..3 {
            let result = backend.synthesize(SpeechRequest::new("hello")).await;
            assert!(result.is_err());
        }
        assert_eq!(backend.call_count(), 3);
    }

    #[tokio::test]
    async fn test_fails_then_succeeds() {
        let backend = MockBackend::fails_then_succeeds(
            2,
            TtsError::RateLimited { retry_after: None },
            b"audio",
        );

        assert!(backend.synthesize(SpeechRequest::new("a")).await.is_err());
        assert!(backend.synthesize(SpeechRequest::new("b")).await.is_err());

        let result = backend.synthesize(SpeechRequest::new("c")).await;
        assert!(result.is_ok());
        assert_eq!(backend.call_count(), 3);
    }

    #[tokio::test]
    async fn test_echo_mode_mirrors_request_text() {
        let backend = MockBackend::echoes();
        let fragment = backend
            .synthesize(SpeechRequest::new("mirror me"))
            .await
            .unwrap();
        assert_eq!(fragment.data, b"mirror me");
    }

    #[tokio::test]
    async fn test_requests_are_recorded_in_order() {
        let backend = MockBackend::echoes();
        for text in ["one", "two", "three"] {
            backend.synthesize(SpeechRequest::new(text)).await.unwrap();
        }
        assert_eq!(backend.requests(), vec!["one", "two", "three"]);
    }

    #[test]
    fn test_max_segment_len_override() {
        let backend = MockBackend::echoes().with_max_segment_len(50);
        assert_eq!(backend.max_segment_len(), 50);
    }

    #[tokio::test]
    async fn test_empty_text_is_rejected() {
        let backend = MockBackend::echoes();
        let err = backend
            .synthesize(SpeechRequest::new(""))
            .await
            .unwrap_err();
        assert!(matches!(err, TtsError::EmptyText));
        assert_eq!(backend.call_count(), 0);
    }
}
