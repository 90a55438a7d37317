use async_trait::async_trait;

use crate::error::Result;

/// Request sent to a speech backend
#[derive(Debug, Clone)]
pub struct SpeechRequest {
    pub text: String,
    /// Voice language code, e.g. "en"
    pub language: String,
    /// Speaking rate multiplier (0.5-2.0, default 1.0)
    pub speaking_rate: f32,
}

impl SpeechRequest {
    /// Create a request with default voice settings.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: "en".to_string(),
            speaking_rate: 1.0,
        }
    }

    /// Set the voice language code.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set the speaking rate multiplier.
    pub fn with_speaking_rate(mut self, rate: f32) -> Self {
        self.speaking_rate = rate.clamp(0.5, 2.0);
        self
    }
}

/// Container format of synthesized audio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Mp3,
    Wav,
}

impl AudioFormat {
    /// File extension for this format, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
        }
    }
}

/// Audio produced for one request
#[derive(Debug, Clone)]
pub struct AudioFragment {
    pub data: Vec<u8>,
    pub format: AudioFormat,
}

/// Trait for speech backends
#[async_trait]
pub trait SpeechBackend: Send + Sync {
    /// Synthesize one request into one audio fragment.
    ///
    /// Either returns a fragment or fails; a request is never silently
    /// dropped.
    async fn synthesize(&self, request: SpeechRequest) -> Result<AudioFragment>;

    /// Get the backend name for display
    fn name(&self) -> &'static str;

    /// Longest text this backend accepts per request, in characters
    fn max_segment_len(&self) -> usize;

    /// Container format of the fragments this backend produces
    fn fragment_format(&self) -> AudioFormat;

    /// Check if the backend is usable (engine installed, client built, etc.)
    fn is_available(&self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let request = SpeechRequest::new("hello");
        assert_eq!(request.text, "hello");
        assert_eq!(request.language, "en");
        assert_eq!(request.speaking_rate, 1.0);
    }

    #[test]
    fn test_request_builder() {
        let request = SpeechRequest::new("hola")
            .with_language("es")
            .with_speaking_rate(1.5);
        assert_eq!(request.language, "es");
        assert_eq!(request.speaking_rate, 1.5);
    }

    #[test]
    fn test_speaking_rate_clamping() {
        let request = SpeechRequest::new("x").with_speaking_rate(10.0);
        assert_eq!(request.speaking_rate, 2.0);
        let request = SpeechRequest::new("x").with_speaking_rate(0.0);
        assert_eq!(request.speaking_rate, 0.5);
    }

    #[test]
    fn test_format_extension() {
        assert_eq!(AudioFormat::Mp3.extension(), "mp3");
        assert_eq!(AudioFormat::Wav.extension(), "wav");
    }
}
