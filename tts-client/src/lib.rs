//! Shared speech synthesis library for the pdf-speech workspace
//!
//! Provides a unified interface over TTS engines:
//! - Cloud (Google Translate TTS endpoint, requires network)
//! - Offline (locally installed espeak-ng/espeak engine)

pub mod backend;
pub mod backends;
pub mod error;

pub use backend::{AudioFormat, AudioFragment, SpeechBackend, SpeechRequest};
pub use backends::{BackendKind, CloudBackend, MockBackend, OfflineBackend, get_backend};
pub use error::{Result, TtsError};
