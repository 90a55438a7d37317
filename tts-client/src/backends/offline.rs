//! Offline TTS backend
//!
//! Runs a locally installed espeak-ng (or espeak) voice engine as a
//! subprocess, capturing WAV audio from its --stdout mode.

use async_trait::async_trait;
use log::debug;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

use crate::backend::{AudioFormat, AudioFragment, SpeechBackend, SpeechRequest};
use crate::error::{Result, TtsError};

/// The engine itself has no request limit, but long inputs produce unwieldy
/// single fragments; cap them well above the cloud limit.
pub const OFFLINE_MAX_SEGMENT_LEN: usize = 800;

/// Engine binaries probed in order of preference.
const ENGINE_NAMES: &[&str] = &["espeak-ng", "espeak"];

/// espeak's default speed, scaled by the request's speaking rate.
const BASE_WORDS_PER_MINUTE: f32 = 175.0;

/// Backend for offline speech synthesis
#[derive(Debug)]
pub struct OfflineBackend {
    engine_path: PathBuf,
}

impl OfflineBackend {
    /// Create a new offline backend.
    ///
    /// Verifies the explicitly given engine path, or searches PATH for a
    /// known engine. Returns an error if no usable engine is found.
    pub fn new(engine_path: Option<PathBuf>) -> Result<Self> {
        let engine_path = match engine_path {
            Some(path) => {
                if !path.exists() {
                    return Err(TtsError::EngineUnavailable(format!(
                        "Speech engine not found at specified path: {}",
                        path.display()
                    )));
                }
                path
            }
            None => find_engine()?,
        };

        Ok(Self { engine_path })
    }

    /// Path of the engine binary this backend runs
    pub fn engine_path(&self) -> &PathBuf {
        &self.engine_path
    }
}

/// Search PATH for an installed voice engine
fn find_engine() -> Result<PathBuf> {
    for name in ENGINE_NAMES {
        if let Ok(path) = which::which(name) {
            return Ok(path);
        }
    }

    Err(TtsError::EngineUnavailable(
        "No speech engine found. Install espeak-ng or espeak.".to_string(),
    ))
}

#[async_trait]
impl SpeechBackend for OfflineBackend {
    async fn synthesize(&self, request: SpeechRequest) -> Result<AudioFragment> {
        if request.text.trim().is_empty() {
            return Err(TtsError::EmptyText);
        }

        let words_per_minute = (BASE_WORDS_PER_MINUTE * request.speaking_rate).round() as u32;

        debug!(
            "offline tts: {} chars via {}",
            request.text.chars().count(),
            self.engine_path.display()
        );

        let output = Command::new(&self.engine_path)
            .args(["-v", &request.language])
            .args(["-s", &words_per_minute.to_string()])
            .arg("--stdout")
            .arg(&request.text)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                TtsError::EngineFailed(format!(
                    "Failed to execute {}: {}",
                    self.engine_path.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TtsError::EngineFailed(format!(
                "Engine exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        if output.stdout.is_empty() {
            return Err(TtsError::EngineFailed(
                "Engine produced no audio".to_string(),
            ));
        }

        Ok(AudioFragment {
            data: output.stdout,
            format: AudioFormat::Wav,
        })
    }

    fn name(&self) -> &'static str {
        "offline"
    }

    fn max_segment_len(&self) -> usize {
        OFFLINE_MAX_SEGMENT_LEN
    }

    fn fragment_format(&self) -> AudioFormat {
        AudioFormat::Wav
    }

    fn is_available(&self) -> Result<()> {
        // Engine was located in the constructor
        Ok(())
    }
}
