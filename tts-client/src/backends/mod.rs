//! Speech backend implementations

mod cloud;
pub mod mock;
mod offline;

pub use cloud::CloudBackend;
pub use mock::MockBackend;
pub use offline::OfflineBackend;

use crate::backend::SpeechBackend;
use crate::error::{Result, TtsError};

/// Supported backend variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Cloud,
    Offline,
}

impl BackendKind {
    /// Parse backend kind from string
    pub fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "cloud" => Ok(Self::Cloud),
            "offline" => Ok(Self::Offline),
            _ => Err(TtsError::Config(format!(
                "Unknown engine: {} (expected 'cloud' or 'offline')",
                s
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cloud => "cloud",
            Self::Offline => "offline",
        }
    }
}

/// Create a backend instance for the given kind
pub fn get_backend(kind: BackendKind) -> Result<Box<dyn SpeechBackend>> {
    match kind {
        BackendKind::Cloud => Ok(Box::new(CloudBackend::new()?)),
        BackendKind::Offline => Ok(Box::new(OfflineBackend::new(None)?)),
    }
}
