use thiserror::Error;

#[derive(Error, Debug)]
pub enum TtsError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Rate limit exceeded{}", .retry_after.map(|s| format!(". Retry after {} seconds", s)).unwrap_or_default())]
    RateLimited { retry_after: Option<u64> },

    #[error("TTS API error{}: {message}", status_code.map(|c| format!(" (HTTP {})", c)).unwrap_or_default())]
    Api {
        message: String,
        status_code: Option<u16>,
    },

    #[error("No usable speech engine: {0}")]
    EngineUnavailable(String),

    #[error("Speech engine failed: {0}")]
    EngineFailed(String),

    #[error("Refusing to synthesize empty text")]
    EmptyText,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TtsError>;
