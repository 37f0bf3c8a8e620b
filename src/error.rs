//! Error types for the sway gateway

use thiserror::Error;

/// Result type alias for sway gateway operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the sway gateway
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Text-to-speech error
    #[error("TTS error: {0}")]
    Tts(String),

    /// Audio device or playback error
    #[error("audio error: {0}")]
    Audio(String),

    /// Actuator error (pose command rejected or robot unreachable)
    #[error("actuator error: {0}")]
    Actuator(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}
