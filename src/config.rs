//! Configuration management for the sway gateway
//!
//! Engine constants (sample rates, thresholds, amplitudes) are fixed in
//! the engine modules; everything here is runtime wiring: credentials,
//! voice defaults, server options. Loaded from an optional TOML file with
//! environment variables layered on top (env wins).

use std::path::PathBuf;

use serde::Deserialize;

use crate::engine::DEFAULT_PHASE_SEED;
use crate::Result;

/// Sway gateway configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// API keys for external services
    pub api_keys: ApiKeys,

    /// TTS voice configuration
    pub voice: VoiceConfig,

    /// HTTP server and audio output configuration
    pub server: ServerConfig,

    /// Motion engine wiring
    pub motion: MotionConfig,
}

/// API keys for external services
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ApiKeys {
    /// `OpenAI` API key (for TTS)
    pub openai: Option<String>,
}

/// TTS voice configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// TTS voice identifier
    pub tts_voice: String,

    /// TTS model (e.g. "tts-1", "tts-1-hd")
    pub tts_model: String,

    /// TTS speed multiplier (0.25 to 4.0)
    pub tts_speed: f32,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            tts_voice: "alloy".to_string(),
            tts_model: "tts-1".to_string(),
            tts_speed: 1.0,
        }
    }
}

/// HTTP server and audio output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Port to listen on
    pub port: u16,

    /// Output device name substring; system default when unset
    pub speaker: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            speaker: None,
        }
    }
}

/// Motion engine wiring
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Seed for the oscillator phase draw
    pub phase_seed: u64,

    /// Skip audio output; motion still runs
    pub mute: bool,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            phase_seed: DEFAULT_PHASE_SEED,
            mute: false,
        }
    }
}

/// Path to the user config file (`~/.config/sway-gateway/config.toml` on
/// Linux), if a home directory can be determined.
#[must_use]
pub fn config_file() -> Option<PathBuf> {
    directories::ProjectDirs::from("dev", "omni", "sway-gateway")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

impl Config {
    /// Load configuration: file first (when present), then environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns error if the config file exists but cannot be parsed
    pub fn load() -> Result<Self> {
        let mut config = match config_file() {
            Some(path) if path.exists() => {
                tracing::debug!(path = %path.display(), "loading config file");
                let raw = std::fs::read_to_string(&path)?;
                toml::from_str(&raw)?
            }
            _ => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    /// Layer environment variables over the loaded values.
    fn apply_env(&mut self) {
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            self.api_keys.openai = Some(key);
        }
        if let Ok(voice) = std::env::var("SWAY_TTS_VOICE") {
            self.voice.tts_voice = voice;
        }
        if let Ok(model) = std::env::var("SWAY_TTS_MODEL") {
            self.voice.tts_model = model;
        }
        if let Ok(speed) = std::env::var("SWAY_TTS_SPEED")
            && let Ok(speed) = speed.parse()
        {
            self.voice.tts_speed = speed;
        }
        if let Ok(port) = std::env::var("SWAY_PORT")
            && let Ok(port) = port.parse()
        {
            self.server.port = port;
        }
        if let Ok(speaker) = std::env::var("SWAY_SPEAKER") {
            self.server.speaker = Some(speaker);
        }
        if let Ok(seed) = std::env::var("SWAY_PHASE_SEED")
            && let Ok(seed) = seed.parse()
        {
            self.motion.phase_seed = seed;
        }
        if let Ok(mute) = std::env::var("SWAY_MUTE") {
            self.motion.mute = mute == "1" || mute.eq_ignore_ascii_case("true");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = Config::default();
        assert_eq!(config.voice.tts_voice, "alloy");
        assert!((config.voice.tts_speed - 1.0).abs() < f32::EPSILON);
        assert_eq!(config.motion.phase_seed, DEFAULT_PHASE_SEED);
        assert!(!config.motion.mute);
        assert!(config.server.speaker.is_none());
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config: Config = toml::from_str(
            r#"
            [voice]
            tts_voice = "nova"

            [motion]
            phase_seed = 99
            "#,
        )
        .unwrap();

        assert_eq!(config.voice.tts_voice, "nova");
        assert_eq!(config.voice.tts_model, "tts-1");
        assert_eq!(config.motion.phase_seed, 99);
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn empty_toml_parses_to_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.api_keys.openai.is_none());
    }
}
