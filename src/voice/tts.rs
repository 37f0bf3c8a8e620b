//! Text-to-speech client
//!
//! Talks to the `OpenAI` speech endpoint and requests raw PCM, which the
//! engine consumes directly as signed 16-bit mono at 24 kHz.

use crate::{Error, Result};

/// Sample rate of the PCM stream the speech endpoint produces (Hz)
pub const TTS_SAMPLE_RATE: u32 = 24_000;

/// Voices the speech endpoint accepts
pub const VOICES: &[&str] = &["alloy", "echo", "fable", "onyx", "nova", "shimmer"];

/// Synthesizes speech as raw PCM.
pub struct TtsClient {
    client: reqwest::Client,
    api_key: String,
    voice: String,
    speed: f32,
    model: String,
}

impl TtsClient {
    /// Create a client with the default `tts-1` model.
    ///
    /// # Errors
    ///
    /// Returns error if the API key is empty
    pub fn new(api_key: String, voice: String, speed: f32) -> Result<Self> {
        Self::with_model(api_key, voice, speed, "tts-1".to_string())
    }

    /// Create a client with a custom model.
    ///
    /// # Errors
    ///
    /// Returns error if the API key is empty
    pub fn with_model(api_key: String, voice: String, speed: f32, model: String) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Config("OpenAI API key required for TTS".to_string()));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            voice,
            speed,
            model,
        })
    }

    /// Default voice this client was configured with
    #[must_use]
    pub fn voice(&self) -> &str {
        &self.voice
    }

    /// Synthesize text to PCM samples at [`TTS_SAMPLE_RATE`].
    ///
    /// `voice` and `speed` override the client defaults for this call.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the endpoint rejects it
    pub async fn synthesize(
        &self,
        text: &str,
        voice: Option<&str>,
        speed: Option<f32>,
    ) -> Result<Vec<i16>> {
        #[derive(serde::Serialize)]
        struct SpeechRequest<'a> {
            model: &'a str,
            input: &'a str,
            voice: &'a str,
            speed: f32,
            response_format: &'a str,
        }

        let request = SpeechRequest {
            model: &self.model,
            input: text,
            voice: voice.unwrap_or(&self.voice),
            speed: speed.unwrap_or(self.speed),
            response_format: "pcm",
        };

        let response = self
            .client
            .post("https://api.openai.com/v1/audio/speech")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Tts(format!("OpenAI TTS error {status}: {body}")));
        }

        let bytes = response.bytes().await?;
        tracing::debug!(bytes = bytes.len(), "speech synthesized");
        Ok(decode_pcm(&bytes))
    }
}

/// Decode little-endian signed 16-bit PCM bytes into samples.
///
/// A trailing odd byte is dropped.
fn decode_pcm(bytes: &[u8]) -> Vec<i16> {
    bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pcm_decode_is_little_endian() {
        let bytes = [0x00, 0x00, 0xff, 0x7f, 0x00, 0x80];
        assert_eq!(decode_pcm(&bytes), vec![0, i16::MAX, i16::MIN]);
    }

    #[test]
    fn pcm_decode_drops_a_trailing_odd_byte() {
        let bytes = [0x01, 0x00, 0x42];
        assert_eq!(decode_pcm(&bytes), vec![1]);
    }

    #[test]
    fn empty_api_key_is_rejected() {
        let err = TtsClient::new(String::new(), "alloy".to_string(), 1.0);
        assert!(err.is_err());
    }
}
