//! Speech endpoints: utterance submission and voice listing

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::speech::{SpeakOptions, UtteranceReport};

use super::ApiState;

/// Build the speech router
#[must_use]
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/speak", post(speak))
        .route("/voices", get(voices))
        .with_state(state)
}

/// Utterance request
#[derive(Debug, Deserialize)]
pub struct SpeakRequest {
    /// Text to speak
    pub text: String,
    /// Voice override for this utterance
    pub voice: Option<String>,
    /// Speed override for this utterance
    pub speed: Option<f32>,
}

/// Utterance response, sent after the robot has finished moving
#[derive(Debug, Serialize)]
pub struct SpeakResponse {
    pub status: &'static str,
    pub hops: usize,
    pub duration_ms: u64,
}

/// Voice list response
#[derive(Debug, Serialize)]
pub struct VoicesResponse {
    pub voices: &'static [&'static str],
}

/// List available TTS voices
async fn voices() -> Json<VoicesResponse> {
    Json(VoicesResponse {
        voices: crate::voice::VOICES,
    })
}

/// Speak an utterance with synchronized head motion
///
/// Blocks until playback and motion complete; concurrent callers queue on
/// the session lock.
async fn speak(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<SpeakRequest>,
) -> Result<Json<SpeakResponse>, SpeakError> {
    if request.text.trim().is_empty() {
        return Err(SpeakError::BadRequest("Empty text"));
    }

    if !state.session.has_tts() {
        return Err(SpeakError::NotConfigured(
            "TTS not configured (no OpenAI API key)",
        ));
    }

    let opts = SpeakOptions {
        voice: request.voice,
        speed: request.speed,
    };

    let UtteranceReport { hops, duration_ms } = state
        .session
        .speak(&request.text, &opts)
        .await
        .map_err(|e| SpeakError::UtteranceFailed(e.to_string()))?;

    Ok(Json(SpeakResponse {
        status: "ok",
        hops,
        duration_ms,
    }))
}

/// Speech API errors
#[derive(Debug)]
pub enum SpeakError {
    NotConfigured(&'static str),
    BadRequest(&'static str),
    UtteranceFailed(String),
}

impl IntoResponse for SpeakError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: ErrorBody,
        }

        #[derive(Serialize)]
        struct ErrorBody {
            code: &'static str,
            message: String,
        }

        let (status, code, message) = match self {
            Self::NotConfigured(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "not_configured", msg.to_string())
            }
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.to_string()),
            Self::UtteranceFailed(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "utterance_failed", msg)
            }
        };

        (status, Json(ErrorResponse { error: ErrorBody { code, message } })).into_response()
    }
}
