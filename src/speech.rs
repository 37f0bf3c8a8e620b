//! Utterance orchestration and hop pacing
//!
//! `SpeechSession` is the per-process context object: it owns the TTS
//! client, the playback device hint, the actuator handle, and the mutex
//! that serializes utterances. One `speak` call synthesizes the whole
//! utterance, then runs two activities to completion: a blocking write of
//! the full PCM buffer to the audio sink, and the hop-paced motion loop.
//! They share only the read-only buffer and a final join.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use crate::actuator::HeadActuator;
use crate::engine::{AudioChunk, SwayGenerator, DEFAULT_PHASE_SEED, HOP_MS};
use crate::voice::{AudioPlayback, TtsClient, TTS_SAMPLE_RATE};
use crate::{Error, Result};

/// Time given to the robot to settle on the neutral pose before and after
/// an utterance
const NEUTRAL_SETTLE: Duration = Duration::from_secs(1);

/// Outcome of one completed utterance.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct UtteranceReport {
    /// Hops the motion loop ran
    pub hops: usize,
    /// Audio duration of the synthesized speech
    pub duration_ms: u64,
}

/// Per-request options layered over the session defaults.
#[derive(Debug, Clone, Default)]
pub struct SpeakOptions {
    /// Voice override for this utterance
    pub voice: Option<String>,
    /// Speed override for this utterance
    pub speed: Option<f32>,
}

/// Session-scoped context for driving speech and motion.
pub struct SpeechSession {
    tts: Option<TtsClient>,
    actuator: Arc<dyn HeadActuator>,
    speaker: Option<String>,
    phase_seed: u64,
    muted: bool,
    utterance_lock: Mutex<()>,
}

impl SpeechSession {
    /// Create a session around an actuator; TTS and playback options are
    /// layered on with the builder methods.
    #[must_use]
    pub fn new(actuator: Arc<dyn HeadActuator>) -> Self {
        Self {
            tts: None,
            actuator,
            speaker: None,
            phase_seed: DEFAULT_PHASE_SEED,
            muted: false,
            utterance_lock: Mutex::new(()),
        }
    }

    /// Attach a TTS client.
    #[must_use]
    pub fn with_tts(mut self, tts: TtsClient) -> Self {
        self.tts = Some(tts);
        self
    }

    /// Prefer an output device whose name contains this substring.
    #[must_use]
    pub fn with_speaker(mut self, speaker: Option<String>) -> Self {
        self.speaker = speaker;
        self
    }

    /// Seed for the oscillator phase draw; same seed, same motion trace.
    #[must_use]
    pub const fn with_phase_seed(mut self, seed: u64) -> Self {
        self.phase_seed = seed;
        self
    }

    /// Skip the audio sink entirely; motion runs as usual.
    #[must_use]
    pub const fn muted(mut self, muted: bool) -> Self {
        self.muted = muted;
        self
    }

    /// Whether a TTS client is attached
    #[must_use]
    pub const fn has_tts(&self) -> bool {
        self.tts.is_some()
    }

    /// Synthesize `text` and speak it with synchronized head motion.
    ///
    /// Serialized: only one utterance animates the robot at a time, later
    /// callers queue on the session lock. Pacing compensates each hop's
    /// own processing latency only; cumulative drift against the audio
    /// sink over very long utterances is accepted.
    ///
    /// # Errors
    ///
    /// Returns error if no TTS client is attached, synthesis fails, the
    /// playback activity fails, or the actuator rejects a pose.
    pub async fn speak(&self, text: &str, opts: &SpeakOptions) -> Result<UtteranceReport> {
        let _guard = self.utterance_lock.lock().await;

        let tts = self
            .tts
            .as_ref()
            .ok_or_else(|| Error::Config("no TTS client configured".to_string()))?;

        tracing::info!(chars = text.len(), "synthesizing utterance");
        let pcm = tts
            .synthesize(text, opts.voice.as_deref(), opts.speed)
            .await?;

        self.run_utterance(Arc::new(pcm)).await
    }

    /// Drive the motion pipeline (and playback, unless muted) from
    /// caller-supplied PCM at the TTS rate. Used by `speak` and by the
    /// motion test command.
    ///
    /// # Errors
    ///
    /// Returns error if playback or the actuator fails.
    pub async fn animate(&self, pcm: Arc<Vec<i16>>) -> Result<UtteranceReport> {
        let _guard = self.utterance_lock.lock().await;
        self.run_utterance(pcm).await
    }

    #[allow(clippy::cast_possible_truncation)]
    async fn run_utterance(&self, pcm: Arc<Vec<i16>>) -> Result<UtteranceReport> {
        let duration_ms = pcm.len() as u64 * 1000 / u64::from(TTS_SAMPLE_RATE);
        let hop = Duration::from_millis(HOP_MS);
        let frames_per_hop = (TTS_SAMPLE_RATE as usize) * (HOP_MS as usize) / 1000;

        self.actuator.goto_neutral(NEUTRAL_SETTLE).await?;

        // Playback writes the whole buffer in one blocking call; the only
        // synchronization with the motion loop is the shared start here
        // and the join below.
        let playback = if self.muted {
            None
        } else {
            let buffer = Arc::clone(&pcm);
            let speaker = self.speaker.clone();
            Some(tokio::task::spawn_blocking(move || {
                let sink = AudioPlayback::new(speaker.as_deref())?;
                sink.write(&buffer)
            }))
        };

        let mut sway = SwayGenerator::new(self.phase_seed);
        let mut hops = 0usize;
        tracing::debug!(duration_ms, frames_per_hop, "motion loop start");

        for chunk in pcm.chunks(frames_per_hop) {
            let hop_start = Instant::now();

            let samples = sway.feed(&AudioChunk::mono_i16(chunk, TTS_SAMPLE_RATE));
            if let Some(latest) = samples.last() {
                self.actuator.set_target(latest).await?;
            }
            hops += 1;

            // Late hops are not retried or caught up; they simply run
            // over budget once.
            let elapsed = hop_start.elapsed();
            if elapsed < hop {
                tokio::time::sleep(hop - elapsed).await;
            }
        }

        tracing::debug!(
            hops,
            envelope = format_args!("{:.3}", sway.envelope()),
            "motion loop done"
        );

        // The motion loop never waits on playback before this point, so a
        // failed write cannot wedge the utterance.
        if let Some(task) = playback {
            task.await
                .map_err(|e| Error::Audio(format!("playback task failed: {e}")))??;
        }

        self.actuator.goto_neutral(NEUTRAL_SETTLE).await?;

        Ok(UtteranceReport { hops, duration_ms })
    }
}
