//! Streaming sway generator
//!
//! Owns the carry buffer, the bounded sample history, and the per-hop
//! pipeline state. `feed` accepts arbitrarily sized chunks and produces at
//! most one motion sample per full hop buffered; results are independent
//! of how the audio is split across calls.

use std::collections::VecDeque;

use super::envelope::SwayEnvelope;
use super::level::{self, MASTER_GAIN};
use super::normalize::{self, AudioChunk};
use super::oscillator::{MotionSample, OscillatorBank};
use super::vad::VoiceDetector;
use super::{FRAME_LEN, HISTORY_LEN, HOP_LEN};

/// Default seed for the oscillator phase draw
pub const DEFAULT_PHASE_SEED: u64 = 7;

/// One generator instance per utterance (or long-lived session).
///
/// All state accumulates across `feed` calls and is discarded with the
/// instance; nothing persists across restarts.
pub struct SwayGenerator {
    carry: Vec<f32>,
    history: VecDeque<f32>,
    detector: VoiceDetector,
    envelope: SwayEnvelope,
    bank: OscillatorBank,
}

impl Default for SwayGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_PHASE_SEED)
    }
}

impl SwayGenerator {
    /// Create a generator with oscillator phases drawn from `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            carry: Vec::new(),
            history: VecDeque::with_capacity(HISTORY_LEN),
            detector: VoiceDetector::new(),
            envelope: SwayEnvelope::new(),
            bank: OscillatorBank::seeded(seed),
        }
    }

    /// Feed one audio chunk and collect the motion samples it completes.
    ///
    /// Empty or degenerate input yields an empty result and leaves all
    /// state untouched. Partial hops stay in the carry buffer for the next
    /// call; after return the carry always holds less than one hop.
    pub fn feed(&mut self, chunk: &AudioChunk<'_>) -> Vec<MotionSample> {
        let samples = normalize::normalize(chunk);
        if samples.is_empty() {
            return Vec::new();
        }
        self.carry.extend_from_slice(&samples);

        let mut out = Vec::new();
        while self.carry.len() >= HOP_LEN {
            let hop: Vec<f32> = self.carry.drain(..HOP_LEN).collect();
            self.push_history(&hop);

            // Not enough history for an analysis frame yet: the hop still
            // consumes its slot on the time accumulator so oscillator
            // phase stays continuous.
            if self.history.len() < FRAME_LEN {
                self.bank.advance();
                continue;
            }

            // Only the most recent 20 ms is measured, not the whole hop.
            let frame = self.tail_frame();
            let db = level::rms_dbfs(&frame);
            let active = self.detector.update(db);
            let env = self.envelope.update(active);
            let loud = level::loudness_gain(db) * MASTER_GAIN;

            self.bank.advance();
            let sample = self.bank.sample(loud * env);

            tracing::trace!(
                db = format_args!("{db:.1}"),
                active,
                env = format_args!("{env:.3}"),
                peak = format_args!("{:.4}", sample.max_abs()),
                "hop processed"
            );
            out.push(sample);
        }
        out
    }

    /// Append a hop to the bounded history, discarding the oldest samples.
    fn push_history(&mut self, hop: &[f32]) {
        for &s in hop {
            if self.history.len() == HISTORY_LEN {
                self.history.pop_front();
            }
            self.history.push_back(s);
        }
    }

    /// Copy the most recent analysis frame out of the history.
    fn tail_frame(&self) -> Vec<f32> {
        self.history
            .iter()
            .skip(self.history.len() - FRAME_LEN)
            .copied()
            .collect()
    }

    /// Current sway envelope value in `[0, 1]`
    #[must_use]
    pub const fn envelope(&self) -> f64 {
        self.envelope.value()
    }

    /// Latched voice-activity state
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.detector.is_active()
    }

    /// Elapsed time on the oscillator accumulator (seconds)
    #[must_use]
    pub const fn elapsed(&self) -> f64 {
        self.bank.elapsed()
    }

    /// Samples currently waiting for a full hop
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.carry.len()
    }
}
