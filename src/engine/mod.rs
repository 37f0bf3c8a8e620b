//! Audio-envelope-to-motion engine
//!
//! Streams speech PCM into small head-sway offsets so the robot appears to
//! move in time with its own voice. The pipeline runs once per 50 ms hop:
//!
//! ```text
//! raw chunk → normalize (mono f32 @ 16 kHz) → carry buffer
//!     → hop slice → sample history → 20 ms analysis frame
//!     → RMS dBFS → VAD ──→ envelope ─┐
//!               └──→ loudness gain ──┴→ oscillator bank → MotionSample
//! ```
//!
//! The analysis frame is deliberately shorter than the hop: only the most
//! recent 20 ms of history is measured each hop, which makes the detector
//! react to the newest audio rather than the hop average.

pub mod envelope;
pub mod generator;
pub mod level;
pub mod normalize;
pub mod oscillator;
pub mod vad;

pub use generator::{DEFAULT_PHASE_SEED, SwayGenerator};
pub use normalize::{AudioChunk, RawSamples, resample_linear};
pub use oscillator::{MotionSample, OscillatorBank};
pub use vad::VoiceDetector;

/// Internal engine sample rate (Hz); all analysis happens at this rate
pub const SAMPLE_RATE: u32 = 16_000;

/// Analysis frame duration in milliseconds
pub const FRAME_MS: u64 = 20;

/// Hop duration in milliseconds; the engine emits at most one motion sample
/// per hop
pub const HOP_MS: u64 = 50;

/// Samples per 20 ms analysis frame at 16 kHz
pub const FRAME_LEN: usize = 320;

/// Samples per 50 ms hop at 16 kHz
pub const HOP_LEN: usize = 800;

/// Hop duration in seconds, the step of the oscillator time accumulator
pub const HOP_SECS: f64 = 0.05;

/// Bounded sample history: 10 seconds at 16 kHz
pub(crate) const HISTORY_LEN: usize = 160_000;

/// Convert a duration in milliseconds to a hop count, minimum 1.
#[allow(clippy::cast_possible_truncation)]
pub(crate) const fn hops_for_ms(ms: u64) -> u32 {
    let hops = ms / HOP_MS;
    if hops == 0 { 1 } else { hops as u32 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_lengths_match_rates() {
        assert_eq!(FRAME_LEN as u64, u64::from(SAMPLE_RATE) * FRAME_MS / 1000);
        assert_eq!(HOP_LEN as u64, u64::from(SAMPLE_RATE) * HOP_MS / 1000);
    }

    #[test]
    fn hop_counts_round_down_with_floor_of_one() {
        assert_eq!(hops_for_ms(40), 1);
        assert_eq!(hops_for_ms(50), 1);
        assert_eq!(hops_for_ms(250), 5);
        assert_eq!(hops_for_ms(10), 1);
    }
}
