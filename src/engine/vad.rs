//! Voice activity detection
//!
//! A hysteresis latch over per-hop loudness. Two thresholds form a dead
//! band: frames inside it leave both run counters untouched, so brief dips
//! between thresholds do not restart the attack or release count.

use super::hops_for_ms;

/// Level at or above which a frame counts towards activation (dBFS)
const VAD_DB_ON: f64 = -35.0;

/// Level at or below which a frame counts towards release (dBFS)
const VAD_DB_OFF: f64 = -45.0;

/// Attack time before the detector latches on
const VAD_ATTACK_MS: u64 = 40;

/// Release time before the detector lets go
const VAD_RELEASE_MS: u64 = 250;

/// Binary speech-active classifier with hysteresis.
///
/// `active` persists across calls; one [`update`](Self::update) per hop.
#[derive(Debug, Clone)]
pub struct VoiceDetector {
    active: bool,
    above_run: u32,
    below_run: u32,
    attack_hops: u32,
    release_hops: u32,
}

impl Default for VoiceDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl VoiceDetector {
    /// Create a detector with the engine's fixed thresholds.
    #[must_use]
    pub fn new() -> Self {
        Self {
            active: false,
            above_run: 0,
            below_run: 0,
            attack_hops: hops_for_ms(VAD_ATTACK_MS),
            release_hops: hops_for_ms(VAD_RELEASE_MS),
        }
    }

    /// Classify one hop from its frame level and return the latched state.
    pub fn update(&mut self, db: f64) -> bool {
        if db >= VAD_DB_ON {
            self.above_run += 1;
            self.below_run = 0;
            if !self.active && self.above_run >= self.attack_hops {
                self.active = true;
                tracing::debug!(db, run = self.above_run, "voice activity on");
            }
        } else if db <= VAD_DB_OFF {
            self.below_run += 1;
            self.above_run = 0;
            if self.active && self.below_run >= self.release_hops {
                self.active = false;
                tracing::debug!(db, run = self.below_run, "voice activity off");
            }
        }
        // Frames strictly inside the dead band fall through with both
        // counters intact.
        self.active
    }

    /// Latched speech-active state
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Consecutive frames at or above the on-threshold
    #[must_use]
    pub const fn above_run(&self) -> u32 {
        self.above_run
    }

    /// Consecutive frames at or below the off-threshold
    #[must_use]
    pub const fn below_run(&self) -> u32 {
        self.below_run
    }
}
