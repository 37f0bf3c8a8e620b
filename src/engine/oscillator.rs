//! Six-axis oscillator bank
//!
//! One sinusoid per motion axis, each with a fixed frequency, a fixed peak
//! amplitude, and a phase offset drawn once from a seeded RNG. Independent
//! frequencies and phases keep the axes from moving in lockstep, which
//! reads as far less mechanical than a single projected oscillator.

use std::f64::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use super::HOP_SECS;

/// Pitch axis: frequency (Hz) and peak amplitude (degrees)
const SWAY_PITCH: (f64, f64) = (2.2, 4.5);
/// Yaw axis: frequency (Hz) and peak amplitude (degrees)
const SWAY_YAW: (f64, f64) = (0.6, 7.5);
/// Roll axis: frequency (Hz) and peak amplitude (degrees)
const SWAY_ROLL: (f64, f64) = (1.3, 2.25);
/// X axis: frequency (Hz) and peak amplitude (millimeters)
const SWAY_X: (f64, f64) = (0.35, 4.5);
/// Y axis: frequency (Hz) and peak amplitude (millimeters)
const SWAY_Y: (f64, f64) = (0.45, 3.75);
/// Z axis: frequency (Hz) and peak amplitude (millimeters)
const SWAY_Z: (f64, f64) = (0.25, 2.25);

/// An instantaneous pose delta to compose against the neutral pose.
///
/// Rotations in radians, translations in millimeters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MotionSample {
    pub pitch_rad: f64,
    pub yaw_rad: f64,
    pub roll_rad: f64,
    pub x_mm: f64,
    pub y_mm: f64,
    pub z_mm: f64,
}

impl MotionSample {
    /// Largest absolute offset across all six axes, for quick magnitude
    /// checks in logs and tests.
    #[must_use]
    pub fn max_abs(&self) -> f64 {
        self.pitch_rad
            .abs()
            .max(self.yaw_rad.abs())
            .max(self.roll_rad.abs())
            .max(self.x_mm.abs())
            .max(self.y_mm.abs())
            .max(self.z_mm.abs())
    }
}

/// One sinusoidal axis with immutable phase.
#[derive(Debug, Clone, Copy)]
struct Axis {
    freq: f64,
    peak: f64,
    phase: f64,
}

impl Axis {
    fn sample(self, t: f64, gain: f64) -> f64 {
        self.peak * gain * (TAU * self.freq * t + self.phase).sin()
    }
}

/// The six-axis bank with a shared time accumulator.
///
/// Phases are drawn once at construction from the given seed and never
/// change; only the time accumulator advances, exactly one hop per hop
/// processed. The same seed always reproduces the same motion trace.
#[derive(Debug, Clone)]
pub struct OscillatorBank {
    pitch: Axis,
    yaw: Axis,
    roll: Axis,
    x: Axis,
    y: Axis,
    z: Axis,
    t: f64,
}

impl OscillatorBank {
    /// Create a bank with phases drawn from `seed`.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut axis = |(freq, peak): (f64, f64)| Axis {
            freq,
            peak,
            phase: rng.gen_range(0.0..TAU),
        };
        Self {
            pitch: axis(SWAY_PITCH),
            yaw: axis(SWAY_YAW),
            roll: axis(SWAY_ROLL),
            x: axis(SWAY_X),
            y: axis(SWAY_Y),
            z: axis(SWAY_Z),
            t: 0.0,
        }
    }

    /// Advance the time accumulator by one hop.
    ///
    /// Called once for every hop consumed, including hops that produce no
    /// motion sample, so oscillator phase stays continuous across gaps.
    pub fn advance(&mut self) {
        self.t += HOP_SECS;
    }

    /// Sample all six axes at the current time, scaled by `gain`
    /// (loudness × envelope × master).
    #[must_use]
    pub fn sample(&self, gain: f64) -> MotionSample {
        MotionSample {
            pitch_rad: self.pitch.sample(self.t, gain).to_radians(),
            yaw_rad: self.yaw.sample(self.t, gain).to_radians(),
            roll_rad: self.roll.sample(self.t, gain).to_radians(),
            x_mm: self.x.sample(self.t, gain),
            y_mm: self.y.sample(self.t, gain),
            z_mm: self.z.sample(self.t, gain),
        }
    }

    /// Elapsed time on the shared accumulator (seconds)
    #[must_use]
    pub const fn elapsed(&self) -> f64 {
        self.t
    }
}
