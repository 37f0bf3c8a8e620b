//! Loudness measurement and mapping
//!
//! RMS level in dBFS drives both the voice activity detector and the
//! perceptual loudness gain that scales the sway amplitude.

/// Numeric floor under the square root and the logarithm; keeps digital
/// silence finite at roughly −240 dBFS
const RMS_FLOOR: f64 = 1e-12;

/// Lower bound of the loudness map (dBFS); at or below this the gain is 0
const SWAY_DB_LOW: f64 = -46.0;

/// Upper bound of the loudness map (dBFS); at or above this the gain is 1
const SWAY_DB_HIGH: f64 = -18.0;

/// Sensitivity offset added to the measured level before mapping (dB)
const SENS_DB_OFFSET: f64 = 4.0;

/// Perceptual exponent; below 1.0 it boosts quiet speech
const LOUDNESS_GAMMA: f64 = 0.9;

/// Global scalar applied on top of the mapped gain
pub const MASTER_GAIN: f64 = 1.5;

/// RMS level of a frame in decibels relative to full scale.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn rms_dbfs(frame: &[f32]) -> f64 {
    if frame.is_empty() {
        return 20.0 * RMS_FLOOR.log10();
    }
    let mean_square = frame.iter().map(|&s| f64::from(s) * f64::from(s)).sum::<f64>()
        / frame.len() as f64;
    let rms = (mean_square + RMS_FLOOR).sqrt();
    20.0 * (rms + RMS_FLOOR).log10()
}

/// Map an instantaneous level in dBFS to a perceptual gain in `[0, 1]`.
///
/// Linear between [`SWAY_DB_LOW`] and [`SWAY_DB_HIGH`] after the sensitivity
/// offset, clamped at both ends, then raised to [`LOUDNESS_GAMMA`]. The
/// caller multiplies by [`MASTER_GAIN`].
#[must_use]
pub fn loudness_gain(db: f64) -> f64 {
    let t = (db + SENS_DB_OFFSET - SWAY_DB_LOW) / (SWAY_DB_HIGH - SWAY_DB_LOW);
    let t = t.clamp(0.0, 1.0);
    t.powf(LOUDNESS_GAMMA)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silence_measures_far_below_any_threshold() {
        let silence = vec![0.0f32; 320];
        assert!(rms_dbfs(&silence) < -100.0);
    }

    #[test]
    fn full_scale_square_measures_near_zero_dbfs() {
        let full: Vec<f32> = (0..320).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        assert!(rms_dbfs(&full).abs() < 0.01);
    }

    #[test]
    #[allow(clippy::cast_possible_truncation)]
    fn dbfs_tracks_amplitude() {
        // A sine at half amplitude sits 6 dB below one at full amplitude
        let tone = |amp: f32| -> Vec<f32> {
            (0..1600)
                .map(|i| {
                    let t = f64::from(i) / 16_000.0;
                    amp * ((2.0 * std::f64::consts::PI * 440.0 * t).sin() as f32)
                })
                .collect()
        };
        let loud = rms_dbfs(&tone(0.5));
        let quiet = rms_dbfs(&tone(0.25));
        assert!((loud - quiet - 6.02).abs() < 0.1);
    }

    #[test]
    fn gain_clamps_at_both_ends() {
        assert!(loudness_gain(-80.0).abs() < f64::EPSILON);
        assert!((loudness_gain(0.0) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn gain_is_monotonic_across_the_mapped_band() {
        let mut prev = loudness_gain(-55.0);
        let mut db = -54.0;
        while db <= -15.0 {
            let g = loudness_gain(db);
            assert!(g >= prev);
            prev = g;
            db += 1.0;
        }
    }

    #[test]
    fn gamma_boosts_the_low_end() {
        // Midpoint of the map with gamma < 1 lands above the linear value
        let mid_db = f64::midpoint(-46.0, -18.0) - 4.0;
        assert!(loudness_gain(mid_db) > 0.5);
    }
}
