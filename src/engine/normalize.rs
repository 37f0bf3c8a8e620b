//! Frame normalization
//!
//! Converts arbitrary-shaped raw audio into mono, unit-scaled floats at the
//! engine rate. Handles integer and float encodings, channel-first and
//! channel-last layouts, and sample-rate conversion by linear interpolation.

use super::SAMPLE_RATE;

/// Divisor mapping full-scale i16 to ±1.0 (the magnitude of `i16::MIN`)
const I16_SCALE: f32 = 32_768.0;

/// Raw sample data in one of the supported encodings.
#[derive(Debug, Clone, Copy)]
pub enum RawSamples<'a> {
    /// Signed 16-bit PCM, the common TTS wire format
    I16(&'a [i16]),
    /// Float PCM already scaled to ±1.0
    F32(&'a [f32]),
}

impl RawSamples<'_> {
    /// Total number of samples across all dimensions
    #[must_use]
    pub const fn len(&self) -> usize {
        match self {
            Self::I16(s) => s.len(),
            Self::F32(s) => s.len(),
        }
    }

    /// True when the buffer holds no samples
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Amplitude normalization: integer full scale maps to ±1.0, float
    /// input passes through unchanged.
    fn to_f32(self) -> Vec<f32> {
        match self {
            Self::I16(s) => s.iter().map(|&v| f32::from(v) / I16_SCALE).collect(),
            Self::F32(s) => s.to_vec(),
        }
    }
}

/// One audio buffer handed to the engine, with the shape metadata needed
/// for down-mixing and the source sample rate needed for resampling.
///
/// Multi-dimensional data is row-major: a stereo chunk may arrive either
/// channel-first (`[2, n]`) or channel-last (`[n, 2]`).
#[derive(Debug, Clone)]
pub struct AudioChunk<'a> {
    samples: RawSamples<'a>,
    shape: Vec<usize>,
    sample_rate: u32,
}

impl<'a> AudioChunk<'a> {
    /// Mono signed 16-bit chunk.
    #[must_use]
    pub fn mono_i16(samples: &'a [i16], sample_rate: u32) -> Self {
        Self {
            samples: RawSamples::I16(samples),
            shape: vec![samples.len()],
            sample_rate,
        }
    }

    /// Mono float chunk.
    #[must_use]
    pub fn mono_f32(samples: &'a [f32], sample_rate: u32) -> Self {
        Self {
            samples: RawSamples::F32(samples),
            shape: vec![samples.len()],
            sample_rate,
        }
    }

    /// Multi-dimensional chunk in row-major order.
    ///
    /// # Panics
    ///
    /// Panics if the product of `shape` does not equal the sample count.
    #[must_use]
    pub fn with_shape(samples: RawSamples<'a>, shape: Vec<usize>, sample_rate: u32) -> Self {
        assert_eq!(
            shape.iter().product::<usize>(),
            samples.len(),
            "shape does not match sample count"
        );
        Self {
            samples,
            shape,
            sample_rate,
        }
    }

    /// Source sample rate (Hz)
    #[must_use]
    pub const fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

/// Convert a chunk to mono f32 samples at the engine rate.
///
/// Empty input, and input whose resampled length would be a single sample
/// or less, yield an empty buffer rather than an error.
#[must_use]
pub fn normalize(chunk: &AudioChunk<'_>) -> Vec<f32> {
    if chunk.samples.is_empty() {
        return Vec::new();
    }
    let mono = downmix(chunk.samples.to_f32(), &chunk.shape);
    if chunk.sample_rate == SAMPLE_RATE {
        mono
    } else {
        resample_linear(&mono, chunk.sample_rate, SAMPLE_RATE)
    }
}

/// Average a row-major sample matrix down to mono.
///
/// For two dimensions the channel axis is the one with size ≤ 8 that is no
/// larger than the other axis (covers both `[channels, n]` and
/// `[n, channels]`); higher-rank input is flattened to `[d0, rest]` and
/// averaged over the first axis.
#[allow(clippy::cast_precision_loss)]
fn downmix(flat: Vec<f32>, shape: &[usize]) -> Vec<f32> {
    match *shape {
        [] | [_] => flat,
        [rows, cols] if rows <= 8 && rows <= cols => mean_over_rows(&flat, rows, cols),
        [rows, cols] => mean_over_cols(&flat, rows, cols),
        [first, ..] => {
            let inner = flat.len() / first;
            mean_over_rows(&flat, first, inner)
        }
    }
}

/// Column means of a `rows × cols` matrix (averages across the first axis).
#[allow(clippy::cast_precision_loss)]
fn mean_over_rows(flat: &[f32], rows: usize, cols: usize) -> Vec<f32> {
    let mut out = vec![0.0f32; cols];
    for row in flat.chunks_exact(cols) {
        for (acc, &v) in out.iter_mut().zip(row) {
            *acc += v;
        }
    }
    for acc in &mut out {
        *acc /= rows as f32;
    }
    out
}

/// Row means of a `rows × cols` matrix (averages across the second axis).
#[allow(clippy::cast_precision_loss)]
fn mean_over_cols(flat: &[f32], _rows: usize, cols: usize) -> Vec<f32> {
    flat.chunks_exact(cols)
        .map(|row| row.iter().sum::<f32>() / cols as f32)
        .collect()
}

/// Linear-interpolation resampling over a normalized time axis.
///
/// The output length is `round(len × to_rate / from_rate)`; when that comes
/// to one sample or fewer the result is empty. First and last input samples
/// map exactly onto the first and last output samples.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn resample_linear(input: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate || input.is_empty() {
        return input.to_vec();
    }
    let n_out = (input.len() as f64 * f64::from(to_rate) / f64::from(from_rate)).round() as usize;
    if n_out <= 1 {
        return Vec::new();
    }
    let last = input.len() - 1;
    let step = last as f64 / (n_out - 1) as f64;
    (0..n_out)
        .map(|i| {
            let pos = i as f64 * step;
            let idx = (pos.floor() as usize).min(last);
            let frac = pos - idx as f64;
            let x0 = f64::from(input[idx]);
            let x1 = f64::from(input[(idx + 1).min(last)]);
            ((1.0 - frac).mul_add(x0, frac * x1)) as f32
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn i16_full_scale_maps_to_unit_range() {
        let chunk = AudioChunk::mono_i16(&[i16::MIN, 0, i16::MAX], SAMPLE_RATE);
        let out = normalize(&chunk);
        assert_eq!(out.len(), 3);
        assert!((out[0] + 1.0).abs() < 1e-6);
        assert!(out[1].abs() < 1e-6);
        assert!((out[2] - 32_767.0 / 32_768.0).abs() < 1e-6);
    }

    #[test]
    fn float_input_passes_through() {
        let samples = [0.25f32, -0.5, 1.0];
        let chunk = AudioChunk::mono_f32(&samples, SAMPLE_RATE);
        assert_eq!(normalize(&chunk), samples.to_vec());
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let chunk = AudioChunk::mono_f32(&[], SAMPLE_RATE);
        assert!(normalize(&chunk).is_empty());
    }

    #[test]
    fn channel_first_stereo_is_averaged() {
        // [2, 3]: two channels of three samples
        let data = [1.0f32, 2.0, 3.0, 3.0, 4.0, 5.0];
        let chunk = AudioChunk::with_shape(RawSamples::F32(&data), vec![2, 3], SAMPLE_RATE);
        assert_eq!(normalize(&chunk), vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn channel_last_stereo_is_averaged() {
        // [3, 2]: three samples of two interleaved channels
        let data = [1.0f32, 3.0, 2.0, 4.0, 3.0, 5.0];
        let chunk = AudioChunk::with_shape(RawSamples::F32(&data), vec![3, 2], SAMPLE_RATE);
        assert_eq!(normalize(&chunk), vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn higher_rank_input_averages_over_first_axis() {
        // [2, 2, 2] flattens to [2, 4] and averages the two blocks
        let data = [0.0f32, 2.0, 4.0, 6.0, 2.0, 4.0, 6.0, 8.0];
        let chunk = AudioChunk::with_shape(RawSamples::F32(&data), vec![2, 2, 2], SAMPLE_RATE);
        assert_eq!(normalize(&chunk), vec![1.0, 3.0, 5.0, 7.0]);
    }

    #[test]
    fn resample_length_follows_rate_ratio() {
        // 100 ms at 24 kHz down to 16 kHz
        let input = vec![0.0f32; 2400];
        let out = resample_linear(&input, 24_000, 16_000);
        assert_eq!(out.len(), 1600);
    }

    #[test]
    fn resample_is_identity_at_equal_rates() {
        let input = vec![0.1f32, 0.2, 0.3];
        assert_eq!(resample_linear(&input, 16_000, 16_000), input);
    }

    #[test]
    #[allow(clippy::cast_precision_loss)]
    fn resample_preserves_endpoints() {
        let input: Vec<f32> = (0..240).map(|i| i as f32 / 239.0).collect();
        let out = resample_linear(&input, 24_000, 16_000);
        assert!((out[0] - input[0]).abs() < 1e-6);
        assert!((out[out.len() - 1] - input[input.len() - 1]).abs() < 1e-6);
    }

    #[test]
    fn degenerate_resample_yields_empty() {
        // Three samples at 48 kHz resampled to 16 kHz round to one sample
        let out = resample_linear(&[0.5f32, 0.5, 0.5], 48_000, 16_000);
        assert!(out.is_empty());
    }

    #[test]
    fn upsampling_interpolates_between_samples() {
        let out = resample_linear(&[0.0f32, 1.0], 16_000, 48_000);
        // round(2 * 3) = 6 samples spanning 0..1 inclusive
        assert_eq!(out.len(), 6);
        assert!((out[0] - 0.0).abs() < 1e-6);
        assert!((out[5] - 1.0).abs() < 1e-6);
        for pair in out.windows(2) {
            assert!(pair[1] >= pair[0]);
        }
    }
}
