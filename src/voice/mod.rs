//! Speech synthesis and audio output
//!
//! TTS requests raw PCM so the same buffer drives both the speakers and
//! the motion engine.

mod playback;
mod tts;

pub use playback::AudioPlayback;
pub use tts::{TtsClient, TTS_SAMPLE_RATE, VOICES};

use crate::{Error, Result};

/// Encode i16 PCM samples as WAV bytes, for saving synthesized speech.
///
/// # Errors
///
/// Returns error if WAV encoding fails
pub fn pcm_to_wav(samples: &[i16], sample_rate: u32) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut writer =
            hound::WavWriter::new(&mut cursor, spec).map_err(|e| Error::Audio(e.to_string()))?;

        for &sample in samples {
            writer
                .write_sample(sample)
                .map_err(|e| Error::Audio(e.to_string()))?;
        }

        writer.finalize().map_err(|e| Error::Audio(e.to_string()))?;
    }

    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wav_header_and_roundtrip() {
        let samples: Vec<i16> = vec![0, 1000, -1000, i16::MAX, i16::MIN];
        let wav = pcm_to_wav(&samples, TTS_SAMPLE_RATE).unwrap();

        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");

        let mut reader = hound::WavReader::new(std::io::Cursor::new(wav)).unwrap();
        assert_eq!(reader.spec().sample_rate, TTS_SAMPLE_RATE);
        assert_eq!(reader.spec().channels, 1);

        let read: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(read, samples);
    }
}
