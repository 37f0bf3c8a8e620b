//! Audio playback to speakers

use std::sync::{Arc, Mutex};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleRate, StreamConfig};

use crate::voice::TTS_SAMPLE_RATE;
use crate::{Error, Result};

/// Plays a full PCM buffer to an output device, blocking until drained.
pub struct AudioPlayback {
    device: Device,
    config: StreamConfig,
}

impl AudioPlayback {
    /// Open an output device at the TTS rate.
    ///
    /// With a `device_hint` the first output device whose name contains
    /// the hint (case-insensitive) is used; otherwise the system default.
    ///
    /// # Errors
    ///
    /// Returns error if no matching device or suitable config exists
    pub fn new(device_hint: Option<&str>) -> Result<Self> {
        let host = cpal::default_host();

        let device = match device_hint {
            Some(hint) => find_device(&host, hint)?,
            None => host
                .default_output_device()
                .ok_or_else(|| Error::Audio("no output device available".to_string()))?,
        };

        let supported_config = device
            .supported_output_configs()
            .map_err(|e| Error::Audio(e.to_string()))?
            .find(|c| {
                c.channels() == 1
                    && c.min_sample_rate() <= SampleRate(TTS_SAMPLE_RATE)
                    && c.max_sample_rate() >= SampleRate(TTS_SAMPLE_RATE)
            })
            .or_else(|| {
                // Fallback: try stereo
                device.supported_output_configs().ok()?.find(|c| {
                    c.channels() == 2
                        && c.min_sample_rate() <= SampleRate(TTS_SAMPLE_RATE)
                        && c.max_sample_rate() >= SampleRate(TTS_SAMPLE_RATE)
                })
            })
            .ok_or_else(|| Error::Audio("no suitable output config found".to_string()))?;

        let config = supported_config
            .with_sample_rate(SampleRate(TTS_SAMPLE_RATE))
            .config();

        tracing::debug!(
            device = device.name().unwrap_or_default(),
            sample_rate = TTS_SAMPLE_RATE,
            channels = config.channels,
            "audio playback initialized"
        );

        Ok(Self { device, config })
    }

    /// Write the whole buffer to the device and block until it drains.
    ///
    /// Mono samples are duplicated across output channels. Draining is
    /// polled with a timeout of the buffer duration plus 500 ms.
    ///
    /// # Errors
    ///
    /// Returns error if the stream cannot be built or started
    ///
    /// # Panics
    ///
    /// Panics if the audio callback thread poisoned the position lock
    pub fn write(&self, samples: &[i16]) -> Result<()> {
        if samples.is_empty() {
            return Ok(());
        }

        let channels = self.config.channels as usize;
        let buffer: Arc<Vec<i16>> = Arc::new(samples.to_vec());
        let position = Arc::new(Mutex::new(0usize));
        let finished = Arc::new(Mutex::new(false));

        let buffer_cb = Arc::clone(&buffer);
        let position_cb = Arc::clone(&position);
        let finished_cb = Arc::clone(&finished);

        let stream = self
            .device
            .build_output_stream(
                &self.config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let mut pos = position_cb.lock().unwrap();

                    for frame in data.chunks_mut(channels) {
                        let sample = if *pos < buffer_cb.len() {
                            f32::from(buffer_cb[*pos]) / 32_768.0
                        } else {
                            *finished_cb.lock().unwrap() = true;
                            0.0
                        };

                        for out in frame.iter_mut() {
                            *out = sample;
                        }

                        if *pos < buffer_cb.len() {
                            *pos += 1;
                        }
                    }
                },
                |err| {
                    tracing::error!(error = %err, "audio playback error");
                },
                None,
            )
            .map_err(|e| Error::Audio(e.to_string()))?;

        stream.play().map_err(|e| Error::Audio(e.to_string()))?;

        let duration_ms = (samples.len() as u64 * 1000) / u64::from(TTS_SAMPLE_RATE);
        let start = std::time::Instant::now();
        let timeout = std::time::Duration::from_millis(duration_ms + 500);

        while !*finished.lock().unwrap() {
            if start.elapsed() > timeout {
                tracing::warn!(duration_ms, "playback drain timed out");
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(50));
        }

        // Let the device's own buffer empty out
        std::thread::sleep(std::time::Duration::from_millis(100));

        drop(stream);
        tracing::debug!(samples = samples.len(), "playback complete");

        Ok(())
    }
}

/// Find the first output device whose name contains `hint`.
fn find_device(host: &cpal::Host, hint: &str) -> Result<Device> {
    let needle = hint.to_lowercase();
    let devices = host
        .output_devices()
        .map_err(|e| Error::Audio(e.to_string()))?;

    for device in devices {
        if let Ok(name) = device.name()
            && name.to_lowercase().contains(&needle)
        {
            tracing::debug!(device = name, "matched output device");
            return Ok(device);
        }
    }

    Err(Error::Audio(format!(
        "no output device matching '{hint}'"
    )))
}
