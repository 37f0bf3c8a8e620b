//! Utterance orchestration tests
//!
//! Drives the hop scheduler from caller-supplied PCM with a muted session
//! and a recording actuator; no speakers, robot, or API key involved.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use sway_gateway::engine::MotionSample;
use sway_gateway::voice::TTS_SAMPLE_RATE;
use sway_gateway::{HeadActuator, Result, SpeechSession};

/// Actuator that counts neutral returns and records every target pose
#[derive(Default)]
struct RecordingActuator {
    poses: std::sync::Mutex<Vec<MotionSample>>,
    neutral_calls: std::sync::Mutex<usize>,
}

#[async_trait]
impl HeadActuator for RecordingActuator {
    async fn set_target(&self, pose: &MotionSample) -> Result<()> {
        self.poses.lock().unwrap().push(*pose);
        Ok(())
    }

    async fn goto_neutral(&self, _duration: Duration) -> Result<()> {
        *self.neutral_calls.lock().unwrap() += 1;
        Ok(())
    }
}

/// Sine tone as i16 PCM at the TTS rate
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn tone_pcm(duration_secs: f64, amplitude: f64) -> Vec<i16> {
    let num_samples = (f64::from(TTS_SAMPLE_RATE) * duration_secs) as usize;
    (0..num_samples)
        .map(|i| {
            let t = f64::from(u32::try_from(i).unwrap()) / f64::from(TTS_SAMPLE_RATE);
            let v = amplitude * (2.0 * std::f64::consts::PI * 220.0 * t).sin();
            (v * f64::from(i16::MAX)) as i16
        })
        .collect()
}

#[tokio::test(start_paused = true)]
async fn animate_paces_one_pose_per_hop() {
    let actuator = Arc::new(RecordingActuator::default());
    let session = SpeechSession::new(actuator.clone()).muted(true);

    // 600 ms of audio at 24 kHz: exactly 12 hop-sized chunks
    let pcm = Arc::new(tone_pcm(0.6, 0.3));
    let report = session.animate(pcm).await.unwrap();

    assert_eq!(report.hops, 12);
    assert_eq!(report.duration_ms, 600);
    assert_eq!(actuator.poses.lock().unwrap().len(), 12);

    // Neutral before the utterance and after it
    assert_eq!(*actuator.neutral_calls.lock().unwrap(), 2);
}

#[tokio::test(start_paused = true)]
async fn loud_audio_moves_the_head_silence_does_not() {
    let actuator = Arc::new(RecordingActuator::default());
    let session = SpeechSession::new(actuator.clone()).muted(true);

    let pcm = Arc::new(tone_pcm(0.5, 0.3));
    session.animate(pcm).await.unwrap();

    let poses = actuator.poses.lock().unwrap();
    let peak = poses.iter().map(MotionSample::max_abs).fold(0.0, f64::max);
    assert!(peak > 0.001, "loud audio produced no motion");
    drop(poses);

    let quiet_actuator = Arc::new(RecordingActuator::default());
    let quiet_session = SpeechSession::new(quiet_actuator.clone()).muted(true);
    let silence = Arc::new(vec![0i16; 12_000]);
    quiet_session.animate(silence).await.unwrap();

    let poses = quiet_actuator.poses.lock().unwrap();
    let peak = poses.iter().map(MotionSample::max_abs).fold(0.0, f64::max);
    assert!(peak < 1e-6, "silence moved the head");
}

#[tokio::test(start_paused = true)]
async fn utterances_are_serialized() {
    let actuator = Arc::new(RecordingActuator::default());
    let session = Arc::new(SpeechSession::new(actuator.clone()).muted(true));

    let pcm = Arc::new(tone_pcm(0.2, 0.3));

    let a = tokio::spawn({
        let session = Arc::clone(&session);
        let pcm = Arc::clone(&pcm);
        async move { session.animate(pcm).await }
    });
    let b = tokio::spawn({
        let session = Arc::clone(&session);
        let pcm = Arc::clone(&pcm);
        async move { session.animate(pcm).await }
    });

    let (ra, rb) = tokio::join!(a, b);
    ra.unwrap().unwrap();
    rb.unwrap().unwrap();

    // Both ran to completion, one after the other: every pose from both
    // utterances was delivered.
    assert_eq!(actuator.poses.lock().unwrap().len(), 8);
}

#[tokio::test(start_paused = true)]
async fn same_seed_reproduces_the_same_poses() {
    let pcm = Arc::new(tone_pcm(0.3, 0.3));

    let mut traces = Vec::new();
    for _ in 0..2 {
        let actuator = Arc::new(RecordingActuator::default());
        let session = SpeechSession::new(actuator.clone())
            .muted(true)
            .with_phase_seed(21);
        session.animate(Arc::clone(&pcm)).await.unwrap();
        traces.push(actuator.poses.lock().unwrap().clone());
    }

    assert_eq!(traces[0], traces[1]);
}
