use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sway_gateway::api::{self, ApiState};
use sway_gateway::engine::{AudioChunk, SwayGenerator, HOP_MS, SAMPLE_RATE};
use sway_gateway::voice::{pcm_to_wav, AudioPlayback, TtsClient, TTS_SAMPLE_RATE};
use sway_gateway::{Config, LoggingActuator, SpeakOptions, SpeechSession};

/// Sway - speech-synchronized head motion gateway for robot TTS
#[derive(Parser)]
#[command(name = "sway", version, about)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Speak one utterance with synchronized head motion
    Say {
        /// Text to speak
        text: String,

        /// Voice to use (overrides config)
        #[arg(long, env = "SWAY_TTS_VOICE")]
        voice: Option<String>,

        /// Speed multiplier (overrides config)
        #[arg(long)]
        speed: Option<f32>,

        /// Save the synthesized audio as WAV instead of speaking it
        #[arg(long, value_name = "FILE")]
        save: Option<PathBuf>,
    },
    /// Run the HTTP server
    Serve {
        /// Port to listen on (overrides config)
        #[arg(long, env = "SWAY_PORT")]
        port: Option<u16>,
    },
    /// Test speaker output with a sine tone
    TestSpeaker,
    /// Drive the motion pipeline from a synthetic tone, without robot,
    /// speakers, or API key
    TestMotion {
        /// Tone duration in seconds
        #[arg(short, long, default_value = "2.0")]
        duration: f64,

        /// Tone level in dBFS
        #[arg(short, long, default_value = "-20.0", allow_hyphen_values = true)]
        level: f64,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,sway_gateway=info",
        1 => "info,sway_gateway=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

#[allow(clippy::future_not_send)]
async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Say {
            text,
            voice,
            speed,
            save,
        } => say(&text, voice, speed, save).await,
        Command::Serve { port } => serve(port).await,
        Command::TestSpeaker => test_speaker(),
        Command::TestMotion { duration, level } => test_motion(duration, level),
    }
}

/// Build a TTS client from config, or explain what's missing.
fn tts_from_config(config: &Config) -> anyhow::Result<TtsClient> {
    let api_key = config
        .api_keys
        .openai
        .clone()
        .ok_or_else(|| anyhow::anyhow!("OPENAI_API_KEY not set (required for TTS)"))?;

    Ok(TtsClient::with_model(
        api_key,
        config.voice.tts_voice.clone(),
        config.voice.tts_speed,
        config.voice.tts_model.clone(),
    )?)
}

/// Speak one utterance (or save it to a WAV file)
async fn say(
    text: &str,
    voice: Option<String>,
    speed: Option<f32>,
    save: Option<PathBuf>,
) -> anyhow::Result<()> {
    let config = Config::load()?;
    let tts = tts_from_config(&config)?;

    if let Some(path) = save {
        println!("Synthesizing...");
        let pcm = tts.synthesize(text, voice.as_deref(), speed).await?;
        let wav = pcm_to_wav(&pcm, TTS_SAMPLE_RATE)?;
        std::fs::write(&path, wav)?;
        println!("Saved {} samples to {}", pcm.len(), path.display());
        return Ok(());
    }

    let session = SpeechSession::new(Arc::new(LoggingActuator))
        .with_tts(tts)
        .with_speaker(config.server.speaker.clone())
        .with_phase_seed(config.motion.phase_seed)
        .muted(config.motion.mute);

    println!("Speaking: '{}'", text.trim());
    let report = session.speak(text, &SpeakOptions { voice, speed }).await?;
    println!(
        "Done: {} hops over {} ms of audio",
        report.hops, report.duration_ms
    );

    Ok(())
}

/// Run the HTTP server
async fn serve(port: Option<u16>) -> anyhow::Result<()> {
    let config = Config::load()?;
    let port = port.unwrap_or(config.server.port);

    let mut session = SpeechSession::new(Arc::new(LoggingActuator))
        .with_speaker(config.server.speaker.clone())
        .with_phase_seed(config.motion.phase_seed)
        .muted(config.motion.mute);

    match tts_from_config(&config) {
        Ok(tts) => session = session.with_tts(tts),
        Err(e) => tracing::warn!("TTS unavailable: {e} - /speak will return 503"),
    }

    let state = Arc::new(ApiState {
        session: Arc::new(session),
    });

    api::serve(state, port).await?;
    Ok(())
}

/// Test speaker output with a sine wave
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn test_speaker() -> anyhow::Result<()> {
    println!("Testing speaker output...");
    println!("You should hear a 440Hz tone for 2 seconds\n");

    let config = Config::load()?;
    let playback = AudioPlayback::new(config.server.speaker.as_deref())?;

    // 2 seconds of 440Hz sine at the TTS rate, 30% volume
    let num_samples = TTS_SAMPLE_RATE as usize * 2;
    let samples: Vec<i16> = (0..num_samples)
        .map(|i| {
            let t = i as f64 / f64::from(TTS_SAMPLE_RATE);
            let v = (2.0 * std::f64::consts::PI * 440.0 * t).sin() * 0.3;
            (v * f64::from(i16::MAX)) as i16
        })
        .collect();

    println!("Playing {} samples at {} Hz...", samples.len(), TTS_SAMPLE_RATE);
    playback.write(&samples)?;

    println!("\n---");
    println!("If you heard the tone, your speakers are working!");

    Ok(())
}

/// Drive the motion pipeline from a synthetic tone and print the trace
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn test_motion(duration: f64, level: f64) -> anyhow::Result<()> {
    println!("Driving motion pipeline: {duration:.1}s tone at {level:.0} dBFS\n");

    let config = Config::load()?;
    let mut sway = SwayGenerator::new(config.motion.phase_seed);

    // Peak amplitude for a sine with the requested RMS level
    let amplitude = 10f64.powf(level / 20.0) * std::f64::consts::SQRT_2;
    let hop_len = SAMPLE_RATE as usize * HOP_MS as usize / 1000;
    let hops = (duration * 1000.0 / HOP_MS as f64) as usize;

    println!("{:>6}  {:>6}  {:>8}  {:>8}  {:>8}", "t(s)", "active", "env", "pitch", "yaw");

    for hop in 0..hops {
        let chunk: Vec<f32> = (0..hop_len)
            .map(|i| {
                let t = (hop * hop_len + i) as f64 / f64::from(SAMPLE_RATE);
                (amplitude * (2.0 * std::f64::consts::PI * 220.0 * t).sin()) as f32
            })
            .collect();

        let samples = sway.feed(&AudioChunk::mono_f32(&chunk, SAMPLE_RATE));
        if let Some(s) = samples.last() {
            println!(
                "{:>6.2}  {:>6}  {:>8.3}  {:>+8.4}  {:>+8.4}",
                sway.elapsed(),
                sway.is_active(),
                sway.envelope(),
                s.pitch_rad,
                s.yaw_rad
            );
        }
    }

    println!("\n---");
    println!("Envelope should rise towards 1 while the tone is loud enough.");

    Ok(())
}
