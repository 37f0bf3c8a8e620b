//! Sway Gateway - speech-synchronized head motion for robot TTS
//!
//! Drives a robotic head with small oscillatory motions timed to the
//! amplitude envelope of its own synthesized voice, so the robot appears
//! to sway while it speaks.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │              Interfaces (CLI / HTTP)              │
//! └───────────────────────┬──────────────────────────┘
//!                         │
//! ┌───────────────────────▼──────────────────────────┐
//! │           SpeechSession (hop scheduler)           │
//! │   TTS client  │  audio sink  │  motion loop      │
//! └───────────────────────┬──────────────────────────┘
//!                         │ 50 ms hops
//! ┌───────────────────────▼──────────────────────────┐
//! │                  Motion engine                    │
//! │  normalize │ VAD │ envelope │ loudness │ osc bank│
//! └───────────────────────┬──────────────────────────┘
//!                         │ pose deltas
//!                 HeadActuator (robot)
//! ```

pub mod actuator;
pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod speech;
pub mod voice;

pub use actuator::{HeadActuator, LoggingActuator};
pub use config::Config;
pub use engine::{AudioChunk, MotionSample, RawSamples, SwayGenerator};
pub use error::{Error, Result};
pub use speech::{SpeakOptions, SpeechSession, UtteranceReport};
pub use voice::{AudioPlayback, TtsClient};
