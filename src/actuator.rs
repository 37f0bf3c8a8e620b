//! Head actuation seam
//!
//! The engine produces pose deltas; how they reach a robot is behind the
//! `HeadActuator` trait. The gateway ships a logging implementation for
//! running without hardware.

use std::time::Duration;

use async_trait::async_trait;

use crate::engine::MotionSample;
use crate::Result;

/// Accepts "set target pose now" commands composed against a neutral pose
/// held by the implementation.
#[async_trait]
pub trait HeadActuator: Send + Sync {
    /// Command the head towards the given offset from neutral, effective
    /// immediately. Called once per hop while speaking.
    ///
    /// # Errors
    ///
    /// Returns error if the pose command is rejected
    async fn set_target(&self, pose: &MotionSample) -> Result<()>;

    /// Return the head to the neutral pose over `duration`.
    ///
    /// # Errors
    ///
    /// Returns error if the robot is unreachable
    async fn goto_neutral(&self, duration: Duration) -> Result<()>;
}

/// Actuator that logs every pose instead of moving anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingActuator;

#[async_trait]
impl HeadActuator for LoggingActuator {
    async fn set_target(&self, pose: &MotionSample) -> Result<()> {
        tracing::trace!(
            pitch = format_args!("{:+.4}", pose.pitch_rad),
            yaw = format_args!("{:+.4}", pose.yaw_rad),
            roll = format_args!("{:+.4}", pose.roll_rad),
            x = format_args!("{:+.2}", pose.x_mm),
            y = format_args!("{:+.2}", pose.y_mm),
            z = format_args!("{:+.2}", pose.z_mm),
            "set target pose"
        );
        Ok(())
    }

    async fn goto_neutral(&self, duration: Duration) -> Result<()> {
        tracing::debug!(ms = duration.as_millis(), "returning to neutral");
        tokio::time::sleep(duration).await;
        Ok(())
    }
}
