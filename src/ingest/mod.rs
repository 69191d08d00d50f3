//! Frame acquisition sources.
//!
//! This module provides the blocking acquire/release contract between a
//! sensor and the pipeline, plus two concrete sources:
//! - Channel listener (a sensor SDK thread feeds a synchronized queue)
//! - Synthetic source (testing and demos)
//!
//! All sources deliver complete `FrameSet`s that flow into the pipeline.
//! The acquisition layer is responsible for:
//! - Blocking until a full synchronized set is available, never partial
//! - Surfacing device disconnects as terminal errors, not frames
//! - Taking buffers back on `release` so the producer can reuse them
//!
//! The orchestrator must keep at most one frame set checked out at a time:
//! acquire, use, release, strictly sequential.

mod listener;
mod synthetic;

pub use listener::{frame_channel, FrameListener, FramePublisher};
pub use synthetic::{SyntheticConfig, SyntheticSource};

use thiserror::Error;

use crate::frame::FrameSet;

/// Terminal acquisition failures. None of these are retried.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Zero sensors enumerated at startup.
    #[error("no sensor device connected")]
    NoDevice,
    /// A sensor was enumerated but its handle could not be opened.
    #[error("failure opening device {0}")]
    OpenFailed(String),
    /// The producer went away mid-stream. The pipeline exits its loop
    /// gracefully when it sees this.
    #[error("sensor disconnected")]
    Disconnected,
}

/// Device identification for startup console output.
#[derive(Clone, Debug)]
pub struct SourceInfo {
    pub serial: String,
    pub firmware: String,
}

impl Default for SourceInfo {
    fn default() -> Self {
        Self {
            serial: "unknown".to_string(),
            firmware: "unknown".to_string(),
        }
    }
}

/// Blocking frame source contract.
///
/// `acquire` blocks indefinitely until a complete synchronized set is ready;
/// `release` returns buffer ownership to the producer. Using a frame after
/// release, or acquiring while a set is still checked out, violates the
/// contract and is the orchestrator's responsibility to prevent.
pub trait FrameSource {
    /// Block until the next complete frame set is available.
    fn acquire(&mut self) -> Result<FrameSet, SourceError>;

    /// Hand buffer ownership back to the producer for reuse.
    fn release(&mut self, frames: FrameSet);

    /// Device identification for the console boundary.
    fn info(&self) -> SourceInfo {
        SourceInfo::default()
    }

    /// Stop the underlying device. Idempotent; called once on loop exit.
    fn stop(&mut self) {}
}

impl<T: FrameSource + ?Sized> FrameSource for Box<T> {
    fn acquire(&mut self) -> Result<FrameSet, SourceError> {
        (**self).acquire()
    }

    fn release(&mut self, frames: FrameSet) {
        (**self).release(frames)
    }

    fn info(&self) -> SourceInfo {
        (**self).info()
    }

    fn stop(&mut self) {
        (**self).stop()
    }
}
