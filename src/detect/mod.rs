//! Multi-scale sliding-window detection.
//!
//! The engine owns the scan: image pyramid, window stride, hit threshold,
//! and a coarse location-similarity grouping pass. The classifier itself is
//! an opaque `WindowScorer` fixed at construction; the engine is
//! deterministic given identical pixels and configuration.

mod config;
mod engine;
mod scorer;

pub use config::EngineConfig;
pub use engine::{Candidate, Engine};
pub use scorer::{BrightnessScorer, WindowScorer};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DetectError {
    /// The caller is responsible for resizing to the canonical working
    /// resolution before every call; anything else is a contract violation.
    #[error("input image is {got_w}x{got_h}, engine expects {want_w}x{want_h}")]
    InvalidInputShape {
        got_w: u32,
        got_h: u32,
        want_w: u32,
        want_h: u32,
    },
    /// Rejected at engine construction; the scan geometry must match the
    /// shape the classifier was trained on.
    #[error("invalid engine configuration: {0}")]
    InvalidConfig(String),
}
