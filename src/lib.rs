//! hogwatch
//!
//! Real-time person detection over synchronized color/infrared/depth frames.
//!
//! # Architecture
//!
//! Data flows one way per iteration:
//!
//! FrameSource → Pipeline → Engine → suppression → annotate/persist → release
//!
//! - `ingest`: blocking acquire/release frame sources (channel listener for
//!   sensor SDK threads, synthetic generator for tests and demos)
//! - `detect`: multi-scale sliding-window engine over an opaque scorer
//! - `suppress`: containment filter plus the fixed box-shrink transform
//! - `pipeline`: the per-iteration state machine with cooperative shutdown
//! - `display` / `snapshot`: render and persistence boundaries
//!
//! Sensor device I/O, window management and raw image registration are
//! external collaborators behind the `FrameSource` and `DisplaySink` traits.

pub mod config;
pub mod detect;
pub mod display;
pub mod frame;
pub mod geometry;
pub mod ingest;
pub mod pipeline;
pub mod shutdown;
pub mod snapshot;
pub mod suppress;

pub use config::WatchConfig;
pub use detect::{BrightnessScorer, Candidate, DetectError, Engine, EngineConfig, WindowScorer};
pub use display::{annotate, is_quit_key, DisplaySink, NullSink, KEY_ESCAPE};
pub use frame::{Frame, FrameSet, PixelFormat};
pub use geometry::Rect;
pub use ingest::{
    frame_channel, FrameListener, FramePublisher, FrameSource, SourceError, SourceInfo,
    SyntheticConfig, SyntheticSource,
};
pub use pipeline::{IterationReport, Pipeline, PipelineError, RunSummary, StopReason};
pub use shutdown::ShutdownSignal;
pub use snapshot::SnapshotWriter;
pub use suppress::{containment_filter, shrink, suppress, SuppressedBox};
