//! The acquisition-and-detection loop.
//!
//! Single logical thread of control. Each iteration: acquire a frame set,
//! copy and resize the color plane to the engine's working resolution, run
//! the timed multi-scale detection, suppress duplicates, annotate the
//! display copy, persist a snapshot on positive detections, present, poll
//! one key, release the frame set, poll the shutdown token. Detection is a
//! blocking call; no overlap with the next acquisition is attempted, so
//! throughput is bounded by the slower of the two.
//!
//! The acquire/release discipline is strict: exactly one frame set checked
//! out at a time, always released before the next acquire, released even
//! when an iteration fails.

use std::time::Instant;

use anyhow::Error as DisplayFault;
use image::imageops;
use log::{info, warn};
use thiserror::Error;

use crate::detect::{DetectError, Engine};
use crate::display::{annotate, is_quit_key, DisplaySink};
use crate::frame::FrameSet;
use crate::ingest::{FrameSource, SourceError};
use crate::shutdown::ShutdownSignal;
use crate::snapshot::SnapshotWriter;
use crate::suppress::{suppress, SuppressedBox};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Detect(#[from] DetectError),
    #[error(transparent)]
    Source(#[from] SourceError),
    /// The color plane was not 8-bit BGRA as the frame source contract
    /// requires.
    #[error("color frame is not 8-bit BGRA")]
    ColorFormat,
    #[error("display sink failed: {0}")]
    Display(#[source] DisplayFault),
}

/// Why the loop terminated. Neither is an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// Interrupt signal or ESC key.
    ShutdownRequested,
    /// The source reported a terminal disconnect mid-stream.
    SourceDisconnected,
}

#[derive(Clone, Debug)]
pub struct RunSummary {
    pub frames: u64,
    pub snapshots: u64,
    pub stop_reason: StopReason,
}

/// Outcome of one iteration.
#[derive(Clone, Debug)]
pub struct IterationReport {
    /// Engine output count before suppression; this is also the snapshot
    /// trigger.
    pub raw_candidates: usize,
    pub boxes: Vec<SuppressedBox>,
    /// Throughput of the detection call only, not the full iteration.
    pub detect_fps: f64,
    pub snapshot_written: bool,
}

pub struct Pipeline<S, D> {
    source: S,
    engine: Engine,
    display: D,
    snapshot: SnapshotWriter,
    shutdown: ShutdownSignal,
}

impl<S: FrameSource, D: DisplaySink> Pipeline<S, D> {
    pub fn new(
        source: S,
        engine: Engine,
        display: D,
        snapshot: SnapshotWriter,
        shutdown: ShutdownSignal,
    ) -> Self {
        Self {
            source,
            engine,
            display,
            snapshot,
            shutdown,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn snapshot(&self) -> &SnapshotWriter {
        &self.snapshot
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.clone()
    }

    /// Run iterations until shutdown is requested or the source disconnects.
    ///
    /// Once the shutdown token is observed set, the loop never re-enters
    /// acquisition; the in-flight iteration (if any) completes first. The
    /// source is stopped on every exit path.
    pub fn run(&mut self) -> Result<RunSummary, PipelineError> {
        let device = self.source.info();
        info!("device serial: {}", device.serial);
        info!("device firmware: {}", device.firmware);

        let mut frames = 0u64;
        let mut snapshots = 0u64;
        let stop_reason = loop {
            if self.shutdown.is_requested() {
                break StopReason::ShutdownRequested;
            }

            let set = match self.source.acquire() {
                Ok(set) => set,
                Err(SourceError::Disconnected) => break StopReason::SourceDisconnected,
                Err(err) => {
                    self.source.stop();
                    return Err(err.into());
                }
            };

            let outcome = self.iterate(&set);
            self.source.release(set);
            let report = match outcome {
                Ok(report) => report,
                Err(err) => {
                    self.source.stop();
                    return Err(err);
                }
            };

            frames += 1;
            if report.snapshot_written {
                snapshots += 1;
            }
            info!(
                "frame {}: {} candidates, {} boxes, detect {:.0} fps",
                frames,
                report.raw_candidates,
                report.boxes.len(),
                report.detect_fps
            );
        };

        self.source.stop();
        info!("streaming ends");
        Ok(RunSummary {
            frames,
            snapshots,
            stop_reason,
        })
    }

    fn iterate(&mut self, set: &FrameSet) -> Result<IterationReport, PipelineError> {
        let native = set
            .color
            .to_rgba_image()
            .ok_or(PipelineError::ColorFormat)?;

        // Defensive resize on every iteration; the engine rejects anything
        // but its canonical input shape.
        let (work_w, work_h) = self.engine.config().input_size;
        let input = imageops::resize(&native, work_w, work_h, imageops::FilterType::Triangle);

        let detect_begin = Instant::now();
        let candidates = self.engine.detect(&input)?;
        let elapsed = detect_begin.elapsed().as_secs_f64();
        let detect_fps = if elapsed > 0.0 { 1.0 / elapsed } else { 0.0 };

        let boxes = suppress(&candidates);

        let mut shown = input;
        annotate(&mut shown, &boxes);

        // Snapshot trigger is the raw candidate count: a frame whose hits
        // all turn out to be nested duplicates still counts as a sighting.
        // The persisted raster is the native-resolution frame, not the
        // annotated working copy. A failed write is logged, not fatal.
        let mut snapshot_written = false;
        if !candidates.is_empty() {
            match self.snapshot.write(&native) {
                Ok(()) => snapshot_written = true,
                Err(err) => warn!("snapshot write failed: {}", err),
            }
        }

        self.display
            .present(&shown)
            .map_err(PipelineError::Display)?;
        if let Some(key) = self.display.poll_key().map_err(PipelineError::Display)? {
            if is_quit_key(key) {
                self.shutdown.request();
            }
        }

        Ok(IterationReport {
            raw_candidates: candidates.len(),
            boxes,
            detect_fps,
            snapshot_written,
        })
    }
}
