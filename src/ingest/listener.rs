//! Channel-backed frame listener.
//!
//! A sensor binding runs its own capture thread and publishes complete frame
//! sets into a bounded synchronized queue; the pipeline thread blocks in
//! `acquire` until one arrives. Released sets travel back on a reuse channel
//! so the producer can recycle the underlying buffers instead of
//! reallocating per capture.
//!
//! Dropping the publisher closes the queue; the listener then reports
//! `SourceError::Disconnected` from `acquire`, which the pipeline treats as
//! a terminal disconnect.

use std::sync::mpsc::{channel, sync_channel, Receiver, Sender, SyncSender};

use super::{FrameSource, SourceError, SourceInfo};
use crate::frame::FrameSet;

/// Create a connected publisher/listener pair.
///
/// `capacity` bounds how many complete sets may queue between the sensor
/// thread and the pipeline; `publish` blocks once it is full.
pub fn frame_channel(capacity: usize, info: SourceInfo) -> (FramePublisher, FrameListener) {
    let (tx, rx) = sync_channel(capacity);
    let (reuse_tx, reuse_rx) = channel();
    (
        FramePublisher { tx, reuse_rx },
        FrameListener { rx, reuse_tx, info },
    )
}

/// Producer half, owned by the sensor capture thread.
pub struct FramePublisher {
    tx: SyncSender<FrameSet>,
    reuse_rx: Receiver<FrameSet>,
}

impl FramePublisher {
    /// Queue a complete frame set. Blocks while the queue is full; fails
    /// once the listener side is gone.
    pub fn publish(&self, frames: FrameSet) -> Result<(), SourceError> {
        self.tx.send(frames).map_err(|_| SourceError::Disconnected)
    }

    /// Reclaim a released frame set for buffer reuse, if one is waiting.
    pub fn reclaim(&self) -> Option<FrameSet> {
        self.reuse_rx.try_recv().ok()
    }
}

/// Consumer half, owned by the pipeline.
pub struct FrameListener {
    rx: Receiver<FrameSet>,
    reuse_tx: Sender<FrameSet>,
    info: SourceInfo,
}

impl FrameSource for FrameListener {
    fn acquire(&mut self) -> Result<FrameSet, SourceError> {
        self.rx.recv().map_err(|_| SourceError::Disconnected)
    }

    fn release(&mut self, frames: FrameSet) {
        // The producer may already be gone during shutdown; the buffers are
        // simply dropped then.
        let _ = self.reuse_tx.send(frames);
    }

    fn info(&self) -> SourceInfo {
        self.info.clone()
    }
}
