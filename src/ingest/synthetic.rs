//! Synthetic frame source.
//!
//! Generates deterministic frame sets in-process: a dark color plane with a
//! bright block drifting across it (something for a brightness-based scorer
//! to find), plus flat infrared and depth planes. Used by tests and by the
//! daemon when no real sensor binding is wired up.

use std::time::Duration;

use super::{FrameSource, SourceError, SourceInfo};
use crate::frame::{Frame, FrameSet};

/// Configuration for a synthetic source.
#[derive(Clone, Debug)]
pub struct SyntheticConfig {
    /// Color plane dimensions.
    pub width: u32,
    pub height: u32,
    /// Infrared/depth plane dimensions.
    pub ir_width: u32,
    pub ir_height: u32,
    /// Stop after this many frames; `None` streams until the pipeline stops.
    pub frame_limit: Option<u64>,
    /// Delay before each delivery, emulating a sensor's frame rate. Zero
    /// delivers as fast as the loop consumes.
    pub frame_interval: Duration,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            ir_width: 512,
            ir_height: 424,
            frame_limit: None,
            frame_interval: Duration::ZERO,
        }
    }
}

/// Synthetic frame source.
pub struct SyntheticSource {
    config: SyntheticConfig,
    produced: u64,
    pool: Vec<FrameSet>,
}

impl SyntheticSource {
    pub fn new(config: SyntheticConfig) -> Self {
        Self {
            config,
            produced: 0,
            pool: Vec::new(),
        }
    }

    pub fn frames_produced(&self) -> u64 {
        self.produced
    }

    fn generate_color(&self, frame_index: u64) -> Vec<u8> {
        let w = self.config.width as usize;
        let h = self.config.height as usize;
        // Dark background, bright square drifting rightward one block width
        // every 30 frames.
        let block = (self.config.height / 4).max(1) as usize;
        let bx = ((frame_index as usize / 30) * block) % w.saturating_sub(block).max(1);
        let by = h / 3;
        let mut pixels = vec![0u8; w * h * 4];
        for px in pixels.chunks_exact_mut(4) {
            px[3] = 255;
        }
        for y in by..(by + block).min(h) {
            for x in bx..(bx + block).min(w) {
                let at = (y * w + x) * 4;
                pixels[at] = 230;
                pixels[at + 1] = 230;
                pixels[at + 2] = 230;
            }
        }
        pixels
    }
}

impl FrameSource for SyntheticSource {
    fn acquire(&mut self) -> Result<FrameSet, SourceError> {
        if let Some(limit) = self.config.frame_limit {
            if self.produced >= limit {
                return Err(SourceError::Disconnected);
            }
        }
        if !self.config.frame_interval.is_zero() {
            std::thread::sleep(self.config.frame_interval);
        }
        let color = Frame::bgra8(
            self.config.width,
            self.config.height,
            self.generate_color(self.produced),
        );
        // Reuse pooled ir/depth planes when available; they are constant.
        let (ir, depth) = match self.pool.pop() {
            Some(set) => (set.ir, set.depth),
            None => {
                let samples =
                    vec![1000.0f32; self.config.ir_width as usize * self.config.ir_height as usize];
                (
                    Frame::gray32f(self.config.ir_width, self.config.ir_height, samples.clone()),
                    Frame::gray32f(self.config.ir_width, self.config.ir_height, samples),
                )
            }
        };
        self.produced += 1;
        Ok(FrameSet::new(color, ir, depth))
    }

    fn release(&mut self, frames: FrameSet) {
        self.pool.push(frames);
    }

    fn info(&self) -> SourceInfo {
        SourceInfo {
            serial: "synthetic-0000".to_string(),
            firmware: "0.0".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivers_complete_sets_until_limit() {
        let mut source = SyntheticSource::new(SyntheticConfig {
            width: 64,
            height: 48,
            ir_width: 16,
            ir_height: 12,
            frame_limit: Some(2),
            ..Default::default()
        });

        for _ in 0..2 {
            let set = source.acquire().unwrap();
            assert_eq!(set.color.width, 64);
            assert_eq!(set.ir.height, 12);
            source.release(set);
        }
        assert!(matches!(source.acquire(), Err(SourceError::Disconnected)));
        assert_eq!(source.frames_produced(), 2);
    }

    #[test]
    fn subject_block_is_brighter_than_background() {
        let mut source = SyntheticSource::new(SyntheticConfig {
            width: 64,
            height: 48,
            ir_width: 16,
            ir_height: 12,
            frame_limit: Some(1),
            ..Default::default()
        });
        let set = source.acquire().unwrap();
        let rgba = set.color.to_rgba_image().unwrap();
        let bright = rgba.pixels().filter(|p| p.0[1] > 128).count();
        assert!(bright > 0);
        assert!(bright < (64 * 48));
    }
}
