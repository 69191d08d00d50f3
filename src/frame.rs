//! Sensor frame containers.
//!
//! A `Frame` is one rectangular pixel grid from a single modality; a
//! `FrameSet` is one synchronized capture instant across all three
//! modalities. Frame sets are all-or-nothing by construction: there is no
//! way to build one with a modality missing, so the pipeline never observes
//! a partial capture.
//!
//! Ownership follows the acquire/release discipline: the source owns the
//! buffers, the pipeline borrows a set for one iteration and copies what it
//! needs into its own buffers before releasing.

use image::RgbaImage;

/// Pixel layout of a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelFormat {
    /// 8-bit 4-channel color, blue/green/red/alpha byte order.
    Bgra8,
    /// 32-bit float single channel (infrared intensity or depth in mm),
    /// stored little-endian.
    Gray32F,
}

impl PixelFormat {
    /// Bytes occupied by one pixel.
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelFormat::Bgra8 => 4,
            PixelFormat::Gray32F => 4,
        }
    }
}

/// One captured pixel grid with declared dimensions and layout.
#[derive(Clone, Debug)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    data: Vec<u8>,
}

impl Frame {
    /// Wrap an 8-bit BGRA color plane.
    pub fn bgra8(width: u32, height: u32, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), width as usize * height as usize * 4);
        Self {
            width,
            height,
            format: PixelFormat::Bgra8,
            data,
        }
    }

    /// Wrap a single-channel f32 plane (infrared or depth).
    pub fn gray32f(width: u32, height: u32, samples: Vec<f32>) -> Self {
        debug_assert_eq!(samples.len(), width as usize * height as usize);
        let mut data = Vec::with_capacity(samples.len() * 4);
        for s in samples {
            data.extend_from_slice(&s.to_le_bytes());
        }
        Self {
            width,
            height,
            format: PixelFormat::Gray32F,
            data,
        }
    }

    /// Raw pixel bytes in the declared format.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Copy a BGRA color frame into an RGBA raster for processing.
    ///
    /// Returns `None` for non-color frames. The copy is what lets the
    /// pipeline release the frame set while detection output is still live.
    pub fn to_rgba_image(&self) -> Option<RgbaImage> {
        if self.format != PixelFormat::Bgra8 {
            return None;
        }
        let mut rgba = self.data.clone();
        for px in rgba.chunks_exact_mut(4) {
            px.swap(0, 2);
        }
        RgbaImage::from_raw(self.width, self.height, rgba)
    }
}

/// One synchronized capture instant: color, infrared and depth planes.
#[derive(Clone, Debug)]
pub struct FrameSet {
    pub color: Frame,
    pub ir: Frame,
    pub depth: Frame,
}

impl FrameSet {
    pub fn new(color: Frame, ir: Frame, depth: Frame) -> Self {
        Self { color, ir, depth }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bgra_converts_to_rgba() {
        // One blue pixel, one red pixel.
        let data = vec![255, 0, 0, 255, 0, 0, 255, 255];
        let frame = Frame::bgra8(2, 1, data);
        let rgba = frame.to_rgba_image().expect("color frame");
        assert_eq!(rgba.get_pixel(0, 0).0, [0, 0, 255, 255]);
        assert_eq!(rgba.get_pixel(1, 0).0, [255, 0, 0, 255]);
    }

    #[test]
    fn depth_frame_has_no_rgba_view() {
        let frame = Frame::gray32f(2, 2, vec![1000.0; 4]);
        assert!(frame.to_rgba_image().is_none());
        assert_eq!(frame.data().len(), 16);
    }
}
