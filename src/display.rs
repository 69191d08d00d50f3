//! Display boundary.
//!
//! The pipeline pushes one annotated raster per iteration to a `DisplaySink`
//! and reads back at most one key code. Window management itself lives
//! outside this crate; any windowing binding implements the trait, and the
//! headless `NullSink` keeps the pipeline runnable without one.

use anyhow::Result;
use image::{Rgba, RgbaImage};

use crate::geometry::Rect;
use crate::suppress::SuppressedBox;

/// ESC, the only recognized quit gesture from the display.
pub const KEY_ESCAPE: i32 = 27;

const BOX_COLOR: Rgba<u8> = Rgba([0, 255, 0, 255]);
const BOX_THICKNESS: i32 = 2;

pub trait DisplaySink {
    /// Push one annotated raster for this iteration.
    fn present(&mut self, image: &RgbaImage) -> Result<()>;

    /// Bounded wait for a single key press; `None` when nothing was pressed.
    fn poll_key(&mut self) -> Result<Option<i32>>;
}

/// Headless sink: discards rasters, never reports a key.
#[derive(Debug, Default)]
pub struct NullSink;

impl DisplaySink for NullSink {
    fn present(&mut self, _image: &RgbaImage) -> Result<()> {
        Ok(())
    }

    fn poll_key(&mut self) -> Result<Option<i32>> {
        Ok(None)
    }
}

/// Key codes carry modifier bits in the high bytes on some platforms; only
/// the low byte identifies the key.
pub fn is_quit_key(key: i32) -> bool {
    key > 0 && (key & 0xff) == KEY_ESCAPE
}

/// Draw each surviving box as a 2 px green outline on the display copy.
pub fn annotate(image: &mut RgbaImage, boxes: &[SuppressedBox]) {
    for sbox in boxes {
        draw_rect(image, sbox.rect);
    }
}

fn draw_rect(image: &mut RgbaImage, rect: Rect) {
    if rect.is_empty() {
        return;
    }
    for t in 0..BOX_THICKNESS {
        for x in rect.x..rect.right() {
            put_pixel(image, x, rect.y + t);
            put_pixel(image, x, rect.bottom() - 1 - t);
        }
        for y in rect.y..rect.bottom() {
            put_pixel(image, rect.x + t, y);
            put_pixel(image, rect.right() - 1 - t, y);
        }
    }
}

fn put_pixel(image: &mut RgbaImage, x: i32, y: i32) {
    if x >= 0 && y >= 0 && (x as u32) < image.width() && (y as u32) < image.height() {
        image.put_pixel(x as u32, y as u32, BOX_COLOR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxed(rect: Rect) -> SuppressedBox {
        SuppressedBox {
            rect,
            confidence: 1.0,
        }
    }

    #[test]
    fn quit_key_matches_escape_after_masking() {
        assert!(is_quit_key(27));
        assert!(is_quit_key(0x011b)); // ESC with a modifier bit set
        assert!(!is_quit_key(0));
        assert!(!is_quit_key(-1));
        assert!(!is_quit_key(97)); // 'a'
    }

    #[test]
    fn annotate_outlines_box_and_leaves_interior() {
        let mut image = RgbaImage::from_pixel(32, 32, Rgba([0, 0, 0, 255]));
        annotate(&mut image, &[boxed(Rect::new(4, 4, 16, 16))]);

        // Border pixels are green, two deep.
        assert_eq!(image.get_pixel(4, 4).0, [0, 255, 0, 255]);
        assert_eq!(image.get_pixel(10, 5).0, [0, 255, 0, 255]);
        assert_eq!(image.get_pixel(19, 19).0, [0, 255, 0, 255]);
        // Interior untouched.
        assert_eq!(image.get_pixel(12, 12).0, [0, 0, 0, 255]);
        // Outside untouched.
        assert_eq!(image.get_pixel(2, 2).0, [0, 0, 0, 255]);
    }

    #[test]
    fn annotate_clamps_to_image_bounds() {
        let mut image = RgbaImage::from_pixel(8, 8, Rgba([0, 0, 0, 255]));
        annotate(&mut image, &[boxed(Rect::new(-4, -4, 20, 20))]);
        assert_eq!(image.get_pixel(0, 0).0, [0, 0, 0, 255]); // interior of the oversized box
    }
}
