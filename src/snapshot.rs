//! Last-sighting snapshot persistence.
//!
//! One fixed path, overwrite semantics: the file always holds the most
//! recent positive frame, nothing older. No rotation, no indexing. The
//! pipeline writes the raw color frame here, not the annotated display copy.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::{ImageFormat, Rgb, RgbImage, RgbaImage};

pub struct SnapshotWriter {
    path: PathBuf,
    writes: u64,
}

impl SnapshotWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writes: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of snapshots written so far.
    pub fn writes(&self) -> u64 {
        self.writes
    }

    /// Encode the raster as JPEG at the fixed path, replacing any previous
    /// snapshot.
    pub fn write(&mut self, image: &RgbaImage) -> Result<()> {
        let rgb = RgbImage::from_fn(image.width(), image.height(), |x, y| {
            let px = image.get_pixel(x, y);
            Rgb([px[0], px[1], px[2]])
        });
        rgb.save_with_format(&self.path, ImageFormat::Jpeg)
            .with_context(|| format!("failed to write snapshot {}", self.path.display()))?;
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn overwrites_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("person.jpg");
        let mut writer = SnapshotWriter::new(&path);

        let red = RgbaImage::from_pixel(32, 32, Rgba([255, 0, 0, 255]));
        let blue = RgbaImage::from_pixel(32, 32, Rgba([0, 0, 255, 255]));

        writer.write(&red).unwrap();
        writer.write(&blue).unwrap();
        assert_eq!(writer.writes(), 2);

        let decoded = image::open(&path).unwrap().to_rgb8();
        let px = decoded.get_pixel(16, 16);
        assert!(px[2] > 200, "expected the blue frame, got {:?}", px);
        assert!(px[0] < 64);
    }

    #[test]
    fn write_failure_reports_path() {
        let mut writer = SnapshotWriter::new("/nonexistent-dir/person.jpg");
        let image = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        let err = writer.write(&image).unwrap_err();
        assert!(format!("{}", err).contains("/nonexistent-dir/person.jpg"));
        assert_eq!(writer.writes(), 0);
    }
}
