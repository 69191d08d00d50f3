//! The multi-scale scan driver.

use image::{imageops, GrayImage, RgbaImage};

use super::{DetectError, EngineConfig, WindowScorer};
use crate::geometry::Rect;

/// Location similarity tolerance for the grouping pass, as a fraction of
/// the smaller rectangle's dimensions.
const GROUP_EPS: f64 = 0.2;

/// One raw detector hit, in detection-input coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    pub rect: Rect,
    pub confidence: f32,
}

/// Sliding-window detection engine.
///
/// Construction fixes the scan geometry and the scorer; `detect` is then a
/// pure function of the input pixels.
pub struct Engine {
    config: EngineConfig,
    scorer: Box<dyn WindowScorer>,
}

impl Engine {
    pub fn new(config: EngineConfig, scorer: Box<dyn WindowScorer>) -> Result<Self, DetectError> {
        config.validate()?;
        Ok(Self { config, scorer })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Scan `image` at every pyramid level and return thresholded, grouped
    /// hits mapped back to input coordinates.
    ///
    /// `image` must already be at the canonical working resolution; the
    /// orchestrator resizes defensively before every call.
    pub fn detect(&self, image: &RgbaImage) -> Result<Vec<Candidate>, DetectError> {
        let (want_w, want_h) = self.config.input_size;
        let (got_w, got_h) = image.dimensions();
        if (got_w, got_h) != (want_w, want_h) {
            return Err(DetectError::InvalidInputShape {
                got_w,
                got_h,
                want_w,
                want_h,
            });
        }

        let gray = imageops::grayscale(image);
        let (win_w, win_h) = self.config.win_size;
        let (stride_x, stride_y) = self.config.win_stride;

        let mut hits = Vec::new();
        let mut scale = 1.0f64;
        for level_index in 0..self.config.levels {
            let level_w = (want_w as f64 / scale).round() as u32;
            let level_h = (want_h as f64 / scale).round() as u32;
            if level_w < win_w || level_h < win_h {
                break;
            }

            let scaled;
            let level: &GrayImage = if level_index == 0 {
                &gray
            } else {
                scaled = imageops::resize(&gray, level_w, level_h, imageops::FilterType::Triangle);
                &scaled
            };

            for y in (0..=level_h - win_h).step_by(stride_y as usize) {
                for x in (0..=level_w - win_w).step_by(stride_x as usize) {
                    let window = Rect::new(x as i32, y as i32, win_w as i32, win_h as i32);
                    let confidence = self.scorer.score(level, window);
                    if confidence >= self.config.hit_threshold {
                        hits.push(Candidate {
                            rect: map_to_input(window, scale),
                            confidence,
                        });
                    }
                }
            }

            scale *= self.config.scale_factor;
        }

        Ok(group_candidates(hits, self.config.group_threshold))
    }
}

/// Map a window from pyramid-level coordinates back to input coordinates.
fn map_to_input(window: Rect, scale: f64) -> Rect {
    Rect::new(
        (window.x as f64 * scale).round() as i32,
        (window.y as f64 * scale).round() as i32,
        (window.width as f64 * scale).round() as i32,
        (window.height as f64 * scale).round() as i32,
    )
}

/// Coarse duplicate clustering: partition hits by location similarity, drop
/// clusters below the population threshold, average the rest.
///
/// This mirrors the classic groupRectangles behavior. It is deliberately
/// coarse; the explicit containment filter afterwards removes the nested
/// duplicates this pass leaves behind.
fn group_candidates(hits: Vec<Candidate>, group_threshold: u32) -> Vec<Candidate> {
    if group_threshold == 0 || hits.len() <= 1 {
        return hits;
    }

    // Union-find over hit indices.
    let mut parent: Vec<usize> = (0..hits.len()).collect();
    fn find(parent: &mut Vec<usize>, mut i: usize) -> usize {
        while parent[i] != i {
            parent[i] = parent[parent[i]];
            i = parent[i];
        }
        i
    }
    for i in 0..hits.len() {
        for j in (i + 1)..hits.len() {
            if similar(&hits[i].rect, &hits[j].rect) {
                let (ri, rj) = (find(&mut parent, i), find(&mut parent, j));
                if ri != rj {
                    parent[rj] = ri;
                }
            }
        }
    }

    // Accumulate cluster members in first-appearance order.
    let mut roots: Vec<usize> = Vec::new();
    let mut members: Vec<Vec<usize>> = Vec::new();
    for i in 0..hits.len() {
        let root = find(&mut parent, i);
        match roots.iter().position(|&r| r == root) {
            Some(at) => members[at].push(i),
            None => {
                roots.push(root);
                members.push(vec![i]);
            }
        }
    }

    let mut grouped = Vec::new();
    for cluster in members {
        if (cluster.len() as u32) < group_threshold {
            continue;
        }
        let n = cluster.len() as f64;
        let (mut sx, mut sy, mut sw, mut sh) = (0f64, 0f64, 0f64, 0f64);
        let mut confidence = f32::MIN;
        for &i in &cluster {
            let r = hits[i].rect;
            sx += r.x as f64;
            sy += r.y as f64;
            sw += r.width as f64;
            sh += r.height as f64;
            confidence = confidence.max(hits[i].confidence);
        }
        grouped.push(Candidate {
            rect: Rect::new(
                (sx / n).round() as i32,
                (sy / n).round() as i32,
                (sw / n).round() as i32,
                (sh / n).round() as i32,
            ),
            confidence,
        });
    }
    grouped
}

/// Two rectangles are similar when every edge lies within a fraction of the
/// smaller rectangle's extent.
fn similar(a: &Rect, b: &Rect) -> bool {
    let delta = GROUP_EPS * 0.5 * (a.width.min(b.width) + a.height.min(b.height)) as f64;
    (a.x - b.x).abs() as f64 <= delta
        && (a.y - b.y).abs() as f64 <= delta
        && (a.right() - b.right()).abs() as f64 <= delta
        && (a.bottom() - b.bottom()).abs() as f64 <= delta
}
