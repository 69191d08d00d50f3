//! Daemon configuration.
//!
//! Layered the usual way: JSON config file (optional, `HOGWATCH_CONFIG`),
//! then environment variable overrides, then validation. Detector scan
//! geometry (window/block/cell) is deliberately not configurable at runtime;
//! it must match the classifier the engine was built with.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Result};
use serde::Deserialize;

use crate::detect::EngineConfig;

const DEFAULT_SOURCE: &str = "synthetic://sensor0";
const DEFAULT_SNAPSHOT_PATH: &str = "person.jpg";
const DEFAULT_FRAME_INTERVAL_MS: u64 = 0;

#[derive(Debug, Deserialize, Default)]
struct WatchConfigFile {
    source: Option<String>,
    snapshot_path: Option<PathBuf>,
    frame_interval_ms: Option<u64>,
    detector: Option<DetectorConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
struct DetectorConfigFile {
    levels: Option<u32>,
    scale_factor: Option<f64>,
    hit_threshold: Option<f32>,
    group_threshold: Option<u32>,
    input_width: Option<u32>,
    input_height: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Frame source URL; `synthetic://` selects the built-in generator.
    pub source: String,
    /// Fixed snapshot path, overwritten on every positive detection.
    pub snapshot_path: PathBuf,
    /// Optional pacing delay between iterations (synthetic sources only;
    /// real sensors pace the loop through blocking acquisition).
    pub frame_interval: Duration,
    pub engine: EngineConfig,
}

impl WatchConfig {
    /// Load from the file named by `HOGWATCH_CONFIG` (if set), apply env
    /// overrides, validate.
    pub fn load() -> Result<Self> {
        let file_cfg = match std::env::var("HOGWATCH_CONFIG").ok() {
            Some(path) => read_config_file(&PathBuf::from(path))?,
            None => WatchConfigFile::default(),
        };
        let mut cfg = Self::from_file(file_cfg);
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: WatchConfigFile) -> Self {
        let detector = file.detector.unwrap_or_default();
        let defaults = EngineConfig::default();
        let engine = EngineConfig {
            levels: detector.levels.unwrap_or(defaults.levels),
            scale_factor: detector.scale_factor.unwrap_or(defaults.scale_factor),
            hit_threshold: detector.hit_threshold.unwrap_or(defaults.hit_threshold),
            group_threshold: detector.group_threshold.unwrap_or(defaults.group_threshold),
            input_size: (
                detector.input_width.unwrap_or(defaults.input_size.0),
                detector.input_height.unwrap_or(defaults.input_size.1),
            ),
            ..defaults
        };
        Self {
            source: file.source.unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
            snapshot_path: file
                .snapshot_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SNAPSHOT_PATH)),
            frame_interval: Duration::from_millis(
                file.frame_interval_ms.unwrap_or(DEFAULT_FRAME_INTERVAL_MS),
            ),
            engine,
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(source) = std::env::var("HOGWATCH_SOURCE") {
            if !source.trim().is_empty() {
                self.source = source;
            }
        }
        if let Ok(path) = std::env::var("HOGWATCH_SNAPSHOT") {
            if !path.trim().is_empty() {
                self.snapshot_path = PathBuf::from(path);
            }
        }
        if let Ok(threshold) = std::env::var("HOGWATCH_HIT_THRESHOLD") {
            self.engine.hit_threshold = threshold
                .parse()
                .map_err(|_| anyhow!("HOGWATCH_HIT_THRESHOLD must be a number"))?;
        }
        if let Ok(levels) = std::env::var("HOGWATCH_LEVELS") {
            self.engine.levels = levels
                .parse()
                .map_err(|_| anyhow!("HOGWATCH_LEVELS must be an integer"))?;
        }
        if let Ok(interval) = std::env::var("HOGWATCH_FRAME_INTERVAL_MS") {
            let ms: u64 = interval
                .parse()
                .map_err(|_| anyhow!("HOGWATCH_FRAME_INTERVAL_MS must be an integer"))?;
            self.frame_interval = Duration::from_millis(ms);
        }
        Ok(())
    }

    fn validate(&mut self) -> Result<()> {
        if self.source.trim().is_empty() {
            return Err(anyhow!("frame source must not be empty"));
        }
        self.engine.validate()?;
        Ok(())
    }
}

fn read_config_file(path: &PathBuf) -> Result<WatchConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let cfg = serde_json::from_str(&raw)
        .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?;
    Ok(cfg)
}
