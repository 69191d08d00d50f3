//! hogwatchd - person detection daemon
//!
//! This daemon:
//! 1. Opens a frame source (the built-in synthetic generator, or any sensor
//!    binding feeding the listener channel)
//! 2. Runs the multi-scale detection engine on each color frame
//! 3. Suppresses duplicate boxes and annotates the working copy
//! 4. Persists a snapshot of the raw frame on every positive detection
//! 5. Stops cooperatively on Ctrl-C or ESC from a display sink

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;

use hogwatch::{
    BrightnessScorer, Engine, FrameSource, NullSink, Pipeline, ShutdownSignal, SnapshotWriter,
    SourceError, StopReason, SyntheticConfig, SyntheticSource, WatchConfig,
};

#[derive(Debug, Parser)]
#[command(name = "hogwatchd", about = "Real-time person detection daemon")]
struct Args {
    /// JSON config file; falls back to the HOGWATCH_CONFIG env var.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Frame source URL (synthetic:// selects the built-in generator).
    #[arg(long)]
    source: Option<String>,
    /// Snapshot output path, overwritten on every positive detection.
    #[arg(long)]
    snapshot: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if let Some(path) = &args.config {
        std::env::set_var("HOGWATCH_CONFIG", path);
    }
    let mut cfg = WatchConfig::load()?;
    if let Some(source) = args.source {
        cfg.source = source;
    }
    if let Some(snapshot) = args.snapshot {
        cfg.snapshot_path = snapshot;
    }

    let source = open_source(&cfg)?;
    let engine = Engine::new(cfg.engine, Box::new(BrightnessScorer))?;
    let shutdown = ShutdownSignal::new();
    shutdown.install_ctrlc()?;
    let snapshot = SnapshotWriter::new(cfg.snapshot_path.clone());

    log::info!("streaming from {}", cfg.source);
    log::info!("snapshot path: {}", cfg.snapshot_path.display());

    let mut pipeline = Pipeline::new(source, engine, NullSink, snapshot, shutdown);
    let summary = pipeline.run()?;

    match summary.stop_reason {
        StopReason::ShutdownRequested => {
            log::info!(
                "shutdown requested after {} frames ({} snapshots)",
                summary.frames,
                summary.snapshots
            );
        }
        StopReason::SourceDisconnected => {
            log::warn!(
                "sensor disconnected after {} frames ({} snapshots)",
                summary.frames,
                summary.snapshots
            );
        }
    }
    Ok(())
}

/// Resolve the configured source URL to a concrete frame source.
///
/// Unknown schemes mean no usable sensor; the daemon exits non-zero without
/// retrying, matching the no-device startup contract.
fn open_source(cfg: &WatchConfig) -> Result<Box<dyn FrameSource>> {
    if cfg.source.starts_with("synthetic://") {
        let synthetic = SyntheticSource::new(SyntheticConfig {
            frame_interval: cfg.frame_interval,
            ..SyntheticConfig::default()
        });
        return Ok(Box::new(synthetic));
    }
    Err(anyhow!(SourceError::NoDevice).context(format!("no sensor binding for {}", cfg.source)))
}
