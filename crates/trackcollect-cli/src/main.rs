//! trackcollect CLI
//!
//! Replays a directory of binary frame snapshots through the track
//! aggregator and writes the normalized video document.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use trackcollect_core::{
    AlignmentMode, CollectorSettings, FrameIndex, FrameResult, TrackAggregator, VideoMetadata,
};

#[derive(Debug, Parser)]
#[command(name = "trackcollect", version, about = "Per-track aggregation of video analytics results")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Aggregate frame snapshots and export the video document
    Replay {
        /// Directory containing `*.bin` frame snapshots
        #[arg(long)]
        snapshots: PathBuf,

        /// Video metadata JSON merged into the document
        #[arg(long)]
        metadata: Option<PathBuf>,

        /// Destination of the video document
        #[arg(long, short)]
        output: PathBuf,

        /// Also write per-track histories to this path
        #[arg(long)]
        tracks: Option<PathBuf>,

        /// Collector settings JSON
        #[arg(long)]
        config: Option<PathBuf>,

        /// Keep every per-track list aligned with its frames
        #[arg(long)]
        strict: bool,
    },
}

#[derive(Debug, Serialize)]
struct ReplaySummary {
    frames: usize,
    tracks: usize,
    output: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    tracks_output: Option<PathBuf>,
}

fn init_logging() {
    use tracing_subscriber::prelude::*;

    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(cfg!(debug_assertions));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Command::Replay {
            snapshots,
            metadata,
            output,
            tracks,
            config,
            strict,
        } => {
            let mut settings = config
                .as_deref()
                .map(CollectorSettings::load)
                .unwrap_or_default();
            if strict {
                settings.collector.alignment = AlignmentMode::Strict;
            }

            let metadata = match metadata {
                Some(path) => VideoMetadata::load(&path)
                    .with_context(|| format!("Failed to read metadata {}", path.display()))?,
                None => VideoMetadata::default(),
            };

            let summary = replay(&snapshots, metadata, &settings, &output, tracks.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}

fn replay(
    snapshots: &Path,
    metadata: VideoMetadata,
    settings: &CollectorSettings,
    output: &Path,
    tracks_output: Option<&Path>,
) -> Result<ReplaySummary> {
    let files = snapshot_files(snapshots)?;
    tracing::info!(count = files.len(), dir = %snapshots.display(), "Replaying frame snapshots");

    let mut aggregator = TrackAggregator::with_settings(settings);
    for (frame_index, path) in files {
        let frame = FrameResult::load(&path)
            .with_context(|| format!("Failed to load snapshot {}", path.display()))?;
        aggregator
            .append_snapshot(frame.into_snapshot(frame_index))
            .with_context(|| format!("Failed to aggregate frame {}", frame_index))?;
    }

    aggregator.set_extra_info(metadata);
    aggregator
        .save_frame_results(output)
        .with_context(|| format!("Failed to export {}", output.display()))?;

    if let Some(path) = tracks_output {
        aggregator
            .save_tracks(path)
            .with_context(|| format!("Failed to write tracks {}", path.display()))?;
    }

    Ok(ReplaySummary {
        frames: aggregator.frame_count(),
        tracks: aggregator.tracks().len(),
        output: output.to_path_buf(),
        tracks_output: tracks_output.map(Path::to_path_buf),
    })
}

/// Lists `*.bin` files in frame order, paired with their frame index.
///
/// When every file stem is a number, the stems are the frame indices and
/// must be unique. Otherwise files are taken in name order and indexed by
/// position.
fn snapshot_files(dir: &Path) -> Result<Vec<(FrameIndex, PathBuf)>> {
    let mut paths = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read snapshot directory {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    paths.retain(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "bin"));
    paths.sort();

    let numbered: Option<Vec<(FrameIndex, PathBuf)>> = paths
        .iter()
        .map(|path| {
            let index = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(|stem| stem.parse::<FrameIndex>().ok())?;
            Some((index, path.clone()))
        })
        .collect();

    let Some(mut numbered) = numbered else {
        tracing::debug!("Non-numeric snapshot names; indexing frames by position");
        return Ok(paths
            .into_iter()
            .enumerate()
            .map(|(position, path)| (position as FrameIndex, path))
            .collect());
    };

    numbered.sort();
    if let Some(pair) = numbered.windows(2).find(|pair| pair[0].0 == pair[1].0) {
        bail!(
            "Duplicate frame index {} ({} and {})",
            pair[0].0,
            pair[0].1.display(),
            pair[1].1.display()
        );
    }
    Ok(numbered)
}
