//! trackcollect Core Library
//!
//! Per-frame result container and per-track aggregation for multi-modality
//! video analytics (detection, tracking, attributes, keypoints, actions and
//! re-identification embeddings).
//!
//! A producer fills a [`FrameResult`] for every frame and hands it to a
//! [`TrackAggregator`], which keeps a snapshot of the frame and re-keys the
//! ordinal-indexed results by track id. At the end of a run the snapshots are
//! normalized into a [`VideoDocument`] by the [`ExportNormalizer`].

pub mod collector;
pub mod export;
pub mod frame;
pub mod fs;
pub mod settings;

// Re-export common types
mod types;
pub use types::*;

mod error;
pub use error::*;

pub use collector::{AlignmentMode, TrackAggregator, TrackHistory};
pub use export::{ExportNormalizer, VideoDocument, VideoMetadata};
pub use frame::{FrameResult, FrameSnapshot, Modality};
pub use settings::CollectorSettings;
