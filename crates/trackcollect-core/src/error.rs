//! trackcollect Error Definitions
//!
//! Defines error types used throughout the collector.

use thiserror::Error;

use crate::frame::Modality;
use crate::FrameIndex;

/// Collector error types
#[derive(Error, Debug)]
pub enum CollectError {
    // =========================================================================
    // Aggregation Errors
    // =========================================================================
    #[error(
        "Index alignment violation: {modality} has {actual} entries, ordering source has {expected}"
    )]
    IndexAlignmentViolation {
        modality: Modality,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid track id: {0}")]
    InvalidTrackId(f32),

    #[error("Unknown modality: {0}")]
    UnknownModality(String),

    // =========================================================================
    // Export Errors
    // =========================================================================
    #[error("Malformed attribute line in frame {frame_index}, person {person}: {reason}")]
    MalformedAttributeLine {
        frame_index: FrameIndex,
        person: usize,
        reason: String,
    },

    #[error("Unencodable value: {0}")]
    UnencodableValue(String),

    #[error("Video metadata not set")]
    MissingMetadata,

    // =========================================================================
    // Persistence Errors
    // =========================================================================
    #[error("Failed to encode frame snapshot: {0}")]
    SnapshotEncode(#[from] bincode::error::EncodeError),

    #[error("Failed to decode frame snapshot: {0}")]
    SnapshotDecode(#[from] bincode::error::DecodeError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Collector result type
pub type CollectResult<T> = Result<T, CollectError>;

impl CollectError {
    /// Maps a JSON serialization failure of an export document.
    ///
    /// Data errors raised while encoding numeric arrays become
    /// [`CollectError::UnencodableValue`]; everything else stays a JSON error.
    pub fn from_export(err: serde_json::Error) -> Self {
        if err.is_data() {
            CollectError::UnencodableValue(err.to_string())
        } else if err.is_io() {
            CollectError::IoError(err.into())
        } else {
            CollectError::JsonError(err)
        }
    }
}
