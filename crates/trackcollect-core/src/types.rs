//! trackcollect Type Definitions
//!
//! Defines fundamental types shared by the frame container, the aggregator
//! and the exporter.

// =============================================================================
// ID Types
// =============================================================================

/// Persistent track identity assigned by the upstream tracker
pub type TrackId = i64;

/// Frame index supplied by the caller on every `append`
pub type FrameIndex = u64;

// =============================================================================
// Geometry Types
// =============================================================================

/// Box geometry `[xmin, ymin, xmax, ymax]` in pixels
pub type BoxGeometry = [f32; 4];

/// Integer box geometry after export normalization
pub type PixelBox = [i64; 4];

/// Tracker row `[track_id, score, class_label, xmin, ymin, xmax, ymax]`
pub type TrackRow = [f32; 7];

/// Re-identification row `[track_id, score, xmin, ymin, xmax, ymax]`
pub type ReidRect = [f32; 6];

/// Detector row `[class_label, score, xmin, ymin, xmax, ymax]`
pub type DetectionRow = [f32; 6];

/// Single pose keypoint `[x, y, confidence]`
pub type Keypoint = [f32; 3];

/// Returns the trailing four values of a row as box geometry.
pub fn trailing_geometry<const N: usize>(row: &[f32; N]) -> BoxGeometry {
    let mut geometry = [0.0; 4];
    if N >= 4 {
        geometry.copy_from_slice(&row[N - 4..]);
    }
    geometry
}
