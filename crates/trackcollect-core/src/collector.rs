//! Track Aggregator
//!
//! Collects per-frame results and re-keys them by track id, mainly for
//! multi-target multi-camera matching.
//!
//! Data layout:
//!
//! ```text
//! tracks:
//!   - [id1]: (all results of the N frames the id was seen in)
//!     - frames:    N x frame index
//!     - rects:     N x [[xmin, ymin, xmax, ymax]]
//!     - attrs:     attribute lines per sighting
//!     - kpts:      (points, score) per sighting
//!     - actions:   N x action label or None
//!     - features:  embedding per sighting
//!     - qualities: embedding quality per sighting
//!   ...
//!   - [idN]
//! ```
//!
//! `frames`, `rects` and `actions` always have one entry per sighting. The
//! other lists only grow when their modality was present, unless the
//! aggregator runs in [`AlignmentMode::Strict`].

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::export::{ExportNormalizer, VideoDocument, VideoMetadata};
use crate::frame::{ActionLabel, FrameResult, FrameSnapshot, Modality, PersonKeypoints};
use crate::fs::{atomic_write_json_indented, DEFAULT_JSON_INDENT};
use crate::settings::CollectorSettings;
use crate::{trailing_geometry, BoxGeometry, CollectError, CollectResult, FrameIndex, TrackId};

// =============================================================================
// Alignment Mode
// =============================================================================

/// How optional per-track fields behave on frames lacking their modality
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignmentMode {
    /// Skip `attrs`/`kpts`/`features`/`qualities` when the modality is absent
    #[default]
    Compatible,
    /// Push a `None` placeholder so every list has one entry per sighting
    Strict,
}

// =============================================================================
// Track History
// =============================================================================

/// Append-only history of one track id
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackHistory {
    pub frames: Vec<FrameIndex>,
    /// One-element list per sighting, wrapping the box geometry
    pub rects: Vec<[BoxGeometry; 1]>,
    pub attrs: Vec<Option<Vec<String>>>,
    pub kpts: Vec<Option<PersonKeypoints>>,
    pub features: Vec<Option<Vec<f32>>>,
    pub qualities: Vec<Option<f32>>,
    pub actions: Vec<Option<ActionLabel>>,
}

impl TrackHistory {
    /// Number of frames the track was seen in
    pub fn sightings(&self) -> usize {
        self.frames.len()
    }

    /// Returns the first and last frame the track was seen in
    pub fn span(&self) -> Option<(FrameIndex, FrameIndex)> {
        Some((*self.frames.first()?, *self.frames.last()?))
    }
}

fn push_optional<T>(list: &mut Vec<Option<T>>, value: Option<T>, mode: AlignmentMode) {
    match (value, mode) {
        (Some(value), _) => list.push(Some(value)),
        (None, AlignmentMode::Strict) => list.push(None),
        (None, AlignmentMode::Compatible) => {}
    }
}

// =============================================================================
// Per-Frame Observation
// =============================================================================

/// One ordinal position of the frame's ordering source
struct Sighting {
    track_id: TrackId,
    geometry: BoxGeometry,
}

/// Resolves the ordering source and checks index alignment of the frame.
fn sightings(frame: &FrameResult) -> CollectResult<Vec<Sighting>> {
    let rows: Vec<(f32, BoxGeometry)> = if let Some(reid) = frame.reid() {
        reid.rects
            .iter()
            .map(|rect| (rect[0], trailing_geometry(rect)))
            .collect()
    } else if let Some(mot) = frame.tracking() {
        mot.boxes
            .iter()
            .map(|row| (row[0], trailing_geometry(row)))
            .collect()
    } else {
        Vec::new()
    };

    let expected = rows.len();
    let check = |modality: Modality, actual: usize| -> CollectResult<()> {
        if actual != expected {
            return Err(CollectError::IndexAlignmentViolation {
                modality,
                expected,
                actual,
            });
        }
        Ok(())
    };

    if let Some(attr) = frame.attribute() {
        check(Modality::Attribute, attr.output.len())?;
    }
    if let Some(kpt) = frame.keypoint() {
        check(Modality::Keypoint, kpt.keypoint.0.len())?;
        check(Modality::Keypoint, kpt.keypoint.1.len())?;
    }
    if let Some(reid) = frame.reid() {
        check(Modality::Reidentification, reid.features.len())?;
        check(Modality::Reidentification, reid.qualities.len())?;
    }

    rows.into_iter()
        .map(|(raw_id, geometry)| {
            if !raw_id.is_finite() {
                return Err(CollectError::InvalidTrackId(raw_id));
            }
            Ok(Sighting {
                track_id: raw_id as TrackId,
                geometry,
            })
        })
        .collect()
}

// =============================================================================
// Track Aggregator
// =============================================================================

/// Accumulates per-track histories and raw frame snapshots for one run
#[derive(Debug)]
pub struct TrackAggregator {
    mode: AlignmentMode,
    json_indent: usize,
    tracks: BTreeMap<TrackId, TrackHistory>,
    frame_results: Vec<FrameSnapshot>,
    metadata: Option<VideoMetadata>,
}

impl TrackAggregator {
    /// Creates an aggregator in compatible mode
    pub fn new() -> Self {
        Self::with_mode(AlignmentMode::default())
    }

    pub fn with_mode(mode: AlignmentMode) -> Self {
        Self {
            mode,
            json_indent: DEFAULT_JSON_INDENT,
            tracks: BTreeMap::new(),
            frame_results: Vec::new(),
            metadata: None,
        }
    }

    pub fn with_settings(settings: &CollectorSettings) -> Self {
        Self {
            json_indent: settings.export.json_indent,
            ..Self::with_mode(settings.collector.alignment)
        }
    }

    pub fn mode(&self) -> AlignmentMode {
        self.mode
    }

    /// Records a copy of `frame` and folds its results into the track histories.
    ///
    /// Frames must be appended once each, in increasing frame order.
    pub fn append(&mut self, frame_index: FrameIndex, frame: &FrameResult) -> CollectResult<()> {
        self.append_snapshot(FrameSnapshot {
            frame_index,
            result: frame.export(),
        })
    }

    /// Same as [`TrackAggregator::append`], taking ownership of the snapshot.
    ///
    /// Index alignment is checked before anything is recorded, so a rejected
    /// frame leaves the aggregator unchanged.
    pub fn append_snapshot(&mut self, snapshot: FrameSnapshot) -> CollectResult<()> {
        let sightings = sightings(&snapshot.result)?;
        let frame_index = snapshot.frame_index;
        let frame = &snapshot.result;

        if sightings.is_empty() && frame.reid().is_none() && frame.tracking().is_none() {
            debug!(frame_index, "No tracking or reid result; zero tracks this frame");
        }

        let attr = frame.attribute();
        let kpt = frame.keypoint();
        let action = frame.action();
        let reid = frame.reid();

        for (idx, sighting) in sightings.into_iter().enumerate() {
            let history = self.tracks.entry(sighting.track_id).or_insert_with(|| {
                debug!(track_id = sighting.track_id, frame_index, "New track");
                TrackHistory::default()
            });

            history.frames.push(frame_index);
            history.rects.push([sighting.geometry]);
            push_optional(
                &mut history.attrs,
                attr.map(|attr| attr.output[idx].clone()),
                self.mode,
            );
            push_optional(
                &mut history.kpts,
                kpt.and_then(|kpt| kpt.person(idx)),
                self.mode,
            );
            // Action models run every few frames; keep one entry per sighting regardless.
            history
                .actions
                .push(action.and_then(|action| action.for_ordinal(idx)).cloned());
            push_optional(
                &mut history.features,
                reid.map(|reid| reid.features[idx].clone()),
                self.mode,
            );
            push_optional(
                &mut history.qualities,
                reid.map(|reid| reid.qualities[idx]),
                self.mode,
            );
        }

        self.frame_results.push(snapshot);
        Ok(())
    }

    /// Live per-track histories keyed by track id
    pub fn tracks(&self) -> &BTreeMap<TrackId, TrackHistory> {
        &self.tracks
    }

    pub fn track(&self, track_id: TrackId) -> Option<&TrackHistory> {
        self.tracks.get(&track_id)
    }

    /// Raw snapshots in append order
    pub fn frame_results(&self) -> &[FrameSnapshot] {
        &self.frame_results
    }

    pub fn frame_count(&self) -> usize {
        self.frame_results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frame_results.is_empty()
    }

    /// Writes the per-track histories as JSON for multi-camera matching
    pub fn save_tracks(&self, path: &Path) -> CollectResult<()> {
        atomic_write_json_indented(path, &self.tracks, self.json_indent)?;
        info!(path = %path.display(), tracks = self.tracks.len(), "Saved track histories");
        Ok(())
    }

    // =========================================================================
    // Export
    // =========================================================================

    /// Stores the video metadata merged into the exported document
    pub fn set_extra_info(&mut self, metadata: VideoMetadata) {
        self.metadata = Some(metadata);
    }

    pub fn extra_info(&self) -> Option<&VideoMetadata> {
        self.metadata.as_ref()
    }

    /// Normalizes the recorded snapshots into a video document
    pub fn frame_document(&self) -> CollectResult<VideoDocument> {
        let metadata = self.metadata.as_ref().ok_or(CollectError::MissingMetadata)?;
        ExportNormalizer::new(metadata).normalize(&self.frame_results)
    }

    /// Normalizes the recorded snapshots and writes the document to `path`
    pub fn save_frame_results(&self, path: &Path) -> CollectResult<()> {
        self.frame_document()?.write(path, self.json_indent)
    }
}

impl Default for TrackAggregator {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
