//! Per-Frame Result Container
//!
//! A [`FrameResult`] holds one slot per modality for the frame currently
//! being processed. Producers merge their output into it, and the aggregator
//! takes an owned snapshot once the frame is complete.

pub mod models;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::fs::atomic_write_bytes;
use crate::{CollectError, CollectResult, FrameIndex};

pub use models::*;

// =============================================================================
// Modality
// =============================================================================

/// The six result kinds produced per frame
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Modality {
    Detection,
    Tracking,
    Attribute,
    Keypoint,
    Action,
    Reidentification,
}

impl Modality {
    /// Returns all modalities in slot order
    pub fn all() -> [Modality; 6] {
        [
            Modality::Detection,
            Modality::Tracking,
            Modality::Attribute,
            Modality::Keypoint,
            Modality::Action,
            Modality::Reidentification,
        ]
    }

    /// Short slot name used in exported documents
    pub fn slot_name(&self) -> &'static str {
        match self {
            Modality::Detection => "det",
            Modality::Tracking => "mot",
            Modality::Attribute => "attr",
            Modality::Keypoint => "kpt",
            Modality::Action => "action",
            Modality::Reidentification => "reid",
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slot_name())
    }
}

impl FromStr for Modality {
    type Err = CollectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "det" | "detection" => Ok(Modality::Detection),
            "mot" | "tracking" => Ok(Modality::Tracking),
            "attr" | "attribute" => Ok(Modality::Attribute),
            "kpt" | "keypoint" => Ok(Modality::Keypoint),
            "action" => Ok(Modality::Action),
            "reid" | "reidentification" => Ok(Modality::Reidentification),
            _ => Err(CollectError::UnknownModality(s.to_string())),
        }
    }
}

/// Whether a slot holds data, distinguishing never-written from emptied
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Availability {
    /// Nothing was written to the slot this frame
    Absent,
    /// The slot was written but carries no data
    Empty,
    /// The slot carries data
    Present,
}

impl Availability {
    pub fn is_present(&self) -> bool {
        matches!(self, Availability::Present)
    }
}

// =============================================================================
// Modality Results
// =============================================================================

/// An owned result for one modality, as handed over by a producer
#[derive(Clone, Debug, PartialEq)]
pub enum ModalityResult {
    Detection(DetectionResult),
    Tracking(TrackingResult),
    Attribute(AttributeResult),
    Keypoint(KeypointResult),
    Action(ActionResult),
    Reidentification(ReidResult),
}

impl ModalityResult {
    pub fn modality(&self) -> Modality {
        match self {
            ModalityResult::Detection(_) => Modality::Detection,
            ModalityResult::Tracking(_) => Modality::Tracking,
            ModalityResult::Attribute(_) => Modality::Attribute,
            ModalityResult::Keypoint(_) => Modality::Keypoint,
            ModalityResult::Action(_) => Modality::Action,
            ModalityResult::Reidentification(_) => Modality::Reidentification,
        }
    }
}

impl From<DetectionResult> for ModalityResult {
    fn from(r: DetectionResult) -> Self {
        ModalityResult::Detection(r)
    }
}

impl From<TrackingResult> for ModalityResult {
    fn from(r: TrackingResult) -> Self {
        ModalityResult::Tracking(r)
    }
}

impl From<AttributeResult> for ModalityResult {
    fn from(r: AttributeResult) -> Self {
        ModalityResult::Attribute(r)
    }
}

impl From<KeypointResult> for ModalityResult {
    fn from(r: KeypointResult) -> Self {
        ModalityResult::Keypoint(r)
    }
}

impl From<ActionResult> for ModalityResult {
    fn from(r: ActionResult) -> Self {
        ModalityResult::Action(r)
    }
}

impl From<ReidResult> for ModalityResult {
    fn from(r: ReidResult) -> Self {
        ModalityResult::Reidentification(r)
    }
}

/// A borrowed view of one modality slot
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ModalityRef<'a> {
    Detection(&'a DetectionResult),
    Tracking(&'a TrackingResult),
    Attribute(&'a AttributeResult),
    Keypoint(&'a KeypointResult),
    Action(&'a ActionResult),
    Reidentification(&'a ReidResult),
}

// =============================================================================
// Frame Result
// =============================================================================

/// Per-frame container with one slot per modality
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameResult {
    det: Option<DetectionResult>,
    mot: Option<TrackingResult>,
    attr: Option<AttributeResult>,
    kpt: Option<KeypointResult>,
    action: Option<ActionResult>,
    reid: Option<ReidResult>,
}

fn merge_slot<T: ModalityRecord>(slot: &mut Option<T>, incoming: T) {
    match slot {
        Some(existing) => existing.merge(incoming),
        None => *slot = Some(incoming),
    }
}

fn present<T: ModalityRecord>(slot: &Option<T>) -> Option<&T> {
    slot.as_ref().filter(|record| !record.is_empty())
}

fn availability_of<T: ModalityRecord>(slot: &Option<T>) -> Availability {
    match slot {
        None => Availability::Absent,
        Some(record) if record.is_empty() => Availability::Empty,
        Some(_) => Availability::Present,
    }
}

impl FrameResult {
    /// Creates a frame with every slot absent
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges a producer's result into its modality slot.
    ///
    /// Fields present in `result` overwrite the stored ones; action labels
    /// merge key by key.
    pub fn update(&mut self, result: impl Into<ModalityResult>) {
        match result.into() {
            ModalityResult::Detection(r) => merge_slot(&mut self.det, r),
            ModalityResult::Tracking(r) => merge_slot(&mut self.mot, r),
            ModalityResult::Attribute(r) => merge_slot(&mut self.attr, r),
            ModalityResult::Keypoint(r) => merge_slot(&mut self.kpt, r),
            ModalityResult::Action(r) => merge_slot(&mut self.action, r),
            ModalityResult::Reidentification(r) => merge_slot(&mut self.reid, r),
        }
    }

    /// Returns the slot for `modality`, or `None` when it is absent or empty
    pub fn get(&self, modality: Modality) -> Option<ModalityRef<'_>> {
        match modality {
            Modality::Detection => self.detection().map(ModalityRef::Detection),
            Modality::Tracking => self.tracking().map(ModalityRef::Tracking),
            Modality::Attribute => self.attribute().map(ModalityRef::Attribute),
            Modality::Keypoint => self.keypoint().map(ModalityRef::Keypoint),
            Modality::Action => self.action().map(ModalityRef::Action),
            Modality::Reidentification => self.reid().map(ModalityRef::Reidentification),
        }
    }

    /// Reports whether `modality` is absent, empty or present
    pub fn availability(&self, modality: Modality) -> Availability {
        match modality {
            Modality::Detection => availability_of(&self.det),
            Modality::Tracking => availability_of(&self.mot),
            Modality::Attribute => availability_of(&self.attr),
            Modality::Keypoint => availability_of(&self.kpt),
            Modality::Action => availability_of(&self.action),
            Modality::Reidentification => availability_of(&self.reid),
        }
    }

    /// Empties one slot
    pub fn clear(&mut self, modality: Modality) {
        match modality {
            Modality::Detection => self.det = None,
            Modality::Tracking => self.mot = None,
            Modality::Attribute => self.attr = None,
            Modality::Keypoint => self.kpt = None,
            Modality::Action => self.action = None,
            Modality::Reidentification => self.reid = None,
        }
    }

    /// Empties every slot
    pub fn clear_all(&mut self) {
        *self = Self::default();
    }

    /// Returns an independent copy of all six slots
    pub fn export(&self) -> FrameResult {
        self.clone()
    }

    /// Hands the frame over as a snapshot without copying
    pub fn into_snapshot(self, frame_index: FrameIndex) -> FrameSnapshot {
        FrameSnapshot {
            frame_index,
            result: self,
        }
    }

    pub fn detection(&self) -> Option<&DetectionResult> {
        present(&self.det)
    }

    pub fn tracking(&self) -> Option<&TrackingResult> {
        present(&self.mot)
    }

    pub fn attribute(&self) -> Option<&AttributeResult> {
        present(&self.attr)
    }

    pub fn keypoint(&self) -> Option<&KeypointResult> {
        present(&self.kpt)
    }

    pub fn action(&self) -> Option<&ActionResult> {
        present(&self.action)
    }

    pub fn reid(&self) -> Option<&ReidResult> {
        present(&self.reid)
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Writes the six-slot state to `path` as a binary snapshot
    pub fn save(&self, path: &Path) -> CollectResult<()> {
        let bytes = bincode::serde::encode_to_vec(self, bincode::config::standard())?;
        atomic_write_bytes(path, &bytes)?;
        debug!(path = %path.display(), bytes = bytes.len(), "Saved frame result");
        Ok(())
    }

    /// Reads a binary snapshot previously written by [`FrameResult::save`]
    pub fn load(path: &Path) -> CollectResult<Self> {
        let bytes = std::fs::read(path)?;
        let (result, _) = bincode::serde::decode_from_slice(&bytes, bincode::config::standard())?;
        debug!(path = %path.display(), "Loaded frame result");
        Ok(result)
    }
}

/// A frame's results frozen at `append` time
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub frame_index: FrameIndex,
    pub result: FrameResult,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_frame() -> FrameResult {
        let mut frame = FrameResult::new();
        frame.update(DetectionResult::new(vec![[0.0, 0.9, 1.0, 2.0, 30.0, 60.0]]));
        frame.update(TrackingResult::new(vec![
            [5.0, 0.9, 0.0, 1.0, 2.0, 30.0, 60.0],
            [7.0, 0.8, 0.0, 40.0, 5.0, 70.0, 90.0],
        ]));
        frame.update(AttributeResult::new(vec![
            vec!["Male".to_string()],
            vec!["Female".to_string()],
        ]));
        frame.update(KeypointResult::new(
            vec![vec![[1.5, 2.5, 0.9]], vec![[3.5, 4.5, 0.8]]],
            vec![0.9, 0.7],
        ));
        frame.update(ActionResult::new().with_label(2, ActionLabel::new(1, 0.88)));
        frame.update(ReidResult::new(
            vec![[5.0, 0.9, 1.0, 2.0, 30.0, 60.0], [7.0, 0.8, 40.0, 5.0, 70.0, 90.0]],
            vec![vec![0.1, 0.2], vec![0.3, 0.4]],
            vec![0.6, 0.5],
        ));
        frame
    }

    // -------------------------------------------------------------------------
    // Modality
    // -------------------------------------------------------------------------

    #[test]
    fn test_modality_parse_long_and_slot_names() {
        assert_eq!("mot".parse::<Modality>().unwrap(), Modality::Tracking);
        assert_eq!("tracking".parse::<Modality>().unwrap(), Modality::Tracking);
        assert_eq!("REID".parse::<Modality>().unwrap(), Modality::Reidentification);
        assert_eq!("kpt".parse::<Modality>().unwrap(), Modality::Keypoint);
    }

    #[test]
    fn test_modality_parse_unknown() {
        let err = "depth".parse::<Modality>().unwrap_err();
        assert!(matches!(err, CollectError::UnknownModality(name) if name == "depth"));
    }

    #[test]
    fn test_modality_display_is_slot_name() {
        let names: Vec<String> = Modality::all().iter().map(|m| m.to_string()).collect();
        assert_eq!(names, vec!["det", "mot", "attr", "kpt", "action", "reid"]);
    }

    // -------------------------------------------------------------------------
    // Get / Update / Clear
    // -------------------------------------------------------------------------

    #[test]
    fn test_new_frame_is_absent_everywhere() {
        let frame = FrameResult::new();
        for modality in Modality::all() {
            assert!(frame.get(modality).is_none());
            assert_eq!(frame.availability(modality), Availability::Absent);
        }
    }

    #[test]
    fn test_empty_slot_reads_as_none() {
        let mut frame = FrameResult::new();
        frame.update(TrackingResult::default());

        assert!(frame.get(Modality::Tracking).is_none());
        assert!(frame.tracking().is_none());
        assert_eq!(frame.availability(Modality::Tracking), Availability::Empty);
    }

    #[test]
    fn test_update_overwrites_on_collision() {
        let mut frame = FrameResult::new();
        frame.update(TrackingResult::new(vec![[1.0, 0.5, 0.0, 0.0, 0.0, 1.0, 1.0]]));
        frame.update(TrackingResult::new(vec![[9.0, 0.5, 0.0, 0.0, 0.0, 1.0, 1.0]]));

        let tracking = frame.tracking().unwrap();
        assert_eq!(tracking.boxes.len(), 1);
        assert_eq!(tracking.boxes[0][0], 9.0);
    }

    #[test]
    fn test_get_returns_matching_ref() {
        let frame = sample_frame();
        match frame.get(Modality::Reidentification) {
            Some(ModalityRef::Reidentification(reid)) => assert_eq!(reid.rects.len(), 2),
            other => panic!("unexpected slot: {:?}", other),
        }
        assert!(frame.availability(Modality::Action).is_present());
    }

    #[test]
    fn test_clear_single_slot() {
        let mut frame = sample_frame();
        frame.clear(Modality::Keypoint);

        assert!(frame.keypoint().is_none());
        assert_eq!(frame.availability(Modality::Keypoint), Availability::Absent);
        assert!(frame.tracking().is_some());
    }

    #[test]
    fn test_clear_all() {
        let mut frame = sample_frame();
        frame.clear_all();
        assert_eq!(frame, FrameResult::new());
    }

    // -------------------------------------------------------------------------
    // Export
    // -------------------------------------------------------------------------

    #[test]
    fn test_export_does_not_alias_live_state() {
        let mut frame = sample_frame();
        let exported = frame.export();

        frame.update(TrackingResult::new(vec![[99.0, 0.1, 0.0, 0.0, 0.0, 1.0, 1.0]]));
        frame.clear(Modality::Attribute);

        assert_eq!(exported.tracking().unwrap().boxes[0][0], 5.0);
        assert!(exported.attribute().is_some());
        assert_ne!(exported, frame);
    }

    #[test]
    fn test_into_snapshot_keeps_index() {
        let snapshot = sample_frame().into_snapshot(42);
        assert_eq!(snapshot.frame_index, 42);
        assert_eq!(snapshot.result, sample_frame());
    }

    // -------------------------------------------------------------------------
    // Persistence
    // -------------------------------------------------------------------------

    #[test]
    fn test_save_and_load_structurally_equal() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("frame_000001.bin");
        let frame = sample_frame();

        frame.save(&path).unwrap();
        let loaded = FrameResult::load(&path).unwrap();

        assert_eq!(loaded, frame);
    }

    #[test]
    fn test_save_and_load_preserves_empty_slot() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.bin");
        let mut frame = FrameResult::new();
        frame.update(AttributeResult::default());

        frame.save(&path).unwrap();
        let loaded = FrameResult::load(&path).unwrap();

        assert_eq!(loaded.availability(Modality::Attribute), Availability::Empty);
        assert_eq!(loaded.availability(Modality::Tracking), Availability::Absent);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = FrameResult::load(&dir.path().join("missing.bin")).unwrap_err();
        assert!(matches!(err, CollectError::IoError(_)));
    }

    #[test]
    fn test_load_garbage_is_decode_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("garbage.bin");
        std::fs::write(&path, [0xff, 0xff, 0xff]).unwrap();

        let err = FrameResult::load(&path).unwrap_err();
        assert!(matches!(err, CollectError::SnapshotDecode(_)));
    }
}
