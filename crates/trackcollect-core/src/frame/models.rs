//! Modality Data Models
//!
//! Typed per-frame results for each of the six perception modalities.
//! Rows are fixed-size arrays so shape mistakes are caught where producers
//! build them instead of deep inside the aggregator.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{DetectionRow, Keypoint, ReidRect, TrackRow};

/// Keypoints of one person: the points and the pose score
pub type PersonKeypoints = (Vec<Keypoint>, f32);

// =============================================================================
// Record Trait
// =============================================================================

/// Behaviour shared by every modality record stored in a frame slot.
pub trait ModalityRecord {
    /// Returns true when the record carries no data at all
    fn is_empty(&self) -> bool;

    /// Merges `incoming` into `self`; non-empty incoming fields win.
    fn merge(&mut self, incoming: Self);
}

fn overwrite_if_present<T>(field: &mut Vec<T>, incoming: Vec<T>) {
    if !incoming.is_empty() {
        *field = incoming;
    }
}

// =============================================================================
// Detection
// =============================================================================

/// Raw detector output; carried through to the export untouched
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    /// Detected boxes `[class_label, score, xmin, ymin, xmax, ymax]`
    pub boxes: Vec<DetectionRow>,
    /// Number of boxes per input image
    pub boxes_num: Vec<usize>,
}

impl DetectionResult {
    pub fn new(boxes: Vec<DetectionRow>) -> Self {
        let boxes_num = vec![boxes.len()];
        Self { boxes, boxes_num }
    }
}

impl ModalityRecord for DetectionResult {
    fn is_empty(&self) -> bool {
        self.boxes.is_empty() && self.boxes_num.is_empty()
    }

    fn merge(&mut self, incoming: Self) {
        overwrite_if_present(&mut self.boxes, incoming.boxes);
        overwrite_if_present(&mut self.boxes_num, incoming.boxes_num);
    }
}

// =============================================================================
// Tracking
// =============================================================================

/// Multi-object tracker output
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackingResult {
    /// Tracked boxes `[track_id, score, class_label, xmin, ymin, xmax, ymax]`
    pub boxes: Vec<TrackRow>,
}

impl TrackingResult {
    pub fn new(boxes: Vec<TrackRow>) -> Self {
        Self { boxes }
    }
}

impl ModalityRecord for TrackingResult {
    fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    fn merge(&mut self, incoming: Self) {
        overwrite_if_present(&mut self.boxes, incoming.boxes);
    }
}

// =============================================================================
// Attribute
// =============================================================================

/// Attribute classifier output: one list of free-text lines per person
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeResult {
    pub output: Vec<Vec<String>>,
}

impl AttributeResult {
    pub fn new(output: Vec<Vec<String>>) -> Self {
        Self { output }
    }
}

impl ModalityRecord for AttributeResult {
    fn is_empty(&self) -> bool {
        self.output.is_empty()
    }

    fn merge(&mut self, incoming: Self) {
        overwrite_if_present(&mut self.output, incoming.output);
    }
}

// =============================================================================
// Keypoint
// =============================================================================

/// Pose estimator output: `(points per person, score per person)`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct KeypointResult {
    pub keypoint: (Vec<Vec<Keypoint>>, Vec<f32>),
}

impl KeypointResult {
    pub fn new(points: Vec<Vec<Keypoint>>, scores: Vec<f32>) -> Self {
        Self {
            keypoint: (points, scores),
        }
    }

    /// Returns the keypoints of the person at ordinal `idx`
    pub fn person(&self, idx: usize) -> Option<PersonKeypoints> {
        let points = self.keypoint.0.get(idx)?;
        let score = self.keypoint.1.get(idx)?;
        Some((points.clone(), *score))
    }
}

impl ModalityRecord for KeypointResult {
    fn is_empty(&self) -> bool {
        self.keypoint.0.is_empty() && self.keypoint.1.is_empty()
    }

    fn merge(&mut self, incoming: Self) {
        if !incoming.is_empty() {
            self.keypoint = incoming.keypoint;
        }
    }
}

// =============================================================================
// Action
// =============================================================================

/// Action recognized for one tracked person
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionLabel {
    /// Action class index
    pub class: u32,
    /// Classifier confidence
    pub score: f32,
}

impl ActionLabel {
    pub fn new(class: u32, score: f32) -> Self {
        Self { class, score }
    }
}

/// Sparse action output keyed by 1-based ordinal position (not track id).
///
/// Action models run every few frames, so most frames carry no entry for a
/// given person.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionResult {
    pub labels: BTreeMap<usize, ActionLabel>,
}

impl ActionResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a label for the person at 1-based `position`
    pub fn with_label(mut self, position: usize, label: ActionLabel) -> Self {
        self.labels.insert(position, label);
        self
    }

    /// Returns the label for the person at 0-based ordinal `idx`
    pub fn for_ordinal(&self, idx: usize) -> Option<&ActionLabel> {
        self.labels.get(&(idx + 1))
    }
}

impl ModalityRecord for ActionResult {
    fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    fn merge(&mut self, incoming: Self) {
        self.labels.extend(incoming.labels);
    }
}

// =============================================================================
// Re-identification
// =============================================================================

/// Re-identification output, index-aligned across all three lists
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReidResult {
    /// Boxes `[track_id, score, xmin, ymin, xmax, ymax]`
    pub rects: Vec<ReidRect>,
    /// Embedding vector per box
    pub features: Vec<Vec<f32>>,
    /// Embedding quality per box
    pub qualities: Vec<f32>,
}

impl ReidResult {
    pub fn new(rects: Vec<ReidRect>, features: Vec<Vec<f32>>, qualities: Vec<f32>) -> Self {
        Self {
            rects,
            features,
            qualities,
        }
    }
}

impl ModalityRecord for ReidResult {
    fn is_empty(&self) -> bool {
        self.rects.is_empty() && self.features.is_empty() && self.qualities.is_empty()
    }

    fn merge(&mut self, incoming: Self) {
        overwrite_if_present(&mut self.rects, incoming.rects);
        overwrite_if_present(&mut self.features, incoming.features);
        overwrite_if_present(&mut self.qualities, incoming.qualities);
    }
}
