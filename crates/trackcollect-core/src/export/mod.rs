//! Video Export
//!
//! Turns the raw per-frame snapshots held by the aggregator into one
//! JSON-serializable video document:
//!
//! - keypoint coordinates become integer pixel arrays
//! - tracker rows are split into track ids and trimmed `[xmin, ymin, xmax, ymax]` boxes
//! - free-text attribute lines are parsed into [`PersonAttributes`]
//! - caller-supplied video metadata and per-frame `entrance` annotations are merged in
//!
//! Every fix-up is idempotent, and normalization works on copies, so the
//! aggregator's snapshots stay untouched and an export can be re-run.

pub mod attributes;
pub mod encoding;

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::frame::{
    ActionResult, DetectionResult, FrameSnapshot, KeypointResult, ReidResult, TrackingResult,
};
use crate::fs::atomic_write_json_indented;
use crate::{
    CollectError, CollectResult, DetectionRow, FrameIndex, Keypoint, PixelBox, ReidRect, TrackId,
    TrackRow,
};

pub use attributes::PersonAttributes;
use encoding::{truncate_row, truncate_scalar};

// =============================================================================
// Video Metadata
// =============================================================================

/// Video-level information supplied by the caller once per run
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    /// Inference input type (e.g. "video")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inftype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fps: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_count: Option<u64>,
    /// Entrance line geometry, passed through as given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entrance_line: Option<serde_json::Value>,
    /// Per-frame annotations, positionally aligned with the appended frames
    #[serde(default)]
    pub frames: Vec<FrameAnnotation>,
}

/// Auxiliary annotation for one frame
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameAnnotation {
    /// Entrance-line crossing record, passed through as given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entrance: Option<serde_json::Value>,
}

impl VideoMetadata {
    /// Reads metadata from a JSON file
    pub fn load(path: &Path) -> CollectResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

// =============================================================================
// Frame Records
// =============================================================================

/// Detector output as written to the document
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DetectionRecord {
    #[serde(serialize_with = "encoding::numeric")]
    pub boxes: Vec<DetectionRow>,
    #[serde(serialize_with = "encoding::numeric")]
    pub boxes_num: Vec<usize>,
}

impl From<&DetectionResult> for DetectionRecord {
    fn from(det: &DetectionResult) -> Self {
        Self {
            boxes: det.boxes.clone(),
            boxes_num: det.boxes_num.clone(),
        }
    }
}

/// Tracker boxes before and after the tracking fix-up
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TrackBoxes {
    /// Full rows `[track_id, score, class_label, xmin, ymin, xmax, ymax]`
    #[serde(serialize_with = "encoding::numeric")]
    Raw(Vec<TrackRow>),
    /// Geometry only
    Trimmed(Vec<PixelBox>),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrackingRecord {
    pub boxes: TrackBoxes,
}

/// Side output of the tracking fix-up
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrackingFixup {
    /// Track ids in frame-local order
    pub ids: Vec<TrackId>,
    /// Tracker scores in frame-local order; kept for consumers of the
    /// record, not written to the document
    pub scores: Vec<f32>,
}

impl TrackingRecord {
    /// Splits raw rows into ids, scores and trimmed integer boxes.
    ///
    /// Returns `None` when the boxes were already trimmed.
    pub fn fix(&mut self) -> CollectResult<Option<TrackingFixup>> {
        let rows = match &self.boxes {
            TrackBoxes::Trimmed(_) => return Ok(None),
            TrackBoxes::Raw(rows) => rows,
        };

        let mut fixup = TrackingFixup::default();
        let mut boxes = Vec::with_capacity(rows.len());
        for row in rows {
            let ints = truncate_row(row)?;
            fixup.ids.push(ints[0]);
            fixup.scores.push(row[1]);
            boxes.push([ints[3], ints[4], ints[5], ints[6]]);
        }

        self.boxes = TrackBoxes::Trimmed(boxes);
        Ok(Some(fixup))
    }
}

impl From<&TrackingResult> for TrackingRecord {
    fn from(mot: &TrackingResult) -> Self {
        Self {
            boxes: TrackBoxes::Raw(mot.boxes.clone()),
        }
    }
}

/// Attribute lines before and after parsing
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttributeRecord {
    Raw { output: Vec<Vec<String>> },
    Parsed { people: Vec<PersonAttributes> },
}

impl AttributeRecord {
    /// Replaces raw `output` lines with parsed `people`; no-op once parsed.
    pub fn fix(&mut self, frame_index: FrameIndex) -> CollectResult<()> {
        let output = match self {
            AttributeRecord::Parsed { .. } => return Ok(()),
            AttributeRecord::Raw { output } => output,
        };

        let people = output
            .iter()
            .enumerate()
            .map(|(person, lines)| {
                PersonAttributes::parse(lines.as_slice()).map_err(|reason| {
                    CollectError::MalformedAttributeLine {
                        frame_index,
                        person,
                        reason,
                    }
                })
            })
            .collect::<CollectResult<Vec<_>>>()?;

        *self = AttributeRecord::Parsed { people };
        Ok(())
    }
}

/// Pose keypoints before and after integer coercion
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum KeypointRecord {
    Raw {
        #[serde(serialize_with = "encoding::numeric")]
        keypoint: (Vec<Vec<Keypoint>>, Vec<f32>),
    },
    Pixel {
        keypoint: (Vec<Vec<[i64; 3]>>, Vec<i64>),
    },
}

impl KeypointRecord {
    /// Coerces every keypoint value to an integer; no-op once coerced.
    pub fn fix(&mut self) -> CollectResult<()> {
        let (points, scores) = match self {
            KeypointRecord::Pixel { .. } => return Ok(()),
            KeypointRecord::Raw { keypoint } => keypoint,
        };

        let pixel_points = points
            .iter()
            .map(|person| person.iter().map(|point| truncate_row(point)).collect())
            .collect::<CollectResult<Vec<Vec<_>>>>()?;
        let pixel_scores = scores
            .iter()
            .map(|score| truncate_scalar(*score))
            .collect::<CollectResult<Vec<_>>>()?;

        *self = KeypointRecord::Pixel {
            keypoint: (pixel_points, pixel_scores),
        };
        Ok(())
    }
}

impl From<&KeypointResult> for KeypointRecord {
    fn from(kpt: &KeypointResult) -> Self {
        KeypointRecord::Raw {
            keypoint: kpt.keypoint.clone(),
        }
    }
}

/// Re-identification output as written to the document
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReidRecord {
    #[serde(serialize_with = "encoding::numeric")]
    pub rects: Vec<ReidRect>,
    #[serde(serialize_with = "encoding::numeric")]
    pub features: Vec<Vec<f32>>,
    #[serde(serialize_with = "encoding::numeric")]
    pub qualities: Vec<f32>,
}

impl From<&ReidResult> for ReidRecord {
    fn from(reid: &ReidResult) -> Self {
        Self {
            rects: reid.rects.clone(),
            features: reid.features.clone(),
            qualities: reid.qualities.clone(),
        }
    }
}

/// One normalized frame of the video document
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FrameRecord {
    #[serde(skip)]
    pub frame_index: FrameIndex,
    #[serde(serialize_with = "encoding::record_or_empty")]
    pub det: Option<DetectionRecord>,
    #[serde(serialize_with = "encoding::record_or_empty")]
    pub mot: Option<TrackingRecord>,
    #[serde(serialize_with = "encoding::record_or_empty")]
    pub attr: Option<AttributeRecord>,
    #[serde(serialize_with = "encoding::record_or_empty")]
    pub kpt: Option<KeypointRecord>,
    #[serde(serialize_with = "encoding::record_or_empty")]
    pub action: Option<ActionResult>,
    #[serde(serialize_with = "encoding::record_or_empty")]
    pub reid: Option<ReidRecord>,
    /// Track ids in frame-local order, aligned with `people` and keypoints
    pub ids: Vec<TrackId>,
    /// Tracker scores split off by the tracking fix-up; available to callers
    /// of [`ExportNormalizer::normalize`], not serialized
    #[serde(skip)]
    pub scores: Vec<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entrance: Option<serde_json::Value>,
}

impl FrameRecord {
    /// Copies a snapshot into an un-normalized record
    pub fn from_snapshot(snapshot: &FrameSnapshot) -> Self {
        let result = &snapshot.result;
        Self {
            frame_index: snapshot.frame_index,
            det: result.detection().map(DetectionRecord::from),
            mot: result.tracking().map(TrackingRecord::from),
            attr: result.attribute().map(|attr| AttributeRecord::Raw {
                output: attr.output.clone(),
            }),
            kpt: result.keypoint().map(KeypointRecord::from),
            action: result.action().cloned(),
            reid: result.reid().map(ReidRecord::from),
            ids: Vec::new(),
            scores: Vec::new(),
            entrance: None,
        }
    }

    /// Applies the keypoint, tracking and attribute fix-ups in place
    pub fn normalize(&mut self) -> CollectResult<()> {
        if let Some(kpt) = self.kpt.as_mut() {
            kpt.fix()?;
        }
        if let Some(mot) = self.mot.as_mut() {
            if let Some(fixup) = mot.fix()? {
                self.ids = fixup.ids;
                self.scores = fixup.scores;
            }
        }
        if let Some(attr) = self.attr.as_mut() {
            attr.fix(self.frame_index)?;
        }
        Ok(())
    }
}

// =============================================================================
// Video Document
// =============================================================================

/// The exported video-level document
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VideoDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inftype: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fps: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entrance_line: Option<serde_json::Value>,
    pub frames: Vec<FrameRecord>,
}

impl VideoDocument {
    /// Writes the document as JSON indented by `indent` spaces
    pub fn write(&self, path: &Path, indent: usize) -> CollectResult<()> {
        atomic_write_json_indented(path, self, indent)?;
        info!(
            path = %path.display(),
            frames = self.frames.len(),
            "Exported video document"
        );
        Ok(())
    }
}

// =============================================================================
// Export Normalizer
// =============================================================================

/// One-shot, order-preserving transform from snapshots to a [`VideoDocument`]
pub struct ExportNormalizer<'a> {
    metadata: &'a VideoMetadata,
}

impl<'a> ExportNormalizer<'a> {
    pub fn new(metadata: &'a VideoMetadata) -> Self {
        Self { metadata }
    }

    /// Normalizes every snapshot and merges the video metadata.
    ///
    /// Any malformed frame aborts the whole export.
    pub fn normalize(&self, snapshots: &[FrameSnapshot]) -> CollectResult<VideoDocument> {
        let frames = snapshots
            .iter()
            .map(|snapshot| {
                let mut record = FrameRecord::from_snapshot(snapshot);
                record.normalize()?;
                Ok(record)
            })
            .collect::<CollectResult<Vec<_>>>()?;

        Ok(self.merge_metadata(frames))
    }

    fn merge_metadata(&self, mut frames: Vec<FrameRecord>) -> VideoDocument {
        let metadata = self.metadata;
        if !metadata.frames.is_empty() && metadata.frames.len() != frames.len() {
            warn!(
                annotations = metadata.frames.len(),
                frames = frames.len(),
                "Frame annotation count differs from appended frame count"
            );
        }

        for (annotation, record) in metadata.frames.iter().zip(frames.iter_mut()) {
            if let Some(entrance) = &annotation.entrance {
                record.entrance = Some(entrance.clone());
            }
        }

        VideoDocument {
            inftype: metadata.inftype.clone(),
            width: metadata.width,
            height: metadata.height,
            fps: metadata.fps,
            frame_count: metadata.frame_count,
            entrance_line: metadata.entrance_line.clone(),
            frames,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::{to_json_indented, DEFAULT_JSON_INDENT};
    use crate::frame::{ActionLabel, AttributeResult, FrameResult};
    use serde_json::json;
    use tempfile::TempDir;

    fn person_lines(gender: &str) -> Vec<String> {
        [
            gender,
            "Age18-60",
            "Side",
            "Glasses: False",
            "Hat: True",
            "HoldObjectsInFront: False",
            "No bag",
            "Upper: LongSleeve",
            "Lower: Trousers",
            "No boots",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    fn snapshot(frame_index: FrameIndex) -> FrameSnapshot {
        let mut frame = FrameResult::new();
        frame.update(TrackingResult::new(vec![
            [5.0, 0.93, 0.0, 10.7, 20.2, 50.9, 120.4],
            [7.0, 0.81, 0.0, 200.0, 30.0, 260.5, 180.0],
        ]));
        frame.update(AttributeResult::new(vec![
            person_lines("Male"),
            person_lines("Female"),
        ]));
        frame.update(KeypointResult::new(
            vec![vec![[11.6, 22.4, 0.9]], vec![[201.2, 31.8, 0.7]]],
            vec![0.95, 0.85],
        ));
        frame.update(ActionResult::new().with_label(1, ActionLabel::new(1, 0.9)));
        frame.into_snapshot(frame_index)
    }

    // -------------------------------------------------------------------------
    // Tracking Fix-up
    // -------------------------------------------------------------------------

    #[test]
    fn test_tracking_fix_splits_rows() {
        let mut record = TrackingRecord::from(&TrackingResult::new(vec![
            [5.0, 0.93, 0.0, 10.7, 20.2, 50.9, 120.4],
            [7.0, 0.81, 0.0, 200.0, 30.0, 260.5, 180.0],
        ]));

        let fixup = record.fix().unwrap().unwrap();
        assert_eq!(fixup.ids, vec![5, 7]);
        assert_eq!(fixup.scores, vec![0.93, 0.81]);
        assert_eq!(
            record.boxes,
            TrackBoxes::Trimmed(vec![[10, 20, 50, 120], [200, 30, 260, 180]])
        );
    }

    #[test]
    fn test_tracking_fix_is_idempotent() {
        let mut record =
            TrackingRecord::from(&TrackingResult::new(vec![[3.0, 0.5, 0.0, 1.0, 2.0, 3.0, 4.0]]));
        record.fix().unwrap();
        let fixed = record.clone();

        assert_eq!(record.fix().unwrap(), None);
        assert_eq!(record, fixed);
    }

    #[test]
    fn test_tracking_fix_rejects_non_finite() {
        let mut record = TrackingRecord::from(&TrackingResult::new(vec![[
            3.0,
            0.5,
            0.0,
            f32::NAN,
            2.0,
            3.0,
            4.0,
        ]]));
        assert!(matches!(
            record.fix(),
            Err(CollectError::UnencodableValue(_))
        ));
    }

    // -------------------------------------------------------------------------
    // Attribute / Keypoint Fix-ups
    // -------------------------------------------------------------------------

    #[test]
    fn test_attribute_fix_replaces_output_with_people() {
        let mut record = AttributeRecord::Raw {
            output: vec![person_lines("Male")],
        };
        record.fix(3).unwrap();

        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("output").is_none());
        assert_eq!(json["people"][0]["gender"], "Male");
        assert_eq!(json["people"][0]["hat"], true);

        let parsed = record.clone();
        record.fix(3).unwrap();
        assert_eq!(record, parsed);
    }

    #[test]
    fn test_attribute_fix_reports_frame_and_person() {
        let mut broken = person_lines("Male");
        broken[4] = "Hat".to_string();
        let mut record = AttributeRecord::Raw {
            output: vec![person_lines("Male"), broken],
        };

        match record.fix(12) {
            Err(CollectError::MalformedAttributeLine {
                frame_index,
                person,
                ..
            }) => {
                assert_eq!(frame_index, 12);
                assert_eq!(person, 1);
            }
            other => panic!("expected malformed attribute error, got {:?}", other),
        }
    }

    #[test]
    fn test_keypoint_fix_truncates_and_is_idempotent() {
        let mut record = KeypointRecord::from(&KeypointResult::new(
            vec![vec![[11.6, 22.4, 0.9], [-3.5, 8.0, 1.0]]],
            vec![0.95],
        ));
        record.fix().unwrap();

        assert_eq!(
            record,
            KeypointRecord::Pixel {
                keypoint: (vec![vec![[11, 22, 0], [-3, 8, 1]]], vec![0]),
            }
        );

        let fixed = record.clone();
        record.fix().unwrap();
        assert_eq!(record, fixed);
    }

    // -------------------------------------------------------------------------
    // Normalizer
    // -------------------------------------------------------------------------

    #[test]
    fn test_normalize_builds_document() {
        let metadata = VideoMetadata {
            inftype: Some("video".to_string()),
            width: Some(1920),
            height: Some(1080),
            fps: Some(25.0),
            frame_count: Some(2),
            entrance_line: Some(json!([[0, 500], [1920, 500]])),
            frames: vec![
                FrameAnnotation::default(),
                FrameAnnotation {
                    entrance: Some(json!({ "in": [5], "out": [] })),
                },
            ],
        };
        let snapshots = vec![snapshot(0), snapshot(1)];

        let document = ExportNormalizer::new(&metadata).normalize(&snapshots).unwrap();
        let json = serde_json::to_value(&document).unwrap();

        assert_eq!(json["inftype"], "video");
        assert_eq!(json["width"], 1920);
        assert_eq!(json["frame_count"], 2);
        assert_eq!(json["entrance_line"], json!([[0, 500], [1920, 500]]));

        let frames = json["frames"].as_array().unwrap();
        assert_eq!(frames.len(), 2);
        assert!(frames[0].get("entrance").is_none());
        assert_eq!(frames[1]["entrance"], json!({ "in": [5], "out": [] }));

        let first = &frames[0];
        assert_eq!(first["ids"], json!([5, 7]));
        assert_eq!(first["mot"]["boxes"], json!([[10, 20, 50, 120], [200, 30, 260, 180]]));
        assert_eq!(first["attr"]["people"][1]["gender"], "Female");
        assert_eq!(first["kpt"]["keypoint"], json!([[[[11, 22, 0]], [[201, 31, 0]]], [0, 0]]));
        assert_eq!(first["det"], json!({}));
        assert_eq!(first["reid"], json!({}));
        assert_eq!(first["action"]["1"]["class"], 1);
    }

    #[test]
    fn test_normalize_with_fewer_annotations_than_frames() {
        let metadata = VideoMetadata {
            frames: vec![FrameAnnotation {
                entrance: Some(json!({ "in": [7] })),
            }],
            ..VideoMetadata::default()
        };
        let snapshots = vec![snapshot(0), snapshot(1), snapshot(2)];

        let document = ExportNormalizer::new(&metadata).normalize(&snapshots).unwrap();
        assert_eq!(document.frames.len(), 3);
        assert_eq!(document.frames[0].entrance, Some(json!({ "in": [7] })));
        assert_eq!(document.frames[2].scores, vec![0.93, 0.81]);

        let json = serde_json::to_value(&document).unwrap();
        assert!(json["frames"][1].get("entrance").is_none());
        assert!(json["frames"][2].get("entrance").is_none());
        assert_eq!(json["frames"][2]["ids"], json!([5, 7]));
    }

    #[test]
    fn test_normalize_with_more_annotations_than_frames() {
        let metadata = VideoMetadata {
            frames: vec![
                FrameAnnotation::default(),
                FrameAnnotation {
                    entrance: Some(json!({ "out": [5] })),
                },
            ],
            ..VideoMetadata::default()
        };

        let document = ExportNormalizer::new(&metadata)
            .normalize(&[snapshot(0)])
            .unwrap();
        assert_eq!(document.frames.len(), 1);
        assert_eq!(document.frames[0].entrance, None);
    }

    #[test]
    fn test_normalize_leaves_snapshots_untouched_and_is_repeatable() {
        let metadata = VideoMetadata::default();
        let snapshots = vec![snapshot(0)];
        let before = snapshots.clone();

        let normalizer = ExportNormalizer::new(&metadata);
        let first = normalizer.normalize(&snapshots).unwrap();
        let second = normalizer.normalize(&snapshots).unwrap();

        assert_eq!(snapshots, before);
        assert_eq!(first, second);
    }

    #[test]
    fn test_normalize_without_tracking_has_no_ids() {
        let mut frame = FrameResult::new();
        frame.update(AttributeResult::new(vec![person_lines("Male")]));
        let snapshots = vec![frame.into_snapshot(0)];

        let document = ExportNormalizer::new(&VideoMetadata::default())
            .normalize(&snapshots)
            .unwrap();
        let json = serde_json::to_value(&document).unwrap();

        assert_eq!(json["frames"][0]["ids"], json!([]));
        assert_eq!(json["frames"][0]["mot"], json!({}));
        assert!(json.get("width").is_none());
    }

    #[test]
    fn test_malformed_attributes_abort_export() {
        let mut frame = FrameResult::new();
        frame.update(TrackingResult::new(vec![[1.0, 0.9, 0.0, 0.0, 0.0, 5.0, 5.0]]));
        frame.update(AttributeResult::new(vec![vec!["Male".to_string()]]));
        let snapshots = vec![snapshot(0), frame.into_snapshot(1)];

        let err = ExportNormalizer::new(&VideoMetadata::default())
            .normalize(&snapshots)
            .unwrap_err();
        assert!(matches!(
            err,
            CollectError::MalformedAttributeLine { frame_index: 1, .. }
        ));
    }

    #[test]
    fn test_non_finite_reid_feature_is_unencodable() {
        let mut frame = FrameResult::new();
        frame.update(ReidResult::new(
            vec![[1.0, 0.9, 0.0, 0.0, 5.0, 5.0]],
            vec![vec![f32::INFINITY]],
            vec![0.5],
        ));
        let document = ExportNormalizer::new(&VideoMetadata::default())
            .normalize(&[frame.into_snapshot(0)])
            .unwrap();

        let err = to_json_indented(&document, DEFAULT_JSON_INDENT).unwrap_err();
        assert!(matches!(err, CollectError::UnencodableValue(_)));
    }

    #[test]
    fn test_write_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("video.json");
        let document = ExportNormalizer::new(&VideoMetadata::default())
            .normalize(&[snapshot(4)])
            .unwrap();

        document.write(&path, DEFAULT_JSON_INDENT).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("{\n    \"frames\": ["));
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["frames"][0]["ids"], json!([5, 7]));
    }

    #[test]
    fn test_metadata_load_partial_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("meta.json");
        std::fs::write(&path, r#"{"fps": 30, "frames": [{"entrance": [1]}, {}]}"#).unwrap();

        let metadata = VideoMetadata::load(&path).unwrap();
        assert_eq!(metadata.fps, Some(30.0));
        assert_eq!(metadata.width, None);
        assert_eq!(metadata.frames.len(), 2);
        assert_eq!(metadata.frames[0].entrance, Some(json!([1])));
        assert_eq!(metadata.frames[1].entrance, None);
    }
}
