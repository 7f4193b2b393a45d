//! Detection data model.
//!
//! A [`Detection`] is a common header (id, box, confidence, class name,
//! timestamp) plus a kind-specific payload. Person and face detections
//! carry extra fields; objects and gestures only the header.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::detection::bbox::BBox;

/// Detection category discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionKind {
    Person,
    Face,
    Object,
    Gesture,
}

/// Kind-specific detection payload.
///
/// Payloads are additive over the shared [`Detection`] header; matching on
/// this enum is the only way to reach the variant fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DetectionPayload {
    Person {
        /// Whether this person is currently flagged as speaking.
        is_speaking: bool,
        /// Body pose keypoints, when a pose model contributed them.
        pose_landmarks: Option<Vec<(f32, f32)>>,
        /// Coarse activity label (standing, sitting, walking, ...).
        activity: Option<String>,
    },
    Face {
        /// Feature embedding used for face recognition.
        encoding: Option<Vec<f32>>,
        /// Name assigned by the recognition collaborator, if any.
        recognized_name: Option<String>,
        /// Confidence of the recognition match.
        recognition_confidence: f32,
        /// Facial landmark points.
        landmarks: Option<Vec<(f32, f32)>>,
        /// Estimated emotion label.
        emotion: Option<String>,
        /// Estimated age in years.
        age_estimate: Option<u32>,
        /// Estimated gender label.
        gender_estimate: Option<String>,
    },
    Object,
    Gesture,
}

impl DetectionPayload {
    /// Person payload with no optional attributes set.
    pub fn person() -> Self {
        Self::Person {
            is_speaking: false,
            pose_landmarks: None,
            activity: None,
        }
    }

    /// Face payload with no recognition result attached.
    pub fn face() -> Self {
        Self::Face {
            encoding: None,
            recognized_name: None,
            recognition_confidence: 0.0,
            landmarks: None,
            emotion: None,
            age_estimate: None,
            gender_estimate: None,
        }
    }

    /// The discriminant for this payload.
    pub fn kind(&self) -> DetectionKind {
        match self {
            Self::Person { .. } => DetectionKind::Person,
            Self::Face { .. } => DetectionKind::Face,
            Self::Object => DetectionKind::Object,
            Self::Gesture => DetectionKind::Gesture,
        }
    }
}

/// A single detection produced by an inference collaborator for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Per-frame detection identifier assigned by the producer.
    pub id: u64,
    /// Bounding box in pixel coordinates.
    pub bbox: BBox,
    /// Detection confidence. Nominally in [0, 1]; not clamped, the
    /// producer's value passes through as-is.
    pub confidence: f32,
    /// Model class label.
    pub class_name: String,
    /// Capture timestamp in seconds.
    pub timestamp: f64,
    /// Feature vector used for appearance matching, when available.
    pub features: Option<Vec<f32>>,
    /// Free-form label (e.g. a recognized person's name).
    pub label: Option<String>,
    /// Additional producer-specific metadata.
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
    /// Kind-specific payload.
    pub payload: DetectionPayload,
}

impl Detection {
    /// Create a detection with the given header fields and payload.
    pub fn new(
        id: u64,
        bbox: BBox,
        confidence: f32,
        class_name: impl Into<String>,
        timestamp: f64,
        payload: DetectionPayload,
    ) -> Self {
        Self {
            id,
            bbox,
            confidence,
            class_name: class_name.into(),
            timestamp,
            features: None,
            label: None,
            metadata: HashMap::new(),
            payload,
        }
    }

    /// Shorthand for a person detection.
    pub fn person(id: u64, bbox: BBox, confidence: f32, timestamp: f64) -> Self {
        Self::new(id, bbox, confidence, "person", timestamp, DetectionPayload::person())
    }

    /// Shorthand for a face detection.
    pub fn face(id: u64, bbox: BBox, confidence: f32, timestamp: f64) -> Self {
        Self::new(id, bbox, confidence, "face", timestamp, DetectionPayload::face())
    }

    /// The detection category.
    #[inline]
    pub fn kind(&self) -> DetectionKind {
        self.payload.kind()
    }

    /// Whether a face detection has been recognized. Always false for
    /// non-face detections.
    pub fn is_recognized(&self) -> bool {
        matches!(
            &self.payload,
            DetectionPayload::Face {
                recognized_name: Some(_),
                ..
            }
        )
    }

    /// Estimate the distance from the camera in meters using the pinhole
    /// model: `distance = real_height * focal_length / pixel_height`.
    ///
    /// Returns 0.0 for a zero-height box.
    pub fn estimate_distance(&self, focal_length: f32, real_height: f32) -> f32 {
        let pixel_height = self.bbox.height();
        if pixel_height == 0 {
            return 0.0;
        }
        real_height * focal_length / pixel_height as f32
    }
}
