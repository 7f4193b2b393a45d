//! Builder for creating Detection objects from various input formats.

use crate::detection::{BBox, Detection, DetectionPayload};

/// Builder for assembling a [`Detection`] from raw model output.
///
/// Model postprocessing code usually has coordinates in one of several box
/// conventions plus a score; this maps any of them onto the detection
/// header. The payload defaults to `Object`.
#[derive(Debug, Clone)]
pub struct DetectionBuilder {
    id: u64,
    bbox: BBox,
    confidence: f32,
    class_name: String,
    timestamp: f64,
    label: Option<String>,
    payload: DetectionPayload,
}

impl Default for DetectionBuilder {
    fn default() -> Self {
        Self {
            id: 0,
            bbox: BBox::default(),
            confidence: 0.0,
            class_name: String::new(),
            timestamp: 0.0,
            label: None,
            payload: DetectionPayload::Object,
        }
    }
}

impl DetectionBuilder {
    /// Create a new detection builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-frame detection id.
    pub fn id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }

    /// Set bounding box from corner coordinates (x1, y1, x2, y2).
    pub fn corners(mut self, x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        self.bbox = BBox::new(x1, y1, x2, y2);
        self
    }

    /// Set bounding box from the top-left corner and dimensions.
    pub fn xywh(mut self, x: i32, y: i32, width: i32, height: i32) -> Self {
        self.bbox = BBox::from_xywh(x, y, width, height);
        self
    }

    /// Set bounding box from its center point and dimensions.
    pub fn centered(mut self, cx: i32, cy: i32, width: i32, height: i32) -> Self {
        self.bbox = BBox::from_center(cx, cy, width, height);
        self
    }

    /// Set the confidence score.
    pub fn confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence;
        self
    }

    /// Set the model class label.
    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }

    /// Set the capture timestamp in seconds.
    pub fn timestamp(mut self, timestamp: f64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Set a free-form label.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Mark this detection as a person.
    pub fn person(mut self) -> Self {
        self.payload = DetectionPayload::person();
        self
    }

    /// Mark this detection as a face.
    pub fn face(mut self) -> Self {
        self.payload = DetectionPayload::face();
        self
    }

    /// Attach an explicit payload.
    pub fn payload(mut self, payload: DetectionPayload) -> Self {
        self.payload = payload;
        self
    }

    /// Build the final `Detection`.
    pub fn build(self) -> Detection {
        let mut detection = Detection::new(
            self.id,
            self.bbox,
            self.confidence,
            self.class_name,
            self.timestamp,
            self.payload,
        );
        detection.label = self.label;
        detection
    }
}
