//! Per-frame detection results: confidence filtering and greedy NMS.

use serde::{Deserialize, Serialize};

use crate::detection::object::{Detection, DetectionKind};

/// Ordered collection of detections for a single processed frame.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrameResult {
    /// Frame sequence number assigned by the caller.
    pub frame_id: u64,
    /// Frame capture timestamp in seconds.
    pub timestamp: f64,
    /// Detections in producer order.
    pub detections: Vec<Detection>,
    /// Source frame dimensions (width, height), when known.
    pub frame_size: Option<(u32, u32)>,
}

impl FrameResult {
    /// Create an empty result for one frame.
    pub fn new(frame_id: u64, timestamp: f64) -> Self {
        Self {
            frame_id,
            timestamp,
            detections: Vec::new(),
            frame_size: None,
        }
    }

    /// Append a detection during construction.
    pub fn push(&mut self, detection: Detection) {
        self.detections.push(detection);
    }

    /// Only the person detections, in frame order.
    pub fn persons(&self) -> Vec<&Detection> {
        self.of_kind(DetectionKind::Person)
    }

    /// Only the face detections, in frame order.
    pub fn faces(&self) -> Vec<&Detection> {
        self.of_kind(DetectionKind::Face)
    }

    fn of_kind(&self, kind: DetectionKind) -> Vec<&Detection> {
        self.detections.iter().filter(|d| d.kind() == kind).collect()
    }

    /// Number of person detections in this frame.
    pub fn person_count(&self) -> usize {
        self.persons().len()
    }

    /// Number of face detections in this frame.
    pub fn face_count(&self) -> usize {
        self.faces().len()
    }

    /// Detections with `confidence >= min_confidence`, in frame order.
    ///
    /// Pure filter; the stored detections are untouched.
    pub fn filter_by_confidence(&self, min_confidence: f32) -> Vec<Detection> {
        self.detections
            .iter()
            .filter(|d| d.confidence >= min_confidence)
            .cloned()
            .collect()
    }

    /// Greedy non-maximum suppression.
    ///
    /// Detections are sorted by confidence descending (stable, so ties keep
    /// frame order), then the highest-confidence survivor is repeatedly kept
    /// and every remaining detection overlapping it with
    /// `IoU >= iou_threshold` is discarded. Output is in selection order,
    /// i.e. confidence descending. Suppressed detections are dropped, not
    /// merged.
    pub fn non_max_suppression(&self, iou_threshold: f32) -> Vec<Detection> {
        if self.detections.is_empty() {
            return Vec::new();
        }

        let mut remaining: Vec<Detection> = self.detections.clone();
        remaining.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut keep = Vec::new();
        while !remaining.is_empty() {
            let current = remaining.remove(0);
            remaining.retain(|d| current.bbox.iou(&d.bbox) < iou_threshold);
            keep.push(current);
        }

        keep
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::bbox::BBox;

    fn frame_with(detections: Vec<Detection>) -> FrameResult {
        let mut frame = FrameResult::new(0, 0.0);
        for d in detections {
            frame.push(d);
        }
        frame
    }

    #[test]
    fn test_typed_accessors() {
        let frame = frame_with(vec![
            Detection::person(0, BBox::new(0, 0, 50, 100), 0.9, 0.0),
            Detection::face(1, BBox::new(10, 10, 30, 30), 0.8, 0.0),
            Detection::person(2, BBox::new(100, 0, 150, 100), 0.7, 0.0),
        ]);

        assert_eq!(frame.person_count(), 2);
        assert_eq!(frame.face_count(), 1);
        assert_eq!(frame.persons()[1].id, 2);
    }

    #[test]
    fn test_filter_by_confidence_is_pure() {
        let frame = frame_with(vec![
            Detection::person(0, BBox::new(0, 0, 10, 10), 0.9, 0.0),
            Detection::person(1, BBox::new(20, 0, 30, 10), 0.4, 0.0),
            Detection::person(2, BBox::new(40, 0, 50, 10), 0.5, 0.0),
        ]);

        let kept = frame.filter_by_confidence(0.5);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].id, 0);
        assert_eq!(kept[1].id, 2);
        assert_eq!(frame.detections.len(), 3);
    }

    #[test]
    fn test_nms_suppresses_heavy_overlap() {
        // IoU of these two boxes is 9/11 (~0.818).
        let a = Detection::person(0, BBox::new(0, 0, 10, 10), 0.9, 0.0);
        let b = Detection::person(1, BBox::new(1, 0, 11, 10), 0.8, 0.0);

        let frame = frame_with(vec![a, b]);
        let kept = frame.non_max_suppression(0.5);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, 0);
    }

    #[test]
    fn test_nms_keeps_disjoint_and_orders_by_confidence() {
        let frame = frame_with(vec![
            Detection::person(0, BBox::new(0, 0, 10, 10), 0.6, 0.0),
            Detection::person(1, BBox::new(100, 100, 110, 110), 0.9, 0.0),
            Detection::person(2, BBox::new(200, 200, 210, 210), 0.7, 0.0),
        ]);

        let kept = frame.non_max_suppression(0.5);
        let ids: Vec<u64> = kept.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![1, 2, 0]);
    }

    #[test]
    fn test_nms_idempotent() {
        let frame = frame_with(vec![
            Detection::person(0, BBox::new(0, 0, 10, 10), 0.9, 0.0),
            Detection::person(1, BBox::new(2, 0, 12, 10), 0.8, 0.0),
            Detection::person(2, BBox::new(50, 50, 60, 60), 0.7, 0.0),
        ]);

        let once = frame.non_max_suppression(0.5);
        let twice = frame_with(once.clone()).non_max_suppression(0.5);
        assert_eq!(once, twice);

        // Every surviving pair overlaps below the threshold.
        for (i, a) in once.iter().enumerate() {
            for b in once.iter().skip(i + 1) {
                assert!(a.bbox.iou(&b.bbox) < 0.5);
            }
        }
    }

    #[test]
    fn test_nms_stable_on_confidence_ties() {
        let frame = frame_with(vec![
            Detection::person(0, BBox::new(0, 0, 10, 10), 0.8, 0.0),
            Detection::person(1, BBox::new(0, 0, 10, 10), 0.8, 0.0),
        ]);

        let kept = frame.non_max_suppression(0.5);
        assert_eq!(kept.len(), 1);
        // Stable sort keeps the first-listed detection on a tie.
        assert_eq!(kept[0].id, 0);
    }

    #[test]
    fn test_nms_empty_frame() {
        let frame = FrameResult::new(0, 0.0);
        assert!(frame.non_max_suppression(0.5).is_empty());
    }
}
