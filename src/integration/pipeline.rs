//! TrackerPipeline for combining detection with tracking.

use crate::detection::{Detection, FrameResult};
use crate::tracker::{TrackSnapshot, Tracker, TrackerConfig};

use super::DetectionSource;

/// Frame-level preprocessing applied between detection and tracking.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Drop detections below this confidence before association.
    pub min_confidence: Option<f32>,
    /// Run greedy NMS at this IoU threshold before association.
    pub nms_iou_threshold: Option<f32>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_confidence: Some(0.5),
            nms_iou_threshold: Some(0.5),
        }
    }
}

/// End-to-end per-frame loop: inference, duplicate suppression, tracking.
///
/// Bundles any [`DetectionSource`] with the [`Tracker`] so a caller only
/// has to feed frames. The pipeline owns the frame counter and assembles
/// a [`FrameResult`] per call.
pub struct TrackerPipeline<D: DetectionSource> {
    detector: D,
    tracker: Tracker,
    config: PipelineConfig,
    frame_id: u64,
}

impl<D: DetectionSource> TrackerPipeline<D> {
    /// Create a new tracking pipeline with the given configurations.
    pub fn new(detector: D, tracker_config: TrackerConfig, config: PipelineConfig) -> Self {
        Self {
            detector,
            tracker: Tracker::new(tracker_config),
            config,
            frame_id: 0,
        }
    }

    /// Create a new tracking pipeline with default configuration.
    pub fn with_default_config(detector: D) -> Self {
        Self::new(detector, TrackerConfig::default(), PipelineConfig::default())
    }

    /// Process a single frame and return snapshots of the confirmed tracks.
    ///
    /// Runs detection on the input image, applies the configured confidence
    /// filter and NMS, then advances the tracker by one frame.
    ///
    /// # Arguments
    /// * `input` - Raw image bytes
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    pub fn process_frame(
        &mut self,
        input: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Vec<TrackSnapshot>, D::Error> {
        let detections = self.detector.detect(input, width, height)?;

        self.frame_id += 1;
        let timestamp = detections.first().map(|d| d.timestamp).unwrap_or_default();
        let mut frame = FrameResult::new(self.frame_id, timestamp);
        frame.frame_size = Some((width, height));
        for detection in detections {
            frame.push(detection);
        }

        let prepared = self.prepare(&frame);
        let confirmed: Vec<TrackSnapshot> = self
            .tracker
            .update(prepared)
            .into_iter()
            .map(|t| t.snapshot())
            .collect();
        Ok(confirmed)
    }

    fn prepare(&self, frame: &FrameResult) -> Vec<Detection> {
        let filtered = match self.config.min_confidence {
            Some(min) => frame.filter_by_confidence(min),
            None => frame.detections.clone(),
        };

        match self.config.nms_iou_threshold {
            Some(threshold) => {
                let mut staged = FrameResult::new(frame.frame_id, frame.timestamp);
                staged.detections = filtered;
                staged.non_max_suppression(threshold)
            }
            None => filtered,
        }
    }

    /// Get a reference to the underlying detector.
    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Get a mutable reference to the underlying detector.
    pub fn detector_mut(&mut self) -> &mut D {
        &mut self.detector
    }

    /// Get a reference to the underlying tracker.
    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    /// Get a mutable reference to the underlying tracker.
    pub fn tracker_mut(&mut self) -> &mut Tracker {
        &mut self.tracker
    }
}
