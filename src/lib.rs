//! Multi-object tracking over per-frame person/face detections.
//!
//! The crate deduplicates overlapping detections within a frame (greedy
//! NMS) and maintains stable identities across frames despite missed
//! detections and noisy boxes, using greedy IoU association over an
//! explicit Tentative / Confirmed / Deleted track lifecycle.
//!
//! # Example
//!
//! ```
//! use scenetrack_rs::{BBox, Detection, Tracker, TrackerConfig};
//!
//! let mut tracker = Tracker::new(TrackerConfig {
//!     min_hits: 1,
//!     ..TrackerConfig::default()
//! });
//!
//! let detections = vec![Detection::person(0, BBox::new(100, 100, 200, 300), 0.9, 0.0)];
//! tracker.update(detections.clone()); // spawns a tentative track
//! let confirmed = tracker.update(detections);
//! assert_eq!(confirmed.len(), 1);
//! ```

pub mod detection;
pub mod integration;
pub mod tracker;

pub use detection::{BBox, Detection, DetectionKind, DetectionPayload, FrameResult, GeometryError};
pub use integration::{DetectionBuilder, DetectionSource, PipelineConfig, TrackerPipeline};
pub use tracker::{
    PersonTracker, Track, TrackObserver, TrackSnapshot, TrackState, Tracker, TrackerConfig,
};
