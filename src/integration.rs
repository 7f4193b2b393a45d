//! Integration module for connecting detection backends with the tracker.
//!
//! Inference, capture, and transport are external collaborators; this module
//! holds the traits and glue they plug into.

mod builder;
mod detector;
mod pipeline;

pub use builder::DetectionBuilder;
pub use detector::{DetectionSource, IntoDetections};
pub use pipeline::{PipelineConfig, TrackerPipeline};
