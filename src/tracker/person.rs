//! Person-specific tracking with a per-track attribute side table.

use std::collections::HashMap;

use serde_json::Value;

use crate::detection::Detection;
use crate::tracker::iou_tracker::{Tracker, TrackerConfig};
use crate::tracker::track::Track;

/// Attribute key used by [`PersonTracker::speaker`].
pub const SPEAKING_ATTRIBUTE: &str = "is_speaking";

/// Tracker specialization for people.
///
/// Wraps the plain [`Tracker`] without changing association, and keeps
/// named attributes (speaking flag, assigned name, ...) per track id.
/// Attribute entries for tracks that no longer exist are dropped on each
/// update, so the side table stays bounded by the live track count.
pub struct PersonTracker {
    tracker: Tracker,
    attributes: HashMap<u64, HashMap<String, Value>>,
}

impl PersonTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            tracker: Tracker::new(config),
            attributes: HashMap::new(),
        }
    }

    /// Ingest one frame of person detections; see [`Tracker::update`].
    ///
    /// Also drops attribute entries for tracks pruned during this frame.
    pub fn update(&mut self, detections: Vec<Detection>) -> Vec<&Track> {
        self.tracker.update(detections);
        let live: Vec<u64> = self.tracker.all_tracks().iter().map(|t| t.track_id).collect();
        self.attributes.retain(|id, _| live.contains(id));
        self.tracker.confirmed_tracks()
    }

    /// Set a named attribute on a tracked person.
    pub fn set_attribute(&mut self, track_id: u64, name: impl Into<String>, value: Value) {
        self.attributes
            .entry(track_id)
            .or_default()
            .insert(name.into(), value);
    }

    /// Read back a named attribute, if present.
    pub fn attribute(&self, track_id: u64, name: &str) -> Option<&Value> {
        self.attributes.get(&track_id)?.get(name)
    }

    /// Find the track currently flagged as speaking.
    ///
    /// Linear scan over the side table; at most one speaker is expected,
    /// and the first flagged id wins if several are set.
    pub fn speaker(&self) -> Option<u64> {
        self.attributes.iter().find_map(|(track_id, attrs)| {
            match attrs.get(SPEAKING_ATTRIBUTE) {
                Some(Value::Bool(true)) => Some(*track_id),
                _ => None,
            }
        })
    }

    /// The wrapped tracker.
    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    /// Mutable access to the wrapped tracker.
    pub fn tracker_mut(&mut self) -> &mut Tracker {
        &mut self.tracker
    }
}
