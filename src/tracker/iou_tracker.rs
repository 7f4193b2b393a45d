//! Greedy IoU tracker: lifecycle orchestration over a set of tracks.

use ndarray::Array2;
use serde::Serialize;
use tracing::debug;

use crate::detection::{BBox, Detection, iou_batch};
use crate::tracker::matching::{AssignmentResult, greedy_assignment};
use crate::tracker::track::{Track, TrackSnapshot};
use crate::tracker::track_state::TrackState;

/// Configuration for the [`Tracker`].
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Frames a track may go without an update before deletion.
    pub max_age: u32,
    /// Updates required to confirm a tentative track.
    pub min_hits: u32,
    /// Minimum IoU for a (track, detection) pair to be a match candidate.
    pub iou_threshold: f32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_age: 30,
            min_hits: 3,
            iou_threshold: 0.3,
        }
    }
}

/// Hook invoked on track lifecycle transitions.
///
/// All methods default to no-ops; tracker behavior never depends on what an
/// observer does. Useful for wiring metrics or UI notifications without
/// touching the association path.
pub trait TrackObserver {
    /// A new tentative track was created for an unmatched detection.
    fn on_spawn(&mut self, _track: &Track) {}
    /// A tentative track reached `min_hits` and became confirmed.
    fn on_confirm(&mut self, _track: &Track) {}
    /// A track exceeded `max_age` missed frames and was deleted.
    fn on_delete(&mut self, _track: &Track) {}
}

/// Per-state track counts, taken after pruning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TrackStateCounts {
    pub tentative: usize,
    pub confirmed: usize,
    pub deleted: usize,
}

/// Serializable summary of the tracker and its confirmed tracks.
#[derive(Debug, Clone, Serialize)]
pub struct TrackerSnapshot {
    pub frame_count: u64,
    pub total_tracks: usize,
    pub confirmed_tracks: usize,
    pub state_counts: TrackStateCounts,
    pub tracks: Vec<TrackSnapshot>,
}

/// Multi-object tracker with greedy IoU association.
///
/// Owns its track collection exclusively; one [`Tracker::update`] call per
/// frame drives the whole lifecycle. The tracker is synchronous and
/// performs no I/O, so each call completes in O(tracks x detections).
pub struct Tracker {
    config: TrackerConfig,
    tracks: Vec<Track>,
    next_track_id: u64,
    frame_count: u64,
    observer: Option<Box<dyn TrackObserver + Send>>,
}

impl Tracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            tracks: Vec::new(),
            next_track_id: 0,
            frame_count: 0,
            observer: None,
        }
    }

    /// Install a lifecycle observer, replacing any previous one.
    pub fn set_observer(&mut self, observer: Box<dyn TrackObserver + Send>) {
        self.observer = Some(observer);
    }

    /// Number of frames processed so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// The active configuration.
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Ingest one frame of detections and return the confirmed tracks.
    ///
    /// Matched tracks absorb their detection, unmatched tracks accumulate a
    /// miss, unmatched detections spawn tentative tracks, every survivor
    /// ages by one frame, and deleted tracks are pruned before the
    /// confirmed subset is returned.
    pub fn update(&mut self, detections: Vec<Detection>) -> Vec<&Track> {
        self.frame_count += 1;

        let ious = self.iou_matrix(&detections);
        let AssignmentResult {
            matches,
            unmatched_tracks,
            unmatched_detections,
        } = greedy_assignment(&ious, self.config.iou_threshold);

        let mut slots: Vec<Option<Detection>> = detections.into_iter().map(Some).collect();

        for (track_idx, det_idx) in matches {
            let Some(detection) = slots[det_idx].take() else {
                continue;
            };
            let track = &mut self.tracks[track_idx];
            let was_tentative = track.is_tentative();
            track.update(detection);
            if was_tentative && track.is_confirmed() {
                debug!(track_id = track.track_id, hits = track.hits, "track confirmed");
                if let Some(observer) = self.observer.as_mut() {
                    observer.on_confirm(&self.tracks[track_idx]);
                }
            }
        }

        for track_idx in unmatched_tracks {
            let track = &mut self.tracks[track_idx];
            track.mark_missed();
            if track.is_deleted() {
                debug!(
                    track_id = track.track_id,
                    age = track.age,
                    "track deleted after {} missed frames",
                    track.time_since_update
                );
                if let Some(observer) = self.observer.as_mut() {
                    observer.on_delete(&self.tracks[track_idx]);
                }
            }
        }

        for det_idx in unmatched_detections {
            let Some(detection) = slots[det_idx].take() else {
                continue;
            };
            let track = Track::new(
                self.next_track_id,
                detection,
                self.config.max_age,
                self.config.min_hits,
            );
            self.next_track_id += 1;
            debug!(track_id = track.track_id, "track spawned");
            if let Some(observer) = self.observer.as_mut() {
                observer.on_spawn(&track);
            }
            self.tracks.push(track);
        }

        for track in &mut self.tracks {
            track.increment_age();
        }

        self.tracks.retain(|t| !t.is_deleted());

        self.tracks.iter().filter(|t| t.is_confirmed()).collect()
    }

    /// IoU similarity matrix between each track's latest box and each
    /// incoming detection box. Empty dimensions short-circuit association.
    fn iou_matrix(&self, detections: &[Detection]) -> Array2<f32> {
        let track_boxes: Vec<BBox> = self.tracks.iter().map(|t| t.current_bbox()).collect();
        let det_boxes: Vec<BBox> = detections.iter().map(|d| d.bbox).collect();
        iou_batch(&track_boxes, &det_boxes)
    }

    /// All live tracks, tentative and confirmed.
    pub fn all_tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Only the confirmed tracks.
    pub fn confirmed_tracks(&self) -> Vec<&Track> {
        self.tracks.iter().filter(|t| t.is_confirmed()).collect()
    }

    /// Look up a live track by its identifier.
    pub fn track_by_id(&self, track_id: u64) -> Option<&Track> {
        self.tracks.iter().find(|t| t.track_id == track_id)
    }

    /// Count live tracks per lifecycle state.
    pub fn state_counts(&self) -> TrackStateCounts {
        let mut counts = TrackStateCounts::default();
        for track in &self.tracks {
            match track.state {
                TrackState::Tentative => counts.tentative += 1,
                TrackState::Confirmed => counts.confirmed += 1,
                TrackState::Deleted => counts.deleted += 1,
            }
        }
        counts
    }

    /// Drop all tracks and counters. Track ids restart from zero, so a
    /// reset tracker is a new identity namespace.
    pub fn reset(&mut self) {
        self.tracks.clear();
        self.next_track_id = 0;
        self.frame_count = 0;
    }

    /// Serializable summary with snapshots of the confirmed tracks.
    pub fn snapshot(&self) -> TrackerSnapshot {
        let confirmed = self.confirmed_tracks();
        TrackerSnapshot {
            frame_count: self.frame_count,
            total_tracks: self.tracks.len(),
            confirmed_tracks: confirmed.len(),
            state_counts: self.state_counts(),
            tracks: confirmed.iter().map(|t| t.snapshot()).collect(),
        }
    }
}
