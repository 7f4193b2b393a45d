//! Single tracked identity with bounded motion history.

use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};

use nalgebra::{Point2, Vector2};
use serde::Serialize;

use crate::detection::{BBox, Detection};
use crate::tracker::track_state::TrackState;

/// Capacity of the recent-detection and recent-position FIFOs.
pub const POSITION_HISTORY: usize = 30;
/// Capacity of the recent-velocity FIFO.
pub const VELOCITY_HISTORY: usize = 10;

fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}

/// A persistent identity hypothesis linking detections across frames.
///
/// Mutated only through [`Track::update`] (on a match) and
/// [`Track::mark_missed`] (on no match), once per frame each, plus the
/// unconditional [`Track::increment_age`]. All history buffers are bounded,
/// so a long-lived track uses constant memory.
#[derive(Debug, Clone)]
pub struct Track {
    /// Unique track identifier, never reused by the owning tracker.
    pub track_id: u64,
    /// Current lifecycle state.
    pub state: TrackState,
    /// Number of successful detection associations.
    pub hits: u32,
    /// Frames elapsed since creation.
    pub age: u32,
    /// Frames elapsed since the last successful association.
    pub time_since_update: u32,
    /// Unix timestamp at creation.
    pub created_at: f64,
    /// Unix timestamp of the last successful association.
    pub last_updated_at: f64,

    detections: VecDeque<Detection>,
    positions: VecDeque<Point2<i32>>,
    velocities: VecDeque<Vector2<f32>>,

    max_age: u32,
    min_hits: u32,
}

impl Track {
    /// Create a tentative track seeded with its first detection.
    pub fn new(track_id: u64, initial_detection: Detection, max_age: u32, min_hits: u32) -> Self {
        let now = unix_now();
        let (cx, cy) = initial_detection.bbox.center();

        let mut detections = VecDeque::with_capacity(POSITION_HISTORY);
        let mut positions = VecDeque::with_capacity(POSITION_HISTORY);
        detections.push_back(initial_detection);
        positions.push_back(Point2::new(cx, cy));

        Self {
            track_id,
            state: TrackState::Tentative,
            hits: 0,
            age: 0,
            time_since_update: 0,
            created_at: now,
            last_updated_at: now,
            detections,
            positions,
            velocities: VecDeque::with_capacity(VELOCITY_HISTORY),
            max_age,
            min_hits,
        }
    }

    /// Absorb a matched detection.
    ///
    /// Records the new center, derives a velocity sample from the previous
    /// center, resets the miss counter, and confirms the track once `hits`
    /// reaches `min_hits`.
    pub fn update(&mut self, detection: Detection) {
        let (cx, cy) = detection.bbox.center();
        let new_position = Point2::new(cx, cy);

        if let Some(prev) = self.positions.back() {
            let velocity = Vector2::new(
                (new_position.x - prev.x) as f32,
                (new_position.y - prev.y) as f32,
            );
            if self.velocities.len() == VELOCITY_HISTORY {
                self.velocities.pop_front();
            }
            self.velocities.push_back(velocity);
        }

        if self.positions.len() == POSITION_HISTORY {
            self.positions.pop_front();
        }
        self.positions.push_back(new_position);

        if self.detections.len() == POSITION_HISTORY {
            self.detections.pop_front();
        }
        self.detections.push_back(detection);

        self.hits += 1;
        self.time_since_update = 0;
        self.last_updated_at = unix_now();

        if self.state == TrackState::Tentative && self.hits >= self.min_hits {
            self.state = TrackState::Confirmed;
        }
    }

    /// Record a frame with no matching detection.
    ///
    /// Deletes the track once it has gone more than `max_age` consecutive
    /// frames without an update.
    pub fn mark_missed(&mut self) {
        self.time_since_update += 1;
        if self.time_since_update > self.max_age {
            self.state = TrackState::Deleted;
        }
    }

    /// Advance the age counter. Called once per frame for every surviving
    /// track, match or miss.
    pub fn increment_age(&mut self) {
        self.age += 1;
    }

    /// Predict the next center position from the mean stored velocity.
    ///
    /// Falls back to the last known position when no velocity samples
    /// exist, and to the origin when the track has no positions at all.
    pub fn predict_position(&self) -> Point2<i32> {
        let Some(current) = self.positions.back() else {
            return Point2::new(0, 0);
        };

        if self.velocities.is_empty() {
            return *current;
        }

        let mean = self.average_velocity();
        Point2::new(
            (current.x as f32 + mean.x).floor() as i32,
            (current.y as f32 + mean.y).floor() as i32,
        )
    }

    /// Mean of the stored velocity samples; zero when there are none.
    pub fn average_velocity(&self) -> Vector2<f32> {
        if self.velocities.is_empty() {
            return Vector2::zeros();
        }
        let sum = self
            .velocities
            .iter()
            .fold(Vector2::zeros(), |acc, v| acc + v);
        sum / self.velocities.len() as f32
    }

    /// Magnitude of the mean velocity, in pixels per frame.
    pub fn speed(&self) -> f32 {
        self.average_velocity().norm()
    }

    /// Seconds since the track was created.
    pub fn duration(&self) -> f64 {
        unix_now() - self.created_at
    }

    /// The most recently associated detection.
    pub fn latest_detection(&self) -> Option<&Detection> {
        self.detections.back()
    }

    /// Bounding box of the most recent detection. A track always holds at
    /// least its seed detection, so this only defaults for an empty box on
    /// a malformed clone.
    pub fn current_bbox(&self) -> BBox {
        self.latest_detection().map(|d| d.bbox).unwrap_or_default()
    }

    /// The recent center positions, oldest first.
    pub fn trajectory(&self) -> Vec<Point2<i32>> {
        self.positions.iter().copied().collect()
    }

    /// Number of retained trajectory points.
    pub fn trajectory_length(&self) -> usize {
        self.positions.len()
    }

    pub fn is_tentative(&self) -> bool {
        self.state == TrackState::Tentative
    }

    pub fn is_confirmed(&self) -> bool {
        self.state == TrackState::Confirmed
    }

    pub fn is_deleted(&self) -> bool {
        self.state == TrackState::Deleted
    }

    /// Flat serializable view of the track for downstream consumers.
    pub fn snapshot(&self) -> TrackSnapshot {
        let predicted = self.predict_position();
        TrackSnapshot {
            track_id: self.track_id,
            state: self.state,
            hits: self.hits,
            age: self.age,
            time_since_update: self.time_since_update,
            duration: self.duration(),
            speed: self.speed(),
            trajectory_length: self.trajectory_length(),
            latest_detection: self.latest_detection().cloned(),
            predicted_position: (predicted.x, predicted.y),
        }
    }
}

/// Flat record exposing one track to presentation and motion-control
/// collaborators.
#[derive(Debug, Clone, Serialize)]
pub struct TrackSnapshot {
    pub track_id: u64,
    pub state: TrackState,
    pub hits: u32,
    pub age: u32,
    pub time_since_update: u32,
    pub duration: f64,
    pub speed: f32,
    pub trajectory_length: usize,
    pub latest_detection: Option<Detection>,
    pub predicted_position: (i32, i32),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn det(x1: i32, y1: i32, x2: i32, y2: i32) -> Detection {
        Detection::person(0, BBox::new(x1, y1, x2, y2), 0.9, 0.0)
    }

    #[test]
    fn test_starts_tentative_with_seed_position() {
        let track = Track::new(7, det(0, 0, 10, 10), 30, 3);
        assert_eq!(track.track_id, 7);
        assert!(track.is_tentative());
        assert_eq!(track.hits, 0);
        assert_eq!(track.trajectory_length(), 1);
        assert_eq!(track.trajectory()[0], Point2::new(5, 5));
    }

    #[test]
    fn test_confirms_exactly_at_min_hits() {
        let mut track = Track::new(0, det(0, 0, 10, 10), 30, 3);

        track.update(det(1, 0, 11, 10));
        track.update(det(2, 0, 12, 10));
        assert!(track.is_tentative());

        track.update(det(3, 0, 13, 10));
        assert!(track.is_confirmed());
        assert_eq!(track.hits, 3);
    }

    #[test]
    fn test_deleted_after_max_age_exceeded() {
        let mut track = Track::new(0, det(0, 0, 10, 10), 2, 1);
        track.update(det(0, 0, 10, 10));
        assert!(track.is_confirmed());

        track.mark_missed();
        track.mark_missed();
        assert!(!track.is_deleted());
        assert_eq!(track.time_since_update, 2);

        // Third consecutive miss pushes past max_age = 2.
        track.mark_missed();
        assert!(track.is_deleted());
    }

    #[test]
    fn test_update_resets_miss_counter() {
        let mut track = Track::new(0, det(0, 0, 10, 10), 30, 3);
        track.mark_missed();
        track.mark_missed();
        assert_eq!(track.time_since_update, 2);

        track.update(det(0, 0, 10, 10));
        assert_eq!(track.time_since_update, 0);
    }

    #[test]
    fn test_velocity_and_prediction() {
        let mut track = Track::new(0, det(0, 0, 10, 10), 30, 3);
        // Seed center (5, 5); no velocity yet.
        assert_eq!(track.predict_position(), Point2::new(5, 5));

        // Moves +10 in x each frame.
        track.update(det(10, 0, 20, 10));
        track.update(det(20, 0, 30, 10));
        assert_eq!(track.average_velocity(), Vector2::new(10.0, 0.0));
        assert_eq!(track.predict_position(), Point2::new(35, 5));
        assert!((track.speed() - 10.0).abs() < 1e-5);
    }

    #[test]
    fn test_histories_stay_bounded() {
        let mut track = Track::new(0, det(0, 0, 10, 10), 1000, 3);
        for i in 0..100 {
            track.update(det(i, 0, i + 10, 10));
        }
        assert_eq!(track.trajectory_length(), POSITION_HISTORY);
        assert_eq!(track.hits, 100);
        // Oldest positions were evicted, newest retained.
        let traj = track.trajectory();
        assert_eq!(traj[traj.len() - 1], Point2::new(104, 5));
    }

    #[test]
    fn test_snapshot_fields() {
        let mut track = Track::new(4, det(0, 0, 10, 10), 30, 1);
        track.update(det(2, 0, 12, 10));
        track.increment_age();

        let snap = track.snapshot();
        assert_eq!(snap.track_id, 4);
        assert_eq!(snap.state, TrackState::Confirmed);
        assert_eq!(snap.hits, 1);
        assert_eq!(snap.age, 1);
        assert_eq!(snap.trajectory_length, 2);
        assert!(snap.latest_detection.is_some());
    }
}
