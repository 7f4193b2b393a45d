mod iou_tracker;
mod matching;
mod person;
mod track;
mod track_state;

pub use iou_tracker::{
    TrackObserver, TrackStateCounts, Tracker, TrackerConfig, TrackerSnapshot,
};
pub use matching::{AssignmentResult, greedy_assignment};
pub use person::{PersonTracker, SPEAKING_ATTRIBUTE};
pub use track::{POSITION_HISTORY, Track, TrackSnapshot, VELOCITY_HISTORY};
pub use track_state::TrackState;
