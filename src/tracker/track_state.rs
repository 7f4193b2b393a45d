use serde::{Deserialize, Serialize};

/// Track state enumeration for the tracking lifecycle.
///
/// Transitions go Tentative -> Confirmed -> Deleted only; a deleted track
/// never comes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackState {
    /// Newly created track, not yet confirmed
    #[default]
    Tentative,
    /// Stable identity with enough accumulated hits
    Confirmed,
    /// Retired after too many missed frames
    Deleted,
}
