//! Greedy IoU association between tracks and detections.
//!
//! Pure functions: an IoU matrix goes in, committed pairs and leftovers
//! come out. The tracker applies the result; nothing here mutates track
//! state.

use ndarray::Array2;

/// Outcome of one association round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentResult {
    /// Committed (track index, detection index) pairs.
    pub matches: Vec<(usize, usize)>,
    /// Track indices left without a detection.
    pub unmatched_tracks: Vec<usize>,
    /// Detection indices left without a track.
    pub unmatched_detections: Vec<usize>,
}

/// Greedily assign detections to tracks from an IoU similarity matrix.
///
/// Rows are tracks, columns are detections. Every pair with
/// `IoU >= threshold` becomes a candidate; candidates are sorted by IoU
/// descending and committed in order, skipping any pair whose track or
/// detection was already claimed. Ties keep enumeration order (track-major,
/// then detection), which makes the result deterministic.
///
/// This is a greedy approximation of bipartite matching, not the optimal
/// Hungarian assignment. Cardinalities here are small (tens of objects at
/// most), so the occasional sub-optimal pairing under crossing trajectories
/// is accepted in exchange for the simpler bounded-cost scan.
pub fn greedy_assignment(iou_matrix: &Array2<f32>, threshold: f32) -> AssignmentResult {
    let (num_tracks, num_detections) = iou_matrix.dim();

    if num_tracks == 0 || num_detections == 0 {
        return AssignmentResult {
            matches: vec![],
            unmatched_tracks: (0..num_tracks).collect(),
            unmatched_detections: (0..num_detections).collect(),
        };
    }

    let mut candidates: Vec<(usize, usize, f32)> = Vec::new();
    for t_idx in 0..num_tracks {
        for d_idx in 0..num_detections {
            let iou = iou_matrix[[t_idx, d_idx]];
            if iou >= threshold {
                candidates.push((t_idx, d_idx, iou));
            }
        }
    }

    // Stable sort preserves enumeration order for equal IoU values.
    candidates.sort_by(|a, b| b.2.partial_cmp(&a.2).unwrap_or(std::cmp::Ordering::Equal));

    let mut track_claimed = vec![false; num_tracks];
    let mut detection_claimed = vec![false; num_detections];
    let mut matches = Vec::new();

    for (t_idx, d_idx, _) in candidates {
        if !track_claimed[t_idx] && !detection_claimed[d_idx] {
            track_claimed[t_idx] = true;
            detection_claimed[d_idx] = true;
            matches.push((t_idx, d_idx));
        }
    }

    let unmatched_tracks = track_claimed
        .iter()
        .enumerate()
        .filter_map(|(i, &claimed)| (!claimed).then_some(i))
        .collect();
    let unmatched_detections = detection_claimed
        .iter()
        .enumerate()
        .filter_map(|(i, &claimed)| (!claimed).then_some(i))
        .collect();

    AssignmentResult {
        matches,
        unmatched_tracks,
        unmatched_detections,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_empty_inputs() {
        let empty = Array2::<f32>::zeros((0, 3));
        let result = greedy_assignment(&empty, 0.3);
        assert!(result.matches.is_empty());
        assert!(result.unmatched_tracks.is_empty());
        assert_eq!(result.unmatched_detections, vec![0, 1, 2]);

        let empty = Array2::<f32>::zeros((2, 0));
        let result = greedy_assignment(&empty, 0.3);
        assert_eq!(result.unmatched_tracks, vec![0, 1]);
        assert!(result.unmatched_detections.is_empty());
    }

    #[test]
    fn test_one_to_one_assignment() {
        let ious = array![[0.9, 0.0], [0.0, 0.8]];
        let result = greedy_assignment(&ious, 0.3);
        assert_eq!(result.matches, vec![(0, 0), (1, 1)]);
        assert!(result.unmatched_tracks.is_empty());
        assert!(result.unmatched_detections.is_empty());
    }

    #[test]
    fn test_below_threshold_stays_unmatched() {
        let ious = array![[0.2]];
        let result = greedy_assignment(&ious, 0.3);
        assert!(result.matches.is_empty());
        assert_eq!(result.unmatched_tracks, vec![0]);
        assert_eq!(result.unmatched_detections, vec![0]);
    }

    #[test]
    fn test_greedy_takes_highest_iou_first() {
        // Track 0 overlaps both detections; track 1 only detection 0.
        // Greedy commits (0, 1) at 0.9 first, then (1, 0) at 0.5.
        let ious = array![[0.6, 0.9], [0.5, 0.0]];
        let result = greedy_assignment(&ious, 0.3);
        assert_eq!(result.matches, vec![(0, 1), (1, 0)]);
    }

    #[test]
    fn test_tie_break_is_enumeration_order() {
        // Both tracks overlap both detections identically; the first
        // enumerated pair (0, 0) wins, then (1, 1).
        let ious = array![[0.5, 0.5], [0.5, 0.5]];
        let result = greedy_assignment(&ious, 0.3);
        assert_eq!(result.matches, vec![(0, 0), (1, 1)]);
    }

    #[test]
    fn test_surplus_detections_left_over() {
        let ious = array![[0.8, 0.7, 0.1]];
        let result = greedy_assignment(&ious, 0.3);
        assert_eq!(result.matches, vec![(0, 0)]);
        assert_eq!(result.unmatched_detections, vec![1, 2]);
    }

    #[test]
    fn test_deterministic_across_runs() {
        let ious = array![[0.4, 0.4, 0.6], [0.6, 0.4, 0.4], [0.4, 0.6, 0.4]];
        let first = greedy_assignment(&ious, 0.3);
        for _ in 0..10 {
            assert_eq!(greedy_assignment(&ious, 0.3), first);
        }
    }
}
