//! Greedy IoU track assignment across frames.
//!
//! Used only to count distinct subjects passing through the scene. Tracks are
//! never retired, so a subject that leaves and re-enters with little overlap
//! opens a new track.

use crate::geometry::Rect;

/// A box continues a track only when its IoU with the track's last box exceeds this.
pub const TRACK_IOU_THRESHOLD: f64 = 0.3;

#[derive(Clone, Debug)]
pub struct SubjectTracker {
    iou_threshold: f64,
    /// Last box of each track; track id is `index + 1`.
    last_boxes: Vec<Rect>,
}

impl SubjectTracker {
    pub fn new() -> Self {
        Self::with_threshold(TRACK_IOU_THRESHOLD)
    }

    pub fn with_threshold(iou_threshold: f64) -> Self {
        Self {
            iou_threshold,
            last_boxes: Vec::new(),
        }
    }

    /// Assign each box of one frame to a track. Returns 1-based track ids in box order.
    pub fn observe(&mut self, boxes: &[Rect]) -> Vec<usize> {
        let mut used = vec![false; self.last_boxes.len()];
        let mut ids = Vec::with_capacity(boxes.len());
        for b in boxes {
            let mut best: Option<(usize, f64)> = None;
            for (idx, last) in self.last_boxes.iter().enumerate() {
                if used[idx] {
                    continue;
                }
                let iou = b.iou(last);
                let floor = best.map_or(self.iou_threshold, |(_, v)| v);
                if iou > floor {
                    best = Some((idx, iou));
                }
            }
            match best {
                Some((idx, _)) => {
                    self.last_boxes[idx] = *b;
                    used[idx] = true;
                    ids.push(idx + 1);
                }
                None => {
                    self.last_boxes.push(*b);
                    used.push(false);
                    ids.push(self.last_boxes.len());
                }
            }
        }
        ids
    }

    pub fn track_count(&self) -> usize {
        self.last_boxes.len()
    }
}

impl Default for SubjectTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slowly_moving_subject_keeps_its_track() {
        let mut tracker = SubjectTracker::new();
        for step in 0..10 {
            let x = 0.1 + step as f64 * 0.01;
            let ids = tracker.observe(&[Rect::new(x, 0.2, x + 0.2, 0.6)]);
            assert_eq!(ids, vec![1]);
        }
        assert_eq!(tracker.track_count(), 1);
    }

    #[test]
    fn two_subjects_in_one_frame_get_distinct_tracks() {
        let mut tracker = SubjectTracker::new();
        let a = Rect::new(0.1, 0.1, 0.3, 0.5);
        let b = Rect::new(0.6, 0.1, 0.8, 0.5);
        assert_eq!(tracker.observe(&[a, b]), vec![1, 2]);
        assert_eq!(tracker.observe(&[b, a]), vec![2, 1]);
        assert_eq!(tracker.track_count(), 2);
    }

    #[test]
    fn jump_opens_new_track() {
        let mut tracker = SubjectTracker::new();
        tracker.observe(&[Rect::new(0.0, 0.0, 0.2, 0.2)]);
        let ids = tracker.observe(&[Rect::new(0.7, 0.7, 0.9, 0.9)]);
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn overlapping_detections_join_a_track_opened_in_the_same_frame() {
        let mut tracker = SubjectTracker::new();
        let a = Rect::new(0.1, 0.1, 0.3, 0.5);
        assert_eq!(tracker.observe(&[a, a]), vec![1, 1]);
        assert_eq!(tracker.track_count(), 1);
    }

    #[test]
    fn matched_track_is_not_reused_within_a_frame() {
        let mut tracker = SubjectTracker::new();
        let a = Rect::new(0.1, 0.1, 0.3, 0.5);
        tracker.observe(&[a]);
        assert_eq!(tracker.observe(&[a, a]), vec![1, 2]);
    }
}
