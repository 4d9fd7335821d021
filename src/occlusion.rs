//! Per-frame occlusion sampling.

use serde::{Deserialize, Serialize};

use crate::frame::Frame;
use crate::geometry::occlusion_pct;
use crate::roi::RegionOfInterest;

/// Occlusion of the ROI at one sampled instant.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OcclusionSample {
    #[serde(rename = "timestamp")]
    pub timestamp_s: f64,
    /// Covered share of the ROI, `[0,100]`.
    #[serde(rename = "occlusion_pct")]
    pub pct: f64,
}

pub fn sample_frame(roi: &RegionOfInterest, frame: &Frame) -> OcclusionSample {
    OcclusionSample {
        timestamp_s: frame.timestamp_s,
        pct: occlusion_pct(&roi.rect, &frame.boxes),
    }
}

pub fn sample_series(roi: &RegionOfInterest, frames: &[Frame]) -> Vec<OcclusionSample> {
    frames.iter().map(|frame| sample_frame(roi, frame)).collect()
}

/// Sample closest to playback time `t_s`. On an exact tie the earlier sample wins.
///
/// `series` must be ordered by timestamp.
pub fn nearest_sample(series: &[OcclusionSample], t_s: f64) -> Option<&OcclusionSample> {
    let idx = series.partition_point(|s| s.timestamp_s < t_s);
    let before = idx.checked_sub(1).and_then(|i| series.get(i));
    let after = series.get(idx);
    match (before, after) {
        (Some(b), Some(a)) => {
            if (t_s - b.timestamp_s) <= (a.timestamp_s - t_s) {
                Some(b)
            } else {
                Some(a)
            }
        }
        (Some(b), None) => Some(b),
        (None, a) => a,
    }
}
