//! Camera-layout recommendation derived from a run's signals.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::frame::Frame;
use crate::geometry::Rect;

/// Occlusion above which a single view cannot be trusted without a second camera.
pub const HEAVY_OCCLUSION_PCT: f64 = 60.0;
/// Occlusion above which the camera should be moved.
pub const MODERATE_OCCLUSION_PCT: f64 = 30.0;
/// ROI top edge above this line sits in the top band of the frame.
pub const TOP_BAND: f64 = 0.2;
/// Boxes closer than this to the left/right frame edge count as edge activity.
pub const EDGE_MARGIN: f64 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    /// Add a second camera facing the ROI from the opposite side.
    AddOppositeCamera,
    /// ROI is near the horizon with activity at the frame edges.
    RooftopOrDroneCheck,
    /// Move the camera or add an overhead view.
    RepositionOrOverhead,
    /// Coverage is acceptable; redundancy still helps.
    AddRedundancy,
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::AddOppositeCamera => "ADD_OPPOSITE_CAMERA",
            Recommendation::RooftopOrDroneCheck => "ROOFTOP_OR_DRONE_CHECK",
            Recommendation::RepositionOrOverhead => "REPOSITION_OR_OVERHEAD",
            Recommendation::AddRedundancy => "ADD_REDUNDANCY",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn recommend(
    occlusion_max_pct: f64,
    redundancy: f64,
    roi: &Rect,
    frames: &[Frame],
) -> Recommendation {
    if occlusion_max_pct > HEAVY_OCCLUSION_PCT && redundancy == 0.0 {
        return Recommendation::AddOppositeCamera;
    }
    if roi.y1 < TOP_BAND && has_edge_activity(frames) {
        return Recommendation::RooftopOrDroneCheck;
    }
    if occlusion_max_pct > HEAVY_OCCLUSION_PCT {
        Recommendation::AddOppositeCamera
    } else if occlusion_max_pct > MODERATE_OCCLUSION_PCT {
        Recommendation::RepositionOrOverhead
    } else {
        Recommendation::AddRedundancy
    }
}

fn has_edge_activity(frames: &[Frame]) -> bool {
    frames
        .iter()
        .flat_map(|f| f.boxes.iter())
        .any(|b| b.x1 < EDGE_MARGIN || b.x2 > 1.0 - EDGE_MARGIN)
}
