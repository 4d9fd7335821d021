//! Sampled frames and the validation gate in front of the scoring core.
//!
//! Frames arrive from an external sampler/detector pair. The core assumes
//! well-formed input, so everything it relies on is checked here first:
//!
//! - at least one frame
//! - finite, positive fps
//! - finite, non-negative, strictly increasing timestamps
//! - finite, non-negative blur scores
//! - boxes inside `[0,1]` with `x1 < x2` and `y1 < y2`

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::geometry::Rect;
use crate::redundancy::GridCell;
use crate::roi::{RegionOfInterest, RoiInput};

/// One sampled instant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Seconds from clip start.
    #[serde(rename = "timestamp")]
    pub timestamp_s: f64,
    /// Detected subject boxes, normalized.
    #[serde(default)]
    pub boxes: Vec<Rect>,
    /// Sharpness (variance of Laplacian); higher is sharper.
    #[serde(default)]
    pub blur_score: f64,
}

impl Frame {
    pub fn new(timestamp_s: f64, boxes: Vec<Rect>, blur_score: f64) -> Self {
        Self {
            timestamp_s,
            boxes,
            blur_score,
        }
    }
}

/// Check a run's inputs before scoring.
pub fn validate_run(frames: &[Frame], roi: &RegionOfInterest, fps: f64) -> Result<()> {
    if !fps.is_finite() || fps <= 0.0 {
        return Err(anyhow!("fps must be a positive finite number, got {}", fps));
    }
    roi.validate()?;
    if frames.is_empty() {
        return Err(anyhow!("frame sequence is empty"));
    }

    let mut prev_ts: Option<f64> = None;
    for (index, frame) in frames.iter().enumerate() {
        let ts = frame.timestamp_s;
        if !ts.is_finite() || ts < 0.0 {
            return Err(anyhow!(
                "frame {}: timestamp must be finite and >= 0, got {}",
                index,
                ts
            ));
        }
        if let Some(prev) = prev_ts {
            if ts <= prev {
                return Err(anyhow!(
                    "frame {}: timestamps must be strictly increasing ({} after {})",
                    index,
                    ts,
                    prev
                ));
            }
        }
        prev_ts = Some(ts);

        if !frame.blur_score.is_finite() || frame.blur_score < 0.0 {
            return Err(anyhow!(
                "frame {}: blur score must be finite and >= 0, got {}",
                index,
                frame.blur_score
            ));
        }
        for (box_index, b) in frame.boxes.iter().enumerate() {
            validate_box(b).map_err(|e| anyhow!("frame {} box {}: {}", index, box_index, e))?;
        }
    }
    Ok(())
}

fn validate_box(b: &Rect) -> Result<()> {
    if !b.is_finite() {
        return Err(anyhow!("coordinates must be finite"));
    }
    if !b.is_normalized() {
        return Err(anyhow!("coordinates must lie in [0,1]"));
    }
    if b.is_empty() {
        return Err(anyhow!("box must satisfy x1 < x2 and y1 < y2"));
    }
    Ok(())
}

/// Analysis input document as written by the sampling stage.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FrameDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fps: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roi: Option<RoiInput>,
    /// Grid cells this camera covers, for redundancy against a peer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage_cells: Option<Vec<GridCell>>,
    /// Grid cells a peer camera covers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peer_coverage_cells: Option<Vec<GridCell>>,
    pub frames: Vec<Frame>,
}

impl FrameDocument {
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| anyhow!("invalid frame document: {}", e))
    }
}
