//! Serialized audit report.
//!
//! Field names and rounding match what downstream consumers (insight
//! generation, the playback overlay) already parse.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::advice::Recommendation;
use crate::frame::Frame;
use crate::occlusion::OcclusionSample;
use crate::roi::{RegionOfInterest, RoiSource};
use crate::score::ReliabilityLabel;

/// Round to one decimal, ties to even.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReliabilityReport {
    pub reliability_label: ReliabilityLabel,
    pub reliability_score: u8,
    pub recommendation: Recommendation,
    pub signals: SignalsReport,
    pub timestamps: TimestampsReport,
    pub occlusion_series: Vec<OcclusionSample>,
    pub debug: DebugReport,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SignalsReport {
    pub occlusion_pct_avg: f64,
    pub occlusion_pct_max: f64,
    pub dwell_s_max: f64,
    pub dwell_s_total: f64,
    pub blur_score_avg: u64,
    pub redundancy: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimestampsReport {
    /// Early-policy trip; 0 when it never fired.
    pub flip_at_s: f64,
    /// Standard-policy trip; 0 when it never fired.
    pub standard_ai_alert_at_s: f64,
    pub early_not_triggered: bool,
    pub standard_not_triggered: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DebugReport {
    pub sampled_frames: usize,
    pub fps_used: f64,
    pub roi: [f64; 4],
    pub roi_source: RoiSource,
    pub zone_id: String,
    /// Frame at which the early policy fired.
    pub alert_frame_index: Option<usize>,
    /// First frame with peak occlusion.
    pub peak_frame_index: usize,
    pub track_count: usize,
    pub input_digest: String,
}

#[derive(Serialize)]
struct CanonicalInput<'a> {
    fps: f64,
    roi: &'a RegionOfInterest,
    frames: &'a [Frame],
}

/// Hex SHA-256 of the canonical JSON of a run's inputs.
pub fn input_digest(frames: &[Frame], roi: &RegionOfInterest, fps: f64) -> Result<String> {
    let canonical = serde_json::to_vec(&CanonicalInput { fps, roi, frames })?;
    Ok(hex::encode(Sha256::digest(&canonical)))
}
