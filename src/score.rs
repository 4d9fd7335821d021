//! Reliability scoring.
//!
//! ```text
//! blur_term = blur_avg > 0 ? 1 - min(1, blur_avg / blur_cap) : 1
//! risk      = 0.6 * (occlusion_max / 100)
//!           + 0.3 * min(dwell_max / 5, 1)
//!           + 0.1 * blur_term
//! score     = round(100 * (1 - risk)) in [0,100]
//! label     = score < cutoff ? NOT RELIABLE : RELIABLE
//! ```
//!
//! The weights are fixed; only the blur cap and the cutoff are configurable.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const OCCLUSION_WEIGHT: f64 = 0.6;
pub const DWELL_WEIGHT: f64 = 0.3;
pub const BLUR_WEIGHT: f64 = 0.1;
/// Dwell at which the dwell term saturates.
pub const DWELL_SATURATION_S: f64 = 5.0;
pub const DEFAULT_BLUR_CAP: f64 = 3000.0;
pub const DEFAULT_RELIABLE_CUTOFF: u8 = 70;

/// Aggregate signals for one run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalBundle {
    pub occlusion_avg: f64,
    pub occlusion_max: f64,
    pub dwell_max: f64,
    pub dwell_total: f64,
    pub blur_avg: f64,
    /// Overlap with a peer camera, `[0,1]`. 0 for a single camera.
    pub redundancy: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReliabilityLabel {
    #[serde(rename = "RELIABLE")]
    Reliable,
    #[serde(rename = "NOT RELIABLE")]
    NotReliable,
}

impl ReliabilityLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReliabilityLabel::Reliable => "RELIABLE",
            ReliabilityLabel::NotReliable => "NOT RELIABLE",
        }
    }
}

impl fmt::Display for ReliabilityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Verdict {
    pub label: ReliabilityLabel,
    pub score: u8,
    pub risk: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoringPolicy {
    /// Sharpness at which the blur penalty reaches 0.
    pub blur_cap: f64,
    /// Scores below this are NOT RELIABLE.
    pub reliable_cutoff: u8,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            blur_cap: DEFAULT_BLUR_CAP,
            reliable_cutoff: DEFAULT_RELIABLE_CUTOFF,
        }
    }
}

impl ScoringPolicy {
    pub fn validate(&self) -> Result<()> {
        if !self.blur_cap.is_finite() || self.blur_cap <= 0.0 {
            return Err(anyhow!("blur_cap must be > 0"));
        }
        if self.reliable_cutoff > 100 {
            return Err(anyhow!("reliable_cutoff must be in [0,100]"));
        }
        Ok(())
    }

    /// Blur penalty in `[0,1]`. A zero average is treated as maximally blurry.
    pub fn blur_term(&self, blur_avg: f64) -> f64 {
        if blur_avg > 0.0 {
            1.0 - (blur_avg / self.blur_cap).min(1.0)
        } else {
            1.0
        }
    }

    pub fn risk(&self, occlusion_max_pct: f64, dwell_max_s: f64, blur_avg: f64) -> f64 {
        OCCLUSION_WEIGHT * (occlusion_max_pct / 100.0)
            + DWELL_WEIGHT * (dwell_max_s / DWELL_SATURATION_S).min(1.0)
            + BLUR_WEIGHT * self.blur_term(blur_avg)
    }

    pub fn verdict(&self, signals: &SignalBundle) -> Verdict {
        let risk = self.risk(signals.occlusion_max, signals.dwell_max, signals.blur_avg);
        // Ties round to even.
        let score = (100.0 * (1.0 - risk)).clamp(0.0, 100.0).round_ties_even() as u8;
        let label = if score < self.reliable_cutoff {
            ReliabilityLabel::NotReliable
        } else {
            ReliabilityLabel::Reliable
        };
        Verdict { label, score, risk }
    }
}
