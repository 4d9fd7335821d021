//! ROI Reliability Kernel
//!
//! Audits whether a fixed camera gives trustworthy coverage of a zone. Given the
//! subject boxes detected on each sampled frame and a region of interest, the
//! kernel measures how much of the zone is blocked, for how long, how quickly
//! an early-warning policy would alert compared with a conservative baseline,
//! and condenses it into a 0–100 reliability score.
//!
//! # Guarantees
//!
//! 1. **Deterministic**: identical `(frames, roi, fps)` yield identical reports.
//!    No randomness, no wall clock.
//! 2. **Single pass**: frames are processed once, in timestamp order.
//! 3. **Validated at the edge**: malformed input is rejected before scoring; the
//!    scoring core itself is total.
//!
//! # Module Structure
//!
//! - `geometry`: normalized rectangles and approximate union area
//! - `occlusion`, `dwell`, `alert`, `score`: the per-frame and aggregate stages
//! - `pipeline`: the orchestrating pass and report assembly
//! - `roi`, `frame`: inputs and validation
//! - `tracks`, `redundancy`, `advice`, `placement`: supporting signals

use anyhow::{anyhow, Result};
use std::sync::OnceLock;

pub mod advice;
pub mod alert;
pub mod config;
pub mod dwell;
pub mod frame;
pub mod geometry;
pub mod occlusion;
pub mod pipeline;
pub mod placement;
pub mod redundancy;
pub mod report;
pub mod roi;
pub mod score;
pub mod tracks;

pub use advice::Recommendation;
pub use alert::{AlertPolicy, AlertStateMachine, Trip, TripRule};
pub use config::AuditConfig;
pub use dwell::{DwellSummary, DwellTracker, DWELL_FLOOR_PCT};
pub use frame::{validate_run, Frame, FrameDocument};
pub use geometry::{occlusion_pct, Rect};
pub use occlusion::{nearest_sample, sample_series, OcclusionSample};
pub use pipeline::{score_reliability, ReliabilityPipeline, ReliabilityRun};
pub use placement::{recommend_placement, CameraPosition, PlacementGrade, PlacementScore};
pub use redundancy::{calculate_redundancy, GridCell};
pub use report::ReliabilityReport;
pub use roi::{RegionOfInterest, RoiSource, DEFAULT_ROI};
pub use score::{ReliabilityLabel, ScoringPolicy, SignalBundle, Verdict};

// -------------------- Zone ID Discipline --------------------

/// Zone ids label the audited area in reports. They are local identifiers,
/// never addresses or coordinates.
///
/// Allowed: "zone:front_boundary", "zone:lot_a_1", "zone:back-gate"
pub fn validate_zone_id(zone_id: &str) -> Result<()> {
    static ZONE_ID_RE: OnceLock<regex::Regex> = OnceLock::new();
    let re = ZONE_ID_RE.get_or_init(|| regex::Regex::new(r"^zone:[a-z0-9_-]{1,64}$").unwrap());

    let zid = zone_id.to_lowercase();
    if !re.is_match(&zid) {
        return Err(anyhow!("zone_id must match ^zone:[a-z0-9_-]{{1,64}}$"));
    }
    Ok(())
}
