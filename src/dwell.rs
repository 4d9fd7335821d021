//! Dwell: how long the ROI stays meaningfully occluded.

use crate::occlusion::OcclusionSample;

/// Occlusion above this share of the ROI counts as "meaningfully occluded".
pub const DWELL_FLOOR_PCT: f64 = 10.0;

/// Length of the current unbroken run of active frames, in seconds.
///
/// Each active frame adds one frame duration; an inactive frame resets to 0.
/// Durations are summed incrementally, not derived from a frame count; trip
/// frames depend on the accumulated rounding.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RunAccumulator {
    current_s: f64,
}

impl RunAccumulator {
    pub fn observe(&mut self, active: bool, frame_s: f64) -> f64 {
        if active {
            self.current_s += frame_s;
        } else {
            self.current_s = 0.0;
        }
        self.current_s
    }

    pub fn current_s(&self) -> f64 {
        self.current_s
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DwellSummary {
    /// Longest unbroken run above the floor.
    pub max_s: f64,
    /// All time above the floor, runs summed.
    pub total_s: f64,
}

#[derive(Clone, Debug)]
pub struct DwellTracker {
    floor_pct: f64,
    frame_s: f64,
    run: RunAccumulator,
    summary: DwellSummary,
}

impl DwellTracker {
    pub fn new(fps: f64) -> Self {
        Self::with_floor(fps, DWELL_FLOOR_PCT)
    }

    pub fn with_floor(fps: f64, floor_pct: f64) -> Self {
        Self {
            floor_pct,
            frame_s: 1.0 / fps,
            run: RunAccumulator::default(),
            summary: DwellSummary::default(),
        }
    }

    pub fn observe(&mut self, sample: &OcclusionSample) {
        let active = sample.pct > self.floor_pct;
        let current = self.run.observe(active, self.frame_s);
        if active {
            self.summary.total_s += self.frame_s;
            self.summary.max_s = self.summary.max_s.max(current);
        }
    }

    pub fn summary(&self) -> DwellSummary {
        self.summary
    }
}

/// Dwell over a whole series.
pub fn dwell_summary(series: &[OcclusionSample], fps: f64) -> DwellSummary {
    let mut tracker = DwellTracker::new(fps);
    for sample in series {
        tracker.observe(sample);
    }
    tracker.summary()
}
