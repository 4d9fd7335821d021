//! Single-pass reliability audit.
//!
//! One call processes one immutable frame sequence. The pass is sequential in
//! timestamp order: occlusion sampling, dwell tracking, both alert machines and
//! subject tracking advance together on each frame, then the scorer runs over
//! the aggregates. Nothing outlives the call, so independent runs may execute
//! on separate threads without coordination.

use anyhow::{anyhow, Result};

use crate::advice::{recommend, Recommendation};
use crate::alert::{AlertPolicy, AlertStateMachine, Trip};
use crate::config::AuditConfig;
use crate::dwell::DwellTracker;
use crate::frame::{validate_run, Frame};
use crate::occlusion::{sample_frame, OcclusionSample};
use crate::report::{
    input_digest, round1, DebugReport, ReliabilityReport, SignalsReport, TimestampsReport,
};
use crate::roi::RegionOfInterest;
use crate::score::{ScoringPolicy, SignalBundle, Verdict};
use crate::tracks::SubjectTracker;

pub const DEFAULT_ZONE_ID: &str = "zone:default";

#[derive(Clone, Debug)]
pub struct ReliabilityPipeline {
    pub early: AlertPolicy,
    pub standard: AlertPolicy,
    pub scoring: ScoringPolicy,
    pub zone_id: String,
    redundancy: f64,
}

/// Unrounded outcome of one pass.
#[derive(Clone, Debug)]
pub struct ReliabilityRun {
    pub series: Vec<OcclusionSample>,
    pub signals: SignalBundle,
    pub verdict: Verdict,
    pub early_trip: Option<Trip>,
    pub standard_trip: Option<Trip>,
    pub peak_frame_index: usize,
    pub track_count: usize,
    pub recommendation: Recommendation,
}

impl ReliabilityRun {
    /// Early trip time, 0 when untriggered.
    pub fn flip_at_s(&self) -> f64 {
        self.early_trip.map_or(0.0, |t| t.timestamp_s)
    }

    /// Standard trip time, 0 when untriggered.
    pub fn standard_alert_at_s(&self) -> f64 {
        self.standard_trip.map_or(0.0, |t| t.timestamp_s)
    }
}

impl Default for ReliabilityPipeline {
    fn default() -> Self {
        Self {
            early: AlertPolicy::EARLY,
            standard: AlertPolicy::STANDARD,
            scoring: ScoringPolicy::default(),
            zone_id: DEFAULT_ZONE_ID.to_string(),
            redundancy: 0.0,
        }
    }
}

impl ReliabilityPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(cfg: &AuditConfig) -> Self {
        Self {
            early: cfg.early,
            standard: cfg.standard,
            scoring: cfg.scoring,
            zone_id: cfg.zone_id.clone(),
            redundancy: 0.0,
        }
    }

    /// Overlap with a peer camera, clamped to `[0,1]`.
    pub fn with_redundancy(mut self, redundancy: f64) -> Self {
        self.redundancy = if redundancy.is_finite() {
            redundancy.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self
    }

    pub fn redundancy(&self) -> f64 {
        self.redundancy
    }

    /// Validate inputs and run the pass.
    pub fn run(&self, frames: &[Frame], roi: &RegionOfInterest, fps: f64) -> Result<ReliabilityRun> {
        self.early
            .validate()
            .map_err(|e| anyhow!("early policy: {}", e))?;
        self.standard
            .validate()
            .map_err(|e| anyhow!("standard policy: {}", e))?;
        self.scoring.validate()?;
        validate_run(frames, roi, fps)?;

        log::debug!(
            "auditing {} frames at {} fps, roi={:?} ({:?})",
            frames.len(),
            fps,
            <[f64; 4]>::from(roi.rect),
            roi.source
        );

        let mut dwell = DwellTracker::new(fps);
        let mut early = AlertStateMachine::new(self.early, fps);
        let mut standard = AlertStateMachine::new(self.standard, fps);
        let mut tracker = SubjectTracker::new();
        let mut series = Vec::with_capacity(frames.len());
        let mut occlusion_sum = 0.0;
        let mut occlusion_max = 0.0_f64;
        let mut peak_frame_index = 0;
        let mut blur_sum = 0.0;

        for (index, frame) in frames.iter().enumerate() {
            let sample = sample_frame(roi, frame);
            dwell.observe(&sample);
            if let Some(trip) = early.observe(&sample) {
                log::debug!("early policy tripped at {:.2}s ({:?})", trip.timestamp_s, trip.rule);
            }
            if let Some(trip) = standard.observe(&sample) {
                log::debug!(
                    "standard policy tripped at {:.2}s ({:?})",
                    trip.timestamp_s,
                    trip.rule
                );
            }
            tracker.observe(&frame.boxes);

            occlusion_sum += sample.pct;
            if sample.pct > occlusion_max {
                occlusion_max = sample.pct;
                peak_frame_index = index;
            }
            blur_sum += frame.blur_score;
            series.push(sample);
        }

        let n = frames.len() as f64;
        let dwell = dwell.summary();
        let signals = SignalBundle {
            occlusion_avg: occlusion_sum / n,
            occlusion_max,
            dwell_max: dwell.max_s,
            dwell_total: dwell.total_s,
            blur_avg: blur_sum / n,
            redundancy: self.redundancy,
        };
        let verdict = self.scoring.verdict(&signals);
        let recommendation = recommend(signals.occlusion_max, signals.redundancy, &roi.rect, frames);

        log::info!(
            "{} score={} occlusion_max={:.1}% dwell_max={:.1}s",
            verdict.label,
            verdict.score,
            signals.occlusion_max,
            signals.dwell_max
        );

        Ok(ReliabilityRun {
            series,
            signals,
            verdict,
            early_trip: early.trip(),
            standard_trip: standard.trip(),
            peak_frame_index,
            track_count: tracker.track_count(),
            recommendation,
        })
    }

    /// Run the pass and render the serialized report.
    pub fn report(
        &self,
        frames: &[Frame],
        roi: &RegionOfInterest,
        fps: f64,
    ) -> Result<ReliabilityReport> {
        let run = self.run(frames, roi, fps)?;
        let digest = input_digest(frames, roi, fps)?;
        let flip_at_s = round1(run.flip_at_s());
        let standard_ai_alert_at_s = round1(run.standard_alert_at_s());
        Ok(ReliabilityReport {
            reliability_label: run.verdict.label,
            reliability_score: run.verdict.score,
            recommendation: run.recommendation,
            signals: SignalsReport {
                occlusion_pct_avg: round1(run.signals.occlusion_avg),
                occlusion_pct_max: round1(run.signals.occlusion_max),
                dwell_s_max: round1(run.signals.dwell_max),
                dwell_s_total: round1(run.signals.dwell_total),
                blur_score_avg: run.signals.blur_avg.round_ties_even() as u64,
                redundancy: run.signals.redundancy,
            },
            timestamps: TimestampsReport {
                flip_at_s,
                standard_ai_alert_at_s,
                early_not_triggered: run.early_trip.is_none(),
                standard_not_triggered: run.standard_trip.is_none(),
            },
            debug: DebugReport {
                sampled_frames: frames.len(),
                fps_used: fps,
                roi: roi.rect.into(),
                roi_source: roi.source,
                zone_id: self.zone_id.clone(),
                alert_frame_index: run.early_trip.map(|t| t.frame_index),
                peak_frame_index: run.peak_frame_index,
                track_count: run.track_count,
                input_digest: digest,
            },
            occlusion_series: run.series,
        })
    }
}

/// Score a run with the default policies.
pub fn score_reliability(
    frames: &[Frame],
    roi: &RegionOfInterest,
    fps: f64,
) -> Result<ReliabilityReport> {
    ReliabilityPipeline::default().report(frames, roi, fps)
}
