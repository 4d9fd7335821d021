//! Dual-condition debounced alerting.
//!
//! One machine, two instances: the early policy trips quickly on moderate
//! occlusion, the standard policy models a conservative baseline. Each watches
//! the occlusion series and latches the first frame at which either
//!
//! - occlusion has stayed above `occlusion_threshold_pct` for `min_sustain_s`, or
//! - occlusion has stayed above `dwell_floor_pct` for `dwell_threshold_s`.
//!
//! The sustain rule is checked first, so it wins a same-frame tie.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::dwell::{RunAccumulator, DWELL_FLOOR_PCT};
use crate::occlusion::OcclusionSample;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AlertPolicy {
    pub occlusion_threshold_pct: f64,
    pub min_sustain_s: f64,
    pub dwell_floor_pct: f64,
    pub dwell_threshold_s: f64,
}

impl AlertPolicy {
    pub const EARLY: AlertPolicy = AlertPolicy {
        occlusion_threshold_pct: 30.0,
        min_sustain_s: 0.5,
        dwell_floor_pct: DWELL_FLOOR_PCT,
        dwell_threshold_s: 2.0,
    };

    pub const STANDARD: AlertPolicy = AlertPolicy {
        occlusion_threshold_pct: 60.0,
        min_sustain_s: 2.0,
        dwell_floor_pct: DWELL_FLOOR_PCT,
        dwell_threshold_s: 4.0,
    };

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("occlusion_threshold_pct", self.occlusion_threshold_pct),
            ("dwell_floor_pct", self.dwell_floor_pct),
        ] {
            if !value.is_finite() || !(0.0..=100.0).contains(&value) {
                return Err(anyhow!("alert policy {} must be in [0,100]", name));
            }
        }
        for (name, value) in [
            ("min_sustain_s", self.min_sustain_s),
            ("dwell_threshold_s", self.dwell_threshold_s),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(anyhow!("alert policy {} must be > 0", name));
            }
        }
        Ok(())
    }

    /// True when `self` is at least as strict as `other` on every threshold.
    pub fn is_stricter_than(&self, other: &AlertPolicy) -> bool {
        self.occlusion_threshold_pct >= other.occlusion_threshold_pct
            && self.min_sustain_s >= other.min_sustain_s
            && self.dwell_floor_pct >= other.dwell_floor_pct
            && self.dwell_threshold_s >= other.dwell_threshold_s
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripRule {
    Sustain,
    Dwell,
}

/// The latched alert.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Trip {
    pub timestamp_s: f64,
    pub frame_index: usize,
    pub rule: TripRule,
}

#[derive(Clone, Debug)]
pub struct AlertStateMachine {
    policy: AlertPolicy,
    frame_s: f64,
    sustain: RunAccumulator,
    dwell: RunAccumulator,
    frames_seen: usize,
    trip: Option<Trip>,
}

impl AlertStateMachine {
    pub fn new(policy: AlertPolicy, fps: f64) -> Self {
        Self {
            policy,
            frame_s: 1.0 / fps,
            sustain: RunAccumulator::default(),
            dwell: RunAccumulator::default(),
            frames_seen: 0,
            trip: None,
        }
    }

    pub fn policy(&self) -> &AlertPolicy {
        &self.policy
    }

    /// Feed the next sample. Returns the trip only on the frame that fires.
    pub fn observe(&mut self, sample: &OcclusionSample) -> Option<Trip> {
        let frame_index = self.frames_seen;
        self.frames_seen += 1;

        let sustained = self.sustain.observe(
            sample.pct > self.policy.occlusion_threshold_pct,
            self.frame_s,
        );
        let dwelled = self
            .dwell
            .observe(sample.pct > self.policy.dwell_floor_pct, self.frame_s);

        if self.trip.is_some() {
            return None;
        }
        let rule = if sustained >= self.policy.min_sustain_s {
            TripRule::Sustain
        } else if dwelled >= self.policy.dwell_threshold_s {
            TripRule::Dwell
        } else {
            return None;
        };
        let trip = Trip {
            timestamp_s: sample.timestamp_s,
            frame_index,
            rule,
        };
        self.trip = Some(trip);
        Some(trip)
    }

    pub fn trip(&self) -> Option<Trip> {
        self.trip
    }

    /// Trip time in seconds, 0 when the policy never fired.
    pub fn trip_time_s(&self) -> f64 {
        self.trip.map_or(0.0, |t| t.timestamp_s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(policy: AlertPolicy, pcts: &[f64], fps: f64) -> Option<Trip> {
        let mut machine = AlertStateMachine::new(policy, fps);
        for (i, &pct) in pcts.iter().enumerate() {
            machine.observe(&OcclusionSample {
                timestamp_s: i as f64 / fps,
                pct,
            });
        }
        machine.trip()
    }

    #[test]
    fn early_policy_trips_on_sustained_occlusion() {
        let trip = run(AlertPolicy::EARLY, &[40.0; 6], 5.0).expect("trip");
        assert_eq!(trip.rule, TripRule::Sustain);
        assert_eq!(trip.frame_index, 2);
    }

    #[test]
    fn early_policy_trips_on_dwell_when_occlusion_is_moderate() {
        // 20% never crosses 30%, but stays above the 10% floor.
        let trip = run(AlertPolicy::EARLY, &[20.0; 15], 5.0).expect("trip");
        assert_eq!(trip.rule, TripRule::Dwell);
        // Ten frames sum to 1.9999999999999998; the eleventh crosses 2 s.
        assert_eq!(trip.frame_index, 10);
        assert_eq!(trip.timestamp_s, 2.0);
    }

    #[test]
    fn sustain_resets_on_dip() {
        let pcts = [40.0, 40.0, 0.0, 40.0, 40.0, 0.0];
        assert!(run(AlertPolicy::EARLY, &pcts, 5.0).is_none());
    }

    #[test]
    fn first_trip_is_frozen() {
        let mut machine = AlertStateMachine::new(AlertPolicy::EARLY, 5.0);
        let mut fired = Vec::new();
        for i in 0..20 {
            let sample = OcclusionSample {
                timestamp_s: i as f64 * 0.2,
                pct: 90.0,
            };
            if let Some(trip) = machine.observe(&sample) {
                fired.push(trip);
            }
        }
        assert_eq!(fired.len(), 1);
        assert_eq!(machine.trip(), Some(fired[0]));
    }

    #[test]
    fn sustain_wins_same_frame_tie() {
        let policy = AlertPolicy {
            occlusion_threshold_pct: 30.0,
            min_sustain_s: 1.0,
            dwell_floor_pct: 10.0,
            dwell_threshold_s: 1.0,
        };
        let trip = run(policy, &[50.0; 10], 2.0).expect("trip");
        assert_eq!(trip.rule, TripRule::Sustain);
        assert_eq!(trip.frame_index, 1);
    }

    #[test]
    fn trip_at_time_zero_is_kept() {
        // At 2 fps one frame lasts 0.5 s, so the early policy fires on the
        // first frame. Later frames must not overwrite it.
        let trip = run(AlertPolicy::EARLY, &[80.0; 5], 2.0).expect("trip");
        assert_eq!(trip.frame_index, 0);
        assert_eq!(trip.timestamp_s, 0.0);
    }

    #[test]
    fn untriggered_reports_zero() {
        let machine = AlertStateMachine::new(AlertPolicy::STANDARD, 5.0);
        assert_eq!(machine.trip_time_s(), 0.0);
        assert!(run(AlertPolicy::STANDARD, &[5.0; 50], 5.0).is_none());
    }

    #[test]
    fn standard_is_stricter_than_early() {
        assert!(AlertPolicy::STANDARD.is_stricter_than(&AlertPolicy::EARLY));
        assert!(!AlertPolicy::EARLY.is_stricter_than(&AlertPolicy::STANDARD));
    }

    #[test]
    fn rejects_nonsense_policies() {
        let mut policy = AlertPolicy::EARLY;
        policy.min_sustain_s = 0.0;
        assert!(policy.validate().is_err());
        let mut policy = AlertPolicy::EARLY;
        policy.occlusion_threshold_pct = 120.0;
        assert!(policy.validate().is_err());
        assert!(AlertPolicy::STANDARD.validate().is_ok());
    }
}
