//! Camera placement heuristic.
//!
//! Positions are ground-plane metres `(x, y, height)`; the ROI passed here is in
//! the same plane, not in normalized image coordinates.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::geometry::Rect;

pub const OPTIMAL_DISTANCE_M: f64 = 5.0;
pub const OPTIMAL_HEIGHT_M: f64 = 3.0;
/// Preferred spacing to the nearest existing camera.
pub const OPTIMAL_SPACING_M: f64 = 3.0;
/// Redundancy score used when no camera is installed yet.
pub const NEUTRAL_REDUNDANCY: f64 = 0.5;

const DISTANCE_WEIGHT: f64 = 0.4;
const HEIGHT_WEIGHT: f64 = 0.3;
const REDUNDANCY_WEIGHT: f64 = 0.3;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraPosition {
    pub x: f64,
    pub y: f64,
    pub height: f64,
}

impl CameraPosition {
    pub fn new(x: f64, y: f64, height: f64) -> Self {
        Self { x, y, height }
    }

    fn planar_distance(&self, x: f64, y: f64) -> f64 {
        ((self.x - x).powi(2) + (self.y - y).powi(2)).sqrt()
    }
}

impl FromStr for CameraPosition {
    type Err = anyhow::Error;

    /// Parses `x,y,height`.
    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<f64> = s
            .split(',')
            .map(|p| {
                p.trim()
                    .parse::<f64>()
                    .map_err(|_| anyhow!("invalid camera coordinate '{}'", p.trim()))
            })
            .collect::<Result<_>>()?;
        match parts.as_slice() {
            [x, y, h] if x.is_finite() && y.is_finite() && h.is_finite() => {
                Ok(Self::new(*x, *y, *h))
            }
            _ => Err(anyhow!("camera position must be 'x,y,height'")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlacementGrade {
    Good,
    Fair,
    Poor,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacementScore {
    pub position: CameraPosition,
    pub total_score: f64,
    pub distance_score: f64,
    pub height_score: f64,
    pub redundancy_score: f64,
    pub grade: PlacementGrade,
}

fn closeness(value: f64, optimum: f64) -> f64 {
    1.0 / (1.0 + (value - optimum).abs() / optimum)
}

pub fn placement_score(
    position: CameraPosition,
    roi: &Rect,
    existing: &[CameraPosition],
) -> PlacementScore {
    let (cx, cy) = roi.center();
    let distance_score = closeness(position.planar_distance(cx, cy), OPTIMAL_DISTANCE_M);
    let height_score = closeness(position.height, OPTIMAL_HEIGHT_M);
    let redundancy_score = existing
        .iter()
        .map(|cam| position.planar_distance(cam.x, cam.y))
        .reduce(f64::min)
        .map_or(NEUTRAL_REDUNDANCY, |nearest| {
            closeness(nearest, OPTIMAL_SPACING_M)
        });

    let total_score = distance_score * DISTANCE_WEIGHT
        + height_score * HEIGHT_WEIGHT
        + redundancy_score * REDUNDANCY_WEIGHT;
    let grade = if total_score > 0.7 {
        PlacementGrade::Good
    } else if total_score > 0.5 {
        PlacementGrade::Fair
    } else {
        PlacementGrade::Poor
    };

    PlacementScore {
        position,
        total_score,
        distance_score,
        height_score,
        redundancy_score,
        grade,
    }
}

/// Four positions at the optimal distance around the ROI centre, plus one above it.
pub fn default_candidates(roi: &Rect) -> Vec<CameraPosition> {
    let (cx, cy) = roi.center();
    vec![
        CameraPosition::new(cx - OPTIMAL_DISTANCE_M, cy, OPTIMAL_HEIGHT_M),
        CameraPosition::new(cx + OPTIMAL_DISTANCE_M, cy, OPTIMAL_HEIGHT_M),
        CameraPosition::new(cx, cy - OPTIMAL_DISTANCE_M, OPTIMAL_HEIGHT_M),
        CameraPosition::new(cx, cy + OPTIMAL_DISTANCE_M, OPTIMAL_HEIGHT_M),
        CameraPosition::new(cx, cy, 4.0),
    ]
}

/// Score candidates best-first. Equal scores keep their input order.
pub fn recommend_placement(
    roi: &Rect,
    existing: &[CameraPosition],
    candidates: Option<&[CameraPosition]>,
) -> Vec<PlacementScore> {
    let candidates = match candidates {
        Some(c) if !c.is_empty() => c.to_vec(),
        _ => default_candidates(roi),
    };
    let mut scored: Vec<PlacementScore> = candidates
        .into_iter()
        .map(|pos| placement_score(pos, roi, existing))
        .collect();
    scored.sort_by(|a, b| b.total_score.total_cmp(&a.total_score));
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optimal_position_without_peers() {
        let roi = Rect::new(0.0, 0.0, 2.0, 2.0);
        let s = placement_score(CameraPosition::new(6.0, 1.0, 3.0), &roi, &[]);
        assert!((s.distance_score - 1.0).abs() < 1e-12);
        assert!((s.height_score - 1.0).abs() < 1e-12);
        assert_eq!(s.redundancy_score, NEUTRAL_REDUNDANCY);
        assert!((s.total_score - 0.85).abs() < 1e-12);
        assert_eq!(s.grade, PlacementGrade::Good);
    }

    #[test]
    fn nearest_peer_drives_redundancy() {
        let roi = Rect::new(0.0, 0.0, 2.0, 2.0);
        let existing = [CameraPosition::new(6.0, 4.0, 3.0), CameraPosition::new(50.0, 50.0, 3.0)];
        let s = placement_score(CameraPosition::new(6.0, 1.0, 3.0), &roi, &existing);
        assert!((s.redundancy_score - 1.0).abs() < 1e-12);
    }

    #[test]
    fn ranks_candidates_best_first() {
        let roi = Rect::new(0.0, 0.0, 2.0, 2.0);
        let candidates = [
            CameraPosition::new(30.0, 30.0, 12.0),
            CameraPosition::new(6.0, 1.0, 3.0),
        ];
        let ranked = recommend_placement(&roi, &[], Some(&candidates));
        assert_eq!(ranked[0].position, candidates[1]);
        assert_eq!(ranked[1].grade, PlacementGrade::Poor);
    }

    #[test]
    fn default_candidates_surround_roi() {
        let roi = Rect::new(0.0, 0.0, 2.0, 2.0);
        let ranked = recommend_placement(&roi, &[], None);
        assert_eq!(ranked.len(), 5);
        // The four ring positions tie and keep their order ahead of the overhead one.
        assert_eq!(ranked[0].position, CameraPosition::new(-4.0, 1.0, 3.0));
        assert_eq!(ranked[4].position, CameraPosition::new(1.0, 1.0, 4.0));
    }

    #[test]
    fn parses_positions() {
        let p: CameraPosition = "1.5, -2, 3".parse().unwrap();
        assert_eq!(p, CameraPosition::new(1.5, -2.0, 3.0));
        assert!("1,2".parse::<CameraPosition>().is_err());
        assert!("a,b,c".parse::<CameraPosition>().is_err());
    }
}
