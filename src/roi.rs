//! Region of interest: the zone whose visibility is being audited.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// Full-frame ROI used when no zone is drawn.
pub const DEFAULT_ROI: Rect = Rect::UNIT;

/// Number of clicked points a user-drawn ROI is built from.
pub const ROI_CLICK_POINTS: usize = 4;

/// Where the ROI came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoiSource {
    /// Chosen by the system (default or external heuristic).
    Auto,
    /// Drawn by an operator.
    User,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegionOfInterest {
    pub rect: Rect,
    pub source: RoiSource,
}

impl RegionOfInterest {
    pub fn auto(rect: Rect) -> Self {
        Self {
            rect,
            source: RoiSource::Auto,
        }
    }

    pub fn user(rect: Rect) -> Self {
        Self {
            rect,
            source: RoiSource::User,
        }
    }

    pub fn full_frame() -> Self {
        Self::auto(DEFAULT_ROI)
    }

    /// Build a user ROI from four clicked points, reduced to their bounding rectangle.
    pub fn from_points(points: &[(f64, f64)]) -> Result<Self> {
        if points.len() != ROI_CLICK_POINTS {
            return Err(anyhow!(
                "roi requires exactly {} points, got {}",
                ROI_CLICK_POINTS,
                points.len()
            ));
        }
        let rect = Rect::bounding_points(points).ok_or_else(|| anyhow!("roi has no points"))?;
        let roi = Self::user(rect);
        roi.validate()?;
        Ok(roi)
    }

    pub fn area(&self) -> f64 {
        self.rect.area()
    }

    /// Rejects non-finite, out-of-frame, or inverted ROIs.
    ///
    /// Zero-area ROIs pass: they are audited as never occluded.
    pub fn validate(&self) -> Result<()> {
        let r = &self.rect;
        if !r.is_finite() {
            return Err(anyhow!("roi coordinates must be finite"));
        }
        if !r.is_normalized() {
            return Err(anyhow!(
                "roi coordinates must lie in [0,1], got [{}, {}, {}, {}]",
                r.x1,
                r.y1,
                r.x2,
                r.y2
            ));
        }
        if r.x2 < r.x1 || r.y2 < r.y1 {
            return Err(anyhow!("roi edges are inverted"));
        }
        Ok(())
    }
}

impl Default for RegionOfInterest {
    fn default() -> Self {
        Self::full_frame()
    }
}

/// ROI as it appears in input documents: a rectangle or four clicked points.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoiInput {
    Rect([f64; 4]),
    Points { points: Vec<[f64; 2]> },
}

impl RoiInput {
    pub fn into_roi(self) -> Result<RegionOfInterest> {
        match self {
            RoiInput::Rect(coords) => {
                let roi = RegionOfInterest::user(Rect::from(coords));
                roi.validate()?;
                Ok(roi)
            }
            RoiInput::Points { points } => {
                let points: Vec<(f64, f64)> = points.iter().map(|p| (p[0], p[1])).collect();
                RegionOfInterest::from_points(&points)
            }
        }
    }
}

/// Parse `x1,y1,x2,y2` into a user ROI.
pub fn parse_roi_csv(value: &str) -> Result<RegionOfInterest> {
    let coords = value
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .map_err(|_| anyhow!("invalid roi coordinate '{}'", part.trim()))
        })
        .collect::<Result<Vec<f64>>>()?;
    let coords: [f64; 4] = coords
        .try_into()
        .map_err(|_| anyhow!("roi must have four comma-separated coordinates"))?;
    RoiInput::Rect(coords).into_roi()
}
