//! Axis-aligned rectangle geometry in normalized frame coordinates.
//!
//! Every coordinate lives in the unit frame `[0,1]` (origin top-left).
//! Detector boxes and the region of interest share this space, so occlusion is
//! computed without knowing the source resolution.
//!
//! Union area is an approximation: overlapping intersections are folded into
//! their bounding box rather than unioned exactly. The overcount is part of the
//! reported numbers; do not swap in an exact union here.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle `(x1, y1, x2, y2)`.
///
/// Serialized as a four-element array `[x1, y1, x2, y2]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct Rect {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Rect {
    /// The whole frame.
    pub const UNIT: Rect = Rect::new(0.0, 0.0, 1.0, 1.0);

    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    /// Area, or 0 for degenerate and inverted rectangles.
    pub fn area(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.width() * self.height()
        }
    }

    /// True when the rectangle encloses no area.
    pub fn is_empty(&self) -> bool {
        !(self.x2 > self.x1 && self.y2 > self.y1)
    }

    pub fn center(&self) -> (f64, f64) {
        ((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }

    pub fn is_finite(&self) -> bool {
        self.x1.is_finite() && self.y1.is_finite() && self.x2.is_finite() && self.y2.is_finite()
    }

    /// True when all four coordinates lie inside `[0,1]`.
    pub fn is_normalized(&self) -> bool {
        [self.x1, self.y1, self.x2, self.y2]
            .iter()
            .all(|v| (0.0..=1.0).contains(v))
    }

    /// Overlap of two rectangles. `None` when the overlap has no area.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let clipped = Rect::new(
            self.x1.max(other.x1),
            self.y1.max(other.y1),
            self.x2.min(other.x2),
            self.y2.min(other.y2),
        );
        if clipped.is_empty() {
            None
        } else {
            Some(clipped)
        }
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.intersection(other).is_some()
    }

    /// Smallest rectangle containing both.
    pub fn bounding_union(&self, other: &Rect) -> Rect {
        Rect::new(
            self.x1.min(other.x1),
            self.y1.min(other.y1),
            self.x2.max(other.x2),
            self.y2.max(other.y2),
        )
    }

    /// Intersection over union, 0 when either side has no area.
    pub fn iou(&self, other: &Rect) -> f64 {
        let inter = self.intersection(other).map_or(0.0, |r| r.area());
        let union = self.area() + other.area() - inter;
        if union <= 0.0 {
            0.0
        } else {
            inter / union
        }
    }

    /// Axis-aligned bounding rectangle of a point set.
    pub fn bounding_points(points: &[(f64, f64)]) -> Option<Rect> {
        let (&(x, y), rest) = points.split_first()?;
        let mut rect = Rect::new(x, y, x, y);
        for &(px, py) in rest {
            rect.x1 = rect.x1.min(px);
            rect.y1 = rect.y1.min(py);
            rect.x2 = rect.x2.max(px);
            rect.y2 = rect.y2.max(py);
        }
        Some(rect)
    }
}

impl From<[f64; 4]> for Rect {
    fn from(v: [f64; 4]) -> Self {
        Rect::new(v[0], v[1], v[2], v[3])
    }
}

impl From<Rect> for [f64; 4] {
    fn from(r: Rect) -> Self {
        [r.x1, r.y1, r.x2, r.y2]
    }
}

/// Greedy bounding-box merge.
///
/// Each part is folded into the first group it overlaps, growing that group to
/// the bounding box of both; otherwise it opens a new group. Groups are never
/// re-merged with each other after growing.
pub fn merge_overlapping<I>(parts: I) -> Vec<Rect>
where
    I: IntoIterator<Item = Rect>,
{
    let mut groups: Vec<Rect> = Vec::new();
    for part in parts {
        match groups.iter_mut().find(|group| group.overlaps(&part)) {
            Some(group) => *group = group.bounding_union(&part),
            None => groups.push(part),
        }
    }
    groups
}

/// Percentage of `roi` covered by `boxes`, in `[0,100]`.
///
/// A zero-area ROI is never occluded.
pub fn occlusion_pct(roi: &Rect, boxes: &[Rect]) -> f64 {
    let roi_area = roi.area();
    if roi_area <= 0.0 {
        return 0.0;
    }
    let parts = boxes.iter().filter_map(|b| roi.intersection(b));
    let covered: f64 = merge_overlapping(parts).iter().map(Rect::area).sum();
    (covered / roi_area * 100.0).clamp(0.0, 100.0)
}
