//! Manhattan Segments
//!
//! Wires are drawn as axis-aligned polylines. Each consecutive point pair
//! becomes a [ManhattanSegment], which is what connectivity hit-testing runs on.

use serde::{Deserialize, Serialize};

use super::{Dir, GeometryError, Point};

/// # Manhattan Segment
///
/// Runs in direction `dir` at constant coordinate `at`, spanning `start..=end`.
/// Always `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ManhattanSegment {
    pub dir: Dir,
    pub at: i64,
    pub start: i64,
    pub end: i64,
}

impl ManhattanSegment {
    /// Segment between two points, or an error if they share no coordinate.
    /// Equal-x is tested first, so a zero-length segment comes out vertical.
    pub fn between(p: &Point, q: &Point) -> Result<Self, GeometryError> {
        if p.x == q.x {
            Ok(Self {
                dir: Dir::Vert,
                at: p.x,
                start: p.y.min(q.y),
                end: p.y.max(q.y),
            })
        } else if p.y == q.y {
            Ok(Self {
                dir: Dir::Horiz,
                at: p.y,
                start: p.x.min(q.x),
                end: p.x.max(q.x),
            })
        } else {
            Err(GeometryError::DiagonalSegment { from: *p, to: *q })
        }
    }

    /// Exact (zero-tolerance) hit test
    pub fn contains(&self, pt: &Point) -> bool {
        hit_test_segment(self, pt, 0)
    }
}

/// Extract Manhattan segments from a list of points.
/// Fails on the first consecutive pair that is neither horizontal nor vertical.
pub fn calc_segments(points: &[Point]) -> Result<Vec<ManhattanSegment>, GeometryError> {
    points
        .windows(2)
        .map(|pair| ManhattanSegment::between(&pair[0], &pair[1]))
        .collect()
}

/// Whether `pt` lands on `seg`, within tolerance `tol`.
///
/// Zero tolerance is used for connectivity; nonzero values are for pointer hit-testing.
pub fn hit_test_segment(seg: &ManhattanSegment, pt: &Point, tol: i64) -> bool {
    let (across, along) = match seg.dir {
        Dir::Horiz => (pt.y, pt.x),
        Dir::Vert => (pt.x, pt.y),
    };
    let within = u64::try_from(tol).map_or(false, |tol| across.abs_diff(seg.at) <= tol);
    within && along >= seg.start && along <= seg.end
}
