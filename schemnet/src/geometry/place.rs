//! Placement: location plus orientation

use serde::{Deserialize, Serialize};

use super::{Orientation, OrientationMatrix, Point};

/// Apply `mat` to `pt`, then translate by `loc`.
/// Computes `(a·x + c·y + loc.x, b·x + d·y + loc.y)`, saturating at the `i64` range.
pub fn transform(pt: &Point, mat: &OrientationMatrix, loc: &Point) -> Point {
    let apply = |m0: i64, m1: i64, offset: i64| {
        m0.saturating_mul(pt.x)
            .saturating_add(m1.saturating_mul(pt.y))
            .saturating_add(offset)
    };
    Point {
        x: apply(mat.a, mat.c, loc.x),
        y: apply(mat.b, mat.d, loc.y),
    }
}

/// # Place
///
/// Where a symbol is instantiated: its location and orientation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Place {
    pub loc: Point,
    pub orientation: Orientation,
}

impl Place {
    pub fn new(loc: Point, orientation: Orientation) -> Self {
        Self { loc, orientation }
    }

    /// Absolute location of symbol-local point `local`
    pub fn transform(&self, local: &Point) -> Point {
        transform(local, &self.orientation.to_matrix(), &self.loc)
    }
}
