//! Geometry Kernel
//!
//! Points, placement orientations, and the Manhattan-segment primitives
//! shared by connectivity extraction and dot inference.

pub mod manhattan;
pub mod orientation;
pub mod place;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use manhattan::{calc_segments, hit_test_segment, ManhattanSegment};
pub use orientation::{Orientation, OrientationMatrix, Reflect, Rotation};
pub use place::{transform, Place};

/// Errors raised by the geometry kernel
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("Segment from {from} to {to} is neither horizontal nor vertical")]
    DiagonalSegment { from: Point, to: Point },

    #[error("Invalid orientation matrix: {0:?}")]
    InvalidMatrix(OrientationMatrix),
}

/// Two-dimensional point in schematic space.
///
/// Ordering is x-first, then y.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Origin, (0, 0)
    pub fn origin() -> Self {
        Self::default()
    }

    /// New point shifted by `other`, treated as a vector. Saturates at the `i64` range.
    pub fn shift(&self, other: &Point) -> Point {
        Point {
            x: self.x.saturating_add(other.x),
            y: self.y.saturating_add(other.y),
        }
    }

    /// Coordinate along direction `dir`
    pub fn coord(&self, dir: Dir) -> i64 {
        match dir {
            Dir::Horiz => self.x,
            Dir::Vert => self.y,
        }
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i64, i64)> for Point {
    fn from((x, y): (i64, i64)) -> Self {
        Self { x, y }
    }
}

/// Manhattan direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dir {
    Horiz,
    Vert,
}

impl Dir {
    /// Whichever direction we are, return the other one.
    pub fn other(self) -> Self {
        match self {
            Self::Horiz => Self::Vert,
            Self::Vert => Self::Horiz,
        }
    }
}

impl std::ops::Not for Dir {
    type Output = Self;
    fn not(self) -> Self::Output {
        self.other()
    }
}
