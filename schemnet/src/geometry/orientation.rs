//! Orientations
//!
//! Reflection plus 90-degree rotation, and the 2x2 matrix form used to
//! place symbols. Matrix fields follow the SVG `matrix(a, b, c, d, x, y)`
//! column-major convention:
//!
//! ```text
//! | a c |
//! | b d |
//! ```

use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

use super::{Dir, GeometryError};

/// Enumerated rotations, in increments of 90 degrees
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    R0,
    R90,
    R180,
    R270,
}

impl Rotation {
    /// The next rotation, 90 degrees further
    pub fn next(self) -> Self {
        match self {
            Rotation::R0 => Rotation::R90,
            Rotation::R90 => Rotation::R180,
            Rotation::R180 => Rotation::R270,
            Rotation::R270 => Rotation::R0,
        }
    }

    /// The previous rotation, 90 degrees back
    pub fn prev(self) -> Self {
        match self {
            Rotation::R0 => Rotation::R270,
            Rotation::R90 => Rotation::R0,
            Rotation::R180 => Rotation::R90,
            Rotation::R270 => Rotation::R180,
        }
    }
}

/// # Orientation
///
/// Reflection is vertical (across the x axis) and is applied *before* rotation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Orientation {
    #[serde(default)]
    pub reflected: bool,
    #[serde(default)]
    pub rotation: Rotation,
}

impl Orientation {
    pub fn new(reflected: bool, rotation: Rotation) -> Self {
        Self { reflected, rotation }
    }

    /// All eight legal orientations
    pub fn all() -> [Orientation; 8] {
        use Rotation::*;
        [
            Self::new(false, R0),
            Self::new(false, R90),
            Self::new(false, R180),
            Self::new(false, R270),
            Self::new(true, R0),
            Self::new(true, R90),
            Self::new(true, R180),
            Self::new(true, R270),
        ]
    }

    pub fn to_matrix(&self) -> OrientationMatrix {
        OrientationMatrix::from(*self)
    }

    /// Rotated one further 90 degree increment
    pub fn rotated(&self) -> Self {
        Self::new(self.reflected, self.rotation.next())
    }

    /// Flipped in direction `dir`.
    /// Flips always toggle the vertical reflection; horizontal flips add two rotations.
    pub fn flipped(&self, dir: Dir) -> Self {
        let rotation = match dir {
            Dir::Vert => self.rotation,
            Dir::Horiz => self.rotation.next().next(),
        };
        Self::new(!self.reflected, rotation)
    }
}

/// 2x2 matrix representation of an [Orientation]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrientationMatrix {
    pub a: i64,
    pub b: i64,
    pub c: i64,
    pub d: i64,
}

impl OrientationMatrix {
    pub fn new(a: i64, b: i64, c: i64, d: i64) -> Self {
        Self { a, b, c, d }
    }

    pub fn identity() -> Self {
        Self::new(1, 0, 0, 1)
    }
}

impl Default for OrientationMatrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<Orientation> for OrientationMatrix {
    fn from(orientation: Orientation) -> Self {
        use Rotation::*;
        match (orientation.reflected, orientation.rotation) {
            (false, R0) => Self::identity(),
            (false, R90) => Self::new(0, -1, 1, 0),
            (false, R180) => Self::new(-1, 0, 0, -1),
            (false, R270) => Self::new(0, 1, -1, 0),
            (true, R0) => Self::new(1, 0, 0, -1),
            (true, R90) => Self::new(0, 1, 1, 0),
            (true, R180) => Self::new(-1, 0, 0, 1),
            (true, R270) => Self::new(0, -1, -1, 0),
        }
    }
}

impl TryFrom<OrientationMatrix> for Orientation {
    type Error = GeometryError;

    /// Only the eight matrices produced by `From<Orientation>` are valid.
    fn try_from(m: OrientationMatrix) -> Result<Self, Self::Error> {
        use Rotation::*;
        let orientation = match (m.a, m.b, m.c, m.d) {
            (1, 0, 0, 1) => Orientation::new(false, R0),
            (0, -1, 1, 0) => Orientation::new(false, R90),
            (-1, 0, 0, -1) => Orientation::new(false, R180),
            (0, 1, -1, 0) => Orientation::new(false, R270),
            (1, 0, 0, -1) => Orientation::new(true, R0),
            (0, 1, 1, 0) => Orientation::new(true, R90),
            (-1, 0, 0, 1) => Orientation::new(true, R180),
            (0, -1, -1, 0) => Orientation::new(true, R270),
            _ => return Err(GeometryError::InvalidMatrix(m)),
        };
        Ok(orientation)
    }
}

/// # Reflection State
///
/// For elements which can be flipped horizontally and/or vertically,
/// but cannot be rotated. Primarily text labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reflect {
    pub horiz: bool,
    pub vert: bool,
}

impl Reflect {
    pub fn to_orientation(&self) -> Orientation {
        match (self.horiz, self.vert) {
            (true, true) => Orientation::new(false, Rotation::R180),
            (false, true) => Orientation::new(true, Rotation::R0),
            (true, false) => Orientation::new(true, Rotation::R180),
            (false, false) => Orientation::default(),
        }
    }

    pub fn to_matrix(&self) -> OrientationMatrix {
        self.to_orientation().to_matrix()
    }
}
