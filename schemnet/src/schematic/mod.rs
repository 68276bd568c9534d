//! Schematic Data Model
//!
//! The raw, editor-side content of a schematic: placed instances, port
//! annotations, wires and junction dots. This is the read-only snapshot
//! handed to circuit extraction and dot inference.
//!
//! Snapshots are exchanged as JSON. Collections default to empty and
//! enum variants are encoded by name, e.g.
//!
//! ```json
//! {
//!   "name": "inv",
//!   "instances": [{ "name": "n0", "of": "Nmos()", "kind": "Nmos",
//!                   "loc": { "x": 100, "y": 100 },
//!                   "orientation": { "reflected": false, "rotation": "R0" } }],
//!   "ports": [{ "name": "out", "kind": "Output", "loc": { "x": 100, "y": 100 } }],
//!   "wires": [{ "points": [{ "x": 0, "y": 100 }, { "x": 100, "y": 100 }] }]
//! }
//! ```

pub mod library;

use serde::{Deserialize, Serialize};

use crate::geometry::{calc_segments, hit_test_segment, GeometryError, ManhattanSegment};
use crate::geometry::{Orientation, Place, Point};

pub use library::{Element, ElementKind, ElementLibrary, ElementPort, PortElement, PortKind};

/// # Wire
///
/// An ordered, Manhattan-routed polyline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wire {
    pub points: Vec<Point>,
}

impl Wire {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Wire from raw `(x, y)` coordinate pairs
    pub fn from_coords(coords: &[(i64, i64)]) -> Self {
        Self::new(coords.iter().map(|&c| Point::from(c)).collect())
    }

    pub fn segments(&self) -> Result<Vec<ManhattanSegment>, GeometryError> {
        calc_segments(&self.points)
    }

    pub fn first(&self) -> Option<&Point> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&Point> {
        self.points.last()
    }

    /// Pointer-style hit test against every segment, within tolerance `tol`.
    /// Wires which do not decompose into segments never hit.
    pub fn hit_test(&self, pt: &Point, tol: i64) -> bool {
        match self.segments() {
            Ok(segments) => segments.iter().any(|seg| hit_test_segment(seg, pt, tol)),
            Err(_) => false,
        }
    }
}

/// # Schematic Instance
///
/// A placed [Element], e.g. a transistor or resistor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    pub name: String,
    /// Instance-of code string, e.g. `Nmos(w=1)`
    pub of: String,
    pub kind: ElementKind,
    pub loc: Point,
    #[serde(default)]
    pub orientation: Orientation,
}

impl Instance {
    pub fn place(&self) -> Place {
        Place::new(self.loc, self.orientation)
    }
}

/// # Schematic Port
///
/// Net annotation marking a signal as an I/O of the circuit.
/// Its single connection point is its own origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    pub name: String,
    pub kind: PortKind,
    pub loc: Point,
    #[serde(default)]
    pub orientation: Orientation,
}

impl Port {
    pub fn place(&self) -> Place {
        Place::new(self.loc, self.orientation)
    }

    /// Absolute connection location
    pub fn location(&self) -> Point {
        self.place().transform(&Point::origin())
    }
}

/// # Schematic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schematic {
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_size")]
    pub size: Point,
    #[serde(default)]
    pub prelude: String,
    #[serde(default)]
    pub instances: Vec<Instance>,
    #[serde(default)]
    pub ports: Vec<Port>,
    #[serde(default)]
    pub wires: Vec<Wire>,
    #[serde(default)]
    pub dots: Vec<Point>,
}

fn default_size() -> Point {
    Point::new(1600, 800)
}

impl Default for Schematic {
    fn default() -> Self {
        Self {
            name: String::new(),
            size: default_size(),
            prelude: String::new(),
            instances: Vec::new(),
            ports: Vec::new(),
            wires: Vec::new(),
            dots: Vec::new(),
        }
    }
}

impl Schematic {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
