//! Schemnet - schematic-to-circuit extraction
//!
//! This library derives an electrical netlist from raw schematic geometry:
//! placed instances, port annotations, and Manhattan-routed wires. It also
//! infers where junction dots belong and checks them against the dots a
//! schematic file carries.
//!
//! # Quick Start
//!
//! ```no_run
//! use schemnet::{ElementLibrary, ExtractOptions, SchemnetCore};
//! use std::path::Path;
//!
//! let library = ElementLibrary::default();
//! let result = SchemnetCore::extract_file(
//!     Path::new("inverter.sch.json"),
//!     &library,
//!     &ExtractOptions::default(),
//! ).unwrap();
//!
//! for signal in &result.circuit.signals {
//!     println!("{} ({})", signal.name, signal.portdir);
//! }
//! ```
//!
//! # Features
//!
//! - **Connectivity extraction**: wires merged into signals, ports and instance ports resolved
//! - **Dot inference**: tee-junction markers derived from geometry
//! - **Dot checking**: persisted dots compared against inferred ones
//! - **Connectivity graph**: per-signal and per-instance queries

pub mod circuit;
pub mod core;
pub mod geometry;
pub mod schematic;

// Re-export main types
pub use crate::core::{
    discover_schematic_files, ExtractOptions, ExtractionResult, ExtractionStats, SchemnetCore,
    SchemnetError,
};
pub use circuit::{
    check_dots, extract_circuit, infer_dots, Circuit, CircuitGraph, Connection, DotReport,
    ExtractError, PortDir, Signal,
};
pub use geometry::{GeometryError, ManhattanSegment, Orientation, OrientationMatrix, Place, Point};
pub use schematic::{ElementKind, ElementLibrary, PortKind, Schematic, Wire};

/// Parse a schematic snapshot file (convenience wrapper).
pub fn parse_schematic(path: &std::path::Path) -> Result<Schematic, SchemnetError> {
    SchemnetCore::load_schematic(path)
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        Circuit, ElementLibrary, ExtractOptions, ExtractionResult, ExtractionStats, PortDir, Schematic,
        SchemnetCore, SchemnetError,
    };
}
