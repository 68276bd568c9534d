//! Circuit Model
//!
//! The electrical content extracted from a schematic: named signals,
//! instances, and the port-to-signal connections between them.
//!
//! These types are embedded as JSON metadata by exporters, so field names
//! and enum spellings are part of the format.

pub mod dots;
pub mod extractor;
pub mod graph;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{GeometryError, ManhattanSegment};
use crate::schematic::{ElementKind, PortKind, Wire};

pub use dots::{check_dots, infer_dots, report_dots, DotReport};
pub use extractor::{extract_circuit, extract_circuit_with, merge_wires, to_circuit_json, ExtractConfig};
pub use graph::CircuitGraph;

/// Errors produced while extracting a [Circuit] from a schematic.
/// Any of these aborts the whole extraction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("Invalid wire #{index}: {source}")]
    InvalidWire {
        index: usize,
        #[source]
        source: GeometryError,
    },

    #[error("Port {port} does not intersect with any existing signal")]
    UnresolvedPort { port: String },

    #[error("Port {port} intersects multiple signals: {}", .signals.join(", "))]
    AmbiguousPort { port: String, signals: Vec<String> },

    #[error("Port {port} on Instance {instance} does not intersect with any existing signal")]
    UnresolvedInstancePort { instance: String, port: String },

    #[error("Instance {instance} has element kind {kind}, which is not in the element library")]
    UnknownElement { instance: String, kind: ElementKind },

    #[error("Duplicate instance name: {0}")]
    DuplicateInstanceName(String),

    #[error("Port {port} would rename a signal to {port}, which already names another signal")]
    DuplicateSignalName { port: String },

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("JSON encoding error: {0}")]
    Json(String),
}

/// Derive the segments of every wire, failing on the first invalid one.
pub(crate) fn wire_segments(wires: &[Wire]) -> Result<Vec<Vec<ManhattanSegment>>, ExtractError> {
    wires
        .iter()
        .enumerate()
        .map(|(index, wire)| {
            wire.segments()
                .map_err(|source| ExtractError::InvalidWire { index, source })
        })
        .collect()
}

/// # Signal / Port Direction
/// Including the `INTERNAL` variant for internal signals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PortDir {
    #[default]
    Internal,
    Input,
    Output,
    Inout,
}

impl PortDir {
    pub fn is_port(&self) -> bool {
        !matches!(self, PortDir::Internal)
    }
}

impl From<PortKind> for PortDir {
    fn from(kind: PortKind) -> Self {
        match kind {
            PortKind::Input => PortDir::Input,
            PortKind::Output => PortDir::Output,
            PortKind::Inout => PortDir::Inout,
        }
    }
}

impl std::fmt::Display for PortDir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PortDir::Internal => "INTERNAL",
            PortDir::Input => "INPUT",
            PortDir::Output => "OUTPUT",
            PortDir::Inout => "INOUT",
        };
        write!(f, "{}", s)
    }
}

/// # Circuit Signal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    pub name: String,
    pub portdir: PortDir,
}

/// # Instance Connection
/// A (port, signal) pair, by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    pub portname: String,
    pub signame: String,
}

/// # Circuit Instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    pub name: String,
    /// Instance-of code string
    pub of: String,
    pub conns: Vec<Connection>,
}

impl Instance {
    /// Name of the signal connected to port `portname`, if any
    pub fn signal_on(&self, portname: &str) -> Option<&str> {
        self.conns
            .iter()
            .find(|c| c.portname == portname)
            .map(|c| c.signame.as_str())
    }
}

/// # Circuit
///
/// The circuit-level content of a schematic: signals, instances, and the
/// connections between them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Circuit {
    pub name: String,
    pub prelude: String,
    pub signals: Vec<Signal>,
    pub instances: Vec<Instance>,
}

impl Circuit {
    pub fn signal(&self, name: &str) -> Option<&Signal> {
        self.signals.iter().find(|s| s.name == name)
    }

    pub fn instance(&self, name: &str) -> Option<&Instance> {
        self.instances.iter().find(|i| i.name == name)
    }

    /// Signals annotated as circuit I/O
    pub fn ports(&self) -> impl Iterator<Item = &Signal> {
        self.signals.iter().filter(|s| s.portdir.is_port())
    }

    pub fn connection_count(&self) -> usize {
        self.instances.iter().map(|i| i.conns.len()).sum()
    }

    pub fn to_json(&self) -> Result<String, ExtractError> {
        serde_json::to_string(self).map_err(|e| ExtractError::Json(e.to_string()))
    }

    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portdir_serialization() {
        assert_eq!(serde_json::to_string(&PortDir::Internal).unwrap(), "\"INTERNAL\"");
        assert_eq!(serde_json::to_string(&PortDir::Inout).unwrap(), "\"INOUT\"");
        assert_eq!(PortDir::from(PortKind::Output), PortDir::Output);
        assert_eq!(PortDir::Input.to_string(), "INPUT");
    }

    #[test]
    fn test_circuit_json_field_names() {
        let circuit = Circuit {
            name: "inv".to_string(),
            prelude: String::new(),
            signals: vec![Signal { name: "out".to_string(), portdir: PortDir::Output }],
            instances: vec![Instance {
                name: "n0".to_string(),
                of: "Nmos()".to_string(),
                conns: vec![Connection { portname: "d".to_string(), signame: "out".to_string() }],
            }],
        };
        let json: serde_json::Value = serde_json::from_str(&circuit.to_json().unwrap()).unwrap();
        assert_eq!(json["signals"][0]["portdir"], "OUTPUT");
        assert_eq!(json["instances"][0]["conns"][0]["portname"], "d");
        assert_eq!(json["instances"][0]["conns"][0]["signame"], "out");
        assert_eq!(circuit.instance("n0").unwrap().signal_on("d"), Some("out"));
        assert_eq!(circuit.ports().count(), 1);
        assert_eq!(circuit.connection_count(), 1);
    }
}
