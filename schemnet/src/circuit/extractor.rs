//! Circuit Extractor
//!
//! Converts a [Schematic] to the [Circuit] it represents.
//!
//! Extraction runs in three steps over a read-only snapshot:
//!
//! 1. Merge wires into signals: any wire with a vertex landing on another
//!    wire joins that wire's signal, transitively.
//! 2. Resolve each schematic port onto exactly one signal, which takes the
//!    port's name and direction.
//! 3. Resolve each instance port onto a signal, recording a connection.
//!
//! Any failure aborts the whole conversion; no partial circuit is returned.
//! Wire merging compares every wire pair, so cost grows quadratically with
//! wire count. There is no spatial index.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use super::{wire_segments, Circuit, Connection, ExtractError, Instance, PortDir, Signal};
use crate::geometry::{ManhattanSegment, Point};
use crate::schematic::{ElementLibrary, Schematic, Wire};

/// Extraction settings
#[derive(Debug, Clone, Default)]
pub struct ExtractConfig {
    /// Let a later instance silently replace an earlier one of the same name,
    /// instead of failing with [ExtractError::DuplicateInstanceName].
    pub allow_duplicate_instances: bool,
}

/// Extract the [Circuit] from a [Schematic], with default settings.
pub fn extract_circuit(sch: &Schematic, library: &ElementLibrary) -> Result<Circuit, ExtractError> {
    extract_circuit_with(sch, library, &ExtractConfig::default())
}

/// Extract the [Circuit] from a [Schematic].
pub fn extract_circuit_with(
    sch: &Schematic,
    library: &ElementLibrary,
    config: &ExtractConfig,
) -> Result<Circuit, ExtractError> {
    SchematicToCircuit::new(sch, library, config)?.convert()
}

/// Extract the circuit and encode it as JSON.
pub fn to_circuit_json(sch: &Schematic, library: &ElementLibrary) -> Result<String, ExtractError> {
    extract_circuit(sch, library)?.to_json()
}

/// Group wires into electrically-connected sets.
///
/// Returns wire indices per group, in group-creation order. Each group is
/// seeded by the lowest-indexed wire not yet assigned.
pub fn merge_wires(wires: &[Wire]) -> Result<Vec<Vec<usize>>, ExtractError> {
    let conv = converter_wires(wires)?;
    group_wires(&conv)
}

/// Conversion-time wrapper around a [Wire] and its segments
struct ConverterWire<'a> {
    points: &'a [Point],
    segments: Vec<ManhattanSegment>,
}

impl ConverterWire<'_> {
    fn intersects_point(&self, pt: &Point) -> bool {
        self.segments.iter().any(|seg| seg.contains(pt))
    }

    /// Whether either wire has a vertex landing on the other
    fn intersects_wire(&self, other: &ConverterWire) -> bool {
        self.points.iter().any(|pt| other.intersects_point(pt))
            || other.points.iter().any(|pt| self.intersects_point(pt))
    }
}

fn converter_wires(wires: &[Wire]) -> Result<Vec<ConverterWire<'_>>, ExtractError> {
    let segments = wire_segments(wires)?;
    Ok(wires
        .iter()
        .zip(segments)
        .map(|(wire, segments)| ConverterWire {
            points: &wire.points,
            segments,
        })
        .collect())
}

/// Worklist merge over the implicit wire-touch graph.
fn group_wires(wires: &[ConverterWire]) -> Result<Vec<Vec<usize>>, ExtractError> {
    // Unassigned wires, keyed by index so the lowest always seeds next
    let mut pool: BTreeMap<usize, &ConverterWire> = wires.iter().enumerate().collect();
    let mut groups = Vec::new();

    while let Some((seed, _)) = pool.pop_first() {
        let mut members = vec![seed];
        let mut pending = vec![seed];

        while let Some(current) = pending.pop() {
            let wire = wires
                .get(current)
                .ok_or_else(|| ExtractError::Internal(format!("no wire #{}", current)))?;
            let touching: Vec<usize> = pool
                .iter()
                .filter(|(_, other)| wire.intersects_wire(other))
                .map(|(&idx, _)| idx)
                .collect();
            for idx in touching {
                if pool.remove(&idx).is_none() {
                    return Err(ExtractError::Internal(format!("wire #{} left the pool twice", idx)));
                }
                members.push(idx);
                pending.push(idx);
            }
        }
        groups.push(members);
    }
    Ok(groups)
}

/// # Intra-Conversion Signal
/// The result [Signal], plus the indices of the wires which constitute it.
struct ConverterSignal {
    signal: Signal,
    wires: Vec<usize>,
}

/// Schematic to Circuit conversion state
struct SchematicToCircuit<'a> {
    sch: &'a Schematic,
    library: &'a ElementLibrary,
    config: &'a ExtractConfig,
    wires: Vec<ConverterWire<'a>>,
    signals: Vec<ConverterSignal>,
    /// Signal name -> index into `signals`
    signal_keys: HashMap<String, usize>,
    instances: Vec<Instance>,
    /// Instance name -> index into `instances`
    instance_keys: HashMap<String, usize>,
}

impl<'a> SchematicToCircuit<'a> {
    fn new(
        sch: &'a Schematic,
        library: &'a ElementLibrary,
        config: &'a ExtractConfig,
    ) -> Result<Self, ExtractError> {
        Ok(Self {
            sch,
            library,
            config,
            wires: converter_wires(&sch.wires)?,
            signals: Vec::new(),
            signal_keys: HashMap::new(),
            instances: Vec::new(),
            instance_keys: HashMap::new(),
        })
    }

    fn convert(mut self) -> Result<Circuit, ExtractError> {
        self.collect_signals()?;
        self.collect_ports()?;
        self.collect_instances()?;
        Ok(self.make_circuit())
    }

    /// Collect internal state into a [Circuit].
    /// Only valid after every `collect` step has succeeded.
    fn make_circuit(self) -> Circuit {
        Circuit {
            name: self.sch.name.clone(),
            prelude: self.sch.prelude.clone(),
            signals: self.signals.into_iter().map(|s| s.signal).collect(),
            instances: self.instances,
        }
    }

    fn collect_signals(&mut self) -> Result<(), ExtractError> {
        for wires in group_wires(&self.wires)? {
            let name = self.signals.len().to_string();
            self.signal_keys.insert(name.clone(), self.signals.len());
            self.signals.push(ConverterSignal {
                signal: Signal {
                    name,
                    portdir: PortDir::Internal,
                },
                wires,
            });
        }
        debug!(
            "Merged {} wires into {} signals",
            self.wires.len(),
            self.signals.len()
        );
        Ok(())
    }

    fn collect_ports(&mut self) -> Result<(), ExtractError> {
        let sch = self.sch;
        for port in &sch.ports {
            let loc = port.location();
            let hits = self.intersecting_signals(&loc);
            let idx = match hits.as_slice() {
                [] => {
                    return Err(ExtractError::UnresolvedPort {
                        port: port.name.clone(),
                    })
                }
                [idx] => *idx,
                _ => {
                    return Err(ExtractError::AmbiguousPort {
                        port: port.name.clone(),
                        signals: hits
                            .iter()
                            .map(|&i| self.signals[i].signal.name.clone())
                            .collect(),
                    })
                }
            };

            if let Some(&other) = self.signal_keys.get(&port.name) {
                if other != idx {
                    // Only port-named signals can clash. A placeholder holding
                    // the name moves to a fresh counter value instead.
                    if self.signals[other].signal.portdir.is_port() {
                        return Err(ExtractError::DuplicateSignalName {
                            port: port.name.clone(),
                        });
                    }
                    self.rename_placeholder(other)?;
                }
            }

            // Rename the signal, replacing its key
            let signal = &mut self.signals[idx].signal;
            if self.signal_keys.remove(&signal.name).is_none() {
                return Err(ExtractError::Internal(format!(
                    "no key for signal {}",
                    signal.name
                )));
            }
            signal.name = port.name.clone();
            signal.portdir = PortDir::from(port.kind);
            self.signal_keys.insert(signal.name.clone(), idx);
        }
        debug!("Resolved {} ports", sch.ports.len());
        Ok(())
    }

    /// Move internal signal `idx` to the first unused counter name, counting up from the signal count.
    fn rename_placeholder(&mut self, idx: usize) -> Result<(), ExtractError> {
        let fresh = (self.signals.len()..)
            .map(|n| n.to_string())
            .find(|name| !self.signal_keys.contains_key(name))
            .ok_or_else(|| ExtractError::Internal("signal counter exhausted".to_string()))?;

        let signal = &mut self.signals[idx].signal;
        if self.signal_keys.remove(&signal.name).is_none() {
            return Err(ExtractError::Internal(format!(
                "no key for signal {}",
                signal.name
            )));
        }
        debug!("Renaming internal signal {} to {}", signal.name, fresh);
        signal.name = fresh.clone();
        self.signal_keys.insert(fresh, idx);
        Ok(())
    }

    fn collect_instances(&mut self) -> Result<(), ExtractError> {
        let sch = self.sch;
        for sch_instance in &sch.instances {
            let ports = self.library.instance_ports(sch_instance).ok_or_else(|| {
                ExtractError::UnknownElement {
                    instance: sch_instance.name.clone(),
                    kind: sch_instance.kind,
                }
            })?;

            let mut conns = Vec::with_capacity(ports.len());
            for (portname, loc) in ports {
                let idx = self.intersecting_signals(&loc).first().copied().ok_or_else(|| {
                    ExtractError::UnresolvedInstancePort {
                        instance: sch_instance.name.clone(),
                        port: portname.to_string(),
                    }
                })?;
                conns.push(Connection {
                    portname: portname.to_string(),
                    signame: self.signals[idx].signal.name.clone(),
                });
            }

            let instance = Instance {
                name: sch_instance.name.clone(),
                of: sch_instance.of.clone(),
                conns,
            };
            match self.instance_keys.get(&instance.name).copied() {
                Some(_) if !self.config.allow_duplicate_instances => {
                    return Err(ExtractError::DuplicateInstanceName(instance.name));
                }
                Some(existing) => self.instances[existing] = instance,
                None => {
                    self.instance_keys.insert(instance.name.clone(), self.instances.len());
                    self.instances.push(instance);
                }
            }
        }
        debug!(
            "Resolved {} instances with {} connections",
            self.instances.len(),
            self.instances.iter().map(|i| i.conns.len()).sum::<usize>()
        );
        Ok(())
    }

    /// Indices of every signal with a wire intersecting `loc`, in creation order.
    /// Only valid after `collect_signals`.
    fn intersecting_signals(&self, loc: &Point) -> Vec<usize> {
        self.signals
            .iter()
            .enumerate()
            .filter(|(_, sig)| sig.wires.iter().any(|&w| self.wires[w].intersects_point(loc)))
            .map(|(idx, _)| idx)
            .collect()
    }
}
