//! Circuit Connectivity Graph
//!
//! A petgraph view of an extracted [Circuit]: instance nodes and signal
//! nodes, with one edge per connection, directed instance -> signal.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::HashMap;

use super::{Circuit, ExtractError, Instance, Signal};

/// Node type in the circuit graph
#[derive(Debug, Clone)]
pub enum CircuitNode {
    Instance(Instance),
    Signal(Signal),
}

impl CircuitNode {
    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            CircuitNode::Instance(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_signal(&self) -> Option<&Signal> {
        match self {
            CircuitNode::Signal(s) => Some(s),
            _ => None,
        }
    }
}

/// Edge type: the instance port making the connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircuitEdge {
    pub portname: String,
}

#[derive(Debug, Clone)]
pub struct CircuitGraph {
    graph: DiGraph<CircuitNode, CircuitEdge>,
    /// Instance name -> node index
    instance_indices: HashMap<String, NodeIndex>,
    /// Signal name -> node index
    signal_indices: HashMap<String, NodeIndex>,
}

impl CircuitGraph {
    /// Build the graph for `circuit`.
    /// Fails if a connection names a signal the circuit does not contain.
    pub fn from_circuit(circuit: &Circuit) -> Result<Self, ExtractError> {
        let mut graph = DiGraph::new();
        let mut signal_indices = HashMap::new();
        let mut instance_indices = HashMap::new();

        for signal in &circuit.signals {
            let idx = graph.add_node(CircuitNode::Signal(signal.clone()));
            signal_indices.insert(signal.name.clone(), idx);
        }

        for instance in &circuit.instances {
            let inst_idx = graph.add_node(CircuitNode::Instance(instance.clone()));
            instance_indices.insert(instance.name.clone(), inst_idx);
            for conn in &instance.conns {
                let &sig_idx = signal_indices.get(&conn.signame).ok_or_else(|| {
                    ExtractError::Internal(format!(
                        "Instance {} connects to unknown signal {}",
                        instance.name, conn.signame
                    ))
                })?;
                graph.add_edge(
                    inst_idx,
                    sig_idx,
                    CircuitEdge {
                        portname: conn.portname.clone(),
                    },
                );
            }
        }

        Ok(Self {
            graph,
            instance_indices,
            signal_indices,
        })
    }

    pub fn signal_count(&self) -> usize {
        self.signal_indices.len()
    }

    pub fn instance_count(&self) -> usize {
        self.instance_indices.len()
    }

    pub fn signals(&self) -> impl Iterator<Item = &Signal> {
        self.graph.node_weights().filter_map(|n| n.as_signal())
    }

    /// `(instance, port)` pairs connected to signal `name`, in connection order
    pub fn instances_on(&self, name: &str) -> Vec<(&Instance, &str)> {
        let Some(&sig_idx) = self.signal_indices.get(name) else {
            return Vec::new();
        };

        let mut found: Vec<_> = self
            .graph
            .edges_directed(sig_idx, Direction::Incoming)
            .filter_map(|edge| {
                self.graph
                    .node_weight(edge.source())
                    .and_then(|n| n.as_instance())
                    .map(|inst| (edge.id(), inst, edge.weight().portname.as_str()))
            })
            .collect();
        // petgraph walks edges newest-first
        found.sort_by_key(|(id, _, _)| *id);
        found.into_iter().map(|(_, inst, port)| (inst, port)).collect()
    }

    /// Names of the signals instance `name` connects to, deduplicated, in port order
    pub fn signals_of(&self, name: &str) -> Vec<&str> {
        let Some(&inst_idx) = self.instance_indices.get(name) else {
            return Vec::new();
        };

        let mut edges: Vec<_> = self
            .graph
            .edges_directed(inst_idx, Direction::Outgoing)
            .map(|edge| (edge.id(), edge.target()))
            .collect();
        edges.sort_by_key(|(id, _)| *id);

        let mut names: Vec<&str> = Vec::new();
        for (_, sig_idx) in edges {
            let Some(signal) = self.graph.node_weight(sig_idx).and_then(|n| n.as_signal()) else {
                continue;
            };
            if !names.contains(&signal.name.as_str()) {
                names.push(signal.name.as_str());
            }
        }
        names
    }

    /// Internal signals reaching fewer than two instance ports.
    /// These are legal but usually a drawing mistake.
    pub fn floating_signals(&self) -> Vec<&Signal> {
        self.signal_indices
            .values()
            .filter_map(|&idx| {
                let signal = self.graph.node_weight(idx)?.as_signal()?;
                let degree = self.graph.edges_directed(idx, Direction::Incoming).count();
                (!signal.portdir.is_port() && degree < 2).then_some((idx, signal))
            })
            .collect::<std::collections::BTreeMap<_, _>>()
            .into_values()
            .collect()
    }
}
