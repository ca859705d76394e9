// SPDX-FileCopyrightText: © 2025 Claudio Cicconetti <c.cicconetti@iit.cnr.it>
// SPDX-License-Identifier: MIT

use crate::generators::circuit::CircuitGeneratorConf;
use crate::generators::interaction::InteractionGeneratorConf;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum TopologyConf {
    /// Rectangular grid.
    Grid(crate::topology::GridParams),
    /// Qubits connected in a line.
    Line(u32),
    /// Explicit list of connections.
    Edges { num_nodes: u32, edges: Vec<(u32, u32)> },
}

impl Default for TopologyConf {
    fn default() -> Self {
        Self::Grid(crate::topology::GridParams::default())
    }
}

impl std::fmt::Display for TopologyConf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TopologyConf::Grid(params) => write!(f, "grid-{}x{}", params.rows, params.cols),
            TopologyConf::Line(num_nodes) => write!(f, "line-{}", num_nodes),
            TopologyConf::Edges { num_nodes, edges } => {
                write!(f, "edges-{}-{}", num_nodes, edges.len())
            }
        }
    }
}

impl TopologyConf {
    pub fn build(&self) -> anyhow::Result<crate::topology::Topology> {
        match self {
            TopologyConf::Grid(params) => crate::topology::Topology::grid(params.clone()),
            TopologyConf::Line(num_nodes) => crate::topology::Topology::line(*num_nodes),
            TopologyConf::Edges { num_nodes, edges } => {
                crate::topology::Topology::from_edges(*num_nodes, edges)
            }
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct UserConfig {
    /// The physical qubits and their connections.
    pub topology: TopologyConf,
    /// How interaction graphs are drawn at every episode.
    pub interaction_generator: InteractionGeneratorConf,
    /// How the circuit of every episode is drawn.
    pub circuit_generator: CircuitGeneratorConf,
    /// The maximum number of gates in a circuit.
    pub max_gates: usize,
    /// The policy used to select actions.
    pub policy: crate::policy::Policy,
    /// The number of episodes.
    pub episodes: u64,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            topology: TopologyConf::default(),
            interaction_generator: InteractionGeneratorConf::default(),
            circuit_generator: CircuitGeneratorConf::default(),
            max_gates: 50,
            policy: crate::policy::Policy::default(),
            episodes: 100,
        }
    }
}

impl UserConfig {
    pub fn header() -> String {
        String::from("topology,interaction_generator,circuit_generator,max_gates,policy,episodes")
    }
    pub fn to_csv(&self) -> String {
        format!(
            "{},{},{},{},{},{}",
            self.topology,
            self.interaction_generator,
            self.circuit_generator,
            self.max_gates,
            self.policy,
            self.episodes
        )
    }
}
