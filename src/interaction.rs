// SPDX-FileCopyrightText: © 2025 Claudio Cicconetti <c.cicconetti@iit.cnr.it>
// SPDX-License-Identifier: MIT

/// Unordered pairs of logical qubits that must interact.
pub type Interactions = Vec<(usize, usize)>;

/// Each node holds the index of the logical qubit, edges carry no weight.
pub type Graph = petgraph::Graph<u32, (), petgraph::Undirected, u32>;

/// Undirected graph of the interactions between logical qubits, together
/// with its flattened adjacency matrix.
#[derive(Debug, Clone)]
pub struct InteractionGraph {
    graph: Graph,
    /// Row-major N x N matrix, 1 if two logical qubits interact.
    matrix: Vec<u8>,
}

impl InteractionGraph {
    /// Build the interaction graph over `num_qubits` logical qubits.
    ///
    /// Repeated pairs, in either order, result in a single edge.
    /// Return an error if a pair refers to a qubit out of range or if the
    /// two qubits of a pair are the same.
    pub fn from_pairs(num_qubits: usize, pairs: &[(usize, usize)]) -> anyhow::Result<Self> {
        let mut graph = Graph::with_capacity(num_qubits, pairs.len());
        for ndx in 0..num_qubits {
            graph.add_node(ndx as u32);
        }

        let mut matrix = vec![0; num_qubits * num_qubits];
        for (u, v) in pairs {
            anyhow::ensure!(
                *u < num_qubits && *v < num_qubits,
                "interaction ({},{}) out of range with {} logical qubits",
                u,
                v,
                num_qubits
            );
            anyhow::ensure!(u != v, "self interaction on logical qubit {}", u);
            if matrix[u * num_qubits + v] == 0 {
                graph.add_edge((*u as u32).into(), (*v as u32).into(), ());
                matrix[u * num_qubits + v] = 1;
                matrix[v * num_qubits + u] = 1;
            }
        }

        Ok(Self { graph, matrix })
    }

    /// Build an interaction graph with no interactions.
    pub fn empty(num_qubits: usize) -> Self {
        let mut graph = Graph::with_capacity(num_qubits, 0);
        for ndx in 0..num_qubits {
            graph.add_node(ndx as u32);
        }
        Self {
            graph,
            matrix: vec![0; num_qubits * num_qubits],
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Number of logical qubits.
    pub fn num_qubits(&self) -> usize {
        self.graph.node_count()
    }

    pub fn num_interactions(&self) -> usize {
        self.graph.edge_count()
    }

    /// Return the flattened, row-major adjacency matrix.
    pub fn matrix(&self) -> &[u8] {
        &self.matrix
    }

    /// Return the interactions as pairs (u, v) with u < v, sorted.
    pub fn pairs(&self) -> Interactions {
        let mut ret = self
            .graph
            .raw_edges()
            .iter()
            .map(|e| {
                let u = e.source().index();
                let v = e.target().index();
                (u.min(v), u.max(v))
            })
            .collect::<Vec<_>>();
        ret.sort_unstable();
        ret
    }
}

impl PartialEq for InteractionGraph {
    fn eq(&self, other: &Self) -> bool {
        self.num_qubits() == other.num_qubits() && self.matrix == other.matrix
    }
}

impl Eq for InteractionGraph {}
