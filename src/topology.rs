// SPDX-FileCopyrightText: © 2025 Claudio Cicconetti <c.cicconetti@iit.cnr.it>
// SPDX-License-Identifier: MIT

/// Parameters of a rectangular grid of physical qubits.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct GridParams {
    /// Number of rows.
    pub rows: u32,
    /// Number of qubits in each row.
    pub cols: u32,
}

impl Default for GridParams {
    fn default() -> Self {
        Self { rows: 3, cols: 3 }
    }
}

impl GridParams {
    fn valid(&self) -> anyhow::Result<()> {
        let mut errors = vec![];
        if self.rows == 0 {
            errors.push(String::from("vanishing number of rows"));
        }
        if self.cols == 0 {
            errors.push(String::from("vanishing number of columns"));
        }
        if !errors.is_empty() {
            anyhow::bail!("invalid topology grid parameters: {}", errors.join(","))
        }
        Ok(())
    }
}

macro_rules! valid_node {
    ($node:expr, $graph:expr) => {
        anyhow::ensure!(
            ($node as usize) < $graph.node_count(),
            "there's no physical qubit {:?} in the topology",
            $node
        );
    };
}

/// Each node holds the index of the physical qubit, edges carry no weight.
pub type Graph = petgraph::Graph<u32, (), petgraph::Undirected, u32>;

/// Undirected graph representing the connectivity of the physical qubits.
///
/// An edge is present if two physical qubits are directly connected in
/// hardware. The dense adjacency matrix is derived once at construction and
/// the topology is never modified afterwards.
#[derive(Debug, Clone)]
pub struct Topology {
    graph: Graph,
    /// Row-major N x N matrix, 1.0 if there is an edge, 0.0 otherwise.
    adjacency: Vec<f64>,
}

impl Topology {
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Number of physical qubits.
    pub fn num_qubits(&self) -> usize {
        self.graph.node_count()
    }

    /// Build a topology with `num_nodes` physical qubits and the given
    /// connections. Duplicate connections are added only once.
    ///
    /// Return an error if there are no nodes, an edge refers to a
    /// non-existing qubit, or an edge is a self loop.
    pub fn from_edges(num_nodes: u32, edges: &[(u32, u32)]) -> anyhow::Result<Self> {
        anyhow::ensure!(num_nodes > 0, "vanishing number of physical qubits");

        let mut graph = Graph::with_capacity(num_nodes as usize, edges.len());
        for ndx in 0..num_nodes {
            graph.add_node(ndx);
        }

        let mut errors = vec![];
        for (u, v) in edges {
            if *u >= num_nodes || *v >= num_nodes {
                errors.push(format!("edge ({},{}) out of range", u, v));
            } else if u == v {
                errors.push(format!("self loop on {}", u));
            } else if !graph.contains_edge((*u).into(), (*v).into()) {
                graph.add_edge((*u).into(), (*v).into(), ());
            }
        }
        if !errors.is_empty() {
            anyhow::bail!("invalid topology edges: {}", errors.join(","))
        }

        Ok(Self::from_graph(graph))
    }

    /// Build a topology with `num_nodes` disconnected physical qubits.
    pub fn empty(num_nodes: u32) -> anyhow::Result<Self> {
        Self::from_edges(num_nodes, &[])
    }

    /// Build a topology where qubit `i` is connected to qubit `i + 1`.
    pub fn line(num_nodes: u32) -> anyhow::Result<Self> {
        let edges = (1..num_nodes).map(|i| (i - 1, i)).collect::<Vec<_>>();
        Self::from_edges(num_nodes, &edges)
    }

    /// Build a topology consisting of a rectangular grid, without
    /// wrapping around at the borders.
    ///
    /// The qubit in row `r` and column `c` has index `r * cols + c`.
    pub fn grid(grid_params: GridParams) -> anyhow::Result<Self> {
        grid_params.valid()?;

        let mut edges = vec![];
        for r in 0..grid_params.rows {
            for c in 0..grid_params.cols {
                let ndx = r * grid_params.cols + c;
                // Right
                if c != (grid_params.cols - 1) {
                    edges.push((ndx, ndx + 1));
                }
                // Down
                if r != (grid_params.rows - 1) {
                    edges.push((ndx, ndx + grid_params.cols));
                }
            }
        }

        Self::from_edges(grid_params.rows * grid_params.cols, &edges)
    }

    fn from_graph(graph: Graph) -> Self {
        let n = graph.node_count();
        let mut adjacency = vec![0.0; n * n];
        for edge in graph.raw_edges() {
            let u = edge.source().index();
            let v = edge.target().index();
            adjacency[u * n + v] = 1.0;
            adjacency[v * n + u] = 1.0;
        }
        Self { graph, adjacency }
    }

    /// Return the flattened, row-major adjacency matrix.
    pub fn adjacency_matrix(&self) -> &[f64] {
        &self.adjacency
    }

    /// Return true if physical qubits u and v are directly connected.
    pub fn has_edge(&self, u: u32, v: u32) -> anyhow::Result<bool> {
        valid_node!(u, self.graph);
        valid_node!(v, self.graph);
        Ok(self.graph.find_edge(u.into(), v.into()).is_some())
    }

    pub fn to_dot(&self) -> String {
        format!(
            "{:?}",
            petgraph::dot::Dot::with_config(&self.graph, &[petgraph::dot::Config::EdgeNoLabel])
        )
    }
}
