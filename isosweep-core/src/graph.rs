//! Undirected simple graphs over an indexed node set.
//!
//! Nodes are the integers `0..node_count`, so every graph built on the same
//! node count shares one node ordering. Adjacency is kept as sorted sets,
//! which makes edge enumeration and matrix conversion deterministic.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// An undirected graph without self-loops or parallel edges.
///
/// # Examples
/// ```
/// use isosweep_core::Graph;
///
/// let mut graph = Graph::new(3);
/// assert!(graph.add_edge(0, 1));
/// assert!(!graph.add_edge(1, 0));
/// assert!(!graph.add_edge(2, 2));
/// assert_eq!(graph.edge_count(), 1);
/// assert_eq!(graph.degree(1), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Graph {
    adjacency: Vec<BTreeSet<usize>>,
    edge_count: usize,
}

impl Graph {
    /// Creates an edgeless graph with `node_count` nodes.
    #[must_use]
    pub fn new(node_count: usize) -> Self {
        Self {
            adjacency: vec![BTreeSet::new(); node_count],
            edge_count: 0,
        }
    }

    /// Builds a graph from an edge list, silently dropping self-loops,
    /// duplicates and out-of-range endpoints.
    #[must_use]
    pub fn from_edges(node_count: usize, edges: impl IntoIterator<Item = (usize, usize)>) -> Self {
        let mut graph = Self::new(node_count);
        for (left, right) in edges {
            graph.add_edge(left, right);
        }
        graph
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Returns the number of undirected edges.
    #[must_use]
    pub const fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Appends an isolated node and returns its index.
    pub fn add_node(&mut self) -> usize {
        self.adjacency.push(BTreeSet::new());
        self.adjacency.len().saturating_sub(1)
    }

    /// Inserts the edge `{left, right}`.
    ///
    /// Returns `false` when the edge already exists, is a self-loop or names
    /// a node outside the graph.
    pub fn add_edge(&mut self, left: usize, right: usize) -> bool {
        if left == right || left >= self.node_count() || right >= self.node_count() {
            return false;
        }
        let inserted = self
            .adjacency
            .get_mut(left)
            .is_some_and(|neighbours| neighbours.insert(right));
        if inserted {
            if let Some(neighbours) = self.adjacency.get_mut(right) {
                neighbours.insert(left);
            }
            self.edge_count = self.edge_count.saturating_add(1);
        }
        inserted
    }

    /// Removes the edge `{left, right}`, returning whether it was present.
    pub fn remove_edge(&mut self, left: usize, right: usize) -> bool {
        let removed = self
            .adjacency
            .get_mut(left)
            .is_some_and(|neighbours| neighbours.remove(&right));
        if removed {
            if let Some(neighbours) = self.adjacency.get_mut(right) {
                neighbours.remove(&left);
            }
            self.edge_count = self.edge_count.saturating_sub(1);
        }
        removed
    }

    /// Returns whether `{left, right}` is an edge.
    #[must_use]
    pub fn has_edge(&self, left: usize, right: usize) -> bool {
        self.adjacency
            .get(left)
            .is_some_and(|neighbours| neighbours.contains(&right))
    }

    /// Returns the degree of `node`, or zero for unknown nodes.
    #[must_use]
    pub fn degree(&self, node: usize) -> usize {
        self.adjacency.get(node).map_or(0, BTreeSet::len)
    }

    /// Iterates the neighbours of `node` in ascending order.
    pub fn neighbours(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.adjacency
            .get(node)
            .into_iter()
            .flat_map(|neighbours| neighbours.iter().copied())
    }

    /// Iterates each undirected edge once as `(low, high)`.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(node, neighbours)| {
                neighbours
                    .range(node.saturating_add(1)..)
                    .map(move |&other| (node, other))
            })
    }

    /// Returns the subgraph induced by `nodes`, relabelled `0..nodes.len()`
    /// in the order given.
    #[must_use]
    pub fn induced_subgraph(&self, nodes: &[usize]) -> Self {
        let mut position = vec![None; self.node_count()];
        for (index, &node) in nodes.iter().enumerate() {
            if let Some(slot) = position.get_mut(node) {
                *slot = Some(index);
            }
        }
        let mut subgraph = Self::new(nodes.len());
        for (index, &node) in nodes.iter().enumerate() {
            for neighbour in self.neighbours(node) {
                if let Some(Some(other)) = position.get(neighbour) {
                    subgraph.add_edge(index, *other);
                }
            }
        }
        subgraph
    }

    /// Converts the graph into a dense binary adjacency matrix using the
    /// natural node ordering.
    #[must_use]
    pub fn to_adjacency_matrix(&self) -> AdjacencyMatrix {
        let dimension = self.node_count();
        let mut cells = vec![0_u8; dimension.saturating_mul(dimension)];
        for (left, right) in self.edges() {
            for (row, column) in [(left, right), (right, left)] {
                let offset = row.saturating_mul(dimension).saturating_add(column);
                if let Some(cell) = cells.get_mut(offset) {
                    *cell = 1;
                }
            }
        }
        AdjacencyMatrix { dimension, cells }
    }
}

/// A dense square binary adjacency matrix stored row-major.
///
/// Serialises as a list of rows so external estimators can consume it
/// without knowing the flat layout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<Vec<u8>>", from = "Vec<Vec<u8>>")]
pub struct AdjacencyMatrix {
    dimension: usize,
    cells: Vec<u8>,
}

impl AdjacencyMatrix {
    /// Returns the number of rows (equal to the number of columns).
    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.dimension
    }

    /// Returns the cell at `(row, column)`, or `None` when out of range.
    #[must_use]
    pub fn get(&self, row: usize, column: usize) -> Option<u8> {
        if row >= self.dimension || column >= self.dimension {
            return None;
        }
        self.cells
            .get(row.saturating_mul(self.dimension).saturating_add(column))
            .copied()
    }

    /// Iterates the rows of the matrix.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.cells.chunks(self.dimension.max(1))
    }

    /// Returns the number of set cells above the diagonal.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.rows()
            .enumerate()
            .map(|(row, cells)| {
                cells
                    .iter()
                    .skip(row.saturating_add(1))
                    .filter(|&&cell| cell != 0)
                    .count()
            })
            .sum()
    }
}

impl From<AdjacencyMatrix> for Vec<Vec<u8>> {
    fn from(matrix: AdjacencyMatrix) -> Self {
        matrix.rows().map(<[u8]>::to_vec).collect()
    }
}

impl From<Vec<Vec<u8>>> for AdjacencyMatrix {
    fn from(rows: Vec<Vec<u8>>) -> Self {
        let dimension = rows.len();
        let mut cells = Vec::with_capacity(dimension.saturating_mul(dimension));
        for mut row in rows {
            row.resize(dimension, 0);
            cells.extend(row);
        }
        Self { dimension, cells }
    }
}
