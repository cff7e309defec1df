//! Duplication-divergence growth models of protein-interaction networks.
//!
//! All models grow from a single edge by repeatedly copying a random node
//! and letting the copy's links diverge. A growth step that would leave a
//! node isolated is discarded and redrawn.

use rand::{Rng, rngs::SmallRng};

use crate::{error::GraphError, graph::Graph, sampling::distinct_pair};

/// Growth steps allowed per requested node before a model gives up.
const STEP_BUDGET_PER_NODE: usize = 1_000;

/// Registered `(p, q)` pairs: Vázquez et al. and Gibson et al.
pub(super) const DUPLICATION_TABLE: [(f64, f64); 2] = [(0.1, 0.7), (0.24, 0.887)];

/// Looks up the divergence probability registered for `p`.
#[expect(
    clippy::float_arithmetic,
    reason = "table keys are compared within machine epsilon"
)]
pub(super) fn divergence_for(p: f64) -> Option<f64> {
    DUPLICATION_TABLE
        .iter()
        .find(|(key, _)| (key - p).abs() <= f64::EPSILON)
        .map(|&(_, q)| q)
}

fn seed_graph() -> Graph {
    Graph::from_edges(2, [(0, 1)])
}

struct Growth {
    nodes: usize,
    budget: usize,
    model: &'static str,
}

impl Growth {
    fn new(model: &'static str, nodes: usize) -> Self {
        Self {
            nodes,
            budget: nodes.saturating_mul(STEP_BUDGET_PER_NODE),
            model,
        }
    }

    /// Runs `step` until the graph reaches the target size. `step` returns
    /// whether it grew the graph.
    fn run(
        &self,
        rng: &mut SmallRng,
        mut step: impl FnMut(&mut Graph, &mut SmallRng) -> bool,
    ) -> Result<Graph, GraphError> {
        let mut graph = seed_graph();
        let mut attempts = 0_usize;
        while graph.node_count() < self.nodes {
            if attempts >= self.budget {
                return Err(GraphError::GenerationFailed {
                    model: self.model,
                    attempts,
                });
            }
            attempts = attempts.saturating_add(1);
            step(&mut graph, rng);
        }
        Ok(graph)
    }
}

/// One Vázquez step: copy a node, split each shared link with probability
/// `q`, then link the copies with probability `p`.
fn vazquez_step(graph: &mut Graph, rng: &mut SmallRng, p: f64, q: f64) -> bool {
    let original = rng.gen_range(0..graph.node_count());
    let mut keeps_original = Vec::new();
    let mut keeps_copy = Vec::new();
    for neighbour in graph.neighbours(original) {
        if rng.gen_bool(q) {
            if rng.gen_bool(0.5) {
                keeps_original.push(neighbour);
            } else {
                keeps_copy.push(neighbour);
            }
        } else {
            keeps_original.push(neighbour);
            keeps_copy.push(neighbour);
        }
    }
    let linked = rng.gen_bool(p);
    if !linked && (keeps_original.is_empty() || keeps_copy.is_empty()) {
        return false;
    }

    let copy = graph.add_node();
    let dropped: Vec<usize> = graph
        .neighbours(original)
        .filter(|neighbour| !keeps_original.contains(neighbour))
        .collect();
    for neighbour in dropped {
        graph.remove_edge(original, neighbour);
    }
    for neighbour in keeps_copy {
        graph.add_edge(copy, neighbour);
    }
    if linked {
        graph.add_edge(original, copy);
    }
    true
}

pub(super) fn vazquez(nodes: usize, p: f64, q: f64, rng: &mut SmallRng) -> Result<Graph, GraphError> {
    Growth::new("vazquez", nodes).run(rng, |graph, rng| vazquez_step(graph, rng, p, q))
}

/// Vázquez growth followed by `extra_pairs` heterodimerisation trials, each
/// linking a random non-adjacent pair with probability `link_probability`.
pub(super) fn extended_vazquez(
    nodes: usize,
    p: f64,
    q: f64,
    extra_pairs: usize,
    link_probability: f64,
    rng: &mut SmallRng,
) -> Result<Graph, GraphError> {
    let mut graph = Growth::new("extended-vazquez", nodes)
        .run(rng, |graph, rng| vazquez_step(graph, rng, p, q))?;
    for _ in 0..extra_pairs {
        let Some((left, right)) = distinct_pair(graph.node_count(), rng) else {
            break;
        };
        if !graph.has_edge(left, right) && rng.gen_bool(link_probability) {
            graph.add_edge(left, right);
        }
    }
    Ok(graph)
}

/// One Solé step: copy a node, drop each inherited link with probability
/// `delta`, then link the copy to every node with probability `alpha / N`.
#[expect(
    clippy::float_arithmetic,
    reason = "the attachment probability is scaled by the current size"
)]
#[expect(
    clippy::cast_precision_loss,
    reason = "graph sizes are far below the f64 mantissa limit"
)]
fn sole_step(graph: &mut Graph, rng: &mut SmallRng, delta: f64, alpha: f64) -> bool {
    let size = graph.node_count();
    let original = rng.gen_range(0..size);
    let attach = (alpha / size as f64).clamp(0.0, 1.0);

    let mut links: Vec<usize> = graph
        .neighbours(original)
        .filter(|_| !rng.gen_bool(delta))
        .collect();
    for node in 0..size {
        if !links.contains(&node) && rng.gen_bool(attach) {
            links.push(node);
        }
    }
    if links.is_empty() {
        return false;
    }

    let copy = graph.add_node();
    for node in links {
        graph.add_edge(copy, node);
    }
    true
}

pub(super) fn sole(nodes: usize, delta: f64, alpha: f64, rng: &mut SmallRng) -> Result<Graph, GraphError> {
    Growth::new("sole", nodes).run(rng, |graph, rng| sole_step(graph, rng, delta, alpha))
}
