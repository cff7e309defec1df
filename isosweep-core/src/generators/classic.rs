//! Erdős–Rényi, Barabási–Albert and Watts–Strogatz generators.

use std::collections::BTreeSet;

use rand::{Rng, seq::SliceRandom, rngs::SmallRng};

use crate::{connectivity::is_connected, error::GraphError, graph::Graph};

/// Internal attempts made by the connected Watts–Strogatz generator.
pub(super) const WATTS_STROGATZ_TRIES: usize = 100;

/// Each unordered pair becomes an edge with probability `p`.
pub(super) fn erdos_renyi(nodes: usize, p: f64, rng: &mut SmallRng) -> Graph {
    let mut graph = Graph::new(nodes);
    for left in 0..nodes {
        for right in (left + 1)..nodes {
            if rng.gen_bool(p) {
                graph.add_edge(left, right);
            }
        }
    }
    graph
}

/// Preferential attachment seeded with a star on `attachments + 1` nodes.
///
/// Targets are drawn from a list in which every node appears once per unit
/// of degree, so selection probability is proportional to degree.
pub(super) fn barabasi_albert(nodes: usize, attachments: usize, rng: &mut SmallRng) -> Graph {
    let mut graph = Graph::new(nodes);
    let mut repeated = Vec::with_capacity(nodes.saturating_mul(attachments).saturating_mul(2));
    for leaf in 1..=attachments.min(nodes.saturating_sub(1)) {
        graph.add_edge(0, leaf);
        repeated.extend([0, leaf]);
    }

    for source in (attachments + 1)..nodes {
        let mut targets = BTreeSet::new();
        while targets.len() < attachments {
            let Some(&target) = repeated.choose(rng) else {
                break;
            };
            targets.insert(target);
        }
        for target in targets {
            graph.add_edge(source, target);
            repeated.extend([target, source]);
        }
    }
    graph
}

/// Ring lattice with `neighbours / 2` links per side, each rewired with
/// probability `p`.
#[expect(
    clippy::integer_division,
    clippy::integer_division_remainder_used,
    reason = "lattice offsets wrap around the ring"
)]
fn watts_strogatz(nodes: usize, neighbours: usize, p: f64, rng: &mut SmallRng) -> Graph {
    let half = neighbours / 2;
    let mut graph = Graph::new(nodes);
    for offset in 1..=half {
        for node in 0..nodes {
            graph.add_edge(node, (node + offset) % nodes);
        }
    }

    for offset in 1..=half {
        for node in 0..nodes {
            if !rng.gen_bool(p) {
                continue;
            }
            if graph.degree(node) >= nodes.saturating_sub(1) {
                continue;
            }
            let mut candidate = rng.gen_range(0..nodes);
            while candidate == node || graph.has_edge(node, candidate) {
                candidate = rng.gen_range(0..nodes);
            }
            let target = (node + offset) % nodes;
            if graph.remove_edge(node, target) {
                graph.add_edge(node, candidate);
            }
        }
    }
    graph
}

/// Repeats [`watts_strogatz`] until the result is connected.
///
/// # Errors
/// Returns [`GraphError::GenerationFailed`] after
/// [`WATTS_STROGATZ_TRIES`] disconnected attempts.
pub(super) fn connected_watts_strogatz(
    nodes: usize,
    neighbours: usize,
    p: f64,
    rng: &mut SmallRng,
) -> Result<Graph, GraphError> {
    for _ in 0..WATTS_STROGATZ_TRIES {
        let graph = watts_strogatz(nodes, neighbours, p, rng);
        if is_connected(&graph) {
            return Ok(graph);
        }
    }
    Err(GraphError::GenerationFailed {
        model: "watts-strogatz",
        attempts: WATTS_STROGATZ_TRIES,
    })
}
