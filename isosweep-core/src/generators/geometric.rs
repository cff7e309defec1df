//! Random geometric graphs with a prescribed edge density.
//!
//! Points are drawn uniformly in the unit hypercube and the closest pairs
//! are joined until the requested fraction of all pairs is reached. This is
//! equivalent to choosing the connection radius that yields density `p`.

use rand::{Rng, rngs::SmallRng};

use crate::{graph::Graph, sampling::scaled_count};

#[expect(
    clippy::float_arithmetic,
    reason = "pairwise distances require floating-point arithmetic"
)]
fn squared_distance(left: &[f64], right: &[f64]) -> f64 {
    left.iter()
        .zip(right)
        .map(|(a, b)| {
            let diff = a - b;
            diff * diff
        })
        .sum()
}

#[expect(
    clippy::integer_division,
    clippy::integer_division_remainder_used,
    reason = "n(n-1) is always even"
)]
pub(super) fn geometric(nodes: usize, dimensions: usize, density: f64, rng: &mut SmallRng) -> Graph {
    let points: Vec<Vec<f64>> = (0..nodes)
        .map(|_| (0..dimensions).map(|_| rng.gen_range(0.0..1.0)).collect())
        .collect();

    let mut pairs = Vec::with_capacity(nodes.saturating_mul(nodes.saturating_sub(1)) / 2);
    for (left, left_point) in points.iter().enumerate() {
        for (offset, right_point) in points.iter().skip(left + 1).enumerate() {
            pairs.push((squared_distance(left_point, right_point), left, left + 1 + offset));
        }
    }
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

    let wanted = scaled_count(density, pairs.len());
    Graph::from_edges(
        nodes,
        pairs
            .into_iter()
            .take(wanted)
            .map(|(_, left, right)| (left, right)),
    )
}
