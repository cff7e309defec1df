//! Structural perturbations that derive a comparison graph from a base graph.
//!
//! Every perturbation keeps the base node set, so the base and perturbed
//! adjacency matrices stay index-aligned.

use std::{fmt, str::FromStr};

use rand::{Rng, rngs::SmallRng, seq::SliceRandom, seq::index};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{error::GraphError, graph::Graph, sampling::scaled_count};

/// Supported perturbation tags.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerturbationKind {
    /// Compare the base graph with itself.
    #[default]
    #[serde(rename = "noperturb")]
    None,
    /// Drop edges independently.
    Thin,
    /// Move one endpoint of selected edges.
    Rewire,
    /// Degree-preserving double-edge swaps.
    Randomize,
    /// Permute the labels of a subset of nodes.
    Scramble,
}

impl PerturbationKind {
    /// Every supported tag.
    pub const ALL: [Self; 5] = [
        Self::None,
        Self::Thin,
        Self::Rewire,
        Self::Randomize,
        Self::Scramble,
    ];

    /// Returns the command-line tag, e.g. `"thin"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "noperturb",
            Self::Thin => "thin",
            Self::Rewire => "rewire",
            Self::Randomize => "randomize",
            Self::Scramble => "scramble",
        }
    }
}

impl fmt::Display for PerturbationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PerturbationKind {
    type Err = GraphError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == raw)
            .ok_or_else(|| GraphError::UnknownPerturbation {
                tag: raw.to_owned(),
            })
    }
}

/// A validated perturbation and its magnitude.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Perturbation {
    /// No perturbation; the comparison graph is a copy of the base.
    #[default]
    None,
    /// Drop each edge with the given probability.
    Thin(f64),
    /// Move one endpoint of each edge with the given probability.
    Rewire(f64),
    /// Attempt `round(f * m)` double-edge swaps.
    Randomize(f64),
    /// Permute the labels of `round(f * n)` nodes.
    Scramble(f64),
}

impl Perturbation {
    /// Validates `magnitude` for `kind`.
    ///
    /// The magnitude is ignored for [`PerturbationKind::None`].
    ///
    /// # Errors
    /// Returns [`GraphError::InvalidMagnitude`] when the magnitude is outside
    /// `[0, 1]` (or negative, for `randomize`) or not finite.
    ///
    /// # Examples
    /// ```
    /// use isosweep_core::{Perturbation, PerturbationKind};
    ///
    /// assert_eq!(
    ///     Perturbation::new(PerturbationKind::Thin, 0.2).expect("valid"),
    ///     Perturbation::Thin(0.2)
    /// );
    /// assert!(Perturbation::new(PerturbationKind::Thin, 1.2).is_err());
    /// assert!(Perturbation::new(PerturbationKind::Randomize, 2.0).is_ok());
    /// ```
    pub fn new(kind: PerturbationKind, magnitude: f64) -> Result<Self, GraphError> {
        let invalid = || GraphError::InvalidMagnitude {
            perturbation: kind.as_str(),
            magnitude,
        };
        let unit = |wrap: fn(f64) -> Self| {
            if (0.0..=1.0).contains(&magnitude) {
                Ok(wrap(magnitude))
            } else {
                Err(invalid())
            }
        };
        match kind {
            PerturbationKind::None => Ok(Self::None),
            PerturbationKind::Thin => unit(Self::Thin),
            PerturbationKind::Rewire => unit(Self::Rewire),
            PerturbationKind::Scramble => unit(Self::Scramble),
            PerturbationKind::Randomize => {
                if magnitude.is_finite() && magnitude >= 0.0 {
                    Ok(Self::Randomize(magnitude))
                } else {
                    Err(invalid())
                }
            }
        }
    }

    /// Returns the tag of this perturbation.
    #[must_use]
    pub const fn kind(&self) -> PerturbationKind {
        match self {
            Self::None => PerturbationKind::None,
            Self::Thin(_) => PerturbationKind::Thin,
            Self::Rewire(_) => PerturbationKind::Rewire,
            Self::Randomize(_) => PerturbationKind::Randomize,
            Self::Scramble(_) => PerturbationKind::Scramble,
        }
    }

    /// Returns the magnitude, or `0.0` for [`Perturbation::None`].
    #[must_use]
    pub const fn magnitude(&self) -> f64 {
        match *self {
            Self::None => 0.0,
            Self::Thin(f) | Self::Rewire(f) | Self::Randomize(f) | Self::Scramble(f) => f,
        }
    }

    /// Returns whether this is [`Perturbation::None`].
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Derives a perturbed copy of `base` on the same node set.
    ///
    /// The result may be disconnected; the sweep reapplies the perturbation
    /// from the same base until it is not.
    ///
    /// # Errors
    /// Returns [`GraphError::InvalidMagnitude`] when a hand-built variant
    /// carries a magnitude [`Perturbation::new`] would reject.
    pub fn apply(&self, base: &Graph, rng: &mut SmallRng) -> Result<Graph, GraphError> {
        let checked = Self::new(self.kind(), self.magnitude())?;
        let graph = match checked {
            Self::None => base.clone(),
            Self::Thin(f) => thin(base, f, rng),
            Self::Rewire(f) => rewire(base, f, rng),
            Self::Randomize(f) => randomize(base, f, rng),
            Self::Scramble(f) => scramble(base, f, rng),
        };
        Ok(graph)
    }
}

fn thin(base: &Graph, f: f64, rng: &mut SmallRng) -> Graph {
    Graph::from_edges(
        base.node_count(),
        base.edges().filter(|_| !rng.gen_bool(f)).collect::<Vec<_>>(),
    )
}

fn rewire(base: &Graph, f: f64, rng: &mut SmallRng) -> Graph {
    let node_count = base.node_count();
    let mut graph = base.clone();
    let mut moved = 0_usize;
    for (left, right) in base.edges() {
        if !rng.gen_bool(f) || !graph.has_edge(left, right) {
            continue;
        }
        let (kept, dropped) = if rng.gen_bool(0.5) {
            (left, right)
        } else {
            (right, left)
        };
        let candidates: Vec<usize> = (0..node_count)
            .filter(|&node| node != kept && !graph.has_edge(kept, node))
            .collect();
        let Some(&target) = candidates.choose(rng) else {
            continue;
        };
        graph.remove_edge(kept, dropped);
        graph.add_edge(kept, target);
        moved = moved.saturating_add(1);
    }
    debug!(moved, "rewired edges");
    graph
}

#[expect(
    clippy::float_arithmetic,
    reason = "the swap count scales with a fractional magnitude"
)]
#[expect(
    clippy::cast_precision_loss,
    reason = "edge counts are far below the f64 mantissa limit"
)]
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "the magnitude is validated as finite and non-negative"
)]
fn swap_count(f: f64, edges: usize) -> usize {
    (f * edges as f64).round() as usize
}

fn randomize(base: &Graph, f: f64, rng: &mut SmallRng) -> Graph {
    let mut graph = base.clone();
    let mut edges: Vec<(usize, usize)> = base.edges().collect();
    if edges.len() < 2 {
        return graph;
    }
    let attempts = swap_count(f, edges.len());
    let mut swapped = 0_usize;
    for _ in 0..attempts {
        let sampled = index::sample(rng, edges.len(), 2);
        let (first, second) = (sampled.index(0), sampled.index(1));
        let (Some(&(a, b)), Some(&(c, d))) = (edges.get(first), edges.get(second)) else {
            continue;
        };
        let (c, d) = if rng.gen_bool(0.5) { (c, d) } else { (d, c) };
        if a == d || c == b || graph.has_edge(a, d) || graph.has_edge(c, b) {
            continue;
        }
        graph.remove_edge(a, b);
        graph.remove_edge(c, d);
        graph.add_edge(a, d);
        graph.add_edge(c, b);
        if let Some(slot) = edges.get_mut(first) {
            *slot = (a, d);
        }
        if let Some(slot) = edges.get_mut(second) {
            *slot = (c, b);
        }
        swapped = swapped.saturating_add(1);
    }
    debug!(attempts, swapped, "randomized edges");
    graph
}

fn scramble(base: &Graph, f: f64, rng: &mut SmallRng) -> Graph {
    let node_count = base.node_count();
    let chosen = index::sample(rng, node_count, scaled_count(f, node_count)).into_vec();
    let mut shuffled = chosen.clone();
    shuffled.shuffle(rng);

    let mut relabel: Vec<usize> = (0..node_count).collect();
    for (from, to) in chosen.into_iter().zip(shuffled) {
        if let Some(slot) = relabel.get_mut(from) {
            *slot = to;
        }
    }
    let label = |node: usize| relabel.get(node).copied().unwrap_or(node);
    Graph::from_edges(
        node_count,
        base.edges()
            .map(|(left, right)| (label(left), label(right)))
            .collect::<Vec<_>>(),
    )
}
