//! Connected-component counting and the regenerate-until-connected guard.
//!
//! Components are counted with a union-find over the edge list. The guard
//! wraps any fallible graph producer and keeps calling it until the result
//! has exactly one component or the configured [`RetryLimit`] runs out.

use std::num::NonZeroUsize;

use tracing::{debug, info};

use crate::{error::GraphError, graph::Graph};

/// Default number of attempts the guard makes before giving up.
pub const DEFAULT_CONNECT_ATTEMPTS: NonZeroUsize = match NonZeroUsize::new(10_000) {
    Some(value) => value,
    None => NonZeroUsize::MIN,
};

#[derive(Clone, Debug)]
struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    fn parent_of(&self, node: usize) -> usize {
        self.parent.get(node).copied().unwrap_or(node)
    }

    fn find(&mut self, mut node: usize) -> usize {
        let mut root = node;
        while self.parent_of(root) != root {
            root = self.parent_of(root);
        }

        while self.parent_of(node) != root {
            let next = self.parent_of(node);
            if let Some(slot) = self.parent.get_mut(node) {
                *slot = root;
            }
            node = next;
        }

        root
    }

    /// Merges the sets holding `left` and `right`; returns `true` when they
    /// were previously disjoint.
    fn union(&mut self, left: usize, right: usize) -> bool {
        let mut left = self.find(left);
        let mut right = self.find(right);
        if left == right {
            return false;
        }
        let left_rank = self.rank.get(left).copied().unwrap_or(0);
        let right_rank = self.rank.get(right).copied().unwrap_or(0);
        if left_rank < right_rank {
            std::mem::swap(&mut left, &mut right);
        }
        if let Some(slot) = self.parent.get_mut(right) {
            *slot = left;
        }
        if left_rank == right_rank {
            if let Some(slot) = self.rank.get_mut(left) {
                *slot = left_rank.saturating_add(1);
            }
        }
        true
    }
}

/// Counts the connected components of `graph`.
///
/// # Examples
/// ```
/// use isosweep_core::{Graph, count_components};
///
/// let graph = Graph::from_edges(4, [(0, 1), (2, 3)]);
/// assert_eq!(count_components(&graph), 2);
/// assert_eq!(count_components(&Graph::new(0)), 0);
/// ```
#[must_use]
pub fn count_components(graph: &Graph) -> usize {
    let node_count = graph.node_count();
    let mut set = DisjointSet::new(node_count);
    let mut components = node_count;
    for (left, right) in graph.edges() {
        if set.union(left, right) {
            components = components.saturating_sub(1);
        }
    }
    components
}

/// Returns whether `graph` has exactly one connected component.
#[must_use]
pub fn is_connected(graph: &Graph) -> bool {
    count_components(graph) == 1
}

/// Upper bound on how many graphs the guard generates before failing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetryLimit {
    /// Give up after this many attempts.
    Bounded(NonZeroUsize),
    /// Never give up. Pathological parameters can then loop forever.
    Unbounded,
}

impl RetryLimit {
    /// Builds a limit from a raw count where `0` means unbounded.
    ///
    /// # Examples
    /// ```
    /// use isosweep_core::RetryLimit;
    ///
    /// assert_eq!(RetryLimit::from_count(0), RetryLimit::Unbounded);
    /// assert!(matches!(RetryLimit::from_count(5), RetryLimit::Bounded(n) if n.get() == 5));
    /// ```
    #[must_use]
    pub const fn from_count(count: usize) -> Self {
        match NonZeroUsize::new(count) {
            Some(limit) => Self::Bounded(limit),
            None => Self::Unbounded,
        }
    }

    const fn allows(self, attempts: usize) -> bool {
        match self {
            Self::Bounded(limit) => attempts < limit.get(),
            Self::Unbounded => true,
        }
    }
}

impl Default for RetryLimit {
    fn default() -> Self {
        Self::Bounded(DEFAULT_CONNECT_ATTEMPTS)
    }
}

/// A graph accepted by the [`ConnectivityGuard`] and the attempts it took.
#[derive(Clone, Debug)]
pub struct Guarded {
    /// The connected graph.
    pub graph: Graph,
    /// Number of graphs generated, including the accepted one.
    pub attempts: usize,
}

/// Regenerates graphs until one is connected.
///
/// # Examples
/// ```
/// use isosweep_core::{ConnectivityGuard, Graph, RetryLimit};
///
/// let guard = ConnectivityGuard::new(RetryLimit::from_count(3));
/// let mut calls = 0;
/// let guarded = guard
///     .run("demo", || {
///         calls += 1;
///         if calls < 2 {
///             Ok(Graph::new(2))
///         } else {
///             Ok(Graph::from_edges(2, [(0, 1)]))
///         }
///     })
///     .expect("second graph is connected");
/// assert_eq!(guarded.attempts, 2);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct ConnectivityGuard {
    limit: RetryLimit,
}

impl ConnectivityGuard {
    /// Creates a guard with the given retry limit.
    #[must_use]
    pub const fn new(limit: RetryLimit) -> Self {
        Self { limit }
    }

    /// Calls `produce` until it yields a connected graph.
    ///
    /// Errors from `produce` are returned immediately.
    ///
    /// # Errors
    /// Returns [`GraphError::ConnectivityExhausted`] when the retry limit is
    /// reached without a connected graph.
    pub fn run<F>(&self, model: &'static str, mut produce: F) -> Result<Guarded, GraphError>
    where
        F: FnMut() -> Result<Graph, GraphError>,
    {
        let mut attempts = 0_usize;
        loop {
            let graph = produce()?;
            attempts = attempts.saturating_add(1);
            let components = count_components(&graph);
            if components == 1 {
                debug!(model, attempts, "accepted connected graph");
                return Ok(Guarded { graph, attempts });
            }
            info!(model, components, attempts, "skipping a disconnected graph");
            if !self.limit.allows(attempts) {
                return Err(GraphError::ConnectivityExhausted { model, attempts });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use isosweep_test_support::tracing::RecordingLayer;
    use proptest::prelude::*;
    use rstest::rstest;
    use tracing_subscriber::layer::SubscriberExt;

    #[rstest]
    #[case::empty(Graph::new(0), 0)]
    #[case::single(Graph::new(1), 1)]
    #[case::isolated(Graph::new(3), 3)]
    #[case::path(Graph::from_edges(3, [(0, 1), (1, 2)]), 1)]
    #[case::two_parts(Graph::from_edges(5, [(0, 1), (2, 3), (3, 4)]), 2)]
    fn count_components_matches_structure(#[case] graph: Graph, #[case] expected: usize) {
        assert_eq!(count_components(&graph), expected);
    }

    #[rstest]
    fn guard_fails_when_limit_is_exhausted() {
        let guard = ConnectivityGuard::new(RetryLimit::from_count(4));
        let mut calls = 0;
        let err = guard
            .run("never", || {
                calls += 1;
                Ok(Graph::new(3))
            })
            .expect_err("disconnected graphs must exhaust the guard");
        assert!(matches!(
            err,
            GraphError::ConnectivityExhausted {
                model: "never",
                attempts: 4
            }
        ));
        assert_eq!(calls, 4);
    }

    #[rstest]
    fn guard_propagates_producer_errors() {
        let guard = ConnectivityGuard::default();
        let err = guard
            .run("broken", || Err(GraphError::PpiSourceMissing))
            .expect_err("producer error must propagate");
        assert!(matches!(err, GraphError::PpiSourceMissing));
    }

    #[rstest]
    fn guard_logs_each_discard() {
        let layer = RecordingLayer::default();
        let subscriber = tracing_subscriber::registry().with(layer.clone());
        let mut calls = 0;
        tracing::subscriber::with_default(subscriber, || {
            ConnectivityGuard::default()
                .run("flaky", || {
                    calls += 1;
                    if calls <= 3 {
                        Ok(Graph::new(2))
                    } else {
                        Ok(Graph::from_edges(2, [(0, 1)]))
                    }
                })
                .expect("fourth graph is connected");
        });
        assert_eq!(layer.count_messages("skipping a disconnected graph"), 3);
    }

    proptest! {
        #[test]
        fn guard_only_returns_single_component_graphs(
            seeds in proptest::collection::vec(proptest::collection::vec((0_usize..6, 0_usize..6), 0..12), 1..20)
        ) {
            let mut candidates = seeds.into_iter();
            let guard = ConnectivityGuard::new(RetryLimit::Unbounded);
            let result = guard.run("proptest", || {
                let edges = candidates.next().unwrap_or_else(|| (1..6).map(|node| (node - 1, node)).collect());
                Ok(Graph::from_edges(6, edges))
            });
            let guarded = result.expect("path fallback is connected");
            prop_assert_eq!(count_components(&guarded.graph), 1);
        }
    }
}
