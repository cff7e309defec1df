//! Graph generation strategies selected by a graph-type tag.
//!
//! A [`GraphSpec`] names a tag and its raw parameters. [`GraphModel::resolve`]
//! validates those parameters and fixes every derived constant before any
//! graph is built, so misconfiguration surfaces once at start-up rather than
//! inside the sweep loop.

mod classic;
mod duplication;
mod geometric;
mod ppi;

use std::{fmt, str::FromStr};

use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::{error::GraphError, graph::Graph};

pub use ppi::{EdgeListPpiSource, PpiSource, PpiSpecies};

/// Ring-lattice degree used by the Watts–Strogatz model.
pub const WATTS_STROGATZ_NEIGHBOURS: usize = 8;
/// Dimensions of the unit cube used by the geometric model.
pub const GEOMETRIC_DIMENSIONS: usize = 3;
/// Heterodimerisation link probability used by the extended Vázquez model.
pub const EXTENDED_LINK_PROBABILITY: f64 = 0.8;
/// Inherited-link loss probability of the Solé model.
pub const SOLE_DELTA: f64 = 0.53;
/// Random-attachment strength of the Solé model.
pub const SOLE_ALPHA: f64 = 0.06;

/// Supported graph-type tags.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum GraphKind {
    /// Erdős–Rényi `G(n, p)`.
    #[serde(rename = "ER")]
    ErdosRenyi,
    /// Barabási–Albert preferential attachment.
    #[serde(rename = "BA")]
    BarabasiAlbert,
    /// Connected Watts–Strogatz small world.
    #[serde(rename = "WS")]
    WattsStrogatz,
    /// Random geometric graph in the unit cube.
    #[serde(rename = "GEO")]
    Geometric,
    /// Vázquez duplication-divergence.
    #[serde(rename = "VZ")]
    Vazquez,
    /// Vázquez growth with extra heterodimerisation links.
    #[serde(rename = "EV")]
    ExtendedVazquez,
    /// Solé duplication model.
    #[serde(rename = "SL")]
    Sole,
    /// Sample of a protein-interaction network.
    #[serde(rename = "PPI")]
    Ppi,
}

impl GraphKind {
    /// Every supported tag in command-line order.
    pub const ALL: [Self; 8] = [
        Self::ErdosRenyi,
        Self::BarabasiAlbert,
        Self::WattsStrogatz,
        Self::Geometric,
        Self::Vazquez,
        Self::ExtendedVazquez,
        Self::Sole,
        Self::Ppi,
    ];

    /// Returns the short tag, e.g. `"ER"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ErdosRenyi => "ER",
            Self::BarabasiAlbert => "BA",
            Self::WattsStrogatz => "WS",
            Self::Geometric => "GEO",
            Self::Vazquez => "VZ",
            Self::ExtendedVazquez => "EV",
            Self::Sole => "SL",
            Self::Ppi => "PPI",
        }
    }
}

impl fmt::Display for GraphKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GraphKind {
    type Err = GraphError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == raw)
            .ok_or_else(|| GraphError::UnknownGraphKind {
                tag: raw.to_owned(),
            })
    }
}

/// Raw graph parameters as supplied by the caller.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GraphSpec {
    /// Generator tag.
    pub kind: GraphKind,
    /// Requested node count.
    pub nodes: usize,
    /// Density or attachment parameter; its meaning depends on `kind`.
    pub density: f64,
    /// Interaction network sampled by [`GraphKind::Ppi`].
    pub species: PpiSpecies,
}

impl GraphSpec {
    /// Creates graph parameters; PPI runs sample the human network unless overridden.
    #[must_use]
    pub fn new(kind: GraphKind, nodes: usize, density: f64) -> Self {
        Self {
            kind,
            nodes,
            density,
            species: PpiSpecies::default(),
        }
    }

    /// Selects the interaction network species.
    #[must_use]
    pub const fn with_species(mut self, species: PpiSpecies) -> Self {
        self.species = species;
        self
    }
}

/// A validated generator with every derived parameter fixed.
#[derive(Clone, Copy, Debug, PartialEq)]
#[non_exhaustive]
pub enum GraphModel {
    /// Each pair linked with probability `p`.
    ErdosRenyi {
        /// Node count.
        nodes: usize,
        /// Edge probability.
        p: f64,
    },
    /// Preferential attachment with `attachments` links per new node.
    BarabasiAlbert {
        /// Node count.
        nodes: usize,
        /// Links added per new node.
        attachments: usize,
    },
    /// Watts–Strogatz ring with rewiring, retried until connected.
    WattsStrogatz {
        /// Node count.
        nodes: usize,
        /// Lattice degree.
        neighbours: usize,
        /// Rewiring probability.
        p: f64,
    },
    /// Closest pairs of random points in the unit cube.
    Geometric {
        /// Node count.
        nodes: usize,
        /// Cube dimension.
        dimensions: usize,
        /// Fraction of all pairs that become edges.
        density: f64,
    },
    /// Vázquez duplication-divergence.
    Vazquez {
        /// Node count.
        nodes: usize,
        /// Probability of linking a node to its duplicate.
        p: f64,
        /// Probability that a shared link diverges.
        q: f64,
    },
    /// Vázquez growth followed by random heterodimerisation.
    ExtendedVazquez {
        /// Node count.
        nodes: usize,
        /// Probability of linking a node to its duplicate.
        p: f64,
        /// Probability that a shared link diverges.
        q: f64,
        /// Random pair trials after growth.
        extra_pairs: usize,
        /// Probability that a trial links its pair.
        link_probability: f64,
    },
    /// Solé duplication model.
    Sole {
        /// Node count.
        nodes: usize,
        /// Probability of dropping an inherited link.
        delta: f64,
        /// Random-attachment strength.
        alpha: f64,
    },
    /// Connected sample of an interaction network.
    Ppi {
        /// Node count.
        nodes: usize,
        /// Source species.
        species: PpiSpecies,
    },
}

#[expect(
    clippy::cast_precision_loss,
    reason = "node counts are reported as floats only in diagnostics"
)]
fn invalid_nodes(nodes: usize, reason: &'static str) -> GraphError {
    GraphError::InvalidParameter {
        parameter: "n",
        value: nodes as f64,
        reason,
    }
}

fn require_probability(parameter: &'static str, value: f64) -> Result<f64, GraphError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(GraphError::InvalidParameter {
            parameter,
            value,
            reason: "must lie in [0, 1]",
        })
    }
}

fn require_nodes(nodes: usize, minimum: usize) -> Result<usize, GraphError> {
    if nodes >= minimum {
        Ok(nodes)
    } else if minimum <= 1 {
        Err(invalid_nodes(nodes, "at least one node is required"))
    } else {
        Err(invalid_nodes(nodes, "duplication models need at least two nodes"))
    }
}

fn duplication_pair(p: f64) -> Result<(f64, f64), GraphError> {
    duplication::divergence_for(p)
        .map(|q| (p, q))
        .ok_or(GraphError::UnmappedDuplicationParameter { p })
}

#[expect(
    clippy::float_arithmetic,
    reason = "the attachment count is derived from a fractional density"
)]
#[expect(
    clippy::cast_precision_loss,
    reason = "node counts are far below the f64 mantissa limit"
)]
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "the product is checked to be finite and non-negative first"
)]
fn attachments_for(nodes: usize, p: f64) -> Result<usize, GraphError> {
    let raw = (p * nodes as f64).floor();
    if !raw.is_finite() || raw < 1.0 || raw >= nodes as f64 {
        return Err(GraphError::InvalidParameter {
            parameter: "p",
            value: p,
            reason: "floor(p * n) must lie in [1, n)",
        });
    }
    Ok(raw as usize)
}

#[expect(
    clippy::integer_division,
    clippy::integer_division_remainder_used,
    reason = "one heterodimerisation trial per five nodes, rounded down"
)]
const fn extra_pair_trials(nodes: usize) -> usize {
    nodes / 5
}

impl GraphModel {
    /// Validates `spec` and derives the concrete model.
    ///
    /// # Errors
    /// Returns [`GraphError::InvalidParameter`] when a parameter is outside
    /// the model's domain and [`GraphError::UnmappedDuplicationParameter`]
    /// when a duplication model receives a `p` without a registered `q`.
    ///
    /// # Examples
    /// ```
    /// use isosweep_core::{GraphKind, GraphModel, GraphSpec};
    ///
    /// let model = GraphModel::resolve(&GraphSpec::new(GraphKind::Vazquez, 50, 0.1))
    ///     .expect("0.1 is registered");
    /// assert!(matches!(model, GraphModel::Vazquez { q, .. } if q == 0.7));
    /// assert!(GraphModel::resolve(&GraphSpec::new(GraphKind::Vazquez, 50, 0.5)).is_err());
    /// ```
    pub fn resolve(spec: &GraphSpec) -> Result<Self, GraphError> {
        let p = spec.density;
        if !p.is_finite() {
            return Err(GraphError::InvalidParameter {
                parameter: "p",
                value: p,
                reason: "must be finite",
            });
        }
        let nodes = require_nodes(spec.nodes, 1)?;
        let model = match spec.kind {
            GraphKind::ErdosRenyi => Self::ErdosRenyi {
                nodes,
                p: require_probability("p", p)?,
            },
            GraphKind::BarabasiAlbert => Self::BarabasiAlbert {
                nodes,
                attachments: attachments_for(nodes, p)?,
            },
            GraphKind::WattsStrogatz => {
                if nodes <= WATTS_STROGATZ_NEIGHBOURS {
                    return Err(invalid_nodes(nodes, "Watts-Strogatz needs more than 8 nodes"));
                }
                Self::WattsStrogatz {
                    nodes,
                    neighbours: WATTS_STROGATZ_NEIGHBOURS,
                    p: require_probability("p", p)?,
                }
            }
            GraphKind::Geometric => Self::Geometric {
                nodes,
                dimensions: GEOMETRIC_DIMENSIONS,
                density: require_probability("p", p)?,
            },
            GraphKind::Vazquez => {
                let (p, q) = duplication_pair(p)?;
                Self::Vazquez {
                    nodes: require_nodes(nodes, 2)?,
                    p,
                    q,
                }
            }
            GraphKind::ExtendedVazquez => {
                let (p, q) = duplication_pair(p)?;
                Self::ExtendedVazquez {
                    nodes: require_nodes(nodes, 2)?,
                    p,
                    q,
                    extra_pairs: extra_pair_trials(nodes),
                    link_probability: EXTENDED_LINK_PROBABILITY,
                }
            }
            GraphKind::Sole => Self::Sole {
                nodes: require_nodes(nodes, 2)?,
                delta: SOLE_DELTA,
                alpha: SOLE_ALPHA,
            },
            GraphKind::Ppi => Self::Ppi {
                nodes,
                species: spec.species,
            },
        };
        Ok(model)
    }

    /// Checks the parameters of a model that was built by hand instead of
    /// through [`GraphModel::resolve`].
    ///
    /// # Errors
    /// Returns [`GraphError::InvalidParameter`] for probabilities outside
    /// `[0, 1]` or node and attachment counts the generator cannot honour.
    pub fn validate(&self) -> Result<(), GraphError> {
        match *self {
            Self::ErdosRenyi { nodes, p } => {
                require_nodes(nodes, 1)?;
                require_probability("p", p)?;
            }
            Self::BarabasiAlbert { nodes, attachments } => {
                require_nodes(nodes, 1)?;
                if attachments == 0 || attachments >= nodes {
                    return Err(invalid_nodes(nodes, "attachments must lie in [1, n)"));
                }
            }
            Self::WattsStrogatz {
                nodes,
                neighbours,
                p,
            } => {
                if nodes <= neighbours {
                    return Err(invalid_nodes(nodes, "the ring needs more nodes than neighbours"));
                }
                require_probability("p", p)?;
            }
            Self::Geometric { nodes, density, .. } => {
                require_nodes(nodes, 1)?;
                require_probability("p", density)?;
            }
            Self::Vazquez { nodes, p, q } => {
                require_nodes(nodes, 2)?;
                require_probability("p", p)?;
                require_probability("q", q)?;
            }
            Self::ExtendedVazquez {
                nodes,
                p,
                q,
                link_probability,
                ..
            } => {
                require_nodes(nodes, 2)?;
                require_probability("p", p)?;
                require_probability("q", q)?;
                require_probability("s", link_probability)?;
            }
            Self::Sole {
                nodes,
                delta,
                alpha,
            } => {
                require_nodes(nodes, 2)?;
                require_probability("delta", delta)?;
                require_probability("alpha", alpha)?;
            }
            Self::Ppi { nodes, .. } => {
                require_nodes(nodes, 1)?;
            }
        }
        Ok(())
    }

    /// Returns the node count every generated graph will have.
    #[must_use]
    pub const fn nodes(&self) -> usize {
        match *self {
            Self::ErdosRenyi { nodes, .. }
            | Self::BarabasiAlbert { nodes, .. }
            | Self::WattsStrogatz { nodes, .. }
            | Self::Geometric { nodes, .. }
            | Self::Vazquez { nodes, .. }
            | Self::ExtendedVazquez { nodes, .. }
            | Self::Sole { nodes, .. }
            | Self::Ppi { nodes, .. } => nodes,
        }
    }

    /// Returns a stable label used in diagnostics.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::ErdosRenyi { .. } => "erdos-renyi",
            Self::BarabasiAlbert { .. } => "barabasi-albert",
            Self::WattsStrogatz { .. } => "watts-strogatz",
            Self::Geometric { .. } => "geometric",
            Self::Vazquez { .. } => "vazquez",
            Self::ExtendedVazquez { .. } => "extended-vazquez",
            Self::Sole { .. } => "sole",
            Self::Ppi { .. } => "ppi",
        }
    }
}

/// Builds graphs for a resolved [`GraphModel`].
///
/// # Examples
/// ```
/// use isosweep_core::{GraphFactory, GraphKind, GraphModel, GraphSpec};
/// use rand::{SeedableRng, rngs::SmallRng};
///
/// let model = GraphModel::resolve(&GraphSpec::new(GraphKind::ErdosRenyi, 10, 1.0))
///     .expect("valid parameters");
/// let factory = GraphFactory::new(model);
/// let mut rng = SmallRng::seed_from_u64(1);
/// let graph = factory.generate(&mut rng).expect("ER never fails");
/// assert_eq!(graph.edge_count(), 45);
/// ```
pub struct GraphFactory {
    model: GraphModel,
    ppi: Option<Box<dyn PpiSource>>,
}

impl fmt::Debug for GraphFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphFactory")
            .field("model", &self.model)
            .field("ppi", &self.ppi.is_some())
            .finish()
    }
}

impl GraphFactory {
    /// Creates a factory without an interaction network source.
    #[must_use]
    pub fn new(model: GraphModel) -> Self {
        Self { model, ppi: None }
    }

    /// Attaches the source sampled by [`GraphModel::Ppi`].
    #[must_use]
    pub fn with_ppi_source(mut self, source: impl PpiSource + 'static) -> Self {
        self.ppi = Some(Box::new(source));
        self
    }

    /// Returns the resolved model.
    #[must_use]
    pub const fn model(&self) -> &GraphModel {
        &self.model
    }

    /// Generates one graph. The result may be disconnected; callers wrap
    /// this in a [`crate::ConnectivityGuard`].
    ///
    /// # Errors
    /// Returns [`GraphError`] when a model exhausts its internal retries,
    /// when a PPI graph is requested without a source, or when the source
    /// fails. Hand-built models with out-of-range parameters fail with
    /// [`GraphError::InvalidParameter`].
    pub fn generate(&self, rng: &mut SmallRng) -> Result<Graph, GraphError> {
        self.model.validate()?;
        match self.model {
            GraphModel::ErdosRenyi { nodes, p } => Ok(classic::erdos_renyi(nodes, p, rng)),
            GraphModel::BarabasiAlbert { nodes, attachments } => {
                Ok(classic::barabasi_albert(nodes, attachments, rng))
            }
            GraphModel::WattsStrogatz {
                nodes,
                neighbours,
                p,
            } => classic::connected_watts_strogatz(nodes, neighbours, p, rng),
            GraphModel::Geometric {
                nodes,
                dimensions,
                density,
            } => Ok(geometric::geometric(nodes, dimensions, density, rng)),
            GraphModel::Vazquez { nodes, p, q } => duplication::vazquez(nodes, p, q, rng),
            GraphModel::ExtendedVazquez {
                nodes,
                p,
                q,
                extra_pairs,
                link_probability,
            } => duplication::extended_vazquez(nodes, p, q, extra_pairs, link_probability, rng),
            GraphModel::Sole {
                nodes,
                delta,
                alpha,
            } => duplication::sole(nodes, delta, alpha, rng),
            GraphModel::Ppi { nodes, species } => {
                let source = self.ppi.as_deref().ok_or(GraphError::PpiSourceMissing)?;
                ppi::sample_connected(source.network(species)?, nodes, rng)
            }
        }
    }
}
