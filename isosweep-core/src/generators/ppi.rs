//! Protein-interaction network sources and connected sampling.

use std::{
    collections::{HashMap, VecDeque},
    fmt,
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use once_cell::unsync::OnceCell;
use rand::{Rng, rngs::SmallRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::{error::GraphError, graph::Graph};

/// Seeds tried before a sample is declared too small.
const SAMPLE_SEED_TRIES: usize = 100;

/// Species whose interaction networks can be sampled.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PpiSpecies {
    /// *Drosophila melanogaster*.
    Fly,
    /// *Homo sapiens*.
    #[default]
    Human,
    /// *Mus musculus*.
    Mouse,
    /// *Caenorhabditis elegans*.
    Worm,
    /// *Saccharomyces cerevisiae*.
    Yeast,
}

impl PpiSpecies {
    /// All supported species.
    pub const ALL: [Self; 5] = [Self::Fly, Self::Human, Self::Mouse, Self::Worm, Self::Yeast];

    /// Returns the lowercase tag used on the command line and in paths.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fly => "fly",
            Self::Human => "human",
            Self::Mouse => "mouse",
            Self::Worm => "worm",
            Self::Yeast => "yeast",
        }
    }
}

impl fmt::Display for PpiSpecies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PpiSpecies {
    type Err = GraphError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|species| species.as_str() == raw)
            .ok_or_else(|| GraphError::UnknownSpecies {
                tag: raw.to_owned(),
            })
    }
}

/// Supplies complete interaction networks by species.
pub trait PpiSource {
    /// Returns the full interaction network for `species`.
    ///
    /// # Errors
    /// Returns [`GraphError`] when the network cannot be loaded.
    fn network(&self, species: PpiSpecies) -> Result<&Graph, GraphError>;
}

#[derive(Debug, Default)]
struct SpeciesCache {
    fly: OnceCell<Graph>,
    human: OnceCell<Graph>,
    mouse: OnceCell<Graph>,
    worm: OnceCell<Graph>,
    yeast: OnceCell<Graph>,
}

impl SpeciesCache {
    const fn slot(&self, species: PpiSpecies) -> &OnceCell<Graph> {
        match species {
            PpiSpecies::Fly => &self.fly,
            PpiSpecies::Human => &self.human,
            PpiSpecies::Mouse => &self.mouse,
            PpiSpecies::Worm => &self.worm,
            PpiSpecies::Yeast => &self.yeast,
        }
    }
}

/// Reads `<dir>/<species>.txt` edge lists, caching each network after the
/// first load.
///
/// Each non-empty line that does not start with `#` names two interacting
/// proteins separated by whitespace; further columns are ignored.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// use isosweep_core::{EdgeListPpiSource, PpiSource, PpiSpecies};
///
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let dir = tempfile::tempdir()?;
/// std::fs::write(dir.path().join("yeast.txt"), "# demo\nA B\nB C\n")?;
/// let source = EdgeListPpiSource::new(dir.path());
/// let network = source.network(PpiSpecies::Yeast)?;
/// assert_eq!(network.node_count(), 3);
/// assert_eq!(network.edge_count(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct EdgeListPpiSource {
    dir: PathBuf,
    cache: SpeciesCache,
}

impl EdgeListPpiSource {
    /// Creates a source reading from `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cache: SpeciesCache::default(),
        }
    }

    /// Returns the file that holds the network for `species`.
    #[must_use]
    pub fn path_for(&self, species: PpiSpecies) -> PathBuf {
        self.dir.join(format!("{}.txt", species.as_str()))
    }
}

impl PpiSource for EdgeListPpiSource {
    fn network(&self, species: PpiSpecies) -> Result<&Graph, GraphError> {
        self.cache
            .slot(species)
            .get_or_try_init(|| load_edge_list(&self.path_for(species)))
    }
}

#[instrument(name = "ppi.load", err, fields(path = %path.display()))]
fn load_edge_list(path: &Path) -> Result<Graph, GraphError> {
    let text = fs::read_to_string(path).map_err(|source| GraphError::PpiIo {
        path: path.to_path_buf(),
        source,
    })?;
    let graph = parse_edge_list(path, &text)?;
    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "loaded interaction network"
    );
    Ok(graph)
}

fn parse_edge_list(path: &Path, text: &str) -> Result<Graph, GraphError> {
    let mut labels: HashMap<&str, usize> = HashMap::new();
    let mut edges = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let mut fields = trimmed.split_whitespace();
        let (Some(left), Some(right)) = (fields.next(), fields.next()) else {
            return Err(GraphError::PpiMalformed {
                path: path.to_path_buf(),
                line: index.saturating_add(1),
            });
        };
        let next_id = labels.len();
        let left_id = *labels.entry(left).or_insert(next_id);
        let next_id = labels.len();
        let right_id = *labels.entry(right).or_insert(next_id);
        edges.push((left_id, right_id));
    }
    Ok(Graph::from_edges(labels.len(), edges))
}

/// Collects up to `wanted` nodes breadth-first from `seed`.
fn snowball(network: &Graph, seed: usize, wanted: usize) -> Vec<usize> {
    let mut visited = vec![false; network.node_count()];
    let mut order = Vec::with_capacity(wanted);
    let mut queue = VecDeque::from([seed]);
    if let Some(flag) = visited.get_mut(seed) {
        *flag = true;
    }
    while let Some(node) = queue.pop_front() {
        order.push(node);
        if order.len() == wanted {
            break;
        }
        for neighbour in network.neighbours(node) {
            if let Some(flag) = visited.get_mut(neighbour) {
                if !*flag {
                    *flag = true;
                    queue.push_back(neighbour);
                }
            }
        }
    }
    order
}

/// Samples a connected `nodes`-node induced subgraph of `network`.
///
/// # Errors
/// Returns [`GraphError::PpiTooSmall`] when no tried seed reaches `nodes`
/// nodes.
pub(super) fn sample_connected(
    network: &Graph,
    nodes: usize,
    rng: &mut SmallRng,
) -> Result<Graph, GraphError> {
    let total = network.node_count();
    let mut best = 0_usize;
    if total >= nodes && total > 0 {
        for _ in 0..SAMPLE_SEED_TRIES {
            let seed = rng.gen_range(0..total);
            let sample = snowball(network, seed, nodes);
            if sample.len() == nodes {
                return Ok(network.induced_subgraph(&sample));
            }
            debug!(seed, reached = sample.len(), "seed component too small");
            best = best.max(sample.len());
        }
    } else {
        best = total;
    }
    Err(GraphError::PpiTooSmall {
        available: best,
        requested: nodes,
    })
}
