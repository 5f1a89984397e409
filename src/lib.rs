//! # McBoole Logic Minimizer
//!
//! Exact two-level minimization of multi-output Boolean functions, after the
//! McBoole algorithm.
//!
//! ## Overview
//!
//! A function is given as a [`Cover`]: a list of cubes, each with a ternary
//! input part (`0`, `1` or don't care) and one bit per output (`0`, `1` or
//! don't care). Minimization runs in two phases:
//!
//! 1. **Prime implicant generation** ([`primes`]). The cubes are split
//!    recursively on their input variables, then merged back two halves at a
//!    time with the star product. Every merge links the new cube to the cubes
//!    it overlaps, so the result is the set of prime implicants laid out in a
//!    [covering graph](graph::CoveringGraph).
//! 2. **Covering** ([`solve`]). Essential primes are retained first, then
//!    primes dominated by cheaper ones are dropped. What is left forms cycles,
//!    which are cut into independent partitions and solved by branch and
//!    bound. The outputs of the retained cubes are then made irredundant.
//!
//! The result has the minimum number of cubes, unless the branching depth
//! limit of [`MinimizeConfig`] was hit, in which case
//! [`MinimizeStats::heuristic`] is set.
//!
//! ## Example
//!
//! ```
//! use mcboole_logic::{minimize, Cover, MinimizeConfig};
//!
//! # fn main() -> Result<(), mcboole_logic::MinimizeError> {
//! // f = a'b' + a'b + ab
//! let mut cover = Cover::new(2, 1);
//! cover.add_cube(&[Some(false), Some(false)], &[Some(true)]);
//! cover.add_cube(&[Some(false), Some(true)], &[Some(true)]);
//! cover.add_cube(&[Some(true), Some(true)], &[Some(true)]);
//!
//! let result = minimize(&cover, &MinimizeConfig::default())?;
//! assert_eq!(result.cover.num_cubes(), 2); // a' + b
//! assert_eq!(result.stats.essential_implicants, 2);
//! # Ok(())
//! # }
//! ```
//!
//! ## Cube files
//!
//! Covers can be read from and written to the plain text cube format of the
//! McBoole tool, see [`format`]:
//!
//! ```
//! use mcboole_logic::{minimize, Cover, CubeFileReader, CubeFileWriter, CubeFormat, MinimizeConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let format = CubeFormat::default();
//! let cover = Cover::from_cube_string("00 1\n01 1\n11 1\n", &format)?;
//! let result = minimize(&cover, &MinimizeConfig::default())?;
//! print!("{}", result.cover.to_cube_string(&format)?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Thread Safety
//!
//! [`minimize`] owns all of its working state, so different covers can be
//! minimized concurrently from different threads.

pub mod arena;
pub mod cover;
pub mod cube;
pub mod error;
pub mod format;
pub mod graph;
pub mod primes;
pub mod solve;
pub mod verify;

use log::debug;

pub use cover::{Cover, CubesIter};
pub use error::{CubeFileError, CubeReadError, CubeWriteError, MinimizeError};
pub use format::{CubeFileReader, CubeFileWriter, CubeFormat};
pub use solve::MinimizeStats;
pub use verify::Comparison;

use graph::CoveringGraph;

/// Configuration of a minimization run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinimizeConfig {
    /// Reject covers whose cubes overlap instead of merging them
    ///
    /// **Default:** `false`
    pub disjoint_required: bool,

    /// Prefer primes with fewer input literals when dropping dominated ones
    ///
    /// **Default:** `false`
    pub minimize_literals: bool,

    /// Deepest level of branching explored exactly
    ///
    /// Beyond it the solver picks nodes greedily and the result may not be
    /// minimum.
    ///
    /// **Default:** `10`
    pub branch_depth_limit: usize,
}

impl Default for MinimizeConfig {
    fn default() -> Self {
        MinimizeConfig {
            disjoint_required: false,
            minimize_literals: false,
            branch_depth_limit: 10,
        }
    }
}

impl MinimizeConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }
}

/// Result of [`minimize`]
#[derive(Debug, Clone)]
pub struct Minimized {
    /// The minimum cover, with irredundant outputs
    pub cover: Cover,
    /// The essential prime implicants, all of which are also in `cover`
    pub essentials: Cover,
    pub stats: MinimizeStats,
}

/// Minimize a cover
///
/// Cubes with no output set are ignored. Don't care outputs are used to
/// enlarge the primes but are never required to be covered.
pub fn minimize(cover: &Cover, config: &MinimizeConfig) -> Result<Minimized, MinimizeError> {
    let layout = *cover.layout();
    debug!(
        "minimizing {} cubes with {} inputs and {} outputs",
        cover.num_cubes(),
        layout.inputs(),
        layout.outputs()
    );

    let mut graph = CoveringGraph::new(layout);
    let cubes = cover
        .cubes()
        .iter()
        .map(|cube| graph.add_node(cube.clone()))
        .collect();
    let primes = primes::generate(&mut graph, cubes, config.disjoint_required)?;
    let solution = solve::solve(&mut graph, primes, config);

    let collect = |ids: &[graph::NodeId]| {
        let mut result = Cover::with_layout(layout);
        for &id in ids {
            result.push(graph[id].cube.clone());
        }
        result
    };
    Ok(Minimized {
        cover: collect(&solution.retained),
        essentials: collect(&solution.essentials),
        stats: solution.stats,
    })
}
