//! Generation parameters.

use serde::{Deserialize, Serialize};

/// Scalar parameters for one generation run. Immutable once the run starts.
///
/// Callers are responsible for passing sane values; out-of-range parameters
/// degrade to trivial output (zero droplets skips erosion, zero plates leaves
/// a plateless grid) rather than crashing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldGenParams {
    /// Sole source of all randomness for the run.
    pub seed: u64,
    /// Square grid dimension.
    pub map_size: usize,
    /// Number of tectonic plates to scatter.
    pub plate_count: usize,
    /// Hydraulic erosion droplet budget.
    pub erosion_droplets: usize,
    /// Side length of the embark window; at most `map_size`.
    pub embark_size: usize,
}

impl Default for WorldGenParams {
    fn default() -> Self {
        Self {
            seed: 0,
            map_size: 257,
            plate_count: 12,
            erosion_droplets: 500_000,
            embark_size: 50,
        }
    }
}

impl WorldGenParams {
    /// Default parameters with the given seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    /// A small, fast configuration for tests and previews.
    pub fn small(seed: u64) -> Self {
        Self {
            seed,
            map_size: 65,
            plate_count: 6,
            erosion_droplets: 20_000,
            embark_size: 16,
        }
    }
}
