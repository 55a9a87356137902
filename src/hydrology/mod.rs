//! Hydrology: sink filling, D8 flow routing, flow accumulation, river
//! tracing, and lake detection.

mod fill;
mod flow;
mod rivers;

pub use fill::fill_sinks;
pub use flow::{flow_accumulation, flow_directions, NO_FLOW};
pub use rivers::{flag_lakes, trace_rivers};

use serde::{Deserialize, Serialize};

use crate::world::WorldMap;

/// Configuration for the hydrology stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HydrologyConfig {
    /// Elevation at or below which a cell is ocean (an outlet).
    pub sea_level: f32,
    /// Minimum downhill step enforced by sink filling.
    pub fill_epsilon: f32,
    /// Hard cap on sink-filling sweeps.
    pub max_fill_iterations: u32,

    /// River threshold is `max(16, size * size / river_accum_divisor)`
    /// contributing cells, so river density stays stable across map sizes.
    pub river_accum_divisor: usize,
    /// Maximum number of rivers traced.
    pub max_rivers: usize,
    /// Minimum traced length for a path to count as a river.
    pub min_river_length: usize,

    /// Lakes form within this elevation band above sea level.
    pub lake_band: f32,
    /// Lake seeds need at least this fraction of the river threshold in
    /// accumulation.
    pub lake_accum_fraction: f32,
    /// Lake seeds need at least this much moisture.
    pub lake_moisture_min: f32,
    /// Neighbor cells within this elevation delta are absorbed into the lake.
    pub lake_merge_delta: f32,
}

impl Default for HydrologyConfig {
    fn default() -> Self {
        Self {
            sea_level: 0.30,
            fill_epsilon: 1e-4,
            max_fill_iterations: 200,
            river_accum_divisor: 48,
            max_rivers: 32,
            min_river_length: 6,
            lake_band: 0.22,
            lake_accum_fraction: 0.25,
            lake_moisture_min: 0.5,
            lake_merge_delta: 0.02,
        }
    }
}

impl HydrologyConfig {
    /// Accumulation threshold (contributing cells) for river extraction.
    pub fn river_threshold(&self, size: usize) -> u32 {
        ((size * size / self.river_accum_divisor.max(1)).max(16)) as u32
    }
}

/// Runs the hydrology stage: fills sinks so every land cell drains, routes
/// D8 flow, accumulates, traces rivers, and flags lakes.
pub fn run(map: &mut WorldMap, config: &HydrologyConfig) {
    let size = map.size();
    if size < 3 {
        return;
    }

    let mut heights = map.elevations();
    fill_sinks(
        &mut heights,
        size,
        config.sea_level,
        config.fill_epsilon,
        config.max_fill_iterations,
    );
    map.set_elevations(&heights);
    let heights = map.elevations();

    let downstream = flow_directions(&heights, size, config.sea_level);
    let accumulation = flow_accumulation(&downstream, size);

    trace_rivers(map, &downstream, &accumulation, config);
    flag_lakes(map, &accumulation, config);
}
