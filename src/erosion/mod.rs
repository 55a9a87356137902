//! Erosion stage: particle-based hydraulic erosion followed by thermal
//! (talus) relaxation.
//!
//! Hydraulic droplets are processed strictly sequentially (each droplet's
//! terrain effect is input to the next), which is what makes results
//! reproducible. The thermal pass is double-buffered and is the only part an
//! accelerated backend parallelizes; droplet ordering and step semantics are
//! identical across backends.

pub mod hydraulic;
pub mod thermal;

use serde::{Deserialize, Serialize};

use crate::rng::SeededRng;
use crate::world::WorldMap;

/// Which implementation runs the erosion stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ErosionBackend {
    /// Use the accelerated path when the capability probe succeeds,
    /// otherwise fall back to the reference implementation.
    #[default]
    Auto,
    /// Force the single-threaded reference implementation.
    Reference,
    /// Force the accelerated (parallel thermal pass) implementation.
    Accelerated,
}

/// Accelerator capability, queried once per stage run.
pub struct Accelerator;

impl Accelerator {
    /// True when a worker pool is available for the parallel thermal pass.
    pub fn available() -> bool {
        rayon::current_num_threads() > 1
    }
}

/// Parameters for hydraulic and thermal erosion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErosionConfig {
    /// Backend selection strategy.
    pub backend: ErosionBackend,

    /// Step budget per droplet.
    pub max_droplet_steps: u32,
    /// How strongly a droplet keeps its previous direction (0 = pure
    /// gradient descent, 1 = never turns).
    pub inertia: f32,
    /// Sediment capacity multiplier (Kc).
    pub capacity_factor: f32,
    /// Slope floor used in the capacity formula, avoiding degenerate flats.
    pub min_slope: f32,
    /// Fraction of spare capacity eroded per step (Ks).
    pub erosion_rate: f32,
    /// Fraction of excess sediment deposited per step (Kd).
    pub deposition_rate: f32,
    /// Radius (cells) over which eroded material is removed, weighted by
    /// distance.
    pub erosion_radius: u32,
    /// Water fraction lost per step.
    pub evaporation: f32,
    /// Acceleration applied along the slope.
    pub gravity: f32,
    /// Water volume a droplet spawns with.
    pub initial_water: f32,
    /// Speed a droplet spawns with.
    pub initial_speed: f32,
    /// A droplet terminates once its water falls below this.
    pub min_water: f32,

    /// Thermal relaxation iterations.
    pub thermal_iterations: u32,
    /// Height difference above which material slides to a lower neighbor.
    pub talus_threshold: f32,
    /// Fraction of the excess difference moved per iteration.
    pub thermal_strength: f32,
}

impl Default for ErosionConfig {
    fn default() -> Self {
        Self {
            backend: ErosionBackend::default(),
            max_droplet_steps: 60,
            inertia: 0.05,
            capacity_factor: 4.0,
            min_slope: 0.01,
            erosion_rate: 0.3,
            deposition_rate: 0.3,
            erosion_radius: 3,
            evaporation: 0.015,
            gravity: 4.0,
            initial_water: 1.0,
            initial_speed: 1.0,
            min_water: 0.01,
            thermal_iterations: 8,
            talus_threshold: 0.012,
            thermal_strength: 0.5,
        }
    }
}

/// Runs the erosion stage: `droplets` hydraulic particles in RNG-draw order,
/// then thermal relaxation. A composite stage: each sub-stage forks its own
/// child stream from `rng`.
pub fn run(map: &mut WorldMap, rng: &SeededRng, droplets: usize, config: &ErosionConfig) {
    let size = map.size();
    if size < 2 {
        return;
    }

    let mut heights = map.elevations();

    let mut hydraulic_rng = rng.fork("hydraulic");
    hydraulic::erode(&mut heights, size, droplets, &mut hydraulic_rng, config);

    let parallel = match config.backend {
        ErosionBackend::Reference => false,
        ErosionBackend::Accelerated => true,
        ErosionBackend::Auto => Accelerator::available(),
    };
    thermal::relax(&mut heights, size, config, parallel);

    map.set_elevations(&heights);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_droplets_leaves_only_thermal_changes() {
        let mut config = ErosionConfig::default();
        config.thermal_iterations = 0;

        let mut map = WorldMap::new(16, 3);
        for (i, cell) in map.cells_mut().iter_mut().enumerate() {
            cell.elevation = (i % 7) as f32 / 10.0;
        }
        let before = map.elevations();

        let rng = SeededRng::new(3).fork("erosion");
        run(&mut map, &rng, 0, &config);
        assert_eq!(map.elevations(), before);
    }

    #[test]
    fn backends_agree_exactly() {
        let mut reference_map = WorldMap::new(32, 5);
        let mut accelerated_map = WorldMap::new(32, 5);
        for map in [&mut reference_map, &mut accelerated_map] {
            for (i, cell) in map.cells_mut().iter_mut().enumerate() {
                let x = (i % 32) as f32 / 32.0;
                let y = (i / 32) as f32 / 32.0;
                cell.elevation = 0.3 + 0.4 * (x * 6.0).sin().abs() * (y * 4.0).cos().abs();
            }
        }

        let rng = SeededRng::new(5).fork("erosion");
        let reference_cfg = ErosionConfig {
            backend: ErosionBackend::Reference,
            ..Default::default()
        };
        let accelerated_cfg = ErosionConfig {
            backend: ErosionBackend::Accelerated,
            ..Default::default()
        };

        run(&mut reference_map, &rng, 500, &reference_cfg);
        run(&mut accelerated_map, &rng, 500, &accelerated_cfg);

        assert_eq!(reference_map.elevations(), accelerated_map.elevations());
    }

    #[test]
    fn erosion_keeps_elevation_in_range() {
        let mut map = WorldMap::new(24, 11);
        for (i, cell) in map.cells_mut().iter_mut().enumerate() {
            cell.elevation = ((i * 37) % 100) as f32 / 100.0;
        }
        let rng = SeededRng::new(11).fork("erosion");
        run(&mut map, &rng, 2_000, &ErosionConfig::default());

        for cell in map.cells() {
            assert!((0.0..=1.0).contains(&cell.elevation));
        }
    }
}
