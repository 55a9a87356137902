//! Tectonic simulation: plate scatter, wrap-aware Voronoi assignment,
//! boundary classification, stress spreading, and coarse base elevation.

mod boundary;
mod plate;

pub use boundary::{classify_boundaries, classify_relative_motion, spread_stress};
pub use plate::TectonicPlate;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::rng::SeededRng;
use crate::world::WorldMap;

/// Configuration for the tectonic stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TectonicConfig {
    /// Probability that a plate is oceanic (~40% for Earth-like output).
    pub oceanic_fraction: f32,
    /// Scale of plate drift velocities.
    pub drift_scale: f32,
    /// Radius (cells) over which boundary stress spreads with linear falloff.
    pub stress_radius: usize,
    /// Coarse elevation assigned to oceanic plates.
    pub oceanic_base: f32,
    /// Coarse elevation assigned to continental plates.
    pub continental_base: f32,
    /// Mountain-building uplift at continental-continental convergence.
    pub convergent_uplift: f32,
    /// Volcanic-arc uplift at convergence involving oceanic crust.
    pub arc_uplift: f32,
    /// Rifting subsidence at divergent boundaries.
    pub divergent_drop: f32,
    /// Minor uplift along transform faults.
    pub transform_uplift: f32,
}

impl Default for TectonicConfig {
    fn default() -> Self {
        Self {
            oceanic_fraction: 0.4,
            drift_scale: 1.6,
            stress_radius: 8,
            oceanic_base: 0.18,
            continental_base: 0.55,
            convergent_uplift: 0.30,
            arc_uplift: 0.18,
            divergent_drop: 0.14,
            transform_uplift: 0.05,
        }
    }
}

/// Signed minimum-image offset from `from` to `to` on a grid that wraps at
/// `size` in both axes. The wrap applies to plate geometry only; the grid
/// itself does not wrap.
pub fn wrapped_delta(from: Vec2, to: Vec2, size: f32) -> Vec2 {
    let mut d = to - from;
    if size > 0.0 {
        let half = size * 0.5;
        if d.x > half {
            d.x -= size;
        } else if d.x < -half {
            d.x += size;
        }
        if d.y > half {
            d.y -= size;
        } else if d.y < -half {
            d.y += size;
        }
    }
    d
}

/// Squared wrap-aware distance between two map-space points.
pub fn wrapped_distance_sq(a: Vec2, b: Vec2, size: f32) -> f32 {
    wrapped_delta(a, b, size).length_squared()
}

/// Scatters `count` plates uniformly over the map, drawing centers, drift
/// vectors, and crust types in plate-index order.
pub fn scatter_plates(
    size: usize,
    count: usize,
    rng: &mut SeededRng,
    config: &TectonicConfig,
) -> Vec<TectonicPlate> {
    let extent = size as f32;
    (0..count)
        .map(|id| {
            let center = Vec2::new(rng.range_f32(0.0, extent), rng.range_f32(0.0, extent));
            TectonicPlate::new(id, center, rng, config.drift_scale, config.oceanic_fraction)
        })
        .collect()
}

/// Assigns every cell to its nearest plate center by wrap-aware Euclidean
/// distance. A plateless map is left untouched.
pub fn assign_plates(map: &mut WorldMap) {
    let size = map.size();
    if map.plates.is_empty() || size == 0 {
        return;
    }

    let centers: Vec<Vec2> = map.plates.iter().map(|p| p.center).collect();
    let extent = size as f32;

    for y in 0..size {
        for x in 0..size {
            let pos = Vec2::new(x as f32, y as f32);
            let mut best = 0usize;
            let mut best_d = f32::MAX;
            for (id, &center) in centers.iter().enumerate() {
                let d = wrapped_distance_sq(pos, center, extent);
                if d < best_d {
                    best_d = d;
                    best = id;
                }
            }
            map.cell_mut(x, y).plate_id = best;
        }
    }
}

/// Runs the full tectonic stage: scatter, assign, classify boundaries, spread
/// stress, and write coarse per-plate elevation plus boundary uplift.
pub fn run(map: &mut WorldMap, rng: &mut SeededRng, config: &TectonicConfig, plate_count: usize) {
    map.plates = scatter_plates(map.size(), plate_count, rng, config);
    assign_plates(map);
    classify_boundaries(map);
    let uplift = spread_stress(map, config);
    apply_base_elevation(map, config, &uplift);
}

/// Writes coarse elevation from crust type plus the spread boundary uplift,
/// clamped to [0, 1].
fn apply_base_elevation(map: &mut WorldMap, config: &TectonicConfig, uplift: &[f32]) {
    if map.plates.is_empty() {
        return;
    }
    let oceanic: Vec<bool> = map.plates.iter().map(|p| p.is_oceanic).collect();
    for (i, cell) in map.cells_mut().iter_mut().enumerate() {
        let base = if oceanic.get(cell.plate_id).copied().unwrap_or(false) {
            config.oceanic_base
        } else {
            config.continental_base
        };
        cell.elevation = (base + uplift[i]).clamp(0.0, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::BoundaryType;

    #[test]
    fn wrapped_delta_takes_shortest_path() {
        let size = 100.0;
        let d = wrapped_delta(Vec2::new(95.0, 50.0), Vec2::new(5.0, 50.0), size);
        assert!((d.x - 10.0).abs() < 1e-5);
        assert_eq!(d.y, 0.0);

        let d = wrapped_delta(Vec2::new(5.0, 2.0), Vec2::new(95.0, 98.0), size);
        assert!((d.x + 10.0).abs() < 1e-5);
        assert!((d.y + 4.0).abs() < 1e-5);
    }

    #[test]
    fn scatter_is_deterministic_and_in_bounds() {
        let config = TectonicConfig::default();
        let a = scatter_plates(64, 12, &mut SeededRng::new(5), &config);
        let b = scatter_plates(64, 12, &mut SeededRng::new(5), &config);
        assert_eq!(a.len(), 12);
        for (pa, pb) in a.iter().zip(b.iter()) {
            assert_eq!(pa.center, pb.center);
            assert_eq!(pa.drift, pb.drift);
            assert_eq!(pa.is_oceanic, pb.is_oceanic);
            assert!(pa.center.x >= 0.0 && pa.center.x < 64.0);
            assert!(pa.center.y >= 0.0 && pa.center.y < 64.0);
        }
    }

    #[test]
    fn every_cell_gets_a_valid_plate() {
        let mut map = WorldMap::new(33, 7);
        let config = TectonicConfig::default();
        map.plates = scatter_plates(33, 4, &mut SeededRng::new(7), &config);
        assign_plates(&mut map);
        assert!(map.cells().iter().all(|c| c.plate_id < 4));
        // With 4 plates on a 33x33 grid, more than one plate must own cells.
        let first = map.cells()[0].plate_id;
        assert!(map.cells().iter().any(|c| c.plate_id != first));
    }

    #[test]
    fn multi_plate_grid_has_boundaries_and_clamped_elevation() {
        let mut map = WorldMap::new(33, 7);
        let config = TectonicConfig::default();
        super::run(&mut map, &mut SeededRng::new(7).fork("tectonics"), &config, 4);

        assert!(map.cells().iter().any(|c| c.boundary_type != BoundaryType::None));
        for cell in map.cells() {
            assert!((0.0..=1.0).contains(&cell.elevation));
            assert!((0.0..=1.0).contains(&cell.boundary_stress));
        }
    }

    #[test]
    fn zero_plates_degrade_gracefully() {
        let mut map = WorldMap::new(8, 0);
        let config = TectonicConfig::default();
        super::run(&mut map, &mut SeededRng::new(0), &config, 0);
        assert!(map.plates.is_empty());
        assert!(map.cells().iter().all(|c| !c.is_boundary()));
    }
}
