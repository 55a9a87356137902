//! Heightmap synthesis: blends the tectonic base with fractal noise, applies
//! an edge falloff toward ocean, and smooths single-cell artifacts.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::noise::{FbmConfig, NoiseField, RidgedConfig, WarpConfig};
use crate::world::WorldMap;

/// Configuration for the heightmap stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeightmapConfig {
    /// Weight of the coarse tectonic elevation.
    pub tectonic_weight: f32,
    /// Weight of the continental fBm term.
    pub continent_weight: f32,
    /// Weight of the stress-modulated ridged term.
    pub ridge_weight: f32,
    /// Weight of the domain-warped fine detail term.
    pub detail_weight: f32,

    /// Base frequency of the continental fBm, in map-normalized coordinates.
    pub continent_frequency: f32,
    /// Base frequency of the ridged mountain noise.
    pub ridge_frequency: f32,
    /// Base frequency of the warped detail noise.
    pub detail_frequency: f32,

    /// Fraction of the map's outer border forced toward ocean level.
    pub edge_falloff: f32,
    /// Elevation the border falls off to.
    pub ocean_floor: f32,

    /// Number of neighbor-average smoothing passes.
    pub smoothing_passes: u32,
    /// Fraction of the original cell kept per smoothing pass.
    pub smoothing_keep: f32,
}

impl Default for HeightmapConfig {
    fn default() -> Self {
        Self {
            tectonic_weight: 0.50,
            continent_weight: 0.25,
            ridge_weight: 0.15,
            detail_weight: 0.10,
            continent_frequency: 3.0,
            ridge_frequency: 5.0,
            detail_frequency: 9.0,
            edge_falloff: 0.10,
            ocean_floor: 0.12,
            smoothing_passes: 2,
            smoothing_keep: 0.6,
        }
    }
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge1 <= edge0 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Runs the heightmap stage. The tectonic base and stress field are inputs
/// fixed before the pass, so per-cell synthesis parallelizes freely.
pub fn run(map: &mut WorldMap, noise: &NoiseField, config: &HeightmapConfig) {
    let size = map.size();
    if size == 0 {
        return;
    }

    let tectonic: Vec<f32> = map.cells().iter().map(|c| c.elevation).collect();
    let stress: Vec<f32> = map.cells().iter().map(|c| c.boundary_stress).collect();

    let continent_cfg = FbmConfig::with_frequency(config.continent_frequency);
    let ridge_cfg = RidgedConfig::with_frequency(config.ridge_frequency);
    let warp_cfg = WarpConfig {
        strength: 0.35,
        fbm: FbmConfig::with_frequency(config.detail_frequency),
    };

    let inv = 1.0 / size as f32;
    let margin = (size as f32 * config.edge_falloff).max(1.0);

    let mut heights: Vec<f32> = (0..size * size)
        .into_par_iter()
        .map(|i| {
            let x = i % size;
            let y = i / size;
            let nx = x as f32 * inv;
            let ny = y as f32 * inv;

            let continent = 0.5 * (noise.fbm2(nx, ny, &continent_cfg) + 1.0);
            let ridge = noise.ridged2(nx, ny, &ridge_cfg) * stress[i];
            let detail = 0.5 * (noise.warped2(nx, ny, &warp_cfg) + 1.0);

            let mut elevation = config.tectonic_weight * tectonic[i]
                + config.continent_weight * continent
                + config.ridge_weight * ridge
                + config.detail_weight * detail;

            // Force the outer border toward ocean so the landmass is bounded.
            let edge_dist = x.min(y).min(size - 1 - x).min(size - 1 - y) as f32;
            let t = smoothstep(0.0, margin, edge_dist);
            elevation = config.ocean_floor + (elevation - config.ocean_floor) * t;

            elevation.clamp(0.0, 1.0)
        })
        .collect();

    for _ in 0..config.smoothing_passes {
        heights = smooth_pass(&heights, size, config.smoothing_keep);
    }

    map.set_elevations(&heights);
}

/// One smoothing pass: blends each cell with its 8-neighbor average, reading
/// from a frozen snapshot and writing a fresh buffer.
fn smooth_pass(heights: &[f32], size: usize, keep: f32) -> Vec<f32> {
    (0..size * size)
        .into_par_iter()
        .map(|i| {
            let x = (i % size) as isize;
            let y = (i / size) as isize;

            let mut sum = 0.0f32;
            let mut count = 0.0f32;
            for dy in -1isize..=1 {
                for dx in -1isize..=1 {
                    if dx == 0 && dy == 0 {
                        continue;
                    }
                    let (nx, ny) = (x + dx, y + dy);
                    if nx < 0 || ny < 0 || nx >= size as isize || ny >= size as isize {
                        continue;
                    }
                    sum += heights[ny as usize * size + nx as usize];
                    count += 1.0;
                }
            }

            if count == 0.0 {
                heights[i]
            } else {
                keep * heights[i] + (1.0 - keep) * (sum / count)
            }
        })
        .collect()
}
