//! Embark-site scoring: picks a good square sub-region of a generated world.

use serde::{Deserialize, Serialize};

use crate::biomes::Biome;
use crate::rng::SeededRng;
use crate::world::WorldMap;

/// Number of candidate centers sampled per search.
const CANDIDATES: usize = 48;

/// Ocean cut-off used by the scoring penalties.
const SEA_LEVEL: f32 = 0.30;
/// Most livable elevation; candidates are rewarded for sitting near it.
const IDEAL_ELEVATION: f32 = 0.45;

/// A rectangular sub-window of the grid, produced by post-pipeline scoring
/// and consumed by the colony bootstrap to seed the playable map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbarkRegion {
    pub center_x: usize,
    pub center_y: usize,
    pub size: usize,
}

impl EmbarkRegion {
    /// Inclusive-exclusive bounds `(x0, y0, x1, y1)` of the window.
    pub fn bounds(&self) -> (usize, usize, usize, usize) {
        let half = self.size / 2;
        let x0 = self.center_x - half.min(self.center_x);
        let y0 = self.center_y - half.min(self.center_y);
        (x0, y0, x0 + self.size, y0 + self.size)
    }

    /// True when (x, y) lies inside the window.
    pub fn contains(&self, x: usize, y: usize) -> bool {
        let (x0, y0, x1, y1) = self.bounds();
        x >= x0 && x < x1 && y >= y0 && y < y1
    }
}

/// How attractive a biome is as colony ground.
fn biome_preference(biome: Biome) -> f32 {
    match biome {
        Biome::Grassland | Biome::TemperateForest => 1.0,
        Biome::Riverbank => 0.9,
        Biome::BorealForest | Biome::TropicalForest | Biome::Shrubland => 0.7,
        Biome::Savanna | Biome::TemperateRainforest => 0.6,
        Biome::TropicalRainforest | Biome::Marsh => 0.4,
        Biome::Beach | Biome::Lake | Biome::River => 0.3,
        Biome::Tundra | Biome::ColdDesert | Biome::Desert => 0.1,
        Biome::Alpine => 0.05,
        Biome::SnowPeak => 0.0,
        Biome::Ocean | Biome::DeepOcean => -0.5,
    }
}

/// Average per-cell score of the `size` window centered at (cx, cy).
fn score_window(map: &WorldMap, cx: usize, cy: usize, size: usize) -> f32 {
    let half = size / 2;
    let x0 = cx.saturating_sub(half);
    let y0 = cy.saturating_sub(half);

    let mut total = 0.0f32;
    let mut cells = 0.0f32;
    for y in y0..(y0 + size).min(map.size()) {
        for x in x0..(x0 + size).min(map.size()) {
            let cell = map.cell(x, y);

            let mut score = cell.biome.map(biome_preference).unwrap_or(0.0);

            let e = cell.elevation;
            score += 0.8 * (1.0 - ((e - IDEAL_ELEVATION).abs() * 3.0).min(1.0));
            if cell.is_river {
                score += 0.8;
            }
            if cell.is_lake {
                score += 0.5;
            }
            score += 0.3 * cell.moisture;
            if cell.ore.is_some() {
                score += 0.6;
            }
            if e <= SEA_LEVEL {
                score -= 1.0;
            }
            if e >= 0.8 {
                score -= 0.7;
            }

            total += score;
            cells += 1.0;
        }
    }

    if cells == 0.0 {
        f32::MIN
    } else {
        total / cells
    }
}

/// Samples candidate centers and returns the best-scoring embark window,
/// always fully inside the map.
pub fn best_region(map: &WorldMap, embark_size: usize, rng: &mut SeededRng) -> EmbarkRegion {
    let map_size = map.size();
    let size = embark_size.clamp(1, map_size.max(1));
    let half = size / 2;

    // Window no smaller than the map: the whole map is the region.
    if size >= map_size {
        return EmbarkRegion {
            center_x: map_size / 2,
            center_y: map_size / 2,
            size: map_size,
        };
    }

    let span = map_size - size + 1;
    let mut best = EmbarkRegion {
        center_x: map_size / 2,
        center_y: map_size / 2,
        size,
    };
    let mut best_score = f32::MIN;

    for _ in 0..CANDIDATES {
        let cx = half + rng.index(span);
        let cy = half + rng.index(span);
        let score = score_window(map, cx, cy, size);
        if score > best_score {
            best_score = score;
            best = EmbarkRegion {
                center_x: cx,
                center_y: cy,
                size,
            };
        }
    }

    best
}
