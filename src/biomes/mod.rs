//! Biome classification: elevation tiers first, then a Whittaker-style
//! temperature x moisture lookup for the land tier, with river/lake
//! adjacency and saturation overrides.

mod config;

pub use config::BiomeConfig;

use serde::{Deserialize, Serialize};

use crate::world::WorldMap;

/// Biome assignment for a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Biome {
    DeepOcean,
    Ocean,
    Beach,
    River,
    Lake,
    Riverbank,
    Marsh,
    Tundra,
    BorealForest,
    ColdDesert,
    Grassland,
    Shrubland,
    Savanna,
    Desert,
    TemperateForest,
    TemperateRainforest,
    TropicalForest,
    TropicalRainforest,
    Alpine,
    SnowPeak,
}

impl Biome {
    /// True for open-water biomes.
    pub fn is_water(self) -> bool {
        matches!(self, Biome::DeepOcean | Biome::Ocean | Biome::River | Biome::Lake)
    }

    /// Base vegetation density for this biome, before climate modulation.
    pub fn base_vegetation(self) -> f32 {
        match self {
            Biome::DeepOcean | Biome::Ocean | Biome::River | Biome::Lake => 0.0,
            Biome::Beach => 0.05,
            Biome::Riverbank => 0.65,
            Biome::Marsh => 0.75,
            Biome::Tundra => 0.15,
            Biome::BorealForest => 0.65,
            Biome::ColdDesert => 0.05,
            Biome::Grassland => 0.45,
            Biome::Shrubland => 0.35,
            Biome::Savanna => 0.35,
            Biome::Desert => 0.03,
            Biome::TemperateForest => 0.70,
            Biome::TemperateRainforest => 0.85,
            Biome::TropicalForest => 0.75,
            Biome::TropicalRainforest => 0.95,
            Biome::Alpine => 0.20,
            Biome::SnowPeak => 0.0,
        }
    }

    /// RGB preview color, for map exports.
    pub fn preview_rgb(self) -> [u8; 3] {
        match self {
            Biome::DeepOcean => [8, 36, 84],
            Biome::Ocean => [22, 70, 130],
            Biome::Beach => [222, 206, 156],
            Biome::River => [60, 120, 200],
            Biome::Lake => [50, 110, 185],
            Biome::Riverbank => [80, 150, 90],
            Biome::Marsh => [70, 120, 95],
            Biome::Tundra => [170, 190, 170],
            Biome::BorealForest => [30, 80, 40],
            Biome::ColdDesert => [180, 175, 150],
            Biome::Grassland => [130, 180, 90],
            Biome::Shrubland => [150, 160, 100],
            Biome::Savanna => [190, 190, 95],
            Biome::Desert => [220, 205, 140],
            Biome::TemperateForest => [40, 120, 60],
            Biome::TemperateRainforest => [20, 100, 60],
            Biome::TropicalForest => [50, 150, 70],
            Biome::TropicalRainforest => [20, 140, 55],
            Biome::Alpine => [140, 140, 140],
            Biome::SnowPeak => [240, 248, 255],
        }
    }
}

// Whittaker-style lookup: rows are temperature bands (cold to hot), columns
// moisture bands (dry to wet).
const TEMP_BANDS: usize = 6;
const MOISTURE_BANDS: usize = 5;

const LAND_TABLE: [[Biome; MOISTURE_BANDS]; TEMP_BANDS] = [
    [
        Biome::Tundra,
        Biome::Tundra,
        Biome::Tundra,
        Biome::Tundra,
        Biome::Tundra,
    ],
    [
        Biome::ColdDesert,
        Biome::Tundra,
        Biome::Tundra,
        Biome::BorealForest,
        Biome::BorealForest,
    ],
    [
        Biome::ColdDesert,
        Biome::Grassland,
        Biome::Shrubland,
        Biome::BorealForest,
        Biome::BorealForest,
    ],
    [
        Biome::ColdDesert,
        Biome::Grassland,
        Biome::Shrubland,
        Biome::TemperateForest,
        Biome::TemperateRainforest,
    ],
    [
        Biome::Desert,
        Biome::Grassland,
        Biome::Savanna,
        Biome::TemperateForest,
        Biome::TemperateRainforest,
    ],
    [
        Biome::Desert,
        Biome::Savanna,
        Biome::Savanna,
        Biome::TropicalForest,
        Biome::TropicalRainforest,
    ],
];

/// The land-tier biome for a temperature/moisture pair.
pub fn land_biome(temperature: f32, moisture: f32) -> Biome {
    let t = ((temperature * TEMP_BANDS as f32) as usize).min(TEMP_BANDS - 1);
    let m = ((moisture * MOISTURE_BANDS as f32) as usize).min(MOISTURE_BANDS - 1);
    LAND_TABLE[t][m]
}

/// Classifies one cell. Tiered by elevation first; the land tier consults
/// the Whittaker table, then river/lake adjacency and saturation overrides.
fn classify_cell(map: &WorldMap, x: usize, y: usize, cfg: &BiomeConfig) -> Biome {
    let cell = map.cell(x, y);

    if cell.is_lake {
        return Biome::Lake;
    }
    if cell.is_river {
        return Biome::River;
    }

    let e = cell.elevation;
    if e <= cfg.deep_ocean_level {
        return Biome::DeepOcean;
    }
    if e <= cfg.sea_level {
        return Biome::Ocean;
    }
    if e <= cfg.beach_level {
        return Biome::Beach;
    }
    if e >= cfg.snow_line {
        return Biome::SnowPeak;
    }
    if e >= cfg.alpine_line {
        return Biome::Alpine;
    }

    // Saturated lowland overrides the table outright.
    if cell.moisture >= cfg.marsh_moisture && cell.rainfall >= cfg.marsh_rainfall {
        return Biome::Marsh;
    }

    // Water adjacency overrides.
    let mut by_river = false;
    let mut by_lake = false;
    for (nx, ny) in map.neighbors8(x, y) {
        let n = map.cell(nx, ny);
        by_river |= n.is_river;
        by_lake |= n.is_lake;
    }
    if by_river {
        return Biome::Riverbank;
    }
    if by_lake {
        return Biome::Marsh;
    }

    land_biome(cell.temperature, cell.moisture)
}

/// Runs the biome stage. Every cell receives an assignment: total coverage,
/// no unset cells survive.
pub fn run(map: &mut WorldMap, cfg: &BiomeConfig) {
    let size = map.size();
    let mut assignments = Vec::with_capacity(size * size);
    for y in 0..size {
        for x in 0..size {
            assignments.push(classify_cell(map, x, y, cfg));
        }
    }
    for (cell, biome) in map.cells_mut().iter_mut().zip(assignments) {
        cell.biome = Some(biome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_sane_extremes() {
        assert_eq!(land_biome(0.0, 0.0), Biome::Tundra);
        assert_eq!(land_biome(1.0, 0.0), Biome::Desert);
        assert_eq!(land_biome(1.0, 1.0), Biome::TropicalRainforest);
        assert_eq!(land_biome(0.5, 0.9), Biome::TemperateRainforest);
    }

    #[test]
    fn elevation_tiers_take_precedence() {
        let mut map = WorldMap::new(4, 0);
        let cfg = BiomeConfig::default();
        for (i, cell) in map.cells_mut().iter_mut().enumerate() {
            cell.temperature = 0.9;
            cell.moisture = 0.9;
            cell.elevation = match i % 4 {
                0 => 0.05, // deep ocean
                1 => 0.25, // ocean
                2 => 0.32, // beach
                _ => 0.95, // snow peak
            };
        }
        run(&mut map, &cfg);

        assert_eq!(map.cell(0, 0).biome, Some(Biome::DeepOcean));
        assert_eq!(map.cell(1, 0).biome, Some(Biome::Ocean));
        assert_eq!(map.cell(2, 0).biome, Some(Biome::Beach));
        assert_eq!(map.cell(3, 0).biome, Some(Biome::SnowPeak));
    }

    #[test]
    fn river_flags_and_adjacency_override_the_table() {
        let mut map = WorldMap::new(5, 0);
        let cfg = BiomeConfig::default();
        for cell in map.cells_mut() {
            cell.elevation = 0.5;
            cell.temperature = 0.6;
            cell.moisture = 0.4;
            cell.rainfall = 0.3;
        }
        map.cell_mut(2, 2).is_river = true;
        run(&mut map, &cfg);

        assert_eq!(map.cell(2, 2).biome, Some(Biome::River));
        assert_eq!(map.cell(1, 2).biome, Some(Biome::Riverbank));
        assert_eq!(map.cell(2, 1).biome, Some(Biome::Riverbank));
        // Beyond adjacency, the table rules.
        assert_ne!(map.cell(0, 0).biome, Some(Biome::Riverbank));
    }

    #[test]
    fn saturated_lowland_becomes_marsh() {
        let mut map = WorldMap::new(3, 0);
        let cfg = BiomeConfig::default();
        for cell in map.cells_mut() {
            cell.elevation = 0.4;
            cell.temperature = 0.6;
            cell.moisture = 0.95;
            cell.rainfall = 0.8;
        }
        run(&mut map, &cfg);
        assert!(map.cells().iter().all(|c| c.biome == Some(Biome::Marsh)));
    }

    #[test]
    fn every_cell_is_covered() {
        let mut map = WorldMap::new(16, 0);
        for (i, cell) in map.cells_mut().iter_mut().enumerate() {
            cell.elevation = ((i * 61) % 100) as f32 / 100.0;
            cell.temperature = ((i * 31) % 100) as f32 / 100.0;
            cell.moisture = ((i * 17) % 100) as f32 / 100.0;
        }
        run(&mut map, &BiomeConfig::default());
        assert!(map.cells().iter().all(|c| c.biome.is_some()));
    }
}
