//! Detail pass: ore and gemstone placement plus vegetation density.

use serde::{Deserialize, Serialize};

use crate::geology::RockType;
use crate::noise::NoiseField;
use crate::rng::SeededRng;
use crate::world::WorldMap;

/// Ore deposit categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OreType {
    Iron,
    Copper,
    Tin,
    Coal,
    Silver,
    Gold,
    /// Generic category resolved to a specific gemstone from the host rock.
    Gemstone,
}

/// Specific gemstones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GemstoneType {
    Amethyst,
    Topaz,
    Garnet,
    Emerald,
    Ruby,
    Sapphire,
    Opal,
    Diamond,
}

/// Ores that can occur in `rock`, ordered common to rare.
pub fn compatible_ores(rock: RockType) -> &'static [OreType] {
    match rock {
        RockType::Granite => &[OreType::Copper, OreType::Iron, OreType::Tin, OreType::Gemstone],
        RockType::Basalt => &[OreType::Iron, OreType::Copper],
        RockType::Gabbro => &[OreType::Iron, OreType::Copper, OreType::Silver],
        RockType::Obsidian => &[OreType::Gemstone],
        RockType::Sandstone => &[OreType::Coal, OreType::Copper],
        RockType::Limestone => &[OreType::Coal, OreType::Iron],
        RockType::Shale => &[OreType::Coal],
        RockType::Slate => &[OreType::Coal, OreType::Silver],
        RockType::Schist => &[OreType::Silver, OreType::Gemstone],
        RockType::Gneiss => &[OreType::Iron, OreType::Silver, OreType::Gold],
        RockType::Marble => &[OreType::Gold, OreType::Gemstone],
        RockType::Quartzite => &[OreType::Gold, OreType::Gemstone],
    }
}

/// Gemstones hosted by `rock`. Non-empty for every rock whose ore list
/// includes the gemstone category.
pub fn compatible_gemstones(rock: RockType) -> &'static [GemstoneType] {
    match rock {
        RockType::Granite => &[GemstoneType::Amethyst, GemstoneType::Topaz, GemstoneType::Garnet],
        RockType::Obsidian => &[GemstoneType::Opal],
        RockType::Schist => &[GemstoneType::Garnet, GemstoneType::Emerald],
        RockType::Marble => &[GemstoneType::Ruby, GemstoneType::Sapphire],
        RockType::Quartzite => &[GemstoneType::Amethyst, GemstoneType::Diamond],
        _ => &[],
    }
}

/// Configuration for the detail pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailConfig {
    /// Frequency of the dedicated ore noise field, in map-normalized
    /// coordinates.
    pub ore_frequency: f32,
    /// Noise value above which a deposit forms.
    pub ore_threshold: f32,
    /// No deposits below this elevation.
    pub ore_elevation_floor: f32,
    /// Depth levels used for the mid-depth rock lookup.
    pub column_depth: usize,

    /// Vegetation boost next to rivers.
    pub river_vegetation_boost: f32,
    /// Vegetation boost next to lakes.
    pub lake_vegetation_boost: f32,
}

impl Default for DetailConfig {
    fn default() -> Self {
        Self {
            ore_frequency: 7.0,
            ore_threshold: 0.55,
            ore_elevation_floor: 0.33,
            column_depth: 10,
            river_vegetation_boost: 0.15,
            lake_vegetation_boost: 0.10,
        }
    }
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0).max(1e-6)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

// Noise plane offset separating the ore field from the terrain fields.
const ORE_NOISE_PLANE: f32 = 29.0;

/// Runs the detail pass. Ore draws consume `rng` in row-major cell order;
/// whether a cell draws at all is decided by the pure noise field, so the
/// sequence is deterministic.
pub fn run(map: &mut WorldMap, noise: &NoiseField, rng: &mut SeededRng, config: &DetailConfig) {
    let size = map.size();
    if size == 0 {
        return;
    }
    let inv = 1.0 / size as f32;

    for y in 0..size {
        for x in 0..size {
            place_ore(map, noise, rng, config, x, y, inv);

            let cell = map.cell(x, y);
            let biome = cell.biome;
            let temperature = cell.temperature;
            let moisture = cell.moisture;

            let mut vegetation = match biome {
                Some(b) => b.base_vegetation(),
                None => 0.0,
            };
            if vegetation > 0.0 {
                let temp_w = smoothstep(0.15, 0.75, temperature);
                let moist_w = smoothstep(0.10, 0.80, moisture);
                vegetation *= 0.35 + 0.65 * temp_w * moist_w;

                let mut near_river = false;
                let mut near_lake = false;
                for (nx, ny) in map.neighbors8(x, y) {
                    let n = map.cell(nx, ny);
                    near_river |= n.is_river;
                    near_lake |= n.is_lake;
                }
                if near_river {
                    vegetation += config.river_vegetation_boost;
                }
                if near_lake {
                    vegetation += config.lake_vegetation_boost;
                }
            }

            map.cell_mut(x, y).vegetation_density = vegetation.clamp(0.0, 1.0);
        }
    }
}

fn place_ore(
    map: &mut WorldMap,
    noise: &NoiseField,
    rng: &mut SeededRng,
    config: &DetailConfig,
    x: usize,
    y: usize,
    inv: f32,
) {
    if map.cell(x, y).elevation <= config.ore_elevation_floor {
        return;
    }

    let sample = 0.5
        * (noise.sample3(
            x as f32 * inv * config.ore_frequency,
            y as f32 * inv * config.ore_frequency,
            ORE_NOISE_PLANE,
        ) + 1.0);
    if sample <= config.ore_threshold {
        return;
    }
    let richness = (sample - config.ore_threshold) / (1.0 - config.ore_threshold).max(1e-6);

    let Some(column) = map.column(x, y) else {
        return;
    };
    let rock = column.rock_at_depth(config.column_depth / 2, config.column_depth);

    let ores = compatible_ores(rock);
    if ores.is_empty() {
        return;
    }
    // Richer deposits draw from deeper into the rarity-ordered list.
    let reach = 1 + (richness * (ores.len() - 1) as f32).round() as usize;
    let ore = ores[rng.index(reach.min(ores.len()))];

    let gemstone = if ore == OreType::Gemstone {
        let gems = compatible_gemstones(rock);
        if gems.is_empty() {
            None
        } else {
            Some(gems[rng.index(gems.len())])
        }
    } else {
        None
    };

    let cell = map.cell_mut(x, y);
    cell.ore = Some(ore);
    cell.gemstone = gemstone;
}
