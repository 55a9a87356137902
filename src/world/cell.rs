//! Per-cell grid record.

use serde::{Deserialize, Serialize};

use crate::biomes::Biome;
use crate::detail::{GemstoneType, OreType};

/// How two plates meet at a boundary cell, classified from their relative
/// drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BoundaryType {
    /// Not a plate boundary.
    #[default]
    None,
    /// Plates moving toward each other (collision/subduction).
    Convergent,
    /// Plates moving apart (rifts, spreading ridges).
    Divergent,
    /// Plates sliding past each other (transform faults).
    Transform,
}

/// One cell of the world grid.
///
/// Normalized fields (`elevation`, `boundary_stress`, `temperature`,
/// `moisture`, `rainfall`, `vegetation_density`) stay clamped to [0, 1]
/// after every stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldCell {
    /// Normalized elevation.
    pub elevation: f32,
    /// Index of the owning tectonic plate.
    pub plate_id: usize,
    /// Plate across the boundary; set only on boundary cells.
    pub neighbor_plate_id: Option<usize>,
    /// Boundary classification, if this cell sits on a plate boundary.
    pub boundary_type: BoundaryType,
    /// Tectonic stress, spread outward from boundaries.
    pub boundary_stress: f32,
    /// Normalized temperature (0 = coldest, 1 = hottest).
    pub temperature: f32,
    /// Normalized airborne/ground moisture.
    pub moisture: f32,
    /// Normalized precipitation.
    pub rainfall: f32,
    /// Biome assignment; total coverage is guaranteed after the biome stage.
    pub biome: Option<Biome>,
    pub is_river: bool,
    pub is_lake: bool,
    /// Ore deposit, if the detail pass placed one here.
    pub ore: Option<OreType>,
    /// Specific gemstone when `ore` is the gemstone category.
    pub gemstone: Option<GemstoneType>,
    /// Normalized vegetation density.
    pub vegetation_density: f32,
}

impl Default for WorldCell {
    fn default() -> Self {
        Self {
            elevation: 0.0,
            plate_id: 0,
            neighbor_plate_id: None,
            boundary_type: BoundaryType::None,
            boundary_stress: 0.0,
            temperature: 0.0,
            moisture: 0.0,
            rainfall: 0.0,
            biome: None,
            is_river: false,
            is_lake: false,
            ore: None,
            gemstone: None,
            vegetation_density: 0.0,
        }
    }
}

impl WorldCell {
    /// True once the tectonic stage has marked this cell as a plate boundary.
    pub fn is_boundary(&self) -> bool {
        self.boundary_type != BoundaryType::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_cell_is_unset() {
        let cell = WorldCell::default();
        assert_eq!(cell.boundary_type, BoundaryType::None);
        assert!(!cell.is_boundary());
        assert!(cell.biome.is_none());
        assert!(cell.ore.is_none());
        assert_eq!(cell.elevation, 0.0);
    }
}
