//! Geological strata: classify each cell's tectonic context and materialize
//! a rock column for it.

mod strata;

pub use strata::{GeologicalColumn, RockLayer};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::noise::NoiseField;
use crate::world::{BoundaryType, WorldMap};

/// Rock material making up a stratum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RockType {
    Granite,
    Basalt,
    Gabbro,
    Obsidian,
    Sandstone,
    Limestone,
    Shale,
    Slate,
    Schist,
    Gneiss,
    Marble,
    Quartzite,
}

impl RockType {
    /// True for rocks formed by cooling magma.
    pub fn is_igneous(self) -> bool {
        matches!(
            self,
            RockType::Granite | RockType::Basalt | RockType::Gabbro | RockType::Obsidian
        )
    }

    /// True for rocks formed by heat and pressure.
    pub fn is_metamorphic(self) -> bool {
        matches!(
            self,
            RockType::Slate | RockType::Schist | RockType::Gneiss | RockType::Marble | RockType::Quartzite
        )
    }

    /// True for rocks formed by deposition.
    pub fn is_sedimentary(self) -> bool {
        matches!(self, RockType::Sandstone | RockType::Limestone | RockType::Shale)
    }
}

/// A cell's tectonic setting, derived from its boundary type and the crust
/// types of the plates involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TectonicContext {
    StableContinental,
    ContinentalCollision,
    SubductionZone,
    ContinentalRift,
    OceanicSpread,
    TransformFault,
    StableOceanic,
}

impl TectonicContext {
    /// Nominal top-to-bottom rock sequence for this context, with thickness
    /// fractions summing to 1.0.
    pub fn layer_template(self) -> &'static [(RockType, f32)] {
        match self {
            TectonicContext::StableContinental => &[
                (RockType::Sandstone, 0.15),
                (RockType::Limestone, 0.20),
                (RockType::Shale, 0.15),
                (RockType::Granite, 0.35),
                (RockType::Gneiss, 0.15),
            ],
            TectonicContext::ContinentalCollision => &[
                (RockType::Slate, 0.15),
                (RockType::Schist, 0.20),
                (RockType::Gneiss, 0.25),
                (RockType::Marble, 0.15),
                (RockType::Granite, 0.25),
            ],
            TectonicContext::SubductionZone => &[
                (RockType::Obsidian, 0.10),
                (RockType::Basalt, 0.25),
                (RockType::Granite, 0.30),
                (RockType::Gabbro, 0.20),
                (RockType::Gneiss, 0.15),
            ],
            TectonicContext::ContinentalRift => &[
                (RockType::Basalt, 0.25),
                (RockType::Sandstone, 0.20),
                (RockType::Shale, 0.15),
                (RockType::Gabbro, 0.20),
                (RockType::Granite, 0.20),
            ],
            TectonicContext::OceanicSpread => &[
                (RockType::Basalt, 0.45),
                (RockType::Gabbro, 0.35),
                (RockType::Obsidian, 0.20),
            ],
            TectonicContext::TransformFault => &[
                (RockType::Slate, 0.25),
                (RockType::Quartzite, 0.20),
                (RockType::Granite, 0.30),
                (RockType::Gneiss, 0.25),
            ],
            TectonicContext::StableOceanic => &[
                (RockType::Shale, 0.15),
                (RockType::Limestone, 0.15),
                (RockType::Basalt, 0.40),
                (RockType::Gabbro, 0.30),
            ],
        }
    }
}

/// Configuration for the geology stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeologyConfig {
    /// Relative thickness perturbation amplitude (±).
    pub perturbation: f32,
    /// Frequency of the low-frequency noise driving the perturbation, in
    /// map-normalized coordinates.
    pub noise_frequency: f32,
}

impl Default for GeologyConfig {
    fn default() -> Self {
        Self {
            perturbation: 0.15,
            noise_frequency: 4.0,
        }
    }
}

/// Classifies the tectonic context of cell (x, y).
pub fn classify_context(map: &WorldMap, x: usize, y: usize) -> TectonicContext {
    let Some(cell) = map.get(x, y) else {
        return TectonicContext::StableContinental;
    };
    let oceanic = map
        .plates
        .get(cell.plate_id)
        .map(|p| p.is_oceanic)
        .unwrap_or(false);
    let neighbor_oceanic = cell
        .neighbor_plate_id
        .and_then(|id| map.plates.get(id))
        .map(|p| p.is_oceanic)
        .unwrap_or(oceanic);

    match cell.boundary_type {
        BoundaryType::None => {
            if oceanic {
                TectonicContext::StableOceanic
            } else {
                TectonicContext::StableContinental
            }
        }
        BoundaryType::Convergent => {
            if !oceanic && !neighbor_oceanic {
                TectonicContext::ContinentalCollision
            } else {
                TectonicContext::SubductionZone
            }
        }
        BoundaryType::Divergent => {
            if oceanic {
                TectonicContext::OceanicSpread
            } else {
                TectonicContext::ContinentalRift
            }
        }
        BoundaryType::Transform => TectonicContext::TransformFault,
    }
}

/// Runs the geology stage: derives a context per cell and materializes the
/// perturbed, renormalized rock column for it. Writes are disjoint per cell,
/// so the pass parallelizes.
pub fn run(map: &mut WorldMap, noise: &NoiseField, config: &GeologyConfig) {
    let size = map.size();
    if size == 0 {
        return;
    }

    let snapshot: &WorldMap = map;
    let columns: Vec<GeologicalColumn> = (0..size * size)
        .into_par_iter()
        .map(|i| {
            let x = i % size;
            let y = i / size;
            let context = classify_context(snapshot, x, y);
            GeologicalColumn::from_context(context, noise, x, y, size, config)
        })
        .collect();

    map.set_columns(columns);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SeededRng;
    use crate::tectonics::TectonicPlate;
    use glam::Vec2;

    #[test]
    fn all_templates_sum_to_one() {
        for context in [
            TectonicContext::StableContinental,
            TectonicContext::ContinentalCollision,
            TectonicContext::SubductionZone,
            TectonicContext::ContinentalRift,
            TectonicContext::OceanicSpread,
            TectonicContext::TransformFault,
            TectonicContext::StableOceanic,
        ] {
            let total: f32 = context.layer_template().iter().map(|&(_, t)| t).sum();
            assert!(
                (total - 1.0).abs() < 1e-6,
                "{context:?} template sums to {total}"
            );
        }
    }

    #[test]
    fn context_follows_boundary_and_crust() {
        let mut map = WorldMap::new(4, 0);
        map.plates = vec![
            TectonicPlate {
                id: 0,
                center: Vec2::ZERO,
                drift: Vec2::ZERO,
                is_oceanic: false,
            },
            TectonicPlate {
                id: 1,
                center: Vec2::new(3.0, 0.0),
                drift: Vec2::ZERO,
                is_oceanic: true,
            },
        ];

        {
            let cell = map.cell_mut(0, 0);
            cell.plate_id = 0;
            cell.boundary_type = BoundaryType::Convergent;
            cell.neighbor_plate_id = Some(1);
        }
        assert_eq!(classify_context(&map, 0, 0), TectonicContext::SubductionZone);

        {
            let cell = map.cell_mut(1, 0);
            cell.plate_id = 0;
            cell.boundary_type = BoundaryType::Convergent;
            cell.neighbor_plate_id = Some(0);
        }
        assert_eq!(classify_context(&map, 1, 0), TectonicContext::ContinentalCollision);

        {
            let cell = map.cell_mut(2, 0);
            cell.plate_id = 1;
            cell.boundary_type = BoundaryType::Divergent;
            cell.neighbor_plate_id = Some(0);
        }
        assert_eq!(classify_context(&map, 2, 0), TectonicContext::OceanicSpread);

        {
            let cell = map.cell_mut(3, 0);
            cell.plate_id = 1;
            cell.boundary_type = BoundaryType::None;
        }
        assert_eq!(classify_context(&map, 3, 0), TectonicContext::StableOceanic);
    }

    #[test]
    fn stage_materializes_a_column_per_cell() {
        let mut map = WorldMap::new(9, 2);
        let noise = NoiseField::new(&mut SeededRng::new(2).fork("noise"));
        run(&mut map, &noise, &GeologyConfig::default());

        assert!(map.has_columns());
        for y in 0..9 {
            for x in 0..9 {
                let column = map.column(x, y).expect("column");
                let total: f32 = column.layers().iter().map(|l| l.thickness).sum();
                assert!((total - 1.0).abs() < 1e-4);
            }
        }
    }
}
