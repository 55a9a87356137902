//! Generator entry point: builds the run context, drives the pipeline, and
//! offers embark-site selection over the finished map.

use crate::embark::{self, EmbarkRegion};
use crate::pipeline::{Pipeline, PipelineError, StageContext};
use crate::rng::SeededRng;
use crate::world::{WorldGenParams, WorldMap};

/// Drives one world generation run.
///
/// Each run owns its own map, RNG, and noise instance; there is no shared
/// mutable state across concurrent generations.
#[derive(Debug, Clone)]
pub struct WorldGenerator {
    params: WorldGenParams,
}

impl WorldGenerator {
    /// Creates a generator for the given parameters.
    pub fn new(params: WorldGenParams) -> Self {
        Self { params }
    }

    /// The run's parameters.
    pub fn params(&self) -> &WorldGenParams {
        &self.params
    }

    /// Generates the world.
    pub fn generate(&self) -> Result<WorldMap, PipelineError> {
        self.generate_with_progress(|_| {})
    }

    /// Generates the world, reporting a message immediately before each
    /// stage begins.
    pub fn generate_with_progress<F>(&self, progress: F) -> Result<WorldMap, PipelineError>
    where
        F: FnMut(&str),
    {
        let ctx = StageContext::new(self.params.clone());
        let root = SeededRng::new(self.params.seed);
        let mut map = WorldMap::new(self.params.map_size, self.params.seed);

        Pipeline::standard().run_with_progress(&mut map, &root, &ctx, progress)?;
        Ok(map)
    }

    /// Scores candidate embark sites on a generated map and returns the best
    /// region, clamped to map bounds.
    pub fn find_embark_site(&self, map: &WorldMap) -> EmbarkRegion {
        let root = SeededRng::new(self.params.seed);
        embark::best_region(map, self.params.embark_size, &mut root.fork("embark"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::BoundaryType;

    #[test]
    fn fixed_parameters_reproduce_the_same_world() {
        // seed=42, 65x65, 6 plates, no erosion droplets.
        let params = WorldGenParams {
            seed: 42,
            map_size: 65,
            plate_count: 6,
            erosion_droplets: 0,
            embark_size: 16,
        };
        let a = WorldGenerator::new(params.clone()).generate().unwrap();
        let b = WorldGenerator::new(params).generate().unwrap();

        for (ca, cb) in a.cells().iter().zip(b.cells()) {
            assert_eq!(ca.elevation, cb.elevation);
            assert_eq!(ca.plate_id, cb.plate_id);
            assert_eq!(ca.biome, cb.biome);
            assert_eq!(ca.is_river, cb.is_river);
            assert_eq!(ca.is_lake, cb.is_lake);
            assert_eq!(ca.ore, cb.ore);
            assert_eq!(ca.gemstone, cb.gemstone);
        }
        for cell in a.cells() {
            assert!((0.0..=1.0).contains(&cell.elevation));
        }
    }

    #[test]
    fn multiple_plates_guarantee_a_boundary() {
        // seed=7, 33x33, 4 plates.
        let params = WorldGenParams {
            seed: 7,
            map_size: 33,
            plate_count: 4,
            erosion_droplets: 0,
            embark_size: 8,
        };
        let map = WorldGenerator::new(params).generate().unwrap();
        assert!(map
            .cells()
            .iter()
            .any(|c| c.boundary_type != BoundaryType::None));
    }

    #[test]
    fn embark_region_stays_in_bounds() {
        let params = WorldGenParams {
            seed: 100,
            map_size: 65,
            plate_count: 6,
            erosion_droplets: 1_000,
            embark_size: 20,
        };
        let generator = WorldGenerator::new(params);
        let map = generator.generate().unwrap();
        let region = generator.find_embark_site(&map);

        let (x0, y0, x1, y1) = region.bounds();
        assert!(x0 < x1 && x1 <= 65);
        assert!(y0 < y1 && y1 <= 65);
        assert_eq!(region.size, 20);
    }

    #[test]
    fn progress_messages_cover_every_stage() {
        let params = WorldGenParams {
            seed: 1,
            map_size: 17,
            plate_count: 2,
            erosion_droplets: 0,
            embark_size: 4,
        };
        let mut count = 0;
        WorldGenerator::new(params)
            .generate_with_progress(|_| count += 1)
            .unwrap();
        assert_eq!(count, 8);
    }

    // Full-scale run: bounded termination at production parameters. Slow in
    // debug builds, so opt in with `cargo test -- --ignored`.
    #[test]
    #[ignore]
    fn full_scale_generation_terminates() {
        let generator = WorldGenerator::new(WorldGenParams::with_seed(2024));
        let map = generator.generate().unwrap();
        assert_eq!(map.size(), 257);
        assert!(map.cells().iter().all(|c| c.biome.is_some()));

        let region = generator.find_embark_site(&map);
        let (_, _, x1, y1) = region.bounds();
        assert!(x1 <= 257 && y1 <= 257);
    }

    #[test]
    fn every_cell_has_a_biome_after_generation() {
        let map = WorldGenerator::new(WorldGenParams {
            seed: 55,
            map_size: 49,
            plate_count: 5,
            erosion_droplets: 2_000,
            embark_size: 12,
        })
        .generate()
        .unwrap();

        assert!(map.cells().iter().all(|c| c.biome.is_some()));
        assert!(map.has_columns());
    }
}
