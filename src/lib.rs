//! Deterministic procedural world generator.
//!
//! This crate turns a single 64-bit seed plus a handful of scalar parameters
//! into a fully populated world grid: tectonic plates, elevation, rock strata,
//! climate, rivers and lakes, biomes, and ore/vegetation detail. Generation is
//! an ordered pipeline of stages, each drawing from its own forked RNG stream
//! so that the randomness consumed by any stage is independent of every other
//! stage.

pub mod rng;
pub mod noise;
pub mod world;
pub mod tectonics;
pub mod heightmap;
pub mod erosion;
pub mod geology;
pub mod climate;
pub mod hydrology;
pub mod biomes;
pub mod detail;
pub mod pipeline;
pub mod embark;
pub mod generator;
pub mod export;

pub use rng::SeededRng;
pub use noise::{FbmConfig, NoiseField, RidgedConfig, WarpConfig};
pub use world::{Biome, BoundaryType, WorldCell, WorldGenParams, WorldMap};
pub use tectonics::{TectonicConfig, TectonicPlate};
pub use erosion::{ErosionBackend, ErosionConfig};
pub use geology::{GeologicalColumn, GeologyConfig, RockLayer, RockType, TectonicContext};
pub use climate::ClimateConfig;
pub use hydrology::HydrologyConfig;
pub use biomes::BiomeConfig;
pub use detail::{DetailConfig, GemstoneType, OreType};
pub use pipeline::{GenerationStage, Pipeline, PipelineError, StageContext};
pub use embark::EmbarkRegion;
pub use generator::WorldGenerator;
