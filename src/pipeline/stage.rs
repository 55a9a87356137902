//! Generation stage trait and pipeline orchestration.
//!
//! Each stage transforms the world grid in place, drawing randomness only
//! from the child stream the pipeline forks for it. Because child streams
//! are keyed by stage label alone, adding, removing, reordering, or swapping
//! the implementation of any stage never changes the random draws another
//! stage observes.

use thiserror::Error;

use crate::biomes::{self, BiomeConfig};
use crate::climate::{self, ClimateConfig};
use crate::detail::{self, DetailConfig};
use crate::erosion::{self, ErosionConfig};
use crate::geology::{self, GeologyConfig};
use crate::heightmap::{self, HeightmapConfig};
use crate::hydrology::{self, HydrologyConfig};
use crate::noise::NoiseField;
use crate::rng::SeededRng;
use crate::tectonics::{self, TectonicConfig};
use crate::world::{WorldGenParams, WorldMap};

/// Errors a stage can report. Generation itself is infallible by design;
/// the variant exists for the stage contract so substituted implementations
/// with real failure modes stay expressible.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("stage '{0}' failed: {1}")]
    StageFailed(String, String),
}

/// Shared, read-only context for a generation run: the parameters and the
/// noise field built from the seed.
#[derive(Debug, Clone)]
pub struct StageContext {
    pub params: WorldGenParams,
    pub noise: NoiseField,
}

impl StageContext {
    /// Builds the context for `params`, deriving the noise permutation table
    /// from the seed's "noise" stream.
    pub fn new(params: WorldGenParams) -> Self {
        let root = SeededRng::new(params.seed);
        let noise = NoiseField::new(&mut root.fork("noise"));
        Self { params, noise }
    }
}

/// A terrain generation stage.
///
/// Implementations mutate the map in place and must draw randomness only
/// from the stream they are handed. Composite stages fork that stream again
/// per sub-stage under their own labels.
pub trait GenerationStage: Send + Sync {
    /// Stable label keying this stage's RNG stream.
    fn label(&self) -> &'static str;

    /// Human-readable name for progress reporting.
    fn name(&self) -> &str;

    /// Executes the stage.
    fn run(
        &self,
        map: &mut WorldMap,
        rng: &mut SeededRng,
        ctx: &StageContext,
    ) -> Result<(), PipelineError>;
}

/// An ordered list of stages, invoked once per world generation.
pub struct Pipeline {
    stages: Vec<Box<dyn GenerationStage>>,
}

impl Pipeline {
    /// Creates an empty pipeline.
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// The standard eight-stage pipeline with default configurations.
    pub fn standard() -> Self {
        let mut pipeline = Self::new();
        pipeline
            .add_stage(TectonicStage::default())
            .add_stage(HeightmapStage::default())
            .add_stage(ErosionStage::default())
            .add_stage(GeologyStage::default())
            .add_stage(ClimateStage::default())
            .add_stage(HydrologyStage::default())
            .add_stage(BiomeStage::default())
            .add_stage(DetailStage::default());
        pipeline
    }

    /// Appends a stage.
    pub fn add_stage<S: GenerationStage + 'static>(&mut self, stage: S) -> &mut Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Number of stages.
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Runs all stages in order against `map`, forking a child RNG per stage
    /// from `root`.
    pub fn run(
        &self,
        map: &mut WorldMap,
        root: &SeededRng,
        ctx: &StageContext,
    ) -> Result<(), PipelineError> {
        self.run_with_progress(map, root, ctx, |_| {})
    }

    /// Like [`Self::run`], invoking `progress` synchronously immediately
    /// before each stage begins. The callback is purely observational and
    /// cannot influence the outcome.
    pub fn run_with_progress<F>(
        &self,
        map: &mut WorldMap,
        root: &SeededRng,
        ctx: &StageContext,
        mut progress: F,
    ) -> Result<(), PipelineError>
    where
        F: FnMut(&str),
    {
        for stage in &self.stages {
            progress(stage.name());
            let mut rng = root.fork(stage.label());
            stage.run(map, &mut rng, ctx)?;
        }
        Ok(())
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Tectonic plate simulation.
#[derive(Debug, Clone, Default)]
pub struct TectonicStage {
    pub config: TectonicConfig,
}

impl GenerationStage for TectonicStage {
    fn label(&self) -> &'static str {
        "tectonics"
    }

    fn name(&self) -> &str {
        "Tectonic Simulation"
    }

    fn run(
        &self,
        map: &mut WorldMap,
        rng: &mut SeededRng,
        ctx: &StageContext,
    ) -> Result<(), PipelineError> {
        tectonics::run(map, rng, &self.config, ctx.params.plate_count);
        Ok(())
    }
}

/// Heightmap synthesis over the tectonic base.
#[derive(Debug, Clone, Default)]
pub struct HeightmapStage {
    pub config: HeightmapConfig,
}

impl GenerationStage for HeightmapStage {
    fn label(&self) -> &'static str {
        "heightmap"
    }

    fn name(&self) -> &str {
        "Heightmap Generation"
    }

    fn run(
        &self,
        map: &mut WorldMap,
        _rng: &mut SeededRng,
        ctx: &StageContext,
    ) -> Result<(), PipelineError> {
        heightmap::run(map, &ctx.noise, &self.config);
        Ok(())
    }
}

/// Hydraulic and thermal erosion. A composite stage: forks its stream per
/// sub-stage before delegating.
#[derive(Debug, Clone, Default)]
pub struct ErosionStage {
    pub config: ErosionConfig,
}

impl GenerationStage for ErosionStage {
    fn label(&self) -> &'static str {
        "erosion"
    }

    fn name(&self) -> &str {
        "Erosion Simulation"
    }

    fn run(
        &self,
        map: &mut WorldMap,
        rng: &mut SeededRng,
        ctx: &StageContext,
    ) -> Result<(), PipelineError> {
        erosion::run(map, rng, ctx.params.erosion_droplets, &self.config);
        Ok(())
    }
}

/// Geological strata materialization.
#[derive(Debug, Clone, Default)]
pub struct GeologyStage {
    pub config: GeologyConfig,
}

impl GenerationStage for GeologyStage {
    fn label(&self) -> &'static str {
        "geology"
    }

    fn name(&self) -> &str {
        "Geological Strata Generation"
    }

    fn run(
        &self,
        map: &mut WorldMap,
        _rng: &mut SeededRng,
        ctx: &StageContext,
    ) -> Result<(), PipelineError> {
        geology::run(map, &ctx.noise, &self.config);
        Ok(())
    }
}

/// Temperature, wind, and moisture simulation.
#[derive(Debug, Clone, Default)]
pub struct ClimateStage {
    pub config: ClimateConfig,
}

impl GenerationStage for ClimateStage {
    fn label(&self) -> &'static str {
        "climate"
    }

    fn name(&self) -> &str {
        "Climate Simulation"
    }

    fn run(
        &self,
        map: &mut WorldMap,
        _rng: &mut SeededRng,
        ctx: &StageContext,
    ) -> Result<(), PipelineError> {
        climate::run(map, &ctx.noise, &self.config);
        Ok(())
    }
}

/// Sink filling, flow routing, rivers, and lakes.
#[derive(Debug, Clone, Default)]
pub struct HydrologyStage {
    pub config: HydrologyConfig,
}

impl GenerationStage for HydrologyStage {
    fn label(&self) -> &'static str {
        "hydrology"
    }

    fn name(&self) -> &str {
        "Hydrology Simulation"
    }

    fn run(
        &self,
        map: &mut WorldMap,
        _rng: &mut SeededRng,
        _ctx: &StageContext,
    ) -> Result<(), PipelineError> {
        hydrology::run(map, &self.config);
        Ok(())
    }
}

/// Biome classification.
#[derive(Debug, Clone, Default)]
pub struct BiomeStage {
    pub config: BiomeConfig,
}

impl GenerationStage for BiomeStage {
    fn label(&self) -> &'static str {
        "biomes"
    }

    fn name(&self) -> &str {
        "Biome Classification"
    }

    fn run(
        &self,
        map: &mut WorldMap,
        _rng: &mut SeededRng,
        _ctx: &StageContext,
    ) -> Result<(), PipelineError> {
        biomes::run(map, &self.config);
        Ok(())
    }
}

/// Ore placement and vegetation density.
#[derive(Debug, Clone, Default)]
pub struct DetailStage {
    pub config: DetailConfig,
}

impl GenerationStage for DetailStage {
    fn label(&self) -> &'static str {
        "detail"
    }

    fn name(&self) -> &str {
        "Detail Pass"
    }

    fn run(
        &self,
        map: &mut WorldMap,
        rng: &mut SeededRng,
        ctx: &StageContext,
    ) -> Result<(), PipelineError> {
        detail::run(map, &ctx.noise, rng, &self.config);
        Ok(())
    }
}
