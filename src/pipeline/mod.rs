//! Pipeline orchestration: the generation stage trait and the ordered stage
//! list that drives a run.

mod stage;

pub use stage::{
    BiomeStage, ClimateStage, DetailStage, ErosionStage, GenerationStage, GeologyStage,
    HeightmapStage, HydrologyStage, Pipeline, PipelineError, StageContext, TectonicStage,
};
