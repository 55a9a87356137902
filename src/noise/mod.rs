//! Gradient noise and the fractal composites built on top of it.
//!
//! The primitive is a simplex-style 2D/3D gradient noise whose permutation
//! table is shuffled by the run's own RNG stream, so the entire noise field
//! is a pure function of the world seed.

mod fractal;
mod gradient;

pub use fractal::{FbmConfig, NoiseField, RidgedConfig, WarpConfig};
pub use gradient::GradientNoise;
