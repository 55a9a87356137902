//! Rock columns: ordered layer sequences with noise-perturbed thicknesses.

use serde::{Deserialize, Serialize};

use super::{GeologyConfig, RockType, TectonicContext};
use crate::noise::NoiseField;

/// One stratum: a rock type and its thickness as a fraction of the column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RockLayer {
    pub rock: RockType,
    pub thickness: f32,
}

/// An ordered top-to-bottom sequence of rock layers whose thicknesses sum to
/// 1.0 (renormalized after perturbation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeologicalColumn {
    layers: Vec<RockLayer>,
}

impl GeologicalColumn {
    /// Builds the column for a cell from its tectonic context, perturbing
    /// each template layer's thickness with a low-frequency noise sample and
    /// renormalizing to exactly 1.0.
    ///
    /// If the perturbed thicknesses sum to (near) zero, the column falls back
    /// to a uniform distribution across the template's layers rather than
    /// producing an empty column.
    pub fn from_context(
        context: TectonicContext,
        noise: &NoiseField,
        x: usize,
        y: usize,
        map_size: usize,
        config: &GeologyConfig,
    ) -> Self {
        let template = context.layer_template();
        let inv = 1.0 / map_size.max(1) as f32;
        let nx = x as f32 * inv * config.noise_frequency;
        let ny = y as f32 * inv * config.noise_frequency;

        let mut layers: Vec<RockLayer> = template
            .iter()
            .enumerate()
            .map(|(i, &(rock, nominal))| {
                // Each layer samples its own noise plane to decorrelate
                // perturbations within the column.
                let wobble = noise.sample3(nx, ny, i as f32 * 7.3 + 2.5);
                let thickness = (nominal * (1.0 + config.perturbation * wobble)).max(0.0);
                let thickness = if thickness.is_finite() { thickness } else { nominal };
                RockLayer { rock, thickness }
            })
            .collect();

        let total: f32 = layers.iter().map(|l| l.thickness).sum();
        if total > 1e-6 && total.is_finite() {
            for layer in &mut layers {
                layer.thickness /= total;
            }
        } else {
            let uniform = 1.0 / layers.len().max(1) as f32;
            for layer in &mut layers {
                layer.thickness = uniform;
            }
        }

        Self { layers }
    }

    /// The layers, top to bottom.
    pub fn layers(&self) -> &[RockLayer] {
        &self.layers
    }

    /// The rock occupying depth `depth_index` out of `total_depth` levels,
    /// found by walking cumulative thickness from the top.
    pub fn rock_at_depth(&self, depth_index: usize, total_depth: usize) -> RockType {
        debug_assert!(!self.layers.is_empty());
        let fallback = self.layers.last().map(|l| l.rock).unwrap_or(RockType::Granite);
        if total_depth == 0 {
            return fallback;
        }

        let target = (depth_index as f32 + 0.5) / total_depth as f32;
        let mut cumulative = 0.0f32;
        for layer in &self.layers {
            cumulative += layer.thickness;
            if target <= cumulative {
                return layer.rock;
            }
        }
        fallback
    }

    /// The rock at the middle of the column.
    pub fn mid_depth_rock(&self) -> RockType {
        self.rock_at_depth(1, 2)
    }
}
