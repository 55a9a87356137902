//! Tectonic plate data.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::rng::SeededRng;

/// A rigid plate: a region of the grid sharing one drift vector and an
/// oceanic/continental classification.
///
/// Created once by the tectonic stage and immutable afterward; cells refer to
/// plates by index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TectonicPlate {
    /// Index into the map's plate list.
    pub id: usize,
    /// Plate center in map space. Distances to it are wrap-aware.
    pub center: Vec2,
    /// Tectonic drift velocity.
    pub drift: Vec2,
    /// Oceanic plates sit lower than continental ones.
    pub is_oceanic: bool,
}

impl TectonicPlate {
    /// Creates a plate at `center`, drawing drift and crust type from `rng`.
    pub fn new(id: usize, center: Vec2, rng: &mut SeededRng, drift_scale: f32, oceanic_fraction: f32) -> Self {
        let angle = rng.range_f32(0.0, std::f32::consts::TAU);
        let magnitude = drift_scale * (0.5 + 0.5 * rng.next_f32());
        let drift = Vec2::new(angle.cos(), angle.sin()) * magnitude;
        let is_oceanic = rng.chance(oceanic_fraction);

        Self {
            id,
            center,
            drift,
            is_oceanic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plate_creation_is_reproducible() {
        let center = Vec2::new(10.0, 20.0);
        let a = TectonicPlate::new(3, center, &mut SeededRng::new(42), 1.5, 0.4);
        let b = TectonicPlate::new(3, center, &mut SeededRng::new(42), 1.5, 0.4);
        assert_eq!(a.drift, b.drift);
        assert_eq!(a.is_oceanic, b.is_oceanic);
    }

    #[test]
    fn drift_magnitude_respects_scale() {
        let mut rng = SeededRng::new(7);
        for id in 0..64 {
            let plate = TectonicPlate::new(id, Vec2::ZERO, &mut rng, 2.0, 0.4);
            let mag = plate.drift.length();
            assert!(mag >= 1.0 - 1e-5 && mag <= 2.0 + 1e-5, "drift magnitude {mag}");
        }
    }
}
