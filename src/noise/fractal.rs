//! Fractal composites over the gradient primitive: fBm, ridged multifractal,
//! and domain warping.

use serde::{Deserialize, Serialize};

use super::gradient::GradientNoise;
use crate::rng::SeededRng;

/// Configuration for fractal Brownian motion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FbmConfig {
    /// Number of octaves summed.
    pub octaves: u32,
    /// Base frequency of the first octave.
    pub frequency: f32,
    /// Frequency multiplier per octave (typically 2.0).
    pub lacunarity: f32,
    /// Amplitude decay per octave (0.4-0.6 typical).
    pub persistence: f32,
}

impl Default for FbmConfig {
    fn default() -> Self {
        Self {
            octaves: 6,
            frequency: 1.0,
            lacunarity: 2.0,
            persistence: 0.5,
        }
    }
}

impl FbmConfig {
    /// Creates a config with the given base frequency.
    pub fn with_frequency(frequency: f32) -> Self {
        Self {
            frequency,
            ..Default::default()
        }
    }
}

/// Configuration for ridged multifractal noise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RidgedConfig {
    /// Number of octaves summed.
    pub octaves: u32,
    /// Base frequency of the first octave.
    pub frequency: f32,
    /// Frequency multiplier per octave.
    pub lacunarity: f32,
    /// Amplitude decay per octave.
    pub persistence: f32,
    /// Feedback gain: each octave's output damps the next octave's weight.
    pub gain: f32,
}

impl Default for RidgedConfig {
    fn default() -> Self {
        Self {
            octaves: 5,
            frequency: 1.0,
            lacunarity: 2.0,
            persistence: 0.5,
            gain: 2.0,
        }
    }
}

impl RidgedConfig {
    /// Creates a config with the given base frequency.
    pub fn with_frequency(frequency: f32) -> Self {
        Self {
            frequency,
            ..Default::default()
        }
    }
}

/// Configuration for domain-warped sampling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarpConfig {
    /// How far the warp offsets displace the sample coordinates.
    pub strength: f32,
    /// fBm settings used for both the warp offsets and the final sample.
    pub fbm: FbmConfig,
}

impl Default for WarpConfig {
    fn default() -> Self {
        Self {
            strength: 0.35,
            fbm: FbmConfig::default(),
        }
    }
}

// Fixed offsets decorrelating the two warp channels from each other and from
// the final sample.
const WARP_OFF_AX: f32 = 5.2;
const WARP_OFF_AY: f32 = 1.3;
const WARP_OFF_BX: f32 = -1.7;
const WARP_OFF_BY: f32 = 9.2;

/// The noise field shared by all stages: one gradient primitive plus the
/// fractal composites evaluated over it. Sampling is pure; a `NoiseField` may
/// be shared across threads freely.
#[derive(Debug, Clone)]
pub struct NoiseField {
    gradient: GradientNoise,
}

impl NoiseField {
    /// Builds the field, shuffling the permutation table from `rng`.
    pub fn new(rng: &mut SeededRng) -> Self {
        Self {
            gradient: GradientNoise::new(rng),
        }
    }

    /// Raw 2D gradient noise in approximately [-1, 1].
    pub fn sample2(&self, x: f32, y: f32) -> f32 {
        self.gradient.sample2(x, y)
    }

    /// Raw 3D gradient noise in approximately [-1, 1].
    pub fn sample3(&self, x: f32, y: f32, z: f32) -> f32 {
        self.gradient.sample3(x, y, z)
    }

    /// Fractal Brownian motion: octaves at doubling frequency and halving
    /// amplitude, normalized by the amplitude sum. Returns ≈[-1, 1].
    pub fn fbm2(&self, x: f32, y: f32, cfg: &FbmConfig) -> f32 {
        let mut total = 0.0f32;
        let mut amplitude = 1.0f32;
        let mut frequency = cfg.frequency;
        let mut weight_sum = 0.0f32;

        for _ in 0..cfg.octaves {
            total += self.gradient.sample2(x * frequency, y * frequency) * amplitude;
            weight_sum += amplitude;
            amplitude *= cfg.persistence;
            frequency *= cfg.lacunarity;
        }

        if weight_sum <= 0.0 {
            return 0.0;
        }
        total / weight_sum
    }

    /// 3D fBm, same normalization as [`Self::fbm2`].
    pub fn fbm3(&self, x: f32, y: f32, z: f32, cfg: &FbmConfig) -> f32 {
        let mut total = 0.0f32;
        let mut amplitude = 1.0f32;
        let mut frequency = cfg.frequency;
        let mut weight_sum = 0.0f32;

        for _ in 0..cfg.octaves {
            total += self
                .gradient
                .sample3(x * frequency, y * frequency, z * frequency)
                * amplitude;
            weight_sum += amplitude;
            amplitude *= cfg.persistence;
            frequency *= cfg.lacunarity;
        }

        if weight_sum <= 0.0 {
            return 0.0;
        }
        total / weight_sum
    }

    /// Ridged multifractal: folds each octave around zero (`(1 - |n|)²`) and
    /// feeds the result back as a damping weight for the next octave, which
    /// produces connected ridge lines instead of smooth hills. Returns ≈[0, 1].
    pub fn ridged2(&self, x: f32, y: f32, cfg: &RidgedConfig) -> f32 {
        let mut total = 0.0f32;
        let mut amplitude = 1.0f32;
        let mut frequency = cfg.frequency;
        let mut weight = 1.0f32;
        let mut weight_sum = 0.0f32;

        for _ in 0..cfg.octaves {
            let sample = self.gradient.sample2(x * frequency, y * frequency);
            let mut ridge = 1.0 - sample.abs();
            ridge *= ridge;
            ridge *= weight;

            weight = (ridge * cfg.gain).clamp(0.0, 1.0);

            total += ridge * amplitude;
            weight_sum += amplitude;
            amplitude *= cfg.persistence;
            frequency *= cfg.lacunarity;
        }

        if weight_sum <= 0.0 {
            return 0.0;
        }
        (total / weight_sum).clamp(0.0, 1.0)
    }

    /// Domain-warped fBm: offsets the sample coordinates by noise evaluated
    /// at displaced locations before the final sample. Returns ≈[-1, 1].
    pub fn warped2(&self, x: f32, y: f32, cfg: &WarpConfig) -> f32 {
        let qx = self.fbm2(x + WARP_OFF_AX, y + WARP_OFF_AY, &cfg.fbm);
        let qy = self.fbm2(x + WARP_OFF_BX, y + WARP_OFF_BY, &cfg.fbm);
        self.fbm2(x + cfg.strength * qx, y + cfg.strength * qy, &cfg.fbm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(seed: u64) -> NoiseField {
        NoiseField::new(&mut SeededRng::new(seed))
    }

    #[test]
    fn fbm_is_normalized_and_reproducible() {
        let a = field(12);
        let b = field(12);
        let cfg = FbmConfig::default();

        for i in 0..200 {
            let x = i as f32 * 0.113;
            let y = i as f32 * 0.071 - 5.0;
            let va = a.fbm2(x, y, &cfg);
            assert_eq!(va, b.fbm2(x, y, &cfg));
            assert!(va.is_finite() && (-1.1..=1.1).contains(&va));
        }
    }

    #[test]
    fn ridged_output_is_in_unit_range() {
        let noise = field(3);
        let cfg = RidgedConfig::default();
        for i in 0..500 {
            let x = (i % 29) as f32 * 0.21;
            let y = (i / 29) as f32 * 0.17;
            let v = noise.ridged2(x, y, &cfg);
            assert!((0.0..=1.0).contains(&v), "ridged sample {v}");
        }
    }

    #[test]
    fn warp_differs_from_plain_fbm() {
        let noise = field(8);
        let cfg = WarpConfig {
            strength: 1.5,
            fbm: FbmConfig::default(),
        };
        let differing = (0..64)
            .filter(|&i| {
                let x = i as f32 * 0.37;
                let y = i as f32 * 0.19;
                (noise.warped2(x, y, &cfg) - noise.fbm2(x, y, &cfg.fbm)).abs() > 1e-4
            })
            .count();
        assert!(differing > 32);
    }

    #[test]
    fn zero_octaves_degrade_to_zero() {
        let noise = field(4);
        let cfg = FbmConfig {
            octaves: 0,
            ..Default::default()
        };
        assert_eq!(noise.fbm2(1.0, 2.0, &cfg), 0.0);
    }
}
