//! Climate simulation: latitude-driven temperature, banded prevailing winds,
//! and downwind moisture advection with orographic rainfall.

mod moisture;
mod temperature;
mod wind;

pub use moisture::advect_moisture;
pub use temperature::temperature_at;
pub use wind::{prevailing_wind, wind_strength};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::noise::{FbmConfig, NoiseField};
use crate::world::WorldMap;

/// Configuration for the climate stage. All fields are in normalized units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClimateConfig {
    /// Elevation at or below which a cell is ocean.
    pub sea_level: f32,

    /// Temperature at the equatorial row.
    pub equator_temp: f32,
    /// Temperature at the polar rows.
    pub pole_temp: f32,
    /// Elevation above which the lapse term applies.
    pub lapse_threshold: f32,
    /// Temperature lost per unit elevation above the threshold.
    pub lapse_strength: f32,
    /// How strongly ocean-adjacent cells are pulled toward mild temperature.
    pub ocean_moderation: f32,
    /// Amplitude of the temperature noise term.
    pub temperature_noise: f32,
    /// Frequency of the temperature noise, in map-normalized coordinates.
    pub noise_frequency: f32,

    /// Meridional (toward-equator) wind mixing inside the trade band.
    pub wind_meridional: f32,
    /// Elevation from which wind begins losing strength.
    pub wind_damp_start: f32,
    /// Maximum fraction of wind strength lost over high terrain.
    pub wind_damp: f32,

    /// Moisture advection iterations (hard cap).
    pub advection_iterations: u32,
    /// Fraction of moisture surviving one advection hop.
    pub transport_decay: f32,
    /// Elevation above which orographic rainout occurs.
    pub orographic_threshold: f32,
    /// Fraction of local moisture converted to rainfall per iteration when
    /// lifted over the threshold.
    pub orographic_fraction: f32,

    /// Weight of accumulated orographic rain in the final rainfall blend.
    pub rain_weight: f32,
    /// Weight of the temperature-moisture term in the final rainfall blend.
    pub humidity_weight: f32,
    /// Weight of the noise term in the final rainfall blend.
    pub rain_noise_weight: f32,
}

impl Default for ClimateConfig {
    fn default() -> Self {
        Self {
            sea_level: 0.30,
            equator_temp: 0.95,
            pole_temp: 0.05,
            lapse_threshold: 0.60,
            lapse_strength: 0.90,
            ocean_moderation: 0.35,
            temperature_noise: 0.05,
            noise_frequency: 6.0,
            wind_meridional: 0.30,
            wind_damp_start: 0.60,
            wind_damp: 0.65,
            advection_iterations: 40,
            transport_decay: 0.92,
            orographic_threshold: 0.55,
            orographic_fraction: 0.35,
            rain_weight: 0.60,
            humidity_weight: 0.25,
            rain_noise_weight: 0.15,
        }
    }
}

/// Runs the climate stage: temperature field, then iterative moisture
/// advection, then the final rainfall blend. Writes `temperature`,
/// `moisture`, and `rainfall` on every cell, clamped to [0, 1].
pub fn run(map: &mut WorldMap, noise: &NoiseField, config: &ClimateConfig) {
    let size = map.size();
    if size == 0 {
        return;
    }

    let elevations = map.elevations();
    let noise_cfg = FbmConfig {
        octaves: 3,
        frequency: config.noise_frequency,
        ..Default::default()
    };
    let inv = 1.0 / size as f32;

    // Temperature: inputs are fixed before the pass, writes are disjoint.
    let temperature: Vec<f32> = (0..size * size)
        .into_par_iter()
        .map(|i| {
            let x = i % size;
            let y = i / size;
            let sample = noise.fbm2(x as f32 * inv, y as f32 * inv, &noise_cfg);
            temperature_at(y, size, elevations[i], sample, config)
        })
        .collect();

    let (moisture_field, rain_accum) = advect_moisture(&elevations, size, config);

    // Final rainfall blends advected rain with temperature-held humidity and
    // a small noise term.
    let max_rain = (config.advection_iterations as f32 * config.orographic_fraction).max(1e-6);
    for i in 0..size * size {
        let x = i % size;
        let y = i / size;

        let rain_norm = (rain_accum[i] / max_rain).clamp(0.0, 1.0);
        let humidity = temperature[i] * moisture_field[i];
        let n = 0.5 * (noise.fbm2(x as f32 * inv + 17.0, y as f32 * inv + 11.0, &noise_cfg) + 1.0);

        let rainfall = (config.rain_weight * rain_norm
            + config.humidity_weight * humidity
            + config.rain_noise_weight * n)
            .clamp(0.0, 1.0);

        let cell = map.cell_mut(x, y);
        cell.temperature = temperature[i];
        cell.moisture = moisture_field[i].clamp(0.0, 1.0);
        cell.rainfall = rainfall;
    }
}
