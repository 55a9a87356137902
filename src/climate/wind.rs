//! Banded prevailing winds.

use glam::Vec2;

use super::ClimateConfig;

/// Prevailing wind direction for row `y`, from a three-band model mimicking
/// trade winds (westward), westerlies (eastward), and polar easterlies
/// (westward). Inside the trade band a meridional component converges toward
/// the equator.
pub fn prevailing_wind(y: usize, size: usize, cfg: &ClimateConfig) -> Vec2 {
    let half = (size.saturating_sub(1)) as f32 * 0.5;
    if half <= 0.0 {
        return Vec2::new(-1.0, 0.0);
    }
    let latitude = ((y as f32 - half).abs() / half).clamp(0.0, 1.0);

    let zonal = if latitude < 1.0 / 3.0 {
        -1.0 // trade winds
    } else if latitude < 2.0 / 3.0 {
        1.0 // westerlies
    } else {
        -1.0 // polar easterlies
    };

    // Converge toward the equator, strongest at the band's heart. Rows above
    // the equator blow +y (toward it), rows below blow -y.
    let toward_equator = if (y as f32) < half { 1.0 } else { -1.0 };
    let tropics = (1.0 - (latitude * 3.0).min(1.0)).powf(1.5);
    let m = cfg.wind_meridional * tropics;

    Vec2::new(zonal * (1.0 - m), toward_equator * m).normalize_or_zero()
}

/// Wind strength at a cell, damped over high terrain.
pub fn wind_strength(elevation: f32, cfg: &ClimateConfig) -> f32 {
    let start = cfg.wind_damp_start;
    if elevation <= start {
        return 1.0;
    }
    let t = ((elevation - start) / (1.0 - start).max(1e-6)).clamp(0.0, 1.0);
    let t = t * t * (3.0 - 2.0 * t);
    1.0 - cfg.wind_damp * t
}
