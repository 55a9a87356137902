//! Per-cell temperature model.

use super::ClimateConfig;

/// Normalized temperature for a cell on row `y`: a latitude gradient (hot at
/// the equatorial row, cold at the poles), minus an elevation lapse above the
/// threshold, pulled toward mild for ocean cells, plus a low-amplitude noise
/// term. Clamped to [0, 1].
pub fn temperature_at(
    y: usize,
    size: usize,
    elevation: f32,
    noise_sample: f32,
    cfg: &ClimateConfig,
) -> f32 {
    let half = (size.saturating_sub(1)) as f32 * 0.5;
    let latitude = if half > 0.0 {
        ((y as f32 - half).abs() / half).clamp(0.0, 1.0)
    } else {
        0.0
    };

    // Nonlinear latitude curve gives broader tropics and sharper poles.
    let lat_w = latitude.powf(1.3);
    let mut temp = cfg.equator_temp * (1.0 - lat_w) + cfg.pole_temp * lat_w;

    if elevation > cfg.lapse_threshold {
        temp -= (elevation - cfg.lapse_threshold) * cfg.lapse_strength;
    }

    // Ocean and shoreline cells are moderated toward mild.
    if elevation <= cfg.sea_level + 0.03 {
        temp += (0.5 - temp) * cfg.ocean_moderation;
    }

    (temp + noise_sample * cfg.temperature_noise).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latitude_gradient_runs_hot_to_cold() {
        let cfg = ClimateConfig::default();
        let equator = temperature_at(50, 101, 0.4, 0.0, &cfg);
        let mid = temperature_at(25, 101, 0.4, 0.0, &cfg);
        let pole = temperature_at(0, 101, 0.4, 0.0, &cfg);
        assert!(equator > mid && mid > pole);
    }

    #[test]
    fn lapse_applies_only_above_threshold() {
        let cfg = ClimateConfig::default();
        let low = temperature_at(50, 101, 0.5, 0.0, &cfg);
        let also_low = temperature_at(50, 101, 0.59, 0.0, &cfg);
        assert_eq!(low, also_low);

        let high = temperature_at(50, 101, 0.9, 0.0, &cfg);
        assert!(high < low);
    }

    #[test]
    fn ocean_rows_are_moderated() {
        let cfg = ClimateConfig::default();
        // At the pole, ocean is warmer than land because it is pulled toward 0.5.
        let polar_land = temperature_at(0, 101, 0.4, 0.0, &cfg);
        let polar_ocean = temperature_at(0, 101, 0.2, 0.0, &cfg);
        assert!(polar_ocean > polar_land);
    }

    #[test]
    fn output_is_clamped() {
        let cfg = ClimateConfig::default();
        for y in 0..33 {
            for e in [0.0, 0.3, 0.6, 1.0] {
                for n in [-1.0, 0.0, 1.0] {
                    let t = temperature_at(y, 33, e, n, &cfg);
                    assert!((0.0..=1.0).contains(&t));
                }
            }
        }
    }

    #[test]
    fn single_row_grid_is_equatorial() {
        let cfg = ClimateConfig::default();
        let t = temperature_at(0, 1, 0.4, 0.0, &cfg);
        assert!(t > 0.8);
    }
}
