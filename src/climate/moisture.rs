//! Downwind moisture advection with orographic rainout.

use super::{prevailing_wind, wind_strength, ClimateConfig};

/// Advects moisture downwind for a capped number of iterations.
///
/// Ocean cells are saturated sources. Each iteration a cell keeps the larger
/// of its own moisture and what the upwind cell delivers (decayed by
/// transport and damped over high terrain); wherever elevation exceeds the
/// orographic threshold, a fraction of local moisture converts to rainfall
/// and leaves the advected value (the rain-shadow effect).
///
/// Returns `(moisture, accumulated_rain)`, both `size * size`.
pub fn advect_moisture(elevations: &[f32], size: usize, cfg: &ClimateConfig) -> (Vec<f32>, Vec<f32>) {
    let total = size * size;
    debug_assert_eq!(elevations.len(), total);

    let mut moisture: Vec<f32> = elevations
        .iter()
        .map(|&e| if e <= cfg.sea_level { 1.0 } else { 0.0 })
        .collect();
    let mut next = vec![0.0f32; total];
    let mut rain = vec![0.0f32; total];

    if size == 0 {
        return (moisture, rain);
    }

    // Per-row wind offsets are constant; precompute them.
    let offsets: Vec<(isize, isize)> = (0..size)
        .map(|y| {
            let w = prevailing_wind(y, size, cfg);
            (w.x.round() as isize, w.y.round() as isize)
        })
        .collect();

    let decay = cfg.transport_decay.clamp(0.0, 1.0);
    let rainout = cfg.orographic_fraction.clamp(0.0, 1.0);

    for _ in 0..cfg.advection_iterations {
        for y in 0..size {
            let (ox, oy) = offsets[y];
            for x in 0..size {
                let i = y * size + x;
                let elevation = elevations[i];

                if elevation <= cfg.sea_level {
                    next[i] = 1.0;
                    continue;
                }

                // Upwind source cell, clamped at the grid edge.
                let sx = (x as isize - ox).clamp(0, size as isize - 1) as usize;
                let sy = (y as isize - oy).clamp(0, size as isize - 1) as usize;
                let carried = moisture[sy * size + sx] * decay * wind_strength(elevation, cfg);

                let mut m = moisture[i].max(carried);

                if elevation > cfg.orographic_threshold {
                    let rained = m * rainout;
                    rain[i] += rained;
                    m -= rained;
                }

                next[i] = m.clamp(0.0, 1.0);
            }
        }
        std::mem::swap(&mut moisture, &mut next);
    }

    (moisture, rain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ocean_stays_saturated_and_land_dries_inland() {
        let size = 32;
        let cfg = ClimateConfig::default();
        // West third ocean, rest flat land below the orographic threshold.
        let elevations: Vec<f32> = (0..size * size)
            .map(|i| if i % size < size / 3 { 0.2 } else { 0.45 })
            .collect();

        let (moisture, _) = advect_moisture(&elevations, size, &cfg);

        let row = size / 2;
        assert_eq!(moisture[row * size + 1], 1.0);
        // Coastal land is wetter than the far interior.
        let coast = moisture[row * size + size / 3];
        let interior = moisture[row * size + size - 2];
        assert!(coast >= interior);
    }

    #[test]
    fn mountains_collect_rain() {
        let size = 48;
        let cfg = ClimateConfig::default();
        // Ocean everywhere except a mountain wall at two-thirds across.
        let wall = 2 * size / 3;
        let elevations: Vec<f32> = (0..size * size)
            .map(|i| {
                let x = i % size;
                if x == wall {
                    0.85
                } else if x > size / 3 {
                    0.40
                } else {
                    0.2
                }
            })
            .collect();

        let (_, rain) = advect_moisture(&elevations, size, &cfg);

        // A westerlies-band row: wind blows eastward, off the western ocean
        // and into the wall.
        let row = size / 4;
        assert!(rain[row * size + wall] > 0.0, "mountain wall should rain out");
        // Flat cells below the threshold never rain out.
        assert_eq!(rain[row * size + wall - 4], 0.0);
    }

    #[test]
    fn iteration_cap_bounds_work() {
        let size = 16;
        let cfg = ClimateConfig {
            advection_iterations: 0,
            ..Default::default()
        };
        let elevations = vec![0.5f32; size * size];
        let (moisture, rain) = advect_moisture(&elevations, size, &cfg);
        assert!(moisture.iter().all(|&m| m == 0.0));
        assert!(rain.iter().all(|&r| r == 0.0));
    }

    #[test]
    fn moisture_stays_in_unit_range() {
        let size = 24;
        let cfg = ClimateConfig::default();
        let elevations: Vec<f32> = (0..size * size)
            .map(|i| ((i * 29) % 100) as f32 / 100.0)
            .collect();
        let (moisture, rain) = advect_moisture(&elevations, size, &cfg);
        assert!(moisture.iter().all(|&m| (0.0..=1.0).contains(&m)));
        assert!(rain.iter().all(|&r| r >= 0.0));
    }
}
