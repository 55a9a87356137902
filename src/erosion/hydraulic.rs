//! Particle-based hydraulic erosion.
//!
//! Each droplet carries position, direction, speed, water, and sediment. Per
//! step it samples the bilinear height gradient, blends its direction toward
//! the gradient by inertia, moves one cell, and either deposits or erodes
//! based on its sediment capacity. Droplets run strictly in spawn order.

use glam::Vec2;

use super::ErosionConfig;
use crate::rng::SeededRng;

/// Runs `droplets` particles over the height field. `heights` is row-major
/// `size * size`; spawn positions are drawn from `rng` in droplet order.
pub fn erode(
    heights: &mut [f32],
    size: usize,
    droplets: usize,
    rng: &mut SeededRng,
    config: &ErosionConfig,
) {
    if size < 2 || heights.len() != size * size {
        return;
    }

    let limit = (size - 1) as f32;
    for _ in 0..droplets {
        let spawn = Vec2::new(rng.range_f32(0.0, limit), rng.range_f32(0.0, limit));
        simulate_droplet(heights, size, spawn, config);
    }
}

/// Bilinearly interpolated height and gradient from the four surrounding
/// cell corners. `pos` must lie in [0, size-1) on both axes.
fn sample(heights: &[f32], size: usize, pos: Vec2) -> (f32, Vec2) {
    let xi = pos.x as usize;
    let yi = pos.y as usize;
    let u = pos.x - xi as f32;
    let v = pos.y - yi as f32;

    let i = yi * size + xi;
    let h00 = heights[i];
    let h10 = heights[i + 1];
    let h01 = heights[i + size];
    let h11 = heights[i + size + 1];

    let gx = (h10 - h00) * (1.0 - v) + (h11 - h01) * v;
    let gy = (h01 - h00) * (1.0 - u) + (h11 - h10) * u;
    let h = h00 * (1.0 - u) * (1.0 - v) + h10 * u * (1.0 - v) + h01 * (1.0 - u) * v + h11 * u * v;

    (h, Vec2::new(gx, gy))
}

/// Spreads `amount` of sediment onto the four corners around `pos`,
/// weighted bilinearly.
fn deposit(heights: &mut [f32], size: usize, pos: Vec2, amount: f32) {
    if amount <= 0.0 {
        return;
    }
    let xi = pos.x as usize;
    let yi = pos.y as usize;
    let u = pos.x - xi as f32;
    let v = pos.y - yi as f32;

    let i = yi * size + xi;
    heights[i] += amount * (1.0 - u) * (1.0 - v);
    heights[i + 1] += amount * u * (1.0 - v);
    heights[i + size] += amount * (1.0 - u) * v;
    heights[i + size + 1] += amount * u * v;
}

/// Removes up to `amount` of material over a small radius around `pos`,
/// weighted by distance, never digging a cell below zero. Returns the amount
/// actually removed.
fn erode_radius(heights: &mut [f32], size: usize, pos: Vec2, amount: f32, radius: u32) -> f32 {
    if amount <= 0.0 {
        return 0.0;
    }
    let r = radius.max(1) as f32;

    let x0 = (pos.x - r).floor().max(0.0) as usize;
    let y0 = (pos.y - r).floor().max(0.0) as usize;
    let x1 = ((pos.x + r).ceil() as usize).min(size - 1);
    let y1 = ((pos.y + r).ceil() as usize).min(size - 1);

    let mut weights: Vec<(usize, f32)> = Vec::with_capacity(((x1 - x0 + 1) * (y1 - y0 + 1)).min(64));
    let mut weight_sum = 0.0f32;
    for y in y0..=y1 {
        for x in x0..=x1 {
            let d = Vec2::new(x as f32 - pos.x, y as f32 - pos.y).length();
            let w = r - d;
            if w > 0.0 {
                weights.push((y * size + x, w));
                weight_sum += w;
            }
        }
    }

    if weight_sum <= 0.0 {
        // Degenerate window: take from the nearest cell directly.
        let i = pos.y as usize * size + pos.x as usize;
        let take = heights[i].min(amount);
        heights[i] -= take;
        return take;
    }

    let mut removed = 0.0f32;
    for (i, w) in weights {
        let take = heights[i].min(amount * w / weight_sum);
        heights[i] -= take;
        removed += take;
    }
    removed
}

fn simulate_droplet(heights: &mut [f32], size: usize, spawn: Vec2, config: &ErosionConfig) {
    let limit = (size - 1) as f32;
    let mut pos = spawn;
    let mut dir = Vec2::ZERO;
    let mut speed = config.initial_speed;
    let mut water = config.initial_water;
    let mut sediment = 0.0f32;

    for _ in 0..config.max_droplet_steps {
        let (height, gradient) = sample(heights, size, pos);

        dir = dir * config.inertia - gradient * (1.0 - config.inertia);
        if dir.length_squared() < 1e-12 {
            // Dead flat: shed the load and stop.
            deposit(heights, size, pos, sediment);
            return;
        }
        dir = dir.normalize();

        let next = pos + dir;
        if next.x < 0.0 || next.y < 0.0 || next.x >= limit || next.y >= limit {
            // Leaving the grid: terminate one step early rather than clamp
            // the out-of-bounds gradient sample.
            deposit(heights, size, pos, sediment);
            return;
        }

        let (new_height, _) = sample(heights, size, next);
        let delta = new_height - height;

        // Capacity from speed, water, and the downhill slope (floored).
        let capacity = (-delta).max(config.min_slope) * speed * water * config.capacity_factor;

        if sediment > capacity || delta > 0.0 {
            // Moving uphill fills the step; otherwise shed a fraction of the
            // excess load.
            let amount = if delta > 0.0 {
                sediment.min(delta)
            } else {
                (sediment - capacity) * config.deposition_rate
            };
            sediment -= amount;
            deposit(heights, size, pos, amount);
        } else {
            let amount = ((capacity - sediment) * config.erosion_rate).min(-delta);
            sediment += erode_radius(heights, size, pos, amount, config.erosion_radius);
        }

        speed = (speed * speed - delta * config.gravity).max(0.0).sqrt();
        water *= 1.0 - config.evaporation;
        if water < config.min_water {
            deposit(heights, size, pos, sediment);
            return;
        }

        pos = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slope_field(size: usize) -> Vec<f32> {
        // Heights rising toward +x: droplets flow toward -x.
        (0..size * size)
            .map(|i| 0.2 + 0.6 * (i % size) as f32 / size as f32)
            .collect()
    }

    #[test]
    fn bilinear_sample_matches_corners() {
        let size = 4;
        let mut heights = vec![0.0f32; 16];
        heights[0] = 1.0;

        let (h, _) = sample(&heights, size, Vec2::new(0.0, 0.0));
        assert!((h - 1.0).abs() < 1e-6);
        let (h, _) = sample(&heights, size, Vec2::new(0.5, 0.0));
        assert!((h - 0.5).abs() < 1e-6);
    }

    #[test]
    fn gradient_points_uphill() {
        let size = 8;
        let heights = slope_field(size);
        let (_, g) = sample(&heights, size, Vec2::new(3.5, 3.5));
        assert!(g.x > 0.0);
        assert!(g.y.abs() < 1e-6);
    }

    #[test]
    fn erosion_is_deterministic() {
        let size = 24;
        let mut a = slope_field(size);
        let mut b = slope_field(size);
        let config = ErosionConfig::default();

        erode(&mut a, size, 400, &mut SeededRng::new(6), &config);
        erode(&mut b, size, 400, &mut SeededRng::new(6), &config);
        assert_eq!(a, b);
    }

    #[test]
    fn droplets_move_material_downhill() {
        let size = 32;
        let mut heights = slope_field(size);
        let before = heights.clone();
        let config = ErosionConfig::default();

        erode(&mut heights, size, 3_000, &mut SeededRng::new(1), &config);

        // The high (+x) side loses material on net, the low side gains.
        let half = size / 2;
        let delta_low: f32 = (0..size)
            .flat_map(|y| (0..half).map(move |x| (x, y)))
            .map(|(x, y)| heights[y * size + x] - before[y * size + x])
            .sum();
        let delta_high: f32 = (0..size)
            .flat_map(|y| (half..size).map(move |x| (x, y)))
            .map(|(x, y)| heights[y * size + x] - before[y * size + x])
            .sum();
        assert!(delta_high < 0.0, "uphill half should erode (delta {delta_high})");
        assert!(delta_low > delta_high, "downhill half should fare better");
    }

    #[test]
    fn no_cell_is_dug_below_zero() {
        let size = 16;
        let mut heights = vec![0.005f32; size * size];
        let config = ErosionConfig::default();
        erode(&mut heights, size, 2_000, &mut SeededRng::new(2), &config);
        assert!(heights.iter().all(|&h| h >= 0.0));
    }

    #[test]
    fn degenerate_grids_are_ignored() {
        let mut single = vec![0.5f32];
        erode(&mut single, 1, 100, &mut SeededRng::new(0), &ErosionConfig::default());
        assert_eq!(single, vec![0.5]);
    }
}
