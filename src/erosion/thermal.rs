//! Thermal (talus) erosion: scree collapse toward the steepest lower
//! neighbor.

use rayon::prelude::*;

use super::ErosionConfig;

/// Runs `config.thermal_iterations` relaxation passes. Each pass computes all
/// transfers from a frozen snapshot, then applies them in index order, so the
/// parallel and sequential paths produce identical results.
pub fn relax(heights: &mut [f32], size: usize, config: &ErosionConfig, parallel: bool) {
    if size == 0 || heights.len() != size * size {
        return;
    }
    let talus = config.talus_threshold.max(0.0);
    let strength = config.thermal_strength.clamp(0.0, 1.0);
    if strength == 0.0 {
        return;
    }

    for _ in 0..config.thermal_iterations {
        let moves: Vec<(f32, usize)> = if parallel {
            (0..size * size)
                .into_par_iter()
                .map(|i| transfer_for(heights, size, i, talus, strength))
                .collect()
        } else {
            (0..size * size)
                .map(|i| transfer_for(heights, size, i, talus, strength))
                .collect()
        };

        for (i, &(amount, target)) in moves.iter().enumerate() {
            if amount > 0.0 {
                heights[i] -= amount;
                heights[target] += amount;
            }
        }
    }
}

/// Transfer from cell `i` this pass: a fraction of the height excess above
/// the talus threshold, toward the steepest lower neighbor. Half the excess
/// at most, to avoid oscillation between passes.
fn transfer_for(heights: &[f32], size: usize, i: usize, talus: f32, strength: f32) -> (f32, usize) {
    let x = (i % size) as isize;
    let y = (i / size) as isize;
    let h = heights[i];

    let mut steepest_drop = 0.0f32;
    let mut target = i;
    for dy in -1isize..=1 {
        for dx in -1isize..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            let (nx, ny) = (x + dx, y + dy);
            if nx < 0 || ny < 0 || nx >= size as isize || ny >= size as isize {
                continue;
            }
            let ni = ny as usize * size + nx as usize;
            let drop = h - heights[ni];
            if drop > steepest_drop {
                steepest_drop = drop;
                target = ni;
            }
        }
    }

    if steepest_drop > talus {
        (strength * 0.5 * (steepest_drop - talus), target)
    } else {
        (0.0, i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(iterations: u32) -> ErosionConfig {
        ErosionConfig {
            thermal_iterations: iterations,
            ..Default::default()
        }
    }

    #[test]
    fn spike_collapses_toward_neighbors() {
        let size = 9;
        let mut heights = vec![0.2f32; size * size];
        let center = 4 * size + 4;
        heights[center] = 0.9;

        relax(&mut heights, size, &config(10), false);

        assert!(heights[center] < 0.9);
        assert!(heights[center - 1] > 0.2);
    }

    #[test]
    fn mass_is_conserved() {
        let size = 12;
        let mut heights: Vec<f32> = (0..size * size)
            .map(|i| ((i * 31) % 17) as f32 / 17.0)
            .collect();
        let total_before: f32 = heights.iter().sum();

        relax(&mut heights, size, &config(20), false);

        let total_after: f32 = heights.iter().sum();
        assert!((total_before - total_after).abs() < 1e-3);
    }

    #[test]
    fn slopes_below_talus_are_stable() {
        let size = 8;
        // A gentle ramp well under the talus threshold.
        let mut heights: Vec<f32> = (0..size * size)
            .map(|i| (i % size) as f32 * 0.001)
            .collect();
        let before = heights.clone();

        relax(&mut heights, size, &config(5), false);
        assert_eq!(heights, before);
    }

    #[test]
    fn parallel_matches_sequential() {
        let size = 20;
        let make = || -> Vec<f32> {
            (0..size * size)
                .map(|i| ((i * 131) % 23) as f32 / 23.0)
                .collect()
        };
        let mut a = make();
        let mut b = make();

        relax(&mut a, size, &config(15), false);
        relax(&mut b, size, &config(15), true);
        assert_eq!(a, b);
    }
}
