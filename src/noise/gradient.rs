//! Simplex-style 2D/3D gradient noise over an RNG-shuffled permutation table.

use crate::rng::SeededRng;

const GRAD2: [[f32; 2]; 8] = [
    [1.0, 1.0],
    [-1.0, 1.0],
    [1.0, -1.0],
    [-1.0, -1.0],
    [1.0, 0.0],
    [-1.0, 0.0],
    [0.0, 1.0],
    [0.0, -1.0],
];

const GRAD3: [[f32; 3]; 12] = [
    [1.0, 1.0, 0.0],
    [-1.0, 1.0, 0.0],
    [1.0, -1.0, 0.0],
    [-1.0, -1.0, 0.0],
    [1.0, 0.0, 1.0],
    [-1.0, 0.0, 1.0],
    [1.0, 0.0, -1.0],
    [-1.0, 0.0, -1.0],
    [0.0, 1.0, 1.0],
    [0.0, -1.0, 1.0],
    [0.0, 1.0, -1.0],
    [0.0, -1.0, -1.0],
];

// Skew/unskew factors for the 2D and 3D simplex lattices.
const F2: f32 = 0.366_025_42; // (sqrt(3) - 1) / 2
const G2: f32 = 0.211_324_87; // (3 - sqrt(3)) / 6
const F3: f32 = 1.0 / 3.0;
const G3: f32 = 1.0 / 6.0;

/// Gradient noise primitive. Built once per generation run; sampling is pure
/// and thread-safe, so stages may evaluate it from parallel cell passes.
#[derive(Debug, Clone)]
pub struct GradientNoise {
    perm: Box<[u8; 512]>,
}

impl GradientNoise {
    /// Builds the permutation table from the given RNG stream.
    pub fn new(rng: &mut SeededRng) -> Self {
        let mut table = [0u8; 256];
        for (i, slot) in table.iter_mut().enumerate() {
            *slot = i as u8;
        }
        rng.shuffle(&mut table);

        let mut perm = Box::new([0u8; 512]);
        for i in 0..512 {
            perm[i] = table[i & 255];
        }
        Self { perm }
    }

    /// Samples 2D noise at (x, y). Returns a value in approximately [-1, 1].
    pub fn sample2(&self, x: f32, y: f32) -> f32 {
        let s = (x + y) * F2;
        let i = (x + s).floor();
        let j = (y + s).floor();
        let t = (i + j) * G2;

        // Distances from the cell origin, unskewed.
        let x0 = x - (i - t);
        let y0 = y - (j - t);

        // Offsets for the middle corner: upper or lower triangle.
        let (i1, j1) = if x0 > y0 { (1usize, 0usize) } else { (0usize, 1usize) };

        let x1 = x0 - i1 as f32 + G2;
        let y1 = y0 - j1 as f32 + G2;
        let x2 = x0 - 1.0 + 2.0 * G2;
        let y2 = y0 - 1.0 + 2.0 * G2;

        let ii = (i as i64 & 255) as usize;
        let jj = (j as i64 & 255) as usize;

        let mut n = 0.0f32;

        let mut t0 = 0.5 - x0 * x0 - y0 * y0;
        if t0 > 0.0 {
            t0 *= t0;
            let g = GRAD2[(self.perm[ii + self.perm[jj] as usize] & 7) as usize];
            n += t0 * t0 * (g[0] * x0 + g[1] * y0);
        }

        let mut t1 = 0.5 - x1 * x1 - y1 * y1;
        if t1 > 0.0 {
            t1 *= t1;
            let g = GRAD2[(self.perm[ii + i1 + self.perm[jj + j1] as usize] & 7) as usize];
            n += t1 * t1 * (g[0] * x1 + g[1] * y1);
        }

        let mut t2 = 0.5 - x2 * x2 - y2 * y2;
        if t2 > 0.0 {
            t2 *= t2;
            let g = GRAD2[(self.perm[ii + 1 + self.perm[jj + 1] as usize] & 7) as usize];
            n += t2 * t2 * (g[0] * x2 + g[1] * y2);
        }

        70.0 * n
    }

    /// Samples 3D noise at (x, y, z). Returns a value in approximately [-1, 1].
    pub fn sample3(&self, x: f32, y: f32, z: f32) -> f32 {
        let s = (x + y + z) * F3;
        let i = (x + s).floor();
        let j = (y + s).floor();
        let k = (z + s).floor();
        let t = (i + j + k) * G3;

        let x0 = x - (i - t);
        let y0 = y - (j - t);
        let z0 = z - (k - t);

        // Rank the offsets to pick which simplex of the cell we are in.
        let (i1, j1, k1, i2, j2, k2) = if x0 >= y0 {
            if y0 >= z0 {
                (1, 0, 0, 1, 1, 0)
            } else if x0 >= z0 {
                (1, 0, 0, 1, 0, 1)
            } else {
                (0, 0, 1, 1, 0, 1)
            }
        } else if y0 < z0 {
            (0, 0, 1, 0, 1, 1)
        } else if x0 < z0 {
            (0, 1, 0, 0, 1, 1)
        } else {
            (0, 1, 0, 1, 1, 0)
        };

        let x1 = x0 - i1 as f32 + G3;
        let y1 = y0 - j1 as f32 + G3;
        let z1 = z0 - k1 as f32 + G3;
        let x2 = x0 - i2 as f32 + 2.0 * G3;
        let y2 = y0 - j2 as f32 + 2.0 * G3;
        let z2 = z0 - k2 as f32 + 2.0 * G3;
        let x3 = x0 - 1.0 + 3.0 * G3;
        let y3 = y0 - 1.0 + 3.0 * G3;
        let z3 = z0 - 1.0 + 3.0 * G3;

        let ii = (i as i64 & 255) as usize;
        let jj = (j as i64 & 255) as usize;
        let kk = (k as i64 & 255) as usize;

        let gi = |di: usize, dj: usize, dk: usize| -> usize {
            let p = &self.perm;
            (p[ii + di + p[jj + dj + p[kk + dk] as usize] as usize] % 12) as usize
        };

        let mut n = 0.0f32;

        let mut t0 = 0.6 - x0 * x0 - y0 * y0 - z0 * z0;
        if t0 > 0.0 {
            t0 *= t0;
            let g = GRAD3[gi(0, 0, 0)];
            n += t0 * t0 * (g[0] * x0 + g[1] * y0 + g[2] * z0);
        }

        let mut t1 = 0.6 - x1 * x1 - y1 * y1 - z1 * z1;
        if t1 > 0.0 {
            t1 *= t1;
            let g = GRAD3[gi(i1, j1, k1)];
            n += t1 * t1 * (g[0] * x1 + g[1] * y1 + g[2] * z1);
        }

        let mut t2 = 0.6 - x2 * x2 - y2 * y2 - z2 * z2;
        if t2 > 0.0 {
            t2 *= t2;
            let g = GRAD3[gi(i2, j2, k2)];
            n += t2 * t2 * (g[0] * x2 + g[1] * y2 + g[2] * z2);
        }

        let mut t3 = 0.6 - x3 * x3 - y3 * y3 - z3 * z3;
        if t3 > 0.0 {
            t3 *= t3;
            let g = GRAD3[gi(1, 1, 1)];
            n += t3 * t3 * (g[0] * x3 + g[1] * y3 + g[2] * z3);
        }

        32.0 * n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_are_reproducible_for_a_seed() {
        let a = GradientNoise::new(&mut SeededRng::new(321));
        let b = GradientNoise::new(&mut SeededRng::new(321));

        for i in 0..64 {
            let x = i as f32 * 0.37 - 8.0;
            let y = i as f32 * 0.53 + 2.0;
            assert_eq!(a.sample2(x, y), b.sample2(x, y));
            assert_eq!(a.sample3(x, y, 1.5), b.sample3(x, y, 1.5));
        }
    }

    #[test]
    fn different_seeds_change_the_field() {
        let a = GradientNoise::new(&mut SeededRng::new(1));
        let b = GradientNoise::new(&mut SeededRng::new(2));

        let same = (0..64)
            .filter(|&i| {
                let x = i as f32 * 0.71;
                a.sample2(x, -x) == b.sample2(x, -x)
            })
            .count();
        assert!(same < 64);
    }

    #[test]
    fn samples_stay_in_range() {
        let noise = GradientNoise::new(&mut SeededRng::new(77));
        for i in 0..2000 {
            let x = (i % 53) as f32 * 0.173 - 4.0;
            let y = (i / 53) as f32 * 0.291 - 3.0;
            let n2 = noise.sample2(x, y);
            let n3 = noise.sample3(x, y, 0.5 * x - y);
            assert!(n2.is_finite() && (-1.1..=1.1).contains(&n2), "2d sample {n2} at ({x},{y})");
            assert!(n3.is_finite() && (-1.1..=1.1).contains(&n3), "3d sample {n3} at ({x},{y})");
        }
    }

    #[test]
    fn negative_coordinates_are_continuous() {
        let noise = GradientNoise::new(&mut SeededRng::new(9));
        // Adjacent samples across the origin should not jump discontinuously.
        let a = noise.sample2(-0.01, 0.4);
        let b = noise.sample2(0.01, 0.4);
        assert!((a - b).abs() < 0.2);
    }
}
