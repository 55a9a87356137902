//! Planchon-Darboux sink filling.
//!
//! Raises interior depressions until every land cell has a monotonic
//! downhill path to the border or the ocean. Border and ocean cells seed the
//! fill surface at their true elevation; all other cells start unbounded and
//! are lowered toward `lowest neighbor + epsilon` on alternating forward and
//! backward sweeps until nothing changes or the sweep cap is hit.

/// Fills depressions in place. Returns the number of sweeps performed.
pub fn fill_sinks(
    heights: &mut [f32],
    size: usize,
    sea_level: f32,
    epsilon: f32,
    max_iterations: u32,
) -> u32 {
    let total = size * size;
    if size < 3 || heights.len() != total {
        return 0;
    }

    let mut filled = vec![f32::INFINITY; total];
    for i in 0..total {
        let x = i % size;
        let y = i / size;
        let is_border = x == 0 || y == 0 || x == size - 1 || y == size - 1;
        if is_border || heights[i] <= sea_level {
            filled[i] = heights[i];
        }
    }

    let neighbors = |i: usize| -> [Option<usize>; 8] {
        let x = (i % size) as isize;
        let y = (i / size) as isize;
        let mut out = [None; 8];
        let offsets = [
            (-1isize, -1isize),
            (0, -1),
            (1, -1),
            (-1, 0),
            (1, 0),
            (-1, 1),
            (0, 1),
            (1, 1),
        ];
        for (slot, (dx, dy)) in out.iter_mut().zip(offsets) {
            let (nx, ny) = (x + dx, y + dy);
            if nx >= 0 && ny >= 0 && nx < size as isize && ny < size as isize {
                *slot = Some(ny as usize * size + nx as usize);
            }
        }
        out
    };

    let mut sweeps = 0u32;
    while sweeps < max_iterations {
        sweeps += 1;
        let mut changed = false;

        // Alternate sweep direction so drainage information propagates both
        // ways across the grid quickly.
        let forward = sweeps % 2 == 1;
        for step in 0..total {
            let i = if forward { step } else { total - 1 - step };
            if filled[i] <= heights[i] {
                continue;
            }

            for n in neighbors(i).into_iter().flatten() {
                let candidate = filled[n] + epsilon;
                if heights[i] >= candidate {
                    // True elevation already drains over this neighbor.
                    filled[i] = heights[i];
                    changed = true;
                    break;
                }
                if filled[i] > candidate {
                    filled[i] = candidate;
                    changed = true;
                }
            }
        }

        if !changed {
            break;
        }
    }

    heights.copy_from_slice(&filled);
    sweeps
}
