//! D8 flow routing and queue-based flow accumulation.

use std::collections::VecDeque;

/// Sentinel for cells with no downstream neighbor (ocean outlets and true
/// sinks).
pub const NO_FLOW: u32 = u32::MAX;

const SQRT_2: f32 = std::f32::consts::SQRT_2;

/// For each cell, the index of the steepest-descent neighbor of its
/// 8-neighborhood (diagonals weighted by distance √2), or [`NO_FLOW`] for
/// ocean cells and cells with no strictly lower neighbor.
pub fn flow_directions(heights: &[f32], size: usize, sea_level: f32) -> Vec<u32> {
    let total = size * size;
    debug_assert_eq!(heights.len(), total);
    let mut down = vec![NO_FLOW; total];

    for i in 0..total {
        let h = heights[i];
        if h <= sea_level {
            continue; // ocean: terminal
        }
        let x = (i % size) as isize;
        let y = (i / size) as isize;

        let mut best_slope = 0.0f32;
        let mut best = NO_FLOW;
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
                if drop <= 0.0 {
                    continue;
                }
                let dist = if dx != 0 && dy != 0 { SQRT_2 } else { 1.0 };
                let slope = drop / dist;
                if slope > best_slope {
                    best_slope = slope;
                    best = ni as u32;
                }
            }
        }
        down[i] = best;
    }

    down
}

/// Flow accumulation in contributing cells (each cell contributes 1,
/// including itself).
///
/// Queue-based topological traversal: cells with no upstream contributors
/// (in-degree zero) seed the queue and push their totals downstream. Never
/// recursive, so deep flow chains on large grids cannot overflow the stack.
pub fn flow_accumulation(downstream: &[u32], size: usize) -> Vec<u32> {
    let total = size * size;
    debug_assert_eq!(downstream.len(), total);

    let mut indegree = vec![0u32; total];
    for &d in downstream {
        if d != NO_FLOW {
            indegree[d as usize] += 1;
        }
    }

    let mut accumulation = vec![1u32; total];
    let mut queue: VecDeque<usize> = (0..total).filter(|&i| indegree[i] == 0).collect();

    while let Some(i) = queue.pop_front() {
        let d = downstream[i];
        if d == NO_FLOW {
            continue;
        }
        let d = d as usize;
        accumulation[d] = accumulation[d].saturating_add(accumulation[i]);
        indegree[d] -= 1;
        if indegree[d] == 0 {
            queue.push_back(d);
        }
    }

    accumulation
}
