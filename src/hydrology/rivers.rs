//! River tracing and lake detection over the routed flow field.

use std::collections::VecDeque;

use super::flow::NO_FLOW;
use super::HydrologyConfig;
use crate::world::WorldMap;

/// Traces rivers downstream from high-accumulation cells.
///
/// Candidates (land cells over the size-scaled threshold) are visited in
/// ascending accumulation order so headwater reaches are traced before the
/// trunks they feed. A traced path must reach `min_river_length` cells to be
/// kept; tracing stops at the ocean, at an existing river, or at the
/// configured river cap. Returns the number of rivers kept.
pub fn trace_rivers(
    map: &mut WorldMap,
    downstream: &[u32],
    accumulation: &[u32],
    config: &HydrologyConfig,
) -> usize {
    let size = map.size();
    let total = size * size;
    debug_assert_eq!(downstream.len(), total);
    debug_assert_eq!(accumulation.len(), total);

    let threshold = config.river_threshold(size);
    let sea_level = config.sea_level;

    let mut candidates: Vec<usize> = (0..total)
        .filter(|&i| {
            accumulation[i] >= threshold
                && map.cells()[i].elevation > sea_level
        })
        .collect();
    candidates.sort_by_key(|&i| (accumulation[i], i));

    let mut rivers = 0usize;
    for &start in &candidates {
        if rivers >= config.max_rivers {
            break;
        }
        if map.cells()[start].is_river {
            continue;
        }

        // Follow the flow until the ocean, an existing river, or a sink.
        let mut path = Vec::new();
        let mut current = start;
        let mut joined_existing = false;
        loop {
            if map.cells()[current].is_river {
                joined_existing = true;
                break;
            }
            if map.cells()[current].elevation <= sea_level {
                break;
            }
            path.push(current);
            let next = downstream[current];
            if next == NO_FLOW {
                break;
            }
            current = next as usize;
        }

        // Tributaries joining an existing river may be shorter.
        let min_len = if joined_existing {
            config.min_river_length / 2
        } else {
            config.min_river_length
        };
        if path.len() < min_len.max(1) {
            continue;
        }

        for &i in &path {
            let x = i % size;
            let y = i / size;
            map.cell_mut(x, y).is_river = true;
        }
        rivers += 1;
    }

    rivers
}

/// Flags lake cells: land in a narrow band above sea level with high
/// accumulation and moisture, sitting in a topographic depression (a
/// majority of higher neighbors). Neighboring cells at nearly the same
/// elevation are absorbed into the same lake body.
pub fn flag_lakes(map: &mut WorldMap, accumulation: &[u32], config: &HydrologyConfig) {
    let size = map.size();
    let total = size * size;
    debug_assert_eq!(accumulation.len(), total);

    let lake_threshold =
        ((config.river_threshold(size) as f32 * config.lake_accum_fraction) as u32).max(4);
    let band_lo = config.sea_level;
    let band_hi = config.sea_level + config.lake_band;

    let mut seeds = Vec::new();
    for y in 0..size {
        for x in 0..size {
            let i = y * size + x;
            let cell = map.cell(x, y);
            if cell.elevation <= band_lo || cell.elevation > band_hi {
                continue;
            }
            if accumulation[i] < lake_threshold || cell.moisture < config.lake_moisture_min {
                continue;
            }

            let elevation = cell.elevation;
            let higher = map
                .neighbors8(x, y)
                .filter(|&(nx, ny)| map.cell(nx, ny).elevation > elevation)
                .count();
            let neighbor_count = map.neighbors8(x, y).count();
            if higher * 2 > neighbor_count {
                seeds.push((x, y));
            }
        }
    }

    // Absorb near-equal-elevation neighbors into each lake body.
    let mut queue: VecDeque<(usize, usize)> = VecDeque::new();
    for (x, y) in seeds {
        let seed_elevation = map.cell(x, y).elevation;
        if map.cell(x, y).is_lake {
            continue;
        }
        map.cell_mut(x, y).is_lake = true;
        queue.push_back((x, y));

        while let Some((cx, cy)) = queue.pop_front() {
            let neighbors: Vec<(usize, usize)> = map.neighbors8(cx, cy).collect();
            for (nx, ny) in neighbors {
                let neighbor = map.cell(nx, ny);
                if neighbor.is_lake || neighbor.elevation <= band_lo {
                    continue;
                }
                if (neighbor.elevation - seed_elevation).abs() <= config.lake_merge_delta {
                    map.cell_mut(nx, ny).is_lake = true;
                    queue.push_back((nx, ny));
                }
            }
        }
    }
}
