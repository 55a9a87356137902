//! Plate boundary detection, classification, and stress spreading.

use glam::Vec2;

use super::{wrapped_delta, TectonicConfig};
use crate::world::{BoundaryType, WorldMap};

/// Classifies a boundary from the relative drift `v_rel` and the unit normal
/// `n` pointing from one plate center toward the other.
///
/// Dominant normal motion is convergent (approaching) or divergent
/// (separating); dominant shear is a transform fault.
pub fn classify_relative_motion(v_rel: Vec2, n: Vec2) -> BoundaryType {
    let dot = v_rel.dot(n);
    let cross = v_rel.perp_dot(n).abs();
    if dot.abs() > cross {
        if dot > 0.0 {
            BoundaryType::Convergent
        } else {
            BoundaryType::Divergent
        }
    } else {
        BoundaryType::Transform
    }
}

/// Marks every cell adjacent to a cell of a different plate as a boundary
/// cell: sets `boundary_type`, `neighbor_plate_id`, and the local
/// `boundary_stress` from the plates' relative drift.
pub fn classify_boundaries(map: &mut WorldMap) {
    let size = map.size();
    if size == 0 || map.plates.len() < 2 {
        return;
    }

    for y in 0..size {
        for x in 0..size {
            let own_plate = map.cell(x, y).plate_id;

            // First differing 4-neighbor in scan order defines the boundary.
            let mut other: Option<usize> = None;
            for (dx, dy) in [(-1isize, 0isize), (1, 0), (0, -1), (0, 1)] {
                let (nx, ny) = (x as isize + dx, y as isize + dy);
                if nx < 0 || ny < 0 || nx >= size as isize || ny >= size as isize {
                    continue;
                }
                let neighbor_plate = map.cell(nx as usize, ny as usize).plate_id;
                if neighbor_plate != own_plate {
                    other = Some(neighbor_plate);
                    break;
                }
            }

            let Some(other) = other else { continue };
            if own_plate >= map.plates.len() || other >= map.plates.len() {
                continue;
            }

            let a = &map.plates[own_plate];
            let b = &map.plates[other];
            let v_rel = a.drift - b.drift;
            let n = wrapped_delta(a.center, b.center, size as f32).normalize_or_zero();

            let boundary_type = classify_relative_motion(v_rel, n);
            let stress = (v_rel.length() / 2.0).min(1.0);

            let cell = map.cell_mut(x, y);
            cell.boundary_type = boundary_type;
            cell.neighbor_plate_id = Some(other);
            cell.boundary_stress = stress;
        }
    }
}

/// Spreads boundary stress outward with linear falloff over
/// `config.stress_radius`, merging by max (never summing), and returns the
/// boundary-type-dependent elevation deltas spread the same way.
///
/// Reads boundary cells from the grid as classified, writes stress back per
/// cell, and returns a per-cell uplift buffer for the base-elevation pass.
pub fn spread_stress(map: &mut WorldMap, config: &TectonicConfig) -> Vec<f32> {
    let size = map.size();
    let radius = config.stress_radius as isize;
    let mut stress = vec![0.0f32; size * size];
    let mut uplift = vec![0.0f32; size * size];

    if size == 0 {
        return uplift;
    }

    for (i, cell) in map.cells().iter().enumerate() {
        stress[i] = cell.boundary_stress;
    }

    // Gather boundary sources before writing anything.
    struct Source {
        x: isize,
        y: isize,
        stress: f32,
        uplift: f32,
    }

    let sources: Vec<Source> = map
        .cells()
        .iter()
        .enumerate()
        .filter(|(_, c)| c.is_boundary())
        .map(|(i, c)| {
            let both_continental = !map.plates[c.plate_id].is_oceanic
                && c
                    .neighbor_plate_id
                    .map(|n| !map.plates[n].is_oceanic)
                    .unwrap_or(false);
            let delta = match c.boundary_type {
                BoundaryType::Convergent if both_continental => config.convergent_uplift,
                BoundaryType::Convergent => config.arc_uplift,
                BoundaryType::Divergent => -config.divergent_drop,
                BoundaryType::Transform => config.transform_uplift,
                BoundaryType::None => 0.0,
            };
            Source {
                x: (i % size) as isize,
                y: (i / size) as isize,
                stress: c.boundary_stress,
                uplift: delta * c.boundary_stress,
            }
        })
        .collect();

    for src in &sources {
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                let (nx, ny) = (src.x + dx, src.y + dy);
                if nx < 0 || ny < 0 || nx >= size as isize || ny >= size as isize {
                    continue;
                }
                let dist = ((dx * dx + dy * dy) as f32).sqrt();
                if dist >= radius as f32 {
                    continue;
                }
                let falloff = 1.0 - dist / radius as f32;
                let idx = ny as usize * size + nx as usize;

                let s = src.stress * falloff;
                if s > stress[idx] {
                    stress[idx] = s;
                }
                let u = src.uplift * falloff;
                if u.abs() > uplift[idx].abs() {
                    uplift[idx] = u;
                }
            }
        }
    }

    for (cell, &s) in map.cells_mut().iter_mut().zip(stress.iter()) {
        cell.boundary_stress = s.clamp(0.0, 1.0);
    }

    uplift
}
