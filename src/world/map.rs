//! The world map: a dense row-major grid of cells plus plate metadata.

use serde::{Deserialize, Serialize};

use super::cell::WorldCell;
use crate::biomes::Biome;
use crate::geology::GeologicalColumn;
use crate::tectonics::TectonicPlate;

/// A generated world: the cell grid, the plate list, and the seed that
/// produced them.
///
/// Constructed empty at `size * size` cells, mutated in place by each
/// pipeline stage in sequence, then handed immutably to embark scoring and
/// downstream consumers. The grid size is fixed at construction; no cell or
/// plate is ever removed during a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldMap {
    size: usize,
    seed: u64,
    cells: Vec<WorldCell>,
    /// Tectonic plates; populated by the tectonic stage, immutable afterward.
    pub plates: Vec<TectonicPlate>,
    /// Per-cell geological columns, materialized by the geology stage.
    columns: Option<Vec<GeologicalColumn>>,
}

impl WorldMap {
    /// Creates an empty map of `size * size` default cells.
    pub fn new(size: usize, seed: u64) -> Self {
        Self {
            size,
            seed,
            cells: vec![WorldCell::default(); size * size],
            plates: Vec::new(),
            columns: None,
        }
    }

    /// Grid dimension (the map is square).
    pub fn size(&self) -> usize {
        self.size
    }

    /// The seed this world was generated from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// True when (x, y) addresses a cell of the grid.
    pub fn is_valid(&self, x: usize, y: usize) -> bool {
        x < self.size && y < self.size
    }

    /// Row-major index of (x, y). Callers must check validity first.
    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.size + x
    }

    /// Bounds-checked read.
    pub fn get(&self, x: usize, y: usize) -> Option<&WorldCell> {
        if self.is_valid(x, y) {
            Some(&self.cells[self.index(x, y)])
        } else {
            None
        }
    }

    /// Bounds-checked mutable access.
    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut WorldCell> {
        if self.is_valid(x, y) {
            let idx = self.index(x, y);
            Some(&mut self.cells[idx])
        } else {
            None
        }
    }

    /// Unchecked-by-contract read for hot loops.
    ///
    /// # Panics
    /// Panics if (x, y) is out of bounds.
    #[inline]
    pub fn cell(&self, x: usize, y: usize) -> &WorldCell {
        debug_assert!(self.is_valid(x, y));
        &self.cells[y * self.size + x]
    }

    /// Unchecked-by-contract mutable access for hot loops.
    ///
    /// # Panics
    /// Panics if (x, y) is out of bounds.
    #[inline]
    pub fn cell_mut(&mut self, x: usize, y: usize) -> &mut WorldCell {
        debug_assert!(self.is_valid(x, y));
        &mut self.cells[y * self.size + x]
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[WorldCell] {
        &self.cells
    }

    /// All cells, mutable, in row-major order.
    pub fn cells_mut(&mut self) -> &mut [WorldCell] {
        &mut self.cells
    }

    /// In-bounds 8-neighborhood of (x, y). Grid edges are not wrapped.
    pub fn neighbors8(&self, x: usize, y: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        let size = self.size as isize;
        let (cx, cy) = (x as isize, y as isize);
        [
            (-1isize, -1isize),
            (0, -1),
            (1, -1),
            (-1, 0),
            (1, 0),
            (-1, 1),
            (0, 1),
            (1, 1),
        ]
        .into_iter()
        .filter_map(move |(dx, dy)| {
            let (nx, ny) = (cx + dx, cy + dy);
            if nx >= 0 && ny >= 0 && nx < size && ny < size {
                Some((nx as usize, ny as usize))
            } else {
                None
            }
        })
    }

    /// Copies the elevation field into a flat buffer.
    pub fn elevations(&self) -> Vec<f32> {
        self.cells.iter().map(|c| c.elevation).collect()
    }

    /// Writes a flat elevation buffer back into the grid, clamping to [0, 1].
    pub fn set_elevations(&mut self, heights: &[f32]) {
        debug_assert_eq!(heights.len(), self.cells.len());
        for (cell, &h) in self.cells.iter_mut().zip(heights.iter()) {
            cell.elevation = h.clamp(0.0, 1.0);
        }
    }

    /// Global (min, max) elevation across the grid.
    pub fn elevation_range(&self) -> (f32, f32) {
        let mut min = f32::MAX;
        let mut max = f32::MIN;
        for cell in &self.cells {
            min = min.min(cell.elevation);
            max = max.max(cell.elevation);
        }
        (min, max)
    }

    /// Installs the materialized geological columns (one per cell).
    pub fn set_columns(&mut self, columns: Vec<GeologicalColumn>) {
        debug_assert_eq!(columns.len(), self.cells.len());
        self.columns = Some(columns);
    }

    /// The geological column under (x, y), if the geology stage has run.
    pub fn column(&self, x: usize, y: usize) -> Option<&GeologicalColumn> {
        if !self.is_valid(x, y) {
            return None;
        }
        self.columns.as_ref().map(|cols| &cols[y * self.size + x])
    }

    /// True once per-cell geological columns have been materialized.
    pub fn has_columns(&self) -> bool {
        self.columns.is_some()
    }

    /// Fraction of cells whose elevation is above `sea_level`.
    pub fn land_fraction(&self, sea_level: f32) -> f32 {
        if self.cells.is_empty() {
            return 0.0;
        }
        let land = self.cells.iter().filter(|c| c.elevation > sea_level).count();
        land as f32 / self.cells.len() as f32
    }

    /// Number of river-flagged cells.
    pub fn river_cell_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_river).count()
    }

    /// Histogram of biome assignments, as (biome, cell count) pairs sorted by
    /// descending count. Unassigned cells are skipped.
    pub fn biome_histogram(&self) -> Vec<(Biome, usize)> {
        let mut counts: Vec<(Biome, usize)> = Vec::new();
        for cell in &self.cells {
            if let Some(biome) = cell.biome {
                match counts.iter_mut().find(|(b, _)| *b == biome) {
                    Some((_, n)) => *n += 1,
                    None => counts.push((biome, 1)),
                }
            }
        }
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
    }
}
