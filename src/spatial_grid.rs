/*
 * Spatial Grid Module
 *
 * This module defines the SpatialGrid used to find particle pairs for the
 * connection pass without comparing every pair. The surface is divided into
 * square cells at least as large as the connection radius, so any pair
 * closer than the radius sits in the same or an adjacent cell.
 *
 * Optimized for performance by:
 * - Reusing cell vectors between frames instead of reallocating
 * - Visiting each neighbouring cell pair once (half-neighbourhood scan)
 * - Comparing squared distances
 */

use nannou::prelude::*;

use crate::viewport::Viewport;

pub struct SpatialGrid {
    pub cell_size: f32,
    pub columns: usize,
    pub rows: usize,
    cells: Vec<Vec<usize>>,
}

// Offsets of the cells each cell is compared against, including itself.
// Using only half the neighbourhood means every cell pair is visited once.
const HALF_NEIGHBOURHOOD: [(isize, isize); 5] = [(0, 0), (1, 0), (-1, 1), (0, 1), (1, 1)];

impl SpatialGrid {
    pub fn new(cell_size: f32, viewport: &Viewport) -> Self {
        let cell_size = cell_size.max(1.0);
        let columns = ((viewport.width / cell_size).ceil() as usize).max(1);
        let rows = ((viewport.height / cell_size).ceil() as usize).max(1);

        let mut cells = Vec::with_capacity(columns * rows);
        for _ in 0..(columns * rows) {
            cells.push(Vec::new());
        }

        Self {
            cell_size,
            columns,
            rows,
            cells,
        }
    }

    // Whether this grid still fits the given radius and surface
    pub fn matches(&self, cell_size: f32, viewport: &Viewport) -> bool {
        let cell_size = cell_size.max(1.0);
        (self.cell_size - cell_size).abs() < f32::EPSILON
            && self.columns == ((viewport.width / cell_size).ceil() as usize).max(1)
            && self.rows == ((viewport.height / cell_size).ceil() as usize).max(1)
    }

    #[inline]
    fn cell_coords(&self, position: Point2) -> (usize, usize) {
        let column = (position.x / self.cell_size).clamp(0.0, self.columns as f32 - 1.0) as usize;
        let row = (position.y / self.cell_size).clamp(0.0, self.rows as f32 - 1.0) as usize;
        (column, row)
    }

    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
    }

    pub fn rebuild(&mut self, positions: impl Iterator<Item = Point2>) {
        self.clear();
        for (index, position) in positions.enumerate() {
            let (column, row) = self.cell_coords(position);
            self.cells[row * self.columns + column].push(index);
        }
    }

    // Call `visit(a, b, distance)` for every unordered pair closer than `radius`, with a < b
    pub fn for_each_pair_within<F>(&self, positions: &[Point2], radius: f32, mut visit: F)
    where
        F: FnMut(usize, usize, f32),
    {
        let radius_squared = radius * radius;

        for row in 0..self.rows {
            for column in 0..self.columns {
                let here = &self.cells[row * self.columns + column];
                if here.is_empty() {
                    continue;
                }

                for &(dx, dy) in &HALF_NEIGHBOURHOOD {
                    let other_column = column as isize + dx;
                    let other_row = row as isize + dy;
                    if other_column < 0
                        || other_row < 0
                        || other_column >= self.columns as isize
                        || other_row >= self.rows as isize
                    {
                        continue;
                    }

                    let there = &self.cells[other_row as usize * self.columns + other_column as usize];
                    let same_cell = dx == 0 && dy == 0;

                    for (slot, &i) in here.iter().enumerate() {
                        // Within one cell only look ahead, otherwise the pair comes up twice
                        let candidates = if same_cell { &there[slot + 1..] } else { &there[..] };

                        for &j in candidates {
                            let distance_squared = positions[i].distance_squared(positions[j]);
                            if distance_squared < radius_squared {
                                let (a, b) = if i < j { (i, j) } else { (j, i) };
                                visit(a, b, distance_squared.sqrt());
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_covers_surface() {
        let grid = SpatialGrid::new(80.0, &Viewport::new(800.0, 601.0));
        assert_eq!(grid.columns, 10);
        assert_eq!(grid.rows, 8);
    }

    #[test]
    fn empty_surface_still_has_one_cell() {
        let grid = SpatialGrid::new(80.0, &Viewport::new(0.0, 0.0));
        assert_eq!((grid.columns, grid.rows), (1, 1));
    }

    #[test]
    fn finds_pairs_across_cell_borders_once() {
        let viewport = Viewport::new(400.0, 400.0);
        let mut grid = SpatialGrid::new(50.0, &viewport);
        let positions = vec![pt2(49.0, 49.0), pt2(51.0, 51.0), pt2(300.0, 300.0), pt2(52.0, 10.0)];
        grid.rebuild(positions.iter().cloned());

        let mut pairs = Vec::new();
        grid.for_each_pair_within(&positions, 50.0, |a, b, _| pairs.push((a, b)));
        pairs.sort();

        assert_eq!(pairs, vec![(0, 1), (0, 3), (1, 3)]);
    }

    #[test]
    fn matches_detects_resizes() {
        let viewport = Viewport::new(800.0, 600.0);
        let grid = SpatialGrid::new(80.0, &viewport);
        assert!(grid.matches(80.0, &viewport));
        assert!(!grid.matches(90.0, &viewport));
        assert!(!grid.matches(80.0, &Viewport::new(1600.0, 600.0)));
    }
}
