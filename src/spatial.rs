/// Uniform grid for broad-phase projectile/target queries.
///
/// Targets are bucketed by the cell containing their centre. A query returns
/// every target in the cells touched by a circle grown by the largest target
/// radius, so callers must still do the exact sum-of-radii test.
///
/// The cell size matches the background grid spacing (120 world units). With
/// bullets of radius ≤ ~30 and targets of radius ≤ 22 a query touches at most
/// a 3×3 block.
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct SpatialGrid {
    cell_size: f32,
    /// Largest radius inserted so far; widens every query.
    max_radius: f32,
    cells: HashMap<(i32, i32), Vec<usize>>,
}

impl SpatialGrid {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            max_radius: 0.0,
            cells: HashMap::new(),
        }
    }

    /// Build a grid over `(x, y, r)` items, indexed by position in the iterator.
    pub fn build(cell_size: f32, items: impl IntoIterator<Item = (f32, f32, f32)>) -> Self {
        let mut grid = Self::new(cell_size);
        for (index, (x, y, r)) in items.into_iter().enumerate() {
            grid.insert(index, x, y, r);
        }
        grid
    }

    fn world_to_cell(&self, x: f32, y: f32) -> (i32, i32) {
        (
            (x / self.cell_size).floor() as i32,
            (y / self.cell_size).floor() as i32,
        )
    }

    pub fn insert(&mut self, index: usize, x: f32, y: f32, r: f32) {
        let cell = self.world_to_cell(x, y);
        self.cells.entry(cell).or_default().push(index);
        self.max_radius = self.max_radius.max(r);
    }

    /// Indices of items that may overlap the circle at `(x, y)` with radius `r`,
    /// in ascending order.
    pub fn query(&self, x: f32, y: f32, r: f32) -> Vec<usize> {
        let reach = r + self.max_radius;
        let (min_cx, min_cy) = self.world_to_cell(x - reach, y - reach);
        let (max_cx, max_cy) = self.world_to_cell(x + reach, y + reach);

        let mut found = Vec::new();
        for cx in min_cx..=max_cx {
            for cy in min_cy..=max_cy {
                if let Some(indices) = self.cells.get(&(cx, cy)) {
                    found.extend_from_slice(indices);
                }
            }
        }
        found.sort_unstable();
        found
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_finds_items_in_neighbouring_cells() {
        let grid = SpatialGrid::build(
            120.0,
            [(100.0, 100.0, 10.0), (125.0, 100.0, 10.0), (1000.0, 1000.0, 10.0)],
        );
        assert_eq!(grid.query(118.0, 100.0, 5.0), vec![0, 1]);
        assert_eq!(grid.query(1000.0, 990.0, 5.0), vec![2]);
    }

    #[test]
    fn query_is_conservative_for_large_targets() {
        // Target centred in the next cell over but big enough to reach the probe.
        let grid = SpatialGrid::build(120.0, [(250.0, 60.0, 40.0)]);
        assert_eq!(grid.query(215.0, 60.0, 2.0), vec![0]);
    }

    #[test]
    fn negative_coordinates_are_bucketed() {
        let grid = SpatialGrid::build(120.0, [(-10.0, -10.0, 5.0)]);
        assert_eq!(grid.query(-5.0, -5.0, 1.0), vec![0]);
        assert!(!grid.is_empty());
    }
}
