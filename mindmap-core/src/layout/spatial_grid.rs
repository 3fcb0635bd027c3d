// Spatial hash grid for point queries against node discs.
//
// Instead of testing every disc on each pointer move, entries are bucketed
// by the grid cells their bounding boxes cover.

use super::{PointF, RectF};
use std::collections::{BTreeSet, HashMap};

/// A spatial hash grid mapping cells to entry slots.
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    /// Size of each cell in the grid.
    cell_size: f64,
    /// Map from cell coordinates to the slots whose bounds touch that cell.
    cells: HashMap<(i64, i64), Vec<usize>>,
}

impl SpatialGrid {
    /// Create a new spatial grid with the given cell size.
    /// Cell size should be roughly the size of the largest expected item.
    pub fn new(cell_size: f64) -> Self {
        let cell_size = if cell_size.is_finite() && cell_size >= 1.0 { cell_size } else { 1.0 };
        Self {
            cell_size,
            cells: HashMap::new(),
        }
    }

    fn cell_of(&self, x: f64, y: f64) -> (i64, i64) {
        ((x / self.cell_size).floor() as i64, (y / self.cell_size).floor() as i64)
    }

    /// Insert an entry covering `bounds`. Non-finite bounds are ignored.
    pub fn insert(&mut self, slot: usize, bounds: &RectF) {
        let finite = bounds.x.is_finite()
            && bounds.y.is_finite()
            && bounds.right().is_finite()
            && bounds.bottom().is_finite();
        if !finite {
            return;
        }
        let (min_x, min_y) = self.cell_of(bounds.x, bounds.y);
        let (max_x, max_y) = self.cell_of(bounds.right(), bounds.bottom());
        for cx in min_x..=max_x {
            for cy in min_y..=max_y {
                self.cells.entry((cx, cy)).or_default().push(slot);
            }
        }
    }

    /// Slots whose bounds might contain `point`, highest slot first.
    /// May include false positives; caller does the exact test.
    pub fn query_point(&self, point: PointF) -> Vec<usize> {
        if !point.is_finite() {
            return Vec::new();
        }
        // floor() is monotonic, so a point inside an entry's bounds always
        // falls in one of the cells that entry was inserted into.
        let mut slots: BTreeSet<usize> = BTreeSet::new();
        if let Some(entries) = self.cells.get(&self.cell_of(point.x, point.y)) {
            slots.extend(entries.iter().copied());
        }
        slots.into_iter().rev().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_query() {
        let mut grid = SpatialGrid::new(100.0);
        grid.insert(0, &RectF { x: 0.0, y: 0.0, w: 50.0, h: 50.0 });
        grid.insert(1, &RectF { x: 200.0, y: 200.0, w: 50.0, h: 50.0 });

        let nearby = grid.query_point(PointF::new(10.0, 10.0));
        assert!(nearby.contains(&0));
        assert!(!nearby.contains(&1));
    }

    #[test]
    fn test_query_orders_highest_slot_first() {
        let mut grid = SpatialGrid::new(100.0);
        grid.insert(3, &RectF { x: 0.0, y: 0.0, w: 50.0, h: 50.0 });
        grid.insert(7, &RectF { x: -20.0, y: -20.0, w: 80.0, h: 80.0 });
        grid.insert(5, &RectF { x: 10.0, y: 10.0, w: 10.0, h: 10.0 });
        assert_eq!(grid.query_point(PointF::new(15.0, 15.0)), vec![7, 5, 3]);
    }

    #[test]
    fn test_negative_coordinates_and_borders() {
        let mut grid = SpatialGrid::new(100.0);
        grid.insert(0, &RectF { x: -150.0, y: -150.0, w: 50.0, h: 50.0 });
        assert_eq!(grid.query_point(PointF::new(-120.0, -120.0)), vec![0]);
        // Right/bottom edge of the entry lands exactly on the cell border.
        assert_eq!(grid.query_point(PointF::new(-100.0, -100.0)), vec![0]);
    }

    #[test]
    fn test_non_finite_bounds_are_skipped() {
        let mut grid = SpatialGrid::new(100.0);
        grid.insert(0, &RectF { x: f64::NAN, y: 0.0, w: 10.0, h: 10.0 });
        assert!(grid.is_empty());
        grid.insert(1, &RectF { x: 0.0, y: 0.0, w: 10.0, h: 10.0 });
        assert!(!grid.is_empty());
    }
}
