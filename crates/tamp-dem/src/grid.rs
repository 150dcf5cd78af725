//! Uniform hash grid for sphere neighbor search.

use std::collections::HashMap;

use tamp_math::Vec3;

/// Grid cell index (i, j, k).
type CellIndex = (i32, i32, i32);

/// Sparse bucket grid. With a cell size of one diameter every touching
/// pair shares a cell or sits in adjacent cells.
pub(crate) struct HashGrid {
    cell: f64,
    buckets: HashMap<CellIndex, Vec<usize>>,
}

impl HashGrid {
    pub fn new(cell: f64) -> Self {
        Self {
            cell,
            buckets: HashMap::new(),
        }
    }

    fn index(&self, x: &Vec3) -> CellIndex {
        (
            (x.x / self.cell).floor() as i32,
            (x.y / self.cell).floor() as i32,
            (x.z / self.cell).floor() as i32,
        )
    }

    pub fn rebuild(&mut self, positions: &[Vec3]) {
        for bucket in self.buckets.values_mut() {
            bucket.clear();
        }
        for (i, x) in positions.iter().enumerate() {
            let idx = self.index(x);
            self.buckets.entry(idx).or_default().push(i);
        }
        self.buckets.retain(|_, bucket| !bucket.is_empty());
    }

    #[cfg(test)]
    fn occupied_cells(&self) -> usize {
        self.buckets.len()
    }

    /// Candidate pairs `(i, j)` with `i < j` from the 3x3x3 stencil.
    pub fn candidate_pairs(&self, positions: &[Vec3]) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for (i, x) in positions.iter().enumerate() {
            let (ci, cj, ck) = self.index(x);
            for di in -1..=1 {
                for dj in -1..=1 {
                    for dk in -1..=1 {
                        if let Some(bucket) = self.buckets.get(&(ci + di, cj + dj, ck + dk)) {
                            pairs.extend(bucket.iter().filter(|&&j| j > i).map(|&j| (i, j)));
                        }
                    }
                }
            }
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjacent_pair_found() {
        let pos = vec![Vec3::new(0.95, 0.0, 0.0), Vec3::new(1.05, 0.0, 0.0)];
        let mut grid = HashGrid::new(1.0);
        grid.rebuild(&pos);
        assert_eq!(grid.candidate_pairs(&pos), vec![(0, 1)]);
    }

    #[test]
    fn test_distant_pair_skipped() {
        let pos = vec![Vec3::zeros(), Vec3::new(5.0, 0.0, 0.0)];
        let mut grid = HashGrid::new(1.0);
        grid.rebuild(&pos);
        assert!(grid.candidate_pairs(&pos).is_empty());
    }

    #[test]
    fn test_rebuild_forgets_old_positions() {
        let mut pos = vec![Vec3::zeros(), Vec3::new(0.5, 0.0, 0.0)];
        let mut grid = HashGrid::new(1.0);
        grid.rebuild(&pos);
        assert_eq!(grid.candidate_pairs(&pos).len(), 1);
        pos[1] = Vec3::new(10.0, 0.0, 0.0);
        grid.rebuild(&pos);
        assert!(grid.candidate_pairs(&pos).is_empty());
    }

    #[test]
    fn test_rebuild_drops_vacated_cells() {
        let mut pos = vec![Vec3::zeros(), Vec3::new(3.0, 0.0, 0.0)];
        let mut grid = HashGrid::new(1.0);
        for step in 0..50 {
            pos[1].x = 3.0 + step as f64;
            grid.rebuild(&pos);
        }
        assert_eq!(grid.occupied_cells(), 2);
    }
}
