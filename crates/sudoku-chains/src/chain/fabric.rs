//! CandidateFabric: dual-indexed candidate state built from Grid.
//!
//! Provides O(1) lookups for "which cells in sector S have candidate d?" and
//! "which sectors does cell C belong to?". The graph builder and the conclusion
//! calculus only ever read the grid through a `&CandidateFabric`.

use crate::{BitSet, CellSet, Grid, Position};

/// Sector index convention: 0..8 = rows, 9..17 = columns, 18..26 = boxes.
pub const SECTOR_ROW_BASE: usize = 0;
pub const SECTOR_COL_BASE: usize = 9;
pub const SECTOR_BOX_BASE: usize = 18;

/// One entry of the line x box intersection catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Intersection {
    /// The three cells shared by one line and one box
    pub cells: CellSet,
}

/// Dual-indexed candidate state, built once per query from Grid.
pub struct CandidateFabric {
    /// Per-cell candidates (indexed by linear cell index 0..80)
    pub cell_cands: [BitSet; 81],
    /// Placed values (None if empty)
    pub values: [Option<u8>; 81],
    /// digit_cells[digit-1] = every empty cell still holding `digit`
    pub digit_cells: [CellSet; 9],
    /// Which 3 sectors each cell belongs to: [row_sector, col_sector, box_sector]
    pub cell_sectors: [[usize; 3]; 81],
    /// The 9 cells of each sector as a set
    pub sector_sets: [CellSet; 27],
    /// Precomputed 20 peers per cell (cells in same row/col/box, excluding self)
    pub peer_sets: [CellSet; 81],
    /// All 54 line x box intersections
    pub intersections: Vec<Intersection>,
}

/// Convert (row, col) to linear cell index
#[inline]
pub fn cell_index(row: usize, col: usize) -> usize {
    row * 9 + col
}

/// Convert linear cell index back to (row, col)
#[inline]
pub fn cell_pos(idx: usize) -> (usize, usize) {
    (idx / 9, idx % 9)
}

/// Convert linear cell index to Position
#[inline]
pub fn idx_to_pos(idx: usize) -> Position {
    let (r, c) = cell_pos(idx);
    Position::new(r, c)
}

/// Get the 9 cell indices belonging to a sector
pub fn sector_cells(sector: usize) -> [usize; 9] {
    if sector < 9 {
        let row = sector;
        std::array::from_fn(|col| cell_index(row, col))
    } else if sector < 18 {
        let col = sector - 9;
        std::array::from_fn(|row| cell_index(row, col))
    } else {
        let box_idx = sector - 18;
        let box_row = (box_idx / 3) * 3;
        let box_col = (box_idx % 3) * 3;
        std::array::from_fn(|i| cell_index(box_row + i / 3, box_col + i % 3))
    }
}

/// Compute the 20 peers of a cell (same row/col/box, excluding self)
fn compute_peers(idx: usize) -> CellSet {
    let sectors = compute_cell_sectors(idx);
    let mut peers = CellSet::empty();
    for sec in sectors {
        for cell in sector_cells(sec) {
            peers.insert(cell);
        }
    }
    peers.remove(idx);
    debug_assert_eq!(peers.len(), 20);
    peers
}

/// Precompute which 3 sectors each cell belongs to
fn compute_cell_sectors(idx: usize) -> [usize; 3] {
    let (row, col) = cell_pos(idx);
    let box_idx = (row / 3) * 3 + col / 3;
    [
        SECTOR_ROW_BASE + row,
        SECTOR_COL_BASE + col,
        SECTOR_BOX_BASE + box_idx,
    ]
}

fn compute_intersections(sector_sets: &[CellSet; 27]) -> Vec<Intersection> {
    let mut result = Vec::with_capacity(54);
    for line in 0..18 {
        for block in SECTOR_BOX_BASE..27 {
            let cells = sector_sets[line] & sector_sets[block];
            if !cells.is_empty() {
                result.push(Intersection { cells });
            }
        }
    }
    debug_assert_eq!(result.len(), 54);
    result
}

impl CandidateFabric {
    /// Build the fabric from a Grid snapshot. Call once per query.
    pub fn from_grid(grid: &Grid) -> Self {
        let mut fab = CandidateFabric {
            cell_cands: [BitSet::empty(); 81],
            values: [None; 81],
            digit_cells: [CellSet::empty(); 9],
            cell_sectors: [[0; 3]; 81],
            sector_sets: [CellSet::empty(); 27],
            peer_sets: [CellSet::empty(); 81],
            intersections: Vec::new(),
        };

        // Precompute static topology
        for sector in 0..27 {
            fab.sector_sets[sector] = sector_cells(sector).into_iter().collect();
        }
        for idx in 0..81 {
            fab.cell_sectors[idx] = compute_cell_sectors(idx);
            fab.peer_sets[idx] = compute_peers(idx);
        }
        fab.intersections = compute_intersections(&fab.sector_sets);

        // Populate cell data from grid
        for idx in 0..81 {
            let pos = idx_to_pos(idx);
            if let Some(v) = grid.cell(pos).value() {
                fab.values[idx] = Some(v);
            } else {
                let cands = grid.get_candidates(pos);
                fab.cell_cands[idx] = cands;
                for d in cands.iter() {
                    fab.digit_cells[(d - 1) as usize].insert(idx);
                }
            }
        }

        fab
    }

    /// Check if two cells see each other (same row, col, or box)
    #[inline]
    pub fn sees(&self, a: usize, b: usize) -> bool {
        self.peer_sets[a].contains(b)
    }

    /// Check if cell has candidate
    #[inline]
    pub fn has_cand(&self, idx: usize, digit: u8) -> bool {
        self.values[idx].is_none() && self.cell_cands[idx].contains(digit)
    }

    #[inline]
    pub fn is_bivalue(&self, idx: usize) -> bool {
        self.values[idx].is_none() && self.cell_cands[idx].count() == 2
    }

    /// Every empty cell holding `digit`
    #[inline]
    pub fn cells_with(&self, digit: u8) -> CellSet {
        self.digit_cells[(digit - 1) as usize]
    }

    /// Cells in a sector that have a given candidate
    pub fn sector_cells_with_candidate(&self, sector: usize, digit: u8) -> CellSet {
        self.sector_sets[sector] & self.cells_with(digit)
    }

    /// Cells that see every member of `cells` (members themselves excluded).
    pub fn peer_intersection(&self, cells: CellSet) -> CellSet {
        if cells.is_empty() {
            return CellSet::empty();
        }
        cells
            .iter()
            .fold(CellSet::full(), |acc, c| acc & self.peer_sets[c])
            - cells
    }

    /// Sectors that contain every member of `cells`, in ascending order.
    pub fn covering_sectors(&self, cells: CellSet) -> Vec<usize> {
        if cells.is_empty() {
            return Vec::new();
        }
        (0..27)
            .filter(|&s| cells.is_subset(&self.sector_sets[s]))
            .collect()
    }

    /// Whether `cells` lies inside a single line x box intersection.
    pub fn in_one_intersection(&self, cells: CellSet) -> bool {
        !cells.is_empty()
            && self
                .intersections
                .iter()
                .any(|inter| cells.is_subset(&inter.cells))
    }

    /// Get all empty cell indices
    pub fn empty_cells(&self) -> Vec<usize> {
        (0..81).filter(|&i| self.values[i].is_none()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PUZZLE: &str =
        "530070000600195000098000060800060003400803001700020006060000280000419005000080079";

    #[test]
    fn test_cell_index_roundtrip() {
        for row in 0..9 {
            for col in 0..9 {
                let idx = cell_index(row, col);
                assert_eq!(cell_pos(idx), (row, col));
            }
        }
    }

    #[test]
    fn test_sector_cells() {
        assert_eq!(sector_cells(0), [0, 1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(sector_cells(9), [0, 9, 18, 27, 36, 45, 54, 63, 72]);
        assert_eq!(sector_cells(18), [0, 1, 2, 9, 10, 11, 18, 19, 20]);
    }

    #[test]
    fn test_peers() {
        let peers = compute_peers(0);
        assert_eq!(peers.len(), 20);
        assert!(peers.contains(1));
        assert!(peers.contains(9));
        assert!(peers.contains(10));
        assert!(!peers.contains(0));
    }

    #[test]
    fn test_fabric_from_grid() {
        let grid = Grid::from_string(PUZZLE).unwrap();
        let fab = CandidateFabric::from_grid(&grid);

        assert_eq!(fab.values[0], Some(5));
        let idx = cell_index(0, 2);
        assert!(fab.values[idx].is_none());
        assert!(!fab.cell_cands[idx].contains(5));
        assert!(!fab.cells_with(5).contains(idx));
        assert_eq!(fab.intersections.len(), 54);
    }

    #[test]
    fn test_sees() {
        let grid = Grid::from_string(PUZZLE).unwrap();
        let fab = CandidateFabric::from_grid(&grid);
        assert!(fab.sees(0, 5));
        assert!(fab.sees(0, 9));
        assert!(fab.sees(0, 10));
        assert!(!fab.sees(0, 40));
    }

    #[test]
    fn test_peer_intersection_and_cover() {
        let grid = Grid::from_string(PUZZLE).unwrap();
        let fab = CandidateFabric::from_grid(&grid);

        // r1c1 and r1c2 share row 1 and box 1
        let pair: CellSet = [0, 1].into_iter().collect();
        let common = fab.peer_intersection(pair);
        assert_eq!(common.len(), 7 + 6);
        assert_eq!(fab.covering_sectors(pair), vec![0, 18]);
        assert!(fab.in_one_intersection(pair));

        // r1c1 and r2c4 share nothing
        let apart: CellSet = [0, 12].into_iter().collect();
        assert!(fab.covering_sectors(apart).is_empty());
        assert!(!fab.in_one_intersection(apart));
        // common peers: r1c4..6 (via r2c4's box) and r2c1..3 (via r1c1's box)
        assert_eq!(fab.peer_intersection(apart).len(), 6);
    }
}
