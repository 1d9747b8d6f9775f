//! Almost Locked Set catalog: N cells of one sector holding N+1 candidates.

use super::fabric::{sector_cells, CandidateFabric};
use crate::{BitSet, CellSet};

/// An Almost Locked Set: N cells with N+1 candidates in a single sector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Als {
    pub cells: CellSet,
    /// Union of the cells' candidates
    pub candidates: BitSet,
    /// First sector the set was found in
    pub sector: usize,
}

impl Als {
    /// Cells of this ALS that still hold `digit`
    pub fn cells_with(&self, fab: &CandidateFabric, digit: u8) -> CellSet {
        self.cells & fab.cells_with(digit)
    }
}

/// Enumerate all ALS of up to `max_cells` cells, each cell set reported once.
pub fn enumerate_als(fab: &CandidateFabric, max_cells: usize) -> Vec<Als> {
    let mut result: Vec<Als> = Vec::new();

    for sector in 0..27 {
        let empty: Vec<usize> = sector_cells(sector)
            .iter()
            .filter(|&&c| fab.values[c].is_none())
            .copied()
            .collect();

        // ALS of size 1: single cell with 2 candidates (bivalue cell)
        for &c in &empty {
            if fab.cell_cands[c].count() == 2 {
                // Report the cell from its row only
                let min_sector = fab.cell_sectors[c][0];
                if sector == min_sector {
                    result.push(Als {
                        cells: CellSet::single(c),
                        candidates: fab.cell_cands[c],
                        sector,
                    });
                }
            }
        }

        // ALS of size 2..=max using Gosper's hack for subset enumeration
        let limit = empty.len().min(max_cells);
        for n in 2..=limit {
            let mask_limit = 1u32 << empty.len();
            let mut set = (1u32 << n) - 1;
            while set < mask_limit {
                let mut cells = CellSet::empty();
                let mut union = BitSet::empty();
                for (bit, &empty_cell) in empty.iter().enumerate() {
                    if set & (1 << bit) != 0 {
                        cells.insert(empty_cell);
                        union = union.union(&fab.cell_cands[empty_cell]);
                    }
                }

                if union.count() == (n + 1) as u32 {
                    // Only the first sector that yields these cells keeps them
                    if !result.iter().any(|a| a.cells == cells) {
                        result.push(Als {
                            cells,
                            candidates: union,
                            sector,
                        });
                    }
                }

                // Gosper's hack: next subset of same size
                let c = set & set.wrapping_neg();
                let r = set + c;
                set = (((r ^ set) >> 2) / c) | r;
            }
        }
    }
    log::debug!("gathered {} almost locked sets", result.len());
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Grid, Position};

    /// Row 1 holds r1c1{1,2}, r1c2{1,3}, r1c3{4,5}; everything else is placed.
    fn als_grid() -> Grid {
        let mut tokens = vec!["=9"; 81];
        tokens[0] = "12";
        tokens[1] = "13";
        tokens[2] = "45";
        Grid::from_pencilmarks(&tokens.join(" ")).unwrap()
    }

    #[test]
    fn test_finds_two_cell_als_once() {
        let fab = CandidateFabric::from_grid(&als_grid());
        let all = enumerate_als(&fab, 5);
        let pair: CellSet = [0, 1].into_iter().collect();
        let found: Vec<&Als> = all.iter().filter(|a| a.cells == pair).collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].candidates, BitSet::from_slice(&[1, 2, 3]));
        assert_eq!(found[0].sector, 0);
        assert_eq!(found[0].cells_with(&fab, 2), CellSet::single(0));
        // {r1c1, r1c3} has four digits
        let other: CellSet = [0, 2].into_iter().collect();
        assert!(all.iter().all(|a| a.cells != other));
    }

    #[test]
    fn test_bivalue_cells_are_single_cell_als() {
        let fab = CandidateFabric::from_grid(&als_grid());
        let all = enumerate_als(&fab, 5);
        let singles = all.iter().filter(|a| a.cells.len() == 1).count();
        assert_eq!(singles, 3);
        assert!(all
            .iter()
            .any(|a| a.cells == CellSet::single(Position::new(0, 2).index())));
    }

    #[test]
    fn test_max_cells_limit() {
        let fab = CandidateFabric::from_grid(&als_grid());
        assert!(enumerate_als(&fab, 1).iter().all(|a| a.cells.len() == 1));
    }
}
