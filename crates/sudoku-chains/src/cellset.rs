//! Sets of grid cells (linear indices 0..80) packed into a `u128`.

use std::fmt;
use std::ops::{BitAnd, BitOr, Sub};

use serde::ser::{Serialize, SerializeSeq, Serializer};

const CELL_MASK: u128 = (1u128 << 81) - 1;

/// An immutable-by-value set of cells. Equality and hashing are purely on the bits.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct CellSet(u128);

impl CellSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Every cell of the grid
    pub const fn full() -> Self {
        Self(CELL_MASK)
    }

    pub fn single(cell: usize) -> Self {
        debug_assert!(cell < 81);
        Self(1u128 << cell)
    }

    pub const fn raw(&self) -> u128 {
        self.0
    }

    #[inline]
    pub fn contains(&self, cell: usize) -> bool {
        cell < 81 && self.0 & (1u128 << cell) != 0
    }

    pub fn insert(&mut self, cell: usize) {
        debug_assert!(cell < 81);
        self.0 |= 1u128 << cell;
    }

    pub fn remove(&mut self, cell: usize) {
        if cell < 81 {
            self.0 &= !(1u128 << cell);
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Lowest cell index in the set
    pub fn first(&self) -> Option<usize> {
        if self.0 == 0 {
            None
        } else {
            Some(self.0.trailing_zeros() as usize)
        }
    }

    /// The only cell of a one-cell set
    pub fn single_cell(&self) -> Option<usize> {
        if self.len() == 1 {
            self.first()
        } else {
            None
        }
    }

    pub fn is_subset(&self, other: &CellSet) -> bool {
        self.0 & !other.0 == 0
    }

    pub fn intersects(&self, other: &CellSet) -> bool {
        self.0 & other.0 != 0
    }

    /// Ascending cell indices
    pub fn iter(&self) -> CellIter {
        CellIter(self.0)
    }

    /// All subsets with exactly `k` cells, in ascending order of their lowest members.
    pub fn combinations(&self, k: usize) -> Vec<CellSet> {
        let cells: Vec<usize> = self.iter().collect();
        let mut result = Vec::new();
        if k == 0 || k > cells.len() {
            return result;
        }
        let mut picks: Vec<usize> = (0..k).collect();
        loop {
            result.push(picks.iter().map(|&i| cells[i]).collect());
            // Advance to the next k-combination of indices
            let mut i = k;
            while i > 0 && picks[i - 1] == cells.len() - k + i - 1 {
                i -= 1;
            }
            if i == 0 {
                break;
            }
            picks[i - 1] += 1;
            for j in i..k {
                picks[j] = picks[j - 1] + 1;
            }
        }
        result
    }
}

/// Iterator over the cells of a [`CellSet`].
pub struct CellIter(u128);

impl Iterator for CellIter {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.0 == 0 {
            return None;
        }
        let cell = self.0.trailing_zeros() as usize;
        self.0 &= self.0 - 1;
        Some(cell)
    }
}

impl FromIterator<usize> for CellSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut set = CellSet::empty();
        for cell in iter {
            set.insert(cell);
        }
        set
    }
}

impl BitAnd for CellSet {
    type Output = CellSet;
    fn bitand(self, rhs: CellSet) -> CellSet {
        CellSet(self.0 & rhs.0)
    }
}

impl BitOr for CellSet {
    type Output = CellSet;
    fn bitor(self, rhs: CellSet) -> CellSet {
        CellSet(self.0 | rhs.0)
    }
}

impl Sub for CellSet {
    type Output = CellSet;
    fn sub(self, rhs: CellSet) -> CellSet {
        CellSet(self.0 & !rhs.0)
    }
}

impl fmt::Debug for CellSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Compact `r1c23` style notation; falls back to a bracketed list when the
/// cells share neither a row nor a column.
impl fmt::Display for CellSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<usize> = self.iter().collect();
        if cells.is_empty() {
            return write!(f, "{{}}");
        }
        let row = cells[0] / 9;
        let col = cells[0] % 9;
        if cells.iter().all(|&c| c / 9 == row) {
            write!(f, "r{}c", row + 1)?;
            for &c in &cells {
                write!(f, "{}", c % 9 + 1)?;
            }
            Ok(())
        } else if cells.iter().all(|&c| c % 9 == col) {
            write!(f, "r")?;
            for &c in &cells {
                write!(f, "{}", c / 9 + 1)?;
            }
            write!(f, "c{}", col + 1)
        } else {
            write!(f, "{{")?;
            for (i, &c) in cells.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write!(f, "r{}c{}", c / 9 + 1, c % 9 + 1)?;
            }
            write!(f, "}}")
        }
    }
}

impl Serialize for CellSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for cell in self.iter() {
            seq.serialize_element(&cell)?;
        }
        seq.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_ops() {
        let a: CellSet = [0, 1, 2].into_iter().collect();
        let b: CellSet = [2, 3].into_iter().collect();
        assert_eq!((a & b).iter().collect::<Vec<_>>(), vec![2]);
        assert_eq!((a | b).len(), 4);
        assert_eq!((a - b).iter().collect::<Vec<_>>(), vec![0, 1]);
        assert!(CellSet::single(2).is_subset(&a));
        assert_eq!(CellSet::single(80).single_cell(), Some(80));
    }

    #[test]
    fn test_combinations() {
        let set: CellSet = [4, 5, 6].into_iter().collect();
        let pairs = set.combinations(2);
        assert_eq!(pairs.len(), 3);
        assert_eq!(set.combinations(3), vec![set]);
        assert!(set.combinations(4).is_empty());
    }

    #[test]
    fn test_display() {
        let row: CellSet = [0, 1, 2].into_iter().collect();
        assert_eq!(row.to_string(), "r1c123");
        let col: CellSet = [0, 9].into_iter().collect();
        assert_eq!(col.to_string(), "r12c1");
        let scattered: CellSet = [0, 10].into_iter().collect();
        assert_eq!(scattered.to_string(), "{r1c1,r2c2}");
    }
}
