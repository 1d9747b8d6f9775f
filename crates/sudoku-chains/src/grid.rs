//! The 81-cell grid: placed values plus a candidate mask per empty cell.
//!
//! The chain engine only ever reads a grid; mutation helpers exist so callers
//! can apply conclusions and so tests can lay out arbitrary pencil marks.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AicError, Result};
use crate::BitSet;

/// Row/column coordinate, both 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Linear index 0..80
    #[inline]
    pub fn index(&self) -> usize {
        self.row * 9 + self.col
    }

    #[inline]
    pub fn from_index(idx: usize) -> Self {
        Self::new(idx / 9, idx % 9)
    }

    /// Box index 0..8
    pub fn box_index(&self) -> usize {
        (self.row / 3) * 3 + self.col / 3
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}c{}", self.row + 1, self.col + 1)
    }
}

/// A single cell: either a placed value or a set of candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cell {
    value: Option<u8>,
    given: bool,
    candidates: BitSet,
}

impl Cell {
    pub fn value(&self) -> Option<u8> {
        self.value
    }

    pub fn is_given(&self) -> bool {
        self.given
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }

    pub fn candidates(&self) -> BitSet {
        self.candidates
    }

    pub fn remove_candidate(&mut self, digit: u8) {
        self.candidates.remove(digit);
    }

    pub fn set_given(&mut self, value: u8) {
        self.value = Some(value);
        self.given = true;
        self.candidates = BitSet::empty();
    }
}

/// Classic 9x9 Sudoku grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: [Cell; 81],
}

impl Default for Grid {
    fn default() -> Self {
        Self::new_classic()
    }
}

impl Grid {
    /// An empty grid where every cell holds all nine candidates.
    pub fn new_classic() -> Self {
        let cell = Cell {
            value: None,
            given: false,
            candidates: BitSet::all(),
        };
        Self { cells: [cell; 81] }
    }

    /// Parse an 81-character puzzle string (`0` or `.` for empty cells).
    /// Candidates are computed from the placed values.
    pub fn from_string(s: &str) -> Option<Self> {
        let chars: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();
        if chars.len() != 81 {
            return None;
        }
        let mut grid = Self::new_classic();
        for (idx, ch) in chars.iter().enumerate() {
            match ch {
                '0' | '.' => {}
                '1'..='9' => grid.cells[idx].set_given(*ch as u8 - b'0'),
                _ => return None,
            }
        }
        grid.recalculate_candidates();
        Some(grid)
    }

    /// Parse 81 whitespace-separated pencil-mark tokens. `=d` places digit `d`;
    /// any other token is the literal candidate list of an empty cell.
    /// Candidates are taken as written, not recomputed.
    pub fn from_pencilmarks(s: &str) -> Result<Self> {
        let tokens: Vec<&str> = s.split_whitespace().collect();
        if tokens.len() != 81 {
            return Err(AicError::InvalidGrid(format!(
                "expected 81 pencil-mark tokens, found {}",
                tokens.len()
            )));
        }
        let mut grid = Self::new_classic();
        for (idx, token) in tokens.iter().enumerate() {
            let pos = Position::from_index(idx);
            if let Some(value) = token.strip_prefix('=') {
                match value.as_bytes() {
                    [d @ b'1'..=b'9'] => grid.cells[idx].set_given(d - b'0'),
                    _ => {
                        return Err(AicError::InvalidGrid(format!(
                            "bad placed value `{}` at {}",
                            token, pos
                        )))
                    }
                }
                continue;
            }
            let mut cands = BitSet::empty();
            for ch in token.chars() {
                match ch {
                    '1'..='9' => cands.insert(ch as u8 - b'0'),
                    _ => {
                        return Err(AicError::InvalidGrid(format!(
                            "bad candidate token `{}` at {}",
                            token, pos
                        )))
                    }
                }
            }
            grid.set_candidates(pos, cands);
        }
        Ok(grid)
    }

    pub fn cell(&self, pos: Position) -> &Cell {
        &self.cells[pos.index()]
    }

    pub fn cell_mut(&mut self, pos: Position) -> &mut Cell {
        &mut self.cells[pos.index()]
    }

    pub fn get(&self, pos: Position) -> Option<u8> {
        self.cells[pos.index()].value
    }

    /// Candidates of an empty cell (empty set for filled cells)
    pub fn get_candidates(&self, pos: Position) -> BitSet {
        let cell = &self.cells[pos.index()];
        if cell.value.is_some() {
            BitSet::empty()
        } else {
            cell.candidates
        }
    }

    /// Replace the candidates of a cell, clearing any placed value.
    pub fn set_candidates(&mut self, pos: Position, candidates: BitSet) {
        let cell = &mut self.cells[pos.index()];
        cell.value = None;
        cell.given = false;
        cell.candidates = candidates;
    }

    /// Place or clear a value without touching peer candidates.
    pub fn set_cell_unchecked(&mut self, pos: Position, value: Option<u8>) {
        let cell = &mut self.cells[pos.index()];
        cell.value = value;
        cell.given = false;
        cell.candidates = BitSet::empty();
    }

    /// Recompute every empty cell's candidates from the placed values.
    pub fn recalculate_candidates(&mut self) {
        for idx in 0..81 {
            if self.cells[idx].value.is_some() {
                self.cells[idx].candidates = BitSet::empty();
                continue;
            }
            let pos = Position::from_index(idx);
            let mut cands = BitSet::all();
            for peer in peers_of(pos) {
                if let Some(v) = self.cells[peer.index()].value {
                    cands.remove(v);
                }
            }
            self.cells[idx].candidates = cands;
        }
    }

    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(|c| c.value.is_some())
    }

    /// Check structural consistency: no digit placed twice in a house, no
    /// empty cell left without candidates, and no candidate that a placed
    /// peer already rules out.
    pub fn validate(&self) -> Result<()> {
        for house in 0..27 {
            let mut seen = BitSet::empty();
            for pos in house_positions(house) {
                if let Some(v) = self.get(pos) {
                    if seen.contains(v) {
                        return Err(AicError::InvalidGrid(format!(
                            "digit {} placed twice in {}",
                            v,
                            house_name(house)
                        )));
                    }
                    seen.insert(v);
                }
            }
        }
        for idx in 0..81 {
            let cell = &self.cells[idx];
            if cell.value.is_some() {
                continue;
            }
            let pos = Position::from_index(idx);
            if cell.candidates.is_empty() {
                return Err(AicError::InvalidGrid(format!("{} has no candidates", pos)));
            }
            for peer in peers_of(pos) {
                if let Some(v) = self.get(peer) {
                    if cell.candidates.contains(v) {
                        return Err(AicError::InvalidGrid(format!(
                            "{} lists candidate {} already placed at {}",
                            pos, v, peer
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Positions of house 0..26 (rows, then columns, then boxes)
pub(crate) fn house_positions(house: usize) -> [Position; 9] {
    std::array::from_fn(|i| match house {
        0..=8 => Position::new(house, i),
        9..=17 => Position::new(i, house - 9),
        _ => {
            let b = house - 18;
            Position::new((b / 3) * 3 + i / 3, (b % 3) * 3 + i % 3)
        }
    })
}

/// Human-readable house name: `row 1`, `column 3`, `box 9`
pub fn house_name(house: usize) -> String {
    match house {
        0..=8 => format!("row {}", house + 1),
        9..=17 => format!("column {}", house - 8),
        _ => format!("box {}", house - 17),
    }
}

pub(crate) fn peers_of(pos: Position) -> impl Iterator<Item = Position> {
    let b = pos.box_index();
    (0..81)
        .map(Position::from_index)
        .filter(move |p| *p != pos && (p.row == pos.row || p.col == pos.col || p.box_index() == b))
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..9 {
            if row > 0 && row % 3 == 0 {
                writeln!(f, "------+-------+------")?;
            }
            for col in 0..9 {
                if col > 0 && col % 3 == 0 {
                    write!(f, "| ")?;
                }
                match self.get(Position::new(row, col)) {
                    Some(v) => write!(f, "{}", v)?,
                    None => write!(f, ".")?,
                }
                if col < 8 {
                    write!(f, " ")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PUZZLE: &str =
        "530070000600195000098000060800060003400803001700020006060000280000419005000080079";

    #[test]
    fn test_from_string_computes_candidates() {
        let grid = Grid::from_string(PUZZLE).unwrap();
        assert_eq!(grid.get(Position::new(0, 0)), Some(5));
        assert!(grid.cell(Position::new(0, 0)).is_given());
        let cands = grid.get_candidates(Position::new(0, 2));
        assert!(!cands.contains(5));
        assert!(!cands.contains(3));
        assert!(cands.contains(4));
        assert!(grid.validate().is_ok());
    }

    #[test]
    fn test_from_string_rejects_bad_input() {
        assert!(Grid::from_string("123").is_none());
        let mut bad = PUZZLE.to_string();
        bad.replace_range(0..1, "x");
        assert!(Grid::from_string(&bad).is_none());
    }

    #[test]
    fn test_pencilmarks() {
        let mut tokens = vec!["=1"; 81];
        tokens[3] = "27";
        let grid = Grid::from_pencilmarks(&tokens.join(" ")).unwrap();
        assert_eq!(grid.get_candidates(Position::new(0, 3)), BitSet::from_slice(&[2, 7]));
        // Every row holds a duplicate 1
        assert!(grid.validate().is_err());

        tokens[5] = "2x";
        assert!(Grid::from_pencilmarks(&tokens.join(" ")).is_err());
    }

    #[test]
    fn test_validate_empty_cell_without_candidates() {
        let mut grid = Grid::from_string(PUZZLE).unwrap();
        grid.set_candidates(Position::new(0, 2), BitSet::empty());
        assert!(matches!(grid.validate(), Err(AicError::InvalidGrid(_))));
    }

    #[test]
    fn test_validate_rejects_stale_candidates() {
        let mut grid = Grid::from_string(PUZZLE).unwrap();
        // r1c1 holds a placed 5
        grid.set_candidates(Position::new(0, 2), BitSet::from_slice(&[4, 5]));
        let err = grid.validate().unwrap_err();
        assert_eq!(
            err,
            AicError::InvalidGrid("r1c3 lists candidate 5 already placed at r1c1".to_string())
        );

        // A subset of the computed candidates is still consistent
        let mut grid = Grid::from_string(PUZZLE).unwrap();
        grid.set_candidates(Position::new(0, 2), BitSet::from_slice(&[4]));
        assert!(grid.validate().is_ok());

        // Pencil marks are taken as written, so unreduced marks are caught here
        let unreduced: Vec<String> = PUZZLE
            .chars()
            .map(|c| match c {
                '0' => "123456789".to_string(),
                d => format!("={}", d),
            })
            .collect();
        let grid = Grid::from_pencilmarks(&unreduced.join(" ")).unwrap();
        assert!(grid.validate().is_err());

        let computed = Grid::from_string(PUZZLE).unwrap();
        let reduced: Vec<String> = (0..81)
            .map(Position::from_index)
            .map(|pos| match computed.get(pos) {
                Some(d) => format!("={}", d),
                None => computed
                    .get_candidates(pos)
                    .iter()
                    .map(|d| d.to_string())
                    .collect(),
            })
            .collect();
        let grid = Grid::from_pencilmarks(&reduced.join(" ")).unwrap();
        assert!(grid.validate().is_ok());
    }

    #[test]
    fn test_house_positions() {
        assert_eq!(house_positions(0)[8], Position::new(0, 8));
        assert_eq!(house_positions(9)[8], Position::new(8, 0));
        assert_eq!(house_positions(26)[0], Position::new(6, 6));
    }
}
