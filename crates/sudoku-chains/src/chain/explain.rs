//! Conclusions and reportable chain steps.
//!
//! The chain calculus yields `Conclusion`s; the searcher pairs them with the
//! chain that proved them as a `ChainStep`.

use std::fmt;

use serde::Serialize;

use super::aic::AlternatingInferenceChain;
use super::fabric::idx_to_pos;
use crate::grid::peers_of;
use crate::{Grid, Position};

/// Place a digit or remove a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ConclusionKind {
    Assignment,
    Elimination,
}

/// One `(kind, cell, digit)` deduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Conclusion {
    pub kind: ConclusionKind,
    /// Linear cell index 0..80
    pub cell: usize,
    pub digit: u8,
}

impl Conclusion {
    pub fn assignment(cell: usize, digit: u8) -> Self {
        Self {
            kind: ConclusionKind::Assignment,
            cell,
            digit,
        }
    }

    pub fn elimination(cell: usize, digit: u8) -> Self {
        Self {
            kind: ConclusionKind::Elimination,
            cell,
            digit,
        }
    }

    pub fn position(&self) -> Position {
        idx_to_pos(self.cell)
    }

    /// Apply to a grid. An assignment places the digit and strips it from
    /// the peers' candidates; other pencil marks are left alone.
    pub fn apply(&self, grid: &mut Grid) {
        let pos = self.position();
        match self.kind {
            ConclusionKind::Elimination => grid.cell_mut(pos).remove_candidate(self.digit),
            ConclusionKind::Assignment => {
                grid.set_cell_unchecked(pos, Some(self.digit));
                for peer in peers_of(pos) {
                    grid.cell_mut(peer).remove_candidate(self.digit);
                }
            }
        }
    }
}

impl fmt::Display for Conclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self.kind {
            ConclusionKind::Assignment => "=",
            ConclusionKind::Elimination => "<>",
        };
        write!(f, "{}{}{}", self.position(), op, self.digit)
    }
}

/// A deduplicated chain together with what it proves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainStep {
    /// Pattern name, e.g. `X-Chain` or `Continuous Nice Loop`
    pub technique: &'static str,
    pub conclusions: Vec<Conclusion>,
    pub chain: AlternatingInferenceChain,
}

impl ChainStep {
    pub fn eliminations(&self) -> impl Iterator<Item = &Conclusion> {
        self.conclusions
            .iter()
            .filter(|c| c.kind == ConclusionKind::Elimination)
    }

    pub fn assignments(&self) -> impl Iterator<Item = &Conclusion> {
        self.conclusions
            .iter()
            .filter(|c| c.kind == ConclusionKind::Assignment)
    }

    /// e.g. `Continuous Nice Loop: r1c2(5) == r1c2(2) -- ... => r1c8<>5, r1c8<>2`
    pub fn description(&self) -> String {
        let conclusions: Vec<String> = self.conclusions.iter().map(|c| c.to_string()).collect();
        format!(
            "{}: {} => {}",
            self.technique,
            self.chain,
            conclusions.join(", ")
        )
    }

    pub fn apply(&self, grid: &mut Grid) {
        for conclusion in &self.conclusions {
            conclusion.apply(grid);
        }
    }
}

impl fmt::Display for ChainStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}
