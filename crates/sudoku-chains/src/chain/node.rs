//! Nodes of the inference graph.
//!
//! A node is a proposition "digit d lies in this cell set". Three shapes exist;
//! equality and hashing are structural over the whole enum, so two nodes built
//! by different discovery passes compare equal whenever they describe the
//! same proposition.

use std::fmt;

use serde::Serialize;

use crate::CellSet;

/// Variant tag of a [`Node`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum NodeKind {
    SoleCandidate,
    LockedCandidates,
    AlmostLockedSet,
}

/// A logical proposition about candidate placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Node {
    /// `digit` is placed in `cell`.
    SoleCandidate { cell: usize, digit: u8 },
    /// `digit` is placed somewhere in `cells` (2-3 cells of one line x box intersection).
    LockedCandidates { digit: u8, cells: CellSet },
    /// `digit` occupies one of `cells` of an ALS; `others` are the ALS cells
    /// that do not hold the digit.
    AlmostLockedSet {
        digit: u8,
        cells: CellSet,
        others: CellSet,
    },
}

impl Node {
    pub fn sole(cell: usize, digit: u8) -> Self {
        debug_assert!(cell < 81 && (1..=9).contains(&digit));
        Node::SoleCandidate { cell, digit }
    }

    /// A group node; collapses to a sole candidate when `cells` has one member.
    pub fn locked(digit: u8, cells: CellSet) -> Self {
        debug_assert!(!cells.is_empty());
        match cells.single_cell() {
            Some(cell) => Node::sole(cell, digit),
            None => Node::LockedCandidates { digit, cells },
        }
    }

    pub fn almost_locked_set(digit: u8, cells: CellSet, others: CellSet) -> Self {
        debug_assert!(!cells.is_empty() && !cells.intersects(&others));
        Node::AlmostLockedSet {
            digit,
            cells,
            others,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::SoleCandidate { .. } => NodeKind::SoleCandidate,
            Node::LockedCandidates { .. } => NodeKind::LockedCandidates,
            Node::AlmostLockedSet { .. } => NodeKind::AlmostLockedSet,
        }
    }

    pub fn digit(&self) -> u8 {
        match *self {
            Node::SoleCandidate { digit, .. }
            | Node::LockedCandidates { digit, .. }
            | Node::AlmostLockedSet { digit, .. } => digit,
        }
    }

    /// Cells that may hold the digit when the node is true
    pub fn cells(&self) -> CellSet {
        match *self {
            Node::SoleCandidate { cell, .. } => CellSet::single(cell),
            Node::LockedCandidates { cells, .. } | Node::AlmostLockedSet { cells, .. } => cells,
        }
    }

    /// The single cell of a node that covers exactly one cell
    pub fn single_cell(&self) -> Option<usize> {
        self.cells().single_cell()
    }

    /// Grouped nodes never open a weak-start search.
    pub fn is_grouped(&self) -> bool {
        !matches!(self, Node::SoleCandidate { .. })
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::SoleCandidate { cell, digit } => {
                write!(f, "r{}c{}({})", cell / 9 + 1, cell % 9 + 1, digit)
            }
            Node::LockedCandidates { digit, cells } => write!(f, "{}({})", cells, digit),
            Node::AlmostLockedSet {
                digit,
                cells,
                others,
            } => write!(f, "{}({})[ALS {}]", cells, digit, *cells | *others),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_structural_equality() {
        let a = Node::locked(4, [0, 1].into_iter().collect());
        let b = Node::locked(4, [1, 0].into_iter().collect());
        assert_eq!(a, b);
        let set: HashSet<Node> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
        assert_ne!(a, Node::locked(5, [0, 1].into_iter().collect()));
    }

    #[test]
    fn test_locked_collapses_to_sole() {
        let node = Node::locked(7, CellSet::single(40));
        assert_eq!(node, Node::sole(40, 7));
        assert!(!node.is_grouped());
    }

    #[test]
    fn test_kind_and_grouping() {
        let als = Node::almost_locked_set(
            2,
            CellSet::single(3),
            CellSet::single(4),
        );
        assert_eq!(als.kind(), NodeKind::AlmostLockedSet);
        assert!(als.is_grouped());
        assert_eq!(als.digit(), 2);
        assert_eq!(als.cells(), CellSet::single(3));
        assert_ne!(als, Node::sole(3, 2));
    }

    #[test]
    fn test_display() {
        assert_eq!(Node::sole(0, 5).to_string(), "r1c1(5)");
        let group = Node::locked(3, [9, 10, 11].into_iter().collect());
        assert_eq!(group.to_string(), "r2c123(3)");
        let als = Node::almost_locked_set(1, CellSet::single(0), CellSet::single(1));
        assert_eq!(als.to_string(), "r1c1(1)[ALS r1c12]");
    }
}
