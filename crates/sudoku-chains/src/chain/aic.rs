//! Closed alternating chains and the conclusions they prove.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use super::arena::NodeId;
use super::explain::Conclusion;
use super::fabric::CandidateFabric;
use super::graph::{InferenceGraph, InferenceKind};
use super::node::Node;
use crate::error::{AicError, Result};
use crate::CellSet;

/// A closed alternating sequence of nodes, seed repeated at both ends.
///
/// Weak-start chains read `s -- r0 == r1 -- .. == rk -- s`; the real chain is
/// `r0 .. rk` and `s` only closes it. Strong-start chains read
/// `s == .. -- .. == s` and prove `s` itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlternatingInferenceChain {
    nodes: Vec<Node>,
    starts_with_weak: bool,
}

impl AlternatingInferenceChain {
    pub fn new(nodes: Vec<Node>, starts_with_weak: bool) -> Result<Self> {
        let edges = nodes.len().saturating_sub(1);
        if edges < 3 {
            return Err(AicError::ChainTooShort { edges });
        }
        if nodes.first() != nodes.last() {
            return Err(AicError::HeadTailMismatch);
        }
        let mut seen = BTreeSet::new();
        for node in &nodes[..edges] {
            if !seen.insert(node) {
                return Err(AicError::RepeatedNode {
                    node: node.to_string(),
                });
            }
        }
        Ok(Self {
            nodes,
            starts_with_weak,
        })
    }

    /// Resolve an id sequence against the graph's arena. Every step must
    /// follow a recorded edge of the expected kind.
    pub fn from_ids(
        graph: &InferenceGraph,
        ids: &[NodeId],
        starts_with_weak: bool,
    ) -> Result<Self> {
        if !graph.is_alternating(ids, starts_with_weak) {
            return Err(AicError::NotAlternating);
        }
        let nodes = ids
            .iter()
            .map(|&id| graph.arena().get(id).copied())
            .collect::<Option<Vec<_>>>()
            .ok_or(AicError::NotAlternating)?;
        Self::new(nodes, starts_with_weak)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn starts_with_weak(&self) -> bool {
        self.starts_with_weak
    }

    pub fn head(&self) -> &Node {
        &self.nodes[0]
    }

    /// Nodes carrying the logical claim (the closing pair dropped for
    /// weak-start chains).
    pub fn real_nodes(&self) -> &[Node] {
        if self.starts_with_weak {
            &self.nodes[1..self.nodes.len() - 1]
        } else {
            &self.nodes
        }
    }

    /// Number of real nodes
    pub fn len(&self) -> usize {
        self.real_nodes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.real_nodes().is_empty()
    }

    /// Kind of the edge leaving real node `i`; real chains open strong.
    fn real_kind(i: usize) -> InferenceKind {
        if i % 2 == 0 {
            InferenceKind::Strong
        } else {
            InferenceKind::Weak
        }
    }

    fn endpoints(&self) -> (&Node, &Node) {
        let real = self.real_nodes();
        (&real[0], &real[real.len() - 1])
    }

    /// Weak-start chain whose real endpoints are themselves weakly linked.
    pub fn is_continuous_nice_loop(&self, fab: &CandidateFabric) -> bool {
        if !self.starts_with_weak {
            return false;
        }
        let (first, last) = self.endpoints();
        weakly_linked(fab, first, last)
    }

    /// Chains sharing parity and an unordered pair of real endpoints prove
    /// the same thing.
    pub fn redundancy_key(&self) -> (bool, Node, Node) {
        let (a, b) = self.endpoints();
        let (lo, hi) = if a <= b { (*a, *b) } else { (*b, *a) };
        (self.starts_with_weak, lo, hi)
    }

    pub fn technique_name(&self, fab: &CandidateFabric) -> &'static str {
        let real = self.real_nodes();
        if !self.starts_with_weak {
            "Discontinuous Nice Loop"
        } else if self.is_continuous_nice_loop(fab) {
            "Continuous Nice Loop"
        } else if real.iter().all(|n| matches!(n, Node::SoleCandidate { .. }))
            && real.iter().all(|n| n.digit() == real[0].digit())
        {
            "X-Chain"
        } else if real.iter().any(|n| matches!(n, Node::AlmostLockedSet { .. })) {
            "ALS Chain"
        } else if real.iter().any(Node::is_grouped) {
            "Grouped AIC"
        } else {
            "Alternating Inference Chain"
        }
    }

    /// Assignments and eliminations against `fab`, sorted, each a live candidate.
    pub fn conclusions(&self, fab: &CandidateFabric) -> Vec<Conclusion> {
        let mut out = BTreeSet::new();
        if !self.starts_with_weak {
            self.head_conclusions(fab, &mut out);
        } else if self.is_continuous_nice_loop(fab) {
            self.loop_conclusions(fab, &mut out);
        } else {
            let (first, last) = self.endpoints();
            endpoint_conclusions(fab, first, last, &mut out);
        }
        out.into_iter().collect()
    }

    fn head_conclusions(&self, fab: &CandidateFabric, out: &mut BTreeSet<Conclusion>) {
        let head = self.head();
        let digit = head.digit();
        match head.single_cell() {
            Some(cell) => {
                if fab.values[cell].is_none() && fab.has_cand(cell, digit) {
                    out.insert(Conclusion::assignment(cell, digit));
                }
            }
            None => eliminate_from_peers(fab, head.cells(), digit, out),
        }
    }

    fn loop_conclusions(&self, fab: &CandidateFabric, out: &mut BTreeSet<Conclusion>) {
        let real = self.real_nodes();
        for i in 0..real.len() {
            if Self::real_kind(i) != InferenceKind::Weak {
                continue;
            }
            // The last weak link closes back onto real[0]
            let a = &real[i];
            let b = &real[(i + 1) % real.len()];
            if a.digit() == b.digit() {
                eliminate_from_peers(fab, a.cells() | b.cells(), a.digit(), out);
            } else if let (Some(ca), Some(cb)) = (a.single_cell(), b.single_cell()) {
                if ca == cb {
                    eliminate_other_digits(fab, ca, &[a.digit(), b.digit()], out);
                }
            }
        }
    }
}

/// Weak-link test for two nodes by shape alone.
fn weakly_linked(fab: &CandidateFabric, a: &Node, b: &Node) -> bool {
    if a.digit() == b.digit() {
        let (ca, cb) = (a.cells(), b.cells());
        !ca.intersects(&cb) && !fab.covering_sectors(ca | cb).is_empty()
    } else {
        matches!((a.single_cell(), b.single_cell()), (Some(x), Some(y)) if x == y)
    }
}

/// One of `first`/`last` is true.
fn endpoint_conclusions(
    fab: &CandidateFabric,
    first: &Node,
    last: &Node,
    out: &mut BTreeSet<Conclusion>,
) {
    let (d1, d2) = (first.digit(), last.digit());
    if d1 == d2 {
        eliminate_from_peers(fab, first.cells() | last.cells(), d1, out);
        return;
    }
    match (first.single_cell(), last.single_cell()) {
        (Some(c1), Some(c2)) if c1 == c2 => eliminate_other_digits(fab, c1, &[d1, d2], out),
        (Some(c1), Some(c2)) => {
            // c1 = d2 would leave first false, forcing d2 into c2 as well
            if fab.sees(c1, c2) {
                eliminate_one(fab, c1, d2, out);
                eliminate_one(fab, c2, d1, out);
            }
        }
        (Some(c1), None) => {
            if sees_all(fab, c1, last.cells()) {
                eliminate_one(fab, c1, d2, out);
            }
        }
        (None, Some(c2)) => {
            if sees_all(fab, c2, first.cells()) {
                eliminate_one(fab, c2, d1, out);
            }
        }
        (None, None) => {}
    }
}

fn sees_all(fab: &CandidateFabric, cell: usize, cells: CellSet) -> bool {
    cells.iter().all(|c| c != cell && fab.sees(cell, c))
}

fn eliminate_one(fab: &CandidateFabric, cell: usize, digit: u8, out: &mut BTreeSet<Conclusion>) {
    if fab.values[cell].is_none() && fab.has_cand(cell, digit) {
        out.insert(Conclusion::elimination(cell, digit));
    }
}

fn eliminate_from_peers(
    fab: &CandidateFabric,
    cells: CellSet,
    digit: u8,
    out: &mut BTreeSet<Conclusion>,
) {
    for cell in (fab.peer_intersection(cells) & fab.cells_with(digit)).iter() {
        eliminate_one(fab, cell, digit, out);
    }
}

fn eliminate_other_digits(
    fab: &CandidateFabric,
    cell: usize,
    keep: &[u8],
    out: &mut BTreeSet<Conclusion>,
) {
    for digit in fab.cell_cands[cell].iter() {
        if !keep.contains(&digit) {
            eliminate_one(fab, cell, digit, out);
        }
    }
}

impl fmt::Display for AlternatingInferenceChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let real = self.real_nodes();
        for (i, node) in real.iter().enumerate() {
            if i > 0 {
                write!(f, " {} ", Self::real_kind(i - 1).symbol())?;
            }
            write!(f, "{}", node)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::explain::ConclusionKind;
    use crate::{BitSet, Grid, Position};

    const SOLUTION: &str =
        "534678912672195348198342567859761423426853791713924856961537284287419635345286179";

    fn idx(row: usize, col: usize) -> usize {
        Position::new(row, col).index()
    }

    /// Solved grid with the listed cells reopened to the given candidates.
    fn reopened(cells: &[((usize, usize), &[u8])]) -> CandidateFabric {
        let mut grid = Grid::from_string(SOLUTION).unwrap();
        for &((r, c), digits) in cells {
            grid.set_candidates(Position::new(r, c), BitSet::from_slice(digits));
        }
        CandidateFabric::from_grid(&grid)
    }

    #[test]
    fn test_rejects_short_chain() {
        let a = Node::sole(0, 1);
        let b = Node::sole(1, 1);
        assert_eq!(
            AlternatingInferenceChain::new(vec![a, b, a], true),
            Err(AicError::ChainTooShort { edges: 2 })
        );
        assert_eq!(
            AlternatingInferenceChain::new(vec![], false),
            Err(AicError::ChainTooShort { edges: 0 })
        );
    }

    #[test]
    fn test_rejects_open_chain() {
        let nodes = vec![
            Node::sole(0, 1),
            Node::sole(1, 1),
            Node::sole(1, 2),
            Node::sole(2, 2),
        ];
        assert_eq!(
            AlternatingInferenceChain::new(nodes, false),
            Err(AicError::HeadTailMismatch)
        );
    }

    #[test]
    fn test_rejects_repeated_interior_node() {
        let a = Node::sole(0, 1);
        let b = Node::sole(1, 1);
        let c = Node::sole(1, 2);
        assert_eq!(
            AlternatingInferenceChain::new(vec![a, b, c, b, a], true),
            Err(AicError::RepeatedNode {
                node: "r1c2(1)".to_string()
            })
        );
        // The seed may only reappear as the closing node
        assert!(matches!(
            AlternatingInferenceChain::new(vec![a, b, a, c, a], false),
            Err(AicError::RepeatedNode { .. })
        ));
    }

    #[test]
    fn test_from_ids_requires_alternation() {
        let mut graph = InferenceGraph::with_capacity(8);
        let (a, b, c) = (Node::sole(0, 1), Node::sole(1, 1), Node::sole(2, 1));
        graph.add_edge(a, b, InferenceKind::Weak).unwrap();
        graph.add_edge(b, c, InferenceKind::Weak).unwrap();
        graph.add_edge(c, a, InferenceKind::Weak).unwrap();
        graph.finish();
        assert_eq!(
            AlternatingInferenceChain::from_ids(&graph, &[0, 1, 2, 0], true),
            Err(AicError::NotAlternating)
        );

        graph.add_edge(b, c, InferenceKind::Strong).unwrap();
        graph.finish();
        let chain = AlternatingInferenceChain::from_ids(&graph, &[0, 1, 2, 0], true).unwrap();
        assert_eq!(chain.real_nodes(), &[b, c]);
        // Ids the arena never issued
        assert_eq!(
            AlternatingInferenceChain::from_ids(&graph, &[7], true),
            Err(AicError::NotAlternating)
        );
    }

    #[test]
    fn test_strong_start_assigns_head() {
        // Single-cell head: the chain proves its assignment
        let fab = reopened(&[((0, 0), &[5, 3]), ((0, 1), &[3, 5])]);
        let head = Node::sole(idx(0, 0), 5);
        let chain = AlternatingInferenceChain::new(
            vec![head, Node::sole(idx(0, 0), 3), Node::sole(idx(0, 1), 3), head],
            false,
        )
        .unwrap();
        assert_eq!(chain.len(), 4);
        assert_eq!(
            chain.conclusions(&fab),
            vec![Conclusion::assignment(idx(0, 0), 5)]
        );
        assert_eq!(chain.technique_name(&fab), "Discontinuous Nice Loop");
    }

    #[test]
    fn test_same_digit_endpoints_eliminate_common_peers() {
        // Naked pair {2,5} in r1c1 and r1c9, seeded from r1c8
        let fab = reopened(&[((0, 0), &[2, 5]), ((0, 8), &[2, 5]), ((0, 7), &[1, 2, 5])]);
        let c = Node::sole(idx(0, 7), 5);
        let nodes = vec![
            c,
            Node::sole(idx(0, 0), 5),
            Node::sole(idx(0, 0), 2),
            Node::sole(idx(0, 8), 2),
            Node::sole(idx(0, 8), 5),
            c,
        ];
        let chain = AlternatingInferenceChain::new(nodes, true).unwrap();
        assert_eq!(chain.len(), 4);
        assert!(chain.is_continuous_nice_loop(&fab));
        let conclusions = chain.conclusions(&fab);
        assert!(conclusions.contains(&Conclusion::elimination(idx(0, 7), 5)));
        assert!(conclusions.contains(&Conclusion::elimination(idx(0, 7), 2)));
        assert!(conclusions
            .iter()
            .all(|c| c.kind == ConclusionKind::Elimination && c.cell == idx(0, 7)));
        assert_eq!(
            chain.to_string(),
            "r1c1(5) == r1c1(2) -- r1c9(2) == r1c9(5)"
        );
        assert_eq!(chain.technique_name(&fab), "Continuous Nice Loop");
    }

    #[test]
    fn test_different_digits_need_visibility() {
        // Endpoints r1c1(4) and r9c9(6) never see each other
        let fab = reopened(&[((0, 0), &[4, 6]), ((8, 8), &[6, 9])]);
        let s = Node::sole(idx(4, 4), 1);
        let nodes = vec![
            s,
            Node::sole(idx(0, 0), 4),
            Node::sole(idx(0, 0), 6),
            Node::sole(idx(8, 8), 6),
            s,
        ];
        let chain = AlternatingInferenceChain::new(nodes, true).unwrap();
        assert!(!chain.is_continuous_nice_loop(&fab));
        assert!(chain.conclusions(&fab).is_empty());
        assert_eq!(chain.technique_name(&fab), "Alternating Inference Chain");
    }

    #[test]
    fn test_redundancy_key_ignores_direction() {
        let s = Node::sole(40, 1);
        let a = Node::sole(0, 5);
        let b = Node::sole(1, 5);
        let forward =
            AlternatingInferenceChain::new(vec![s, a, Node::sole(0, 2), b, s], true).unwrap();
        let backward =
            AlternatingInferenceChain::new(vec![s, b, Node::sole(9, 2), a, s], true).unwrap();
        assert_eq!(forward.redundancy_key(), backward.redundancy_key());
        let strong =
            AlternatingInferenceChain::new(vec![a, Node::sole(0, 2), b, a], false).unwrap();
        assert_ne!(strong.redundancy_key(), forward.redundancy_key());
    }
}
