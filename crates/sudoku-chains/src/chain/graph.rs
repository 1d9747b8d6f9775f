//! Inference graph: strong and weak adjacency between node ids.
//!
//! Strong: "A false implies B true". Weak: "A true implies B false".
//! Every edge enters through [`InferenceGraph::add_edge`], so a node reached by
//! several discovery passes accumulates one neighbour list. Edges are directed;
//! reverse edges come from their own discovery, never from symmetrizing.

use serde::{Deserialize, Serialize};

use super::als::enumerate_als;
use super::arena::{NodeArena, NodeId};
use super::fabric::CandidateFabric;
use super::node::Node;
use super::types::SearchConfig;
use crate::error::Result;
use crate::CellSet;

/// Kind of a directed edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InferenceKind {
    Strong,
    Weak,
}

impl InferenceKind {
    pub fn opposite(self) -> Self {
        match self {
            InferenceKind::Strong => InferenceKind::Weak,
            InferenceKind::Weak => InferenceKind::Strong,
        }
    }

    /// Chain notation: `==` strong, `--` weak
    pub fn symbol(self) -> &'static str {
        match self {
            InferenceKind::Strong => "==",
            InferenceKind::Weak => "--",
        }
    }
}

/// Node arena plus the two adjacency tables, indexed by node id.
#[derive(Debug, Clone)]
pub struct InferenceGraph {
    arena: NodeArena,
    strong: Vec<Vec<NodeId>>,
    weak: Vec<Vec<NodeId>>,
}

impl InferenceGraph {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: NodeArena::with_capacity(capacity),
            strong: Vec::new(),
            weak: Vec::new(),
        }
    }

    /// Record `from -> to`, registering either node on first sight.
    pub fn add_edge(
        &mut self,
        from: Node,
        to: Node,
        kind: InferenceKind,
    ) -> Result<(NodeId, NodeId)> {
        let from_id = self.arena.get_or_create_id(from)?;
        let to_id = self.arena.get_or_create_id(to)?;
        if from_id != to_id {
            let table = self.table_mut(kind);
            if table.len() <= from_id {
                table.resize_with(from_id + 1, Vec::new);
            }
            table[from_id].push(to_id);
        }
        Ok((from_id, to_id))
    }

    fn table_mut(&mut self, kind: InferenceKind) -> &mut Vec<Vec<NodeId>> {
        match kind {
            InferenceKind::Strong => &mut self.strong,
            InferenceKind::Weak => &mut self.weak,
        }
    }

    /// Sort and deduplicate neighbour lists, then drop any id the arena never
    /// registered. Returns the number of pruned references.
    pub fn finish(&mut self) -> usize {
        let registered = self.arena.len();
        let mut pruned = 0;
        for table in [&mut self.strong, &mut self.weak] {
            if table.len() > registered {
                pruned += table[registered..].iter().map(Vec::len).sum::<usize>();
                table.truncate(registered);
            }
            table.resize_with(registered, Vec::new);
            for list in table.iter_mut() {
                let before = list.len();
                list.retain(|&id| id < registered);
                pruned += before - list.len();
                list.sort_unstable();
                list.dedup();
            }
        }
        pruned
    }

    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }

    pub fn node(&self, id: NodeId) -> &Node {
        self.arena.resolve(id)
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn neighbors(&self, id: NodeId, kind: InferenceKind) -> &[NodeId] {
        let table = match kind {
            InferenceKind::Strong => &self.strong,
            InferenceKind::Weak => &self.weak,
        };
        table.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn strong(&self, id: NodeId) -> &[NodeId] {
        self.neighbors(id, InferenceKind::Strong)
    }

    pub fn weak(&self, id: NodeId) -> &[NodeId] {
        self.neighbors(id, InferenceKind::Weak)
    }

    pub fn has_edge_ids(&self, from: NodeId, to: NodeId, kind: InferenceKind) -> bool {
        self.neighbors(from, kind).contains(&to)
    }

    /// Whether the graph records `from -> to` of the given kind
    pub fn has_edge(&self, from: &Node, to: &Node, kind: InferenceKind) -> bool {
        match (self.arena.id_of(from), self.arena.id_of(to)) {
            (Some(a), Some(b)) => self.has_edge_ids(a, b, kind),
            _ => false,
        }
    }

    pub fn edge_count(&self, kind: InferenceKind) -> usize {
        match kind {
            InferenceKind::Strong => self.strong.iter().map(Vec::len).sum(),
            InferenceKind::Weak => self.weak.iter().map(Vec::len).sum(),
        }
    }

    /// Check that consecutive ids follow recorded edges, alternating from the
    /// declared first inference.
    pub fn is_alternating(&self, ids: &[NodeId], starts_with_weak: bool) -> bool {
        let mut kind = if starts_with_weak {
            InferenceKind::Weak
        } else {
            InferenceKind::Strong
        };
        for pair in ids.windows(2) {
            if !self.has_edge_ids(pair[0], pair[1], kind) {
                return false;
            }
            kind = kind.opposite();
        }
        true
    }
}

/// Build the inference graph for one grid snapshot.
pub fn build_graph(fab: &CandidateFabric, config: &SearchConfig) -> Result<InferenceGraph> {
    let mut builder = GraphBuilder {
        fab,
        config,
        graph: InferenceGraph::with_capacity(config.max_capacity),
    };
    builder.gather_sole_cell()?;
    builder.gather_houses()?;
    builder.gather_almost_locked_sets()?;

    let mut graph = builder.graph;
    let pruned = graph.finish();
    log::debug!(
        "inference graph: {} nodes, {} strong, {} weak, {} pruned",
        graph.len(),
        graph.edge_count(InferenceKind::Strong),
        graph.edge_count(InferenceKind::Weak),
        pruned
    );
    Ok(graph)
}

struct GraphBuilder<'a> {
    fab: &'a CandidateFabric,
    config: &'a SearchConfig,
    graph: InferenceGraph,
}

impl GraphBuilder<'_> {
    /// Bi-value strong links and same-cell weak links.
    fn gather_sole_cell(&mut self) -> Result<()> {
        if !self.config.node_kinds.sole_cell {
            return Ok(());
        }
        for cell in self.fab.empty_cells() {
            let bivalue = self.fab.is_bivalue(cell);
            let digits: Vec<u8> = self.fab.cell_cands[cell].iter().collect();
            for (i, &d1) in digits.iter().enumerate() {
                for &d2 in &digits[i + 1..] {
                    let a = Node::sole(cell, d1);
                    let b = Node::sole(cell, d2);
                    if bivalue {
                        self.graph.add_edge(a, b, InferenceKind::Strong)?;
                        self.graph.add_edge(b, a, InferenceKind::Strong)?;
                    }
                    self.graph.add_edge(a, b, InferenceKind::Weak)?;
                    self.graph.add_edge(b, a, InferenceKind::Weak)?;
                }
            }
        }
        Ok(())
    }

    /// Same-digit links inside each sector, between sole candidates and
    /// locked-candidate groups.
    fn gather_houses(&mut self) -> Result<()> {
        let kinds = self.config.node_kinds;
        if !kinds.sole_digit && !kinds.locked_candidates {
            return Ok(());
        }
        for sector in 0..27 {
            for digit in 1..=9u8 {
                let cells = self.fab.sector_cells_with_candidate(sector, digit);
                if cells.len() < 2 {
                    continue;
                }
                let units = self.units_within(sector, cells);

                // Strong: a unit and the rest of the sector's cells for the digit
                for &a in &units {
                    let rest = cells - a;
                    if !self.is_node_shape(rest) || !self.pair_enabled(a, rest) {
                        continue;
                    }
                    self.graph.add_edge(
                        Node::locked(digit, a),
                        Node::locked(digit, rest),
                        InferenceKind::Strong,
                    )?;
                }

                // Weak: any two disjoint units of the same sector
                for &a in &units {
                    for &b in &units {
                        if a.intersects(&b) || !self.pair_enabled(a, b) {
                            continue;
                        }
                        self.graph.add_edge(
                            Node::locked(digit, a),
                            Node::locked(digit, b),
                            InferenceKind::Weak,
                        )?;
                    }
                }
            }
        }
        Ok(())
    }

    /// ALS digit nodes: strong links between the digits of one ALS, weak
    /// links to same-digit units sharing a sector with the digit's cells.
    fn gather_almost_locked_sets(&mut self) -> Result<()> {
        let kinds = self.config.node_kinds;
        if !kinds.almost_locked_sets {
            return Ok(());
        }
        let fab = self.fab;
        // Single-cell ALS are bivalue cells, already linked as sole candidates
        let all_als: Vec<_> = enumerate_als(fab, self.config.max_als_cells)
            .into_iter()
            .filter(|als| als.cells.len() >= 2)
            .collect();

        for als in &all_als {
            let digits: Vec<u8> = als.candidates.iter().collect();
            for &digit in &digits {
                let used = als.cells_with(fab, digit);
                let node = Node::almost_locked_set(digit, used, als.cells - used);

                for &other_digit in &digits {
                    if other_digit == digit {
                        continue;
                    }
                    let other_used = als.cells_with(fab, other_digit);
                    let other =
                        Node::almost_locked_set(other_digit, other_used, als.cells - other_used);
                    self.graph.add_edge(node, other, InferenceKind::Strong)?;
                }

                for sector in fab.covering_sectors(used) {
                    let rest = fab.sector_cells_with_candidate(sector, digit) - als.cells;
                    if rest.is_empty() {
                        continue;
                    }
                    if self.config.als_house_strong_links && self.is_node_shape(rest) {
                        let target = Node::locked(digit, rest);
                        self.graph.add_edge(node, target, InferenceKind::Strong)?;
                        self.graph.add_edge(target, node, InferenceKind::Strong)?;
                    }
                    for unit in self.units_within(sector, rest) {
                        let enabled = if unit.len() == 1 {
                            kinds.sole_digit
                        } else {
                            kinds.locked_candidates
                        };
                        if !enabled {
                            continue;
                        }
                        let target = Node::locked(digit, unit);
                        self.graph.add_edge(node, target, InferenceKind::Weak)?;
                        self.graph.add_edge(target, node, InferenceKind::Weak)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Every cell set within `cells` (all inside `sector`) that can stand as a
    /// node: each single cell, plus every 2-3 cell subset confined to one of
    /// the sector's line x box intersections when groups are enabled.
    fn units_within(&self, sector: usize, cells: CellSet) -> Vec<CellSet> {
        let mut units: Vec<CellSet> = cells.iter().map(CellSet::single).collect();
        if !self.config.node_kinds.locked_candidates {
            return units;
        }
        let sector_set = self.fab.sector_sets[sector];
        for inter in &self.fab.intersections {
            if !inter.cells.is_subset(&sector_set) {
                continue;
            }
            let segment = cells & inter.cells;
            for k in 2..=segment.len() {
                units.extend(segment.combinations(k));
            }
        }
        units
    }

    /// A single cell, or (with groups enabled) 2-3 cells in one intersection.
    fn is_node_shape(&self, cells: CellSet) -> bool {
        match cells.len() {
            1 => true,
            2 | 3 => {
                self.config.node_kinds.locked_candidates && self.fab.in_one_intersection(cells)
            }
            _ => false,
        }
    }

    fn pair_enabled(&self, a: CellSet, b: CellSet) -> bool {
        let kinds = self.config.node_kinds;
        if a.len() == 1 && b.len() == 1 {
            kinds.sole_digit
        } else {
            kinds.locked_candidates
        }
    }
}
