//! Alternating cycle search over an [`InferenceGraph`].
//!
//! Both strategies report closed id sequences `[seed, .., seed]` whose edges
//! alternate strictly, starting and ending with the same inference kind.
//! Weak-start cycles assume the seed true, strong-start cycles assume it false.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};

use super::arena::NodeId;
use super::graph::{InferenceGraph, InferenceKind};
use crate::error::{AicError, Result};

/// DFS checks the cancel flag every this many expansions.
const CANCEL_CHECK_INTERVAL: usize = 4096;

/// A closed alternating sequence of node ids, seed repeated at both ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawChain {
    pub ids: Vec<NodeId>,
    pub starts_with_weak: bool,
}

impl RawChain {
    pub fn first_kind(&self) -> InferenceKind {
        if self.starts_with_weak {
            InferenceKind::Weak
        } else {
            InferenceKind::Strong
        }
    }
}

fn check_cancel(cancel: Option<&AtomicBool>) -> Result<()> {
    match cancel {
        Some(flag) if flag.load(Ordering::Relaxed) => Err(AicError::Cancelled),
        _ => Ok(()),
    }
}

/// Seeds eligible for a search opening with `first`.
fn eligible_seed(graph: &InferenceGraph, seed: NodeId, first: InferenceKind) -> bool {
    match first {
        InferenceKind::Weak => !graph.node(seed).is_grouped() && !graph.weak(seed).is_empty(),
        InferenceKind::Strong => !graph.weak(seed).is_empty() && !graph.strong(seed).is_empty(),
    }
}

/// Interior nodes must be distinct and differ from the seed.
fn is_simple_cycle(ids: &[NodeId]) -> bool {
    if ids.len() < 4 || ids.first() != ids.last() {
        return false;
    }
    let mut interior: Vec<NodeId> = ids[..ids.len() - 1].to_vec();
    interior.sort_unstable();
    interior.windows(2).all(|w| w[0] != w[1])
}

// ==================== Breadth-first ====================

/// Parent tables reused across seeds.
struct BfsScratch {
    /// Parent of a node reached through a weak step (node now false)
    on_to_off: Vec<Option<NodeId>>,
    /// Parent of a node reached through a strong step (node now true)
    off_to_on: Vec<Option<NodeId>>,
    queue: VecDeque<(NodeId, InferenceKind)>,
}

impl BfsScratch {
    fn new(len: usize) -> Self {
        Self {
            on_to_off: vec![None; len],
            off_to_on: vec![None; len],
            queue: VecDeque::new(),
        }
    }

    fn reset(&mut self) {
        self.on_to_off.fill(None);
        self.off_to_on.fill(None);
        self.queue.clear();
    }

    /// Parent table for nodes entered through an edge of `kind`
    fn parents(&mut self, kind: InferenceKind) -> &mut Vec<Option<NodeId>> {
        match kind {
            InferenceKind::Weak => &mut self.on_to_off,
            InferenceKind::Strong => &mut self.off_to_on,
        }
    }
}

/// Shortest alternating cycle per seed and per opening kind.
pub fn search_bfs(graph: &InferenceGraph, cancel: Option<&AtomicBool>) -> Result<Vec<RawChain>> {
    let mut scratch = BfsScratch::new(graph.len());
    let mut found = Vec::new();

    for seed in 0..graph.len() {
        check_cancel(cancel)?;
        for first in [InferenceKind::Weak, InferenceKind::Strong] {
            if !eligible_seed(graph, seed, first) {
                continue;
            }
            scratch.reset();
            if let Some(ids) = bfs_from(graph, seed, first, &mut scratch) {
                found.push(RawChain {
                    ids,
                    starts_with_weak: first == InferenceKind::Weak,
                });
            }
        }
    }
    log::debug!("breadth-first search closed {} cycles", found.len());
    Ok(found)
}

fn bfs_from(
    graph: &InferenceGraph,
    seed: NodeId,
    first: InferenceKind,
    scratch: &mut BfsScratch,
) -> Option<Vec<NodeId>> {
    // The seed counts as entered through the opposite kind
    scratch.parents(first.opposite())[seed] = Some(seed);
    scratch.queue.push_back((seed, first));

    while let Some((current, kind)) = scratch.queue.pop_front() {
        for &next in graph.neighbors(current, kind) {
            if next == seed {
                if kind == first {
                    if let Some(ids) = reconstruct(seed, current, first, scratch) {
                        return Some(ids);
                    }
                }
                continue;
            }
            let parents = scratch.parents(kind);
            if parents[next].is_none() {
                parents[next] = Some(current);
                scratch.queue.push_back((next, kind.opposite()));
            }
        }
    }
    None
}

/// Walk parents from the closing node back to the seed.
fn reconstruct(
    seed: NodeId,
    closing: NodeId,
    first: InferenceKind,
    scratch: &mut BfsScratch,
) -> Option<Vec<NodeId>> {
    let mut ids = vec![seed, closing];
    let mut current = closing;
    // `closing` was entered through the kind opposite to the closing edge
    let mut entered = first.opposite();
    let bound = 2 * scratch.on_to_off.len() + 2;

    for _ in 0..bound {
        if current == seed && entered == first.opposite() {
            ids.reverse();
            return is_simple_cycle(&ids).then_some(ids);
        }
        let parent = scratch.parents(entered)[current]?;
        ids.push(parent);
        current = parent;
        entered = entered.opposite();
    }
    None
}

// ==================== Depth-first ====================

struct Frame {
    node: NodeId,
    next: usize,
    /// Kind of the edges leaving `node`
    kind: InferenceKind,
}

/// Every alternating cycle reachable from each seed.
///
/// `max_depth` bounds the number of nodes on the open path.
pub fn search_dfs(
    graph: &InferenceGraph,
    max_depth: Option<usize>,
    cancel: Option<&AtomicBool>,
) -> Result<Vec<RawChain>> {
    let mut on_path = vec![false; graph.len()];
    let mut found = Vec::new();
    let mut expansions = 0usize;

    for seed in 0..graph.len() {
        check_cancel(cancel)?;
        for first in [InferenceKind::Weak, InferenceKind::Strong] {
            if !eligible_seed(graph, seed, first) {
                continue;
            }
            let mut path = vec![seed];
            let mut stack = vec![Frame {
                node: seed,
                next: 0,
                kind: first,
            }];
            on_path[seed] = true;

            while let Some(top) = stack.last_mut() {
                let (node, kind) = (top.node, top.kind);
                let Some(&next) = graph.neighbors(node, kind).get(top.next) else {
                    stack.pop();
                    if let Some(done) = path.pop() {
                        on_path[done] = false;
                    }
                    continue;
                };
                top.next += 1;

                expansions += 1;
                if expansions % CANCEL_CHECK_INTERVAL == 0 {
                    check_cancel(cancel)?;
                }

                if next == seed {
                    if kind == first && path.len() >= 3 {
                        let mut ids = path.clone();
                        ids.push(seed);
                        found.push(RawChain {
                            ids,
                            starts_with_weak: first == InferenceKind::Weak,
                        });
                        // Closed: siblings of this node are not explored further
                        stack.pop();
                        if let Some(done) = path.pop() {
                            on_path[done] = false;
                        }
                    }
                    continue;
                }
                if on_path[next] || max_depth.is_some_and(|max| path.len() >= max) {
                    continue;
                }
                path.push(next);
                on_path[next] = true;
                stack.push(Frame {
                    node: next,
                    next: 0,
                    kind: kind.opposite(),
                });
            }
        }
    }
    log::debug!("depth-first search closed {} cycles", found.len());
    Ok(found)
}
