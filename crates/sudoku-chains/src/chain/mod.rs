//! Alternating inference chain searcher.
//!
//! One query runs bottom-up: candidate fabric, inference graph, cycle search,
//! then the chain calculus. Nothing survives between queries.

mod aic;
mod als;
mod arena;
mod explain;
pub mod fabric;
mod graph;
mod node;
mod search;
mod types;


use std::collections::HashSet;
use std::sync::atomic::AtomicBool;

use crate::error::{AicError, Result};
use crate::Grid;
use fabric::CandidateFabric;
use search::RawChain;

pub use aic::AlternatingInferenceChain;
pub use als::{enumerate_als, Als};
pub use arena::{NodeArena, NodeId};
pub use explain::{ChainStep, Conclusion, ConclusionKind};
pub use graph::{build_graph, InferenceGraph, InferenceKind};
pub use node::{Node, NodeKind};
pub use types::{NodeKinds, SearchConfig, SearchMode, DEFAULT_MAX_ALS_CELLS, DEFAULT_MAX_CAPACITY};

/// Searches a grid for alternating inference chains.
#[derive(Debug, Clone, Default)]
pub struct AicSearcher {
    config: SearchConfig,
}

impl AicSearcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SearchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// All deduplicated chain steps for `grid`, shortest chains first.
    pub fn search(&self, grid: &Grid) -> Result<Vec<ChainStep>> {
        self.run(grid, None)
    }

    /// Like [`search`](Self::search), checking `cancel` once per seed node.
    pub fn search_with_cancel(&self, grid: &Grid, cancel: &AtomicBool) -> Result<Vec<ChainStep>> {
        self.run(grid, Some(cancel))
    }

    /// Build only the inference graph for `grid`.
    pub fn graph(&self, grid: &Grid) -> Result<InferenceGraph> {
        check_grid(grid)?;
        build_graph(&CandidateFabric::from_grid(grid), &self.config)
    }

    fn run(&self, grid: &Grid, cancel: Option<&AtomicBool>) -> Result<Vec<ChainStep>> {
        check_grid(grid)?;
        let fab = CandidateFabric::from_grid(grid);
        let graph = build_graph(&fab, &self.config)?;

        let raw = match self.config.mode {
            SearchMode::BreadthFirst => search::search_bfs(&graph, cancel)?,
            SearchMode::DepthFirst => {
                search::search_dfs(&graph, self.config.max_dfs_depth, cancel)?
            }
        };
        let found = raw.len();
        let steps = collect_steps(&fab, &graph, raw)?;
        log::info!(
            "{} search: {} raw chains, {} steps kept",
            self.config.mode,
            found,
            steps.len()
        );
        Ok(steps)
    }
}

fn check_grid(grid: &Grid) -> Result<()> {
    grid.validate()?;
    if grid.is_complete() {
        return Err(AicError::AlreadySolved);
    }
    Ok(())
}

/// Resolve raw chains, drop the ones proving nothing or repeating an earlier
/// chain's endpoints, and order by length.
fn collect_steps(
    fab: &CandidateFabric,
    graph: &InferenceGraph,
    raw: Vec<RawChain>,
) -> Result<Vec<ChainStep>> {
    let mut seen = HashSet::new();
    let mut steps = Vec::new();

    for chain in raw {
        let chain = AlternatingInferenceChain::from_ids(graph, &chain.ids, chain.starts_with_weak)?;
        log::trace!("chain {}", chain);

        if seen.contains(&chain.redundancy_key()) {
            continue;
        }
        let conclusions = chain.conclusions(fab);
        if conclusions.is_empty() {
            continue;
        }
        seen.insert(chain.redundancy_key());
        steps.push(ChainStep {
            technique: chain.technique_name(fab),
            conclusions,
            chain,
        });
    }
    steps.sort_by_key(|step| step.chain.len());
    Ok(steps)
}
