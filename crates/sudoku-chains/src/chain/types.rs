use serde::{Deserialize, Serialize};

/// Default ceiling on distinct nodes per query.
pub const DEFAULT_MAX_CAPACITY: usize = 3000;

/// Default largest almost-locked set gathered, in cells.
pub const DEFAULT_MAX_ALS_CELLS: usize = 5;

/// Which node kinds and link sources the graph builder may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeKinds {
    /// Same digit within a house (bi-location links)
    pub sole_digit: bool,
    /// Different digits within a cell (bi-value links)
    pub sole_cell: bool,
    /// Grouped nodes confined to a line x box intersection
    pub locked_candidates: bool,
    /// Almost locked set nodes
    pub almost_locked_sets: bool,
}

impl Default for NodeKinds {
    fn default() -> Self {
        Self {
            sole_digit: true,
            sole_cell: true,
            locked_candidates: true,
            almost_locked_sets: false,
        }
    }
}

impl NodeKinds {
    /// Only sole-candidate nodes
    pub const SOLE_ONLY: NodeKinds = NodeKinds {
        sole_digit: true,
        sole_cell: true,
        locked_candidates: false,
        almost_locked_sets: false,
    };

    pub const ALL: NodeKinds = NodeKinds {
        sole_digit: true,
        sole_cell: true,
        locked_candidates: true,
        almost_locked_sets: true,
    };
}

/// Traversal strategy for the chain search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchMode {
    /// Shortest alternating cycle per seed
    #[default]
    BreadthFirst,
    /// Every alternating cycle; exponential in the worst case
    DepthFirst,
}

impl std::fmt::Display for SearchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchMode::BreadthFirst => write!(f, "breadth-first"),
            SearchMode::DepthFirst => write!(f, "depth-first"),
        }
    }
}

/// Configuration for one [`AicSearcher`](super::AicSearcher).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub node_kinds: NodeKinds,
    pub mode: SearchMode,
    /// Maximum number of distinct nodes one query may register
    pub max_capacity: usize,
    /// Largest ALS (in cells) the gatherer enumerates
    pub max_als_cells: usize,
    /// Link an ALS digit node to the remaining cells of that digit in a
    /// shared house. Off by default.
    pub als_house_strong_links: bool,
    /// Upper bound on the DFS path length (None = unbounded)
    pub max_dfs_depth: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            node_kinds: NodeKinds::default(),
            mode: SearchMode::default(),
            max_capacity: DEFAULT_MAX_CAPACITY,
            max_als_cells: DEFAULT_MAX_ALS_CELLS,
            als_house_strong_links: false,
            max_dfs_depth: None,
        }
    }
}

impl SearchConfig {
    pub fn with_node_kinds(mut self, node_kinds: NodeKinds) -> Self {
        self.node_kinds = node_kinds;
        self
    }

    pub fn with_mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_node_kinds() {
        let config = SearchConfig::default();
        assert!(config.node_kinds.sole_digit);
        assert!(config.node_kinds.locked_candidates);
        assert!(!config.node_kinds.almost_locked_sets);
        assert_eq!(config.mode, SearchMode::BreadthFirst);
        assert_eq!(config.max_capacity, DEFAULT_MAX_CAPACITY);
    }

    #[test]
    fn test_config_partial_json() {
        let json = r#"{"mode":"depth-first","node_kinds":{"locked_candidates":false}}"#;
        let config: SearchConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.mode, SearchMode::DepthFirst);
        assert!(!config.node_kinds.locked_candidates);
        assert!(config.node_kinds.sole_cell);
        assert_eq!(config.max_als_cells, DEFAULT_MAX_ALS_CELLS);

        let json = serde_json::to_string(&config).unwrap();
        let back: SearchConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
