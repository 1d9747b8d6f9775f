//! Alternating inference chains for Sudoku candidate grids.
//!
//! ```no_run
//! use sudoku_chains::{AicSearcher, Grid};
//!
//! let grid = Grid::from_string(
//!     "530070000600195000098000060800060003400803001700020006060000280000419005000080079",
//! )
//! .unwrap();
//! for step in AicSearcher::new().search(&grid).unwrap() {
//!     println!("{}", step);
//! }
//! ```

mod bitset;
mod cellset;
pub mod chain;
mod error;
mod grid;

pub use bitset::BitSet;
pub use cellset::CellSet;
pub use chain::{
    AicSearcher, AlternatingInferenceChain, ChainStep, Conclusion, ConclusionKind,
    InferenceGraph, InferenceKind, Node, NodeArena, NodeId, NodeKind, NodeKinds, SearchConfig,
    SearchMode,
};
pub use error::{AicError, Result};
pub use grid::{house_name, Cell, Grid, Position};
