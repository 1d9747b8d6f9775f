//! Run the chain searcher on a classic puzzle and apply what it finds.
//!
//! `cargo run -p sudoku-chains --example basic`

use sudoku_chains::{AicSearcher, Grid, NodeKinds, SearchConfig};

fn main() -> sudoku_chains::Result<()> {
    let puzzle =
        "530070000600195000098000060800060003400803001700020006060000280000419005000080079";
    let Some(mut grid) = Grid::from_string(puzzle) else {
        eprintln!("bad puzzle string");
        return Ok(());
    };

    let config = SearchConfig::default().with_node_kinds(NodeKinds::ALL);
    let searcher = AicSearcher::with_config(config);
    let steps = searcher.search(&grid)?;

    println!("{} chain steps", steps.len());
    for step in steps.iter().take(10) {
        println!("  {}", step);
    }

    for step in &steps {
        step.apply(&mut grid);
    }
    println!("\n{}", grid);
    Ok(())
}
