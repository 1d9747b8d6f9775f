mod config;
mod logger;

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use sudoku_chains::{AicSearcher, Grid, SearchConfig, SearchMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    /// Shortest cycle per seed
    Bfs,
    /// Every cycle (bounded by --max-depth)
    Dfs,
}

impl From<ModeArg> for SearchMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Bfs => SearchMode::BreadthFirst,
            ModeArg::Dfs => SearchMode::DepthFirst,
        }
    }
}

/// Search a Sudoku grid for alternating inference chains
#[derive(Parser, Debug)]
#[command(name = "aic", version)]
#[command(about = "Alternating inference chain search for Sudoku grids", long_about = None)]
struct Cli {
    /// 81-character puzzle, `0` or `.` for empty cells
    puzzle: Option<String>,

    /// Read 81 pencil-mark tokens from a file instead (`=d` placed, `127` candidates)
    #[arg(short, long, conflicts_with = "puzzle")]
    pencilmarks: Option<PathBuf>,

    /// Search strategy
    #[arg(short, long, value_enum)]
    mode: Option<ModeArg>,

    /// Disable locked-candidate group nodes
    #[arg(long)]
    no_groups: bool,

    /// Enable almost locked set nodes
    #[arg(long)]
    als: bool,

    /// Strongly link ALS digits to the rest of a shared house
    #[arg(long)]
    als_house_links: bool,

    /// Node limit per query
    #[arg(long)]
    capacity: Option<usize>,

    /// Longest open path explored by the depth-first search
    #[arg(long)]
    max_depth: Option<usize>,

    /// JSON config file (default: <config dir>/sudoku-chains/config.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the steps as JSON
    #[arg(long)]
    json: bool,

    /// Apply every step and print the resulting grid
    #[arg(long)]
    apply: bool,

    /// More output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn search_config(&self) -> anyhow::Result<SearchConfig> {
        let mut config = config::load(self.config.as_deref())?;
        if let Some(mode) = self.mode {
            config.mode = mode.into();
        }
        if self.no_groups {
            config.node_kinds.locked_candidates = false;
        }
        if self.als {
            config.node_kinds.almost_locked_sets = true;
        }
        if self.als_house_links {
            config.als_house_strong_links = true;
        }
        if let Some(capacity) = self.capacity {
            config.max_capacity = capacity;
        }
        if self.max_depth.is_some() {
            config.max_dfs_depth = self.max_depth;
        }
        Ok(config)
    }

    fn grid(&self) -> anyhow::Result<Grid> {
        if let Some(path) = &self.pencilmarks {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading pencil marks {}", path.display()))?;
            return Grid::from_pencilmarks(&text)
                .with_context(|| format!("parsing pencil marks {}", path.display()));
        }
        let Some(puzzle) = &self.puzzle else {
            bail!("no puzzle given (pass an 81-character string or --pencilmarks FILE)");
        };
        match Grid::from_string(puzzle.trim()) {
            Some(grid) => Ok(grid),
            None => bail!("puzzle must be 81 characters of 0-9 or '.'"),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logger::init(cli.verbose)?;

    let config = cli.search_config()?;
    let mut grid = cli.grid()?;
    log::debug!("config: {:?}", config);

    let steps = AicSearcher::with_config(config).search(&grid)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&steps)?);
    } else if steps.is_empty() {
        println!("no chains found");
    } else {
        for (i, step) in steps.iter().enumerate() {
            println!("{:>3}. {}", i + 1, step);
        }
    }

    if cli.apply {
        for step in &steps {
            step.apply(&mut grid);
        }
        println!("{}", grid);
    }
    Ok(())
}
