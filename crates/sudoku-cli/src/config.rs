//! Search configuration file lookup.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use sudoku_chains::SearchConfig;

/// `<config_dir>/sudoku-chains/config.json`
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("sudoku-chains").join("config.json"))
}

/// Explicit path must exist; the default location is optional.
pub fn load(explicit: Option<&Path>) -> anyhow::Result<SearchConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(SearchConfig::default()),
        },
    };
    let json = fs::read_to_string(&path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config = parse(&json).with_context(|| format!("parsing config {}", path.display()))?;
    log::info!("loaded config from {}", path.display());
    Ok(config)
}

pub fn parse(json: &str) -> anyhow::Result<SearchConfig> {
    Ok(serde_json::from_str(json)?)
}
