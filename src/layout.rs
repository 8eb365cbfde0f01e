//! Discovery of tiles in a time-series folder.
//!
//! A time-series folder holds one directory per tile. Each tile directory
//! has a `dates.csv` date list and one or more `tile*` sub-tile directories,
//! each with a `stack.vrt` (or `stack.tif`) whose band descriptions are the
//! acquisition dates.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

/// Name of the per-tile date list.
pub const DATES_FILE: &str = "dates.csv";

/// Stack file names tried in each sub-tile directory, in order.
pub const STACK_FILES: &[&str] = &["stack.vrt", "stack.tif"];

/// One sub-tile stack to process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubTile {
    /// Tile directory name.
    pub tile: String,
    /// Sub-tile directory name.
    pub subtile: String,
    /// Stack raster.
    pub stack: PathBuf,
    /// Date list shared by every sub-tile of the tile.
    pub dates: PathBuf,
}

impl SubTile {
    /// Output path `<dir>/<tile>_<subtile>.tif`.
    pub fn output_path(&self, dir: &Path) -> PathBuf {
        dir.join(format!("{}_{}.tif", self.tile, self.subtile))
    }
}

/// Lists tile directories (those containing a date list), sorted by name.
pub fn list_tiles(folder: &Path) -> Result<Vec<String>> {
    let mut tiles = Vec::new();
    for entry in sorted_entries(folder)? {
        if entry.is_dir() && entry.join(DATES_FILE).is_file() {
            if let Some(name) = entry.file_name().and_then(|n| n.to_str()) {
                tiles.push(name.to_string());
            }
        }
    }
    Ok(tiles)
}

/// Finds every sub-tile stack of the selected `tiles` (all tiles if
/// `None`), in tile then sub-tile order.
pub fn discover(folder: &Path, tiles: Option<&[String]>) -> Result<Vec<SubTile>> {
    let selected = match tiles {
        Some(t) => t.to_vec(),
        None => list_tiles(folder)?,
    };
    if selected.is_empty() {
        bail!("no tiles found in {}", folder.display());
    }

    let mut subtiles = Vec::new();
    for tile in &selected {
        let tile_dir = folder.join(tile);
        let dates = tile_dir.join(DATES_FILE);
        if !dates.is_file() {
            bail!("tile {tile}: missing date list {}", dates.display());
        }
        let before = subtiles.len();
        for sub_dir in sorted_entries(&tile_dir)? {
            let Some(subtile) = sub_dir.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !sub_dir.is_dir() || !subtile.starts_with("tile") {
                continue;
            }
            if let Some(stack) = find_stack(&sub_dir) {
                subtiles.push(SubTile {
                    tile: tile.clone(),
                    subtile: subtile.to_string(),
                    stack,
                    dates: dates.clone(),
                });
            }
        }
        if subtiles.len() == before {
            bail!("tile {tile}: no sub-tile stack in {}", tile_dir.display());
        }
    }
    Ok(subtiles)
}

fn find_stack(dir: &Path) -> Option<PathBuf> {
    STACK_FILES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = fs::read_dir(dir)
        .with_context(|| format!("failed to list {}", dir.display()))?
        .map(|e| e.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()
        .with_context(|| format!("failed to list {}", dir.display()))?;
    entries.sort();
    Ok(entries)
}
