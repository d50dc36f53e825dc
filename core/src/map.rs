//! Map documents and the height grid they describe.
//!
//! A map document is `{mapName, mapDescription, mapWidth, cubeSize,
//! rows: [{row: [..]}]}`. The grid is square: `mapWidth` rows of
//! `mapWidth` heights, indexed `(x, z)` with `x` the row.
//!
//! Loading is lenient about short data: missing rows, null rows and
//! short rows are zero-filled rather than rejected. Legacy map files
//! rely on this.

use crate::{
    error::{BattleError, BattleResult},
    rng::TerrainRng,
};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::path::Path;

pub const DEFAULT_MAP_WIDTH: usize = 10;
pub const DEFAULT_CUBE_SIZE: f32 = 1.0;
pub const UNNAMED_MAP: &str = "Unnamed map";
pub const NO_DESCRIPTION: &str = "No description";

/// A map document as it appears on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapData {
    #[serde(default)]
    pub map_name:        Option<String>,
    #[serde(default)]
    pub map_description: Option<String>,
    #[serde(default)]
    pub map_width:       i32,
    #[serde(default)]
    pub cube_size:       f32,
    #[serde(default)]
    pub rows:            Option<Vec<MapRow>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapRow {
    #[serde(default)]
    pub row: Option<Vec<i32>>,
}

/// A square grid of integer heights.
#[derive(Debug, Clone, PartialEq)]
pub struct MapGrid {
    pub name:        String,
    pub description: String,
    pub cube_size:   f32,
    width:           usize,
    heights:         Vec<i32>,
}

impl MapGrid {
    /// A flat (all-zero) grid. Width is at least 1 so a saved grid always
    /// has a row to load back.
    pub fn new(name: impl Into<String>, width: usize, cube_size: f32) -> Self {
        let width = width.max(1);
        Self {
            name: name.into(),
            description: NO_DESCRIPTION.to_string(),
            cube_size,
            width,
            heights: vec![0; width * width],
        }
    }

    /// Build a grid from a parsed document.
    ///
    /// Fails only when `rows` is absent or empty. A non-positive width
    /// falls back to `default_width`; a non-positive cube size falls back
    /// to [`DEFAULT_CUBE_SIZE`].
    pub fn from_data(data: &MapData, default_width: usize) -> BattleResult<Self> {
        let rows = match data.rows.as_deref() {
            Some(rows) if !rows.is_empty() => rows,
            _ => return Err(BattleError::malformed("map document has no rows")),
        };

        let width = if data.map_width <= 0 {
            log::warn!(
                "map: invalid width {}, using default {default_width}",
                data.map_width
            );
            default_width.max(1)
        } else {
            data.map_width as usize
        };

        let cube_size = if data.cube_size <= 0.0 {
            log::warn!(
                "map: invalid cube size {}, using default {DEFAULT_CUBE_SIZE}",
                data.cube_size
            );
            DEFAULT_CUBE_SIZE
        } else {
            data.cube_size
        };

        if rows.len() < width {
            log::warn!("map: {} rows is fewer than width {width}, zero-filling", rows.len());
        }

        let mut grid = Self {
            name: data.map_name.clone().unwrap_or_else(|| UNNAMED_MAP.to_string()),
            description: data
                .map_description
                .clone()
                .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            cube_size,
            width,
            heights: vec![0; width * width],
        };

        for (x, map_row) in rows.iter().take(width).enumerate() {
            let Some(row) = map_row.row.as_deref() else {
                log::warn!("map: row {x} is null, zero-filling");
                continue;
            };
            for (z, &h) in row.iter().take(width).enumerate() {
                grid.heights[x * width + z] = h;
            }
        }

        log::info!("map: loaded '{}': {}", grid.name, grid.description);
        Ok(grid)
    }

    pub fn from_json(text: &str) -> BattleResult<Self> {
        let data: MapData = serde_json::from_str(text)
            .map_err(|e| BattleError::malformed(format!("map document: {e}")))?;
        Self::from_data(&data, DEFAULT_MAP_WIDTH)
    }

    pub fn load(path: impl AsRef<Path>) -> BattleResult<Self> {
        Self::load_with_width(path, DEFAULT_MAP_WIDTH)
    }

    /// Like [`MapGrid::load`], with a configured fallback width.
    pub fn load_with_width(path: impl AsRef<Path>, default_width: usize) -> BattleResult<Self> {
        let path = path.as_ref();
        log::debug!("map: loading {}", path.display());
        let text = std::fs::read_to_string(path)?;
        let data: MapData = serde_json::from_str(&text)
            .map_err(|e| BattleError::malformed(format!("map document {}: {e}", path.display())))?;
        Self::from_data(&data, default_width)
    }

    /// Fill a grid with deterministic heights drawn from `heights`.
    pub fn random(name: impl Into<String>, width: usize, seed: u64, heights: Range<i32>) -> Self {
        let mut rng = TerrainRng::new(seed);
        let mut grid = Self::new(name, width, DEFAULT_CUBE_SIZE);
        for h in grid.heights.iter_mut() {
            *h = rng.next_i32_in(heights.clone());
        }
        grid
    }

    pub fn to_data(&self) -> MapData {
        let rows = self
            .heights
            .chunks(self.width)
            .take(self.width)
            .map(|row| MapRow { row: Some(row.to_vec()) })
            .collect();
        MapData {
            map_name:        Some(self.name.clone()),
            map_description: Some(self.description.clone()),
            map_width:       self.width as i32,
            cube_size:       self.cube_size,
            rows:            Some(rows),
        }
    }

    pub fn to_json_pretty(&self) -> BattleResult<String> {
        Ok(serde_json::to_string_pretty(&self.to_data())?)
    }

    /// Write the grid as a map document, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> BattleResult<()> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, self.to_json_pretty()?)?;
        log::info!("map: saved '{}' to {}", self.name, path.display());
        Ok(())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Height at `(x, z)`; zero outside the grid.
    pub fn height(&self, x: usize, z: usize) -> i32 {
        if x < self.width && z < self.width {
            self.heights[x * self.width + z]
        } else {
            0
        }
    }

    pub fn set_height(&mut self, x: usize, z: usize, height: i32) -> BattleResult<()> {
        if x >= self.width || z >= self.width {
            return Err(BattleError::IndexOutOfRange {
                index: x.max(z),
                len:   self.width,
            });
        }
        self.heights[x * self.width + z] = height;
        Ok(())
    }

    /// Every cell as `(x, z, height)`, row by row.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, i32)> + '_ {
        let width = self.width;
        self.heights
            .iter()
            .enumerate()
            .map(move |(i, &h)| (i / width, i % width, h))
    }
}
