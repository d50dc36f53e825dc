use crate::{
    clock::DEFAULT_ROUND_INTERVAL,
    map::DEFAULT_MAP_WIDTH,
    model::{SoldierCatalog, SoldierConfig},
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Delay between rounds while auto-playing.
    pub round_interval_ms: u64,
    /// Width used when a map document declares a non-positive width.
    #[serde(default = "default_map_width")]
    pub default_map_width: usize,
}

fn default_map_width() -> usize {
    DEFAULT_MAP_WIDTH
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            round_interval_ms: DEFAULT_ROUND_INTERVAL.as_millis() as u64,
            default_map_width: DEFAULT_MAP_WIDTH,
        }
    }
}

impl PlaybackConfig {
    pub fn round_interval(&self) -> Duration {
        Duration::from_millis(self.round_interval_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
struct SoldierCatalogFile {
    soldiers: Vec<SoldierConfig>,
}

#[derive(Debug, Clone)]
pub struct ReplayConfig {
    pub playback: PlaybackConfig,
    pub catalog:  SoldierCatalog,
}

impl ReplayConfig {
    /// Load from the data/ directory.
    /// In tests, use ReplayConfig::default_test().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let playback_path = format!("{data_dir}/playback.json");
        let playback_content = std::fs::read_to_string(&playback_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {playback_path}: {e}"))?;
        let playback: PlaybackConfig = serde_json::from_str(&playback_content)?;

        let catalog_path = format!("{data_dir}/soldiers/soldier_catalog.json");
        let catalog_content = std::fs::read_to_string(&catalog_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {catalog_path}: {e}"))?;
        let catalog_file: SoldierCatalogFile = serde_json::from_str(&catalog_content)?;
        let catalog = SoldierCatalog::from_configs(catalog_file.soldiers);

        log::debug!(
            "config: {} soldier types, round interval {}ms",
            catalog.len(),
            playback.round_interval_ms
        );
        Ok(Self { playback, catalog })
    }

    /// Config with hardcoded defaults for use in unit tests.
    pub fn default_test() -> Self {
        let catalog = SoldierCatalog::from_configs(
            ["knight", "archer", "mage"].map(|t| SoldierConfig {
                soldier_type: t.into(),
                prefab:       format!("prefabs/{t}"),
            }),
        );
        Self {
            playback: PlaybackConfig::default(),
            catalog,
        }
    }
}
