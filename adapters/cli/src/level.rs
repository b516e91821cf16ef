//! Level files: a TOML document holding an ASCII layout and tuning values.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use maze_pursuit_core::TileCoord;
use maze_pursuit_system_rules::RulesConfig;
use maze_pursuit_world::{parse_layout, HomeArea, Level};
use serde::Deserialize;

/// Level shipped with the binary.
pub(crate) const DEFAULT_LEVEL: &str = include_str!("../levels/default.toml");

const DEFAULT_TILE_SIZE: f32 = 16.0;
const DEFAULT_SPEED: f32 = 5.0;

/// Parsed contents of a level file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct LevelConfig {
    #[serde(default = "default_tile_size")]
    tile_size: f32,
    #[serde(default = "default_speed")]
    agent_speed: f32,
    #[serde(default = "default_speed")]
    pursuer_speed: f32,
    layout: Vec<String>,
    home: HomeConfig,
    #[serde(default)]
    rules: RulesConfig,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct HomeConfig {
    exit: [i32; 2],
    boundary_row: i32,
}

impl LevelConfig {
    /// Reads and parses a level file from disk.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read level file at {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("invalid level file {}", path.display()))
    }

    /// Parses level TOML.
    pub(crate) fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse level toml contents")
    }

    /// Turns the configuration into a level and the rules that go with it.
    pub(crate) fn build(self) -> Result<(Level, RulesConfig)> {
        let [column, row] = self.home.exit;
        let home = HomeArea::new(TileCoord::new(column, row), self.home.boundary_row);
        let level = parse_layout(self.layout.as_slice(), self.tile_size, home)
            .context("failed to build level from layout")?
            .with_speeds(self.agent_speed, self.pursuer_speed);
        level.validate().context("level failed validation")?;
        Ok((level, self.rules))
    }
}

fn default_tile_size() -> f32 {
    DEFAULT_TILE_SIZE
}

fn default_speed() -> f32 {
    DEFAULT_SPEED
}
