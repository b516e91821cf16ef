//! Level description handed to the world at load time.

use maze_pursuit_core::{Archetype, TileCoord};
use thiserror::Error;

use crate::Grid;

const DEFAULT_SPEED: f32 = 5.0;

/// Reasons level data is rejected before a world is built.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum LevelError {
    /// The grid has no tiles.
    #[error("grid must have at least one column and one row, got {columns}x{rows}")]
    EmptyGrid {
        /// Requested column count.
        columns: u32,
        /// Requested row count.
        rows: u32,
    },
    /// The tile size is zero, negative, or not finite.
    #[error("tile size must be positive and finite, got {0}")]
    InvalidTileSize(f32),
    /// A mask does not cover the grid exactly.
    #[error("{mask} mask holds {actual} entries but the grid has {expected} tiles")]
    MaskLength {
        /// Which mask is malformed.
        mask: &'static str,
        /// Tile count of the grid.
        expected: usize,
        /// Entries supplied.
        actual: usize,
    },
    /// A pellet entry is neither 0, 1 nor 2.
    #[error("unknown pellet value {value} at tile index {index}")]
    UnknownPellet {
        /// Flat index of the offending entry.
        index: usize,
        /// Value found there.
        value: i32,
    },
    /// A named tile lies outside the grid.
    #[error("{what} tile ({column}, {row}) lies outside the grid")]
    OutOfBounds {
        /// What the tile is used for.
        what: &'static str,
        /// Column of the tile.
        column: i32,
        /// Row of the tile.
        row: i32,
    },
    /// A named tile is a wall.
    #[error("{what} tile ({column}, {row}) is a wall")]
    Walled {
        /// What the tile is used for.
        what: &'static str,
        /// Column of the tile.
        column: i32,
        /// Row of the tile.
        row: i32,
    },
    /// A layout row is wider or narrower than the first row.
    #[error("layout row {row} is {actual} tiles wide, expected {expected}")]
    RaggedLayout {
        /// Zero-based row index.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        actual: usize,
    },
    /// A layout contains a glyph with no meaning.
    #[error("unknown layout glyph {glyph:?} at ({column}, {row})")]
    UnknownGlyph {
        /// Offending character.
        glyph: char,
        /// Column of the glyph.
        column: i32,
        /// Row of the glyph.
        row: i32,
    },
    /// A layout does not contain exactly one agent spawn.
    #[error("layout must contain exactly one agent spawn, found {0}")]
    AgentSpawnCount(usize),
    /// A movement speed is zero, negative, or not finite.
    #[error("{what} speed must be positive and finite, got {value}")]
    InvalidSpeed {
        /// Whose speed is wrong.
        what: &'static str,
        /// Value supplied.
        value: f32,
    },
}

/// Region pursuers start in and must leave exactly once.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HomeArea {
    exit: TileCoord,
    boundary_row: i32,
}

impl HomeArea {
    /// Describes a home area left through `exit`.
    ///
    /// Rows strictly below `boundary_row` belong to the home area.
    #[must_use]
    pub const fn new(exit: TileCoord, boundary_row: i32) -> Self {
        Self { exit, boundary_row }
    }

    /// Tile pursuers aim for while leaving.
    #[must_use]
    pub const fn exit(&self) -> TileCoord {
        self.exit
    }

    /// Last row that counts as outside.
    #[must_use]
    pub const fn boundary_row(&self) -> i32 {
        self.boundary_row
    }

    /// Whether the tile is on the inside of the boundary row.
    #[must_use]
    pub const fn is_inside(&self, tile: TileCoord) -> bool {
        tile.row() > self.boundary_row
    }

    /// Whether the tile is the exit or the tile directly below it.
    #[must_use]
    pub const fn is_exit_approach(&self, tile: TileCoord) -> bool {
        tile.column() == self.exit.column()
            && (tile.row() == self.exit.row() || tile.row() == self.exit.row() + 1)
    }
}

/// Archetype and starting tile of one pursuer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PursuerSpawn {
    /// Behaviour profile.
    pub archetype: Archetype,
    /// Starting tile; the pursuer rests on its center.
    pub tile: TileCoord,
}

/// Everything the world needs to start a session.
#[derive(Clone, Debug)]
pub struct Level {
    grid: Grid,
    home: HomeArea,
    agent_spawn: TileCoord,
    pursuers: Vec<PursuerSpawn>,
    agent_speed: f32,
    pursuer_speed: f32,
}

impl Level {
    /// Starts a level description with no pursuers and default speeds.
    #[must_use]
    pub fn new(grid: Grid, home: HomeArea, agent_spawn: TileCoord) -> Self {
        Self {
            grid,
            home,
            agent_spawn,
            pursuers: Vec::new(),
            agent_speed: DEFAULT_SPEED,
            pursuer_speed: DEFAULT_SPEED,
        }
    }

    /// Adds a pursuer. Identifiers follow declaration order.
    #[must_use]
    pub fn with_pursuer(mut self, archetype: Archetype, tile: TileCoord) -> Self {
        self.pursuers.push(PursuerSpawn { archetype, tile });
        self
    }

    /// Overrides the per-tick speed of the agent and of every pursuer.
    #[must_use]
    pub fn with_speeds(mut self, agent_speed: f32, pursuer_speed: f32) -> Self {
        self.agent_speed = agent_speed;
        self.pursuer_speed = pursuer_speed;
        self
    }

    /// Tile layout.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Home area shared by all pursuers.
    #[must_use]
    pub const fn home(&self) -> HomeArea {
        self.home
    }

    /// Agent starting tile.
    #[must_use]
    pub const fn agent_spawn(&self) -> TileCoord {
        self.agent_spawn
    }

    /// Pursuer spawns in declaration order.
    #[must_use]
    pub fn pursuers(&self) -> &[PursuerSpawn] {
        &self.pursuers
    }

    /// Per-tick speed of the agent.
    #[must_use]
    pub const fn agent_speed(&self) -> f32 {
        self.agent_speed
    }

    /// Per-tick speed of every pursuer.
    #[must_use]
    pub const fn pursuer_speed(&self) -> f32 {
        self.pursuer_speed
    }

    /// Checks that every named tile is usable and both speeds are sane.
    pub fn validate(&self) -> Result<(), LevelError> {
        check_speed("agent", self.agent_speed)?;
        check_speed("pursuer", self.pursuer_speed)?;
        self.check_open_tile("agent spawn", self.agent_spawn)?;
        self.check_open_tile("home exit", self.home.exit())?;
        for spawn in &self.pursuers {
            self.check_open_tile(spawn.archetype.name(), spawn.tile)?;
        }
        Ok(())
    }

    pub(crate) fn into_parts(self) -> (Grid, HomeArea, TileCoord, Vec<PursuerSpawn>, f32, f32) {
        (
            self.grid,
            self.home,
            self.agent_spawn,
            self.pursuers,
            self.agent_speed,
            self.pursuer_speed,
        )
    }

    fn check_open_tile(&self, what: &'static str, tile: TileCoord) -> Result<(), LevelError> {
        if !self.grid.contains(tile) {
            return Err(LevelError::OutOfBounds {
                what,
                column: tile.column(),
                row: tile.row(),
            });
        }
        if self.grid.is_wall(tile) {
            return Err(LevelError::Walled {
                what,
                column: tile.column(),
                row: tile.row(),
            });
        }
        Ok(())
    }
}

fn check_speed(what: &'static str, value: f32) -> Result<(), LevelError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(LevelError::InvalidSpeed { what, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn home() -> HomeArea {
        HomeArea::new(TileCoord::new(2, 1), 1)
    }

    #[test]
    fn exit_approach_covers_exit_and_tile_below() {
        let home = home();
        assert!(home.is_exit_approach(TileCoord::new(2, 1)));
        assert!(home.is_exit_approach(TileCoord::new(2, 2)));
        assert!(!home.is_exit_approach(TileCoord::new(2, 0)));
        assert!(!home.is_exit_approach(TileCoord::new(1, 2)));
        assert!(home.is_inside(TileCoord::new(0, 2)));
        assert!(!home.is_inside(TileCoord::new(0, 1)));
    }

    #[test]
    fn rejects_walled_and_off_grid_spawns() {
        let grid = Grid::from_masks(3, 3, 8.0, &[0, 0, 0, 0, 1, 0, 0, 0, 0], &[0; 9])
            .expect("valid grid");
        let level = Level::new(grid.clone(), home(), TileCoord::new(1, 1));
        assert_eq!(
            level.validate(),
            Err(LevelError::Walled {
                what: "agent spawn",
                column: 1,
                row: 1,
            })
        );

        let level = Level::new(grid, HomeArea::new(TileCoord::new(1, 0), 0), TileCoord::new(0, 0))
            .with_pursuer(Archetype::Inky, TileCoord::new(5, 0));
        assert_eq!(
            level.validate(),
            Err(LevelError::OutOfBounds {
                what: "inky",
                column: 5,
                row: 0,
            })
        );
    }

    #[test]
    fn rejects_non_positive_speeds() {
        let grid = Grid::open(3, 3, 8.0).expect("valid grid");
        let level = Level::new(grid, home(), TileCoord::new(0, 0)).with_speeds(2.0, 0.0);
        assert!(matches!(
            level.validate(),
            Err(LevelError::InvalidSpeed { what: "pursuer", .. })
        ));
    }
}
