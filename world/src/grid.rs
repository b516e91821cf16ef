//! Static tile data and the legality queries built on top of it.

use glam::Vec2;
use maze_pursuit_core::{Axis, PelletKind, TileCoord};

use crate::LevelError;

/// Largest per-axis offset from a tile center that still counts as centered.
pub const CENTER_TOLERANCE: f32 = 1.0;

const WALL_VALUE: i32 = 1;
const REGULAR_PELLET_VALUE: i32 = 1;
const POWER_PELLET_VALUE: i32 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PelletCell {
    Absent,
    Uneaten(PelletKind),
    Eaten,
}

/// Tile layout of the maze: wall mask, pellet state, and tile geometry.
///
/// Tiles are indexed `column + row * columns`. The wall mask never changes
/// after construction; pellets only ever transition from uneaten to eaten.
#[derive(Clone, Debug)]
pub struct Grid {
    columns: u32,
    rows: u32,
    tile_size: f32,
    walls: Vec<bool>,
    pellets: Vec<PelletCell>,
}

impl Grid {
    /// Builds a grid from flat collision and pellet arrays.
    ///
    /// A collision value of `1` marks a wall; anything else is open floor.
    /// Pellet values are `0` (none), `1` (regular) or `2` (power).
    pub fn from_masks(
        columns: u32,
        rows: u32,
        tile_size: f32,
        walls: &[i32],
        pellets: &[i32],
    ) -> Result<Self, LevelError> {
        if columns == 0 || rows == 0 {
            return Err(LevelError::EmptyGrid { columns, rows });
        }
        if !tile_size.is_finite() || tile_size <= 0.0 {
            return Err(LevelError::InvalidTileSize(tile_size));
        }

        let expected = usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(usize::MAX);
        if walls.len() != expected {
            return Err(LevelError::MaskLength {
                mask: "wall",
                expected,
                actual: walls.len(),
            });
        }
        if pellets.len() != expected {
            return Err(LevelError::MaskLength {
                mask: "pellet",
                expected,
                actual: pellets.len(),
            });
        }

        let pellets = pellets
            .iter()
            .enumerate()
            .map(|(index, &value)| match value {
                0 => Ok(PelletCell::Absent),
                REGULAR_PELLET_VALUE => Ok(PelletCell::Uneaten(PelletKind::Regular)),
                POWER_PELLET_VALUE => Ok(PelletCell::Uneaten(PelletKind::Power)),
                other => Err(LevelError::UnknownPellet {
                    index,
                    value: other,
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            columns,
            rows,
            tile_size,
            walls: walls.iter().map(|&value| value == WALL_VALUE).collect(),
            pellets,
        })
    }

    /// Builds a wall-free, pellet-free grid.
    pub fn open(columns: u32, rows: u32, tile_size: f32) -> Result<Self, LevelError> {
        let count = usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(0);
        let empty = vec![0; count];
        Self::from_masks(columns, rows, tile_size, &empty, &empty)
    }

    /// Number of tile columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of tile rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Side length of a tile in world units.
    #[must_use]
    pub const fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Reports whether the tile lies inside the grid.
    #[must_use]
    pub fn contains(&self, tile: TileCoord) -> bool {
        self.index(tile).is_some()
    }

    /// Tile containing `point`. The result is not bounds-checked.
    #[must_use]
    pub fn tile_of(&self, point: Vec2) -> TileCoord {
        TileCoord::new(
            (point.x / self.tile_size).floor() as i32,
            (point.y / self.tile_size).floor() as i32,
        )
    }

    /// Reports whether the tile blocks movement. Off-grid tiles always do.
    #[must_use]
    pub fn is_wall(&self, tile: TileCoord) -> bool {
        self.index(tile)
            .map_or(true, |index| self.walls.get(index).copied().unwrap_or(true))
    }

    /// Center of the tile in world units.
    #[must_use]
    pub fn tile_center(&self, tile: TileCoord) -> Vec2 {
        let half = self.tile_size / 2.0;
        Vec2::new(
            tile.column() as f32 * self.tile_size + half,
            tile.row() as f32 * self.tile_size + half,
        )
    }

    /// Reports whether `point` sits on its tile's center along `axis`.
    #[must_use]
    pub fn is_tile_centered(&self, point: Vec2, axis: Axis) -> bool {
        let center = self.tile_center(self.tile_of(point));
        (axis.component(point) - axis.component(center)).abs() <= CENTER_TOLERANCE
    }

    /// Wraps the column of a tile that stepped one column past either side edge.
    ///
    /// Only the horizontal axis wraps; rows are returned untouched so that
    /// vertical steps off the grid stay off the grid (and therefore blocked).
    #[must_use]
    pub fn wrap_horizontal(&self, tile: TileCoord) -> TileCoord {
        let width = self.columns as i32;
        if tile.column() < 0 {
            TileCoord::new(width - 1, tile.row())
        } else if tile.column() >= width {
            TileCoord::new(0, tile.row())
        } else {
            tile
        }
    }

    /// Reports whether an uneaten pellet lies on the tile.
    #[must_use]
    pub fn has_pellet(&self, tile: TileCoord) -> bool {
        self.pellet_at(tile).is_some()
    }

    /// Kind of the uneaten pellet on the tile, if any.
    #[must_use]
    pub fn pellet_at(&self, tile: TileCoord) -> Option<PelletKind> {
        match self.index(tile).and_then(|index| self.pellets.get(index)) {
            Some(PelletCell::Uneaten(kind)) => Some(*kind),
            _ => None,
        }
    }

    /// Marks the pellet on the tile as eaten.
    ///
    /// Returns the pellet kind when this call consumed it; repeated calls and
    /// tiles without a pellet return `None` and leave the grid unchanged.
    pub fn eat_pellet(&mut self, tile: TileCoord) -> Option<PelletKind> {
        let index = self.index(tile)?;
        let slot = self.pellets.get_mut(index)?;
        match *slot {
            PelletCell::Uneaten(kind) => {
                *slot = PelletCell::Eaten;
                Some(kind)
            }
            PelletCell::Absent | PelletCell::Eaten => None,
        }
    }

    /// Number of pellets that have not been eaten yet.
    #[must_use]
    pub fn remaining_pellets(&self) -> usize {
        self.pellets
            .iter()
            .filter(|cell| matches!(cell, PelletCell::Uneaten(_)))
            .count()
    }

    fn index(&self, tile: TileCoord) -> Option<usize> {
        let column = u32::try_from(tile.column()).ok()?;
        let row = u32::try_from(tile.row()).ok()?;
        if column < self.columns && row < self.rows {
            let width = usize::try_from(self.columns).ok()?;
            Some(usize::try_from(row).ok()? * width + usize::try_from(column).ok()?)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn striped() -> Grid {
        // 3x2: wall in the middle column of the top row, power pellet bottom-left.
        Grid::from_masks(3, 2, 10.0, &[0, 1, 0, 0, 0, 0], &[1, 0, 1, 2, 0, 0])
            .expect("valid grid")
    }

    #[test]
    fn off_grid_tiles_are_walls_without_pellets() {
        let grid = striped();
        for tile in [
            TileCoord::new(-1, 0),
            TileCoord::new(3, 0),
            TileCoord::new(0, -1),
            TileCoord::new(0, 2),
            TileCoord::new(i32::MIN, i32::MAX),
        ] {
            assert!(grid.is_wall(tile), "{tile:?} should be a wall");
            assert!(!grid.has_pellet(tile), "{tile:?} should hold no pellet");
        }
    }

    #[test]
    fn wall_mask_only_honours_value_one() {
        let grid = Grid::from_masks(3, 1, 8.0, &[1, 2, 0], &[0, 0, 0]).expect("valid grid");
        assert!(grid.is_wall(TileCoord::new(0, 0)));
        assert!(!grid.is_wall(TileCoord::new(1, 0)));
        assert!(!grid.is_wall(TileCoord::new(2, 0)));
    }

    #[test]
    fn eat_pellet_is_idempotent() {
        let mut grid = striped();
        let tile = TileCoord::new(0, 1);
        assert_eq!(grid.pellet_at(tile), Some(PelletKind::Power));
        assert_eq!(grid.eat_pellet(tile), Some(PelletKind::Power));
        assert!(!grid.has_pellet(tile));
        let remaining = grid.remaining_pellets();
        assert_eq!(grid.eat_pellet(tile), None);
        assert!(!grid.has_pellet(tile));
        assert_eq!(grid.remaining_pellets(), remaining);
        assert_eq!(grid.eat_pellet(TileCoord::new(9, 9)), None);
        assert_eq!(grid.eat_pellet(TileCoord::new(1, 1)), None);
    }

    #[test]
    fn tile_of_floors_negative_coordinates() {
        let grid = striped();
        assert_eq!(grid.tile_of(Vec2::new(15.0, 5.0)), TileCoord::new(1, 0));
        assert_eq!(grid.tile_of(Vec2::new(-0.5, 19.9)), TileCoord::new(-1, 1));
    }

    #[test]
    fn tile_center_sits_half_a_tile_in() {
        let grid = striped();
        assert_eq!(grid.tile_center(TileCoord::new(2, 1)), Vec2::new(25.0, 15.0));
    }

    #[test]
    fn centering_tolerates_one_unit() {
        let grid = striped();
        assert!(grid.is_tile_centered(Vec2::new(16.0, 3.0), Axis::Horizontal));
        assert!(!grid.is_tile_centered(Vec2::new(16.5, 3.0), Axis::Horizontal));
        assert!(!grid.is_tile_centered(Vec2::new(16.0, 3.0), Axis::Vertical));
    }

    #[test]
    fn horizontal_wrap_leaves_rows_alone() {
        let grid = striped();
        assert_eq!(
            grid.wrap_horizontal(TileCoord::new(-1, 1)),
            TileCoord::new(2, 1)
        );
        assert_eq!(
            grid.wrap_horizontal(TileCoord::new(3, 0)),
            TileCoord::new(0, 0)
        );
        assert_eq!(
            grid.wrap_horizontal(TileCoord::new(1, -1)),
            TileCoord::new(1, -1)
        );
    }

    #[test]
    fn rejects_malformed_masks() {
        assert_eq!(
            Grid::from_masks(2, 2, 8.0, &[0; 3], &[0; 4]).err(),
            Some(LevelError::MaskLength {
                mask: "wall",
                expected: 4,
                actual: 3,
            })
        );
        assert_eq!(
            Grid::from_masks(1, 1, 8.0, &[0], &[7]).err(),
            Some(LevelError::UnknownPellet { index: 0, value: 7 })
        );
        assert!(matches!(
            Grid::open(0, 4, 8.0),
            Err(LevelError::EmptyGrid { .. })
        ));
        assert!(matches!(
            Grid::open(4, 4, 0.0),
            Err(LevelError::InvalidTileSize(_))
        ));
    }
}
