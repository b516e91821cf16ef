//! Legality checks for committing to a move.
//!
//! Both functions are side-effect free and may be called speculatively for
//! every candidate direction before one is committed.

use glam::Vec2;
use maze_pursuit_core::{Direction, TileCoord};

use crate::Grid;

/// Tile reached by stepping once from `from` in `direction`.
///
/// Stepping past the left or right edge wraps to the opposite column.
/// Vertical steps never wrap, so leaving through the top or bottom lands off
/// the grid, which [`Grid::is_wall`] reports as blocked.
#[must_use]
pub fn destination(grid: &Grid, from: TileCoord, direction: Direction) -> TileCoord {
    grid.wrap_horizontal(from.step(direction))
}

/// Reports whether an entity at `position` may commit to `direction` now.
///
/// The entity must be centered on the axis perpendicular to the move so that
/// turns never start mid-slide, and the destination tile must not be a wall.
#[must_use]
pub fn can_commit(grid: &Grid, position: Vec2, direction: Direction) -> bool {
    if !grid.is_tile_centered(position, direction.axis().perpendicular()) {
        return false;
    }
    let from = grid.tile_of(position);
    !grid.is_wall(destination(grid, from, direction))
}

#[cfg(test)]
mod tests {
    use super::*;

    // 4x3, walls around (1,1) on its left side only.
    //   . . . .
    //   # . . .
    //   . . . .
    fn grid() -> Grid {
        Grid::from_masks(
            4,
            3,
            16.0,
            &[0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0],
            &[0; 12],
        )
        .expect("valid grid")
    }

    #[test]
    fn walls_block_commits() {
        let grid = grid();
        let center = grid.tile_center(TileCoord::new(1, 1));
        assert!(!can_commit(&grid, center, Direction::Left));
        assert!(can_commit(&grid, center, Direction::Right));
        assert!(can_commit(&grid, center, Direction::Up));
        assert!(can_commit(&grid, center, Direction::Down));
    }

    #[test]
    fn perpendicular_turns_need_centering() {
        let grid = grid();
        let sliding = grid.tile_center(TileCoord::new(2, 1)) + Vec2::new(4.0, 0.0);
        assert!(!can_commit(&grid, sliding, Direction::Up));
        assert!(!can_commit(&grid, sliding, Direction::Down));
        assert!(can_commit(&grid, sliding, Direction::Right));
        assert!(can_commit(&grid, sliding, Direction::Left));
    }

    #[test]
    fn side_edges_wrap_but_top_and_bottom_do_not() {
        let grid = grid();
        let top_left = grid.tile_center(TileCoord::new(0, 0));
        assert_eq!(
            destination(&grid, TileCoord::new(0, 0), Direction::Left),
            TileCoord::new(3, 0)
        );
        assert!(can_commit(&grid, top_left, Direction::Left));
        assert_eq!(
            destination(&grid, TileCoord::new(0, 0), Direction::Up),
            TileCoord::new(0, -1)
        );
        assert!(!can_commit(&grid, top_left, Direction::Up));

        let bottom_right = grid.tile_center(TileCoord::new(3, 2));
        assert!(can_commit(&grid, bottom_right, Direction::Right));
        assert!(!can_commit(&grid, bottom_right, Direction::Down));
    }
}
