//! Closed-form target tiles for each archetype and regime.

use maze_pursuit_core::{Archetype, Direction, Mode, PursuerSnapshot, TileCoord};

const PINKY_LOOK_AHEAD: u32 = 4;
const INKY_LOOK_AHEAD: u32 = 2;

/// Targeting regime in effect for a single decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Regime {
    /// Head for the archetype's home corner.
    Scatter,
    /// Hunt the agent using the archetype's rule.
    Chase,
    /// Run for the corner opposite the agent.
    Flee,
}

impl Regime {
    /// Regime implied by a pursuer's mode and vulnerability.
    #[must_use]
    pub const fn of(pursuer: &PursuerSnapshot) -> Self {
        if pursuer.vulnerable {
            return Self::Flee;
        }
        match pursuer.mode {
            Mode::Scatter => Self::Scatter,
            Mode::Chase => Self::Chase,
        }
    }
}

/// What a pursuer knows about the agent and the grid when choosing a target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TargetContext {
    /// Tile the agent currently occupies.
    pub agent_tile: TileCoord,
    /// Agent's last committed direction of travel.
    pub agent_heading: Option<Direction>,
    /// Grid width in tiles.
    pub columns: i32,
    /// Grid height in tiles.
    pub rows: i32,
}

/// Target tile of an archetype under a regime.
#[must_use]
pub fn target_tile_for(archetype: Archetype, regime: Regime, context: &TargetContext) -> TileCoord {
    match regime {
        Regime::Flee => flee_corner(context),
        Regime::Scatter => scatter_corner(archetype, context),
        Regime::Chase => match archetype {
            Archetype::Blinky | Archetype::Clyde => context.agent_tile,
            Archetype::Pinky => look_ahead(context, PINKY_LOOK_AHEAD),
            Archetype::Inky => look_ahead(context, INKY_LOOK_AHEAD),
        },
    }
}

// Per axis, the far edge from the agent. Not a true farthest-tile search.
fn flee_corner(context: &TargetContext) -> TileCoord {
    let column = if context.agent_tile.column() < context.columns / 2 {
        context.columns - 1
    } else {
        0
    };
    let row = if context.agent_tile.row() < context.rows / 2 {
        context.rows - 1
    } else {
        0
    };
    TileCoord::new(column, row)
}

fn scatter_corner(archetype: Archetype, context: &TargetContext) -> TileCoord {
    let right = context.columns - 1;
    let bottom = context.rows - 1;
    match archetype {
        Archetype::Blinky => TileCoord::new(right, 0),
        Archetype::Pinky => TileCoord::new(0, 0),
        Archetype::Inky => TileCoord::new(right, bottom),
        Archetype::Clyde => TileCoord::new(0, bottom),
    }
}

// Unlike movement, the look-ahead wraps on both axes.
fn look_ahead(context: &TargetContext, steps: u32) -> TileCoord {
    let Some(heading) = context.agent_heading else {
        return context.agent_tile;
    };

    let mut tile = context.agent_tile;
    for _ in 0..steps {
        let next = tile.step(heading);
        tile = TileCoord::new(
            wrap(next.column(), context.columns),
            wrap(next.row(), context.rows),
        );
    }
    tile
}

fn wrap(value: i32, size: i32) -> i32 {
    if value < 0 {
        size - 1
    } else if value >= size {
        0
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(column: i32, row: i32, heading: Option<Direction>) -> TargetContext {
        TargetContext {
            agent_tile: TileCoord::new(column, row),
            agent_heading: heading,
            columns: 10,
            rows: 10,
        }
    }

    #[test]
    fn direct_chasers_target_the_agent_tile() {
        let context = context(5, 5, Some(Direction::Right));
        for archetype in [Archetype::Blinky, Archetype::Clyde] {
            assert_eq!(
                target_tile_for(archetype, Regime::Chase, &context),
                TileCoord::new(5, 5)
            );
        }
    }

    #[test]
    fn pinky_looks_four_tiles_ahead() {
        let context = context(5, 5, Some(Direction::Up));
        assert_eq!(
            target_tile_for(Archetype::Pinky, Regime::Chase, &context),
            TileCoord::new(5, 1)
        );
    }

    #[test]
    fn inky_looks_two_tiles_ahead() {
        let context = context(5, 5, Some(Direction::Left));
        assert_eq!(
            target_tile_for(Archetype::Inky, Regime::Chase, &context),
            TileCoord::new(3, 5)
        );
    }

    #[test]
    fn look_ahead_wraps_per_step_on_both_axes() {
        let up = context(5, 1, Some(Direction::Up));
        assert_eq!(
            target_tile_for(Archetype::Pinky, Regime::Chase, &up),
            TileCoord::new(5, 7)
        );
        let right = context(9, 3, Some(Direction::Right));
        assert_eq!(
            target_tile_for(Archetype::Inky, Regime::Chase, &right),
            TileCoord::new(1, 3)
        );
    }

    #[test]
    fn look_ahead_without_heading_stays_on_agent() {
        let context = context(4, 6, None);
        assert_eq!(
            target_tile_for(Archetype::Pinky, Regime::Chase, &context),
            TileCoord::new(4, 6)
        );
    }

    #[test]
    fn flee_targets_opposite_corner_per_axis() {
        let near_origin = context(2, 2, None);
        let far_corner = context(7, 7, None);
        let mixed = context(5, 4, None);
        for archetype in [Archetype::Blinky, Archetype::Inky] {
            assert_eq!(
                target_tile_for(archetype, Regime::Flee, &near_origin),
                TileCoord::new(9, 9)
            );
            assert_eq!(
                target_tile_for(archetype, Regime::Flee, &far_corner),
                TileCoord::new(0, 0)
            );
            assert_eq!(
                target_tile_for(archetype, Regime::Flee, &mixed),
                TileCoord::new(0, 9)
            );
        }
    }

    #[test]
    fn scatter_corners_are_distinct() {
        let context = context(5, 5, None);
        let corners: Vec<TileCoord> = [
            Archetype::Blinky,
            Archetype::Pinky,
            Archetype::Inky,
            Archetype::Clyde,
        ]
        .into_iter()
        .map(|archetype| target_tile_for(archetype, Regime::Scatter, &context))
        .collect();
        assert_eq!(
            corners,
            vec![
                TileCoord::new(9, 0),
                TileCoord::new(0, 0),
                TileCoord::new(9, 9),
                TileCoord::new(0, 9),
            ]
        );
    }
}
