#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic pursuer decision system that proposes one move per idle pursuer.
//!
//! Every decision runs the same ordered checks: home-area guards pick the
//! exit as target, otherwise [`targeting::target_tile_for`] does. The target
//! is turned into a ranked list of directions, the ranking is filtered by the
//! exit-tile and reversal rules, and the first direction the movement gate
//! accepts becomes a [`Command::CommitPursuerMove`].

pub mod targeting;

use log::trace;
use maze_pursuit_core::{
    AgentSnapshot, Command, Direction, Event, PursuerId, PursuerSnapshot, PursuerView, TileCoord,
};
use maze_pursuit_world::{gate, Grid, HomeArea};

use crate::targeting::{target_tile_for, Regime, TargetContext};

/// Ranking forced on the exit tile and the tile below it to stop pursuers
/// circling around the exit.
pub const EXIT_ESCAPE_ORDER: [Direction; 4] = [
    Direction::Up,
    Direction::Left,
    Direction::Right,
    Direction::Down,
];

/// Pure system that reacts to world events and emits pursuer commands.
#[derive(Debug, Default)]
pub struct Pursuit {
    stalls: Vec<Stall>,
}

impl Pursuit {
    /// Consumes world events and immutable views to emit pursuer commands.
    ///
    /// Decisions are only made on batches that advanced time. Every pursuer
    /// decides from the same snapshot; the emitted commands are meant to be
    /// applied after this call returns.
    pub fn handle(
        &mut self,
        events: &[Event],
        pursuers: &PursuerView,
        agent: &AgentSnapshot,
        grid: &Grid,
        home: HomeArea,
        out: &mut Vec<Command>,
    ) {
        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }

        let context = DecisionContext { grid, home, agent };
        for pursuer in pursuers.iter() {
            if pursuer.is_moving {
                continue;
            }

            let decision = decide(pursuer, &context);
            if decision.exits_home {
                out.push(Command::MarkPursuerExitedHome {
                    pursuer: pursuer.id,
                });
            }

            match decision.direction {
                Some(direction) => {
                    self.stall_mut(pursuer.id).ticks = 0;
                    out.push(Command::CommitPursuerMove {
                        pursuer: pursuer.id,
                        direction,
                    });
                }
                None => {
                    let stall = self.stall_mut(pursuer.id);
                    stall.ticks = stall.ticks.saturating_add(1);
                    trace!(
                        "pursuer {} has no legal move toward {:?} (stalled {} ticks)",
                        pursuer.id.get(),
                        decision.target,
                        stall.ticks
                    );
                }
            }
        }
    }

    /// Consecutive idle decisions a pursuer spent without a legal move.
    #[must_use]
    pub fn stalled_ticks(&self, pursuer: PursuerId) -> u32 {
        self.stalls
            .iter()
            .find(|stall| stall.pursuer == pursuer)
            .map_or(0, |stall| stall.ticks)
    }

    fn stall_mut(&mut self, pursuer: PursuerId) -> &mut Stall {
        let index = match self.stalls.iter().position(|stall| stall.pursuer == pursuer) {
            Some(index) => index,
            None => {
                self.stalls.push(Stall { pursuer, ticks: 0 });
                self.stalls.len() - 1
            }
        };
        &mut self.stalls[index]
    }
}

#[derive(Clone, Copy, Debug)]
struct Stall {
    pursuer: PursuerId,
    ticks: u32,
}

/// Shared, read-only inputs of a decision.
#[derive(Clone, Copy, Debug)]
pub struct DecisionContext<'a> {
    /// Tile layout used for legality checks.
    pub grid: &'a Grid,
    /// Home area every pursuer must leave.
    pub home: HomeArea,
    /// Agent state observed this tick.
    pub agent: &'a AgentSnapshot,
}

/// Outcome of one pursuer's decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decision {
    /// Tile the pursuer is steering toward.
    pub target: TileCoord,
    /// Whether this decision crossed the home boundary for the first time.
    pub exits_home: bool,
    /// Candidate directions, best first, before filtering.
    pub candidates: [Direction; 4],
    /// Chosen direction, or `None` when every candidate was rejected.
    pub direction: Option<Direction>,
}

/// Runs the full decision procedure for an idle pursuer.
#[must_use]
pub fn decide(pursuer: &PursuerSnapshot, context: &DecisionContext<'_>) -> Decision {
    let current = pursuer.tile;
    let (target, exits_home) = select_target(pursuer, context);
    let candidates = candidate_order(current, target, context.home);

    let reverse = pursuer.last_direction.map(Direction::opposite);
    let direction = candidates.into_iter().find(|&direction| {
        if current == context.home.exit() && direction == Direction::Down {
            return false;
        }
        if !pursuer.reversal_allowed && Some(direction) == reverse {
            return false;
        }
        gate::can_commit(context.grid, pursuer.position, direction)
    });

    Decision {
        target,
        exits_home,
        candidates,
        direction,
    }
}

/// Target tile for this decision, and whether it marks the home exit.
///
/// The home-area checks run before any archetype rule: a pursuer that has
/// not left yet, or that drifted back below the boundary, always heads for
/// the exit regardless of mode or vulnerability.
#[must_use]
pub fn select_target(pursuer: &PursuerSnapshot, context: &DecisionContext<'_>) -> (TileCoord, bool) {
    let home = context.home;
    let current = pursuer.tile;

    if !pursuer.has_exited_home {
        return (home.exit(), !home.is_inside(current));
    }
    if home.is_inside(current) {
        return (home.exit(), false);
    }

    let target_context = TargetContext {
        agent_tile: context.agent.tile,
        agent_heading: context.agent.heading,
        columns: context.grid.columns() as i32,
        rows: context.grid.rows() as i32,
    };
    (
        target_tile_for(pursuer.archetype, Regime::of(pursuer), &target_context),
        false,
    )
}

/// Ranks the four directions for a pursuer on `current` steering to `target`.
///
/// The axis with the larger distance leads, horizontal on ties. A zero delta
/// ranks left or up first. Near the home exit the ranking is fixed to
/// [`EXIT_ESCAPE_ORDER`].
#[must_use]
pub fn candidate_order(current: TileCoord, target: TileCoord, home: HomeArea) -> [Direction; 4] {
    if home.is_exit_approach(current) {
        return EXIT_ESCAPE_ORDER;
    }

    let dx = target.column() - current.column();
    let dy = target.row() - current.row();
    let horizontal = if dx > 0 {
        Direction::Right
    } else {
        Direction::Left
    };
    let vertical = if dy > 0 { Direction::Down } else { Direction::Up };

    let (primary, secondary) = if dx.abs() >= dy.abs() {
        (horizontal, vertical)
    } else {
        (vertical, horizontal)
    };
    [
        primary,
        secondary,
        secondary.opposite(),
        primary.opposite(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn home() -> HomeArea {
        HomeArea::new(TileCoord::new(5, 7), 7)
    }

    #[test]
    fn horizontal_axis_wins_ties() {
        assert_eq!(
            candidate_order(TileCoord::new(0, 0), TileCoord::new(5, 5), home()),
            [Direction::Right, Direction::Down, Direction::Up, Direction::Left]
        );
    }

    #[test]
    fn larger_vertical_delta_leads() {
        assert_eq!(
            candidate_order(TileCoord::new(3, 3), TileCoord::new(1, 0), home()),
            [Direction::Up, Direction::Left, Direction::Right, Direction::Down]
        );
    }

    #[test]
    fn zero_delta_prefers_left_then_up() {
        assert_eq!(
            candidate_order(TileCoord::new(2, 2), TileCoord::new(2, 2), home()),
            [Direction::Left, Direction::Up, Direction::Down, Direction::Right]
        );
    }

    #[test]
    fn exit_approach_forces_escape_order() {
        for tile in [TileCoord::new(5, 7), TileCoord::new(5, 8)] {
            assert_eq!(
                candidate_order(tile, TileCoord::new(9, 9), home()),
                EXIT_ESCAPE_ORDER
            );
        }
    }

    #[test]
    fn stall_counter_tracks_each_pursuer() {
        let mut pursuit = Pursuit::default();
        pursuit.stall_mut(PursuerId::new(3)).ticks = 2;
        assert_eq!(pursuit.stalled_ticks(PursuerId::new(3)), 2);
        assert_eq!(pursuit.stalled_ticks(PursuerId::new(1)), 0);
    }
}
