#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Maze Pursuit.

pub mod gate;
mod grid;
mod layout;
mod level;
mod modes;
mod motion;

use glam::Vec2;
use log::{debug, warn};
use maze_pursuit_core::{
    AnimationKey, Archetype, Command, Direction, Event, PursuerId, WELCOME_BANNER,
};

pub use grid::{Grid, CENTER_TOLERANCE};
pub use layout::parse_layout;
pub use level::{HomeArea, Level, LevelError, PursuerSpawn};
pub use modes::ModeController;
pub use motion::{Motion, SNAP_DISTANCE};

const SPAWN_ANIMATION: AnimationKey = AnimationKey::UpWalking;

/// Represents the authoritative Maze Pursuit world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    grid: Grid,
    home: HomeArea,
    agent: Agent,
    pursuers: Vec<Pursuer>,
    tick_index: u64,
}

impl World {
    /// Creates a world from a validated level.
    pub fn new(level: Level) -> Result<Self, LevelError> {
        level.validate()?;
        let (grid, home, agent_spawn, spawns, agent_speed, pursuer_speed) = level.into_parts();

        let agent = Agent {
            motion: Motion::at_rest(grid.tile_center(agent_spawn), Vec2::splat(agent_speed)),
            desired: None,
        };
        let pursuers = spawns
            .iter()
            .enumerate()
            .map(|(index, spawn)| {
                Pursuer::spawn(
                    PursuerId::new(index as u32),
                    spawn.archetype,
                    Motion::at_rest(grid.tile_center(spawn.tile), Vec2::splat(pursuer_speed)),
                )
            })
            .collect();

        Ok(Self {
            banner: WELCOME_BANNER,
            grid,
            home,
            agent,
            pursuers,
            tick_index: 0,
        })
    }

    fn pursuer_mut(&mut self, id: PursuerId) -> Option<&mut Pursuer> {
        self.pursuers.iter_mut().find(|pursuer| pursuer.id == id)
    }

    fn commit_agent(&mut self, out_events: &mut Vec<Event>) {
        if self.agent.motion.is_moving() {
            return;
        }

        let position = self.agent.motion.position();
        let candidates = [self.agent.desired, self.agent.motion.heading()];
        for direction in candidates.into_iter().flatten() {
            if !gate::can_commit(&self.grid, position, direction) {
                continue;
            }
            let to = gate::destination(&self.grid, self.grid.tile_of(position), direction);
            self.agent
                .motion
                .start_move(direction, self.grid.tile_center(to));
            out_events.push(Event::AgentCommitted { direction, to });
            return;
        }
    }

    fn advance_motion(&mut self, out_events: &mut Vec<Event>) {
        if self.agent.motion.tick() {
            out_events.push(Event::AgentArrived {
                tile: self.grid.tile_of(self.agent.motion.position()),
            });
        }

        for pursuer in &mut self.pursuers {
            if pursuer.motion.tick() {
                out_events.push(Event::PursuerArrived {
                    pursuer: pursuer.id,
                    tile: self.grid.tile_of(pursuer.motion.position()),
                });
            }
        }
    }

    fn commit_pursuer(&mut self, id: PursuerId, direction: Direction, out_events: &mut Vec<Event>) {
        let Some(index) = self.pursuers.iter().position(|pursuer| pursuer.id == id) else {
            warn!("move committed for unknown pursuer {}", id.get());
            return;
        };
        let grid = &self.grid;
        let pursuer = &mut self.pursuers[index];

        if pursuer.motion.is_moving() {
            warn!(
                "pursuer {} asked to commit {direction:?} while still moving",
                id.get()
            );
            return;
        }
        let position = pursuer.motion.position();
        if !gate::can_commit(grid, position, direction) {
            debug!("pursuer {} cannot commit {direction:?}", id.get());
            return;
        }

        let to = gate::destination(grid, grid.tile_of(position), direction);
        let animation = AnimationKey::for_move(direction, pursuer.modes.is_vulnerable());
        pursuer.last_direction = Some(direction);
        pursuer.modes.consume_reversal();
        pursuer.animation = animation;
        pursuer.motion.start_move(direction, grid.tile_center(to));
        out_events.push(Event::PursuerCommitted {
            pursuer: id,
            direction,
            to,
            animation,
        });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced {
                tick: world.tick_index,
            });
            world.commit_agent(out_events);
            world.advance_motion(out_events);
        }
        Command::SteerAgent { direction } => {
            world.agent.desired = Some(direction);
        }
        Command::CommitPursuerMove { pursuer, direction } => {
            world.commit_pursuer(pursuer, direction, out_events);
        }
        Command::MarkPursuerExitedHome { pursuer } => {
            if let Some(state) = world.pursuer_mut(pursuer) {
                if !state.has_exited_home {
                    state.has_exited_home = true;
                    debug!("pursuer {} left the home area", pursuer.get());
                    out_events.push(Event::PursuerExitedHome { pursuer });
                }
            }
        }
        Command::SetMode { mode } => {
            let mut changed = false;
            for pursuer in &mut world.pursuers {
                changed |= pursuer.modes.set_mode(mode);
            }
            if changed {
                debug!("pursuers switched to {mode:?}");
                out_events.push(Event::ModeChanged { mode });
            }
        }
        Command::SetVulnerable { vulnerable } => {
            let mut changed = false;
            for pursuer in &mut world.pursuers {
                changed |= pursuer.modes.set_vulnerable(vulnerable);
            }
            if changed {
                debug!("pursuer vulnerability set to {vulnerable}");
                out_events.push(Event::VulnerabilityChanged { vulnerable });
            }
        }
        Command::EatPellet { tile } => {
            if let Some(kind) = world.grid.eat_pellet(tile) {
                debug!(
                    "{kind:?} pellet eaten at ({}, {})",
                    tile.column(),
                    tile.row()
                );
                out_events.push(Event::PelletEaten { tile, kind });
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use maze_pursuit_core::{AgentSnapshot, PursuerSnapshot, PursuerView};

    use super::{Grid, HomeArea, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the tile grid.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Home area shared by every pursuer.
    #[must_use]
    pub fn home_area(world: &World) -> HomeArea {
        world.home
    }

    /// Number of ticks processed so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Captures the agent's current state.
    #[must_use]
    pub fn agent(world: &World) -> AgentSnapshot {
        let position = world.agent.motion.position();
        AgentSnapshot {
            position,
            tile: world.grid.tile_of(position),
            heading: world.agent.motion.heading(),
            is_moving: world.agent.motion.is_moving(),
        }
    }

    /// Captures a read-only view of every pursuer, ordered by identifier.
    #[must_use]
    pub fn pursuer_view(world: &World) -> PursuerView {
        let snapshots = world
            .pursuers
            .iter()
            .map(|pursuer| {
                let position = pursuer.motion.position();
                PursuerSnapshot {
                    id: pursuer.id,
                    archetype: pursuer.archetype,
                    position,
                    tile: world.grid.tile_of(position),
                    is_moving: pursuer.motion.is_moving(),
                    mode: pursuer.modes.mode(),
                    vulnerable: pursuer.modes.is_vulnerable(),
                    has_exited_home: pursuer.has_exited_home,
                    last_direction: pursuer.last_direction,
                    reversal_allowed: pursuer.modes.reversal_allowed(),
                    animation: pursuer.animation,
                }
            })
            .collect();
        PursuerView::from_snapshots(snapshots)
    }
}

#[derive(Clone, Debug)]
struct Agent {
    motion: Motion,
    desired: Option<Direction>,
}

#[derive(Clone, Debug)]
struct Pursuer {
    id: PursuerId,
    archetype: Archetype,
    motion: Motion,
    modes: ModeController,
    has_exited_home: bool,
    last_direction: Option<Direction>,
    animation: AnimationKey,
}

impl Pursuer {
    fn spawn(id: PursuerId, archetype: Archetype, motion: Motion) -> Self {
        Self {
            id,
            archetype,
            motion,
            modes: ModeController::new(),
            has_exited_home: false,
            last_direction: None,
            animation: SPAWN_ANIMATION,
        }
    }
}
