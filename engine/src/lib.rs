#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fixed-step driver that wires the world to the pursuit and rules systems.

use log::trace;
use maze_pursuit_core::{Command, Direction, Event, Mode};
use maze_pursuit_system_pursuit::Pursuit;
use maze_pursuit_system_rules::{Rules, RulesConfig};
use maze_pursuit_world::{self as world, query, Level, LevelError, World};

/// Owns the world and every system, and advances them one tick at a time.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    pursuit: Pursuit,
    rules: Rules,
    events: Vec<Event>,
}

impl Simulation {
    /// Builds a simulation from a level and rules configuration.
    pub fn new(level: Level, rules: RulesConfig) -> Result<Self, LevelError> {
        Ok(Self {
            world: World::new(level)?,
            pursuit: Pursuit::default(),
            rules: Rules::new(rules),
            events: Vec::new(),
        })
    }

    /// Advances the session by exactly one fixed step.
    ///
    /// The world ticks first, moving the agent and then the pursuers in
    /// identifier order. Pursuit decisions are taken from one snapshot and
    /// applied afterward. The rules system runs last and is pumped until it
    /// stops emitting commands.
    pub fn advance(&mut self) {
        let mut tick_events = Vec::new();
        world::apply(&mut self.world, Command::Tick, &mut tick_events);
        self.events.extend(tick_events.iter().copied());

        let mut commands = Vec::new();
        self.pursuit.handle(
            &tick_events,
            &query::pursuer_view(&self.world),
            &query::agent(&self.world),
            query::grid(&self.world),
            query::home_area(&self.world),
            &mut commands,
        );
        let pursuit_events = self.apply_all(commands);

        let mut batch = tick_events;
        batch.extend(pursuit_events);
        self.pump_rules(batch);
        trace!("tick {} complete", query::tick_index(&self.world));
    }

    /// Requests a new heading for the agent at its next decision point.
    pub fn steer_agent(&mut self, direction: Direction) {
        self.submit(Command::SteerAgent { direction });
    }

    /// Enters or leaves the vulnerable override for every pursuer.
    ///
    /// Vulnerability entered this way is not ended by the frightened
    /// countdown; only a power pellet starts that timer.
    pub fn set_vulnerable(&mut self, vulnerable: bool) {
        self.submit(Command::SetVulnerable { vulnerable });
    }

    /// Leaves the vulnerable override, restoring each pursuer's saved mode.
    pub fn end_vulnerable(&mut self) {
        self.set_vulnerable(false);
    }

    /// Switches the pursuers' baseline mode outside the schedule.
    pub fn set_mode(&mut self, mode: Mode) {
        self.submit(Command::SetMode { mode });
    }

    /// Takes every event recorded since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    /// Read-only access to the authoritative world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Read-only access to the pursuit system.
    #[must_use]
    pub fn pursuit(&self) -> &Pursuit {
        &self.pursuit
    }

    /// Read-only access to the rules system.
    #[must_use]
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    fn submit(&mut self, command: Command) {
        let events = self.apply_all(vec![command]);
        self.pump_rules(events);
    }

    fn apply_all(&mut self, commands: Vec<Command>) -> Vec<Event> {
        let mut events = Vec::new();
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }
        self.events.extend(events.iter().copied());
        events
    }

    fn pump_rules(&mut self, pending_events: Vec<Event>) {
        let mut events = pending_events;
        while !events.is_empty() {
            let mut commands = Vec::new();
            self.rules.handle(
                &events,
                &query::agent(&self.world),
                query::grid(&self.world),
                &mut commands,
            );
            if commands.is_empty() {
                break;
            }
            events = self.apply_all(commands);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_pursuit_core::{Archetype, TileCoord};
    use maze_pursuit_world::{Grid, HomeArea};

    fn simulation() -> Simulation {
        let grid = Grid::open(8, 8, 16.0).expect("valid grid");
        let level = Level::new(
            grid,
            HomeArea::new(TileCoord::new(4, 5), 5),
            TileCoord::new(1, 1),
        )
        .with_pursuer(Archetype::Blinky, TileCoord::new(4, 6));
        Simulation::new(level, RulesConfig::default()).expect("valid level")
    }

    #[test]
    fn drain_returns_events_once() {
        let mut simulation = simulation();
        simulation.advance();
        let events = simulation.drain_events();
        assert_eq!(events.first(), Some(&Event::TimeAdvanced { tick: 1 }));
        assert!(simulation.drain_events().is_empty());
    }

    #[test]
    fn external_vulnerability_round_trips() {
        let mut simulation = simulation();
        simulation.set_vulnerable(true);
        simulation.set_vulnerable(true);
        simulation.end_vulnerable();
        assert_eq!(
            simulation.drain_events(),
            vec![
                Event::VulnerabilityChanged { vulnerable: true },
                Event::VulnerabilityChanged { vulnerable: false },
            ]
        );
        assert!(!simulation.rules().is_vulnerable());
    }
}
