#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Game-rules system: pellet consumption, the frightened countdown and the
//! scatter/chase schedule.
//!
//! The system never touches the world directly. It watches `TimeAdvanced`,
//! `PelletEaten` and `VulnerabilityChanged` events and answers with
//! `EatPellet`, `SetVulnerable` and `SetMode` commands.

use log::{debug, info};
use maze_pursuit_core::{AgentSnapshot, Command, Event, Mode, PelletKind};
use maze_pursuit_world::Grid;
use serde::Deserialize;

const DEFAULT_FRIGHTENED_TICKS: u32 = 360;

/// One entry of the scatter/chase schedule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct Phase {
    /// Mode pursuers adopt during the phase.
    pub mode: Mode,
    /// Length of the phase in ticks. Ignored for the final phase.
    pub ticks: u32,
}

impl Phase {
    /// Creates a phase lasting `ticks` ticks.
    #[must_use]
    pub const fn new(mode: Mode, ticks: u32) -> Self {
        Self { mode, ticks }
    }
}

/// Tunables of the rules system, usually read from a level file.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RulesConfig {
    /// Ticks the pursuers stay vulnerable after a power pellet. Zero leaves
    /// power pellets without effect.
    pub frightened_ticks: u32,
    /// Scatter/chase phases in order. The last one never ends.
    pub schedule: Vec<Phase>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            frightened_ticks: DEFAULT_FRIGHTENED_TICKS,
            schedule: vec![
                Phase::new(Mode::Scatter, 420),
                Phase::new(Mode::Chase, 1200),
                Phase::new(Mode::Scatter, 420),
                Phase::new(Mode::Chase, 1200),
                Phase::new(Mode::Scatter, 300),
                Phase::new(Mode::Chase, 1200),
                Phase::new(Mode::Scatter, 300),
                Phase::new(Mode::Chase, 0),
            ],
        }
    }
}

/// Pure system that turns elapsed time and pellet events into rule commands.
#[derive(Debug)]
pub struct Rules {
    config: RulesConfig,
    started: bool,
    phase_index: usize,
    phase_elapsed: u32,
    frightened_remaining: Option<u32>,
    ending_countdown: bool,
    vulnerable: bool,
}

impl Rules {
    /// Creates the rules system at the start of the schedule.
    #[must_use]
    pub fn new(config: RulesConfig) -> Self {
        Self {
            config,
            started: false,
            phase_index: 0,
            phase_elapsed: 0,
            frightened_remaining: None,
            ending_countdown: false,
            vulnerable: false,
        }
    }

    /// Consumes world events and the agent snapshot to emit rule commands.
    ///
    /// Meant to be pumped until it stops emitting: the first batch of a tick
    /// eats pellets and advances timers, later batches react to the events
    /// those commands produced.
    pub fn handle(
        &mut self,
        events: &[Event],
        agent: &AgentSnapshot,
        grid: &Grid,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            match *event {
                Event::TimeAdvanced { .. } => self.on_tick(agent, grid, out),
                Event::PelletEaten {
                    kind: PelletKind::Power,
                    ..
                } => self.on_power_pellet(out),
                Event::VulnerabilityChanged { vulnerable } => {
                    self.vulnerable = vulnerable;
                    // Our own expiry must not cancel a countdown a pellet in
                    // the same batch just restarted.
                    if !vulnerable && !std::mem::take(&mut self.ending_countdown) {
                        self.frightened_remaining = None;
                    }
                }
                _ => {}
            }
        }
    }

    /// Active schedule phase, if the schedule is not empty.
    #[must_use]
    pub fn current_phase(&self) -> Option<Phase> {
        self.config.schedule.get(self.phase_index).copied()
    }

    /// Ticks left before the frightened countdown ends pursuer vulnerability.
    #[must_use]
    pub const fn frightened_remaining(&self) -> Option<u32> {
        self.frightened_remaining
    }

    /// Whether the last observed vulnerability event switched it on.
    #[must_use]
    pub const fn is_vulnerable(&self) -> bool {
        self.vulnerable
    }

    fn on_power_pellet(&mut self, out: &mut Vec<Command>) {
        let ticks = self.config.frightened_ticks;
        if ticks == 0 {
            debug!("power pellet eaten, frightened time is disabled");
            return;
        }
        debug!("power pellet eaten, frightened for {ticks} ticks");
        self.frightened_remaining = Some(ticks);
        out.push(Command::SetVulnerable { vulnerable: true });
    }

    fn on_tick(&mut self, agent: &AgentSnapshot, grid: &Grid, out: &mut Vec<Command>) {
        self.ending_countdown = false;
        if !self.started {
            self.started = true;
            if let Some(phase) = self.current_phase() {
                out.push(Command::SetMode { mode: phase.mode });
            }
        }

        if grid.has_pellet(agent.tile) {
            out.push(Command::EatPellet { tile: agent.tile });
        }

        if let Some(remaining) = self.frightened_remaining {
            let remaining = remaining.saturating_sub(1);
            if remaining == 0 {
                debug!("frightened countdown elapsed");
                self.frightened_remaining = None;
                self.ending_countdown = true;
                out.push(Command::SetVulnerable { vulnerable: false });
            } else {
                self.frightened_remaining = Some(remaining);
            }
            return;
        }

        if !self.vulnerable {
            self.advance_schedule(out);
        }
    }

    fn advance_schedule(&mut self, out: &mut Vec<Command>) {
        let Some(phase) = self.current_phase() else {
            return;
        };
        if self.phase_index + 1 >= self.config.schedule.len() {
            return;
        }

        self.phase_elapsed = self.phase_elapsed.saturating_add(1);
        if self.phase_elapsed < phase.ticks {
            return;
        }

        self.phase_index += 1;
        self.phase_elapsed = 0;
        if let Some(next) = self.current_phase() {
            info!("schedule phase {} begins: {:?}", self.phase_index, next.mode);
            out.push(Command::SetMode { mode: next.mode });
        }
    }
}
