#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Maze Pursuit session.

mod level;
mod steering;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use maze_pursuit_core::{AgentSnapshot, Event, PelletKind, PursuerSnapshot};
use maze_pursuit_engine::Simulation;
use maze_pursuit_world::{query, Level};
use serde::Serialize;

use crate::{
    level::{LevelConfig, DEFAULT_LEVEL},
    steering::RandomSteering,
};

const STEER_INTERVAL: u64 = 24;

#[derive(Debug, Parser)]
#[command(
    name = "maze-pursuit",
    about = "Runs a headless Maze Pursuit session",
    version
)]
struct Args {
    /// Level file to load instead of the built-in maze.
    #[arg(long)]
    level: Option<PathBuf>,

    /// Number of fixed steps to simulate.
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// Seed for the agent's random steering.
    #[arg(long, default_value_t = 0x5eed)]
    seed: u64,

    /// Emit one JSON object per tick instead of text.
    #[arg(long)]
    json: bool,

    /// Log filter, overriding RUST_LOG (for example `debug` or `maze_pursuit_world=trace`).
    #[arg(long)]
    log_level: Option<String>,
}

/// Entry point for the Maze Pursuit command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_level.as_deref());

    let config = match &args.level {
        Some(path) => LevelConfig::load(path)?,
        None => LevelConfig::parse(DEFAULT_LEVEL).context("built-in level is malformed")?,
    };
    let (level, rules) = config.build()?;
    let mut summary = Summary::for_level(&level);
    let mut simulation = Simulation::new(level, rules)?;
    info!(
        "running {} ticks with steering seed {:#x}",
        args.ticks, args.seed
    );

    println!("{}", query::welcome_banner(simulation.world()));

    let mut steering = RandomSteering::new(args.seed, STEER_INTERVAL);
    for step in 0..args.ticks {
        if let Some(direction) = steering.next(step) {
            simulation.steer_agent(direction);
        }
        simulation.advance();

        let events = simulation.drain_events();
        summary.record(&events);
        report_tick(&simulation, &events, args.json)?;
    }

    summary.finish(&simulation);
    if args.json {
        println!(
            "{}",
            serde_json::to_string(&summary).context("failed to encode summary")?
        );
    } else {
        summary.print();
    }
    Ok(())
}

fn init_logging(filter: Option<&str>) {
    let mut builder = match filter {
        Some(filter) => {
            let mut builder = env_logger::Builder::new();
            let _ = builder.parse_filters(filter);
            builder
        }
        None => env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")),
    };
    builder.init();
}

#[derive(Serialize)]
struct TraceLine<'a> {
    tick: u64,
    events: &'a [Event],
    agent: AgentSnapshot,
    pursuers: Vec<PursuerSnapshot>,
}

fn report_tick(simulation: &Simulation, events: &[Event], json: bool) -> Result<()> {
    let world = simulation.world();
    let tick = query::tick_index(world);

    if json {
        let line = TraceLine {
            tick,
            events,
            agent: query::agent(world),
            pursuers: query::pursuer_view(world).into_vec(),
        };
        println!(
            "{}",
            serde_json::to_string(&line).context("failed to encode trace line")?
        );
        return Ok(());
    }

    for event in events {
        match event {
            Event::TimeAdvanced { .. } => {}
            Event::PursuerCommitted {
                pursuer,
                direction,
                to,
                animation,
            } => println!(
                "{tick:>6}  pursuer {} -> {direction:?} to ({}, {}) [{}]",
                pursuer.get(),
                to.column(),
                to.row(),
                animation.as_str()
            ),
            other => println!("{tick:>6}  {other:?}"),
        }
    }
    Ok(())
}

#[derive(Debug, Default, Serialize)]
struct Summary {
    agent_spawn: [i32; 2],
    agent_speed: f32,
    pursuer_speed: f32,
    ticks: u64,
    regular_pellets_eaten: u32,
    power_pellets_eaten: u32,
    pellets_remaining: usize,
    mode_changes: u32,
    vulnerability_changes: u32,
    pursuers: Vec<PursuerSummary>,
}

#[derive(Debug, Serialize)]
struct PursuerSummary {
    id: u32,
    archetype: &'static str,
    column: i32,
    row: i32,
    has_exited_home: bool,
    stalled_ticks: u32,
}

impl Summary {
    fn for_level(level: &Level) -> Self {
        let spawn = level.agent_spawn();
        info!(
            "agent spawns at ({}, {}), speeds {} agent / {} pursuer per tick",
            spawn.column(),
            spawn.row(),
            level.agent_speed(),
            level.pursuer_speed()
        );
        Self {
            agent_spawn: [spawn.column(), spawn.row()],
            agent_speed: level.agent_speed(),
            pursuer_speed: level.pursuer_speed(),
            ..Self::default()
        }
    }

    fn record(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::TimeAdvanced { tick } => self.ticks = *tick,
                Event::PelletEaten {
                    kind: PelletKind::Regular,
                    ..
                } => self.regular_pellets_eaten += 1,
                Event::PelletEaten {
                    kind: PelletKind::Power,
                    ..
                } => self.power_pellets_eaten += 1,
                Event::ModeChanged { .. } => self.mode_changes += 1,
                Event::VulnerabilityChanged { .. } => self.vulnerability_changes += 1,
                _ => {}
            }
        }
    }

    fn finish(&mut self, simulation: &Simulation) {
        let world = simulation.world();
        self.pellets_remaining = query::grid(world).remaining_pellets();
        self.pursuers = query::pursuer_view(world)
            .iter()
            .map(|pursuer| PursuerSummary {
                id: pursuer.id.get(),
                archetype: pursuer.archetype.name(),
                column: pursuer.tile.column(),
                row: pursuer.tile.row(),
                has_exited_home: pursuer.has_exited_home,
                stalled_ticks: simulation.pursuit().stalled_ticks(pursuer.id),
            })
            .collect();
    }

    fn print(&self) {
        let [column, row] = self.agent_spawn;
        println!("agent spawn:          ({column}, {row})");
        println!(
            "speeds per tick:      {} agent, {} pursuer",
            self.agent_speed, self.pursuer_speed
        );
        println!("ticks simulated:      {}", self.ticks);
        println!(
            "pellets eaten:        {} regular, {} power",
            self.regular_pellets_eaten, self.power_pellets_eaten
        );
        println!("pellets remaining:    {}", self.pellets_remaining);
        println!("mode changes:         {}", self.mode_changes);
        println!("vulnerability flips:  {}", self.vulnerability_changes);
        for pursuer in &self.pursuers {
            println!(
                "pursuer {} ({}) at ({}, {}), exited home: {}, stalled: {}",
                pursuer.id,
                pursuer.archetype,
                pursuer.column,
                pursuer.row,
                pursuer.has_exited_home,
                pursuer.stalled_ticks
            );
        }
    }
}
