#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Pursuit engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! that systems fold into their own state. Systems read immutable snapshots
//! and respond exclusively with new command batches.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Maze Pursuit.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    /// Advances the simulation by one fixed step: the agent commits its
    /// steering if idle, then every entity's motion advances.
    Tick,
    /// Records the heading the agent should take at its next decision point.
    SteerAgent {
        /// Heading requested by the controlling collaborator.
        direction: Direction,
    },
    /// Requests that an idle pursuer starts moving one tile in a direction.
    CommitPursuerMove {
        /// Identifier of the pursuer committing to the move.
        pursuer: PursuerId,
        /// Direction of travel for the committed move.
        direction: Direction,
    },
    /// Marks a pursuer as having left the home area for good.
    MarkPursuerExitedHome {
        /// Identifier of the pursuer that crossed the boundary row.
        pursuer: PursuerId,
    },
    /// Switches every pursuer's baseline targeting regime.
    SetMode {
        /// Mode the pursuers should adopt.
        mode: Mode,
    },
    /// Enters or leaves the vulnerable override for every pursuer.
    SetVulnerable {
        /// Whether pursuers should flee.
        vulnerable: bool,
    },
    /// Consumes the pellet on the provided tile, if any.
    EatPellet {
        /// Tile holding the pellet.
        tile: TileCoord,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Event {
    /// Indicates that the simulation advanced by one step.
    TimeAdvanced {
        /// Number of ticks processed so far, including this one.
        tick: u64,
    },
    /// Confirms that the agent started moving toward a neighbouring tile.
    AgentCommitted {
        /// Direction the agent is travelling in.
        direction: Direction,
        /// Tile whose center the agent is heading for.
        to: TileCoord,
    },
    /// Reports that the agent came to rest on a tile center.
    AgentArrived {
        /// Tile the agent now occupies.
        tile: TileCoord,
    },
    /// Confirms that a pursuer committed to a move.
    PursuerCommitted {
        /// Identifier of the pursuer that moved.
        pursuer: PursuerId,
        /// Direction of travel.
        direction: Direction,
        /// Tile whose center the pursuer is heading for.
        to: TileCoord,
        /// Animation selected for the move.
        animation: AnimationKey,
    },
    /// Reports that a pursuer came to rest on a tile center.
    PursuerArrived {
        /// Identifier of the pursuer.
        pursuer: PursuerId,
        /// Tile the pursuer now occupies.
        tile: TileCoord,
    },
    /// Announces that a pursuer left the home area.
    PursuerExitedHome {
        /// Identifier of the pursuer.
        pursuer: PursuerId,
    },
    /// Announces a new baseline mode.
    ModeChanged {
        /// Mode that became active.
        mode: Mode,
    },
    /// Announces that pursuers entered or left the vulnerable override.
    VulnerabilityChanged {
        /// Whether pursuers are now vulnerable.
        vulnerable: bool,
    },
    /// Confirms that a pellet was consumed.
    PelletEaten {
        /// Tile that held the pellet.
        tile: TileCoord,
        /// Kind of pellet that was eaten.
        kind: PelletKind,
    },
}

/// Cardinal movement directions available to entities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// Every direction.
    pub const ALL: [Direction; 4] = [Self::Up, Self::Left, Self::Right, Self::Down];

    /// Returns the direction pointing the other way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Axis the direction travels along.
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::Up | Self::Down => Axis::Vertical,
            Self::Left | Self::Right => Axis::Horizontal,
        }
    }

    /// Unit step expressed as a column and row delta.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

/// One of the two axes of the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// The column axis (x).
    Horizontal,
    /// The row axis (y).
    Vertical,
}

impl Axis {
    /// The other axis.
    #[must_use]
    pub const fn perpendicular(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }

    /// Component of `point` along this axis.
    #[must_use]
    pub fn component(self, point: Vec2) -> f32 {
        match self {
            Self::Horizontal => point.x,
            Self::Vertical => point.y,
        }
    }
}

/// Location of a single tile expressed as column and row indices.
///
/// Coordinates are signed because wraparound and look-ahead arithmetic can
/// step off the grid; such tiles are treated as walls by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    column: i32,
    row: i32,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index, growing to the right.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Zero-based row index, growing downward.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Neighbouring tile one step away in `direction`, without any wrapping.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self::new(self.column + dx, self.row + dy)
    }
}

/// Unique identifier assigned to a pursuer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PursuerId(u32);

impl PursuerId {
    /// Creates a new pursuer identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Fixed pursuer behaviour profiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Archetype {
    /// Chases the agent's tile directly.
    Blinky,
    /// Ambushes four tiles ahead of the agent.
    Pinky,
    /// Ambushes two tiles ahead of the agent.
    Inky,
    /// Chases the agent's tile directly.
    Clyde,
}

impl Archetype {
    /// Lowercase display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Blinky => "blinky",
            Self::Pinky => "pinky",
            Self::Inky => "inky",
            Self::Clyde => "clyde",
        }
    }
}

/// Baseline (non-vulnerable) targeting regime of a pursuer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Each pursuer heads for its own corner.
    Scatter,
    /// Pursuers hunt the agent.
    Chase,
}

/// Sprite selector exposed to renderers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimationKey {
    /// Walking toward decreasing rows.
    UpWalking,
    /// Walking toward increasing rows.
    DownWalking,
    /// Walking toward decreasing columns.
    LeftWalking,
    /// Walking toward increasing columns.
    RightWalking,
    /// Fleeing, regardless of heading.
    Vulnerable,
}

impl AnimationKey {
    /// Selects the key for a move in `direction`.
    #[must_use]
    pub const fn for_move(direction: Direction, vulnerable: bool) -> Self {
        if vulnerable {
            return Self::Vulnerable;
        }
        match direction {
            Direction::Up => Self::UpWalking,
            Direction::Down => Self::DownWalking,
            Direction::Left => Self::LeftWalking,
            Direction::Right => Self::RightWalking,
        }
    }

    /// Name of the animation as stored in sprite sheets.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UpWalking => "up_walking",
            Self::DownWalking => "down_walking",
            Self::LeftWalking => "left_walking",
            Self::RightWalking => "right_walking",
            Self::Vulnerable => "vulnerable",
        }
    }
}

/// Kinds of pellets that can be placed on a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PelletKind {
    /// Ordinary scoring pellet.
    Regular,
    /// Pellet that turns the pursuers vulnerable.
    Power,
}

/// Immutable representation of the agent's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct AgentSnapshot {
    /// Continuous position in world units.
    pub position: Vec2,
    /// Tile containing `position`.
    pub tile: TileCoord,
    /// Last committed direction of travel, if the agent ever moved.
    pub heading: Option<Direction>,
    /// Whether the agent is between tile centers.
    pub is_moving: bool,
}

/// Immutable representation of a single pursuer's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PursuerSnapshot {
    /// Unique identifier assigned to the pursuer.
    pub id: PursuerId,
    /// Behaviour profile of the pursuer.
    pub archetype: Archetype,
    /// Continuous position in world units.
    pub position: Vec2,
    /// Tile containing `position`.
    pub tile: TileCoord,
    /// Whether the pursuer is between tile centers.
    pub is_moving: bool,
    /// Baseline targeting regime.
    pub mode: Mode,
    /// Whether the vulnerable override is active.
    pub vulnerable: bool,
    /// Whether the pursuer has left the home area.
    pub has_exited_home: bool,
    /// Last direction the pursuer committed to.
    pub last_direction: Option<Direction>,
    /// Whether the next decision may reverse `last_direction`.
    pub reversal_allowed: bool,
    /// Active animation key.
    pub animation: AnimationKey,
}

/// Read-only snapshot describing all pursuers within the maze.
#[derive(Clone, Debug, Default)]
pub struct PursuerView {
    snapshots: Vec<PursuerSnapshot>,
}

impl PursuerView {
    /// Creates a new pursuer view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<PursuerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in ascending identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &PursuerSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot of a single pursuer.
    #[must_use]
    pub fn get(&self, id: PursuerId) -> Option<&PursuerSnapshot> {
        self.snapshots.iter().find(|snapshot| snapshot.id == id)
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<PursuerSnapshot> {
        self.snapshots
    }
}

#[cfg(test)]
mod tests {
    use super::{AnimationKey, Axis, Command, Direction, Event, PelletKind, TileCoord};
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn opposite_directions_pair_up() {
        for direction in Direction::ALL {
            assert_ne!(direction.opposite(), direction);
            assert_eq!(direction.opposite().opposite(), direction);
            assert_eq!(direction.opposite().axis(), direction.axis());
        }
    }

    #[test]
    fn step_follows_screen_orientation() {
        let origin = TileCoord::new(3, 3);
        assert_eq!(origin.step(Direction::Up), TileCoord::new(3, 2));
        assert_eq!(origin.step(Direction::Down), TileCoord::new(3, 4));
        assert_eq!(origin.step(Direction::Left), TileCoord::new(2, 3));
        assert_eq!(origin.step(Direction::Right), TileCoord::new(4, 3));
        assert_eq!(TileCoord::new(0, 0).step(Direction::Left).column(), -1);
    }

    #[test]
    fn perpendicular_axis_swaps() {
        assert_eq!(Axis::Horizontal.perpendicular(), Axis::Vertical);
        assert_eq!(Direction::Up.axis().perpendicular(), Axis::Horizontal);
    }

    #[test]
    fn vulnerable_animation_ignores_direction() {
        for direction in Direction::ALL {
            assert_eq!(
                AnimationKey::for_move(direction, true),
                AnimationKey::Vulnerable
            );
        }
        assert_eq!(
            AnimationKey::for_move(Direction::Left, false).as_str(),
            "left_walking"
        );
    }

    #[test]
    fn commands_round_trip_through_bincode() {
        assert_round_trip(&Command::EatPellet {
            tile: TileCoord::new(-1, 4),
        });
        assert_round_trip(&Command::SteerAgent {
            direction: Direction::Right,
        });
    }

    #[test]
    fn events_round_trip_through_bincode() {
        assert_round_trip(&Event::PelletEaten {
            tile: TileCoord::new(2, 9),
            kind: PelletKind::Power,
        });
    }
}
