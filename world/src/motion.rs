//! Continuous movement between tile centers.

use glam::Vec2;
use maze_pursuit_core::Direction;

/// Remaining distance under which a moving entity snaps onto its target.
pub const SNAP_DISTANCE: f32 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq)]
struct Leg {
    direction: Direction,
    target: Vec2,
}

/// Per-entity motion state: idle on a tile center, or sliding toward one.
///
/// Displacement happens on the committed direction's axis only, at a fixed
/// per-axis speed, and is clamped so the entity never passes its target.
#[derive(Clone, Debug, PartialEq)]
pub struct Motion {
    position: Vec2,
    speed: Vec2,
    heading: Option<Direction>,
    leg: Option<Leg>,
}

impl Motion {
    /// Creates an idle motion resting at `position`.
    #[must_use]
    pub const fn at_rest(position: Vec2, speed: Vec2) -> Self {
        Self {
            position,
            speed,
            heading: None,
            leg: None,
        }
    }

    /// Current continuous position.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Most recently committed direction. Persists after the move completes.
    #[must_use]
    pub const fn heading(&self) -> Option<Direction> {
        self.heading
    }

    /// Tile center the entity is heading for while moving.
    #[must_use]
    pub fn target(&self) -> Option<Vec2> {
        self.leg.map(|leg| leg.target)
    }

    /// Whether the entity is between tile centers.
    #[must_use]
    pub const fn is_moving(&self) -> bool {
        self.leg.is_some()
    }

    /// Commits to a move toward `target`.
    ///
    /// Callers must wait until the previous move finished; doing otherwise is
    /// a logic error caught in debug builds.
    pub fn start_move(&mut self, direction: Direction, target: Vec2) {
        debug_assert!(
            !self.is_moving(),
            "start_move called while still moving toward {:?}",
            self.target()
        );
        self.heading = Some(direction);
        self.leg = Some(Leg { direction, target });
    }

    /// Advances one simulation step. Returns `true` when the entity arrived.
    pub fn tick(&mut self) -> bool {
        let Some(leg) = self.leg else {
            return false;
        };

        if self.remaining(leg) < SNAP_DISTANCE {
            self.arrive(leg);
            return true;
        }

        let offset = leg.target - self.position;
        match leg.direction {
            Direction::Up => self.position.y += (-self.speed.y).max(offset.y),
            Direction::Down => self.position.y += self.speed.y.min(offset.y),
            Direction::Left => self.position.x += (-self.speed.x).max(offset.x),
            Direction::Right => self.position.x += self.speed.x.min(offset.x),
        }

        if self.remaining(leg) < SNAP_DISTANCE {
            self.arrive(leg);
            return true;
        }
        false
    }

    // Only the travel axis counts; the other axis was centered when the move
    // was committed and is never displaced.
    fn remaining(&self, leg: Leg) -> f32 {
        let axis = leg.direction.axis();
        (axis.component(leg.target) - axis.component(self.position)).abs()
    }

    fn arrive(&mut self, leg: Leg) {
        self.position = leg.target;
        self.leg = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_until_idle(motion: &mut Motion) -> Vec<Vec2> {
        let mut trail = Vec::new();
        for _ in 0..1_000 {
            let arrived = motion.tick();
            trail.push(motion.position());
            if arrived {
                break;
            }
        }
        trail
    }

    #[test]
    fn idle_tick_is_a_no_op() {
        let mut motion = Motion::at_rest(Vec2::new(8.0, 8.0), Vec2::splat(5.0));
        assert!(!motion.tick());
        assert_eq!(motion.position(), Vec2::new(8.0, 8.0));
        assert_eq!(motion.heading(), None);
    }

    #[test]
    fn approaches_monotonically_and_snaps_exactly() {
        let start = Vec2::new(16.0, 16.0);
        let target = Vec2::new(48.0, 16.0);
        let mut motion = Motion::at_rest(start, Vec2::splat(5.0));
        motion.start_move(Direction::Right, target);
        assert!(motion.is_moving());

        let mut previous = start.distance(target);
        let trail = run_until_idle(&mut motion);
        for position in &trail {
            let distance = position.distance(target);
            assert!(distance < previous, "distance must strictly shrink");
            assert!(position.x <= target.x, "must never overshoot");
            assert_eq!(position.y, start.y, "perpendicular axis untouched");
            previous = distance;
        }

        assert!(!motion.is_moving());
        assert_eq!(motion.target(), None);
        assert_eq!(motion.position(), target);
        assert_eq!(motion.heading(), Some(Direction::Right));
        // 32 units at 5 per tick: six full steps then a clamped one.
        assert_eq!(trail.len(), 7);
    }

    #[test]
    fn moving_up_clamps_at_target() {
        let mut motion = Motion::at_rest(Vec2::new(16.0, 48.0), Vec2::new(5.0, 7.0));
        motion.start_move(Direction::Up, Vec2::new(16.0, 16.0));
        let trail = run_until_idle(&mut motion);
        assert!(trail.iter().all(|position| position.y >= 16.0));
        assert_eq!(motion.position(), Vec2::new(16.0, 16.0));
    }

    #[test]
    fn target_behind_the_heading_is_reached_in_one_hop() {
        // Leaving through the left edge targets the right-most column center.
        let mut motion = Motion::at_rest(Vec2::new(8.0, 8.0), Vec2::splat(2.0));
        motion.start_move(Direction::Left, Vec2::new(152.0, 8.0));
        assert!(motion.tick());
        assert_eq!(motion.position(), Vec2::new(152.0, 8.0));
    }

    #[test]
    fn sub_threshold_distance_snaps_immediately() {
        let mut motion = Motion::at_rest(Vec2::new(15.5, 8.0), Vec2::splat(5.0));
        motion.start_move(Direction::Right, Vec2::new(16.0, 8.0));
        assert!(motion.tick());
        assert_eq!(motion.position(), Vec2::new(16.0, 8.0));
    }

    #[test]
    #[should_panic(expected = "start_move called while still moving")]
    #[cfg(debug_assertions)]
    fn double_start_is_asserted() {
        let mut motion = Motion::at_rest(Vec2::ZERO, Vec2::splat(1.0));
        motion.start_move(Direction::Down, Vec2::new(0.0, 16.0));
        motion.start_move(Direction::Down, Vec2::new(0.0, 32.0));
    }
}
