//! Movement and proximity helpers shared by agent leaves.
//!
//! Everything here is a pure function over positions so leaves stay thin:
//! they read their agent's fields, call one of these, write the result back
//! and map it onto a [`Status`].

use bt_core::Status;

use crate::units::meters_to_pixels;
use crate::Vec2;

/// Result of one movement step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub position: Vec2,
    /// Heading of the step in radians.
    pub heading: f32,
}

/// Advances `speed * dt` pixels from `position` towards `target`.
///
/// The step never overshoots: when the target is closer than one step the
/// result lands exactly on it.
pub fn move_slightly_to(position: Vec2, target: Vec2, speed: f32, dt: f32) -> Step {
    let heading = position.heading_to(target);
    let reach = speed.max(0.0) * dt.max(0.0);
    let position = if position.distance(target) <= reach {
        target
    } else {
        position + Vec2::from_angle(heading) * reach
    };
    Step { position, heading }
}

/// Advances `speed * dt` pixels directly away from `threat`, staying inside
/// `bounds`.
pub fn move_away_from(
    position: Vec2,
    threat: Vec2,
    speed: f32,
    dt: f32,
    bounds: (Vec2, Vec2),
) -> Step {
    let heading = threat.heading_to(position);
    let reach = speed.max(0.0) * dt.max(0.0);
    let position = (position + Vec2::from_angle(heading) * reach).clamp(bounds.0, bounds.1);
    Step { position, heading }
}

/// `true` iff the distance between `a` and `b` is strictly below `radius_m`
/// meters.
pub fn distance_less_than(a: Vec2, b: Vec2, radius_m: f32) -> bool {
    let r = meters_to_pixels(radius_m);
    a.distance_squared(b) < r * r
}

/// `true` iff the distance between `a` and `b` is at most `radius_m` meters.
pub fn within(a: Vec2, b: Vec2, radius_m: f32) -> bool {
    let r = meters_to_pixels(radius_m);
    a.distance_squared(b) <= r * r
}

/// Moves one step towards `target` and reports arrival.
///
/// Returns `Success` once the new position is within `radius_m` meters of
/// the target, `Running` otherwise.
pub fn arrive(position: Vec2, target: Vec2, speed: f32, dt: f32, radius_m: f32) -> (Step, Status) {
    let step = move_slightly_to(position, target, speed, dt);
    let status = if within(step.position, target, radius_m) {
        Status::Success
    } else {
        Status::Running
    };
    (step, status)
}

/// Comparison predicate: `mine >= theirs`.
pub fn at_least(mine: u32, theirs: u32) -> bool {
    mine >= theirs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::PIXEL_PER_METER;

    #[test]
    fn step_never_overshoots() {
        let step = move_slightly_to(Vec2::ZERO, Vec2::new(3.0, 4.0), 100.0, 1.0);
        assert_eq!(step.position, Vec2::new(3.0, 4.0));
    }

    #[test]
    fn step_moves_speed_times_dt() {
        let step = move_slightly_to(Vec2::ZERO, Vec2::new(100.0, 0.0), 10.0, 0.5);
        assert!((step.position.x - 5.0).abs() < 1e-5);
        assert!(step.position.y.abs() < 1e-5);
        assert_eq!(step.heading, 0.0);
    }

    #[test]
    fn flee_points_away_and_respects_bounds() {
        let bounds = (Vec2::new(0.0, 0.0), Vec2::new(100.0, 100.0));
        let step = move_away_from(Vec2::new(50.0, 50.0), Vec2::new(40.0, 50.0), 10.0, 1.0, bounds);
        assert!((step.position.x - 60.0).abs() < 1e-4);

        let cornered = move_away_from(Vec2::new(99.0, 50.0), Vec2::new(90.0, 50.0), 10.0, 1.0, bounds);
        assert_eq!(cornered.position.x, 100.0);
    }

    #[test]
    fn proximity_boundary_is_exclusive() {
        let a = Vec2::ZERO;
        let at_radius = Vec2::new(PIXEL_PER_METER * 2.0, 0.0);
        assert!(!distance_less_than(a, at_radius, 2.0));
        assert!(distance_less_than(a, at_radius - Vec2::new(0.01, 0.0), 2.0));
        assert!(within(a, at_radius, 2.0));
    }

    #[test]
    fn comparison_is_inclusive() {
        assert!(at_least(3, 3));
        assert!(at_least(4, 3));
        assert!(!at_least(2, 3));
    }
}
