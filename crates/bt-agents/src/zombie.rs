//! Zombie agent.
//!
//! A zombie owns exactly one behavior tree, built from its [`Strategy`] when
//! the zombie is created. The tree's leaves are thin wrappers around the
//! methods of [`ZombieBody`]; the body is the context the tree is ticked with,
//! so leaves mutate nothing but their own zombie.

use core::fmt;
use core::str::FromStr;

use bt_core::{DeterministicRng, SplitMix64, Status};
use bt_engine::{selector, sequence, Action, BehaviorTree, Condition, Node, Resume, Sequence};
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::steering::{arrive, at_least, distance_less_than, move_away_from, Step};
use crate::units::{kmph_to_pps, RUN_SPEED_KMPH};
use crate::world::{Arena, Frame};
use crate::{AgentError, AgentSnapshot, Rect, Result, Vec2};

/// Collision group that awards a ball to a zombie.
pub const BALL_GROUP: &str = "zombie:ball";

/// Half the side of a zombie's bounding box, in pixels.
pub const HALF_EXTENT: f32 = 50.0;

/// Radius (meters) within which the quarry counts as nearby.
pub const SIGHT_RADIUS_M: f32 = 7.0;

/// Arrival tolerance (meters) for movement leaves.
pub const ARRIVAL_RADIUS_M: f32 = 0.5;

/// Where `TargetLocation` sends the zombie.
pub const FIXED_TARGET: (f32, f32) = (500.0, 50.0);

pub const DEFAULT_PATROL_ROUTE: [(f32, f32); 7] = [
    (43.0, 274.0),
    (1118.0, 274.0),
    (1050.0, 494.0),
    (575.0, 804.0),
    (235.0, 991.0),
    (575.0, 804.0),
    (1050.0, 494.0),
];

const SPAWN_STREAM: u64 = 1;
const WANDER_STREAM: u64 = 2;

/// Which tree a zombie builds for itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Strategy {
    /// Walk to a fixed point, then pick it again.
    TargetLocation,
    /// Pick random destinations and walk to them.
    Wander,
    /// Chase the quarry when it is close, wander otherwise.
    ChaseOrWander,
    /// Cycle through the patrol route.
    #[default]
    Patrol,
    /// Chase the quarry if holding at least as many balls, flee if not,
    /// patrol when it is out of sight.
    ChaseOrFlee,
}

impl Strategy {
    pub const ALL: [Strategy; 5] = [
        Strategy::TargetLocation,
        Strategy::Wander,
        Strategy::ChaseOrWander,
        Strategy::Patrol,
        Strategy::ChaseOrFlee,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::TargetLocation => "target_location",
            Strategy::Wander => "wander",
            Strategy::ChaseOrWander => "chase_or_wander",
            Strategy::Patrol => "patrol",
            Strategy::ChaseOrFlee => "chase_or_flee",
        }
    }

    fn uses_patrol(self) -> bool {
        matches!(self, Strategy::Patrol | Strategy::ChaseOrFlee)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().replace('-', "_").to_ascii_lowercase();
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == wanted)
            .ok_or_else(|| format!("unknown strategy `{s}`"))
    }
}

/// Animation pose; rendering lives elsewhere, the tree only flips it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Pose {
    #[default]
    Idle,
    Walk,
}

/// How to create a zombie.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ZombieSpec {
    pub id: u64,
    /// Registry name; `zombie-<id>` when absent.
    pub name: Option<String>,
    /// Spawn point; random inside the arena margin when absent.
    pub position: Option<Vec2>,
    pub strategy: Strategy,
    pub speed_kmph: f32,
    /// Patrol route; the built-in route when absent.
    pub patrol: Option<Vec<Vec2>>,
    /// Registry name of the agent this zombie chases or flees from.
    pub quarry: String,
}

impl Default for ZombieSpec {
    fn default() -> Self {
        Self {
            id: 0,
            name: None,
            position: None,
            strategy: Strategy::default(),
            speed_kmph: RUN_SPEED_KMPH,
            patrol: None,
            quarry: "boy".to_string(),
        }
    }
}

impl ZombieSpec {
    pub fn new(id: u64, strategy: Strategy) -> Self {
        Self {
            id,
            strategy,
            ..Self::default()
        }
    }

    pub fn at(mut self, position: Vec2) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_patrol(mut self, route: Vec<Vec2>) -> Self {
        self.patrol = Some(route);
        self
    }

    pub fn registry_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("zombie-{}", self.id))
    }
}

/// What a zombie knows about the world this frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Senses {
    pub dt: f32,
    pub arena: Arena,
    pub quarry: Option<AgentSnapshot>,
}

impl Senses {
    pub fn gather(frame: &Frame<'_>, quarry: &str) -> Self {
        Self {
            dt: frame.ctx.dt_seconds,
            arena: frame.arena,
            quarry: frame.registry.by_name(quarry).cloned(),
        }
    }
}

/// Zombie state and the behaviors its tree is wired to.
///
/// Every leaf method reads and writes only this struct and returns a
/// [`Status`]; none of them block.
#[derive(Debug, Clone)]
pub struct ZombieBody {
    pub id: u64,
    pub name: String,
    pub position: Vec2,
    /// Heading in radians of the last step.
    pub heading: f32,
    /// Current speed in pixels per second.
    pub speed: f32,
    /// Speed used whenever the zombie moves, in pixels per second.
    pub run_speed: f32,
    pub pose: Pose,
    pub target: Vec2,
    pub ball_count: u32,
    pub patrol: Vec<Vec2>,
    pub patrol_cursor: usize,
    pub senses: Senses,
    rng: SplitMix64,
}

impl ZombieBody {
    pub fn new(id: u64, name: impl Into<String>, position: Vec2, run_speed: f32, seed: u64) -> Self {
        Self {
            id,
            name: name.into(),
            position,
            heading: 0.0,
            speed: 0.0,
            run_speed,
            pose: Pose::Idle,
            target: Vec2::new(1000.0, 1000.0),
            ball_count: 0,
            patrol: DEFAULT_PATROL_ROUTE.iter().copied().map(Vec2::from).collect(),
            patrol_cursor: 0,
            senses: Senses::default(),
            rng: SplitMix64::for_stream(seed, id, WANDER_STREAM),
        }
    }

    fn apply(&mut self, step: Step) {
        self.position = step.position;
        self.heading = step.heading;
        self.speed = self.run_speed;
        self.pose = Pose::Walk;
    }

    /// Sets the movement target.
    ///
    /// A missing coordinate is an ordinary failure. A non-finite coordinate
    /// means the tree was wired with bad arguments and is an error.
    pub fn set_target_location(&mut self, x: Option<f32>, y: Option<f32>) -> Result<Status> {
        let (Some(x), Some(y)) = (x, y) else {
            return Ok(Status::Failure);
        };
        if !x.is_finite() || !y.is_finite() {
            return Err(AgentError::InvalidTarget { x, y });
        }
        self.target = Vec2::new(x, y);
        debug!(zombie = %self.name, x, y, "target set");
        Ok(Status::Success)
    }

    /// One step towards the current target.
    pub fn move_to(&mut self, radius_m: f32) -> Status {
        let (step, status) = arrive(self.position, self.target, self.run_speed, self.senses.dt, radius_m);
        self.apply(step);
        status
    }

    /// Picks a random destination inside the arena margin.
    pub fn set_random_location(&mut self) -> Status {
        let (min, max) = self.senses.arena.wander_bounds();
        let x = self.rng.range_inclusive(min.x as i32, max.x as i32);
        let y = self.rng.range_inclusive(min.y as i32, max.y as i32);
        self.target = Vec2::new(x as f32, y as f32);
        debug!(zombie = %self.name, x, y, "random destination");
        Status::Success
    }

    pub fn is_boy_nearby(&self, radius_m: f32) -> bool {
        self.senses
            .quarry
            .as_ref()
            .is_some_and(|q| distance_less_than(q.position, self.position, radius_m))
    }

    /// One step towards the quarry; fails when the quarry is unknown.
    pub fn move_to_boy(&mut self, radius_m: f32) -> Status {
        let Some(goal) = self.senses.quarry.as_ref().map(|q| q.position) else {
            return Status::Failure;
        };
        let (step, status) = arrive(self.position, goal, self.run_speed, self.senses.dt, radius_m);
        self.apply(step);
        status
    }

    /// Targets the patrol point under the cursor.
    ///
    /// The cursor only moves in [`next_patrol_point`](Self::next_patrol_point),
    /// so a patrol interrupted on the way resumes towards the same point.
    pub fn get_patrol_location(&mut self) -> Result<Status> {
        let Some(&point) = self.patrol.get(self.patrol_cursor) else {
            return Ok(Status::Failure);
        };
        if !point.is_finite() {
            return Err(AgentError::InvalidTarget {
                x: point.x,
                y: point.y,
            });
        }
        self.target = point;
        debug!(zombie = %self.name, x = point.x, y = point.y, cursor = self.patrol_cursor, "patrol point");
        Ok(Status::Success)
    }

    /// Advances the cursor once the current patrol point is reached.
    pub fn next_patrol_point(&mut self) -> Status {
        if self.patrol.is_empty() {
            return Status::Failure;
        }
        self.patrol_cursor = (self.patrol_cursor + 1) % self.patrol.len();
        Status::Success
    }

    /// Comparison: this zombie holds at least as many balls as the quarry.
    pub fn has_more_balls_than_boy(&self) -> bool {
        self.senses
            .quarry
            .as_ref()
            .is_some_and(|q| at_least(self.ball_count, q.ball_count))
    }

    /// One step directly away from the quarry. Never finishes on its own.
    pub fn flee_from_boy(&mut self) -> Status {
        let Some(threat) = self.senses.quarry.as_ref().map(|q| q.position) else {
            return Status::Failure;
        };
        let step = move_away_from(
            self.position,
            threat,
            self.run_speed,
            self.senses.dt,
            self.senses.arena.bounds(),
        );
        self.apply(step);
        Status::Running
    }
}

type Branch = Box<dyn Node<ZombieBody>>;

fn boxed(node: impl Node<ZombieBody>) -> Branch {
    Box::new(node)
}

fn move_to_target() -> Branch {
    boxed(Action::bind(
        "Move to",
        |z: &mut ZombieBody, &r: &f32| z.move_to(r),
        ARRIVAL_RADIUS_M,
    ))
}

fn boy_nearby() -> Branch {
    boxed(Condition::bind(
        "Is Boy Nearby",
        |z: &ZombieBody, &r: &f32| z.is_boy_nearby(r),
        SIGHT_RADIUS_M,
    ))
}

fn approach_boy() -> Branch {
    boxed(Action::bind(
        "Approach to boy",
        |z: &mut ZombieBody, &r: &f32| z.move_to_boy(r),
        ARRIVAL_RADIUS_M,
    ))
}

fn target_location() -> bt_core::Result<Branch> {
    let set_target = Action::try_bind(
        "Set Target Location",
        |z: &mut ZombieBody, &(x, y): &(Option<f32>, Option<f32>)| {
            z.set_target_location(x, y).map_err(Into::into)
        },
        (Some(FIXED_TARGET.0), Some(FIXED_TARGET.1)),
    );
    sequence("Move to Target Location", vec![boxed(set_target), move_to_target()])
}

fn wander() -> bt_core::Result<Branch> {
    let pick = Action::new("Set Random Location", |z: &mut ZombieBody| z.set_random_location());
    sequence("Move to Wander", vec![boxed(pick), move_to_target()])
}

fn patrol() -> bt_core::Result<Branch> {
    let get = Action::try_new("Get Patrol Location", |z: &mut ZombieBody| {
        z.get_patrol_location().map_err(Into::into)
    });
    let advance = Action::new("Next Patrol Point", |z: &mut ZombieBody| z.next_patrol_point());
    sequence("Patrol", vec![boxed(get), move_to_target(), boxed(advance)])
}

fn chase_or_wander() -> bt_core::Result<Branch> {
    let chase = sequence("Move to boy", vec![boy_nearby(), approach_boy()])?;
    selector("Chase or Wander", vec![chase, wander()?])
}

fn chase_or_flee() -> bt_core::Result<Branch> {
    let more_balls = Condition::new("Has More Balls", |z: &ZombieBody| z.has_more_balls_than_boy());
    let run_away = Action::new("Run Away", |z: &mut ZombieBody| z.flee_from_boy());
    // Guards are re-checked every tick so a chase or flight stops as soon as
    // the quarry leaves sight.
    let chase = Sequence::new("Chase boy", vec![boy_nearby(), boxed(more_balls), approach_boy()])?
        .with_resume(Resume::Rescan);
    let flee = Sequence::new("Flee boy", vec![boy_nearby(), boxed(run_away)])?
        .with_resume(Resume::Rescan);
    selector("Chase or Flee", vec![boxed(chase), boxed(flee), patrol()?])
}

/// Builds the tree for `strategy`.
pub fn build_tree(strategy: Strategy) -> bt_core::Result<BehaviorTree<ZombieBody>> {
    let root = match strategy {
        Strategy::TargetLocation => target_location()?,
        Strategy::Wander => wander()?,
        Strategy::ChaseOrWander => chase_or_wander()?,
        Strategy::Patrol => patrol()?,
        Strategy::ChaseOrFlee => chase_or_flee()?,
    };
    Ok(BehaviorTree::new(root))
}

/// A zombie: its body plus the tree that drives it.
pub struct Zombie {
    body: ZombieBody,
    strategy: Strategy,
    quarry: String,
    brain: BehaviorTree<ZombieBody>,
}

impl Zombie {
    /// Creates a zombie and builds its tree.
    ///
    /// # Errors
    ///
    /// - [`AgentError::EmptyPatrolRoute`] if the strategy patrols over an
    ///   empty route
    /// - [`AgentError::Tree`] if the tree cannot be built
    pub fn new(spec: &ZombieSpec, seed: u64, arena: Arena) -> Result<Self> {
        let name = spec.registry_name();
        let position = match spec.position {
            Some(p) => p,
            None => {
                let mut rng = SplitMix64::for_stream(seed, spec.id, SPAWN_STREAM);
                let (min, max) = arena.wander_bounds();
                Vec2::new(
                    rng.range_inclusive(min.x as i32, max.x as i32) as f32,
                    rng.range_inclusive(min.y as i32, max.y as i32) as f32,
                )
            }
        };

        let mut body = ZombieBody::new(spec.id, name.clone(), position, kmph_to_pps(spec.speed_kmph), seed);
        if let Some(route) = &spec.patrol {
            body.patrol = route.clone();
        }
        if spec.strategy.uses_patrol() && body.patrol.is_empty() {
            return Err(AgentError::EmptyPatrolRoute(name));
        }
        body.senses.arena = arena;

        let brain = build_tree(spec.strategy)?;
        debug!(zombie = %name, strategy = %spec.strategy, "behavior tree built");

        Ok(Self {
            body,
            strategy: spec.strategy,
            quarry: spec.quarry.clone(),
            brain,
        })
    }

    /// Per-frame update: refresh senses from the registry, then run the tree once.
    ///
    /// # Errors
    ///
    /// Errors raised by leaves abort the update and are returned as
    /// [`AgentError::Tree`].
    pub fn update(&mut self, frame: &Frame<'_>) -> Result<Status> {
        self.body.senses = Senses::gather(frame, &self.quarry);
        Ok(self.brain.run(&mut self.body)?)
    }

    pub fn handle_collision(&mut self, group: &str) {
        if group == BALL_GROUP {
            self.body.ball_count += 1;
            debug!(zombie = %self.body.name, balls = self.body.ball_count, "ball collected");
        }
    }

    pub fn bounding_box(&self) -> Rect {
        Rect::around(self.body.position, HALF_EXTENT)
    }

    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            id: self.body.id,
            name: self.body.name.clone(),
            position: self.body.position,
            ball_count: self.body.ball_count,
        }
    }

    pub fn id(&self) -> u64 {
        self.body.id
    }

    pub fn name(&self) -> &str {
        &self.body.name
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn body(&self) -> &ZombieBody {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut ZombieBody {
        &mut self.body
    }

    pub fn brain(&self) -> &BehaviorTree<ZombieBody> {
        &self.brain
    }
}

impl fmt::Debug for Zombie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Zombie")
            .field("body", &self.body)
            .field("strategy", &self.strategy)
            .field("quarry", &self.quarry)
            .field("brain", &self.brain)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body() -> ZombieBody {
        let mut z = ZombieBody::new(1, "zombie-1", Vec2::new(100.0, 100.0), 100.0, 7);
        z.senses.dt = 0.1;
        z.senses.arena = Arena::default();
        z
    }

    fn quarry_at(position: Vec2, ball_count: u32) -> Option<AgentSnapshot> {
        Some(AgentSnapshot {
            id: 99,
            name: "boy".into(),
            position,
            ball_count,
        })
    }

    #[test]
    fn missing_target_coordinate_fails_without_error() {
        let mut z = body();
        assert_eq!(z.set_target_location(None, Some(1.0)).unwrap(), Status::Failure);
        assert_eq!(z.target, Vec2::new(1000.0, 1000.0));
    }

    #[test]
    fn non_finite_target_is_an_error() {
        let mut z = body();
        assert!(matches!(
            z.set_target_location(Some(f32::NAN), Some(1.0)),
            Err(AgentError::InvalidTarget { .. })
        ));
    }

    #[test]
    fn target_sets_both_coordinates() {
        let mut z = body();
        assert_eq!(z.set_target_location(Some(500.0), Some(50.0)).unwrap(), Status::Success);
        assert_eq!(z.target, Vec2::new(500.0, 50.0));
    }

    #[test]
    fn patrol_cursor_wraps() {
        let mut z = body();
        z.patrol = vec![Vec2::new(1.0, 1.0), Vec2::new(2.0, 2.0)];
        let mut seen = Vec::new();
        for _ in 0..5 {
            assert_eq!(z.get_patrol_location().unwrap(), Status::Success);
            assert_eq!(z.get_patrol_location().unwrap(), Status::Success);
            seen.push(z.target.x);
            assert_eq!(z.next_patrol_point(), Status::Success);
        }
        assert_eq!(seen, vec![1.0, 2.0, 1.0, 2.0, 1.0]);

        z.patrol.clear();
        z.patrol_cursor = 0;
        assert_eq!(z.get_patrol_location().unwrap(), Status::Failure);
        assert_eq!(z.next_patrol_point(), Status::Failure);
    }

    #[test]
    fn non_finite_patrol_point_is_an_error() {
        let mut z = body();
        z.patrol = vec![Vec2::new(f32::NAN, 200.0)];
        let before = z.target;
        assert!(matches!(
            z.get_patrol_location(),
            Err(AgentError::InvalidTarget { y, .. }) if y == 200.0
        ));
        assert_eq!(z.target, before);
    }

    #[test]
    fn random_location_stays_in_margin() {
        let mut z = body();
        for _ in 0..200 {
            z.set_random_location();
            assert!((100.0..=1180.0).contains(&z.target.x));
            assert!((100.0..=924.0).contains(&z.target.y));
        }
    }

    #[test]
    fn quarry_leaves_fail_without_quarry() {
        let mut z = body();
        assert!(!z.is_boy_nearby(SIGHT_RADIUS_M));
        assert!(!z.has_more_balls_than_boy());
        assert_eq!(z.move_to_boy(ARRIVAL_RADIUS_M), Status::Failure);
        assert_eq!(z.flee_from_boy(), Status::Failure);
        assert_eq!(z.position, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn ball_comparison_reads_quarry_counter() {
        let mut z = body();
        z.ball_count = 2;
        z.senses.quarry = quarry_at(Vec2::ZERO, 2);
        assert!(z.has_more_balls_than_boy());
        z.senses.quarry = quarry_at(Vec2::ZERO, 3);
        assert!(!z.has_more_balls_than_boy());
    }

    #[test]
    fn fleeing_increases_distance() {
        let mut z = body();
        z.senses.quarry = quarry_at(Vec2::new(90.0, 100.0), 0);
        let before = z.position.distance(Vec2::new(90.0, 100.0));
        assert_eq!(z.flee_from_boy(), Status::Running);
        assert!(z.position.distance(Vec2::new(90.0, 100.0)) > before);
        assert_eq!(z.pose, Pose::Walk);
    }

    #[test]
    fn strategy_names_round_trip() {
        for strategy in Strategy::ALL {
            assert_eq!(strategy.as_str().parse::<Strategy>().unwrap(), strategy);
        }
        assert_eq!("chase-or-flee".parse::<Strategy>().unwrap(), Strategy::ChaseOrFlee);
        assert!("sleep".parse::<Strategy>().is_err());
    }

    #[test]
    fn every_strategy_builds() {
        for strategy in Strategy::ALL {
            let tree = build_tree(strategy).unwrap();
            assert!(tree.to_string().lines().count() >= 3, "{strategy}");
        }
    }

    #[test]
    fn empty_patrol_route_is_rejected() {
        let spec = ZombieSpec::new(3, Strategy::Patrol).with_patrol(Vec::new());
        assert!(matches!(
            Zombie::new(&spec, 0, Arena::default()),
            Err(AgentError::EmptyPatrolRoute(name)) if name == "zombie-3"
        ));
    }

    #[test]
    fn collisions_only_count_ball_group() {
        let mut zombie = Zombie::new(&ZombieSpec::new(1, Strategy::Wander), 0, Arena::default()).unwrap();
        zombie.handle_collision("zombie:boy");
        zombie.handle_collision(BALL_GROUP);
        assert_eq!(zombie.snapshot().ball_count, 1);
        assert_eq!(zombie.bounding_box(), Rect::around(zombie.body().position, 50.0));
    }
}
