//! Scripted quarry.
//!
//! The boy has no tree. He walks his waypoint loop forever so zombies have
//! something predictable to chase, flee from and compare ball counts with.

use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::steering::{move_slightly_to, within};
use crate::units::{kmph_to_pps, WALK_SPEED_KMPH};
use crate::{AgentSnapshot, Rect, Vec2};

/// Collision group that awards a ball to the boy.
pub const BALL_GROUP: &str = "boy:ball";

pub const HALF_EXTENT: f32 = 50.0;

const WAYPOINT_RADIUS_M: f32 = 0.5;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BoySpec {
    pub id: u64,
    pub name: String,
    pub position: Vec2,
    pub speed_kmph: f32,
    pub waypoints: Vec<Vec2>,
}

impl Default for BoySpec {
    fn default() -> Self {
        Self {
            id: 0,
            name: "boy".to_string(),
            position: Vec2::new(640.0, 512.0),
            speed_kmph: WALK_SPEED_KMPH,
            waypoints: vec![
                Vec2::new(200.0, 200.0),
                Vec2::new(1080.0, 200.0),
                Vec2::new(1080.0, 824.0),
                Vec2::new(200.0, 824.0),
            ],
        }
    }
}

#[derive(Debug, Clone)]
pub struct Boy {
    id: u64,
    name: String,
    position: Vec2,
    heading: f32,
    speed: f32,
    waypoints: Vec<Vec2>,
    cursor: usize,
    ball_count: u32,
}

impl Boy {
    pub fn new(spec: &BoySpec) -> Self {
        Self {
            id: spec.id,
            name: spec.name.clone(),
            position: spec.position,
            heading: 0.0,
            speed: kmph_to_pps(spec.speed_kmph),
            waypoints: spec.waypoints.clone(),
            cursor: 0,
            ball_count: 0,
        }
    }

    /// Walks one step towards the current waypoint, moving on to the next one
    /// on arrival. Stands still without waypoints.
    pub fn update(&mut self, dt: f32) {
        let Some(&goal) = self.waypoints.get(self.cursor) else {
            return;
        };
        let step = move_slightly_to(self.position, goal, self.speed, dt);
        self.position = step.position;
        self.heading = step.heading;
        if within(self.position, goal, WAYPOINT_RADIUS_M) {
            self.cursor = (self.cursor + 1) % self.waypoints.len();
            debug!(boy = %self.name, cursor = self.cursor, "waypoint reached");
        }
    }

    pub fn handle_collision(&mut self, group: &str) {
        if group == BALL_GROUP {
            self.ball_count += 1;
            debug!(boy = %self.name, balls = self.ball_count, "ball collected");
        }
    }

    pub fn bounding_box(&self) -> Rect {
        Rect::around(self.position, HALF_EXTENT)
    }

    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            id: self.id,
            name: self.name.clone(),
            position: self.position,
            ball_count: self.ball_count,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn heading(&self) -> f32 {
        self.heading
    }

    pub fn ball_count(&self) -> u32 {
        self.ball_count
    }
}
