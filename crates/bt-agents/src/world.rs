//! Frame loop.
//!
//! [`World::step`] is the only place agents are advanced. Each step:
//!
//! 1. publishes every agent's snapshot into the registry
//! 2. moves the boy along his loop
//! 3. runs each zombie's tree once, in ascending id order
//! 4. hands out balls whose box overlaps an agent's box
//! 5. republishes, so the next step and any observer see the new state

use bt_core::{Status, TickContext};
use tracing::{debug, trace};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    boy, zombie, AgentError, AgentSnapshot, Boy, BoySpec, Rect, Registry, Result, Vec2, Zombie,
    ZombieSpec,
};

/// Half the side of a ball's bounding box, in pixels.
pub const BALL_HALF_EXTENT: f32 = 10.0;

/// Playing field in pixels, origin at the bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Arena {
    pub width: f32,
    pub height: f32,
    /// Distance from the edges that random destinations keep.
    pub margin: f32,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 1024.0,
            margin: 100.0,
        }
    }
}

impl Arena {
    pub fn bounds(&self) -> (Vec2, Vec2) {
        (Vec2::ZERO, Vec2::new(self.width, self.height))
    }

    /// Area random destinations are drawn from.
    pub fn wander_bounds(&self) -> (Vec2, Vec2) {
        let m = self.margin.clamp(0.0, self.width.min(self.height) / 2.0);
        (Vec2::new(m, m), Vec2::new(self.width - m, self.height - m))
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Ball {
    pub position: Vec2,
    /// Registry name of whoever picked the ball up.
    pub taken_by: Option<String>,
}

impl Ball {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            taken_by: None,
        }
    }

    pub fn bounding_box(&self) -> Rect {
        Rect::around(self.position, BALL_HALF_EXTENT)
    }

    pub fn is_free(&self) -> bool {
        self.taken_by.is_none()
    }
}

/// Everything an agent may look at while it updates.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub ctx: TickContext,
    pub arena: Arena,
    pub registry: &'a Registry,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ZombieReport {
    pub id: u64,
    pub name: String,
    pub status: Status,
    pub position: Vec2,
    pub ball_count: u32,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Pickup {
    /// Index into [`World::balls`].
    pub ball: usize,
    pub by: String,
}

/// Outcome of one [`World::step`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct StepReport {
    pub tick: u64,
    pub boy: AgentSnapshot,
    pub zombies: Vec<ZombieReport>,
    pub pickups: Vec<Pickup>,
}

impl StepReport {
    pub fn zombie(&self, id: u64) -> Option<&ZombieReport> {
        self.zombies.iter().find(|z| z.id == id)
    }
}

pub struct World {
    /// Context of the next step; its `dt_seconds` is replaced on every step.
    ctx: TickContext,
    arena: Arena,
    registry: Registry,
    boy: Boy,
    zombies: Vec<Zombie>,
    balls: Vec<Ball>,
}

impl World {
    /// Creates the boy and the zombies and registers them all.
    ///
    /// # Errors
    ///
    /// - [`AgentError::DuplicateAgent`] if two agents share an id or a name
    /// - [`AgentError::UnknownAgent`] if a zombie's quarry is not one of the
    ///   agents
    /// - whatever [`Zombie::new`] reports
    pub fn new(
        arena: Arena,
        seed: u64,
        boy: &BoySpec,
        zombies: &[ZombieSpec],
        balls: &[Vec2],
    ) -> Result<Self> {
        let boy = Boy::new(boy);
        let mut registry = Registry::new();
        registry.register(boy.snapshot())?;

        let mut built = zombies
            .iter()
            .map(|spec| Zombie::new(spec, seed, arena))
            .collect::<Result<Vec<_>>>()?;
        built.sort_by_key(Zombie::id);
        for zombie in &built {
            registry.register(zombie.snapshot())?;
        }
        for spec in zombies {
            if registry.by_name(&spec.quarry).is_none() {
                return Err(AgentError::UnknownAgent(spec.quarry.clone()));
            }
        }

        debug!(zombies = built.len(), balls = balls.len(), seed, "world created");
        Ok(Self {
            ctx: TickContext::new(0, 0.0, seed),
            arena,
            registry,
            boy,
            zombies: built,
            balls: balls.iter().copied().map(Ball::new).collect(),
        })
    }

    /// Advances every agent by one frame of `dt` seconds.
    ///
    /// # Errors
    ///
    /// [`AgentError::Tree`] if a zombie's tree raised a leaf error. Zombies
    /// after it in id order are not updated that step.
    pub fn step(&mut self, dt: f32) -> Result<StepReport> {
        let ctx = TickContext {
            dt_seconds: dt,
            ..self.ctx
        };
        self.publish()?;

        self.boy.update(dt);

        let mut reports = Vec::with_capacity(self.zombies.len());
        let frame = Frame {
            ctx,
            arena: self.arena,
            registry: &self.registry,
        };
        for zombie in &mut self.zombies {
            let status = zombie.update(&frame)?;
            trace!(zombie = %zombie.name(), %status, tick = ctx.tick, "zombie updated");
            reports.push(status);
        }

        let pickups = self.collect_balls();
        self.publish()?;
        self.ctx = ctx.next();

        let zombies = self
            .zombies
            .iter()
            .zip(reports)
            .map(|(zombie, status)| {
                let body = zombie.body();
                ZombieReport {
                    id: body.id,
                    name: body.name.clone(),
                    status,
                    position: body.position,
                    ball_count: body.ball_count,
                }
            })
            .collect();

        Ok(StepReport {
            tick: ctx.tick,
            boy: self.boy.snapshot(),
            zombies,
            pickups,
        })
    }

    fn publish(&mut self) -> Result<()> {
        self.registry.publish(self.boy.snapshot())?;
        for zombie in &self.zombies {
            self.registry.publish(zombie.snapshot())?;
        }
        Ok(())
    }

    /// The boy gets first pick, then zombies in id order.
    fn collect_balls(&mut self) -> Vec<Pickup> {
        let mut pickups = Vec::new();
        for (index, ball) in self.balls.iter_mut().enumerate() {
            if !ball.is_free() {
                continue;
            }
            let area = ball.bounding_box();
            let by = if self.boy.bounding_box().overlaps(&area) {
                self.boy.handle_collision(boy::BALL_GROUP);
                self.boy.name().to_string()
            } else if let Some(zombie) = self
                .zombies
                .iter_mut()
                .find(|z| z.bounding_box().overlaps(&area))
            {
                zombie.handle_collision(zombie::BALL_GROUP);
                zombie.name().to_string()
            } else {
                continue;
            };
            ball.taken_by = Some(by.clone());
            pickups.push(Pickup { ball: index, by });
        }
        pickups
    }

    /// Number of completed steps.
    pub fn tick(&self) -> u64 {
        self.ctx.tick
    }

    pub fn seed(&self) -> u64 {
        self.ctx.seed
    }

    pub fn arena(&self) -> Arena {
        self.arena
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn boy(&self) -> &Boy {
        &self.boy
    }

    /// Zombies in ascending id order.
    pub fn zombies(&self) -> &[Zombie] {
        &self.zombies
    }

    pub fn zombie(&self, id: u64) -> Option<&Zombie> {
        self.zombies.iter().find(|z| z.id() == id)
    }

    pub fn zombie_mut(&mut self, id: u64) -> Option<&mut Zombie> {
        self.zombies.iter_mut().find(|z| z.id() == id)
    }

    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }
}

impl core::fmt::Debug for World {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("World")
            .field("ctx", &self.ctx)
            .field("arena", &self.arena)
            .field("boy", &self.boy)
            .field("zombies", &self.zombies.len())
            .field("balls", &self.balls.len())
            .finish()
    }
}
