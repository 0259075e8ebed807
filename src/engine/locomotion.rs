//! Locomotion — turns directional intent into actor motion.
//!
//! The whole party moves as one: same speed, same facing, same animation
//! phase. The first actor is the primary actor that proximity and the camera
//! track.

use std::time::Duration;

use super::catalog::Point;

pub const MAX_ACTORS: usize = 3;
const GROUND_Y: f64 = 600.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationPhase {
    Idle,
    Walking,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorKind {
    Walker,
    Cat,
}

#[derive(Debug, Clone)]
pub struct Actor {
    pub name: String,
    pub kind: ActorKind,
    pub position: Point,
    pub velocity: f64,
    pub facing: Facing,
    pub phase: AnimationPhase,
    /// Current walk frame; 0 is the rest pose.
    pub frame: usize,
    frame_count: usize,
    frame_clock: Duration,
}

impl Actor {
    pub fn new(name: impl Into<String>, kind: ActorKind, x: f64, frame_count: usize) -> Self {
        Actor {
            name: name.into(),
            kind,
            position: Point::new(x, GROUND_Y),
            velocity: 0.0,
            facing: Facing::Right,
            phase: AnimationPhase::Idle,
            frame: 0,
            frame_count: frame_count.max(1),
            frame_clock: Duration::ZERO,
        }
    }

    fn rest(&mut self) {
        self.velocity = 0.0;
        self.phase = AnimationPhase::Idle;
        self.frame = 0;
        self.frame_clock = Duration::ZERO;
    }
}

/// Two walkers and a cat, trailing each other to the right.
pub fn default_party() -> Vec<Actor> {
    vec![
        Actor::new("walker-1", ActorKind::Walker, 230.0, 4),
        Actor::new("walker-2", ActorKind::Walker, 150.0, 4),
        Actor::new("cat", ActorKind::Cat, 80.0, 8),
    ]
}

#[derive(Debug, Clone)]
pub struct Locomotion {
    speed: f64,
    frame_time: Duration,
}

impl Locomotion {
    pub fn new(speed: f64, animation_fps: u32) -> Self {
        Locomotion {
            speed,
            frame_time: Duration::from_secs(1) / animation_fps.max(1),
        }
    }

    /// Apply one tick of motion. `direction` is -1, 0 or +1.
    pub fn update(&self, actors: &mut [Actor], direction: i8, dt: Duration, world_width: f64) {
        for actor in actors.iter_mut() {
            match direction {
                d if d < 0 => self.walk(actor, Facing::Left, -self.speed, dt),
                d if d > 0 => self.walk(actor, Facing::Right, self.speed, dt),
                _ => actor.rest(),
            }
            actor.position.x =
                (actor.position.x + actor.velocity * dt.as_secs_f64()).clamp(0.0, world_width);
        }
    }

    /// Stop everyone in place. Used while an overlay holds the screen.
    pub fn freeze(&self, actors: &mut [Actor]) {
        for actor in actors.iter_mut() {
            actor.rest();
        }
    }

    fn walk(&self, actor: &mut Actor, facing: Facing, velocity: f64, dt: Duration) {
        actor.velocity = velocity;
        actor.facing = facing;
        if actor.phase == AnimationPhase::Idle {
            actor.phase = AnimationPhase::Walking;
            actor.frame_clock = Duration::ZERO;
        } else {
            actor.frame_clock += dt;
        }
        while actor.frame_clock >= self.frame_time {
            actor.frame_clock -= self.frame_time;
            actor.frame = (actor.frame + 1) % actor.frame_count;
        }
    }
}
