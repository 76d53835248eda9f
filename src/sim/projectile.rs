//! Projectile motion
//!
//! Every bullet is in exactly one motion mode. Ballistic and homing bullets
//! wrap around the screen; guided bullets walk their Bézier parameter and
//! freeze once they arrive.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::curve::plan_curve;
use super::geometry::{Obstacle, quadratic_bezier, wrap_point};
use super::state::{Asteroid, AsteroidId};
use crate::Tuning;
use crate::consts::TRAIL_LENGTH;

/// Curve-following state for a guided bullet
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Guidance {
    /// Re-validated every tick; a dead target drops the bullet to ballistic
    pub target: AsteroidId,
    /// Launch point (fixed for the whole flight)
    pub start: Vec2,
    pub control: Vec2,
    pub end: Vec2,
    /// Curve parameter in [0, 1]
    pub t: f32,
    pub step: f32,
}

impl Guidance {
    pub fn new(target: AsteroidId, start: Vec2) -> Self {
        Self {
            target,
            start,
            control: start,
            end: start,
            t: 0.0,
            step: 0.0,
        }
    }
}

/// Projectile motion mode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Motion {
    /// Straight line with screen wrap
    Ballistic,
    /// Turns toward the nearest asteroid at constant speed
    SteeringHoming,
    /// Follows a re-fitted Bézier toward a locked asteroid
    CurveGuided(Guidance),
    /// Guided flight finished; sits at the end point until it expires
    Complete,
}

/// A live bullet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub scale: f32,
    /// Upgrade tier (1-3)
    pub tier: u8,
    /// Ticks left to live
    pub life: i32,
    pub motion: Motion,
    /// Spawns a ricochet cascade on asteroid impact (Homing II+)
    pub ricochet_capable: bool,
    /// Spawned by a cascade; never cascades again
    pub ricochet_derived: bool,
    /// Recent positions, newest first
    #[serde(skip)]
    pub trail: Vec<Vec2>,
}

/// Per-tick inputs the motion model reads
#[derive(Debug, Clone, Copy)]
pub struct MotionContext<'a> {
    pub asteroids: &'a [Asteroid],
    /// Homing capability held by the player
    pub homing_active: bool,
    pub tuning: &'a Tuning,
}

impl Projectile {
    /// Plain bullet; bigger shots get a bigger hitbox and live longer
    pub fn new(pos: Vec2, vel: Vec2, scale: f32, tier: u8, tuning: &Tuning) -> Self {
        Self {
            pos,
            vel,
            radius: tuning.bullet_radius * scale,
            scale,
            tier,
            life: (tuning.bullet_lifespan as f32 * scale.max(1.0)).round() as i32,
            motion: Motion::Ballistic,
            ricochet_capable: false,
            ricochet_derived: false,
            trail: Vec::with_capacity(TRAIL_LENGTH),
        }
    }

    pub fn with_motion(mut self, motion: Motion) -> Self {
        self.motion = motion;
        self
    }

    /// Turn this bullet into a guided shot at `target`
    pub fn guided_at(self, target: AsteroidId) -> Self {
        let start = self.pos;
        self.with_motion(Motion::CurveGuided(Guidance::new(target, start)))
    }

    pub fn is_dead(&self) -> bool {
        self.life <= 0
    }

    pub fn guidance(&self) -> Option<&Guidance> {
        match &self.motion {
            Motion::CurveGuided(g) => Some(g),
            _ => None,
        }
    }

    /// Record current position to trail
    pub fn record_trail(&mut self) {
        self.trail.insert(0, self.pos);
        if self.trail.len() > TRAIL_LENGTH {
            self.trail.pop();
        }
    }

    /// Advance one tick
    pub fn update(&mut self, ctx: &MotionContext<'_>) {
        match self.motion {
            Motion::Ballistic => self.advance_ballistic(ctx.tuning),
            Motion::SteeringHoming => {
                if ctx.homing_active {
                    if let Some(target) = nearest_asteroid(self.pos, ctx.asteroids) {
                        self.steer_towards(target.pos, ctx.tuning.max_turn_rate);
                    }
                }
                self.advance_ballistic(ctx.tuning);
            }
            Motion::CurveGuided(guidance) => self.advance_guided(guidance, ctx),
            Motion::Complete => {}
        }
        self.life -= 1;
    }

    fn advance_ballistic(&mut self, tuning: &Tuning) {
        self.pos += self.vel;
        self.pos = wrap_point(self.pos, tuning.screen_width, tuning.screen_height);
    }

    /// Bend velocity toward `target` without changing speed
    ///
    /// The steering vector is capped at `max_force`, which bounds how far the
    /// heading can swing in one tick.
    pub fn steer_towards(&mut self, target: Vec2, max_force: f32) {
        let speed = self.vel.length();
        if speed < 1e-6 {
            return;
        }
        let desired = (target - self.pos).normalize_or_zero() * speed;
        if desired == Vec2::ZERO {
            return;
        }
        let steering = (desired - self.vel).clamp_length_max(max_force);
        let turned = (self.vel + steering).normalize_or_zero();
        if turned != Vec2::ZERO {
            self.vel = turned * speed;
        }
    }

    fn advance_guided(&mut self, mut guidance: Guidance, ctx: &MotionContext<'_>) {
        let Some(target) = ctx.asteroids.iter().find(|a| a.id == guidance.target) else {
            log::debug!("Guided target {:?} gone, continuing ballistic", guidance.target);
            // Keep flying the way the curve was heading
            if let Some(&prev) = self.trail.first() {
                let heading = (self.pos - prev).normalize_or_zero();
                if heading != Vec2::ZERO {
                    self.vel = heading * self.vel.length();
                }
            }
            self.motion = Motion::Ballistic;
            self.advance_ballistic(ctx.tuning);
            return;
        };

        let obstacles: Vec<Obstacle> = ctx
            .asteroids
            .iter()
            .filter(|a| a.id != guidance.target)
            .map(Asteroid::as_obstacle)
            .collect();
        let plan = plan_curve(guidance.start, self.vel, target.as_obstacle(), &obstacles, ctx.tuning);
        guidance.control = plan.control;
        guidance.end = plan.end;
        guidance.step = plan.step;

        self.record_trail();
        guidance.t += guidance.step;

        if guidance.t >= 1.0 {
            self.pos = guidance.end;
            self.motion = Motion::Complete;
        } else {
            self.pos = quadratic_bezier(guidance.start, guidance.control, guidance.end, guidance.t);
            self.motion = Motion::CurveGuided(guidance);
        }
    }
}

/// Closest asteroid by center distance
pub fn nearest_asteroid(pos: Vec2, asteroids: &[Asteroid]) -> Option<&Asteroid> {
    asteroids.iter().min_by(|a, b| {
        a.pos
            .distance_squared(pos)
            .partial_cmp(&b.pos.distance_squared(pos))
            .unwrap_or(std::cmp::Ordering::Equal)
    })
}
