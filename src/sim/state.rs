//! World state and entity types
//!
//! The world owns every collection. Other modules only ever hold an
//! [`AsteroidId`] across ticks and resolve it again before use.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geometry::{Obstacle, wrap_point_buffered};
use super::projectile::Projectile;
use super::targeting::Targeting;
use crate::Tuning;
use crate::consts::*;
use crate::from_angle;

/// Stable asteroid handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AsteroidId(pub u32);

/// Asteroid category: the three portfolio sections plus filler rocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AsteroidKind {
    Work,
    About,
    Resume,
    Neutral,
}

impl AsteroidKind {
    /// Section asteroids open a portal when destroyed
    pub fn is_section(&self) -> bool {
        !matches!(self, AsteroidKind::Neutral)
    }
}

/// Asteroid size classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AsteroidSize {
    Small,
    Medium,
    Large,
}

impl AsteroidSize {
    pub fn radius(&self) -> f32 {
        match self {
            AsteroidSize::Small => ASTEROID_SMALL,
            AsteroidSize::Medium => ASTEROID_MEDIUM,
            AsteroidSize::Large => ASTEROID_LARGE,
        }
    }
}

/// An asteroid: target and obstacle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asteroid {
    pub id: AsteroidId,
    pub kind: AsteroidKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Asteroid {
    pub fn as_obstacle(&self) -> Obstacle {
        Obstacle::new(self.pos, self.radius)
    }

    /// Linear drift with off-screen wrap
    pub fn drift(&mut self, width: f32, height: f32) {
        self.pos += self.vel;
        self.pos = wrap_point_buffered(self.pos, width, height, self.radius);
    }
}

/// The player's ship (projectile emitter)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Facing angle in radians (0 = +x)
    pub facing: f32,
    pub size: f32,
}

impl Ship {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            facing: -std::f32::consts::FRAC_PI_2, // Pointing up
            size: SHIP_SIZE,
        }
    }

    /// Muzzle position
    pub fn nose(&self) -> Vec2 {
        self.pos + from_angle(self.facing) * self.size
    }

    /// Exhaust position
    pub fn tail(&self) -> Vec2 {
        self.pos - from_angle(self.facing) * self.size
    }

    /// Accelerate along the facing direction
    pub fn thrust(&mut self, boosted: bool) {
        let mult = if boosted { SHIP_BOOST_MULT } else { 1.0 };
        self.vel += from_angle(self.facing) * SHIP_THRUST * mult;
    }

    /// Friction, speed cap, move, wrap
    pub fn update(&mut self, width: f32, height: f32) {
        self.vel *= SHIP_FRICTION;
        self.vel = self.vel.clamp_length_max(SHIP_MAX_SPEED);
        self.pos += self.vel;
        self.pos = wrap_point_buffered(self.pos, width, height, self.size);
    }

    /// Collision radius against asteroids and drops
    pub fn body_radius(&self) -> f32 {
        self.size * 0.5
    }

    /// Collision radius against portals (must fly well inside)
    pub fn portal_radius(&self) -> f32 {
        self.size * 0.3
    }
}

/// Queued ChargeShot II follow-up shot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendingShot {
    /// Ticks left before it fires
    pub delay: f32,
    pub charge: f32,
    pub tier: u8,
}

/// ChargeShot III beam: a growing segment that is never consumed by hits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Beam {
    pub start: Vec2,
    /// Unit direction
    pub dir: Vec2,
    pub length: f32,
    pub max_length: f32,
    pub width: f32,
    pub life: i32,
}

impl Beam {
    pub fn end(&self) -> Vec2 {
        self.start + self.dir * self.length
    }

    /// Grow toward max length and age by one tick
    pub fn update(&mut self) {
        if self.length < self.max_length {
            self.length = (self.length + BEAM_EXTEND_SPEED).min(self.max_length);
        }
        self.life -= 1;
    }

    pub fn is_dead(&self) -> bool {
        self.life <= 0
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerupKind {
    Homing,
    ChargeShot,
}

/// A floating power-up capsule (must be shot open)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Powerup {
    pub kind: PowerupKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Powerup {
    pub fn new(kind: PowerupKind, pos: Vec2, vel: Vec2) -> Self {
        Self {
            kind,
            pos,
            vel,
            radius: POWERUP_RADIUS,
        }
    }

    pub fn drift(&mut self, width: f32, height: f32) {
        self.pos += self.vel;
        self.pos = wrap_point_buffered(self.pos, width, height, self.radius);
    }
}

/// Collectible left behind by a shot power-up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerupDrop {
    pub kind: PowerupKind,
    pub pos: Vec2,
    pub radius: f32,
    pub life: i32,
}

impl PowerupDrop {
    pub fn new(kind: PowerupKind, pos: Vec2) -> Self {
        Self {
            kind,
            pos,
            radius: DROP_RADIUS,
            life: DROP_LIFE,
        }
    }
}

/// Portal opened where a section asteroid died
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Portal {
    pub section: AsteroidKind,
    pub pos: Vec2,
    pub radius: f32,
    pub life: i32,
}

impl Portal {
    pub fn new(section: AsteroidKind, pos: Vec2) -> Self {
        Self {
            section,
            pos,
            radius: PORTAL_RADIUS,
            life: PORTAL_LIFE,
        }
    }
}

/// Boost exhaust particle that destroys what it touches
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlumeParticle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: i32,
    pub max_life: i32,
    /// +1 curls left, -1 curls right
    pub curl: f32,
}

impl PlumeParticle {
    pub fn new(pos: Vec2, vel: Vec2, curl: f32) -> Self {
        Self {
            pos,
            vel,
            life: PLUME_LIFE,
            max_life: PLUME_LIFE,
            curl,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.life <= 0
    }

    /// Move, then bend sideways harder as the particle ages
    pub fn update(&mut self) {
        self.pos += self.vel;
        self.life -= 1;
        let age = 1.0 - self.life as f32 / self.max_life.max(1) as f32;
        let curl_strength = age * 0.15;
        let perp = self.vel.perp().normalize_or_zero() * self.curl;
        self.vel += perp * curl_strength;
    }
}

/// Currently held power-up tiers (0 = none)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loadout {
    pub homing: u8,
    pub chargeshot: u8,
}

impl Loadout {
    /// Picking up one weapon family resets the other
    pub fn activate(&mut self, kind: PowerupKind) {
        match kind {
            PowerupKind::Homing => {
                self.chargeshot = 0;
                self.homing = (self.homing + 1).min(3);
            }
            PowerupKind::ChargeShot => {
                self.homing = 0;
                self.chargeshot = (self.chargeshot + 1).min(3);
            }
        }
    }
}

/// Complete simulation world
#[derive(Debug, Clone)]
pub struct World {
    pub tuning: Tuning,
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub score: u64,
    /// `None` while the ship is destroyed
    pub ship: Option<Ship>,
    pub loadout: Loadout,
    pub targeting: Targeting,
    /// Active asteroids (sorted by id for determinism)
    pub asteroids: Vec<Asteroid>,
    pub projectiles: Vec<Projectile>,
    /// Burst shots waiting to fire
    pub pending_shots: Vec<PendingShot>,
    pub beams: Vec<Beam>,
    pub powerups: Vec<Powerup>,
    pub drops: Vec<PowerupDrop>,
    pub portals: Vec<Portal>,
    pub plume: Vec<PlumeParticle>,
    next_id: u32,
}

impl World {
    /// Create an empty world with the ship centred on screen
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let center = Vec2::new(tuning.screen_width, tuning.screen_height) * 0.5;
        Self {
            tuning,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
            score: 0,
            ship: Some(Ship::new(center)),
            loadout: Loadout::default(),
            targeting: Targeting::default(),
            asteroids: Vec::new(),
            projectiles: Vec::new(),
            pending_shots: Vec::new(),
            beams: Vec::new(),
            powerups: Vec::new(),
            drops: Vec::new(),
            portals: Vec::new(),
            plume: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new asteroid id
    pub fn next_asteroid_id(&mut self) -> AsteroidId {
        let id = AsteroidId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add an asteroid and return its handle
    pub fn spawn_asteroid(&mut self, kind: AsteroidKind, pos: Vec2, vel: Vec2, radius: f32) -> AsteroidId {
        let id = self.next_asteroid_id();
        self.asteroids.push(Asteroid {
            id,
            kind,
            pos,
            vel,
            radius,
        });
        id
    }

    /// Resolve a handle; `None` once the asteroid is destroyed
    pub fn asteroid(&self, id: AsteroidId) -> Option<&Asteroid> {
        self.asteroids.iter().find(|a| a.id == id)
    }

    /// Remove by index and return the asteroid
    pub fn remove_asteroid(&mut self, index: usize) -> Asteroid {
        self.asteroids.remove(index)
    }

    /// Ensure stable index order for the collision scans
    pub fn normalize_order(&mut self) {
        self.asteroids.sort_by_key(|a| a.id);
    }

    /// Borrowed, serializable view of everything but the RNG
    pub fn snapshot(&self) -> WorldSnapshot<'_> {
        WorldSnapshot {
            seed: self.seed,
            time_ticks: self.time_ticks,
            score: self.score,
            ship: self.ship.as_ref(),
            loadout: self.loadout,
            targeting: &self.targeting,
            asteroids: &self.asteroids,
            projectiles: &self.projectiles,
            pending_shots: &self.pending_shots,
            beams: &self.beams,
            powerups: &self.powerups,
            drops: &self.drops,
            portals: &self.portals,
            plume: &self.plume,
        }
    }
}

/// JSON-friendly view of a [`World`]
#[derive(Debug, Serialize)]
pub struct WorldSnapshot<'a> {
    pub seed: u64,
    pub time_ticks: u64,
    pub score: u64,
    pub ship: Option<&'a Ship>,
    pub loadout: Loadout,
    pub targeting: &'a Targeting,
    pub asteroids: &'a [Asteroid],
    pub projectiles: &'a [Projectile],
    pub pending_shots: &'a [PendingShot],
    pub beams: &'a [Beam],
    pub powerups: &'a [Powerup],
    pub drops: &'a [PowerupDrop],
    pub portals: &'a [Portal],
    pub plume: &'a [PlumeParticle],
}
