//! Rock Guidance - projectile guidance and collision core for an asteroid-field shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (targeting, guided curves, motion, collisions)
//! - `settings`: Data-driven tuning loaded from JSON

pub mod settings;
pub mod sim;

pub use settings::{ConfigError, Tuning};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Nominal simulation rate (one tick per rendered frame)
    pub const TICKS_PER_SECOND: u32 = 60;

    /// Default play field
    pub const SCREEN_WIDTH: f32 = 1280.0;
    pub const SCREEN_HEIGHT: f32 = 720.0;

    /// Bullet defaults (per tick units)
    pub const BULLET_RADIUS: f32 = 3.0;
    pub const BULLET_SPEED: f32 = 10.0;
    pub const BULLET_LIFESPAN: i32 = 60;

    /// Steering homing: max steering vector magnitude per tick
    pub const MAX_TURN_RATE: f32 = 0.3;

    /// Facing cone: cos(60°)
    pub const CONE_MIN_COSINE: f32 = 0.5;
    /// Multi-lock capacity (Homing III)
    pub const MAX_TARGET_LOCKS: usize = 3;

    /// Curve planner
    pub const OBSTACLE_MARGIN: f32 = 15.0;
    pub const DEFLECTION_BUFFER: f32 = 20.0;
    pub const DEFLECTION_RADIUS_SCALE: f32 = 1.5;
    pub const ARC_FRACTION_MIN: f32 = 0.05;
    pub const ARC_FRACTION_MAX: f32 = 0.40;
    /// Guided bullet trail history
    pub const TRAIL_LENGTH: usize = 20;

    /// Legacy waypoint pathfinder
    pub const WAYPOINT_MAX_DEPTH: u32 = 10;
    pub const WAYPOINT_MARGIN: f32 = 10.0;
    pub const WAYPOINT_CLEARANCE: f32 = 30.0;

    /// Ricochet cascade
    pub const RICOCHET_SPREAD: f32 = std::f32::consts::FRAC_PI_3; // ±60°
    pub const RICOCHET_JITTER: f32 = 0.1;
    pub const RICOCHET_SPEED_FACTOR: f32 = 0.8;
    pub const RICOCHET_SCALE: f32 = 0.8;
    pub const RICOCHET_COUNT_TIER2: usize = 3;
    pub const RICOCHET_COUNT_TIER3: usize = 5;

    /// Guided shots
    pub const GUIDED_SPEED_MULT: f32 = 1.5;
    pub const GUIDED_SPEED_MULT_RICOCHET: f32 = 1.6;
    pub const GUIDED_SCALE: f32 = 1.3;

    /// ChargeShot II burst: extra shots and their spacing along the flight path
    pub const BURST_EXTRA_SHOTS: usize = 2;
    pub const BURST_SPACING: f32 = 40.0;

    /// Beam (ChargeShot III)
    pub const BEAM_EXTEND_SPEED: f32 = 50.0;

    /// Ship handling
    pub const SHIP_THRUST: f32 = 0.15;
    pub const SHIP_BOOST_MULT: f32 = 1.5;
    pub const SHIP_FRICTION: f32 = 0.99;
    pub const SHIP_MAX_SPEED: f32 = 8.0;

    /// Entity sizes
    pub const SHIP_SIZE: f32 = 20.0;
    pub const ASTEROID_SMALL: f32 = 35.0;
    pub const ASTEROID_MEDIUM: f32 = 50.0;
    pub const ASTEROID_LARGE: f32 = 70.0;
    pub const POWERUP_RADIUS: f32 = 25.0;
    pub const DROP_RADIUS: f32 = 30.0;
    pub const DROP_LIFE: i32 = 300;
    pub const PORTAL_RADIUS: f32 = 40.0;
    pub const PORTAL_LIFE: i32 = 300;
    pub const PLUME_RADIUS: f32 = 6.0;
    pub const PLUME_LIFE: i32 = 14;

    /// Points per destroyed asteroid
    pub const ASTEROID_SCORE: u64 = 10;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Unit vector pointing along `theta`
#[inline]
pub fn from_angle(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

/// Heading of a vector (atan2)
#[inline]
pub fn heading(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}
