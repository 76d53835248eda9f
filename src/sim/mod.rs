//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod curve;
pub mod geometry;
pub mod pathfind;
pub mod projectile;
pub mod ricochet;
pub mod state;
pub mod targeting;
pub mod tick;
pub mod weapons;

#[cfg(test)]
mod proptest_motion;

pub use collision::{CollisionEvent, HitCause, Resolution, resolve};
pub use curve::{CurvePlan, arc_fraction, plan_curve};
pub use geometry::Obstacle;
pub use pathfind::waypoint_path;
pub use projectile::{Guidance, Motion, MotionContext, Projectile};
pub use ricochet::spawn_ricochets;
pub use state::{
    Asteroid, AsteroidId, AsteroidKind, AsteroidSize, Beam, Loadout, PendingShot, PlumeParticle, Portal,
    Powerup, PowerupDrop, PowerupKind, Ship, World, WorldSnapshot,
};
pub use targeting::{TargetLock, Targeting, acquire_facing_target, impact_point};
pub use tick::{TickInput, tick};
pub use weapons::{fire, fire_beam, fire_charged, fire_guided, fire_pending, release_charged, release_homing};
