//! Fixed timestep simulation tick
//!
//! Advances the world deterministically: controls, targeting, firing, motion,
//! ambient updates, then collisions.

use rand::Rng;

use super::collision::{CollisionEvent, resolve};
use super::projectile::MotionContext;
use super::state::{PlumeParticle, World};
use super::weapons::{fire, fire_beam, fire_pending, release_charged, release_homing};
use crate::from_angle;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Ship facing angle (radians)
    pub facing: Option<f32>,
    /// Accelerate along the facing
    pub thrust: bool,
    /// Boosted thrust leaves a destructive exhaust plume
    pub boost: bool,
    /// Fire button held: homing weapons acquire targets
    pub fire_held: bool,
    /// Fire button released this tick
    pub fire_released: bool,
    /// Charge built up while held, in [0, 1]
    pub charge: f32,
}

/// Advance the world by one fixed timestep
pub fn tick(world: &mut World, input: &TickInput) -> Vec<CollisionEvent> {
    world.time_ticks += 1;

    steer_ship(world, input);
    update_targeting(world, input);
    if input.fire_released {
        release_fire(world, input.charge);
    }

    // Projectile motion
    let ctx = MotionContext {
        asteroids: &world.asteroids,
        homing_active: world.loadout.homing > 0,
        tuning: &world.tuning,
    };
    for projectile in world.projectiles.iter_mut() {
        projectile.update(&ctx);
    }
    world.projectiles.retain(|p| !p.is_dead());
    fire_pending(world);

    // Drift
    let (width, height) = (world.tuning.screen_width, world.tuning.screen_height);
    for asteroid in world.asteroids.iter_mut() {
        asteroid.drift(width, height);
    }
    for powerup in world.powerups.iter_mut() {
        powerup.drift(width, height);
    }

    // Short-lived effects
    for beam in world.beams.iter_mut() {
        beam.update();
    }
    world.beams.retain(|b| !b.is_dead());
    for particle in world.plume.iter_mut() {
        particle.update();
    }
    world.plume.retain(|p| !p.is_dead());
    for portal in world.portals.iter_mut() {
        portal.life -= 1;
    }
    world.portals.retain(|p| p.life > 0);
    for drop in world.drops.iter_mut() {
        drop.life -= 1;
    }
    world.drops.retain(|d| d.life > 0);

    let resolution = resolve(world);
    world.projectiles.extend(resolution.spawned);
    world.normalize_order();

    if !resolution.events.is_empty() {
        log::debug!("Tick {}: {} events", world.time_ticks, resolution.events.len());
    }
    resolution.events
}

fn steer_ship(world: &mut World, input: &TickInput) {
    let (width, height) = (world.tuning.screen_width, world.tuning.screen_height);
    let Some(ship) = world.ship.as_mut() else {
        return;
    };

    if let Some(facing) = input.facing {
        ship.facing = crate::normalize_angle(facing);
    }
    if input.thrust {
        ship.thrust(input.boost);
        if input.boost {
            let speed: f32 = world.rng.random_range(2.5..4.0);
            let curl = if world.rng.random_bool(0.5) { 1.0 } else { -1.0 };
            let vel = -from_angle(ship.facing) * speed;
            world.plume.push(PlumeParticle::new(ship.tail(), vel, curl));
        }
    }
    ship.update(width, height);
}

fn update_targeting(world: &mut World, input: &TickInput) {
    let Some(ship) = &world.ship else {
        return;
    };
    if !input.fire_held || world.loadout.homing == 0 {
        return;
    }
    let (emitter, facing) = (ship.pos, ship.facing);
    let multi_lock = world.loadout.homing >= 3;
    let min_cosine = world.tuning.cone_min_cosine;
    world
        .targeting
        .update(emitter, facing, &world.asteroids, multi_lock, min_cosine);
}

/// Pick the weapon the current loadout fires on release
fn release_fire(world: &mut World, charge: f32) {
    if world.loadout.homing > 0 {
        release_homing(world);
    } else if world.loadout.chargeshot >= 3 {
        fire_beam(world);
    } else if world.loadout.chargeshot > 0 {
        release_charged(world, charge);
    } else {
        fire(world);
    }
}
