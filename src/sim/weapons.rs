//! Firing
//!
//! Every weapon fires from the ship's nose along its facing. Nothing fires
//! while the ship is destroyed.

use rand::Rng;

use super::projectile::{Motion, Projectile};
use super::state::{AsteroidId, Beam, PendingShot, World};
use crate::consts::{BURST_EXTRA_SHOTS, BURST_SPACING, GUIDED_SCALE, GUIDED_SPEED_MULT, GUIDED_SPEED_MULT_RICOCHET};
use crate::from_angle;

/// Plain shot; homing holders fire self-steering bullets
pub fn fire(world: &mut World) -> bool {
    let Some(ship) = &world.ship else {
        return false;
    };
    let vel = from_angle(ship.facing) * world.tuning.bullet_speed + ship.vel;
    let motion = if world.loadout.homing > 0 {
        Motion::SteeringHoming
    } else {
        Motion::Ballistic
    };
    let tier = world.loadout.homing.max(1);
    let bullet = Projectile::new(ship.nose(), vel, 1.0, tier, &world.tuning).with_motion(motion);
    world.projectiles.push(bullet);
    true
}

/// Charged shot; `charge` in [0, 1] grows the bullet and its speed
pub fn fire_charged(world: &mut World, charge: f32) -> bool {
    let tier = world.loadout.chargeshot.max(1);
    charged_shot(world, charge, tier)
}

/// Charged release; ChargeShot II trails two more shots behind the first
///
/// The follow-ups are spaced [`BURST_SPACING`] apart along the flight path
/// and fire from wherever the ship is when they come due. Returns the number
/// of shots queued or fired.
pub fn release_charged(world: &mut World, charge: f32) -> usize {
    if !fire_charged(world, charge) {
        return 0;
    }
    let tier = world.loadout.chargeshot;
    if tier < 2 {
        return 1;
    }

    let speed = world.projectiles.last().map_or(0.0, |p| p.vel.length());
    let spacing = BURST_SPACING / speed.max(1e-3);
    for i in 1..=BURST_EXTRA_SHOTS {
        world.pending_shots.push(PendingShot {
            delay: spacing * i as f32,
            charge,
            tier,
        });
    }
    1 + BURST_EXTRA_SHOTS
}

/// Count down queued burst shots and fire the ones that are due
pub fn fire_pending(world: &mut World) -> usize {
    let mut fired = 0;
    for i in (0..world.pending_shots.len()).rev() {
        let shot = &mut world.pending_shots[i];
        shot.delay -= 1.0;
        if shot.delay > 0.0 || world.ship.is_none() {
            continue;
        }
        let shot = world.pending_shots.remove(i);
        if charged_shot(world, shot.charge, shot.tier) {
            fired += 1;
        }
    }
    fired
}

fn charged_shot(world: &mut World, charge: f32, tier: u8) -> bool {
    let Some(ship) = &world.ship else {
        return false;
    };
    let charge = charge.clamp(0.0, 1.0);

    let scale = 1.0 + charge * 3.0;
    let mut speed_mult = 0.8 + charge * 0.4;
    if tier >= 2 {
        speed_mult += 0.3;
    }

    let vel = from_angle(ship.facing) * world.tuning.bullet_speed * speed_mult + ship.vel;
    let bullet = Projectile::new(ship.nose(), vel, scale, tier, &world.tuning);
    log::debug!("Charged shot: charge {:.2}, scale {:.2}", charge, scale);
    world.projectiles.push(bullet);
    true
}

/// Guided shot at a locked asteroid
///
/// Homing II and up fly faster and split into ricochets on impact.
pub fn fire_guided(world: &mut World, target: AsteroidId) -> bool {
    let Some(ship) = &world.ship else {
        return false;
    };
    if world.asteroid(target).is_none() {
        return false;
    }

    let tier = world.loadout.homing.max(1);
    let ricochet = tier >= 2;
    let speed_mult = if ricochet {
        GUIDED_SPEED_MULT_RICOCHET
    } else {
        GUIDED_SPEED_MULT
    };

    // Ship velocity is boosted along with the muzzle velocity
    let vel = (from_angle(ship.facing) * world.tuning.bullet_speed + ship.vel) * speed_mult;
    let mut bullet = Projectile::new(ship.nose(), vel, GUIDED_SCALE, tier, &world.tuning).guided_at(target);
    bullet.ricochet_capable = ricochet;
    // Outlive the longest flight the field allows
    let diagonal = world.tuning.screen_width.hypot(world.tuning.screen_height);
    let flight = (diagonal / vel.length().max(1e-3)).ceil() as i32 + 1;
    bullet.life = bullet.life.max(flight);
    log::debug!("Guided shot at {:?} (tier {})", target, tier);
    world.projectiles.push(bullet);
    true
}

/// ChargeShot III: a piercing beam of random reach
pub fn fire_beam(world: &mut World) -> bool {
    let Some(ship) = &world.ship else {
        return false;
    };
    let start = ship.nose();
    let dir = from_angle(ship.facing);

    let max_length: f32 = world.rng.random_range(400.0..=1500.0);
    let width: f32 = world.rng.random_range(30.0..=80.0);
    let life: i32 = world.rng.random_range(25..=45);

    log::debug!("Beam fired: length {:.0}, width {:.0}", max_length, width);
    world.beams.push(Beam {
        start,
        dir,
        length: 0.0,
        max_length,
        width,
        life,
    });
    true
}

/// Fire-button release with a homing weapon
///
/// Homing III fires one guided shot per lock; lower tiers fire at whatever
/// the ship is facing. With nothing targeted a plain shot goes out. Returns
/// the number of bullets fired.
pub fn release_homing(world: &mut World) -> usize {
    if world.ship.is_none() {
        world.targeting.clear();
        return 0;
    }

    let targets: Vec<AsteroidId> = if world.loadout.homing >= 3 && !world.targeting.locks.is_empty() {
        world.targeting.locks.iter().map(|l| l.asteroid).collect()
    } else {
        world.targeting.current.iter().map(|l| l.asteroid).collect()
    };
    world.targeting.clear();

    let fired = targets.into_iter().filter(|&id| fire_guided(world, id)).count();
    if fired > 0 {
        return fired;
    }
    usize::from(fire(world))
}
