//! Ricochet cascade
//!
//! A ricochet-capable bullet that hits an asteroid splits into a fan of
//! smaller bullets spreading away from the impact direction.

use glam::Vec2;
use rand::Rng;

use super::projectile::Projectile;
use crate::Tuning;
use crate::consts::{RICOCHET_SCALE, RICOCHET_SPEED_FACTOR};
use crate::{from_angle, heading};

/// Evenly spaced angles across `impact_angle ± spread`
pub fn ricochet_angles(impact_angle: f32, count: usize, spread: f32) -> Vec<f32> {
    match count {
        0 => Vec::new(),
        1 => vec![impact_angle],
        _ => (0..count)
            .map(|i| {
                let t = i as f32 / (count - 1) as f32;
                impact_angle - spread + 2.0 * spread * t
            })
            .collect(),
    }
}

/// Fan of ricochet bullets leaving `origin`
///
/// The fan is centred on the direction from `origin` toward the struck
/// asteroid's centre, so the fragments carry on through the impact.
pub fn spawn_ricochets<R: Rng + ?Sized>(
    origin: Vec2,
    target_center: Vec2,
    tier: u8,
    tuning: &Tuning,
    rng: &mut R,
) -> Vec<Projectile> {
    let count = tuning.ricochet_count(tier);
    let impact_angle = heading(target_center - origin);
    let speed = tuning.bullet_speed * RICOCHET_SPEED_FACTOR;
    let jitter = tuning.ricochet_jitter;

    ricochet_angles(impact_angle, count, tuning.ricochet_spread)
        .into_iter()
        .map(|angle| {
            let angle = if jitter > 0.0 {
                angle + rng.random_range(-jitter..=jitter)
            } else {
                angle
            };
            let mut bullet = Projectile::new(origin, from_angle(angle) * speed, RICOCHET_SCALE, 1, tuning);
            bullet.ricochet_derived = true;
            bullet
        })
        .collect()
}
