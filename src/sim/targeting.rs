//! Target acquisition for guided shots
//!
//! While fire is held with a homing weapon, the ship picks the asteroid most
//! directly ahead of it. Homing III keeps up to three independent locks.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::border_point_facing;
use super::state::{Asteroid, AsteroidId};
use crate::consts::{CONE_MIN_COSINE, MAX_TARGET_LOCKS};
use crate::from_angle;

/// A retained target plus the border point a shot should aim for
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetLock {
    pub asteroid: AsteroidId,
    pub point: Vec2,
}

/// Point on the asteroid's border facing the emitter
pub fn impact_point(emitter: Vec2, asteroid: &Asteroid) -> Vec2 {
    border_point_facing(asteroid.pos, asteroid.radius, emitter)
}

/// Best asteroid inside the default 60° half-angle cone
pub fn acquire_facing_target(emitter: Vec2, facing: f32, asteroids: &[Asteroid]) -> Option<AsteroidId> {
    acquire_in_cone(emitter, facing, asteroids, CONE_MIN_COSINE)
}

/// Asteroid with the largest facing cosine strictly above `min_cosine`
///
/// Ties keep the earlier asteroid. An asteroid centred on the emitter has no
/// direction and is never eligible.
pub fn acquire_in_cone(
    emitter: Vec2,
    facing: f32,
    asteroids: &[Asteroid],
    min_cosine: f32,
) -> Option<AsteroidId> {
    let facing_dir = from_angle(facing);
    let mut best: Option<(AsteroidId, f32)> = None;

    for asteroid in asteroids {
        let to_asteroid = (asteroid.pos - emitter).normalize_or_zero();
        let cosine = facing_dir.dot(to_asteroid);
        let threshold = best.map_or(min_cosine, |(_, c)| c);
        if cosine > threshold {
            best = Some((asteroid.id, cosine));
        }
    }

    best.map(|(id, _)| id)
}

/// Aiming state while the fire button is held
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Targeting {
    /// What the ship is currently facing (aiming indicator, single-target fire)
    pub current: Option<TargetLock>,
    /// Homing III locks, oldest first
    pub locks: Vec<TargetLock>,
}

impl Targeting {
    /// Re-acquire and refresh every lock against the live asteroid list
    pub fn update(
        &mut self,
        emitter: Vec2,
        facing: f32,
        asteroids: &[Asteroid],
        multi_lock: bool,
        min_cosine: f32,
    ) {
        let facing_target = acquire_in_cone(emitter, facing, asteroids, min_cosine)
            .and_then(|id| asteroids.iter().find(|a| a.id == id));

        if multi_lock {
            if let Some(target) = facing_target {
                let already_locked = self.locks.iter().any(|l| l.asteroid == target.id);
                if !already_locked && self.locks.len() < MAX_TARGET_LOCKS {
                    log::debug!("Locked asteroid {:?} ({} locks)", target.id, self.locks.len() + 1);
                    self.locks.push(TargetLock {
                        asteroid: target.id,
                        point: impact_point(emitter, target),
                    });
                }
            }
        }

        // Locked asteroids keep moving; destroyed ones drop out
        self.locks.retain_mut(|lock| {
            match asteroids.iter().find(|a| a.id == lock.asteroid) {
                Some(asteroid) => {
                    lock.point = impact_point(emitter, asteroid);
                    true
                }
                None => false,
            }
        });

        self.current = facing_target.map(|target| TargetLock {
            asteroid: target.id,
            point: impact_point(emitter, target),
        });
    }

    pub fn clear(&mut self) {
        self.current = None;
        self.locks.clear();
    }
}
