//! Collision resolution
//!
//! Runs once per tick after all motion. Passes run in a fixed order. Passes
//! that remove entities scan from the back so removals never disturb the
//! indices still to be visited; the ship is blamed on the first rock in id
//! order. Bullets spawned here (ricochets) are returned to the
//! caller instead of joining the live list, so they are first tested next
//! tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{circles_overlap, segment_intersects_circle};
use super::projectile::Projectile;
use super::ricochet::spawn_ricochets;
use super::state::{Asteroid, AsteroidId, AsteroidKind, Loadout, Portal, PowerupDrop, PowerupKind, World};
use crate::consts::PLUME_RADIUS;

/// What destroyed an asteroid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitCause {
    Bullet,
    Beam,
    Plume,
}

/// Something the host should react to (sound, UI, navigation)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CollisionEvent {
    AsteroidDestroyed {
        id: AsteroidId,
        kind: AsteroidKind,
        pos: Vec2,
        cause: HitCause,
        /// Score awarded for this kill
        points: u64,
    },
    PortalOpened {
        section: AsteroidKind,
        pos: Vec2,
    },
    Ricochet {
        origin: Vec2,
        count: usize,
    },
    ShipDestroyed {
        pos: Vec2,
        asteroid: AsteroidId,
    },
    PortalEntered {
        section: AsteroidKind,
    },
    PowerupShot {
        kind: PowerupKind,
        pos: Vec2,
    },
    PowerupCollected {
        kind: PowerupKind,
    },
}

/// Output of one resolver run
#[derive(Debug, Default)]
pub struct Resolution {
    pub events: Vec<CollisionEvent>,
    /// New bullets to merge after resolution
    pub spawned: Vec<Projectile>,
}

/// Run every collision pass in order
pub fn resolve(world: &mut World) -> Resolution {
    let mut out = Resolution::default();
    bullet_asteroid(world, &mut out);
    beam_asteroid(world, &mut out);
    ship_asteroid(world, &mut out);
    ship_portal(world, &mut out);
    bullet_powerup(world, &mut out);
    ship_drop(world, &mut out);
    plume_hits(world, &mut out);
    out
}

/// Score, open a portal for section rocks, report
fn destroy_asteroid(world: &mut World, asteroid: Asteroid, cause: HitCause, out: &mut Resolution) {
    let points = world.tuning.asteroid_score;
    world.score += points;
    log::debug!("Asteroid {:?} destroyed by {:?}", asteroid.id, cause);

    out.events.push(CollisionEvent::AsteroidDestroyed {
        id: asteroid.id,
        kind: asteroid.kind,
        pos: asteroid.pos,
        cause,
        points,
    });

    if asteroid.kind.is_section() {
        world.portals.push(Portal::new(asteroid.kind, asteroid.pos));
        out.events.push(CollisionEvent::PortalOpened {
            section: asteroid.kind,
            pos: asteroid.pos,
        });
    }
}

/// At most one bullet/asteroid pair per tick
fn bullet_asteroid(world: &mut World, out: &mut Resolution) {
    for bi in (0..world.projectiles.len()).rev() {
        for ai in (0..world.asteroids.len()).rev() {
            let bullet = &world.projectiles[bi];
            let asteroid = &world.asteroids[ai];
            if !circles_overlap(bullet.pos, bullet.radius, asteroid.pos, asteroid.radius) {
                continue;
            }

            let bullet = world.projectiles.remove(bi);
            let asteroid = world.remove_asteroid(ai);

            if bullet.ricochet_capable && !bullet.ricochet_derived {
                let fan = spawn_ricochets(bullet.pos, asteroid.pos, bullet.tier, &world.tuning, &mut world.rng);
                log::debug!("Ricochet: {} fragments", fan.len());
                out.events.push(CollisionEvent::Ricochet {
                    origin: bullet.pos,
                    count: fan.len(),
                });
                out.spawned.extend(fan);
            }

            destroy_asteroid(world, asteroid, HitCause::Bullet, out);
            return;
        }
    }
}

/// Beams pierce: every touched asteroid goes, the beam stays
fn beam_asteroid(world: &mut World, out: &mut Resolution) {
    for beam_index in 0..world.beams.len() {
        let (start, end, half_width) = {
            let beam = &world.beams[beam_index];
            (beam.start, beam.end(), beam.width * 0.5)
        };
        for ai in (0..world.asteroids.len()).rev() {
            let asteroid = &world.asteroids[ai];
            if segment_intersects_circle(start, end, asteroid.pos, asteroid.radius + half_width) {
                let asteroid = world.remove_asteroid(ai);
                destroy_asteroid(world, asteroid, HitCause::Beam, out);
            }
        }
    }
}

/// The ship dies on the first rock it touches; the rock survives
fn ship_asteroid(world: &mut World, out: &mut Resolution) {
    let Some(ship) = &world.ship else {
        return;
    };
    let hit = world
        .asteroids
        .iter()
        .find(|a| circles_overlap(ship.pos, ship.body_radius(), a.pos, a.radius))
        .map(|a| a.id);

    if let Some(asteroid) = hit {
        let pos = ship.pos;
        log::info!("Ship destroyed by asteroid {:?}", asteroid);
        world.ship = None;
        world.loadout = Loadout::default();
        world.targeting.clear();
        world.pending_shots.clear();
        out.events.push(CollisionEvent::ShipDestroyed { pos, asteroid });
    }
}

/// Entering any portal closes all of them
fn ship_portal(world: &mut World, out: &mut Resolution) {
    let Some(ship) = &world.ship else {
        return;
    };
    let entered = world
        .portals
        .iter()
        .rev()
        .find(|p| circles_overlap(ship.pos, ship.portal_radius(), p.pos, p.radius))
        .map(|p| p.section);

    if let Some(section) = entered {
        log::info!("Entered {:?} portal", section);
        world.portals.clear();
        out.events.push(CollisionEvent::PortalEntered { section });
    }
}

/// Shooting a capsule leaves a collectible drop behind
fn bullet_powerup(world: &mut World, out: &mut Resolution) {
    for bi in (0..world.projectiles.len()).rev() {
        for pi in (0..world.powerups.len()).rev() {
            let bullet = &world.projectiles[bi];
            let powerup = &world.powerups[pi];
            if !circles_overlap(bullet.pos, bullet.radius, powerup.pos, powerup.radius) {
                continue;
            }

            world.projectiles.remove(bi);
            let powerup = world.powerups.remove(pi);
            open_powerup(world, powerup.kind, powerup.pos, out);
            return;
        }
    }
}

fn open_powerup(world: &mut World, kind: PowerupKind, pos: Vec2, out: &mut Resolution) {
    log::debug!("{:?} capsule opened", kind);
    world.drops.push(PowerupDrop::new(kind, pos));
    out.events.push(CollisionEvent::PowerupShot { kind, pos });
}

/// Flying over a drop activates it
fn ship_drop(world: &mut World, out: &mut Resolution) {
    let Some(ship) = &world.ship else {
        return;
    };
    let Some(index) = world
        .drops
        .iter()
        .rposition(|d| circles_overlap(ship.pos, ship.body_radius(), d.pos, d.radius))
    else {
        return;
    };

    let drop = world.drops.remove(index);
    world.loadout.activate(drop.kind);
    log::info!("Collected {:?}, loadout now {:?}", drop.kind, world.loadout);
    out.events.push(CollisionEvent::PowerupCollected { kind: drop.kind });
}

/// Exhaust particles act like tiny bullets: one target each
fn plume_hits(world: &mut World, out: &mut Resolution) {
    for particle_index in (0..world.plume.len()).rev() {
        let pos = world.plume[particle_index].pos;

        if let Some(ai) = world
            .asteroids
            .iter()
            .rposition(|a| circles_overlap(pos, PLUME_RADIUS, a.pos, a.radius))
        {
            world.plume.remove(particle_index);
            let asteroid = world.remove_asteroid(ai);
            destroy_asteroid(world, asteroid, HitCause::Plume, out);
            continue;
        }

        if let Some(pi) = world
            .powerups
            .iter()
            .rposition(|p| circles_overlap(pos, PLUME_RADIUS, p.pos, p.radius))
        {
            world.plume.remove(particle_index);
            let powerup = world.powerups.remove(pi);
            open_powerup(world, powerup.kind, powerup.pos, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;
    use crate::sim::projectile::Motion;
    use crate::sim::state::{Beam, PendingShot, PlumeParticle, Powerup, Ship};

    fn empty_world() -> World {
        let mut world = World::new(3, Tuning::default());
        // Park the ship out of the way
        world.ship = Some(Ship::new(Vec2::new(5000.0, 5000.0)));
        world
    }

    fn bullet_at(world: &World, pos: Vec2) -> Projectile {
        Projectile::new(pos, Vec2::new(10.0, 0.0), 1.0, 1, &world.tuning)
    }

    #[test]
    fn test_one_bullet_asteroid_pair_per_tick() {
        let mut world = empty_world();
        world.spawn_asteroid(AsteroidKind::Neutral, Vec2::new(100.0, 100.0), Vec2::ZERO, 35.0);
        world.spawn_asteroid(AsteroidKind::Neutral, Vec2::new(400.0, 100.0), Vec2::ZERO, 35.0);
        let b0 = bullet_at(&world, Vec2::new(100.0, 100.0));
        let b1 = bullet_at(&world, Vec2::new(400.0, 100.0));
        world.projectiles = vec![b0, b1];

        let res = resolve(&mut world);
        assert_eq!(world.projectiles.len(), 1);
        assert_eq!(world.asteroids.len(), 1);
        assert_eq!(world.score, 10);
        // Last bullet, last asteroid first
        assert_eq!(world.projectiles[0].pos, Vec2::new(100.0, 100.0));
        assert!(matches!(
            res.events[0],
            CollisionEvent::AsteroidDestroyed { cause: HitCause::Bullet, .. }
        ));

        resolve(&mut world);
        assert!(world.projectiles.is_empty());
        assert!(world.asteroids.is_empty());
        assert_eq!(world.score, 20);
    }

    #[test]
    fn test_bullet_on_asteroid_center_hits() {
        let mut world = empty_world();
        world.spawn_asteroid(AsteroidKind::Neutral, Vec2::new(250.0, 250.0), Vec2::ZERO, 35.0);
        world.projectiles.push(bullet_at(&world, Vec2::new(250.0, 250.0)));
        resolve(&mut world);
        assert!(world.asteroids.is_empty());
    }

    #[test]
    fn test_touching_is_not_a_hit() {
        let mut world = empty_world();
        world.spawn_asteroid(AsteroidKind::Neutral, Vec2::new(0.0, 0.0), Vec2::ZERO, 35.0);
        world.projectiles.push(bullet_at(&world, Vec2::new(38.0, 0.0)));
        resolve(&mut world);
        assert_eq!(world.asteroids.len(), 1);
    }

    #[test]
    fn test_section_asteroid_opens_portal() {
        let mut world = empty_world();
        world.spawn_asteroid(AsteroidKind::Resume, Vec2::new(300.0, 300.0), Vec2::ZERO, 50.0);
        world.projectiles.push(bullet_at(&world, Vec2::new(300.0, 300.0)));
        let res = resolve(&mut world);
        assert_eq!(world.portals.len(), 1);
        assert_eq!(world.portals[0].section, AsteroidKind::Resume);
        assert!(res.events.contains(&CollisionEvent::PortalOpened {
            section: AsteroidKind::Resume,
            pos: Vec2::new(300.0, 300.0),
        }));
    }

    #[test]
    fn test_ricochet_spawns_are_deferred_and_never_chain() {
        let mut world = empty_world();
        world.spawn_asteroid(AsteroidKind::Neutral, Vec2::new(300.0, 300.0), Vec2::ZERO, 50.0);
        // A second rock sitting right where the fragments start
        world.spawn_asteroid(AsteroidKind::Neutral, Vec2::new(310.0, 300.0), Vec2::ZERO, 50.0);

        let mut bullet = bullet_at(&world, Vec2::new(300.0, 300.0));
        bullet.ricochet_capable = true;
        bullet.tier = 3;
        world.projectiles.push(bullet);

        let res = resolve(&mut world);
        assert_eq!(res.spawned.len(), 5);
        assert!(world.projectiles.is_empty());
        // Fragments were not tested this tick
        assert_eq!(world.asteroids.len(), 1);
        assert!(res.spawned.iter().all(|p| p.ricochet_derived && p.motion == Motion::Ballistic));

        // Next tick a fragment kills the second rock but spawns nothing
        world.projectiles = res.spawned;
        let res = resolve(&mut world);
        assert!(world.asteroids.is_empty());
        assert!(res.spawned.is_empty());
        assert!(!res.events.iter().any(|e| matches!(e, CollisionEvent::Ricochet { .. })));
    }

    #[test]
    fn test_beam_clears_every_asteroid_it_touches() {
        let mut world = empty_world();
        world.spawn_asteroid(AsteroidKind::Neutral, Vec2::new(100.0, 0.0), Vec2::ZERO, 35.0);
        world.spawn_asteroid(AsteroidKind::Neutral, Vec2::new(300.0, 40.0), Vec2::ZERO, 35.0);
        world.spawn_asteroid(AsteroidKind::Neutral, Vec2::new(300.0, 300.0), Vec2::ZERO, 35.0);
        world.beams.push(Beam {
            start: Vec2::ZERO,
            dir: Vec2::X,
            length: 500.0,
            max_length: 500.0,
            width: 30.0,
            life: 10,
        });

        let res = resolve(&mut world);
        assert_eq!(world.asteroids.len(), 1);
        assert_eq!(world.beams.len(), 1);
        assert_eq!(world.score, 20);
        assert_eq!(
            res.events
                .iter()
                .filter(|e| matches!(e, CollisionEvent::AsteroidDestroyed { cause: HitCause::Beam, .. }))
                .count(),
            2
        );
    }

    #[test]
    fn test_ship_collision_resets_loadout() {
        let mut world = empty_world();
        world.loadout.homing = 2;
        let id = world.spawn_asteroid(AsteroidKind::Neutral, Vec2::new(200.0, 200.0), Vec2::ZERO, 35.0);
        world.ship = Some(Ship::new(Vec2::new(240.0, 200.0)));

        let res = resolve(&mut world);
        assert!(world.ship.is_none());
        assert_eq!(world.loadout, Loadout::default());
        assert_eq!(world.asteroids.len(), 1);
        assert!(res.events.contains(&CollisionEvent::ShipDestroyed {
            pos: Vec2::new(240.0, 200.0),
            asteroid: id,
        }));
    }

    #[test]
    fn test_ship_blamed_on_lowest_overlapping_rock() {
        let mut world = empty_world();
        let first = world.spawn_asteroid(AsteroidKind::Neutral, Vec2::new(200.0, 200.0), Vec2::ZERO, 35.0);
        world.spawn_asteroid(AsteroidKind::Neutral, Vec2::new(280.0, 200.0), Vec2::ZERO, 35.0);
        world.ship = Some(Ship::new(Vec2::new(240.0, 200.0)));
        world.pending_shots.push(PendingShot {
            delay: 3.0,
            charge: 0.5,
            tier: 2,
        });

        let res = resolve(&mut world);
        assert_eq!(
            res.events,
            vec![CollisionEvent::ShipDestroyed {
                pos: Vec2::new(240.0, 200.0),
                asteroid: first,
            }]
        );
        assert!(world.pending_shots.is_empty());
        assert_eq!(world.asteroids.len(), 2);
    }

    #[test]
    fn test_portal_entry_closes_portals() {
        let mut world = empty_world();
        world.portals.push(Portal::new(AsteroidKind::Work, Vec2::new(100.0, 100.0)));
        world.portals.push(Portal::new(AsteroidKind::About, Vec2::new(600.0, 100.0)));
        world.ship = Some(Ship::new(Vec2::new(130.0, 100.0)));

        let res = resolve(&mut world);
        assert!(world.portals.is_empty());
        assert_eq!(res.events, vec![CollisionEvent::PortalEntered { section: AsteroidKind::Work }]);
    }

    #[test]
    fn test_shot_powerup_becomes_collectible() {
        let mut world = empty_world();
        world.powerups.push(Powerup::new(PowerupKind::Homing, Vec2::new(400.0, 400.0), Vec2::ZERO));
        world.projectiles.push(bullet_at(&world, Vec2::new(410.0, 400.0)));

        resolve(&mut world);
        assert!(world.powerups.is_empty());
        assert!(world.projectiles.is_empty());
        assert_eq!(world.drops.len(), 1);

        world.ship = Some(Ship::new(Vec2::new(400.0, 420.0)));
        let res = resolve(&mut world);
        assert!(world.drops.is_empty());
        assert_eq!(world.loadout.homing, 1);
        assert_eq!(res.events, vec![CollisionEvent::PowerupCollected { kind: PowerupKind::Homing }]);
    }

    #[test]
    fn test_plume_particles_each_take_one_target() {
        let mut world = empty_world();
        world.spawn_asteroid(AsteroidKind::Neutral, Vec2::new(100.0, 100.0), Vec2::ZERO, 35.0);
        world.spawn_asteroid(AsteroidKind::Neutral, Vec2::new(110.0, 100.0), Vec2::ZERO, 35.0);
        world.powerups.push(Powerup::new(PowerupKind::ChargeShot, Vec2::new(600.0, 100.0), Vec2::ZERO));
        world.plume.push(PlumeParticle::new(Vec2::new(105.0, 100.0), Vec2::ZERO, 1.0));
        world.plume.push(PlumeParticle::new(Vec2::new(105.0, 100.0), Vec2::ZERO, -1.0));
        world.plume.push(PlumeParticle::new(Vec2::new(600.0, 100.0), Vec2::ZERO, 1.0));

        let res = resolve(&mut world);
        assert!(world.asteroids.is_empty());
        assert!(world.powerups.is_empty());
        assert!(world.plume.is_empty());
        assert_eq!(world.drops.len(), 1);
        assert!(res.events.iter().any(|e| matches!(e, CollisionEvent::AsteroidDestroyed { cause: HitCause::Plume, .. })));
    }
}
