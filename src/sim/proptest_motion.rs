//! Property-based tests for projectile motion and targeting.

use glam::Vec2;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::curve::plan_curve;
use super::geometry::{Obstacle, border_point_facing, quadratic_bezier};
use super::projectile::{Motion, MotionContext, Projectile};
use super::ricochet::spawn_ricochets;
use super::state::{Asteroid, AsteroidId, AsteroidKind};
use super::targeting::acquire_facing_target;
use crate::consts::TRAIL_LENGTH;
use crate::{Tuning, from_angle};

fn rock(id: u32, pos: Vec2, radius: f32) -> Asteroid {
    Asteroid {
        id: AsteroidId(id),
        kind: AsteroidKind::Neutral,
        pos,
        vel: Vec2::ZERO,
        radius,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Steering only ever rotates the velocity.
    #[test]
    fn prop_steering_keeps_speed(
        speed in 1.0f32..20.0,
        heading in -3.1f32..3.1,
        tx in 0.0f32..1280.0,
        ty in 0.0f32..720.0,
        steps in 1usize..120,
    ) {
        let tuning = Tuning::default();
        let mut bullet = Projectile::new(Vec2::new(640.0, 360.0), from_angle(heading) * speed, 1.0, 1, &tuning);
        for _ in 0..steps {
            bullet.steer_towards(Vec2::new(tx, ty), tuning.max_turn_rate);
        }
        let drift = (bullet.vel.length() - speed).abs() / speed;
        prop_assert!(drift < 1e-4, "speed drifted by {}", drift);
    }

    /// One steering update turns by at most asin(cap / speed).
    #[test]
    fn prop_turn_per_tick_is_bounded(
        speed in 1.0f32..20.0,
        heading in -3.1f32..3.1,
        tx in 0.0f32..1280.0,
        ty in 0.0f32..720.0,
    ) {
        let tuning = Tuning::default();
        let mut bullet = Projectile::new(Vec2::new(640.0, 360.0), from_angle(heading) * speed, 1.0, 1, &tuning);
        let before = bullet.vel;
        bullet.steer_towards(Vec2::new(tx, ty), tuning.max_turn_rate);
        let turned = before.angle_to(bullet.vel).abs();
        let bound = (tuning.max_turn_rate / speed).min(1.0).asin();
        prop_assert!(turned <= bound + 1e-3, "turned {} > {}", turned, bound);
    }

    /// Guided flight ends exactly on the target's facing border point.
    #[test]
    fn prop_guided_snaps_to_end(
        sx in 0.0f32..1280.0,
        sy in 0.0f32..720.0,
        tx in 0.0f32..1280.0,
        ty in 0.0f32..720.0,
        radius in 20.0f32..70.0,
        speed in 5.0f32..25.0,
        heading in -3.1f32..3.1,
    ) {
        let start = Vec2::new(sx, sy);
        let center = Vec2::new(tx, ty);
        prop_assume!(start.distance(center) > radius + 1.0);

        let tuning = Tuning::default();
        let asteroids = [rock(1, center, radius)];
        let ctx = MotionContext { asteroids: &asteroids, homing_active: true, tuning: &tuning };
        let mut bullet = Projectile::new(start, from_angle(heading) * speed, 1.3, 1, &tuning)
            .guided_at(AsteroidId(1));
        bullet.life = 10_000;

        let mut ticks = 0;
        while matches!(bullet.motion, Motion::CurveGuided(_)) {
            bullet.update(&ctx);
            ticks += 1;
            prop_assert!(bullet.trail.len() <= TRAIL_LENGTH);
            prop_assert!(ticks < 1000);
        }

        prop_assert_eq!(bullet.motion, Motion::Complete);
        prop_assert_eq!(bullet.pos, border_point_facing(center, radius, start));
    }

    /// The chosen target is in the cone and at least as aligned as any other.
    #[test]
    fn prop_acquisition_picks_most_aligned(
        facing in -3.1f32..3.1,
        points in prop::collection::vec((-600.0f32..600.0, -600.0f32..600.0), 0..12),
    ) {
        let asteroids: Vec<Asteroid> = points
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| rock(i as u32 + 1, Vec2::new(x, y), 35.0))
            .collect();
        let dir = from_angle(facing);
        let cosine = |a: &Asteroid| dir.dot(a.pos.normalize_or_zero());

        match acquire_facing_target(Vec2::ZERO, facing, &asteroids) {
            Some(id) => {
                let chosen = asteroids.iter().find(|a| a.id == id);
                prop_assert!(chosen.is_some());
                let best = chosen.map(cosine).unwrap_or(0.0);
                prop_assert!(best > 0.5);
                prop_assert!(asteroids.iter().all(|a| cosine(a) <= best));
            }
            None => prop_assert!(asteroids.iter().all(|a| cosine(a) <= 0.5)),
        }
    }

    /// Ricochet fan size depends only on tier, and fragments never cascade.
    #[test]
    fn prop_ricochet_fan(
        tier in 1u8..=3,
        seed in any::<u64>(),
        angle in -3.1f32..3.1,
    ) {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(seed);
        let origin = Vec2::new(300.0, 300.0);
        let fan = spawn_ricochets(origin, origin + from_angle(angle) * 40.0, tier, &tuning, &mut rng);

        let expected = if tier >= 3 { 5 } else { 3 };
        prop_assert_eq!(fan.len(), expected);
        prop_assert!(fan.iter().all(|p| p.ricochet_derived && !p.ricochet_capable));
    }

    /// Ballistic bullets stay on the field.
    #[test]
    fn prop_ballistic_wraps_into_field(
        x in 0.0f32..1280.0,
        y in 0.0f32..720.0,
        heading in -3.1f32..3.1,
        steps in 1usize..59,
    ) {
        let tuning = Tuning::default();
        let ctx = MotionContext { asteroids: &[], homing_active: false, tuning: &tuning };
        let mut bullet = Projectile::new(Vec2::new(x, y), from_angle(heading) * tuning.bullet_speed, 1.0, 1, &tuning);
        for _ in 0..steps {
            bullet.update(&ctx);
        }
        prop_assert!((0.0..=tuning.screen_width).contains(&bullet.pos.x));
        prop_assert!((0.0..=tuning.screen_height).contains(&bullet.pos.y));
    }

    /// A deflected curve keeps clear of the rock that forced it.
    #[test]
    fn prop_deflection_clears_obstacle(
        along in 0.3f32..0.7,
        offset in -1.0f32..1.0,
        radius in 20.0f32..70.0,
        length in 300.0f32..1200.0,
        heading in -0.5f32..0.5,
    ) {
        let tuning = Tuning::default();
        let target = Obstacle::new(Vec2::new(length + 30.0, 0.0), 30.0);
        let rock = Obstacle::new(Vec2::new(along * length, offset * radius), radius);
        let plan = plan_curve(Vec2::ZERO, from_angle(heading) * 15.0, target, &[rock], &tuning);

        let closest = (0..=400)
            .map(|i| quadratic_bezier(plan.start, plan.control, plan.end, i as f32 / 400.0))
            .map(|p| p.distance(rock.center))
            .fold(f32::MAX, f32::min);
        prop_assert!(closest >= radius, "curve passes {} from a r={} rock", closest, radius);
    }
}
