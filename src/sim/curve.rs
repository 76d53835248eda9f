//! Guided-shot curve planning
//!
//! A guided bullet flies a quadratic Bézier from its launch point to the
//! border of its target. The curve is re-fitted every tick because both the
//! target and the rocks in the way keep drifting.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Obstacle, border_point_facing, cross, first_blocking};
use crate::Tuning;
use crate::consts::DEFLECTION_RADIUS_SCALE;

/// One fitted curve plus how far along it to move per tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePlan {
    pub start: Vec2,
    pub control: Vec2,
    pub end: Vec2,
    /// Parameter increment per tick; 1.0 for degenerate plans
    pub step: f32,
}

/// Arc height as a fraction of chord length for a given alignment
///
/// alignment 1 (already heading at the target) maps to `min`,
/// alignment 0 (perpendicular) to `max`; values outside are clamped.
pub fn arc_fraction(alignment: f32, min: f32, max: f32) -> f32 {
    let fraction = min + (1.0 - alignment) * (max - min);
    fraction.clamp(min, max)
}

/// Fit a curve from `start` to the near side of `target`
///
/// `velocity` is the shot's launch velocity: its direction sets how wide the
/// arc is and which side it bulges to, its length sets the parameter step.
/// `obstacles` must not contain the target itself.
pub fn plan_curve(
    start: Vec2,
    velocity: Vec2,
    target: Obstacle,
    obstacles: &[Obstacle],
    tuning: &Tuning,
) -> CurvePlan {
    let end = border_point_facing(target.center, target.radius, start);
    let to_target = end - start;
    let distance = to_target.length();
    let speed = velocity.length();

    if distance < 1e-4 || speed < 1e-6 {
        // Nothing to fly: finish on the next advance
        return CurvePlan {
            start,
            control: start.lerp(end, 0.5),
            end,
            step: 1.0,
        };
    }

    let dir = to_target / distance;
    let alignment = (velocity / speed).dot(dir);
    let mut arc_height =
        distance * arc_fraction(alignment, tuning.arc_fraction_min, tuning.arc_fraction_max);

    // Bulge toward the side the shot is already heading
    let perp = dir.perp();
    let mut side = if velocity.dot(perp) < 0.0 { -1.0 } else { 1.0 };

    if let Some(obstacle) = first_blocking(start, end, obstacles, tuning.obstacle_margin) {
        let clearance = obstacle.radius + tuning.bullet_radius;
        arc_height = arc_height
            .max(obstacle.radius * DEFLECTION_RADIUS_SCALE + tuning.deflection_buffer)
            .max(clearing_arc(start, dir, distance, obstacle.center, clearance));
        // Positive cross: obstacle sits on the +perp side, so go the other way
        side = if cross(to_target, obstacle.center - start) > 0.0 { -1.0 } else { 1.0 };
    }

    let midpoint = start.lerp(end, 0.5);
    CurvePlan {
        start,
        control: midpoint + perp * (side * arc_height),
        end,
        step: speed / distance,
    }
}

/// Smallest arc height whose curve stays `clearance` away from `center`
///
/// The curve bulges away from the obstacle, and its offset at chord fraction
/// `u` is `2u(1-u)·h`. Every curve point within `clearance` of the obstacle
/// along the chord must sit at least `clearance - |offset|` off it, so the
/// binding point is the end of that window farthest from mid-chord. Windows
/// reaching the chord ends are clamped; a rock over the launch point or the
/// target cannot be cleared anyway.
fn clearing_arc(start: Vec2, dir: Vec2, distance: f32, center: Vec2, clearance: f32) -> f32 {
    let rel = center - start;
    let along = rel.dot(dir) / distance;
    let off_chord = rel.dot(dir.perp()).abs();
    if off_chord >= clearance {
        return 0.0;
    }

    let window = clearance / distance;
    let lo = (along - window).clamp(CHORD_END_GUARD, 1.0 - CHORD_END_GUARD);
    let hi = (along + window).clamp(CHORD_END_GUARD, 1.0 - CHORD_END_GUARD);
    let lift = (lo * (1.0 - lo)).min(hi * (1.0 - hi));
    (clearance - off_chord) / (2.0 * lift)
}

const CHORD_END_GUARD: f32 = 0.05;
