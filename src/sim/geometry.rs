//! Circle and segment geometry
//!
//! Everything that moves or blocks in the asteroid field is a circle, so the
//! whole collision and path-obstruction story reduces to a handful of
//! closest-point tests.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{from_angle, heading};

/// A circle that can block a guided shot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub center: Vec2,
    pub radius: f32,
}

impl Obstacle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// Closest point on segment `a`-`b` to `p`
pub fn closest_point_on_segment(a: Vec2, b: Vec2, p: Vec2) -> Vec2 {
    let line_vec = b - a;
    let len_sq = line_vec.length_squared();
    if len_sq < 1e-8 {
        return a;
    }
    let t = ((p - a).dot(line_vec) / len_sq).clamp(0.0, 1.0);
    a + line_vec * t
}

/// True when segment `a`-`b` passes within `radius` of `center`
///
/// A zero-length segment degrades to a point-in-circle test.
pub fn segment_intersects_circle(a: Vec2, b: Vec2, center: Vec2, radius: f32) -> bool {
    let closest = closest_point_on_segment(a, b, center);
    closest.distance(center) < radius
}

/// Strict circle overlap: distance between centers below the sum of radii
#[inline]
pub fn circles_overlap(a: Vec2, radius_a: f32, b: Vec2, radius_b: f32) -> bool {
    a.distance(b) < radius_a + radius_b
}

/// First obstacle (in slice order) whose inflated circle crosses `a`-`b`
pub fn first_blocking(a: Vec2, b: Vec2, obstacles: &[Obstacle], margin: f32) -> Option<&Obstacle> {
    obstacles
        .iter()
        .find(|o| segment_intersects_circle(a, b, o.center, o.radius + margin))
}

/// Point on a circle's border that faces `from`
///
/// When `from` sits on the center the heading is zero, which picks the
/// left-most border point rather than producing NaN.
pub fn border_point_facing(center: Vec2, radius: f32, from: Vec2) -> Vec2 {
    let hit_angle = heading(center - from);
    center - from_angle(hit_angle) * radius
}

/// Quadratic Bézier B(t) = (1−t)²·p0 + 2(1−t)t·p1 + t²·p2
#[inline]
pub fn quadratic_bezier(p0: Vec2, p1: Vec2, p2: Vec2, t: f32) -> Vec2 {
    let u = 1.0 - t;
    p0 * (u * u) + p1 * (2.0 * u * t) + p2 * (t * t)
}

/// 2D cross product (z component)
#[inline]
pub fn cross(a: Vec2, b: Vec2) -> f32 {
    a.x * b.y - a.y * b.x
}

/// Wrap a point that left the field back to the opposite edge
pub fn wrap_point(mut pos: Vec2, width: f32, height: f32) -> Vec2 {
    if pos.x > width {
        pos.x = 0.0;
    }
    if pos.x < 0.0 {
        pos.x = width;
    }
    if pos.y > height {
        pos.y = 0.0;
    }
    if pos.y < 0.0 {
        pos.y = height;
    }
    pos
}

/// Wrap with an off-screen buffer, for bodies that should fully leave first
pub fn wrap_point_buffered(mut pos: Vec2, width: f32, height: f32, buffer: f32) -> Vec2 {
    if pos.x > width + buffer {
        pos.x = -buffer;
    }
    if pos.x < -buffer {
        pos.x = width + buffer;
    }
    if pos.y > height + buffer {
        pos.y = -buffer;
    }
    if pos.y < -buffer {
        pos.y = height + buffer;
    }
    pos
}
