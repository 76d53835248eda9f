//! Waypoint routing around obstacles
//!
//! Splits a blocked segment into start → waypoint → end, recursing on both
//! halves until each leg is clear or the depth cap is hit. Guided shots fly
//! Bézier curves from [`super::curve`] instead; this router is kept as a
//! standalone polyline planner and is not used by the firing path.

use glam::Vec2;

use super::geometry::{Obstacle, first_blocking};
use crate::consts::{WAYPOINT_CLEARANCE, WAYPOINT_MARGIN, WAYPOINT_MAX_DEPTH};

/// Polyline from `start` to `end` that steps around `obstacles`
///
/// The returned path always begins with `start` and ends with `end`.
pub fn waypoint_path(start: Vec2, end: Vec2, obstacles: &[Obstacle]) -> Vec<Vec2> {
    route(start, end, obstacles, 0)
}

fn route(start: Vec2, end: Vec2, obstacles: &[Obstacle], depth: u32) -> Vec<Vec2> {
    if depth > WAYPOINT_MAX_DEPTH {
        return vec![start, end];
    }

    let Some(blocking) = first_blocking(start, end, obstacles, WAYPOINT_MARGIN) else {
        return vec![start, end];
    };

    let waypoint = avoidance_waypoint(start, end, blocking);
    let mut path = route(start, waypoint, obstacles, depth + 1);
    let tail = route(waypoint, end, obstacles, depth + 1);
    // Both halves contain the waypoint
    path.extend(tail.into_iter().skip(1));
    path
}

/// Point beside `obstacle`, on whichever side is closer to `end`
pub fn avoidance_waypoint(start: Vec2, end: Vec2, obstacle: &Obstacle) -> Vec2 {
    let to_obstacle = obstacle.center - start;
    let perp = to_obstacle.perp().normalize_or_zero();
    let offset = perp * (obstacle.radius + WAYPOINT_CLEARANCE);

    let left = obstacle.center + offset;
    let right = obstacle.center - offset;
    if left.distance(end) < right.distance(end) {
        left
    } else {
        right
    }
}
