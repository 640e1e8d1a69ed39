//! Circle-circle overlap testing

use glam::Vec2;

/// True when two circles overlap or touch.
///
/// Compares squared distances so exactly-touching circles count as a hit.
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let rr = ra + rb;
    a.distance_squared(b) <= rr * rr
}
