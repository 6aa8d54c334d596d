use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A circle in world space. Read-only projection of a ball or gun body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

/// Four world-space vertices of a convex obstacle, counter-clockwise.
/// Obstacles are always rectangles, so the projection is exactly four points.
pub type Polygon4 = [Vec2; 4];
