//! Chase camera and the level perspective projector
//!
//! The camera only rotates about the vertical axis and always looks level
//! from a fixed height, so projection is a 2D rotation plus a depth scale.

use glam::{IVec2, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::normalize_angle;
use crate::sim::Heading;

/// Smoothed camera pose, updated every rendered frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// World position in cells (not grid-snapped)
    pub pos: Vec2,
    /// Yaw in radians, 0 looks along +x
    pub angle: f32,
}

impl Camera {
    pub fn at(pos: Vec2, angle: f32) -> Self {
        Self { pos, angle }
    }

    /// Ease toward the followed vehicle.
    ///
    /// `progress` is the fraction of the current tick interval elapsed,
    /// clamped to [0, 1].
    pub fn follow(&mut self, prev: IVec2, cur: IVec2, heading: Heading, progress: f32) {
        let progress = progress.clamp(0.0, 1.0);

        let diff = normalize_angle(heading.angle() - self.angle);
        self.angle = normalize_angle(self.angle + diff * ANGLE_SMOOTHING);

        let body = prev.as_vec2().lerp(cur.as_vec2(), progress);
        self.pos = body + Vec2::from_angle(self.angle) * LOOK_AHEAD;
    }
}

/// A drawable point on screen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projected {
    pub x: f32,
    pub y: f32,
    /// Pixels per world unit at this depth
    pub scale: f32,
}

/// Minimal perspective projector for a level, yaw-only camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    /// Viewport size in pixels
    pub viewport: Vec2,
    pub focal_length: f32,
    pub camera_height: f32,
}

impl Projector {
    pub fn new(viewport: Vec2) -> Self {
        Self {
            viewport,
            focal_length: FOCAL_LENGTH,
            camera_height: CAMERA_HEIGHT,
        }
    }

    /// Project a world point (`x`, `y` on the ground plane, `z` vertical).
    ///
    /// Returns `None` for points at or behind the near plane; callers skip
    /// drawing them.
    pub fn project(&self, camera: &Camera, point: Vec3) -> Option<Projected> {
        let dx = point.x - camera.pos.x;
        let dz = point.y - camera.pos.y;
        let dy = point.z + self.camera_height;

        let (sin, cos) = camera.angle.sin_cos();
        let right = -dx * sin + dz * cos;
        let depth = dx * cos + dz * sin;

        if depth <= NEAR_PLANE {
            return None;
        }

        let scale = (self.focal_length / depth.max(0.01)).min(MAX_PROJECTED_SCALE);
        Some(Projected {
            x: self.viewport.x / 2.0 + right * scale,
            y: self.viewport.y / 2.0 + dy * scale,
            scale,
        })
    }
}
