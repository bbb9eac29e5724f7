//! Light Cycle - a first-person grid racer
//!
//! Core modules:
//! - `sim`: Grid simulation (movement, collisions, obstacles, opponent AI)
//! - `camera`: Smoothed camera pose and level perspective projection
//! - `game`: Frame driver wiring the simulation to audio, storage and UI
//! - `theme`: Theme identifiers and their obstacle-generation rules
//! - `persistence`: High score storage
//! - `settings`: Player preferences and AI tuning

pub mod audio;
pub mod camera;
pub mod error;
pub mod game;
pub mod persistence;
pub mod settings;
pub mod sim;
pub mod theme;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use camera::{Camera, Projected, Projector};
pub use error::StorageError;
pub use game::{Announcement, Game};
pub use settings::{AiTuning, QualityPreset, Settings};
pub use theme::ThemeId;

/// Game configuration constants
pub mod consts {
    /// Pixels per grid cell at 1x world scale
    pub const CELL_PX: f32 = 24.0;
    /// World is this many times larger than the viewport in cells
    pub const WORLD_SCALE: f32 = 8.0;

    /// Slowest tick interval (ms), throttle at 0
    pub const MAX_TICK_MS: f64 = 120.0;
    /// Fastest tick interval (ms), throttle at 100
    pub const MIN_TICK_MS: f64 = 50.0;
    /// BOOST multiplies the tick interval by this
    pub const BOOST_FACTOR: f64 = 0.7;
    /// SLOW multiplies the tick interval by this
    pub const SLOW_FACTOR: f64 = 1.3;
    /// SLOW never pushes the interval past MAX_TICK_MS times this
    pub const SLOW_CAP: f64 = 1.5;
    /// Throttle step per key press
    pub const THROTTLE_STEP: i32 = 5;

    /// Player spawn cell
    pub const PLAYER_SPAWN: (i32, i32) = (10, 10);
    /// Obstacles are never generated within this box distance of the spawn
    pub const SPAWN_CLEARANCE: i32 = 5;

    pub const INITIAL_LIVES: u8 = 3;
    pub const INVULNERABILITY_MS: f64 = 2000.0;
    pub const WEAPON_MS: f64 = 10_000.0;

    /// Score for derezzing an opponent, multiplied by its difficulty tier
    pub const OPPONENT_BONUS: u64 = 500;
    pub const OPPONENT_RESPAWN_MS: f64 = 30_000.0;
    /// How long the "new opponent" banner stays up
    pub const ANNOUNCEMENT_MS: f64 = 3000.0;

    /// Forgiving player-vs-obstacle overlap, per axis
    pub const OBSTACLE_HIT_RADIUS: f32 = 0.7;

    /// Camera
    pub const FOCAL_LENGTH: f32 = 350.0;
    pub const CAMERA_HEIGHT: f32 = 0.5;
    pub const LOOK_AHEAD: f32 = 1.0;
    pub const ANGLE_SMOOTHING: f32 = 0.2;
    pub const NEAR_PLANE: f32 = 0.1;
    pub const MAX_PROJECTED_SCALE: f32 = 10_000.0;

    /// Particle life lost per rendered frame
    pub const PARTICLE_DECAY: f32 = 0.02;
}

/// Normalize angle to (-π, π]
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle > PI {
        angle -= 2.0 * PI;
    }
    while angle <= -PI {
        angle += 2.0 * PI;
    }
    angle
}
