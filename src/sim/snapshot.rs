//! Read-only view handed to renderers once per frame

use glam::IVec2;
use serde::Serialize;

use super::grid::{Grid, Heading};
use super::motion::Vehicle;
use super::state::{Difficulty, GamePhase, GameState, Obstacle, Particle};
use crate::camera::Camera;
use crate::theme::ThemeId;

#[derive(Debug, Clone, Serialize)]
pub struct CycleView {
    pub pos: IVec2,
    pub heading: Heading,
    /// Oldest first, newest cells withheld by the reveal delay
    pub trail: Vec<IVec2>,
}

impl CycleView {
    fn capture(cycle: &Vehicle, reveal_delay: usize) -> Self {
        let shown = cycle.trail.len().saturating_sub(reveal_delay);
        Self {
            pos: cycle.pos,
            heading: cycle.heading,
            trail: cycle.trail[..shown].to_vec(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OpponentView {
    #[serde(flatten)]
    pub cycle: CycleView,
    pub difficulty: Difficulty,
}

/// Everything a renderer or HUD needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub grid: Grid,
    pub theme: ThemeId,
    pub camera: Camera,
    pub player: CycleView,
    pub opponent: Option<OpponentView>,
    /// Live (oscillated) positions
    pub obstacles: Vec<Obstacle>,
    pub particles: Vec<Particle>,
    pub score: u64,
    pub high_score: u64,
    pub lives: u8,
    pub throttle: u8,
    pub tick_interval: f64,
    pub invulnerable: bool,
    pub armed: bool,
    /// Milliseconds of weapon time left, 0 when unarmed
    pub weapon_remaining: f64,
    /// Banner text, filled in by the driver
    pub announcement: Option<String>,
}

impl Snapshot {
    pub fn capture(state: &GameState, now: f64, reveal_delay: usize) -> Self {
        let player = &state.player;
        Self {
            phase: state.phase,
            grid: state.grid,
            theme: state.theme,
            camera: state.camera,
            player: CycleView::capture(&player.cycle, reveal_delay),
            opponent: state.opponent.alive().map(|o| OpponentView {
                cycle: CycleView::capture(&o.cycle, reveal_delay),
                difficulty: o.difficulty,
            }),
            obstacles: state.obstacles.clone(),
            particles: state.particles.clone(),
            score: state.score,
            high_score: state.high_score,
            lives: player.lives,
            throttle: state.throttle,
            tick_interval: state.tick_interval,
            invulnerable: player.is_invulnerable(now),
            armed: player.is_armed(now),
            weapon_remaining: (player.weapon_until - now).max(0.0),
            announcement: None,
        }
    }
}
