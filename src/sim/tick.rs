//! Frame loop with a gated simulation tick
//!
//! `frame` runs once per rendered frame. Cosmetics (particles, moving walls,
//! camera) update every call; vehicle motion only advances when the current
//! tick interval has elapsed since the last tick.

use glam::IVec2;

use super::ai::{autopilot_heading, fallback_spawn, move_opponent, place_opponent, spawn_opponent};
use super::collision::resolve_player_move;
use super::grid::{Heading, Turn};
use super::state::{GameEvent, GamePhase, GameState, Player};
use crate::camera::Camera;
use crate::consts::*;

/// Input gathered since the previous frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameInput {
    /// Rotate 90° relative to the committed heading
    pub turn: Option<Turn>,
    /// Added to the throttle (clamped to 0-100)
    pub throttle_delta: i32,
    /// Pause toggle
    pub pause: bool,
    /// Start a run from the title or game-over screen
    pub start: bool,
    /// Idle/demo mode - the core steers the player
    pub autopilot: bool,
}

impl FrameInput {
    /// Map a DOM-style key name to an input
    pub fn from_key(key: &str) -> Self {
        let mut input = Self::default();
        match key {
            "ArrowLeft" | "a" | "A" => input.turn = Some(Turn::Left),
            "ArrowRight" | "d" | "D" => input.turn = Some(Turn::Right),
            "ArrowUp" | "w" | "W" => input.throttle_delta = THROTTLE_STEP,
            "ArrowDown" | "s" | "S" => input.throttle_delta = -THROTTLE_STEP,
            "Enter" => input.start = true,
            " " | "Space" | "p" | "P" | "Escape" => input.pause = true,
            _ => {}
        }
        input
    }

    /// Fold another key's input into this frame; the later turn wins
    pub fn merge(&mut self, other: FrameInput) {
        if other.turn.is_some() {
            self.turn = other.turn;
        }
        self.throttle_delta += other.throttle_delta;
        self.pause |= other.pause;
        self.start |= other.start;
        self.autopilot |= other.autopilot;
    }
}

/// Reset everything for a new run and enter `Playing`
pub fn start_game(state: &mut GameState, now: f64) {
    let spawn = IVec2::new(PLAYER_SPAWN.0, PLAYER_SPAWN.1);
    state.player = Player::new(spawn, Heading::Right);
    state.camera = Camera::at(spawn.as_vec2() + Heading::Right.delta().as_vec2(), 0.0);
    state.score = 0;
    state.particles.clear();
    state.set_throttle(0);

    state.regenerate_obstacles();
    for obstacle in &mut state.obstacles {
        obstacle.oscillate(now);
    }

    let corner = fallback_spawn(state);
    place_opponent(state, corner, Heading::Left);

    state.phase = GamePhase::Playing;
    state.last_tick = now;
    state.push_event(GameEvent::Engine(Some(0.0)));
    log::info!(
        "Run started on {}x{} ({}), high score {}",
        state.grid.cols,
        state.grid.rows,
        state.theme.as_str(),
        state.high_score
    );
}

fn engine_level(state: &GameState) -> f32 {
    state.throttle as f32 / 100.0
}

/// Advance one rendered frame at wall-clock `now` (ms)
pub fn frame(state: &mut GameState, input: &FrameInput, now: f64) {
    if input.start && matches!(state.phase, GamePhase::Start | GamePhase::GameOver) {
        start_game(state, now);
    }

    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                state.push_event(GameEvent::Engine(None));
                log::debug!("Paused");
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                // No catch-up burst after a long pause
                state.last_tick = now;
                let level = engine_level(state);
                state.push_event(GameEvent::Engine(Some(level)));
                log::debug!("Resumed");
            }
            _ => {}
        }
    }

    if state.phase == GamePhase::Playing {
        if let Some(turn) = input.turn {
            state.player.cycle.steer(turn);
        }
        if input.throttle_delta != 0 {
            state.set_throttle(state.throttle as i32 + input.throttle_delta);
            let level = engine_level(state);
            state.push_event(GameEvent::Engine(Some(level)));
        }
    }

    update_particles(state);
    for obstacle in &mut state.obstacles {
        obstacle.oscillate(now);
    }

    if state.phase != GamePhase::Playing {
        return;
    }

    if state.opponent.respawn_at().is_some_and(|at| now >= at) {
        spawn_opponent(state);
    }

    if now - state.last_tick >= state.tick_interval {
        state.last_tick = now;
        step(state, now, input.autopilot);
    }

    let progress = ((now - state.last_tick) / state.tick_interval).min(1.0) as f32;
    let prev = state.player_previous_cell();
    let cycle = &state.player.cycle;
    let (cur, heading) = (cycle.pos, cycle.heading);
    state.camera.follow(prev, cur, heading, progress);
}

/// One simulation tick: player first, then the opponent against the
/// player's post-move trail
fn step(state: &mut GameState, now: f64, autopilot: bool) {
    if autopilot {
        let heading = autopilot_heading(state, now);
        state.player.cycle.requested = heading;
    }

    resolve_player_move(state, now);

    if state.phase == GamePhase::Playing {
        move_opponent(state, now);
    }
}

fn update_particles(state: &mut GameState) {
    for particle in &mut state.particles {
        particle.pos += particle.vel;
        particle.life -= PARTICLE_DECAY;
    }
    state.particles.retain(|p| p.life > 0.0);
}
