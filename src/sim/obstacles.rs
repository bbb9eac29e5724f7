//! Procedural obstacle field
//!
//! One uniform draw per candidate cell picks the type from a fixed
//! cumulative ladder. Counts per type are probabilistic; nothing here
//! guarantees a minimum of anything.

use glam::{IVec2, Vec2};
use rand::Rng;

use super::grid::Grid;
use super::state::{Axis, GameState, Obstacle, ObstacleKind, Oscillation};
use crate::consts::{PLAYER_SPAWN, SPAWN_CLEARANCE};
use crate::theme::ThemeRules;

/// Candidates stay this many cells clear of the world edge
const EDGE_MARGIN: i32 = 2;
/// Redraws before a teleport target falls back to the far corner
const TELEPORT_TARGET_ATTEMPTS: usize = 8;

/// Cumulative thresholds for the type draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeLadder {
    pub boost: f32,
    pub slow: f32,
    pub teleport: f32,
    /// Equal to `teleport` when weapons are disabled
    pub weapon: f32,
    pub moving_wall: f32,
    pub pillar: f32,
}

impl TypeLadder {
    pub fn new(weapons: bool) -> Self {
        let weapon_band = if weapons { 0.04 } else { 0.0 };
        let weapon = 0.20 + weapon_band;
        Self {
            boost: 0.08,
            slow: 0.16,
            teleport: 0.20,
            weapon,
            moving_wall: weapon + 0.10,
            pillar: weapon + 0.15,
        }
    }
}

/// Fill the world with `floor(cols * rows / 100)` candidates, skipping the
/// ones that land next to the player spawn, then append the theme landmark.
pub fn generate<R: Rng + ?Sized>(
    grid: Grid,
    rules: &ThemeRules,
    weapons: bool,
    rng: &mut R,
) -> Vec<Obstacle> {
    let ladder = TypeLadder::new(weapons);
    let count = (grid.cols as i64 * grid.rows as i64 / 100).max(0) as usize;
    let mut obstacles = Vec::with_capacity(count + 1);

    let spawnable = grid.cols > 2 * EDGE_MARGIN && grid.rows > 2 * EDGE_MARGIN;
    if spawnable {
        for _ in 0..count {
            let cell = random_cell(grid, rng);

            // Rejected, not retried
            if (cell.x - PLAYER_SPAWN.0).abs() < SPAWN_CLEARANCE
                && (cell.y - PLAYER_SPAWN.1).abs() < SPAWN_CLEARANCE
            {
                continue;
            }

            let (kind, size) = draw_kind(grid, cell, &ladder, rules, rng);
            obstacles.push(Obstacle::new(obstacles.len() as u32 + 1, kind, cell, size));
        }
    }

    if let Some(landmark) = rules.landmark {
        let mut obstacle = landmark(grid);
        obstacle.id = obstacles.len() as u32 + 1;
        obstacles.push(obstacle);
    }

    obstacles
}

fn random_cell<R: Rng + ?Sized>(grid: Grid, rng: &mut R) -> IVec2 {
    IVec2::new(
        rng.random_range(EDGE_MARGIN..grid.cols - EDGE_MARGIN),
        rng.random_range(EDGE_MARGIN..grid.rows - EDGE_MARGIN),
    )
}

/// Target at least two cells from the pad in some axis, so a pad can
/// never bounce the player back onto the cell it came from
fn teleport_target<R: Rng + ?Sized>(grid: Grid, anchor: IVec2, rng: &mut R) -> IVec2 {
    for _ in 0..TELEPORT_TARGET_ATTEMPTS {
        let target = random_cell(grid, rng);
        if (target - anchor).abs().max_element() > 1 {
            return target;
        }
    }
    let far_x = if anchor.x < grid.cols / 2 { grid.cols - 1 - EDGE_MARGIN } else { EDGE_MARGIN };
    let far_y = if anchor.y < grid.rows / 2 { grid.rows - 1 - EDGE_MARGIN } else { EDGE_MARGIN };
    IVec2::new(far_x, far_y)
}

fn draw_kind<R: Rng + ?Sized>(
    grid: Grid,
    anchor: IVec2,
    ladder: &TypeLadder,
    rules: &ThemeRules,
    rng: &mut R,
) -> (ObstacleKind, Vec2) {
    let roll: f32 = rng.random();

    if roll < ladder.boost {
        (ObstacleKind::Boost, Vec2::ONE)
    } else if roll < ladder.slow {
        (ObstacleKind::Slow, Vec2::ONE)
    } else if roll < ladder.teleport {
        let target = teleport_target(grid, anchor, rng);
        (ObstacleKind::Teleport { target }, Vec2::ONE)
    } else if roll < ladder.weapon {
        (ObstacleKind::Weapon, Vec2::ONE)
    } else if roll < ladder.moving_wall {
        let axis = if rng.random_bool(0.5) { Axis::X } else { Axis::Y };
        let oscillation = Oscillation {
            axis,
            amplitude: rng.random_range(2..=4_i32) as f32,
            angular_speed: 0.002 + rng.random::<f32>() * 0.003,
        };
        (ObstacleKind::MovingWall(oscillation), Vec2::ONE)
    } else if roll < ladder.pillar {
        let height = 3.0 + rng.random::<f32>() * 2.0;
        (ObstacleKind::Pillar, Vec2::new(1.0, height))
    } else {
        match rules.decoration {
            Some(deco) if roll > deco.threshold => (ObstacleKind::Decoration, deco.size),
            _ => (ObstacleKind::Wall, Vec2::ONE),
        }
    }
}

impl GameState {
    /// Replace the obstacle field for a new session
    pub fn regenerate_obstacles(&mut self) {
        let rules = self.theme.rules();
        let grid = self.grid;
        let weapons = self.weapons;
        let mut obstacles = generate(grid, &rules, weapons, self.rng());
        // Ids are unique across the session, not just this batch
        for obstacle in &mut obstacles {
            obstacle.id = self.next_entity_id();
        }
        log::info!(
            "Generated {} obstacles on {}x{} ({})",
            obstacles.len(),
            grid.cols,
            grid.rows,
            self.theme.as_str()
        );
        self.obstacles = obstacles;
    }
}
