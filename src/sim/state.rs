//! Game state and core simulation types
//!
//! Everything the frame loop mutates lives in [`GameState`]. Renderers and
//! other collaborators read it (or a [`super::Snapshot`]) and never write.

use glam::{IVec2, Vec2};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::grid::{Grid, Heading};
use super::motion::Vehicle;
use crate::audio::SoundEffect;
use crate::camera::Camera;
use crate::consts::*;
use crate::settings::{AiTuning, Settings};
use crate::theme::ThemeId;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, nothing moves
    Start,
    /// Active gameplay
    Playing,
    /// Ticks frozen, cosmetics keep running
    Paused,
    /// Run ended
    GameOver,
}

/// Sideways axis a moving wall slides along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

/// Sinusoidal motion of a moving wall around its anchor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Oscillation {
    pub axis: Axis,
    /// Cells either side of the anchor
    pub amplitude: f32,
    /// Radians per millisecond
    pub angular_speed: f32,
}

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ObstacleKind {
    Wall,
    Boost,
    Slow,
    Teleport { target: IVec2 },
    MovingWall(Oscillation),
    Pillar,
    Decoration,
    GiantTree,
    Weapon,
}

impl ObstacleKind {
    /// Lethal to an unarmed player, shattered by an armed one
    pub fn is_destructible(&self) -> bool {
        matches!(
            self,
            ObstacleKind::Wall | ObstacleKind::MovingWall(_) | ObstacleKind::Pillar
        )
    }

    /// The opponent drives over speed pads and steers around everything else
    pub fn blocks_opponent(&self) -> bool {
        !matches!(self, ObstacleKind::Boost | ObstacleKind::Slow)
    }

    pub fn color(&self) -> ColorKey {
        match self {
            ObstacleKind::Wall | ObstacleKind::Decoration | ObstacleKind::GiantTree => {
                ColorKey::Wall
            }
            ObstacleKind::Boost => ColorKey::Boost,
            ObstacleKind::Slow => ColorKey::Slow,
            ObstacleKind::Teleport { .. } => ColorKey::Teleport,
            ObstacleKind::MovingWall(_) => ColorKey::MovingWall,
            ObstacleKind::Pillar => ColorKey::Pillar,
            ObstacleKind::Weapon => ColorKey::Weapon,
        }
    }
}

/// An axis-aligned obstacle anchored on a cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    /// Generation cell; moving walls oscillate around it
    pub anchor: IVec2,
    /// Live position (equals the anchor unless the obstacle moves)
    pub pos: Vec2,
    /// Extent in cells; height may be fractional for tall scenery
    pub size: Vec2,
}

impl Obstacle {
    pub fn new(id: u32, kind: ObstacleKind, anchor: IVec2, size: Vec2) -> Self {
        Self {
            id,
            kind,
            anchor,
            pos: anchor.as_vec2(),
            size,
        }
    }

    /// Recompute the live position of a moving wall at wall-clock `now_ms`
    pub fn oscillate(&mut self, now_ms: f64) {
        if let ObstacleKind::MovingWall(osc) = self.kind {
            let offset = ((now_ms * osc.angular_speed as f64).sin() as f32) * osc.amplitude;
            let anchor = self.anchor.as_vec2();
            self.pos = match osc.axis {
                Axis::X => Vec2::new(anchor.x + offset, anchor.y),
                Axis::Y => Vec2::new(anchor.x, anchor.y + offset),
            };
        }
    }

    /// Forgiving overlap used for the player: both axis deltas under `radius`
    pub fn touches(&self, cell: IVec2, radius: f32) -> bool {
        let d = (self.pos - cell.as_vec2()).abs();
        d.x < radius && d.y < radius
    }

    /// Rectangle containment used for the opponent's route planning
    pub fn covers(&self, cell: IVec2) -> bool {
        let c = cell.as_vec2();
        c.x >= self.pos.x
            && c.x < self.pos.x + self.size.x
            && c.y >= self.pos.y
            && c.y < self.pos.y + self.size.y
    }
}

/// Palette slot a renderer resolves against the active theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ColorKey {
    Player,
    Opponent,
    Wall,
    Boost,
    Slow,
    Teleport,
    MovingWall,
    Pillar,
    Weapon,
}

/// A particle for visual feedback (never affects gameplay)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 0-1, decreases every frame
    pub life: f32,
    pub color: ColorKey,
}

/// Opponent skill tier, fixed at spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Multiplier applied to [`OPPONENT_BONUS`]
    pub fn bonus_multiplier(&self) -> u64 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Hard => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::Medium => "MEDIUM",
            Difficulty::Hard => "HARD",
        }
    }
}

/// The human-controlled cycle
#[derive(Debug, Clone)]
pub struct Player {
    pub cycle: Vehicle,
    pub lives: u8,
    /// Hits are ignored while `now` is before this (ms)
    pub invulnerable_until: f64,
    /// Destructible obstacles shatter while `now` is before this (ms)
    pub weapon_until: f64,
}

impl Player {
    pub fn new(spawn: IVec2, heading: Heading) -> Self {
        Self {
            cycle: Vehicle::new(spawn, heading),
            lives: INITIAL_LIVES,
            invulnerable_until: 0.0,
            weapon_until: 0.0,
        }
    }

    #[inline]
    pub fn is_invulnerable(&self, now: f64) -> bool {
        now < self.invulnerable_until
    }

    #[inline]
    pub fn is_armed(&self, now: f64) -> bool {
        now < self.weapon_until
    }
}

/// The AI-controlled cycle
#[derive(Debug, Clone)]
pub struct Opponent {
    pub cycle: Vehicle,
    pub difficulty: Difficulty,
}

/// Either a live opponent or the deadline for the next one
#[derive(Debug, Clone)]
pub enum OpponentSlot {
    Alive(Opponent),
    Respawning { at: f64 },
}

impl OpponentSlot {
    pub fn alive(&self) -> Option<&Opponent> {
        match self {
            OpponentSlot::Alive(opponent) => Some(opponent),
            OpponentSlot::Respawning { .. } => None,
        }
    }

    pub fn is_alive(&self) -> bool {
        matches!(self, OpponentSlot::Alive(_))
    }

    pub fn respawn_at(&self) -> Option<f64> {
        match self {
            OpponentSlot::Alive(_) => None,
            OpponentSlot::Respawning { at } => Some(*at),
        }
    }

    /// True if a live opponent's trail covers `cell`
    pub fn trail_contains(&self, cell: IVec2) -> bool {
        self.alive().is_some_and(|o| o.cycle.trail_contains(cell))
    }
}

/// Things that happened during a frame, drained by the driver
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    Sound(SoundEffect),
    /// Engine drone level 0-1, `None` to stop it
    Engine(Option<f32>),
    OpponentSpawned { difficulty: Difficulty },
    OpponentDerezzed { difficulty: Difficulty, bonus: u64 },
    LifeLost { lives_left: u8 },
    WeaponArmed { until: f64 },
    ObstacleDestroyed { id: u32 },
    GameOver { score: u64, new_high_score: bool },
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    pub grid: Grid,
    pub theme: ThemeId,
    pub phase: GamePhase,
    pub score: u64,
    pub high_score: u64,
    pub player: Player,
    pub opponent: OpponentSlot,
    pub obstacles: Vec<Obstacle>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub camera: Camera,
    /// 0-100
    pub throttle: u8,
    /// Current tick interval in ms
    pub tick_interval: f64,
    /// Wall-clock time (ms) of the last simulation tick
    pub last_tick: f64,
    /// Queued for the driver, cleared when drained
    pub events: Vec<GameEvent>,
    /// Generation and AI knobs captured at construction
    pub weapons: bool,
    pub tuning: AiTuning,
    pub max_particles: usize,
    rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Create a session on the title screen; call `start_game` to play
    pub fn new(grid: Grid, settings: &Settings, seed: u64, high_score: u64) -> Self {
        let spawn = IVec2::new(PLAYER_SPAWN.0, PLAYER_SPAWN.1);
        Self {
            grid,
            theme: settings.theme,
            phase: GamePhase::Start,
            score: 0,
            high_score,
            player: Player::new(spawn, Heading::Right),
            opponent: OpponentSlot::Respawning { at: f64::INFINITY },
            obstacles: Vec::new(),
            particles: Vec::new(),
            camera: Camera::at(spawn.as_vec2() + Heading::Right.delta().as_vec2(), 0.0),
            throttle: 0,
            tick_interval: MAX_TICK_MS,
            last_tick: 0.0,
            events: Vec::new(),
            weapons: settings.weapons,
            tuning: settings.ai.clone(),
            max_particles: settings.max_particles(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn play(&mut self, effect: SoundEffect) {
        self.events.push(GameEvent::Sound(effect));
    }

    /// Burst of `count` particles centred on `cell`
    pub fn spawn_particles(&mut self, cell: IVec2, color: ColorKey, count: usize) {
        let room = self.max_particles.saturating_sub(self.particles.len());
        let center = cell.as_vec2() + Vec2::splat(0.5);
        for _ in 0..count.min(room) {
            let vel = Vec2::new(
                (self.rng.random::<f32>() - 0.5) * 0.2,
                (self.rng.random::<f32>() - 0.5) * 0.2,
            );
            self.particles.push(Particle {
                pos: center,
                vel,
                life: 1.0,
                color,
            });
        }
    }

    /// Map throttle (0-100) onto the tick interval, fastest at full throttle
    pub fn set_throttle(&mut self, throttle: i32) {
        self.throttle = throttle.clamp(0, 100) as u8;
        let t = self.throttle as f64 / 100.0;
        self.tick_interval = MAX_TICK_MS - t * (MAX_TICK_MS - MIN_TICK_MS);
    }

    /// Cell the renderer should treat as "behind" the player for interpolation
    pub fn player_previous_cell(&self) -> IVec2 {
        let trail = &self.player.cycle.trail;
        if trail.len() >= 2 {
            trail[trail.len() - 2]
        } else {
            self.player.cycle.pos
        }
    }
}
