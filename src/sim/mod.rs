//! Grid simulation module
//!
//! All gameplay logic lives here. Nothing in this module renders, plays
//! sound or touches storage; side effects leave as queued [`GameEvent`]s.
//! - Seeded RNG only
//! - Wall-clock time is passed in, never read
//! - Obstacles keep insertion order

pub mod ai;
pub mod collision;
pub mod grid;
pub mod motion;
pub mod obstacles;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use ai::{autopilot_heading, legal_headings, spawn_opponent};
pub use collision::{HitOutcome, MoveOutcome, hit, resolve_player_move};
pub use grid::{Grid, Heading, Turn, manhattan};
pub use motion::Vehicle;
pub use obstacles::{TypeLadder, generate};
pub use snapshot::{CycleView, OpponentView, Snapshot};
pub use state::{
    Axis, ColorKey, Difficulty, GameEvent, GamePhase, GameState, Obstacle, ObstacleKind,
    Opponent, OpponentSlot, Oscillation, Particle, Player,
};
pub use tick::{FrameInput, frame, start_game};
