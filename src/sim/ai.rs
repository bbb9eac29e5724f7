//! Opponent AI and spawning, plus the player's demo autopilot
//!
//! The opponent re-plans every tick from the set of legal headings. EASY
//! wanders; MEDIUM and HARD chase the player by Manhattan distance with a
//! random jitter, HARD with less jitter and less stubbornness.

use std::f32::consts::TAU;

use glam::{IVec2, Vec2};
use rand::Rng;
use rand::seq::SliceRandom;

use super::grid::{Heading, Turn, manhattan};
use super::motion::Vehicle;
use super::state::{ColorKey, Difficulty, GameEvent, GameState, Opponent, OpponentSlot};
use crate::audio::SoundEffect;
use crate::consts::*;
use crate::settings::AiTuning;

/// Spawn samples closer than this (box distance) to an obstacle are rejected
const SPAWN_OBSTACLE_CLEARANCE: f32 = 2.0;
/// Diagonal step used when the fallback corner sits on the player
const FALLBACK_OFFSET: i32 = 3;
/// How far ahead the autopilot looks when comparing headings
const AUTOPILOT_LOOKAHEAD: i32 = 8;

/// Can the opponent enter `cell` this tick?
///
/// Runs after the player has moved, so the player's newest cell counts.
fn open_for_opponent(state: &GameState, own: &Vehicle, cell: IVec2) -> bool {
    state.grid.in_bounds(cell)
        && !state
            .obstacles
            .iter()
            .any(|o| o.kind.blocks_opponent() && o.covers(cell))
        && state.player.cycle.pos != cell
        && !state.player.cycle.trail_contains(cell)
        && own.pos != cell
        && !own.trail_contains(cell)
}

/// Headings the opponent may take, never its own reverse
pub fn legal_headings(state: &GameState, own: &Vehicle) -> Vec<Heading> {
    Heading::ALL
        .into_iter()
        .filter(|&h| h != own.heading.opposite())
        .filter(|&h| open_for_opponent(state, own, h.step(own.pos)))
        .collect()
}

/// Pick the next heading from a non-empty legal set
pub fn choose_heading<R: Rng + ?Sized>(
    opponent: &Opponent,
    target: IVec2,
    legal: &[Heading],
    tuning: &AiTuning,
    rng: &mut R,
) -> Heading {
    let pos = opponent.cycle.pos;
    let current = opponent.cycle.heading;
    let current_legal = legal.contains(&current);

    let (jitter, persistence) = match opponent.difficulty {
        Difficulty::Easy => {
            if current_legal && rng.random::<f32>() < tuning.easy_persistence {
                return current;
            }
            return legal[rng.random_range(0..legal.len())];
        }
        Difficulty::Medium => (tuning.medium_jitter, tuning.medium_persistence),
        Difficulty::Hard => (tuning.hard_jitter, tuning.hard_persistence),
    };

    let mut best = legal[0];
    let mut best_score = f32::INFINITY;
    for &heading in legal {
        let score = manhattan(heading.step(pos), target) as f32 + rng.random::<f32>() * jitter;
        if score < best_score {
            best_score = score;
            best = heading;
        }
    }

    if current_legal && rng.random::<f32>() < persistence {
        let drifting_away = manhattan(current.step(pos), target) > manhattan(pos, target);
        if drifting_away { best } else { current }
    } else {
        best
    }
}

/// One opponent tick: re-plan and move, or derez when boxed in
pub fn move_opponent(state: &mut GameState, now: f64) {
    let slot = std::mem::replace(&mut state.opponent, OpponentSlot::Respawning { at: now });
    let OpponentSlot::Alive(mut opponent) = slot else {
        state.opponent = slot;
        return;
    };

    let legal = legal_headings(state, &opponent.cycle);
    if legal.is_empty() {
        derez(state, opponent, now);
        return;
    }

    let target = state.player.cycle.pos;
    let tuning = state.tuning.clone();
    let heading = choose_heading(&opponent, target, &legal, &tuning, state.rng());
    opponent.cycle.requested = heading;
    let next = opponent.cycle.advance();
    opponent.cycle.accept(next);
    state.opponent = OpponentSlot::Alive(opponent);
}

fn derez(state: &mut GameState, opponent: Opponent, now: f64) {
    let difficulty = opponent.difficulty;
    let bonus = OPPONENT_BONUS * difficulty.bonus_multiplier();

    state.spawn_particles(opponent.cycle.pos, ColorKey::Opponent, 30);
    state.play(SoundEffect::Collision);
    state.score += bonus;
    state.opponent = OpponentSlot::Respawning {
        at: now + OPPONENT_RESPAWN_MS,
    };
    state.push_event(GameEvent::OpponentDerezzed { difficulty, bonus });
    log::info!("{} opponent derezzed, +{}", difficulty.as_str(), bonus);
}

/// Weighted draw over EASY / MEDIUM / HARD
pub fn draw_difficulty<R: Rng + ?Sized>(weights: [f32; 3], rng: &mut R) -> Difficulty {
    let total: f32 = weights.iter().map(|w| w.max(0.0)).sum();
    if total <= 0.0 {
        return Difficulty::Medium;
    }
    let mut roll = rng.random::<f32>() * total;
    for (weight, difficulty) in weights
        .iter()
        .zip([Difficulty::Easy, Difficulty::Medium, Difficulty::Hard])
    {
        roll -= weight.max(0.0);
        if roll < 0.0 {
            return difficulty;
        }
    }
    Difficulty::Hard
}

/// Put a fresh opponent on `cell` and announce it
pub fn place_opponent(state: &mut GameState, cell: IVec2, heading: Heading) {
    let weights = state.tuning.difficulty_weights;
    let difficulty = draw_difficulty(weights, state.rng());
    state.opponent = OpponentSlot::Alive(Opponent {
        cycle: Vehicle::new(cell, heading),
        difficulty,
    });
    state.push_event(GameEvent::OpponentSpawned { difficulty });
    log::info!(
        "{} opponent spawned at ({}, {})",
        difficulty.as_str(),
        cell.x,
        cell.y
    );
}

/// Fixed corner used at session start and when sampling gives up.
///
/// On small worlds the corner can land on or next to the player; it is
/// then pushed a few cells diagonally away.
pub fn fallback_spawn(state: &GameState) -> IVec2 {
    let grid = state.grid;
    let corner = grid.clamp(IVec2::new(grid.cols - 10, grid.rows - 10));
    let player = state.player.cycle.pos;
    if (corner - player).abs().max_element() > 1 {
        return corner;
    }
    let away = |p: i32, len: i32| {
        if p + FALLBACK_OFFSET < len {
            p + FALLBACK_OFFSET
        } else {
            p - FALLBACK_OFFSET
        }
    };
    grid.clamp(IVec2::new(away(player.x, grid.cols), away(player.y, grid.rows)))
}

/// Sample a ring around the player for a clear spawn cell
pub fn find_spawn_cell(state: &mut GameState) -> IVec2 {
    let origin = state.player.cycle.pos.as_vec2();
    let tuning = state.tuning.clone();
    let lo = tuning.spawn_min_distance.min(tuning.spawn_max_distance).max(0.0);
    let hi = tuning.spawn_min_distance.max(tuning.spawn_max_distance).max(0.0);

    for _ in 0..tuning.spawn_attempts {
        let angle = state.rng().random::<f32>() * TAU;
        let dist = state.rng().random_range(lo..=hi);
        let cell = (origin + Vec2::from_angle(angle) * dist).round().as_ivec2();

        if !state.grid.in_bounds(cell) {
            continue;
        }
        let crowded = state.obstacles.iter().any(|o| {
            let d = (o.pos - cell.as_vec2()).abs();
            d.x.max(d.y) <= SPAWN_OBSTACLE_CLEARANCE
        });
        if crowded || state.player.cycle.trail_contains(cell) {
            continue;
        }
        return cell;
    }

    log::debug!("Opponent spawn sampling exhausted, using fallback corner");
    fallback_spawn(state)
}

/// Respawn at a sampled cell facing roughly toward the player
pub fn spawn_opponent(state: &mut GameState) {
    let cell = find_spawn_cell(state);
    let to_player = state.player.cycle.pos - cell;
    let heading = if to_player.x.abs() >= to_player.y.abs() {
        if to_player.x >= 0 { Heading::Right } else { Heading::Left }
    } else if to_player.y >= 0 {
        Heading::Down
    } else {
        Heading::Up
    };
    place_opponent(state, cell, heading);
}

fn safe_for_player(state: &GameState, cell: IVec2, now: f64) -> bool {
    let armed = state.player.is_armed(now);
    state.grid.in_bounds(cell)
        && !state.player.cycle.trail_contains(cell)
        && !state.opponent.trail_contains(cell)
        && !state.obstacles.iter().any(|o| {
            o.touches(cell, OBSTACLE_HIT_RADIUS) && o.kind.is_destructible() && !armed
        })
}

/// Straight-line free run along `heading`, capped at the lookahead
fn free_run(state: &GameState, heading: Heading, now: f64) -> i32 {
    let mut cell = state.player.cycle.pos;
    let mut run = 0;
    while run < AUTOPILOT_LOOKAHEAD {
        cell = heading.step(cell);
        if !safe_for_player(state, cell, now) {
            break;
        }
        run += 1;
    }
    run
}

/// Demo-mode steering: go straight while there is room, else turn toward
/// the longer open run
pub fn autopilot_heading(state: &mut GameState, now: f64) -> Heading {
    let current = state.player.cycle.heading;
    let ahead = free_run(state, current, now);
    if ahead >= 3 {
        return current;
    }

    let mut turns = [current.rotate(Turn::Left), current.rotate(Turn::Right)];
    turns.shuffle(state.rng());
    let mut best = (current, ahead);
    for heading in turns {
        let run = free_run(state, heading, now);
        if run > best.1 {
            best = (heading, run);
        }
    }
    best.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::grid::Grid;
    use crate::sim::state::{GamePhase, Obstacle, ObstacleKind};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const NOW: f64 = 50_000.0;

    fn playing_state() -> GameState {
        let mut state = GameState::new(Grid::new(40, 30), &Settings::default(), 9, 0);
        state.phase = GamePhase::Playing;
        state
    }

    fn opponent_at(pos: IVec2, heading: Heading, difficulty: Difficulty) -> Opponent {
        Opponent {
            cycle: Vehicle::new(pos, heading),
            difficulty,
        }
    }

    fn wall(state: &mut GameState, cell: IVec2) {
        let id = state.next_entity_id();
        state
            .obstacles
            .push(Obstacle::new(id, ObstacleKind::Wall, cell, Vec2::ONE));
    }

    #[test]
    fn test_boxed_in_opponent_derezzes() {
        let mut state = playing_state();
        for cell in [(1, 2), (3, 2), (2, 1), (2, 3)] {
            wall(&mut state, IVec2::new(cell.0, cell.1));
        }
        state.opponent =
            OpponentSlot::Alive(opponent_at(IVec2::new(2, 2), Heading::Left, Difficulty::Easy));

        move_opponent(&mut state, NOW);

        assert!(!state.opponent.is_alive());
        assert_eq!(state.opponent.respawn_at(), Some(NOW + 30_000.0));
        assert_eq!(state.score, OPPONENT_BONUS);
        assert!(state.events.contains(&GameEvent::OpponentDerezzed {
            difficulty: Difficulty::Easy,
            bonus: OPPONENT_BONUS
        }));
    }

    #[test]
    fn test_bonus_scales_with_difficulty() {
        let mut state = playing_state();
        // Corner: two sides are the world edge
        wall(&mut state, IVec2::new(1, 0));
        wall(&mut state, IVec2::new(0, 1));
        state.opponent =
            OpponentSlot::Alive(opponent_at(IVec2::new(0, 0), Heading::Up, Difficulty::Hard));
        move_opponent(&mut state, NOW);
        assert_eq!(state.score, 3 * OPPONENT_BONUS);
    }

    #[test]
    fn test_player_cells_are_off_limits() {
        let mut state = playing_state();
        state.player.cycle = Vehicle::new(IVec2::new(20, 9), Heading::Right);
        state.player.cycle.accept(IVec2::new(21, 9));
        let opponent = opponent_at(IVec2::new(20, 10), Heading::Left, Difficulty::Hard);
        let legal = legal_headings(&state, &opponent.cycle);
        assert!(!legal.contains(&Heading::Up));
        assert!(!legal.contains(&Heading::Right));
        assert!(legal.contains(&Heading::Left));
        assert!(legal.contains(&Heading::Down));
    }

    #[test]
    fn test_speed_pads_do_not_block_opponent() {
        let mut state = playing_state();
        let id = state.next_entity_id();
        state.obstacles.push(Obstacle::new(
            id,
            ObstacleKind::Boost,
            IVec2::new(19, 20),
            Vec2::ONE,
        ));
        let opponent = opponent_at(IVec2::new(20, 20), Heading::Left, Difficulty::Easy);
        assert!(legal_headings(&state, &opponent.cycle).contains(&Heading::Left));
    }

    #[test]
    fn test_hard_closes_distance() {
        let tuning = AiTuning::default();
        let opponent = opponent_at(IVec2::new(20, 10), Heading::Left, Difficulty::Hard);
        let legal = [Heading::Up, Heading::Down, Heading::Left];
        for seed in 0..50 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let h = choose_heading(&opponent, IVec2::new(10, 10), &legal, &tuning, &mut rng);
            assert_eq!(h, Heading::Left);
        }
    }

    #[test]
    fn test_hard_turns_when_drifting_away() {
        let tuning = AiTuning::default();
        let opponent = opponent_at(IVec2::new(20, 10), Heading::Right, Difficulty::Hard);
        let legal = [Heading::Up, Heading::Down, Heading::Right];
        for seed in 0..50 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let h = choose_heading(&opponent, IVec2::new(10, 2), &legal, &tuning, &mut rng);
            assert_eq!(h, Heading::Up);
        }
    }

    #[test]
    fn test_pursuit_strengthens_with_difficulty() {
        let tuning = AiTuning::default();
        let target = IVec2::new(5, 10);
        // Down drifts away from the target, Left closes in
        let legal = [Heading::Down, Heading::Left, Heading::Right];
        let closing = |difficulty| {
            let opponent = opponent_at(IVec2::new(20, 10), Heading::Down, difficulty);
            let mut rng = Pcg32::seed_from_u64(77);
            (0..10_000)
                .filter(|_| {
                    choose_heading(&opponent, target, &legal, &tuning, &mut rng) == Heading::Left
                })
                .count()
        };
        let easy = closing(Difficulty::Easy);
        let medium = closing(Difficulty::Medium);
        let hard = closing(Difficulty::Hard);
        assert!(easy < medium, "easy {easy} medium {medium}");
        assert!(medium <= hard, "medium {medium} hard {hard}");
        assert!(easy < 1_000, "easy {easy}");
        assert_eq!(hard, 10_000);
    }

    #[test]
    fn test_easy_mostly_keeps_heading() {
        let tuning = AiTuning::default();
        let opponent = opponent_at(IVec2::new(20, 10), Heading::Down, Difficulty::Easy);
        let legal = [Heading::Down, Heading::Left, Heading::Right];
        let mut rng = Pcg32::seed_from_u64(1);
        let kept = (0..1000)
            .filter(|_| {
                choose_heading(&opponent, IVec2::new(0, 0), &legal, &tuning, &mut rng)
                    == Heading::Down
            })
            .count();
        // 80% persistence plus a third of the random picks
        assert!((800..930).contains(&kept), "kept {kept}");
    }

    #[test]
    fn test_easy_picks_legal_when_blocked_ahead() {
        let tuning = AiTuning::default();
        let opponent = opponent_at(IVec2::new(20, 10), Heading::Down, Difficulty::Easy);
        let legal = [Heading::Left];
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..20 {
            let h = choose_heading(&opponent, IVec2::ZERO, &legal, &tuning, &mut rng);
            assert_eq!(h, Heading::Left);
        }
    }

    #[test]
    fn test_difficulty_weights() {
        let mut rng = Pcg32::seed_from_u64(5);
        assert_eq!(draw_difficulty([0.0, 0.0, 1.0], &mut rng), Difficulty::Hard);
        assert_eq!(draw_difficulty([1.0, 0.0, 0.0], &mut rng), Difficulty::Easy);
        assert_eq!(draw_difficulty([0.0, 0.0, 0.0], &mut rng), Difficulty::Medium);
        let easy = (0..2000)
            .filter(|_| draw_difficulty([0.2, 0.4, 0.4], &mut rng) == Difficulty::Easy)
            .count();
        assert!((300..500).contains(&easy), "easy {easy}");
    }

    #[test]
    fn test_spawn_keeps_clear_of_obstacles() {
        let mut state = GameState::new(Grid::new(120, 100), &Settings::default(), 4, 0);
        state.player.cycle = Vehicle::new(IVec2::new(60, 50), Heading::Right);
        for x in (0..120).step_by(9) {
            wall(&mut state, IVec2::new(x, 50));
        }
        for _ in 0..30 {
            let cell = find_spawn_cell(&mut state);
            assert!(state.grid.in_bounds(cell));
            let near = state.obstacles.iter().any(|o| {
                let d = (o.pos - cell.as_vec2()).abs();
                d.x.max(d.y) <= 2.0
            });
            assert!(!near || cell == fallback_spawn(&state));
        }
    }

    #[test]
    fn test_spawn_lands_in_ring() {
        let mut state = GameState::new(Grid::new(200, 200), &Settings::default(), 12, 0);
        state.player.cycle = Vehicle::new(IVec2::new(100, 100), Heading::Right);
        let (lo, hi) = (state.tuning.spawn_min_distance, state.tuning.spawn_max_distance);
        for _ in 0..200 {
            let cell = find_spawn_cell(&mut state);
            let dist = (cell - IVec2::new(100, 100)).as_vec2().length();
            assert!(dist >= lo - 0.71 && dist <= hi + 0.71, "{cell:?} at {dist}");
        }
    }

    #[test]
    fn test_fallback_steps_off_player() {
        let mut state = GameState::new(Grid::new(20, 20), &Settings::default(), 6, 0);
        assert_eq!(state.player.cycle.pos, IVec2::new(10, 10));
        let cell = fallback_spawn(&state);
        assert!((cell - IVec2::new(10, 10)).abs().max_element() > 1, "{cell:?}");
        assert!(state.grid.in_bounds(cell));

        state.player.cycle = Vehicle::new(IVec2::new(25, 15), Heading::Up);
        state.grid = Grid::new(40, 30);
        assert_eq!(fallback_spawn(&state), IVec2::new(30, 20));
    }

    #[test]
    fn test_spawn_falls_back_to_corner() {
        let mut state = playing_state();
        // Every cell crowded
        for x in 0..40 {
            for y in 0..30 {
                wall(&mut state, IVec2::new(x, y));
            }
        }
        assert_eq!(find_spawn_cell(&mut state), IVec2::new(30, 20));
        spawn_opponent(&mut state);
        assert!(state.opponent.is_alive());
        assert!(matches!(
            state.events.last(),
            Some(GameEvent::OpponentSpawned { .. })
        ));
    }

    #[test]
    fn test_autopilot_turns_before_wall() {
        let mut state = playing_state();
        state.player.cycle = Vehicle::new(IVec2::new(38, 15), Heading::Right);
        let heading = autopilot_heading(&mut state, NOW);
        assert!(heading == Heading::Up || heading == Heading::Down);

        state.player.cycle = Vehicle::new(IVec2::new(10, 15), Heading::Right);
        assert_eq!(autopilot_heading(&mut state, NOW), Heading::Right);
    }
}
