//! Collision and interaction resolution for the player's move
//!
//! Checks run in a fixed priority order against the candidate cell:
//! world edge, own trail, opponent trail, then obstacles. The first lethal
//! contact rejects the move; obstacle effects may let it through.

use glam::IVec2;

use super::state::{ColorKey, GameEvent, GamePhase, GameState, ObstacleKind};
use crate::audio::SoundEffect;
use crate::consts::*;

/// What happened to the player's move this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Position committed (after any teleport)
    Moved(IVec2),
    /// Position unchanged
    Blocked,
}

/// Result of a lethal contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Still invulnerable from the previous hit
    Ignored,
    LifeLost,
    GameOver,
}

/// Advance the player one cell, resolving everything it runs into.
///
/// Reads the opponent trail as it was before the opponent moves this tick.
pub fn resolve_player_move(state: &mut GameState, now: f64) -> MoveOutcome {
    let candidate = state.player.cycle.advance();

    if !state.grid.in_bounds(candidate) {
        hit(state, now, ColorKey::Wall);
        return MoveOutcome::Blocked;
    }

    if state.player.cycle.trail_contains(candidate) {
        hit(state, now, ColorKey::Wall);
        return MoveOutcome::Blocked;
    }

    if state.opponent.trail_contains(candidate) {
        hit(state, now, ColorKey::Opponent);
        return MoveOutcome::Blocked;
    }

    let mut destination = candidate;
    let touched = state
        .obstacles
        .iter()
        .position(|o| o.touches(candidate, OBSTACLE_HIT_RADIUS));

    if let Some(index) = touched {
        let obstacle = &state.obstacles[index];
        let (id, kind) = (obstacle.id, obstacle.kind);

        match kind {
            ObstacleKind::Wall | ObstacleKind::MovingWall(_) | ObstacleKind::Pillar => {
                if !state.player.is_armed(now) {
                    hit(state, now, kind.color());
                    return MoveOutcome::Blocked;
                }
                state.obstacles.remove(index);
                state.spawn_particles(candidate, kind.color(), 25);
                state.play(SoundEffect::Shatter);
                state.push_event(GameEvent::ObstacleDestroyed { id });
            }
            ObstacleKind::Boost => {
                state.tick_interval = (state.tick_interval * BOOST_FACTOR).max(MIN_TICK_MS);
                state.spawn_particles(candidate, ColorKey::Boost, 15);
                state.play(SoundEffect::Boost);
            }
            ObstacleKind::Slow => {
                state.tick_interval =
                    (state.tick_interval * SLOW_FACTOR).min(MAX_TICK_MS * SLOW_CAP);
                state.spawn_particles(candidate, ColorKey::Slow, 15);
                state.play(SoundEffect::Slow);
            }
            ObstacleKind::Teleport { target } => {
                // No collision check at the far end
                state.spawn_particles(candidate, ColorKey::Teleport, 20);
                state.play(SoundEffect::Teleport);
                destination = target;
                state.spawn_particles(destination, ColorKey::Teleport, 20);
            }
            ObstacleKind::Weapon => {
                let until = now + WEAPON_MS;
                state.player.weapon_until = until;
                state.obstacles.remove(index);
                state.spawn_particles(candidate, ColorKey::Weapon, 20);
                state.play(SoundEffect::WeaponPickup);
                state.push_event(GameEvent::WeaponArmed { until });
            }
            // Scenery is drawn, not driven into
            ObstacleKind::Decoration | ObstacleKind::GiantTree => {}
        }
    }

    state.player.cycle.accept(destination);
    state.score += 1;
    MoveOutcome::Moved(destination)
}

/// Shared response to any lethal contact
pub fn hit(state: &mut GameState, now: f64, color: ColorKey) -> HitOutcome {
    if state.player.is_invulnerable(now) {
        return HitOutcome::Ignored;
    }

    state.play(SoundEffect::Collision);
    let pos = state.player.cycle.pos;

    if state.player.lives > 1 {
        state.player.lives -= 1;
        state.player.invulnerable_until = now + INVULNERABILITY_MS;
        state.spawn_particles(pos, color, 20);
        // Clear the wall to give some breathing room
        state.player.cycle.reset_trail();
        let lives_left = state.player.lives;
        state.push_event(GameEvent::LifeLost { lives_left });
        log::info!("Player hit, {} lives left", lives_left);
        HitOutcome::LifeLost
    } else {
        game_over(state);
        HitOutcome::GameOver
    }
}

fn game_over(state: &mut GameState) {
    state.phase = GamePhase::GameOver;
    let pos = state.player.cycle.pos;
    state.spawn_particles(pos, ColorKey::Wall, 40);

    let new_high_score = state.score > state.high_score;
    if new_high_score {
        state.high_score = state.score;
    }
    state.push_event(GameEvent::Engine(None));
    state.push_event(GameEvent::GameOver {
        score: state.score,
        new_high_score,
    });
    log::info!(
        "Game over: score {} (high score {}{})",
        state.score,
        state.high_score,
        if new_high_score { ", new record" } else { "" }
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::grid::{Grid, Heading};
    use crate::sim::motion::Vehicle;
    use crate::sim::state::{Difficulty, Obstacle, Opponent, OpponentSlot};
    use glam::Vec2;

    const NOW: f64 = 10_000.0;

    fn playing_state() -> GameState {
        let mut state = GameState::new(Grid::new(40, 30), &Settings::default(), 42, 0);
        state.phase = GamePhase::Playing;
        state
    }

    fn place_player(state: &mut GameState, pos: IVec2, heading: Heading, trail: &[IVec2]) {
        state.player.cycle = Vehicle::new(pos, heading);
        state.player.cycle.trail.extend_from_slice(trail);
    }

    fn add_obstacle(state: &mut GameState, kind: ObstacleKind, cell: IVec2) -> u32 {
        let id = state.next_entity_id();
        state.obstacles.push(Obstacle::new(id, kind, cell, Vec2::ONE));
        id
    }

    #[test]
    fn test_open_cell_moves_and_scores() {
        let mut state = playing_state();
        let outcome = resolve_player_move(&mut state, NOW);
        assert_eq!(outcome, MoveOutcome::Moved(IVec2::new(11, 10)));
        assert_eq!(state.player.cycle.trail.len(), 2);
        assert_eq!(state.score, 1);
    }

    #[test]
    fn test_world_edge_blocks_and_costs_a_life() {
        let mut state = playing_state();
        place_player(&mut state, IVec2::new(39, 5), Heading::Right, &[]);
        let outcome = resolve_player_move(&mut state, NOW);
        assert_eq!(outcome, MoveOutcome::Blocked);
        assert_eq!(state.player.cycle.pos, IVec2::new(39, 5));
        assert_eq!(state.player.lives, INITIAL_LIVES - 1);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_own_trail_hit_resets_trail() {
        let mut state = playing_state();
        place_player(&mut state, IVec2::new(5, 5), Heading::Right, &[IVec2::new(6, 5)]);
        let outcome = resolve_player_move(&mut state, NOW);
        assert_eq!(outcome, MoveOutcome::Blocked);
        assert_eq!(state.player.cycle.pos, IVec2::new(5, 5));
        assert_eq!(state.player.lives, 2);
        assert_eq!(state.player.invulnerable_until, NOW + 2000.0);
        assert_eq!(state.player.cycle.trail, vec![IVec2::new(5, 5)]);
        assert!(state.events.contains(&GameEvent::LifeLost { lives_left: 2 }));
    }

    #[test]
    fn test_hits_while_invulnerable_are_ignored() {
        let mut state = playing_state();
        assert_eq!(hit(&mut state, NOW, ColorKey::Wall), HitOutcome::LifeLost);
        let sounds = state.events.len();
        assert_eq!(hit(&mut state, NOW + 500.0, ColorKey::Wall), HitOutcome::Ignored);
        assert_eq!(hit(&mut state, NOW + 1999.0, ColorKey::Wall), HitOutcome::Ignored);
        assert_eq!(state.player.lives, 2);
        assert_eq!(state.events.len(), sounds);
        // Expired window counts again
        assert_eq!(hit(&mut state, NOW + 2000.0, ColorKey::Wall), HitOutcome::LifeLost);
        assert_eq!(state.player.lives, 1);
    }

    #[test]
    fn test_last_life_ends_game_and_records_high_score() {
        let mut state = playing_state();
        state.player.lives = 1;
        state.score = 321;
        state.high_score = 100;
        assert_eq!(hit(&mut state, NOW, ColorKey::Wall), HitOutcome::GameOver);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.player.lives, 1);
        assert_eq!(state.high_score, 321);
        assert!(state.events.contains(&GameEvent::GameOver {
            score: 321,
            new_high_score: true
        }));
    }

    #[test]
    fn test_lower_score_keeps_high_score() {
        let mut state = playing_state();
        state.player.lives = 1;
        state.score = 5;
        state.high_score = 100;
        hit(&mut state, NOW, ColorKey::Wall);
        assert_eq!(state.high_score, 100);
    }

    #[test]
    fn test_opponent_trail_is_lethal_while_alive() {
        let mut state = playing_state();
        let mut cycle = Vehicle::new(IVec2::new(11, 12), Heading::Up);
        cycle.accept(IVec2::new(11, 11));
        cycle.accept(IVec2::new(11, 10));
        state.opponent = OpponentSlot::Alive(Opponent {
            cycle,
            difficulty: Difficulty::Easy,
        });
        assert_eq!(resolve_player_move(&mut state, NOW), MoveOutcome::Blocked);
        assert_eq!(state.player.lives, 2);

        // A derezzed opponent leaves nothing behind
        let mut state = playing_state();
        state.opponent = OpponentSlot::Respawning { at: NOW + 1.0 };
        assert!(matches!(resolve_player_move(&mut state, NOW), MoveOutcome::Moved(_)));
    }

    #[test]
    fn test_boost_and_slow_are_bounded() {
        let mut state = playing_state();
        add_obstacle(&mut state, ObstacleKind::Boost, IVec2::new(11, 10));
        resolve_player_move(&mut state, NOW);
        assert!((state.tick_interval - 84.0).abs() < 1e-9);
        assert_eq!(state.score, 1);
        state.tick_interval = 60.0;
        add_obstacle(&mut state, ObstacleKind::Boost, IVec2::new(12, 10));
        resolve_player_move(&mut state, NOW);
        assert_eq!(state.tick_interval, MIN_TICK_MS);

        let mut state = playing_state();
        add_obstacle(&mut state, ObstacleKind::Slow, IVec2::new(11, 10));
        add_obstacle(&mut state, ObstacleKind::Slow, IVec2::new(12, 10));
        resolve_player_move(&mut state, NOW);
        assert!((state.tick_interval - 156.0).abs() < 1e-9);
        resolve_player_move(&mut state, NOW);
        assert_eq!(state.tick_interval, MAX_TICK_MS * SLOW_CAP);
    }

    #[test]
    fn test_teleport_lands_on_stored_target() {
        let mut state = playing_state();
        let target = IVec2::new(30, 25);
        add_obstacle(&mut state, ObstacleKind::Teleport { target }, IVec2::new(11, 10));
        assert_eq!(resolve_player_move(&mut state, NOW), MoveOutcome::Moved(target));
        assert_eq!(state.player.cycle.pos, target);
        assert_eq!(*state.player.cycle.trail.last().unwrap(), target);
        assert_eq!(state.score, 1);

        // Same pad, same destination
        place_player(&mut state, IVec2::new(11, 9), Heading::Down, &[]);
        assert_eq!(resolve_player_move(&mut state, NOW), MoveOutcome::Moved(target));
    }

    #[test]
    fn test_walls_block_unarmed_player() {
        let mut state = playing_state();
        add_obstacle(&mut state, ObstacleKind::Pillar, IVec2::new(11, 10));
        assert_eq!(resolve_player_move(&mut state, NOW), MoveOutcome::Blocked);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.player.lives, 2);
    }

    #[test]
    fn test_armed_player_shatters_walls() {
        let mut state = playing_state();
        state.player.weapon_until = NOW + 1.0;
        let id = add_obstacle(&mut state, ObstacleKind::Wall, IVec2::new(11, 10));
        assert_eq!(
            resolve_player_move(&mut state, NOW),
            MoveOutcome::Moved(IVec2::new(11, 10))
        );
        assert!(state.obstacles.is_empty());
        assert_eq!(state.score, 1);
        assert_eq!(state.player.lives, INITIAL_LIVES);
        assert!(state.events.contains(&GameEvent::ObstacleDestroyed { id }));
    }

    #[test]
    fn test_weapon_pickup_arms_and_is_consumed() {
        let mut state = playing_state();
        add_obstacle(&mut state, ObstacleKind::Weapon, IVec2::new(11, 10));
        resolve_player_move(&mut state, NOW);
        assert!(state.obstacles.is_empty());
        assert!(state.player.is_armed(NOW + WEAPON_MS - 1.0));
        assert!(!state.player.is_armed(NOW + WEAPON_MS));
    }

    #[test]
    fn test_moving_wall_collides_at_live_position() {
        use crate::sim::state::{Axis, Oscillation};
        let mut state = playing_state();
        let kind = ObstacleKind::MovingWall(Oscillation {
            axis: Axis::Y,
            amplitude: 3.0,
            angular_speed: 0.002,
        });
        add_obstacle(&mut state, kind, IVec2::new(11, 7));
        // Slid down onto the player's path
        state.obstacles[0].pos = Vec2::new(11.0, 9.6);
        assert_eq!(resolve_player_move(&mut state, NOW), MoveOutcome::Blocked);
    }

    #[test]
    fn test_scenery_is_passable() {
        let mut state = playing_state();
        add_obstacle(&mut state, ObstacleKind::Decoration, IVec2::new(11, 10));
        assert!(matches!(resolve_player_move(&mut state, NOW), MoveOutcome::Moved(_)));
        assert_eq!(state.player.lives, INITIAL_LIVES);
    }
}
